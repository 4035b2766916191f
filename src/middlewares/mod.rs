//! 미들웨어 모듈
//!
//! 요청 처리 파이프라인에서 인증과 권한 확인을 담당합니다.
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - `Authorization: Bearer <token>` 헤더에서 액세스 토큰 추출
//! - 서명, 만료, 블랙리스트 확인 후 [`AuthenticatedUser`]를 Request Extensions에 저장
//! - 필수/선택 인증 모드, 역할 요구 사항 지원
//!
//! [`AuthenticatedUser`]: crate::domain::models::auth::AuthenticatedUser
//!
//! # 사용 방법
//!
//! 미들웨어는 `web::Data<AuthService>`를 앱 데이터에서 꺼내 쓰므로,
//! 앱에 `AuthService`가 등록되어 있어야 합니다.
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! App::new()
//!     .app_data(auth_service.clone())
//!     .service(
//!         web::resource("/profile")
//!             .wrap(AuthMiddleware::required())
//!             .route(web::get().to(profile)),
//!     )
//!     .service(
//!         web::scope("/api/v1/admin")
//!             .wrap(AuthMiddleware::required_with_role(Role::Admin))
//!             .service(revoke_sessions),
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
