//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Client (Browser, session-cli)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Middlewares - 인증/권한                       ← AuthMiddleware
//! ├─────────────────────────────────────────────┤
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리       ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 비즈니스 로직                      ← AuthService
//! ├─────────────────────────────────────────────┤
//!   Repositories - 데이터 접근                    ← UserStore / TokenStore
//! └─────────────────────────────────────────────┘
//! ```
//!
//! 핸들러는 `web::Data<AuthService>`를 주입받고, 에러는 `AppError`로
//! 반환합니다. 에러 응답 형식은 `AppError`의 `ResponseError` 구현이 결정합니다.
//!
//! - **`auth`**: `/api/v1/users` 인증 엔드포인트
//! - **`admin`**: `/api/v1/admin` 관리자 엔드포인트

pub mod admin;
pub mod auth;
