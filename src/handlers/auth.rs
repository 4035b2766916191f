//! Authentication HTTP Handlers
//!
//! `/api/v1/users` 아래의 인증 엔드포인트를 처리합니다. 핸들러는 요청을
//! 추출해 [`AuthService`]에 넘기고 결과를 JSON으로 돌려줄 뿐이며, 검증과
//! 상태 변경은 모두 서비스 계층에서 일어납니다.
//!
//! # Endpoints
//!
//! | Method | Path | 인증 |
//! |--------|------|------|
//! | POST | `/register` | - |
//! | POST | `/login` | - (IP별 Rate Limit) |
//! | POST | `/logout` | 리프레시 토큰 (액세스 토큰 선택) |
//! | POST | `/refresh-token` | 리프레시 토큰 |
//! | GET | `/verify-token` | 액세스 토큰 |
//! | GET | `/verify-email/{token}` | - |
//! | POST | `/resend-verification` | - |
//! | POST | `/forgot-password` | - |
//! | POST | `/reset-password` | - |
//! | GET | `/profile` | 액세스 토큰 |
//!
//! 미들웨어가 붙는 엔드포인트는 매크로 대신 일반 함수로 정의하고, 라우트
//! 설정에서 `web::resource(..).wrap(..)`로 감쌉니다.

use actix_web::{HttpResponse, get, post, web};

use crate::domain::dto::tokens::{LogoutRequest, RefreshTokenRequest};
use crate::domain::dto::users::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResendVerificationRequest,
    ResetPasswordRequest,
};
use crate::domain::models::auth::{AuthenticatedUser, OptionalUser};
use crate::errors::AppError;
use crate::services::auth::AuthService;
use validator::Validate;

/// 회원가입
///
/// # Endpoint
/// `POST /api/v1/users/register`
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth.register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// 이메일/비밀번호 로그인
///
/// # Endpoint
/// `POST /api/v1/users/login`
pub async fn login(
    auth: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth.login(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 로그아웃
///
/// 본문의 리프레시 토큰을 폐기하고, 유효한 액세스 토큰이 함께 오면 블랙리스트에
/// 올립니다. 본문이 없거나 토큰이 이미 무효여도 성공을 반환합니다.
///
/// # Endpoint
/// `POST /api/v1/users/logout`
pub async fn logout(
    auth: web::Data<AuthService>,
    caller: OptionalUser,
    payload: Option<web::Json<LogoutRequest>>,
) -> Result<HttpResponse, AppError> {
    let request = payload.map(web::Json::into_inner).unwrap_or_default();
    let response = auth
        .logout(request.refresh_token.as_deref(), caller.0.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 토큰 갱신 (리프레시 토큰 회전)
///
/// # Endpoint
/// `POST /api/v1/users/refresh-token`
#[post("/refresh-token")]
pub async fn refresh_token(
    auth: web::Data<AuthService>,
    payload: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let response = auth.refresh(&payload.refresh_token).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 액세스 토큰 검증
///
/// # Endpoint
/// `GET /api/v1/users/verify-token`
pub async fn verify_token(
    auth: web::Data<AuthService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = auth.verify_token(&caller).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// # Endpoint
/// `GET /api/v1/users/profile`
pub async fn profile(
    auth: web::Data<AuthService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = auth.profile(&caller).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 이메일 인증 링크 처리
///
/// # Endpoint
/// `GET /api/v1/users/verify-email/{token}`
#[get("/verify-email/{token}")]
pub async fn verify_email(
    auth: web::Data<AuthService>,
    token: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = auth.verify_email(&token).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// # Endpoint
/// `POST /api/v1/users/resend-verification`
#[post("/resend-verification")]
pub async fn resend_verification(
    auth: web::Data<AuthService>,
    payload: web::Json<ResendVerificationRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth.resend_verification(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 비밀번호 재설정 메일 요청
///
/// 계정 존재 여부와 관계없이 같은 응답을 반환합니다.
///
/// # Endpoint
/// `POST /api/v1/users/forgot-password`
#[post("/forgot-password")]
pub async fn forgot_password(
    auth: web::Data<AuthService>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth.forgot_password(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// # Endpoint
/// `POST /api/v1/users/reset-password`
#[post("/reset-password")]
pub async fn reset_password(
    auth: web::Data<AuthService>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth.reset_password(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
