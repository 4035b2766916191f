//! 관리자 전용 핸들러
//!
//! `/api/v1/admin` 스코프 전체가 `AuthMiddleware::required_with_role(Role::Admin)`로
//! 보호됩니다.

use actix_web::{HttpResponse, post, web};

use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::auth::AuthService;

/// 사용자의 모든 세션 무효화
///
/// 대상 사용자의 `token_version`을 올려, 이미 발급된 액세스/리프레시 토큰을
/// 전부 거부하게 만듭니다.
///
/// # Endpoint
/// `POST /api/v1/admin/users/{user_id}/revoke-sessions`
#[post("/users/{user_id}/revoke-sessions")]
pub async fn revoke_sessions(
    auth: web::Data<AuthService>,
    admin: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("관리자 세션 폐기 요청 - admin: {}, target: {}", admin.user_id, user_id);
    let response = auth.revoke_user_sessions(&user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}
