//! 토큰 관련 요청 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /refresh-token` 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// `POST /logout` 요청
///
/// 본문 없이 호출해도 되며, 리프레시 토큰이 있으면 서버 측에서 폐기합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}
