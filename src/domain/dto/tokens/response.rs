//! 토큰 관련 응답 DTO

use serde::{Deserialize, Serialize};

/// `POST /refresh-token` 응답
///
/// 리프레시 토큰은 매 갱신마다 교체되므로 새 토큰이 함께 내려갑니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}
