//! 클라이언트 세션 매니저 설정

use std::time::Duration;

use super::env_string;

pub struct ClientConfig;

impl ClientConfig {
    /// 모든 요청에 적용되는 고정 타임아웃
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// 인증 API 기본 주소 (`AUTH_API_URL`)
    pub fn api_base_url() -> String {
        env_string("AUTH_API_URL", "http://localhost:8080/api/v1/users")
            .trim_end_matches('/')
            .to_string()
    }
}
