//! 클라이언트 에러 정의

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// 서버가 2xx가 아닌 상태 코드로 응답
    #[error("{message} (HTTP {status})")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// 고정 타임아웃 초과 (갱신을 일으키지 않음)
    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    /// 토큰 갱신 실패로 세션이 종료됨
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
