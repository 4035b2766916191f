//! 토큰 상태 저장소
//!
//! JWT 자체는 상태가 없지만, 폐기와 단일 사용을 보장하려면 서버 측 상태가
//! 필요합니다. 이 모듈은 그 상태를 세 가지 레코드로 관리합니다.
//!
//! | 키 | 값 | 만료 |
//! |----|----|------|
//! | `refresh_token:{jti}` | [`RefreshSession`] | 리프레시 토큰 만료 시각 |
//! | `blacklist_token:{jti}` | [`BlacklistEntry`] | 액세스 토큰 만료 시각 |
//! | `{purpose}:{sha256}` | [`SingleUseRecord`] | 토큰 만료 + 보관 기간 |
//!
//! `take_*` 연산은 조회와 삭제를 원자적으로 수행하므로, 같은 토큰을
//! 두 요청이 동시에 사용하면 정확히 하나만 성공합니다.

pub mod memory;
pub mod token_repository;

pub use memory::MemoryTokenRepository;
pub use token_repository::RedisTokenRepository;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::models::token::{RefreshSession, SingleUsePurpose, SingleUseRecord};
use crate::errors::AppResult;

/// 블랙리스트에 등록된 액세스 토큰 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub user_id: String,
    pub blacklisted_at: i64,
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// 리프레시 세션 저장
    async fn store_refresh(&self, jti: &str, session: &RefreshSession, ttl_seconds: u64) -> AppResult<()>;

    /// 리프레시 세션을 원자적으로 소비. 없거나 이미 소비되었으면 `None`
    async fn take_refresh(&self, jti: &str) -> AppResult<Option<RefreshSession>>;

    /// 리프레시 세션 폐기 (없어도 성공)
    async fn revoke_refresh(&self, jti: &str) -> AppResult<()>;

    /// 액세스 토큰을 남은 유효 기간 동안 블랙리스트에 등록
    async fn blacklist_access(&self, jti: &str, entry: &BlacklistEntry, ttl_seconds: u64) -> AppResult<()>;

    async fn is_access_blacklisted(&self, jti: &str) -> AppResult<bool>;

    /// 일회용 토큰 레코드 저장 (키는 토큰 해시)
    async fn store_single_use(&self, token_hash: &str, record: &SingleUseRecord, ttl_seconds: u64) -> AppResult<()>;

    /// 일회용 토큰 레코드를 원자적으로 소비
    async fn take_single_use(&self, purpose: SingleUsePurpose, token_hash: &str) -> AppResult<Option<SingleUseRecord>>;
}

pub fn refresh_key(jti: &str) -> String {
    format!("refresh_token:{}", jti)
}

pub fn blacklist_key(jti: &str) -> String {
    format!("blacklist_token:{}", jti)
}

pub fn single_use_key(purpose: SingleUsePurpose, token_hash: &str) -> String {
    format!("{}:{}", purpose.key_prefix(), token_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_formats() {
        assert_eq!(refresh_key("j1"), "refresh_token:j1");
        assert_eq!(blacklist_key("j2"), "blacklist_token:j2");
        assert_eq!(
            single_use_key(SingleUsePurpose::EmailVerification, "h"),
            "email_verification:h"
        );
    }
}
