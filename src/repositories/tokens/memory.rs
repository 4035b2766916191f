//! 프로세스 메모리 기반 토큰 저장소
//!
//! Redis 구현과 같은 키와 만료 규칙을 따릅니다. 만료된 항목은 접근 시
//! 정리되며, `take_*`는 하나의 락 안에서 조회와 삭제를 수행합니다.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{BlacklistEntry, TokenStore, blacklist_key, refresh_key, single_use_key};
use crate::domain::models::token::{RefreshSession, SingleUsePurpose, SingleUseRecord};
use crate::errors::{AppError, AppResult, ErrorContext};

struct Entry {
    json: String,
    expires_at: Instant,
}

#[derive(Default)]
pub struct MemoryTokenRepository {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::InternalError("token store lock poisoned".to_string()))
    }

    fn put<T: Serialize>(&self, key: String, value: &T, ttl_seconds: u64) -> AppResult<()> {
        let json = serde_json::to_string(value).context("토큰 레코드 직렬화 실패")?;
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds.max(1));

        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.expires_at > Instant::now());
        entries.insert(key, Entry { json, expires_at });
        Ok(())
    }

    fn take<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let entry = self.lock()?.remove(key);
        match entry {
            Some(entry) if entry.expires_at > Instant::now() => {
                let value = serde_json::from_str(&entry.json).context("토큰 레코드 역직렬화 실패")?;
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    fn contains(&self, key: &str) -> AppResult<bool> {
        let entries = self.lock()?;
        Ok(entries
            .get(key)
            .is_some_and(|entry| entry.expires_at > Instant::now()))
    }
}

#[async_trait]
impl TokenStore for MemoryTokenRepository {
    async fn store_refresh(&self, jti: &str, session: &RefreshSession, ttl_seconds: u64) -> AppResult<()> {
        self.put(refresh_key(jti), session, ttl_seconds)
    }

    async fn take_refresh(&self, jti: &str) -> AppResult<Option<RefreshSession>> {
        self.take(&refresh_key(jti))
    }

    async fn revoke_refresh(&self, jti: &str) -> AppResult<()> {
        self.lock()?.remove(&refresh_key(jti));
        Ok(())
    }

    async fn blacklist_access(&self, jti: &str, entry: &BlacklistEntry, ttl_seconds: u64) -> AppResult<()> {
        self.put(blacklist_key(jti), entry, ttl_seconds)
    }

    async fn is_access_blacklisted(&self, jti: &str) -> AppResult<bool> {
        self.contains(&blacklist_key(jti))
    }

    async fn store_single_use(&self, token_hash: &str, record: &SingleUseRecord, ttl_seconds: u64) -> AppResult<()> {
        self.put(single_use_key(record.purpose, token_hash), record, ttl_seconds)
    }

    async fn take_single_use(&self, purpose: SingleUsePurpose, token_hash: &str) -> AppResult<Option<SingleUseRecord>> {
        self.take(&single_use_key(purpose, token_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> RefreshSession {
        RefreshSession {
            user_id: "u1".to_string(),
            session_id: "s1".to_string(),
            issued_at: 0,
            expires_at: 0,
        }
    }

    #[actix_web::test]
    async fn test_refresh_session_is_consumed_once() {
        let store = MemoryTokenRepository::new();
        store.store_refresh("j1", &session(), 60).await.unwrap();

        assert_eq!(store.take_refresh("j1").await.unwrap(), Some(session()));
        assert_eq!(store.take_refresh("j1").await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_revoke_is_idempotent() {
        let store = MemoryTokenRepository::new();
        store.store_refresh("j1", &session(), 60).await.unwrap();

        store.revoke_refresh("j1").await.unwrap();
        store.revoke_refresh("j1").await.unwrap();
        assert_eq!(store.take_refresh("j1").await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_single_use_records_are_scoped_by_purpose() {
        let store = MemoryTokenRepository::new();
        let record = SingleUseRecord {
            user_id: "u1".to_string(),
            email: "a@b.com".to_string(),
            purpose: SingleUsePurpose::PasswordReset,
            expires_at: 0,
        };
        store.store_single_use("hash", &record, 60).await.unwrap();

        let wrong_purpose = store
            .take_single_use(SingleUsePurpose::EmailVerification, "hash")
            .await
            .unwrap();
        assert!(wrong_purpose.is_none());

        let taken = store
            .take_single_use(SingleUsePurpose::PasswordReset, "hash")
            .await
            .unwrap();
        assert_eq!(taken, Some(record));
    }

    #[actix_web::test]
    async fn test_blacklist_lookup() {
        let store = MemoryTokenRepository::new();
        let entry = BlacklistEntry {
            user_id: "u1".to_string(),
            blacklisted_at: 0,
        };

        assert!(!store.is_access_blacklisted("j1").await.unwrap());
        store.blacklist_access("j1", &entry, 60).await.unwrap();
        assert!(store.is_access_blacklisted("j1").await.unwrap());
    }
}
