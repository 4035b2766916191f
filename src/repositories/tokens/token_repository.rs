//! Redis 기반 토큰 리포지토리

use async_trait::async_trait;

use super::{BlacklistEntry, TokenStore, blacklist_key, refresh_key, single_use_key};
use crate::caching::redis::RedisClient;
use crate::domain::models::token::{RefreshSession, SingleUsePurpose, SingleUseRecord};
use crate::errors::AppResult;

pub struct RedisTokenRepository {
    redis: RedisClient,
}

impl RedisTokenRepository {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl TokenStore for RedisTokenRepository {
    async fn store_refresh(&self, jti: &str, session: &RefreshSession, ttl_seconds: u64) -> AppResult<()> {
        self.redis
            .set_with_expiry(&refresh_key(jti), session, ttl_seconds)
            .await?;
        log::debug!("Refresh token 저장 완료 - user_id: {}, ttl: {}초", session.user_id, ttl_seconds);
        Ok(())
    }

    async fn take_refresh(&self, jti: &str) -> AppResult<Option<RefreshSession>> {
        Ok(self.redis.take(&refresh_key(jti)).await?)
    }

    async fn revoke_refresh(&self, jti: &str) -> AppResult<()> {
        Ok(self.redis.del(&refresh_key(jti)).await?)
    }

    async fn blacklist_access(&self, jti: &str, entry: &BlacklistEntry, ttl_seconds: u64) -> AppResult<()> {
        self.redis
            .set_with_expiry(&blacklist_key(jti), entry, ttl_seconds)
            .await?;
        log::info!("Access token 블랙리스트 등록 - user_id: {}, ttl: {}초", entry.user_id, ttl_seconds);
        Ok(())
    }

    async fn is_access_blacklisted(&self, jti: &str) -> AppResult<bool> {
        Ok(self.redis.exists(&blacklist_key(jti)).await?)
    }

    async fn store_single_use(&self, token_hash: &str, record: &SingleUseRecord, ttl_seconds: u64) -> AppResult<()> {
        self.redis
            .set_with_expiry(&single_use_key(record.purpose, token_hash), record, ttl_seconds)
            .await?;
        Ok(())
    }

    async fn take_single_use(&self, purpose: SingleUsePurpose, token_hash: &str) -> AppResult<Option<SingleUseRecord>> {
        Ok(self.redis.take(&single_use_key(purpose, token_hash)).await?)
    }
}
