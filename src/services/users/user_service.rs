//! 사용자 계정 서비스
//!
//! 비밀번호 해싱/검증과 계정 상태 변경을 담당합니다. bcrypt 연산은
//! 워커 스레드를 막지 않도록 blocking 스레드 풀에서 실행합니다.

use std::sync::Arc;
use std::time::Instant;

use actix_web::web;

use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult};
use crate::repositories::users::UserStore;

/// 로그인 실패 시 항상 같은 메시지를 사용하여 어느 필드가 틀렸는지 숨깁니다.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct UserService {
    users: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    /// 이메일 인증 전 상태의 계정을 생성합니다.
    ///
    /// `email`은 이미 정규화된 값이어야 합니다.
    pub async fn create_user(&self, email: String, name: String, password: &str) -> AppResult<User> {
        let start_time = Instant::now();
        let password_hash = self.hash_password(password).await?;

        let user = self
            .users
            .insert(User::new_local(email, name, password_hash))
            .await?;

        log::info!("Total user creation took: {:?}", start_time.elapsed());
        Ok(user)
    }

    /// 이메일/비밀번호 검증
    ///
    /// 계정이 없거나 비밀번호가 틀려도 같은 `AuthenticationError`를 반환합니다.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

        let verify_start = Instant::now();
        let candidate = password.to_string();
        let stored_hash = user.password_hash.clone();
        let is_valid = web::block(move || bcrypt::verify(candidate, &stored_hash))
            .await
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 작업 실패: {}", e)))?
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        log::debug!("Password verification took: {:?}", verify_start.elapsed());

        if !is_valid {
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users.find_by_email(email).await
    }

    pub async fn get_user(&self, id: &str) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn mark_email_verified(&self, id: &str) -> AppResult<()> {
        self.users.mark_email_verified(id).await
    }

    /// 새 비밀번호 저장. 저장소가 `token_version`을 함께 올립니다.
    pub async fn change_password(&self, id: &str, new_password: &str) -> AppResult<()> {
        let password_hash = self.hash_password(new_password).await?;
        self.users.update_password(id, &password_hash).await
    }

    pub async fn revoke_sessions(&self, id: &str) -> AppResult<()> {
        self.users.bump_token_version(id).await
    }

    /// 마지막 로그인 시각 기록 (실패해도 로그인은 진행)
    pub async fn record_login(&self, id: &str) {
        if let Err(e) = self.users.touch_last_login(id).await {
            log::warn!("마지막 로그인 시각 갱신 실패 - user_id: {}, error: {}", id, e);
        }
    }

    async fn hash_password(&self, password: &str) -> AppResult<String> {
        let hash_start = Instant::now();
        let cost = self.bcrypt_cost;
        let plain = password.to_string();

        let password_hash = web::block(move || bcrypt::hash(plain, cost))
            .await
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 작업 실패: {}", e)))?
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;

        log::debug!("Password hashing took: {:?}", hash_start.elapsed());
        Ok(password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::users::MemoryUserRepository;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryUserRepository::new()), 4)
    }

    #[actix_web::test]
    async fn test_created_user_can_authenticate() {
        let service = service();
        let created = service
            .create_user("a@b.com".into(), "A".into(), "secret")
            .await
            .unwrap();

        assert_ne!(created.password_hash, "secret");
        let verified = service.verify_credentials("a@b.com", "secret").await.unwrap();
        assert_eq!(verified.id, created.id);
    }

    #[actix_web::test]
    async fn test_credential_failures_are_indistinguishable() {
        let service = service();
        service
            .create_user("a@b.com".into(), "A".into(), "secret")
            .await
            .unwrap();

        let wrong_password = service.verify_credentials("a@b.com", "nope").await.unwrap_err();
        let unknown_email = service.verify_credentials("x@b.com", "secret").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), INVALID_CREDENTIALS);
        assert_eq!(unknown_email.to_string(), INVALID_CREDENTIALS);
    }

    #[actix_web::test]
    async fn test_change_password_replaces_credentials() {
        let service = service();
        let user = service
            .create_user("a@b.com".into(), "A".into(), "secret")
            .await
            .unwrap();

        service.change_password(&user.id_string(), "brand-new").await.unwrap();

        assert!(service.verify_credentials("a@b.com", "secret").await.is_err());
        let reloaded = service.verify_credentials("a@b.com", "brand-new").await.unwrap();
        assert_eq!(reloaded.token_version, 1);
    }
}
