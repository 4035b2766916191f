//! 프로세스 메모리 기반 사용자 저장소
//!
//! `STORAGE_BACKEND=memory`로 실행할 때와 테스트에서 사용합니다.
//! 이메일 유니크 제약은 MongoDB 구현과 같은 `ConflictError`로 표현됩니다.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use mongodb::bson::DateTime;
use mongodb::bson::oid::ObjectId;

use super::UserStore;
use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<ObjectId, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> AppError {
        AppError::InternalError("user store lock poisoned".to_string())
    }

    fn update<F>(&self, id: &str, apply: F) -> AppResult<()>
    where
        F: FnOnce(&mut User),
    {
        let object_id =
            ObjectId::parse_str(id).map_err(|_| AppError::NotFound("User not found".to_string()))?;
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        let user = users
            .get_mut(&object_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        apply(user);
        user.updated_at = DateTime::now();
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users.get(&object_id).cloned())
    }

    async fn insert(&self, mut user: User) -> AppResult<User> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::ConflictError("Email is already registered".to_string()));
        }

        let id = user.id.unwrap_or_else(ObjectId::new);
        user.id = Some(id);
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn mark_email_verified(&self, id: &str) -> AppResult<()> {
        self.update(id, |user| user.email_verified = true)
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> AppResult<()> {
        self.update(id, |user| {
            user.password_hash = password_hash.to_string();
            user.token_version += 1;
        })
    }

    async fn bump_token_version(&self, id: &str) -> AppResult<()> {
        self.update(id, |user| user.token_version += 1)
    }

    async fn touch_last_login(&self, id: &str) -> AppResult<()> {
        self.update(id, |user| user.last_login_at = Some(DateTime::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(email: &str) -> User {
        User::new_local(email.to_string(), "Sample".to_string(), "hash".to_string())
    }

    #[actix_web::test]
    async fn test_insert_assigns_id_and_rejects_duplicates() {
        let repo = MemoryUserRepository::new();

        let saved = repo.insert(sample("a@b.com")).await.unwrap();
        assert!(saved.id.is_some());

        let duplicate = repo.insert(sample("a@b.com")).await;
        assert!(matches!(duplicate, Err(AppError::ConflictError(_))));
    }

    #[actix_web::test]
    async fn test_password_update_bumps_token_version() {
        let repo = MemoryUserRepository::new();
        let saved = repo.insert(sample("a@b.com")).await.unwrap();
        let id = saved.id_string();

        repo.update_password(&id, "new-hash").await.unwrap();
        let reloaded = repo.find_by_id(&id).await.unwrap().unwrap();

        assert_eq!(reloaded.password_hash, "new-hash");
        assert_eq!(reloaded.token_version, 1);
    }

    #[actix_web::test]
    async fn test_unknown_ids() {
        let repo = MemoryUserRepository::new();

        assert!(repo.find_by_id("not-an-object-id").await.unwrap().is_none());
        let missing = repo.mark_email_verified(&ObjectId::new().to_hex()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
