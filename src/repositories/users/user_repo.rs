//! MongoDB 기반 사용자 리포지토리

use async_trait::async_trait;
use mongodb::bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use super::UserStore;
use crate::db::Database;
use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult};

const COLLECTION_NAME: &str = "users";
const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    /// 리포지토리를 생성하고 `email` 유니크 인덱스를 보장합니다.
    pub async fn new(database: &Database) -> AppResult<Self> {
        let repository = Self {
            collection: database.get_database().collection::<User>(COLLECTION_NAME),
        };
        repository.ensure_indexes().await?;
        Ok(repository)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).name("email_unique".to_string()).build())
            .build();

        self.collection.create_index(index).await?;
        log::info!("users 컬렉션 인덱스 확인 완료");
        Ok(())
    }

    fn parse_id(id: &str) -> AppResult<ObjectId> {
        ObjectId::parse_str(id).map_err(|_| AppError::NotFound("User not found".to_string()))
    }

    /// 단일 문서 업데이트. 일치하는 문서가 없으면 `NotFound`
    async fn update_by_id(&self, id: &str, update: Document) -> AppResult<()> {
        let object_id = Self::parse_id(id)?;
        let result = self
            .collection
            .update_one(doc! { "_id": object_id }, update)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl UserStore for MongoUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.collection.find_one(doc! { "_id": object_id }).await?)
    }

    async fn insert(&self, mut user: User) -> AppResult<User> {
        let result = self.collection.insert_one(&user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::ConflictError("Email is already registered".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::DatabaseError("inserted_id is not an ObjectId".to_string()))?;
        user.id = Some(id);
        Ok(user)
    }

    async fn mark_email_verified(&self, id: &str) -> AppResult<()> {
        self.update_by_id(
            id,
            doc! { "$set": { "email_verified": true, "updated_at": DateTime::now() } },
        )
        .await
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> AppResult<()> {
        self.update_by_id(
            id,
            doc! {
                "$set": { "password_hash": password_hash, "updated_at": DateTime::now() },
                "$inc": { "token_version": 1_i64 },
            },
        )
        .await
    }

    async fn bump_token_version(&self, id: &str) -> AppResult<()> {
        self.update_by_id(
            id,
            doc! {
                "$set": { "updated_at": DateTime::now() },
                "$inc": { "token_version": 1_i64 },
            },
        )
        .await
    }

    async fn touch_last_login(&self, id: &str) -> AppResult<()> {
        self.update_by_id(id, doc! { "$set": { "last_login_at": DateTime::now() } })
            .await
    }
}
