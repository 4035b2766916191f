//! 사용자 데이터 액세스 계층
//!
//! [`UserStore`] trait과 MongoDB / 메모리 구현을 제공합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! let users: Arc<dyn UserStore> = Arc::new(MongoUserRepository::new(&database).await?);
//! let user = users.find_by_email("user@example.com").await?;
//! ```

pub mod memory;
pub mod user_repo;

pub use memory::MemoryUserRepository;
pub use user_repo::MongoUserRepository;

use async_trait::async_trait;

use crate::domain::entities::users::User;
use crate::errors::AppResult;

/// 사용자 계정 저장소
///
/// 모든 변경은 단일 문서에 대한 원자적 업데이트이며, 문서 간 트랜잭션은
/// 필요하지 않습니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 정규화된 이메일로 조회
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// ID(ObjectId hex)로 조회. 형식이 잘못된 ID는 `None`
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// 새 사용자 저장. 이메일 중복 시 `ConflictError`
    async fn insert(&self, user: User) -> AppResult<User>;

    /// 이메일 인증 완료 표시 (단방향, 반복 호출해도 결과 동일)
    async fn mark_email_verified(&self, id: &str) -> AppResult<()>;

    /// 비밀번호 해시 교체와 함께 `token_version`을 증가시킵니다.
    async fn update_password(&self, id: &str, password_hash: &str) -> AppResult<()>;

    /// `token_version`을 증가시켜 발급된 모든 토큰을 무효화합니다.
    async fn bump_token_version(&self, id: &str) -> AppResult<()>;

    /// 마지막 로그인 시각 갱신
    async fn touch_last_login(&self, id: &str) -> AppResult<()>;
}
