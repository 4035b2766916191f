//! 데이터 액세스 계층
//!
//! 서비스는 구체 구현이 아니라 trait 객체(`Arc<dyn UserStore>`,
//! `Arc<dyn TokenStore>`)에 의존합니다. 운영에서는 MongoDB/Redis 구현을,
//! 로컬 개발과 테스트에서는 같은 규칙을 따르는 메모리 구현을 주입합니다.
//!
//! - [`users`] - 사용자 계정 저장소
//! - [`tokens`] - 리프레시 세션, 액세스 토큰 블랙리스트, 일회용 토큰 저장소

pub mod tokens;
pub mod users;

pub use tokens::{MemoryTokenRepository, RedisTokenRepository, TokenStore};
pub use users::{MemoryUserRepository, MongoUserRepository, UserStore};
