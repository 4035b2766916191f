//! 비즈니스 로직 계층
//!
//! 서비스는 전역 상태 없이 생성자로 의존성을 받습니다. `main`이 저장소와
//! 메일러를 고른 뒤 [`auth::AuthService`] 하나를 만들어 `web::Data`로
//! 모든 워커에 공유합니다.

pub mod auth;
pub mod mail;
pub mod users;
