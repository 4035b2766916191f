//! # Domain Layer Module
//!
//! 인증 흐름을 구성하는 도메인 타입을 정의합니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - MongoDB에 저장되는 사용자 엔티티와 역할(Role)
//! ├── dto       - HTTP 요청/응답 계약 (camelCase JSON)
//! └── models    - JWT 클레임, 세션/일회용 토큰 레코드, 인증 컨텍스트
//! ```
//!
//! 서버(`handlers`, `services`)와 클라이언트(`client`)가 같은 DTO를
//! 공유하므로, 응답 형태가 바뀌면 양쪽이 함께 컴파일 에러로 드러납니다.

pub mod dto;
pub mod entities;
pub mod models;

pub use entities::{Role, User};
pub use models::{AuthenticatedUser, OptionalUser};
