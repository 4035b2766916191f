//! 사용자 인증 서비스
//!
//! 이메일/비밀번호 계정의 토큰 수명 주기 전체를 다루는 인증 서비스와,
//! 그 API를 쓰는 클라이언트 세션 매니저를 제공합니다.
//!
//! # Features
//!
//! - **계정**: 회원가입, 이메일 인증, 비밀번호 재설정 (일회용 토큰)
//! - **JWT 인증**: 짧은 수명의 액세스 토큰 + 회전하는 리프레시 토큰
//! - **폐기**: 로그아웃 블랙리스트, `token_version` 기반 전체 세션 무효화
//! - **MongoDB**: 사용자 데이터 영구 저장
//! - **Redis**: 리프레시 세션, 블랙리스트, 일회용 토큰 저장
//! - **클라이언트**: 401 시 한 번의 투명한 갱신과 재시도, 실패 시 세션 정리
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐        ┌──────────────────┐
//! │   HTTP Routes   │ ◀───── │  client (세션)    │
//! └─────────────────┘        └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Middlewares     │ ← Bearer 토큰 인증, 역할 확인
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← AuthService, TokenService, UserService, Mailer
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← UserStore, TokenStore (trait 객체)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소 (또는 메모리 구현)
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use users_auth_service::services::auth::{AuthService, AuthSettings};
//!
//! let auth = AuthService::new(users, tokens, mailer, AuthSettings::from_env());
//! let login = auth.login(LoginRequest { email, password }).await?;
//! let caller = auth.authenticate(&login.access_token).await?;
//! ```

pub mod caching;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
