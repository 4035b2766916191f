//! 인증 서비스 모듈
//!
//! - [`token_service`] - JWT 발급/검증, 일회용 토큰 생성
//! - [`auth_service`] - 회원가입, 로그인, 갱신, 로그아웃, 인증 메일, 비밀번호 재설정

pub mod auth_service;
pub mod token_service;

pub use auth_service::*;
pub use token_service::*;
