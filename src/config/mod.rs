//! # Configuration Module
//!
//! 서비스의 설정 관리를 담당하는 모듈입니다.
//! 모든 값은 환경 변수에서 읽으며, 개발 환경에서 안전한 기본값을 제공합니다.
//! 프로파일별 `.env.dev` / `.env.prod` 파일은 `main`에서 `dotenv`로 먼저 로드됩니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 환경, 서버, 저장소, Rate Limit, CORS 설정
//! - [`auth_config`] - JWT 및 일회용 토큰 설정
//! - [`mail_config`] - SMTP 메일 발송 설정
//! - [`client_config`] - 클라이언트 세션 매니저 설정
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use users_auth_service::config::{JwtConfig, ServerConfig};
//!
//! let jwt = JwtConfig::settings();
//! println!("access token TTL: {}분", jwt.access_ttl.num_minutes());
//! println!("bind: {}:{}", ServerConfig::host(), ServerConfig::port());
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버
//! export HOST="0.0.0.0"
//! export PORT="8080"
//!
//! # 저장소 (mongo | memory)
//! export STORAGE_BACKEND="mongo"
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="users_auth_dev"
//! export REDIS_URL="redis://localhost:6379"
//!
//! # JWT
//! export JWT_SECRET="your-super-secret-key"
//! export JWT_ACCESS_TTL_MINUTES="15"
//! export JWT_REFRESH_TTL_DAYS="7"
//!
//! # 메일
//! export SMTP_HOST="sandbox.smtp.mailtrap.io"
//! export SMTP_USER="..." SMTP_PASS="..."
//! export FRONTEND_URL="http://localhost:5173"
//! ```

pub mod auth_config;
pub mod client_config;
pub mod data_config;
pub mod mail_config;

pub use auth_config::*;
pub use client_config::*;
pub use data_config::*;
pub use mail_config::*;

use std::env;
use std::str::FromStr;

/// 환경 변수를 읽어 파싱하고, 없거나 잘못된 값이면 기본값을 사용합니다.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{} 값을 해석할 수 없어 기본값을 사용합니다: {:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// 문자열 환경 변수 (없으면 기본값)
pub(crate) fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
