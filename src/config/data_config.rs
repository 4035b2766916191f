//! 환경, 서버, 저장소 관련 설정

use std::env;

use super::{env_or, env_string};

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// `ENVIRONMENT` 환경 변수로 현재 환경을 결정합니다 (기본값: production)
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// 비밀번호 해싱 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// bcrypt 해싱 비용
    ///
    /// `BCRYPT_COST`가 4..=31 범위의 유효한 값이면 그 값을, 아니면
    /// 환경별 기본값을 사용합니다.
    pub fn bcrypt_cost() -> u32 {
        if let Ok(cost_str) = env::var("BCRYPT_COST") {
            if let Ok(cost) = cost_str.parse::<u32>() {
                if (4..=31).contains(&cost) {
                    return cost;
                }
            }
            log::warn!("BCRYPT_COST 값이 올바르지 않아 환경 기본값을 사용합니다");
        }

        Self::bcrypt_cost_for_env(&Environment::current())
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// HTTP 서버 설정
pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env_or("PORT", 8080)
    }

    pub fn host() -> String {
        env_string("HOST", "0.0.0.0")
    }

    pub fn workers() -> usize {
        env_or("SERVER_WORKERS", 4)
    }
}

/// 사용자/토큰 저장소 백엔드
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StorageBackend {
    /// MongoDB(사용자) + Redis(토큰)
    Mongo,
    /// 프로세스 메모리 (로컬 개발용, 재시작 시 초기화)
    Memory,
}

/// 저장소 연결 설정
pub struct StorageConfig;

impl StorageConfig {
    pub fn backend() -> StorageBackend {
        Self::backend_from_str(&env_string("STORAGE_BACKEND", "mongo"))
    }

    pub fn backend_from_str(value: &str) -> StorageBackend {
        match value.to_lowercase().as_str() {
            "memory" | "in-memory" => StorageBackend::Memory,
            _ => StorageBackend::Mongo,
        }
    }

    pub fn mongodb_uri() -> String {
        env_string("MONGODB_URI", "mongodb://localhost:27017")
    }

    pub fn database_name() -> String {
        env_string("DATABASE_NAME", "users_auth_dev")
    }

    pub fn redis_url() -> String {
        env_string("REDIS_URL", "redis://localhost:6379")
    }
}

/// Rate Limiting 설정
///
/// 전역 제한과 별도로 `/login`에는 IP별로 더 엄격한 제한이 걸립니다.
/// 기본값은 15분에 5회 (180초마다 1회 충전, 버스트 5).
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
    pub login_seconds_per_request: u64,
    pub login_burst_size: u32,
}

impl RateLimitConfig {
    pub fn load() -> Self {
        Self {
            per_second: env_or("RATE_LIMIT_PER_SECOND", 10),
            burst_size: env_or("RATE_LIMIT_BURST_SIZE", 30),
            login_seconds_per_request: env_or("LOGIN_RATE_LIMIT_SECONDS_PER_REQUEST", 180),
            login_burst_size: env_or("LOGIN_RATE_LIMIT_BURST_SIZE", 5),
        }
    }
}

/// CORS 허용 Origin 설정
pub struct CorsConfig;

impl CorsConfig {
    const DEFAULT_ORIGINS: [&'static str; 3] = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    /// 기본 로컬 개발 Origin + `FRONTEND_URL` + `CORS_ALLOWED_ORIGINS`(쉼표 구분)
    pub fn allowed_origins() -> Vec<String> {
        let mut candidates: Vec<String> = Self::DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect();

        if let Ok(frontend) = env::var("FRONTEND_URL") {
            candidates.extend(Self::parse_origins(&frontend));
        }
        if let Ok(extra) = env::var("CORS_ALLOWED_ORIGINS") {
            candidates.extend(Self::parse_origins(&extra));
        }

        let mut origins = Vec::with_capacity(candidates.len());
        for origin in candidates {
            if !origins.contains(&origin) {
                origins.push(origin);
            }
        }
        origins
    }

    pub fn parse_origins(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|origin| origin.trim().trim_end_matches('/'))
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("TEST"), Environment::Test);
        assert_eq!(Environment::from_str("stage"), Environment::Staging);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
        assert!(Environment::from_str("prod").is_production());
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 12);
    }

    #[test]
    fn test_storage_backend_from_string() {
        assert_eq!(StorageConfig::backend_from_str("memory"), StorageBackend::Memory);
        assert_eq!(StorageConfig::backend_from_str("Mongo"), StorageBackend::Mongo);
        assert_eq!(StorageConfig::backend_from_str(""), StorageBackend::Mongo);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            CorsConfig::parse_origins(" http://a.test/, ,http://b.test "),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }
        if env::var("HOST").is_err() {
            assert_eq!(ServerConfig::host(), "0.0.0.0");
        }
    }
}
