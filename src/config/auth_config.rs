//! 인증 관련 설정
//!
//! JWT 서명 키와 만료 시간, 이메일 인증/비밀번호 재설정에 쓰이는
//! 일회용 토큰의 유효 기간을 관리합니다.

use std::env;

use chrono::Duration;

use super::{env_or, env_string};

const DEFAULT_JWT_SECRET: &str = "users-auth-dev-secret";

/// JWT 발급/검증에 필요한 값 묶음
///
/// `TokenService`는 이 구조체만 받으므로, 테스트에서는 환경 변수 없이
/// 원하는 TTL(음수 포함)로 직접 생성할 수 있습니다.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// 액세스 토큰 서명 키 (HS256)
    pub secret: String,
    /// 리프레시 토큰 서명 키
    pub refresh_secret: String,
    /// `iss` 클레임
    pub issuer: String,
    /// 액세스 토큰 유효 기간 (기본 15분)
    pub access_ttl: Duration,
    /// 리프레시 토큰 유효 기간 (기본 7일)
    pub refresh_ttl: Duration,
}

impl JwtSettings {
    /// 동일한 키로 두 종류의 토큰을 서명하는 설정
    pub fn with_secret(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        Self {
            refresh_secret: format!("{}:refresh", secret),
            secret,
            issuer: JwtConfig::DEFAULT_ISSUER.to_string(),
            access_ttl: Duration::minutes(JwtConfig::DEFAULT_ACCESS_TTL_MINUTES),
            refresh_ttl: Duration::days(JwtConfig::DEFAULT_REFRESH_TTL_DAYS),
        }
    }
}

/// JWT 설정
pub struct JwtConfig;

impl JwtConfig {
    pub const DEFAULT_ISSUER: &'static str = "users-service";
    pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;
    pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        })
    }

    /// 리프레시 토큰 서명 키 (`JWT_REFRESH_SECRET`, 없으면 액세스 키에서 파생)
    pub fn refresh_secret(access_secret: &str) -> String {
        env::var("JWT_REFRESH_SECRET").unwrap_or_else(|_| format!("{}:refresh", access_secret))
    }

    pub fn access_ttl_minutes() -> i64 {
        env_or("JWT_ACCESS_TTL_MINUTES", Self::DEFAULT_ACCESS_TTL_MINUTES)
    }

    pub fn refresh_ttl_days() -> i64 {
        env_or("JWT_REFRESH_TTL_DAYS", Self::DEFAULT_REFRESH_TTL_DAYS)
    }

    pub fn settings() -> JwtSettings {
        let secret = Self::secret();
        JwtSettings {
            refresh_secret: Self::refresh_secret(&secret),
            secret,
            issuer: env_string("JWT_ISSUER", Self::DEFAULT_ISSUER),
            access_ttl: Duration::minutes(Self::access_ttl_minutes()),
            refresh_ttl: Duration::days(Self::refresh_ttl_days()),
        }
    }
}

/// 일회용 토큰(이메일 인증, 비밀번호 재설정) 유효 기간
#[derive(Debug, Clone)]
pub struct SingleUseSettings {
    pub email_verification_ttl: Duration,
    pub password_reset_ttl: Duration,
    /// 만료 후에도 레코드를 보관하는 기간.
    /// 이 기간 안의 토큰은 "만료됨"으로, 이후는 "알 수 없음"으로 응답합니다.
    pub expired_retention: Duration,
}

impl Default for SingleUseSettings {
    fn default() -> Self {
        Self {
            email_verification_ttl: Duration::hours(24),
            password_reset_ttl: Duration::hours(1),
            expired_retention: Duration::hours(24),
        }
    }
}

pub struct SingleUseTokenConfig;

impl SingleUseTokenConfig {
    pub fn settings() -> SingleUseSettings {
        let defaults = SingleUseSettings::default();
        SingleUseSettings {
            email_verification_ttl: Duration::hours(env_or(
                "EMAIL_VERIFICATION_TTL_HOURS",
                defaults.email_verification_ttl.num_hours(),
            )),
            password_reset_ttl: Duration::minutes(env_or(
                "PASSWORD_RESET_TTL_MINUTES",
                defaults.password_reset_ttl.num_minutes(),
            )),
            expired_retention: defaults.expired_retention,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_settings_defaults() {
        let settings = JwtSettings::with_secret("s3cret");

        assert_eq!(settings.access_ttl, Duration::minutes(15));
        assert_eq!(settings.refresh_ttl, Duration::days(7));
        assert_ne!(settings.secret, settings.refresh_secret);
        assert_eq!(settings.issuer, "users-service");
    }

    #[test]
    fn test_single_use_defaults() {
        let settings = SingleUseSettings::default();

        assert_eq!(settings.email_verification_ttl, Duration::hours(24));
        assert_eq!(settings.password_reset_ttl, Duration::hours(1));
    }
}
