//! JWT 클레임과 서버 측 토큰 레코드
//!
//! - [`AccessClaims`] / [`RefreshClaims`]: 서명된 JWT 페이로드
//! - [`RefreshSession`]: Redis에 저장되는 리프레시 토큰 세션 (jti 단위)
//! - [`SingleUseRecord`]: 이메일 인증/비밀번호 재설정 일회용 토큰 레코드

use serde::{Deserialize, Serialize};

use crate::domain::entities::users::Role;

/// 토큰 종류 (`typ` 클레임)
///
/// 두 토큰이 서로 다른 용도로 재사용되지 않도록 검증 시 반드시 확인합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// 액세스 토큰 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// 사용자 ID (ObjectId hex)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// 발급 시점의 사용자 `token_version`
    pub ver: i64,
    pub typ: TokenKind,
    /// 토큰 고유 ID (로그아웃 시 블랙리스트 키)
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// 리프레시 토큰 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    /// 로그인 단위 세션 ID (회전 시에도 유지)
    pub sid: String,
    pub ver: i64,
    pub typ: TokenKind,
    /// 발급 단위 ID (회전마다 새로 생성, 저장소 키)
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// 서명된 토큰과 그 클레임
#[derive(Debug, Clone)]
pub struct IssuedToken<C> {
    pub token: String,
    pub claims: C,
}

/// 액세스/리프레시 토큰 쌍
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// 활성 리프레시 토큰 레코드
///
/// 키는 리프레시 토큰의 `jti`입니다. 한 번 소비(take)되면 사라지므로
/// 같은 리프레시 토큰으로 두 번 갱신할 수 없습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSession {
    pub user_id: String,
    pub session_id: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// 일회용 토큰의 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleUsePurpose {
    EmailVerification,
    PasswordReset,
}

impl SingleUsePurpose {
    /// 저장소 키 접두사
    pub fn key_prefix(&self) -> &'static str {
        match self {
            SingleUsePurpose::EmailVerification => "email_verification",
            SingleUsePurpose::PasswordReset => "password_reset",
        }
    }
}

/// 일회용 토큰 레코드
///
/// 원문 토큰은 메일로만 전달되고, 저장소에는 SHA-256 해시를 키로 이
/// 레코드만 남습니다. 만료 후에도 보관 기간 동안은 레코드가 남아 있어
/// "만료"와 "알 수 없음"을 구분할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleUseRecord {
    pub user_id: String,
    pub email: String,
    pub purpose: SingleUsePurpose,
    pub expires_at: i64,
}

impl SingleUseRecord {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_serialization() {
        assert_eq!(serde_json::to_string(&TokenKind::Refresh).unwrap(), "\"refresh\"");
    }

    #[test]
    fn test_single_use_record_expiry() {
        let record = SingleUseRecord {
            user_id: "u1".into(),
            email: "a@b.com".into(),
            purpose: SingleUsePurpose::PasswordReset,
            expires_at: 100,
        };

        assert!(!record.is_expired(99));
        assert!(record.is_expired(100));
        assert_eq!(record.purpose.key_prefix(), "password_reset");
    }
}
