//! 사용자 엔티티와 역할 정의

use std::fmt;
use std::str::FromStr;

use mongodb::bson::DateTime;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// 사용자 역할
///
/// 닫힌 열거형으로 표현하며, 권한 판단은 모두 [`Role::permits`]의
/// 완전한 `match`를 거칩니다. 새 역할을 추가하면 판단 로직이
/// 컴파일 에러로 드러납니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// 이 역할이 `required` 역할이 필요한 작업을 수행할 수 있는지 확인
    ///
    /// 관리자는 모든 요구 사항을 만족합니다.
    pub fn permits(&self, required: Role) -> bool {
        match (self, required) {
            (Role::Admin, _) => true,
            (Role::User, Role::User) => true,
            (Role::User, Role::Admin) => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unsupported role: {}", other)),
        }
    }
}

/// `users` 컬렉션 문서
///
/// `email`은 정규화(소문자, 공백 제거)된 값으로 저장되며 유니크 인덱스가
/// 걸려 있습니다. `token_version`은 비밀번호 재설정이나 관리자 세션 폐기 시
/// 증가하며, 이전 버전으로 발급된 모든 토큰을 무효화합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub email: String,

    pub name: String,

    pub password_hash: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub email_verified: bool,

    #[serde(default)]
    pub token_version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,

    pub created_at: DateTime,

    pub updated_at: DateTime,
}

impl User {
    /// 이메일 인증 전 상태의 일반 사용자 생성
    pub fn new_local(email: String, name: String, password_hash: String) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            email,
            name,
            password_hash,
            role: Role::User,
            email_verified: false,
            token_version: 0,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// ObjectId를 16진수 문자열로 반환 (저장 전이면 빈 문자열)
    pub fn id_string(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permits_is_hierarchical() {
        assert!(Role::Admin.permits(Role::Admin));
        assert!(Role::Admin.permits(Role::User));
        assert!(Role::User.permits(Role::User));
        assert!(!Role::User.permits(Role::Admin));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::from_str::<Role>("\"user\"").unwrap(), Role::User);
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("moderator".parse::<Role>().is_err());
    }

    #[test]
    fn test_new_local_user_is_unverified() {
        let user = User::new_local("a@b.com".into(), "A".into(), "hash".into());

        assert_eq!(user.role, Role::User);
        assert!(!user.email_verified);
        assert_eq!(user.token_version, 0);
        assert_eq!(user.id_string(), "");
    }
}
