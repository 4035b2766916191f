//! 사용자 인증 응답 DTO

use serde::{Deserialize, Serialize};

use crate::domain::entities::users::{Role, User};

/// 클라이언트에 노출되는 사용자 공개 정보
///
/// 로그인, 토큰 검증, 프로필 응답에 포함되며 클라이언트 세션 매니저가
/// 그대로 로컬 저장소에 캐시합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub email_verified: bool,
}

impl IdentityRecord {
    /// 정확히 해당 역할인지 확인
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    pub fn is_email_verified(&self) -> bool {
        self.email_verified
    }
}

impl From<&User> for IdentityRecord {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            email_verified: user.email_verified,
        }
    }
}

impl From<User> for IdentityRecord {
    fn from(user: User) -> Self {
        IdentityRecord::from(&user)
    }
}

/// `POST /login` 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: IdentityRecord,
}

/// `GET /verify-token` 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub user: IdentityRecord,
}

/// `GET /profile` 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: IdentityRecord,
}

/// `{success, message}` 형태의 공통 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// `{success}` 형태의 공통 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_identity_record_from_user() {
        let mut user = User::new_local("a@b.com".into(), "Alice".into(), "hash".into());
        let id = ObjectId::new();
        user.id = Some(id);

        let record = IdentityRecord::from(&user);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], id.to_hex());
        assert_eq!(json["role"], "user");
        assert_eq!(json["emailVerified"], false);
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_identity_record_role_helpers() {
        let record = IdentityRecord {
            id: "1".into(),
            email: "root@b.com".into(),
            name: "Root".into(),
            role: Role::Admin,
            email_verified: true,
        };

        assert!(record.is_admin());
        assert!(record.has_role(Role::Admin));
        assert!(!record.has_role(Role::User));
        assert!(record.is_email_verified());
    }
}
