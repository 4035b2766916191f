//! 명시적 세션 객체
//!
//! 저장된 토큰 쌍과 사용자 정보를 읽고 쓰는 유일한 통로입니다. 앱 시작 시
//! 한 번 만들어 요청 계층에 주입하고, 로그아웃이나 세션 만료 시 [`Session::clear`]로
//! 세 값을 함께 지웁니다.

use std::sync::Arc;

use super::error::{ClientError, ClientResult};
use super::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionStorage, USER_KEY};
use crate::domain::dto::users::{IdentityRecord, LoginResponse};

pub struct Session {
    storage: Arc<dyn SessionStorage>,
}

impl Session {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn access_token(&self) -> ClientResult<Option<String>> {
        self.storage.get_item(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> ClientResult<Option<String>> {
        self.storage.get_item(REFRESH_TOKEN_KEY)
    }

    /// 저장된 사용자 정보. 손상된 값은 없는 것으로 취급
    pub fn user(&self) -> ClientResult<Option<IdentityRecord>> {
        let Some(raw) = self.storage.get_item(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                log::warn!("저장된 사용자 정보를 해석할 수 없습니다: {}", e);
                Ok(None)
            }
        }
    }

    pub fn is_authenticated(&self) -> ClientResult<bool> {
        Ok(self.access_token()?.is_some() && self.user()?.is_some())
    }

    /// 로그인 결과의 세 값을 함께 저장
    pub fn store_login(&self, login: &LoginResponse) -> ClientResult<()> {
        let user = Self::encode_user(&login.user)?;
        self.storage.set_items(&[
            (ACCESS_TOKEN_KEY, &login.access_token),
            (REFRESH_TOKEN_KEY, &login.refresh_token),
            (USER_KEY, &user),
        ])
    }

    /// 갱신된 토큰 저장. 서버가 리프레시 토큰을 회전했으면 함께 교체
    pub fn store_tokens(&self, access_token: &str, refresh_token: Option<&str>) -> ClientResult<()> {
        match refresh_token {
            Some(refresh_token) => self.storage.set_items(&[
                (ACCESS_TOKEN_KEY, access_token),
                (REFRESH_TOKEN_KEY, refresh_token),
            ]),
            None => self.storage.set_items(&[(ACCESS_TOKEN_KEY, access_token)]),
        }
    }

    pub fn store_user(&self, user: &IdentityRecord) -> ClientResult<()> {
        let user = Self::encode_user(user)?;
        self.storage.set_items(&[(USER_KEY, &user)])
    }

    pub fn clear(&self) -> ClientResult<()> {
        self.storage
            .remove_items(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY])
    }

    fn encode_user(user: &IdentityRecord) -> ClientResult<String> {
        serde_json::to_string(user).map_err(|e| ClientError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryStorage;
    use crate::domain::entities::users::Role;

    fn identity() -> IdentityRecord {
        IdentityRecord {
            id: "64b000000000000000000001".into(),
            email: "a@b.com".into(),
            name: "A".into(),
            role: Role::User,
            email_verified: false,
        }
    }

    #[test]
    fn test_store_login_and_clear() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(storage.clone());

        session
            .store_login(&LoginResponse {
                access_token: "T1".into(),
                refresh_token: "R1".into(),
                user: identity(),
            })
            .unwrap();

        assert!(session.is_authenticated().unwrap());
        assert_eq!(session.user().unwrap(), Some(identity()));
        assert!(storage.get_item(USER_KEY).unwrap().unwrap().contains("\"emailVerified\":false"));

        session.clear().unwrap();
        assert_eq!(session.access_token().unwrap(), None);
        assert_eq!(session.refresh_token().unwrap(), None);
        assert_eq!(session.user().unwrap(), None);
    }

    #[test]
    fn test_store_tokens_keeps_refresh_token_when_not_rotated() {
        let session = Session::new(Arc::new(MemoryStorage::new()));
        session.store_tokens("T1", Some("R1")).unwrap();

        session.store_tokens("T2", None).unwrap();
        assert_eq!(session.access_token().unwrap().as_deref(), Some("T2"));
        assert_eq!(session.refresh_token().unwrap().as_deref(), Some("R1"));
    }

    #[test]
    fn test_corrupt_user_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_items(&[(USER_KEY, "{broken")]).unwrap();

        assert_eq!(Session::new(storage).user().unwrap(), None);
    }
}
