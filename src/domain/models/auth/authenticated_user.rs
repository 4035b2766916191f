use std::future::{Ready, ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::domain::entities::users::Role;
use crate::domain::models::token::AccessClaims;

/// 검증된 액세스 토큰에서 추출한 요청 주체
///
/// `AuthMiddleware`가 Request Extensions에 넣어 두며, 핸들러는 추출자로
/// 받아 씁니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    /// 토큰 발급 시점의 `token_version`
    pub token_version: i64,
    /// 액세스 토큰 `jti`
    pub token_id: String,
    /// 액세스 토큰 만료 시각 (unix seconds)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.role.permits(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

impl From<AccessClaims> for AuthenticatedUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            token_version: claims.ver,
            token_id: claims.jti,
            expires_at: claims.exp,
        }
    }
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(crate::errors::AppError::AuthenticationError(
                "Authentication required".to_string(),
            )
            .into())),
        }
    }
}

/// 선택적 인증 사용자 추출자
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}
