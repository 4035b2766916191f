//! 인증 API 클라이언트
//!
//! 각 엔드포인트를 타입이 있는 메서드로 감쌉니다. 공개 엔드포인트는 401을
//! 받아도 토큰을 갱신하지 않습니다.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::error::{ClientError, ClientResult};
use super::manager::{SessionManager, VERIFY_TOKEN_PATH};
use super::navigator::LogNavigator;
use super::session::Session;
use super::storage::SessionStorage;
use super::transport::{ApiRequest, ReqwestTransport};
use crate::domain::dto::users::{
    IdentityRecord, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    RegisterRequest, VerifyTokenResponse,
};

pub struct AuthClient {
    manager: Arc<SessionManager>,
}

impl AuthClient {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }

    /// `AUTH_API_URL`의 서버와 주어진 저장소로 생성 (CLI용)
    pub fn from_env(storage: Arc<dyn SessionStorage>) -> ClientResult<Self> {
        let transport = Arc::new(ReqwestTransport::from_env()?);
        let session = Arc::new(Session::new(storage));
        Ok(Self::new(Arc::new(SessionManager::new(
            transport,
            session,
            Arc::new(LogNavigator),
        ))))
    }

    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    pub fn session(&self) -> &Arc<Session> {
        self.manager.session()
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<MessageResponse> {
        self.call(ApiRequest::post("/register", to_body(request)?).without_refresh())
            .await
    }

    /// 로그인 후 토큰 쌍과 사용자 정보를 함께 저장
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let login: LoginResponse = self
            .call(ApiRequest::post("/login", to_body(request)?).without_refresh())
            .await?;
        self.session().store_login(&login)?;
        log::info!("로그인 성공: {}", login.user.email);
        Ok(login)
    }

    /// 서버 로그아웃은 최선을 다해 시도하고, 로컬 세션은 항상 지움
    pub async fn logout(&self) -> ClientResult<()> {
        let refresh_token = self.session().refresh_token()?;
        let request = ApiRequest::post("/logout", json!({ "refreshToken": refresh_token })).without_refresh();

        if let Err(e) = self.manager.send(request).await {
            log::warn!("서버 로그아웃 실패 (로컬 세션은 삭제): {}", e);
        }
        self.session().clear()
    }

    pub async fn verify_email(&self, token: &str) -> ClientResult<MessageResponse> {
        let path = format!("/verify-email/{}", urlencoding::encode(token.trim()));
        self.call(ApiRequest::get(path).without_refresh()).await
    }

    pub async fn resend_verification(&self, email: &str) -> ClientResult<MessageResponse> {
        self.call(ApiRequest::post("/resend-verification", json!({ "email": email })).without_refresh())
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<MessageResponse> {
        self.call(ApiRequest::post("/forgot-password", json!({ "email": email })).without_refresh())
            .await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> ClientResult<MessageResponse> {
        let body = json!({ "token": token, "newPassword": new_password });
        self.call(ApiRequest::post("/reset-password", body).without_refresh())
            .await
    }

    /// 최신 프로필을 받아 저장된 사용자 정보도 갱신
    pub async fn profile(&self) -> ClientResult<IdentityRecord> {
        let profile: ProfileResponse = self.call(ApiRequest::get("/profile")).await?;
        self.session().store_user(&profile.user)?;
        Ok(profile.user)
    }

    pub async fn verify_token(&self) -> ClientResult<VerifyTokenResponse> {
        self.call(ApiRequest::get(VERIFY_TOKEN_PATH)).await
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        self.manager.send(request).await?.json()
    }
}

fn to_body<T: Serialize>(request: &T) -> ClientResult<Value> {
    serde_json::to_value(request).map_err(|e| ClientError::Decode(e.to_string()))
}
