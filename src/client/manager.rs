//! 세션 매니저
//!
//! 모든 인증 요청이 지나가는 단일 경로입니다.
//!
//! ```text
//! send(request)
//!   ├─ 2xx / 401 이외          → 그대로 반환
//!   ├─ 401 + 재시도 가능       → refresh ─┬─ 성공 → 새 토큰으로 한 번 재시도
//!   │                                     └─ 실패 → 세션 삭제 + 로그인 화면, SessionExpired
//!   └─ 401 + 재시도 소진       → 에러 반환 (루프 없음)
//! ```

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::context::RequestContext;
use super::error::{ClientError, ClientResult};
use super::navigator::Navigator;
use super::session::Session;
use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::domain::dto::users::{IdentityRecord, VerifyTokenResponse};

pub const REFRESH_TOKEN_PATH: &str = "/refresh-token";
pub const VERIFY_TOKEN_PATH: &str = "/verify-token";

/// 앱 시작 시 판단한 세션 상태
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Anonymous,
    Authenticated(IdentityRecord),
}

/// `/refresh-token` 응답. 회전하지 않는 서버는 `refreshToken`을 생략할 수 있음
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshedTokens {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

pub struct SessionManager {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
    refresh_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<Session>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            transport,
            session,
            navigator,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// 저장된 액세스 토큰을 붙여 요청을 보냄
    ///
    /// 401이면 한 번 갱신 후 재시도합니다. 성공 응답이 아니면 `ClientError::Http`.
    pub async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        let mut context = RequestContext::initial();

        loop {
            let access_token = self.session.access_token()?;
            let response = self.transport.send(&request, access_token.as_deref()).await?;

            if !response.is_unauthorized() || !request.refresh_on_unauthorized || !context.can_retry() {
                return response.into_result();
            }
            if self.session.refresh_token()?.is_none() {
                return response.into_result();
            }

            log::info!("🔄 401 수신, 토큰 갱신 시도: {} {}", request.method, request.path);
            self.refresh_access_token(access_token.as_deref()).await?;

            context = context.next_attempt();
        }
    }

    /// 앱 시작 시 저장된 값만으로 낙관적으로 상태를 복원
    pub fn restore(&self) -> ClientResult<SessionStatus> {
        if self.session.access_token()?.is_none() {
            return Ok(SessionStatus::Anonymous);
        }
        Ok(match self.session.user()? {
            Some(user) => SessionStatus::Authenticated(user),
            None => SessionStatus::Anonymous,
        })
    }

    /// 서버에 토큰을 확인하고 저장된 사용자 정보를 갱신
    ///
    /// 서버가 거부하면 세션을 지웁니다. 네트워크 오류나 타임아웃은 상태를
    /// 유지한 채 에러로 돌려줍니다.
    pub async fn revalidate(&self) -> ClientResult<SessionStatus> {
        if self.session.access_token()?.is_none() {
            return Ok(SessionStatus::Anonymous);
        }

        let verified = self
            .send(ApiRequest::get(VERIFY_TOKEN_PATH))
            .await
            .and_then(|response| response.json::<VerifyTokenResponse>());

        match verified {
            Ok(verified) if verified.valid => {
                self.session.store_user(&verified.user)?;
                Ok(SessionStatus::Authenticated(verified.user))
            }
            Ok(_) | Err(ClientError::Http { .. }) | Err(ClientError::Decode(_)) => {
                log::warn!("저장된 세션이 유효하지 않아 삭제합니다");
                self.session.clear()?;
                Ok(SessionStatus::Anonymous)
            }
            Err(ClientError::SessionExpired) => Ok(SessionStatus::Anonymous),
            Err(e) => Err(e),
        }
    }

    /// 낙관적 복원 후 백그라운드에서 재검증을 시작
    pub fn init(self: &Arc<Self>) -> ClientResult<(SessionStatus, JoinHandle<ClientResult<SessionStatus>>)> {
        let status = self.restore()?;
        let manager = Arc::clone(self);
        let revalidation = tokio::spawn(async move { manager.revalidate().await });
        Ok((status, revalidation))
    }

    /// 한 번에 하나의 갱신만 수행
    ///
    /// 락을 기다리는 동안 다른 요청이 이미 토큰을 바꿨다면 다시 갱신하지 않고,
    /// 이미 세션이 종료됐다면 다시 리다이렉트하지 않습니다. 갱신이 실패하면
    /// 락을 쥔 채로 세션을 종료합니다.
    async fn refresh_access_token(&self, stale_access_token: Option<&str>) -> ClientResult<()> {
        let _guard = self.refresh_lock.lock().await;

        match self.session.access_token()? {
            Some(current) if Some(current.as_str()) != stale_access_token => {
                log::debug!("다른 요청이 이미 토큰을 갱신했습니다");
                return Ok(());
            }
            None if stale_access_token.is_some() => {
                log::debug!("다른 요청이 이미 세션을 종료했습니다");
                return Err(ClientError::SessionExpired);
            }
            _ => {}
        }

        if let Err(e) = self.request_new_tokens().await {
            log::error!("❌ 토큰 갱신 실패: {}", e);
            self.terminate();
            return Err(ClientError::SessionExpired);
        }
        Ok(())
    }

    async fn request_new_tokens(&self) -> ClientResult<()> {
        let refresh_token = self.session.refresh_token()?.ok_or(ClientError::SessionExpired)?;
        let request = ApiRequest::post(REFRESH_TOKEN_PATH, json!({ "refreshToken": refresh_token })).without_refresh();
        let tokens: RefreshedTokens = self.transport.send(&request, None).await?.into_result()?.json()?;

        self.session
            .store_tokens(&tokens.access_token, tokens.refresh_token.as_deref())?;
        log::info!("✅ 토큰 갱신 완료");
        Ok(())
    }

    /// 세션 종료: 저장된 세 값 삭제 후 로그인 화면으로
    fn terminate(&self) {
        if let Err(e) = self.session.clear() {
            log::error!("세션 삭제 실패: {}", e);
        }
        self.navigator.redirect_to_login();
    }
}
