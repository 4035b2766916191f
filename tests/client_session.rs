//! 클라이언트 세션 매니저 종단 간 테스트
//!
//! 실제 `HttpServer`를 임의 포트에 띄우고 `ReqwestTransport`로 호출합니다.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use mongodb::bson::oid::ObjectId;

use users_auth_service::client::{
    AuthClient, ClientError, MemoryStorage, Navigator, ReqwestTransport, Session, SessionManager,
    SessionStatus,
};
use users_auth_service::config::JwtSettings;
use users_auth_service::domain::dto::users::{LoginRequest, LoginResponse, RegisterRequest};
use users_auth_service::domain::entities::users::{Role, User};
use users_auth_service::repositories::{MemoryTokenRepository, MemoryUserRepository};
use users_auth_service::routes::configure_all_routes;
use users_auth_service::services::auth::{AuthService, AuthSettings, TokenService};
use users_auth_service::services::mail::MemoryMailer;

const SECRET: &str = "client-session-secret";

#[derive(Default)]
struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    server: ServerHandle,
    client: AuthClient,
    storage: Arc<MemoryStorage>,
    navigator: Arc<RecordingNavigator>,
    base_url: String,
}

async fn start() -> Harness {
    let data = web::Data::new(AuthService::new(
        Arc::new(MemoryUserRepository::new()),
        Arc::new(MemoryTokenRepository::new()),
        Arc::new(MemoryMailer::new()),
        AuthSettings::with_jwt(JwtSettings::with_secret(SECRET)),
    ));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(configure_all_routes)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let address = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let base_url = format!("http://{}/api/v1/users", address);
    let storage = Arc::new(MemoryStorage::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let client = client_for(&base_url, storage.clone(), navigator.clone());

    Harness {
        server: handle,
        client,
        storage,
        navigator,
        base_url,
    }
}

fn client_for(base_url: &str, storage: Arc<MemoryStorage>, navigator: Arc<RecordingNavigator>) -> AuthClient {
    let transport = Arc::new(ReqwestTransport::new(base_url, Duration::from_secs(5)).unwrap());
    let session = Arc::new(Session::new(storage));
    AuthClient::new(Arc::new(SessionManager::new(transport, session, navigator)))
}

async fn register_and_login(client: &AuthClient) -> LoginResponse {
    client
        .register(&RegisterRequest {
            email: "a@b.com".into(),
            password: "secret".into(),
            name: None,
        })
        .await
        .unwrap();
    client
        .login(&LoginRequest {
            email: "a@b.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap()
}

/// 같은 사용자에 대해 이미 만료된 액세스 토큰을 발급
fn expired_access_token(login: &LoginResponse) -> String {
    let mut settings = JwtSettings::with_secret(SECRET);
    settings.access_ttl = chrono::Duration::seconds(-60);

    let mut user = User::new_local(login.user.email.clone(), login.user.name.clone(), String::new());
    user.id = Some(ObjectId::parse_str(&login.user.id).unwrap());

    TokenService::new(settings).issue_access_token(&user).unwrap().token
}

#[actix_web::test]
async fn expired_access_token_is_refreshed_transparently() {
    let h = start().await;

    let login = register_and_login(&h.client).await;
    assert_eq!(login.user.email, "a@b.com");
    assert_eq!(login.user.role, Role::User);

    let t1 = expired_access_token(&login);
    h.client.session().store_tokens(&t1, None).unwrap();

    let profile = h.client.profile().await.unwrap();
    assert_eq!(profile.email, "a@b.com");

    let t2 = h.client.session().access_token().unwrap().unwrap();
    let r2 = h.client.session().refresh_token().unwrap().unwrap();
    assert_ne!(t2, t1);
    assert_ne!(r2, login.refresh_token);
    assert_eq!(h.navigator.redirects.load(Ordering::SeqCst), 0);

    h.server.stop(true).await;
}

#[actix_web::test]
async fn failed_refresh_clears_session_and_redirects() {
    let h = start().await;

    let login = register_and_login(&h.client).await;
    let t1 = expired_access_token(&login);
    h.client.session().store_tokens(&t1, Some("not-a-refresh-token")).unwrap();

    let error = h.client.profile().await.unwrap_err();

    assert!(matches!(error, ClientError::SessionExpired));
    assert_eq!(h.navigator.redirects.load(Ordering::SeqCst), 1);
    assert_eq!(h.client.session().access_token().unwrap(), None);
    assert_eq!(h.client.session().refresh_token().unwrap(), None);
    assert_eq!(h.client.session().user().unwrap(), None);

    h.server.stop(true).await;
}

#[actix_web::test]
async fn restored_session_is_revalidated() {
    let h = start().await;
    register_and_login(&h.client).await;

    let restarted = client_for(&h.base_url, h.storage.clone(), h.navigator.clone());
    let (status, revalidation) = restarted.manager().init().unwrap();
    assert!(matches!(status, SessionStatus::Authenticated(ref user) if user.email == "a@b.com"));

    let revalidated = revalidation.await.unwrap().unwrap();
    assert!(matches!(revalidated, SessionStatus::Authenticated(_)));

    h.server.stop(true).await;
}

#[actix_web::test]
async fn logout_clears_local_session_and_revokes_refresh_token() {
    let h = start().await;
    let login = register_and_login(&h.client).await;

    h.client.logout().await.unwrap();
    assert_eq!(h.client.session().access_token().unwrap(), None);
    assert!(!h.client.session().is_authenticated().unwrap());

    h.client
        .session()
        .store_tokens(&expired_access_token(&login), Some(&login.refresh_token))
        .unwrap();
    assert!(matches!(h.client.profile().await, Err(ClientError::SessionExpired)));

    h.server.stop(true).await;
}

#[actix_web::test]
async fn public_errors_are_propagated() {
    let h = start().await;

    let error = h
        .client
        .login(&LoginRequest {
            email: "ghost@b.com".into(),
            password: "secret".into(),
        })
        .await
        .unwrap_err();

    assert!(error.is_unauthorized());
    assert_eq!(error.to_string(), "Invalid email or password (HTTP 401)");
    assert_eq!(h.navigator.redirects.load(Ordering::SeqCst), 0);

    h.server.stop(true).await;
}
