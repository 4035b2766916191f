//! 사용자 인증 서비스 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동하고 모든 서비스를 초기화합니다.
//! 저장소(MongoDB + Redis 또는 메모리)와 메일러를 고른 뒤 `AuthService`를
//! 만들어 모든 워커에 공유합니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use users_auth_service::caching::redis::RedisClient;
use users_auth_service::config::{
    CorsConfig, Environment, MailConfig, RateLimitConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
use users_auth_service::db::Database;
use users_auth_service::repositories::{
    MemoryTokenRepository, MemoryUserRepository, MongoUserRepository, RedisTokenRepository,
    TokenStore, UserStore,
};
use users_auth_service::routes::{configure_routes, login_rate_limit};
use users_auth_service::services::auth::{AuthService, AuthSettings};
use users_auth_service::services::mail::{Mailer, MemoryMailer, SmtpMailer};

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 사용자 인증 서비스 시작중... (환경: {:?})", Environment::current());

    let auth_service = web::Data::new(build_auth_service().await?);

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(auth_service).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
async fn start_http_server(auth_service: web::Data<AuthService>) -> io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 API: http://{}/api/v1/users", bind_address);

    let rate_limit_config = RateLimitConfig::load();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    let login_limit = login_rate_limit(&rate_limit_config)
        .ok_or_else(|| io::Error::other("로그인 Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second, rate_limit_config.burst_size
    );
    info!(
        "🔐 로그인 Rate Limiting: {}초마다 1회 충전, 버스트 {}회",
        rate_limit_config.login_seconds_per_request, rate_limit_config.login_burst_size
    );

    let allowed_origins = CorsConfig::allowed_origins();
    info!("CORS 허용 Origin: {:?}", allowed_origins);

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(auth_service.clone())
            .configure(|cfg| configure_routes(cfg, Some(&login_limit)))
    })
    .bind(bind_address)?
    .workers(ServerConfig::workers())
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// ```bash
/// RUST_LOG=debug cargo run
/// RUST_LOG=users_auth_service::services=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// 저장소와 메일러를 고르고 `AuthService`를 생성합니다
async fn build_auth_service() -> io::Result<AuthService> {
    let (users, tokens) = initialize_data_stores().await?;
    let mailer = initialize_mailer()?;

    Ok(AuthService::new(users, tokens, mailer, AuthSettings::from_env()))
}

/// `STORAGE_BACKEND`에 따라 사용자/토큰 저장소를 초기화합니다
async fn initialize_data_stores() -> io::Result<(Arc<dyn UserStore>, Arc<dyn TokenStore>)> {
    match StorageConfig::backend() {
        StorageBackend::Memory => {
            warn!("⚠️ 메모리 저장소를 사용합니다. 재시작하면 모든 계정과 세션이 사라집니다");
            Ok((
                Arc::new(MemoryUserRepository::new()),
                Arc::new(MemoryTokenRepository::new()),
            ))
        }
        StorageBackend::Mongo => {
            info!("📡 데이터베이스 연결 중...");

            let database = Database::new(&StorageConfig::mongodb_uri(), &StorageConfig::database_name())
                .await
                .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;
            let users = MongoUserRepository::new(&database)
                .await
                .map_err(|e| io::Error::other(format!("사용자 저장소 초기화 실패: {}", e)))?;

            let redis_client = RedisClient::new(&StorageConfig::redis_url())
                .await
                .map_err(|e| io::Error::other(format!("Redis 연결 실패: {}", e)))?;

            Ok((
                Arc::new(users),
                Arc::new(RedisTokenRepository::new(redis_client)),
            ))
        }
    }
}

/// SMTP 설정이 있으면 SMTP 메일러, 없으면 메모리 메일러
fn initialize_mailer() -> io::Result<Arc<dyn Mailer>> {
    match MailConfig::smtp() {
        Some(settings) => {
            let mailer = SmtpMailer::new(&settings)
                .map_err(|e| io::Error::other(format!("SMTP 초기화 실패: {}", e)))?;
            info!("📧 SMTP 메일러 사용: {}:{}", settings.host, settings.port);
            Ok(Arc::new(mailer))
        }
        None => {
            warn!("⚠️ SMTP_USER/SMTP_PASS가 없어 메일을 발송하지 않고 로그로만 기록합니다");
            Ok(Arc::new(MemoryMailer::new()))
        }
    }
}

/// CORS 설정을 구성합니다
fn configure_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}
