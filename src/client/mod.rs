//! 클라이언트 세션 매니저
//!
//! 인증 API를 호출하는 쪽(CLI, 다른 서비스)이 토큰 쌍을 보관하고, 액세스
//! 토큰 만료를 투명하게 처리하도록 돕습니다.
//!
//! ```text
//! AuthClient ──▶ SessionManager ──▶ Transport (reqwest)
//!                     │
//!                     ├──▶ Session ──▶ SessionStorage (memory | file)
//!                     └──▶ Navigator (세션 만료 시 로그인 화면으로)
//! ```
//!
//! - 모든 요청에 저장된 액세스 토큰을 `Authorization: Bearer`로 붙입니다.
//! - 401을 받으면 리프레시 토큰으로 한 번 갱신하고 원래 요청을 한 번만
//!   재시도합니다. 재시도 횟수는 요청별 [`RequestContext`]가 들고 있습니다.
//! - 갱신은 한 번에 하나만 진행되며, 기다리던 요청은 새 토큰으로 바로
//!   재시도합니다.
//! - 갱신이 실패하면 세션을 지우고 [`LOGIN_ROUTE`]로 보냅니다.
//! - 타임아웃은 일반 실패로 전달되며 갱신을 일으키지 않습니다.

pub mod api;
pub mod context;
pub mod error;
pub mod manager;
pub mod navigator;
pub mod session;
pub mod storage;
pub mod transport;

pub use api::AuthClient;
pub use context::{MAX_RETRIES, RequestContext};
pub use error::{ClientError, ClientResult};
pub use manager::{SessionManager, SessionStatus};
pub use navigator::{LOGIN_ROUTE, LogNavigator, Navigator};
pub use session::Session;
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
