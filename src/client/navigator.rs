//! 세션 만료 시 화면 전환

/// 로그인 진입점
pub const LOGIN_ROUTE: &str = "/login";

pub trait Navigator: Send + Sync {
    /// 세션이 끝났을 때 로그인 화면으로 강제 이동
    fn redirect_to_login(&self);
}

/// 화면이 없는 환경(CLI)용: 이동 대신 안내를 로그로 남김
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect_to_login(&self) {
        log::warn!("세션이 만료되었습니다. 다시 로그인하세요 ({})", LOGIN_ROUTE);
    }
}
