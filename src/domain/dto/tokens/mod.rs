//! 토큰 갱신/폐기 DTO

pub mod request;
pub mod response;

pub use request::{LogoutRequest, RefreshTokenRequest};
pub use response::RefreshTokenResponse;
