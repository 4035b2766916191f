//! 사용자 인증 응답 DTO

pub mod user_response;

pub use user_response::{
    IdentityRecord, LoginResponse, MessageResponse, ProfileResponse, SuccessResponse,
    VerifyTokenResponse,
};
