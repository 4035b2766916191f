//! 데이터 전송 객체 (Request/Response)

pub mod tokens;
pub mod users;

pub use tokens::{LogoutRequest, RefreshTokenRequest, RefreshTokenResponse};
pub use users::{
    ForgotPasswordRequest, IdentityRecord, LoginRequest, LoginResponse, MessageResponse,
    ProfileResponse, RegisterRequest, ResendVerificationRequest, ResetPasswordRequest,
    SuccessResponse, VerifyTokenResponse,
};

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{LogoutRequest, RefreshTokenResponse};

    #[test]
    fn test_token_dtos_use_camel_case() {
        let response = RefreshTokenResponse {
            access_token: "a".into(),
            refresh_token: "r".into(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"accessToken": "a", "refreshToken": "r"})
        );

        let logout: LogoutRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(logout.refresh_token, None);
    }
}
