//! 회원가입, 로그인, 비밀번호 재설정 요청 DTO
//!
//! 모든 요청 본문은 camelCase JSON이며, 핸들러는 서비스 호출 전에
//! `validate()`로 형식을 검사합니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 회원가입 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be between 6 and 128 characters"
    ))]
    #[validate(custom(function = "validate_password_not_blank"))]
    pub password: String,

    /// 표시 이름 (생략 시 이메일 로컬 파트 사용)
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
}

/// 로그인 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// 비밀번호 재설정 메일 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

/// 인증 메일 재발송 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResendVerificationRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

/// 비밀번호 재설정 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    #[serde(alias = "password")]
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be between 6 and 128 characters"
    ))]
    #[validate(custom(function = "validate_password_not_blank"))]
    pub new_password: String,
}

fn validate_password_not_blank(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::new("blank_password")
            .with_message("Password must not be blank".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_accepts_minimal_body() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"secret"}"#).unwrap();

        assert!(request.validate().is_ok());
        assert!(request.name.is_none());
    }

    #[test]
    fn test_register_request_rejects_bad_input() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            name: Some(String::new()),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn test_blank_password_is_rejected() {
        let request = RegisterRequest {
            email: "a@b.com".to_string(),
            password: "        ".to_string(),
            name: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_reset_password_request_uses_camel_case() {
        let request: ResetPasswordRequest =
            serde_json::from_str(r#"{"token":"abc","newPassword":"n3w-pass"}"#).unwrap();
        assert_eq!(request.new_password, "n3w-pass");
        assert!(request.validate().is_ok());

        let aliased: ResetPasswordRequest =
            serde_json::from_str(r#"{"token":"abc","password":"n3w-pass"}"#).unwrap();
        assert_eq!(aliased.new_password, "n3w-pass");
    }
}
