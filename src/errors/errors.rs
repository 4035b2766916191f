//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다. 모든 에러는 아래 형태의 JSON 본문으로
//! 변환됩니다.
//!
//! ```text
//! { "success": false, "error": "invalid_token", "message": "..." }
//! ```
//!
//! 5xx 계열 에러의 상세 내용은 로그로만 남기고, 클라이언트에는 고정된
//! 일반 메시지만 전달합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn redeem(token: &str) -> Result<(), AppError> {
//!     let record = token_store.take_single_use(purpose, token).await?
//!         .ok_or_else(|| AppError::InvalidTokenError("Link is invalid".to_string()))?;
//!     Ok(())
//! }
//! ```

use actix_web::ResponseError;
use actix_web::http::StatusCode;
use thiserror::Error;

/// 5xx 응답에 사용하는 고정 메시지
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 애플리케이션 전역 에러 타입
///
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("{0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("{0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("{0}")]
    ConflictError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    ///
    /// 잘못된 자격 증명, 만료/폐기/위조된 JWT 모두 이 변형으로 표현됩니다.
    #[error("{0}")]
    AuthenticationError(String),

    /// 권한 부족 에러 (403 Forbidden)
    #[error("{0}")]
    AuthorizationError(String),

    /// 만료된 일회용 토큰 (410 Gone)
    #[error("{0}")]
    ExpiredTokenError(String),

    /// 알 수 없거나 이미 사용된 일회용 토큰 (400 Bad Request)
    #[error("{0}")]
    InvalidTokenError(String),

    /// 외부 서비스 에러 (500 Internal Server Error)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 응답 본문의 `error` 필드에 들어가는 기계 판독용 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_)
            | AppError::RedisError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_) => "internal_error",
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::ConflictError(_) => "conflict",
            AppError::AuthenticationError(_) => "authentication_error",
            AppError::AuthorizationError(_) => "insufficient_permissions",
            AppError::ExpiredTokenError(_) => "expired_token",
            AppError::InvalidTokenError(_) => "invalid_token",
        }
    }

    /// 클라이언트에게 노출해도 되는 메시지
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidTokenError(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::ExpiredTokenError(_) => StatusCode::GONE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 서버 측 에러는 이 시점에서 상세 내용을 로그로 남깁니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("요청 처리 중 내부 에러 발생: {}", self);
        }

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": self.code(),
            "message": self.public_message(),
        }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(crate::utils::string_utils::format_validation_errors(&errors))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(error: mongodb::error::Error) -> Self {
        AppError::DatabaseError(error.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(error: redis::RedisError) -> Self {
        AppError::RedisError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    fn body_json(error: &AppError) -> serde_json::Value {
        let bytes = error
            .error_response()
            .into_body()
            .try_into_bytes()
            .expect("in-memory body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("Email is required".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::AuthenticationError("Invalid token".to_string());
        assert_eq!(error.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_single_use_token_error_responses() {
        let expired = AppError::ExpiredTokenError("expired".to_string());
        let invalid = AppError::InvalidTokenError("invalid".to_string());

        assert_eq!(expired.error_response().status(), StatusCode::GONE);
        assert_eq!(invalid.error_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&invalid)["error"], "invalid_token");
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("User not found".to_string());
        assert_eq!(error.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let error = AppError::DatabaseError("connection refused at 10.0.0.3".to_string());
        let body = body_json(&error);

        assert_eq!(error.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_public_message_masks_server_errors() {
        let redis = AppError::RedisError("READONLY replica".to_string());
        let conflict = AppError::ConflictError("Email already taken".to_string());

        assert_eq!(redis.public_message(), INTERNAL_ERROR_MESSAGE);
        assert_eq!(conflict.public_message(), "Email already taken");
    }

    #[test]
    fn test_client_error_message_is_passed_through() {
        let error = AppError::AuthenticationError("Invalid email or password".to_string());
        assert_eq!(body_json(&error)["message"], "Invalid email or password");
    }

    #[test]
    fn test_error_context() {
        let result: Result<(), &str> = Err("boom");
        let error = result.context("직렬화 실패").unwrap_err();
        assert!(matches!(error, AppError::InternalError(msg) if msg == "직렬화 실패: boom"));
    }
}
