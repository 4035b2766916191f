//! HTTP 전송 계층
//!
//! [`Transport`]는 요청 한 번을 보내고 상태 코드와 JSON 본문을 돌려줄 뿐,
//! 토큰 갱신이나 재시도는 하지 않습니다. 그 판단은 `SessionManager`의 몫입니다.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ClientError, ClientResult};
use crate::config::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// 기본 주소 기준 상대 경로로 표현한 API 요청
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    /// 401을 받았을 때 토큰 갱신 후 재시도할지 여부
    pub refresh_on_unauthorized: bool,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            refresh_on_unauthorized: true,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            refresh_on_unauthorized: true,
        }
    }

    /// 공개 엔드포인트용: 401이어도 갱신하지 않음
    pub fn without_refresh(mut self) -> Self {
        self.refresh_on_unauthorized = false;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// 2xx가 아니면 에러 본문(`{error, message}`)을 `ClientError::Http`로 변환
    pub fn into_result(self) -> ClientResult<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let code = self.body.get("error").and_then(Value::as_str).map(str::to_string);
        let message = self
            .body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", self.status));

        Err(ClientError::Http {
            status: self.status,
            code,
            message,
        })
    }

    pub fn json<T: DeserializeOwned>(self) -> ClientResult<T> {
        serde_json::from_value(self.body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest, access_token: Option<&str>) -> ClientResult<ApiResponse>;
}

/// `reqwest` 기반 전송 계층 (고정 타임아웃)
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `AUTH_API_URL`과 기본 타임아웃으로 생성
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::api_base_url(), ClientConfig::REQUEST_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn map_reqwest_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Transport(error.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest, access_token: Option<&str>) -> ClientResult<ApiResponse> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(token) = access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        log::debug!("🚀 API Request: {} {}", request.method, request.path);
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(map_reqwest_error)?;
        log::debug!("API Response: {} {} -> {}", request.method, request.path, status);

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_becomes_http_error() {
        let response = ApiResponse::new(
            401,
            json!({"success": false, "error": "AUTHENTICATION_ERROR", "message": "Access token has expired"}),
        );

        match response.into_result() {
            Err(ClientError::Http { status, code, message }) => {
                assert_eq!(status, 401);
                assert_eq!(code.as_deref(), Some("AUTHENTICATION_ERROR"));
                assert_eq!(message, "Access token has expired");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_error_without_body_has_fallback_message() {
        let error = ApiResponse::new(502, Value::Null).into_result().unwrap_err();
        assert_eq!(error.to_string(), "Request failed with status 502 (HTTP 502)");
    }

    #[test]
    fn test_url_joining() {
        let transport = ReqwestTransport::new("http://localhost:8080/api/v1/users/", Duration::from_secs(1)).unwrap();

        assert_eq!(transport.url("/login"), "http://localhost:8080/api/v1/users/login");
        assert_eq!(transport.url("profile"), "http://localhost:8080/api/v1/users/profile");
    }

    #[test]
    fn test_public_requests_skip_refresh() {
        assert!(ApiRequest::get("/profile").refresh_on_unauthorized);
        assert!(!ApiRequest::post("/login", json!({})).without_refresh().refresh_on_unauthorized);
    }
}
