//! JWT 발급/검증 서비스
//!
//! HS256으로 서명된 액세스/리프레시 토큰을 발급하고 검증합니다.
//! 검증은 만료 여유 시간(leeway) 없이 수행하며, `typ` 클레임으로 두 종류의
//! 토큰이 서로의 자리에 쓰이지 못하도록 막습니다.
//!
//! 이메일 인증/비밀번호 재설정에 쓰이는 일회용 토큰은 JWT가 아닌 불투명한
//! 난수 문자열이며, 저장소에는 [`TokenService::hash_single_use_token`]의
//! 결과만 남깁니다.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::domain::entities::users::User;
use crate::domain::models::token::{AccessClaims, IssuedToken, RefreshClaims, TokenKind};
use crate::errors::{AppError, AppResult};

pub struct TokenService {
    settings: JwtSettings,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl TokenService {
    pub fn new(settings: JwtSettings) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(settings.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(settings.refresh_secret.as_bytes()),
            settings,
        }
    }

    pub fn settings(&self) -> &JwtSettings {
        &self.settings
    }

    /// 액세스 토큰 발급
    ///
    /// 매 발급마다 새 `jti`를 부여하므로 같은 초에 발급된 토큰도 서로 다릅니다.
    pub fn issue_access_token(&self, user: &User) -> AppResult<IssuedToken<AccessClaims>> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: Self::subject(user)?,
            email: user.email.clone(),
            role: user.role,
            ver: user.token_version,
            typ: TokenKind::Access,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.settings.access_ttl).timestamp(),
            iss: self.settings.issuer.clone(),
        };

        let token = Self::sign(&claims, &self.access_encoding)?;
        Ok(IssuedToken { token, claims })
    }

    /// 리프레시 토큰 발급
    ///
    /// `session_id`는 로그인 시 한 번 생성되어 회전 후에도 유지됩니다.
    pub fn issue_refresh_token(&self, user: &User, session_id: &str) -> AppResult<IssuedToken<RefreshClaims>> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: Self::subject(user)?,
            sid: session_id.to_string(),
            ver: user.token_version,
            typ: TokenKind::Refresh,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.settings.refresh_ttl).timestamp(),
            iss: self.settings.issuer.clone(),
        };

        let token = Self::sign(&claims, &self.refresh_encoding)?;
        Ok(IssuedToken { token, claims })
    }

    /// 액세스 토큰 검증
    ///
    /// 서명 불일치, 만료, 형식 오류, 잘못된 종류 모두 `AuthenticationError`입니다.
    pub fn verify_access_token(&self, token: &str) -> AppResult<AccessClaims> {
        let claims: AccessClaims = self.verify(token, &self.access_decoding, "Access token")?;
        if claims.typ != TokenKind::Access {
            return Err(AppError::AuthenticationError("Invalid access token".to_string()));
        }
        Ok(claims)
    }

    /// 리프레시 토큰 검증 (서명, 만료, 종류). 폐기 여부는 저장소에서 확인합니다.
    pub fn verify_refresh_token(&self, token: &str) -> AppResult<RefreshClaims> {
        let claims: RefreshClaims = self.verify(token, &self.refresh_decoding, "Refresh token")?;
        if claims.typ != TokenKind::Refresh {
            return Err(AppError::AuthenticationError("Invalid refresh token".to_string()));
        }
        Ok(claims)
    }

    /// `Authorization: Bearer <token>` 헤더에서 토큰 부분을 추출
    pub fn extract_bearer_token(auth_header: &str) -> AppResult<&str> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(AppError::AuthenticationError(
                "Invalid authorization header format".to_string(),
            )),
        }
    }

    /// 일회용 토큰 생성: (메일로 보낼 원문, 저장할 해시)
    pub fn generate_single_use_token() -> (String, String) {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let hash = Self::hash_single_use_token(&token);
        (token, hash)
    }

    pub fn hash_single_use_token(token: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(token.trim().as_bytes()))
    }

    /// 만료 시각까지 남은 초 (저장소 TTL 용도, 최소 1초)
    pub fn remaining_seconds(expires_at: i64) -> u64 {
        (expires_at - Utc::now().timestamp()).max(1) as u64
    }

    fn subject(user: &User) -> AppResult<String> {
        user.id
            .map(|id| id.to_hex())
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))
    }

    fn sign<C: Serialize>(claims: &C, key: &EncodingKey) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    fn verify<C: DeserializeOwned>(&self, token: &str, key: &DecodingKey, label: &str) -> AppResult<C> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[self.settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "iss"]);

        decode::<C>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError(format!("{} has expired", label))
                }
                _ => {
                    log::debug!("{} 검증 실패: {}", label, e);
                    AppError::AuthenticationError(format!("Invalid {}", label.to_lowercase()))
                }
            })
    }
}
