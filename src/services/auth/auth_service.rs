//! 인증 서비스
//!
//! 계정 생성부터 세션 종료까지 토큰 수명 주기 전체를 조율합니다.
//!
//! ```text
//! 계정:   unverified ──verify_email──▶ verified
//! 세션:   none ──login──▶ active ──refresh*──▶ active ──logout──▶ revoked
//! ```
//!
//! ## 리프레시 토큰 회전
//!
//! 리프레시 토큰은 한 번만 쓸 수 있습니다. `refresh`는 제시된 토큰의 세션
//! 레코드를 원자적으로 소비한 뒤 같은 세션 ID로 새 토큰 쌍을 발급합니다.
//! 같은 토큰으로 동시에 두 번 갱신하면 먼저 소비한 쪽만 성공하고 나머지는
//! `AuthenticationError`를 받습니다.
//!
//! ## 계정 존재 여부 비노출
//!
//! `forgot_password`, `resend_verification`은 계정 유무와 관계없이 같은
//! 응답을 반환하며, 내부 오류도 로그로만 남깁니다.

use std::sync::Arc;

use chrono::{Duration, Utc};
use validator::Validate;

use crate::config::{
    JwtConfig, JwtSettings, MailConfig, PasswordConfig, SingleUseSettings, SingleUseTokenConfig,
};
use crate::domain::dto::tokens::RefreshTokenResponse;
use crate::domain::dto::users::{
    ForgotPasswordRequest, IdentityRecord, LoginRequest, LoginResponse, MessageResponse,
    ProfileResponse, RegisterRequest, ResendVerificationRequest, ResetPasswordRequest,
    SuccessResponse, VerifyTokenResponse,
};
use crate::domain::entities::users::User;
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::token::{
    RefreshSession, SingleUsePurpose, SingleUseRecord, TokenPair,
};
use crate::errors::{AppError, AppResult};
use crate::repositories::tokens::{BlacklistEntry, TokenStore};
use crate::repositories::users::UserStore;
use crate::services::auth::TokenService;
use crate::services::mail::{MailTemplates, Mailer, OutgoingMail};
use crate::services::users::UserService;
use crate::utils::string_utils::{clean_optional_string, mask_email, normalize_email};

pub const REGISTER_SUCCESS_MESSAGE: &str =
    "Registration successful. Please check your email to verify your account.";
pub const DUPLICATE_REGISTRATION_MESSAGE: &str = "Unable to register with the provided email";
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account exists for that email, a password reset link has been sent.";
pub const RESEND_VERIFICATION_MESSAGE: &str =
    "If the account exists and is not yet verified, a new verification email has been sent.";
pub const EMAIL_VERIFIED_MESSAGE: &str = "Email verified successfully";
pub const PASSWORD_RESET_MESSAGE: &str =
    "Password has been reset successfully. Please log in with your new password.";

const REVOKED_REFRESH_TOKEN: &str = "Refresh token has been revoked";
const REVOKED_ACCESS_TOKEN: &str = "Access token has been revoked";

/// 인증 서비스 생성에 필요한 설정 묶음
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt: JwtSettings,
    pub single_use: SingleUseSettings,
    pub bcrypt_cost: u32,
    pub frontend_url: String,
}

impl AuthSettings {
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::settings(),
            single_use: SingleUseTokenConfig::settings(),
            bcrypt_cost: PasswordConfig::bcrypt_cost(),
            frontend_url: MailConfig::frontend_url(),
        }
    }

    /// 주어진 JWT 설정과 가장 가벼운 bcrypt 비용을 쓰는 설정
    pub fn with_jwt(jwt: JwtSettings) -> Self {
        Self {
            jwt,
            single_use: SingleUseSettings::default(),
            bcrypt_cost: 4,
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}

pub struct AuthService {
    users: UserService,
    tokens: TokenService,
    token_store: Arc<dyn TokenStore>,
    mailer: Arc<dyn Mailer>,
    templates: MailTemplates,
    single_use: SingleUseSettings,
}

impl AuthService {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        token_store: Arc<dyn TokenStore>,
        mailer: Arc<dyn Mailer>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            users: UserService::new(user_store, settings.bcrypt_cost),
            tokens: TokenService::new(settings.jwt),
            token_store,
            mailer,
            templates: MailTemplates::new(settings.frontend_url),
            single_use: settings.single_use,
        }
    }

    /// 회원가입
    ///
    /// 인증 전 계정을 만들고 인증 메일을 보냅니다. 메일 발송 실패는 가입을
    /// 되돌리지 않으며, 사용자는 `resend_verification`으로 다시 받을 수 있습니다.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<MessageResponse> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let name = clean_optional_string(request.name)
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        if self.users.find_by_email(&email).await?.is_some() {
            log::info!("중복 가입 시도: {}", mask_email(&email));
            return Err(AppError::ValidationError(DUPLICATE_REGISTRATION_MESSAGE.to_string()));
        }

        let user = match self.users.create_user(email, name, &request.password).await {
            Ok(user) => user,
            Err(AppError::ConflictError(_)) => {
                return Err(AppError::ValidationError(DUPLICATE_REGISTRATION_MESSAGE.to_string()));
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = self.send_email_verification(&user).await {
            log::error!("인증 메일 준비 실패 - user_id: {}, error: {}", user.id_string(), e);
        }

        log::info!("회원가입 완료 - user_id: {}", user.id_string());
        Ok(MessageResponse::ok(REGISTER_SUCCESS_MESSAGE))
    }

    /// 로그인: 자격 증명 확인 후 새 세션의 토큰 쌍 발급
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let user = match self.users.verify_credentials(&email, &request.password).await {
            Ok(user) => user,
            Err(e) => {
                log::warn!("로그인 실패: {}", mask_email(&email));
                return Err(e);
            }
        };

        let session_id = uuid::Uuid::new_v4().to_string();
        let pair = self.issue_token_pair(&user, &session_id).await?;
        self.users.record_login(&user.id_string()).await;

        log::info!("로그인 성공 - user_id: {}, sid: {}", user.id_string(), session_id);
        Ok(LoginResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            user: IdentityRecord::from(&user),
        })
    }

    /// 로그아웃
    ///
    /// 리프레시 토큰 세션을 폐기하고, 호출자의 액세스 토큰을 남은 유효 기간
    /// 동안 블랙리스트에 올립니다. 알 수 없거나 이미 폐기된 토큰이어도
    /// 항상 성공합니다.
    pub async fn logout(
        &self,
        refresh_token: Option<&str>,
        caller: Option<&AuthenticatedUser>,
    ) -> AppResult<SuccessResponse> {
        if let Some(token) = refresh_token.map(str::trim).filter(|t| !t.is_empty()) {
            match self.tokens.verify_refresh_token(token) {
                Ok(claims) => {
                    self.token_store.revoke_refresh(&claims.jti).await?;
                    log::info!("로그아웃 - user_id: {}, sid: {}", claims.sub, claims.sid);
                }
                Err(_) => log::debug!("로그아웃: 유효하지 않은 리프레시 토큰은 무시합니다"),
            }
        }

        if let Some(user) = caller {
            let entry = BlacklistEntry {
                user_id: user.user_id.clone(),
                blacklisted_at: Utc::now().timestamp(),
            };
            self.token_store
                .blacklist_access(
                    &user.token_id,
                    &entry,
                    TokenService::remaining_seconds(user.expires_at),
                )
                .await?;
        }

        Ok(SuccessResponse::ok())
    }

    /// 토큰 갱신 (회전)
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshTokenResponse> {
        let claims = self.tokens.verify_refresh_token(refresh_token.trim())?;

        let Some(session) = self.token_store.take_refresh(&claims.jti).await? else {
            log::warn!(
                "폐기되었거나 이미 사용된 리프레시 토큰 - user_id: {}, sid: {}",
                claims.sub,
                claims.sid
            );
            return Err(AppError::AuthenticationError(REVOKED_REFRESH_TOKEN.to_string()));
        };

        if session.user_id != claims.sub || session.session_id != claims.sid {
            log::warn!("리프레시 세션 불일치 - user_id: {}", claims.sub);
            return Err(AppError::AuthenticationError("Invalid refresh token".to_string()));
        }

        let user = self.load_account(&claims.sub, claims.ver, REVOKED_REFRESH_TOKEN).await?;
        let pair = self.issue_token_pair(&user, &claims.sid).await?;

        log::info!("토큰 갱신 완료 - user_id: {}, sid: {}", claims.sub, claims.sid);
        Ok(RefreshTokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// 액세스 토큰 인증 (미들웨어에서 사용)
    ///
    /// 서명, 종류, 만료, 블랙리스트와 계정의 `token_version`을 확인합니다.
    /// 역할은 토큰 클레임이 아니라 현재 계정 기준입니다.
    pub async fn authenticate(&self, access_token: &str) -> AppResult<AuthenticatedUser> {
        let claims = self.tokens.verify_access_token(access_token)?;

        if self.token_store.is_access_blacklisted(&claims.jti).await? {
            return Err(AppError::AuthenticationError(REVOKED_ACCESS_TOKEN.to_string()));
        }

        let user = self.load_account(&claims.sub, claims.ver, REVOKED_ACCESS_TOKEN).await?;

        let mut caller = AuthenticatedUser::from(claims);
        caller.email = user.email;
        caller.role = user.role;
        Ok(caller)
    }

    /// 현재 토큰이 유효한지와 최신 사용자 정보를 반환
    pub async fn verify_token(&self, caller: &AuthenticatedUser) -> AppResult<VerifyTokenResponse> {
        let user = self.current_user(caller).await?;
        Ok(VerifyTokenResponse {
            valid: true,
            user: IdentityRecord::from(&user),
        })
    }

    pub async fn profile(&self, caller: &AuthenticatedUser) -> AppResult<ProfileResponse> {
        let user = self.current_user(caller).await?;
        Ok(ProfileResponse {
            user: IdentityRecord::from(&user),
        })
    }

    /// 이메일 인증 (일회용 토큰 소비)
    pub async fn verify_email(&self, token: &str) -> AppResult<MessageResponse> {
        let record = self.redeem(SingleUsePurpose::EmailVerification, token).await?;

        self.users
            .mark_email_verified(&record.user_id)
            .await
            .map_err(|e| Self::missing_account_as_invalid(e, SingleUsePurpose::EmailVerification))?;

        log::info!("이메일 인증 완료 - user_id: {}", record.user_id);
        Ok(MessageResponse::ok(EMAIL_VERIFIED_MESSAGE))
    }

    /// 인증 메일 재발송 (항상 같은 응답)
    pub async fn resend_verification(
        &self,
        request: ResendVerificationRequest,
    ) -> AppResult<MessageResponse> {
        request.validate()?;
        let email = normalize_email(&request.email);

        match self.users.find_by_email(&email).await {
            Ok(Some(user)) if !user.email_verified => {
                if let Err(e) = self.send_email_verification(&user).await {
                    log::error!("인증 메일 재발송 실패 - user_id: {}, error: {}", user.id_string(), e);
                }
            }
            Ok(_) => log::debug!("인증 메일 재발송 대상 아님: {}", mask_email(&email)),
            Err(e) => log::error!("인증 메일 재발송 조회 실패: {}", e),
        }

        Ok(MessageResponse::ok(RESEND_VERIFICATION_MESSAGE))
    }

    /// 비밀번호 재설정 메일 요청 (항상 같은 응답)
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> AppResult<MessageResponse> {
        request.validate()?;
        let email = normalize_email(&request.email);

        match self.users.find_by_email(&email).await {
            Ok(Some(user)) => {
                if let Err(e) = self.send_password_reset(&user).await {
                    log::error!("재설정 메일 준비 실패 - user_id: {}, error: {}", user.id_string(), e);
                }
            }
            Ok(None) => log::info!("존재하지 않는 계정의 비밀번호 재설정 요청: {}", mask_email(&email)),
            Err(e) => log::error!("비밀번호 재설정 조회 실패: {}", e),
        }

        Ok(MessageResponse::ok(FORGOT_PASSWORD_MESSAGE))
    }

    /// 비밀번호 재설정 (일회용 토큰 소비)
    ///
    /// 새 비밀번호 형식을 먼저 검사하므로, 형식 오류로 토큰이 낭비되지 않습니다.
    /// 성공하면 계정의 모든 기존 토큰이 무효화됩니다.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> AppResult<MessageResponse> {
        request.validate()?;

        let record = self.redeem(SingleUsePurpose::PasswordReset, &request.token).await?;
        self.users
            .change_password(&record.user_id, &request.new_password)
            .await
            .map_err(|e| Self::missing_account_as_invalid(e, SingleUsePurpose::PasswordReset))?;

        log::info!("비밀번호 재설정 완료 - user_id: {}", record.user_id);
        Ok(MessageResponse::ok(PASSWORD_RESET_MESSAGE))
    }

    /// 관리자: 사용자의 모든 세션 무효화
    pub async fn revoke_user_sessions(&self, user_id: &str) -> AppResult<SuccessResponse> {
        self.users.revoke_sessions(user_id).await?;
        log::info!("사용자 세션 전체 폐기 - user_id: {}", user_id);
        Ok(SuccessResponse::ok())
    }

    async fn current_user(&self, caller: &AuthenticatedUser) -> AppResult<User> {
        self.load_account(&caller.user_id, caller.token_version, REVOKED_ACCESS_TOKEN)
            .await
    }

    /// 토큰 주체 계정 조회 + `token_version` 확인
    async fn load_account(&self, user_id: &str, token_version: i64, revoked_message: &str) -> AppResult<User> {
        let user = match self.users.get_user(user_id).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::AuthenticationError("Account no longer exists".to_string()));
            }
            Err(e) => return Err(e),
        };

        if user.token_version != token_version {
            return Err(AppError::AuthenticationError(revoked_message.to_string()));
        }
        Ok(user)
    }

    async fn issue_token_pair(&self, user: &User, session_id: &str) -> AppResult<TokenPair> {
        let access = self.tokens.issue_access_token(user)?;
        let refresh = self.tokens.issue_refresh_token(user, session_id)?;

        let session = RefreshSession {
            user_id: refresh.claims.sub.clone(),
            session_id: session_id.to_string(),
            issued_at: refresh.claims.iat,
            expires_at: refresh.claims.exp,
        };
        self.token_store
            .store_refresh(
                &refresh.claims.jti,
                &session,
                TokenService::remaining_seconds(refresh.claims.exp),
            )
            .await?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }

    async fn send_email_verification(&self, user: &User) -> AppResult<()> {
        let ttl = self.single_use.email_verification_ttl;
        let token = self
            .issue_single_use(user, SingleUsePurpose::EmailVerification, ttl)
            .await?;
        let mail = self
            .templates
            .email_verification(&user.email, &user.name, &token, ttl.num_hours());
        self.deliver(mail).await;
        Ok(())
    }

    async fn send_password_reset(&self, user: &User) -> AppResult<()> {
        let ttl = self.single_use.password_reset_ttl;
        let token = self
            .issue_single_use(user, SingleUsePurpose::PasswordReset, ttl)
            .await?;
        let mail = self
            .templates
            .password_reset(&user.email, &user.name, &token, ttl.num_minutes());
        self.deliver(mail).await;
        Ok(())
    }

    /// 일회용 토큰 발급: 해시만 저장하고 원문을 반환
    async fn issue_single_use(&self, user: &User, purpose: SingleUsePurpose, ttl: Duration) -> AppResult<String> {
        let (token, token_hash) = TokenService::generate_single_use_token();
        let record = SingleUseRecord {
            user_id: user.id_string(),
            email: user.email.clone(),
            purpose,
            expires_at: (Utc::now() + ttl).timestamp(),
        };
        let retention_seconds = (ttl + self.single_use.expired_retention).num_seconds().max(1) as u64;

        self.token_store
            .store_single_use(&token_hash, &record, retention_seconds)
            .await?;
        Ok(token)
    }

    async fn redeem(&self, purpose: SingleUsePurpose, token: &str) -> AppResult<SingleUseRecord> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::InvalidTokenError(Self::invalid_link_message(purpose).to_string()));
        }

        let token_hash = TokenService::hash_single_use_token(token);
        let record = self
            .token_store
            .take_single_use(purpose, &token_hash)
            .await?
            .ok_or_else(|| AppError::InvalidTokenError(Self::invalid_link_message(purpose).to_string()))?;

        if record.is_expired(Utc::now().timestamp()) {
            log::info!("만료된 일회용 토큰 사용 시도 - user_id: {}, purpose: {:?}", record.user_id, purpose);
            return Err(AppError::ExpiredTokenError(Self::expired_link_message(purpose).to_string()));
        }
        Ok(record)
    }

    async fn deliver(&self, mail: OutgoingMail) {
        let recipient = mask_email(&mail.to);
        if let Err(e) = self.mailer.send(mail).await {
            log::error!("메일 발송 실패: {} - {}", recipient, e);
        }
    }

    fn missing_account_as_invalid(error: AppError, purpose: SingleUsePurpose) -> AppError {
        match error {
            AppError::NotFound(_) => AppError::InvalidTokenError(Self::invalid_link_message(purpose).to_string()),
            other => other,
        }
    }

    fn invalid_link_message(purpose: SingleUsePurpose) -> &'static str {
        match purpose {
            SingleUsePurpose::EmailVerification => "Verification link is invalid or has already been used",
            SingleUsePurpose::PasswordReset => "Password reset link is invalid or has already been used",
        }
    }

    fn expired_link_message(purpose: SingleUsePurpose) -> &'static str {
        match purpose {
            SingleUsePurpose::EmailVerification => "Verification link has expired",
            SingleUsePurpose::PasswordReset => "Password reset link has expired",
        }
    }
}
