//! 메일 발송 설정

use std::env;

use super::{env_or, env_string};

/// SMTP 연결 정보
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// `"Users Service" <noreply@users.local>` 형식의 발신자
    pub from: String,
}

pub struct MailConfig;

impl MailConfig {
    pub const DEFAULT_FROM: &'static str = "\"Users Service\" <noreply@users.local>";

    /// SMTP 설정
    ///
    /// `SMTP_USER`/`SMTP_PASS`가 없으면 `None`을 반환하며, 이 경우
    /// 서버는 메일을 로그로만 남기는 메모리 메일러를 사용합니다.
    pub fn smtp() -> Option<SmtpSettings> {
        let username = env::var("SMTP_USER").ok()?;
        let password = env::var("SMTP_PASS").ok()?;

        Some(SmtpSettings {
            host: env_string("SMTP_HOST", "sandbox.smtp.mailtrap.io"),
            port: env_or("SMTP_PORT", 587),
            username,
            password,
            from: env_string("EMAIL_FROM", Self::DEFAULT_FROM),
        })
    }

    /// 메일 본문 링크에 사용하는 프론트엔드 주소
    pub fn frontend_url() -> String {
        env_string("FRONTEND_URL", "http://localhost:5173")
            .trim_end_matches('/')
            .to_string()
    }
}
