//! 메일 발송 서비스
//!
//! - [`Mailer`] - 발송 추상화 (서비스는 이 trait에만 의존)
//! - [`SmtpMailer`] - `lettre` 기반 SMTP(STARTTLS) 발송
//! - [`MemoryMailer`] - 발송 내용을 메모리에 기록 (로컬 개발, 테스트)
//! - [`MailTemplates`] - 이메일 인증/비밀번호 재설정 메일 본문

pub mod memory_mailer;
pub mod smtp_mailer;
pub mod templates;

pub use memory_mailer::MemoryMailer;
pub use smtp_mailer::SmtpMailer;
pub use templates::MailTemplates;

use async_trait::async_trait;

use crate::errors::AppResult;

/// 발송할 메일 한 통
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    /// 본문에 포함된 동작 링크 (인증/재설정 페이지)
    pub action_url: String,
}

impl OutgoingMail {
    /// 동작 링크의 마지막 경로 조각 (일회용 토큰)
    pub fn link_token(&self) -> Option<String> {
        self.action_url
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::decode(segment).map(|s| s.into_owned()).unwrap_or_else(|_| segment.to_string()))
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()>;
}
