//! SMTP 메일 발송 (lettre)

use async_trait::async_trait;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{error, info};

use super::{Mailer, OutgoingMail};
use crate::config::SmtpSettings;
use crate::errors::{AppError, AppResult};
use crate::utils::string_utils::mask_email;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// STARTTLS 릴레이 전송 계층 생성 (Mailtrap 등 587 포트)
    pub fn new(settings: &SmtpSettings) -> AppResult<Self> {
        let credentials = Credentials::new(settings.username.clone(), settings.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| AppError::ExternalServiceError(format!("Failed to configure SMTP relay: {}", e)))?
            .port(settings.port)
            .credentials(credentials)
            .build();

        info!("SMTP 메일러 구성 완료: {}:{}", settings.host, settings.port);
        Ok(Self {
            transport,
            from: settings.from.clone(),
        })
    }

    fn build_message(&self, mail: &OutgoingMail) -> AppResult<Message> {
        Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| AppError::InternalError(format!("Invalid from address: {}", e)))?,
            )
            .to(mail
                .to
                .parse()
                .map_err(|e| AppError::ValidationError(format!("Invalid recipient email: {}", e)))?)
            .subject(mail.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(mail.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(mail.html_body.clone()),
                    ),
            )
            .map_err(|e| AppError::InternalError(format!("Failed to build email message: {}", e)))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()> {
        let message = self.build_message(&mail)?;

        match self.transport.send(message).await {
            Ok(_) => {
                info!("메일 발송 완료: {} ({})", mask_email(&mail.to), mail.subject);
                Ok(())
            }
            Err(e) => {
                error!("메일 발송 실패: {} - {}", mask_email(&mail.to), e);
                Err(AppError::ExternalServiceError(format!("Failed to send email: {}", e)))
            }
        }
    }
}
