//! 메일 본문 템플릿

use super::OutgoingMail;

/// 프론트엔드 주소를 기준으로 동작 링크를 만드는 메일 템플릿
#[derive(Debug, Clone)]
pub struct MailTemplates {
    frontend_url: String,
}

impl MailTemplates {
    pub fn new(frontend_url: impl Into<String>) -> Self {
        Self {
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `{frontend}/verify-email/{token}` 링크가 담긴 인증 메일
    pub fn email_verification(&self, to: &str, name: &str, token: &str, valid_hours: i64) -> OutgoingMail {
        let action_url = self.link("verify-email", token);
        let text_body = format!(
            "Hello {name},\n\nPlease verify your email address by opening the link below:\n{action_url}\n\n\
             This link expires in {valid_hours} hours. If you did not create an account, you can ignore this email.\n"
        );
        let html_body = format!(
            "<p>Hello {name},</p>\
             <p>Please verify your email address by clicking the button below.</p>\
             <p><a href=\"{action_url}\">Verify email</a></p>\
             <p>This link expires in {valid_hours} hours. If you did not create an account, you can ignore this email.</p>"
        );

        OutgoingMail {
            to: to.to_string(),
            subject: "Verify your email address".to_string(),
            text_body,
            html_body,
            action_url,
        }
    }

    /// `{frontend}/reset-password/{token}` 링크가 담긴 비밀번호 재설정 메일
    pub fn password_reset(&self, to: &str, name: &str, token: &str, valid_minutes: i64) -> OutgoingMail {
        let action_url = self.link("reset-password", token);
        let text_body = format!(
            "Hello {name},\n\nWe received a request to reset your password. Open the link below to choose a new one:\n\
             {action_url}\n\nThis link expires in {valid_minutes} minutes. If you did not request a reset, no action is needed.\n"
        );
        let html_body = format!(
            "<p>Hello {name},</p>\
             <p>We received a request to reset your password.</p>\
             <p><a href=\"{action_url}\">Reset password</a></p>\
             <p>This link expires in {valid_minutes} minutes. If you did not request a reset, no action is needed.</p>"
        );

        OutgoingMail {
            to: to.to_string(),
            subject: "Reset your password".to_string(),
            text_body,
            html_body,
            action_url,
        }
    }

    fn link(&self, route: &str, token: &str) -> String {
        format!("{}/{}/{}", self.frontend_url, route, urlencoding::encode(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_mail_links_to_frontend() {
        let templates = MailTemplates::new("http://localhost:5173/");
        let mail = templates.email_verification("a@b.com", "Alice", "tok123", 24);

        assert_eq!(mail.action_url, "http://localhost:5173/verify-email/tok123");
        assert_eq!(mail.link_token().as_deref(), Some("tok123"));
        assert!(mail.html_body.contains(&mail.action_url));
        assert!(mail.text_body.contains("24 hours"));
    }

    #[test]
    fn test_reset_mail_links_to_frontend() {
        let mail = MailTemplates::new("https://app.test").password_reset("a@b.com", "Alice", "r1", 60);

        assert_eq!(mail.action_url, "https://app.test/reset-password/r1");
        assert_eq!(mail.subject, "Reset your password");
    }
}
