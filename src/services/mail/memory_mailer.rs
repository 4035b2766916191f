//! 발송 내용을 메모리에 기록하는 메일러
//!
//! SMTP 설정이 없을 때 서버가 사용하며, 테스트에서는 메일에 담긴
//! 일회용 토큰을 꺼내는 데 씁니다. 동작 링크는 로컬 개발 편의를 위해
//! `debug` 레벨로만 출력합니다.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{Mailer, OutgoingMail};
use crate::errors::{AppError, AppResult};
use crate::utils::string_utils::mask_email;

/// 보관하는 최근 메일 수
const OUTBOX_CAPACITY: usize = 256;

#[derive(Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<OutgoingMail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 기록된 모든 메일
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.outbox.lock().map(|outbox| outbox.clone()).unwrap_or_default()
    }

    /// 특정 수신자에게 마지막으로 보낸 메일
    pub fn last_sent_to(&self, to: &str) -> Option<OutgoingMail> {
        self.sent().into_iter().rev().find(|mail| mail.to == to)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()> {
        log::info!("메일 기록 (memory): {} ({})", mask_email(&mail.to), mail.subject);
        log::debug!("메일 링크: {}", mail.action_url);

        let mut outbox = self
            .outbox
            .lock()
            .map_err(|_| AppError::InternalError("mail outbox lock poisoned".to_string()))?;
        if outbox.len() >= OUTBOX_CAPACITY {
            outbox.remove(0);
        }
        outbox.push(mail);
        Ok(())
    }
}
