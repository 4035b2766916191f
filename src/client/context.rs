//! 요청별 재시도 컨텍스트

/// 401 이후 허용되는 재시도 횟수
pub const MAX_RETRIES: u8 = 1;

/// 한 논리적 요청의 시도 번호
///
/// 값 타입이며, 재시도할 때는 [`RequestContext::next_attempt`]로 새 값을 만듭니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestContext {
    attempt: u8,
}

impl RequestContext {
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn attempt(&self) -> u8 {
        self.attempt
    }

    pub fn can_retry(&self) -> bool {
        self.attempt < MAX_RETRIES
    }

    pub fn next_attempt(&self) -> Self {
        Self {
            attempt: self.attempt.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_at_most_once() {
        let first = RequestContext::initial();
        assert!(first.can_retry());

        let second = first.next_attempt();
        assert_eq!(second.attempt(), 1);
        assert!(!second.can_retry());
        assert_eq!(first.attempt(), 0);
    }
}
