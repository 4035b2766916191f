//! 토큰 저장소용 캐시 계층
//!
//! 현재는 Redis 클라이언트만 제공합니다. 토큰 저장 규칙(키 형식, 만료)은
//! `repositories::tokens`에 있고, 이 모듈은 직렬화와 연결만 담당합니다.

pub mod redis;
