//! 공통 유틸리티 함수 모듈
//!
//! 애플리케이션 전체에서 사용되는 문자열 정리, 이메일 정규화,
//! 검증 에러 포맷팅 함수들을 제공합니다.

pub mod string_utils;
