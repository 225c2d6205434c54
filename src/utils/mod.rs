//! 공통 유틸리티
//!
//! - [`string_utils`] - 프로바이더 응답의 선택 필드 정리
//! - [`fingerprint`] - 로그용 토큰 지문, 상수 시간 비교
//! - [`display_terminal`] - 기동 배너

pub mod string_utils;
pub mod fingerprint;
pub mod display_terminal;
