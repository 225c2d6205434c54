//! 에러 모듈
//!
//! [`errors::AppError`] 와 관련 헬퍼를 제공합니다.

pub mod errors;

pub use errors::*;
