//! 토큰 관련 도메인 모델
//!
//! - [`token`] - 백엔드 자격 증명 쌍, 세션 토큰 클레임, 백엔드 토큰 클레임
//! - [`secret`] - 로그와 `Debug` 출력에서 값을 가리는 토큰 래퍼

pub mod token;
pub mod secret;

pub use secret::SecretToken;
pub use token::*;
