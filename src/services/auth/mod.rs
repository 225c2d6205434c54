//! 인증 서비스 모듈
//!
//! 외부 신원(OAuth)을 백엔드 자격 증명으로 바꾸는 단계까지를 담당합니다.
//!
//! # Security
//!
//! - OAuth state 쿠키 기반 CSRF 방지 (1회용)
//! - 백엔드 토큰은 알고리즘을 고정해 검증한 뒤에만 신뢰
//! - 업무 거절은 재시도하지 않고, 일시 장애만 제한적으로 재시도

pub mod backend_client;
pub mod backend_token_verifier;
pub mod oauth_provider_service;
pub mod sign_in_service;

pub use backend_client::*;
pub use backend_token_verifier::*;
pub use oauth_provider_service::*;
pub use sign_in_service::*;
