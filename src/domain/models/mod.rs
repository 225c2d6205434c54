//! # Domain Models Module
//!
//! 세션 게이트웨이의 도메인 모델과 값 객체를 정의하는 모듈입니다.
//!
//! ## 모듈 구성
//!
//! ```text
//! models/
//! ├── oauth/    ← 프로바이더 원본 프로필과 표준 외부 신원
//! ├── token/    ← 백엔드 자격 증명 쌍, 세션 토큰 클레임
//! └── session/  ← 리프레시 상태, 사용자 프로필, 인증된 세션
//! ```
//!
//! 모든 모델은 영속화되지 않습니다. 외부 신원은 로그인 시도 동안만,
//! 백엔드 자격 증명은 쿠키 안에서만, 세션은 요청 하나 동안만 존재합니다.

pub mod oauth;
pub mod token;
pub mod session;
