//! # Domain Layer Module
//!
//! 세션 게이트웨이의 도메인 계층입니다.
//!
//! ## 아키텍처 개요
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── DTOs     - HTTP 경계의 요청/응답 (프로바이더, 백엔드, 브라우저)
//! └── Models   - 외부 신원, 토큰, 세션 상태
//!      │
//!      ▼
//! Application Layer (Services)
//! ```
//!
//! 이 게이트웨이는 자체 저장소가 없습니다. 사용자 데이터의 원천은 원격 백엔드이고,
//! 브라우저 쿠키만이 요청 사이에 남는 상태입니다.

pub mod dto;
pub mod models;

pub use dto::*;
pub use models::*;
