//! # Data Transfer Objects
//!
//! HTTP 경계에서 주고받는 요청/응답 구조체입니다.
//!
//! ```text
//! dto/
//! └── auth/
//!     ├── request.rs   - 로그인/콜백 쿼리, 백엔드 리프레시 요청 본문
//!     └── response.rs  - 백엔드 토큰 응답, 프로바이더 토큰 응답, API 응답 래퍼
//! ```

pub mod auth;

pub use auth::*;
