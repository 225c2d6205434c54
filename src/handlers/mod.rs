//! # HTTP Request Handlers Module
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Browser (가계부 웹 앱)
//! └─────────────────────┬───────────────────────┘
//!                       │ 쿠키 (session_token, backend_*_token)
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈)                             ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 세션/인증 로직                        ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   원격 가계부 백엔드, OAuth 프로바이더              ← 외부 시스템
//! └─────────────────────────────────────────────┘
//! ```
//!
//! 핸들러는 `web::Data<AppContext>` 로 서비스를 받고, 쿠키 변경은 `CookieScope`
//! 추출자를 통해서만 합니다.
//!
//! - **`auth`**: 로그인 시작, OAuth 콜백, 세션 조회, 로그아웃
//! - **`session`**: 인증된 세션이 필요한 엔드포인트

pub mod auth;
pub mod session;
