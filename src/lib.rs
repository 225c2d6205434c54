//! 가족 가계부 세션 게이트웨이
//!
//! 브라우저와 원격 가계부 백엔드 사이에서 로그인과 세션 수명 주기를 담당합니다.
//!
//! # Features
//!
//! - **OAuth 2.0**: Google, 네이버, 카카오 소셜 로그인
//! - **신원 교환**: 외부 신원을 백엔드 자격 증명 쌍으로 교환 (제한적 재시도)
//! - **세션 토큰**: 게이트웨이 자체 HS512 세션 토큰 (30일)
//! - **보안 쿠키**: 백엔드 토큰은 HttpOnly 쿠키에만 보관
//! - **자동 리프레시**: 만료 시 요청 안에서 한 번 갱신, 실패하면 세션 종료
//! - **세션 보강**: 사용자 프로필 첨부, 실패 시 기본 프로필
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /api/auth/*, /api/v1/*
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Middlewares   │ ← CookieScope, SessionMiddleware
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 세션 발급/리프레시/보강, OAuth, 백엔드 클라이언트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Budget Backend  │ ← /auth/register, /auth/refresh, /users/me/profile
//! └─────────────────┘
//! ```

pub mod core;
pub mod config;
pub mod domain;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
