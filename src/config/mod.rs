//! # Configuration Module
//!
//! 세션 게이트웨이의 설정 관리를 담당하는 모듈입니다.
//! 모든 설정값은 환경 변수에서 읽으며, 기동 시 한 번 [`AppConfig`] 로 조립되어
//! [`crate::core::context::AppContext`] 에 전달됩니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, Rate Limiting, 백엔드 연결 설정
//! - [`auth_config`] - OAuth 프로바이더, 세션 토큰, 백엔드 토큰 검증, 쿠키 설정
//! - [`app_config`] - 위 설정들을 묶은 최상위 설정
//!
//! ## 설계 원칙
//!
//! ### 1. 환경 분리 (Environment Separation)
//!
//! `ENVIRONMENT` (또는 `NODE_ENV`) 값으로 개발/테스트/스테이징/프로덕션을 구분합니다.
//! 쿠키의 `Secure` 속성은 프로덕션에서만 켜집니다.
//!
//! ### 2. 보안 우선 (Security First)
//!
//! - 민감한 정보는 환경 변수로만 제공
//! - 필수 설정값 누락 시 기동 실패 (`AppError::ConfigError`)
//! - 시크릿 값은 `Debug` 출력에서 가려짐
//!
//! ### 3. 테스트 가능성
//!
//! 모든 설정 구조체는 `from_lookup` 생성자를 가지며, 테스트에서는
//! 환경 변수 대신 `HashMap` 조회 함수를 주입합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use budget_session_gateway::config::AppConfig;
//!
//! let config = AppConfig::from_env()?;
//! println!("Server will bind to {}", config.server.bind_address());
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8080"
//!
//! # 백엔드
//! export BACKEND_BASE_URL="https://api.budget.example.com"
//!
//! # 세션 토큰 (최소 32자)
//! export SESSION_SECRET="your-session-secret-at-least-32-chars"
//!
//! # 백엔드 토큰 검증
//! export BACKEND_JWT_ALGORITHM="HS256"
//! export BACKEND_JWT_SECRET="shared-with-backend"
//!
//! # Google OAuth (사용 시)
//! export GOOGLE_CLIENT_ID="your-client-id"
//! export GOOGLE_CLIENT_SECRET="your-client-secret"
//! export GOOGLE_REDIRECT_URI="https://yourdomain.com/api/auth/callback/google"
//! ```

pub mod data_config;
pub mod auth_config;
pub mod app_config;

pub use data_config::*;
pub use auth_config::*;
pub use app_config::*;
