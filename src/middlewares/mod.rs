//! 미들웨어 모듈
//!
//! # 제공 미들웨어
//!
//! ### 1. 쿠키 스코프 (CookieScopeMiddleware)
//! - 요청 단위 쿠키 jar 를 extension 에 등록
//! - 정상/에러 응답 모두에 쿠키 변경분 기록
//!
//! ### 2. 세션 미들웨어 (SessionMiddleware)
//! - 세션 토큰 검증 및 필요 시 백엔드 토큰 리프레시
//! - 프로필 보강 후 `AuthenticatedSession` 을 extension 에 저장
//! - 필수/선택 인증 모드 지원
//!
//! ```rust,ignore
//! App::new()
//!     .wrap(CookieScopeMiddleware)
//!     .service(
//!         web::scope("/api/v1")
//!             .wrap(SessionMiddleware::required(ctx.clone()))
//!             .route("/me", web::get().to(me)),
//!     )
//! ```

pub mod cookie_scope;
pub mod session_middleware;
mod session_inner;

pub use cookie_scope::{CookieScope, CookieScopeMiddleware};
pub use session_inner::sign_in_redirect;
pub use session_middleware::{AuthMode, SessionMiddleware};
