//! 세션 수명 주기 서비스
//!
//! ```text
//! 로그인 ─▶ SessionIssuer ─▶ TokenStore + SessionCookie
//!                ▲
//! 요청마다 ─▶ RefreshCoordinator ─(필요 시 refresh)─┘
//!                │
//!                ▼
//!          SessionEnricher ─▶ AuthenticatedSession
//! ```

pub mod secret_key;
pub mod session_codec;
pub mod token_store;
pub mod session_cookie;
pub mod session_issuer;
pub mod refresh_coordinator;
pub mod enrichment;

pub use enrichment::*;
pub use refresh_coordinator::*;
pub use secret_key::*;
pub use session_codec::*;
pub use session_cookie::*;
pub use session_issuer::*;
pub use token_store::*;
