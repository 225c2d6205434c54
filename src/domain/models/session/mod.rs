//! 세션 구체화 결과 모델
//!
//! - [`state`] - 리프레시 판단 상태와 요청 단위 세션 상태
//! - [`profile`] - 백엔드에서 가져오는 사용자 프로필과 기본값
//! - [`authenticated_session`] - 핸들러가 받는 보강된 세션 (extractor)

pub mod state;
pub mod profile;
pub mod authenticated_session;

pub use authenticated_session::{AuthenticatedSession, OptionalSession};
pub use profile::{ProfileSource, UserProfile};
pub use state::{ActiveSession, RefreshState, SessionState, UnauthenticatedReason};
