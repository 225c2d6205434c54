//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 모든 서비스는 [`AppContext`](crate::core::context::AppContext) 가 기동 시 한 번 만들고,
//! 생성자를 통해 의존성을 주입받습니다.
//!
//! - `auth` - OAuth 프로바이더 연동, 백엔드 신원 교환, 백엔드 토큰 검증, 로그인 오케스트레이션
//! - `session` - 세션 토큰 서명, 쿠키 저장소, 리프레시 판단, 프로필 보강

pub mod auth;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;
