//! 리프레시 코디네이터의 상태 모델
//!
//! ```text
//!            ┌──────────── now < accessTokenExpires ─────────────┐
//!            │                                                    ▼
//! 세션 쿠키 ─┼─ 만료 + 리프레시 토큰 있음 ─▶ NeedsRefresh ─ 성공 ─▶ Valid
//!            │                                   │
//!            │                                   └─ 거절/네트워크/검증 실패 ─▶ Unauthenticated
//!            └──────────── 사용 가능한 자격 증명 없음 ───────────▶ Unauthenticated
//! ```
//!
//! 판단은 요청마다 새로 이루어지며 요청 간에 공유되지 않습니다.

use std::fmt;

use crate::domain::models::token::{SecretToken, SessionClaims};

/// 요청 하나에서 내린 리프레시 판단
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshState {
    /// 캐시된 자격 증명을 그대로 사용
    Valid {
        claims: SessionClaims,
        access_token: SecretToken,
    },
    /// 백엔드 `refresh` 호출이 필요함
    NeedsRefresh {
        claims: SessionClaims,
        refresh_token: SecretToken,
    },
    /// 요청에 대해 종결 상태
    Unauthenticated(UnauthenticatedReason),
}

/// 인증되지 않은 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    /// 세션 쿠키가 없음
    NoSession,
    /// 세션 토큰 서명/알고리즘/만료 검증 실패
    InvalidSession,
    /// 액세스 토큰도 리프레시 토큰도 사용할 수 없음
    NoCredentials,
    /// 백엔드가 리프레시 토큰을 거절함
    RefreshRejected,
    /// 재시도 후에도 백엔드에 도달하지 못함
    RefreshUnreachable,
    /// 갱신된 백엔드 토큰 검증 실패
    VerificationFailed,
    /// 갱신된 토큰의 주체가 세션 사용자와 다름
    IdentityMismatch,
    /// 새 세션 토큰 서명 실패
    IssueFailed,
}

impl UnauthenticatedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnauthenticatedReason::NoSession => "no_session",
            UnauthenticatedReason::InvalidSession => "invalid_session",
            UnauthenticatedReason::NoCredentials => "no_credentials",
            UnauthenticatedReason::RefreshRejected => "refresh_rejected",
            UnauthenticatedReason::RefreshUnreachable => "refresh_unreachable",
            UnauthenticatedReason::VerificationFailed => "verification_failed",
            UnauthenticatedReason::IdentityMismatch => "identity_mismatch",
            UnauthenticatedReason::IssueFailed => "issue_failed",
        }
    }

    /// 저장된 자격 증명을 지워야 하는 실패인지 여부
    ///
    /// 세션 쿠키 자체가 없거나 깨진 경우에는 백엔드 쿠키를 건드리지 않습니다.
    pub fn clears_credentials(&self) -> bool {
        !matches!(
            self,
            UnauthenticatedReason::NoSession | UnauthenticatedReason::InvalidSession
        )
    }
}

impl fmt::Display for UnauthenticatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 구체화된 유효 세션
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub claims: SessionClaims,
    pub access_token: SecretToken,
    /// 이번 요청에서 자격 증명을 갱신했는지 여부
    pub refreshed: bool,
}

/// 요청 단위 세션 구체화 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Active(ActiveSession),
    Unauthenticated(UnauthenticatedReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_session_keeps_credentials() {
        assert!(!UnauthenticatedReason::NoSession.clears_credentials());
        assert!(!UnauthenticatedReason::InvalidSession.clears_credentials());
        assert!(UnauthenticatedReason::RefreshRejected.clears_credentials());
        assert!(UnauthenticatedReason::RefreshUnreachable.clears_credentials());
        assert!(UnauthenticatedReason::IdentityMismatch.clears_credentials());
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(UnauthenticatedReason::RefreshRejected.to_string(), "refresh_rejected");
    }
}
