//! 세션 게이트웨이가 다루는 두 종류의 토큰 구조체
//!
//! 백엔드가 서명한 자격 증명 쌍([`BackendCredentialPair`])과 게이트웨이가 서명한
//! 세션 토큰([`SessionClaims`])은 서로 다른 키와 알고리즘을 사용하며,
//! 세션 토큰에는 백엔드 토큰 값이 절대 들어가지 않습니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 백엔드가 발급한 액세스/리프레시 토큰 쌍
///
/// 보안 토큰 저장소만 소유하며, 갱신 시 두 토큰이 함께 교체됩니다.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendCredentialPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 액세스 토큰 유효 기간 (초)
    pub expires_in_seconds: i64,
}

impl fmt::Debug for BackendCredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendCredentialPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in_seconds", &self.expires_in_seconds)
            .finish()
    }
}

/// 세션 토큰이 담는 최소 신원 클레임
///
/// `access_token_expires` 는 백엔드 액세스 토큰 만료 시각(ms epoch)으로,
/// 리프레시 판단에만 쓰입니다. 세션 토큰 자체의 만료와는 독립적입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_uuid: String,
    pub access_token_expires: i64,
}

impl SessionClaims {
    pub fn new(user_uuid: impl Into<String>, access_token_expires: i64) -> Self {
        Self {
            user_uuid: user_uuid.into(),
            access_token_expires,
        }
    }

    /// `now_ms` 기준으로 백엔드 액세스 토큰이 만료되었는지 여부
    pub fn is_access_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.access_token_expires
    }
}

/// 세션 토큰의 JWT 페이로드
///
/// `userUuid`, `accessTokenExpires` 두 클레임과 등록 클레임 `iat`, `exp` 만 가집니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokenPayload {
    pub user_uuid: String,
    pub access_token_expires: i64,
    pub iat: i64,
    pub exp: i64,
}

impl From<SessionTokenPayload> for SessionClaims {
    fn from(payload: SessionTokenPayload) -> Self {
        SessionClaims {
            user_uuid: payload.user_uuid,
            access_token_expires: payload.access_token_expires,
        }
    }
}

/// 백엔드 액세스 토큰에서 읽는 클레임
///
/// 검증 후 `sub` 만 사용자 식별자로 신뢰합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendTokenClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// 쿠키에서 읽은 자격 증명
///
/// 두 쿠키는 만료가 독립적이므로 한쪽만 남아 있는 부분 상태가 가능합니다.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StoredCredentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl StoredCredentials {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
