use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::token::BackendCredentialPair;

/// 백엔드 `POST /auth/register`, `POST /auth/refresh` 응답
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BackendTokenResponse {
    #[validate(length(min = 1, message = "accessToken이 비어 있습니다"))]
    pub access_token: String,

    #[validate(length(min = 1, message = "refreshToken이 비어 있습니다"))]
    pub refresh_token: String,

    /// 액세스 토큰 유효 기간 (초). 최대 10년.
    #[validate(range(min = 1, max = 315_360_000, message = "expiresIn 범위가 올바르지 않습니다"))]
    pub expires_in: i64,
}

impl From<BackendTokenResponse> for BackendCredentialPair {
    fn from(response: BackendTokenResponse) -> Self {
        BackendCredentialPair {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in_seconds: response.expires_in,
        }
    }
}

/// OAuth 프로바이더 토큰 엔드포인트 응답
///
/// 프로필 조회에는 `access_token` 만 사용합니다.
#[derive(Debug, Deserialize)]
pub struct ProviderTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// 인증되지 않은 요청에 대한 응답 본문
#[derive(Debug, Serialize, Deserialize)]
pub struct UnauthenticatedResponse {
    pub error: String,
    /// 이동해야 할 로그인 페이지
    pub redirect: String,
}
