//! # OAuth Profile Models
//!
//! 외부 OAuth 프로바이더가 돌려주는 사용자 정보를 표준 [`ExternalIdentity`] 로 정규화합니다.
//!
//! ## 구조
//!
//! ```text
//! 프로바이더 응답 JSON
//!      │  RawProfile::from_value(provider, json)
//!      ▼
//! RawProfile::{Google, Naver, Kakao}
//!      │  OAuthProfile::normalize()
//!      ▼
//! ExternalIdentity { provider, provider_id, email, name, image }
//! ```
//!
//! 정규화는 I/O 가 없는 순수 함수입니다. 필수 식별자가 없으면 빈 `provider_id` 를
//! 돌려주며, 이를 로그인 실패로 처리하는 것은 호출자(로그인 서비스)의 몫입니다.
//! 백엔드 교환 클라이언트는 어떤 프로바이더가 만든 값인지 알 필요가 없습니다.

pub mod google;
pub mod naver;
pub mod kakao;

pub use google::GoogleProfile;
pub use kakao::KakaoProfile;
pub use naver::NaverProfile;

use serde::Serialize;
use serde_json::Value;

use crate::config::AuthProvider;
use crate::errors::errors::{AppError, AppResult};

/// 프로바이더와 무관한 표준 외부 신원
///
/// 로그인 시도마다 한 번 만들어지며 백엔드 교환 호출 이후에는 보관하지 않습니다.
/// 직렬화 형태는 그대로 `POST /auth/register` 요청 본문이 됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdentity {
    pub provider: AuthProvider,
    pub provider_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ExternalIdentity {
    pub fn has_provider_id(&self) -> bool {
        !self.provider_id.trim().is_empty()
    }
}

/// 프로바이더별 원본 프로필을 표준 신원으로 변환하는 인터페이스
pub trait OAuthProfile {
    fn normalize(self) -> ExternalIdentity;
}

/// 프로바이더 태그로 구분되는 원본 프로필 (닫힌 집합)
#[derive(Debug, Clone)]
pub enum RawProfile {
    Google(GoogleProfile),
    Naver(NaverProfile),
    Kakao(KakaoProfile),
}

impl RawProfile {
    /// 프로바이더 userinfo 응답 JSON 을 해당 프로바이더의 프로필 타입으로 해석합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ExternalServiceError` - 응답 형태가 프로바이더 규격과 맞지 않을 때
    pub fn from_value(provider: AuthProvider, value: Value) -> AppResult<Self> {
        let parsed = match provider {
            AuthProvider::Google => serde_json::from_value(value).map(RawProfile::Google),
            AuthProvider::Naver => serde_json::from_value(value).map(RawProfile::Naver),
            AuthProvider::Kakao => serde_json::from_value(value).map(RawProfile::Kakao),
        };

        parsed.map_err(|e| {
            AppError::ExternalServiceError(format!(
                "{} 사용자 정보 파싱 실패: {}",
                provider.as_str(),
                e
            ))
        })
    }

    pub fn provider(&self) -> AuthProvider {
        match self {
            RawProfile::Google(_) => AuthProvider::Google,
            RawProfile::Naver(_) => AuthProvider::Naver,
            RawProfile::Kakao(_) => AuthProvider::Kakao,
        }
    }
}

impl OAuthProfile for RawProfile {
    fn normalize(self) -> ExternalIdentity {
        match self {
            RawProfile::Google(profile) => profile.normalize(),
            RawProfile::Naver(profile) => profile.normalize(),
            RawProfile::Kakao(profile) => profile.normalize(),
        }
    }
}
