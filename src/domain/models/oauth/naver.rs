//! 네이버 로그인 사용자 정보 모델
//!
//! 네이버 프로필 API 는 실제 값을 `response` 객체 안에 감싸서 돌려줍니다.

use serde::Deserialize;

use crate::config::AuthProvider;
use crate::domain::models::oauth::{ExternalIdentity, OAuthProfile};
use crate::utils::string_utils::{clean_optional_string, deserialize_optional_string};

/// `GET https://openapi.naver.com/v1/nid/me` 응답
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NaverProfile {
    #[serde(default)]
    pub resultcode: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response: NaverProfileBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NaverProfileBody {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub profile_image: Option<String>,
}

impl OAuthProfile for NaverProfile {
    fn normalize(self) -> ExternalIdentity {
        let body = self.response;
        ExternalIdentity {
            provider: AuthProvider::Naver,
            provider_id: body.id.unwrap_or_default(),
            email: clean_optional_string(body.email),
            // 실명 동의가 없으면 별명을 사용
            name: clean_optional_string(body.name).or_else(|| clean_optional_string(body.nickname)),
            image: clean_optional_string(body.profile_image),
        }
    }
}
