//! 카카오 로그인 사용자 정보 모델

use serde::Deserialize;

use crate::config::AuthProvider;
use crate::domain::models::oauth::{ExternalIdentity, OAuthProfile};
use crate::utils::string_utils::{clean_optional_string, deserialize_optional_string};

/// `GET https://kapi.kakao.com/v2/user/me` 응답
///
/// 회원번호 `id` 는 숫자로 내려옵니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KakaoProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub kakao_account: KakaoAccount,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KakaoAccount {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default)]
    pub profile: KakaoAccountProfile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KakaoAccountProfile {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub profile_image_url: Option<String>,
}

impl OAuthProfile for KakaoProfile {
    fn normalize(self) -> ExternalIdentity {
        let account = self.kakao_account;
        ExternalIdentity {
            provider: AuthProvider::Kakao,
            provider_id: self.id.map(|id| id.to_string()).unwrap_or_default(),
            email: clean_optional_string(account.email),
            name: clean_optional_string(account.profile.nickname),
            image: clean_optional_string(account.profile.profile_image_url),
        }
    }
}
