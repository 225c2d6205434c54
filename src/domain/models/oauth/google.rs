//! Google OAuth 사용자 정보 모델
//!
//! OpenID Connect userinfo (`sub`) 와 레거시 v2 userinfo (`id`) 응답을 모두 받습니다.

use serde::Deserialize;

use crate::config::AuthProvider;
use crate::domain::models::oauth::{ExternalIdentity, OAuthProfile};
use crate::utils::string_utils::{clean_optional_string, deserialize_optional_string};

/// Google userinfo 응답
///
/// ```json
/// {
///   "sub": "110169484474386276334",
///   "email": "user@gmail.com",
///   "name": "홍길동",
///   "picture": "https://lh3.googleusercontent.com/a/..."
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleProfile {
    /// OIDC 주체 식별자
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub sub: Option<String>,
    /// v2 userinfo 의 사용자 ID
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub picture: Option<String>,
}

impl OAuthProfile for GoogleProfile {
    fn normalize(self) -> ExternalIdentity {
        ExternalIdentity {
            provider: AuthProvider::Google,
            provider_id: self.sub.or(self.id).unwrap_or_default(),
            email: clean_optional_string(self.email),
            name: clean_optional_string(self.name),
            image: clean_optional_string(self.picture),
        }
    }
}
