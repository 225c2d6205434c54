use serde::{Deserialize, Serialize};

/// 가계부 사용자 프로필
///
/// `GET /users/me/profile` 응답 형태와 같습니다.
/// 조회에 실패하면 [`UserProfile::default`] 가 대신 사용됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub timezone: String,
    pub language: String,
    pub currency: String,
    #[serde(default)]
    pub default_family_uuid: Option<String>,
}

impl Default for UserProfile {
    /// `{Asia/Seoul, ko, KRW, null}`
    fn default() -> Self {
        Self {
            timezone: "Asia/Seoul".to_string(),
            language: "ko".to_string(),
            currency: "KRW".to_string(),
            default_family_uuid: None,
        }
    }
}

/// 세션에 붙은 프로필의 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSource {
    Backend,
    Default,
}
