use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /auth/refresh` 요청 본문
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// `GET /api/auth/signin/{provider}` 쿼리
#[derive(Debug, Default, Deserialize)]
pub struct SignInQuery {
    /// 로그인 완료 후 돌아갈 상대 경로
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// OAuth 콜백 쿼리
///
/// 프로바이더가 `error` 를 돌려준 경우 `code` 와 `state` 가 없을 수 있으므로
/// 검증은 `error` 확인 이후에 수행합니다.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct OAuthCallbackQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "Authorization code가 필요합니다"))]
    pub code: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "State가 필요합니다"))]
    pub state: String,

    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_request_body() {
        let body = serde_json::to_value(RefreshRequest { refresh_token: "r-1" }).unwrap();
        assert_eq!(body, serde_json::json!({"refreshToken": "r-1"}));
    }

    #[test]
    fn test_callback_query_validation() {
        let query = OAuthCallbackQuery {
            code: "code".to_string(),
            state: String::new(),
            ..Default::default()
        };
        assert!(query.validate().is_err());

        let query = OAuthCallbackQuery {
            code: "code".to_string(),
            state: "state".to_string(),
            ..Default::default()
        };
        assert!(query.validate().is_ok());
    }
}
