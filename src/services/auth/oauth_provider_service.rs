//! # OAuth 2.0 프로바이더 연동 서비스
//!
//! Google, 네이버, 카카오의 Authorization Code 플로우를 처리하고
//! 프로바이더별 원본 프로필([`RawProfile`])을 만들어 냅니다.
//!
//! ```text
//! 브라우저                     게이트웨이                         프로바이더
//!    │ GET /api/auth/signin/kakao   │                                  │
//!    ├─────────────────────────────►│ state 생성, oauth_state 쿠키      │
//!    │ 302 authorize?...&state=..   │                                  │
//!    │◄─────────────────────────────┤                                  │
//!    │ 사용자 동의                                                      │
//!    ├────────────────────────────────────────────────────────────────►│
//!    │ GET /api/auth/callback/kakao?code&state                         │
//!    ├─────────────────────────────►│ state 대조 (쿠키 vs 쿼리)         │
//!    │                              │ code → access_token              │
//!    │                              ├─────────────────────────────────►│
//!    │                              │ userinfo                         │
//!    │                              ├─────────────────────────────────►│
//!    │                              │ RawProfile → ExternalIdentity    │
//! ```
//!
//! ## CSRF 방지
//!
//! state 는 `sha256(uuid v4 : timestamp : OAUTH_STATE_SECRET)` 의 16진수 값이며,
//! 로그인 시작 시 `oauth_state` 쿠키로 내려 보내고 콜백에서 쿼리 값과 비교합니다.
//! 시작한 프로바이더는 `oauth_provider` 쿠키에 함께 저장되어, 다른 프로바이더의
//! 콜백에서는 같은 state 를 쓸 수 없습니다.
//! 쿠키는 한 번 읽으면 삭제되므로 같은 state 를 두 번 쓸 수 없습니다.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{AuthProvider, CookieConfig, OAuthClientConfig, OAuthConfig};
use crate::domain::dto::auth::ProviderTokenResponse;
use crate::domain::models::oauth::{ExternalIdentity, OAuthProfile, RawProfile};
use crate::errors::errors::{AppError, AppResult};
use crate::middlewares::cookie_scope::CookieScope;
use crate::utils::fingerprint::constant_time_eq;
use crate::utils::string_utils::sanitize_callback_url;

pub const STATE_COOKIE: &str = "oauth_state";
pub const CALLBACK_URL_COOKIE: &str = "oauth_callback_url";
pub const PROVIDER_COOKIE: &str = "oauth_provider";

/// 로그인 시작 시 저장해 둔 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuthorization {
    pub state: String,
    pub provider: AuthProvider,
    pub callback_url: String,
}

impl PendingAuthorization {
    /// 콜백의 프로바이더와 state 가 모두 로그인 시작 시의 값과 같은지 확인합니다.
    pub fn matches(&self, provider: AuthProvider, state: &str) -> bool {
        self.provider == provider && constant_time_eq(self.state.as_bytes(), state.as_bytes())
    }
}

pub struct OAuthProviderService {
    config: OAuthConfig,
    cookies: CookieConfig,
    http: reqwest::Client,
}

impl OAuthProviderService {
    pub fn new(config: OAuthConfig, cookies: CookieConfig, timeout: StdDuration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("OAuth HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { config, cookies, http })
    }

    pub fn sign_in_page(&self) -> &str {
        &self.config.sign_in_page
    }

    /// 활성화된 프로바이더의 클라이언트 설정
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 설정되지 않은 프로바이더
    pub fn client(&self, provider: AuthProvider) -> AppResult<&OAuthClientConfig> {
        self.config.client(provider).ok_or_else(|| {
            AppError::ValidationError(format!("활성화되지 않은 프로바이더입니다: {}", provider.as_str()))
        })
    }

    /// 예측 불가능한 state 값을 생성합니다.
    pub fn generate_state(&self) -> String {
        let data = format!(
            "{}:{}:{}",
            Uuid::new_v4(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default(),
            self.config.state_secret
        );
        format!("{:x}", Sha256::digest(data.as_bytes()))
    }

    /// 프로바이더 인가 URL
    pub fn authorization_url(&self, provider: AuthProvider, state: &str) -> AppResult<String> {
        let client = self.client(provider)?;

        let mut params = vec![
            ("client_id", client.client_id.as_str()),
            ("redirect_uri", client.redirect_uri.as_str()),
            ("response_type", "code"),
            ("state", state),
        ];
        if !client.scope.is_empty() {
            params.push(("scope", client.scope.as_str()));
        }

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!("{}?{}", client.auth_uri, query_string))
    }

    /// 로그인 시작: state 와 돌아갈 경로를 짧은 수명의 쿠키로 저장하고 인가 URL 을 돌려줍니다.
    pub fn begin(
        &self,
        scope: &CookieScope,
        provider: AuthProvider,
        callback_url: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let state = self.generate_state();
        let url = self.authorization_url(provider, &state)?;
        let callback_url = sanitize_callback_url(callback_url, "/");
        let expires_at = now
            .checked_add_signed(Duration::minutes(self.config.state_timeout_minutes))
            .ok_or_else(|| AppError::InternalError("state 쿠키 만료 시각이 범위를 벗어났습니다".to_string()))?;

        scope.set(self.cookies.build_cookie(STATE_COOKIE, &state, expires_at));
        scope.set(self.cookies.build_cookie(PROVIDER_COOKIE, provider.as_str(), expires_at));
        scope.set(self.cookies.build_cookie(
            CALLBACK_URL_COOKIE,
            &urlencoding::encode(&callback_url),
            expires_at,
        ));

        info!("🔐 {} 로그인 시작", provider.as_str());
        Ok(url)
    }

    /// 저장해 둔 state 를 꺼내고 쿠키를 삭제합니다. (1회용)
    ///
    /// state 나 프로바이더 쿠키 중 하나라도 없으면 `None` 입니다.
    pub fn take_pending(&self, scope: &CookieScope) -> Option<PendingAuthorization> {
        let state = scope.get(STATE_COOKIE);
        let provider = scope
            .get(PROVIDER_COOKIE)
            .and_then(|value| AuthProvider::from_str(&value).ok());
        let callback_url = scope
            .get(CALLBACK_URL_COOKIE)
            .and_then(|value| urlencoding::decode(&value).ok().map(|v| v.into_owned()));

        scope.remove(self.cookies.removal_cookie(STATE_COOKIE));
        scope.remove(self.cookies.removal_cookie(PROVIDER_COOKIE));
        scope.remove(self.cookies.removal_cookie(CALLBACK_URL_COOKIE));

        Some(PendingAuthorization {
            state: state?,
            provider: provider?,
            callback_url: sanitize_callback_url(callback_url.as_deref(), "/"),
        })
    }

    /// Authorization Code 를 프로바이더 액세스 토큰으로 교환합니다.
    pub async fn exchange_code(&self, provider: AuthProvider, code: &str, state: &str) -> AppResult<String> {
        let client = self.client(provider)?;

        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("redirect_uri", client.redirect_uri.as_str()),
        ];
        // 네이버는 토큰 요청에도 state 를 요구
        if provider == AuthProvider::Naver {
            params.push(("state", state));
        }

        let response = self
            .http
            .post(&client.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("{} 토큰 요청 실패: {}", provider.as_str(), e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 토큰 교환 실패: {}",
                provider.as_str(),
                error_text
            )));
        }

        let token = response.json::<ProviderTokenResponse>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("{} 토큰 응답 파싱 실패: {}", provider.as_str(), e))
        })?;

        debug!("{} 토큰 교환 완료 (type={:?})", provider.as_str(), token.token_type);
        Ok(token.access_token)
    }

    /// userinfo 엔드포인트에서 원본 프로필을 가져옵니다.
    pub async fn fetch_raw_profile(&self, provider: AuthProvider, access_token: &str) -> AppResult<RawProfile> {
        let client = self.client(provider)?;

        let response = self
            .http
            .get(&client.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("{} 사용자 정보 요청 실패: {}", provider.as_str(), e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 사용자 정보 조회 실패: {}",
                provider.as_str(),
                error_text
            )));
        }

        let value = response.json::<serde_json::Value>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("{} 사용자 정보 파싱 실패: {}", provider.as_str(), e))
        })?;

        let raw = RawProfile::from_value(provider, value)?;
        if let RawProfile::Naver(profile) = &raw {
            if let Some(code) = profile.resultcode.as_deref().filter(|code| *code != "00") {
                return Err(AppError::ExternalServiceError(format!(
                    "naver 사용자 정보 조회 실패: {} {}",
                    code,
                    profile.message.as_deref().unwrap_or_default()
                )));
            }
        }
        Ok(raw)
    }

    /// code → 토큰 → 프로필 → 정규화
    pub async fn fetch_identity(&self, provider: AuthProvider, code: &str, state: &str) -> AppResult<ExternalIdentity> {
        let access_token = self.exchange_code(provider, code, state).await?;
        let raw = self.fetch_raw_profile(provider, &access_token).await?;
        Ok(raw.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use actix_web::cookie::Cookie;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_config(provider: AuthProvider, base: &str) -> OAuthClientConfig {
        OAuthClientConfig {
            provider,
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://localhost:8080/api/auth/callback/kakao".to_string(),
            auth_uri: format!("{}/authorize", base),
            token_uri: format!("{}/token", base),
            userinfo_uri: format!("{}/userinfo", base),
            scope: "profile_nickname account_email".to_string(),
        }
    }

    fn service(clients: Vec<OAuthClientConfig>) -> OAuthProviderService {
        let config = OAuthConfig {
            state_secret: "state-secret".to_string(),
            state_timeout_minutes: 10,
            sign_in_page: "/signin".to_string(),
            clients,
        };
        OAuthProviderService::new(
            config,
            CookieConfig::for_environment(&Environment::Test),
            StdDuration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_states_are_unique_hex() {
        let service = service(vec![]);
        let a = service.generate_state();
        let b = service.generate_state();

        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_authorization_url() {
        let service = service(vec![client_config(AuthProvider::Kakao, "https://kauth.example.com")]);
        let url = service.authorization_url(AuthProvider::Kakao, "abc").unwrap();

        assert!(url.starts_with("https://kauth.example.com/authorize?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=abc"));
        assert!(url.contains("scope=profile_nickname%20account_email"));
    }

    #[test]
    fn test_disabled_provider_is_rejected() {
        let service = service(vec![]);
        assert!(matches!(
            service.authorization_url(AuthProvider::Google, "abc"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_pending_authorization_round_trip() {
        let service = service(vec![client_config(AuthProvider::Kakao, "https://kauth.example.com")]);
        let scope = CookieScope::new();

        let url = service
            .begin(&scope, AuthProvider::Kakao, Some("/families/1?tab=members"), Utc::now())
            .unwrap();
        let state = scope.get(STATE_COOKIE).unwrap();
        assert!(url.contains(&state));

        // 다음 요청: 브라우저가 쿠키를 돌려보냄
        let callback = CookieScope::from_cookies(
            scope.pending().into_iter().map(|c| Cookie::new(c.name().to_string(), c.value().to_string())),
        );
        let pending = service.take_pending(&callback).unwrap();

        assert_eq!(pending.state, state);
        assert_eq!(pending.provider, AuthProvider::Kakao);
        assert_eq!(pending.callback_url, "/families/1?tab=members");
        assert!(callback.get(STATE_COOKIE).is_none());
        assert!(callback.get(PROVIDER_COOKIE).is_none());
    }

    #[test]
    fn test_pending_authorization_is_bound_to_provider() {
        let pending = PendingAuthorization {
            state: "state-1".to_string(),
            provider: AuthProvider::Google,
            callback_url: "/".to_string(),
        };

        assert!(pending.matches(AuthProvider::Google, "state-1"));
        assert!(!pending.matches(AuthProvider::Naver, "state-1"));
        assert!(!pending.matches(AuthProvider::Google, "state-2"));
    }

    #[test]
    fn test_pending_without_provider_cookie_is_none() {
        let service = service(vec![]);
        let scope = CookieScope::from_cookies(vec![Cookie::new(STATE_COOKIE, "state-1")]);

        assert!(service.take_pending(&scope).is_none());
        assert!(scope.get(STATE_COOKIE).is_none());
    }

    #[test]
    fn test_external_callback_url_is_replaced() {
        let service = service(vec![client_config(AuthProvider::Kakao, "https://kauth.example.com")]);
        let scope = CookieScope::new();

        service
            .begin(&scope, AuthProvider::Kakao, Some("https://evil.example.com"), Utc::now())
            .unwrap();
        let callback = CookieScope::from_cookies(
            scope.pending().into_iter().map(|c| Cookie::new(c.name().to_string(), c.value().to_string())),
        );

        assert_eq!(service.take_pending(&callback).unwrap().callback_url, "/");
    }

    #[tokio::test]
    async fn test_fetch_identity_for_kakao() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("code=auth-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "provider-token",
                "token_type": "bearer",
                "expires_in": 21599
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer provider-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 4242,
                "kakao_account": {
                    "email": "mom@example.com",
                    "profile": {"nickname": "엄마", "profile_image_url": "https://img/k.png"}
                }
            })))
            .mount(&server)
            .await;

        let service = service(vec![client_config(AuthProvider::Kakao, &server.uri())]);
        let identity = service
            .fetch_identity(AuthProvider::Kakao, "auth-code", "state")
            .await
            .unwrap();

        assert_eq!(identity.provider, AuthProvider::Kakao);
        assert_eq!(identity.provider_id, "4242");
        assert_eq!(identity.name.as_deref(), Some("엄마"));
    }

    #[tokio::test]
    async fn test_naver_token_request_carries_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("state=naver-state"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
            .expect(1)
            .mount(&server)
            .await;

        let service = service(vec![client_config(AuthProvider::Naver, &server.uri())]);
        let token = service
            .exchange_code(AuthProvider::Naver, "code", "naver-state")
            .await
            .unwrap();

        assert_eq!(token, "t");
    }

    #[tokio::test]
    async fn test_naver_error_resultcode_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resultcode": "024",
                "message": "Authentication failed"
            })))
            .mount(&server)
            .await;

        let service = service(vec![client_config(AuthProvider::Naver, &server.uri())]);
        let result = service.fetch_raw_profile(AuthProvider::Naver, "t").await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[tokio::test]
    async fn test_token_endpoint_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
            .mount(&server)
            .await;

        let service = service(vec![client_config(AuthProvider::Google, &server.uri())]);
        let result = service.exchange_code(AuthProvider::Google, "bad", "s").await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }
}
