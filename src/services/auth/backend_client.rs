//! 원격 가계부 백엔드 인증 교환 클라이언트
//!
//! 외부 신원을 백엔드 자격 증명 쌍으로 교환하고(`register`), 리프레시 토큰으로
//! 쌍을 회전시키며(`refresh`), 세션 보강용 프로필을 조회합니다(`fetch_profile`).
//!
//! ## 재시도 정책
//!
//! | 실패 | 재시도 | 결과 |
//! |------|--------|------|
//! | 요청 타임아웃 | O | 한도 소진 시 `Unreachable` |
//! | 5xx / 429 / 408 | O | 한도 소진 시 `Unreachable` |
//! | 그 밖의 4xx | X | `Rejected` |
//! | 연결 실패 등 기타 전송 오류 | X | `Unreachable` |
//! | 2xx 이지만 본문이 규격과 다름 | X | `Unreachable` |
//!
//! 만료되었거나 잘못된 리프레시 토큰 같은 업무 거절은 일시적인 실패가 아니므로
//! 절대 재시도하지 않습니다. 최대 재시도 횟수는 2회입니다.
//!
//! 이 클라이언트는 멱등성 검사도, 로컬 부수 효과도 없습니다. 결과를 저장하는 것은
//! 호출자의 책임입니다.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use validator::Validate;

use crate::config::BackendConfig;
use crate::domain::dto::auth::{BackendTokenResponse, RefreshRequest};
use crate::domain::models::oauth::ExternalIdentity;
use crate::domain::models::session::UserProfile;
use crate::domain::models::token::BackendCredentialPair;
use crate::errors::errors::{AppError, AppResult};
use crate::utils::fingerprint::token_fingerprint;

const REGISTER_PATH: &str = "/auth/register";
const REFRESH_PATH: &str = "/auth/refresh";
const PROFILE_PATH: &str = "/users/me/profile";

/// 교환 실패의 두 갈래
///
/// 호출자는 반드시 둘을 구분해야 합니다. `Rejected` 는 현재 시도에 대해 종결이고,
/// `Unreachable` 은 이미 재시도 예산을 모두 쓴 결과입니다.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("backend unreachable: {0}")]
    Unreachable(String),
}

impl ExchangeError {
    /// 로그인 콜백에서의 에러 분류
    pub fn into_sign_in_error(self) -> AppError {
        match self {
            ExchangeError::Rejected { .. } => AppError::IdentityExchangeRejected(self.to_string()),
            ExchangeError::Unreachable(_) => AppError::IdentityExchangeUnreachable(self.to_string()),
        }
    }

    /// 세션 리프레시에서의 에러 분류
    pub fn into_refresh_error(self) -> AppError {
        match self {
            ExchangeError::Rejected { .. } => AppError::RefreshRejected(self.to_string()),
            ExchangeError::Unreachable(_) => AppError::RefreshUnreachable(self.to_string()),
        }
    }
}

/// 백엔드 인증 API 추상화
///
/// 세션 계층은 이 trait 에만 의존하므로 테스트에서는 가짜 구현을 주입합니다.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// 외부 신원으로 가입 또는 로그인합니다. (백엔드가 멱등 처리)
    async fn register(&self, identity: &ExternalIdentity) -> Result<BackendCredentialPair, ExchangeError>;

    /// 리프레시 토큰으로 새 자격 증명 쌍을 받습니다. 두 토큰 모두 회전됩니다.
    async fn refresh(&self, refresh_token: &str) -> Result<BackendCredentialPair, ExchangeError>;

    /// 현재 액세스 토큰으로 사용자 프로필을 조회합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ProfileFetchFailed` - 모든 실패 (soft fail)
    async fn fetch_profile(&self, access_token: &str) -> AppResult<UserProfile>;
}

/// 유한 재시도 정책 (선형 백오프)
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            max_retries: config.max_retries.min(BackendConfig::MAX_RETRIES_CAP),
            base_delay: config.retry_base_delay,
        }
    }

    /// 5xx, 429, 408 만 일시적 실패로 봅니다.
    pub fn is_retriable_status(status: StatusCode) -> bool {
        status.is_server_error()
            || status == StatusCode::TOO_MANY_REQUESTS
            || status == StatusCode::REQUEST_TIMEOUT
    }

    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }
}

/// `reqwest` 기반 [`AuthBackend`] 구현
pub struct BackendAuthClient {
    http: reqwest::Client,
    config: BackendConfig,
    retry: RetryPolicy,
}

impl BackendAuthClient {
    /// # Errors
    ///
    /// * `AppError::ConfigError` - HTTP 클라이언트 생성 실패
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("백엔드 HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            http,
            config: config.clone(),
            retry: RetryPolicy::from_config(config),
        })
    }

    async fn post_for_credentials<B>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<BackendCredentialPair, ExchangeError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.config.endpoint(path);
        let max_attempts = self.retry.max_retries + 1;
        let overall_start = Instant::now();
        let mut retries = 0;

        loop {
            let attempt_start = Instant::now();
            debug!("[BACKEND] POST {} (attempt {}/{})", url, retries + 1, max_attempts);

            // 재시도 가능한 실패는 사유만 남기고 아래에서 한도를 확인한다
            let transient = match self.http.post(&url).json(body).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(
                        "[BACKEND] {} 성공: status={} duration_ms={}",
                        path,
                        response.status(),
                        attempt_start.elapsed().as_millis()
                    );
                    return parse_credentials(response).await;
                }
                Ok(response) => {
                    let status = response.status();
                    let message = error_message(response).await;

                    if !RetryPolicy::is_retriable_status(status) {
                        warn!("[BACKEND] {} 거절: status={} message=\"{}\"", path, status, message);
                        return Err(ExchangeError::Rejected {
                            status: status.as_u16(),
                            message,
                        });
                    }
                    format!("status {} ({})", status.as_u16(), message)
                }
                Err(e) if e.is_timeout() => format!("timeout: {}", e),
                Err(e) => {
                    warn!("[BACKEND] {} 전송 실패: {}", path, e);
                    return Err(ExchangeError::Unreachable(e.to_string()));
                }
            };

            if retries >= self.retry.max_retries {
                warn!(
                    "[BACKEND] {} 재시도 한도 소진: {} total_ms={}",
                    path,
                    transient,
                    overall_start.elapsed().as_millis()
                );
                return Err(ExchangeError::Unreachable(format!(
                    "{} after {} attempts",
                    transient, max_attempts
                )));
            }

            retries += 1;
            warn!(
                "[BACKEND] {} 일시적 실패 (attempt {}/{}): {}",
                path, retries, max_attempts, transient
            );
            tokio::time::sleep(self.retry.delay_for(retries)).await;
        }
    }
}

#[async_trait]
impl AuthBackend for BackendAuthClient {
    async fn register(&self, identity: &ExternalIdentity) -> Result<BackendCredentialPair, ExchangeError> {
        log::info!("🔁 백엔드 신원 교환: provider={}", identity.provider.as_str());
        self.post_for_credentials(REGISTER_PATH, identity).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<BackendCredentialPair, ExchangeError> {
        log::info!("🔄 백엔드 토큰 갱신: refresh={}", token_fingerprint(refresh_token));
        self.post_for_credentials(REFRESH_PATH, &RefreshRequest { refresh_token })
            .await
    }

    async fn fetch_profile(&self, access_token: &str) -> AppResult<UserProfile> {
        let url = self.config.endpoint(PROFILE_PATH);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ProfileFetchFailed(format!("프로필 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ProfileFetchFailed(format!(
                "프로필 조회 실패: status {}",
                response.status().as_u16()
            )));
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| AppError::ProfileFetchFailed(format!("프로필 응답 파싱 실패: {}", e)))
    }
}

async fn parse_credentials(response: reqwest::Response) -> Result<BackendCredentialPair, ExchangeError> {
    let body = response
        .json::<BackendTokenResponse>()
        .await
        .map_err(|e| ExchangeError::Unreachable(format!("malformed token response: {}", e)))?;

    body.validate()
        .map_err(|e| ExchangeError::Unreachable(format!("invalid token response: {}", e)))?;

    Ok(body.into())
}

/// 에러 본문에서 `message` 또는 `error` 필드를 꺼내고, 없으면 원문을 자릅니다.
async fn error_message(response: reqwest::Response) -> String {
    let text = response.text().await.unwrap_or_default();

    let from_json = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(|field| field.as_str())
                .map(str::to_string)
        });

    from_json.unwrap_or_else(|| text.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthProvider;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token_body(access: &str, refresh: &str, expires_in: i64) -> serde_json::Value {
        json!({"accessToken": access, "refreshToken": refresh, "expiresIn": expires_in})
    }

    fn client_for(server: &MockServer) -> BackendAuthClient {
        let mut config = BackendConfig::with_base_url(&server.uri());
        config.retry_base_delay = Duration::from_millis(1);
        config.timeout = Duration::from_millis(300);
        BackendAuthClient::new(&config).unwrap()
    }

    fn identity() -> ExternalIdentity {
        ExternalIdentity {
            provider: AuthProvider::Google,
            provider_id: "g-123".to_string(),
            email: Some("user@gmail.com".to_string()),
            name: None,
            image: None,
        }
    }

    #[test]
    fn test_retriable_statuses() {
        assert!(RetryPolicy::is_retriable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(RetryPolicy::is_retriable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(RetryPolicy::is_retriable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(RetryPolicy::is_retriable_status(StatusCode::REQUEST_TIMEOUT));
        assert!(!RetryPolicy::is_retriable_status(StatusCode::UNAUTHORIZED));
        assert!(!RetryPolicy::is_retriable_status(StatusCode::BAD_REQUEST));
        assert!(!RetryPolicy::is_retriable_status(StatusCode::CONFLICT));
    }

    #[test]
    fn test_retry_policy_is_capped() {
        let mut config = BackendConfig::with_base_url("http://localhost");
        config.max_retries = 10;
        assert_eq!(RetryPolicy::from_config(&config).max_retries, 2);
    }

    #[test]
    fn test_exchange_error_classification() {
        let rejected = ExchangeError::Rejected { status: 401, message: "expired".to_string() };
        assert!(matches!(rejected.clone().into_refresh_error(), AppError::RefreshRejected(_)));
        assert!(matches!(rejected.into_sign_in_error(), AppError::IdentityExchangeRejected(_)));

        let unreachable = ExchangeError::Unreachable("timeout".to_string());
        assert!(matches!(unreachable.into_refresh_error(), AppError::RefreshUnreachable(_)));
    }

    #[tokio::test]
    async fn test_register_posts_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(json!({
                "provider": "GOOGLE",
                "providerId": "g-123",
                "email": "user@gmail.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a1", "r1", 86400)))
            .expect(1)
            .mount(&server)
            .await;

        let pair = client_for(&server).register(&identity()).await.unwrap();

        assert_eq!(pair.access_token, "a1");
        assert_eq!(pair.refresh_token, "r1");
        assert_eq!(pair.expires_in_seconds, 86400);
    }

    #[tokio::test]
    async fn test_refresh_retries_transient_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .with_priority(1)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({"refreshToken": "r-old"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a2", "r2", 3600)))
            .expect(1)
            .mount(&server)
            .await;

        let pair = client_for(&server).refresh("r-old").await.unwrap();
        assert_eq!(pair.refresh_token, "r2");
    }

    #[tokio::test]
    async fn test_refresh_rejection_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "refresh token expired"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).refresh("r-expired").await.unwrap_err();
        assert_eq!(
            err,
            ExchangeError::Rejected {
                status: 401,
                message: "refresh token expired".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_retries_exhausted_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let err = client_for(&server).refresh("r").await.unwrap_err();
        assert!(matches!(err, ExchangeError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_retried_then_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(token_body("a", "r", 60))
                    .set_delay(Duration::from_secs(2)),
            )
            .expect(3)
            .mount(&server)
            .await;

        let err = client_for(&server).register(&identity()).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Unreachable(ref msg) if msg.contains("timeout")));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "x"})))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).register(&identity()).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_fetch_profile_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me/profile"))
            .and(header("authorization", "Bearer a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timezone": "Asia/Seoul",
                "language": "ko",
                "currency": "KRW",
                "defaultFamilyUuid": "fam-1"
            })))
            .mount(&server)
            .await;

        let profile = client_for(&server).fetch_profile("a1").await.unwrap();
        assert_eq!(profile.default_family_uuid.as_deref(), Some("fam-1"));
    }

    #[tokio::test]
    async fn test_fetch_profile_failure_is_soft_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me/profile"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_profile("a1").await.unwrap_err();
        assert!(matches!(err, AppError::ProfileFetchFailed(_)));
    }
}
