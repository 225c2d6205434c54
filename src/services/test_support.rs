//! 서비스 단위 테스트용 가짜 백엔드와 토큰 헬퍼

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::config::{BackendTokenConfig, CookieConfig, Environment, SessionConfig};
use crate::domain::models::oauth::ExternalIdentity;
use crate::domain::models::session::UserProfile;
use crate::domain::models::token::{BackendCredentialPair, BackendTokenClaims};
use crate::errors::errors::{AppError, AppResult};
use crate::services::auth::backend_client::{AuthBackend, ExchangeError};
use crate::services::auth::backend_token_verifier::BackendTokenVerifier;
use crate::services::session::session_codec::SessionTokenCodec;
use crate::services::session::session_cookie::SessionCookie;
use crate::services::session::session_issuer::SessionIssuer;
use crate::services::session::token_store::TokenStore;

pub const BACKEND_SECRET: &[u8] = b"backend-hmac-secret-for-tests";
pub const SESSION_SECRET: &str = "session-secret-for-unit-tests-000";

/// 백엔드가 서명한 것과 같은 액세스 토큰
pub fn backend_access_token(sub: &str, ttl: Duration) -> String {
    let claims = BackendTokenClaims {
        sub: sub.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
        iat: Some(Utc::now().timestamp()),
        iss: None,
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(BACKEND_SECRET))
        .expect("test token")
}

pub fn credential_pair(sub: &str, refresh_token: &str, expires_in: i64) -> BackendCredentialPair {
    BackendCredentialPair {
        access_token: backend_access_token(sub, Duration::seconds(expires_in)),
        refresh_token: refresh_token.to_string(),
        expires_in_seconds: expires_in,
    }
}

pub fn codec() -> Arc<SessionTokenCodec> {
    Arc::new(SessionTokenCodec::new(&SessionConfig::new(SESSION_SECRET.to_string(), 30).unwrap()).unwrap())
}

pub fn issuer() -> SessionIssuer {
    let cookies = CookieConfig::for_environment(&Environment::Test);
    SessionIssuer::new(
        Arc::new(BackendTokenVerifier::new(&BackendTokenConfig::hmac(Algorithm::HS256, BACKEND_SECRET)).unwrap()),
        codec(),
        TokenStore::new(cookies.clone()),
        SessionCookie::new(cookies),
    )
}

/// 호출 횟수를 세는 가짜 백엔드
pub struct FakeBackend {
    register_result: Result<BackendCredentialPair, ExchangeError>,
    refresh_result: Result<BackendCredentialPair, ExchangeError>,
    profile_result: Result<UserProfile, String>,
    pub register_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            register_result: Err(ExchangeError::Unreachable("not configured".to_string())),
            refresh_result: Err(ExchangeError::Unreachable("not configured".to_string())),
            profile_result: Err("not configured".to_string()),
            register_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_register(mut self, result: Result<BackendCredentialPair, ExchangeError>) -> Self {
        self.register_result = result;
        self
    }

    pub fn with_refresh(mut self, result: Result<BackendCredentialPair, ExchangeError>) -> Self {
        self.refresh_result = result;
        self
    }

    pub fn with_profile(mut self, result: Result<UserProfile, String>) -> Self {
        self.profile_result = result;
        self
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn register(&self, _identity: &ExternalIdentity) -> Result<BackendCredentialPair, ExchangeError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.register_result.clone()
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<BackendCredentialPair, ExchangeError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_result.clone()
    }

    async fn fetch_profile(&self, _access_token: &str) -> AppResult<UserProfile> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.profile_result.clone().map_err(AppError::ProfileFetchFailed)
    }
}
