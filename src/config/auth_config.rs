//! # Authentication Configuration Module
//!
//! OAuth 프로바이더, 세션 토큰, 백엔드 토큰 검증, 쿠키 등 인증 관련 설정을 관리하는 모듈입니다.
//!
//! ## 두 개의 서명 주체
//!
//! 이 게이트웨이는 서로 독립된 두 종류의 토큰을 다룹니다.
//!
//! | 토큰 | 서명 주체 | 알고리즘 | 설정 |
//! |------|-----------|----------|------|
//! | 세션 토큰 | 이 게이트웨이 | HS512 | [`SessionConfig`] |
//! | 백엔드 액세스 토큰 | 원격 백엔드 | HS256 (기본) / RS256 | [`BackendTokenConfig`] |
//!
//! 두 키는 절대 공유하지 않습니다. 백엔드 HMAC 키가 세션 시크릿과 같으면 기동이 거부됩니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ```bash
//! export SESSION_SECRET="at-least-32-characters-long-secret-value"
//! export BACKEND_JWT_SECRET="backend-shared-hmac-secret"
//! export GOOGLE_CLIENT_ID="your-google-client-id"
//! export GOOGLE_CLIENT_SECRET="your-google-client-secret"
//! export GOOGLE_REDIRECT_URI="http://localhost:8080/api/auth/callback/google"
//! ```

use std::str::FromStr;

use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::{Cookie, SameSite};
use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use jsonwebtoken::Algorithm;

use crate::config::data_config::{parse_or, EnvLookup, Environment};
use crate::errors::errors::{AppError, AppResult};

/// 세션 시크릿의 최소 길이 (문자 수)
pub const SESSION_SECRET_MIN_CHARS: usize = 32;

/// 세션 토큰 만료 기간 상한 (일)
pub const SESSION_MAX_AGE_DAYS_LIMIT: i64 = 3650;

/// OAuth state 쿠키 유효 기간 상한 (분)
pub const OAUTH_STATE_TIMEOUT_MINUTES_LIMIT: i64 = 1440;

/// 세션 토큰 서명 설정
///
/// 설정된 시크릿은 [`crate::services::session::secret_key`] 에서
/// HS512 가 요구하는 64바이트 키로 확장됩니다.
#[derive(Clone)]
pub struct SessionConfig {
    /// 원본 시크릿 (최소 32자)
    pub secret: String,
    /// 세션 토큰 절대 만료 기간 (일). 백엔드 토큰 만료와 무관합니다.
    pub max_age_days: i64,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"[REDACTED]")
            .field("max_age_days", &self.max_age_days)
            .finish()
    }
}

impl SessionConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> AppResult<Self> {
        let secret = lookup("SESSION_SECRET")
            .ok_or_else(|| AppError::ConfigError("SESSION_SECRET must be set".to_string()))?;

        Self::new(secret, parse_or(lookup, "SESSION_MAX_AGE_DAYS", 30))
    }

    pub fn new(secret: String, max_age_days: i64) -> AppResult<Self> {
        if secret.chars().count() < SESSION_SECRET_MIN_CHARS {
            return Err(AppError::ConfigError(format!(
                "SESSION_SECRET must be at least {} characters",
                SESSION_SECRET_MIN_CHARS
            )));
        }
        if !(1..=SESSION_MAX_AGE_DAYS_LIMIT).contains(&max_age_days) {
            return Err(AppError::ConfigError(format!(
                "SESSION_MAX_AGE_DAYS must be between 1 and {}",
                SESSION_MAX_AGE_DAYS_LIMIT
            )));
        }

        Ok(Self { secret, max_age_days })
    }
}

/// 백엔드 토큰 검증 키
#[derive(Clone)]
pub enum BackendKeyMaterial {
    /// HMAC 공유 비밀키 (디코딩된 바이트)
    Hmac(Vec<u8>),
    /// RSA 공개키 PEM
    RsaPublicPem(String),
}

impl std::fmt::Debug for BackendKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKeyMaterial::Hmac(bytes) => write!(f, "Hmac({} bytes)", bytes.len()),
            BackendKeyMaterial::RsaPublicPem(_) => write!(f, "RsaPublicPem"),
        }
    }
}

/// 백엔드가 발급한 액세스 토큰 검증 설정
///
/// # Environment Variables
///
/// ```bash
/// export BACKEND_JWT_ALGORITHM="HS256"            # HS256/HS384/HS512/RS256/RS384/RS512
/// export BACKEND_JWT_SECRET="..."                 # HMAC 계열
/// export BACKEND_JWT_SECRET_ENCODING="base64"     # raw(기본) 또는 base64
/// export BACKEND_JWT_PUBLIC_KEY_PATH="./secrets/backend_public_key.pem"  # RSA 계열
/// export BACKEND_JWT_ISSUER="budget-backend"      # 선택
/// ```
#[derive(Debug, Clone)]
pub struct BackendTokenConfig {
    pub algorithm: Algorithm,
    pub key: BackendKeyMaterial,
    pub issuer: Option<String>,
    pub leeway_seconds: u64,
}

impl BackendTokenConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> AppResult<Self> {
        let algorithm_name = lookup("BACKEND_JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string());
        let algorithm = Algorithm::from_str(algorithm_name.trim()).map_err(|_| {
            AppError::ConfigError(format!("Unsupported BACKEND_JWT_ALGORITHM: {}", algorithm_name))
        })?;

        let key = match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                let secret = lookup("BACKEND_JWT_SECRET").ok_or_else(|| {
                    AppError::ConfigError("BACKEND_JWT_SECRET must be set".to_string())
                })?;
                let encoding = lookup("BACKEND_JWT_SECRET_ENCODING").unwrap_or_else(|| "raw".to_string());
                BackendKeyMaterial::Hmac(decode_backend_secret(&secret, &encoding)?)
            }
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                let path = lookup("BACKEND_JWT_PUBLIC_KEY_PATH").ok_or_else(|| {
                    AppError::ConfigError("BACKEND_JWT_PUBLIC_KEY_PATH must be set".to_string())
                })?;
                let pem = std::fs::read_to_string(&path).map_err(|e| {
                    AppError::ConfigError(format!("Failed to read public key file '{}': {}", path, e))
                })?;
                BackendKeyMaterial::RsaPublicPem(pem)
            }
            other => {
                return Err(AppError::ConfigError(format!(
                    "Unsupported BACKEND_JWT_ALGORITHM: {:?}",
                    other
                )));
            }
        };

        Ok(Self {
            algorithm,
            key,
            issuer: lookup("BACKEND_JWT_ISSUER").filter(|issuer| !issuer.trim().is_empty()),
            leeway_seconds: parse_or(lookup, "BACKEND_JWT_LEEWAY_SECONDS", 0),
        })
    }

    /// HMAC 백엔드 키 구성 (테스트 및 로컬 실행용)
    pub fn hmac(algorithm: Algorithm, secret: &[u8]) -> Self {
        Self {
            algorithm,
            key: BackendKeyMaterial::Hmac(secret.to_vec()),
            issuer: None,
            leeway_seconds: 0,
        }
    }
}

/// 백엔드 시크릿을 인코딩 방식(`raw` | `base64`)에 맞게 디코딩합니다.
pub fn decode_backend_secret(secret: &str, encoding: &str) -> AppResult<Vec<u8>> {
    let bytes = match encoding.trim().to_lowercase().as_str() {
        "raw" => secret.as_bytes().to_vec(),
        "base64" => general_purpose::STANDARD
            .decode(secret.trim())
            .map_err(|e| AppError::ConfigError(format!("BACKEND_JWT_SECRET is not valid base64: {}", e)))?,
        other => {
            return Err(AppError::ConfigError(format!(
                "Unsupported BACKEND_JWT_SECRET_ENCODING: {}",
                other
            )));
        }
    };

    if bytes.is_empty() {
        return Err(AppError::ConfigError("BACKEND_JWT_SECRET must not be empty".to_string()));
    }
    Ok(bytes)
}

/// 인증 쿠키 공통 속성
///
/// 모든 인증 쿠키는 `HttpOnly`, `SameSite=Lax`, `Path=/` 이며
/// `Secure` 는 프로덕션 환경에서만 켜집니다.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub secure: bool,
    pub path: String,
    pub same_site: SameSite,
}

impl CookieConfig {
    pub fn for_environment(environment: &Environment) -> Self {
        Self {
            secure: environment.is_production(),
            path: "/".to_string(),
            same_site: SameSite::Lax,
        }
    }

    /// 명시적 만료 시각을 가진 인증 쿠키를 생성합니다.
    pub fn build_cookie(&self, name: &str, value: &str, expires_at: DateTime<Utc>) -> Cookie<'static> {
        Cookie::build(name.to_string(), value.to_string())
            .path(self.path.clone())
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .expires(to_offset_datetime(expires_at))
            .finish()
    }

    /// 삭제용 쿠키 템플릿 (이름과 경로만 일치하면 됩니다)
    pub fn removal_cookie(&self, name: &str) -> Cookie<'static> {
        Cookie::build(name.to_string(), "")
            .path(self.path.clone())
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .finish()
    }
}

fn to_offset_datetime(at: DateTime<Utc>) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(at.timestamp()).unwrap_or_else(|_| {
        log::warn!(
            "쿠키 만료 시각 {} 이 OffsetDateTime 범위를 벗어났습니다. 24시간 후로 대체합니다",
            at.timestamp()
        );
        OffsetDateTime::now_utc() + actix_web::cookie::time::Duration::hours(24)
    })
}

/// 지원하는 OAuth 인증 공급자
///
/// 백엔드와의 통신에서는 대문자(`GOOGLE`, `NAVER`, `KAKAO`)로 직렬화되고,
/// URL 경로에서는 소문자(`/api/auth/signin/google`)로 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProvider {
    /// Google OAuth 2.0 / OpenID Connect
    Google,
    /// 네이버 로그인
    Naver,
    /// 카카오 로그인
    Kakao,
}

impl AuthProvider {
    pub const ALL: [AuthProvider; 3] = [AuthProvider::Google, AuthProvider::Naver, AuthProvider::Kakao];

    /// 문자열에서 AuthProvider를 생성합니다. (대소문자 무관)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "google" => Ok(AuthProvider::Google),
            "naver" => Ok(AuthProvider::Naver),
            "kakao" => Ok(AuthProvider::Kakao),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }

    /// URL 경로 및 로깅에 사용하는 소문자 표현
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
            AuthProvider::Naver => "naver",
            AuthProvider::Kakao => "kakao",
        }
    }

    fn env_prefix(&self) -> &'static str {
        match self {
            AuthProvider::Google => "GOOGLE",
            AuthProvider::Naver => "NAVER",
            AuthProvider::Kakao => "KAKAO",
        }
    }

    fn default_endpoints(&self) -> (&'static str, &'static str, &'static str, &'static str) {
        // (auth_uri, token_uri, userinfo_uri, scope)
        match self {
            AuthProvider::Google => (
                "https://accounts.google.com/o/oauth2/v2/auth",
                "https://oauth2.googleapis.com/token",
                "https://openidconnect.googleapis.com/v1/userinfo",
                "openid email profile",
            ),
            AuthProvider::Naver => (
                "https://nid.naver.com/oauth2.0/authorize",
                "https://nid.naver.com/oauth2.0/token",
                "https://openapi.naver.com/v1/nid/me",
                "",
            ),
            AuthProvider::Kakao => (
                "https://kauth.kakao.com/oauth/authorize",
                "https://kauth.kakao.com/oauth/token",
                "https://kapi.kakao.com/v2/user/me",
                "profile_nickname profile_image account_email",
            ),
        }
    }
}

/// 단일 OAuth 클라이언트 등록 정보
#[derive(Clone)]
pub struct OAuthClientConfig {
    pub provider: AuthProvider,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub userinfo_uri: String,
    pub scope: String,
}

impl std::fmt::Debug for OAuthClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClientConfig")
            .field("provider", &self.provider)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl OAuthClientConfig {
    /// `{PROVIDER}_CLIENT_ID` 가 설정된 경우에만 프로바이더를 활성화합니다.
    ///
    /// 엔드포인트는 `{PROVIDER}_AUTH_URI`, `{PROVIDER}_TOKEN_URI`, `{PROVIDER}_USERINFO_URI` 로
    /// 재정의할 수 있습니다.
    pub fn from_lookup(provider: AuthProvider, lookup: EnvLookup<'_>) -> AppResult<Option<Self>> {
        let prefix = provider.env_prefix();
        let Some(client_id) = lookup(&format!("{}_CLIENT_ID", prefix)) else {
            return Ok(None);
        };

        let client_secret = lookup(&format!("{}_CLIENT_SECRET", prefix)).ok_or_else(|| {
            AppError::ConfigError(format!("{}_CLIENT_SECRET must be set", prefix))
        })?;
        let redirect_uri = lookup(&format!("{}_REDIRECT_URI", prefix)).ok_or_else(|| {
            AppError::ConfigError(format!("{}_REDIRECT_URI must be set", prefix))
        })?;

        let (auth_uri, token_uri, userinfo_uri, scope) = provider.default_endpoints();

        Ok(Some(Self {
            provider,
            client_id,
            client_secret,
            redirect_uri,
            auth_uri: lookup(&format!("{}_AUTH_URI", prefix)).unwrap_or_else(|| auth_uri.to_string()),
            token_uri: lookup(&format!("{}_TOKEN_URI", prefix)).unwrap_or_else(|| token_uri.to_string()),
            userinfo_uri: lookup(&format!("{}_USERINFO_URI", prefix))
                .unwrap_or_else(|| userinfo_uri.to_string()),
            scope: scope.to_string(),
        }))
    }
}

/// OAuth 로그인 플로우 공통 설정
#[derive(Clone)]
pub struct OAuthConfig {
    /// CSRF state 생성용 비밀값
    pub state_secret: String,
    /// state 쿠키 유효 기간 (분)
    pub state_timeout_minutes: i64,
    /// hard fail 시 리다이렉트할 로그인 페이지 경로
    pub sign_in_page: String,
    /// 활성화된 프로바이더 목록
    pub clients: Vec<OAuthClientConfig>,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("state_timeout_minutes", &self.state_timeout_minutes)
            .field("sign_in_page", &self.sign_in_page)
            .field("clients", &self.clients)
            .finish()
    }
}

impl OAuthConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>, session_secret: &str) -> AppResult<Self> {
        let mut clients = Vec::new();
        for provider in AuthProvider::ALL {
            if let Some(client) = OAuthClientConfig::from_lookup(provider, lookup)? {
                clients.push(client);
            }
        }

        if clients.is_empty() {
            log::warn!("활성화된 OAuth 프로바이더가 없습니다. 로그인이 불가능합니다");
        }

        let state_timeout_minutes = parse_or(lookup, "OAUTH_STATE_TIMEOUT_MINUTES", 10);
        if !(1..=OAUTH_STATE_TIMEOUT_MINUTES_LIMIT).contains(&state_timeout_minutes) {
            return Err(AppError::ConfigError(format!(
                "OAUTH_STATE_TIMEOUT_MINUTES must be between 1 and {}",
                OAUTH_STATE_TIMEOUT_MINUTES_LIMIT
            )));
        }

        Ok(Self {
            state_secret: lookup("OAUTH_STATE_SECRET").unwrap_or_else(|| session_secret.to_string()),
            state_timeout_minutes,
            sign_in_page: lookup("SIGN_IN_PAGE").unwrap_or_else(|| "/signin".to_string()),
            clients,
        })
    }

    pub fn client(&self, provider: AuthProvider) -> Option<&OAuthClientConfig> {
        self.clients.iter().find(|client| client.provider == provider)
    }
}
