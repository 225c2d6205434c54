//! 최상위 애플리케이션 설정
//!
//! 개별 설정 구조체를 하나로 묶고, 두 서명 주체의 키 분리를 기동 시점에 검증합니다.

use crate::config::auth_config::{
    BackendKeyMaterial, BackendTokenConfig, CookieConfig, OAuthConfig, SessionConfig,
};
use crate::config::data_config::{
    BackendConfig, EnvLookup, Environment, RateLimitConfig, ServerConfig,
};
use crate::errors::errors::{AppError, AppResult};

/// 세션 게이트웨이 전체 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub backend_token: BackendTokenConfig,
    pub oauth: OAuthConfig,
    pub cookies: CookieConfig,
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정을 읽습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - 필수 값 누락, 형식 오류, 세션/백엔드 키 충돌
    pub fn from_env() -> AppResult<Self> {
        let lookup = |key: &str| std::env::var(key).ok();
        Self::from_lookup(&lookup)
    }

    pub fn from_lookup(lookup: EnvLookup<'_>) -> AppResult<Self> {
        let environment = Environment::from_lookup(lookup);
        let session = SessionConfig::from_lookup(lookup)?;
        let backend_token = BackendTokenConfig::from_lookup(lookup)?;
        let oauth = OAuthConfig::from_lookup(lookup, &session.secret)?;

        let config = Self {
            cookies: CookieConfig::for_environment(&environment),
            environment,
            server: ServerConfig::from_lookup(lookup),
            rate_limit: RateLimitConfig::from_lookup(lookup),
            backend: BackendConfig::from_lookup(lookup)?,
            session,
            backend_token,
            oauth,
        };

        config.ensure_signing_keys_are_separate()?;
        Ok(config)
    }

    /// 세션 서명 키와 백엔드 검증 키가 같으면 기동을 거부합니다.
    pub fn ensure_signing_keys_are_separate(&self) -> AppResult<()> {
        if let BackendKeyMaterial::Hmac(backend_key) = &self.backend_token.key {
            if backend_key.as_slice() == self.session.secret.as_bytes() {
                return Err(AppError::ConfigError(
                    "SESSION_SECRET must differ from BACKEND_JWT_SECRET".to_string(),
                ));
            }
        }
        Ok(())
    }
}
