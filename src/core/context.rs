//! # 애플리케이션 컨텍스트
//!
//! 기동 시 한 번 만들어져 `web::Data<AppContext>` 로 모든 워커에 공유되는
//! 의존성 컨테이너입니다. 생성 이후에는 불변이며, 요청 단위 상태(쿠키 jar)는
//! 여기에 두지 않습니다.
//!
//! ```text
//! AppConfig ──▶ AppContext::new
//!                 ├─ BackendAuthClient (Arc<dyn AuthBackend>)
//!                 ├─ BackendTokenVerifier
//!                 ├─ SessionTokenCodec
//!                 ├─ SessionIssuer ──┬─ RefreshCoordinator
//!                 │                  └─ SignInService ── OAuthProviderService
//!                 └─ SessionEnricher
//! ```

use std::sync::Arc;

use log::info;

use crate::config::AppConfig;
use crate::errors::errors::AppResult;
use crate::services::auth::backend_client::{AuthBackend, BackendAuthClient};
use crate::services::auth::backend_token_verifier::BackendTokenVerifier;
use crate::services::auth::oauth_provider_service::OAuthProviderService;
use crate::services::auth::sign_in_service::SignInService;
use crate::services::session::enrichment::SessionEnricher;
use crate::services::session::refresh_coordinator::RefreshCoordinator;
use crate::services::session::session_codec::SessionTokenCodec;
use crate::services::session::session_cookie::SessionCookie;
use crate::services::session::session_issuer::SessionIssuer;
use crate::services::session::token_store::TokenStore;

pub struct AppContext {
    pub config: AppConfig,
    pub issuer: SessionIssuer,
    pub coordinator: RefreshCoordinator,
    pub enricher: SessionEnricher,
    pub oauth: Arc<OAuthProviderService>,
    pub sign_in: SignInService,
}

impl AppContext {
    /// 실제 백엔드 HTTP 클라이언트로 컨텍스트를 구성합니다.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let backend: Arc<dyn AuthBackend> = Arc::new(BackendAuthClient::new(&config.backend)?);
        Self::with_backend(config, backend)
    }

    /// 백엔드 구현을 주입해 컨텍스트를 구성합니다.
    pub fn with_backend(config: AppConfig, backend: Arc<dyn AuthBackend>) -> AppResult<Self> {
        let verifier = Arc::new(BackendTokenVerifier::new(&config.backend_token)?);
        let codec = Arc::new(SessionTokenCodec::new(&config.session)?);

        let issuer = SessionIssuer::new(
            verifier,
            codec,
            TokenStore::new(config.cookies.clone()),
            SessionCookie::new(config.cookies.clone()),
        );

        let oauth = Arc::new(OAuthProviderService::new(
            config.oauth.clone(),
            config.cookies.clone(),
            config.backend.timeout,
        )?);

        info!("✅ 세션 서비스 구성 완료 ({} 개 OAuth 프로바이더)", config.oauth.clients.len());

        Ok(Self {
            coordinator: RefreshCoordinator::new(backend.clone(), issuer.clone()),
            enricher: SessionEnricher::new(backend.clone()),
            sign_in: SignInService::new(oauth.clone(), backend, issuer.clone()),
            issuer,
            oauth,
            config,
        })
    }
}
