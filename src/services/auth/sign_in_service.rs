//! 로그인 오케스트레이션
//!
//! OAuth 콜백 하나를 끝까지 처리합니다.
//!
//! 1. 프로바이더 에러 확인
//! 2. state 대조 (쿠키 vs 쿼리)
//! 3. 프로바이더 프로필 조회 및 정규화
//! 4. 백엔드 `register` 로 자격 증명 쌍 교환
//! 5. 백엔드 토큰 검증 후 세션 발급
//!
//! 어느 단계에서 실패하든 결과는 [`SignInOutcome::Failed`] 이며 세션 쿠키나
//! 자격 증명 쿠키는 쓰이지 않습니다. 실패가 에러로 호출자에게 전파되지는 않습니다.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use validator::Validate;

use crate::config::AuthProvider;
use crate::domain::dto::auth::OAuthCallbackQuery;
use crate::domain::models::oauth::ExternalIdentity;
use crate::domain::models::token::SessionClaims;
use crate::middlewares::cookie_scope::CookieScope;
use crate::services::auth::backend_client::{AuthBackend, ExchangeError};
use crate::services::auth::oauth_provider_service::OAuthProviderService;
use crate::services::session::session_issuer::SessionIssuer;

/// 로그인 실패 사유. 로그인 페이지에 `?error=<code>` 로 전달됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInFailure {
    /// 사용자가 동의를 거부했거나 프로바이더가 에러를 돌려줌
    ProviderDenied,
    /// state 누락 또는 불일치
    InvalidState,
    /// 프로바이더 토큰/프로필 조회 실패
    ProviderError,
    /// 프로필에 프로바이더 사용자 ID 가 없음
    MissingProviderId,
    /// 백엔드가 가입/로그인을 거절함
    ExchangeRejected,
    /// 재시도 후에도 백엔드에 도달하지 못함
    ExchangeUnreachable,
    /// 백엔드 토큰 검증 실패
    VerificationFailed,
    /// 세션 토큰 서명 실패
    IssueFailed,
}

impl SignInFailure {
    pub fn as_query_code(&self) -> &'static str {
        match self {
            SignInFailure::ProviderDenied => "provider_denied",
            SignInFailure::InvalidState => "invalid_state",
            SignInFailure::ProviderError => "provider_error",
            SignInFailure::MissingProviderId => "missing_provider_id",
            SignInFailure::ExchangeRejected => "exchange_rejected",
            SignInFailure::ExchangeUnreachable => "exchange_unreachable",
            SignInFailure::VerificationFailed => "verification_failed",
            SignInFailure::IssueFailed => "issue_failed",
        }
    }
}

impl fmt::Display for SignInFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_code())
    }
}

/// 로그인 시도의 최종 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn {
        claims: SessionClaims,
        callback_url: String,
    },
    Failed(SignInFailure),
}

pub struct SignInService {
    oauth: Arc<OAuthProviderService>,
    backend: Arc<dyn AuthBackend>,
    issuer: SessionIssuer,
}

impl SignInService {
    pub fn new(oauth: Arc<OAuthProviderService>, backend: Arc<dyn AuthBackend>, issuer: SessionIssuer) -> Self {
        Self { oauth, backend, issuer }
    }

    /// OAuth 콜백을 처리합니다.
    pub async fn complete_callback(
        &self,
        scope: &CookieScope,
        provider: AuthProvider,
        query: &OAuthCallbackQuery,
        now: DateTime<Utc>,
    ) -> SignInOutcome {
        // state 쿠키는 결과와 상관없이 소비
        let pending = self.oauth.take_pending(scope);

        if let Some(error) = &query.error {
            warn!(
                "⚠️ {} 로그인 거부: {} {}",
                provider.as_str(),
                error,
                query.error_description.as_deref().unwrap_or_default()
            );
            return SignInOutcome::Failed(SignInFailure::ProviderDenied);
        }

        let Some(pending) = pending else {
            warn!("⚠️ {} 콜백에 state 쿠키가 없습니다", provider.as_str());
            return SignInOutcome::Failed(SignInFailure::InvalidState);
        };
        if query.validate().is_err() || !pending.matches(provider, &query.state) {
            warn!(
                "⚠️ {} 콜백 state 불일치 (시작한 프로바이더: {})",
                provider.as_str(),
                pending.provider.as_str()
            );
            return SignInOutcome::Failed(SignInFailure::InvalidState);
        }

        let identity = match self.oauth.fetch_identity(provider, &query.code, &query.state).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("⚠️ {} 프로필 조회 실패: {}", provider.as_str(), e);
                return SignInOutcome::Failed(SignInFailure::ProviderError);
            }
        };

        match self.sign_in(scope, &identity, now).await {
            Ok(claims) => SignInOutcome::SignedIn {
                claims,
                callback_url: pending.callback_url,
            },
            Err(failure) => SignInOutcome::Failed(failure),
        }
    }

    /// 정규화된 신원으로 백엔드 자격 증명을 받아 세션을 발급합니다.
    pub async fn sign_in(
        &self,
        scope: &CookieScope,
        identity: &ExternalIdentity,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, SignInFailure> {
        if !identity.has_provider_id() {
            warn!("⚠️ {} 프로필에 사용자 ID 가 없습니다", identity.provider.as_str());
            return Err(SignInFailure::MissingProviderId);
        }

        let pair = self.backend.register(identity).await.map_err(|e| {
            let failure = match &e {
                ExchangeError::Rejected { .. } => SignInFailure::ExchangeRejected,
                ExchangeError::Unreachable(_) => SignInFailure::ExchangeUnreachable,
            };
            warn!("⚠️ 백엔드 신원 교환 실패: {}", e.into_sign_in_error());
            failure
        })?;

        let user_uuid = self.issuer.verify(&pair).map_err(|e| {
            warn!("⚠️ 백엔드 토큰 검증 실패: {}", e);
            SignInFailure::VerificationFailed
        })?;

        let claims = self.issuer.persist(scope, &user_uuid, &pair, now).map_err(|e| {
            warn!("⚠️ 세션 발급 실패: {}", e);
            SignInFailure::IssueFailed
        })?;

        info!("✅ 로그인 완료: provider={}, user={}", identity.provider.as_str(), user_uuid);
        Ok(claims)
    }
}
