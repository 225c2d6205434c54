//! 리프레시 코디네이터
//!
//! 요청마다 세션 토큰과 저장된 자격 증명을 보고 세 가지 중 하나로 판단합니다.
//!
//! * `Valid` - 백엔드 액세스 토큰이 아직 유효하므로 그대로 사용
//! * `NeedsRefresh` - 만료되었고 리프레시 토큰이 있으므로 백엔드 `refresh` 를 한 번 호출
//! * `Unauthenticated` - 종결. 로그인 화면으로 보내야 함
//!
//! 리프레시가 어떤 이유로든 실패하면 이전 자격 증명을 계속 쓰지 않습니다.
//! 저장소와 세션 쿠키를 모두 지우고 `Unauthenticated` 로 끝납니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::domain::models::session::{ActiveSession, RefreshState, SessionState, UnauthenticatedReason};
use crate::domain::models::token::{SecretToken, StoredCredentials};
use crate::middlewares::cookie_scope::CookieScope;
use crate::services::auth::backend_client::{AuthBackend, ExchangeError};
use crate::services::session::session_issuer::SessionIssuer;
use crate::utils::fingerprint::token_fingerprint;

pub struct RefreshCoordinator {
    backend: Arc<dyn AuthBackend>,
    issuer: SessionIssuer,
}

impl RefreshCoordinator {
    pub fn new(backend: Arc<dyn AuthBackend>, issuer: SessionIssuer) -> Self {
        Self { backend, issuer }
    }

    /// 순수 판단 단계. 네트워크를 타지 않습니다.
    ///
    /// `now < accessTokenExpires` 이고 액세스 토큰이 남아 있을 때만 `Valid` 입니다.
    /// 경계 시각(`now == accessTokenExpires`)은 만료로 취급합니다.
    pub fn evaluate(
        &self,
        session_token: Option<&str>,
        credentials: &StoredCredentials,
        now_ms: i64,
    ) -> RefreshState {
        let Some(token) = session_token else {
            return RefreshState::Unauthenticated(UnauthenticatedReason::NoSession);
        };
        let Some(claims) = self.issuer.decode(token) else {
            return RefreshState::Unauthenticated(UnauthenticatedReason::InvalidSession);
        };

        if !claims.is_access_expired(now_ms) {
            if let Some(access_token) = &credentials.access_token {
                return RefreshState::Valid {
                    claims,
                    access_token: SecretToken::new(access_token.clone()),
                };
            }
        }

        match &credentials.refresh_token {
            Some(refresh_token) => RefreshState::NeedsRefresh {
                claims,
                refresh_token: SecretToken::new(refresh_token.clone()),
            },
            None => RefreshState::Unauthenticated(UnauthenticatedReason::NoCredentials),
        }
    }

    /// 요청의 쿠키로부터 세션을 구체화합니다.
    ///
    /// 리프레시가 필요하면 백엔드를 정확히 한 번 호출하고, 성공 시 새 자격 증명과
    /// 새 세션 토큰을 `scope` 에 기록합니다.
    pub async fn materialize(&self, scope: &CookieScope, now: DateTime<Utc>) -> SessionState {
        let session_token = self.issuer.read_session(scope);
        let credentials = self.issuer.read_credentials(scope);

        let state = self.evaluate(session_token.as_deref(), &credentials, now.timestamp_millis());

        match state {
            RefreshState::Valid { claims, access_token } => SessionState::Active(ActiveSession {
                claims,
                access_token,
                refreshed: false,
            }),
            RefreshState::NeedsRefresh { claims, refresh_token } => {
                match self.refresh(scope, &claims.user_uuid, &refresh_token, now).await {
                    Ok(active) => SessionState::Active(active),
                    Err(reason) => self.fail_closed(scope, reason),
                }
            }
            RefreshState::Unauthenticated(reason) => {
                if reason.clears_credentials() {
                    self.fail_closed(scope, reason)
                } else {
                    SessionState::Unauthenticated(reason)
                }
            }
        }
    }

    async fn refresh(
        &self,
        scope: &CookieScope,
        user_uuid: &str,
        refresh_token: &SecretToken,
        now: DateTime<Utc>,
    ) -> Result<ActiveSession, UnauthenticatedReason> {
        let pair = self
            .backend
            .refresh(refresh_token.expose())
            .await
            .map_err(|e| {
                let reason = match &e {
                    ExchangeError::Rejected { .. } => UnauthenticatedReason::RefreshRejected,
                    ExchangeError::Unreachable(_) => UnauthenticatedReason::RefreshUnreachable,
                };
                warn!(
                    "⚠️ 토큰 리프레시 실패 (user={}, refresh={}): {}",
                    user_uuid,
                    token_fingerprint(refresh_token.expose()),
                    e.into_refresh_error()
                );
                reason
            })?;

        let subject = self.issuer.verify(&pair).map_err(|e| {
            warn!("⚠️ 갱신된 백엔드 토큰 검증 실패 (user={}): {}", user_uuid, e);
            UnauthenticatedReason::VerificationFailed
        })?;

        if subject != user_uuid {
            warn!(
                "⚠️ 갱신된 토큰의 주체가 세션 사용자와 다릅니다 (session={}, token={})",
                user_uuid, subject
            );
            return Err(UnauthenticatedReason::IdentityMismatch);
        }

        let claims = self.issuer.persist(scope, &subject, &pair, now).map_err(|e| {
            warn!("⚠️ 세션 재발급 실패 (user={}): {}", user_uuid, e);
            UnauthenticatedReason::IssueFailed
        })?;

        info!("🔄 토큰 리프레시 완료: user={}", user_uuid);
        Ok(ActiveSession {
            claims,
            access_token: SecretToken::new(pair.access_token),
            refreshed: true,
        })
    }

    fn fail_closed(&self, scope: &CookieScope, reason: UnauthenticatedReason) -> SessionState {
        self.issuer.revoke(scope);
        SessionState::Unauthenticated(reason)
    }
}
