//! 세션 보강
//!
//! 유효한 세션에 사용자 프로필을 붙입니다. 프로필 조회는 soft fail 이라서
//! 실패해도 세션은 유지되고 기본 프로필 `{Asia/Seoul, ko, KRW, null}` 이 쓰입니다.

use std::sync::Arc;

use log::{debug, warn};

use crate::domain::models::session::{ActiveSession, AuthenticatedSession, ProfileSource, UserProfile};
use crate::services::auth::backend_client::AuthBackend;
use crate::utils::fingerprint::token_fingerprint;

pub struct SessionEnricher {
    backend: Arc<dyn AuthBackend>,
}

impl SessionEnricher {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self { backend }
    }

    pub async fn enrich(&self, session: ActiveSession) -> AuthenticatedSession {
        let (profile, profile_source) = match self.backend.fetch_profile(session.access_token.expose()).await {
            Ok(profile) => {
                debug!("프로필 조회 성공: user={}", session.claims.user_uuid);
                (profile, ProfileSource::Backend)
            }
            Err(e) => {
                warn!(
                    "⚠️ 프로필 조회 실패, 기본 프로필 사용 (user={}, token={}): {}",
                    session.claims.user_uuid,
                    token_fingerprint(session.access_token.expose()),
                    e
                );
                (UserProfile::default(), ProfileSource::Default)
            }
        };

        AuthenticatedSession {
            user_uuid: session.claims.user_uuid,
            access_token_expires: session.claims.access_token_expires,
            profile,
            profile_source,
            access_token: session.access_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::token::{SecretToken, SessionClaims};
    use crate::services::test_support::FakeBackend;

    fn active() -> ActiveSession {
        ActiveSession {
            claims: SessionClaims::new("user-uuid-1", 1_700_000_000_000),
            access_token: SecretToken::new("access-1"),
            refreshed: false,
        }
    }

    #[actix_web::test]
    async fn test_profile_from_backend() {
        let profile = UserProfile {
            timezone: "America/New_York".to_string(),
            language: "en".to_string(),
            currency: "USD".to_string(),
            default_family_uuid: Some("family-1".to_string()),
        };
        let backend = Arc::new(FakeBackend::new().with_profile(Ok(profile.clone())));

        let session = SessionEnricher::new(backend).enrich(active()).await;

        assert_eq!(session.profile, profile);
        assert_eq!(session.profile_source, ProfileSource::Backend);
        assert_eq!(session.user_uuid, "user-uuid-1");
    }

    #[actix_web::test]
    async fn test_profile_failure_falls_back_to_default() {
        let backend = Arc::new(FakeBackend::new().with_profile(Err("500".to_string())));

        let session = SessionEnricher::new(backend).enrich(active()).await;

        assert_eq!(session.profile, UserProfile::default());
        assert_eq!(session.profile_source, ProfileSource::Default);
        assert_eq!(session.access_token_expires, 1_700_000_000_000);
        assert_eq!(session.access_token.expose(), "access-1");
    }
}
