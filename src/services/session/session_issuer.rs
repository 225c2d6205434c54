//! 세션 발급 단계: 검증 → 서명 → 저장
//!
//! 로그인과 리프레시가 공유합니다. 검증과 서명이 모두 성공한 뒤에만 쿠키를 쓰므로
//! 실패한 시도는 쿠키를 하나도 남기지 않습니다.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::models::token::{BackendCredentialPair, SessionClaims, StoredCredentials};
use crate::errors::errors::AppResult;
use crate::middlewares::cookie_scope::CookieScope;
use crate::services::auth::backend_token_verifier::BackendTokenVerifier;
use crate::services::session::session_codec::SessionTokenCodec;
use crate::services::session::session_cookie::SessionCookie;
use crate::services::session::token_store::TokenStore;

#[derive(Clone)]
pub struct SessionIssuer {
    verifier: Arc<BackendTokenVerifier>,
    codec: Arc<SessionTokenCodec>,
    token_store: TokenStore,
    session_cookie: SessionCookie,
}

impl SessionIssuer {
    pub fn new(
        verifier: Arc<BackendTokenVerifier>,
        codec: Arc<SessionTokenCodec>,
        token_store: TokenStore,
        session_cookie: SessionCookie,
    ) -> Self {
        Self {
            verifier,
            codec,
            token_store,
            session_cookie,
        }
    }

    /// 백엔드 액세스 토큰을 검증하고 사용자 식별자를 돌려줍니다.
    pub fn verify(&self, pair: &BackendCredentialPair) -> AppResult<String> {
        self.verifier.verify(&pair.access_token)
    }

    /// 새 세션 토큰을 서명하고 자격 증명 쌍과 함께 저장합니다.
    pub fn persist(
        &self,
        scope: &CookieScope,
        user_uuid: &str,
        pair: &BackendCredentialPair,
        now: DateTime<Utc>,
    ) -> AppResult<SessionClaims> {
        let access_expires = now + Duration::seconds(pair.expires_in_seconds);
        let claims = SessionClaims::new(user_uuid, access_expires.timestamp_millis());
        let token = self.codec.encode(&claims, now)?;

        self.token_store.save(scope, pair, now);
        self.session_cookie.write(scope, &token, now + self.codec.max_age());
        Ok(claims)
    }

    /// 검증 후 저장 (로그인 경로)
    pub fn issue(
        &self,
        scope: &CookieScope,
        pair: &BackendCredentialPair,
        now: DateTime<Utc>,
    ) -> AppResult<SessionClaims> {
        let user_uuid = self.verify(pair)?;
        self.persist(scope, &user_uuid, pair, now)
    }

    /// 클레임은 그대로 두고 세션 토큰만 다시 서명합니다.
    pub fn resign(&self, scope: &CookieScope, claims: &SessionClaims, now: DateTime<Utc>) -> AppResult<()> {
        let token = self.codec.encode(claims, now)?;
        self.session_cookie.write(scope, &token, now + self.codec.max_age());
        Ok(())
    }

    /// 세션 쿠키와 자격 증명 쿠키를 모두 지웁니다.
    pub fn revoke(&self, scope: &CookieScope) {
        self.token_store.clear(scope);
        self.session_cookie.clear(scope);
    }

    pub fn read_session(&self, scope: &CookieScope) -> Option<String> {
        self.session_cookie.read(scope)
    }

    pub fn read_credentials(&self, scope: &CookieScope) -> StoredCredentials {
        self.token_store.read(scope)
    }

    pub fn decode(&self, token: &str) -> Option<SessionClaims> {
        self.codec.decode(token)
    }
}
