//! 보안 토큰 저장소
//!
//! 백엔드 자격 증명 쌍을 브라우저 쿠키 두 개에 보관합니다. 세션 토큰은 여기에
//! 저장하지 않습니다.
//!
//! | 쿠키 | 만료 |
//! |------|------|
//! | `backend_access_token` | 발급 시각 + `expiresIn` 초 |
//! | `backend_refresh_token` | 발급 시각 + 7일 |
//!
//! 두 쿠키 모두 `HttpOnly`, `SameSite=Lax`, `Path=/` 이며 `Secure` 는 프로덕션에서만
//! 켜집니다. 모든 쓰기는 [`CookieScope`] 를 거치므로 응답 확정 전에 반드시 반영됩니다.

use chrono::{DateTime, Duration, Utc};

use crate::config::CookieConfig;
use crate::domain::models::token::{BackendCredentialPair, StoredCredentials};
use crate::middlewares::cookie_scope::CookieScope;

pub const ACCESS_TOKEN_COOKIE: &str = "backend_access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "backend_refresh_token";
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct TokenStore {
    cookies: CookieConfig,
}

impl TokenStore {
    pub fn new(cookies: CookieConfig) -> Self {
        Self { cookies }
    }

    /// 자격 증명 쌍을 저장합니다. 기존 쌍은 통째로 대체됩니다.
    pub fn save(&self, scope: &CookieScope, pair: &BackendCredentialPair, now: DateTime<Utc>) {
        let access_expires = now + Duration::seconds(pair.expires_in_seconds);
        let refresh_expires = now + Duration::days(REFRESH_TOKEN_TTL_DAYS);

        scope.set(self.cookies.build_cookie(ACCESS_TOKEN_COOKIE, &pair.access_token, access_expires));
        scope.set(self.cookies.build_cookie(REFRESH_TOKEN_COOKIE, &pair.refresh_token, refresh_expires));
    }

    pub fn read(&self, scope: &CookieScope) -> StoredCredentials {
        StoredCredentials {
            access_token: scope.get(ACCESS_TOKEN_COOKIE),
            refresh_token: scope.get(REFRESH_TOKEN_COOKIE),
        }
    }

    /// 두 쿠키를 모두 삭제합니다. (로그아웃, 리프레시 종결 실패)
    pub fn clear(&self, scope: &CookieScope) {
        scope.remove(self.cookies.removal_cookie(ACCESS_TOKEN_COOKIE));
        scope.remove(self.cookies.removal_cookie(REFRESH_TOKEN_COOKIE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use actix_web::cookie::{Cookie, SameSite};

    fn pair(expires_in: i64) -> BackendCredentialPair {
        BackendCredentialPair {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_in_seconds: expires_in,
        }
    }

    fn store(environment: Environment) -> TokenStore {
        TokenStore::new(CookieConfig::for_environment(&environment))
    }

    #[test]
    fn test_save_then_read() {
        let scope = CookieScope::new();
        let store = store(Environment::Development);

        store.save(&scope, &pair(86400), Utc::now());
        let stored = store.read(&scope);

        assert_eq!(stored.access_token.as_deref(), Some("access-1"));
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_cookie_attributes_and_expiries() {
        let scope = CookieScope::new();
        let now = Utc::now();
        store(Environment::Production).save(&scope, &pair(86400), now);

        let pending = scope.pending();
        let access = pending.iter().find(|c| c.name() == ACCESS_TOKEN_COOKIE).unwrap();
        let refresh = pending.iter().find(|c| c.name() == REFRESH_TOKEN_COOKIE).unwrap();

        for cookie in [access, refresh] {
            assert_eq!(cookie.http_only(), Some(true));
            assert_eq!(cookie.secure(), Some(true));
            assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        }
        assert_eq!(
            access.expires_datetime().map(|at| at.unix_timestamp()),
            Some(now.timestamp() + 86400)
        );
        assert_eq!(
            refresh.expires_datetime().map(|at| at.unix_timestamp()),
            Some(now.timestamp() + 7 * 24 * 3600)
        );
    }

    #[test]
    fn test_not_secure_outside_production() {
        let scope = CookieScope::new();
        store(Environment::Development).save(&scope, &pair(60), Utc::now());

        assert!(scope.pending().iter().all(|c| c.secure() == Some(false)));
    }

    #[test]
    fn test_clear_removes_request_cookies() {
        let scope = CookieScope::from_cookies(vec![
            Cookie::new(ACCESS_TOKEN_COOKIE, "old-access"),
            Cookie::new(REFRESH_TOKEN_COOKIE, "old-refresh"),
        ]);
        let store = store(Environment::Development);

        store.clear(&scope);

        assert!(store.read(&scope).is_empty());
        let removals = scope.pending();
        assert_eq!(removals.len(), 2);
        assert!(removals.iter().all(|c| c.value().is_empty()));
    }

    #[test]
    fn test_partial_read() {
        let scope = CookieScope::from_cookies(vec![Cookie::new(REFRESH_TOKEN_COOKIE, "r")]);
        let stored = store(Environment::Development).read(&scope);

        assert_eq!(stored.access_token, None);
        assert_eq!(stored.refresh_token.as_deref(), Some("r"));
    }
}
