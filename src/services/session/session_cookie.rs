//! 세션 토큰 쿠키 (`session_token`)
//!
//! 백엔드 자격 증명 쿠키와 같은 속성을 쓰지만 만료는 세션 토큰의 `exp` 를 따릅니다.

use chrono::{DateTime, Utc};

use crate::config::CookieConfig;
use crate::middlewares::cookie_scope::CookieScope;

pub const SESSION_COOKIE: &str = "session_token";

#[derive(Debug, Clone)]
pub struct SessionCookie {
    cookies: CookieConfig,
}

impl SessionCookie {
    pub fn new(cookies: CookieConfig) -> Self {
        Self { cookies }
    }

    pub fn read(&self, scope: &CookieScope) -> Option<String> {
        scope.get(SESSION_COOKIE)
    }

    pub fn write(&self, scope: &CookieScope, token: &str, expires_at: DateTime<Utc>) {
        scope.set(self.cookies.build_cookie(SESSION_COOKIE, token, expires_at));
    }

    pub fn clear(&self, scope: &CookieScope) {
        scope.remove(self.cookies.removal_cookie(SESSION_COOKIE));
    }
}
