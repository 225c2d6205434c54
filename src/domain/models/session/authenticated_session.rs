use std::future::{ready, Ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use crate::domain::models::session::profile::{ProfileSource, UserProfile};
use crate::domain::models::token::SecretToken;

/// 세션 미들웨어가 구체화하고 보강한 세션
///
/// 애플리케이션 핸들러가 받는 유일한 신원 정보입니다. 백엔드 액세스 토큰은
/// 백엔드 API 호출용으로만 들고 있으며 직렬화되지 않습니다.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedSession {
    pub user_uuid: String,
    /// 백엔드 액세스 토큰 만료 시각 (ms epoch)
    pub access_token_expires: i64,
    pub profile: UserProfile,
    pub profile_source: ProfileSource,
    #[serde(skip_serializing)]
    pub access_token: SecretToken,
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedSession {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedSession>() {
            Some(session) => ready(Ok(session.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "인증되지 않은 요청입니다"
            ))),
        }
    }
}

/// 선택적 세션 추출자
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<AuthenticatedSession>);

impl FromRequest for OptionalSession {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let session = req.extensions().get::<AuthenticatedSession>().cloned();
        ready(Ok(OptionalSession(session)))
    }
}
