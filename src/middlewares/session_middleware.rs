//! 세션 미들웨어
//!
//! 요청마다 쿠키로부터 세션을 구체화하고(필요하면 리프레시), 프로필을 붙여
//! [`AuthenticatedSession`](crate::domain::models::session::AuthenticatedSession) 을
//! request extension 에 넣습니다.
//!
//! | 모드 | 인증 실패 시 |
//! |------|--------------|
//! | `Required` | 브라우저는 로그인 페이지로 302, 그 외에는 401 JSON |
//! | `Optional` | 세션 없이 요청 진행 |
//!
//! [`CookieScopeMiddleware`](crate::middlewares::cookie_scope::CookieScopeMiddleware) 가
//! 바깥에 등록되어 있어야 리프레시 결과 쿠키가 응답에 실립니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, Result,
};

use crate::core::context::AppContext;
use crate::middlewares::session_inner::SessionMiddlewareService;

/// 인증 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 유효한 세션 필수
    Required,
    /// 세션이 있으면 사용
    Optional,
}

pub struct SessionMiddleware {
    ctx: web::Data<AppContext>,
    mode: AuthMode,
}

impl SessionMiddleware {
    pub fn new(ctx: web::Data<AppContext>, mode: AuthMode) -> Self {
        Self { ctx, mode }
    }

    /// 필수 인증 미들웨어 생성
    pub fn required(ctx: web::Data<AppContext>) -> Self {
        Self::new(ctx, AuthMode::Required)
    }

    /// 선택적 인증 미들웨어 생성
    pub fn optional(ctx: web::Data<AppContext>) -> Self {
        Self::new(ctx, AuthMode::Optional)
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SessionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
            ctx: self.ctx.clone(),
            mode: self.mode,
        }))
    }
}
