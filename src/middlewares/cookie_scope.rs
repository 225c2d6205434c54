//! 요청 단위 쿠키 쓰기 컨텍스트
//!
//! 핸들러나 세션 미들웨어가 쿠키를 바꾸면 [`CookieScope`] 의 jar 에 기록되고,
//! [`CookieScopeMiddleware`] 가 응답이 확정되기 직전에 변경분(delta)을
//! `Set-Cookie` 헤더로 내보냅니다.
//!
//! 정상 응답, 미들웨어의 조기 응답(401/302), 핸들러 에러 응답 모두
//! `ServiceResponse` 로 돌아오므로 같은 경로에서 flush 됩니다. 따라서
//! 리프레시 실패 시의 쿠키 삭제가 401/302 응답에도 반드시 실립니다.
//!
//! 내부 서비스 호출 동안 `HttpRequest` 를 복제해 두면 라우터가 경로 파라미터를
//! 기록하지 못하므로(`match_info_mut`) 요청은 그대로 넘깁니다.
//!
//! ```rust,ignore
//! App::new()
//!     .wrap(CookieScopeMiddleware)          // 가장 바깥
//!     .service(
//!         web::scope("/api/v1")
//!             .wrap(SessionMiddleware::required(ctx.clone()))
//!             .route("/me", web::get().to(me)),
//!     )
//! ```

use std::cell::RefCell;
use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::cookie::{Cookie, CookieJar};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;

/// 요청 하나 동안만 살아 있는 쿠키 jar
///
/// 요청에 실려 온 쿠키는 original 로 들어가며, 이후의 추가/삭제만 delta 로 남습니다.
#[derive(Clone, Default)]
pub struct CookieScope {
    jar: Rc<RefCell<CookieJar>>,
}

impl CookieScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cookies<I>(cookies: I) -> Self
    where
        I: IntoIterator<Item = Cookie<'static>>,
    {
        let mut jar = CookieJar::new();
        for cookie in cookies {
            jar.add_original(cookie);
        }
        Self { jar: Rc::new(RefCell::new(jar)) }
    }

    pub fn from_request(req: &HttpRequest) -> Self {
        match req.cookies() {
            Ok(cookies) => Self::from_cookies(cookies.iter().cloned()),
            Err(e) => {
                log::warn!("요청 쿠키 파싱 실패: {}", e);
                Self::new()
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.jar
            .borrow()
            .get(name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn set(&self, cookie: Cookie<'static>) {
        self.jar.borrow_mut().add(cookie);
    }

    /// 쿠키를 삭제합니다. 템플릿의 경로가 원래 쿠키와 같아야 브라우저가 지웁니다.
    pub fn remove(&self, template: Cookie<'static>) {
        self.jar.borrow_mut().remove(template);
    }

    /// 아직 응답에 쓰지 않은 변경분
    pub fn pending(&self) -> Vec<Cookie<'static>> {
        self.jar.borrow().delta().cloned().collect()
    }

    /// 변경분을 응답 헤더에 기록합니다.
    pub fn flush_into<B>(&self, response: &mut HttpResponse<B>) {
        for cookie in self.pending() {
            if let Err(e) = response.add_cookie(&cookie) {
                log::error!("쿠키 '{}' 기록 실패: {}", cookie.name(), e);
            }
        }
    }
}

/// 핸들러에서 `scope: CookieScope` 로 받을 수 있습니다.
impl FromRequest for CookieScope {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<CookieScope>() {
            Some(scope) => ready(Ok(scope.clone())),
            None => ready(Err(actix_web::error::ErrorInternalServerError(
                "CookieScopeMiddleware가 등록되지 않았습니다"
            ))),
        }
    }
}

pub struct CookieScopeMiddleware;

impl<S, B> Transform<S, ServiceRequest> for CookieScopeMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CookieScopeMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CookieScopeMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct CookieScopeMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for CookieScopeMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let scope = CookieScope::from_request(req.request());
            req.extensions_mut().insert(scope.clone());

            let mut res = service.call(req).await?;
            scope.flush_into(res.response_mut());
            Ok(res)
        })
    }
}
