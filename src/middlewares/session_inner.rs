use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, HttpResponse};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;

use crate::core::context::AppContext;
use crate::domain::dto::auth::UnauthenticatedResponse;
use crate::domain::models::session::{SessionState, UnauthenticatedReason};
use crate::middlewares::cookie_scope::CookieScope;
use crate::middlewares::session_middleware::AuthMode;

/// 실제 세션 구체화를 수행하는 서비스
pub struct SessionMiddlewareService<S> {
    pub service: Rc<S>,
    pub ctx: web::Data<AppContext>,
    pub mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let ctx = self.ctx.clone();
        let mode = self.mode;

        Box::pin(async move {
            let scope = req.extensions().get::<CookieScope>().cloned();
            let Some(scope) = scope else {
                log::error!("CookieScopeMiddleware가 등록되지 않았습니다");
                let response = HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "cookie_scope_missing"
                }));
                let (req, _) = req.into_parts();
                return Ok(ServiceResponse::new(req, response).map_into_right_body());
            };

            match ctx.coordinator.materialize(&scope, Utc::now()).await {
                SessionState::Active(active) => {
                    let session = ctx.enricher.enrich(active).await;
                    log::debug!("세션 확인: user={}", session.user_uuid);
                    req.extensions_mut().insert(session);
                }
                SessionState::Unauthenticated(reason) => match mode {
                    AuthMode::Required => {
                        log::debug!("인증 필요: {} ({})", req.path(), reason);
                        let response = unauthenticated_response(&req, reason, ctx.oauth.sign_in_page());
                        let (req, _) = req.into_parts();
                        return Ok(ServiceResponse::new(req, response).map_into_right_body());
                    }
                    AuthMode::Optional => {
                        log::debug!("선택적 인증: 세션 없음 ({}), 요청 진행", reason);
                    }
                },
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 로그인 후 원래 경로로 돌아오도록 `callbackUrl` 을 붙인 로그인 페이지 주소
pub fn sign_in_redirect(sign_in_page: &str, callback_url: &str) -> String {
    format!("{}?callbackUrl={}", sign_in_page, urlencoding::encode(callback_url))
}

fn unauthenticated_response(req: &ServiceRequest, reason: UnauthenticatedReason, sign_in_page: &str) -> HttpResponse {
    let callback_url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string());
    let redirect = sign_in_redirect(sign_in_page, &callback_url);

    let wants_html = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"));

    if wants_html {
        HttpResponse::Found()
            .insert_header((header::LOCATION, redirect))
            .finish()
    } else {
        HttpResponse::Unauthorized().json(UnauthenticatedResponse {
            error: reason.to_string(),
            redirect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_redirect_encodes_callback() {
        assert_eq!(
            sign_in_redirect("/signin", "/families/1?tab=members"),
            "/signin?callbackUrl=%2Ffamilies%2F1%3Ftab%3Dmembers"
        );
    }
}
