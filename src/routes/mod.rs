//! API 라우트 설정 모듈
//!
//! 인증 엔드포인트, 세션이 필요한 애플리케이션 엔드포인트, 헬스체크를 등록합니다.
//!
//! # Auth Middleware Usage
//!
//! ## 인증 불필요 (Public 라우트)
//! ```rust,ignore
//! cfg.service(web::scope("/api/auth").service(handlers::auth::sign_in));
//! ```
//!
//! ## 세션 선택 (없으면 그대로 진행)
//! ```rust,ignore
//! cfg.service(
//!     web::scope("/api/public")
//!         .wrap(SessionMiddleware::optional(ctx.clone()))
//!         .service(handlers::session::preferences)
//! );
//! ```
//!
//! ## 세션 필수
//! ```rust,ignore
//! cfg.service(
//!     web::scope("/api/v1")
//!         .wrap(SessionMiddleware::required(ctx.clone()))
//!         .service(handlers::session::me)
//! );
//! ```

use actix_web::web;
use serde_json::json;

use crate::core::context::AppContext;
use crate::handlers;
use crate::middlewares::SessionMiddleware;

/// 모든 라우트를 설정합니다
///
/// ```rust,ignore
/// let ctx = web::Data::new(AppContext::new(config)?);
/// let app = App::new()
///     .app_data(ctx.clone())
///     .configure(|cfg| configure_all_routes(cfg, ctx.clone()));
/// ```
pub fn configure_all_routes(cfg: &mut web::ServiceConfig, ctx: web::Data<AppContext>) {
    cfg.service(health_check);

    configure_auth_routes(cfg);
    configure_public_routes(cfg, ctx.clone());
    configure_app_routes(cfg, ctx);
}

/// 인증 관련 라우트 (`/api/auth`)
///
/// - `GET /api/auth/signin/{provider}?callbackUrl=/dashboard`
/// - `GET /api/auth/callback/{provider}?code=..&state=..`
/// - `GET /api/auth/session`
/// - `POST /api/auth/signout`
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(handlers::auth::sign_in)
            .service(handlers::auth::oauth_callback)
            .service(handlers::auth::get_session)
            .service(handlers::auth::sign_out),
    );
}

/// 세션이 있으면 사용하는 공개 라우트 (`/api/public`)
fn configure_public_routes(cfg: &mut web::ServiceConfig, ctx: web::Data<AppContext>) {
    cfg.service(
        web::scope("/api/public")
            .wrap(SessionMiddleware::optional(ctx))
            .service(handlers::session::preferences),
    );
}

/// 세션이 필요한 애플리케이션 라우트 (`/api/v1`)
fn configure_app_routes(cfg: &mut web::ServiceConfig, ctx: web::Data<AppContext>) {
    cfg.service(
        web::scope("/api/v1")
            .wrap(SessionMiddleware::required(ctx))
            .service(handlers::session::me),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "budget_session_gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
