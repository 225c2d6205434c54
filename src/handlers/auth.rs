//! 인증 엔드포인트 (`/api/auth`)
//!
//! - `GET /signin/{provider}` - OAuth 로그인 시작
//! - `GET /callback/{provider}` - OAuth 콜백, 세션 발급
//! - `GET /session` - 현재 세션 조회 (필요 시 리프레시, 세션 토큰 재서명)
//! - `POST /signout` - 로그아웃

use actix_web::http::header;
use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;

use crate::config::AuthProvider;
use crate::core::context::AppContext;
use crate::domain::dto::auth::{ApiResponse, OAuthCallbackQuery, SignInQuery, UnauthenticatedResponse};
use crate::domain::models::session::SessionState;
use crate::errors::errors::AppError;
use crate::middlewares::cookie_scope::CookieScope;
use crate::services::auth::sign_in_service::SignInOutcome;

fn parse_provider(raw: &str) -> Result<AuthProvider, AppError> {
    AuthProvider::from_str(raw).map_err(AppError::ValidationError)
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

#[get("/signin/{provider}")]
pub async fn sign_in(
    ctx: web::Data<AppContext>,
    scope: CookieScope,
    provider: web::Path<String>,
    query: web::Query<SignInQuery>,
) -> Result<HttpResponse, AppError> {
    let provider = parse_provider(&provider)?;
    let url = ctx
        .oauth
        .begin(&scope, provider, query.callback_url.as_deref(), Utc::now())?;

    Ok(redirect(&url))
}

/// 성공하면 로그인 시작 시 지정한 경로로, 실패하면 로그인 페이지로 보냅니다.
#[get("/callback/{provider}")]
pub async fn oauth_callback(
    ctx: web::Data<AppContext>,
    scope: CookieScope,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let provider = parse_provider(&provider)?;

    match ctx.sign_in.complete_callback(&scope, provider, &query, Utc::now()).await {
        SignInOutcome::SignedIn { callback_url, .. } => Ok(redirect(&callback_url)),
        SignInOutcome::Failed(failure) => {
            let location = format!("{}?error={}", ctx.oauth.sign_in_page(), failure.as_query_code());
            Ok(redirect(&location))
        }
    }
}

#[get("/session")]
pub async fn get_session(ctx: web::Data<AppContext>, scope: CookieScope) -> Result<HttpResponse, AppError> {
    let now = Utc::now();

    match ctx.coordinator.materialize(&scope, now).await {
        SessionState::Active(active) => {
            // 리프레시했다면 이미 새 토큰이 발급됨
            if !active.refreshed {
                ctx.issuer.resign(&scope, &active.claims, now)?;
            }
            let session = ctx.enricher.enrich(active).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(session)))
        }
        SessionState::Unauthenticated(reason) => Ok(HttpResponse::Unauthorized().json(UnauthenticatedResponse {
            error: reason.to_string(),
            redirect: ctx.oauth.sign_in_page().to_string(),
        })),
    }
}

#[post("/signout")]
pub async fn sign_out(ctx: web::Data<AppContext>, scope: CookieScope) -> HttpResponse {
    ctx.issuer.revoke(&scope);
    log::info!("👋 로그아웃 처리 완료");

    HttpResponse::Ok().json(ApiResponse::<()>::message("로그아웃 되었습니다"))
}
