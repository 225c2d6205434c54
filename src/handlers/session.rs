//! 세션이 필요한 애플리케이션 엔드포인트

use actix_web::{get, HttpResponse};
use serde_json::json;

use crate::domain::dto::auth::ApiResponse;
use crate::domain::models::session::{AuthenticatedSession, OptionalSession, UserProfile};

/// 현재 사용자와 프로필 (`SessionMiddleware::required` 뒤에 등록)
#[get("/me")]
pub async fn me(session: AuthenticatedSession) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(session))
}

/// 화면 표시용 지역 설정 (`SessionMiddleware::optional` 뒤에 등록)
///
/// 로그인하지 않은 방문자에게는 기본 프로필(Asia/Seoul, ko, KRW)을 돌려줍니다.
#[get("/preferences")]
pub async fn preferences(session: OptionalSession) -> HttpResponse {
    let (authenticated, profile) = match session.0 {
        Some(session) => (true, session.profile),
        None => (false, UserProfile::default()),
    };

    HttpResponse::Ok().json(ApiResponse::success(json!({
        "authenticated": authenticated,
        "profile": profile,
    })))
}
