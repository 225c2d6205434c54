//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 세션 게이트웨이를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! ## 실패 분류
//!
//! | AppError | 성격 | 처리 위치 |
//! |----------|------|-----------|
//! | `IdentityExchangeRejected` | hard fail | 로그인 콜백 |
//! | `IdentityExchangeUnreachable` | hard fail | 로그인 콜백 |
//! | `TokenVerificationFailed` | hard fail | 로그인 콜백 / 세션 구체화 |
//! | `RefreshRejected` | hard fail | 세션 구체화 |
//! | `RefreshUnreachable` | hard fail | 세션 구체화 |
//! | `ProfileFetchFailed` | soft fail | 세션 보강 (기본 프로필로 대체) |
//!
//! hard fail 은 발생한 경계에서 `SignInOutcome` / `SessionState` 로 접혀서
//! 처리되며, UI 코드까지 에러로 전파되지 않습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::errors::{AppError, AppResult};
//!
//! fn load_secret(raw: Option<String>) -> AppResult<String> {
//!     raw.ok_or_else(|| AppError::ConfigError("SESSION_SECRET must be set".to_string()))
//! }
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 세션 게이트웨이에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// 핸들러에서 반환될 경우 자동으로 HTTP 응답으로 변환됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 설정값 누락 또는 형식 오류 (500 Internal Server Error)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 백엔드가 회원가입/로그인을 거절함 (401 Unauthorized)
    #[error("Identity exchange rejected: {0}")]
    IdentityExchangeRejected(String),

    /// 재시도 후에도 백엔드에 도달하지 못함 (502 Bad Gateway)
    #[error("Identity exchange unreachable: {0}")]
    IdentityExchangeUnreachable(String),

    /// 백엔드 발급 토큰의 서명/클레임 검증 실패 (401 Unauthorized)
    #[error("Token verification failed: {0}")]
    TokenVerificationFailed(String),

    /// 백엔드가 리프레시 토큰을 거절함 (401 Unauthorized)
    #[error("Refresh rejected: {0}")]
    RefreshRejected(String),

    /// 재시도 후에도 리프레시 요청이 실패함 (401 Unauthorized)
    #[error("Refresh unreachable: {0}")]
    RefreshUnreachable(String),

    /// 사용자 프로필 조회 실패 (soft fail, 502 Bad Gateway)
    #[error("Profile fetch failed: {0}")]
    ProfileFetchFailed(String),

    /// 외부 서비스 에러 (502 Bad Gateway)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::IdentityExchangeRejected(_)
            | AppError::TokenVerificationFailed(_)
            | AppError::RefreshRejected(_)
            | AppError::RefreshUnreachable(_) => StatusCode::UNAUTHORIZED,
            AppError::IdentityExchangeUnreachable(_)
            | AppError::ProfileFetchFailed(_)
            | AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.to_string()
            }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;
