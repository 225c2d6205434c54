//! 서버 및 백엔드 연동 설정 관리 모듈
//!
//! 실행 환경, 서버 바인딩, Rate Limiting, 원격 백엔드 연결 관련 설정을 관리합니다.

use std::time::Duration;

use crate::errors::errors::{AppError, AppResult};

/// 환경 변수 조회 함수
///
/// 운영에서는 `std::env::var` 를 감싸고, 테스트에서는 `HashMap` 조회를 주입합니다.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// 값을 파싱하고 실패 시 기본값을 사용합니다.
pub(crate) fn parse_or<T: std::str::FromStr>(lookup: EnvLookup<'_>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{} 파싱 실패: '{}'. 기본값 사용", key, raw);
            default
        }),
        None => default,
    }
}

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 쿠키 `Secure` 속성 활성화
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 또는 `NODE_ENV` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        let raw = lookup("ENVIRONMENT")
            .or_else(|| lookup("NODE_ENV"))
            .unwrap_or_else(|| "production".to_string());
        Self::from_str(&raw)
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

/// 서버 바인딩 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 호스트 주소. 기본값: "127.0.0.1"
    pub host: String,
    /// 포트 번호. 기본값: 8080
    pub port: u16,
    /// CORS 허용 Origin 목록 (`CORS_ALLOWED_ORIGINS`, 콤마 구분)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(lookup, "PORT", 8080),
            allowed_origins,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Rate Limiting 설정
///
/// * `RATE_LIMIT_PER_SECOND` - 초당 허용 요청 수 (기본값: 100)
/// * `RATE_LIMIT_BURST_SIZE` - 버스트 허용량 (기본값: 200)
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Self {
        Self {
            per_second: parse_or(lookup, "RATE_LIMIT_PER_SECOND", 100),
            burst_size: parse_or(lookup, "RATE_LIMIT_BURST_SIZE", 200),
        }
    }
}

/// 원격 가계부 백엔드 연결 설정
///
/// 재시도는 요청 타임아웃과 5xx/429/408 응답에만 적용되며,
/// 최대 재시도 횟수는 [`BackendConfig::MAX_RETRIES_CAP`] 로 제한됩니다.
///
/// # Environment Variables
///
/// ```bash
/// export BACKEND_BASE_URL="https://api.example.com"
/// export BACKEND_TIMEOUT_SECONDS="10"
/// export BACKEND_MAX_RETRIES="2"
/// export BACKEND_RETRY_DELAY_MS="200"
/// ```
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl BackendConfig {
    pub const MAX_RETRIES_CAP: u32 = 2;

    pub fn from_lookup(lookup: EnvLookup<'_>) -> AppResult<Self> {
        let base_url = lookup("BACKEND_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::ConfigError("BACKEND_BASE_URL must be set".to_string()))?;

        let requested_retries: u32 = parse_or(lookup, "BACKEND_MAX_RETRIES", Self::MAX_RETRIES_CAP);
        if requested_retries > Self::MAX_RETRIES_CAP {
            log::warn!(
                "BACKEND_MAX_RETRIES={} 는 허용 범위를 넘습니다. {} 로 제한합니다",
                requested_retries,
                Self::MAX_RETRIES_CAP
            );
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(parse_or(lookup, "BACKEND_TIMEOUT_SECONDS", 10)),
            max_retries: requested_retries.min(Self::MAX_RETRIES_CAP),
            retry_base_delay: Duration::from_millis(parse_or(lookup, "BACKEND_RETRY_DELAY_MS", 200)),
        })
    }

    /// 테스트 및 로컬 실행용 기본값
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
            max_retries: Self::MAX_RETRIES_CAP,
            retry_base_delay: Duration::from_millis(200),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
