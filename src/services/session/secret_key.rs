//! 세션 서명 키 확장
//!
//! 설정된 시크릿이 서명 알고리즘이 요구하는 길이보다 짧으면 시크릿 바이트를
//! 순환 반복해서 필요한 길이를 채웁니다. 0 패딩이나 잘라내기는 하지 않습니다.
//!
//! ```text
//! secret = "abc", L = 8
//! key    = a b c a b c a b      key[i] = secret[i mod 3]
//! ```

use log::warn;

use crate::errors::errors::{AppError, AppResult};

/// HS512 서명 키 최소 길이 (바이트)
pub const HS512_MIN_KEY_BYTES: usize = 64;

/// 길이 `max(min_len, len(secret))` 의 서명 키를 만듭니다.
///
/// 같은 시크릿은 항상 같은 키가 됩니다. 패딩 경로에서 경고 로그를 남기지만
/// 결과에는 영향이 없습니다.
///
/// # Errors
///
/// * `AppError::ConfigError` - 빈 시크릿
pub fn derive_signing_key(secret: &str, min_len: usize) -> AppResult<Vec<u8>> {
    let bytes = secret.as_bytes();
    if bytes.is_empty() {
        return Err(AppError::ConfigError("세션 시크릿이 비어 있습니다".to_string()));
    }

    if bytes.len() >= min_len {
        return Ok(bytes.to_vec());
    }

    warn!(
        "⚠️ 세션 시크릿이 {}바이트로 {}바이트보다 짧습니다. 순환 반복으로 확장합니다",
        bytes.len(),
        min_len
    );
    Ok(bytes.iter().copied().cycle().take(min_len).collect())
}
