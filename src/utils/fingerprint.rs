//! 로그용 토큰 지문
//!
//! 토큰 원문은 절대 로그에 남기지 않습니다. 같은 토큰인지 추적해야 할 때는
//! SHA-256 다이제스트 앞 12자리만 사용합니다.
//!
//! 비밀값 비교용 상수 시간 비교도 여기에 둡니다.

use sha2::{Digest, Sha256};

const FINGERPRINT_LEN: usize = 12;

pub fn token_fingerprint(token: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(token.as_bytes()));
    digest[..FINGERPRINT_LEN].to_string()
}

/// 길이가 같으면 내용과 무관하게 같은 시간 안에 비교합니다.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
