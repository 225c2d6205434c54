use std::fmt;

/// 출력 시 값을 가리는 토큰 래퍼
///
/// 핸들러에 백엔드 액세스 토큰을 넘길 때 사용합니다. 직렬화를 구현하지 않으므로
/// 응답 JSON 에 실수로 실릴 수 없습니다.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken([REDACTED])")
    }
}
