//! # 문자열 유틸리티
//!
//! 프로바이더 응답 정리와 리다이렉트 경로 검증에 쓰는 함수들입니다.

use serde::Deserialize;

/// 선택적 문자열 필드 정리
///
/// 앞뒤 공백을 제거하고, 비어 있으면 `None` 으로 바꿉니다.
/// 프로바이더마다 "값 없음"을 `null`, `""`, `" "` 등으로 다르게 표현하기 때문에
/// 정규화 전에 항상 거칩니다.
///
/// # 예제
/// ```rust,ignore
/// assert_eq!(clean_optional_string(Some("  홍길동 ".to_string())), Some("홍길동".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Serde 역직렬화 시 선택적 문자열을 정리합니다.
///
/// `#[serde(default, deserialize_with = "deserialize_optional_string")]` 형태로 사용합니다.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 로그인 후 돌아갈 경로를 같은 출처의 상대 경로로 제한합니다.
///
/// `/` 로 시작하고 `//` 나 `/\` 로 시작하지 않는 경로만 허용하며,
/// 그 외에는 `fallback` 을 반환합니다. (open redirect 방지)
pub fn sanitize_callback_url(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("Hello".to_string())), Some("Hello".to_string()));
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("".to_string())), None);
        assert_eq!(clean_optional_string(Some("\t\n".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct Profile {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            nickname: Option<String>,
        }

        let result: Profile = serde_json::from_str(r#"{"nickname": "  가계부왕  "}"#).unwrap();
        assert_eq!(result.nickname, Some("가계부왕".to_string()));

        let result: Profile = serde_json::from_str(r#"{"nickname": "   "}"#).unwrap();
        assert_eq!(result.nickname, None);

        let result: Profile = serde_json::from_str(r#"{"nickname": null}"#).unwrap();
        assert_eq!(result.nickname, None);

        let result: Profile = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(result.nickname, None);
    }

    #[test]
    fn test_sanitize_callback_url_accepts_relative_paths() {
        assert_eq!(sanitize_callback_url(Some("/dashboard"), "/"), "/dashboard");
        assert_eq!(
            sanitize_callback_url(Some("/families/1?tab=members"), "/"),
            "/families/1?tab=members"
        );
    }

    #[test]
    fn test_sanitize_callback_url_rejects_external_targets() {
        assert_eq!(sanitize_callback_url(Some("https://evil.example.com"), "/"), "/");
        assert_eq!(sanitize_callback_url(Some("//evil.example.com"), "/"), "/");
        assert_eq!(sanitize_callback_url(Some("/\\evil.example.com"), "/"), "/");
        assert_eq!(sanitize_callback_url(Some("dashboard"), "/"), "/");
        assert_eq!(sanitize_callback_url(None, "/home"), "/home");
    }
}
