//! 세션 토큰 코덱
//!
//! 게이트웨이 자신의 세션 토큰을 HS512 로 서명/검증합니다. 백엔드 토큰과는
//! 키도 알고리즘도 다르며, 만료(기본 30일)도 백엔드 토큰 만료와 무관합니다.
//!
//! 페이로드는 `{userUuid, accessTokenExpires, iat, exp}` 뿐입니다.
//! 백엔드 액세스/리프레시 토큰 값은 절대 들어가지 않습니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::SessionConfig;
use crate::domain::models::token::{SessionClaims, SessionTokenPayload};
use crate::errors::errors::{AppError, AppResult};
use crate::services::session::secret_key::{derive_signing_key, HS512_MIN_KEY_BYTES};

pub struct SessionTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    max_age: Duration,
}

impl SessionTokenCodec {
    pub const ALGORITHM: Algorithm = Algorithm::HS512;

    pub fn new(config: &SessionConfig) -> AppResult<Self> {
        let key = derive_signing_key(&config.secret, HS512_MIN_KEY_BYTES)?;

        // 알고리즘 혼동 방지: HS512 만 허용
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&key),
            decoding_key: DecodingKey::from_secret(&key),
            validation,
            max_age: Duration::days(config.max_age_days),
        })
    }

    /// 세션 토큰 절대 만료 기간
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// 클레임을 서명합니다. `exp = now + max_age`.
    pub fn encode(&self, claims: &SessionClaims, now: DateTime<Utc>) -> AppResult<String> {
        let expires_at = now
            .checked_add_signed(self.max_age)
            .ok_or_else(|| AppError::InternalError("세션 토큰 만료 시각이 범위를 벗어났습니다".to_string()))?;

        let payload = SessionTokenPayload {
            user_uuid: claims.user_uuid.clone(),
            access_token_expires: claims.access_token_expires,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Self::ALGORITHM), &payload, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("세션 토큰 생성 실패: {}", e)))
    }

    /// 서명, 알고리즘, 만료를 검증합니다. 어떤 실패든 `None` 입니다.
    pub fn decode(&self, token: &str) -> Option<SessionClaims> {
        match decode::<SessionTokenPayload>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims.into()),
            Err(e) => {
                log::debug!("세션 토큰 검증 실패: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "family-budget-session-secret-0123456789";

    fn codec() -> SessionTokenCodec {
        SessionTokenCodec::new(&SessionConfig::new(SECRET.to_string(), 30).unwrap()).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let codec = codec();
        let cases = [
            SessionClaims::new("0b6f2d2e-6a53-4a0f-9d0c-6c0b9d1f6b1e", 1_700_000_000_000),
            SessionClaims::new("user-2", 0),
            SessionClaims::new("가계부-사용자", i64::MAX / 2),
        ];

        for claims in cases {
            let token = codec.encode(&claims, Utc::now()).unwrap();
            assert_eq!(codec.decode(&token), Some(claims));
        }
    }

    #[test]
    fn test_session_expiry_is_independent_of_access_expiry() {
        let codec = codec();
        let now = Utc::now();
        // 백엔드 토큰은 이미 만료되었어도 세션 토큰은 유효
        let claims = SessionClaims::new("user-1", now.timestamp_millis() - 1_000);

        let token = codec.encode(&claims, now).unwrap();
        assert_eq!(codec.decode(&token), Some(claims));
    }

    #[test]
    fn test_expired_session_token_is_rejected() {
        let codec = codec();
        let issued = Utc::now() - Duration::days(31);

        let token = codec.encode(&SessionClaims::new("user-1", 0), issued).unwrap();
        assert_eq!(codec.decode(&token), None);
    }

    #[test]
    fn test_other_algorithm_with_same_key_is_rejected() {
        let key = derive_signing_key(SECRET, HS512_MIN_KEY_BYTES).unwrap();
        let payload = SessionTokenPayload {
            user_uuid: "user-1".to_string(),
            access_token_expires: 0,
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &payload, &EncodingKey::from_secret(&key)).unwrap();

        assert_eq!(codec().decode(&token), None);
    }

    #[test]
    fn test_other_key_is_rejected() {
        let other = SessionTokenCodec::new(
            &SessionConfig::new("another-session-secret-0123456789abcdef".to_string(), 30).unwrap(),
        )
        .unwrap();
        let token = other.encode(&SessionClaims::new("user-1", 0), Utc::now()).unwrap();

        assert_eq!(codec().decode(&token), None);
    }

    #[test]
    fn test_unsigned_token_is_rejected() {
        // {"alg":"none"} . {"userUuid":"user-1","accessTokenExpires":0,"iat":0,"exp":9999999999} .
        let token = "eyJhbGciOiJub25lIn0.eyJ1c2VyVXVpZCI6InVzZXItMSIsImFjY2Vzc1Rva2VuRXhwaXJlcyI6MCwiaWF0IjowLCJleHAiOjk5OTk5OTk5OTl9.";
        assert_eq!(codec().decode(token), None);
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(codec().decode(""), None);
        assert_eq!(codec().decode("a.b.c"), None);
    }

    #[test]
    fn test_out_of_range_expiry_is_an_error() {
        let codec = codec();
        let far_future = DateTime::<Utc>::MAX_UTC - Duration::days(1);

        assert!(matches!(
            codec.encode(&SessionClaims::new("user-1", 0), far_future),
            Err(AppError::InternalError(_))
        ));
    }
}
