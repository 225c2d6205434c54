//! 백엔드 발급 액세스 토큰 검증
//!
//! 백엔드가 사용하는 알고리즘과 키(세션 계층과 다름)로 서명을 검증하고
//! `sub` 클레임을 사용자 식별자(`user_uuid`)로 추출합니다.
//!
//! 서명 불일치, 형식 오류, 검증 시점 기준 만료, 알고리즘 불일치는 모두
//! `AppError::TokenVerificationFailed` 이며 호출자는 이를 "신원 확인 불가"로
//! 처리해야 합니다. 검증되지 않은 클레임을 대신 신뢰하는 경로는 없습니다.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;

use crate::config::{BackendKeyMaterial, BackendTokenConfig};
use crate::domain::models::token::BackendTokenClaims;
use crate::errors::errors::{AppError, AppResult};

/// RSA 공개키 최소 크기 (비트)
const MIN_RSA_KEY_BITS: usize = 2048;

pub struct BackendTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl BackendTokenVerifier {
    /// 설정으로부터 검증기를 만듭니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - 키 형식이 알고리즘과 맞지 않거나 RSA 키가 너무 작을 때
    pub fn new(config: &BackendTokenConfig) -> AppResult<Self> {
        let decoding_key = match (&config.key, config.algorithm) {
            (BackendKeyMaterial::Hmac(secret), Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) => {
                DecodingKey::from_secret(secret)
            }
            (BackendKeyMaterial::RsaPublicPem(pem), Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512) => {
                ensure_rsa_key_strength(pem)?;
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AppError::ConfigError(format!("백엔드 공개키 로드 실패: {}", e)))?
            }
            (key, algorithm) => {
                return Err(AppError::ConfigError(format!(
                    "백엔드 키 {:?} 는 알고리즘 {:?} 와 맞지 않습니다",
                    key, algorithm
                )));
            }
        };

        // 알고리즘을 하나로 고정하고 exp/sub 를 필수로 요구
        let mut validation = Validation::new(config.algorithm);
        validation.leeway = config.leeway_seconds;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// 토큰을 검증하고 클레임을 돌려줍니다.
    pub fn verify_claims(&self, token: &str) -> AppResult<BackendTokenClaims> {
        decode::<BackendTokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::TokenVerificationFailed("백엔드 토큰이 만료되었습니다".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
                    AppError::TokenVerificationFailed("백엔드 토큰 알고리즘이 일치하지 않습니다".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::TokenVerificationFailed("백엔드 토큰 서명이 유효하지 않습니다".to_string())
                }
                _ => AppError::TokenVerificationFailed(format!("백엔드 토큰 검증 실패: {}", e)),
            })
    }

    /// 토큰을 검증하고 사용자 식별자(`sub`)를 추출합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::TokenVerificationFailed` - 검증 실패 또는 빈 `sub`
    pub fn verify(&self, token: &str) -> AppResult<String> {
        let claims = self.verify_claims(token)?;
        let user_uuid = claims.sub.trim();

        if user_uuid.is_empty() {
            return Err(AppError::TokenVerificationFailed(
                "백엔드 토큰에 subject가 없습니다".to_string(),
            ));
        }
        Ok(user_uuid.to_string())
    }
}

/// PEM 을 파싱해 RSA 공개키 크기를 확인합니다. (SPKI 또는 PKCS#1)
fn ensure_rsa_key_strength(pem: &str) -> AppResult<()> {
    let public_key = RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| AppError::ConfigError(format!("백엔드 RSA 공개키 파싱 실패: {}", e)))?;

    let bits = public_key.size() * 8;
    if bits < MIN_RSA_KEY_BITS {
        return Err(AppError::ConfigError(format!(
            "백엔드 RSA 공개키가 너무 작습니다: {} bits (최소 {})",
            bits, MIN_RSA_KEY_BITS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const BACKEND_SECRET: &[u8] = b"backend-shared-secret";

    fn verifier() -> BackendTokenVerifier {
        BackendTokenVerifier::new(&BackendTokenConfig::hmac(Algorithm::HS256, BACKEND_SECRET)).unwrap()
    }

    fn backend_token(algorithm: Algorithm, secret: &[u8], sub: &str, exp_offset: Duration) -> String {
        let claims = BackendTokenClaims {
            sub: sub.to_string(),
            exp: (Utc::now() + exp_offset).timestamp(),
            iat: Some(Utc::now().timestamp()),
            iss: Some("budget-backend".to_string()),
        };
        encode(&Header::new(algorithm), &claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let token = backend_token(Algorithm::HS256, BACKEND_SECRET, "user-uuid-1", Duration::hours(1));
        assert_eq!(verifier().verify(&token).unwrap(), "user-uuid-1");
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let token = backend_token(Algorithm::HS256, b"other-secret", "user-uuid-1", Duration::hours(1));
        assert!(matches!(
            verifier().verify(&token),
            Err(AppError::TokenVerificationFailed(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = backend_token(Algorithm::HS256, BACKEND_SECRET, "user-uuid-1", Duration::seconds(-10));
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn test_algorithm_is_pinned() {
        let token = backend_token(Algorithm::HS512, BACKEND_SECRET, "user-uuid-1", Duration::hours(1));
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn test_unsigned_token_is_rejected() {
        // {"alg":"none","typ":"JWT"} . {"sub":"user-uuid-1","exp":9999999999} .
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJzdWIiOiJ1c2VyLXV1aWQtMSIsImV4cCI6OTk5OTk5OTk5OX0.";
        assert!(verifier().verify(token).is_err());
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        assert!(verifier().verify("not-a-jwt").is_err());
    }

    #[test]
    fn test_empty_subject_is_rejected() {
        let token = backend_token(Algorithm::HS256, BACKEND_SECRET, "  ", Duration::hours(1));
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn test_issuer_pin() {
        let mut config = BackendTokenConfig::hmac(Algorithm::HS256, BACKEND_SECRET);
        config.issuer = Some("another-issuer".to_string());
        let pinned = BackendTokenVerifier::new(&config).unwrap();

        let token = backend_token(Algorithm::HS256, BACKEND_SECRET, "user-uuid-1", Duration::hours(1));
        assert!(pinned.verify(&token).is_err());
    }

    #[test]
    fn test_key_algorithm_mismatch_is_config_error() {
        let config = BackendTokenConfig {
            algorithm: Algorithm::RS256,
            key: BackendKeyMaterial::Hmac(BACKEND_SECRET.to_vec()),
            issuer: None,
            leeway_seconds: 0,
        };
        assert!(matches!(
            BackendTokenVerifier::new(&config),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_rsa_pem_is_config_error() {
        let config = BackendTokenConfig {
            algorithm: Algorithm::RS256,
            key: BackendKeyMaterial::RsaPublicPem("-----BEGIN PUBLIC KEY-----\nnope\n-----END PUBLIC KEY-----".to_string()),
            issuer: None,
            leeway_seconds: 0,
        };
        assert!(BackendTokenVerifier::new(&config).is_err());
    }
}
