//! JWT token service implementation.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reelvault_core::domain::IdentityClaim;
use reelvault_core::ports::{AuthError, IssuedToken, TokenService, TokenSubject};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "reelvault-api".to_string(),
            leeway_secs: 0,
        }
    }
}

impl JwtConfig {
    /// Read `JWT_SECRET`, `JWT_EXPIRATION_HOURS`, `JWT_ISSUER` and
    /// `JWT_LEEWAY_SECS`, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);

        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        Self {
            secret,
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|h: &i64| *h > 0)
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            leeway_secs: std::env::var("JWT_LEEWAY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.leeway_secs),
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    exp: i64,
    iat: i64,
    iss: String,
}

/// HS256 bearer tokens carrying only the user id as subject.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = config.leeway_secs;

        Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    fn ttl(&self) -> TimeDelta {
        TimeDelta::hours(self.config.expiration_hours)
    }

    fn issue_at(
        &self,
        claim: &IdentityClaim,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = issued_at + self.ttl();

        let claims = Claims {
            sub: claim.user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl_seconds(),
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, claim: &IdentityClaim) -> Result<IssuedToken, AuthError> {
        self.issue_at(claim, Utc::now())
    }

    fn validate(&self, token: &str) -> Result<TokenSubject, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    ErrorKind::InvalidToken
                    | ErrorKind::Base64(_)
                    | ErrorKind::Json(_)
                    | ErrorKind::Utf8(_)
                    | ErrorKind::MissingRequiredClaim(_) => {
                        AuthError::MalformedToken(e.to_string())
                    }
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::MalformedToken(e.to_string()))?;

        Ok(TokenSubject {
            user_id,
            issued_at: token_data.claims.iat,
            expires_at: token_data.claims.exp,
        })
    }

    fn ttl_seconds(&self) -> i64 {
        self.ttl().num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
            leeway_secs: 0,
        }
    }

    fn claim() -> IdentityClaim {
        IdentityClaim {
            user_id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_issue_then_validate() {
        let service = JwtTokenService::new(test_config());
        let claim = claim();

        let issued = service.issue(&claim).unwrap();
        assert!(!issued.token.is_empty());
        assert_eq!(issued.expires_in, 3600);

        let subject = service.validate(&issued.token).unwrap();
        assert_eq!(subject.user_id, claim.user_id);
        assert_eq!(subject.expires_at - subject.issued_at, 3600);
    }

    #[test]
    fn test_expired_after_ttl_boundary() {
        let service = JwtTokenService::new(test_config());

        let past_boundary = Utc::now() - TimeDelta::hours(1) - TimeDelta::seconds(5);
        let issued = service.issue_at(&claim(), past_boundary).unwrap();
        assert!(matches!(
            service.validate(&issued.token),
            Err(AuthError::TokenExpired)
        ));

        let inside_window = Utc::now() - TimeDelta::hours(1) + TimeDelta::seconds(60);
        let issued = service.issue_at(&claim(), inside_window).unwrap();
        assert!(service.validate(&issued.token).is_ok());
    }

    #[test]
    fn test_structurally_invalid_token_is_malformed() {
        let service = JwtTokenService::new(test_config());

        assert!(matches!(
            service.validate("invalid-token"),
            Err(AuthError::MalformedToken(_))
        ));
        assert!(matches!(
            service.validate(""),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_foreign_signature_is_invalid() {
        let issuer = JwtTokenService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        });
        let validator = JwtTokenService::new(test_config());

        let issued = issuer.issue(&claim()).unwrap();
        assert!(matches!(
            validator.validate(&issued.token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = JwtTokenService::new(test_config());
        let issued = service.issue(&claim()).unwrap();

        let mut parts: Vec<&str> = issued.token.split('.').collect();
        let other = service.issue(&claim()).unwrap();
        let other_payload = other.token.split('.').nth(1).unwrap().to_string();
        parts[1] = &other_payload;
        let forged = parts.join(".");

        assert!(matches!(
            service.validate(&forged),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let service1 = JwtTokenService::new(JwtConfig {
            issuer: "issuer1".to_string(),
            ..test_config()
        });
        let service2 = JwtTokenService::new(JwtConfig {
            issuer: "issuer2".to_string(),
            ..test_config()
        });

        let issued = service1.issue(&claim()).unwrap();
        assert!(matches!(
            service2.validate(&issued.token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_default_ttl_is_a_day() {
        let service = JwtTokenService::new(JwtConfig::default());
        assert_eq!(service.ttl_seconds(), 86400);
    }
}
