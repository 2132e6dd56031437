//! Signed token issuance and verification

use std::collections::HashSet;
use std::fmt::Debug;
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::AuthConfig;
use crate::domain::auth::{AuthError, TokenClaims, TokenSubject};
use crate::domain::salesperson::SalespersonId;
use crate::domain::DomainError;

/// Token type label returned to clients alongside the token
pub const TOKEN_TYPE: &str = "Bearer";

/// Upper bound for a configured token lifetime (ten years)
pub const MAX_EXPIRATION_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// JWT claims as written into issued tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (salesperson ID, decimal string)
    pub sub: String,
    /// Email of the salesperson
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create claims for `subject` valid for `ttl` from `issued_at`
    pub fn new(
        subject: &TokenSubject,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, DomainError> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| DomainError::validation("Token lifetime is out of range"))?;

        Ok(Self {
            sub: subject.salesperson_id.to_string(),
            email: subject.email.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }
}

/// Claims as read back from a token. Everything except `exp` is optional
/// here so that semantic checks happen after signature verification.
#[derive(Debug, Deserialize)]
struct UnverifiedClaims {
    #[serde(default)]
    sub: Option<Value>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    iat: Option<i64>,
    exp: i64,
}

/// Configuration for the JWT service
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared secret for HMAC signing
    pub secret: String,
    /// Signing algorithm, shared by issue and verify
    pub algorithm: Algorithm,
    /// Default token lifetime in seconds
    pub expiration_seconds: u64,
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("algorithm", &self.algorithm)
            .field("expiration_seconds", &self.expiration_seconds)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new HS256 configuration
    pub fn new(secret: impl Into<String>, expiration_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            expiration_seconds,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::new("your-secret-key-change-in-production", 86_400)
    }
}

impl TryFrom<&AuthConfig> for JwtConfig {
    type Error = DomainError;

    fn try_from(config: &AuthConfig) -> Result<Self, Self::Error> {
        if config.jwt_secret.is_empty() {
            return Err(DomainError::configuration("JWT secret must not be empty"));
        }

        if config.jwt_expire_seconds == 0 || config.jwt_expire_seconds > MAX_EXPIRATION_SECONDS {
            return Err(DomainError::configuration(format!(
                "JWT expiration must be between 1 and {} seconds",
                MAX_EXPIRATION_SECONDS
            )));
        }

        let algorithm = parse_algorithm(&config.jwt_algorithm)?;

        Ok(
            Self::new(config.jwt_secret.clone(), config.jwt_expire_seconds)
                .with_algorithm(algorithm),
        )
    }
}

/// Parse a signing algorithm name. Only the symmetric HMAC family is usable
/// with a shared secret.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, DomainError> {
    let algorithm = Algorithm::from_str(name.trim()).map_err(|_| {
        DomainError::configuration(format!("Unknown JWT algorithm: {}", name))
    })?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(DomainError::configuration(format!(
            "Unsupported JWT algorithm: {:?}. Use HS256, HS384 or HS512.",
            other
        ))),
    }
}

/// Token issuance and verification
pub trait TokenService: Send + Sync + Debug {
    /// Issue a token for `subject` with the configured lifetime
    fn issue(&self, subject: &TokenSubject) -> Result<String, DomainError>;

    /// Issue a token for `subject` with an explicit lifetime
    fn issue_with_ttl(&self, subject: &TokenSubject, ttl: Duration) -> Result<String, DomainError>;

    /// Verify a token and return its claims
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Configured token lifetime in seconds
    fn expiration_seconds(&self) -> u64;
}

/// HMAC JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create a JWT service with default configuration
    pub fn with_default_config() -> Self {
        Self::new(JwtConfig::default())
    }

    pub fn algorithm(&self) -> Algorithm {
        self.config.algorithm
    }

    /// Default lifetime as a duration
    pub fn default_ttl(&self) -> Duration {
        Duration::seconds(self.lifetime_seconds() as i64)
    }

    /// Configured lifetime, capped at [`MAX_EXPIRATION_SECONDS`]
    fn lifetime_seconds(&self) -> u64 {
        self.config.expiration_seconds.min(MAX_EXPIRATION_SECONDS)
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_at(
        &self,
        subject: &TokenSubject,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, DomainError> {
        let claims = JwtClaims::new(subject, issued_at, ttl)?;

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// Signature, structure, expiry and subject failures all collapse into
    /// [`AuthError::InvalidToken`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let token_data = decode::<UnverifiedClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|_| AuthError::InvalidToken)?;
        let claims = token_data.claims;

        if now.timestamp() > claims.exp {
            return Err(AuthError::InvalidToken);
        }

        let subject = claims
            .sub
            .as_ref()
            .and_then(parse_subject)
            .ok_or(AuthError::InvalidToken)?;

        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(AuthError::InvalidToken)?;
        let issued_at = claims
            .iat
            .and_then(|iat| Utc.timestamp_opt(iat, 0).single());

        Ok(TokenClaims {
            subject,
            email: claims.email,
            issued_at,
            expires_at,
        })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.config.algorithm);
        // Expiry is checked against the caller's clock in verify_at
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);
        validation
    }
}

impl TokenService for JwtService {
    fn issue(&self, subject: &TokenSubject) -> Result<String, DomainError> {
        self.issue_with_ttl(subject, self.default_ttl())
    }

    fn issue_with_ttl(&self, subject: &TokenSubject, ttl: Duration) -> Result<String, DomainError> {
        self.issue_at(subject, Utc::now(), ttl)
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(token, Utc::now()).inspect_err(|_| {
            debug!("Token verification failed");
        })
    }

    fn expiration_seconds(&self) -> u64 {
        self.lifetime_seconds()
    }
}

/// Interpret a `sub` claim as a salesperson ID. Accepts the decimal string
/// form this service writes as well as a bare JSON integer.
fn parse_subject(sub: &Value) -> Option<SalespersonId> {
    match sub {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64().and_then(|id| SalespersonId::new(id).ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-12345";

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::new(SECRET, 86_400))
    }

    fn subject(id: i64, email: Option<&str>) -> TokenSubject {
        TokenSubject::new(SalespersonId::new(id).unwrap(), email.map(str::to_string))
    }

    fn sign_raw(claims: &Value, algorithm: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_service();
        let input = subject(1, Some("yamada@example.com"));

        let token = service.issue(&input).unwrap();
        assert!(!token.is_empty());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.token_subject(), input);
        assert!(claims.issued_at.is_some());
    }

    #[test]
    fn test_issue_without_email() {
        let service = create_service();
        let input = subject(10, None);

        let token = service.issue(&input).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.subject.value(), 10);
        assert!(claims.email.is_none());
    }

    #[test]
    fn test_default_ttl_sets_expiry() {
        let service = JwtService::new(JwtConfig::new(SECRET, 3_600));
        let issued_at = Utc::now();

        let token = service.issue_at(&subject(1, None), issued_at, service.default_ttl()).unwrap();
        let claims = service.verify_at(&token, issued_at).unwrap();

        assert_eq!(claims.expires_at.timestamp(), issued_at.timestamp() + 3_600);
    }

    #[test]
    fn test_out_of_range_ttl_is_an_error() {
        let service = create_service();

        let result = service.issue_with_ttl(&subject(1, None), Duration::days(365 * 300_000));
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let result = service.issue_at(
            &subject(1, None),
            DateTime::<Utc>::MAX_UTC,
            Duration::seconds(1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_lifetime_is_capped() {
        let service = JwtService::new(JwtConfig::new(SECRET, MAX_EXPIRATION_SECONDS * 2));
        let issued_at = Utc::now();

        let token = service.issue_at(&subject(1, None), issued_at, service.default_ttl()).unwrap();
        let claims = service.verify_at(&token, issued_at).unwrap();

        assert_eq!(service.expiration_seconds(), MAX_EXPIRATION_SECONDS);
        assert_eq!(
            (claims.expires_at.timestamp() - issued_at.timestamp()) as u64,
            service.expiration_seconds()
        );
    }

    #[test]
    fn test_verify_before_expiry() {
        let service = create_service();
        let issued_at = Utc::now();
        let ttl = Duration::minutes(30);

        let token = service.issue_at(&subject(1, None), issued_at, ttl).unwrap();

        assert!(service.verify_at(&token, issued_at + Duration::minutes(29)).is_ok());
        assert!(service.verify_at(&token, issued_at + ttl).is_ok());
    }

    #[test]
    fn test_verify_after_expiry() {
        let service = create_service();
        let issued_at = Utc::now();
        let ttl = Duration::minutes(30);

        let token = service.issue_at(&subject(1, None), issued_at, ttl).unwrap();

        let result = service.verify_at(&token, issued_at + ttl + Duration::seconds(1));
        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_expired_token_rejected_now() {
        let service = create_service();
        let past = Utc::now() - Duration::hours(2);

        let token = service.issue_at(&subject(1, None), past, Duration::hours(1)).unwrap();

        assert_eq!(service.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_tampered_token_rejected_at_every_position() {
        let service = create_service();
        let token = service.issue(&subject(1, Some("yamada@example.com"))).unwrap();

        for position in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            assert_eq!(
                service.verify(&tampered).unwrap_err(),
                AuthError::InvalidToken,
                "tampered byte at {} was accepted",
                position
            );
        }
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new(JwtConfig::new("secret-1", 86_400));
        let service2 = JwtService::new(JwtConfig::new("secret-2", 86_400));

        let token = service1.issue(&subject(1, None)).unwrap();

        assert_eq!(service2.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_malformed_tokens() {
        let service = create_service();

        for token in ["", "invalid-token", "a.b.c", "a.b", "...."] {
            assert_eq!(service.verify(token).unwrap_err(), AuthError::InvalidToken);
        }
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let service = create_service();
        let claims = serde_json::json!({
            "sub": "1",
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        });

        let token = sign_raw(&claims, Algorithm::HS512, SECRET);

        assert_eq!(service.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_unsigned_token_rejected() {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let service = create_service();
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({
                "sub": "1",
                "exp": (Utc::now() + Duration::hours(1)).timestamp(),
            })
            .to_string(),
        );
        let token = format!("{}.{}.", header, payload);

        assert_eq!(service.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_missing_subject_rejected() {
        let service = create_service();
        let claims = serde_json::json!({
            "email": "yamada@example.com",
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        });

        let token = sign_raw(&claims, Algorithm::HS256, SECRET);

        assert_eq!(service.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let service = create_service();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();

        for sub in [
            serde_json::json!("yamada"),
            serde_json::json!("0"),
            serde_json::json!(-5),
            serde_json::json!(1.5),
            serde_json::json!(null),
            serde_json::json!(["1"]),
        ] {
            let claims = serde_json::json!({ "sub": sub, "exp": exp });
            let token = sign_raw(&claims, Algorithm::HS256, SECRET);
            assert_eq!(
                service.verify(&token).unwrap_err(),
                AuthError::InvalidToken,
                "subject {} was accepted",
                sub
            );
        }
    }

    #[test]
    fn test_integer_subject_accepted() {
        let service = create_service();
        let claims = serde_json::json!({
            "sub": 7,
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        });

        let token = sign_raw(&claims, Algorithm::HS256, SECRET);
        let verified = service.verify(&token).unwrap();

        assert_eq!(verified.subject.value(), 7);
        assert!(verified.issued_at.is_none());
    }

    #[test]
    fn test_missing_expiry_rejected() {
        let service = create_service();
        let token = sign_raw(&serde_json::json!({ "sub": "1" }), Algorithm::HS256, SECRET);

        assert_eq!(service.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_configured_algorithm_round_trip() {
        let service = JwtService::new(JwtConfig::new(SECRET, 60).with_algorithm(Algorithm::HS512));
        let token = service.issue(&subject(3, None)).unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
        assert_eq!(service.verify(&token).unwrap().subject.value(), 3);
    }

    #[test]
    fn test_expiration_seconds() {
        let service = JwtService::new(JwtConfig::new("secret", 7_200));
        assert_eq!(service.expiration_seconds(), 7_200);
    }

    #[test]
    fn test_default_config() {
        let service = JwtService::with_default_config();
        assert_eq!(service.expiration_seconds(), 86_400);
        assert_eq!(service.algorithm(), Algorithm::HS256);
    }

    #[test]
    fn test_config_from_auth_config() {
        let auth = AuthConfig {
            jwt_secret: "s3cret".to_string(),
            jwt_algorithm: "HS384".to_string(),
            jwt_expire_seconds: 600,
        };

        let config = JwtConfig::try_from(&auth).unwrap();
        assert_eq!(config.algorithm, Algorithm::HS384);
        assert_eq!(config.expiration_seconds, 600);
    }

    #[test]
    fn test_config_rejects_bad_settings() {
        let base = AuthConfig::default();

        let empty_secret = AuthConfig {
            jwt_secret: String::new(),
            ..base.clone()
        };
        assert!(JwtConfig::try_from(&empty_secret).is_err());

        let asymmetric = AuthConfig {
            jwt_algorithm: "RS256".to_string(),
            ..base.clone()
        };
        assert!(JwtConfig::try_from(&asymmetric).is_err());

        let unknown = AuthConfig {
            jwt_algorithm: "HS999".to_string(),
            ..base.clone()
        };
        assert!(JwtConfig::try_from(&unknown).is_err());

        let zero_ttl = AuthConfig {
            jwt_expire_seconds: 0,
            ..base
        };
        assert!(JwtConfig::try_from(&zero_ttl).is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let service = create_service();
        let debug = format!("{:?}", service);

        assert!(!debug.contains(SECRET));
    }
}
