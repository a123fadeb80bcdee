//! JWT token issuance and validation
//!
//! Tokens are stateless HMAC-signed JWS strings. Validity is decided by two
//! independent gates: the signature must verify against the configured secret
//! and algorithm, and `exp` must still be in the future. There is no
//! revocation list, so a leaked token stays usable until it expires.

use crate::{
    config::AppConfig,
    error::{AppError, AuthError},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{str::FromStr, time::Duration};
use uuid::Uuid;

/// Claim names owned by the issuer; callers cannot smuggle them in via `extra`.
const RESERVED_CLAIMS: [&str; 4] = ["sub", "exp", "iat", "jti"];

/// JWT claim set: required subject and expiry plus an open extension map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject (user ID)
    pub sub: String,

    /// Expiration (unix seconds)
    pub exp: i64,

    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// JWT ID (unique token identifier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Application-defined claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClaimSet {
    /// Claim set for a subject; `exp` is filled in at issuance.
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            exp: 0,
            iat: None,
            jti: None,
            extra: Map::new(),
        }
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Expiry as a timestamp, if representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
    leeway_secs: u64,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let security = &config.security;
        let secret = security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HMAC
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let algorithm = Algorithm::from_str(&security.jwt_algorithm.to_uppercase())
            .map_err(|_| AppError::Config(format!("Unknown JWT algorithm: {}", security.jwt_algorithm)))?;

        Self::new(
            secret.as_bytes(),
            algorithm,
            Duration::from_secs(security.access_token_exp_secs),
            security.leeway_secs,
        )
    }

    pub fn new(
        secret: &[u8],
        algorithm: Algorithm,
        default_ttl: Duration,
        leeway_secs: u64,
    ) -> Result<Self, AppError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AppError::Config(format!(
                "Unsupported JWT algorithm {:?}: only HMAC algorithms are allowed",
                algorithm
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            default_ttl,
            leeway_secs,
        })
    }

    /// TTL applied when `issue` is called without one
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign a token for `claims`.
    ///
    /// `exp` is overwritten with `now + ttl` (default TTL when `ttl` is
    /// `None`), `iat` with now and `jti` with a fresh UUID, so two issuances
    /// never produce the same token.
    pub fn issue(&self, claims: &ClaimSet, ttl: Option<Duration>) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = ttl.unwrap_or(self.default_ttl);
        let ttl_secs = i64::try_from(ttl.as_secs())
            .map_err(|_| AuthError::Encoding("ttl out of range".to_string()))?;

        let mut to_encode = claims.clone();
        to_encode.extra.retain(|name, _| !RESERVED_CLAIMS.contains(&name.as_str()));
        to_encode.iat = Some(now.timestamp());
        to_encode.exp = now
            .timestamp()
            .checked_add(ttl_secs)
            .ok_or_else(|| AuthError::Encoding("exp overflows".to_string()))?;
        to_encode.jti = Some(Uuid::new_v4().to_string());

        encode(&Header::new(self.algorithm), &to_encode, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            AuthError::Encoding(e.to_string())
        })
    }

    /// Issue a default-TTL token carrying only a subject
    pub fn issue_for_subject(&self, sub: impl Into<String>) -> Result<String, AuthError> {
        self.issue(&ClaimSet::new(sub), None)
    }

    /// Validate a token against the wall clock
    pub fn validate(&self, token: &str) -> Result<ClaimSet, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`.
    ///
    /// Order: structure, algorithm and signature, claim shape, expiry. A
    /// token only passes when every gate passes.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<ClaimSet, AuthError> {
        // Expiry is checked below with our own semantics (expired once now >= exp).
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        let payload = decode::<Value>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                let mapped = match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                };
                tracing::debug!(error = ?e, outcome = mapped.kind(), "Token decode failed");
                mapped
            })?
            .claims;

        let claims: ClaimSet = serde_json::from_value(payload).map_err(|e| {
            tracing::debug!(error = %e, "Token claims rejected");
            AuthError::MalformedClaims(e.to_string())
        })?;

        let leeway = i64::try_from(self.leeway_secs).unwrap_or(i64::MAX);
        let deadline = claims.exp.saturating_add(leeway);
        if now.timestamp() >= deadline {
            tracing::debug!(sub = %claims.sub, exp = claims.exp, "Token expired");
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}
