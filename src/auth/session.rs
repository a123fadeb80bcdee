//! Current-user resolution from a bearer token

use crate::{
    auth::jwt::JwtService,
    error::{AppError, AuthError},
    models::user::Principal,
    repository::CredentialStore,
};
use axum::http::{header, HeaderMap};
use std::sync::Arc;

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. A missing header, a non-UTF-8
/// value, another scheme or an empty token all count as no token at all.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token.to_string())
}

pub struct SessionResolver {
    jwt_service: Arc<JwtService>,
    store: Arc<dyn CredentialStore>,
}

impl SessionResolver {
    pub fn new(jwt_service: Arc<JwtService>, store: Arc<dyn CredentialStore>) -> Self {
        Self { jwt_service, store }
    }

    /// Resolve the principal behind a bearer token.
    pub async fn resolve(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.jwt_service.validate(token)?;

        let user_id: i64 = claims.sub.parse().map_err(|_| {
            AuthError::MalformedClaims(format!("subject is not a user id: {}", claims.sub))
        })?;

        let user = self.store.find_by_id(user_id).await.map_err(|e| {
            tracing::error!(error = %e, "Credential store lookup failed");
            AuthError::Store(e.to_string())
        })?;

        match user {
            Some(user) if user.is_active => Ok(Principal::from(user)),
            _ => Err(AuthError::UnknownSubject),
        }
    }

    /// Extract the bearer token from `headers` and resolve it.
    ///
    /// Every authentication failure collapses into `AppError::Unauthorized`;
    /// the specific cause is only logged. A store outage stays a 500.
    pub async fn resolve_headers(&self, headers: &HeaderMap) -> Result<Principal, AppError> {
        let outcome = match extract_bearer(headers) {
            Ok(token) => self.resolve(&token).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(principal) => {
                metrics::counter!("auth_resolve_total", "outcome" => "ok").increment(1);
                Ok(principal)
            }
            Err(e) => {
                metrics::counter!("auth_resolve_total", "outcome" => e.kind()).increment(1);
                tracing::debug!(reason = e.kind(), "Rejected bearer token");
                Err(e.into())
            }
        }
    }
}
