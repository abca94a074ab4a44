//! Bearer token authentication.
//!
//! Tokens are HS256 JWTs whose `sub` is a user id. The middleware looks the
//! user up on every request so a timezone change is visible immediately,
//! then hands handlers a `CallerContext` through request extensions.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use calendar_sdk::CallerContext;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::problem::Problem;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no bearer token or token cookie")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token lifetime out of range")]
    TtlOutOfRange,
}

/// Signs and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    #[must_use]
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token for `user_id` valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Fails when `ttl` overflows the clock or signing fails.
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, AuthError> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|_| AuthError::TtlOutOfRange)?;
        let exp = Utc::now()
            .checked_add_signed(ttl)
            .ok_or(AuthError::TtlOutOfRange)?
            .timestamp();

        let claims = Claims { sub: user_id, exp };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// # Errors
    ///
    /// Fails on a bad signature, an expired token or malformed claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

#[derive(Clone)]
pub struct AuthState {
    pub keys: Arc<JwtKeys>,
    pub service: Arc<Service>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value)
        .filter(|t| !t.is_empty())
}

/// Extract the token from the `Authorization` header, falling back to the
/// `token` cookie.
///
/// # Errors
///
/// Returns `AuthError::MissingToken` when neither is present.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    bearer_token(headers)
        .or_else(|| cookie_token(headers))
        .ok_or(AuthError::MissingToken)
}

/// Middleware: verify the token, resolve the user and attach a
/// `CallerContext` carrying the user's id and preferred timezone.
///
/// # Errors
///
/// Responds 401 for a missing or invalid token or an unknown user.
pub async fn authenticate(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Problem> {
    let claims = extract_token(req.headers())
        .and_then(|token| state.keys.verify(token))
        .map_err(|e| {
            debug!(error = %e, "Rejecting request");
            Problem::from(DomainError::Unauthorized)
        })?;

    let user = state.service.authenticate(claims.sub).await?;

    let ctx = CallerContext::builder()
        .caller_id(user.id)
        .caller_timezone(&user.timezone)
        .build();
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
