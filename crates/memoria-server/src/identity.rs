//! Caller identity verification.
//!
//! Every `/api` route names a user in its path. An [`IdentityVerifier`]
//! decides whether the caller may act as that user. The verifier is chosen
//! from configuration at startup and injected through the app context.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header, HeaderMap};
use memoria_core::config::AuthConfig;
use memoria_core::{Error, Result, UserId};

/// Decides whether a request may act as `claimed`.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, claimed: &UserId, headers: &HeaderMap) -> Result<()>;
}

/// Accepts every caller as the user named in the path.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustedPath;

impl IdentityVerifier for TrustedPath {
    fn verify(&self, _claimed: &UserId, _headers: &HeaderMap) -> Result<()> {
        Ok(())
    }
}

/// Requires `Authorization: Bearer <token>` where the token is configured
/// for exactly the claimed user.
#[derive(Debug, Clone)]
pub struct StaticTokens {
    tokens: HashMap<String, String>,
}

impl StaticTokens {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }
}

impl IdentityVerifier for StaticTokens {
    fn verify(&self, claimed: &UserId, headers: &HeaderMap) -> Result<()> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Unauthorized("missing bearer token".into()))?;

        match self.tokens.get(token) {
            Some(owner) if owner == claimed.as_str() => Ok(()),
            Some(_) => Err(Error::Unauthorized(format!(
                "token is not valid for user {claimed}"
            ))),
            None => Err(Error::Unauthorized("unknown token".into())),
        }
    }
}

/// Pick the verifier the configuration asks for.
pub fn from_config(auth: &AuthConfig) -> Arc<dyn IdentityVerifier> {
    if auth.enabled {
        Arc::new(StaticTokens::new(auth.tokens.clone()))
    } else {
        tracing::warn!("auth is disabled; user ids in request paths are trusted as given");
        Arc::new(TrustedPath)
    }
}
