//! Application context shared by all route handlers via Axum state.

use std::sync::Arc;

use memoria_core::config::Config;
use memoria_store::DocumentStore;

use crate::identity::{self, IdentityVerifier};

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s. The store is
/// constructed by the process entry point and passed in here; nothing in
/// the server reaches for a global handle.
#[derive(Clone)]
pub struct AppContext {
    /// Document store holding users, folders and items.
    pub store: Arc<dyn DocumentStore>,
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Decides whether a caller may act as the user in the path.
    pub identity: Arc<dyn IdentityVerifier>,
}

impl AppContext {
    /// Build a context, choosing the identity verifier from `config.auth`.
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        let identity = identity::from_config(&config.auth);
        Self {
            store,
            config: Arc::new(config),
            identity,
        }
    }

    /// Replace the identity verifier.
    pub fn with_identity(mut self, identity: Arc<dyn IdentityVerifier>) -> Self {
        self.identity = identity;
        self
    }
}
