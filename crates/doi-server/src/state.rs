//! Application state shared across handlers.

use std::sync::Arc;

use doi_resolver::JournalResolver;

use crate::config::ServerConfig;
use crate::external_id::IdExternalizer;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Resolution engine, including the admission gate.
    resolver: JournalResolver,
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// Internal to public journal id mapping.
    externalizer: Arc<IdExternalizer>,
}

impl AppState {
    /// Create new application state.
    pub fn new(resolver: JournalResolver, config: ServerConfig) -> Self {
        let externalizer =
            IdExternalizer::new(&config.repository_base_uri, &config.public_base_uri);
        Self {
            resolver,
            config: Arc::new(config),
            externalizer: Arc::new(externalizer),
        }
    }

    /// Get a reference to the journal resolver.
    pub fn resolver(&self) -> &JournalResolver {
        &self.resolver
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn externalizer(&self) -> &IdExternalizer {
        &self.externalizer
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
