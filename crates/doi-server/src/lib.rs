//! doi-server: HTTP API server for the journal resolution service
//!
//! This crate provides:
//! - `GET /journal?doi=` resolving a DOI to its journal record
//! - `GET /health`
//! - Environment-driven configuration
//! - JSON error responses with stable error codes
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//!
//! # Usage
//!
//! ```rust,ignore
//! use doi_server::{AppState, ServerConfig, build_app};
//!
//! let config = ServerConfig::from_env()?;
//! let app = build_app(AppState::new(resolver, config))?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod external_id;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{propagate_request_id, request_id_layer};

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use external_id::IdExternalizer;
pub use state::AppState;

// Re-export dependent crates
pub use doi_resolver;
pub use doi_store;

/// Build the router with the full middleware stack.
pub fn build_app(state: AppState) -> Result<Router, ConfigError> {
    let cors = build_cors_layer(&state.config().cors_allowed_origins)?;

    Ok(routes::build_router(state)
        .layer(axum::middleware::from_fn(propagate_request_id))
        .layer(request_id_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Build CORS layer from configuration.
pub fn build_cors_layer(allowed_origins: &str) -> Result<CorsLayer, ConfigError> {
    if allowed_origins.trim() == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    // Parse comma-separated origins
    let origins = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>()
                .map_err(|e| ConfigError::InvalidValue {
                    name: "CORS_ALLOWED_ORIGINS".to_string(),
                    reason: format!("{s}: {e}"),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_accepts_wildcard_and_lists() {
        assert!(build_cors_layer("*").is_ok());
        assert!(build_cors_layer("http://a.example, https://b.example").is_ok());
    }

    #[test]
    fn cors_rejects_unparsable_origin() {
        assert!(matches!(
            build_cors_layer("http://ok.example,bad\norigin"),
            Err(ConfigError::InvalidValue { name, .. }) if name == "CORS_ALLOWED_ORIGINS"
        ));
    }
}
