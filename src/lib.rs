pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenIssuer;
use crate::config::SecurityConfig;
use crate::database::{RecordStore, Resource, ResourceRepository};
use crate::services::CredentialStore;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(records: Arc<dyn RecordStore>, credentials: CredentialStore, tokens: TokenIssuer) -> Self {
        Self {
            records,
            credentials: Arc::new(credentials),
            tokens: Arc::new(tokens),
        }
    }

    pub fn repository(&self, resource: Resource) -> ResourceRepository {
        ResourceRepository::new(resource, self.records.clone())
    }
}

pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_get))
        .merge(auth_routes(state.clone()))
        .merge(handlers::data::routes())
        .with_state(state)
        // Global middleware, outermost first
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    use handlers::auth;

    let protected = Router::new()
        .route("/api/auth/whoami", get(auth::whoami_get))
        .route_layer(from_fn_with_state(state, middleware::jwt_auth_middleware));

    Router::new()
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
        .merge(protected)
}

/// Permissive in development; otherwise only the configured origins.
pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.permissive_cors {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
