//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Compose the auth gate onto protected routes only
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Bind server to listener and run until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::{
    require_bearer, Authenticator, BcryptCredentialStore, CredentialStore, JwtCodec, LoginService,
    TokenExtractor, TokenIssuer, TokenVerifier,
};
use crate::config::GatewayConfig;
use crate::error::StartupError;
use crate::forward::Forwarder;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::signals::shutdown_signal;
use crate::registry::ServiceRegistry;
use crate::resources::{Courses, Resource, Students};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub login: Arc<LoginService>,
}

/// Pluggable identity backend. Defaults come from the config.
pub struct AuthComponents {
    pub verifier: Arc<dyn TokenVerifier>,
    pub issuer: Arc<dyn TokenIssuer>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AuthComponents {
    pub fn from_config(config: &GatewayConfig) -> Self {
        let codec = Arc::new(JwtCodec::from_config(&config.auth));
        Self {
            verifier: codec.clone(),
            issuer: codec,
            credentials: Arc::new(BcryptCredentialStore::from_config(&config.auth.users)),
        }
    }
}

/// HTTP server for the API gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server with the identity backend described by `config`.
    pub fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let components = AuthComponents::from_config(&config);
        Self::with_components(config, components)
    }

    /// Create a new server with an injected identity backend.
    pub fn with_components(config: GatewayConfig, components: AuthComponents) -> Result<Self, StartupError> {
        let registry = Arc::new(ServiceRegistry::from_config(&config.services));
        let forwarder = Arc::new(Forwarder::from_config(registry, &config.timeouts)?);

        let authenticator = Arc::new(Authenticator::new(
            TokenExtractor::query_then_header(config.auth.token_query_param.clone()),
            components.verifier,
        ));
        let login = Arc::new(LoginService::new(components.credentials, components.issuer));

        let state = AppState { forwarder, login };
        let router = Self::build_router(&config, state, authenticator);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState, authenticator: Arc<Authenticator>) -> Router {
        let protected = Router::new()
            .merge(resource_routes::<Students>())
            .merge(resource_routes::<Courses>())
            .route_layer(middleware::from_fn_with_state(authenticator, require_bearer));

        let public = Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/auth/login", post(handlers::login));

        public
            .merge(protected)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The router, for driving the gateway without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C or `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            services = self.config.services.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown triggered");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Collection and item routes for one resource.
fn resource_routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route(R::ROUTE, get(handlers::list::<R>).post(handlers::create::<R>))
        .route(
            &format!("{}/{{id}}", R::ROUTE),
            get(handlers::show::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::remove::<R>),
        )
}
