//! Application startup and lifecycle management.

use crate::config::{PlanetConfig, StoreBackend};
use crate::handlers::{
    api_docs, health_check, host_info, liveness, lookup_planet, metrics_endpoint, readiness,
};
use crate::models::solar_system;
use crate::services::{InMemoryPlanetStore, PlanetDb, PlanetStore};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics::init_metrics;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

/// Shared, read-only request state. Handlers keep nothing between requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PlanetStore>,
    pub environment: Arc<str>,
    pub api_docs_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(config: &PlanetConfig, store: Arc<dyn PlanetStore>) -> Self {
        Self {
            store,
            environment: Arc::from(config.environment.as_str()),
            api_docs_path: Arc::new(config.api_docs_path()),
        }
    }
}

pub fn build_router(state: AppState, index_path: PathBuf) -> Router {
    init_metrics();

    Router::new()
        .route_service("/", ServeFile::new(index_path))
        .route("/planet", post(lookup_planet))
        .route("/os", get(host_info))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .route("/api-docs", get(api_docs))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Open the store selected by configuration.
pub async fn connect_store(config: &PlanetConfig) -> Result<Arc<dyn PlanetStore>, AppError> {
    match config.store {
        StoreBackend::Mongo => {
            let db = PlanetDb::connect(&config.mongodb.uri, &config.mongodb.database)
                .await
                .map_err(|e| AppError::DatabaseError(e.into()))?;

            // Index creation needs a reachable server; lookups still get a
            // chance to succeed once it comes back.
            if let Err(e) = db.initialize_indexes().await {
                tracing::warn!("Skipping index initialization: {}", e);
            }

            Ok(Arc::new(db))
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory planet store");
            Ok(Arc::new(InMemoryPlanetStore::with_planets(solar_system())))
        }
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application, connecting the store named in `config`.
    pub async fn build(config: PlanetConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await?;
        Self::build_with_store(config, store).await
    }

    /// Build the application around an already constructed store.
    pub async fn build_with_store(
        config: PlanetConfig,
        store: Arc<dyn PlanetStore>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(&config, store);
        let router = build_router(state, config.index_path());

        // Port 0 binds a random port for testing
        let address = config.common.bind_address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port, environment = %config.environment, "Planet service bound");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// The port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
