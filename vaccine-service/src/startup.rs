use crate::config::VaccineConfig;
use crate::docs::{self, DOCS_PATH};
use crate::handlers::{self, DOSES_PATH, HEALTH_PATH, VACCINES_PATH};
use crate::services::{DoseStore, MongoDb, VaccineStore};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router, ServiceExt,
};
use service_core::error::AppError;
use service_core::middleware::{
    fault_envelope_middleware, panic_to_fault, request_id_middleware, request_id_of, FaultPolicy,
};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower::Layer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

/// The complete HTTP application: the router behind trailing-slash
/// normalisation, so `/api/vaccines/` and `/api/vaccines` route alike.
pub type App = NormalizePath<Router>;

#[derive(Clone)]
pub struct AppState {
    pub config: VaccineConfig,
    pub vaccines: Arc<dyn VaccineStore>,
    pub doses: Arc<dyn DoseStore>,
}

impl AppState {
    /// State backed by a single store serving both collections.
    pub fn new<S>(config: VaccineConfig, store: Arc<S>) -> Self
    where
        S: VaccineStore + DoseStore + 'static,
    {
        Self {
            config,
            vaccines: store.clone(),
            doses: store,
        }
    }
}

pub fn build_app(state: AppState) -> App {
    // Must wrap the router from outside; a Router::layer runs after routing
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}

fn build_router(state: AppState) -> Router {
    let policy = FaultPolicy::for_environment(state.config.common.environment);
    let body_limit = state.config.body_limit_bytes;
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::root))
        .route(HEALTH_PATH, get(handlers::health_check))
        .nest(VACCINES_PATH, handlers::vaccines::router())
        .nest(DOSES_PATH, handlers::doses::router())
        .merge(docs::router())
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_to_fault))
        .layer(from_fn_with_state(policy, fault_envelope_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %request_id_of(request),
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
}

fn cors_layer(config: &VaccineConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.cors.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
}

impl Application {
    /// Connect to MongoDB, prepare indexes and bind the listener. Any failure
    /// here is fatal for the process.
    pub async fn build(config: VaccineConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.health_check().await?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;
        tracing::info!("Database initialized successfully");

        let state = AppState::new(config, Arc::new(db));
        Self::build_with_state(state).await
    }

    /// Bind the configured port and serve `state` through the full router.
    /// Port 0 picks a free port; see [`Application::port`].
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port = port,
            environment = state.config.common.environment.as_str(),
            "Server is running on port {}",
            port
        );
        tracing::info!("Health check: http://localhost:{}{}", port, HEALTH_PATH);
        tracing::info!("API docs: http://localhost:{}{}", port, DOCS_PATH);
        tracing::info!("Vaccines API: http://localhost:{}{}", port, VACCINES_PATH);
        tracing::info!("Doses API: http://localhost:{}{}", port, DOSES_PATH);

        let app = build_app(state);
        let service = ServiceExt::<axum::extract::Request>::into_make_service(app);
        let server = axum::serve(listener, service)
            .with_graceful_shutdown(shutdown_signal())
            .into_future();

        Ok(Self {
            port,
            server: Box::pin(server),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
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
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
