use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::config::{normalize_route, Config, RouteConfig};
use crate::service::Registry;

pub mod routes;

/// Server state
///
/// One lock around the registry serializes every request, reads included.
pub struct AppState {
    pub registry: Mutex<Registry>,
}

impl AppState {
    pub fn new(registry: Registry) -> Arc<Self> {
        Arc::new(Self {
            registry: Mutex::new(registry),
        })
    }
}

/// Build the router for the configured route paths.
///
/// Fails when two routes with the same method resolve to the same path.
pub fn router(state: Arc<AppState>, paths: &RouteConfig) -> anyhow::Result<Router> {
    let person_post = normalize_route(&paths.person_post);
    let person_get = normalize_route(&paths.person_get);
    let relationship = normalize_route(&paths.relationship);
    let clean = normalize_route(&paths.clean);
    let recommendations = normalize_route(&paths.recommendations);

    let table = [
        ("POST", "person", &person_post),
        ("GET", "person", &person_get),
        ("POST", "relationship", &relationship),
        ("DELETE", "clean", &clean),
        ("GET", "recommendations", &recommendations),
    ];
    for (i, (method, name, path)) in table.iter().enumerate() {
        for (other_method, other_name, other_path) in &table[i + 1..] {
            if method == other_method && path == other_path {
                anyhow::bail!("{} and {} routes both {} {}", name, other_name, method, path);
            }
        }
    }

    let app = Router::new()
        .route(&person_post, post(routes::create_person))
        .route(&person_get, get(routes::get_person))
        .route(&relationship, post(routes::create_relationship))
        .route(&clean, delete(routes::clean))
        .route(&recommendations, get(routes::get_recommendation))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    Ok(app)
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let registry = Registry::open(&config.database)?;
    tracing::info!("Using database {}", config.database.display());

    let app = router(AppState::new(registry), &config.routes)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server is running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
