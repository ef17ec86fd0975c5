use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::handlers::{protected, public};
use crate::middleware::require_bearer;
use crate::state::AppState;

pub fn router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        // Public
        .route("/health", get(public::health))
        // Protected API
        .merge(api_routes(state.clone()))
        .fallback(public::not_found)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(server.cors_origins.as_deref()))
                .layer(DefaultBodyLimit::max(server.max_request_size_bytes)),
        )
        .with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    use protected::{experiments, kpis, projects};

    Router::new()
        .route("/api/projects", get(projects::list).post(projects::create))
        .route("/api/kpis/targets", post(kpis::create_target))
        .route("/api/experiments", post(experiments::create))
        .route_layer(from_fn_with_state(state, require_bearer))
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState, server: &ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::new(server.host, server.port);
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on :{}", listener.local_addr()?.port());

    axum::serve(listener, router(state, server))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
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
}
