//! Application startup and lifecycle management.

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers;
use crate::services::TripayClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tripay: TripayClient,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let tripay = TripayClient::new(config.tripay.clone());
        if tripay.is_configured_for_create() {
            tracing::info!("Tripay client initialized");
        } else {
            tracing::warn!(
                "Tripay credentials not configured - transaction endpoints will answer configuration errors"
            );
        }

        let state = AppState {
            config: config.clone(),
            tripay,
        };

        // Each transaction route advertises its own method plus OPTIONS.
        let create_routes = Router::new()
            .route(
                "/api/create-transaction",
                post(handlers::transactions::create_transaction)
                    .options(handlers::preflight)
                    .fallback(handlers::method_not_allowed),
            )
            .layer(cors_layer(Method::POST));

        let check_routes = Router::new()
            .route(
                "/api/check-transaction",
                get(handlers::transactions::check_transaction)
                    .options(handlers::preflight)
                    .fallback(handlers::method_not_allowed),
            )
            .layer(cors_layer(Method::GET));

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .merge(create_routes)
            .merge(check_routes)
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                }),
            )
            .with_state(state);

        // Bind at build time (port 0 = random port for testing).
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        tracing::info!("Listening on port {}", self.port);
        axum::serve(self.listener, self.router).await?;

        Ok(())
    }
}

fn cors_layer(method: Method) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([method, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
