use axum::http::{header, HeaderValue, Method};
use domain::gateway::google_oauth::TokenVerifier;
use domain::Summarizer;
use log::*;
use service::config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
mod params;
pub mod router;

pub use error::{Error, Result};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    // None when the execution engine could not be set up at startup.
    summarizer: Option<Arc<Summarizer>>,
    token_verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(summarizer: Option<Summarizer>, token_verifier: TokenVerifier) -> Self {
        Self {
            summarizer: summarizer.map(Arc::new),
            token_verifier: Arc::new(token_verifier),
        }
    }

    pub fn summarizer(&self) -> Option<Arc<Summarizer>> {
        self.summarizer.clone()
    }

    pub fn token_verifier(&self) -> &TokenVerifier {
        &self.token_verifier
    }
}

pub async fn init_server(config: &Config, app_state: AppState) -> std::io::Result<()> {
    let interface = config.interface.as_deref().unwrap_or("127.0.0.1");
    let listen_addr = format!("{}:{}", interface, config.port);

    info!(
        "Server starting... listening for connections on http://{}",
        listen_addr
    );

    let listener = TcpListener::bind(listen_addr).await?;

    axum::serve(
        listener,
        router::define_routes(app_state).layer(cors_layer(config)),
    )
    .await
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!("Ignoring invalid CORS origin: {}", origin))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(origins)
}
