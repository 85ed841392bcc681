use domain::gateway::google_oauth::TokenVerifier;
use domain::Summarizer;
use log::*;
use service::{config::Config, logging::Logger};
use web::AppState;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!(
        "Starting up meeting summarizer [{}]...",
        config.runtime_env
    );

    // The server still answers /generate_email, /verify_google_token and /health
    // without an engine agent.
    let summarizer = match Summarizer::from_config(&config).await {
        Ok(summarizer) => Some(summarizer),
        Err(e) => {
            error!("Failed to set up the execution engine, /summarize is unavailable: {e}");
            None
        }
    };

    let token_verifier = match TokenVerifier::from_config(&config) {
        Ok(token_verifier) => token_verifier,
        Err(e) => {
            error!("Failed to build the Google token verifier: {e}");
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(summarizer, token_verifier);

    if let Err(e) = web::init_server(&config, app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
