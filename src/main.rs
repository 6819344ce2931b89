use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use engrave_gateway::config::{self, Args};
use engrave_gateway::state::AppState;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    // parse cli arguments
    let args = Args::parse();

    let token = config::replicate_token();
    let has_token = token.is_some();

    // creating shared state
    let state = Arc::new(AppState::new(&args.api_base, token));

    let app = engrave_gateway::app(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!("Gateway running on http://localhost:{}", args.port);
    info!("Forwarding to Replicate at {}", args.api_base);
    if has_token {
        info!("Replicate API token configured");
    } else {
        warn!("No REPLICATE_API_TOKEN in .env file - /api/generate is degraded");
    }
    axum::serve(listener, app).await.unwrap();
}
