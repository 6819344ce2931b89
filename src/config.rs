use clap::Parser;
use std::env;

use crate::replicate::DEFAULT_API_BASE;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "engrave-gateway")]
#[command(about = "HTTP relay for scrollwork engraving fills via Replicate")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    // Replicate API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

// The provider credential, read once at startup. A blank value counts as
// absent so a stray `REPLICATE_API_TOKEN=` line does not look configured.
pub fn replicate_token() -> Option<String> {
    env::var("REPLICATE_API_TOKEN")
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
