//! NAP release packager.
//!
//! Builds a NAP source tree for every configuration and packages the
//! installed result as a timestamped directory or archive.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = nap_release::cli::run().await {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
