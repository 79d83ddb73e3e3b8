//! chem_bundler - bundle staging tool for desktop chemistry builds.
//!
//! Stages a redistributable bundle tree from the primary build output plus
//! the configured external components, then compiles the installer.

mod bundler;
mod cli;
mod error;

use std::process;

#[tokio::main]
async fn main() {
    // Run CLI and get exit code; the CLI sets up logging from its own flags
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
