//! RAX User Storage - Entry Point
//!
//! Interactive shell over per-identity sandboxed folders.

use log::{error, info};
use std::io::IsTerminal;
use std::process::ExitCode;
use tokio::io::BufReader;

use rax_user_storage::shell::{self, Console};
use rax_user_storage::{StorageConfig, StorageService};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching user storage shell...");

    let config = match StorageConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let max_line_length = config.max_command_length;

    let mut service = match StorageService::open(config) {
        Ok(service) => service,
        Err(e) => {
            error!("Refusing to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let hidden_secrets = std::io::stdin().is_terminal();
    let reader = BufReader::new(tokio::io::stdin());
    let mut console = Console::new(reader, tokio::io::stdout(), hidden_secrets, max_line_length);

    match shell::run(&mut service, &mut console).await {
        Ok(()) => {
            info!("Shell exited");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Console failure: {}", e);
            ExitCode::FAILURE
        }
    }
}
