use bigip::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present; connection settings fall back to BIGIP_* variables.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    cli::run_cli().await
}
