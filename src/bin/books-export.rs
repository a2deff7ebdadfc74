use anyhow::Result;
use books_export::config::credentials::Credentials;
use books_export::exporter::Exporter;
use books_export::utils::config_loader;
use books_export::utils::constants::DEFAULT_CONFIG_PATH;
use books_export::utils::logging;
use books_export::utils::logging::LogLevel;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load settings and init logging
    // -------------------------------

    let args = Args::parse();
    let export_config = config_loader::run(&args.config)?;
    logging::run(&export_config, args.log_level);

    // -------------------------------
    // 2. Read credentials
    // -------------------------------

    let credentials = Credentials::from_env()?;
    info!(organization_id = %credentials.organization_id, "export starting...");

    // -------------------------------
    // 3. Token, then every module in order
    // -------------------------------

    let exporter = Exporter::new(&export_config, credentials)?;
    exporter.run().await?;

    Ok(())
}
