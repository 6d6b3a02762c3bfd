use clap::Parser;
use std::path::PathBuf;

use stockroom::Inventory;
use stockroom::app;
use stockroom::config::Settings;

#[derive(Parser)]
#[command(name = "stockroom-web")]
#[command(about = "Serve the shop inventory over HTTP", long_about = None)]
struct Args {
    /// Settings file (defaults to ./stockroom.json, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use a local CSV file as the sheet
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Address to listen on, overriding the settings file
    #[arg(long)]
    listen: Option<String>,
}

/// Main entry point for the web front end
///
/// Loads the settings, opens the sheet and loads the inventory on a blocking
/// thread (the sheet clients are synchronous), then serves the page and
/// JSON API until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(path) = args.csv {
        settings.use_csv(path);
    }
    if let Some(listen) = args.listen {
        settings.listen = listen;
    }

    let loader = settings.clone();
    let inventory = tokio::task::spawn_blocking(move || {
        let client = loader.connect()?;
        Inventory::load(client, loader.columns.clone(), loader.stock_policy())
    })
    .await??;

    app::run(inventory, &settings.listen).await
}
