mod app;

use std::{fs::OpenOptions, sync::Mutex};

use anyhow::{Context, Result};
use hotelres_core::{
    config::{self, AppConfig},
    Hotel,
};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config)?;

    let mut hotel = Hotel::new();
    let store = config.store();
    let startup_status = if config.load_on_start && store.exists() {
        match store.load(&mut hotel) {
            Ok(count) => format!(
                "{count} reservation(s) loaded from {}",
                store.path().display()
            ),
            Err(err) => {
                warn!(?err, "Startup load failed");
                format!("Startup load failed: {err}")
            }
        }
    } else {
        format!("{} rooms ready", hotel.registry().rooms().len())
    };
    info!(data_file = %store.path().display(), format = %store.format(), "Console starting");

    let mut app = app::HotelApp::new(hotel, store);
    app.set_status(startup_status);
    app.run().await
}

fn init_logging(config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("failed to create {}", config.log_dir.display()))?;
    let log_path = config.log_dir.join("hotelres.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the terminal UI, so only the file layer is installed.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
