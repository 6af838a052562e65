//! Station Booking CLI server
//!
//! ```sh
//! # Run with default config (~/.config/station-booking/config.toml)
//! station-booking
//!
//! # Custom config path
//! station-booking --config /etc/station-booking/config.toml
//!
//! # Validate config without starting
//! station-booking --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use station_booking::config::AppConfig;
use station_booking::server::{init_tracing, ServerHandle, ServerOptions};

/// Booking backend for EV charging stations.
#[derive(Parser, Debug)]
#[command(
    name = "station-booking",
    version,
    about = "REST API for booking EV charging station time slots",
    long_about = "Station booking service: stations, time slots, bookings and users \
                  behind a JWT-authenticated REST API.\n\n\
                  Default config: ~/.config/station-booking/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "STATION_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(station_booking::default_config_path);

    if cli.check {
        let config = AppConfig::load(&config_path)?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // Environment overrides apply even when the file is unusable.
    let (mut config, load_error) = AppConfig::load_or_default(&config_path);
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    match load_error {
        Some(e) => error!("{}; using default configuration", e),
        None => info!("Configuration loaded from {}", config_path.display()),
    }

    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
