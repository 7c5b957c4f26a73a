//! BLE WiFi Provisioning Client - Main Entry Point

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wifi_provisioner::{
    config::{CliArgs, Settings},
    core::provisioner::Provisioner,
    protocol::WifiCredentials,
    transport::BluerCentral,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wifi_provisioner=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments; the passphrase stays out of the logs
    let args = CliArgs::parse();
    info!(
        device = %args.device_name,
        ssid = %args.ssid,
        "Starting WiFi provisioning"
    );

    let credentials = WifiCredentials::new(&args.ssid, &args.password);
    let settings = Settings::from(&args);

    let central = Arc::new(BluerCentral::new().await?);
    let provisioner = Provisioner::new(central, settings);

    tokio::select! {
        result = provisioner.run(&credentials) => match result {
            Ok(report) => {
                info!(
                    "Provisioned {} after {} attempt(s): {}",
                    report.device, report.attempts, report.message
                );
                Ok(())
            }
            Err(e) => {
                error!("Provisioning failed: {e}");
                Err(e.into())
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), aborting");
            Ok(())
        }
    }
}
