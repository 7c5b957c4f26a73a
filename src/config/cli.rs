//! Command-line argument parsing

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(name = "wifi-provisioner", version, author)]
#[clap(about = "One-shot BLE WiFi provisioning client")]
pub struct CliArgs {
    /// Advertised name of the target peripheral
    #[clap(short, long, default_value = "ai-toys")]
    pub device_name: String,

    /// WiFi network SSID to provision
    #[clap(short, long)]
    pub ssid: String,

    /// WiFi passphrase to provision
    #[clap(short, long)]
    pub password: String,

    /// Scan duration in seconds
    #[clap(long, default_value = "5")]
    pub scan_secs: u64,

    /// Per-attempt connection timeout in seconds
    #[clap(long, default_value = "20")]
    pub connect_timeout_secs: u64,

    /// Time to wait for the confirmation notification in seconds
    #[clap(long, default_value = "30")]
    pub response_timeout_secs: u64,

    /// Number of connection attempts before giving up
    #[clap(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: u32,

    /// Delay between connection attempts in seconds
    #[clap(long, default_value = "2")]
    pub retry_delay_secs: u64,
}
