//! Runtime settings

use std::time::Duration;

use crate::config::CliArgs;

/// Runtime configuration for a provisioning run
#[derive(Debug, Clone)]
pub struct Settings {
    pub device_name: String,
    pub scan_duration: Duration,
    pub connect_timeout: Duration,
    pub response_timeout: Duration,
    pub retry_count: u32,
    pub retry_delay: Duration,
}

impl From<&CliArgs> for Settings {
    fn from(args: &CliArgs) -> Self {
        Settings {
            device_name: args.device_name.clone(),
            scan_duration: Duration::from_secs(args.scan_secs),
            connect_timeout: Duration::from_secs(args.connect_timeout_secs),
            response_timeout: Duration::from_secs(args.response_timeout_secs),
            retry_count: args.retries,
            retry_delay: Duration::from_secs(args.retry_delay_secs),
        }
    }
}
