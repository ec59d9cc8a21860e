use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::client::ApiConfig;
use crate::error::AppError;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub bind_addr: SocketAddr,
    pub debounce: Duration,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("COURSESCOPE_API_URL")
            .map_err(|_| AppError::Config("COURSESCOPE_API_URL is not set".to_string()))?;

        let bind_addr = env::var("COURSESCOPE_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("COURSESCOPE_BIND_ADDR is invalid: {}", e)))?;

        let timeout_secs = read_number("COURSESCOPE_REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let debounce_ms = read_number("COURSESCOPE_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            bind_addr,
            debounce: Duration::from_millis(debounce_ms),
        })
    }
}

fn read_number(key: &str, default: u64) -> Result<u64, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| AppError::Config(format!("{} is invalid: {}", key, e))),
        Err(_) => Ok(default),
    }
}
