use clap::{Parser, ValueEnum};
use snip_gateway::config::{parse_duration, GatewayConfig};
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;
use std::time::Duration;

pub const PORT_ENV: &str = "PORT";
pub const BASE_URL_ENV: &str = "BASE_URL";
pub const STORAGE_TYPE_ENV: &str = "STORAGE_TYPE";
pub const REDIS_URL_ENV: &str = "REDIS_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "REQUEST_TIMEOUT";
pub const SHUTDOWN_TIMEOUT_ENV: &str = "SHUTDOWN_TIMEOUT";
pub const RATE_LIMIT_ENV: &str = "RATE_LIMIT_PER_MINUTE";
pub const LOG_JSON_ENV: &str = "LOG_JSON";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "memory")]
    Memory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Memory => write!(f, "memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "snip-gateway")]
pub struct CLI {
    #[arg(long, env = PORT_ENV, default_value_t = 8080)]
    pub port: u16,

    /// Public prefix of every short URL handed out.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_TYPE_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Memory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, default_value = DEFAULT_REDIS_URL)]
    pub redis_url: String,

    #[arg(long, env = REQUEST_TIMEOUT_ENV, default_value = "10s", value_parser = parse_duration)]
    pub request_timeout: Duration,

    /// How long in-flight requests may take to drain on shutdown.
    #[arg(long, env = SHUTDOWN_TIMEOUT_ENV, default_value = "30s", value_parser = parse_duration)]
    pub shutdown_timeout: Duration,

    #[arg(long, env = RATE_LIMIT_ENV, default_value = "20")]
    pub rate_limit_per_minute: NonZeroU32,

    /// Emit logs as JSON lines.
    #[arg(long, env = LOG_JSON_ENV)]
    pub log_json: bool,
}

impl CLI {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::builder()
            .request_timeout(self.request_timeout)
            .rate_limit_per_minute(self.rate_limit_per_minute)
            .build()
    }
}
