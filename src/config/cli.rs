use crate::domain::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_positive_number, validate_socket_addr, validate_url, Validate,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "product-search-api")]
#[command(about = "REST API for products stored in an Elasticsearch index")]
pub struct CliConfig {
    #[arg(long, default_value = "0.0.0.0:3000")]
    pub bind: String,

    #[arg(long, default_value = "https://localhost:9200/")]
    pub store_url: String,

    #[arg(long, default_value = "elastic")]
    pub username: String,

    #[arg(long, env = "STORE_PASSWORD", default_value = "changeme", hide_env_values = true)]
    pub password: String,

    #[arg(long, help = "Skip TLS certificate verification for the store")]
    pub accept_invalid_certs: bool,

    #[arg(long, default_value = "1")]
    pub connect_timeout_secs: u64,

    #[arg(long, default_value = "10")]
    pub request_timeout_secs: u64,

    #[arg(long, default_value = "10")]
    pub max_idle_per_host: usize,

    #[arg(long, help = "Do not mount the /findByQuery routes")]
    pub no_query_passthrough: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<PathBuf>,
}

impl ConfigProvider for CliConfig {
    fn bind_address(&self) -> &str {
        &self.bind
    }

    fn store_url(&self) -> &str {
        &self.store_url
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn max_idle_per_host(&self) -> usize {
        self.max_idle_per_host
    }

    fn query_passthrough(&self) -> bool {
        !self.no_query_passthrough
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("bind", &self.bind)?;
        validate_url("store_url", &self.store_url)?;
        validate_positive_number("connect_timeout_secs", self.connect_timeout_secs, 1)?;
        validate_positive_number("request_timeout_secs", self.request_timeout_secs, 1)?;
        Ok(())
    }
}
