use crate::domain::ConfigProvider;
use crate::utils::error::{ApiError, Result};
use crate::utils::validation::{
    validate_positive_number, validate_required_field, validate_socket_addr, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerConfig>,
    pub store: StoreConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub query_passthrough: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub accept_invalid_certs: Option<bool>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_idle_per_host: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ApiError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ApiError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STORE_PASSWORD})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ApiError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_socket_addr("server.bind", self.bind_address())?;
        validate_url("store.url", &self.store.url)?;

        // 有帳號就必須有密碼
        if self.store.username.is_some() {
            validate_required_field("store.password", &self.store.password)?;
        }

        if let Some(secs) = self.store.connect_timeout_secs {
            validate_positive_number("store.connect_timeout_secs", secs, 1)?;
        }
        if let Some(secs) = self.store.request_timeout_secs {
            validate_positive_number("store.request_timeout_secs", secs, 1)?;
        }

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn bind_address(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(DEFAULT_BIND)
    }

    fn store_url(&self) -> &str {
        &self.store.url
    }

    fn username(&self) -> &str {
        // 沒有帳號時不送 basic auth
        self.store.username.as_deref().unwrap_or("")
    }

    fn password(&self) -> &str {
        self.store.password.as_deref().unwrap_or("")
    }

    fn accept_invalid_certs(&self) -> bool {
        self.store.accept_invalid_certs.unwrap_or(false)
    }

    fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.store.connect_timeout_secs.unwrap_or(1))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.store.request_timeout_secs.unwrap_or(10))
    }

    fn max_idle_per_host(&self) -> usize {
        self.store.max_idle_per_host.unwrap_or(10)
    }

    fn query_passthrough(&self) -> bool {
        self.server
            .as_ref()
            .and_then(|s| s.query_passthrough)
            .unwrap_or(true)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
