use crate::domain::ConfigProvider;
use crate::utils::error::{ApiError, Result};
use reqwest::{Client, Method, RequestBuilder};
use url::Url;

/// Shared HTTP connection to the document store.
///
/// Both store clients sit on top of the same transport so they share one
/// connection pool, one set of credentials and one TLS setup; they only differ
/// in how they serialize requests and decode responses.
#[derive(Debug, Clone)]
pub struct StoreTransport {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl StoreTransport {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs())
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(config.max_idle_per_host())
            .build()?;

        Self::with_client(client, config.store_url(), config.username(), config.password())
    }

    pub fn with_client(client: Client, store_url: &str, username: &str, password: &str) -> Result<Self> {
        let mut base_url = Url::parse(store_url).map_err(|e| ApiError::InvalidConfigValueError {
            field: "store.url".to_string(),
            value: store_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidConfigValueError {
                field: "store.url".to_string(),
                value: store_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        // 確保路徑以 / 結尾，避免 join 時吃掉最後一段
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Build a URL from path segments; each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::ConfigError {
                message: format!("Store URL cannot be used as a base: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!("Store request: {} {}", method, url);

        let mut request = self.client.request(method, url);
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }
        Ok(request)
    }
}
