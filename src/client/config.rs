//! Client configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{Result, SdkError};

/// Host used when none is configured
pub const DEFAULT_HOST: &str = "www.runninghub.cn";
/// Per-request timeout used when none (or zero) is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host name, optionally with a port
    pub host: String,
    /// Use plain HTTP instead of HTTPS
    pub use_http: bool,
    /// API key injected into every request
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Directory receiving resources downloaded before upload
    pub download_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            use_http: false,
            api_key: String::new(),
            timeout: DEFAULT_TIMEOUT,
            download_dir: PathBuf::from("temp").join("cacheDownload"),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the default host with the given API key
    ///
    /// # Example
    ///
    /// ```rust
    /// use runninghub_rust_sdk::client::ClientConfig;
    ///
    /// let config = ClientConfig::new("my-api-key");
    /// assert_eq!(config.base_url(), "https://www.runninghub.cn");
    /// ```
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Reads the configuration from `RUNNINGHUB_*` environment variables.
    ///
    /// `RUNNINGHUB_API_KEY` is required; `RUNNINGHUB_HOST`,
    /// `RUNNINGHUB_USE_HTTP` and `RUNNINGHUB_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("RUNNINGHUB_API_KEY")
            .map_err(|_| SdkError::InvalidConfig("RUNNINGHUB_API_KEY is not set".to_string()))?;
        let mut config = Self::new(api_key);

        if let Ok(host) = env::var("RUNNINGHUB_HOST") {
            if !host.is_empty() {
                config.host = host;
            }
        }
        if let Ok(flag) = env::var("RUNNINGHUB_USE_HTTP") {
            config.use_http = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(secs) = env::var("RUNNINGHUB_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                SdkError::InvalidConfig(format!("RUNNINGHUB_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Points the configuration at a full endpoint such as `http://127.0.0.1:8080`.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint)?;
        let host = url
            .host_str()
            .ok_or_else(|| SdkError::InvalidConfig(format!("endpoint has no host: {}", endpoint)))?;
        self.host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        self.use_http = url.scheme() == "http";
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Host with the default applied
    pub fn effective_host(&self) -> &str {
        if self.host.is_empty() {
            DEFAULT_HOST
        } else {
            &self.host
        }
    }

    /// Timeout with the default applied
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// `<scheme>://<host>`
    pub fn base_url(&self) -> String {
        let scheme = if self.use_http { "http" } else { "https" };
        format!("{}://{}", scheme, self.effective_host())
    }
}
