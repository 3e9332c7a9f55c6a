use std::env;
use std::time::Duration;

use super::consts;

/// Connection settings for the transport client. Built once, handed to
/// `PoseClient::new`, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    base_url: String,
    request_timeout: Duration,
    connect_timeout: Duration,
    log_bodies: bool,
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    /// Lifetime budget for one call: connect, write, and read combined.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Logs response bodies at debug level. Off unless you are chasing a
    /// decoding problem; overlay bodies are large.
    pub fn with_log_bodies(mut self, log_bodies: bool) -> Self {
        self.config.log_bodies = log_bodies;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            base_url: consts::DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(consts::DEFAULT_REQUEST_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(consts::DEFAULT_CONNECT_TIMEOUT_MS),
            log_bodies: false,
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Reads overrides from the environment; a `.env` file is honored when
    /// present. Unparseable values keep the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Ok(base_url) = env::var(consts::BASE_URL_ENV) {
            builder = builder.with_base_url(&base_url);
        }
        if let Ok(raw) = env::var(consts::REQUEST_TIMEOUT_ENV) {
            match raw.parse::<u64>() {
                Ok(ms) => builder = builder.with_request_timeout(Duration::from_millis(ms)),
                Err(_) => tracing::warn!(
                    "ignoring unparseable {}={:?}",
                    consts::REQUEST_TIMEOUT_ENV,
                    raw
                ),
            }
        }
        if let Ok(raw) = env::var(consts::LOG_BODIES_ENV) {
            builder = builder.with_log_bodies(raw == "1" || raw.eq_ignore_ascii_case("true"));
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn log_bodies(&self) -> bool {
        self.log_bodies
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
