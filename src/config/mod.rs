use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Byte range requested per HTTP call when the stream size is known.
pub const DEFAULT_CHUNK_SIZE: u64 = 9 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub output_dir: PathBuf,
    pub user_agent: String,
    /// Network timeout in seconds, applied to every request.
    pub timeout: u64,
    pub chunk_size: u64,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./downloads"),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout: 30,
            chunk_size: DEFAULT_CHUNK_SIZE,
            verbose: false,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Shared HTTP client for extraction and downloads.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout())
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "yt_grab=debug"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_contract() {
        let config = Config::default();
        assert_eq!(config.output_dir, PathBuf::from("./downloads"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.chunk_size, 9_437_184);
        assert_eq!(config.default_log_filter(), "warn");
    }

    #[test]
    fn verbose_raises_log_level() {
        let config = Config {
            verbose: true,
            ..Config::default()
        };
        assert_eq!(config.default_log_filter(), "yt_grab=debug");
    }
}
