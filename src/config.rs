use crate::error::{Result, ShieldrError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub backoff: BackoffConfig,
    pub throttle: ThrottleConfig,
    pub harness: HarnessConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Fixed upstream endpoint every strategy calls.
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://service.sutter.arkitech.net/".to_string(),
            timeout_ms: 30000,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Advisory time-to-live for the cached response. Not enforced on read.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 60 }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Lower bound for the randomized retry delay (microseconds).
    pub min_delay_us: u64,
    /// Upper bound for the randomized retry delay (microseconds).
    pub max_delay_us: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_delay_us: 10,
            max_delay_us: 30,
        }
    }
}

impl BackoffConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_micros(self.min_delay_us)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_micros(self.max_delay_us)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Minimum spacing since the last request before calling without delay
    /// (microseconds).
    pub tolerance_us: u64,
    /// Fixed delay applied when a caller is under tolerance (microseconds).
    pub sleep_us: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            tolerance_us: 200,
            sleep_us: 200,
        }
    }
}

impl ThrottleConfig {
    pub fn tolerance(&self) -> Duration {
        Duration::from_micros(self.tolerance_us)
    }

    pub fn sleep_delay(&self) -> Duration {
        Duration::from_micros(self.sleep_us)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Concurrent requests per test run. Chosen to exceed the upstream's
    /// assumed concurrency ceiling of 10 so the baseline strategy fails.
    pub attempts: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self { attempts: 15 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            backoff: BackoffConfig::default(),
            throttle: ThrottleConfig::default(),
            harness: HarnessConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        config.validate()?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.backoff.min_delay_us > self.backoff.max_delay_us {
            return Err(ShieldrError::Config(format!(
                "backoff min_delay_us ({}) exceeds max_delay_us ({})",
                self.backoff.min_delay_us, self.backoff.max_delay_us
            )));
        }
        if self.upstream.url.is_empty() {
            return Err(ShieldrError::Config("upstream url must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.upstream.url, "http://service.sutter.arkitech.net/");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.backoff.min_delay_us, 10);
        assert_eq!(config.backoff.max_delay_us, 30);
        assert_eq!(config.throttle.tolerance_us, 200);
        assert_eq!(config.throttle.sleep_us, 200);
        assert_eq!(config.harness.attempts, 15);
    }

    #[test]
    fn test_duration_accessors() {
        let config = Config::default();
        assert_eq!(config.upstream.timeout(), Duration::from_secs(30));
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert_eq!(config.backoff.min_delay(), Duration::from_micros(10));
        assert_eq!(config.backoff.max_delay(), Duration::from_micros(30));
        assert_eq!(config.throttle.tolerance(), Duration::from_micros(200));
        assert_eq!(config.throttle.sleep_delay(), Duration::from_micros(200));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
upstream:
  url: "http://localhost:8080/"
harness:
  attempts: 20
"#
        )
        .unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.upstream.url, "http://localhost:8080/");
        assert_eq!(config.harness.attempts, 20);
        // Unspecified sections fall back to defaults
        assert_eq!(config.backoff.min_delay_us, 10);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/shieldr.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_invalid_backoff_bounds_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
backoff:
  min_delay_us: 50
  max_delay_us: 10
"#
        )
        .unwrap();

        let result = Config::load(Some(&file.path().to_path_buf()));
        assert!(matches!(result, Err(ShieldrError::Config(_))));
    }

    #[test]
    fn test_empty_url_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
upstream:
  url: ""
"#
        )
        .unwrap();

        let result = Config::load(Some(&file.path().to_path_buf()));
        assert!(matches!(result, Err(ShieldrError::Config(_))));
    }
}
