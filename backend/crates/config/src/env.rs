use insights_common::error::{InsightsError, InsightsResult};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub datastore_url: String,
    pub datastore_username: Option<String>,
    pub datastore_password: Option<String>,
    pub datastore_max_retries: u32,
    pub datastore_timeout_secs: u64,
    pub directory_url: Option<String>,
    pub topology_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads required vars.
    pub fn from_env() -> InsightsResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        Ok(Self {
            datastore_url: get_var("DATASTORE_URL")?,
            datastore_username: get_opt("DATASTORE_USERNAME"),
            datastore_password: get_opt("DATASTORE_PASSWORD"),
            datastore_max_retries: parse_var("DATASTORE_MAX_RETRIES", "3")?,
            datastore_timeout_secs: parse_var("DATASTORE_TIMEOUT_SECS", "30")?,
            directory_url: get_opt("DIRECTORY_URL"),
            topology_url: get_opt("TOPOLOGY_URL"),
            host: get_var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "8080")?,
            log_level: get_var_or("LOG_LEVEL", "info"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn get_var(key: &str) -> InsightsResult<String> {
    env::var(key).map_err(|_| InsightsError::Config(format!("{key} is required but not set")))
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn get_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: &str) -> InsightsResult<T>
where
    T::Err: std::fmt::Display,
{
    get_var_or(key, default)
        .parse()
        .map_err(|e| InsightsError::Config(format!("invalid {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn config_from_env_succeeds_with_required_vars() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("DATASTORE_URL", "http://localhost:9200");
        env::remove_var("TOPOLOGY_URL");

        let cfg = AppConfig::from_env().expect("should parse config");
        assert_eq!(cfg.datastore_url, "http://localhost:9200");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.datastore_max_retries, 3);
        assert_eq!(cfg.datastore_timeout_secs, 30);
        assert!(cfg.topology_url.is_none());

        env::remove_var("DATASTORE_URL");
    }

    #[test]
    fn config_from_env_fails_without_datastore_url() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::remove_var("DATASTORE_URL");
        let result = AppConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    fn config_rejects_non_numeric_retries() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("DATASTORE_URL", "http://localhost:9200");
        env::set_var("DATASTORE_MAX_RETRIES", "many");
        let result = AppConfig::from_env();
        assert!(matches!(result, Err(InsightsError::Config(msg)) if msg.contains("DATASTORE_MAX_RETRIES")));

        env::remove_var("DATASTORE_MAX_RETRIES");
        env::remove_var("DATASTORE_URL");
    }

    #[test]
    fn log_level_read_from_env() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");

        env::set_var("DATASTORE_URL", "http://localhost:9200");
        env::remove_var("LOG_LEVEL");
        assert_eq!(AppConfig::from_env().expect("defaults").log_level, "info");

        env::set_var("LOG_LEVEL", "debug");
        assert_eq!(AppConfig::from_env().expect("override").log_level, "debug");

        env::remove_var("LOG_LEVEL");
        env::remove_var("DATASTORE_URL");
    }

    #[test]
    fn bind_addr_formats_correctly() {
        let cfg = AppConfig {
            datastore_url: String::new(),
            datastore_username: None,
            datastore_password: None,
            datastore_max_retries: 0,
            datastore_timeout_secs: 5,
            directory_url: None,
            topology_url: None,
            host: "127.0.0.1".to_owned(),
            port: 3000,
            log_level: "debug".to_owned(),
        };
        assert_eq!(cfg.bind_addr(), "127.0.0.1:3000");
    }
}
