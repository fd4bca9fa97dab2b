use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use diary_api::token::DEFAULT_TTL_HOURS;

/// Secrets that ship in sample configs and must never be served with.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me",
    "your_secret_key",
    "super secret key",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub secret_key: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub token_ttl_hours: i64,
    pub connect_attempts: u32,
    pub connect_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup` so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("DIARY_SECRET_KEY").unwrap_or_default();
        if secret_key.is_empty() || PLACEHOLDER_SECRETS.contains(&secret_key.as_str()) {
            bail!("DIARY_SECRET_KEY is unset or still a placeholder");
        }

        let port = parse_or(&lookup, "DIARY_PORT", 6000)?;
        let token_ttl_hours = parse_or(&lookup, "DIARY_TOKEN_TTL_HOURS", DEFAULT_TTL_HOURS)?;
        let connect_attempts = parse_or(&lookup, "DIARY_DB_CONNECT_ATTEMPTS", 5)?;
        let connect_delay_ms = parse_or(&lookup, "DIARY_DB_CONNECT_DELAY_MS", 1000)?;

        if token_ttl_hours <= 0 {
            bail!("DIARY_TOKEN_TTL_HOURS must be positive");
        }
        if connect_attempts == 0 {
            bail!("DIARY_DB_CONNECT_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            secret_key,
            db_path: lookup("DIARY_DB_PATH")
                .unwrap_or_else(|| "diary.db".into())
                .into(),
            host: lookup("DIARY_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            token_ttl_hours,
            connect_attempts,
            connect_delay: Duration::from_millis(connect_delay_ms),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[("DIARY_SECRET_KEY", "s3cret")]).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 6000);
        assert_eq!(cfg.db_path, PathBuf::from("diary.db"));
        assert_eq!(cfg.token_ttl_hours, 24);
        assert_eq!(cfg.connect_attempts, 5);
        assert_eq!(cfg.connect_delay, Duration::from_secs(1));
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("DIARY_SECRET_KEY", "s3cret"),
            ("DIARY_PORT", "8080"),
            ("DIARY_DB_PATH", "/tmp/d.db"),
            ("DIARY_DB_CONNECT_DELAY_MS", "50"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/d.db"));
        assert_eq!(cfg.connect_delay, Duration::from_millis(50));
    }

    #[test]
    fn ipv6_host_is_kept_verbatim() {
        let cfg = config(&[("DIARY_SECRET_KEY", "s3cret"), ("DIARY_HOST", "::")]).unwrap();
        assert_eq!(cfg.host, "::");
    }

    #[test]
    fn secret_is_required() {
        assert!(config(&[]).is_err());
        assert!(config(&[("DIARY_SECRET_KEY", "your_secret_key")]).is_err());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert!(config(&[("DIARY_SECRET_KEY", "s"), ("DIARY_PORT", "abc")]).is_err());
        assert!(config(&[("DIARY_SECRET_KEY", "s"), ("DIARY_DB_CONNECT_ATTEMPTS", "0")]).is_err());
        assert!(config(&[("DIARY_SECRET_KEY", "s"), ("DIARY_TOKEN_TTL_HOURS", "-3")]).is_err());
    }
}
