use std::fmt::Display;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tokio::net::TcpListener;
use tracing::warn;

/// Binds `host:port`. `host` may be a name, an IPv4 or a bare IPv6 address.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {} port {}", host, port))
}

/// Calls `connect` up to `max_attempts` times, sleeping `delay` between
/// failures. The last error is returned once attempts run out.
pub async fn connect_with_retry<T, E, F>(max_attempts: u32, delay: Duration, mut connect: F) -> Result<T>
where
    F: FnMut() -> std::result::Result<T, E>,
    E: Display,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match connect() {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                return Err(anyhow!(
                    "Failed to open database after {} attempts: {}",
                    max_attempts,
                    e
                ));
            }
            Err(e) => {
                warn!(
                    "Failed to open database (attempt {}/{}): {}",
                    attempt, max_attempts, e
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
