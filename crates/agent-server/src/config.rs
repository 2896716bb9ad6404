//! Server Configuration
//!
//! All configuration comes from the environment (plus `.env` via dotenvy).
//! Malformed values are fatal: the process refuses to initialize rather than
//! run with a half-parsed configuration.

use std::time::Duration;

use anyhow::{bail, Context};

/// Parsed server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address, e.g. "0.0.0.0:3000"
    pub bind_addr: String,

    /// Default model for all agents
    pub model: String,

    /// Wall-clock budget for one full reasoning+tools run
    pub run_timeout: Duration,

    /// Maximum router steps per run
    pub max_steps: usize,

    /// Recent-message window each reasoning step sees
    pub window: usize,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

        let model = std::env::var("AGENT_MODEL").unwrap_or_else(|_| "llama3.2".into());

        let run_timeout_secs: u64 = parse_env("RUN_TIMEOUT_SECS", 120)?;
        if run_timeout_secs == 0 {
            bail!("RUN_TIMEOUT_SECS must be greater than zero");
        }

        let max_steps: usize = parse_env("MAX_STEPS", 12)?;
        if max_steps == 0 {
            bail!("MAX_STEPS must be greater than zero");
        }

        let window: usize = parse_env("AGENT_WINDOW", 5)?;

        Ok(Self {
            bind_addr,
            model,
            run_timeout: Duration::from_secs(run_timeout_secs),
            max_steps,
            window,
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("Invalid value for {name}: '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // No env vars set in the test environment for these keys
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.max_steps, 12);
        assert_eq!(config.window, 5);
        assert_eq!(config.run_timeout, Duration::from_secs(120));
    }
}
