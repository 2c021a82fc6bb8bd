// src/config.rs

use dotenvy::dotenv;
use std::env;

use crate::errors::{AppError, Result};

/// Process configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub api_port: u16,
  /// Store locator: `memory://` selects the ephemeral in-process store,
  /// `postgres://` the durable one.
  pub database_url: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let api_port = get_env("API_PORT")
      .unwrap_or_else(|_| "3000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid API_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL").unwrap_or_else(|_| "memory://".to_string());

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      api_port,
      database_url,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  fn clear_vars() {
    env::remove_var("SERVER_HOST");
    env::remove_var("API_PORT");
    env::remove_var("DATABASE_URL");
  }

  #[test]
  #[serial]
  fn defaults_apply_when_nothing_is_set() {
    clear_vars();
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.server_host, "127.0.0.1");
    assert_eq!(config.api_port, 3000);
    assert_eq!(config.database_url, "memory://");
  }

  #[test]
  #[serial]
  fn explicit_values_win_over_defaults() {
    clear_vars();
    env::set_var("API_PORT", "8081");
    env::set_var("DATABASE_URL", "postgres://localhost/telecart");
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.api_port, 8081);
    assert_eq!(config.database_url, "postgres://localhost/telecart");
    clear_vars();
  }

  #[test]
  #[serial]
  fn non_numeric_port_is_a_config_error() {
    clear_vars();
    env::set_var("API_PORT", "not-a-port");
    let err = AppConfig::from_env().unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    clear_vars();
  }
}
