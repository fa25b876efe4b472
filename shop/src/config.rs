// shop/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

/// Where cart data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
  Postgres { database_url: String, max_connections: u32 },
  /// Process-local tables; contents are lost on restart.
  Memory,
}

impl StorageBackend {
  /// Name for logs; never includes the connection string.
  pub fn name(&self) -> &'static str {
    match self {
      StorageBackend::Postgres { .. } => "postgres",
      StorageBackend::Memory => "memory",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub storage: StorageBackend,
  pub run_migrations: bool,
  // Inserts demo users, packages and shipping options on startup
  pub seed_db: bool,
  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      storage: StorageBackend::Memory,
      run_migrations: false,
      seed_db: false,
      log_format: LogFormat::Pretty,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from any variable source. `from_env` passes the
  /// process environment; tests pass a map.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_or = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = get_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let storage = match get_or("STORAGE_BACKEND", "postgres").to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => {
        let database_url = lookup("DATABASE_URL")
          .ok_or_else(|| AppError::Config("Missing environment variable 'DATABASE_URL'".to_string()))?;
        let max_connections = get_or("DATABASE_MAX_CONNECTIONS", "5")
          .parse::<u32>()
          .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;
        StorageBackend::Postgres {
          database_url,
          max_connections,
        }
      }
      "memory" => StorageBackend::Memory,
      other => {
        return Err(AppError::Config(format!(
          "Invalid STORAGE_BACKEND '{}': expected 'postgres' or 'memory'",
          other
        )))
      }
    };

    let run_migrations = parse_bool("RUN_MIGRATIONS", &get_or("RUN_MIGRATIONS", "true"))?;
    let seed_db = parse_bool("SEED_DB", &get_or("SEED_DB", "false"))?;

    let log_format = match get_or("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
      "pretty" => LogFormat::Pretty,
      "json" => LogFormat::Json,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}'", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      storage,
      run_migrations,
      seed_db,
      log_format,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_bool(var_name: &str, raw: &str) -> Result<bool> {
  raw
    .parse::<bool>()
    .map_err(|e| AppError::Config(format!("Invalid {} value: {}", var_name, e)))
}
