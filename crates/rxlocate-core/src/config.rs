use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the real environment so tests can
/// drive them from a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("RXLOCATE_ENV", "development"))?;

    let bind_addr = parse_addr("RXLOCATE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("RXLOCATE_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("RXLOCATE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("RXLOCATE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("RXLOCATE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let geocoder_base_url = or_default(
        "RXLOCATE_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org/",
    );
    let geocoder_user_agent = or_default(
        "RXLOCATE_GEOCODER_USER_AGENT",
        "rxlocate/0.1 (pharmacy-locator)",
    );
    let geocoder_timeout_secs = parse_u64("RXLOCATE_GEOCODER_TIMEOUT_SECS", "10")?;
    let geocoder_max_retries = parse_u32("RXLOCATE_GEOCODER_MAX_RETRIES", "2")?;
    let geocoder_backoff_base_ms = parse_u64("RXLOCATE_GEOCODER_BACKOFF_BASE_MS", "500")?;

    let search_cache_ttl_secs = parse_u64("RXLOCATE_SEARCH_CACHE_TTL_SECS", "300")?;
    let rate_limit_per_minute = parse_usize("RXLOCATE_RATE_LIMIT_PER_MINUTE", "120")?;
    if rate_limit_per_minute == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RXLOCATE_RATE_LIMIT_PER_MINUTE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        geocoder_base_url,
        geocoder_user_agent,
        geocoder_timeout_secs,
        geocoder_max_retries,
        geocoder_backoff_base_ms,
        search_cache_ttl_secs,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RXLOCATE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
