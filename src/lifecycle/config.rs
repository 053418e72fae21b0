//! Environment configuration.

use crate::model::Principal;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const ADMINS: &str = "ORDER_DESK_ADMINS";
pub const ENFORCE_STOCK: &str = "ORDER_DESK_ENFORCE_STOCK";
pub const MAX_QUANTITY: &str = "ORDER_DESK_MAX_QUANTITY";
pub const CHANNEL_BUFFER: &str = "ORDER_DESK_CHANNEL_BUFFER";
pub const STOCK_POLL_MS: &str = "ORDER_DESK_STOCK_POLL_MS";
pub const ORDERS_POLL_MS: &str = "ORDER_DESK_ORDERS_POLL_MS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    /// Principals granted `Admin` at startup.
    pub admins: Vec<Principal>,
    /// Reject orders containing out-of-stock products.
    pub enforce_stock: bool,
    pub max_order_quantity: u32,
    /// Mailbox size of each actor.
    pub channel_buffer: usize,
    pub stock_poll_interval: Duration,
    pub orders_poll_interval: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            admins: Vec::new(),
            enforce_stock: true,
            max_order_quantity: 50,
            channel_buffer: 32,
            stock_poll_interval: Duration::from_secs(5),
            orders_poll_interval: Duration::from_secs(10),
        }
    }
}

impl SystemConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env loaded: {e}");
        }
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        info!(
            admins = config.admins.len(),
            enforce_stock = config.enforce_stock,
            max_order_quantity = config.max_order_quantity,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let admins = match lookup(ADMINS) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(Principal::new)
                .collect(),
            None => defaults.admins,
        };

        Ok(Self {
            admins,
            enforce_stock: parse_flag(&lookup, ENFORCE_STOCK, defaults.enforce_stock)?,
            max_order_quantity: positive(&lookup, MAX_QUANTITY, defaults.max_order_quantity)?,
            channel_buffer: positive(&lookup, CHANNEL_BUFFER, defaults.channel_buffer)?,
            stock_poll_interval: millis(&lookup, STOCK_POLL_MS, defaults.stock_poll_interval)?,
            orders_poll_interval: millis(&lookup, ORDERS_POLL_MS, defaults.orders_poll_interval)?,
        })
    }
}

fn invalid(key: &'static str, value: &str, reason: impl Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, &value, "expected true or false")),
    }
}

fn positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + From<u8>,
    T::Err: Display,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    let parsed: T = value.trim().parse().map_err(|e| invalid(key, &value, e))?;
    if parsed < T::from(1u8) {
        return Err(invalid(key, &value, "must be at least 1"));
    }
    Ok(parsed)
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    positive(lookup, key, default_ms).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(SystemConfig::from_lookup(lookup(&[])).unwrap(), SystemConfig::default());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = SystemConfig::from_lookup(lookup(&[
            (ADMINS, "alice, bob,,"),
            (ENFORCE_STOCK, "no"),
            (MAX_QUANTITY, "10"),
            (CHANNEL_BUFFER, "8"),
            (STOCK_POLL_MS, "250"),
            (ORDERS_POLL_MS, "500"),
        ]))
        .unwrap();

        assert_eq!(config.admins, vec![Principal::new("alice"), Principal::new("bob")]);
        assert!(!config.enforce_stock);
        assert_eq!(config.max_order_quantity, 10);
        assert_eq!(config.channel_buffer, 8);
        assert_eq!(config.stock_poll_interval, Duration::from_millis(250));
        assert_eq!(config.orders_poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_rejects_malformed_values() {
        let err = SystemConfig::from_lookup(lookup(&[(MAX_QUANTITY, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: MAX_QUANTITY, .. }));

        let err = SystemConfig::from_lookup(lookup(&[(CHANNEL_BUFFER, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: CHANNEL_BUFFER, .. }));

        let err = SystemConfig::from_lookup(lookup(&[(ENFORCE_STOCK, "maybe")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid ORDER_DESK_ENFORCE_STOCK=\"maybe\": expected true or false");
    }

    #[test]
    fn test_admin_named_anonymous_is_a_real_principal() {
        let config = SystemConfig::from_lookup(lookup(&[(ADMINS, "anonymous")])).unwrap();
        assert_eq!(config.admins.len(), 1);
        assert!(!config.admins[0].is_anonymous());
    }
}
