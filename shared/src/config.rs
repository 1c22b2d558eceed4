use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub booking: BookingConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            booking: BookingConfig::from_env()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: string_or("DATABASE_HOST", "localhost"),
            port: parse_or("DATABASE_PORT", 5432)?,
            username: string_or("DATABASE_USERNAME", "app"),
            password: string_or("DATABASE_PASSWORD", "passwd"),
            database: string_or("DATABASE_NAME", "app"),
        })
    }
}

/// Tunables of the booking core. The defaults match the studio's
/// house rules and can be overridden per deployment.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Maximum confirmed reservations a member may hold for sessions
    /// that have not taken place yet.
    pub max_active_reservations: i64,
    /// A reservation can be cancelled until this many hours before the class starts.
    pub cancellation_cutoff_hours: i64,
    /// Weight of each prior confirmed reservation in the waitlist priority score.
    pub priority_weight: i32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_active_reservations: 3,
            cancellation_cutoff_hours: 2,
            priority_weight: 10,
        }
    }
}

impl BookingConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_active_reservations: parse_or(
                "BOOKING_MAX_ACTIVE_RESERVATIONS",
                defaults.max_active_reservations,
            )?,
            cancellation_cutoff_hours: parse_or(
                "BOOKING_CANCELLATION_CUTOFF_HOURS",
                defaults.cancellation_cutoff_hours,
            )?,
            priority_weight: parse_or("BOOKING_PRIORITY_WEIGHT", defaults.priority_weight)?,
        })
    }
}

fn string_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("failed to parse environment variable {key}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_defaults_follow_house_rules() {
        let config = BookingConfig::default();
        assert_eq!(config.max_active_reservations, 3);
        assert_eq!(config.cancellation_cutoff_hours, 2);
        assert_eq!(config.priority_weight, 10);
    }
}
