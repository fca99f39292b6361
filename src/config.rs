//! Environment-driven settings for the three binaries.
//!
//! Values come from the process environment, with a `.env` file in the
//! working directory loaded first if one exists.

use std::{fmt::Display, str::FromStr, time::Duration};

use anyhow::Context;

pub const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:5002";
pub const DEFAULT_CHAT_SERVICE_URL: &str = "http://localhost:5001";
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub database_url: String,
    pub bind_addr: String,
}

impl UserServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: var_or("USER_DATABASE_URL", "sqlite://users.db?mode=rwc"),
            bind_addr: var_or("USER_BIND_ADDR", "0.0.0.0:5002"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ChatServiceConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub user_service_url: String,
    pub upstream_timeout: Duration,
}

impl ChatServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: var_or("CHAT_DATABASE_URL", "sqlite://chats.db?mode=rwc"),
            bind_addr: var_or("CHAT_BIND_ADDR", "0.0.0.0:5001"),
            user_service_url: var_or("USER_SERVICE_URL", DEFAULT_USER_SERVICE_URL),
            upstream_timeout: Duration::from_millis(parse_var(
                "UPSTREAM_TIMEOUT_MS",
                DEFAULT_UPSTREAM_TIMEOUT_MS,
            )?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: String,
    pub user_service_url: String,
    pub chat_service_url: String,
    pub upstream_timeout: Duration,
    pub rate_limit_max: u64,
    pub rate_limit_window: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            bind_addr: var_or("GATEWAY_BIND_ADDR", "0.0.0.0:3000"),
            user_service_url: var_or("USER_SERVICE_URL", DEFAULT_USER_SERVICE_URL),
            chat_service_url: var_or("CHAT_SERVICE_URL", DEFAULT_CHAT_SERVICE_URL),
            upstream_timeout: Duration::from_millis(parse_var(
                "UPSTREAM_TIMEOUT_MS",
                DEFAULT_UPSTREAM_TIMEOUT_MS,
            )?),
            rate_limit_max: parse_var("RATE_LIMIT_MAX", 10)?,
            rate_limit_window: Duration::from_secs(parse_var("RATE_LIMIT_WINDOW_SECS", 60)?),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    parse_or(key, dotenv::var(key).ok(), default)
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = raw else {
        return Ok(default);
    };

    raw.trim()
        .parse()
        .map_err(|err| anyhow::anyhow!("{err}"))
        .with_context(|| format!("{key}={raw:?} is not valid"))
}
