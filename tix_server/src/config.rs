//! Server configuration
//!
//! Everything is read from `TIX_*` environment variables. Invalid values are logged and replaced by the defaults, so
//! the server always starts with a usable configuration.
use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::*;
use tix_common::{helpers::parse_boolean_flag, FeeRate, Secret};
use tix_engine::helpers::{RetryPolicy, TokenCodec, TokenError};

const DEFAULT_TIX_HOST: &str = "127.0.0.1";
const DEFAULT_TIX_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/tix_store.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// The service fee added to every purchase.
    pub service_fee: FeeRate,
    /// When set, ticket tokens are signed and unsigned tokens are refused at the door.
    pub token_secret: Option<Secret<String>>,
    pub retry: RetryPolicy,
    /// Run the schema migrations before accepting requests.
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TIX_HOST.to_string(),
            port: DEFAULT_TIX_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            service_fee: FeeRate::default(),
            token_secret: None,
            retry: RetryPolicy::new(DEFAULT_RETRY_MAX_ATTEMPTS, Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS)),
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TIX_HOST").ok().unwrap_or_else(|| DEFAULT_TIX_HOST.into());
        let port = parse_env("TIX_PORT", DEFAULT_TIX_PORT);
        let database_url = env::var("TIX_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ TIX_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = parse_env("TIX_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS).max(1);
        let service_fee = parse_env("TIX_SERVICE_FEE_BPS", FeeRate::default());
        info!("🪛️ Service fee is set to {service_fee}");
        let token_secret = env::var("TIX_TOKEN_SECRET").ok().filter(|s| !s.is_empty()).map(Secret::new);
        if token_secret.is_none() {
            warn!(
                "🚨️ TIX_TOKEN_SECRET is not set. Ticket tokens will be issued unsigned and anyone who knows a ticket \
                 id can forge a valid code. Set TIX_TOKEN_SECRET on production systems."
            );
        }
        let max_attempts = parse_env("TIX_RETRY_MAX_ATTEMPTS", DEFAULT_RETRY_MAX_ATTEMPTS);
        let base_delay = parse_env("TIX_RETRY_BASE_DELAY_MS", DEFAULT_RETRY_BASE_DELAY_MS);
        let retry = RetryPolicy::new(max_attempts, Duration::from_millis(base_delay));
        let run_migrations = parse_boolean_flag(env::var("TIX_RUN_MIGRATIONS").ok(), true);
        Self { host, port, database_url, max_connections, service_fee, token_secret, retry, run_migrations }
    }

    /// Builds the token codec for this configuration: signing if a secret is configured, unsigned otherwise.
    pub fn token_codec(&self) -> Result<TokenCodec, TokenError> {
        match &self.token_secret {
            Some(secret) => TokenCodec::signed(secret.reveal().as_bytes()),
            None => Ok(TokenCodec::unsigned()),
        }
    }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => {
            debug!("🪛️ {name} is not set. Using the default, {default}.");
            default
        },
    }
}
