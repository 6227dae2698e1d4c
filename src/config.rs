//! Environment-driven configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
    pub auth: AuthConfig,
    pub tariffs: Tariffs,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("APP_PORT", 3000u16)?;

        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", 5u32)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let admin_token = env::var("ADMIN_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("ADMIN_TOKEN"))?;

        let defaults = Tariffs::default();
        let tariffs = Tariffs {
            cleaning: parse_var("TARIFF_CLEANING", defaults.cleaning)?,
            linen_per_occupant: parse_var("TARIFF_LINEN_PER_OCCUPANT", defaults.linen_per_occupant)?,
            tourist_tax_per_adult_night: parse_var(
                "TARIFF_TOURIST_TAX_PER_ADULT_NIGHT",
                defaults.tourist_tax_per_adult_night,
            )?,
            deposit_percent: parse_var("TARIFF_DEPOSIT_PERCENT", defaults.deposit_percent)?,
        };

        let static_dir = PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()));

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            telemetry: TelemetryConfig { log_level },
            auth: AuthConfig { admin_token },
            tariffs,
            static_dir,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub admin_token: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_token", &"<redacted>")
            .finish()
    }
}

/// Extras added on top of the rental price in a booking's price summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Tariffs {
    pub cleaning: Decimal,
    pub linen_per_occupant: Decimal,
    pub tourist_tax_per_adult_night: Decimal,
    pub deposit_percent: Decimal,
}

impl Default for Tariffs {
    fn default() -> Self {
        Self {
            cleaning: dec!(80),
            linen_per_occupant: dec!(15),
            tourist_tax_per_adult_night: dec!(0.80),
            deposit_percent: dec!(30),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        #[source]
        source: std::net::AddrParseError,
    },
}
