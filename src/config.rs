use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub authority: AuthorityConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP API
    #[serde(default = "default_host")]
    pub host: String,
    /// HTTP API port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorConfig {
    /// Start the status simulator together with the API server
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Period between ticks in milliseconds
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Chance per tick that an assigned shipment starts moving
    #[serde(default = "default_assigned_to_in_transit")]
    pub assigned_to_in_transit: f64,
    /// Chance per tick that an in-transit shipment is delivered
    #[serde(default = "default_in_transit_to_delivered")]
    pub in_transit_to_delivered: f64,
    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_tick_interval() -> u64 {
    5000
}

fn default_assigned_to_in_transit() -> f64 {
    0.3
}

fn default_in_transit_to_delivered() -> f64 {
    0.2
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval_ms: default_tick_interval(),
            assigned_to_in_transit: default_assigned_to_in_transit(),
            in_transit_to_delivered: default_in_transit_to_delivered(),
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorityConfig {
    /// Reject assign() for shipments already in-transit, delivered or cancelled
    #[serde(default = "default_true")]
    pub enforce_status_lock: bool,
    /// Capacity of the shipment event broadcast channel
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_event_capacity() -> usize {
    256
}

/// Upper bound for `authority.event_capacity`
pub const MAX_EVENT_CAPACITY: usize = 65_536;

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            enforce_status_lock: true,
            event_capacity: default_event_capacity(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeedConfig {
    /// JSON fixture with `shipments` and `transporters`; built-in demo data when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("simulator.tick_interval_ms", 5000)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("SHIPTRACK_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (SHIPTRACK_SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("SHIPTRACK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulator cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulator.tick_interval_ms == 0 {
            return Err(ConfigError::Message(
                "simulator.tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        for (name, p) in [
            ("simulator.assigned_to_in_transit", self.simulator.assigned_to_in_transit),
            ("simulator.in_transit_to_delivered", self.simulator.in_transit_to_delivered),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Message(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        if self.authority.event_capacity == 0
            || self.authority.event_capacity > MAX_EVENT_CAPACITY
        {
            return Err(ConfigError::Message(format!(
                "authority.event_capacity must be within [1, {}], got {}",
                MAX_EVENT_CAPACITY, self.authority.event_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_cadence() {
        let config = AppConfig::default();
        assert_eq!(config.simulator.tick_interval_ms, 5000);
        assert_eq!(config.simulator.assigned_to_in_transit, 0.3);
        assert_eq!(config.simulator.in_transit_to_delivered, 0.2);
        assert!(config.authority.enforce_status_lock);
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_missing_dir_uses_defaults() {
        let config = AppConfig::load_from("does/not/exist").unwrap();
        assert_eq!(config.simulator.tick_interval_ms, 5000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let mut config = AppConfig::default();
        config.simulator.in_transit_to_delivered = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("in_transit_to_delivered"));
    }

    #[test]
    fn test_validate_rejects_oversized_event_capacity() {
        let mut config = AppConfig::default();
        config.authority.event_capacity = usize::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("event_capacity"));

        config.authority.event_capacity = MAX_EVENT_CAPACITY;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_use_single_underscore_after_prefix() {
        std::env::set_var("SHIPTRACK_SERVER__PORT", "9191");
        let config = AppConfig::load_from("does/not/exist");
        std::env::remove_var("SHIPTRACK_SERVER__PORT");
        assert_eq!(config.unwrap().server.port, 9191);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = AppConfig::default();
        config.simulator.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
