//! # Node Configuration
//!
//! Unified configuration for the registries and runtime parameters.
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. TOML file named by `CUSTODY_CONFIG`
//! 3. `CUSTODY_ADMIN` and `CUSTODY_LOG` environment variables
//!
//! ## Config File Format
//!
//! ```toml
//! admin = "0x1111111111111111111111111111111111111111"
//! log_filter = "info,custody_registry=debug"
//! bus_capacity = 1000
//! authorized_users = ["0x2222222222222222222222222222222222222222"]
//!
//! [registry]
//! case_stages = ["Identification", "Collection", "Analysis"]
//! authorize_deployer = true
//!
//! [genesis]
//! case_id = 1
//! owner = "0x1111111111111111111111111111111111111111"
//! stages = []
//! ```

use custody_registry::RegistryConfig;
use serde::Deserialize;
use shared_types::entities::{Address, CaseId};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "CUSTODY_CONFIG";
/// Environment variable overriding the admin identity.
pub const ADMIN_ENV: &str = "CUSTODY_ADMIN";
/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "CUSTODY_LOG";

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Admin of the accounts registry and the case registry.
    pub admin: Address,
    /// `tracing-subscriber` filter directive.
    pub log_filter: String,
    /// Event bus buffer per subscriber.
    pub bus_capacity: usize,
    /// Identities authorized in the case registry at startup.
    pub authorized_users: Vec<Address>,
    /// Case deployed at startup, if any.
    pub genesis: Option<GenesisCaseConfig>,
    /// Registry configuration.
    pub registry: RegistryConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            admin: Address::ZERO, // MUST be overridden
            log_filter: "info".to_string(),
            bus_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
            authorized_users: Vec::new(),
            genesis: None,
            registry: RegistryConfig::default(),
        }
    }
}

/// The case deployed when the node starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisCaseConfig {
    /// Case id.
    pub case_id: CaseId,
    /// Case admin. Defaults to the node admin.
    pub owner: Option<Address>,
    /// Stage catalog. Empty means the registry's case stages.
    pub stages: Vec<String>,
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {error}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        error: String,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// An address field did not parse.
    #[error("Invalid address in {field}: {reason}")]
    InvalidAddress {
        /// Config key
        field: String,
        /// Parse failure
        reason: String,
    },

    /// No admin identity was configured.
    #[error("Admin identity is not set. Set CUSTODY_ADMIN or `admin` in the config file.")]
    MissingAdmin,

    /// Event bus capacity of zero.
    #[error("Event bus capacity must be positive")]
    ZeroCapacity,

    /// A configured stage name is empty.
    #[error("Stage names must not be empty")]
    EmptyStageName,
}

/// Configuration file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    admin: Option<String>,
    log_filter: Option<String>,
    bus_capacity: Option<usize>,
    #[serde(default)]
    authorized_users: Vec<String>,
    registry: Option<RegistryConfig>,
    genesis: Option<GenesisFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenesisFile {
    case_id: CaseId,
    owner: Option<String>,
    #[serde(default)]
    stages: Vec<String>,
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConfigError> {
    value.parse().map_err(|e: shared_types::AddressParseError| {
        ConfigError::InvalidAddress {
            field: field.to_string(),
            reason: e.to_string(),
        }
    })
}

impl NodeConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(CONFIG_PATH_ENV) {
            config.apply_file(&path)?;
        }
        if let Some(admin) = lookup(ADMIN_ENV) {
            config.admin = parse_address(ADMIN_ENV, &admin)?;
        }
        if let Some(filter) = lookup(LOG_ENV) {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    /// Overlay the TOML file at `path`.
    pub fn apply_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        self.apply_toml(&content)
    }

    /// Overlay a TOML document.
    pub fn apply_toml(&mut self, content: &str) -> Result<(), ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if let Some(admin) = file.admin {
            self.admin = parse_address("admin", &admin)?;
        }
        if let Some(filter) = file.log_filter {
            self.log_filter = filter;
        }
        if let Some(capacity) = file.bus_capacity {
            self.bus_capacity = capacity;
        }
        if !file.authorized_users.is_empty() {
            self.authorized_users = file
                .authorized_users
                .iter()
                .map(|a| parse_address("authorized_users", a))
                .collect::<Result<_, _>>()?;
        }
        if let Some(registry) = file.registry {
            self.registry = registry;
        }
        if let Some(genesis) = file.genesis {
            self.genesis = Some(GenesisCaseConfig {
                case_id: genesis.case_id,
                owner: genesis
                    .owner
                    .map(|o| parse_address("genesis.owner", &o))
                    .transpose()?,
                stages: genesis.stages,
            });
        }
        Ok(())
    }

    /// Check the configuration can start a node.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.is_zero() {
            return Err(ConfigError::MissingAdmin);
        }
        if self.bus_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let genesis_stages = self.genesis.iter().flat_map(|g| g.stages.iter());
        if self
            .registry
            .case_stages
            .iter()
            .chain(genesis_stages)
            .any(|s| s.trim().is_empty())
        {
            return Err(ConfigError::EmptyStageName);
        }
        Ok(())
    }
}
