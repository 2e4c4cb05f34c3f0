//! Store configuration and environment loading.
//!
//! # Responsibility
//! - Describe where the catalog lives and how its schema is initialized.
//! - Load that description from process environment for entry points.
//!
//! # Invariants
//! - The schema policy is always explicit; `Preserve` is only a default.
//! - `:memory:` is the only in-memory sentinel.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_VAR: &str = "CATALOG_DB_PATH";
pub const LEGACY_DB_PATH_VAR: &str = "SQLITE_DB_PATH";
pub const SCHEMA_POLICY_VAR: &str = "CATALOG_SCHEMA_POLICY";
pub const BUSY_TIMEOUT_VAR: &str = "CATALOG_BUSY_TIMEOUT_MS";

const MEMORY_SENTINEL: &str = ":memory:";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Where the catalog database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Transient database that disappears with its handle.
    Memory,
}

impl StoreLocation {
    /// Parses a location string, mapping `:memory:` to [`StoreLocation::Memory`].
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed == MEMORY_SENTINEL {
            return Some(Self::Memory);
        }
        Some(Self::File(PathBuf::from(trimmed)))
    }

    pub(crate) fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// What `initialize` does with an existing `album` table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaPolicy {
    /// Create the table if absent and keep existing rows.
    #[default]
    Preserve,
    /// Drop the table and recreate it empty; identifiers restart at 1.
    Recreate,
}

impl SchemaPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "preserve" => Some(Self::Preserve),
            "recreate" => Some(Self::Recreate),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Recreate => "recreate",
        }
    }
}

/// Everything `CatalogStore::initialize` needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    pub schema_policy: SchemaPolicy,
    /// How long a blocked statement waits on a locked database.
    pub busy_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidValue { var: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVar(var) => write!(f, "specify the {var} environment variable"),
            Self::InvalidValue { var, value } => {
                write!(f, "invalid value `{value}` for {var}")
            }
        }
    }
}

impl Error for ConfigError {}

impl StoreConfig {
    /// Config for a file database with default policy and timeout.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::with_location(StoreLocation::File(path.into()))
    }

    /// Config for a transient in-memory database.
    pub fn in_memory() -> Self {
        Self::with_location(StoreLocation::Memory)
    }

    fn with_location(location: StoreLocation) -> Self {
        Self {
            location,
            schema_policy: SchemaPolicy::default(),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    pub fn schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = policy;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// - `MissingVar` when neither path variable is set to a non-empty value.
    /// - `InvalidValue` for an unknown policy or a non-numeric timeout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let location = [DB_PATH_VAR, LEGACY_DB_PATH_VAR]
            .into_iter()
            .filter_map(&lookup)
            .find_map(|value| StoreLocation::parse(&value))
            .ok_or(ConfigError::MissingVar(DB_PATH_VAR))?;

        let schema_policy = match lookup(SCHEMA_POLICY_VAR) {
            Some(value) => SchemaPolicy::parse(&value).ok_or(ConfigError::InvalidValue {
                var: SCHEMA_POLICY_VAR,
                value,
            })?,
            None => SchemaPolicy::default(),
        };

        let busy_timeout_ms = match lookup(BUSY_TIMEOUT_VAR) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: BUSY_TIMEOUT_VAR,
                    value,
                })?,
            None => DEFAULT_BUSY_TIMEOUT_MS,
        };

        Ok(Self {
            location,
            schema_policy,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        })
    }
}
