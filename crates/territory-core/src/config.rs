//! Layered engine configuration.
//!
//! Precedence: environment variables > config file > defaults. Every value
//! tracks the source it came from, which keeps misconfiguration debuggable
//! in multi-tenant deployments.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{Result, TerritoryError};
use crate::geo::cluster::DEFAULT_MAX_ITERATIONS;
use crate::geo::hull::DEFAULT_BUFFER_KM;
use crate::geocode::DEFAULT_CACHE_CAPACITY;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Partial config as read from a TOML file; absent keys keep their
/// previous value.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    buffer_km: Option<f64>,
    cluster_max_iterations: Option<usize>,
    simplify_tolerance_km: Option<f64>,
    geocode_cache_capacity: Option<usize>,
}

/// Layered configuration for the territory engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Safety margin applied around synthesized boundaries
    pub buffer_km: ConfigValue<f64>,

    /// Iteration cap for the clustering loop
    pub cluster_max_iterations: ConfigValue<usize>,

    /// Tolerance for boundary simplification; 0 disables simplification
    pub simplify_tolerance_km: ConfigValue<f64>,

    /// Geocode cache capacity (distinct addresses)
    pub geocode_cache_capacity: ConfigValue<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EngineConfig {
    pub fn with_defaults() -> Self {
        Self {
            buffer_km: ConfigValue::new(DEFAULT_BUFFER_KM, ConfigSource::Default),
            cluster_max_iterations: ConfigValue::new(
                DEFAULT_MAX_ITERATIONS,
                ConfigSource::Default,
            ),
            simplify_tolerance_km: ConfigValue::new(0.0, ConfigSource::Default),
            geocode_cache_capacity: ConfigValue::new(DEFAULT_CACHE_CAPACITY, ConfigSource::Default),
        }
    }

    /// Apply values from a TOML config file.
    pub fn load_from_file(mut self, path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let file: FileConfig = toml::from_str(&raw)
            .map_err(|e| TerritoryError::Serialization(e.to_string()))?;

        if let Some(v) = file.buffer_km {
            self.buffer_km.update(v, ConfigSource::File);
        }
        if let Some(v) = file.cluster_max_iterations {
            self.cluster_max_iterations.update(v, ConfigSource::File);
        }
        if let Some(v) = file.simplify_tolerance_km {
            self.simplify_tolerance_km.update(v, ConfigSource::File);
        }
        if let Some(v) = file.geocode_cache_capacity {
            self.geocode_cache_capacity.update(v, ConfigSource::File);
        }
        Ok(self)
    }

    /// Apply `TERRITORY_*` environment variable overrides. Unparseable
    /// values are logged and skipped.
    pub fn load_from_env(mut self) -> Self {
        if let Ok(raw) = env::var("TERRITORY_BUFFER_KM") {
            match raw.parse() {
                Ok(v) => self.buffer_km.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    value = %raw,
                    "ignoring unparseable TERRITORY_BUFFER_KM"
                ),
            }
        }
        if let Ok(raw) = env::var("TERRITORY_CLUSTER_MAX_ITERATIONS") {
            match raw.parse() {
                Ok(v) => self.cluster_max_iterations.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    value = %raw,
                    "ignoring unparseable TERRITORY_CLUSTER_MAX_ITERATIONS"
                ),
            }
        }
        if let Ok(raw) = env::var("TERRITORY_SIMPLIFY_TOLERANCE_KM") {
            match raw.parse() {
                Ok(v) => self.simplify_tolerance_km.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    value = %raw,
                    "ignoring unparseable TERRITORY_SIMPLIFY_TOLERANCE_KM"
                ),
            }
        }
        if let Ok(raw) = env::var("TERRITORY_GEOCODE_CACHE_CAPACITY") {
            match raw.parse() {
                Ok(v) => self.geocode_cache_capacity.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    value = %raw,
                    "ignoring unparseable TERRITORY_GEOCODE_CACHE_CAPACITY"
                ),
            }
        }
        self
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_km.value < 0.0 {
            return Err(TerritoryError::ConfigInvalid {
                key: "buffer_km".to_string(),
                reason: "must be non-negative".to_string(),
            });
        }
        if self.cluster_max_iterations.value == 0 {
            return Err(TerritoryError::ConfigInvalid {
                key: "cluster_max_iterations".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.simplify_tolerance_km.value < 0.0 {
            return Err(TerritoryError::ConfigInvalid {
                key: "simplify_tolerance_km".to_string(),
                reason: "must be non-negative".to_string(),
            });
        }
        if self.geocode_cache_capacity.value == 0 {
            return Err(TerritoryError::ConfigInvalid {
                key: "geocode_cache_capacity".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
