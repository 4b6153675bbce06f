use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::value_objects::thresholds::{
    AlertThresholds, Band, ChannelThresholds, HealthBands,
};

/// Top-level engine configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub trend: TrendConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Periodic task intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_sample_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_health_check_interval")]
    pub health_check_interval_secs: u64,
}

/// Bounded-store capacities and the remediation prune TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_metric_capacity")]
    pub metric_capacity: usize,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_prune_ttl")]
    pub prune_ttl_secs: u64,
}

/// Sliding-window trend classification parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    #[serde(default = "default_trend_window")]
    pub window: usize,
    #[serde(default = "default_trend_noise")]
    pub noise_points: f64,
}

/// Alert thresholds per channel plus the cooldown window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_memory_warning")]
    pub memory_warning_percent: f64,
    #[serde(default = "default_memory_critical")]
    pub memory_critical_percent: f64,
    #[serde(default = "default_error_rate_warning")]
    pub error_rate_warning_percent: f64,
    #[serde(default = "default_error_rate_critical")]
    pub error_rate_critical_percent: f64,
    #[serde(default = "default_latency_warning")]
    pub latency_warning_ms: f64,
    #[serde(default = "default_latency_critical")]
    pub latency_critical_ms: f64,
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: u64,
}

/// Health classification band cutoffs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_latency_good")]
    pub latency_good_ms: f64,
    #[serde(default = "default_latency_fair")]
    pub latency_fair_ms: f64,
    #[serde(default = "default_latency_poor")]
    pub latency_poor_ms: f64,
    #[serde(default = "default_error_good")]
    pub error_rate_good: f64,
    #[serde(default = "default_error_fair")]
    pub error_rate_fair: f64,
    #[serde(default = "default_error_poor")]
    pub error_rate_poor: f64,
    #[serde(default = "default_resource_good")]
    pub resource_good: f64,
    #[serde(default = "default_resource_fair")]
    pub resource_fair: f64,
    #[serde(default = "default_resource_poor")]
    pub resource_poor: f64,
}

// --- Defaults ---

const fn default_sample_interval() -> u64 {
    5
}

const fn default_health_check_interval() -> u64 {
    10
}

const fn default_metric_capacity() -> usize {
    1000
}

const fn default_history_capacity() -> usize {
    100
}

const fn default_prune_ttl() -> u64 {
    3600
}

const fn default_trend_window() -> usize {
    5
}

const fn default_trend_noise() -> f64 {
    2.0
}

const fn default_memory_warning() -> f64 {
    75.0
}

const fn default_memory_critical() -> f64 {
    90.0
}

const fn default_error_rate_warning() -> f64 {
    5.0
}

const fn default_error_rate_critical() -> f64 {
    15.0
}

const fn default_latency_warning() -> f64 {
    500.0
}

const fn default_latency_critical() -> f64 {
    2000.0
}

const fn default_cooldown() -> u64 {
    30
}

const fn default_latency_good() -> f64 {
    100.0
}

const fn default_latency_fair() -> f64 {
    500.0
}

const fn default_latency_poor() -> f64 {
    2000.0
}

const fn default_error_good() -> f64 {
    1.0
}

const fn default_error_fair() -> f64 {
    5.0
}

const fn default_error_poor() -> f64 {
    15.0
}

const fn default_resource_good() -> f64 {
    60.0
}

const fn default_resource_fair() -> f64 {
    75.0
}

const fn default_resource_poor() -> f64 {
    90.0
}

// --- Default impls ---

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sample_interval(),
            health_check_interval_secs: default_health_check_interval(),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            metric_capacity: default_metric_capacity(),
            history_capacity: default_history_capacity(),
            prune_ttl_secs: default_prune_ttl(),
        }
    }
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window: default_trend_window(),
            noise_points: default_trend_noise(),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            memory_warning_percent: default_memory_warning(),
            memory_critical_percent: default_memory_critical(),
            error_rate_warning_percent: default_error_rate_warning(),
            error_rate_critical_percent: default_error_rate_critical(),
            latency_warning_ms: default_latency_warning(),
            latency_critical_ms: default_latency_critical(),
            cooldown_secs: default_cooldown(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            latency_good_ms: default_latency_good(),
            latency_fair_ms: default_latency_fair(),
            latency_poor_ms: default_latency_poor(),
            error_rate_good: default_error_good(),
            error_rate_fair: default_error_fair(),
            error_rate_poor: default_error_poor(),
            resource_good: default_resource_good(),
            resource_fair: default_resource_fair(),
            resource_poor: default_resource_poor(),
        }
    }
}

// --- EngineConfig methods ---

impl EngineConfig {
    /// Load config from default path or create default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("vitals").join("config.toml"))
    }
}

impl From<&AlertsConfig> for AlertThresholds {
    fn from(config: &AlertsConfig) -> Self {
        // Clamp percentages to valid range and keep warning <= critical
        let memory_warning = config.memory_warning_percent.clamp(0.0, 100.0);
        let memory_critical = config
            .memory_critical_percent
            .clamp(0.0, 100.0)
            .max(memory_warning);
        let error_warning = config.error_rate_warning_percent.clamp(0.0, 100.0);
        let error_critical = config
            .error_rate_critical_percent
            .clamp(0.0, 100.0)
            .max(error_warning);
        let latency_warning = config.latency_warning_ms.max(0.0);
        let latency_critical = config.latency_critical_ms.max(latency_warning);

        Self {
            memory: ChannelThresholds::new(memory_warning, memory_critical),
            error_rate: ChannelThresholds::new(error_warning, error_critical),
            latency_ms: ChannelThresholds::new(latency_warning, latency_critical),
            cooldown_secs: config.cooldown_secs.max(1),
        }
    }
}

impl From<&HealthConfig> for HealthBands {
    fn from(config: &HealthConfig) -> Self {
        // Keep good <= fair <= poor per dimension
        let latency_good = config.latency_good_ms.max(0.0);
        let latency_fair = config.latency_fair_ms.max(latency_good);
        let latency_poor = config.latency_poor_ms.max(latency_fair);
        let error_good = config.error_rate_good.clamp(0.0, 100.0);
        let error_fair = config.error_rate_fair.clamp(0.0, 100.0).max(error_good);
        let error_poor = config.error_rate_poor.clamp(0.0, 100.0).max(error_fair);
        let resource_good = config.resource_good.clamp(0.0, 100.0);
        let resource_fair = config.resource_fair.clamp(0.0, 100.0).max(resource_good);
        let resource_poor = config.resource_poor.clamp(0.0, 100.0).max(resource_fair);

        Self {
            latency_ms: Band::new(latency_good, latency_fair, latency_poor),
            error_rate: Band::new(error_good, error_fair, error_poor),
            resource: Band::new(resource_good, resource_fair, resource_poor),
        }
    }
}
