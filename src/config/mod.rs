// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::ConfigError;

/// Pulses closer together than this are contact bounce. Not configurable.
pub const DEBOUNCE_THRESHOLD: Duration = Duration::from_millis(10);

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level used when no CLI flag overrides it
    pub log_level: String,

    /// Pulse source configuration
    pub sensor: SensorConfig,

    /// Rider and wheel parameters
    pub rider: RiderConfig,

    /// HTTP server configuration
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            sensor: SensorConfig::default(),
            rider: RiderConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("vital"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        positive("rider.circumference_metres", self.rider.circumference_metres)?;
        positive("rider.body_weight_kilograms", self.rider.body_weight_kilograms)?;
        positive("rider.idle_timeout_seconds", self.rider.idle_timeout_seconds)?;

        if self.sensor.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.sensor.chip.trim().is_empty() {
            return Err(ConfigError::EmptyChip);
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> std::result::Result<(), ConfigError> {
    // NaN fails this comparison too
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// Pulse source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SensorConfig {
    /// GPIO character device, either a name under /dev or an absolute path
    pub chip: String,

    /// Line offset on the chip
    pub line: u32,

    /// Capacity of the channel between the line reader and the engine
    pub channel_capacity: usize,

    /// Use the built-in pulse simulator instead of real hardware
    pub demo_mode: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            chip: "gpiochip0".to_string(),
            line: 17,
            channel_capacity: 1024,
            demo_mode: false,
        }
    }
}

impl SensorConfig {
    /// Resolve the chip name to a device path
    pub fn chip_path(&self) -> PathBuf {
        let chip = Path::new(&self.chip);
        if chip.is_absolute() {
            chip.to_path_buf()
        } else {
            Path::new("/dev").join(chip)
        }
    }
}

/// Rider and wheel parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiderConfig {
    /// Wheel circumference in metres
    pub circumference_metres: f64,

    /// Rider body weight in kilograms
    pub body_weight_kilograms: f64,

    /// Seconds without a pulse before the rider counts as stopped
    pub idle_timeout_seconds: f64,
}

impl Default for RiderConfig {
    fn default() -> Self {
        Self {
            circumference_metres: 1.41,
            body_weight_kilograms: 85.0,
            idle_timeout_seconds: 2.0,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind_address: IpAddr,

    /// Listening port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 80,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}
