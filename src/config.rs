use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    device::{
        FanSpeed, Rgb, RgbEffect,
        linux_i2c::{DEFAULT_BUS_PATH, DEFAULT_DEVICE_ADDRESS},
    },
    fan_curve::{CurvePoint, hysteresis_curve::HysteresisCurve, linear_curve::LinearCurve},
    telemetry::THERMAL_ZONE_PATH,
};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/coolhatd/config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file \"{}\"", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse configuration file \"{}\"", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Device address {0:#04x} is not a 7-bit I2C address")]
    InvalidAddress(u8),
    #[error("The update interval must be greater than zero")]
    ZeroInterval,
    #[error("Fan curve point ({temp}, {percent}) is above 100%")]
    InvalidCurvePoint { temp: i32, percent: u8 },
}

// Daemon configuration, every field falls back to its default
// when it is missing from the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bus_path: PathBuf,
    pub device_address: u8,
    pub thermal_path: PathBuf,

    pub update_interval_ms: u64,

    // Exit when the HAT can not be opened instead of
    // running without fan control
    pub require_device: bool,

    pub fan_curve: FanCurveConfig,
    // Pin the fan to a duty cycle in percent instead of following the curve
    pub fixed_fan_speed: Option<u8>,
    // Duty cycle in percent applied when the daemon quits
    pub shutdown_fan_speed: u8,

    pub rgb: RgbConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanCurveConfig {
    // (temperature in °C, duty cycle in percent)
    pub points: Vec<(i32, u8)>,
    pub hysteresis_up: u32,
    pub hysteresis_down: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RgbConfig {
    pub enabled: bool,
    pub color: Rgb,
    pub effect: RgbEffect,
}

impl Config {
    // Load the configuration file, a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "Configuration file \"{}\" not found, using defaults",
                    path.display()
                );

                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Config = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;

        debug!("Loaded configuration: {:?}", config);

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0x03..=0x77).contains(&self.device_address) {
            return Err(ConfigError::InvalidAddress(self.device_address));
        }

        if self.update_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        if let Some(&(temp, percent)) =
            self.fan_curve.points.iter().find(|(_, percent)| *percent > 100)
        {
            return Err(ConfigError::InvalidCurvePoint { temp, percent });
        }

        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn fixed_fan_speed(&self) -> Option<FanSpeed> {
        self.fixed_fan_speed.map(FanSpeed::from_percent)
    }

    pub fn shutdown_fan_speed(&self) -> FanSpeed {
        FanSpeed::from_percent(self.shutdown_fan_speed)
    }
}

impl FanCurveConfig {
    pub fn build(&self) -> HysteresisCurve<LinearCurve> {
        let points: Vec<CurvePoint> =
            self.points.iter().map(|p| CurvePoint::from(*p)).collect();

        HysteresisCurve::new(&points, self.hysteresis_down, self.hysteresis_up)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus_path: PathBuf::from(DEFAULT_BUS_PATH),
            device_address: DEFAULT_DEVICE_ADDRESS,
            thermal_path: PathBuf::from(THERMAL_ZONE_PATH),
            update_interval_ms: 2000,
            require_device: false,
            fan_curve: FanCurveConfig::default(),
            fixed_fan_speed: None,
            shutdown_fan_speed: 100,
            rgb: RgbConfig::default(),
        }
    }
}

impl Default for FanCurveConfig {
    fn default() -> Self {
        Self {
            points: vec![(40, 20), (50, 50), (60, 80), (70, 100)],
            hysteresis_up: 2,
            hysteresis_down: 3,
        }
    }
}

impl Default for RgbConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Rgb::new(0, 0, 255),
            effect: RgbEffect::Breathing,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::fan_curve::FanCurve;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load(&dir.path().join("config.json")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.bus_path, PathBuf::from("/dev/i2c-1"));
        assert_eq!(config.device_address, 0x0d);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = config_file(
            r#"{
                "device_address": 14,
                "fixed_fan_speed": 45,
                "rgb": { "effect": "rainbow" }
            }"#,
        );

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.device_address, 0x0e);
        assert_eq!(config.fixed_fan_speed(), Some(FanSpeed::P50));
        assert_eq!(config.rgb.effect, RgbEffect::Rainbow);
        assert!(config.rgb.enabled);
        assert_eq!(config.update_interval(), Duration::from_secs(2));
        assert_eq!(config.shutdown_fan_speed(), FanSpeed::Max);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = config_file("{ \"bus_path\": ");

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = config_file(r#"{ "device_address": 120 }"#);
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::InvalidAddress(120))
        ));

        let file = config_file(r#"{ "update_interval_ms": 0 }"#);
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::ZeroInterval)
        ));

        let file = config_file(r#"{ "fan_curve": { "points": [[50, 120]] } }"#);
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::InvalidCurvePoint { temp: 50, percent: 120 })
        ));
    }

    #[test]
    fn curve_is_built_from_points() {
        let config = Config::default();

        let curve = config.fan_curve.build();

        assert_eq!(curve.points_num(), 4);
        assert_eq!(curve.get_speed(30), 20);
        assert_eq!(curve.get_speed(80), 100);
    }
}
