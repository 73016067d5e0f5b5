pub mod arg_parser;
pub mod config;
pub mod device;
pub mod errors;
pub mod fan_curve;
pub mod fan_manager;
pub mod logger;
pub mod telemetry;

use std::path::Path;

use crate::{
    config::Config,
    device::{DeviceController, LinuxI2cBus, open_controller},
    errors::CoolhatError,
};

// Load the configuration and open the HAT it describes.
// The controller is None when the device is optional and missing.
pub fn setup(
    config_path: &Path,
) -> Result<(Config, Option<DeviceController<LinuxI2cBus>>), CoolhatError> {
    let config = Config::load(config_path)?;
    let controller = open_controller(&config)?;

    Ok((config, controller))
}
