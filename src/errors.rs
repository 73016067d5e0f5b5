use thiserror::Error;

use crate::{config::ConfigError, device::DeviceError};

// The main daemon error type
#[derive(Debug, Error)]
pub enum CoolhatError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Device(#[from] DeviceError),
}
