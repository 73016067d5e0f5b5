pub mod fan_speed;
pub mod linux_i2c;
pub mod register;
pub mod rgb;

use std::{io, path::{Path, PathBuf}};

use thiserror::Error;
use tracing::{debug, error, trace, warn};

pub use fan_speed::FanSpeed;
pub use linux_i2c::LinuxI2cBus;
pub use register::Register;
pub use rgb::{Rgb, RgbEffect};

use crate::{config::Config, errors::CoolhatError};

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Failed to open I2C bus \"{}\"", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to bind I2C bus \"{}\" to address {address:#04x}", path.display())]
    Bind {
        path: PathBuf,
        address: u8,
        #[source]
        source: nix::Error,
    },
    #[error("Invalid 7-bit I2C address {0:#04x}")]
    InvalidAddress(u8),
    #[error("Failed to write register {register:?}")]
    Write {
        register: Register,
        #[source]
        source: io::Error,
    },
    #[error("Short write on register {register:?}: {written} of 2 bytes sent")]
    ShortWrite { register: Register, written: usize },
}

// Transport able to send one address+data transaction to the
// peripheral it was bound to. Returns the number of bytes sent.
pub trait RegisterBus {
    fn write_bytes(&mut self, bytes: &[u8; 2]) -> io::Result<usize>;
}

// Owns the bus handle of the cooling HAT. A controller can only be built
// from an already opened bus, so there is no uninitialized write path.
// The controller is not synchronized, keep it on a single task.
#[derive(Debug)]
pub struct DeviceController<B: RegisterBus> {
    bus: B,
}

impl DeviceController<LinuxI2cBus> {
    // Open the I2C bus and bind it to the peripheral address
    pub fn init(path: &Path, address: u8) -> Result<Self, DeviceError> {
        let bus = LinuxI2cBus::open(path, address)?;

        Ok(Self::new(bus))
    }

    // Same as init but only reports success, the failure is logged
    pub fn try_init(path: &Path, address: u8) -> Option<Self> {
        match Self::init(path, address) {
            Ok(controller) => Some(controller),
            Err(err) => {
                error!("{err}");
                if let Some(source) = std::error::Error::source(&err) {
                    debug!("Caused by: {source}");
                }

                None
            }
        }
    }
}

impl<B: RegisterBus> DeviceController<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    // Send a single [register, data] transaction, nothing is read back
    pub fn write_register(
        &mut self,
        register: Register,
        data: u8,
    ) -> Result<(), DeviceError> {
        trace!("Writing {:#04x} to register {:?}", data, register);

        let result = match self.bus.write_bytes(&[register.address(), data]) {
            Ok(2) => Ok(()),
            Ok(written) => Err(DeviceError::ShortWrite { register, written }),
            Err(source) => Err(DeviceError::Write { register, source }),
        };

        if let Err(err) = &result {
            warn!("{err}");
        }

        result
    }

    pub fn set_color(&mut self, color: Rgb) -> Result<(), DeviceError> {
        self.write_register(Register::Red, color.red)?;
        self.write_register(Register::Green, color.green)?;
        self.write_register(Register::Blue, color.blue)
    }

    pub fn set_rgb_effect(&mut self, effect: RgbEffect) -> Result<(), DeviceError> {
        self.write_register(Register::RgbEffect, effect.code())
    }

    pub fn set_rgb_enabled(&mut self, enabled: bool) -> Result<(), DeviceError> {
        self.write_register(Register::RgbMode, u8::from(enabled))
    }

    pub fn set_fan_speed(&mut self, speed: FanSpeed) -> Result<(), DeviceError> {
        self.write_register(Register::Fan, speed.code())
    }
}

// Open the controller described by the configuration. A missing device
// is only fatal when the configuration requires it, otherwise the daemon
// runs without fan control.
pub fn open_controller(
    config: &Config,
) -> Result<Option<DeviceController<LinuxI2cBus>>, CoolhatError> {
    match DeviceController::init(&config.bus_path, config.device_address) {
        Ok(controller) => Ok(Some(controller)),
        Err(err) if config.require_device => Err(err.into()),
        Err(err) => {
            warn!("{err}, running without fan control");
            if let Some(source) = std::error::Error::source(&err) {
                debug!("Caused by: {source}");
            }

            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Bus accepting a fixed number of bytes per transaction
    struct ShortBus(usize);

    impl RegisterBus for ShortBus {
        fn write_bytes(&mut self, _bytes: &[u8; 2]) -> io::Result<usize> {
            Ok(self.0)
        }
    }

    struct BrokenBus;

    impl RegisterBus for BrokenBus {
        fn write_bytes(&mut self, _bytes: &[u8; 2]) -> io::Result<usize> {
            Err(io::Error::from_raw_os_error(nix::libc::EREMOTEIO))
        }
    }

    #[test]
    fn short_write_is_reported() {
        let mut controller = DeviceController::new(ShortBus(1));

        let err = controller.write_register(Register::Fan, 0x01).unwrap_err();

        assert!(matches!(
            err,
            DeviceError::ShortWrite { register: Register::Fan, written: 1 }
        ));
    }

    #[test]
    fn transport_error_is_surfaced() {
        let mut controller = DeviceController::new(BrokenBus);

        let err = controller.set_color(Rgb::new(1, 2, 3)).unwrap_err();

        // The first channel fails so the others are never written
        assert!(matches!(
            err,
            DeviceError::Write { register: Register::Red, .. }
        ));
    }

    #[test]
    fn missing_optional_device_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            bus_path: dir.path().join("i2c-9"),
            require_device: false,
            ..Config::default()
        };

        assert!(open_controller(&config).unwrap().is_none());
    }

    #[test]
    fn missing_required_device_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            bus_path: dir.path().join("i2c-9"),
            require_device: true,
            ..Config::default()
        };

        let err = open_controller(&config).unwrap_err();

        assert!(matches!(err, CoolhatError::Device(DeviceError::Open { .. })));
    }

    #[test]
    fn try_init_reports_failure() {
        let dir = tempfile::tempdir().unwrap();

        assert!(
            DeviceController::try_init(&dir.path().join("i2c-9"), 0x0d)
                .is_none()
        );
    }
}
