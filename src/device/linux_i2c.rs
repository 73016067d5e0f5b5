use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    os::fd::AsRawFd,
    path::Path,
};

use tracing::debug;

use crate::device::{DeviceError, RegisterBus};

// Bus number 1 is the header I2C bus on the Raspberry Pi
pub const DEFAULT_BUS_PATH: &str = "/dev/i2c-1";
pub const DEFAULT_DEVICE_ADDRESS: u8 = 0x0d;

// Linux i2c-dev request binding the file descriptor to a peripheral
const I2C_SLAVE: u16 = 0x0703;

nix::ioctl_write_int_bad!(i2c_set_slave, I2C_SLAVE);

// An i2c-dev character device bound to a single peripheral address
#[derive(Debug)]
pub struct LinuxI2cBus {
    file: File,
}

impl LinuxI2cBus {
    // Open the bus and bind it to the given 7-bit address
    pub fn open(path: &Path, address: u8) -> Result<Self, DeviceError> {
        if !(0x03..=0x77).contains(&address) {
            return Err(DeviceError::InvalidAddress(address));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| DeviceError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        // SAFETY: the descriptor is owned by `file` and stays open for
        // the duration of the call, I2C_SLAVE takes the address by value
        unsafe { i2c_set_slave(file.as_raw_fd(), address.into()) }.map_err(
            |source| DeviceError::Bind {
                path: path.to_path_buf(),
                address,
                source,
            },
        )?;

        debug!("Opened I2C bus \"{}\" at {:#04x}", path.display(), address);

        Ok(Self { file })
    }
}

impl RegisterBus for LinuxI2cBus {
    fn write_bytes(&mut self, bytes: &[u8; 2]) -> io::Result<usize> {
        // A single write(2) on i2c-dev is one bus transaction
        self.file.write(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reserved_addresses() {
        let err = LinuxI2cBus::open(Path::new(DEFAULT_BUS_PATH), 0x78)
            .unwrap_err();

        assert!(matches!(err, DeviceError::InvalidAddress(0x78)));
    }

    #[test]
    fn missing_bus_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("i2c-42");

        let err = LinuxI2cBus::open(&path, DEFAULT_DEVICE_ADDRESS).unwrap_err();

        match err {
            DeviceError::Open { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn regular_file_cannot_be_bound() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let err = LinuxI2cBus::open(file.path(), DEFAULT_DEVICE_ADDRESS)
            .unwrap_err();

        assert!(matches!(err, DeviceError::Bind { address: 0x0d, .. }));
    }
}
