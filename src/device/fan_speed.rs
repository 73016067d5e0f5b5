use std::fmt;

// Discrete fan duty cycle steps understood by the HAT firmware.
// The variants are declared in ascending duty cycle order so the
// derived ordering compares fan speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FanSpeed {
    Off,
    P20,
    P30,
    P40,
    P50,
    P60,
    P70,
    P80,
    P90,
    Max,
}

impl FanSpeed {
    pub const ALL: [FanSpeed; 10] = [
        FanSpeed::Off,
        FanSpeed::P20,
        FanSpeed::P30,
        FanSpeed::P40,
        FanSpeed::P50,
        FanSpeed::P60,
        FanSpeed::P70,
        FanSpeed::P80,
        FanSpeed::P90,
        FanSpeed::Max,
    ];

    // Return the byte written to the fan register.
    // The firmware puts full speed right after off.
    pub const fn code(self) -> u8 {
        match self {
            FanSpeed::Off => 0x00,
            FanSpeed::Max => 0x01,
            FanSpeed::P20 => 0x02,
            FanSpeed::P30 => 0x03,
            FanSpeed::P40 => 0x04,
            FanSpeed::P50 => 0x05,
            FanSpeed::P60 => 0x06,
            FanSpeed::P70 => 0x07,
            FanSpeed::P80 => 0x08,
            FanSpeed::P90 => 0x09,
        }
    }

    pub fn from_code(code: u8) -> Option<FanSpeed> {
        Self::ALL.into_iter().find(|speed| speed.code() == code)
    }

    pub const fn percent(self) -> u8 {
        match self {
            FanSpeed::Off => 0,
            FanSpeed::P20 => 20,
            FanSpeed::P30 => 30,
            FanSpeed::P40 => 40,
            FanSpeed::P50 => 50,
            FanSpeed::P60 => 60,
            FanSpeed::P70 => 70,
            FanSpeed::P80 => 80,
            FanSpeed::P90 => 90,
            FanSpeed::Max => 100,
        }
    }

    // Return the slowest level that is at least the requested duty cycle,
    // anything above 100 is treated as full speed
    pub fn from_percent(percent: u8) -> FanSpeed {
        Self::ALL
            .into_iter()
            .find(|speed| speed.percent() >= percent)
            .unwrap_or(FanSpeed::Max)
    }

    // Short label used on the display
    pub const fn label(self) -> &'static str {
        match self {
            FanSpeed::Off => "OFF",
            FanSpeed::P20 => "20%",
            FanSpeed::P30 => "30%",
            FanSpeed::P40 => "40%",
            FanSpeed::P50 => "50%",
            FanSpeed::P60 => "60%",
            FanSpeed::P70 => "70%",
            FanSpeed::P80 => "80%",
            FanSpeed::P90 => "90%",
            FanSpeed::Max => "MAX",
        }
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
