// One-byte writable slots on the cooling HAT controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Red,
    Green,
    Blue,
    RgbEffect,
    RgbMode,
    Fan,
}

impl Register {
    pub const ALL: [Register; 6] = [
        Register::Red,
        Register::Green,
        Register::Blue,
        Register::RgbEffect,
        Register::RgbMode,
        Register::Fan,
    ];

    // Return the register address sent as the first byte
    // of every bus transaction
    pub const fn address(self) -> u8 {
        match self {
            Register::Red => 0x00,
            Register::Green => 0x01,
            Register::Blue => 0x02,
            Register::RgbEffect => 0x04,
            Register::RgbMode => 0x07,
            Register::Fan => 0x08,
        }
    }
}
