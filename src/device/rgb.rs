use serde::{Deserialize, Serialize};

// LED colour, stored in the configuration as a [r, g, b] array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(value: Rgb) -> Self {
        [value.red, value.green, value.blue]
    }
}

// Animation selector written to the RGB effect register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RgbEffect {
    Water,
    #[default]
    Breathing,
    Marquee,
    Rainbow,
    Colorful,
}

impl RgbEffect {
    pub const fn code(self) -> u8 {
        match self {
            RgbEffect::Water => 0x00,
            RgbEffect::Breathing => 0x01,
            RgbEffect::Marquee => 0x02,
            RgbEffect::Rainbow => 0x03,
            RgbEffect::Colorful => 0x04,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_reads_from_array() {
        let color: Rgb = serde_json::from_str("[12, 34, 56]").unwrap();

        assert_eq!(color, Rgb::new(12, 34, 56));
        assert_eq!(serde_json::to_string(&color).unwrap(), "[12,34,56]");
    }

    #[test]
    fn effect_names_are_lowercase() {
        let effect: RgbEffect = serde_json::from_str("\"rainbow\"").unwrap();

        assert_eq!(effect, RgbEffect::Rainbow);
        assert_eq!(effect.code(), 0x03);
    }
}
