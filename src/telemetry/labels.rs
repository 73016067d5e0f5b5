use crate::device::FanSpeed;

// Label of a raw fan register value, bytes the firmware
// does not define render as "ERR"
pub fn format_fan_speed_label(code: u8) -> &'static str {
    FanSpeed::from_code(code).map_or("ERR", FanSpeed::label)
}

pub fn format_fan_status(code: u8) -> String {
    format!("Fan:{}", format_fan_speed_label(code))
}

// Rounds to one decimal on the exact binary value, like printf("%.1f")
pub fn format_temperature_label(celsius: f64) -> String {
    format!("Temp:{celsius:.1}C")
}

pub fn format_load_average(load: f64) -> String {
    format!("LA:{load:.2}")
}

// The value is the free share of RAM even though the label reads "RAM"
pub fn format_ram_usage(free_percent: f64) -> String {
    format!("RAM:{free_percent:.2}%")
}

pub fn format_disk_usage(free_percent: f64) -> String {
    format!("HDD:{free_percent:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_labels() {
        assert_eq!(format_fan_speed_label(FanSpeed::Off.code()), "OFF");
        assert_eq!(format_fan_speed_label(FanSpeed::Max.code()), "MAX");
        assert_eq!(format_fan_speed_label(FanSpeed::P20.code()), "20%");
        assert_eq!(format_fan_speed_label(FanSpeed::P90.code()), "90%");

        for speed in FanSpeed::ALL {
            assert_eq!(format_fan_speed_label(speed.code()), speed.label());
        }
    }

    #[test]
    fn unknown_fan_code_is_err() {
        assert_eq!(format_fan_speed_label(0x0a), "ERR");
        assert_eq!(format_fan_speed_label(0xff), "ERR");
        assert_eq!(format_fan_status(0x42), "Fan:ERR");
        assert_eq!(format_fan_status(0x01), "Fan:MAX");
    }

    #[test]
    fn temperature_rounding() {
        // 23.45 is stored as 23.4499.. so it rounds down
        assert_eq!(format_temperature_label(23.45), "Temp:23.4C");
        assert_eq!(format_temperature_label(23.44), "Temp:23.4C");
        assert_eq!(format_temperature_label(23.46), "Temp:23.5C");
        assert_eq!(format_temperature_label(0.0), "Temp:0.0C");
    }

    #[test]
    fn percentage_labels() {
        assert_eq!(format_load_average(0.5), "LA:0.50");
        assert_eq!(format_ram_usage(25.0), "RAM:25.00%");
        assert_eq!(format_disk_usage(12.3456), "HDD:12.35%");
    }
}
