mod common;

use common::RecordingBus;
use coolhatd::device::{DeviceController, FanSpeed, Register, Rgb};

#[test]
fn every_register_write_is_one_two_byte_transaction() {
    let bus = RecordingBus::default();
    let mut controller = DeviceController::new(bus.clone());

    for (i, register) in Register::ALL.into_iter().enumerate() {
        controller.write_register(register, i as u8 * 10).unwrap();
    }

    assert_eq!(
        bus.transactions(),
        vec![
            vec![0x00, 0],
            vec![0x01, 10],
            vec![0x02, 20],
            vec![0x04, 30],
            vec![0x07, 40],
            vec![0x08, 50],
        ]
    );
}

#[test]
fn typed_helpers_write_one_byte_per_register() {
    let bus = RecordingBus::default();
    let mut controller = DeviceController::new(bus.clone());

    controller.set_color(Rgb::new(255, 128, 0)).unwrap();
    controller.set_fan_speed(FanSpeed::P60).unwrap();

    assert_eq!(
        bus.transactions(),
        vec![vec![0x00, 255], vec![0x01, 128], vec![0x02, 0], vec![0x08, 0x06]]
    );
}
