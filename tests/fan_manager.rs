mod common;

use std::time::Duration;

use common::RecordingBus;
use coolhatd::{
    config::Config,
    device::{DeviceController, FanSpeed, Register},
    fan_manager::{FanManager, FanMessage, FanMode},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn config(dir: &tempfile::TempDir, millidegrees: &str) -> Config {
    let thermal_path = dir.path().join("temp");
    std::fs::write(&thermal_path, millidegrees).unwrap();

    Config {
        thermal_path,
        update_interval_ms: 10,
        shutdown_fan_speed: 100,
        ..Config::default()
    }
}

#[tokio::test]
async fn run_drives_fan_until_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir, "65000\n");

    let bus = RecordingBus::default();
    let mut manager = FanManager::new(Some(DeviceController::new(bus.clone())), &config);

    let token = CancellationToken::new();
    let (tx_cmd, rx_cmd) = mpsc::channel(4);
    let (tx_err, mut rx_err) = mpsc::channel(4);

    let handle = {
        let token = token.clone();
        tokio::spawn(async move {
            manager.run(token, rx_cmd, tx_err).await;
            manager
        })
    };

    tx_cmd
        .send(FanMessage::SetMode {
            mode: FanMode::Fixed(FanSpeed::P20),
        })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();

    let manager = handle.await.unwrap();
    assert!(rx_err.try_recv().is_err());

    // 65°C is 90% on the default curve, then the fixed level,
    // then the shutdown level
    assert_eq!(
        bus.writes_to(Register::Fan),
        vec![FanSpeed::P90.code(), FanSpeed::P20.code(), FanSpeed::Max.code()]
    );
    assert_eq!(manager.current_speed(), Some(FanSpeed::Max));
    assert!(bus.transactions().iter().all(|tx| tx.len() == 2));
}

#[tokio::test]
async fn reloaded_config_reaches_running_manager() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir, "65000\n");

    let bus = RecordingBus::default();
    let mut manager = FanManager::new(Some(DeviceController::new(bus.clone())), &config);

    let token = CancellationToken::new();
    let (tx_cmd, rx_cmd) = mpsc::channel(8);
    let (tx_err, mut rx_err) = mpsc::channel(4);

    let handle = {
        let token = token.clone();
        tokio::spawn(async move {
            manager.run(token, rx_cmd, tx_err).await;
            manager
        })
    };

    let reloaded = Config {
        fixed_fan_speed: Some(30),
        ..config.clone()
    };
    for message in FanMessage::from_config(&reloaded) {
        tx_cmd.send(message).await.unwrap();
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();

    let manager = handle.await.unwrap();
    assert!(rx_err.try_recv().is_err());

    assert_eq!(manager.mode(), FanMode::Fixed(FanSpeed::P30));
    assert_eq!(
        bus.writes_to(Register::Fan),
        vec![FanSpeed::P90.code(), FanSpeed::P30.code(), FanSpeed::Max.code()]
    );
}
