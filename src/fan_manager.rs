use core::fmt;
use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, anyhow};
use tokio::{
    select,
    sync::mpsc::{Receiver, Sender},
};
use tokio_util::sync::CancellationToken;

use tracing::{debug, error, info, trace, trace_span, warn};

use crate::{
    config::{Config, RgbConfig},
    device::{DeviceController, FanSpeed, RegisterBus},
    fan_curve::FanCurve,
    telemetry::{TelemetrySnapshot, format_fan_status},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    // Follow the fan curve
    Curve,
    // Keep the fan at the given level
    Fixed(FanSpeed),
}

impl FanMode {
    fn from_config(config: &Config) -> Self {
        match config.fixed_fan_speed() {
            Some(speed) => FanMode::Fixed(speed),
            None => FanMode::Curve,
        }
    }
}

pub enum FanMessage {
    SetMode { mode: FanMode },
    UpdateCurve { new_curve: Box<dyn FanCurve + Send> },
    UpdateInterval { new_duration: Duration },
    SetRgb { rgb: RgbConfig },
}

impl FanMessage {
    // Messages applying a reloaded configuration to a running manager.
    // The mode comes last so the new curve is already in place when it
    // triggers an update.
    pub fn from_config(config: &Config) -> Vec<FanMessage> {
        vec![
            FanMessage::UpdateCurve {
                new_curve: Box::new(config.fan_curve.build()),
            },
            FanMessage::UpdateInterval {
                new_duration: config.update_interval(),
            },
            FanMessage::SetRgb {
                rgb: config.rgb.clone(),
            },
            FanMessage::SetMode {
                mode: FanMode::from_config(config),
            },
        ]
    }
}

// Polls the SoC temperature and drives the HAT fan. The manager is the
// only owner of the device controller so every bus write happens on the
// task running it.
pub struct FanManager<B: RegisterBus> {
    // None when the HAT could not be opened, telemetry is still logged
    controller: Option<DeviceController<B>>,

    thermal_path: PathBuf,
    // Time between two temperature readings
    update_interval: Duration,

    mode: FanMode,
    curve: Box<dyn FanCurve + Send>,

    // Last level written to the fan register
    current_speed: Option<FanSpeed>,
    // Level written before quitting
    shutdown_speed: FanSpeed,

    rgb: RgbConfig,
}

impl<B: RegisterBus> FanManager<B> {
    pub fn new(controller: Option<DeviceController<B>>, config: &Config) -> Self {
        Self {
            controller,

            thermal_path: config.thermal_path.clone(),
            update_interval: config.update_interval(),

            mode: FanMode::from_config(config),
            curve: Box::new(config.fan_curve.build()),

            current_speed: None,
            shutdown_speed: config.shutdown_fan_speed(),

            rgb: config.rgb.clone(),
        }
    }

    // Run the fan manager
    pub async fn run(
        &mut self,
        run_token: CancellationToken,
        mut rx_cmd: Receiver<FanMessage>,
        tx_err: Sender<anyhow::Error>,
    ) {
        info!("Fan manager: Running");

        report(&tx_err, self.apply_rgb()).await;
        report(&tx_err, self.update()).await;

        let mut channel_open = true;

        loop {
            select! {
                _ = run_token.cancelled() => {
                    info!("Fan manager: Quiting");

                    report(&tx_err, self.cleanup()).await;

                    break;
                },
                message = rx_cmd.recv(), if channel_open => {
                    match message {
                        Some(message) => {
                            let result = trace_span!("message parsing")
                                .in_scope(|| {
                                    trace!("Parsing message: {:?}", message);

                                    self.parse_msg(message)
                                });

                            report(&tx_err, result).await;
                        }
                        None => {
                            debug!("Fan manager: command channel closed");

                            channel_open = false;
                        }
                    }
                },
                _ = tokio::time::sleep(self.update_interval) => {
                    let result = trace_span!("updating").in_scope(|| self.update());

                    report(&tx_err, result).await;
                }
            }
        }
    }

    // Parse the received message and apply the needed changes
    fn parse_msg(&mut self, message: FanMessage) -> Result<()> {
        match message {
            FanMessage::SetMode { mode } => {
                self.mode = mode;

                // Apply the new mode right away
                self.update()?;
            }
            FanMessage::UpdateCurve { new_curve } => {
                if new_curve.points_num() == 0 {
                    warn!("New fan curve has no points, the fan will run at full speed");
                }

                self.curve = new_curve;
            }
            FanMessage::UpdateInterval { new_duration } => {
                if new_duration.is_zero() {
                    return Err(anyhow!("Fan manager update interval can't be zero"));
                }

                trace!("New FanManager update interval: {:?}", new_duration);

                self.update_interval = new_duration;
            }
            FanMessage::SetRgb { rgb } => {
                self.rgb = rgb;

                self.apply_rgb()?;
            }
        }

        Ok(())
    }

    // Read the telemetry and set the fan speed as needed
    fn update(&mut self) -> Result<()> {
        let snapshot = TelemetrySnapshot::collect(&self.thermal_path);

        let speed = self.target_speed(snapshot.temperature);

        self.apply_speed(speed)?;

        let mut lines = snapshot.display_lines();
        if let Some(current) = self.current_speed {
            lines.push(format_fan_status(current.code()));
        }

        debug!("{}", lines.join(" "));

        Ok(())
    }

    fn target_speed(&self, temperature: Option<f64>) -> FanSpeed {
        match self.mode {
            FanMode::Fixed(speed) => speed,
            FanMode::Curve => match temperature {
                Some(temp) => {
                    let percent = self.curve.get_speed(temp.round() as i32);

                    trace!("Temperature: {temp}°C - curve speed: {percent}%");

                    FanSpeed::from_percent(percent)
                }
                None => {
                    warn!("Temperature unavailable, running the fan at full speed");

                    FanSpeed::Max
                }
            },
        }
    }

    // Write the fan register only when the level changes
    fn apply_speed(&mut self, speed: FanSpeed) -> Result<()> {
        let Some(controller) = self.controller.as_mut() else {
            trace!("No device, skipping fan speed {speed}");
            return Ok(());
        };

        if self.current_speed == Some(speed) {
            return Ok(());
        }

        controller
            .set_fan_speed(speed)
            .with_context(|| format!("Failed to set fan speed to {speed}"))?;

        info!("Fan speed set to {speed}");

        self.current_speed = Some(speed);

        Ok(())
    }

    fn apply_rgb(&mut self) -> Result<()> {
        let RgbConfig {
            enabled,
            color,
            effect,
        } = self.rgb;

        let Some(controller) = self.controller.as_mut() else {
            return Ok(());
        };

        controller
            .set_rgb_enabled(enabled)
            .with_context(|| "Failed to switch the LEDs")?;

        if enabled {
            controller
                .set_color(color)
                .with_context(|| "Failed to set the LED color")?;
            controller
                .set_rgb_effect(effect)
                .with_context(|| "Failed to set the LED effect")?;
        }

        Ok(())
    }

    // Leave the fan at the shutdown level before quitting
    fn cleanup(&mut self) -> Result<()> {
        let Some(controller) = self.controller.as_mut() else {
            return Ok(());
        };

        trace!("Setting shutdown fan speed {}", self.shutdown_speed);

        controller
            .set_fan_speed(self.shutdown_speed)
            .with_context(|| "Failed to set the shutdown fan speed")?;

        self.current_speed = Some(self.shutdown_speed);

        Ok(())
    }

    pub fn mode(&self) -> FanMode {
        self.mode
    }

    pub fn current_speed(&self) -> Option<FanSpeed> {
        self.current_speed
    }
}

// Forward a failed step to the error channel
async fn report(tx_err: &Sender<anyhow::Error>, result: Result<()>) {
    if let Err(err) = result {
        tx_err.send(err).await.unwrap_or_else(|err| {
            error!("Fan manager: Couldn't send error to channel: {err}")
        });
    }
}

impl fmt::Debug for FanMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        #[allow(dead_code)]
        #[derive(Debug)]
        enum FanMessage<'a> {
            SetMode { mode: &'a FanMode },
            UpdateCurve { points: usize },
            UpdateInterval { new_duration: &'a Duration },
            SetRgb { rgb: &'a RgbConfig },
        }

        let msg = match self {
            Self::SetMode { mode } => FanMessage::SetMode { mode },
            Self::UpdateCurve { new_curve } => FanMessage::UpdateCurve {
                points: new_curve.points_num(),
            },
            Self::UpdateInterval { new_duration } => {
                FanMessage::UpdateInterval { new_duration }
            }
            Self::SetRgb { rgb } => FanMessage::SetRgb { rgb },
        };

        fmt::Debug::fmt(&msg, f)
    }
}
