use anyhow::{Context, Result};
use coolhatd::{
    arg_parser::ArgsOptions,
    config::Config,
    fan_manager::{FanManager, FanMessage},
    logger,
    setup, telemetry::TelemetrySnapshot,
};
use tokio::{
    select,
    signal::{
        ctrl_c,
        unix::{SignalKind, signal},
    },
    sync::mpsc,
};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logging();

    // Parse the command line arguments
    let args_options = ArgsOptions::parse();

    if args_options.once {
        let config = Config::load(&args_options.config_file_path)?;
        let snapshot = TelemetrySnapshot::collect(&config.thermal_path);

        println!("{}", serde_json::to_string_pretty(&snapshot)?);

        return Ok(());
    }

    let (config, controller) = setup(&args_options.config_file_path)
        .with_context(|| "Failed to start the daemon")?;

    if controller.is_none() {
        info!("Cooling HAT unavailable, only telemetry will be collected");
    }

    // This token and tracker will be used to handle graceful shutdown
    let tracker = TaskTracker::new();
    let token = CancellationToken::new();

    // Errors of the running tasks are logged from here
    let (tx_err, mut rx_err) = mpsc::channel(16);

    // Start the fan manager, it owns the device for the rest of the run
    let (tx_fan_manager, rx_fan_manager) = mpsc::channel(16);
    {
        let token = token.clone();
        let tx_err = tx_err.clone();
        let mut fan_manager = FanManager::new(controller, &config);

        tracker.spawn(async move {
            fan_manager.run(token, rx_fan_manager, tx_err).await;
        });
    }

    let mut terminate = signal(SignalKind::terminate())
        .with_context(|| "Failed to install the SIGTERM handler")?;
    let mut hangup = signal(SignalKind::hangup())
        .with_context(|| "Failed to install the SIGHUP handler")?;

    loop {
        select! {
            _ = ctrl_c() => { break; },
            _ = terminate.recv() => { break; },
            _ = hangup.recv() => {
                // The bus settings only apply on restart
                match Config::load(&args_options.config_file_path) {
                    Ok(new_config) => {
                        info!("Reloading the configuration");

                        if new_config.bus_path != config.bus_path
                            || new_config.device_address != config.device_address
                        {
                            warn!("I2C bus changes need a restart to take effect");
                        }

                        for message in FanMessage::from_config(&new_config) {
                            if tx_fan_manager.send(message).await.is_err() {
                                error!("Fan manager is not running");
                                break;
                            }
                        }
                    }
                    Err(err) => {
                        error!("Keeping the current configuration: {err}");
                        if let Some(source) = std::error::Error::source(&err) {
                            error!("{source}");
                        }
                    }
                }
            },
            err_msg = rx_err.recv() => {
                if let Some(err) = err_msg {
                    for e in err.chain() {
                        error!("{e}");
                    }
                }
            }
        }
    }

    // Cancel the token to communicate the program
    // termination to the running tasks
    token.cancel();

    // Wait for the tasks to finish
    tracker.close();
    tracker.wait().await;

    // Report what went wrong during shutdown
    while let Ok(err) = rx_err.try_recv() {
        for e in err.chain() {
            error!("{e}");
        }
    }

    Ok(())
}
