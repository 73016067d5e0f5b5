use std::path::PathBuf;

use argparse::{ArgumentParser, Print, Store, StoreTrue};

use crate::config::DEFAULT_CONFIG_PATH;

pub struct ArgsOptions {
    pub config_file_path: PathBuf,

    // Print a single telemetry snapshot and exit
    pub once: bool,
}

impl ArgsOptions {
    pub fn parse() -> Self {
        let mut options = ArgsOptions::default();

        {
            let mut parser = ArgumentParser::new();
            parser.set_description("Fan and RGB controller for the I2C cooling HAT");

            // Configuration file path
            parser.refer(&mut options.config_file_path).add_option(
                &["-c", "--config"],
                Store,
                "The file path of the configuration file",
            );

            parser.refer(&mut options.once).add_option(
                &["--once"],
                StoreTrue,
                "Print the current telemetry as JSON and exit",
            );

            // Show daemon version
            parser.add_option(
                &["-V", "--version"],
                Print(env!("CARGO_PKG_VERSION").to_string()),
                "Show the daemon version",
            );

            parser.parse_args_or_exit();
        }

        options
    }
}

impl Default for ArgsOptions {
    fn default() -> Self {
        Self {
            config_file_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            once: false,
        }
    }
}
