//! Monogram viewer.
//!
//! Usage: `monogram [config.json]`
//!
//! Without a config file the defaults are used. Set `RUST_LOG=debug` to
//! follow population and rotation.

use std::env;
use std::process::ExitCode;

use monogram::{window, MonogramConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::args().nth(1) {
        Some(path) => match MonogramConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Could not load {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => MonogramConfig::default(),
    };

    match window::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
