// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Jackhook - turns audio port hot-plug events into actions.
//!
//! Connects to PulseAudio, watches card changes and, when a bound port (for
//! example the headphone jack) becomes available or not available, either
//! prints a status line or presses a configured key on the X display.

mod actions;
mod audio;
mod config;
mod hotplug;
mod input;
mod monitor;

use actions::key::KeySink;
use actions::log::LogSink;
use actions::ActionSink;
use audio::{ExitOutcome, PulseSession};
use config::{ActionMode, Config, ConfigManager};
use hotplug::Dispatcher;
use input::x11::X11Keyboard;
use monitor::Monitor;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jackhook=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(outcome) => {
            info!("Jackhook stopped: {}", outcome);
            ExitCode::from(outcome.code)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitOutcome, Box<dyn std::error::Error>> {
    let config = ConfigManager::new()?.load()?;
    let bindings = config.bindings()?;

    if bindings.is_empty() {
        warn!("No ports configured, nothing will be dispatched");
    }

    // The display is opened before connecting so a missing X server fails fast.
    let sink = build_sink(&config)?;

    info!(
        "Watching {} port(s) [{}] with {} action",
        bindings.len(),
        bindings.port_names().collect::<Vec<_>>().join(", "),
        sink.name()
    );

    let mut monitor = Monitor::new(bindings, Dispatcher::new(sink));

    let mut session = PulseSession::new(&config.client_name)?;
    session.connect(config.server.as_deref())?;
    let outcome = session.run(&mut monitor)?;
    Ok(outcome)
}

fn build_sink(config: &Config) -> Result<Box<dyn ActionSink>, Box<dyn std::error::Error>> {
    let sink: Box<dyn ActionSink> = match config.mode {
        ActionMode::Log => Box::new(LogSink::stderr()),
        ActionMode::Key => {
            let keyboard = X11Keyboard::open(config.display.as_deref())?;
            Box::new(KeySink::new(keyboard))
        }
    };
    Ok(sink)
}
