//! front-dialogs-check - checks that the dialog helper can attach to a running iikoFront.
//!
//! Usage: `front-dialogs-check [config-dir]` (default: current directory)
//!
//! 1. Load `FrontDialogs.yaml` from the config directory (defaults if absent)
//! 2. Initialize logging from its `logging` section, then report a missing config file
//! 3. Resolve the host process and start the dedicated UI thread
//! 4. Report the host window, then shut the UI thread down
//!
//! Exits non-zero when the host cannot be found or the UI thread does not start.

use anyhow::{Context, Result};
use front_dialogs::{APP_NAME, ConfigManager, UiThreadManager, VERSION, default_platform};
use std::sync::Arc;

fn main() -> Result<()> {
    let config_dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());

    let config_manager = ConfigManager::new(&config_dir)?;
    // Logging is configured by the file, so a missing file can only be reported afterwards
    let config_missing = !config_manager.config_exists();
    let config = config_manager.load()?;

    // Keep the guard alive until exit so buffered log lines are flushed
    let _log_guard = front_dialogs::logging::setup_from_settings(&config.logging)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    if config_missing {
        tracing::warn!(
            "Config file not found at {}, using defaults",
            config_manager.config_path()
        );
    }
    tracing::info!("Configuration: {}", config_manager.config_path());
    tracing::info!("Host process names: {:?}", config.host.process_names);

    let manager = Arc::new(UiThreadManager::new(default_platform(), config));

    let result = manager.initialize().context("Failed to attach to host application");
    match &result {
        Ok(()) => {
            if let Some(host) = manager.host_window() {
                tracing::info!(
                    "Host {} (pid {}) main window {}",
                    host.process_name,
                    host.pid,
                    host.handle
                );
            }
        }
        Err(e) => tracing::error!("{:#}", e),
    }

    manager.shutdown();
    tracing::info!("Host check finished");

    result
}
