//! Data models for the helper configuration.
//!
//! - [`HelperConfig`]: root of `FrontDialogs.yaml`
//! - [`HostSettings`]: host process names, primary first
//! - [`UiThreadSettings`]: name and idle wait bound of the dedicated UI thread
//! - [`LoggingSettings`]: log directory, file prefix, verbosity
//!
//! All structs derive `Serialize`/`Deserialize` and default every field, so they can be loaded
//! by [`ConfigManager`](crate::config::ConfigManager) from partial files.

pub mod config;

pub use config::{
    DEFAULT_HOST_PROCESS, FALLBACK_HOST_PROCESS, HelperConfig, HostSettings, LoggingSettings,
    UiThreadSettings,
};
