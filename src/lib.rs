// front-dialogs - dialog helpers for iikoFront plugins
//
// This is the library crate a plugin links against. The binary crate (main.rs) is a small tool
// that checks host discovery and UI thread startup on a live terminal.

pub mod config;
pub mod dialog;
pub mod error;
pub mod host;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod platform;
pub mod pointer;
pub mod suspend;
pub mod ui_thread;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use dialog::{
    ArgumentSink, CloseSignal, Dialog, DialogArgs, DialogInvoker, DialogOutcome, DialogValue,
    NoResultReason, PendingDialog, ResultSource,
};
pub use error::{DialogError, DispatchError, HostError};
pub use host::HostWindow;
pub use models::HelperConfig;
pub use platform::{HostPlatform, WindowHandle, default_platform};
pub use pointer::click_at;
pub use suspend::{InputSuspension, with_suspended_input};
pub use ui_thread::UiThreadManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
