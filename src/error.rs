//! Error types for host discovery, UI-thread dispatch and the dialog pipeline.
//!
//! Only [`HostError`] ever reaches a caller as an `Err`. [`DialogError`] is carried inside
//! [`DialogOutcome::Failed`](crate::dialog::DialogOutcome::Failed) and turned into "no result"
//! by [`DialogInvoker::show_dialog`](crate::dialog::DialogInvoker::show_dialog).

use std::any::Any;
use thiserror::Error;

/// Initialization failures of the UI thread manager.
///
/// Host resolution is not retried; the caller decides whether to try again later.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Host process not found (tried: {})", names.join(", "))]
    NotFound { names: Vec<String> },

    #[error("Host process {name} is ambiguous: {count} running instances")]
    Ambiguous { name: String, count: usize },

    #[error("Host process {name} (pid {pid}) has no main window")]
    NoMainWindow { name: String, pid: u32 },

    #[error("Failed to spawn UI thread: {0}")]
    UiThreadSpawn(#[from] std::io::Error),

    #[error("UI thread exited before signalling startup")]
    UiThreadStartup,
}

/// Failures of marshaling work onto the UI thread.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("UI thread is not running")]
    Stopped,

    #[error("UI work item panicked: {0}")]
    Panicked(String),
}

/// Failures inside the dialog pipeline (construction, argument injection, display).
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("Failed to construct dialog {dialog}: {source}")]
    Construction {
        dialog: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Dialog {dialog} rejected its arguments: {source}")]
    Arguments {
        dialog: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to show dialog {dialog}: {source}")]
    Display {
        dialog: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Dialog {dialog} panicked: {message}")]
    Panicked { dialog: String, message: String },

    #[error("Dispatch to UI thread failed: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Render a caught panic payload for logs and error values.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
