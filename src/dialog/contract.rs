//! The contract between the invoker and plugin-supplied dialog types.
//!
//! Dialog types are written by downstream plugin code; this crate only knows them through
//! [`Dialog`]. Argument and result exchange are optional capabilities: a dialog opts in by
//! returning `Some` from [`Dialog::argument_sink`] or [`Dialog::result_source`]. A dialog that
//! opts out still opens; the invoker logs a warning and degrades (no arguments passed, no result
//! returned).
//!
//! Payloads are type-erased ([`DialogArgs`], [`DialogValue`]) because their concrete types are
//! agreed between the caller and the dialog, not with this crate. The invoker downcasts results
//! to the type the caller asked for.
//!
//! # Example
//!
//! ```ignore
//! struct OrderDialog { window: NativeWindow, order_id: Option<u32>, result: Option<String> }
//!
//! impl Dialog for OrderDialog {
//!     fn create() -> anyhow::Result<Self> {
//!         Ok(Self { window: NativeWindow::new()?, order_id: None, result: None })
//!     }
//!     fn window(&self) -> Option<WindowHandle> { Some(self.window.handle()) }
//!     fn show_modal(&mut self) -> anyhow::Result<()> { self.window.run_modal() }
//!     fn argument_sink(&mut self) -> Option<&mut dyn ArgumentSink> { Some(self) }
//!     fn result_source(&mut self) -> Option<&mut dyn ResultSource> { Some(self) }
//! }
//! ```

use crate::platform::WindowHandle;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Type-erased argument payload handed to a dialog
pub type DialogArgs = Box<dyn Any + Send>;

/// Type-erased result value read from a closed dialog
pub type DialogValue = Box<dyn Any + Send>;

/// A dialog window that can be opened on the UI thread.
///
/// Every method is called on the UI thread; implementations need not be `Send`.
pub trait Dialog: 'static {
    /// Construct a new, not yet shown, instance.
    fn create() -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Name used in log entries.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Native window handle, once the window exists.
    fn window(&self) -> Option<WindowHandle>;

    /// Show modally; returns only when the dialog has closed.
    fn show_modal(&mut self) -> anyhow::Result<()>;

    /// Show without blocking; the dialog must fire `closed` when it closes.
    ///
    /// The default falls back to a modal show followed by the signal.
    fn show_modeless(&mut self, closed: CloseSignal) -> anyhow::Result<()> {
        let result = self.show_modal();
        closed.fire();
        result
    }

    /// Argument capability; `None` means the dialog takes no arguments.
    fn argument_sink(&mut self) -> Option<&mut dyn ArgumentSink> {
        None
    }

    /// Result capability; `None` means the dialog produces no result.
    fn result_source(&mut self) -> Option<&mut dyn ResultSource> {
        None
    }
}

/// Receives the caller's argument payload before the dialog is shown.
pub trait ArgumentSink {
    /// `args` is `None` when the caller supplied no arguments.
    fn set_arguments(&mut self, args: Option<DialogArgs>) -> anyhow::Result<()>;
}

/// Hands out the dialog's result after it has closed.
pub trait ResultSource {
    /// `None` means the dialog closed without setting a result.
    fn take_result(&mut self) -> Option<DialogValue>;
}

/// Downcast an argument payload to the type agreed with the caller.
pub fn downcast_args<T: 'static>(args: Option<DialogArgs>) -> Option<T> {
    args.and_then(|a| a.downcast::<T>().ok()).map(|b| *b)
}

/// Per-invocation completion marker, fired once when the dialog closes.
///
/// Cloneable and `Send`, so a dialog may fire it from any thread. Firing more than once is
/// harmless; only the first call runs the close callback.
#[derive(Clone)]
pub struct CloseSignal {
    inner: Arc<CloseInner>,
}

type CloseCallback = Box<dyn FnOnce() + Send + 'static>;

struct CloseInner {
    closed: AtomicBool,
    on_close: Mutex<Option<CloseCallback>>,
}

impl CloseSignal {
    pub fn new() -> Self {
        Self::with_callback(None)
    }

    pub(crate) fn with_callback(on_close: Option<CloseCallback>) -> Self {
        Self {
            inner: Arc::new(CloseInner {
                closed: AtomicBool::new(false),
                on_close: Mutex::new(on_close),
            }),
        }
    }

    /// Mark the dialog as closed.
    pub fn fire(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let callback = self
            .inner
            .on_close
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl Default for CloseSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CloseSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseSignal")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// `my_plugin::dialogs::OrderDialog` -> `OrderDialog`
pub(crate) fn short_type_name(full: &str) -> &str {
    // Generic arguments may contain `::` too; only look before the first `<`
    let base_end = full.find('<').unwrap_or(full.len());
    let start = full[..base_end].rfind("::").map(|i| i + 2).unwrap_or(0);
    &full[start..]
}
