//! Input suspension - get a dialog out of the way while something else takes input.
//!
//! A typical use is a dialog that has to let the cashier interact with the host application
//! (scan a card, pick an item) before continuing: the dialog is minimized, the operation runs,
//! and the dialog comes back on top with keyboard focus.
//!
//! ```ignore
//! let card: Option<Card> = with_suspended_input(platform.as_ref(), dialog_window, || {
//!     read_card_from_host()
//! });
//! ```

use crate::error::panic_message;
use crate::platform::{HostPlatform, ShowState, WindowHandle, WindowStateSnapshot};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Scoped suspension of a window.
///
/// Creating it minimizes the window and clears "always on top"; dropping it restores the window
/// to normal state, topmost, enabled and focused. Restoration happens on every exit path,
/// including panic unwinding.
pub struct InputSuspension<'a> {
    platform: &'a dyn HostPlatform,
    window: WindowHandle,
    before: WindowStateSnapshot,
}

impl<'a> InputSuspension<'a> {
    pub fn begin(platform: &'a dyn HostPlatform, window: WindowHandle) -> Self {
        let before = platform.window_state(window);
        tracing::debug!("Suspending input for window {} ({:?})", window, before);

        if !platform.show(window, ShowState::Minimized) {
            tracing::debug!("Could not minimize window {}", window);
        }
        if before.topmost && !platform.set_topmost(window, false) {
            tracing::debug!("Could not clear topmost on window {}", window);
        }

        Self {
            platform,
            window,
            before,
        }
    }

    /// State of the window captured before it was minimized
    pub fn state_before(&self) -> WindowStateSnapshot {
        self.before
    }
}

impl Drop for InputSuspension<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!(
                "Operation panicked while window {} was suspended; restoring",
                self.window
            );
        }

        let restored = self.platform.show(self.window, ShowState::Normal);
        let topmost = self.platform.set_topmost(self.window, true);
        let enabled = self.platform.set_enabled(self.window, true);
        let focused = self.platform.focus(self.window);

        if !(restored && topmost && enabled && focused) {
            tracing::debug!(
                "Window {} restore incomplete: normal={}, topmost={}, enabled={}, focused={}",
                self.window,
                restored,
                topmost,
                enabled,
                focused
            );
        } else {
            tracing::debug!("Window {} restored", self.window);
        }
    }
}

/// Run `operation` while `window` is minimized, then restore the window.
///
/// A panic in `operation` does not reach the caller: it is logged at error level, the window
/// is restored and `R::default()` is returned. With `R = ()` this is the no-result variant.
///
/// A null window logs a warning and returns `R::default()` without running `operation`.
pub fn with_suspended_input<R: Default>(
    platform: &dyn HostPlatform,
    window: WindowHandle,
    operation: impl FnOnce() -> R,
) -> R {
    if window.is_null() {
        tracing::warn!("No window to suspend; operation skipped");
        return R::default();
    }

    let _suspension = InputSuspension::begin(platform, window);
    match catch_unwind(AssertUnwindSafe(operation)) {
        Ok(value) => value,
        Err(payload) => {
            tracing::error!("Error handling input: {}", panic_message(payload.as_ref()));
            R::default()
        }
    }
}
