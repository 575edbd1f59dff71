//! Platform layer - the seam between the dialog core and the OS windowing subsystem.
//!
//! Everything above this module talks to windows, processes and input devices only through
//! [`HostPlatform`]. This keeps the UI thread manager, the dialog invoker and the input helpers
//! testable without a desktop session:
//!
//! - [`win32::Win32Platform`]: the real implementation (Windows builds only)
//! - [`headless::HeadlessPlatform`]: finds no host and performs no window operations
//!
//! All window operations are best-effort. They report success as `bool` and never fail loudly;
//! callers log a failed call at debug level and carry on.

pub mod headless;
#[cfg(windows)]
pub mod win32;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use headless::HeadlessPlatform;
#[cfg(windows)]
pub use win32::Win32Platform;

/// Opaque platform window handle (`HWND` on Windows).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    pub const NULL: WindowHandle = WindowHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowHandle({:#x})", self.0)
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A running process matched by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    /// Executable name as reported by the OS (e.g. `iikoFront.Net.exe`)
    pub exe_name: String,
    /// Visible, unowned top-level window of the process, if it has one
    pub main_window: Option<WindowHandle>,
}

/// Window display state requested through [`HostPlatform::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowState {
    Minimized,
    Normal,
}

/// Synthetic mouse button transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonEvent {
    LeftDown,
    LeftUp,
}

/// Minimized / topmost / enabled flags of a window at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowStateSnapshot {
    pub minimized: bool,
    pub topmost: bool,
    pub enabled: bool,
}

/// Operating system services used by the dialog core.
///
/// Implementations must be callable from any thread. Methods that report `bool` return `false`
/// when the underlying call failed; none of them panic.
#[cfg_attr(test, mockall::automock)]
pub trait HostPlatform: Send + Sync {
    /// Processes whose executable name matches `name`
    /// (see [`crate::host::process_name_matches`]).
    fn find_processes(&self, name: &str) -> Vec<ProcessInfo>;

    /// Make `parent` the platform-level parent of `child`.
    fn set_parent(&self, child: WindowHandle, parent: WindowHandle) -> bool;

    /// Enable or disable mouse and keyboard input to `window`.
    fn set_enabled(&self, window: WindowHandle, enabled: bool) -> bool;

    fn window_state(&self, window: WindowHandle) -> WindowStateSnapshot;

    fn show(&self, window: WindowHandle, state: ShowState) -> bool;

    fn set_topmost(&self, window: WindowHandle, topmost: bool) -> bool;

    /// Bring `window` to the foreground and give it keyboard focus.
    fn focus(&self, window: WindowHandle) -> bool;

    fn set_cursor_pos(&self, x: i32, y: i32) -> bool;

    fn send_mouse_button(&self, event: MouseButtonEvent) -> bool;

    /// Called once on the UI thread before its loop starts (apartment setup).
    fn enter_ui_thread(&self) -> bool;

    /// Called once on the UI thread after its loop ends.
    fn leave_ui_thread(&self);

    /// Dispatch window messages already queued for the calling thread without blocking.
    fn pump_messages(&self);

    /// Block the UI thread until a window message arrives, [`wake_ui_thread`] is called, or
    /// `timeout` elapses.
    ///
    /// Returns `false` when the platform has no message queue to wait on; the UI loop then
    /// blocks on its command queue alone.
    ///
    /// [`wake_ui_thread`]: HostPlatform::wake_ui_thread
    fn wait_for_work(&self, _timeout: Duration) -> bool {
        false
    }

    /// End a pending [`wait_for_work`](HostPlatform::wait_for_work) from any thread.
    ///
    /// Called every time a command is queued for the UI thread.
    fn wake_ui_thread(&self) {}
}

/// The platform for the current build target.
pub fn default_platform() -> Arc<dyn HostPlatform> {
    #[cfg(windows)]
    {
        Arc::new(Win32Platform::new())
    }
    #[cfg(not(windows))]
    {
        Arc::new(HeadlessPlatform::new())
    }
}
