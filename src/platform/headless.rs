// Headless platform - used on targets without a Win32 windowing subsystem
//
// Process discovery finds nothing, so UiThreadManager::initialize() fails with
// HostError::NotFound. Window and input calls are accepted and reported as failed.

use super::{
    HostPlatform, MouseButtonEvent, ProcessInfo, ShowState, WindowHandle, WindowStateSnapshot,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessPlatform;

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl HostPlatform for HeadlessPlatform {
    fn find_processes(&self, name: &str) -> Vec<ProcessInfo> {
        tracing::debug!("Headless platform: no process lookup for {}", name);
        Vec::new()
    }

    fn set_parent(&self, _child: WindowHandle, _parent: WindowHandle) -> bool {
        false
    }

    fn set_enabled(&self, _window: WindowHandle, _enabled: bool) -> bool {
        false
    }

    fn window_state(&self, _window: WindowHandle) -> WindowStateSnapshot {
        WindowStateSnapshot::default()
    }

    fn show(&self, _window: WindowHandle, _state: ShowState) -> bool {
        false
    }

    fn set_topmost(&self, _window: WindowHandle, _topmost: bool) -> bool {
        false
    }

    fn focus(&self, _window: WindowHandle) -> bool {
        false
    }

    fn set_cursor_pos(&self, _x: i32, _y: i32) -> bool {
        false
    }

    fn send_mouse_button(&self, _event: MouseButtonEvent) -> bool {
        false
    }

    fn enter_ui_thread(&self) -> bool {
        true
    }

    fn leave_ui_thread(&self) {}

    fn pump_messages(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_finds_no_host() {
        let platform = HeadlessPlatform::new();
        assert!(platform.find_processes("iikoFront.Net").is_empty());
    }

    #[test]
    fn test_headless_window_calls_report_failure() {
        let platform = HeadlessPlatform::new();
        let window = WindowHandle(0x10);
        assert!(!platform.set_enabled(window, false));
        assert!(!platform.set_parent(window, WindowHandle(0x20)));
        assert!(!platform.set_cursor_pos(1, 2));
        assert_eq!(platform.window_state(window), WindowStateSnapshot::default());
    }
}
