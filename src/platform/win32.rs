// Win32 platform - user32/toolhelp calls behind HostPlatform
//
// Every call here is a thin pass-through. Failures are logged at debug level and reported as
// `false`; nothing in this file returns an error or panics.

use super::{
    HostPlatform, MouseButtonEvent, ProcessInfo, ShowState, WindowHandle, WindowStateSnapshot,
};
use crate::host::process_name_matches;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use windows::Win32::Foundation::{CloseHandle, GetLastError, HWND, LPARAM, WAIT_FAILED, WPARAM};
use windows::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx, CoUninitialize};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
    TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    EnableWindow, INPUT, INPUT_0, INPUT_MOUSE, IsWindowEnabled, MOUSE_EVENT_FLAGS,
    MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEINPUT, SendInput, SetFocus,
};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, EnumWindows, GW_OWNER, GWL_EXSTYLE, GetWindow, GetWindowLongPtrW,
    GetWindowThreadProcessId, HWND_NOTOPMOST, HWND_TOPMOST, IsIconic, IsWindowVisible, MSG,
    MWMO_INPUTAVAILABLE, MsgWaitForMultipleObjectsEx, PM_NOREMOVE, PM_REMOVE, PeekMessageW,
    PostThreadMessageW, QS_ALLINPUT, SW_MINIMIZE, SW_RESTORE, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOSIZE, SetCursorPos, SetForegroundWindow, SetParent, SetWindowPos, ShowWindow,
    TranslateMessage, WM_APP, WM_USER, WS_EX_TOPMOST,
};
use windows::core::BOOL;

/// Thread message posted to end a pending wait; dispatching it does nothing.
const WM_WAKE: u32 = WM_APP + 0x21;

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut core::ffi::c_void)
}

/// Win32 implementation of [`HostPlatform`].
#[derive(Debug, Default)]
pub struct Win32Platform {
    /// Thread id of the running UI thread, 0 when none
    ui_thread_id: AtomicU32,
}

impl Win32Platform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot all processes and keep those whose exe name matches.
    fn snapshot_processes(&self, name: &str) -> Vec<(u32, String)> {
        let mut matches = Vec::new();

        unsafe {
            let snapshot = match CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) {
                Ok(handle) => handle,
                Err(e) => {
                    tracing::debug!("CreateToolhelp32Snapshot failed: {}", e);
                    return matches;
                }
            };

            let mut entry = PROCESSENTRY32W {
                dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
                ..Default::default()
            };

            let mut more = Process32FirstW(snapshot, &mut entry).is_ok();
            while more {
                let len = entry
                    .szExeFile
                    .iter()
                    .position(|&c| c == 0)
                    .unwrap_or(entry.szExeFile.len());
                let exe_name = String::from_utf16_lossy(&entry.szExeFile[..len]);

                if process_name_matches(&exe_name, name) {
                    matches.push((entry.th32ProcessID, exe_name));
                }

                more = Process32NextW(snapshot, &mut entry).is_ok();
            }

            let _ = CloseHandle(snapshot);
        }

        matches
    }

    /// First visible, unowned top-level window belonging to `pid`.
    fn main_window_of(&self, pid: u32) -> Option<WindowHandle> {
        struct Search {
            pid: u32,
            found: Option<WindowHandle>,
        }

        unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
            unsafe {
                let search = &mut *(lparam.0 as *mut Search);

                let mut window_pid = 0u32;
                GetWindowThreadProcessId(hwnd, Some(&mut window_pid));
                if window_pid != search.pid || !IsWindowVisible(hwnd).as_bool() {
                    return BOOL(1);
                }

                // Owned windows are popups of the main window, not the main window itself
                let owned = GetWindow(hwnd, GW_OWNER).map(|h| !h.is_invalid()).unwrap_or(false);
                if owned {
                    return BOOL(1);
                }

                search.found = Some(WindowHandle(hwnd.0 as isize));
                BOOL(0)
            }
        }

        let mut search = Search { pid, found: None };
        unsafe {
            // Stopping the enumeration early makes EnumWindows report an error; ignore it
            let _ = EnumWindows(Some(enum_callback), LPARAM(&mut search as *mut Search as isize));
        }
        search.found
    }

    fn send_mouse_input(&self, flags: MOUSE_EVENT_FLAGS) -> bool {
        let input = INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx: 0,
                    dy: 0,
                    mouseData: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };

        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        sent == 1
    }
}

impl HostPlatform for Win32Platform {
    fn find_processes(&self, name: &str) -> Vec<ProcessInfo> {
        self.snapshot_processes(name)
            .into_iter()
            .map(|(pid, exe_name)| ProcessInfo {
                pid,
                exe_name,
                main_window: self.main_window_of(pid),
            })
            .collect()
    }

    fn set_parent(&self, child: WindowHandle, parent: WindowHandle) -> bool {
        match unsafe { SetParent(hwnd(child), Some(hwnd(parent))) } {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("SetParent({}, {}) failed: {}", child, parent, e);
                false
            }
        }
    }

    fn set_enabled(&self, window: WindowHandle, enabled: bool) -> bool {
        unsafe {
            // EnableWindow returns the previous disabled state, not success
            let _ = EnableWindow(hwnd(window), enabled);
            IsWindowEnabled(hwnd(window)).as_bool() == enabled
        }
    }

    fn window_state(&self, window: WindowHandle) -> WindowStateSnapshot {
        unsafe {
            let ex_style = GetWindowLongPtrW(hwnd(window), GWL_EXSTYLE) as u32;
            WindowStateSnapshot {
                minimized: IsIconic(hwnd(window)).as_bool(),
                topmost: ex_style & WS_EX_TOPMOST.0 != 0,
                enabled: IsWindowEnabled(hwnd(window)).as_bool(),
            }
        }
    }

    fn show(&self, window: WindowHandle, state: ShowState) -> bool {
        let cmd = match state {
            ShowState::Minimized => SW_MINIMIZE,
            ShowState::Normal => SW_RESTORE,
        };
        unsafe {
            // ShowWindow returns the previous visibility; compare against the outcome instead
            let _ = ShowWindow(hwnd(window), cmd);
            IsIconic(hwnd(window)).as_bool() == (state == ShowState::Minimized)
        }
    }

    fn set_topmost(&self, window: WindowHandle, topmost: bool) -> bool {
        let insert_after = if topmost { HWND_TOPMOST } else { HWND_NOTOPMOST };
        let result = unsafe {
            SetWindowPos(
                hwnd(window),
                Some(insert_after),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            )
        };
        if let Err(e) = &result {
            tracing::debug!("SetWindowPos({}, topmost={}) failed: {}", window, topmost, e);
        }
        result.is_ok()
    }

    fn focus(&self, window: WindowHandle) -> bool {
        unsafe {
            let foreground = SetForegroundWindow(hwnd(window)).as_bool();
            let focused = SetFocus(Some(hwnd(window))).is_ok();
            foreground || focused
        }
    }

    fn set_cursor_pos(&self, x: i32, y: i32) -> bool {
        match unsafe { SetCursorPos(x, y) } {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("SetCursorPos({}, {}) failed: {}", x, y, e);
                false
            }
        }
    }

    fn send_mouse_button(&self, event: MouseButtonEvent) -> bool {
        let flags = match event {
            MouseButtonEvent::LeftDown => MOUSEEVENTF_LEFTDOWN,
            MouseButtonEvent::LeftUp => MOUSEEVENTF_LEFTUP,
        };
        self.send_mouse_input(flags)
    }

    fn enter_ui_thread(&self) -> bool {
        unsafe {
            // Create the message queue before publishing the id for PostThreadMessageW
            let mut msg = MSG::default();
            let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
            self.ui_thread_id.store(GetCurrentThreadId(), Ordering::Release);
        }

        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr.is_err() {
            tracing::warn!("CoInitializeEx(STA) failed on UI thread: {:?}", hr);
        }
        hr.is_ok()
    }

    fn leave_ui_thread(&self) {
        self.ui_thread_id.store(0, Ordering::Release);
        unsafe { CoUninitialize() };
    }

    fn pump_messages(&self) {
        unsafe {
            let mut msg = MSG::default();
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }

    fn wait_for_work(&self, timeout: Duration) -> bool {
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX - 1);
        let result = unsafe {
            MsgWaitForMultipleObjectsEx(None, millis, QS_ALLINPUT, MWMO_INPUTAVAILABLE)
        };
        if result == WAIT_FAILED {
            let error = unsafe { GetLastError() };
            tracing::debug!("MsgWaitForMultipleObjectsEx failed: {:?}", error);
        }
        true
    }

    fn wake_ui_thread(&self) {
        let thread_id = self.ui_thread_id.load(Ordering::Acquire);
        if thread_id == 0 {
            return;
        }
        if let Err(e) = unsafe { PostThreadMessageW(thread_id, WM_WAKE, WPARAM(0), LPARAM(0)) } {
            tracing::debug!("PostThreadMessageW({}) failed: {}", thread_id, e);
        }
    }
}
