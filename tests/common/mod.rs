//! Shared fixtures for the integration tests: a recording platform, a log event counter and a
//! set of small dialogs with different capabilities.

#![allow(dead_code)]

use front_dialogs::dialog::{
    ArgumentSink, CloseSignal, Dialog, DialogArgs, DialogValue, ResultSource, downcast_args,
};
use front_dialogs::host::process_name_matches;
use front_dialogs::platform::{
    HostPlatform, MouseButtonEvent, ProcessInfo, ShowState, WindowHandle, WindowStateSnapshot,
};
use front_dialogs::{HelperConfig, UiThreadManager};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

pub const HOST_WINDOW: WindowHandle = WindowHandle(0x1000);
pub const DIALOG_WINDOW: WindowHandle = WindowHandle(0x2000);

/// Platform calls recorded by [`FakePlatform`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetParent(WindowHandle, WindowHandle),
    SetEnabled(WindowHandle, bool),
    Show(WindowHandle, ShowState),
    SetTopmost(WindowHandle, bool),
    Focus(WindowHandle),
    CursorPos(i32, i32),
    Mouse(MouseButtonEvent),
}

/// In-memory platform with a fixed process table that records every window call
#[derive(Default)]
pub struct FakePlatform {
    processes: Vec<ProcessInfo>,
    state: Mutex<WindowStateSnapshot>,
    calls: Mutex<Vec<Call>>,
    lookups: AtomicUsize,
    ui_threads_entered: AtomicUsize,
}

impl FakePlatform {
    pub fn new(processes: Vec<ProcessInfo>) -> Self {
        Self {
            processes,
            ..Default::default()
        }
    }

    /// A single running `iikoFront.Net.exe` owning [`HOST_WINDOW`]
    pub fn with_host() -> Self {
        Self::new(vec![host_process(4242, "iikoFront.Net.exe")])
    }

    pub fn set_window_state(&self, state: WindowStateSnapshot) {
        *self.state.lock().unwrap() = state;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn ui_threads_entered(&self) -> usize {
        self.ui_threads_entered.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) -> bool {
        self.calls.lock().unwrap().push(call);
        true
    }
}

impl HostPlatform for FakePlatform {
    fn find_processes(&self, name: &str) -> Vec<ProcessInfo> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.processes
            .iter()
            .filter(|p| process_name_matches(&p.exe_name, name))
            .cloned()
            .collect()
    }

    fn set_parent(&self, child: WindowHandle, parent: WindowHandle) -> bool {
        self.record(Call::SetParent(child, parent))
    }

    fn set_enabled(&self, window: WindowHandle, enabled: bool) -> bool {
        self.record(Call::SetEnabled(window, enabled))
    }

    fn window_state(&self, _window: WindowHandle) -> WindowStateSnapshot {
        *self.state.lock().unwrap()
    }

    fn show(&self, window: WindowHandle, state: ShowState) -> bool {
        self.record(Call::Show(window, state))
    }

    fn set_topmost(&self, window: WindowHandle, topmost: bool) -> bool {
        self.record(Call::SetTopmost(window, topmost))
    }

    fn focus(&self, window: WindowHandle) -> bool {
        self.record(Call::Focus(window))
    }

    fn set_cursor_pos(&self, x: i32, y: i32) -> bool {
        self.record(Call::CursorPos(x, y))
    }

    fn send_mouse_button(&self, event: MouseButtonEvent) -> bool {
        self.record(Call::Mouse(event))
    }

    fn enter_ui_thread(&self) -> bool {
        self.ui_threads_entered.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn leave_ui_thread(&self) {}

    fn pump_messages(&self) {}
}

pub fn host_process(pid: u32, exe_name: &str) -> ProcessInfo {
    ProcessInfo {
        pid,
        exe_name: exe_name.to_string(),
        main_window: Some(HOST_WINDOW),
    }
}

pub fn manager_for(platform: Arc<FakePlatform>) -> Arc<UiThreadManager> {
    Arc::new(UiThreadManager::new(platform, HelperConfig::default()))
}

/// `tracing` layer counting events of one level
#[derive(Clone)]
pub struct LevelCounter {
    level: Level,
    count: Arc<AtomicUsize>,
}

impl LevelCounter {
    pub fn warnings() -> Self {
        Self::new(Level::WARN)
    }

    pub fn errors() -> Self {
        Self::new(Level::ERROR)
    }

    fn new(level: Level) -> Self {
        Self {
            level,
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for LevelCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == self.level {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Order arguments agreed between the tests and [`OrderDialog`]
#[derive(Debug, Clone, PartialEq)]
pub struct OrderArgs {
    pub id: u32,
}

/// Takes [`OrderArgs`] and returns a comment naming the order
pub struct OrderDialog {
    order: Option<OrderArgs>,
    comment: Option<String>,
}

impl Dialog for OrderDialog {
    fn create() -> anyhow::Result<Self> {
        Ok(Self {
            order: None,
            comment: None,
        })
    }

    fn window(&self) -> Option<WindowHandle> {
        Some(DIALOG_WINDOW)
    }

    fn show_modal(&mut self) -> anyhow::Result<()> {
        self.comment = self.order.as_ref().map(|o| format!("comment for order {}", o.id));
        Ok(())
    }

    fn argument_sink(&mut self) -> Option<&mut dyn ArgumentSink> {
        Some(self)
    }

    fn result_source(&mut self) -> Option<&mut dyn ResultSource> {
        Some(self)
    }
}

impl ArgumentSink for OrderDialog {
    fn set_arguments(&mut self, args: Option<DialogArgs>) -> anyhow::Result<()> {
        self.order = downcast_args::<OrderArgs>(args);
        Ok(())
    }
}

impl ResultSource for OrderDialog {
    fn take_result(&mut self) -> Option<DialogValue> {
        self.comment.take().map(|c| Box::new(c) as DialogValue)
    }
}

/// A dialog with neither argument nor result capability
pub struct BareDialog;

impl Dialog for BareDialog {
    fn create() -> anyhow::Result<Self> {
        Ok(Self)
    }

    fn window(&self) -> Option<WindowHandle> {
        Some(DIALOG_WINDOW)
    }

    fn show_modal(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Panics while shown
pub struct PanickingDialog;

impl Dialog for PanickingDialog {
    fn create() -> anyhow::Result<Self> {
        Ok(Self)
    }

    fn window(&self) -> Option<WindowHandle> {
        Some(DIALOG_WINDOW)
    }

    fn show_modal(&mut self) -> anyhow::Result<()> {
        panic!("printer driver crashed");
    }
}

/// Returns an error while shown
pub struct FailingDialog;

impl Dialog for FailingDialog {
    fn create() -> anyhow::Result<Self> {
        Ok(Self)
    }

    fn window(&self) -> Option<WindowHandle> {
        Some(DIALOG_WINDOW)
    }

    fn show_modal(&mut self) -> anyhow::Result<()> {
        anyhow::bail!("layout resource missing")
    }
}

/// Cannot be constructed
pub struct BrokenDialog;

impl Dialog for BrokenDialog {
    fn create() -> anyhow::Result<Self> {
        anyhow::bail!("license check failed")
    }

    fn window(&self) -> Option<WindowHandle> {
        None
    }

    fn show_modal(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Modeless dialog that echoes its [`OrderArgs`] id back as the result once closed
///
/// Tests close it through `PendingDialog::close_signal()`.
pub struct ModelessDialog {
    order: Option<OrderArgs>,
}

impl Dialog for ModelessDialog {
    fn create() -> anyhow::Result<Self> {
        Ok(Self { order: None })
    }

    fn window(&self) -> Option<WindowHandle> {
        Some(DIALOG_WINDOW)
    }

    fn show_modal(&mut self) -> anyhow::Result<()> {
        anyhow::bail!("only shown modeless")
    }

    fn show_modeless(&mut self, _closed: CloseSignal) -> anyhow::Result<()> {
        Ok(())
    }

    fn argument_sink(&mut self) -> Option<&mut dyn ArgumentSink> {
        Some(self)
    }

    fn result_source(&mut self) -> Option<&mut dyn ResultSource> {
        Some(self)
    }
}

impl ArgumentSink for ModelessDialog {
    fn set_arguments(&mut self, args: Option<DialogArgs>) -> anyhow::Result<()> {
        self.order = downcast_args::<OrderArgs>(args);
        Ok(())
    }
}

impl ResultSource for ModelessDialog {
    fn take_result(&mut self) -> Option<DialogValue> {
        self.order.take().map(|o| Box::new(o.id) as DialogValue)
    }
}
