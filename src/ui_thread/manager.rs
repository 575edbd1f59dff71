use super::dispatcher::{UiDispatcher, UiThread};
use crate::error::HostError;
use crate::host::{HostWindow, resolve_host};
use crate::metrics::Metrics;
use crate::models::HelperConfig;
use crate::platform::HostPlatform;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A running UI loop bound to a resolved host window.
struct Session {
    ui: UiThread,
    host: HostWindow,
}

/// What the dialog invoker needs from a live session.
#[derive(Clone)]
pub struct SessionHandle {
    pub dispatcher: UiDispatcher,
    pub host: HostWindow,
}

/// Owner of the dedicated UI thread and the resolved host window
///
/// The plugin creates one manager per process (usually at plugin start) and shares it by
/// `Arc` with everything that shows dialogs. Lifecycle:
///
/// - [`initialize()`](Self::initialize): resolve the host, spawn the UI thread; no-op if running
/// - [`shutdown()`](Self::shutdown): stop and join the UI thread; no-op if not running
/// - dropping the manager shuts down as well
///
/// A stopped manager starts again on the next `initialize()` or dialog request.
///
/// # Caller responsibilities
///
/// Do not call `shutdown()` while a dialog is open: the dialog's window lives on the UI thread
/// and `shutdown()` waits for the current work item, i.e. for the dialog to close.
pub struct UiThreadManager {
    platform: Arc<dyn HostPlatform>,
    config: HelperConfig,
    metrics: Arc<Metrics>,
    session: Mutex<Option<Session>>,
}

impl UiThreadManager {
    pub fn new(platform: Arc<dyn HostPlatform>, config: HelperConfig) -> Self {
        Self {
            platform,
            config,
            metrics: Arc::new(Metrics::new()),
            session: Mutex::new(None),
        }
    }

    /// Resolve the host and start the UI loop, unless already running
    ///
    /// Blocks until the UI loop has signalled that it is ready.
    ///
    /// # Errors
    /// [`HostError`] if the host process is missing or ambiguous, or the thread cannot start.
    /// Nothing is retried.
    pub fn initialize(&self) -> Result<(), HostError> {
        self.ensure_initialized().map(|_| ())
    }

    /// Like [`initialize()`](Self::initialize), returning the live session
    pub fn ensure_initialized(&self) -> Result<SessionHandle, HostError> {
        let mut session = self.lock_session();

        if let Some(existing) = session.as_ref() {
            tracing::debug!("UI thread already running");
            return Ok(SessionHandle {
                dispatcher: existing.ui.dispatcher().clone(),
                host: existing.host.clone(),
            });
        }

        tracing::info!("Initializing UI thread manager");

        let host = resolve_host(self.platform.as_ref(), &self.config.host.process_names)?;

        let ui = UiThread::spawn(
            self.platform.clone(),
            &self.config.ui_thread.thread_name,
            self.config.ui_thread.pump_interval(),
        )?;
        self.metrics.record_ui_thread_started();

        let handle = SessionHandle {
            dispatcher: ui.dispatcher().clone(),
            host: host.clone(),
        };
        *session = Some(Session { ui, host });

        tracing::info!(
            "UI thread manager initialized (host window {})",
            handle.host.handle
        );
        Ok(handle)
    }

    /// Stop the UI loop and wait for its thread, unless not running
    pub fn shutdown(&self) {
        // Take the session out before joining so the lock isn't held across the join
        let Some(session) = self.lock_session().take() else {
            tracing::debug!("Shutdown requested but UI thread is not running");
            return;
        };

        tracing::info!("Shutting down UI thread manager");
        session.ui.stop();
        self.metrics.log_summary();
    }

    pub fn is_running(&self) -> bool {
        self.lock_session().is_some()
    }

    /// Host window recorded at initialization, if running
    pub fn host_window(&self) -> Option<HostWindow> {
        self.lock_session().as_ref().map(|s| s.host.clone())
    }

    /// Dispatcher of the running UI thread
    pub fn dispatcher(&self) -> Option<UiDispatcher> {
        self.lock_session()
            .as_ref()
            .map(|s| s.ui.dispatcher().clone())
    }

    pub fn platform(&self) -> &Arc<dyn HostPlatform> {
        &self.platform
    }

    pub fn config(&self) -> &HelperConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        // A panic while holding the lock leaves the Option itself consistent
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for UiThreadManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
