// UiThread / UiDispatcher - the dedicated UI message loop and the queue that feeds it
//
// The loop alternates between two sources of work:
// 1. OS window messages queued for the thread (HostPlatform::pump_messages)
// 2. Work items posted through a UiDispatcher, one at a time, in submission order
//
// When both are empty it sleeps until either one has something: HostPlatform::wait_for_work
// returns on a window message or on the wake-up every queued command sends. Platforms without a
// message queue block on the command channel instead.
//
// It only ends on an explicit Shutdown command (or when every dispatcher is gone), never on idle.

use crate::error::{DispatchError, HostError, panic_message};
use crate::platform::HostPlatform;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{self, TryRecvError};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tokio::sync::oneshot;

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Command {
    Run(Job),
    Shutdown,
}

/// Cloneable handle for marshaling work onto the UI thread
///
/// Work items run one at a time, in the order they were posted. The caller's `tracing`
/// dispatcher travels with each item, so log entries written on the UI thread reach the same
/// subscriber as the caller's.
#[derive(Clone)]
pub struct UiDispatcher {
    tx: mpsc::Sender<Command>,
    thread_id: ThreadId,
    platform: Arc<dyn HostPlatform>,
}

impl UiDispatcher {
    /// True when called from the UI thread itself
    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Run `f` on the UI thread and block until it has finished
    ///
    /// Called from the UI thread, `f` runs inline instead of being queued (queueing would
    /// deadlock). Must not be called from inside an async runtime worker; wrap the call in
    /// `spawn_blocking` there.
    ///
    /// # Errors
    /// - [`DispatchError::Stopped`] if the loop is gone or stops before running `f`
    /// - [`DispatchError::Panicked`] if `f` panicked (the loop keeps running)
    pub fn invoke<F, R>(&self, f: F) -> Result<R, DispatchError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_ui_thread() {
            return catch_unwind(AssertUnwindSafe(f))
                .map_err(|payload| DispatchError::Panicked(panic_message(payload.as_ref())));
        }

        let reply_rx = self.invoke_async(f)?;
        reply_rx.blocking_recv().map_err(|_| DispatchError::Stopped)?
    }

    /// Queue `f` and return a receiver for its result without waiting
    ///
    /// The receiver can be awaited or used with `blocking_recv`. It resolves to
    /// [`DispatchError::Stopped`] (as a closed channel) if the loop stops first.
    pub fn invoke_async<F, R>(
        &self,
        f: F,
    ) -> Result<oneshot::Receiver<Result<R, DispatchError>>, DispatchError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.post(move || {
            let result = catch_unwind(AssertUnwindSafe(f))
                .map_err(|payload| DispatchError::Panicked(panic_message(payload.as_ref())));
            // Ignore send errors - the caller may have stopped waiting
            let _ = reply_tx.send(result);
        })?;

        Ok(reply_rx)
    }

    /// Queue `f` without waiting for it (fire-and-forget)
    ///
    /// Unlike [`invoke`](Self::invoke) this always queues, even from the UI thread, so the
    /// item runs after the current one finishes.
    pub fn post<F>(&self, f: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        let job: Job = Box::new(move || tracing::dispatcher::with_default(&dispatch, f));

        self.send(Command::Run(job))
    }

    fn send(&self, command: Command) -> Result<(), DispatchError> {
        self.tx.send(command).map_err(|_| DispatchError::Stopped)?;
        self.platform.wake_ui_thread();
        Ok(())
    }
}

/// The dedicated UI thread and its loop
pub struct UiThread {
    dispatcher: UiDispatcher,
    join: Option<JoinHandle<()>>,
}

impl UiThread {
    /// Spawn the UI thread and block until its loop has started
    ///
    /// `max_idle_wait` bounds how long an idle loop sleeps before pumping messages again, in
    /// case a wake-up gets lost.
    pub fn spawn(
        platform: Arc<dyn HostPlatform>,
        thread_name: &str,
        max_idle_wait: Duration,
    ) -> Result<Self, HostError> {
        let (tx, rx) = mpsc::channel::<Command>();
        let (ready_tx, ready_rx) = oneshot::channel::<ThreadId>();

        let loop_platform = platform.clone();
        let join = thread::Builder::new()
            .name(thread_name.to_string())
            .spawn(move || run_loop(loop_platform, rx, ready_tx, max_idle_wait))?;

        let thread_id = ready_rx
            .blocking_recv()
            .map_err(|_| HostError::UiThreadStartup)?;

        tracing::info!("UI thread '{}' started ({:?})", thread_name, thread_id);

        Ok(Self {
            dispatcher: UiDispatcher {
                tx,
                thread_id,
                platform,
            },
            join: Some(join),
        })
    }

    pub fn dispatcher(&self) -> &UiDispatcher {
        &self.dispatcher
    }

    /// Request loop termination and join the thread
    ///
    /// Items queued before the request still run. From the UI thread itself the join is
    /// skipped (it would never return); the loop still ends after the current item.
    pub fn stop(mut self) {
        let _ = self.dispatcher.send(Command::Shutdown);

        let Some(join) = self.join.take() else {
            return;
        };

        if self.dispatcher.is_ui_thread() {
            tracing::error!("UI thread asked to stop itself; not joining");
            return;
        }

        if join.join().is_err() {
            tracing::error!("UI thread terminated with a panic");
        } else {
            tracing::info!("UI thread stopped");
        }
    }
}

fn run_loop(
    platform: Arc<dyn HostPlatform>,
    rx: mpsc::Receiver<Command>,
    ready_tx: oneshot::Sender<ThreadId>,
    max_idle_wait: Duration,
) {
    let apartment_entered = platform.enter_ui_thread();

    if ready_tx.send(thread::current().id()).is_err() {
        tracing::warn!("UI thread starter stopped waiting before startup");
    }

    tracing::debug!("UI message loop running");

    loop {
        platform.pump_messages();

        let command = match rx.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) => {
                if platform.wait_for_work(max_idle_wait) {
                    // Woken by a window message or a queued command; pump first either way
                    continue;
                }
                rx.recv().ok()
            }
            Err(TryRecvError::Disconnected) => None,
        };

        match command {
            Some(Command::Run(job)) => {
                // Items posted through invoke_async catch their own panics; this catches the rest
                if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                    tracing::error!("UI work item panicked: {}", panic_message(payload.as_ref()));
                }
            }
            Some(Command::Shutdown) => {
                tracing::debug!("UI message loop shutdown requested");
                break;
            }
            None => {
                tracing::debug!("All UI dispatchers dropped, ending loop");
                break;
            }
        }
    }

    if apartment_entered {
        platform.leave_ui_thread();
    }

    tracing::debug!("UI message loop terminated");
}
