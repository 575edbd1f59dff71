// DialogInvoker - opens plugin dialogs on the UI thread and hands typed results back
//
// Modal pipeline, all on the UI thread while the caller blocks:
//   create -> inject arguments -> parent + disable host -> show_modal -> re-enable host -> extract
//
// Modeless pipeline: create -> inject arguments -> show_modeless, then the dialog is parked in a
// UI-thread registry until its CloseSignal fires; extraction runs as a later UI work item and the
// outcome is delivered to the caller's PendingDialog.
//
// Only host resolution (UiThreadManager::ensure_initialized) can fail the call itself. Everything
// after that ends up in a DialogOutcome.

use super::contract::{CloseSignal, Dialog, DialogArgs, short_type_name};
use super::lease::HostWindowLease;
use super::outcome::{DialogOutcome, MissingExtensionPoint, NoResultReason};
use crate::error::{DialogError, DispatchError, HostError};
use crate::metrics::Metrics;
use crate::platform::{HostPlatform, WindowHandle};
use crate::ui_thread::{UiDispatcher, UiThreadManager};
use std::any::type_name;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::oneshot;

/// Opens dialogs through a shared [`UiThreadManager`]
///
/// # Example
/// ```ignore
/// let manager = Arc::new(UiThreadManager::new(default_platform(), config));
/// let invoker = DialogInvoker::new(manager.clone());
///
/// // Blocks until the dialog closes; None if it closed without a result or failed
/// let comment: Option<String> =
///     invoker.show_dialog::<CommentDialog, OrderArgs, String>(Some(OrderArgs { id: 5 }))?;
/// ```
#[derive(Clone)]
pub struct DialogInvoker {
    manager: Arc<UiThreadManager>,
}

impl DialogInvoker {
    pub fn new(manager: Arc<UiThreadManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Arc<UiThreadManager> {
        &self.manager
    }

    /// Show `D` modally and return its result, or `None`
    ///
    /// Pipeline failures are logged and returned as `None`; use [`invoke`](Self::invoke) to
    /// tell them apart from "closed without result".
    ///
    /// # Errors
    /// [`HostError`] if the UI thread manager had to initialize and could not.
    pub fn show_dialog<D, A, R>(&self, args: Option<A>) -> Result<Option<R>, HostError>
    where
        D: Dialog,
        A: Send + 'static,
        R: Send + 'static,
    {
        Ok(self.invoke::<D, A, R>(args)?.into_option())
    }

    /// Show `D` modally, blocking until it closes, and return the full outcome
    ///
    /// While the dialog is open it is parented to the host window and the host is disabled.
    /// The host is re-enabled exactly once when the dialog closes, errors or panics.
    pub fn invoke<D, A, R>(&self, args: Option<A>) -> Result<DialogOutcome<R>, HostError>
    where
        D: Dialog,
        A: Send + 'static,
        R: Send + 'static,
    {
        let dialog_name = short_type_name(type_name::<D>());
        tracing::info!("Opening dialog {}", dialog_name);

        let session = self.manager.ensure_initialized()?;
        let platform = self.manager.platform().clone();
        let metrics = self.manager.metrics().clone();
        let host = session.host.handle;

        metrics.record_dialog_opened();
        let start = Instant::now();

        let ui_metrics = metrics.clone();
        let outcome = session
            .dispatcher
            .invoke(move || run_modal::<D, A, R>(platform.as_ref(), &ui_metrics, host, args))
            .unwrap_or_else(|e| DialogOutcome::Failed(dispatch_failure(dialog_name, e)));

        record_outcome(&metrics, dialog_name, &outcome, start);
        Ok(outcome)
    }

    /// Show `D` without blocking until it closes
    ///
    /// Returns once the dialog has been created and shown. The host window is neither parented
    /// nor disabled; the caller keeps interacting with it. Opening a modeless dialog while a
    /// modal one is open is not supported.
    pub fn show_dialog_modeless<D, A, R>(
        &self,
        args: Option<A>,
    ) -> Result<PendingDialog<R>, HostError>
    where
        D: Dialog,
        A: Send + 'static,
        R: Send + 'static,
    {
        let dialog_name = short_type_name(type_name::<D>());
        tracing::info!("Opening modeless dialog {}", dialog_name);

        let session = self.manager.ensure_initialized()?;
        let metrics = self.manager.metrics().clone();
        metrics.record_dialog_opened();
        let start = Instant::now();

        let (outcome_tx, outcome_rx) = oneshot::channel();
        let dispatcher = session.dispatcher.clone();
        let ui_metrics = metrics.clone();

        let shown = session.dispatcher.invoke(move || {
            open_modeless::<D, A, R>(dispatcher, ui_metrics, start, args, outcome_tx)
        });

        match shown {
            Ok(signal) => Ok(PendingDialog {
                dialog: dialog_name.to_string(),
                signal,
                state: PendingState::Waiting(outcome_rx),
            }),
            Err(e) => {
                let outcome = DialogOutcome::Failed(dispatch_failure(dialog_name, e));
                record_outcome(&metrics, dialog_name, &outcome, start);
                Ok(PendingDialog {
                    dialog: dialog_name.to_string(),
                    signal: None,
                    state: PendingState::Ready(outcome),
                })
            }
        }
    }
}

/// A modeless dialog that has been shown and whose outcome arrives when it closes
pub struct PendingDialog<R> {
    dialog: String,
    signal: Option<CloseSignal>,
    state: PendingState<R>,
}

enum PendingState<R> {
    Waiting(oneshot::Receiver<DialogOutcome<R>>),
    Ready(DialogOutcome<R>),
}

impl<R> PendingDialog<R> {
    pub fn dialog_name(&self) -> &str {
        &self.dialog
    }

    /// Close marker of the dialog; `None` if it never got as far as being shown
    pub fn close_signal(&self) -> Option<&CloseSignal> {
        self.signal.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.signal.as_ref().is_none_or(CloseSignal::is_closed)
    }

    /// Block until the dialog has closed and its result has been extracted
    ///
    /// Must not be called from the UI thread (the extraction it waits for runs there) or from an
    /// async runtime worker.
    pub fn wait(self) -> DialogOutcome<R> {
        match self.state {
            PendingState::Ready(outcome) => outcome,
            PendingState::Waiting(rx) => rx
                .blocking_recv()
                .unwrap_or_else(|_| stopped_before_close(&self.dialog)),
        }
    }

    /// Await the outcome from async code
    pub async fn outcome(self) -> DialogOutcome<R> {
        match self.state {
            PendingState::Ready(outcome) => outcome,
            PendingState::Waiting(rx) => rx
                .await
                .unwrap_or_else(|_| stopped_before_close(&self.dialog)),
        }
    }
}

fn stopped_before_close<R>(dialog: &str) -> DialogOutcome<R> {
    tracing::error!("UI thread stopped before dialog {} closed", dialog);
    DialogOutcome::Failed(DialogError::Dispatch(DispatchError::Stopped))
}

thread_local! {
    // Modeless dialogs shown on this (UI) thread, waiting for their CloseSignal
    static OPEN_DIALOGS: RefCell<HashMap<u64, Box<dyn FnOnce()>>> = RefCell::new(HashMap::new());
}

static NEXT_DIALOG_ID: AtomicU64 = AtomicU64::new(1);

fn run_modal<D, A, R>(
    platform: &dyn HostPlatform,
    metrics: &Arc<Metrics>,
    host: WindowHandle,
    args: Option<A>,
) -> DialogOutcome<R>
where
    D: Dialog,
    A: Send + 'static,
    R: 'static,
{
    let mut dialog = match create_dialog::<D, A>(args) {
        Ok(dialog) => dialog,
        Err(e) => return DialogOutcome::Failed(e),
    };

    {
        let _lease = HostWindowLease::acquire(platform, metrics, dialog.window(), host);

        tracing::debug!("Showing dialog {} modally", dialog.name());
        if let Err(source) = dialog.show_modal() {
            return DialogOutcome::Failed(DialogError::Display {
                dialog: dialog.name().to_string(),
                source,
            });
        }
    }

    tracing::debug!("Dialog {} closed", dialog.name());
    extract_result(&mut dialog)
}

fn open_modeless<D, A, R>(
    dispatcher: UiDispatcher,
    metrics: Arc<Metrics>,
    start: Instant,
    args: Option<A>,
    outcome_tx: oneshot::Sender<DialogOutcome<R>>,
) -> Option<CloseSignal>
where
    D: Dialog,
    A: Send + 'static,
    R: Send + 'static,
{
    let fail = |metrics: &Metrics,
                dialog: &str,
                outcome: DialogOutcome<R>,
                tx: oneshot::Sender<_>| {
        record_outcome(metrics, dialog, &outcome, start);
        let _ = tx.send(outcome);
    };

    let mut dialog = match create_dialog::<D, A>(args) {
        Ok(dialog) => dialog,
        Err(e) => {
            let name = short_type_name(type_name::<D>());
            fail(&metrics, name, DialogOutcome::Failed(e), outcome_tx);
            return None;
        }
    };

    let id = NEXT_DIALOG_ID.fetch_add(1, Ordering::Relaxed);
    let signal = CloseSignal::with_callback(Some(Box::new(move || {
        // Extraction always runs as its own UI work item, whichever thread fired the signal
        if dispatcher.post(move || finish_modeless(id)).is_err() {
            tracing::debug!("UI thread gone before modeless dialog #{} closed", id);
        }
    })));

    tracing::debug!("Showing dialog {} modeless (#{})", dialog.name(), id);
    if let Err(source) = dialog.show_modeless(signal.clone()) {
        let name = dialog.name().to_string();
        let outcome = DialogOutcome::Failed(DialogError::Display {
            dialog: name.clone(),
            source,
        });
        fail(&metrics, &name, outcome, outcome_tx);
        return None;
    }

    let finisher = move || {
        let name = dialog.name().to_string();
        tracing::debug!("Modeless dialog {} (#{}) closed", name, id);
        let outcome = extract_result::<D, R>(&mut dialog);
        record_outcome(&metrics, &name, &outcome, start);
        // Ignore send errors - the caller may have dropped its PendingDialog
        let _ = outcome_tx.send(outcome);
    };
    OPEN_DIALOGS.with(|open| open.borrow_mut().insert(id, Box::new(finisher)));

    Some(signal)
}

fn finish_modeless(id: u64) {
    // Release the registry borrow before running the finisher; it may open other dialogs
    let finisher = OPEN_DIALOGS.with(|open| open.borrow_mut().remove(&id));
    match finisher {
        Some(finish) => finish(),
        None => tracing::debug!("Modeless dialog #{} already finished", id),
    }
}

/// Construct `D` and hand it the caller's arguments
fn create_dialog<D, A>(args: Option<A>) -> Result<D, DialogError>
where
    D: Dialog,
    A: Send + 'static,
{
    let mut dialog = D::create().map_err(|source| DialogError::Construction {
        dialog: short_type_name(type_name::<D>()).to_string(),
        source,
    })?;
    let name = dialog.name().to_string();

    match dialog.argument_sink() {
        Some(sink) => {
            let payload = args.map(|a| Box::new(a) as DialogArgs);
            if payload.is_none() {
                warn_missing(&name, MissingExtensionPoint::Arguments);
            }
            sink.set_arguments(payload)
                .map_err(|source| DialogError::Arguments {
                    dialog: name.clone(),
                    source,
                })?;
            tracing::debug!("Arguments passed to dialog {}", name);
        }
        None => warn_missing(&name, MissingExtensionPoint::ArgumentSink),
    }

    Ok(dialog)
}

/// Read and downcast the result of a closed dialog
fn extract_result<D, R>(dialog: &mut D) -> DialogOutcome<R>
where
    D: Dialog,
    R: 'static,
{
    let name = dialog.name().to_string();

    let Some(source) = dialog.result_source() else {
        warn_missing(&name, MissingExtensionPoint::ResultSource);
        return DialogOutcome::NoResult(NoResultReason::MissingResultMember);
    };

    match source.take_result() {
        None => {
            tracing::warn!("Dialog {} closed without a result", name);
            DialogOutcome::NoResult(NoResultReason::EmptyResult)
        }
        Some(value) => match value.downcast::<R>() {
            Ok(value) => DialogOutcome::Completed(*value),
            Err(_) => {
                let expected = type_name::<R>();
                tracing::warn!("Dialog {} result is not a {}", name, expected);
                DialogOutcome::NoResult(NoResultReason::TypeMismatch { expected })
            }
        },
    }
}

fn warn_missing(dialog: &str, point: MissingExtensionPoint) {
    match point {
        MissingExtensionPoint::ArgumentSink => {
            tracing::warn!("Dialog {} has no {}; opening without arguments", dialog, point)
        }
        MissingExtensionPoint::Arguments => {
            tracing::warn!("Dialog {} accepts arguments but none were supplied", dialog)
        }
        MissingExtensionPoint::ResultSource => {
            tracing::warn!("Dialog {} has no {}; returning no result", dialog, point)
        }
    }
}

fn dispatch_failure(dialog: &str, err: DispatchError) -> DialogError {
    match err {
        DispatchError::Panicked(message) => DialogError::Panicked {
            dialog: dialog.to_string(),
            message,
        },
        other => DialogError::Dispatch(other),
    }
}

fn record_outcome<R>(metrics: &Metrics, dialog: &str, outcome: &DialogOutcome<R>, start: Instant) {
    metrics.record_dialog_time(start.elapsed());

    match outcome {
        DialogOutcome::Completed(_) => {
            metrics.record_dialog_completed();
            tracing::info!("Dialog {} closed with a result", dialog);
        }
        DialogOutcome::NoResult(reason) => {
            metrics.record_dialog_without_result();
            tracing::info!("Dialog {} closed without result: {}", dialog, reason);
        }
        DialogOutcome::Failed(err) => {
            metrics.record_dialog_failed();
            tracing::error!("Error opening dialog {}: {}", dialog, err);
        }
    }
}
