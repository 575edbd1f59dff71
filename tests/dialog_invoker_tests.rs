//! Integration tests for DialogInvoker
//!
//! These tests verify:
//! - Argument injection and typed result extraction
//! - Graceful degradation for dialogs without argument/result capabilities
//! - Host window parenting, disabling and exactly-once re-enabling
//! - Error and panic containment
//! - Modeless dialogs and asynchronous outcome delivery

mod common;

use common::*;
use front_dialogs::dialog::{DialogInvoker, DialogOutcome, NoResultReason};
use front_dialogs::{DialogError, HostError};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing_subscriber::layer::SubscriberExt;

fn invoker_with_host() -> (Arc<FakePlatform>, DialogInvoker) {
    let platform = Arc::new(FakePlatform::with_host());
    let invoker = DialogInvoker::new(manager_for(platform.clone()));
    (platform, invoker)
}

#[test]
fn test_arguments_in_result_out() {
    let (_platform, invoker) = invoker_with_host();

    let comment = invoker
        .show_dialog::<OrderDialog, OrderArgs, String>(Some(OrderArgs { id: 5 }))
        .unwrap();

    assert_eq!(comment.as_deref(), Some("comment for order 5"));
}

#[test]
fn test_dialog_without_capabilities_warns_twice() {
    let (_platform, invoker) = invoker_with_host();
    let counter = LevelCounter::warnings();
    let subscriber = tracing_subscriber::registry().with(counter.clone());

    let outcome = tracing::subscriber::with_default(subscriber, || {
        invoker
            .invoke::<BareDialog, OrderArgs, String>(Some(OrderArgs { id: 1 }))
            .unwrap()
    });

    assert_eq!(
        outcome.no_result_reason(),
        Some(&NoResultReason::MissingResultMember)
    );
    assert_eq!(counter.count(), 2);
}

#[test]
fn test_missing_arguments_still_opens() {
    let (platform, invoker) = invoker_with_host();
    let counter = LevelCounter::warnings();
    let subscriber = tracing_subscriber::registry().with(counter.clone());

    let outcome = tracing::subscriber::with_default(subscriber, || {
        invoker.invoke::<OrderDialog, OrderArgs, String>(None).unwrap()
    });

    // Shown without arguments, so no comment was written
    assert_eq!(outcome.no_result_reason(), Some(&NoResultReason::EmptyResult));
    assert_eq!(counter.count(), 2);
    assert_eq!(platform.count(&Call::SetEnabled(HOST_WINDOW, false)), 1);
}

#[test]
fn test_result_type_mismatch_is_no_result() {
    let (_platform, invoker) = invoker_with_host();

    let outcome = invoker
        .invoke::<OrderDialog, OrderArgs, u64>(Some(OrderArgs { id: 5 }))
        .unwrap();

    assert!(matches!(
        outcome,
        DialogOutcome::NoResult(NoResultReason::TypeMismatch { .. })
    ));
}

#[test]
fn test_host_parented_disabled_and_reenabled() {
    let (platform, invoker) = invoker_with_host();

    invoker
        .show_dialog::<OrderDialog, OrderArgs, String>(Some(OrderArgs { id: 7 }))
        .unwrap();

    assert_eq!(
        platform.calls(),
        vec![
            Call::SetParent(DIALOG_WINDOW, HOST_WINDOW),
            Call::SetEnabled(HOST_WINDOW, false),
            Call::SetEnabled(HOST_WINDOW, true),
        ]
    );
}

#[test]
fn test_panicking_dialog_reenables_host_once() {
    let (platform, invoker) = invoker_with_host();

    let outcome = invoker
        .invoke::<PanickingDialog, (), ()>(None)
        .unwrap();

    match outcome.error() {
        Some(DialogError::Panicked { dialog, message }) => {
            assert_eq!(dialog, "PanickingDialog");
            assert!(message.contains("printer driver crashed"));
        }
        other => panic!("expected a panic failure, got {:?}", other),
    }
    assert_eq!(platform.count(&Call::SetEnabled(HOST_WINDOW, true)), 1);

    // The UI loop survived the panic
    let comment = invoker
        .show_dialog::<OrderDialog, OrderArgs, String>(Some(OrderArgs { id: 2 }))
        .unwrap();
    assert!(comment.is_some());
    assert_eq!(platform.count(&Call::SetEnabled(HOST_WINDOW, true)), 2);
}

#[test]
fn test_failing_dialog_reenables_host_once() {
    let (platform, invoker) = invoker_with_host();

    let outcome = invoker.invoke::<FailingDialog, (), ()>(None).unwrap();

    assert!(matches!(outcome.error(), Some(DialogError::Display { .. })));
    assert_eq!(platform.count(&Call::SetEnabled(HOST_WINDOW, false)), 1);
    assert_eq!(platform.count(&Call::SetEnabled(HOST_WINDOW, true)), 1);

    let metrics = invoker.manager().metrics();
    assert_eq!(metrics.dialogs_failed.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.host_reenabled.load(Ordering::Relaxed), 1);
}

#[test]
fn test_failures_become_none() {
    let (platform, invoker) = invoker_with_host();

    let result = invoker.show_dialog::<BrokenDialog, (), String>(None).unwrap();
    assert!(result.is_none());

    // Construction failed before the host was touched
    assert!(platform.calls().is_empty());
}

#[test]
fn test_host_missing_is_the_only_error() {
    let platform = Arc::new(FakePlatform::new(Vec::new()));
    let invoker = DialogInvoker::new(manager_for(platform));

    let err = invoker
        .show_dialog::<OrderDialog, OrderArgs, String>(Some(OrderArgs { id: 5 }))
        .unwrap_err();

    assert!(matches!(err, HostError::NotFound { .. }));
}

#[test]
fn test_initializes_once_across_invocations() {
    let (platform, invoker) = invoker_with_host();

    for id in 0..3 {
        invoker
            .show_dialog::<OrderDialog, OrderArgs, String>(Some(OrderArgs { id }))
            .unwrap();
    }

    // Primary name found on the first lookup; never looked up again
    assert_eq!(platform.lookups(), 1);
    assert_eq!(platform.ui_threads_entered(), 1);
    assert_eq!(
        invoker.manager().metrics().dialogs_completed.load(Ordering::Relaxed),
        3
    );
}

#[test]
fn test_modeless_outcome_after_close() {
    let (platform, invoker) = invoker_with_host();

    let pending = invoker
        .show_dialog_modeless::<ModelessDialog, OrderArgs, u32>(Some(OrderArgs { id: 11 }))
        .unwrap();

    assert_eq!(pending.dialog_name(), "ModelessDialog");
    assert!(!pending.is_closed());

    pending.close_signal().unwrap().fire();
    let outcome = pending.wait();

    assert!(matches!(outcome, DialogOutcome::Completed(11)));
    assert!(platform.calls().is_empty(), "modeless dialogs leave the host alone");
}

#[test]
fn test_modeless_stopped_before_close() {
    let (_platform, invoker) = invoker_with_host();

    let pending = invoker
        .show_dialog_modeless::<ModelessDialog, OrderArgs, u32>(None)
        .unwrap();
    invoker.manager().shutdown();

    let outcome = pending.wait();
    assert!(outcome.is_failed());
}

#[test]
fn test_modeless_construction_failure_is_ready() {
    let (_platform, invoker) = invoker_with_host();

    let pending = invoker
        .show_dialog_modeless::<BrokenDialog, (), u32>(None)
        .unwrap();

    assert!(pending.close_signal().is_none());
    assert!(pending.is_closed());
    assert!(matches!(
        pending.wait().error(),
        Some(DialogError::Construction { .. })
    ));
}

#[tokio::test]
async fn test_modeless_outcome_awaited() {
    let (_platform, invoker) = invoker_with_host();

    // Opening blocks on the UI thread, so keep it off the runtime workers
    let pending = tokio::task::spawn_blocking(move || {
        invoker
            .show_dialog_modeless::<ModelessDialog, OrderArgs, u32>(Some(OrderArgs { id: 3 }))
            .map(|pending| (invoker, pending))
    })
    .await
    .unwrap();
    let (_invoker, pending) = pending.unwrap();

    let signal = pending.close_signal().unwrap().clone();
    std::thread::spawn(move || signal.fire()).join().unwrap();

    let outcome = pending.outcome().await;
    assert_eq!(outcome.into_option(), Some(3));
}
