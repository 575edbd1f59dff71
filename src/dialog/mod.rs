//! Dialog module - plugin dialogs opened on the dedicated UI thread.
//!
//! # Components
//!
//! - [`Dialog`], [`ArgumentSink`], [`ResultSource`]: the contract a plugin dialog implements.
//!   Argument and result exchange are optional capabilities; a dialog without them still opens.
//! - [`DialogInvoker`]: runs a dialog type on the UI thread, injects arguments, blocks until the
//!   dialog closes and extracts a typed result. Also opens modeless dialogs ([`PendingDialog`]).
//! - [`DialogOutcome`]: completed with a value, closed without a result, or failed.
//! - [`CloseSignal`]: per-invocation marker fired when a dialog closes.
//!
//! # Error policy
//!
//! The invoker only returns `Err` when the UI thread manager cannot initialize
//! ([`HostError`](crate::error::HostError)). Missing capabilities are logged as warnings;
//! construction, argument, display errors and panics become [`DialogOutcome::Failed`], which
//! [`DialogInvoker::show_dialog`] reports as `None`. The host application keeps running
//! whatever a dialog does.

pub mod contract;
pub mod invoker;
mod lease;
pub mod outcome;

pub use contract::{
    ArgumentSink, CloseSignal, Dialog, DialogArgs, DialogValue, ResultSource, downcast_args,
};
pub use invoker::{DialogInvoker, PendingDialog};
pub use outcome::{DialogOutcome, MissingExtensionPoint, NoResultReason};
