use crate::error::DialogError;
use std::fmt;

/// Why a dialog closed without a usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoResultReason {
    /// The dialog has no result capability
    MissingResultMember,
    /// The dialog has the capability but closed without setting a value
    EmptyResult,
    /// The value is not of the type the caller asked for
    TypeMismatch { expected: &'static str },
}

impl fmt::Display for NoResultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoResultReason::MissingResultMember => write!(f, "dialog has no result member"),
            NoResultReason::EmptyResult => write!(f, "dialog result is empty"),
            NoResultReason::TypeMismatch { expected } => {
                write!(f, "dialog result is not a {}", expected)
            }
        }
    }
}

/// Extension points a dialog may lack; each one is logged as a warning, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingExtensionPoint {
    /// The dialog takes no arguments; the caller's payload is dropped
    ArgumentSink,
    /// The dialog takes arguments but the caller supplied none
    Arguments,
    /// The dialog produces no result
    ResultSource,
}

impl fmt::Display for MissingExtensionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingExtensionPoint::ArgumentSink => write!(f, "argument sink"),
            MissingExtensionPoint::Arguments => write!(f, "arguments"),
            MissingExtensionPoint::ResultSource => write!(f, "result source"),
        }
    }
}

/// Result of one dialog invocation.
///
/// The three cases are kept apart so callers that care can tell "closed without result" from
/// "pipeline failed". [`into_option`](Self::into_option) folds both into `None`.
#[derive(Debug)]
pub enum DialogOutcome<R> {
    Completed(R),
    NoResult(NoResultReason),
    Failed(DialogError),
}

impl<R> DialogOutcome<R> {
    /// Typed result, or `None` for both "no result" and "failed".
    pub fn into_option(self) -> Option<R> {
        match self {
            DialogOutcome::Completed(value) => Some(value),
            DialogOutcome::NoResult(_) | DialogOutcome::Failed(_) => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, DialogOutcome::Completed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DialogOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&DialogError> {
        match self {
            DialogOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn no_result_reason(&self) -> Option<&NoResultReason> {
        match self {
            DialogOutcome::NoResult(reason) => Some(reason),
            _ => None,
        }
    }
}
