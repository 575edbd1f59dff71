// UI thread module - dedicated message loop for plugin dialogs
//
// This module contains:
// - UiThread / UiDispatcher: the loop thread and the handle that marshals work onto it
// - UiThreadManager: host resolution plus explicit initialize/shutdown lifecycle

pub mod dispatcher;
pub mod manager;

pub use dispatcher::{UiDispatcher, UiThread};
pub use manager::{SessionHandle, UiThreadManager};
