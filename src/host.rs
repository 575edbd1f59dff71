//! Host process discovery.
//!
//! The plugin runs inside the iikoFront front-office client. Before any dialog can be parented
//! to it, the host's main window has to be found:
//!
//! 1. Query running processes for each configured name, in order (primary, then fallback)
//! 2. The first name with exactly one running instance wins
//! 3. A name with several running instances is ambiguous and fails immediately
//! 4. The winning process must own a main window
//!
//! Names are compared case-insensitively with a trailing `.exe` ignored, so `iikoFront.Net`
//! matches the executable `iikoFront.Net.exe`.

use crate::error::HostError;
use crate::platform::{HostPlatform, WindowHandle};

/// The resolved host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostWindow {
    /// The configured name that matched
    pub process_name: String,
    pub pid: u32,
    /// Main window of the host; parent of every modal dialog
    pub handle: WindowHandle,
}

/// Whether an OS executable name refers to the wanted process name.
pub fn process_name_matches(exe_name: &str, wanted: &str) -> bool {
    let stem = strip_exe_suffix(exe_name);
    let wanted = strip_exe_suffix(wanted);
    !wanted.is_empty() && stem.eq_ignore_ascii_case(wanted)
}

fn strip_exe_suffix(name: &str) -> &str {
    let len = name.len();
    if len > 4 && name.is_char_boundary(len - 4) && name[len - 4..].eq_ignore_ascii_case(".exe") {
        &name[..len - 4]
    } else {
        name
    }
}

/// Locate the single running host process and its main window.
///
/// # Errors
///
/// - [`HostError::Ambiguous`] if a name matches more than one process
/// - [`HostError::NoMainWindow`] if the matched process has no main window
/// - [`HostError::NotFound`] if no name matches any process
pub fn resolve_host(
    platform: &dyn HostPlatform,
    names: &[String],
) -> Result<HostWindow, HostError> {
    for name in names {
        let candidates = platform.find_processes(name);

        match candidates.as_slice() {
            [] => {
                tracing::debug!("No running process named {}", name);
            }
            [process] => {
                let handle = process
                    .main_window
                    .filter(|h| !h.is_null())
                    .ok_or_else(|| HostError::NoMainWindow {
                        name: name.clone(),
                        pid: process.pid,
                    })?;

                tracing::info!(
                    "Found host process {} (pid {}, exe {}), main window {}",
                    name,
                    process.pid,
                    process.exe_name,
                    handle
                );

                return Ok(HostWindow {
                    process_name: name.clone(),
                    pid: process.pid,
                    handle,
                });
            }
            many => {
                tracing::error!("Found {} running instances of {}", many.len(), name);
                return Err(HostError::Ambiguous {
                    name: name.clone(),
                    count: many.len(),
                });
            }
        }
    }

    tracing::error!("Host process not found, tried: {:?}", names);
    Err(HostError::NotFound {
        names: names.to_vec(),
    })
}
