// HostWindowLease - host window parenting and disabling for the lifetime of a modal dialog
//
// Acquiring the lease parents the dialog to the host and disables the host. Dropping it
// re-enables the host, exactly once, on every exit path: normal close, error return, panic.

use crate::metrics::Metrics;
use crate::platform::{HostPlatform, WindowHandle};
use std::sync::Arc;

pub(crate) struct HostWindowLease<'a> {
    platform: &'a dyn HostPlatform,
    metrics: &'a Arc<Metrics>,
    host: WindowHandle,
}

impl<'a> HostWindowLease<'a> {
    pub(crate) fn acquire(
        platform: &'a dyn HostPlatform,
        metrics: &'a Arc<Metrics>,
        dialog: Option<WindowHandle>,
        host: WindowHandle,
    ) -> Self {
        match dialog.filter(|h| !h.is_null()) {
            Some(dialog) => {
                if !platform.set_parent(dialog, host) {
                    tracing::debug!("Could not parent dialog {} to host {}", dialog, host);
                }
            }
            None => {
                tracing::debug!("Dialog has no native window yet; not parenting to host");
            }
        }

        if platform.set_enabled(host, false) {
            tracing::debug!("Host window {} disabled", host);
        } else {
            tracing::debug!("Could not disable host window {}", host);
        }

        Self {
            platform,
            metrics,
            host,
        }
    }
}

impl Drop for HostWindowLease<'_> {
    fn drop(&mut self) {
        if !self.platform.set_enabled(self.host, true) {
            tracing::debug!("Could not re-enable host window {}", self.host);
        }
        self.metrics.record_host_reenabled();

        if std::thread::panicking() {
            tracing::error!("Host window {} re-enabled after dialog panic", self.host);
        } else {
            tracing::debug!("Host window {} re-enabled", self.host);
        }
    }
}
