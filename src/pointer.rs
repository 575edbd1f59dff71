use crate::platform::{HostPlatform, MouseButtonEvent};

/// Move the cursor to screen coordinates `(x, y)` and left-click there.
///
/// Best-effort: a failed platform call is logged at debug level and otherwise ignored.
pub fn click_at(platform: &dyn HostPlatform, x: i32, y: i32) {
    tracing::debug!("Simulating left click at ({}, {})", x, y);

    if !platform.set_cursor_pos(x, y) {
        tracing::debug!("Could not move cursor to ({}, {})", x, y);
    }

    for event in [MouseButtonEvent::LeftDown, MouseButtonEvent::LeftUp] {
        if !platform.send_mouse_button(event) {
            tracing::debug!("Could not send {:?} at ({}, {})", event, x, y);
        }
    }
}
