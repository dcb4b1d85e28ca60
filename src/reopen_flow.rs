use tauri::{AppHandle, Manager};

use crate::{append_desktop_log, launch_flow, MAIN_WINDOW_LABEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReopenDecision {
    RecreateEverything,
    Ignore,
}

pub(crate) fn decide_reopen(main_window_exists: bool) -> ReopenDecision {
    if main_window_exists {
        ReopenDecision::Ignore
    } else {
        ReopenDecision::RecreateEverything
    }
}

/// macOS dock reactivation. With a live window this is a no-op; without one
/// the whole startup sequence runs again (fresh port, fresh backend, fresh
/// window).
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn handle_reopen(app_handle: &AppHandle) {
    match decide_reopen(app_handle.get_webview_window(MAIN_WINDOW_LABEL).is_some()) {
        ReopenDecision::Ignore => {
            append_desktop_log("reopen ignored, main window already exists");
        }
        ReopenDecision::RecreateEverything => {
            append_desktop_log("reopen with no main window, running full startup");
            if let Err(error) = launch_flow::run_full_startup(app_handle) {
                append_desktop_log(&format!("reopen startup failed: {error}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decide_reopen, ReopenDecision};

    #[test]
    fn reopen_with_a_live_window_is_a_no_op() {
        assert_eq!(decide_reopen(true), ReopenDecision::Ignore);
    }

    #[test]
    fn reopen_without_a_window_recreates_everything() {
        assert_eq!(decide_reopen(false), ReopenDecision::RecreateEverything);
    }
}
