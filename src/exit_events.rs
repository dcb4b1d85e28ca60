use tauri::{AppHandle, Manager};

use crate::{append_shutdown_log, backend_process_lifecycle, BackendState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitDecision {
    QuitApp,
    StayResident,
}

/// Window-close quit policy: macOS keeps the app resident after the last
/// window closes, everything else quits. An explicit exit code means the
/// shell itself requested termination and always wins.
pub(crate) fn decide_exit_requested(
    resident_platform: bool,
    explicit_exit: bool,
) -> ExitDecision {
    if resident_platform && !explicit_exit {
        ExitDecision::StayResident
    } else {
        ExitDecision::QuitApp
    }
}

pub(crate) fn platform_keeps_app_resident() -> bool {
    cfg!(target_os = "macos")
}

/// Runs on `ExitRequested`. The backend is killed either way; the return
/// value tells the caller whether to `prevent_exit`.
pub(crate) fn should_stay_resident(app_handle: &AppHandle, exit_code: Option<i32>) -> bool {
    let state = app_handle.state::<BackendState>();
    let port = state.current_port();
    if backend_process_lifecycle::stop_backend(&state) {
        match port {
            Some(port) => {
                append_shutdown_log(&format!("backend on port {port} terminated on window close"))
            }
            None => append_shutdown_log("backend process terminated on window close"),
        }
    }

    match decide_exit_requested(platform_keeps_app_resident(), exit_code.is_some()) {
        ExitDecision::StayResident => {
            append_shutdown_log("all windows closed, staying resident for reactivation");
            true
        }
        ExitDecision::QuitApp => false,
    }
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    let state = app_handle.state::<BackendState>();
    if backend_process_lifecycle::stop_backend(&state) {
        append_shutdown_log("backend process terminated on exit");
    }
    append_shutdown_log("desktop process exiting");
}

#[cfg(test)]
mod tests {
    use super::{decide_exit_requested, ExitDecision};

    #[test]
    fn window_close_quits_on_non_resident_platforms() {
        assert_eq!(decide_exit_requested(false, false), ExitDecision::QuitApp);
    }

    #[test]
    fn window_close_keeps_resident_platforms_alive() {
        assert_eq!(
            decide_exit_requested(true, false),
            ExitDecision::StayResident
        );
    }

    #[test]
    fn explicit_exit_always_quits() {
        assert_eq!(decide_exit_requested(true, true), ExitDecision::QuitApp);
        assert_eq!(decide_exit_requested(false, true), ExitDecision::QuitApp);
    }
}
