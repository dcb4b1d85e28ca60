use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use tauri::{AppHandle, Manager};

use crate::{append_desktop_log, main_window, BackendState, LaunchError};

const WATCH_INTERVAL: Duration = Duration::from_secs(1);

/// Observes the running backend so a crash surfaces in the log and the
/// window instead of leaving a dead page. Replaces any previous watcher.
pub(crate) fn spawn_exit_watcher(app_handle: AppHandle) {
    let stop_flag = Arc::new(AtomicBool::new(false));
    {
        let state = app_handle.state::<BackendState>();
        let Ok(mut slot) = state.exit_watch_stop.lock() else {
            return;
        };
        if let Some(previous) = slot.replace(stop_flag.clone()) {
            previous.store(true, Ordering::Relaxed);
        }
    }

    thread::spawn(move || watch_loop(&app_handle, &stop_flag));
}

fn watch_loop(app_handle: &AppHandle, stop_flag: &AtomicBool) {
    loop {
        if stop_flag.load(Ordering::Relaxed) {
            return;
        }

        let state = app_handle.state::<BackendState>();
        let exit_status = {
            let Ok(mut guard) = state.child.lock() else {
                return;
            };
            let Some(child) = guard.as_mut() else {
                return;
            };
            match child.try_wait() {
                Ok(Some(status)) => {
                    *guard = None;
                    Some(status.to_string())
                }
                Ok(None) => None,
                Err(error) => {
                    append_desktop_log(&format!("backend status poll failed: {error}"));
                    return;
                }
            }
        };

        if let Some(status) = exit_status {
            let error = LaunchError::BackendExited { status };
            append_desktop_log(&format!("backend died while the shell was running: {error}"));
            main_window::show_launch_failure(app_handle, &error);
            return;
        }

        thread::sleep(WATCH_INTERVAL);
    }
}
