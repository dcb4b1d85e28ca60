use tauri::{AppHandle, Manager, WebviewWindow};
use url::Url;

use crate::{
    append_startup_log, backend_launch, backend_path, backend_port, backend_process_lifecycle,
    backend_readiness, backend_watch, main_window, AtomicFlagGuard, BackendState, LaunchError,
};

/// The full startup sequence: port, backend process, window, readiness,
/// navigation. Used by both initial startup and macOS reactivation; any
/// backend left over from a previous window's lifetime is stopped first so
/// reactivation cannot leak a process.
pub(crate) fn run_full_startup(app_handle: &AppHandle) -> Result<(), LaunchError> {
    let state = app_handle.state::<BackendState>();
    let Some(_spawn_guard) = AtomicFlagGuard::try_set(&state.is_spawning) else {
        append_startup_log("startup already in progress, skipping");
        return Ok(());
    };

    if backend_process_lifecycle::stop_backend(&state) {
        append_startup_log("stopped stale backend process before relaunch");
    }

    let port = backend_port::acquire_backend_port()?;
    let plan = backend_path::resolve_launch_plan(app_handle)?;
    let packaged_mode = plan.packaged_mode;
    backend_launch::start_backend_process(&state, &plan, port)?;

    let window = main_window::create_main_window(app_handle)?;
    append_startup_log(&format!(
        "main window created, waiting for backend on port {port}"
    ));

    let backend_url = backend_port::backend_url_for_port(port);
    let ping_url = Url::parse(&backend_url)
        .map_err(|error| LaunchError::LaunchPlan(format!("invalid backend url: {error}")))?;

    let task_handle = app_handle.clone();
    tauri::async_runtime::spawn_blocking(move || {
        finish_startup(&task_handle, &window, &ping_url, &backend_url, port, packaged_mode);
    });

    Ok(())
}

fn finish_startup(
    app_handle: &AppHandle,
    window: &WebviewWindow,
    ping_url: &Url,
    backend_url: &str,
    port: u16,
    packaged_mode: bool,
) {
    let state = app_handle.state::<BackendState>();
    if let Err(error) = backend_readiness::wait_for_backend(&state, ping_url, port, packaged_mode) {
        append_startup_log(&format!("backend never became ready: {error}"));
        backend_process_lifecycle::stop_backend(&state);
        main_window::show_launch_failure(app_handle, &error);
        return;
    }

    match main_window::navigate_to_backend(window, backend_url) {
        Ok(()) => {
            append_startup_log(&format!("main window navigated to {backend_url}"));
            backend_watch::spawn_exit_watcher(app_handle.clone());
        }
        Err(error) => append_startup_log(&error),
    }
}
