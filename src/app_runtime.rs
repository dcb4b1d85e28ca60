use tauri::{Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_startup_log, exit_events, launch_flow, logging, main_window,
    runtime_paths, BackendState, DESKTOP_LOG_FILE, MAIN_WINDOW_LABEL,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(runtime_paths::resolve_app_root_dir(), DESKTOP_LOG_FILE)
            .display()
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
                let _ = window.unminimize();
                let _ = window.set_focus();
            }
        }))
        .manage(BackendState::default())
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }
            if let WindowEvent::Destroyed = event {
                append_desktop_log("main window destroyed");
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            if let Err(error) = launch_flow::run_full_startup(&app_handle) {
                main_window::show_startup_error(&app_handle, &error);
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                if exit_events::should_stay_resident(app_handle, code) {
                    api.prevent_exit();
                }
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen {
                has_visible_windows: false,
                ..
            } => {
                crate::reopen_flow::handle_reopen(app_handle);
            }
            _ => {}
        });
}
