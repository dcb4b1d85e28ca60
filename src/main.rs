#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod backend_launch;
mod backend_path;
mod backend_port;
mod backend_process_lifecycle;
mod backend_readiness;
mod backend_watch;
mod exit_events;
mod launch_error;
mod launch_flow;
mod logging;
mod main_window;
mod reopen_flow;
mod runtime_paths;

pub(crate) use app_constants::*;
pub(crate) use app_types::{AtomicFlagGuard, BackendState, LaunchPlan, RuntimeManifest};
pub(crate) use launch_error::LaunchError;
pub(crate) use logging::{append_desktop_log, append_shutdown_log, append_startup_log};

fn main() {
    app_runtime::run();
}
