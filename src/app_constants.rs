pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_TITLE: &str = "FrameFlow";
pub(crate) const MAIN_WINDOW_WIDTH: f64 = 1200.0;
pub(crate) const MAIN_WINDOW_HEIGHT: f64 = 800.0;

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const BACKEND_LOG_FILE: &str = "backend.log";

pub(crate) const APP_ROOT_ENV: &str = "FRAMEFLOW_ROOT";
pub(crate) const BACKEND_CMD_ENV: &str = "FRAMEFLOW_BACKEND_CMD";
pub(crate) const BACKEND_CWD_ENV: &str = "FRAMEFLOW_BACKEND_CWD";
pub(crate) const BACKEND_TIMEOUT_ENV: &str = "FRAMEFLOW_BACKEND_TIMEOUT_MS";

/// The backend's only contract with the shell: serve HTTP on this port.
pub(crate) const BACKEND_PORT_ENV: &str = "PORT";

pub(crate) const BACKEND_MANIFEST_RESOURCE: &str = "backend/runtime-manifest.json";
pub(crate) const DEV_BACKEND_SCRIPT: &str = "app.py";

pub(crate) const READINESS_PING_TIMEOUT_MS: u64 = 800;
pub(crate) const DEV_BACKEND_TIMEOUT_DEFAULT_MS: u64 = 20_000;
pub(crate) const PACKAGED_BACKEND_TIMEOUT_FALLBACK_MS: u64 = 5 * 60 * 1000;
