use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

use crate::{
    append_desktop_log, append_startup_log, LaunchError, MAIN_WINDOW_HEIGHT, MAIN_WINDOW_LABEL,
    MAIN_WINDOW_TITLE, MAIN_WINDOW_WIDTH,
};

pub(crate) fn create_main_window(app_handle: &AppHandle) -> Result<WebviewWindow, LaunchError> {
    WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::App("index.html".into()),
    )
    .title(MAIN_WINDOW_TITLE)
    .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
    .build()
    .map_err(|error| LaunchError::Window(error.to_string()))
}

pub(crate) fn navigate_to_backend(window: &WebviewWindow, url: &str) -> Result<(), String> {
    let js = format!(
        "window.location.replace({});",
        serde_json::to_string(url).unwrap_or_else(|_| "\"/\"".to_string())
    );
    window
        .eval(&js)
        .map_err(|error| format!("Failed to navigate main window to backend: {error}"))
}

/// Renders the failure into whatever page the window currently shows, so the
/// user sees a diagnosable message rather than a blank webview.
pub(crate) fn show_launch_failure(app_handle: &AppHandle, error: &LaunchError) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("launch failure with no main window to show it in");
        return;
    };

    let js = format!(
        "document.body.innerHTML = {};",
        serde_json::to_string(&failure_markup(&error.to_string()))
            .unwrap_or_else(|_| "\"FrameFlow failed to start.\"".to_string())
    );
    if let Err(eval_error) = window.eval(&js) {
        append_desktop_log(&format!("failed to render launch failure: {eval_error}"));
    }
}

pub(crate) fn failure_markup(message: &str) -> String {
    format!(
        "<main style=\"font-family: sans-serif; padding: 2em;\">\
         <h2>FrameFlow failed to start</h2>\
         <p>{}</p>\
         <p>See <code>logs/desktop.log</code> under the FrameFlow data directory.</p>\
         </main>",
        html_escape(message)
    )
}

fn html_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Startup cannot continue without a backend; log, tell the terminal, and
/// exit with a failure code.
pub(crate) fn show_startup_error(app_handle: &AppHandle, error: &LaunchError) {
    append_startup_log(&format!("startup failed: {error}"));
    eprintln!("FrameFlow startup failed: {error}");
    app_handle.exit(1);
}

#[cfg(test)]
mod tests {
    use super::{failure_markup, html_escape};

    #[test]
    fn failure_markup_carries_the_error_text() {
        let markup = failure_markup("backend on port 5005 did not become ready within 20000ms");
        assert!(markup.contains("5005"));
        assert!(markup.contains("FrameFlow failed to start"));
    }

    #[test]
    fn failure_markup_escapes_html_in_paths() {
        let markup = failure_markup("bad path <resources>/backend");
        assert!(markup.contains("&lt;resources&gt;"));
        assert!(!markup.contains("<resources>"));
    }

    #[test]
    fn html_escape_handles_ampersands_first() {
        assert_eq!(html_escape("a & <b>"), "a &amp; &lt;b&gt;");
    }
}
