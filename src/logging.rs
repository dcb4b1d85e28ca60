use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{runtime_paths, DESKTOP_LOG_FILE};

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    match root_dir {
        Some(root) => root.join("logs").join(file_name),
        None => std::env::temp_dir().join(file_name),
    }
}

fn append_line_to(path: &Path, category: &str, message: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    writeln!(file, "{timestamp} [{category}] {message}")
}

fn append_log(category: &str, message: &str) {
    let path = resolve_desktop_log_path(runtime_paths::resolve_app_root_dir(), DESKTOP_LOG_FILE);
    if append_line_to(&path, category, message).is_err() {
        eprintln!("[{category}] {message}");
    }
}

pub(crate) fn append_startup_log(message: &str) {
    append_log("startup", message);
}

pub(crate) fn append_desktop_log(message: &str) {
    append_log("desktop", message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_log("shutdown", message);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{append_line_to, resolve_desktop_log_path};

    #[test]
    fn resolve_desktop_log_path_nests_under_root_logs() {
        let path = resolve_desktop_log_path(Some(PathBuf::from("/tmp/frameflow")), "desktop.log");
        assert_eq!(path, PathBuf::from("/tmp/frameflow/logs/desktop.log"));
    }

    #[test]
    fn resolve_desktop_log_path_falls_back_to_temp_dir() {
        let path = resolve_desktop_log_path(None, "desktop.log");
        assert!(path.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn append_line_to_writes_timestamped_category_line() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("logs").join("desktop.log");

        append_line_to(&path, "startup", "first line").expect("append should succeed");
        append_line_to(&path, "shutdown", "second line").expect("append should succeed");

        let contents = std::fs::read_to_string(&path).expect("read log");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[startup] first line"));
        assert!(lines[1].contains("[shutdown] second line"));
    }
}
