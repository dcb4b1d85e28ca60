use std::{env, path::PathBuf};

use crate::APP_ROOT_ENV;

/// Per-user data root for logs and backend state. `FRAMEFLOW_ROOT` wins over
/// the `~/.frameflow` default.
pub(crate) fn resolve_app_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(APP_ROOT_ENV) {
        let trimmed = root.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    home::home_dir().map(|home| home.join(".frameflow"))
}

pub(crate) fn workspace_root_dir() -> PathBuf {
    let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    candidate
        .canonicalize()
        .unwrap_or_else(|_| candidate.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::workspace_root_dir;

    #[test]
    fn workspace_root_dir_points_at_the_crate() {
        assert!(workspace_root_dir().join("Cargo.toml").is_file());
    }
}
