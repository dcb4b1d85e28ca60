use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    append_startup_log, BackendState, LaunchError, LaunchPlan, BACKEND_LOG_FILE, BACKEND_PORT_ENV,
};

/// Spawns the backend with the allocated port injected into its environment.
/// The parent environment is inherited; only `PORT` and python stream
/// settings are added on top.
pub(crate) fn start_backend_process(
    state: &BackendState,
    plan: &LaunchPlan,
    port: u16,
) -> Result<(), LaunchError> {
    if state.has_child() {
        append_startup_log("backend process already running, skipping spawn");
        return Ok(());
    }

    ensure_directory(&plan.cwd).map_err(LaunchError::LaunchPlan)?;
    if let Some(root_dir) = &plan.root_dir {
        ensure_directory(root_dir).map_err(LaunchError::LaunchPlan)?;
    }

    let mut command = backend_command(plan, port);
    attach_backend_log(&mut command, plan.root_dir.as_deref()).map_err(LaunchError::LaunchPlan)?;

    let child = command.spawn().map_err(|source| LaunchError::Spawn {
        command: plan.display_command(),
        source,
    })?;
    state.record_backend(child, port);
    append_startup_log(&format!(
        "backend process spawned on port {port}: {}",
        plan.display_command()
    ));
    Ok(())
}

pub(crate) fn backend_command(plan: &LaunchPlan, port: u16) -> Command {
    let mut command = Command::new(&plan.cmd);
    command
        .args(&plan.args)
        .current_dir(&plan.cwd)
        .stdin(Stdio::null())
        .env(BACKEND_PORT_ENV, port.to_string())
        .env("PYTHONUNBUFFERED", "1");
    command
}

fn ensure_directory(dir: &Path) -> Result<(), String> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)
        .map_err(|error| format!("Failed to create directory {}: {}", dir.display(), error))
}

fn attach_backend_log(command: &mut Command, root_dir: Option<&Path>) -> Result<(), String> {
    let Some(log_path) = backend_log_path(root_dir) else {
        command.stdout(Stdio::null());
        command.stderr(Stdio::null());
        return Ok(());
    };

    if let Some(log_parent) = log_path.parent() {
        fs::create_dir_all(log_parent).map_err(|error| {
            format!(
                "Failed to create backend log directory {}: {}",
                log_parent.display(),
                error
            )
        })?;
    }
    let stdout_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|error| format!("Failed to open backend log {}: {}", log_path.display(), error))?;
    let stderr_file = stdout_file
        .try_clone()
        .map_err(|error| format!("Failed to clone backend log handle: {error}"))?;
    command.stdout(Stdio::from(stdout_file));
    command.stderr(Stdio::from(stderr_file));
    Ok(())
}

fn backend_log_path(root_dir: Option<&Path>) -> Option<PathBuf> {
    root_dir.map(|root| root.join("logs").join(BACKEND_LOG_FILE))
}

#[cfg(test)]
mod tests {
    use super::{backend_command, backend_log_path};
    use crate::LaunchPlan;
    use std::{ffi::OsStr, path::Path};

    fn plan() -> LaunchPlan {
        LaunchPlan {
            cmd: "python3".to_string(),
            args: vec!["app.py".to_string()],
            cwd: std::env::temp_dir(),
            root_dir: None,
            packaged_mode: false,
        }
    }

    #[test]
    fn backend_command_injects_the_allocated_port() {
        let command = backend_command(&plan(), 5005);

        assert_eq!(command.get_program(), OsStr::new("python3"));
        let port_value = command
            .get_envs()
            .find(|(key, _)| *key == OsStr::new("PORT"))
            .and_then(|(_, value)| value);
        assert_eq!(port_value, Some(OsStr::new("5005")));
    }

    #[test]
    fn backend_command_passes_the_script_argument() {
        let command = backend_command(&plan(), 5005);
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec![OsStr::new("app.py")]);
    }

    #[test]
    fn backend_log_path_requires_a_root_dir() {
        assert_eq!(backend_log_path(None), None);
        assert_eq!(
            backend_log_path(Some(Path::new("/tmp/frameflow"))),
            Some(Path::new("/tmp/frameflow/logs/backend.log").to_path_buf())
        );
    }
}
