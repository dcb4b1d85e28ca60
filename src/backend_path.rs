use std::{
    env,
    path::{Path, PathBuf},
};

use tauri::{path::BaseDirectory, AppHandle, Manager};

use crate::{
    runtime_paths, LaunchError, LaunchPlan, RuntimeManifest, BACKEND_CMD_ENV, BACKEND_CWD_ENV,
    BACKEND_MANIFEST_RESOURCE, DEV_BACKEND_SCRIPT,
};

/// Resolution order: explicit command override, packaged resources, then the
/// development venv next to the crate.
pub(crate) fn resolve_launch_plan(app: &AppHandle) -> Result<LaunchPlan, LaunchError> {
    if let Some(custom_cmd) = env::var(BACKEND_CMD_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        return resolve_custom_launch(&custom_cmd).map_err(LaunchError::LaunchPlan);
    }

    if let Some(plan) = resolve_packaged_launch(app).map_err(LaunchError::LaunchPlan)? {
        return Ok(plan);
    }

    resolve_dev_launch().map_err(LaunchError::LaunchPlan)
}

fn resolve_custom_launch(custom_cmd: &str) -> Result<LaunchPlan, String> {
    let (cmd, args) = parse_custom_backend_cmd(custom_cmd)?;
    let cwd = env::var(BACKEND_CWD_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| runtime_paths::workspace_root_dir());

    Ok(LaunchPlan {
        cmd,
        args,
        cwd,
        root_dir: runtime_paths::resolve_app_root_dir(),
        packaged_mode: false,
    })
}

pub(crate) fn parse_custom_backend_cmd(raw: &str) -> Result<(String, Vec<String>), String> {
    let mut pieces =
        shlex::split(raw).ok_or_else(|| format!("Invalid {BACKEND_CMD_ENV}: {raw}"))?;
    if pieces.is_empty() {
        return Err(format!("{BACKEND_CMD_ENV} is empty."));
    }
    Ok((pieces.remove(0), pieces))
}

fn resolve_packaged_launch(app: &AppHandle) -> Result<Option<LaunchPlan>, String> {
    let manifest_path = match resolve_resource_path(app, BACKEND_MANIFEST_RESOURCE) {
        Some(path) if path.is_file() => path,
        _ => return Ok(None),
    };
    let backend_dir = manifest_path
        .parent()
        .ok_or_else(|| format!("Invalid backend manifest path: {}", manifest_path.display()))?;

    let manifest_text = std::fs::read_to_string(&manifest_path).map_err(|error| {
        format!(
            "Failed to read backend manifest {}: {}",
            manifest_path.display(),
            error
        )
    })?;
    let manifest = parse_runtime_manifest(&manifest_text)
        .map_err(|error| format!("Failed to parse {}: {}", manifest_path.display(), error))?;

    let (interpreter_path, script_path) = manifest_launch_paths(&manifest, backend_dir);
    if !interpreter_path.is_file() {
        return Err(format!(
            "Packaged backend interpreter is missing: {}",
            interpreter_path.display()
        ));
    }
    if !script_path.is_file() {
        return Err(format!(
            "Packaged backend entrypoint is missing: {}",
            script_path.display()
        ));
    }

    let root_dir = runtime_paths::resolve_app_root_dir();
    let cwd = env::var(BACKEND_CWD_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            root_dir
                .clone()
                .unwrap_or_else(|| backend_dir.to_path_buf())
        });

    Ok(Some(LaunchPlan {
        cmd: interpreter_path.to_string_lossy().to_string(),
        args: vec![script_path.to_string_lossy().to_string()],
        cwd,
        root_dir,
        packaged_mode: true,
    }))
}

pub(crate) fn parse_runtime_manifest(text: &str) -> Result<RuntimeManifest, String> {
    serde_json::from_str(text).map_err(|error| error.to_string())
}

pub(crate) fn manifest_launch_paths(
    manifest: &RuntimeManifest,
    backend_dir: &Path,
) -> (PathBuf, PathBuf) {
    let interpreter_relative = manifest
        .interpreter
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(default_interpreter_relative);
    let entrypoint_relative = manifest
        .entrypoint
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEV_BACKEND_SCRIPT));

    (
        backend_dir.join(interpreter_relative),
        backend_dir.join(entrypoint_relative),
    )
}

fn default_interpreter_relative() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("python").join("Scripts").join("python.exe")
    } else {
        PathBuf::from("python").join("bin").join("python3")
    }
}

pub(crate) fn dev_interpreter_relative() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("venv").join("Scripts").join("python.exe")
    } else {
        PathBuf::from("venv").join("bin").join("python3")
    }
}

fn resolve_dev_launch() -> Result<LaunchPlan, String> {
    let workspace_root = runtime_paths::workspace_root_dir();
    let interpreter_path = workspace_root.join(dev_interpreter_relative());
    if !interpreter_path.is_file() {
        return Err(format!(
            "Development interpreter is missing: {}. Create the backend venv or set {}.",
            interpreter_path.display(),
            BACKEND_CMD_ENV
        ));
    }

    let script_path = workspace_root.join(DEV_BACKEND_SCRIPT);
    if !script_path.is_file() {
        return Err(format!(
            "Development backend script is missing: {}",
            script_path.display()
        ));
    }

    Ok(LaunchPlan {
        cmd: interpreter_path.to_string_lossy().to_string(),
        args: vec![script_path.to_string_lossy().to_string()],
        cwd: env::var(BACKEND_CWD_ENV)
            .map(PathBuf::from)
            .unwrap_or(workspace_root),
        root_dir: runtime_paths::resolve_app_root_dir(),
        packaged_mode: false,
    })
}

fn resolve_resource_path(app: &AppHandle, relative_path: &str) -> Option<PathBuf> {
    app.path()
        .resolve(relative_path, BaseDirectory::Resource)
        .ok()
}
