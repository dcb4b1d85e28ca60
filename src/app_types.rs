use serde::Deserialize;
use std::{
    path::PathBuf,
    process::Child,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

/// Contents of the packaged `runtime-manifest.json` resource. Both paths are
/// relative to the directory the manifest sits in.
#[derive(Debug, Deserialize)]
pub(crate) struct RuntimeManifest {
    pub(crate) interpreter: Option<String>,
    pub(crate) entrypoint: Option<String>,
}

/// Fully resolved command for bringing up the backend process.
#[derive(Debug)]
pub(crate) struct LaunchPlan {
    pub(crate) cmd: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
    pub(crate) root_dir: Option<PathBuf>,
    pub(crate) packaged_mode: bool,
}

impl LaunchPlan {
    pub(crate) fn display_command(&self) -> String {
        let mut parts = vec![self.cmd.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Single owner of the backend subprocess and its port. Managed as Tauri
/// state; absence is modelled with explicit `None`.
#[derive(Debug)]
pub(crate) struct BackendState {
    pub(crate) child: Mutex<Option<Child>>,
    pub(crate) port: Mutex<Option<u16>>,
    pub(crate) exit_watch_stop: Mutex<Option<Arc<AtomicBool>>>,
    pub(crate) is_spawning: AtomicBool,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            child: Mutex::new(None),
            port: Mutex::new(None),
            exit_watch_stop: Mutex::new(None),
            is_spawning: AtomicBool::new(false),
        }
    }
}

impl BackendState {
    pub(crate) fn record_backend(&self, child: Child, port: u16) {
        if let Ok(mut guard) = self.child.lock() {
            *guard = Some(child);
        }
        if let Ok(mut guard) = self.port.lock() {
            *guard = Some(port);
        }
    }

    pub(crate) fn current_port(&self) -> Option<u16> {
        self.port.lock().map(|guard| *guard).unwrap_or(None)
    }

    pub(crate) fn has_child(&self) -> bool {
        self.child
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}
