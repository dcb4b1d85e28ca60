use std::{process::Child, sync::atomic::Ordering};

use crate::BackendState;

/// Takes the handle out of the state, so a second call finds nothing and
/// sends nothing. Also stops the exit watcher before the kill so the watcher
/// does not report the shutdown as a crash.
pub(crate) fn stop_backend(state: &BackendState) -> bool {
    if let Ok(mut slot) = state.exit_watch_stop.lock() {
        if let Some(stop_flag) = slot.take() {
            stop_flag.store(true, Ordering::Relaxed);
        }
    }
    if let Ok(mut guard) = state.port.lock() {
        *guard = None;
    }

    let taken = match state.child.lock() {
        Ok(mut guard) => guard.take(),
        Err(_) => None,
    };
    match taken {
        Some(mut child) => {
            stop_child_process(&mut child);
            true
        }
        None => false,
    }
}

fn stop_child_process(child: &mut Child) {
    #[cfg(target_os = "windows")]
    {
        use std::process::{Command, Stdio};

        let _ = Command::new("taskkill")
            .args(["/pid", &child.id().to_string(), "/t", "/f"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        let _ = child.wait();
        return;
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = child.kill();
        let _ = child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::stop_backend;
    use crate::BackendState;

    #[test]
    fn stop_backend_without_a_child_is_a_no_op() {
        let state = BackendState::default();
        assert!(!stop_backend(&state));
    }

    #[cfg(unix)]
    #[test]
    fn stop_backend_signals_the_child_exactly_once() {
        use std::process::{Command, Stdio};

        let child = Command::new("sleep")
            .arg("30")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn sleep");
        let state = BackendState::default();
        state.record_backend(child, 5005);
        assert_eq!(state.current_port(), Some(5005));

        assert!(stop_backend(&state));
        assert!(!state.has_child());
        assert_eq!(state.current_port(), None);

        assert!(!stop_backend(&state));
    }
}
