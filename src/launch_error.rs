use std::io;

/// Failures on the path from "app started" to "window shows the backend".
#[derive(Debug, thiserror::Error)]
pub(crate) enum LaunchError {
    #[error("no free TCP port is available for the backend")]
    PortAllocation,

    #[error("failed to resolve backend launch plan: {0}")]
    LaunchPlan(String),

    #[error("failed to spawn backend process `{command}`: {source}")]
    Spawn { command: String, source: io::Error },

    #[error("failed to create main window: {0}")]
    Window(String),

    #[error("backend on port {port} did not become ready within {waited_ms}ms")]
    BackendNotReady { port: u16, waited_ms: u128 },

    #[error("backend process exited before becoming ready: {status}")]
    BackendExited { status: String },
}

#[cfg(test)]
mod tests {
    use super::LaunchError;

    #[test]
    fn backend_not_ready_names_port_and_wait() {
        let error = LaunchError::BackendNotReady {
            port: 5005,
            waited_ms: 20_000,
        };
        let message = error.to_string();
        assert!(message.contains("5005"));
        assert!(message.contains("20000ms"));
    }

    #[test]
    fn spawn_error_names_the_command() {
        let error = LaunchError::Spawn {
            command: "python app.py".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(error.to_string().contains("python app.py"));
    }
}
