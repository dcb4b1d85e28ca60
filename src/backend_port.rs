use crate::LaunchError;

/// One allocator call per startup cycle. The port is free at allocation time
/// only; the backend binds it moments later.
pub(crate) fn acquire_backend_port() -> Result<u16, LaunchError> {
    portpicker::pick_unused_port().ok_or(LaunchError::PortAllocation)
}

pub(crate) fn backend_url_for_port(port: u16) -> String {
    format!("http://localhost:{port}")
}

#[cfg(test)]
mod tests {
    use super::{acquire_backend_port, backend_url_for_port};

    #[test]
    fn backend_url_uses_the_allocated_port() {
        assert_eq!(backend_url_for_port(5005), "http://localhost:5005");
    }

    #[test]
    fn acquire_backend_port_finds_a_port() {
        let port = acquire_backend_port().expect("a free port should exist");
        assert!(port > 0);
    }
}
