use std::{
    env,
    net::{TcpStream, ToSocketAddrs},
    thread,
    time::{Duration, Instant},
};

use url::Url;

use crate::{
    BackendState, LaunchError, BACKEND_TIMEOUT_ENV, DEV_BACKEND_TIMEOUT_DEFAULT_MS,
    PACKAGED_BACKEND_TIMEOUT_FALLBACK_MS, READINESS_PING_TIMEOUT_MS,
};

/// Blocks until the backend accepts TCP connections, the child dies, or the
/// hard timeout elapses. Replaces the fixed startup delay the shell used to
/// rely on.
pub(crate) fn wait_for_backend(
    state: &BackendState,
    url: &Url,
    port: u16,
    packaged_mode: bool,
) -> Result<(), LaunchError> {
    let timeout = resolve_backend_timeout(packaged_mode);
    let start_time = Instant::now();
    let mut attempt = 0u32;

    loop {
        if ping_backend(url, READINESS_PING_TIMEOUT_MS) {
            return Ok(());
        }

        check_child_still_running(state)?;

        if let Some(limit) = timeout {
            if start_time.elapsed() >= limit {
                return Err(LaunchError::BackendNotReady {
                    port,
                    waited_ms: start_time.elapsed().as_millis(),
                });
            }
        }

        thread::sleep(readiness_poll_delay(attempt));
        attempt = attempt.saturating_add(1);
    }
}

fn check_child_still_running(state: &BackendState) -> Result<(), LaunchError> {
    let mut guard = state.child.lock().map_err(|_| LaunchError::BackendExited {
        status: "process handle lock poisoned".to_string(),
    })?;
    match guard.as_mut() {
        Some(child) => match child.try_wait() {
            Ok(Some(status)) => {
                *guard = None;
                Err(LaunchError::BackendExited {
                    status: status.to_string(),
                })
            }
            Ok(None) => Ok(()),
            Err(error) => Err(LaunchError::BackendExited {
                status: format!("status poll failed: {error}"),
            }),
        },
        None => Err(LaunchError::BackendExited {
            status: "process handle missing".to_string(),
        }),
    }
}

pub(crate) fn ping_backend(url: &Url, timeout_ms: u64) -> bool {
    let Some(host) = url.host_str().map(str::to_string) else {
        return false;
    };
    let port = url.port_or_known_default().unwrap_or(80);
    let timeout = Duration::from_millis(timeout_ms.max(50));

    let addrs = match (host.as_str(), port).to_socket_addrs() {
        Ok(addrs) => addrs.collect::<Vec<_>>(),
        Err(_) => return false,
    };
    addrs
        .iter()
        .any(|address| TcpStream::connect_timeout(address, timeout).is_ok())
}

/// Exponential backoff between probes, capped so a slow backend is still
/// noticed promptly.
pub(crate) fn readiness_poll_delay(attempt: u32) -> Duration {
    const BASE_MS: u64 = 200;
    const CAP_MS: u64 = 3_200;
    let delay_ms = BASE_MS.saturating_mul(1u64 << attempt.min(6));
    Duration::from_millis(delay_ms.min(CAP_MS))
}

fn resolve_backend_timeout(packaged_mode: bool) -> Option<Duration> {
    let parsed_ms = env::var(BACKEND_TIMEOUT_ENV)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok());
    backend_timeout(parsed_ms, packaged_mode)
}

/// A zero timeout disables the deadline in development; packaged builds
/// always keep a fallback so a dead backend cannot hang the shell forever.
pub(crate) fn backend_timeout(parsed_ms: Option<u64>, packaged_mode: bool) -> Option<Duration> {
    let default_ms = if packaged_mode {
        0
    } else {
        DEV_BACKEND_TIMEOUT_DEFAULT_MS
    };
    let timeout_ms = parsed_ms.unwrap_or(default_ms);

    if timeout_ms > 0 {
        return Some(Duration::from_millis(timeout_ms));
    }
    if packaged_mode {
        return Some(Duration::from_millis(PACKAGED_BACKEND_TIMEOUT_FALLBACK_MS));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{backend_timeout, ping_backend, readiness_poll_delay};
    use std::{net::TcpListener, time::Duration};
    use url::Url;

    #[test]
    fn readiness_poll_delay_grows_until_the_cap() {
        assert_eq!(readiness_poll_delay(0), Duration::from_millis(200));
        assert_eq!(readiness_poll_delay(1), Duration::from_millis(400));
        assert_eq!(readiness_poll_delay(4), Duration::from_millis(3200));
        assert_eq!(readiness_poll_delay(20), Duration::from_millis(3200));
    }

    #[test]
    fn backend_timeout_defaults_differ_between_modes() {
        assert_eq!(backend_timeout(None, false), Some(Duration::from_millis(20_000)));
        assert_eq!(
            backend_timeout(None, true),
            Some(Duration::from_millis(5 * 60 * 1000))
        );
    }

    #[test]
    fn backend_timeout_zero_disables_the_deadline_in_dev() {
        assert_eq!(backend_timeout(Some(0), false), None);
        assert_eq!(
            backend_timeout(Some(0), true),
            Some(Duration::from_millis(5 * 60 * 1000))
        );
        assert_eq!(
            backend_timeout(Some(1500), true),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn ping_backend_sees_a_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind an ephemeral port");
        let port = listener.local_addr().expect("local addr").port();
        let url = Url::parse(&format!("http://127.0.0.1:{port}")).expect("valid url");

        assert!(ping_backend(&url, 500));
    }

    #[test]
    fn ping_backend_fails_against_a_closed_port() {
        let port = portpicker::pick_unused_port().expect("a free port should exist");
        let url = Url::parse(&format!("http://127.0.0.1:{port}")).expect("valid url");

        assert!(!ping_backend(&url, 200));
    }
}
