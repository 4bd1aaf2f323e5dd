use crate::domain::{ComposeRuntime, ServiceState};
use anyhow::{Result, bail};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Polls the compose runtime until the target service reports Up or a
/// deadline passes. Replaces a blind fixed sleep: a fast service unblocks
/// the run on the first probe, a dead one fails at the deadline.
pub struct ReadinessProber {
    runtime: Arc<dyn ComposeRuntime>,
    deadline: Duration,
    poll_interval: Duration,
}

impl ReadinessProber {
    pub fn new(
        runtime: Arc<dyn ComposeRuntime>,
        deadline: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            runtime,
            deadline,
            poll_interval,
        }
    }

    /// Blocks until `service` is Up. Failing the deadline is the fatal
    /// condition of the whole run.
    pub fn wait_until_ready(&self, service: &str) -> Result<()> {
        info!(
            "⏳ Waiting for {service} to report Up (deadline {:?})...",
            self.deadline
        );

        let started = Instant::now();

        loop {
            match self.runtime.query_state(service)? {
                ServiceState::Up => {
                    info!("✅ {service} is up");
                    return Ok(());
                }
                state => {
                    debug!("{service} reported {:?}", state);
                }
            }

            if started.elapsed() >= self.deadline {
                bail!(
                    "service '{service}' did not report Up within {:?}; \
                     inspect the container logs with 'docker compose logs {service}'",
                    self.deadline
                );
            }

            std::thread::sleep(self.poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockHost;

    fn prober(mock: Arc<MockHost>, deadline_ms: u64, interval_ms: u64) -> ReadinessProber {
        ReadinessProber::new(
            mock,
            Duration::from_millis(deadline_ms),
            Duration::from_millis(interval_ms),
        )
    }

    #[test]
    fn ready_service_returns_on_first_probe() {
        let mock = Arc::new(MockHost::new());
        mock.set_service_state("backend", ServiceState::Up);

        let result = prober(mock.clone(), 100, 10).wait_until_ready("backend");
        assert!(result.is_ok());

        let probes = mock
            .get_commands()
            .iter()
            .filter(|c| c.starts_with("compose:ps"))
            .count();
        assert_eq!(probes, 1);
    }

    #[test]
    fn down_service_fails_at_the_deadline_with_log_hint() {
        let mock = Arc::new(MockHost::new());
        mock.set_service_state("backend", ServiceState::Down);

        let err = prober(mock, 30, 10).wait_until_ready("backend").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("did not report Up"));
        assert!(message.contains("docker compose logs backend"));
    }

    #[test]
    fn late_service_is_caught_before_the_deadline() {
        let mock = Arc::new(MockHost::new());
        mock.set_service_state("backend", ServiceState::Down);

        let mock_clone = mock.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(25));
            mock_clone.set_service_state("backend", ServiceState::Up);
        });

        let result = prober(mock, 200, 10).wait_until_ready("backend");
        assert!(result.is_ok());
    }

    #[test]
    fn query_failure_propagates() {
        let mock = Arc::new(MockHost::new());
        mock.set_fail_on("compose_ps");

        assert!(prober(mock, 50, 10).wait_until_ready("backend").is_err());
    }
}
