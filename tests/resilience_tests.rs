use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tunnelup::ReadinessProber;
use tunnelup::ServiceState;
use tunnelup::test_support::MockHost;

fn prober(mock: Arc<MockHost>, deadline_ms: u64, interval_ms: u64) -> ReadinessProber {
    ReadinessProber::new(
        mock,
        Duration::from_millis(deadline_ms),
        Duration::from_millis(interval_ms),
    )
}

#[test]
fn test_readiness_deadline_is_bounded() -> Result<()> {
    // A dead service must fail close to the deadline, not hang.
    let mock = Arc::new(MockHost::new());
    mock.set_service_state("backend", ServiceState::Down);

    let start = Instant::now();
    let result = prober(mock, 50, 10).wait_until_ready("backend");
    let duration = start.elapsed();

    assert!(result.is_err());
    assert!(
        duration < Duration::from_secs(1),
        "readiness loop hung too long: {:?}",
        duration
    );
    assert!(
        duration >= Duration::from_millis(50),
        "readiness loop gave up before the deadline: {:?}",
        duration
    );

    Ok(())
}

#[test]
fn test_readiness_tolerates_a_slow_starter() -> Result<()> {
    // The service flips to Up mid-wait; the poll loop must catch it
    // instead of burning the whole deadline.
    let mock = Arc::new(MockHost::new());
    mock.set_service_state("backend", ServiceState::Down);

    let mock_clone = mock.clone();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        mock_clone.set_service_state("backend", ServiceState::Up);
    });

    let start = Instant::now();
    let result = prober(mock, 500, 10).wait_until_ready("backend");
    let duration = start.elapsed();

    assert!(result.is_ok());
    assert!(
        duration < Duration::from_millis(400),
        "poll loop did not pick up the state change promptly: {:?}",
        duration
    );

    Ok(())
}

#[test]
fn test_readiness_probes_repeatedly_not_once() -> Result<()> {
    let mock = Arc::new(MockHost::new());
    mock.set_service_state("backend", ServiceState::Down);

    let _ = prober(mock.clone(), 60, 10).wait_until_ready("backend");

    let probes = mock
        .get_commands()
        .iter()
        .filter(|c| c.starts_with("compose:ps"))
        .count();
    assert!(
        probes >= 3,
        "expected repeated probes before the deadline, saw {probes}"
    );

    Ok(())
}
