use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::{Duration, Instant};

/// How to wait for the detail pane after a click.
///
/// `Fixed` is a blind sleep that races render completion against the read.
/// `Poll` checks a readiness condition on an interval until a deadline, which
/// is the stronger strategy and the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitMode {
    Fixed,
    Poll,
}

pub fn settle_fixed(ms: u64) {
    info!("Waiting {} ms for the detail pane to render...", ms);
    thread::sleep(Duration::from_millis(ms));
}

/// Poll `ready` every `poll_ms` until it returns true or `max_ms` elapses.
/// Returns whether the condition was met before the deadline.
pub fn settle_until<F: FnMut() -> bool>(poll_ms: u64, max_ms: u64, mut ready: F) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if ready() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(poll_ms));
    }
}

/// Jittered pause between items so we don't hammer the page.
pub fn item_delay(min_ms: u64, max_ms: u64) {
    let mut rng = rand::thread_rng();
    let delay_ms = rng.gen_range(min_ms..=max_ms.max(min_ms));
    info!("Waiting {} ms before the next card...", delay_ms);
    thread::sleep(Duration::from_millis(delay_ms));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_until_stops_when_ready() {
        let mut calls = 0;
        let met = settle_until(1, 1000, || {
            calls += 1;
            calls >= 3
        });
        assert!(met);
        assert_eq!(calls, 3);
    }

    #[test]
    fn settle_until_gives_up_at_deadline() {
        let met = settle_until(1, 5, || false);
        assert!(!met);
    }

    #[test]
    fn wait_mode_round_trips_through_config_json() {
        let mode: WaitMode = serde_json::from_str("\"fixed\"").unwrap();
        assert_eq!(mode, WaitMode::Fixed);
        assert_eq!(serde_json::to_string(&WaitMode::Poll).unwrap(), "\"poll\"");
    }
}
