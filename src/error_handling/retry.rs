//! Retry strategy for identifier extraction.

use std::time::Duration;

/// Delays between extraction attempts.
///
/// Yields `max_attempts - 1` delays; the delay before attempt `n` (counting
/// from 1) is `backoff * n`.
pub fn get_retry_strategy(max_attempts: u32, backoff: Duration) -> impl Iterator<Item = Duration> {
    (2..=max_attempts).map(move |attempt| backoff * attempt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalating_delays() {
        let delays: Vec<Duration> = get_retry_strategy(3, Duration::from_secs(3)).collect();
        assert_eq!(delays, vec![Duration::from_secs(6), Duration::from_secs(9)]);
    }

    #[test]
    fn test_single_attempt_never_retries() {
        assert_eq!(get_retry_strategy(1, Duration::from_secs(3)).count(), 0);
        assert_eq!(get_retry_strategy(0, Duration::from_secs(3)).count(), 0);
    }
}
