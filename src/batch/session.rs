/// Rate-limit session state
///
/// Lives for as long as the owning client. A chunked batch trips it; it stays
/// active for one rate window after the most recent chunked request and then
/// clears itself. `reset` clears it immediately.
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct RateLimitState {
    last_burst: Option<Instant>,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record chunked traffic at `now`
    pub fn trip(&mut self, now: Instant) {
        self.last_burst = Some(now);
    }

    /// Whether lookups at `now` still fall inside the window of the last burst
    pub fn is_active(&self, now: Instant, window: Duration) -> bool {
        self.last_burst
            .map_or(false, |at| now.saturating_duration_since(at) < window)
    }

    /// Drop an expired burst; returns whether the session is still active
    pub fn clear_expired(&mut self, now: Instant, window: Duration) -> bool {
        let active = self.is_active(now, window);
        if !active {
            self.last_burst = None;
        }
        active
    }

    pub fn reset(&mut self) {
        self.last_burst = None;
    }

    pub fn last_burst(&self) -> Option<Instant> {
        self.last_burst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(100);

    #[test]
    fn test_inactive_by_default() {
        let state = RateLimitState::new();
        assert!(!state.is_active(Instant::now(), WINDOW));
    }

    #[test]
    fn test_active_within_window_then_expires() {
        let mut state = RateLimitState::new();
        let start = Instant::now();
        state.trip(start);

        assert!(state.is_active(start + Duration::from_secs(99), WINDOW));
        assert!(!state.is_active(start + Duration::from_secs(100), WINDOW));
        // Querying leaves the burst in place
        assert_eq!(state.last_burst(), Some(start));

        assert!(!state.clear_expired(start + Duration::from_secs(100), WINDOW));
        assert!(state.last_burst().is_none());
        assert!(!state.is_active(start + Duration::from_secs(1), WINDOW));
    }

    #[test]
    fn test_clear_expired_keeps_active_burst() {
        let mut state = RateLimitState::new();
        let start = Instant::now();
        state.trip(start);

        assert!(state.clear_expired(start + Duration::from_secs(50), WINDOW));
        assert_eq!(state.last_burst(), Some(start));
    }

    #[test]
    fn test_retrip_extends_window() {
        let mut state = RateLimitState::new();
        let start = Instant::now();
        state.trip(start);
        state.trip(start + Duration::from_secs(60));

        assert!(state.is_active(start + Duration::from_secs(150), WINDOW));
    }

    #[test]
    fn test_reset() {
        let mut state = RateLimitState::new();
        let now = Instant::now();
        state.trip(now);
        state.reset();
        assert!(!state.is_active(now, WINDOW));
    }
}
