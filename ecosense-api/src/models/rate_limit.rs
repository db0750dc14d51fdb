use serde::{Deserialize, Serialize};

/// Throttling state of the remote vision service.
///
/// `cooldown_seconds > 0` always implies `throttled`; counting down to zero clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitState {
    pub throttled: bool,
    pub cooldown_seconds: u32,
}

impl RateLimitState {
    /// Enters (or restarts) the throttled state.
    pub fn trip(&mut self, cooldown_seconds: u32) {
        self.throttled = cooldown_seconds > 0;
        self.cooldown_seconds = cooldown_seconds;
    }

    /// Advances the countdown by one second. Returns `true` while still throttled.
    pub fn tick(&mut self) -> bool {
        self.cooldown_seconds = self.cooldown_seconds.saturating_sub(1);
        if self.cooldown_seconds == 0 {
            self.throttled = false;
        }

        self.throttled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_reaches_nominal() {
        let mut state = RateLimitState::default();
        state.trip(90);
        assert!(state.throttled);

        for _ in 0..89 {
            assert!(state.tick());
        }
        assert_eq!(state.cooldown_seconds, 1);

        assert!(!state.tick());
        assert_eq!(state, RateLimitState::default());
    }

    #[test]
    fn test_trip_restarts_countdown() {
        let mut state = RateLimitState::default();
        state.trip(90);
        for _ in 0..10 {
            state.tick();
        }
        assert_eq!(state.cooldown_seconds, 80);

        state.trip(90);
        assert_eq!(state.cooldown_seconds, 90);
        assert!(state.throttled);
    }

    #[test]
    fn test_tick_when_nominal_is_noop() {
        let mut state = RateLimitState::default();

        assert!(!state.tick());
        assert_eq!(state.cooldown_seconds, 0);
    }
}
