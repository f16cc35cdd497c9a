//! Frame delta computation

/// Turns host timestamps into per-tick deltas.
///
/// The first tick after creation or `reset` sees a delta of zero. Deltas that
/// go backwards or are not finite become zero, and long gaps (a backgrounded
/// tab, a debugger pause) are clamped so entities don't jump across the world.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record `now` (ms) and return the clamped delta since the previous call
    pub fn advance(&mut self, now: f64, max_delta: f64) -> f64 {
        let diff = match self.last {
            Some(then) => now - then,
            None => 0.0,
        };
        self.last = Some(now);

        if !diff.is_finite() || diff < 0.0 {
            0.0
        } else {
            diff.min(max_delta)
        }
    }

    /// Forget the previous timestamp so the next tick starts from zero
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<f64> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1234.0, 250.0), 0.0);
        assert_eq!(clock.advance(1250.0, 250.0), 16.0);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0, 250.0);
        assert_eq!(clock.advance(60_000.0, 250.0), 250.0);
        // Next delta is measured from the late timestamp, not the clamped one
        assert_eq!(clock.advance(60_010.0, 250.0), 10.0);
    }

    #[test]
    fn test_backwards_and_nan_are_zero() {
        let mut clock = FrameClock::new();
        clock.advance(100.0, 250.0);
        assert_eq!(clock.advance(50.0, 250.0), 0.0);
        assert_eq!(clock.advance(f64::NAN, 250.0), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.advance(100.0, 250.0);
        clock.reset();
        assert_eq!(clock.last(), None);
        assert_eq!(clock.advance(5000.0, 250.0), 0.0);
    }
}
