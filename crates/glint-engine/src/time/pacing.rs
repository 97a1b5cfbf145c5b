use std::time::Duration;

/// Sleeps out the remainder of each frame to hold a target frame rate.
///
/// The target interval is `1 / rate` seconds, kept at full precision
/// (16.67 ms for 60 Hz, not a truncated 16 ms).
#[derive(Debug, Copy, Clone)]
pub struct FramePacer {
    target: Duration,
}

impl FramePacer {
    /// Creates a pacer for `frames_per_second` (clamped to at least 1).
    pub fn new(frames_per_second: u32) -> Self {
        let rate = frames_per_second.max(1);
        Self {
            target: Duration::from_secs_f64(1.0 / rate as f64),
        }
    }

    #[inline]
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Remaining time to sleep after a frame that took `elapsed`.
    ///
    /// Equals `target - elapsed` when the frame finished early, zero when
    /// the frame overran. Never negative.
    #[inline]
    pub fn sleep_duration(&self, elapsed: Duration) -> Duration {
        self.target.saturating_sub(elapsed)
    }

    /// Blocks for the remainder of the frame, if any.
    pub fn pace(&self, elapsed: Duration) {
        let remaining = self.sleep_duration(elapsed);
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── sleep_duration ────────────────────────────────────────────────────

    #[test]
    fn fast_frame_sleeps_the_remainder() {
        let pacer = FramePacer::new(60);
        let elapsed = Duration::from_millis(4);
        assert_eq!(pacer.sleep_duration(elapsed), pacer.target() - elapsed);
    }

    #[test]
    fn slow_frame_never_goes_negative() {
        let pacer = FramePacer::new(60);
        assert_eq!(
            pacer.sleep_duration(Duration::from_millis(100)),
            Duration::ZERO
        );
    }

    #[test]
    fn exact_frame_sleeps_zero() {
        let pacer = FramePacer::new(60);
        assert_eq!(pacer.sleep_duration(pacer.target()), Duration::ZERO);
    }

    #[test]
    fn sixty_hertz_target_is_not_truncated() {
        let pacer = FramePacer::new(60);
        let millis = pacer.target().as_secs_f64() * 1000.0;
        assert!(millis > 16.0 && millis < 17.0, "target was {millis} ms");
    }

    #[test]
    fn zero_rate_is_clamped() {
        let pacer = FramePacer::new(0);
        assert_eq!(pacer.target(), Duration::from_secs(1));
    }
}
