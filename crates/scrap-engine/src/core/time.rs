use std::time::Duration;

/// Frame timing: clamped delta, total time, frame index and an optional
/// frame-rate cap.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Deltas above this are clamped (debugger pauses, window drags).
    max_dt: f32,
    target_fps: Option<f32>,
    dt: f32,
    total: f64,
    frame: u64,
}

impl FrameClock {
    pub fn new(max_dt: f32, target_fps: Option<f32>) -> Self {
        Self {
            max_dt,
            target_fps: target_fps.filter(|fps| *fps > 0.0),
            dt: 0.0,
            total: 0.0,
            frame: 0,
        }
    }

    /// Start a new frame with the raw elapsed time. Returns the clamped delta.
    /// Negative or non-finite input counts as zero.
    pub fn advance(&mut self, raw_dt: f32) -> f32 {
        self.dt = if raw_dt.is_finite() && raw_dt > 0.0 {
            raw_dt.min(self.max_dt)
        } else {
            0.0
        };
        self.total += self.dt as f64;
        self.frame += 1;
        self.dt
    }

    /// Delta of the current frame in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Sum of clamped deltas.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn target_fps(&self) -> Option<f32> {
        self.target_fps
    }

    /// How long the host should sleep after a frame that took `frame_time`
    /// seconds to honour the target rate. `None` when uncapped or over budget.
    pub fn sleep_hint(&self, frame_time: f32) -> Option<Duration> {
        let budget = 1.0 / self.target_fps?;
        (frame_time < budget).then(|| Duration::from_secs_f32(budget - frame_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_clamped() {
        let mut clock = FrameClock::new(0.1, None);
        assert_eq!(clock.advance(0.016), 0.016);
        assert_eq!(clock.advance(2.0), 0.1);
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.advance(f32::NAN), 0.0);
        assert_eq!(clock.frame(), 4);
        assert!((clock.total() - 0.116).abs() < 1e-6);
    }

    #[test]
    fn sleep_hint_honours_target() {
        let clock = FrameClock::new(0.1, Some(50.0));
        let hint = clock.sleep_hint(0.005).unwrap();
        assert!((hint.as_secs_f32() - 0.015).abs() < 1e-4);
        assert!(clock.sleep_hint(0.05).is_none());

        let uncapped = FrameClock::new(0.1, Some(0.0));
        assert!(uncapped.sleep_hint(0.0).is_none());
    }
}
