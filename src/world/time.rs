/// Fixed timestep accumulator.
/// Converts variable frame times into a whole number of fixed physics steps.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    /// The fixed delta time per step, in seconds.
    dt: f64,
    /// Accumulated time from variable frame deltas.
    accumulator: f64,
    max_steps: u32,
    /// Time discarded by the last `accumulate` because of the step cap.
    dropped: f64,
}

impl FixedTimestep {
    pub fn new(dt: f64, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps,
            dropped: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    /// At most `max_steps` are returned; time beyond that is dropped.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        self.dropped = 0.0;
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }

        let cap = self.dt * self.max_steps as f64;
        if self.accumulator > cap {
            self.dropped = self.accumulator - cap;
            self.accumulator = cap;
        }

        let steps = ((self.accumulator / self.dt) as u32).min(self.max_steps);
        self.accumulator -= steps as f64 * self.dt;
        steps
    }

    /// Seconds discarded by the most recent `accumulate`.
    pub fn dropped(&self) -> f64 {
        self.dropped
    }

    /// Interpolation alpha for rendering between steps (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Changes the step size, keeping any accumulated time.
    pub fn set_dt(&mut self, dt: f64) {
        self.dt = dt;
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.dropped = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 8);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
        assert_eq!(ts.dropped(), 0.0);
    }

    #[test]
    fn test_accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 8);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn test_caps_steps_and_reports_dropped_time() {
        let mut ts = FixedTimestep::new(0.1, 8);
        assert_eq!(ts.accumulate(2.0), 8);
        assert!((ts.dropped() - 1.2).abs() < 1e-9);
        assert!(ts.alpha() < 1e-6);
    }

    #[test]
    fn test_ignores_non_positive_frames() {
        let mut ts = FixedTimestep::new(0.1, 8);
        assert_eq!(ts.accumulate(-1.0), 0);
        assert_eq!(ts.accumulate(f64::NAN), 0);
        assert_eq!(ts.alpha(), 0.0);
    }

    #[test]
    fn test_alpha_is_between_zero_and_one() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 8);
        ts.accumulate(0.008);
        let a = ts.alpha();
        assert!((0.0..=1.0).contains(&a), "alpha was {}", a);
    }
}
