//! Simulated time.
//!
//! The simulation never looks at the wall clock. [`Time`] only advances
//! when a step is taken, by exactly that step's `dt`, so a run is fully
//! determined by its configuration and its sequence of time steps.
//!
//! # Example
//!
//! ```ignore
//! use weather_sim::time::Time;
//!
//! let mut time = Time::new().with_limit(Some(50.0 / 24.0));
//! while !time.is_finished() {
//!     time.advance(1.0 / 24.0);
//! }
//! assert_eq!(time.frame(), 50);
//! ```

/// Elapsed simulated time and frame count.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Time {
    /// Total simulated seconds. Kept in f64 so long runs do not drift.
    elapsed: f64,
    /// Length of the most recent step.
    delta: f32,
    /// Steps taken since the last reset.
    frame: u64,
    /// Simulated seconds after which the run is over.
    limit: Option<f64>,
}

impl Time {
    /// Time zero with no limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the simulated time after which [`is_finished`](Self::is_finished) reports true.
    pub fn with_limit(mut self, limit: Option<f64>) -> Self {
        self.limit = limit;
        self
    }

    /// Move forward by one step of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt;
        self.elapsed += f64::from(dt);
        self.frame += 1;
    }

    /// Total simulated seconds.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Length of the most recent step.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of steps taken.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Configured limit in seconds.
    #[inline]
    pub fn limit(&self) -> Option<f64> {
        self.limit
    }

    /// Whether elapsed time has reached the limit.
    ///
    /// The limit counts as reached once less than half of the last step
    /// remains, so `n` steps of `dt` finish a limit of `n * dt` however the
    /// two were rounded.
    pub fn is_finished(&self) -> bool {
        self.limit
            .is_some_and(|limit| self.elapsed + f64::from(self.delta) * 0.5 >= limit)
    }

    /// Back to time zero, keeping the limit.
    pub fn reset(&mut self) {
        *self = Self {
            limit: self.limit,
            ..Self::default()
        };
    }
}
