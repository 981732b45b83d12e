use std::time::{Duration, Instant};

/// Fixed-budget frame pacing with frame-time statistics.
///
/// Each frame sleeps for what is left of `1000 / frame_rate` ms after its
/// own work. Frames that overrun the budget do not sleep; the overrun is not
/// paid back later, so drift accumulates.
///
/// # Example
/// ```
/// use aa_render::pacing::FrameClock;
/// let clock = FrameClock::new(30);
/// assert_eq!(clock.budget().as_millis(), 33);
/// assert!(clock.average_ms().abs() < f64::EPSILON);
/// ```
pub struct FrameClock {
    budget: Duration,
    started: Option<Instant>,
    total: Duration,
    frames: u32,
    /// Temps de la dernière frame en ms (hors sommeil).
    pub frame_time_ms: f64,
}

impl FrameClock {
    /// Clock for `frame_rate` frames per second (0 is treated as 1).
    #[must_use]
    pub fn new(frame_rate: u32) -> Self {
        Self {
            budget: Duration::from_secs(1) / frame_rate.max(1),
            started: None,
            total: Duration::ZERO,
            frames: 0,
            frame_time_ms: 0.0,
        }
    }

    /// Per-frame time budget.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Appeler au début de chaque frame, AVANT le rendu.
    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Record the elapsed time since `begin` and return how long to sleep.
    ///
    /// `None` when the frame overran its budget.
    pub fn end(&mut self) -> Option<Duration> {
        let elapsed = self.started.take().map_or(Duration::ZERO, |t| t.elapsed());
        self.record(elapsed)
    }

    /// Record the elapsed time since `begin`, then sleep out the budget.
    pub fn end_and_wait(&mut self) {
        match self.end() {
            Some(rest) => std::thread::sleep(rest),
            None => log::debug!(
                "Frame en retard : {:.2} ms > {} ms",
                self.frame_time_ms,
                self.budget.as_millis()
            ),
        }
    }

    /// Account for one frame of `elapsed` work.
    pub fn record(&mut self, elapsed: Duration) -> Option<Duration> {
        self.total += elapsed;
        self.frames += 1;
        self.frame_time_ms = elapsed.as_secs_f64() * 1000.0;
        self.budget.checked_sub(elapsed)
    }

    /// Number of frames recorded.
    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Mean frame work time in ms over the run, 0 before the first frame.
    #[must_use]
    pub fn average_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.total.as_secs_f64() * 1000.0 / f64::from(self.frames)
    }
}
