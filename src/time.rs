//! Fixed-timestep clock for the passive-income tick.
//!
//! `draw_web()` は可変間隔 (~60fps) で呼ばれる。GameClock はそれを 1 秒単位の
//! tick に変換する。スロットリングされたタブのように数秒止まったフレームも
//! 全額 tick として払う。`max_gap_ms` を超える空白はオフライン精算の担当で、
//! ホストが精算後に [`GameClock::resync`] を呼ぶので同じ区間を二重に払わない。

/// Milliseconds per passive-income tick.
pub const TICK_MS: f64 = 1000.0;

pub struct GameClock {
    /// Largest frame gap paid as live play. Set to the offline threshold so
    /// every gap is paid by exactly one of the two paths.
    max_gap_ms: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameClock {
    pub fn new(max_gap_ms: f64) -> Self {
        Self {
            max_gap_ms,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp. Returns the number of whole ticks elapsed.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, self.max_gap_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / TICK_MS) as u32;
        self.accumulator -= ticks as f64 * TICK_MS;
        self.total_ticks += ticks as u64;
        ticks
    }

    /// Forget any partial tick and restart timing from `now_ms`.
    pub fn resync(&mut self, now_ms: f64) {
        self.accumulator = 0.0;
        self.last_timestamp = Some(now_ms);
    }
}
