//! Periodic timers on a virtual millisecond clock.
//!
//! Everything here runs on the control thread. The host advances the clock
//! (from `setInterval`, a UI frame callback, or an offline render loop) and
//! the owner of the [`Scheduler`] polls it for the intervals that came due,
//! one at a time and in chronological order. Because firing is pull-based, an
//! interval cleared while handling an earlier tick is never fired again, even
//! if its due time falls inside the same advance.

/// Shortest period an interval may have. Zero-length periods are floored
/// here, which mirrors the browser's clamp on nested timers.
pub const MIN_TICK_INTERVAL_MS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Interval {
    id: TimerId,
    period_ms: f64,
    next_due_ms: f64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: f64,
    next_id: u64,
    intervals: Vec<Interval>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Register a repeating interval. The first tick is one period from now.
    pub fn set_interval(&mut self, period_ms: f64) -> TimerId {
        let period_ms = if period_ms.is_finite() {
            period_ms.max(MIN_TICK_INTERVAL_MS)
        } else {
            MIN_TICK_INTERVAL_MS
        };
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.intervals.push(Interval {
            id,
            period_ms,
            next_due_ms: self.now_ms + period_ms,
        });
        log::trace!(target: "synth::timer", "interval {} every {period_ms} ms", id.0);
        id
    }

    /// Cancel an interval. Returns false if it was not active.
    pub fn clear_interval(&mut self, id: TimerId) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|i| i.id != id);
        before != self.intervals.len()
    }

    /// Pop the next interval due at or before `deadline_ms`.
    ///
    /// The clock moves to that interval's due time and the interval is
    /// rescheduled one period later. Ties fire in registration order.
    pub fn poll(&mut self, deadline_ms: f64) -> Option<TimerId> {
        let next = self
            .intervals
            .iter_mut()
            .filter(|i| i.next_due_ms <= deadline_ms)
            .min_by(|a, b| {
                a.next_due_ms
                    .total_cmp(&b.next_due_ms)
                    .then(a.id.0.cmp(&b.id.0))
            })?;

        self.now_ms = self.now_ms.max(next.next_due_ms);
        next.next_due_ms += next.period_ms;
        Some(next.id)
    }

    /// Move the clock forward without firing anything.
    pub fn advance_to(&mut self, deadline_ms: f64) {
        self.now_ms = self.now_ms.max(deadline_ms);
    }

    pub fn active_count(&self) -> usize {
        self.intervals.len()
    }

    /// Cancel everything.
    pub fn clear_all(&mut self) {
        self.intervals.clear();
    }
}
