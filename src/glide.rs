//! Glide (portamento) as an explicit, cancellable scheduled task.
//!
//! A glide owns at most one periodic timer. Each tick moves `current` toward
//! `target` by `lerp(current, target, t)` and advances `t` by [`GLIDE_STEP`];
//! once `t` reaches 1 the timer is cancelled and `current` is pinned to the
//! target exactly. Retargeting cancels the running timer before the new one
//! is registered, so there is never more than one in flight.
//!
//! `t` grows while `current` is re-based every tick, so the curve is an
//! accelerating ease-in rather than a straight line, and the total duration
//! is 100 ticks of the period captured when the glide started.

use crate::timer::{Scheduler, TimerId};

/// Increment of the interpolation parameter per tick.
pub const GLIDE_STEP: f64 = 0.01;

/// What a glide drives, for logging and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlideKind {
    Pitch,
    LfoRate,
}

#[derive(Debug, Clone)]
pub struct Glide {
    kind: GlideKind,
    current: f64,
    target: f64,
    t: f64,
    timer: Option<TimerId>,
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Glide {
    /// An idle glide resting at `initial`.
    pub fn new(kind: GlideKind, initial: f64) -> Self {
        Glide {
            kind,
            current: initial,
            target: initial,
            t: 0.0,
            timer: None,
        }
    }

    pub fn kind(&self) -> GlideKind {
        self.kind
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    pub fn owns(&self, id: TimerId) -> bool {
        self.timer == Some(id)
    }

    /// Start gliding from wherever we are now toward `target`, one tick
    /// every `period_ms`. Cancels any glide already in flight.
    pub fn retarget(&mut self, target: f64, period_ms: f64, scheduler: &mut Scheduler) {
        self.cancel(scheduler);
        self.target = target;
        self.t = 0.0;
        self.timer = Some(scheduler.set_interval(period_ms));
    }

    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.timer.take() {
            scheduler.clear_interval(id);
        }
    }

    /// Advance one tick and return the value to write to the parameter.
    pub fn step(&mut self, scheduler: &mut Scheduler) -> f64 {
        self.current = lerp(self.current, self.target, self.t);
        self.t += GLIDE_STEP;
        if self.t >= 1.0 {
            self.cancel(scheduler);
            self.current = self.target;
        }
        self.current
    }
}
