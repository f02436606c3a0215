//! Equal-power stereo panner for a mono source (WebAudio StereoPannerNode).

use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy)]
pub struct StereoPanner {
    /// -1.0 = hard left, 0.0 = center, 1.0 = hard right.
    pan: f64,
    left_gain: f64,
    right_gain: f64,
}

impl StereoPanner {
    pub fn new(pan: f64) -> Self {
        let mut p = StereoPanner {
            pan: 0.0,
            left_gain: 0.0,
            right_gain: 0.0,
        };
        p.set_pan(pan);
        p
    }

    pub fn pan(&self) -> f64 {
        self.pan
    }

    pub fn set_pan(&mut self, pan: f64) {
        self.pan = pan.clamp(-1.0, 1.0);
        let x = (self.pan + 1.0) / 2.0;
        self.left_gain = (x * FRAC_PI_2).cos();
        self.right_gain = (x * FRAC_PI_2).sin();
    }

    /// Split a mono sample into (left, right).
    pub fn process(&self, input: f64) -> (f64, f64) {
        (input * self.left_gain, input * self.right_gain)
    }
}
