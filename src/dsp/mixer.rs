//! Mixer — Sums stereo voice outputs into one bus with master gain.

/// A stereo summing bus that accumulates audio from multiple voices.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f64,
    left: Vec<f64>,
    right: Vec<f64>,
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            master_gain: 1.0,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Prepare `num_frames` of silence.
    pub fn clear(&mut self, num_frames: usize) {
        self.left.clear();
        self.left.resize(num_frames, 0.0);
        self.right.clear();
        self.right.resize(num_frames, 0.0);
    }

    /// Add a stereo frame at the given index.
    pub fn add(&mut self, index: usize, left: f64, right: f64) {
        if index < self.left.len() {
            self.left[index] += left;
            self.right[index] += right;
        }
    }

    /// Mutable access to the summed bus, for in-place bus processing.
    pub fn channels_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.left, &mut self.right)
    }

    /// Write the bus, scaled by master gain, as interleaved stereo.
    pub fn write_interleaved(&self, out: &mut [f32]) {
        for (frame, (l, r)) in out
            .chunks_exact_mut(2)
            .zip(self.left.iter().zip(self.right.iter()))
        {
            frame[0] = (l * self.master_gain) as f32;
            frame[1] = (r * self.master_gain) as f32;
        }
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}
