//! Scale quantization: normalized control value → scale degree → frequency.

/// Semitone offsets of the scale degrees (natural minor, plus the octave).
pub const SCALE: [i32; 8] = [0, 2, 3, 5, 7, 8, 10, 12];

/// Frequency ratio of a semitone offset in 12-TET.
pub fn semitone_ratio(semitones: i32) -> f64 {
    2.0_f64.powf(semitones as f64 / 12.0)
}

/// Index of the scale degree selected by `normalized`.
///
/// `floor(normalized * (len - 1))`, clamped into the scale. Out-of-range
/// inputs (and NaN) land on the nearest end rather than being rejected.
pub fn degree_index(normalized: f64) -> usize {
    let last = SCALE.len() - 1;
    let raw = (normalized * last as f64).floor();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= last as f64 {
        last
    } else {
        raw as usize
    }
}

/// Quantize `normalized` to a scale degree above `base_frequency_hz`.
pub fn quantize(normalized: f64, base_frequency_hz: f64) -> f64 {
    base_frequency_hz * semitone_ratio(SCALE[degree_index(normalized)])
}
