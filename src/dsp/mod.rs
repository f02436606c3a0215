//! The render side of the synth.
//!
//! Everything under here runs per sample on the audio thread and is driven
//! only through the command queue in [`context`]. The same code powers the
//! AudioWorklet (via WASM) and offline WAV bounces.

pub mod context;
pub mod filter;
pub mod graph;
pub mod mixer;
pub mod oscillator;
pub mod panner;
pub mod wav;
