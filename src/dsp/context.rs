//! Control-side handle onto a running signal graph.
//!
//! The control thread never touches render state directly. Every change is
//! queued as a [`GraphCommand`] and picked up by the [`Renderer`] at the start
//! of its next block, which is this crate's "set value at current time".

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use super::graph::SynthGraph;
use super::oscillator::Waveform;
use crate::error::ConfigError;

/// Lowest sample rate a context accepts, the same floor as a WebAudio
/// `AudioContext`.
pub const MIN_SAMPLE_RATE_HZ: f64 = 3000.0;

/// An automatable parameter in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeParam {
    OscillatorFrequency(usize),
    LfoFrequency(usize),
    Pan(usize),
    FilterCutoff,
    MasterGain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphCommand {
    SetParam { param: NodeParam, value: f64 },
    SetWaveform { voice: usize, waveform: Waveform },
    StartVoice(usize),
}

pub struct AudioContext {
    sample_rate: f64,
    commands: Sender<GraphCommand>,
}

impl AudioContext {
    /// Create a context and the renderer it controls.
    pub fn new(sample_rate: f64) -> Result<(Self, Renderer), ConfigError> {
        if !(sample_rate.is_finite() && sample_rate >= MIN_SAMPLE_RATE_HZ) {
            log::warn!(target: "synth::context", "sample rate {sample_rate} rejected");
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }
        let (tx, rx) = crossbeam_channel::unbounded();
        let context = AudioContext {
            sample_rate,
            commands: tx,
        };
        let renderer = Renderer {
            commands: rx,
            graph: SynthGraph::new(sample_rate, crate::VOICE_COUNT),
            frames_rendered: 0,
            closed: false,
        };
        log::debug!(target: "synth::context", "audio context created at {sample_rate} Hz");
        Ok((context, renderer))
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn set_value_at_time(&self, param: NodeParam, value: f64) {
        self.send(GraphCommand::SetParam { param, value });
    }

    pub fn set_waveform(&self, voice: usize, waveform: Waveform) {
        self.send(GraphCommand::SetWaveform { voice, waveform });
    }

    pub fn start_voice(&self, voice: usize) {
        self.send(GraphCommand::StartVoice(voice));
    }

    fn send(&self, command: GraphCommand) {
        log::trace!(target: "synth::context", "{command:?}");
        // A dropped renderer just means nobody is listening any more.
        if let Err(e) = self.commands.send(command) {
            log::debug!(target: "synth::context", "renderer gone, command dropped: {:?}", e.0);
        }
    }

    /// Release the graph. Commands already queued are still applied.
    pub fn close(self) {
        log::debug!(target: "synth::context", "audio context closed");
    }
}

/// Render-side half of an [`AudioContext`]. Move it to the audio thread.
pub struct Renderer {
    commands: Receiver<GraphCommand>,
    graph: SynthGraph,
    frames_rendered: u64,
    closed: bool,
}

impl Renderer {
    /// Render one block of interleaved stereo samples.
    pub fn render(&mut self, out: &mut [f32]) {
        self.drain_commands();
        if self.closed {
            out.fill(0.0);
        } else {
            self.graph.process(out);
        }
        self.frames_rendered += (out.len() / 2) as u64;
    }

    fn drain_commands(&mut self) {
        loop {
            match self.commands.try_recv() {
                Ok(command) => self.graph.apply(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        log::debug!(target: "synth::context", "context closed, renderer silenced");
                    }
                    self.closed = true;
                    break;
                }
            }
        }
    }

    /// Apply queued commands without rendering.
    pub fn sync(&mut self) {
        self.drain_commands();
    }

    pub fn graph(&self) -> &SynthGraph {
        &self.graph
    }

    /// Frames rendered so far, silent ones included.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
