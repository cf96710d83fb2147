//! Tonearm Audio
//!
//! The audio signal path of a Tonearm player:
//! source → band filters (equalizer) → analyser tap → output.
//!
//! This crate provides:
//! - Biquad band filters (low shelf, peaking, high shelf) with coefficient smoothing
//! - Equalizer state and the named preset table
//! - An FFT analyser tap producing byte frequency data
//! - The lazily attached [`SignalGraph`] that owns the chain
//! - The per-frame [`VisualizerSampler`]
//!
//! # Example
//!
//! ```rust
//! use tonearm_audio::{SignalGraph, GraphSettings};
//!
//! let mut graph = SignalGraph::new(GraphSettings::default()).unwrap();
//!
//! // Settings can change before the graph exists...
//! graph.apply_preset("Rock").unwrap();
//!
//! // ...and are applied when the first user gesture attaches it
//! graph.attach(44100).unwrap();
//! assert_eq!(graph.live_gain(0), Some(4.0));
//!
//! let mut buffer = vec![0.0f32; 512]; // Stereo samples
//! graph.process(&mut buffer);
//! ```

pub mod analyser;
pub mod effects;
pub mod equalizer;
mod error;
pub mod graph;
pub mod visualizer;

pub use analyser::{Analyser, AnalyserSettings};
pub use effects::{AudioNode, BandFilter, FilterKind};
pub use equalizer::{default_bands, BandSpec, EqPreset, EqualizerState, MAX_GAIN_DB, MIN_GAIN_DB};
pub use error::{AudioError, Result};
pub use graph::{GraphSettings, SignalGraph};
pub use visualizer::{FrequencyRenderer, VisualizerSampler};
