//! Signal nodes
//!
//! Nodes operate in place on interleaved stereo f32 samples in [-1.0, 1.0].
//!
//! Available nodes:
//! - **BandFilter**: one equalizer band (low shelf, peaking or high shelf)
//! - **Analyser** (in [`crate::analyser`]): pass-through FFT tap

mod band;
mod node;

pub use band::{BandFilter, FilterKind, BAND_Q};
pub use node::AudioNode;
