//! Frequency analysis tap
//!
//! Pass-through node that keeps the most recent `fft_size` mono samples and,
//! on request, turns them into one byte per frequency bin:
//!
//! 1. Blackman window over the time-ordered ring
//! 2. Forward FFT, magnitude scaled by `1/N`
//! 3. Exponential smoothing against the previous frame
//! 4. Map `[min_db, max_db]` linearly onto `0..=255`

use crate::effects::AudioNode;
use crate::error::{AudioError, Result};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::sync::Arc;

pub const MIN_FFT_SIZE: usize = 32;
pub const MAX_FFT_SIZE: usize = 32768;

/// Analyser configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyserSettings {
    /// Window length in samples (power of two)
    pub fft_size: usize,
    /// Time smoothing constant in [0, 1)
    pub smoothing: f32,
    /// Magnitude mapped to byte 0
    pub min_db: f32,
    /// Magnitude mapped to byte 255
    pub max_db: f32,
}

impl Default for AnalyserSettings {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
        }
    }
}

impl AnalyserSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(AudioError::InvalidConfig(format!(
                "fft_size must be a power of two in [{MIN_FFT_SIZE}, {MAX_FFT_SIZE}], got {}",
                self.fft_size
            )));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(AudioError::InvalidConfig(format!(
                "smoothing must be in [0, 1), got {}",
                self.smoothing
            )));
        }
        if self.min_db.partial_cmp(&self.max_db) != Some(std::cmp::Ordering::Less) {
            return Err(AudioError::InvalidConfig(format!(
                "min_db ({}) must be below max_db ({})",
                self.min_db, self.max_db
            )));
        }
        Ok(())
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }
}

/// FFT analyser tap
pub struct Analyser {
    settings: AnalyserSettings,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    /// Mono history, oldest sample at `write_pos`
    ring: Vec<f32>,
    write_pos: usize,
    received: bool,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes, one per bin
    smoothed: Vec<f32>,
}

impl std::fmt::Debug for Analyser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyser")
            .field("settings", &self.settings)
            .field("received", &self.received)
            .finish_non_exhaustive()
    }
}

impl Analyser {
    pub fn new(settings: AnalyserSettings) -> Result<Self> {
        settings.validate()?;

        let n = settings.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        let scratch_len = fft.get_inplace_scratch_len();

        Ok(Self {
            settings,
            fft,
            window: blackman_window(n),
            ring: vec![0.0; n],
            write_pos: 0,
            received: false,
            spectrum: vec![Complex::new(0.0, 0.0); n],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            smoothed: vec![0.0; settings.frequency_bin_count()],
        })
    }

    pub fn settings(&self) -> &AnalyserSettings {
        &self.settings
    }

    pub fn fft_size(&self) -> usize {
        self.settings.fft_size
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.settings.frequency_bin_count()
    }

    /// Whether any audio has passed through since creation or the last reset
    pub fn has_data(&self) -> bool {
        self.received
    }

    /// Append interleaved stereo samples, downmixed to mono
    pub fn push_interleaved(&mut self, buffer: &[f32]) {
        for frame in buffer.chunks_exact(2) {
            self.push_sample((frame[0] + frame[1]) * 0.5);
        }
    }

    fn push_sample(&mut self, sample: f32) {
        self.ring[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.ring.len();
        self.received = true;
    }

    /// Fill `out` with byte magnitudes for the current window
    ///
    /// Writes `min(out.len(), frequency_bin_count())` entries and returns that count.
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) -> usize {
        self.analyse();

        let range = self.settings.max_db - self.settings.min_db;
        let scale = 255.0 / range;
        let written = out.len().min(self.smoothed.len());

        for (byte, &magnitude) in out.iter_mut().zip(&self.smoothed) {
            let db = if magnitude > 0.0 {
                20.0 * magnitude.log10()
            } else {
                f32::NEG_INFINITY
            };
            let scaled = (scale * (db - self.settings.min_db)).floor();
            *byte = if scaled.is_nan() {
                0
            } else {
                scaled.clamp(0.0, 255.0) as u8
            };
        }

        written
    }

    /// Convenience wrapper returning a fresh vector
    pub fn byte_frequency_vec(&mut self) -> Vec<u8> {
        let mut out = vec![0u8; self.frequency_bin_count()];
        self.byte_frequency_data(&mut out);
        out
    }

    fn analyse(&mut self) {
        let n = self.ring.len();
        for i in 0..n {
            let sample = self.ring[(self.write_pos + i) % n];
            self.spectrum[i] = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        let tau = self.settings.smoothing;
        let norm = 1.0 / n as f32;
        for (prev, bin) in self.smoothed.iter_mut().zip(&self.spectrum) {
            let magnitude = bin.norm() * norm;
            let next = tau * *prev + (1.0 - tau) * magnitude;
            *prev = if next.is_finite() { next } else { 0.0 };
        }
    }
}

impl AudioNode for Analyser {
    /// Observe the buffer without modifying it
    fn process(&mut self, buffer: &mut [f32], _sample_rate: u32) {
        self.push_interleaved(buffer);
    }

    fn reset(&mut self) {
        self.ring.fill(0.0);
        self.smoothed.fill(0.0);
        self.write_pos = 0;
        self.received = false;
    }

    fn name(&self) -> &str {
        "analyser"
    }
}

fn blackman_window(n: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            A0 - A1 * (2.0 * PI * x).cos() + A2 * (4.0 * PI * x).cos()
        })
        .collect()
}
