/// Equalizer band filter
///
/// One RBJ biquad per band. Centre frequency and Q are fixed at construction;
/// only the gain changes at runtime. Coefficient changes are smoothed per
/// sample so gain slider drags do not click.
use super::node::AudioNode;
use serde::{Deserialize, Serialize};

/// Q used by every default band
pub const BAND_Q: f32 = 1.0;

/// Smoothing coefficient for exponential coefficient interpolation.
/// 0.002 at 44.1kHz gives a time constant of roughly 11ms.
const SMOOTH_COEFF: f32 = 0.002;

/// Filter shape of a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Boosts/cuts below the frequency
    LowShelf,
    /// Boosts/cuts around the frequency with Q bandwidth
    Peaking,
    /// Boosts/cuts above the frequency
    HighShelf,
}

impl FilterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowShelf => "lowshelf",
            Self::Peaking => "peaking",
            Self::HighShelf => "highshelf",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Coefficients {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Coefficients {
    const NEUTRAL: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    #[inline]
    fn approach(&mut self, target: &Self) {
        self.b0 += SMOOTH_COEFF * (target.b0 - self.b0);
        self.b1 += SMOOTH_COEFF * (target.b1 - self.b1);
        self.b2 += SMOOTH_COEFF * (target.b2 - self.b2);
        self.a1 += SMOOTH_COEFF * (target.a1 - self.a1);
        self.a2 += SMOOTH_COEFF * (target.a2 - self.a2);
    }

    fn design(kind: FilterKind, sample_rate: f32, frequency: f32, q: f32, gain_db: f32) -> Self {
        let a = 10.0_f32.powf(gain_db / 40.0);
        // Keep well clear of Nyquist
        let clamped_freq = frequency.min(sample_rate * 0.45);
        let omega = 2.0 * std::f32::consts::PI * clamped_freq / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();

        let (b0, b1, b2, a0, a1, a2) = match kind {
            FilterKind::Peaking => {
                let alpha = sin_omega / (2.0 * q);
                (
                    1.0 + alpha * a,
                    -2.0 * cos_omega,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos_omega,
                    1.0 - alpha / a,
                )
            }
            FilterKind::LowShelf => {
                let alpha = sin_omega / 2.0 * ((a + 1.0 / a) * (1.0 / q - 1.0) + 2.0).sqrt();
                let beta = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_omega + beta),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega),
                    a * ((a + 1.0) - (a - 1.0) * cos_omega - beta),
                    (a + 1.0) + (a - 1.0) * cos_omega + beta,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega),
                    (a + 1.0) + (a - 1.0) * cos_omega - beta,
                )
            }
            FilterKind::HighShelf => {
                let alpha = sin_omega / 2.0 * ((a + 1.0 / a) * (1.0 / q - 1.0) + 2.0).sqrt();
                let beta = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_omega + beta),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega),
                    a * ((a + 1.0) + (a - 1.0) * cos_omega - beta),
                    (a + 1.0) - (a - 1.0) * cos_omega + beta,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_omega),
                    (a + 1.0) - (a - 1.0) * cos_omega - beta,
                )
            }
        };

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl ChannelState {
    #[inline]
    fn tick(&mut self, c: &Coefficients, input: f32) -> f32 {
        let mut out = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        // Flush denormals
        if out.abs() < 1e-15 {
            out = 0.0;
        }

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = out;
        out
    }
}

/// A single equalizer band
#[derive(Debug, Clone)]
pub struct BandFilter {
    kind: FilterKind,
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: u32,
    target: Coefficients,
    active: Coefficients,
    left: ChannelState,
    right: ChannelState,
}

impl BandFilter {
    /// Create a band at 0 dB
    pub fn new(kind: FilterKind, frequency: f32, q: f32) -> Self {
        Self {
            kind,
            frequency,
            q: q.clamp(0.1, 10.0),
            gain_db: 0.0,
            sample_rate: 0,
            target: Coefficients::NEUTRAL,
            active: Coefficients::NEUTRAL,
            left: ChannelState::default(),
            right: ChannelState::default(),
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    /// Gain the filter is currently designed for (dB)
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Change the gain; the response glides to the new value
    pub fn set_gain_db(&mut self, gain_db: f32) {
        if gain_db == self.gain_db {
            return;
        }
        self.gain_db = gain_db;
        self.update_target();
    }

    /// Bind the filter to a sample rate and jump straight to the target response
    pub fn prepare(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
        self.update_target();
        self.reset();
    }

    fn update_target(&mut self) {
        if self.sample_rate == 0 {
            return;
        }
        self.target = Coefficients::design(
            self.kind,
            self.sample_rate as f32,
            self.frequency,
            self.q,
            self.gain_db,
        );
    }
}

impl AudioNode for BandFilter {
    fn process(&mut self, buffer: &mut [f32], sample_rate: u32) {
        if sample_rate == 0 {
            return;
        }
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.update_target();
        }

        for frame in buffer.chunks_exact_mut(2) {
            self.active.approach(&self.target);
            frame[0] = self.left.tick(&self.active, frame[0]);
            frame[1] = self.right.tick(&self.active, frame[1]);
        }
    }

    /// Clear sample history and snap to the target coefficients
    fn reset(&mut self) {
        self.left = ChannelState::default();
        self.right = ChannelState::default();
        self.active = self.target;
    }

    fn name(&self) -> &str {
        self.kind.as_str()
    }
}
