//! Equalizer state and presets
//!
//! - Fixed band layout: low shelf, peaking mids, high shelf
//! - Per-band gain control (-12 to +12 dB)
//! - Named presets matched by exact name

use crate::effects::{FilterKind, BAND_Q};
use crate::error::{AudioError, Result};
use serde::{Deserialize, Serialize};

/// Lowest gain a band accepts (dB)
pub const MIN_GAIN_DB: f32 = -12.0;

/// Highest gain a band accepts (dB)
pub const MAX_GAIN_DB: f32 = 12.0;

/// Static description of one equalizer band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSpec {
    /// Centre (or corner) frequency in Hz
    pub frequency: f32,
    pub kind: FilterKind,
    /// Short label shown under the slider
    pub label: String,
    #[serde(default = "default_q")]
    pub q: f32,
}

fn default_q() -> f32 {
    BAND_Q
}

impl BandSpec {
    pub fn new(frequency: f32, kind: FilterKind, label: impl Into<String>) -> Self {
        Self {
            frequency,
            kind,
            label: label.into(),
            q: BAND_Q,
        }
    }
}

/// The five default bands: 60 Hz, 250 Hz, 1 kHz, 4 kHz, 16 kHz
pub fn default_bands() -> Vec<BandSpec> {
    vec![
        BandSpec::new(60.0, FilterKind::LowShelf, "60"),
        BandSpec::new(250.0, FilterKind::Peaking, "250"),
        BandSpec::new(1000.0, FilterKind::Peaking, "1k"),
        BandSpec::new(4000.0, FilterKind::Peaking, "4k"),
        BandSpec::new(16000.0, FilterKind::HighShelf, "16k"),
    ]
}

/// Filter kind for band `index` of `count`: lowest is a low shelf, highest a
/// high shelf, everything between peaking
pub fn kind_for_position(index: usize, count: usize) -> FilterKind {
    if index == 0 {
        FilterKind::LowShelf
    } else if index + 1 == count {
        FilterKind::HighShelf
    } else {
        FilterKind::Peaking
    }
}

/// Equalizer preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EqPreset {
    /// All bands at 0 dB
    #[default]
    Flat,
    Pop,
    Rock,
    Jazz,
    Classical,
    /// Enhanced low frequencies
    BassBoost,
}

impl EqPreset {
    /// Every preset in display order
    pub const ALL: [Self; 6] = [
        Self::Flat,
        Self::Pop,
        Self::Rock,
        Self::Jazz,
        Self::Classical,
        Self::BassBoost,
    ];

    /// Gain values for the five default bands
    pub fn gains(&self) -> [f32; 5] {
        match self {
            Self::Flat => [0.0; 5],
            Self::Pop => [2.0, 1.0, 0.0, 1.0, 3.0],
            Self::Rock => [4.0, 2.0, -2.0, 2.0, 4.0],
            Self::Jazz => [3.0, 1.0, 2.0, -1.0, 1.0],
            Self::Classical => [2.0, 1.0, 0.0, 1.0, 2.0],
            Self::BassBoost => [6.0, 4.0, 0.0, 0.0, 0.0],
        }
    }

    /// Get preset name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flat => "Flat",
            Self::Pop => "Pop",
            Self::Rock => "Rock",
            Self::Jazz => "Jazz",
            Self::Classical => "Classical",
            Self::BassBoost => "Bass Boost",
        }
    }

    /// Look up a preset by its exact name
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| AudioError::PresetNotFound(name.to_string()))
    }
}

impl std::fmt::Display for EqPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Stored band gains plus the enabled flag
///
/// The band count is fixed at construction. Disabling does not discard gains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizerState {
    gains: Vec<f32>,
    enabled: bool,
}

impl EqualizerState {
    /// Flat and enabled
    pub fn new(band_count: usize) -> Self {
        Self {
            gains: vec![0.0; band_count],
            enabled: true,
        }
    }

    pub fn band_count(&self) -> usize {
        self.gains.len()
    }

    /// Stored gains, regardless of the enabled flag
    pub fn gains(&self) -> &[f32] {
        &self.gains
    }

    pub fn gain(&self, band: usize) -> Option<f32> {
        self.gains.get(band).copied()
    }

    /// Set one band (clamped to [-12, 12] dB) and return the stored value
    pub fn set_gain(&mut self, band: usize, gain_db: f32) -> Result<f32> {
        let count = self.gains.len();
        let slot = self
            .gains
            .get_mut(band)
            .ok_or(AudioError::InvalidBand { index: band, count })?;
        *slot = clamp_gain(gain_db);
        Ok(*slot)
    }

    /// Overwrite every band at once
    pub fn set_all(&mut self, gains: &[f32]) -> Result<()> {
        if gains.len() != self.gains.len() {
            return Err(AudioError::InvalidConfig(format!(
                "expected {} gains, got {}",
                self.gains.len(),
                gains.len()
            )));
        }
        for (slot, gain) in self.gains.iter_mut().zip(gains) {
            *slot = clamp_gain(*gain);
        }
        Ok(())
    }

    /// Overwrite every band from a preset
    pub fn apply_preset(&mut self, preset: EqPreset) -> Result<()> {
        let gains = preset.gains();
        if gains.len() != self.gains.len() {
            return Err(AudioError::PresetBandMismatch {
                preset: preset.name().to_string(),
                expected: gains.len(),
                actual: self.gains.len(),
            });
        }
        self.set_all(&gains)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Gain the filter should actually apply: 0 while disabled
    pub fn effective_gain(&self, band: usize) -> Option<f32> {
        self.gain(band).map(|g| if self.enabled { g } else { 0.0 })
    }

    pub fn effective_gains(&self) -> Vec<f32> {
        (0..self.gains.len())
            .filter_map(|band| self.effective_gain(band))
            .collect()
    }
}

fn clamp_gain(gain_db: f32) -> f32 {
    if gain_db.is_nan() {
        return 0.0;
    }
    gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB)
}
