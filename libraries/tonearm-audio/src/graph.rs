//! Signal graph
//!
//! source → band filters → analyser tap → output
//!
//! The graph is built at most once, on the first user gesture
//! ([`SignalGraph::attach`]). Until then gain changes are only stored, audio
//! passes through untouched and the tap reports no data. After attachment the
//! topology never changes; only filter gains track the equalizer state.

use crate::analyser::{Analyser, AnalyserSettings};
use crate::effects::{AudioNode, BandFilter};
use crate::equalizer::{default_bands, kind_for_position, BandSpec, EqPreset, EqualizerState};
use crate::error::{AudioError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Static graph layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub bands: Vec<BandSpec>,
    pub analyser: AnalyserSettings,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            analyser: AnalyserSettings::default(),
        }
    }
}

impl GraphSettings {
    /// Build a layout from `(frequency, label)` pairs, lowest first
    pub fn with_frequencies(frequencies: &[(f32, &str)], analyser: AnalyserSettings) -> Self {
        let count = frequencies.len();
        let bands = frequencies
            .iter()
            .enumerate()
            .map(|(i, (freq, label))| BandSpec::new(*freq, kind_for_position(i, count), *label))
            .collect();
        Self { bands, analyser }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(AudioError::InvalidConfig(
                "graph needs at least one band".to_string(),
            ));
        }
        if let Some(band) = self
            .bands
            .iter()
            .find(|b| !(b.frequency.is_finite() && b.frequency > 0.0))
        {
            return Err(AudioError::InvalidConfig(format!(
                "band {} has invalid frequency {}",
                band.label, band.frequency
            )));
        }
        self.analyser.validate()
    }
}

/// Nodes that exist only after attachment
#[derive(Debug)]
struct ActiveGraph {
    sample_rate: u32,
    filters: Vec<BandFilter>,
    analyser: Analyser,
}

#[derive(Debug)]
enum GraphState {
    Uninitialized,
    Initialized(ActiveGraph),
}

/// Equalizer chain plus analyser tap
#[derive(Debug)]
pub struct SignalGraph {
    settings: GraphSettings,
    equalizer: EqualizerState,
    state: GraphState,
}

impl SignalGraph {
    /// Create an unattached graph with flat, enabled gains
    pub fn new(settings: GraphSettings) -> Result<Self> {
        settings.validate()?;
        let equalizer = EqualizerState::new(settings.bands.len());
        Ok(Self {
            settings,
            equalizer,
            state: GraphState::Uninitialized,
        })
    }

    /// Build the chain for `sample_rate`, applying any gains set so far
    ///
    /// Returns `false` if the graph was already attached (it is never rebuilt).
    pub fn attach(&mut self, sample_rate: u32) -> Result<bool> {
        if matches!(self.state, GraphState::Initialized(_)) {
            debug!("Signal graph already attached, ignoring");
            return Ok(false);
        }
        if sample_rate == 0 {
            return Err(AudioError::InvalidConfig(
                "sample rate must be positive".to_string(),
            ));
        }

        let filters = self
            .settings
            .bands
            .iter()
            .zip(self.equalizer.effective_gains())
            .map(|(band, gain)| {
                let mut filter = BandFilter::new(band.kind, band.frequency, band.q);
                filter.set_gain_db(gain);
                filter.prepare(sample_rate);
                filter
            })
            .collect();
        let analyser = Analyser::new(self.settings.analyser)?;

        info!(
            sample_rate,
            bands = self.settings.bands.len(),
            fft_size = self.settings.analyser.fft_size,
            "Signal graph attached"
        );

        self.state = GraphState::Initialized(ActiveGraph {
            sample_rate,
            filters,
            analyser,
        });
        Ok(true)
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, GraphState::Initialized(_))
    }

    pub fn sample_rate(&self) -> Option<u32> {
        match &self.state {
            GraphState::Initialized(active) => Some(active.sample_rate),
            GraphState::Uninitialized => None,
        }
    }

    pub fn bands(&self) -> &[BandSpec] {
        &self.settings.bands
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    pub fn equalizer(&self) -> &EqualizerState {
        &self.equalizer
    }

    /// Set one band's gain (clamped to [-12, 12] dB); returns the stored value
    pub fn set_band_gain(&mut self, band: usize, gain_db: f32) -> Result<f32> {
        let stored = self.equalizer.set_gain(band, gain_db)?;
        debug!(band, gain_db = stored, "Band gain set");
        self.sync_filters();
        Ok(stored)
    }

    /// Stored gain, independent of the enabled flag
    pub fn band_gain(&self, band: usize) -> Option<f32> {
        self.equalizer.gain(band)
    }

    /// Gain the live filter should carry (0 while disabled)
    pub fn effective_gain(&self, band: usize) -> Option<f32> {
        self.equalizer.effective_gain(band)
    }

    pub fn effective_gains(&self) -> Vec<f32> {
        self.equalizer.effective_gains()
    }

    /// Gain the built filter is designed for; `None` before attachment
    pub fn live_gain(&self, band: usize) -> Option<f32> {
        match &self.state {
            GraphState::Initialized(active) => active.filters.get(band).map(BandFilter::gain_db),
            GraphState::Uninitialized => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.equalizer.is_enabled()
    }

    /// Disabling zeroes every live gain but keeps the stored ones
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.equalizer.is_enabled() == enabled {
            return;
        }
        self.equalizer.set_enabled(enabled);
        debug!(enabled, "Equalizer toggled");
        self.sync_filters();
    }

    /// Overwrite every band from the preset called `name`
    pub fn apply_preset(&mut self, name: &str) -> Result<EqPreset> {
        let preset = EqPreset::from_name(name)?;
        self.apply(preset)?;
        Ok(preset)
    }

    pub fn apply(&mut self, preset: EqPreset) -> Result<()> {
        self.equalizer.apply_preset(preset)?;
        debug!(preset = preset.name(), "Preset applied");
        self.sync_filters();
        Ok(())
    }

    /// Return every band to 0 dB
    pub fn reset(&mut self) -> Result<()> {
        self.equalizer.set_all(&vec![0.0; self.equalizer.band_count()])?;
        debug!("Equalizer reset to flat");
        self.sync_filters();
        Ok(())
    }

    /// Clear filter and analyser history, keeping gains
    pub fn clear_history(&mut self) {
        if let GraphState::Initialized(active) = &mut self.state {
            for filter in &mut active.filters {
                filter.reset();
            }
            active.analyser.reset();
        }
    }

    /// Run interleaved stereo audio through the chain in place
    pub fn process(&mut self, buffer: &mut [f32]) {
        let GraphState::Initialized(active) = &mut self.state else {
            return;
        };
        if buffer.len() % 2 != 0 {
            warn!(len = buffer.len(), "Odd-length buffer, trailing sample left unprocessed");
        }

        let sample_rate = active.sample_rate;
        for filter in &mut active.filters {
            filter.process(buffer, sample_rate);
        }
        active.analyser.process(buffer, sample_rate);
    }

    /// Number of frequency bins the tap produces
    pub fn frequency_bin_count(&self) -> usize {
        self.settings.analyser.frequency_bin_count()
    }

    /// Read the tap into `out`; `None` before attachment
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) -> Option<usize> {
        match &mut self.state {
            GraphState::Initialized(active) => Some(active.analyser.byte_frequency_data(out)),
            GraphState::Uninitialized => None,
        }
    }

    pub fn analyser_mut(&mut self) -> Option<&mut Analyser> {
        match &mut self.state {
            GraphState::Initialized(active) => Some(&mut active.analyser),
            GraphState::Uninitialized => None,
        }
    }

    fn sync_filters(&mut self) {
        let GraphState::Initialized(active) = &mut self.state else {
            return;
        };
        for (band, filter) in active.filters.iter_mut().enumerate() {
            if let Some(gain) = self.equalizer.effective_gain(band) {
                filter.set_gain_db(gain);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> SignalGraph {
        SignalGraph::new(GraphSettings::default()).unwrap()
    }

    #[test]
    fn starts_uninitialized() {
        let mut graph = graph();
        assert!(!graph.is_initialized());
        assert_eq!(graph.live_gain(0), None);
        assert_eq!(graph.sample_rate(), None);

        let mut out = [0u8; 128];
        assert_eq!(graph.byte_frequency_data(&mut out), None);
    }

    #[test]
    fn passes_audio_through_before_attach() {
        let mut graph = graph();
        graph.apply_preset("Bass Boost").unwrap();

        let original: Vec<f32> = (0..256).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut buffer = original.clone();
        graph.process(&mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn attach_is_one_shot() {
        let mut graph = graph();
        assert_eq!(graph.attach(48000), Ok(true));
        assert_eq!(graph.attach(44100), Ok(false));
        assert_eq!(graph.sample_rate(), Some(48000));
    }

    #[test]
    fn attach_rejects_zero_rate() {
        let mut graph = graph();
        assert!(graph.attach(0).is_err());
        assert!(!graph.is_initialized());
    }

    #[test]
    fn pending_gains_applied_on_attach() {
        let mut graph = graph();
        graph.set_band_gain(2, 5.0).unwrap();
        graph.set_enabled(false);
        graph.attach(44100).unwrap();

        assert_eq!(graph.live_gain(2), Some(0.0));
        graph.set_enabled(true);
        assert_eq!(graph.live_gain(2), Some(5.0));
    }

    #[test]
    fn gains_track_equalizer_after_attach() {
        let mut graph = graph();
        graph.attach(44100).unwrap();

        assert_eq!(graph.set_band_gain(4, 15.0), Ok(12.0));
        assert_eq!(graph.live_gain(4), Some(12.0));

        graph.apply_preset("Jazz").unwrap();
        let live: Vec<f32> = (0..5).filter_map(|b| graph.live_gain(b)).collect();
        assert_eq!(live, vec![3.0, 1.0, 2.0, -1.0, 1.0]);

        graph.reset().unwrap();
        assert_eq!(graph.effective_gains(), vec![0.0; 5]);
        assert_eq!(graph.live_gain(0), Some(0.0));
    }

    #[test]
    fn invalid_band_leaves_state() {
        let mut graph = graph();
        graph.set_band_gain(0, 3.0).unwrap();
        assert_eq!(
            graph.set_band_gain(9, 1.0),
            Err(AudioError::InvalidBand { index: 9, count: 5 })
        );
        assert_eq!(graph.band_gain(0), Some(3.0));
    }

    #[test]
    fn unknown_preset_is_not_found() {
        let mut graph = graph();
        graph.set_band_gain(1, 2.0).unwrap();
        assert_eq!(
            graph.apply_preset("Metal"),
            Err(AudioError::PresetNotFound("Metal".to_string()))
        );
        assert_eq!(graph.band_gain(1), Some(2.0));
    }

    #[test]
    fn custom_layout_assigns_shelves() {
        let settings = GraphSettings::with_frequencies(
            &[(100.0, "100"), (1000.0, "1k"), (10000.0, "10k")],
            AnalyserSettings::default(),
        );
        let graph = SignalGraph::new(settings).unwrap();
        let kinds: Vec<_> = graph.bands().iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                crate::FilterKind::LowShelf,
                crate::FilterKind::Peaking,
                crate::FilterKind::HighShelf
            ]
        );
    }

    #[test]
    fn rejects_empty_layout() {
        let settings = GraphSettings {
            bands: Vec::new(),
            analyser: AnalyserSettings::default(),
        };
        assert!(SignalGraph::new(settings).is_err());
    }

    #[test]
    fn tap_sees_processed_audio() {
        let mut graph = graph();
        graph.attach(44100).unwrap();

        let mut buffer: Vec<f32> = (0..1024)
            .flat_map(|i| {
                let s = (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 44100.0).sin();
                [s, s]
            })
            .collect();
        graph.process(&mut buffer);

        let mut out = [0u8; 128];
        assert_eq!(graph.byte_frequency_data(&mut out), Some(128));
        assert!(out.iter().any(|&b| b > 0));
    }
}
