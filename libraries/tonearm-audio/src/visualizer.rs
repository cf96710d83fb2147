//! Per-frame visualizer sampling
//!
//! The host calls [`VisualizerSampler::on_frame`] once per display frame. While
//! playback runs and the visualizer is visible, the tap's byte magnitudes are
//! handed to the renderer. When either condition drops, the renderer is
//! cleared once and sampling stops until both hold again.

use crate::graph::SignalGraph;
use tracing::trace;

/// Drawing surface for frequency bars
pub trait FrequencyRenderer {
    /// Draw one frame; `bins[i]` is the magnitude of bin `i` in `0..=255`
    fn draw(&mut self, bins: &[u8]);

    /// Blank the surface
    fn clear(&mut self);
}

#[derive(Debug, Clone)]
pub struct VisualizerSampler {
    playing: bool,
    visible: bool,
    /// Whether the last frame drew something that still needs clearing
    drawn: bool,
    bins: Vec<u8>,
}

impl VisualizerSampler {
    pub fn new(bin_count: usize, visible: bool) -> Self {
        Self {
            playing: false,
            visible,
            drawn: false,
            bins: vec![0; bin_count],
        }
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Sampling happens only while playing and visible
    pub fn is_active(&self) -> bool {
        self.playing && self.visible
    }

    /// Run one display frame; returns whether the renderer was drawn to
    pub fn on_frame(&mut self, graph: &mut SignalGraph, renderer: &mut dyn FrequencyRenderer) -> bool {
        if !self.is_active() {
            self.stop(renderer);
            return false;
        }

        let Some(written) = graph.byte_frequency_data(&mut self.bins) else {
            // Graph not attached yet
            return false;
        };

        renderer.draw(&self.bins[..written]);
        self.drawn = true;
        true
    }

    fn stop(&mut self, renderer: &mut dyn FrequencyRenderer) {
        if self.drawn {
            trace!("Visualizer stopped, clearing renderer");
            renderer.clear();
            self.drawn = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphSettings;

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<Vec<u8>>,
        clears: usize,
    }

    impl FrequencyRenderer for RecordingRenderer {
        fn draw(&mut self, bins: &[u8]) {
            self.frames.push(bins.to_vec());
        }

        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    fn attached_graph() -> SignalGraph {
        let mut graph = SignalGraph::new(GraphSettings::default()).unwrap();
        graph.attach(44100).unwrap();
        graph
    }

    #[test]
    fn idle_until_playing() {
        let mut graph = attached_graph();
        let mut renderer = RecordingRenderer::default();
        let mut sampler = VisualizerSampler::new(graph.frequency_bin_count(), true);

        assert!(!sampler.on_frame(&mut graph, &mut renderer));
        assert!(renderer.frames.is_empty());
        // Nothing drawn yet, nothing to clear
        assert_eq!(renderer.clears, 0);
    }

    #[test]
    fn draws_every_bin_while_playing() {
        let mut graph = attached_graph();
        let mut renderer = RecordingRenderer::default();
        let mut sampler = VisualizerSampler::new(graph.frequency_bin_count(), true);
        sampler.set_playing(true);

        assert!(sampler.on_frame(&mut graph, &mut renderer));
        assert!(sampler.on_frame(&mut graph, &mut renderer));
        assert_eq!(renderer.frames.len(), 2);
        assert_eq!(renderer.frames[0].len(), 128);
    }

    #[test]
    fn pause_clears_once_then_resumes() {
        let mut graph = attached_graph();
        let mut renderer = RecordingRenderer::default();
        let mut sampler = VisualizerSampler::new(graph.frequency_bin_count(), true);
        sampler.set_playing(true);
        sampler.on_frame(&mut graph, &mut renderer);

        sampler.set_playing(false);
        assert!(!sampler.on_frame(&mut graph, &mut renderer));
        assert!(!sampler.on_frame(&mut graph, &mut renderer));
        assert_eq!(renderer.clears, 1);

        sampler.set_playing(true);
        assert!(sampler.on_frame(&mut graph, &mut renderer));
        assert_eq!(renderer.frames.len(), 2);
    }

    #[test]
    fn hiding_stops_sampling() {
        let mut graph = attached_graph();
        let mut renderer = RecordingRenderer::default();
        let mut sampler = VisualizerSampler::new(graph.frequency_bin_count(), true);
        sampler.set_playing(true);
        sampler.on_frame(&mut graph, &mut renderer);

        sampler.set_visible(false);
        assert!(!sampler.is_active());
        assert!(!sampler.on_frame(&mut graph, &mut renderer));
        assert_eq!(renderer.clears, 1);
    }

    #[test]
    fn unattached_graph_draws_nothing() {
        let mut graph = SignalGraph::new(GraphSettings::default()).unwrap();
        let mut renderer = RecordingRenderer::default();
        let mut sampler = VisualizerSampler::new(graph.frequency_bin_count(), true);
        sampler.set_playing(true);

        assert!(!sampler.on_frame(&mut graph, &mut renderer));
        assert!(renderer.frames.is_empty());
    }
}
