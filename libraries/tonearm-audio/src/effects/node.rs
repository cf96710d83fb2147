/// Trait for nodes in the signal graph
///
/// # Real-Time Constraints
/// - Must NOT allocate memory in `process()`
/// - No blocking operations
pub trait AudioNode: Send {
    /// Process an interleaved stereo buffer in place
    fn process(&mut self, buffer: &mut [f32], sample_rate: u32);

    /// Reset internal state (e.g., after a track change)
    fn reset(&mut self);

    /// Node name (for debugging)
    fn name(&self) -> &str;
}
