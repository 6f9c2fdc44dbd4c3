use crate::camera::Camera;
use crate::modulator::{FlickerSample, GrainParams};
use crate::scene::Scene;

/// Everything the renderer needs from one modulation step.
#[derive(Clone, Debug)]
pub struct FrameParams {
    pub time: f32,
    pub dt: f32,
    pub flicker: FlickerSample,
    pub grain: GrainParams,
    pub camera: Camera,
}

/// The external rendering engine as seen by the frame step.
pub trait RenderEngine {
    /// Push this frame's parameters (and the model, once loaded) into the
    /// engine's uniforms.
    fn apply(&mut self, params: &FrameParams, scene: Option<&Scene>);
    /// Composite and present one frame.
    fn render(&mut self) -> anyhow::Result<()>;
    fn resize(&mut self, width: u32, height: u32);
}

/// Sanitized frame delta: finite and non-negative.
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.max(0.0)
    } else {
        0.0
    }
}
