//! Per-frame procedural modulation: light flicker, film grain and floaty
//! camera drift. The three are independent of each other; they only have to
//! run before the frame is submitted.

use crate::camera::Camera;
use crate::constants::*;
use crate::palette::Rgb;
use glam::{Vec2, Vec3};
use rand::Rng;
use smallvec::SmallVec;

/// Elapsed seconds driving the periodic functions. Advanced once per frame,
/// never reset, never decreasing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ModulationClock {
    elapsed: f64,
}

impl ModulationClock {
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt as f64;
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlickerConfig {
    pub base: f32,
    pub waves: SmallVec<[FlickerWave; 4]>,
    pub jitter: f32,
    pub warm_tint: Rgb,
    pub warmth_coupling: f32,
}

impl Default for FlickerConfig {
    fn default() -> Self {
        Self {
            base: FLICKER_BASE,
            waves: FLICKER_WAVES.iter().copied().collect(),
            jitter: FLICKER_JITTER,
            warm_tint: Rgb::new(FLICKER_WARM_TINT[0], FLICKER_WARM_TINT[1], FLICKER_WARM_TINT[2]),
            warmth_coupling: FLICKER_WARMTH_COUPLING,
        }
    }
}

impl FlickerConfig {
    /// Largest possible deviation from `base`.
    pub fn swing(&self) -> f32 {
        self.waves.iter().map(|w| w.amplitude.abs()).sum::<f32>() + self.jitter.abs()
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.base - self.swing(), self.base + self.swing())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlickerSample {
    pub intensity: f32,
    pub color: Rgb,
}

/// Key light intensity and warmth at clock time `t`.
pub fn flicker<R: Rng + ?Sized>(config: &FlickerConfig, t: f64, rng: &mut R) -> FlickerSample {
    let t = t as f32;
    let waves: f32 = config
        .waves
        .iter()
        .map(|w| w.amplitude * (w.frequency * t + w.phase).sin())
        .sum();
    let jitter = (rng.gen::<f32>() * 2.0 - 1.0) * config.jitter;
    let intensity = config.base + waves + jitter;
    let swing = config.swing();
    // 0 at the dimmest possible sample, 1 at the brightest
    let magnitude = if swing > 0.0 {
        ((intensity - config.base) / swing * 0.5 + 0.5).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let color = Rgb::WHITE.lerp(config.warm_tint, config.warmth_coupling * magnitude);
    FlickerSample { intensity, color }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrainConfig {
    pub noise_intensity: (f32, f32),
    pub scanline_intensity: (f32, f32),
    pub scanline_count: (f32, f32),
}

impl Default for GrainConfig {
    fn default() -> Self {
        Self {
            noise_intensity: GRAIN_NOISE_RANGE,
            scanline_intensity: GRAIN_SCANLINE_INTENSITY_RANGE,
            scanline_count: GRAIN_SCANLINE_COUNT_RANGE,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GrainParams {
    pub noise_intensity: f32,
    pub scanline_intensity: f32,
    pub scanline_count: f32,
}

#[inline]
fn in_range<R: Rng + ?Sized>(range: (f32, f32), rng: &mut R) -> f32 {
    range.0 + (range.1 - range.0) * rng.gen::<f32>()
}

/// Fresh, unsmoothed grain parameters; intentionally jittery per frame.
pub fn grain<R: Rng + ?Sized>(config: &GrainConfig, rng: &mut R) -> GrainParams {
    GrainParams {
        noise_intensity: in_range(config.noise_intensity, rng),
        scanline_intensity: in_range(config.scanline_intensity, rng),
        scanline_count: in_range(config.scanline_count, rng),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftConfig {
    pub sensitivity: Vec2,
    pub lerp: f32,
    pub camera_z: f32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            sensitivity: Vec2::new(DRIFT_SENSITIVITY_X, DRIFT_SENSITIVITY_Y),
            lerp: DRIFT_LERP,
            camera_z: CAMERA_Z,
        }
    }
}

/// Pointer-following camera offset with heavy exponential smoothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraDrift {
    pub current: Vec2,
    pub target: Vec2,
}

impl CameraDrift {
    pub fn set_pointer(&mut self, ndc: Vec2, config: &DriftConfig) {
        self.target = ndc * config.sensitivity;
    }

    pub fn step(&mut self, config: &DriftConfig) {
        let k = config.lerp.clamp(0.0, 0.999);
        self.current += (self.target - self.current) * k;
    }

    /// Move the camera to the drifted position, always facing the origin.
    pub fn apply(&self, camera: &mut Camera, config: &DriftConfig) {
        camera.eye = Vec3::new(self.current.x, self.current.y, config.camera_z);
        camera.target = Vec3::ZERO;
    }
}
