// Shared visual/audio tuning constants used by the core and the web frontend.

/// Frame modulation tuning.
///
/// These constants express intended behavior (e.g., wave shapes, clamp
/// ranges, smoothing factors) and keep magic numbers out of the code.
// Key light flicker: base + sum of sines + uniform jitter
pub const FLICKER_BASE: f32 = 1.1;
pub const FLICKER_WAVES: [FlickerWave; 2] = [
    FlickerWave {
        amplitude: 0.1,
        frequency: 7.0,
        phase: 0.0,
    },
    FlickerWave {
        amplitude: 0.04,
        frequency: 17.3,
        phase: 0.6,
    },
];
pub const FLICKER_JITTER: f32 = 0.03;
pub const FLICKER_WARM_TINT: [f32; 3] = [1.0, 0.86, 0.7]; // candle-ish
pub const FLICKER_WARMTH_COUPLING: f32 = 0.6; // 0 = neutral white, 1 = full tint at peak

// Film grain ranges (re-randomized every frame)
pub const GRAIN_NOISE_RANGE: (f32, f32) = (1.0, 1.4);
pub const GRAIN_SCANLINE_INTENSITY_RANGE: (f32, f32) = (0.3, 0.5);
pub const GRAIN_SCANLINE_COUNT_RANGE: (f32, f32) = (1300.0, 1500.0);

// Vignette
pub const VIGNETTE_OFFSET: f32 = 1.25;
pub const VIGNETTE_DARKNESS: f32 = 2.1;

// Camera
pub const CAMERA_Z: f32 = 20.0;
pub const CAMERA_FOVY_DEG: f32 = 55.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const DRIFT_SENSITIVITY_X: f32 = 2.2;
pub const DRIFT_SENSITIVITY_Y: f32 = 1.6;
pub const DRIFT_LERP: f32 = 0.008; // per frame, strictly inside (0, 1)

// Lights (intensity, direction from origin)
pub const KEY_LIGHT_DIR: [f32; 3] = [2.0, -6.0, 5.0];
pub const FILL_LIGHT_INTENSITY: f32 = 0.05;
pub const FILL_LIGHT_DIR: [f32; 3] = [-8.0, 1.0, 1.0];
pub const RIM_LIGHT_INTENSITY: f32 = 2.2;
pub const RIM_LIGHT_DIR: [f32; 3] = [0.0, 8.0, -10.0];
pub const TONE_MAPPING_EXPOSURE: f32 = 7.0;
pub const BACKGROUND_RGB: [f32; 3] = [0.0, 0.0, 0.0];

// Model
pub const EYE_MODEL_NAME: &str = "eye";
pub const EYE_MODEL_SCALE: f32 = 1.5;
pub const EYE_BASE_RADIUS: f32 = 3.0;
pub const IRIS_TARGET_SUBSTRING: &str = "iris";
pub const EYELID_SUBSTRING: &str = "eyelid";
pub const EYELID_RENDER_ORDER: i32 = 1;

// Palette
pub const PALETTE_SIZE: usize = 12;
pub const IRIS_ROUGHNESS: f32 = 0.35;
pub const IRIS_METALNESS: f32 = 0.0;

// Audio levels
pub const AMBIENCE_LEVEL: f32 = 0.18;
pub const NOISE_LEVEL: f32 = 0.001;
pub const VIDEO_VOLUME: f32 = 0.5;
pub const NOISE_AMPLITUDE: f32 = 0.25; // white-noise sample scale before gain
pub const NOISE_BUFFER_SEC: f32 = 2.0;
pub const MUTE_TIME_CONSTANT_SEC: f32 = 0.015; // short setTarget ramp, no clicks
pub const AMBIENCE_URL: &str = "./audio/horror-ambience.mp3";

// Resume retry policy
pub const RESUME_TIMEOUT_SEC: f64 = 3.0;
pub const RESUME_RETRY_DELAY_SEC: f64 = 1.0;
pub const MAX_RESUME_ATTEMPTS: u32 = 4;

/// One sine component of the flicker waveform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlickerWave {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
}
