//! The session context: every piece of mutable state the presentation owns,
//! passed explicitly to whoever needs it instead of living in globals.

use crate::animation::AnimationMixer;
use crate::applicator::apply_palette;
use crate::audio::{AudioCommand, AudioController};
use crate::camera::Camera;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::frame::{clamp_dt, FrameParams, RenderEngine};
use crate::model::LoadedModel;
use crate::modulator::{flicker, grain, CameraDrift, ModulationClock};
use crate::palette::{extract_palette_from_bytes, Palette};
use crate::scene::{MeshTargets, Scene};
use crate::unlock::InputKind;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Session {
    config: SessionConfig,
    rng: StdRng,
    pub audio: AudioController,
    palette: Option<Palette>,
    scene: Option<Scene>,
    targets: MeshTargets,
    mixer: AnimationMixer,
    clock: ModulationClock,
    drift: CameraDrift,
    camera: Camera,
    viewport: (u32, u32),
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Build with an explicit random source (tests, reproducible runs).
    pub fn with_rng(config: SessionConfig, rng: StdRng) -> Self {
        let mut audio = AudioController::new(
            config.unlock_trigger.clone(),
            config.resume_policy,
            config.audio.clone(),
        );
        if config.start_muted {
            // Not active yet, so this only records the flag
            let mut ignored = Vec::new();
            audio.set_muted(true, &mut ignored);
        }
        Self {
            config,
            rng,
            audio,
            palette: None,
            scene: None,
            targets: MeshTargets::new(),
            mixer: AnimationMixer::new(),
            clock: ModulationClock::default(),
            drift: CameraDrift::default(),
            camera: Camera::default(),
            viewport: (0, 0),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn targets(&self) -> &MeshTargets {
        &self.targets
    }

    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn clock(&self) -> &ModulationClock {
        &self.clock
    }

    pub fn drift(&self) -> &CameraDrift {
        &self.drift
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    // ---------------- user surface ----------------

    pub fn on_input(&mut self, kind: InputKind, now: f64, out: &mut Vec<AudioCommand>) {
        self.audio.handle_input(kind, now, out);
    }

    /// Pointer position in normalized device coordinates.
    pub fn on_pointer_move(&mut self, ndc: Vec2) {
        self.drift.set_pointer(ndc, &self.config.drift);
    }

    /// Decode an uploaded image, publish its palette and recolor the targets.
    /// On failure the previous palette stays in place.
    pub fn upload_image(&mut self, bytes: &[u8]) -> Result<usize> {
        let palette = extract_palette_from_bytes(bytes, self.config.palette_size, &mut self.rng)?;
        log::info!("[palette] extracted {} colors", palette.len());
        Ok(self.set_palette(palette))
    }

    /// Replace the palette and immediately recolor.
    pub fn set_palette(&mut self, palette: Palette) -> usize {
        self.palette = Some(palette);
        self.reroll_colors()
    }

    /// Reassign random palette entries. A no-op before any upload.
    pub fn reroll_colors(&mut self) -> usize {
        let (Some(palette), Some(scene)) = (&self.palette, &mut self.scene) else {
            return 0;
        };
        apply_palette(
            scene,
            &self.targets,
            palette,
            self.config.finish,
            &mut self.rng,
        )
    }

    pub fn toggle_mute(&mut self, out: &mut Vec<AudioCommand>) -> bool {
        self.audio.toggle_mute(out)
    }

    pub fn resize<E: RenderEngine + ?Sized>(&mut self, width: u32, height: u32, engine: &mut E) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.camera.set_viewport(width, height);
        engine.resize(width, height);
    }

    /// Completion of an asynchronous model load. Failures are logged and the
    /// scene keeps rendering without the model.
    pub fn model_loaded(&mut self, result: Result<LoadedModel>) {
        let model = match result {
            Ok(m) => m,
            Err(e) => {
                log::error!("[model] {}", e);
                return;
            }
        };
        let LoadedModel { mut scene, clips } = model;
        let lids = scene.prepare_eyelids();
        self.targets = scene.find_by_substring(&self.config.color_target);
        log::info!(
            "[model] meshes={} color targets={} eyelids={} clips={}",
            scene.meshes.len(),
            self.targets.len(),
            lids,
            clips.len()
        );
        self.mixer = AnimationMixer::new();
        self.mixer.play_all(clips);
        self.scene = Some(scene);
        if self.palette.is_some() {
            self.reroll_colors();
        }
    }

    // ---------------- frame ----------------

    /// One full update-and-render step: clock, animation, modulation, audio
    /// retry poll, then hand-off to the engine. Render errors are logged and
    /// never propagate.
    pub fn frame<E: RenderEngine + ?Sized>(
        &mut self,
        dt: f32,
        now: f64,
        engine: &mut E,
        out: &mut Vec<AudioCommand>,
    ) -> FrameParams {
        let dt = clamp_dt(dt);
        self.clock.advance(dt);

        if let Some(scene) = &mut self.scene {
            self.mixer.update(dt, scene);
        }

        let flicker = flicker(&self.config.flicker, self.clock.elapsed(), &mut self.rng);
        let grain = grain(&self.config.grain, &mut self.rng);
        self.drift.step(&self.config.drift);
        self.drift.apply(&mut self.camera, &self.config.drift);
        self.audio.poll(now, out);

        let params = FrameParams {
            time: self.clock.elapsed() as f32,
            dt,
            flicker,
            grain,
            camera: self.camera.clone(),
        };
        engine.apply(&params, self.scene.as_ref());
        if let Err(e) = engine.render() {
            log::error!("[frame] render error: {:?}", e);
        }
        params
    }
}
