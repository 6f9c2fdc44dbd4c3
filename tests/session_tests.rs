// Host-side tests for the session: frame loop, model arrival, recoloring and
// the audio path driven end to end through a recording engine.

use eye_core::constants::EYE_MODEL_NAME;
use eye_core::{
    AudioCommand, BuiltinModels, Error, FrameParams, InputKind, ModelLoader, Palette,
    RenderEngine, Rgb, Scene, Session, SessionConfig, UnlockState,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Cursor;
use std::rc::Rc;

#[derive(Default)]
struct MockEngine {
    applied: usize,
    rendered: usize,
    sizes: Vec<(u32, u32)>,
    saw_model: bool,
    fail: bool,
}

impl RenderEngine for MockEngine {
    fn apply(&mut self, _params: &FrameParams, scene: Option<&Scene>) {
        self.applied += 1;
        self.saw_model |= scene.is_some();
    }

    fn render(&mut self) -> anyhow::Result<()> {
        self.rendered += 1;
        if self.fail {
            anyhow::bail!("surface lost");
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.sizes.push((width, height));
    }
}

fn session() -> Session {
    Session::with_rng(SessionConfig::default(), StdRng::seed_from_u64(11))
}

fn loaded() -> Session {
    let mut s = session();
    s.model_loaded(BuiltinModels.load(EYE_MODEL_NAME));
    s
}

fn run_frames(s: &mut Session, engine: &mut MockEngine, n: usize, dt: f32) -> Vec<AudioCommand> {
    let mut out = Vec::new();
    for i in 0..n {
        s.frame(dt, i as f64 * dt as f64, engine, &mut out);
    }
    out
}

fn solid_png(r: u8, g: u8, b: u8) -> Vec<u8> {
    let img = eye_core::RgbaImage::from_pixel(4, 4, image::Rgba([r, g, b, 255]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

fn target_colors(s: &Session) -> Vec<Rgb> {
    let scene = s.scene().expect("scene");
    s.targets()
        .iter()
        .map(|id| scene.mesh(*id).expect("mesh").material.base_color)
        .collect()
}

#[test]
fn frames_render_without_a_model() {
    let mut s = session();
    let mut engine = MockEngine::default();
    run_frames(&mut s, &mut engine, 10, 1.0 / 60.0);
    assert_eq!(engine.applied, 10);
    assert_eq!(engine.rendered, 10);
    assert!(!engine.saw_model);
}

#[test]
fn render_errors_do_not_stop_the_loop() {
    let mut s = loaded();
    let mut engine = MockEngine {
        fail: true,
        ..MockEngine::default()
    };
    run_frames(&mut s, &mut engine, 5, 1.0 / 60.0);
    assert_eq!(engine.rendered, 5);
    assert!((s.clock().elapsed() - 5.0 / 60.0).abs() < 1e-6);
}

#[test]
fn clock_only_moves_forward() {
    let mut s = session();
    let mut engine = MockEngine::default();
    let mut out = Vec::new();
    s.frame(0.5, 0.0, &mut engine, &mut out);
    s.frame(-1.0, 0.1, &mut engine, &mut out);
    s.frame(f32::NAN, 0.2, &mut engine, &mut out);
    let params = s.frame(0.25, 0.3, &mut engine, &mut out);
    assert!((s.clock().elapsed() - 0.75).abs() < 1e-9);
    assert_eq!(params.dt, 0.25);
}

#[test]
fn hung_resume_never_starts_audio() {
    let mut s = session();
    let mut engine = MockEngine::default();
    let mut out = Vec::new();
    s.on_input(InputKind::PointerMove, 0.0, &mut out);
    // ~20 seconds of frames with no confirmation
    out.extend(run_frames(&mut s, &mut engine, 1200, 1.0 / 60.0));
    assert!(!out.iter().any(|c| matches!(
        c,
        AudioCommand::StartAmbience { .. } | AudioCommand::StartNoise { .. }
    )));
    assert!(out.contains(&AudioCommand::ShowAudioFallback));
    assert_eq!(s.audio.state(), UnlockState::Unlocking);
}

#[test]
fn confirmed_resume_starts_audio() {
    let mut s = session();
    let mut out = Vec::new();
    s.on_input(InputKind::KeyDown, 0.0, &mut out);
    s.audio.resume_succeeded(1, &mut out);
    assert_eq!(s.audio.state(), UnlockState::Active);
    assert!(out
        .iter()
        .any(|c| matches!(c, AudioCommand::StartAmbience { .. })));
}

#[test]
fn builtin_model_exposes_iris_targets_eyelids_and_clips() {
    let s = loaded();
    let scene = s.scene().expect("scene");
    assert_eq!(s.targets().len(), 3);
    assert_eq!(s.mixer().len(), 2);
    let lids = scene.meshes.iter().filter(|m| m.material.transparent).count();
    assert_eq!(lids, 2);
}

#[test]
fn model_failure_leaves_scene_empty() {
    let mut s = session();
    s.model_loaded(Err(Error::AssetLoad("404".into())));
    assert!(s.scene().is_none());
    assert!(s.targets().is_empty());
    let mut engine = MockEngine::default();
    run_frames(&mut s, &mut engine, 3, 1.0 / 60.0);
    assert_eq!(engine.rendered, 3);
}

#[test]
fn upload_recolors_each_target_independently() {
    let mut s = loaded();
    let n = s.upload_image(&solid_png(255, 0, 0)).expect("upload");
    assert_eq!(n, 3);
    assert!(target_colors(&s)
        .iter()
        .all(|c| *c == Rgb::new(1.0, 0.0, 0.0)));
    let scene = s.scene().expect("scene");
    let mats: Vec<_> = s
        .targets()
        .iter()
        .map(|id| scene.mesh(*id).expect("mesh").material.clone())
        .collect();
    assert!(!Rc::ptr_eq(&mats[0], &mats[1]));
    assert!(!Rc::ptr_eq(&mats[1], &mats[2]));
    assert_eq!(mats[0].roughness, 0.35);
}

#[test]
fn failed_upload_keeps_previous_palette() {
    let mut s = loaded();
    s.upload_image(&solid_png(0, 0, 255)).expect("upload");
    let before = s.palette().cloned();
    let err = s.upload_image(b"not an image").unwrap_err();
    assert!(matches!(err, Error::ImageDecode(_)));
    assert_eq!(s.palette().cloned(), before);
    assert!(target_colors(&s)
        .iter()
        .all(|c| *c == Rgb::new(0.0, 0.0, 1.0)));
}

#[test]
fn reroll_before_upload_is_a_no_op() {
    let mut s = loaded();
    assert_eq!(s.reroll_colors(), 0);
    assert!(s.palette().is_none());
}

#[test]
fn reroll_draws_from_current_palette() {
    let mut s = loaded();
    let palette = Palette::new(vec![Rgb::new(0.1, 0.2, 0.3), Rgb::new(0.9, 0.8, 0.7)]);
    s.set_palette(palette.clone());
    for _ in 0..10 {
        assert_eq!(s.reroll_colors(), 3);
        assert!(target_colors(&s)
            .iter()
            .all(|c| palette.colors().contains(c)));
    }
}

#[test]
fn palette_waits_for_the_model() {
    let mut s = session();
    assert_eq!(s.upload_image(&solid_png(0, 255, 0)).expect("upload"), 0);
    s.model_loaded(BuiltinModels.load(EYE_MODEL_NAME));
    assert!(target_colors(&s)
        .iter()
        .all(|c| *c == Rgb::new(0.0, 1.0, 0.0)));
}

#[test]
fn resize_ignores_zero_dimensions() {
    let mut s = session();
    let mut engine = MockEngine::default();
    s.resize(800, 600, &mut engine);
    s.resize(0, 600, &mut engine);
    s.resize(800, 0, &mut engine);
    assert_eq!(engine.sizes, [(800, 600)]);
    assert_eq!(s.viewport(), (800, 600));
    assert!((s.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
}

#[test]
fn blink_closes_the_upper_lid() {
    let mut s = loaded();
    let mut engine = MockEngine::default();
    let mut out = Vec::new();
    s.frame(3.75, 0.0, &mut engine, &mut out);
    let scene = s.scene().expect("scene");
    let upper = scene
        .mesh(scene.find("Eyelid_Upper").expect("upper"))
        .expect("mesh");
    assert!((upper.pose.scale_y - 0.05).abs() < 1e-4);
}

#[test]
fn clips_loop() {
    let mut s = loaded();
    let mut engine = MockEngine::default();
    run_frames(&mut s, &mut engine, 300, 1.0 / 30.0);
    let t = s.mixer().clip_time("blink").expect("blink");
    assert!((0.0..4.2).contains(&t));
}

#[test]
fn camera_drifts_towards_pointer() {
    let mut s = session();
    let mut engine = MockEngine::default();
    s.on_pointer_move(Vec2::new(1.0, -1.0));
    let first = s.frame(1.0 / 60.0, 0.0, &mut engine, &mut Vec::new());
    assert!(first.camera.eye.x > 0.0 && first.camera.eye.x < 0.1);
    assert!(first.camera.eye.y < 0.0);
    assert_eq!(first.camera.eye.z, 20.0);
    run_frames(&mut s, &mut engine, 2000, 1.0 / 60.0);
    let target = s.drift().target;
    assert!((s.camera().eye.x - target.x).abs() < 0.01);
    assert!((s.camera().eye.y - target.y).abs() < 0.01);
}

#[test]
fn start_muted_activates_silently() {
    let config = SessionConfig {
        start_muted: true,
        ..SessionConfig::default()
    };
    let mut s = Session::with_rng(config, StdRng::seed_from_u64(3));
    let mut out = Vec::new();
    s.on_input(InputKind::KeyDown, 0.0, &mut out);
    s.audio.resume_succeeded(1, &mut out);
    assert!(s.audio.is_muted());
    for cmd in &out {
        if let AudioCommand::StartAmbience { envelope } | AudioCommand::StartNoise { envelope } =
            cmd
        {
            assert_eq!(envelope.final_level(), 0.0);
        }
    }
    out.clear();
    assert!(!s.toggle_mute(&mut out));
    assert_eq!(out.len(), 2);
}
