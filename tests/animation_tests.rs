// Host-side tests for clip playback, the bundled model and the GPU uniform
// layouts fed from them.

use eye_core::constants::EYE_MODEL_NAME;
use eye_core::{
    AnimationClip, AnimationMixer, BuiltinModels, Camera, Channel, Error, FlickerSample,
    FrameParams, GrainParams, Material, Mesh, ModelLoader, PostUniforms, Rgb, Scene,
    SceneUniforms, Track,
};
use std::rc::Rc;

fn params() -> FrameParams {
    FrameParams {
        time: 1.5,
        dt: 1.0 / 60.0,
        flicker: FlickerSample {
            intensity: 1.1,
            color: Rgb::WHITE,
        },
        grain: GrainParams {
            noise_intensity: 1.2,
            scanline_intensity: 0.4,
            scanline_count: 1400.0,
        },
        camera: Camera::default(),
    }
}

#[test]
fn track_interpolates_and_holds_ends() {
    let t = Track::new("lid", Channel::ScaleY, vec![(1.0, 0.0), (3.0, 1.0)]);
    assert_eq!(t.sample(0.0), Some(0.0));
    assert_eq!(t.sample(2.0), Some(0.5));
    assert_eq!(t.sample(10.0), Some(1.0));
    assert_eq!(Track::new("lid", Channel::ScaleY, vec![]).sample(1.0), None);
}

#[test]
fn mixer_loops_and_writes_poses() {
    let mut scene = Scene::new(1.0);
    let id = scene.add_mesh(Mesh::new("Ball", Rc::new(Material::default())));
    let mut mixer = AnimationMixer::new();
    mixer.play_all([AnimationClip {
        name: "spin".into(),
        duration: 2.0,
        tracks: vec![Track::new(
            "Ball",
            Channel::RotationY,
            vec![(0.0, 0.0), (2.0, 2.0)],
        )],
    }]);
    mixer.update(0.5, &mut scene);
    assert_eq!(scene.mesh(id).expect("mesh").pose.rotation_y, 0.5);
    mixer.update(2.0, &mut scene);
    assert_eq!(mixer.clip_time("spin"), Some(0.5));
}

#[test]
fn tracks_for_missing_meshes_are_skipped() {
    let mut scene = Scene::new(1.0);
    let mut mixer = AnimationMixer::new();
    mixer.play_all([AnimationClip {
        name: "ghost".into(),
        duration: 1.0,
        tracks: vec![Track::new("Nobody", Channel::ScaleY, vec![(0.0, 0.2)])],
    }]);
    mixer.update(0.1, &mut scene);
    assert_eq!(mixer.len(), 1);
}

#[test]
fn builtin_eye_has_named_surfaces_and_clips() {
    let model = BuiltinModels.load(EYE_MODEL_NAME).expect("eye");
    for name in ["Eyeball", "Iris_Outer", "Iris_Inner", "Iris_Fibers", "Pupil"] {
        assert!(model.scene.find(name).is_some(), "missing {}", name);
    }
    let names: Vec<&str> = model.clips.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["blink", "idle_gaze"]);
}

#[test]
fn unknown_model_is_an_asset_error() {
    let err = BuiltinModels.load("teapot").unwrap_err();
    assert!(matches!(err, Error::AssetLoad(_)));
}

#[test]
fn uniform_layouts_are_vec4_aligned() {
    assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
    assert_eq!(std::mem::size_of::<PostUniforms>() % 16, 0);
}

#[test]
fn scene_uniforms_flag_model_presence() {
    let p = params();
    let empty = SceneUniforms::new(&p, None, 640, 480);
    assert_eq!(empty.resolution[3], 0.0);
    let model = BuiltinModels.load(EYE_MODEL_NAME).expect("eye");
    let full = SceneUniforms::new(&p, Some(&model.scene), 640, 480);
    assert_eq!(full.resolution[3], 1.0);
    assert_eq!(full.resolution[0], 640.0);
    assert_eq!(full.key_light[3], 1.1);
}

#[test]
fn post_uniforms_carry_grain() {
    let post = PostUniforms::new(&params(), 800, 600);
    assert_eq!(post.film[0], 1.2);
    assert_eq!(post.film[2], 1400.0);
    assert_eq!(post.resolution[2], 1.5);
}
