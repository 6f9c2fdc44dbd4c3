//! Model assets: named meshes plus the clips that animate them.
//!
//! The eye is drawn analytically by the scene shader, so its "model" is the
//! set of named surfaces and animation tracks the shader reads back through
//! the scene (materials and poses). Loading is synchronous here; hosts run it
//! off the frame callback and hand the result to the session when it lands.

use crate::animation::{AnimationClip, Channel, Track};
use crate::constants::{EYE_MODEL_NAME, EYE_MODEL_SCALE};
use crate::error::{Error, Result};
use crate::palette::Rgb;
use crate::scene::{Material, Mesh, Scene};
use std::rc::Rc;

pub const MESH_EYEBALL: &str = "Eyeball";
pub const MESH_SCLERA: &str = "Sclera";
pub const MESH_IRIS_OUTER: &str = "Iris_Outer";
pub const MESH_IRIS_INNER: &str = "Iris_Inner";
pub const MESH_IRIS_FIBERS: &str = "Iris_Fibers";
pub const MESH_PUPIL: &str = "Pupil";
pub const MESH_EYELID_UPPER: &str = "Eyelid_Upper";
pub const MESH_EYELID_LOWER: &str = "Eyelid_Lower";

#[derive(Clone, Debug)]
pub struct LoadedModel {
    pub scene: Scene,
    pub clips: Vec<AnimationClip>,
}

pub trait ModelLoader {
    fn load(&self, name: &str) -> Result<LoadedModel>;
}

/// Resolves the models that ship with the app.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinModels;

impl ModelLoader for BuiltinModels {
    fn load(&self, name: &str) -> Result<LoadedModel> {
        match name {
            EYE_MODEL_NAME => Ok(eye_model()),
            other => Err(Error::AssetLoad(format!("unknown model '{}'", other))),
        }
    }
}

fn eye_model() -> LoadedModel {
    let sclera = Rc::new(Material {
        base_color: Rgb::new(0.92, 0.9, 0.86),
        roughness: 0.3,
        ..Material::default()
    });
    // One material shared by all iris layers, as exported
    let iris = Rc::new(Material {
        base_color: Rgb::new(0.35, 0.2, 0.1),
        roughness: 0.4,
        ..Material::default()
    });
    let pupil = Rc::new(Material {
        base_color: Rgb::new(0.01, 0.01, 0.01),
        roughness: 0.1,
        ..Material::default()
    });
    let skin = Rc::new(Material {
        base_color: Rgb::new(0.55, 0.36, 0.3),
        roughness: 0.7,
        ..Material::default()
    });

    let mut scene = Scene::new(EYE_MODEL_SCALE);
    scene.add_mesh(Mesh::new(MESH_EYEBALL, sclera.clone()));
    scene.add_mesh(Mesh::new(MESH_SCLERA, sclera));
    scene.add_mesh(Mesh::new(MESH_IRIS_OUTER, iris.clone()));
    scene.add_mesh(Mesh::new(MESH_IRIS_INNER, iris.clone()));
    scene.add_mesh(Mesh::new(MESH_IRIS_FIBERS, iris));
    scene.add_mesh(Mesh::new(MESH_PUPIL, pupil));
    scene.add_mesh(Mesh::new(MESH_EYELID_UPPER, skin.clone()));
    scene.add_mesh(Mesh::new(MESH_EYELID_LOWER, skin));

    let blink = AnimationClip {
        name: "blink".into(),
        duration: 4.2,
        tracks: vec![
            Track::new(
                MESH_EYELID_UPPER,
                Channel::ScaleY,
                vec![(0.0, 1.0), (3.6, 1.0), (3.75, 0.05), (3.9, 1.0), (4.2, 1.0)],
            ),
            Track::new(
                MESH_EYELID_LOWER,
                Channel::ScaleY,
                vec![(0.0, 1.0), (3.6, 1.0), (3.75, 0.6), (3.9, 1.0), (4.2, 1.0)],
            ),
        ],
    };
    let idle_gaze = AnimationClip {
        name: "idle_gaze".into(),
        duration: 7.0,
        tracks: vec![
            Track::new(
                MESH_EYEBALL,
                Channel::RotationY,
                vec![
                    (0.0, 0.0),
                    (1.5, 0.12),
                    (3.0, 0.12),
                    (4.0, -0.1),
                    (6.0, -0.1),
                    (7.0, 0.0),
                ],
            ),
            Track::new(
                MESH_EYEBALL,
                Channel::RotationX,
                vec![(0.0, 0.0), (2.0, 0.05), (4.5, -0.04), (7.0, 0.0)],
            ),
        ],
    };

    LoadedModel {
        scene,
        clips: vec![blink, idle_gaze],
    }
}
