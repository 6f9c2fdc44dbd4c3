//! GPU uniform layouts for `scene.wgsl` and `post.wgsl`.
//!
//! Every field is a `vec4<f32>` (or a matrix of them) so the Rust and WGSL
//! layouts agree without padding rules.

use crate::constants::*;
use crate::frame::FrameParams;
use crate::model::{
    MESH_EYEBALL, MESH_EYELID_LOWER, MESH_EYELID_UPPER, MESH_IRIS_FIBERS, MESH_IRIS_INNER,
    MESH_IRIS_OUTER, MESH_PUPIL, MESH_SCLERA,
};
use crate::scene::{Material, Pose, Scene};
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub inv_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],  // xyz, time
    pub resolution: [f32; 4],  // w, h, eye radius, model present
    pub key_light: [f32; 4],   // rgb, intensity
    pub key_dir: [f32; 4],     // normalized towards light
    pub fill_light: [f32; 4],  // dir xyz, intensity
    pub rim_light: [f32; 4],   // dir xyz, intensity
    pub pose: [f32; 4],        // eye rot x, eye rot y, upper lid open, lower lid open
    pub sclera: [f32; 4],      // rgb, roughness
    pub iris_outer: [f32; 4],  // rgb, roughness
    pub iris_inner: [f32; 4],  // rgb, roughness
    pub iris_fibers: [f32; 4], // rgb, metalness
    pub pupil: [f32; 4],       // rgb, roughness
    pub eyelid: [f32; 4],      // rgb, 1 when translucent
    pub background: [f32; 4],  // rgb, environment intensity
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PostUniforms {
    pub resolution: [f32; 4], // w, h, time, exposure
    pub film: [f32; 4],       // noise intensity, scanline intensity, scanline count, unused
    pub vignette: [f32; 4],   // offset, darkness, unused, unused
}

const ENVIRONMENT_INTENSITY: f32 = 0.15;

fn dir4(d: [f32; 3], w: f32) -> [f32; 4] {
    let n = Vec3::from(d).normalize_or_zero();
    [n.x, n.y, n.z, w]
}

fn mat4(m: &Material, w: f32) -> [f32; 4] {
    [m.base_color.r, m.base_color.g, m.base_color.b, w]
}

impl SceneUniforms {
    pub fn new(params: &FrameParams, scene: Option<&Scene>, width: u32, height: u32) -> Self {
        let cam = &params.camera;
        let k = params.flicker.color;
        let mesh = |name: &str| scene.and_then(|s| s.find(name).and_then(|id| s.mesh(id)));
        let material = |name: &str| {
            mesh(name)
                .map(|m| (*m.material).clone())
                .unwrap_or_default()
        };
        let pose = |name: &str| mesh(name).map(|m| m.pose).unwrap_or_default();
        let eye: Pose = pose(MESH_EYEBALL);
        let upper = pose(MESH_EYELID_UPPER);
        let lower = pose(MESH_EYELID_LOWER);
        // Sclera falls back to the eyeball material when absent
        let sclera = match mesh(MESH_SCLERA) {
            Some(_) => material(MESH_SCLERA),
            None => material(MESH_EYEBALL),
        };
        let iris_outer = material(MESH_IRIS_OUTER);
        let iris_inner = material(MESH_IRIS_INNER);
        let iris_fibers = material(MESH_IRIS_FIBERS);
        let pupil = material(MESH_PUPIL);
        let eyelid = material(MESH_EYELID_UPPER);

        Self {
            inv_view_proj: cam.inverse_view_projection().to_cols_array_2d(),
            camera_pos: [cam.eye.x, cam.eye.y, cam.eye.z, params.time],
            resolution: [
                width as f32,
                height as f32,
                EYE_BASE_RADIUS * scene.map(|s| s.scale).unwrap_or(EYE_MODEL_SCALE),
                if scene.is_some() { 1.0 } else { 0.0 },
            ],
            key_light: [k.r, k.g, k.b, params.flicker.intensity],
            key_dir: dir4(KEY_LIGHT_DIR, 0.0),
            fill_light: dir4(FILL_LIGHT_DIR, FILL_LIGHT_INTENSITY),
            rim_light: dir4(RIM_LIGHT_DIR, RIM_LIGHT_INTENSITY),
            pose: [eye.rotation_x, eye.rotation_y, upper.scale_y, lower.scale_y],
            sclera: mat4(&sclera, sclera.roughness),
            iris_outer: mat4(&iris_outer, iris_outer.roughness),
            iris_inner: mat4(&iris_inner, iris_inner.roughness),
            iris_fibers: mat4(&iris_fibers, iris_fibers.metalness),
            pupil: mat4(&pupil, pupil.roughness),
            eyelid: mat4(&eyelid, if eyelid.transparent { 1.0 } else { 0.0 }),
            background: [
                BACKGROUND_RGB[0],
                BACKGROUND_RGB[1],
                BACKGROUND_RGB[2],
                ENVIRONMENT_INTENSITY,
            ],
        }
    }
}

impl PostUniforms {
    pub fn new(params: &FrameParams, width: u32, height: u32) -> Self {
        Self {
            resolution: [
                width as f32,
                height as f32,
                params.time,
                TONE_MAPPING_EXPOSURE,
            ],
            film: [
                params.grain.noise_intensity,
                params.grain.scanline_intensity,
                params.grain.scanline_count,
                0.0,
            ],
            vignette: [VIGNETTE_OFFSET, VIGNETTE_DARKNESS, 0.0, 0.0],
        }
    }
}
