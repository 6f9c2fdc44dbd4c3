use crate::palette::Palette;
use crate::scene::{MeshId, Scene};
use rand::Rng;
use std::rc::Rc;

/// Fixed surface finish applied alongside the palette color so recolored
/// meshes keep reacting to the scene lights the same way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Finish {
    pub roughness: f32,
    pub metalness: f32,
}

/// Recolor every target with an independently chosen palette entry.
///
/// Each target receives a fresh material (never shared with another mesh).
/// An empty palette is a no-op. Returns how many meshes were recolored.
pub fn apply_palette<R: Rng + ?Sized>(
    scene: &mut Scene,
    targets: &[MeshId],
    palette: &Palette,
    finish: Option<Finish>,
    rng: &mut R,
) -> usize {
    if palette.is_empty() {
        return 0;
    }
    let mut applied = 0;
    for id in targets {
        let Some(mesh) = scene.mesh_mut(*id) else {
            continue;
        };
        let Some(color) = palette.pick(rng) else {
            break;
        };
        let mut material = (*mesh.material).clone();
        material.base_color = color;
        if let Some(f) = finish {
            material.roughness = f.roughness;
            material.metalness = f.metalness;
        }
        mesh.material = Rc::new(material);
        applied += 1;
    }
    applied
}
