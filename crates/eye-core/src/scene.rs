//! Renderable surfaces and their materials.
//!
//! Materials are reference counted: a loaded model may share one material
//! between several meshes, exactly like a glTF scene. Anything that recolors
//! a mesh must give it its own copy first.

use crate::constants::{EYELID_RENDER_ORDER, EYELID_SUBSTRING};
use crate::palette::Rgb;
use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub base_color: Rgb,
    pub roughness: f32,
    pub metalness: f32,
    pub transparent: bool,
    pub depth_write: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Rgb::WHITE,
            roughness: 0.5,
            metalness: 0.0,
            transparent: false,
            depth_write: true,
        }
    }
}

/// Animated transform channels the mixer writes into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub scale_y: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            scale_y: 1.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    pub material: Rc<Material>,
    pub render_order: i32,
    pub pose: Pose,
}

impl Mesh {
    pub fn new(name: impl Into<String>, material: Rc<Material>) -> Self {
        Self {
            name: name.into(),
            material,
            render_order: 0,
            pose: Pose::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub usize);

/// Mesh ids selected by a name-substring match.
pub type MeshTargets = SmallVec<[MeshId; 4]>;

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub scale: f32,
    by_name: FnvHashMap<String, MeshId>,
}

impl Scene {
    pub fn new(scale: f32) -> Self {
        Self {
            meshes: Vec::new(),
            scale,
            by_name: FnvHashMap::default(),
        }
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        let id = MeshId(self.meshes.len());
        self.by_name.insert(mesh.name.clone(), id);
        self.meshes.push(mesh);
        id
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0)
    }

    /// Exact-name lookup (used by animation tracks).
    pub fn find(&self, name: &str) -> Option<MeshId> {
        self.by_name.get(name).copied()
    }

    /// Case-insensitive substring match on mesh names, in mesh order.
    pub fn find_by_substring(&self, needle: &str) -> MeshTargets {
        let needle = needle.to_lowercase();
        self.meshes
            .iter()
            .enumerate()
            .filter(|(_, m)| m.name.to_lowercase().contains(&needle))
            .map(|(i, _)| MeshId(i))
            .collect()
    }

    /// Give every eyelid its own translucent material drawn after the eyeball.
    pub fn prepare_eyelids(&mut self) -> usize {
        let lids = self.find_by_substring(EYELID_SUBSTRING);
        for id in &lids {
            if let Some(mesh) = self.mesh_mut(*id) {
                let mut material = (*mesh.material).clone();
                material.transparent = true;
                material.depth_write = false;
                mesh.material = Rc::new(material);
                mesh.render_order = EYELID_RENDER_ORDER;
            }
        }
        lids.len()
    }
}
