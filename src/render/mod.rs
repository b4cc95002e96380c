//! Renderer interface.
//!
//! The monogram never touches the GPU directly. It asks a [`Renderer`] for
//! material and mesh handles, mutates a [`Scene`] in place, and submits the
//! scene once per frame. [`GpuRenderer`] draws with wgpu; [`HeadlessRenderer`]
//! only keeps books, which is what the tests run against.

mod gpu;
mod headless;

use std::collections::HashMap;

pub use gpu::GpuRenderer;
pub use headless::{FrameSnapshot, HeadlessRenderer};

use crate::config::Color;
use crate::error::RenderError;
use crate::scene::{OrthoCamera, Scene, Viewport};

/// Handle to a mesh owned by a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub(crate) u32);

/// Handle to a material owned by a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub(crate) u32);

/// The rendering backend.
pub trait Renderer {
    /// Create an unlit, flat-colored material.
    fn create_basic_material(&mut self, color: Color) -> MaterialId;

    /// Create a sphere of `radius` world units drawn with `material`.
    fn create_sphere_mesh(&mut self, radius: f32, material: MaterialId) -> MeshId;

    /// Release a mesh. Unknown handles are ignored.
    fn dispose_mesh(&mut self, mesh: MeshId);

    /// Release a material. Unknown handles are ignored.
    fn dispose_material(&mut self, material: MaterialId);

    /// Draw `scene` as seen by `camera`.
    fn submit_frame(&mut self, scene: &Scene, camera: &OrthoCamera) -> Result<(), RenderError>;

    /// Follow a new surface size.
    fn resize(&mut self, viewport: Viewport);

    fn viewport(&self) -> Viewport;
}

/// A sphere mesh as the backends see it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereMesh {
    pub radius: f32,
    pub material: MaterialId,
}

/// Handle allocation and bookkeeping shared by the backends.
#[derive(Debug, Default)]
pub struct Resources {
    next_id: u32,
    materials: HashMap<MaterialId, Color>,
    meshes: HashMap<MeshId, SphereMesh>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn add_material(&mut self, color: Color) -> MaterialId {
        let id = MaterialId(self.allocate());
        self.materials.insert(id, color);
        id
    }

    pub fn add_mesh(&mut self, mesh: SphereMesh) -> MeshId {
        let id = MeshId(self.allocate());
        self.meshes.insert(id, mesh);
        id
    }

    pub fn remove_material(&mut self, id: MaterialId) -> bool {
        self.materials.remove(&id).is_some()
    }

    pub fn remove_mesh(&mut self, id: MeshId) -> bool {
        self.meshes.remove(&id).is_some()
    }

    pub fn material(&self, id: MaterialId) -> Option<Color> {
        self.materials.get(&id).copied()
    }

    pub fn mesh(&self, id: MeshId) -> Option<&SphereMesh> {
        self.meshes.get(&id)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}
