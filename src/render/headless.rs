//! A renderer that draws nothing and remembers everything.

use crate::config::Color;
use crate::error::RenderError;
use crate::render::{MaterialId, MeshId, Renderer, Resources, SphereMesh};
use crate::scene::{OrthoCamera, Scene, Viewport};

/// What the last submitted frame contained.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub node_count: usize,
    pub rotation_y: f32,
    /// Uniform scale of every node, in group order.
    pub scales: Vec<f32>,
    /// Nodes whose mesh had already been disposed.
    pub dangling: usize,
}

/// In-memory [`Renderer`] for tests and GPU-less runs.
#[derive(Debug)]
pub struct HeadlessRenderer {
    resources: Resources,
    viewport: Viewport,
    frames: u64,
    last_frame: Option<FrameSnapshot>,
    fail_next: Option<RenderError>,
}

impl HeadlessRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            resources: Resources::new(),
            viewport,
            frames: 0,
            last_frame: None,
            fail_next: None,
        }
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Number of successfully submitted frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&FrameSnapshot> {
        self.last_frame.as_ref()
    }

    /// Make the next `submit_frame` fail with `error`.
    pub fn fail_next_frame(&mut self, error: RenderError) {
        self.fail_next = Some(error);
    }
}

impl Renderer for HeadlessRenderer {
    fn create_basic_material(&mut self, color: Color) -> MaterialId {
        self.resources.add_material(color)
    }

    fn create_sphere_mesh(&mut self, radius: f32, material: MaterialId) -> MeshId {
        self.resources.add_mesh(SphereMesh { radius, material })
    }

    fn dispose_mesh(&mut self, mesh: MeshId) {
        self.resources.remove_mesh(mesh);
    }

    fn dispose_material(&mut self, material: MaterialId) {
        self.resources.remove_material(material);
    }

    fn submit_frame(&mut self, scene: &Scene, _camera: &OrthoCamera) -> Result<(), RenderError> {
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }

        let nodes = scene.group.nodes();
        self.last_frame = Some(FrameSnapshot {
            node_count: nodes.len(),
            rotation_y: scene.group.rotation_y,
            scales: nodes.iter().map(|n| n.scale.x).collect(),
            dangling: nodes
                .iter()
                .filter(|n| self.resources.mesh(n.mesh).is_none())
                .count(),
        });
        self.frames += 1;
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        if !viewport.is_empty() {
            self.viewport = viewport;
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
