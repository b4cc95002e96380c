//! Scene graph and camera handed to a [`Renderer`](crate::render::Renderer).
//!
//! The scene is deliberately flat: one group carrying the shared
//! orientation, holding one node per particle.

use glam::{Mat4, Vec3};

use crate::config::Color;
use crate::render::MeshId;

/// Index of a node within its [`Group`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A mesh placed in the group's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub mesh: MeshId,
    pub position: Vec3,
    pub scale: Vec3,
}

impl Node {
    pub fn new(mesh: MeshId, position: Vec3) -> Self {
        Self {
            mesh,
            position,
            scale: Vec3::ONE,
        }
    }

    /// Node position after the group transform.
    pub fn world_position(&self, group: &Group) -> Vec3 {
        group.transform().transform_point3(self.position)
    }
}

/// Nodes sharing one orientation.
#[derive(Clone, Debug, Default)]
pub struct Group {
    /// Rotation about the vertical axis, in radians.
    pub rotation_y: f32,
    nodes: Vec<Node>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Remove every node. Outstanding [`NodeId`]s become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y)
    }
}

/// Everything drawn in a frame.
#[derive(Clone, Debug)]
pub struct Scene {
    pub clear_color: Color,
    pub group: Group,
}

impl Scene {
    pub fn new(clear_color: Color) -> Self {
        Self {
            clear_color,
            group: Group::new(),
        }
    }
}

/// Drawable surface size in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Orthographic camera looking down -Z at the origin.
///
/// The visible height is fixed at `frustum_size` world units; the width
/// follows the viewport aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthoCamera {
    pub frustum_size: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    aspect: f32,
}

impl OrthoCamera {
    pub fn new(viewport: Viewport, frustum_size: f32) -> Self {
        Self {
            frustum_size,
            near: 1.0,
            far: 2000.0,
            position: Vec3::new(0.0, 0.0, 400.0),
            aspect: viewport.aspect(),
        }
    }

    /// Follow a new viewport size. Empty viewports are ignored.
    pub fn resize(&mut self, viewport: Viewport) {
        if !viewport.is_empty() {
            self.aspect = viewport.aspect();
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// `(left, right, bottom, top)` of the view volume.
    pub fn extents(&self) -> (f32, f32, f32, f32) {
        let half_h = self.frustum_size / 2.0;
        let half_w = half_h * self.aspect;
        (-half_w, half_w, -half_h, half_h)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let (left, right, bottom, top) = self.extents();
        Mat4::orthographic_rh(left, right, bottom, top, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
