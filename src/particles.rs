//! The particle field: one sphere per joined point.

use glam::Vec3;
use rand::Rng;

use crate::animation::{random_phase, RotationState};
use crate::join::JoinedPoint;
use crate::render::{MaterialId, MeshId, Renderer};
use crate::scene::{Group, Node, NodeId};

/// A sphere placed at one joined point.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    mesh: MeshId,
    node: NodeId,
    original_position: Vec3,
    base_size: f32,
    scale_offset: f32,
    /// Scale applied on the last frame.
    pub current_scale: f32,
}

impl Particle {
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Position in group space, Y already flipped.
    pub fn original_position(&self) -> Vec3 {
        self.original_position
    }

    pub fn base_size(&self) -> f32 {
        self.base_size
    }

    /// Breathing phase in `[0, TAU)`, fixed for the particle's lifetime.
    pub fn scale_offset(&self) -> f32 {
        self.scale_offset
    }
}

/// All live particles plus the rotation they share.
///
/// The field owns its particles' meshes and the material they were built
/// with. Both are released through the renderer on [`dispose`](Self::dispose)
/// or when the field is repopulated.
#[derive(Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
    material: Option<MaterialId>,
    generation: u64,
    pub rotation: RotationState,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every particle with one per point in `points`.
    ///
    /// The previous generation is disposed first. Points are placed at
    /// `(x, -y, z)` so glyphs read upright. The field takes ownership of
    /// `material`.
    pub fn populate<R, G>(
        &mut self,
        points: &[JoinedPoint],
        material: MaterialId,
        base_size: f32,
        group: &mut Group,
        renderer: &mut R,
        rng: &mut G,
    ) where
        R: Renderer + ?Sized,
        G: Rng,
    {
        self.release_particles(group, renderer);
        if let Some(old) = self.material.replace(material) {
            if old != material {
                renderer.dispose_material(old);
            }
        }

        self.particles.reserve(points.len());
        for point in points {
            let position = Vec3::new(point.x, -point.y, point.z);
            let mesh = renderer.create_sphere_mesh(base_size, material);
            let node = group.add(Node::new(mesh, position));
            self.particles.push(Particle {
                mesh,
                node,
                original_position: position,
                base_size,
                scale_offset: random_phase(rng),
                current_scale: 1.0,
            });
        }
        self.generation += 1;

        log::debug!(
            "Populated field generation {} with {} particles",
            self.generation,
            self.particles.len()
        );
    }

    /// Release every particle and the material. Safe to call when empty.
    pub fn dispose<R: Renderer + ?Sized>(&mut self, group: &mut Group, renderer: &mut R) {
        self.release_particles(group, renderer);
        if let Some(material) = self.material.take() {
            renderer.dispose_material(material);
        }
    }

    fn release_particles<R: Renderer + ?Sized>(&mut self, group: &mut Group, renderer: &mut R) {
        for particle in self.particles.drain(..) {
            renderer.dispose_mesh(particle.mesh);
        }
        group.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Whether [`populate`](Self::populate) has run at least once.
    pub fn is_populated(&self) -> bool {
        self.generation > 0
    }

    /// Number of completed populations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }
}
