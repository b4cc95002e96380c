//! Per-frame animation: breathing particles and the quarter-turn rotation.
//!
//! Breathing runs every frame on every particle. Rotation is a two-state
//! machine driven by a one-shot timer:
//!
//! ```text
//!            timer fires, orientation near 0 or PI/2
//!   Idle  ------------------------------------------>  Rotating
//!    ^                                                    |
//!    +---------- within one step of target: snap ---------+
//! ```

use std::f32::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use glam::Vec3;

use crate::config::MonogramConfig;
use crate::particles::ParticleField;
use crate::scene::Group;

/// Orientation showing the front glyph.
pub const FRONT_ORIENTATION: f32 = 0.0;
/// Orientation showing the back glyph.
pub const BACK_ORIENTATION: f32 = FRAC_PI_2;
/// How close to a resting orientation the field must be for a rotation to start.
pub const REST_TOLERANCE: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationPhase {
    Idle,
    Rotating,
}

/// Orientation of the whole field about the vertical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationState {
    pub is_rotating: bool,
    pub current_y: f32,
    /// Always [`FRONT_ORIENTATION`] or [`BACK_ORIENTATION`].
    pub target_y: f32,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            is_rotating: false,
            current_y: FRONT_ORIENTATION,
            target_y: FRONT_ORIENTATION,
        }
    }
}

impl RotationState {
    pub fn phase(&self) -> RotationPhase {
        if self.is_rotating {
            RotationPhase::Rotating
        } else {
            RotationPhase::Idle
        }
    }

    /// Start turning towards the other resting orientation.
    ///
    /// Returns `false`, changing nothing, when the field is not resting near
    /// either orientation.
    pub fn trigger(&mut self) -> bool {
        let target = if (self.current_y - FRONT_ORIENTATION).abs() < REST_TOLERANCE {
            BACK_ORIENTATION
        } else if (self.current_y - BACK_ORIENTATION).abs() < REST_TOLERANCE {
            FRONT_ORIENTATION
        } else {
            return false;
        };
        self.target_y = target;
        self.is_rotating = true;
        true
    }

    /// Advance one frame by `speed` radians towards the target.
    ///
    /// Never overshoots. Snaps onto the target and goes idle once the
    /// remaining distance is below one step.
    pub fn step(&mut self, speed: f32) {
        if !self.is_rotating {
            return;
        }

        if self.target_y > self.current_y {
            self.current_y = (self.current_y + speed).min(self.target_y);
        } else {
            self.current_y = (self.current_y - speed).max(self.target_y);
        }

        if (self.current_y - self.target_y).abs() < speed {
            self.current_y = self.target_y;
            self.is_rotating = false;
        }
    }
}

/// A timer that fires at most once per arming.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OneShotTimer {
    deadline: Option<Duration>,
}

impl OneShotTimer {
    pub fn arm(&mut self, deadline: Duration) {
        self.deadline = Some(deadline);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Sinusoidal scale oscillation shared by all particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breathing {
    /// Angular speed of the oscillation, radians per second.
    pub speed: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Breathing {
    pub fn from_config(config: &MonogramConfig) -> Self {
        Self {
            speed: config.particle_scale_speed,
            min_scale: config.particle_min_scale,
            max_scale: config.particle_max_scale,
        }
    }

    /// Scale at `elapsed` seconds for a particle with phase `offset`.
    pub fn scale_at(&self, elapsed: f32, offset: f32) -> f32 {
        let wave = (elapsed * self.speed + offset).sin() + 1.0;
        let scale = self.min_scale + wave * (self.max_scale - self.min_scale) / 2.0;
        scale.max(self.min_scale).min(self.max_scale)
    }
}

/// Random breathing phase for a new particle.
pub fn random_phase<R: rand::Rng>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..TAU)
}

/// Advances breathing and rotation once per frame.
#[derive(Clone, Debug)]
pub struct AnimationController {
    /// Radians per frame while rotating.
    pub rotation_speed: f32,
    pub breathing: Breathing,
    rotation_delay: Duration,
    timer: OneShotTimer,
}

impl AnimationController {
    pub fn new(config: &MonogramConfig) -> Self {
        Self {
            rotation_speed: config.rotation_speed,
            breathing: Breathing::from_config(config),
            rotation_delay: Duration::from_secs_f32(config.rotation_delay_secs.max(0.0)),
            timer: OneShotTimer::default(),
        }
    }

    /// Take new animation parameters without touching timer or rotation state.
    pub fn apply_config(&mut self, config: &MonogramConfig) {
        self.rotation_speed = config.rotation_speed;
        self.breathing = Breathing::from_config(config);
        self.rotation_delay = Duration::from_secs_f32(config.rotation_delay_secs.max(0.0));
    }

    /// Schedule a rotation attempt one delay after `now`.
    pub fn arm(&mut self, now: Duration) {
        self.timer.arm(now + self.rotation_delay);
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Advance one frame at clock time `now`.
    ///
    /// Does nothing until the field has been populated at least once.
    pub fn tick(&mut self, now: Duration, field: &mut ParticleField, group: &mut Group) {
        if !field.is_populated() {
            return;
        }

        if self.timer.poll(now) {
            if field.rotation.trigger() {
                log::debug!(
                    "Rotation started: {:.3} -> {:.3}",
                    field.rotation.current_y,
                    field.rotation.target_y
                );
            } else {
                log::debug!(
                    "Rotation timer fired away from rest ({:.3}), ignored",
                    field.rotation.current_y
                );
            }
        }

        if field.rotation.is_rotating {
            field.rotation.step(self.rotation_speed);
            if !field.rotation.is_rotating {
                log::debug!("Rotation settled at {:.3}", field.rotation.current_y);
            }
        }
        group.rotation_y = field.rotation.current_y;

        let elapsed = now.as_secs_f32();
        for particle in field.particles_mut() {
            let scale = self.breathing.scale_at(elapsed, particle.scale_offset());
            particle.current_scale = scale;
            if let Some(node) = group.node_mut(particle.node()) {
                node.scale = Vec3::splat(scale);
            }
        }
    }
}
