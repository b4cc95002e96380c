//! The render loop driver.
//!
//! [`Monogram`] owns everything a running monogram needs: the renderer, the
//! clock, the scene, the particle field and the animation controller. The
//! host calls [`tick`](Monogram::tick) once per display refresh and keeps
//! scheduling frames while it returns `true`.
//!
//! ```ignore
//! let mut monogram = Monogram::new(config, renderer, SystemClock::new());
//! while monogram.tick() {
//!     wait_for_vsync();
//! }
//! ```
//!
//! Teardown cancels the rotation timer and releases every particle. It runs
//! on [`teardown`](Monogram::teardown) or when the monogram is dropped,
//! whichever comes first.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::animation::{AnimationController, RotationState};
use crate::config::MonogramConfig;
use crate::error::RenderError;
use crate::font::ResolvedFont;
use crate::join::join;
use crate::particles::ParticleField;
use crate::raster::{GlyphRasterizer, GlyphSampler, RasterParams};
use crate::render::Renderer;
use crate::scene::{OrthoCamera, Scene, Viewport};
use crate::time::{Clock, Time};

/// A running two-letter particle monogram.
pub struct Monogram<R: Renderer, C: Clock> {
    config: MonogramConfig,
    renderer: R,
    clock: C,
    sampler: Box<dyn GlyphSampler>,
    font: ResolvedFont,
    scene: Scene,
    camera: OrthoCamera,
    field: ParticleField,
    animation: AnimationController,
    time: Time,
    rng: SmallRng,
    running: bool,
}

impl<R: Renderer, C: Clock> Monogram<R, C> {
    /// Set up a monogram rasterizing with the system fonts.
    pub fn new(config: MonogramConfig, renderer: R, clock: C) -> Self {
        Self::with_sampler(config, renderer, clock, Box::new(GlyphRasterizer::new()))
    }

    /// Set up a monogram with a custom glyph source.
    ///
    /// Builds the scene and camera, populates the field from the configured
    /// letters and arms the rotation timer.
    pub fn with_sampler(
        config: MonogramConfig,
        renderer: R,
        clock: C,
        mut sampler: Box<dyn GlyphSampler>,
    ) -> Self {
        let font = sampler.resolve_font(&config.font);
        let scene = Scene::new(config.clear_color);
        let camera = OrthoCamera::new(renderer.viewport(), config.frustum_size);
        let animation = AnimationController::new(&config);

        let mut monogram = Self {
            config,
            renderer,
            clock,
            sampler,
            font,
            scene,
            camera,
            field: ParticleField::new(),
            animation,
            time: Time::new(),
            rng: SmallRng::from_entropy(),
            running: true,
        };

        monogram.populate();
        let now = monogram.clock.now();
        monogram.animation.arm(now);

        log::info!(
            "Monogram '{}'/'{}' ready with {} particles, font '{}'",
            monogram.config.front_text,
            monogram.config.back_text,
            monogram.field.len(),
            monogram.font.family
        );
        monogram
    }

    /// Use a fixed seed for breathing phases. Repopulates the field.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        if self.running {
            self.populate();
        }
        self
    }

    /// Rasterize both letters, join them and rebuild the field.
    fn populate(&mut self) {
        let params = RasterParams::from_config(&self.config);
        let points = match (self.config.front_char(), self.config.back_char()) {
            (Some(front), Some(back)) => {
                let front = self.sampler.sample(front, &self.font, &params);
                let back = self.sampler.sample(back, &self.font, &params);
                join(&front, &back)
            }
            _ => Vec::new(),
        };

        let material = self.renderer.create_basic_material(self.config.particle_color);
        self.field.populate(
            &points,
            material,
            self.config.particle_base_size,
            &mut self.scene.group,
            &mut self.renderer,
            &mut self.rng,
        );
    }

    /// Run one frame. Returns whether another frame should be scheduled.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let now = self.clock.now();
        self.time.update(now);
        self.animation.tick(now, &mut self.field, &mut self.scene.group);

        match self.renderer.submit_frame(&self.scene, &self.camera) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => {
                let viewport = self.renderer.viewport();
                self.renderer.resize(viewport);
            }
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory, stopping");
                self.teardown();
            }
            Err(e) => log::warn!("Frame dropped: {}", e),
        }

        self.running
    }

    /// Apply a new configuration.
    ///
    /// The field is rebuilt only when something that shapes it changed.
    /// Animation parameters take effect on the next tick either way.
    pub fn on_config_change(&mut self, config: MonogramConfig) {
        if !self.running {
            self.config = config;
            return;
        }

        let repopulate = self.config.needs_repopulate(&config);
        let font_changed = self.config.font != config.font;

        self.animation.apply_config(&config);
        self.scene.clear_color = config.clear_color;
        self.camera.frustum_size = config.frustum_size;
        self.config = config;

        if font_changed {
            self.font = self.sampler.resolve_font(&self.config.font);
        }
        if repopulate {
            self.populate();
            log::info!(
                "Rebuilt monogram '{}'/'{}' with {} particles",
                self.config.front_text,
                self.config.back_text,
                self.field.len()
            );
        }
    }

    /// Arm the rotation timer again, one delay from now.
    pub fn rearm_rotation(&mut self) {
        if self.running {
            let now = self.clock.now();
            self.animation.arm(now);
        }
    }

    /// Follow a viewport resize. Particle state is untouched.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.camera.resize(viewport);
        self.renderer.resize(viewport);
    }

    /// Stop the loop and release every resource. Idempotent.
    pub fn teardown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.animation.cancel();
        self.field.dispose(&mut self.scene.group, &mut self.renderer);
        log::info!("Monogram torn down after {} frames", self.time.frame());
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &MonogramConfig {
        &self.config
    }

    pub fn font(&self) -> &ResolvedFont {
        &self.font
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn rotation(&self) -> &RotationState {
        &self.field.rotation
    }

    pub fn is_rotation_armed(&self) -> bool {
        self.animation.is_armed()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &OrthoCamera {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn time(&self) -> &Time {
        &self.time
    }
}

impl<R: Renderer, C: Clock> Drop for Monogram<R, C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
