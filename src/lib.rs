//! # Monogram
//!
//! Two letters, one particle cloud. The front letter gives every particle
//! its X and Y; the back letter, read along the same pixel row, gives its Z.
//! Seen head-on the cloud spells the front letter. After a quarter turn
//! about the vertical axis it spells the back one.
//!
//! ## Quick Start
//!
//! ```ignore
//! use monogram::prelude::*;
//!
//! fn main() {
//!     let config = MonogramConfig {
//!         front_text: "A".into(),
//!         back_text: "Z".into(),
//!         ..Default::default()
//!     };
//!     monogram::window::run(config).unwrap();
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! front char --raster--> Sample2D[] --+
//!                                     +--join--> JoinedPoint[] --> ParticleField
//! back char  --raster--> Sample2D[] --+
//! ```
//!
//! Once per frame the [`Monogram`] driver advances the [`AnimationController`]
//! (breathing on every particle, plus a one-shot timed quarter turn) and
//! submits the [`Scene`] to a [`Renderer`].
//!
//! ## Running without a GPU
//!
//! [`HeadlessRenderer`] and [`ManualClock`] make the whole loop
//! deterministic, which is how the tests drive it:
//!
//! ```ignore
//! let clock = ManualClock::new();
//! let renderer = HeadlessRenderer::new(Viewport::new(800, 600));
//! let mut monogram = Monogram::new(MonogramConfig::default(), renderer, clock.clone());
//!
//! clock.advance_secs(1.0);
//! monogram.tick(); // rotation starts
//! ```

pub mod animation;
pub mod config;
mod driver;
pub mod error;
pub mod font;
pub mod input;
pub mod join;
pub mod particles;
pub mod raster;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;

pub use animation::{AnimationController, Breathing, OneShotTimer, RotationPhase, RotationState};
pub use config::{Color, FontDescriptor, FontWeight, MonogramConfig};
pub use driver::Monogram;
pub use error::{AppError, ConfigError, FontError, GpuError, RenderError};
pub use font::{FontLoader, ResolvedFont};
pub use glam::Vec3;
pub use join::{join, JoinedPoint};
pub use particles::{Particle, ParticleField};
pub use raster::{sample_mask, GlyphRasterizer, GlyphSampler, RasterParams, Sample2D};
pub use render::{GpuRenderer, HeadlessRenderer, MaterialId, MeshId, Renderer};
pub use scene::{Group, Node, OrthoCamera, Scene, Viewport};
pub use time::{Clock, ManualClock, SystemClock, Time};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use monogram::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::{RotationPhase, RotationState};
    pub use crate::config::{Color, FontDescriptor, FontWeight, MonogramConfig};
    pub use crate::driver::Monogram;
    pub use crate::join::JoinedPoint;
    pub use crate::raster::{GlyphRasterizer, GlyphSampler, RasterParams, Sample2D};
    pub use crate::render::{GpuRenderer, HeadlessRenderer, Renderer};
    pub use crate::scene::Viewport;
    pub use crate::time::{Clock, ManualClock, SystemClock};
    pub use crate::Vec3;
}
