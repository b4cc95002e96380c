//! Integration tests for the monogram driver.
//!
//! These run the whole loop against `HeadlessRenderer` and `ManualClock`,
//! with a canned glyph source so results do not depend on installed fonts.

use std::cell::Cell;
use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;
use std::time::Duration;

use monogram::prelude::*;
use monogram::{
    FontDescriptor, MaterialId, MeshId, OrthoCamera, RenderError, ResolvedFont, RotationPhase,
    Scene,
};

// ============================================================================
// Fixtures
// ============================================================================

const FRAME: Duration = Duration::from_millis(16);

/// Block glyphs on a 10px grid, 5 rows from y=-20 to y=20.
struct BlockGlyphs {
    glyphs: HashMap<char, Vec<Sample2D>>,
}

impl BlockGlyphs {
    fn new() -> Self {
        let mut glyphs = HashMap::new();
        glyphs.insert('T', block(&["#####", "..#..", "..#..", "..#..", "..#.."]));
        glyphs.insert('L', block(&["#....", "#....", "#....", "#....", "#####"]));
        glyphs.insert('.', block(&[".....", ".....", ".....", ".....", "..#.."]));
        glyphs.insert('I', block(&["..#..", "..#..", "..#..", "..#..", "..#.."]));
        Self { glyphs }
    }
}

fn block(rows: &[&str]) -> Vec<Sample2D> {
    let mut samples = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            if c == '#' {
                samples.push(Sample2D {
                    x: col as i32 * 10 - 20,
                    y: row as i32 * 10 - 20,
                });
            }
        }
    }
    samples
}

impl GlyphSampler for BlockGlyphs {
    fn resolve_font(&mut self, descriptor: &FontDescriptor) -> ResolvedFont {
        ResolvedFont {
            family: descriptor.name.clone(),
            weight: descriptor.weight.numeric(),
        }
    }

    fn sample(&mut self, ch: char, _font: &ResolvedFont, _params: &RasterParams) -> Vec<Sample2D> {
        self.glyphs.get(&ch).cloned().unwrap_or_default()
    }
}

fn config(front: &str, back: &str) -> MonogramConfig {
    MonogramConfig {
        front_text: front.into(),
        back_text: back.into(),
        ..Default::default()
    }
}

fn start(
    config: MonogramConfig,
) -> (Monogram<HeadlessRenderer, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let renderer = HeadlessRenderer::new(Viewport::new(800, 600));
    let monogram =
        Monogram::with_sampler(config, renderer, clock.clone(), Box::new(BlockGlyphs::new()))
            .with_seed(42);
    (monogram, clock)
}

fn run_frames(monogram: &mut Monogram<HeadlessRenderer, ManualClock>, clock: &ManualClock, n: usize) {
    for _ in 0..n {
        clock.advance(FRAME);
        monogram.tick();
    }
}

// ============================================================================
// Setup and population
// ============================================================================

#[test]
fn test_setup_populates_joined_points() {
    let (monogram, _clock) = start(config("T", "L"));

    // Row -20: 5 vs 1 -> 5. Rows -10..10: 1 vs 1. Row 20: 1 vs 5 -> 5.
    assert_eq!(monogram.field().len(), 13);
    assert_eq!(monogram.scene().group.len(), 13);
    assert_eq!(monogram.renderer().resources().mesh_count(), 13);
    assert_eq!(monogram.renderer().resources().material_count(), 1);
    assert!(monogram.is_rotation_armed());
}

#[test]
fn test_particles_use_front_xy_and_back_x_as_depth() {
    let (monogram, _clock) = start(config("T", "L"));

    // Top row of the T against the single top-row pixel of the L (x = -20).
    let top: Vec<Vec3> = monogram
        .field()
        .particles()
        .iter()
        .map(|p| p.original_position())
        .filter(|p| p.y == 20.0)
        .collect();
    assert_eq!(top.len(), 5);
    assert!(top.iter().all(|p| p.z == -20.0));

    // Bottom row: the T stem (x = 0) is wrapped against the L foot.
    let bottom: Vec<Vec3> = monogram
        .field()
        .particles()
        .iter()
        .map(|p| p.original_position())
        .filter(|p| p.y == -20.0)
        .collect();
    let depths: Vec<f32> = bottom.iter().map(|p| p.z).collect();
    assert!(bottom.iter().all(|p| p.x == 0.0));
    assert_eq!(depths, vec![-20.0, -10.0, 0.0, 10.0, 20.0]);
}

#[test]
fn test_front_only_rows_produce_nothing() {
    let (monogram, _clock) = start(config("T", "."));

    assert_eq!(monogram.field().len(), 1);
    assert_eq!(monogram.field().particles()[0].original_position(), Vec3::new(0.0, -20.0, 0.0));
}

#[test]
fn test_unknown_or_empty_letters_give_empty_field() {
    let (mut monogram, clock) = start(config("T", "?"));
    assert!(monogram.field().is_empty());

    monogram.on_config_change(config("", "L"));
    assert!(monogram.field().is_empty());

    run_frames(&mut monogram, &clock, 3);
    assert_eq!(monogram.renderer().last_frame().unwrap().node_count, 0);
    assert!(monogram.is_running());
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn test_rotation_waits_for_delay() {
    let (mut monogram, clock) = start(config("T", "L"));

    run_frames(&mut monogram, &clock, 60);
    assert_eq!(clock.now(), Duration::from_millis(960));
    assert_eq!(monogram.rotation().phase(), RotationPhase::Idle);
    assert_eq!(monogram.rotation().current_y, 0.0);

    run_frames(&mut monogram, &clock, 3);
    assert_eq!(monogram.rotation().phase(), RotationPhase::Rotating);
    assert_eq!(monogram.rotation().target_y, FRAC_PI_2);
    assert!(!monogram.is_rotation_armed());
}

#[test]
fn test_rotation_reaches_back_letter_exactly() {
    let (mut monogram, clock) = start(config("T", "L"));
    clock.advance_secs(1.0);
    monogram.tick();
    assert_eq!(monogram.rotation().phase(), RotationPhase::Rotating);

    let max_frames = (FRAC_PI_2 / 0.005).ceil() as usize;
    let mut frames = 1;
    let mut previous = monogram.rotation().current_y;
    while monogram.rotation().is_rotating {
        clock.advance(FRAME);
        monogram.tick();
        frames += 1;
        assert!(monogram.rotation().current_y > previous);
        previous = monogram.rotation().current_y;
        assert!(frames <= max_frames);
    }

    assert_eq!(monogram.rotation().current_y, FRAC_PI_2);
    assert_eq!(monogram.scene().group.rotation_y, FRAC_PI_2);
    assert_eq!(monogram.renderer().last_frame().unwrap().rotation_y, FRAC_PI_2);

    // One rotation per arming.
    run_frames(&mut monogram, &clock, 200);
    assert_eq!(monogram.rotation().current_y, FRAC_PI_2);
}

#[test]
fn test_rearm_rotates_back_to_front() {
    let (mut monogram, clock) = start(config("T", "L"));
    clock.advance_secs(1.0);
    run_frames(&mut monogram, &clock, 400);
    assert_eq!(monogram.rotation().current_y, FRAC_PI_2);

    monogram.rearm_rotation();
    assert!(monogram.is_rotation_armed());
    clock.advance_secs(1.0);
    run_frames(&mut monogram, &clock, 400);

    assert_eq!(monogram.rotation().current_y, 0.0);
    assert_eq!(monogram.rotation().phase(), RotationPhase::Idle);
}

#[test]
fn test_rotation_survives_repopulation() {
    let (mut monogram, clock) = start(config("T", "L"));
    clock.advance_secs(1.0);
    run_frames(&mut monogram, &clock, 100);
    let angle = monogram.rotation().current_y;
    assert!(angle > 0.0 && angle < FRAC_PI_2);

    monogram.on_config_change(config("I", "L"));
    assert_eq!(monogram.rotation().current_y, angle);
    assert!(monogram.rotation().is_rotating);
}

// ============================================================================
// Breathing
// ============================================================================

#[test]
fn test_breathing_stays_in_bounds_every_frame() {
    let (mut monogram, clock) = start(config("T", "L"));

    for _ in 0..300 {
        clock.advance(FRAME);
        monogram.tick();
        let frame = monogram.renderer().last_frame().unwrap();
        assert_eq!(frame.scales.len(), 13);
        assert!(frame.scales.iter().all(|s| (0.5..=1.5).contains(s)));
    }
}

#[test]
fn test_breathing_matches_formula() {
    let (mut monogram, clock) = start(config("T", "L"));
    clock.set(Duration::from_millis(2500));
    monogram.tick();

    let elapsed = 2.5_f32;
    for (particle, node) in monogram
        .field()
        .particles()
        .iter()
        .zip(monogram.scene().group.nodes())
    {
        let expected = 0.5 + ((elapsed * 3.0 + particle.scale_offset()).sin() + 1.0) * 0.5;
        assert!((particle.current_scale - expected).abs() < 1e-4);
        assert_eq!(node.scale, Vec3::splat(particle.current_scale));
    }
}

#[test]
fn test_scale_offsets_are_fixed_per_particle() {
    let (mut monogram, clock) = start(config("T", "L"));
    let offsets: Vec<f32> = monogram.field().particles().iter().map(|p| p.scale_offset()).collect();

    run_frames(&mut monogram, &clock, 50);

    let after: Vec<f32> = monogram.field().particles().iter().map(|p| p.scale_offset()).collect();
    assert_eq!(offsets, after);
}

// ============================================================================
// Configuration changes
// ============================================================================

#[test]
fn test_text_change_replaces_generation_without_leaks() {
    let (mut monogram, clock) = start(config("T", "L"));
    let old_meshes: Vec<_> = monogram.field().particles().iter().map(|p| p.mesh()).collect();

    monogram.on_config_change(config("I", "L"));
    monogram.on_config_change(config("I", "T"));

    // I vs T: row -20 is 1 vs 5, the rest 1 vs 1.
    assert_eq!(monogram.field().len(), 9);
    assert_eq!(monogram.field().generation(), 4);
    assert_eq!(monogram.renderer().resources().mesh_count(), 9);
    assert_eq!(monogram.renderer().resources().material_count(), 1);
    assert!(old_meshes
        .iter()
        .all(|m| monogram.renderer().resources().mesh(*m).is_none()));

    run_frames(&mut monogram, &clock, 1);
    let frame = monogram.renderer().last_frame().unwrap();
    assert_eq!(frame.node_count, 9);
    assert_eq!(frame.dangling, 0);
}

#[test]
fn test_animation_change_keeps_particles() {
    let (mut monogram, _clock) = start(config("T", "L"));
    let generation = monogram.field().generation();

    let mut next = config("T", "L");
    next.rotation_speed = 0.02;
    next.particle_min_scale = 1.0;
    next.particle_max_scale = 1.0;
    monogram.on_config_change(next);

    assert_eq!(monogram.field().generation(), generation);
    assert_eq!(monogram.config().rotation_speed, 0.02);
}

#[test]
fn test_new_scale_bounds_apply_next_frame() {
    let (mut monogram, clock) = start(config("T", "L"));

    let mut next = config("T", "L");
    next.particle_min_scale = 2.0;
    next.particle_max_scale = 2.0;
    monogram.on_config_change(next);
    run_frames(&mut monogram, &clock, 1);

    let frame = monogram.renderer().last_frame().unwrap();
    assert!(frame.scales.iter().all(|s| *s == 2.0));
}

#[test]
fn test_color_change_repopulates_with_new_material() {
    let (mut monogram, _clock) = start(config("T", "L"));
    let old_material = monogram.field().material().unwrap();

    let mut next = config("T", "L");
    next.particle_color = Color::rgb(255, 0, 0);
    monogram.on_config_change(next);

    let material = monogram.field().material().unwrap();
    assert_ne!(material, old_material);
    assert_eq!(
        monogram.renderer().resources().material(material),
        Some(Color::rgb(255, 0, 0))
    );
    assert!(monogram.renderer().resources().material(old_material).is_none());
}

// ============================================================================
// Viewport and render errors
// ============================================================================

#[test]
fn test_resize_updates_camera_only() {
    let (mut monogram, _clock) = start(config("T", "L"));
    let positions: Vec<Vec3> = monogram.scene().group.nodes().iter().map(|n| n.position).collect();

    monogram.resize(Viewport::new(1000, 500));
    assert_eq!(monogram.camera().aspect(), 2.0);
    assert_eq!(monogram.renderer().viewport(), Viewport::new(1000, 500));

    monogram.resize(Viewport::new(0, 0));
    assert_eq!(monogram.camera().aspect(), 2.0);

    let after: Vec<Vec3> = monogram.scene().group.nodes().iter().map(|n| n.position).collect();
    assert_eq!(positions, after);
}

#[test]
fn test_out_of_memory_stops_the_loop() {
    let clock = ManualClock::new();
    let mut renderer = HeadlessRenderer::new(Viewport::new(800, 600));
    renderer.fail_next_frame(RenderError::OutOfMemory);
    let mut monogram =
        Monogram::with_sampler(config("T", "L"), renderer, clock.clone(), Box::new(BlockGlyphs::new()));

    clock.advance(FRAME);
    assert!(!monogram.tick());
    assert!(!monogram.is_running());
    assert_eq!(monogram.renderer().resources().mesh_count(), 0);
}

#[test]
fn test_lost_surface_keeps_running() {
    let clock = ManualClock::new();
    let mut renderer = HeadlessRenderer::new(Viewport::new(800, 600));
    renderer.fail_next_frame(RenderError::SurfaceLost);
    let mut monogram =
        Monogram::with_sampler(config("T", "L"), renderer, clock.clone(), Box::new(BlockGlyphs::new()));

    clock.advance(FRAME);
    assert!(monogram.tick());
    clock.advance(FRAME);
    assert!(monogram.tick());
    assert_eq!(monogram.renderer().frames(), 1);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_teardown_releases_everything() {
    let (mut monogram, clock) = start(config("T", "L"));
    run_frames(&mut monogram, &clock, 5);

    monogram.teardown();
    assert!(!monogram.is_running());
    assert!(!monogram.is_rotation_armed());
    assert!(monogram.field().is_empty());
    assert!(monogram.scene().group.is_empty());
    assert_eq!(monogram.renderer().resources().mesh_count(), 0);
    assert_eq!(monogram.renderer().resources().material_count(), 0);

    let frames = monogram.renderer().frames();
    clock.advance(Duration::from_secs(2));
    assert!(!monogram.tick());
    assert_eq!(monogram.renderer().frames(), frames);

    monogram.teardown();
    monogram.rearm_rotation();
    assert!(!monogram.is_rotation_armed());
}

/// Renderer that reports live resources through shared counters, so they
/// can be checked after the monogram is gone.
struct CountingRenderer {
    inner: HeadlessRenderer,
    live_meshes: Rc<Cell<usize>>,
    live_materials: Rc<Cell<usize>>,
}

impl Renderer for CountingRenderer {
    fn create_basic_material(&mut self, color: Color) -> MaterialId {
        self.live_materials.set(self.live_materials.get() + 1);
        self.inner.create_basic_material(color)
    }

    fn create_sphere_mesh(&mut self, radius: f32, material: MaterialId) -> MeshId {
        self.live_meshes.set(self.live_meshes.get() + 1);
        self.inner.create_sphere_mesh(radius, material)
    }

    fn dispose_mesh(&mut self, mesh: MeshId) {
        if self.inner.resources().mesh(mesh).is_some() {
            self.live_meshes.set(self.live_meshes.get() - 1);
        }
        self.inner.dispose_mesh(mesh);
    }

    fn dispose_material(&mut self, material: MaterialId) {
        if self.inner.resources().material(material).is_some() {
            self.live_materials.set(self.live_materials.get() - 1);
        }
        self.inner.dispose_material(material);
    }

    fn submit_frame(&mut self, scene: &Scene, camera: &OrthoCamera) -> Result<(), RenderError> {
        self.inner.submit_frame(scene, camera)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.inner.resize(viewport);
    }

    fn viewport(&self) -> Viewport {
        self.inner.viewport()
    }
}

#[test]
fn test_drop_tears_down() {
    let live_meshes = Rc::new(Cell::new(0));
    let live_materials = Rc::new(Cell::new(0));
    let renderer = CountingRenderer {
        inner: HeadlessRenderer::new(Viewport::new(640, 480)),
        live_meshes: live_meshes.clone(),
        live_materials: live_materials.clone(),
    };

    {
        let clock = ManualClock::new();
        let mut monogram =
            Monogram::with_sampler(config("T", "L"), renderer, clock.clone(), Box::new(BlockGlyphs::new()));
        monogram.on_config_change(config("L", "T"));
        assert_eq!(live_meshes.get(), 13);
        assert_eq!(live_materials.get(), 1);
    }

    assert_eq!(live_meshes.get(), 0);
    assert_eq!(live_materials.get(), 0);
}
