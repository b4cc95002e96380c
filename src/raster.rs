//! Glyph rasterization and grid sampling.
//!
//! A single character is drawn white, centred, into a square off-screen
//! image filled with the canvas background. The image is then sampled on a
//! regular grid, and every bright sample becomes a [`Sample2D`] relative to
//! the image centre.

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, Weight};
use image::{Pixel, Rgba, RgbaImage};

use crate::config::{Color, FontDescriptor, MonogramConfig};
use crate::font::{FontLoader, ResolvedFont};

/// Luma above which a sampled pixel counts as part of the glyph.
pub const LUMA_THRESHOLD: u8 = 128;

/// One bright pixel of a rasterized glyph, relative to the canvas centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Sample2D {
    pub x: i32,
    pub y: i32,
}

/// Off-screen canvas and sampling parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterParams {
    /// Side of the square canvas in pixels.
    pub canvas_size: u32,
    pub background: Color,
    /// Glyph height in pixels.
    pub glyph_height: f32,
    /// Grid step in both axes.
    pub stride: u32,
}

impl RasterParams {
    pub fn from_config(config: &MonogramConfig) -> Self {
        Self {
            canvas_size: config.canvas_size,
            background: config.canvas_background,
            glyph_height: config.font_size,
            stride: config.particle_gap,
        }
    }
}

/// Source of glyph samples.
///
/// [`GlyphRasterizer`] is the real implementation. Anything else that can
/// produce samples for a character (a canned bitmap font, a test double)
/// can stand in for it.
pub trait GlyphSampler {
    /// Resolve a font descriptor, registering any font file it names.
    fn resolve_font(&mut self, descriptor: &FontDescriptor) -> ResolvedFont;

    /// Sample `ch` rendered with `font`.
    fn sample(&mut self, ch: char, font: &ResolvedFont, params: &RasterParams) -> Vec<Sample2D>;
}

/// Renders characters with a shared font system and glyph cache.
pub struct GlyphRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    fonts: FontLoader,
}

impl GlyphRasterizer {
    /// Create a rasterizer backed by the system fonts.
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    pub fn with_font_system(font_system: FontSystem) -> Self {
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            fonts: FontLoader::new(),
        }
    }

    /// Rasterize `ch` and sample it. See [`sample_mask`].
    pub fn rasterize(&mut self, ch: char, font: &ResolvedFont, params: &RasterParams) -> Vec<Sample2D> {
        let canvas = self.render(ch, font, params);
        sample_mask(&canvas, params.stride)
    }

    /// Draw `ch` centred into a fresh canvas.
    pub fn render(&mut self, ch: char, font: &ResolvedFont, params: &RasterParams) -> RgbaImage {
        let size = params.canvas_size;
        let bg = params.background;
        let mut canvas = RgbaImage::from_pixel(size, size, Rgba([bg.r, bg.g, bg.b, 255]));

        let height = params.glyph_height;
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(height, height));
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new()
            .family(Family::Name(&font.family))
            .weight(Weight(font.weight));
        let mut utf8 = [0u8; 4];
        buffer.set_text(&mut self.font_system, ch.encode_utf8(&mut utf8), attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let (line_w, line_top) = buffer
            .layout_runs()
            .next()
            .map(|run| (run.line_w, run.line_top))
            .unwrap_or((0.0, 0.0));

        // Centre the line box on the canvas centre.
        let half = size as f32 / 2.0;
        let offset_x = (half - line_w / 2.0).round() as i32;
        let offset_y = (half - line_top - height / 2.0).round() as i32;

        let white = cosmic_text::Color::rgb(255, 255, 255);
        buffer.draw(&mut self.font_system, &mut self.swash_cache, white, |x, y, w, h, color| {
            let alpha = color.a();
            if alpha == 0 {
                return;
            }
            for py in y..y + h as i32 {
                for px in x..x + w as i32 {
                    let (cx, cy) = (px + offset_x, py + offset_y);
                    if cx < 0 || cy < 0 || cx >= size as i32 || cy >= size as i32 {
                        continue;
                    }
                    let pixel = canvas.get_pixel_mut(cx as u32, cy as u32);
                    blend(pixel, [color.r(), color.g(), color.b()], alpha);
                }
            }
        });

        canvas
    }
}

impl GlyphSampler for GlyphRasterizer {
    fn resolve_font(&mut self, descriptor: &FontDescriptor) -> ResolvedFont {
        self.fonts.resolve(descriptor, &mut self.font_system)
    }

    fn sample(&mut self, ch: char, font: &ResolvedFont, params: &RasterParams) -> Vec<Sample2D> {
        self.rasterize(ch, font, params)
    }
}

impl Default for GlyphRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn blend(dst: &mut Rgba<u8>, src: [u8; 3], alpha: u8) {
    let a = alpha as u32;
    for (d, s) in dst.0.iter_mut().zip(src) {
        *d = ((s as u32 * a + *d as u32 * (255 - a)) / 255) as u8;
    }
}

/// Sample `canvas` every `stride` pixels, row by row.
///
/// Pixels brighter than [`LUMA_THRESHOLD`] become samples, translated so the
/// canvas centre is the origin. A stride of 0 is treated as 1.
pub fn sample_mask(canvas: &RgbaImage, stride: u32) -> Vec<Sample2D> {
    let stride = stride.max(1) as usize;
    let (cx, cy) = ((canvas.width() / 2) as i32, (canvas.height() / 2) as i32);

    let mut samples = Vec::new();
    for y in (0..canvas.height()).step_by(stride) {
        for x in (0..canvas.width()).step_by(stride) {
            if canvas.get_pixel(x, y).to_luma()[0] > LUMA_THRESHOLD {
                samples.push(Sample2D {
                    x: x as i32 - cx,
                    y: y as i32 - cy,
                });
            }
        }
    }
    samples
}
