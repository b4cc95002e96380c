//! Monogram configuration.
//!
//! These types describe everything the host hands to the monogram: the two
//! letters, how they are rasterized, and how the particles animate. They
//! serialize to JSON so a configuration can be saved and loaded by the binary.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An opaque RGB color.
///
/// Serialized as a `"#rrggbb"` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Parse a `#rrggbb` string. The leading `#` is optional.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_hex)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }

    /// Color as linear-ish RGB in 0.0..=1.0.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Font weight, named the way CSS names them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Thin,
    Light,
    Normal,
    Medium,
    #[default]
    Bold,
    Black,
}

impl FontWeight {
    /// Numeric CSS weight (100-900).
    pub fn numeric(self) -> u16 {
        match self {
            FontWeight::Thin => 100,
            FontWeight::Light => 300,
            FontWeight::Normal => 400,
            FontWeight::Medium => 500,
            FontWeight::Bold => 700,
            FontWeight::Black => 900,
        }
    }
}

/// Which font to rasterize the glyphs with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// Family name. Also the fallback when `path` fails to load.
    pub name: String,
    /// Optional font file to register before rasterizing.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub weight: FontWeight,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            name: "Arial Black".to_string(),
            path: None,
            weight: FontWeight::Bold,
        }
    }
}

/// Complete monogram configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonogramConfig {
    /// Letter readable from the front. Only the first character is used.
    pub front_text: String,
    /// Letter readable after the quarter turn. Only the first character is used.
    pub back_text: String,
    /// Side of the square off-screen buffer, in pixels.
    pub canvas_size: u32,
    pub canvas_background: Color,
    /// Glyph height in pixels.
    pub font_size: f32,
    pub font: FontDescriptor,
    /// Radians per frame while rotating.
    pub rotation_speed: f32,
    /// Seconds after setup before the rotation starts.
    pub rotation_delay_secs: f32,
    pub particle_scale_speed: f32,
    pub particle_min_scale: f32,
    pub particle_max_scale: f32,
    pub particle_color: Color,
    /// Sphere radius of a particle at scale 1.0.
    pub particle_base_size: f32,
    /// Sampling stride over the off-screen buffer, in pixels.
    pub particle_gap: u32,
    /// Window background.
    pub clear_color: Color,
    /// Visible height of the orthographic camera, in world units.
    pub frustum_size: f32,
}

impl Default for MonogramConfig {
    fn default() -> Self {
        Self {
            front_text: "G".to_string(),
            back_text: "R".to_string(),
            canvas_size: 300,
            canvas_background: Color::BLACK,
            font_size: 200.0,
            font: FontDescriptor::default(),
            rotation_speed: 0.005,
            rotation_delay_secs: 1.0,
            particle_scale_speed: 3.0,
            particle_min_scale: 0.5,
            particle_max_scale: 1.5,
            particle_color: Color::WHITE,
            particle_base_size: 3.0,
            particle_gap: 10,
            clear_color: Color::from_hex(0x181818),
            frustum_size: 300.0,
        }
    }
}

impl MonogramConfig {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Whether switching to `other` requires rebuilding the particle field.
    ///
    /// Only inputs that change the rasterized points or the particle meshes
    /// count. Animation parameters can be swapped in place.
    pub fn needs_repopulate(&self, other: &MonogramConfig) -> bool {
        self.front_text != other.front_text
            || self.back_text != other.back_text
            || self.canvas_size != other.canvas_size
            || self.canvas_background != other.canvas_background
            || self.font_size != other.font_size
            || self.font != other.font
            || self.particle_gap != other.particle_gap
            || self.particle_color != other.particle_color
            || self.particle_base_size != other.particle_base_size
    }

    /// First character of the front text, if any.
    pub fn front_char(&self) -> Option<char> {
        self.front_text.chars().next()
    }

    /// First character of the back text, if any.
    pub fn back_char(&self) -> Option<char> {
        self.back_text.chars().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse() {
        assert_eq!(Color::parse("#181818").unwrap(), Color::rgb(0x18, 0x18, 0x18));
        assert_eq!(Color::parse("ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert!(Color::parse("#fff").is_err());
        assert!(Color::parse("#gggggg").is_err());
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex(0xffffff), Color::WHITE);
        assert_eq!(Color::from_hex(0x102030).to_string(), "#102030");
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let config = MonogramConfig::default();
        assert_eq!(config.front_char(), Some('G'));
        assert_eq!(config.back_char(), Some('R'));
        assert_eq!(config.canvas_size, 300);
        assert_eq!(config.particle_gap, 10);
        assert_eq!(config.rotation_speed, 0.005);
        assert_eq!(config.font.weight.numeric(), 700);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MonogramConfig =
            serde_json::from_str(r##"{"front_text": "A", "particle_color": "#ff0000"}"##).unwrap();
        assert_eq!(config.front_text, "A");
        assert_eq!(config.back_text, "R");
        assert_eq!(config.particle_color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_invalid_color_rejected() {
        let result: Result<MonogramConfig, _> =
            serde_json::from_str(r#"{"particle_color": "white"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monogram.json");

        let mut config = MonogramConfig::default();
        config.front_text = "M".into();
        config.font.weight = FontWeight::Black;
        config.save(&path).unwrap();

        assert_eq!(MonogramConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_needs_repopulate() {
        let base = MonogramConfig::default();

        let mut text = base.clone();
        text.back_text = "Q".into();
        assert!(base.needs_repopulate(&text));

        let mut speed = base.clone();
        speed.rotation_speed = 0.01;
        speed.particle_max_scale = 2.0;
        assert!(!base.needs_repopulate(&speed));
    }
}
