//! Font resolution.
//!
//! Turns a [`FontDescriptor`] into a family name the text system can shape
//! with. A descriptor with a font file registers that file first; if that
//! fails for any reason the configured family name is used instead.
//!
//! Each registered file gets a family name of its own, so an installed font
//! with the same family and weight can never be picked in its place. A file
//! is registered once per loader; resolving it again reuses that family.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use cosmic_text::fontdb::Language;
use cosmic_text::FontSystem;

use crate::config::FontDescriptor;
use crate::error::FontError;

const FAMILY_PREFIX: &str = "monogram-face";

/// A font ready for rasterization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFont {
    pub family: String,
    /// Numeric CSS weight.
    pub weight: u16,
}

/// Registers font files with a [`FontSystem`] and remembers what it loaded.
///
/// A loader must always be used with the same font system.
#[derive(Debug, Default)]
pub struct FontLoader {
    loaded: HashMap<PathBuf, String>,
}

impl FontLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `descriptor` against `font_system`, registering its file if any.
    ///
    /// Never fails. Load failures are logged and fall back to `descriptor.name`.
    pub fn resolve(&mut self, descriptor: &FontDescriptor, font_system: &mut FontSystem) -> ResolvedFont {
        let weight = descriptor.weight.numeric();
        let Some(path) = descriptor.path.as_deref() else {
            return ResolvedFont {
                family: descriptor.name.clone(),
                weight,
            };
        };

        if let Some(family) = self.loaded.get(path) {
            return ResolvedFont {
                family: family.clone(),
                weight,
            };
        }

        match self.register(path, font_system) {
            Ok(family) => {
                log::debug!("Loaded font {} as '{}'", path.display(), family);
                self.loaded.insert(path.to_path_buf(), family.clone());
                ResolvedFont { family, weight }
            }
            Err(e) => {
                log::warn!(
                    "Font loading failed for {}: {}, falling back to '{}'",
                    path.display(),
                    e,
                    descriptor.name
                );
                ResolvedFont {
                    family: descriptor.name.clone(),
                    weight,
                }
            }
        }
    }

    /// Number of font files registered so far.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Register every face in the file at `path` under a fresh family name.
    fn register(&self, path: &Path, font_system: &mut FontSystem) -> Result<String, FontError> {
        let data = fs::read(path)?;

        let db = font_system.db_mut();
        let before: HashSet<_> = db.faces().map(|face| face.id).collect();
        db.load_font_data(data);
        let added: Vec<_> = db
            .faces()
            .filter(|face| !before.contains(&face.id))
            .map(|face| face.id)
            .collect();
        if added.is_empty() {
            return Err(FontError::NoFace);
        }

        let family = format!("{}-{}", FAMILY_PREFIX, self.loaded.len());
        for id in added {
            let Some(mut info) = db.face(id).cloned() else {
                continue;
            };
            db.remove_face(id);
            info.families = vec![(family.clone(), Language::English_UnitedStates)];
            db.push_face_info(info);
        }
        Ok(family)
    }
}
