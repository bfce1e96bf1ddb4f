//! Level text parsing and the level set loaded from a manifest.
//!
//! A level is a grid of single-character cells:
//!
//! ```text
//! x  wall        v  vortex
//! s  star        f  finish marker
//! (space) empty
//! ```
//!
//! The last text line is the bottom row of the maze. Cell centers sit at
//! `(tile * col + tile/2, tile * row - tile/2)` with row 0 at the bottom, so
//! the bottom row straddles y = 0 half off-screen.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Deserialize;

use crate::categories::Category;

/// One entity to create, straight out of the level text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityDescriptor {
    pub category: Category,
    pub position: Vec2,
}

/// Everything that can go wrong while loading or parsing levels.
/// All of these are fatal at startup; levels never fail mid-game.
#[derive(Debug)]
pub enum LevelError {
    /// A character outside the level alphabet.
    UnknownSymbol { symbol: char, row: usize, column: usize },
    /// A 1-based level index past the end of the set.
    LevelOutOfRange { index: usize, total: usize },
    /// The manifest names a level file the loader cannot find.
    MissingAsset { name: String },
    /// The manifest is not valid JSON.
    Manifest(serde_json::Error),
    /// Filesystem error reading the manifest or a level file.
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::UnknownSymbol { symbol, row, column } => {
                write!(f, "unknown level symbol {symbol:?} at row {row}, column {column}")
            }
            LevelError::LevelOutOfRange { index, total } => {
                write!(f, "level {index} out of range (set has {total})")
            }
            LevelError::MissingAsset { name } => {
                write!(f, "level asset {name:?} not found")
            }
            LevelError::Manifest(err) => write!(f, "bad level manifest: {err}"),
            LevelError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl Error for LevelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LevelError::Manifest(err) => Some(err),
            LevelError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parse level text into entity descriptors.
///
/// Rows are numbered bottom-up: the last text line is row 0. Empty cells
/// produce nothing; any character outside the alphabet is an error.
pub fn parse(text: &str, tile_size: f32) -> Result<Vec<EntityDescriptor>, LevelError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = Vec::new();

    for (row, line) in lines.iter().rev().enumerate() {
        for (column, symbol) in line.chars().enumerate() {
            let category = match symbol {
                'x' => Category::Wall,
                'v' => Category::Vortex,
                's' => Category::Star,
                'f' => Category::Finish,
                ' ' => continue,
                _ => return Err(LevelError::UnknownSymbol { symbol, row, column }),
            };
            let position = Vec2::new(
                tile_size * column as f32 + tile_size / 2.0,
                tile_size * row as f32 - tile_size / 2.0,
            );
            out.push(EntityDescriptor { category, position });
        }
    }

    Ok(out)
}

#[derive(Debug, Deserialize)]
struct LevelManifest {
    tile_size: f32,
    spawn: [f32; 2],
    levels: Vec<String>,
}

/// An ordered set of levels sharing a tile size and player spawn point.
/// Level indices are 1-based throughout.
#[derive(Debug, Clone)]
pub struct LevelSet {
    tile_size: f32,
    spawn: Vec2,
    names: Vec<String>,
    texts: Vec<String>,
}

const MANIFEST_JSON: &str = include_str!("../levels/manifest.json");

const EMBEDDED_LEVELS: &[(&str, &str)] = &[
    ("level1.txt", include_str!("../levels/level1.txt")),
    ("level2.txt", include_str!("../levels/level2.txt")),
];

impl LevelSet {
    /// The level set compiled into the binary.
    pub fn embedded() -> Result<Self, LevelError> {
        let manifest: LevelManifest =
            serde_json::from_str(MANIFEST_JSON).map_err(LevelError::Manifest)?;
        Self::from_manifest(manifest, |name| {
            EMBEDDED_LEVELS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, text)| (*text).to_string())
                .ok_or_else(|| LevelError::MissingAsset { name: name.to_string() })
        })
    }

    /// Load a level set from a directory containing `manifest.json` and the
    /// level files it names.
    pub fn from_dir(dir: &Path) -> Result<Self, LevelError> {
        let manifest_path = dir.join("manifest.json");
        let json = fs::read_to_string(&manifest_path).map_err(|source| LevelError::Io {
            path: manifest_path,
            source,
        })?;
        let manifest: LevelManifest =
            serde_json::from_str(&json).map_err(LevelError::Manifest)?;
        Self::from_manifest(manifest, |name| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| LevelError::Io { path, source })
        })
    }

    /// Build a level set directly from level texts. Mostly useful for tests
    /// and tools; the game loads through a manifest.
    pub fn new(tile_size: f32, spawn: Vec2, texts: Vec<String>) -> Self {
        let names = (1..=texts.len()).map(|i| format!("level{i}")).collect();
        Self { tile_size, spawn, names, texts }
    }

    fn from_manifest(
        manifest: LevelManifest,
        mut load: impl FnMut(&str) -> Result<String, LevelError>,
    ) -> Result<Self, LevelError> {
        let mut texts = Vec::with_capacity(manifest.levels.len());
        for name in &manifest.levels {
            texts.push(load(name)?);
        }
        Ok(Self {
            tile_size: manifest.tile_size,
            spawn: Vec2::new(manifest.spawn[0], manifest.spawn[1]),
            names: manifest.levels,
            texts,
        })
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Player spawn position, shared by every level in the set.
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Number of levels in the set.
    pub fn total(&self) -> usize {
        self.texts.len()
    }

    /// Raw text of a level by 1-based index.
    pub fn text(&self, index: usize) -> Result<&str, LevelError> {
        if index == 0 || index > self.texts.len() {
            return Err(LevelError::LevelOutOfRange { index, total: self.texts.len() });
        }
        Ok(&self.texts[index - 1])
    }

    /// Parse a level by 1-based index.
    pub fn parse_level(&self, index: usize) -> Result<Vec<EntityDescriptor>, LevelError> {
        let text = self.text(index)?;
        parse(text, self.tile_size).map_err(|err| {
            log::error!("level {:?} failed to parse: {err}", self.names[index - 1]);
            err
        })
    }

    /// Parse every level, failing on the first bad one. Run at startup so a
    /// broken asset is a hard launch failure instead of a mid-game surprise.
    pub fn parse_all(&self) -> Result<Vec<Vec<EntityDescriptor>>, LevelError> {
        (1..=self.total()).map(|i| self.parse_level(i)).collect()
    }
}
