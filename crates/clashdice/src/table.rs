// ABOUTME: Face table, dice pool, and externally-forced dice.
// ABOUTME: Input boundary types; the face table is validated once at load time.

use crate::error::{Error, Result};
use crate::symbol::Face;
use std::collections::{BTreeMap, HashMap};

/// Every die color has exactly this many faces.
pub const FACES_PER_DIE: usize = 8;

/// Canonical form of a color name: trimmed, ASCII-lowercased.
pub fn normalize_color(color: &str) -> String {
    color.trim().to_ascii_lowercase()
}

/// Per-color face distributions, keyed by normalized color name.
///
/// Read-only once built; every color maps to exactly 8 ordered faces.
/// Colors absent from the table are skipped silently at roll time.
#[derive(Debug, Clone, Default)]
pub struct FaceTable {
    colors: HashMap<String, [Face; FACES_PER_DIE]>,
}

impl FaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a color's distribution. Rejects anything but exactly 8 faces;
    /// this is the only face-table failure and it happens at load time.
    pub fn insert(&mut self, color: &str, faces: Vec<Face>) -> Result<()> {
        let faces: [Face; FACES_PER_DIE] =
            faces.try_into().map_err(|faces: Vec<Face>| Error::WrongFaceCount {
                color: color.to_string(),
                count: faces.len(),
                expected: FACES_PER_DIE,
            })?;
        self.colors.insert(normalize_color(color), faces);
        Ok(())
    }

    pub fn faces(&self, color: &str) -> Option<&[Face; FACES_PER_DIE]> {
        self.colors.get(&normalize_color(color))
    }

    pub fn contains(&self, color: &str) -> bool {
        self.colors.contains_key(&normalize_color(color))
    }

    /// Iterate (normalized color, faces) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Face; FACES_PER_DIE])> {
        self.colors.iter().map(|(color, faces)| (color.as_str(), faces))
    }
}

/// The multiset of dice being rolled together: color -> die count.
///
/// Stored sorted by normalized color so draw order is deterministic for a
/// given pool, which keeps seeded rolls reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pool {
    counts: BTreeMap<String, u32>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a color's die count. Negative counts clamp to zero.
    pub fn set(&mut self, color: &str, count: i64) {
        self.counts
            .insert(normalize_color(color), count.max(0) as u32);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, color: &str, count: i64) -> Self {
        self.set(color, count);
        self
    }

    pub fn get(&self, color: &str) -> u32 {
        self.counts.get(&normalize_color(color)).copied().unwrap_or(0)
    }

    /// Iterate (normalized color, count) pairs in sorted color order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(color, &count)| (color.as_str(), count))
    }

    pub fn total_dice(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_dice() == 0
    }
}

/// An externally-forced die: this color's next die takes the given face
/// instead of a random draw.
///
/// The face index is validated at construction so rolling never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDie {
    color: String,
    face_index: usize,
}

impl FixedDie {
    pub fn new(color: &str, face_index: usize) -> Result<Self> {
        if face_index >= FACES_PER_DIE {
            return Err(Error::FaceIndexOutOfRange(face_index));
        }
        Ok(Self {
            color: normalize_color(color),
            face_index,
        })
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn face_index(&self) -> usize {
        self.face_index
    }
}
