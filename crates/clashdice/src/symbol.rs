// ABOUTME: Symbol kinds, rolled faces, and per-symbol counters.
// ABOUTME: Counting and elementwise arithmetic over the six combat symbols.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Number of distinct symbol kinds a face can carry.
pub const SYMBOL_KINDS: usize = 6;

/// One of the six combat symbols a die face can show.
///
/// Hollow variants are weaker/partial versions of the filled symbol,
/// unlocked only under specific rule toggles (e.g. elite promotion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    FilledHit,
    FilledBlock,
    FilledSpecial,
    HollowHit,
    HollowBlock,
    HollowSpecial,
}

impl SymbolKind {
    /// All kinds in counter order.
    pub const ALL: [SymbolKind; SYMBOL_KINDS] = [
        SymbolKind::FilledHit,
        SymbolKind::FilledBlock,
        SymbolKind::FilledSpecial,
        SymbolKind::HollowHit,
        SymbolKind::HollowBlock,
        SymbolKind::HollowSpecial,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            SymbolKind::FilledHit => 0,
            SymbolKind::FilledBlock => 1,
            SymbolKind::FilledSpecial => 2,
            SymbolKind::HollowHit => 3,
            SymbolKind::HollowBlock => 4,
            SymbolKind::HollowSpecial => 5,
        }
    }

    pub fn is_hollow(self) -> bool {
        matches!(
            self,
            SymbolKind::HollowHit | SymbolKind::HollowBlock | SymbolKind::HollowSpecial
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::FilledHit => "hit",
            SymbolKind::FilledBlock => "block",
            SymbolKind::FilledSpecial => "special",
            SymbolKind::HollowHit => "hollow_hit",
            SymbolKind::HollowBlock => "hollow_block",
            SymbolKind::HollowSpecial => "hollow_special",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SymbolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hit" | "filled_hit" => Ok(SymbolKind::FilledHit),
            "block" | "filled_block" => Ok(SymbolKind::FilledBlock),
            "special" | "filled_special" => Ok(SymbolKind::FilledSpecial),
            "hollow_hit" => Ok(SymbolKind::HollowHit),
            "hollow_block" => Ok(SymbolKind::HollowBlock),
            "hollow_special" => Ok(SymbolKind::HollowSpecial),
            _ => Err(Error::UnknownSymbol(s.to_string())),
        }
    }
}

/// One die face: zero or more symbol occurrences.
///
/// A face may repeat a symbol or show nothing at all; occurrence order is
/// irrelevant for counting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Face(Vec<SymbolKind>);

impl Face {
    pub fn new(symbols: Vec<SymbolKind>) -> Self {
        Self(symbols)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn symbols(&self) -> &[SymbolKind] {
        &self.0
    }

    /// Count this face's symbols into per-kind counters.
    pub fn counts(&self) -> SymbolCounts {
        let mut counts = SymbolCounts::default();
        for &symbol in &self.0 {
            counts.add(symbol, 1);
        }
        counts
    }
}

/// Six non-negative counters, one per [`SymbolKind`].
///
/// Used both for a single die's contribution and for a whole roll's
/// aggregate. Merging is elementwise and order-independent; removal
/// clamps at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymbolCounts([u32; SYMBOL_KINDS]);

impl SymbolCounts {
    pub fn get(&self, kind: SymbolKind) -> u32 {
        self.0[kind.index()]
    }

    pub fn add(&mut self, kind: SymbolKind, n: u32) {
        self.0[kind.index()] += n;
    }

    /// Elementwise addition of another counter set.
    pub fn merge(&mut self, other: &SymbolCounts) {
        for i in 0..SYMBOL_KINDS {
            self.0[i] += other.0[i];
        }
    }

    /// Elementwise subtraction, clamped at zero.
    pub fn saturating_remove(&mut self, other: &SymbolCounts) {
        for i in 0..SYMBOL_KINDS {
            self.0[i] = self.0[i].saturating_sub(other.0[i]);
        }
    }

    pub fn clear(&mut self) {
        self.0 = [0; SYMBOL_KINDS];
    }

    /// Total symbols across all six counters.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for SymbolCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in SymbolKind::ALL {
            let n = self.get(kind);
            if n == 0 {
                continue;
            }
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}x{}", n, kind)?;
            first = false;
        }
        if first {
            write!(f, "blank")?;
        }
        Ok(())
    }
}
