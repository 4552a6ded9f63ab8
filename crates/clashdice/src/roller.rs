// ABOUTME: Pool rolling: random face draws, symbol aggregation, per-die records.
// ABOUTME: Randomness is injected through the Rng trait for deterministic replay.

use crate::symbol::SymbolCounts;
use crate::table::{FaceTable, FixedDie, Pool, FACES_PER_DIE};
use std::fmt;

/// Trait for random number generation, allowing for testing with fixed values.
pub trait Rng {
    /// Uniform sample in [0, 1).
    fn sample(&mut self) -> f64;

    /// Uniform face index in 0..8, derived from [`sample`](Self::sample).
    fn face_index(&mut self) -> usize {
        let index = (self.sample() * FACES_PER_DIE as f64) as usize;
        index.min(FACES_PER_DIE - 1)
    }
}

/// Default RNG using fastrand.
pub struct FastRng(fastrand::Rng);

impl FastRng {
    pub fn new() -> Self {
        Self(fastrand::Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Default for FastRng {
    fn default() -> Self {
        Self::new()
    }
}

impl Rng for FastRng {
    fn sample(&mut self) -> f64 {
        self.0.f64()
    }
}

/// One die's resolved result: its color, the face drawn, and that face's
/// symbol counts. Counts may later be zeroed by a state effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DieRoll {
    pub color: String,
    pub face_index: usize,
    pub counts: SymbolCounts,
}

impl fmt::Display for DieRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.color, self.face_index, self.counts)
    }
}

/// A roll with per-die visibility, needed for selective rerolls and state
/// effects. `totals` is always the elementwise sum of `dice`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailedRoll {
    pub dice: Vec<DieRoll>,
    pub totals: SymbolCounts,
}

impl DetailedRoll {
    /// Recompute `totals` from the per-die list. Order-independent, so a
    /// full recomputation after redraws is always consistent.
    pub fn retotal(&mut self) {
        let mut totals = SymbolCounts::default();
        for die in &self.dice {
            totals.merge(&die.counts);
        }
        self.totals = totals;
    }
}

/// Roll a pool, aggregate-only. Avoids the per-die allocation when no
/// downstream stage needs individual dice.
///
/// Colors missing from the face table are skipped silently; an empty pool
/// yields an all-zero aggregate. Forced dice consume their color's first
/// draws in order.
pub fn roll_pool(
    pool: &Pool,
    table: &FaceTable,
    fixed: &[FixedDie],
    rng: &mut impl Rng,
) -> SymbolCounts {
    let mut totals = SymbolCounts::default();
    for_each_die(pool, table, fixed, rng, |_, _, counts| {
        totals.merge(&counts);
    });
    totals
}

/// Roll a pool keeping a per-die record in draw order.
pub fn roll_pool_detailed(
    pool: &Pool,
    table: &FaceTable,
    fixed: &[FixedDie],
    rng: &mut impl Rng,
) -> DetailedRoll {
    let mut roll = DetailedRoll::default();
    for_each_die(pool, table, fixed, rng, |color, face_index, counts| {
        roll.totals.merge(&counts);
        roll.dice.push(DieRoll {
            color: color.to_string(),
            face_index,
            counts,
        });
    });
    roll
}

/// Redraw a single die in place: new uniform face for its color.
/// No-op if the die's color has left the table (it cannot, in practice).
pub(crate) fn redraw_die(die: &mut DieRoll, table: &FaceTable, rng: &mut impl Rng) {
    if let Some(faces) = table.faces(&die.color) {
        let face_index = rng.face_index();
        die.face_index = face_index;
        die.counts = faces[face_index].counts();
    }
}

fn for_each_die(
    pool: &Pool,
    table: &FaceTable,
    fixed: &[FixedDie],
    rng: &mut impl Rng,
    mut visit: impl FnMut(&str, usize, SymbolCounts),
) {
    for (color, count) in pool.iter() {
        let Some(faces) = table.faces(color) else {
            continue;
        };
        let mut forced = fixed
            .iter()
            .filter(|die| die.color() == color)
            .map(FixedDie::face_index);
        for _ in 0..count {
            let face_index = forced.next().unwrap_or_else(|| rng.face_index());
            visit(color, face_index, faces[face_index].counts());
        }
    }
}
