// ABOUTME: Core library for dice-pool combat rolls.
// ABOUTME: Symbol aggregation, reroll policies, state-effect cancellation, RNG abstraction.

//! # Clashdice
//!
//! A dice-pool combat roller: colored 8-face dice over six combat symbols,
//! with conditional rerolls and post-roll die cancellation.
//!
//! ## Quick Start
//!
//! ```
//! use clashdice::{resolve_seeded, Face, FaceTable, Pool, RollConfig, SymbolKind};
//!
//! // One die color: two hit faces, six blanks.
//! let mut table = FaceTable::new();
//! let faces = (0..8)
//!     .map(|i| {
//!         if i < 2 {
//!             Face::new(vec![SymbolKind::FilledHit])
//!         } else {
//!             Face::empty()
//!         }
//!     })
//!     .collect();
//! table.insert("red", faces).unwrap();
//!
//! let pool = Pool::new().with("red", 3);
//! let outcome = resolve_seeded(&pool, &table, &RollConfig::default(), 42);
//! println!("hits: {}", outcome.totals.get(SymbolKind::FilledHit));
//! ```
//!
//! The pipeline is fixed: initial roll, at most one full reroll when the
//! configured trigger fires, selective redraws of the worst-scoring dice,
//! then Disarmed/Vulnerable cancellation. Every stage takes its inputs
//! explicitly and randomness comes through the [`Rng`] trait, so a seeded or
//! scripted source replays a roll exactly.

pub mod error;
pub mod expect;
pub mod reroll;
pub mod roller;
pub mod status;
pub mod symbol;
pub mod table;

pub use error::{Error, Result};
pub use expect::{color_expected_values, pool_expected_value};
pub use reroll::{
    resolve_roll, select_dice_to_reroll, should_reroll, PrioritySymbol, RerollCondition,
    RerollStats, RerollValueWeights, RollConfig, RollOutcome, SelectiveReroll,
};
pub use roller::{roll_pool, roll_pool_detailed, DetailedRoll, DieRoll, FastRng, Rng};
pub use status::{apply_cancellation, CancelPolicy, Direction};
pub use symbol::{Face, SymbolCounts, SymbolKind, SYMBOL_KINDS};
pub use table::{normalize_color, FaceTable, FixedDie, Pool, FACES_PER_DIE};

/// Resolve one roll with the default RNG.
pub fn resolve(pool: &Pool, table: &FaceTable, config: &RollConfig) -> RollOutcome {
    resolve_roll(pool, table, config, &[], &mut FastRng::new())
}

/// Resolve one roll with a seeded RNG for reproducible results.
pub fn resolve_seeded(
    pool: &Pool,
    table: &FaceTable,
    config: &RollConfig,
    seed: u64,
) -> RollOutcome {
    resolve_roll(pool, table, config, &[], &mut FastRng::with_seed(seed))
}
