// ABOUTME: Combat-state effects: Disarmed and Vulnerable die cancellation.
// ABOUTME: Each cancels one rolled die chosen by a fixed priority rule.

use crate::roller::DieRoll;
use crate::symbol::{SymbolCounts, SymbolKind};

/// Preference direction for a tie-break criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Most,
    Fewest,
}

impl Direction {
    fn wins(self, challenger: u32, incumbent: u32) -> bool {
        match self {
            Direction::Most => challenger > incumbent,
            Direction::Fewest => challenger < incumbent,
        }
    }
}

/// How a state effect picks the die to cancel: an eligibility floor on one
/// symbol, plus ordered tie-break criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelPolicy {
    pub eligibility: (SymbolKind, u32),
    pub criteria: [(SymbolKind, Direction); 2],
}

impl CancelPolicy {
    /// Disarmed: needs a filled hit; prefers most filled hits, then most
    /// filled specials.
    pub fn disarmed() -> Self {
        Self {
            eligibility: (SymbolKind::FilledHit, 1),
            criteria: [
                (SymbolKind::FilledHit, Direction::Most),
                (SymbolKind::FilledSpecial, Direction::Most),
            ],
        }
    }

    /// Vulnerable: needs a filled block; prefers most filled blocks, then
    /// most filled specials.
    pub fn vulnerable() -> Self {
        Self {
            eligibility: (SymbolKind::FilledBlock, 1),
            criteria: [
                (SymbolKind::FilledBlock, Direction::Most),
                (SymbolKind::FilledSpecial, Direction::Most),
            ],
        }
    }
}

/// Cancel one die under `policy`: pick among eligible dice, subtract the
/// chosen die's full six counters (filled and hollow) from the aggregate
/// with clamping at zero, and zero the die's own counters in place.
///
/// No eligible die is a no-op. A challenger displaces the incumbent only by
/// strictly winning the first criterion; a tie on it keeps the earlier die
/// and later criteria are never consulted for that pair.
pub fn apply_cancellation(dice: &mut [DieRoll], totals: &mut SymbolCounts, policy: &CancelPolicy) {
    let (symbol, minimum) = policy.eligibility;
    let mut best: Option<usize> = None;
    for (i, die) in dice.iter().enumerate() {
        if die.counts.get(symbol) < minimum {
            continue;
        }
        match best {
            None => best = Some(i),
            Some(incumbent) => {
                let (criterion, direction) = policy.criteria[0];
                if direction.wins(
                    die.counts.get(criterion),
                    dice[incumbent].counts.get(criterion),
                ) {
                    best = Some(i);
                }
            }
        }
    }
    if let Some(chosen) = best {
        totals.saturating_remove(&dice[chosen].counts);
        dice[chosen].counts.clear();
    }
}
