// ABOUTME: Reroll triggers, selective die scoring, and roll orchestration.
// ABOUTME: Fixed pipeline: roll, one optional full reroll, selective redraws, state effects.

use crate::expect::{color_expected_values, pool_expected_value};
use crate::roller::{redraw_die, roll_pool, roll_pool_detailed, DieRoll, Rng};
use crate::status::{apply_cancellation, CancelPolicy};
use crate::symbol::{SymbolCounts, SymbolKind, SYMBOL_KINDS};
use crate::table::{FaceTable, FixedDie, Pool};

/// Predicate over a completed roll's aggregate deciding whether the one-time
/// full reroll fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RerollCondition {
    /// Aggregate count of `symbol` is strictly below the pool's expectation.
    BelowExpected { symbol: SymbolKind },
    /// Aggregate count of `symbol` is strictly below `threshold`.
    MinSymbolThreshold { symbol: SymbolKind, threshold: u32 },
    /// Aggregate count of `symbol` is exactly zero.
    SymbolAbsent { symbol: SymbolKind },
}

/// Evaluate a reroll trigger against a completed roll's aggregate.
///
/// Pool and face table are consulted only by `BelowExpected`, which has to
/// recompute the pool's expectation.
pub fn should_reroll(
    totals: &SymbolCounts,
    condition: &RerollCondition,
    pool: &Pool,
    table: &FaceTable,
) -> bool {
    match condition {
        RerollCondition::BelowExpected { symbol } => {
            (totals.get(*symbol) as f64) < pool_expected_value(pool, table, *symbol)
        }
        RerollCondition::MinSymbolThreshold { symbol, threshold } => {
            totals.get(*symbol) < *threshold
        }
        RerollCondition::SymbolAbsent { symbol } => totals.get(*symbol) == 0,
    }
}

/// The symbol family a selective reroll tries to improve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrioritySymbol {
    Hits,
    Blocks,
    Specials,
}

impl PrioritySymbol {
    pub fn filled(self) -> SymbolKind {
        match self {
            PrioritySymbol::Hits => SymbolKind::FilledHit,
            PrioritySymbol::Blocks => SymbolKind::FilledBlock,
            PrioritySymbol::Specials => SymbolKind::FilledSpecial,
        }
    }

    pub fn hollow(self) -> SymbolKind {
        match self {
            PrioritySymbol::Hits => SymbolKind::HollowHit,
            PrioritySymbol::Blocks => SymbolKind::HollowBlock,
            PrioritySymbol::Specials => SymbolKind::HollowSpecial,
        }
    }
}

/// Six weights defining a linear score over a die's symbol counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RerollValueWeights([f64; SYMBOL_KINDS]);

impl RerollValueWeights {
    pub fn new(weights: [f64; SYMBOL_KINDS]) -> Self {
        Self(weights)
    }

    /// Priority-mode weights: 1 for the target filled symbol, 1 for its
    /// hollow counterpart iff `count_hollow_as_filled`, 0 elsewhere.
    pub fn priority(priority: PrioritySymbol, count_hollow_as_filled: bool) -> Self {
        let mut weights = [0.0; SYMBOL_KINDS];
        weights[priority.filled().index()] = 1.0;
        if count_hollow_as_filled {
            weights[priority.hollow().index()] = 1.0;
        }
        Self(weights)
    }

    pub fn get(&self, kind: SymbolKind) -> f64 {
        self.0[kind.index()]
    }

    /// Weighted linear combination of the six counters.
    pub fn score(&self, counts: &SymbolCounts) -> f64 {
        SymbolKind::ALL
            .into_iter()
            .map(|kind| self.0[kind.index()] * counts.get(kind) as f64)
            .sum()
    }
}

/// Pick the worst-performing dice for individual redraws.
///
/// A die's score is its weighted symbol value minus its color's per-die
/// expectation; only strictly negative scores qualify. Returns at most
/// `max_dice` indices, most underperforming first (stable on ties, so roll
/// order breaks them).
pub fn select_dice_to_reroll(
    dice: &[DieRoll],
    max_dice: usize,
    weights: &RerollValueWeights,
    table: &FaceTable,
) -> Vec<usize> {
    let expected = color_expected_values(table, weights);
    let mut scored: Vec<(usize, f64)> = dice
        .iter()
        .enumerate()
        .filter_map(|(i, die)| {
            let baseline = expected.get(die.color.as_str())?;
            let score = weights.score(&die.counts) - baseline;
            (score < 0.0).then_some((i, score))
        })
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.truncate(max_dice);
    scored.into_iter().map(|(i, _)| i).collect()
}

/// Selective-reroll configuration: which symbol family to chase, whether
/// hollow symbols count toward it, and how many dice may be redrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectiveReroll {
    pub priority: PrioritySymbol,
    pub count_hollow_as_filled: bool,
    pub max_dice: usize,
}

/// Full configuration for one resolved roll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollConfig {
    pub full_reroll: Option<RerollCondition>,
    pub selective_reroll: Option<SelectiveReroll>,
    pub disarmed: bool,
    pub vulnerable: bool,
}

impl RollConfig {
    /// Whether any stage needs per-die visibility. Without it the roll can
    /// short-circuit to the aggregate-only path.
    fn needs_detail(&self) -> bool {
        self.selective_reroll.is_some() || self.disarmed || self.vulnerable
    }
}

/// Observability counters for one resolved roll; no behavioral weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RerollStats {
    /// Full-pool rerolls taken (0 or 1).
    pub full_rerolls: u32,
    /// Individual dice selectively redrawn.
    pub dice_rerolled: u32,
}

/// A fully resolved roll. `dice` is empty when the configuration allowed the
/// aggregate-only path; otherwise `totals` equals the sum of `dice`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollOutcome {
    pub dice: Vec<DieRoll>,
    pub totals: SymbolCounts,
    pub stats: RerollStats,
}

/// Resolve one roll end to end.
///
/// Stage order is fixed: initial roll, then at most one full reroll (a
/// wholesale replacement that never chains even if the new aggregate still
/// satisfies the trigger), then selective redraws on the post-reroll state
/// with the aggregate recomputed from the die list, then Disarmed and
/// Vulnerable in that order. Forced dice stay forced across a full reroll.
pub fn resolve_roll(
    pool: &Pool,
    table: &FaceTable,
    config: &RollConfig,
    fixed: &[FixedDie],
    rng: &mut impl Rng,
) -> RollOutcome {
    let mut stats = RerollStats::default();

    if !config.needs_detail() {
        let mut totals = roll_pool(pool, table, fixed, rng);
        if let Some(condition) = &config.full_reroll {
            if should_reroll(&totals, condition, pool, table) {
                totals = roll_pool(pool, table, fixed, rng);
                stats.full_rerolls = 1;
            }
        }
        return RollOutcome {
            dice: Vec::new(),
            totals,
            stats,
        };
    }

    let mut roll = roll_pool_detailed(pool, table, fixed, rng);

    if let Some(condition) = &config.full_reroll {
        if should_reroll(&roll.totals, condition, pool, table) {
            roll = roll_pool_detailed(pool, table, fixed, rng);
            stats.full_rerolls = 1;
        }
    }

    if let Some(selective) = &config.selective_reroll {
        let weights =
            RerollValueWeights::priority(selective.priority, selective.count_hollow_as_filled);
        let picks = select_dice_to_reroll(&roll.dice, selective.max_dice, &weights, table);
        for &i in &picks {
            redraw_die(&mut roll.dice[i], table, rng);
        }
        roll.retotal();
        stats.dice_rerolled = picks.len() as u32;
    }

    if config.disarmed {
        apply_cancellation(&mut roll.dice, &mut roll.totals, &CancelPolicy::disarmed());
    }
    if config.vulnerable {
        apply_cancellation(&mut roll.dice, &mut roll.totals, &CancelPolicy::vulnerable());
    }

    RollOutcome {
        dice: roll.dice,
        totals: roll.totals,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roller::tests::{red_table, ScriptedRng};
    use crate::symbol::Face;
    use crate::table::FACES_PER_DIE;

    fn one_hit_face_table() -> FaceTable {
        // Exactly one hit face: expectation 1/8 per die.
        let faces = (0..FACES_PER_DIE)
            .map(|i| {
                if i == 0 {
                    Face::new(vec![SymbolKind::FilledHit])
                } else {
                    Face::empty()
                }
            })
            .collect();
        let mut table = FaceTable::new();
        table.insert("red", faces).unwrap();
        table
    }

    #[test]
    fn test_below_expected_triggers_on_zero() {
        let table = one_hit_face_table();
        let pool = Pool::new().with("red", 1);
        let condition = RerollCondition::BelowExpected {
            symbol: SymbolKind::FilledHit,
        };
        let zero = SymbolCounts::default();
        assert!(should_reroll(&zero, &condition, &pool, &table));

        let mut one = SymbolCounts::default();
        one.add(SymbolKind::FilledHit, 1);
        assert!(!should_reroll(&one, &condition, &pool, &table));
    }

    #[test]
    fn test_threshold_is_strict() {
        let table = one_hit_face_table();
        let pool = Pool::new().with("red", 1);
        let condition = RerollCondition::MinSymbolThreshold {
            symbol: SymbolKind::FilledHit,
            threshold: 2,
        };
        let mut totals = SymbolCounts::default();
        totals.add(SymbolKind::FilledHit, 1);
        assert!(should_reroll(&totals, &condition, &pool, &table));
        totals.add(SymbolKind::FilledHit, 1);
        assert!(!should_reroll(&totals, &condition, &pool, &table));

        // Threshold zero can never fire.
        let never = RerollCondition::MinSymbolThreshold {
            symbol: SymbolKind::FilledHit,
            threshold: 0,
        };
        assert!(!should_reroll(&SymbolCounts::default(), &never, &pool, &table));
    }

    #[test]
    fn test_symbol_absent() {
        let table = one_hit_face_table();
        let pool = Pool::new().with("red", 1);
        let condition = RerollCondition::SymbolAbsent {
            symbol: SymbolKind::FilledBlock,
        };
        assert!(should_reroll(&SymbolCounts::default(), &condition, &pool, &table));
        let mut totals = SymbolCounts::default();
        totals.add(SymbolKind::FilledBlock, 1);
        assert!(!should_reroll(&totals, &condition, &pool, &table));
    }

    #[test]
    fn test_priority_weights() {
        let weights = RerollValueWeights::priority(PrioritySymbol::Hits, false);
        assert_eq!(weights.get(SymbolKind::FilledHit), 1.0);
        assert_eq!(weights.get(SymbolKind::HollowHit), 0.0);
        assert_eq!(weights.get(SymbolKind::FilledBlock), 0.0);

        let weights = RerollValueWeights::priority(PrioritySymbol::Specials, true);
        assert_eq!(weights.get(SymbolKind::FilledSpecial), 1.0);
        assert_eq!(weights.get(SymbolKind::HollowSpecial), 1.0);
        assert_eq!(weights.get(SymbolKind::FilledHit), 0.0);
    }

    fn die(color: &str, face_index: usize, hits: u32) -> DieRoll {
        let mut counts = SymbolCounts::default();
        counts.add(SymbolKind::FilledHit, hits);
        DieRoll {
            color: color.to_string(),
            face_index,
            counts,
        }
    }

    #[test]
    fn test_selection_skips_performing_dice() {
        // red expectation for hits is 2/8 = 0.25.
        let table = red_table();
        let weights = RerollValueWeights::priority(PrioritySymbol::Hits, false);
        let dice = vec![die("red", 0, 1), die("red", 2, 0), die("red", 4, 1)];
        let picks = select_dice_to_reroll(&dice, 5, &weights, &table);
        // Only the blank die scores below expectation.
        assert_eq!(picks, vec![1]);
    }

    #[test]
    fn test_selection_caps_and_orders_worst_first() {
        let mut table = red_table();
        // white: 4 hit faces, expectation 0.5.
        let white: Vec<Face> = (0..FACES_PER_DIE)
            .map(|i| {
                if i < 4 {
                    Face::new(vec![SymbolKind::FilledHit])
                } else {
                    Face::empty()
                }
            })
            .collect();
        table.insert("white", white).unwrap();
        let weights = RerollValueWeights::priority(PrioritySymbol::Hits, false);
        // Scores: red blank -0.25, white blank -0.5, red blank -0.25.
        let dice = vec![die("red", 2, 0), die("white", 7, 0), die("red", 3, 0)];

        let picks = select_dice_to_reroll(&dice, 5, &weights, &table);
        assert_eq!(picks, vec![1, 0, 2]);

        let picks = select_dice_to_reroll(&dice, 2, &weights, &table);
        assert_eq!(picks, vec![1, 0]);

        let picks = select_dice_to_reroll(&dice, 0, &weights, &table);
        assert!(picks.is_empty());
    }

    #[test]
    fn test_selection_on_empty_list() {
        let table = red_table();
        let weights = RerollValueWeights::priority(PrioritySymbol::Hits, false);
        assert!(select_dice_to_reroll(&[], 3, &weights, &table).is_empty());
    }

    #[test]
    fn test_full_reroll_fires_exactly_once() {
        let table = one_hit_face_table();
        let pool = Pool::new().with("red", 1);
        let config = RollConfig {
            full_reroll: Some(RerollCondition::SymbolAbsent {
                symbol: SymbolKind::FilledHit,
            }),
            ..RollConfig::default()
        };
        // Both draws land on blank faces; the trigger still holds after the
        // reroll but must not fire again.
        let mut rng = ScriptedRng::faces(&[3, 5, 2]);
        let outcome = resolve_roll(&pool, &table, &config, &[], &mut rng);
        assert_eq!(outcome.stats.full_rerolls, 1);
        assert_eq!(outcome.totals.get(SymbolKind::FilledHit), 0);
    }

    #[test]
    fn test_full_reroll_replaces_wholesale() {
        let table = one_hit_face_table();
        let pool = Pool::new().with("red", 2);
        let config = RollConfig {
            full_reroll: Some(RerollCondition::SymbolAbsent {
                symbol: SymbolKind::FilledHit,
            }),
            ..RollConfig::default()
        };
        // First roll: blank, blank -> trigger. Second roll: hit, blank.
        let mut rng = ScriptedRng::faces(&[3, 5, 0, 2]);
        let outcome = resolve_roll(&pool, &table, &config, &[], &mut rng);
        assert_eq!(outcome.stats.full_rerolls, 1);
        assert_eq!(outcome.totals.get(SymbolKind::FilledHit), 1);
    }

    #[test]
    fn test_no_reroll_when_satisfied() {
        let table = one_hit_face_table();
        let pool = Pool::new().with("red", 1);
        let config = RollConfig {
            full_reroll: Some(RerollCondition::SymbolAbsent {
                symbol: SymbolKind::FilledHit,
            }),
            ..RollConfig::default()
        };
        let mut rng = ScriptedRng::faces(&[0, 5]);
        let outcome = resolve_roll(&pool, &table, &config, &[], &mut rng);
        assert_eq!(outcome.stats.full_rerolls, 0);
        assert_eq!(outcome.totals.get(SymbolKind::FilledHit), 1);
    }

    #[test]
    fn test_selective_redraws_and_retotals() {
        // red table: hit faces at 0 and 4, expectation 0.25.
        let table = red_table();
        let pool = Pool::new().with("red", 3);
        let config = RollConfig {
            selective_reroll: Some(SelectiveReroll {
                priority: PrioritySymbol::Hits,
                count_hollow_as_filled: false,
                max_dice: 2,
            }),
            ..RollConfig::default()
        };
        // Initial draws: hit, blank, blank. Two blanks qualify; redraws land
        // on hit faces 4 and 0.
        let mut rng = ScriptedRng::faces(&[0, 2, 3, 4, 0]);
        let outcome = resolve_roll(&pool, &table, &config, &[], &mut rng);
        assert_eq!(outcome.stats.dice_rerolled, 2);
        assert_eq!(outcome.totals.get(SymbolKind::FilledHit), 3);
        assert_eq!(outcome.dice.len(), 3);
    }

    #[test]
    fn test_selective_runs_after_full_reroll() {
        let table = red_table();
        let pool = Pool::new().with("red", 2);
        let config = RollConfig {
            full_reroll: Some(RerollCondition::SymbolAbsent {
                symbol: SymbolKind::FilledHit,
            }),
            selective_reroll: Some(SelectiveReroll {
                priority: PrioritySymbol::Hits,
                count_hollow_as_filled: false,
                max_dice: 1,
            }),
            ..RollConfig::default()
        };
        // Initial: blank, blank -> full reroll. Second: hit, blank. The
        // selective pass then redraws the remaining blank into a hit.
        let mut rng = ScriptedRng::faces(&[2, 3, 0, 5, 4]);
        let outcome = resolve_roll(&pool, &table, &config, &[], &mut rng);
        assert_eq!(outcome.stats.full_rerolls, 1);
        assert_eq!(outcome.stats.dice_rerolled, 1);
        assert_eq!(outcome.totals.get(SymbolKind::FilledHit), 2);
    }

    #[test]
    fn test_aggregate_only_path_returns_no_dice() {
        let table = red_table();
        let pool = Pool::new().with("red", 2);
        let mut rng = ScriptedRng::faces(&[0, 4]);
        let outcome = resolve_roll(&pool, &table, &RollConfig::default(), &[], &mut rng);
        assert!(outcome.dice.is_empty());
        assert_eq!(outcome.totals.get(SymbolKind::FilledHit), 2);
        assert_eq!(outcome.stats, RerollStats::default());
    }
}
