// ABOUTME: Expected symbol yields per color and across a pool.
// ABOUTME: Pure averaging over each die's 8 faces; no randomness involved.

use crate::reroll::RerollValueWeights;
use crate::symbol::SymbolKind;
use crate::table::{FaceTable, Pool, FACES_PER_DIE};
use std::collections::HashMap;

/// Expected count of `symbol` for a whole pool: each color's per-die mean
/// across its 8 faces, times that color's die count, summed over colors.
/// Colors missing from the table contribute nothing.
pub fn pool_expected_value(pool: &Pool, table: &FaceTable, symbol: SymbolKind) -> f64 {
    pool.iter()
        .map(|(color, count)| {
            table.faces(color).map_or(0.0, |faces| {
                let total: u32 = faces.iter().map(|face| face.counts().get(symbol)).sum();
                total as f64 / FACES_PER_DIE as f64 * count as f64
            })
        })
        .sum()
}

/// Per-color expected value of the weighted linear score of one die:
/// mean over the color's 8 faces of `weights . face_counts`.
pub fn color_expected_values(
    table: &FaceTable,
    weights: &RerollValueWeights,
) -> HashMap<String, f64> {
    table
        .iter()
        .map(|(color, faces)| {
            let total: f64 = faces.iter().map(|face| weights.score(&face.counts())).sum();
            (color.to_string(), total / FACES_PER_DIE as f64)
        })
        .collect()
}
