use std::cmp::Ordering;

use super::types::{RankedStanding, StandingEntry};

/// Order entries by descending total and assign competition ranks.
///
/// Tied totals share the best rank and the next rank skips the tie group,
/// so `[100, 100, 80]` ranks as `[1, 1, 3]`. The sort is stable: ties keep
/// their input order.
pub fn rank(mut entries: Vec<StandingEntry>) -> Vec<RankedStanding> {
    entries.sort_by(|a, b| {
        b.total_points
            .partial_cmp(&a.total_points)
            .unwrap_or(Ordering::Equal)
    });

    let mut ranked: Vec<RankedStanding> = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if prev.entry.total_points == entry.total_points => prev.rank,
            _ => (idx + 1) as u32,
        };
        ranked.push(RankedStanding { rank, entry });
    }

    ranked
}
