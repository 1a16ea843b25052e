//! Value-group transform.
//!
//! A transform replaces every card `c` on the board with `f(c)`, where `f`
//! is pure. Cards that match before the transform must never be seen
//! mismatched while it runs, so the unit of atomicity is the value group:
//! all positions that held the same card when the board was partitioned.
//!
//! The board drives the transform: partition under the lock, compute
//! `f(card)` for one group with the lock released, then apply that group
//! under the lock. Other operations interleave between groups.

use tracing::trace;

use crate::cards::Card;
use crate::grid::{GridStore, PositionList};
use crate::watch::ChangeBroadcaster;

/// Positions that held the same card at partition time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueGroup {
    /// The card every position held.
    pub card: Card,
    /// Where it was, row-major.
    pub positions: PositionList,
}

/// Applies value-group transforms to a grid.
pub struct ConsistentMapper;

impl ConsistentMapper {
    /// Partition the grid into value groups, ordered by card.
    #[must_use]
    pub fn partition(grid: &GridStore) -> Vec<ValueGroup> {
        grid.value_groups()
            .into_iter()
            .map(|(card, positions)| ValueGroup { card, positions })
            .collect()
    }

    /// Replace `group.card` with `replacement` at every position of the
    /// group that still holds `group.card`.
    ///
    /// Positions whose card was removed or changed since partitioning are
    /// skipped. Announces a change when at least one card actually changed.
    /// Returns the number of cells rewritten.
    pub fn apply_group(
        grid: &mut GridStore,
        changes: &mut ChangeBroadcaster,
        group: &ValueGroup,
        replacement: &Card,
    ) -> usize {
        if *replacement == group.card {
            return 0;
        }

        let mut updated = 0;
        for &pos in &group.positions {
            let rewritten = grid.mutate_cell(pos, |cell| {
                if cell.card.as_ref() == Some(&group.card) {
                    cell.card = Some(replacement.clone());
                    true
                } else {
                    false
                }
            });
            if matches!(rewritten, Ok(true)) {
                updated += 1;
            } else {
                trace!("Skipped {} in group {}: card changed underneath", pos, group.card);
            }
        }

        if updated > 0 {
            changes.announce();
        }
        updated
    }
}
