use serde::Serialize;
use tracing::{debug, trace};

use crate::roster::YearLabel;
use super::types::{Seat, SeatGrid, YearQueues};

/// Strategy used to pick the year for a single cell.
///
/// Tiers are tried in [`PlacementTier::CASCADE`] order; the first one that
/// yields a year wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementTier {
    /// The column's own year, when it differs from the seat to the left
    Preferred,
    /// Any other waiting year that differs from the seat to the left
    Alternate,
    /// Any waiting year, side by side or not. Only while two or more years remain.
    Forced,
}

impl PlacementTier {
    pub const CASCADE: [PlacementTier; 3] = [
        PlacementTier::Preferred,
        PlacementTier::Alternate,
        PlacementTier::Forced,
    ];

    /// Year this tier would seat next to `left`, if any
    pub fn choose(self, preferred: YearLabel, left: Option<YearLabel>, queues: &YearQueues) -> Option<YearLabel> {
        match self {
            PlacementTier::Preferred => {
                (queues.has_remaining(preferred) && left != Some(preferred)).then_some(preferred)
            }
            PlacementTier::Alternate => YearLabel::SENIOR_FIRST
                .into_iter()
                .find(|&year| queues.has_remaining(year) && left != Some(year)),
            PlacementTier::Forced => {
                if queues.years_remaining() > 1 {
                    YearLabel::SENIOR_FIRST.into_iter().find(|&year| queues.has_remaining(year))
                } else {
                    None
                }
            }
        }
    }
}

/// Runs the tier cascade for one cell
pub fn select_year(preferred: YearLabel, left: Option<YearLabel>, queues: &YearQueues) -> Option<(PlacementTier, YearLabel)> {
    PlacementTier::CASCADE
        .into_iter()
        .find_map(|tier| tier.choose(preferred, left, queues).map(|year| (tier, year)))
}

/// Fills one room column by column, consuming students from `queues`.
///
/// Columns without a pattern entry, or with an empty one, stay empty. Cells
/// where every tier declines are left empty and are not revisited.
pub fn fill_room(rows: usize, cols: usize, pattern: &[Option<YearLabel>], queues: &mut YearQueues) -> SeatGrid {
    let mut grid = SeatGrid::new(rows, cols);

    'columns: for (col, slot) in pattern.iter().enumerate().take(cols) {
        let Some(preferred) = *slot else {
            continue;
        };

        for row in 0..rows {
            if queues.is_exhausted() {
                break 'columns;
            }

            let left = col.checked_sub(1).and_then(|c| grid.year_at(row, c));
            let Some((tier, year)) = select_year(preferred, left, queues) else {
                trace!(row, col, "cell left empty");
                continue;
            };

            if let Some(student) = queues.pop(year) {
                trace!(row, col, year = %year, ?tier, "seat assigned");
                grid.place(row, col, Seat { student, year, tier });
            }
        }
    }

    debug!(rows, cols, seated = grid.occupied(), remaining = queues.total(), "room filled");
    grid
}
