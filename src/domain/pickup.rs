// src/domain/pickup.rs

use crate::domain::grade::BarGrade;
use crate::domain::inventory::{Inventory, InventoryRow};
use crate::domain::rate_card::RateCard;

/// How one `(room, date)` cell moved since the baseline snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellChange {
    /// Units booked since the baseline. Negative means cancellations.
    pub pickup: i64,
    /// Grade the baseline availability produces under today's rate card.
    pub previous_grade: Option<BarGrade>,
    pub grade_changed: bool,
}

/// Compares a current row against the baseline. Cells the baseline does not
/// know report no pick-up and no grade change.
pub fn diff_cell(
    card: &RateCard,
    current: &InventoryRow,
    current_grade: BarGrade,
    previous: &Inventory,
) -> CellChange {
    let Some(prev) = previous.get(&current.room_id, current.date) else {
        return CellChange::default();
    };

    let previous_grade = card
        .determine(&prev.room_id, prev.date, prev.available, prev.total)
        .grade;

    CellChange {
        pickup: prev.available - current.available,
        previous_grade: Some(previous_grade),
        grade_changed: previous_grade != current_grade,
    }
}
