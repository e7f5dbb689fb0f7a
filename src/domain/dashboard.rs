// src/domain/dashboard.rs

use crate::domain::inventory::{Inventory, InventoryRow};
use crate::domain::pickup::{diff_cell, CellChange};
use crate::domain::rate_card::{Determination, RateCard};
use chrono::NaiveDate;

/// Everything one page render needs. Built fresh for every request.
pub struct DashboardRequest<'a> {
    pub card: &'a RateCard,
    pub current: &'a Inventory,
    /// Baseline snapshot; empty when none was loaded.
    pub previous: &'a Inventory,
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub row: InventoryRow,
    pub determination: Determination,
    pub change: CellChange,
}

/// Room × date pivot of computed cells. Rooms follow the rate card order.
#[derive(Debug, Clone)]
pub struct Grid {
    pub dates: Vec<NaiveDate>,
    pub rooms: Vec<String>,
    /// `cells[room_index][date_index]`
    pub cells: Vec<Vec<Option<Cell>>>,
}

impl Grid {
    pub fn cell(&self, room_index: usize, date_index: usize) -> Option<&Cell> {
        self.cells.get(room_index)?.get(date_index)?.as_ref()
    }
}

impl DashboardRequest<'_> {
    pub fn compute(&self) -> Grid {
        let dates = self.current.dates();
        let rooms: Vec<String> = self.card.room_ids().map(str::to_string).collect();

        let cells = rooms
            .iter()
            .map(|room_id| {
                dates
                    .iter()
                    .map(|&date| {
                        let row = self.current.get(room_id, date)?;
                        let determination =
                            self.card
                                .determine(room_id, date, row.available, row.total);
                        let change =
                            diff_cell(self.card, row, determination.grade, self.previous);
                        Some(Cell {
                            row: row.clone(),
                            determination,
                            change,
                        })
                    })
                    .collect()
            })
            .collect();

        Grid {
            dates,
            rooms,
            cells,
        }
    }
}
