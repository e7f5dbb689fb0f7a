// src/domain/inventory.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One room type on one stay date, as read from the daily report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub date: NaiveDate,
    pub room_id: String,
    pub available: i64,
    pub total: i64,
}

/// Rows indexed by `(room, date)`. When a report repeats a cell, the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    rows: Vec<InventoryRow>,
    index: HashMap<(String, NaiveDate), usize>,
}

impl Inventory {
    pub fn new(rows: Vec<InventoryRow>) -> Self {
        let mut index = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            index.entry((row.room_id.clone(), row.date)).or_insert(i);
        }
        Self { rows, index }
    }

    pub fn get(&self, room_id: &str, date: NaiveDate) -> Option<&InventoryRow> {
        self.index
            .get(&(room_id.to_string(), date))
            .map(|&i| &self.rows[i])
    }

    /// Distinct stay dates, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows
            .iter()
            .map(|r| r.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
