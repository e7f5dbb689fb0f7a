// src/spreadsheets/report_import.rs

use crate::domain::inventory::InventoryRow;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Cursor;

/// Where things live in the daily availability report. Indices are zero-based.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// Row holding the stay dates.
    pub date_row: u32,
    /// First column holding a stay date / availability figure.
    pub first_data_col: u32,
    /// Column holding the room type name.
    pub room_col: u32,
    /// Column holding the room type's total inventory.
    pub total_col: u32,
    /// Fixed room rows. When absent, rows are found by matching room ids in `room_col`.
    pub room_rows: Option<Vec<u32>>,
    /// Year applied to `MM-DD` date labels.
    pub default_year: i32,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            date_row: 2,
            first_data_col: 2,
            room_col: 0,
            total_col: 1,
            room_rows: Some(vec![6, 7, 10, 11, 12]),
            default_year: 2026,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("could not open workbook: {0}")]
    Open(String),
    #[error("workbook has no worksheet")]
    NoWorksheet,
    #[error("date row {0} is outside the sheet")]
    DateRowMissing(u32),
    #[error("no room rows found")]
    NoRoomRows,
}

/// A cell that was present but could not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCell {
    pub row: u32,
    pub col: u32,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub rows: Vec<InventoryRow>,
    pub skipped: Vec<SkippedCell>,
}

/// Excel's day zero, as used by the 1900 date system.
fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    excel_epoch().checked_add_signed(chrono::Duration::days(serial.trunc() as i64))
}

fn date_from_text(text: &str, default_year: i32) -> Option<NaiveDate> {
    let label = text
        .trim()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("")
        .replace(['/', '.'], "-");

    NaiveDate::parse_from_str(&label, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{default_year}-{label}"), "%Y-%m-%d"))
        .ok()
}

fn parse_date(cell: &Data, default_year: i32) -> Option<NaiveDate> {
    match cell {
        Data::Int(i) => date_from_serial(*i as f64),
        Data::Float(f) => date_from_serial(*f),
        Data::DateTime(dt) => date_from_serial(dt.as_f64()),
        Data::DateTimeIso(s) => s.get(..10).and_then(|d| date_from_text(d, default_year)),
        Data::String(s) => date_from_text(s, default_year),
        _ => None,
    }
}

/// Room counts beyond this are not inventory figures.
const MAX_FIGURE: i64 = 1_000_000_000;

fn parse_number(cell: &Data) -> Option<i64> {
    let from_float = |f: f64| {
        (f.is_finite() && f.abs() <= MAX_FIGURE as f64).then(|| f.round() as i64)
    };
    let n = match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) => from_float(*f),
        Data::String(s) => {
            let s = s.trim().replace(',', "");
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        _ => None,
    }?;
    (n.abs() <= MAX_FIGURE).then_some(n)
}

fn is_blank(cell: Option<&Data>) -> bool {
    match cell {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Empty) | None => String::new(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Picks the longest configured room id contained in the label, so `HDT` is not shadowed by `HD`.
fn match_room<'a>(label: &str, room_ids: &[&'a str]) -> Option<&'a str> {
    let label = label.to_uppercase();
    room_ids
        .iter()
        .filter(|rid| !rid.is_empty() && label.contains(&rid.to_uppercase()))
        .max_by_key(|rid| rid.len())
        .copied()
}

/// `(sheet row, room id)` for every room row the layout points at.
fn resolve_room_rows(
    range: &Range<Data>,
    layout: &ReportLayout,
    room_ids: &[&str],
    skipped: &mut Vec<SkippedCell>,
) -> Vec<(u32, String)> {
    match &layout.room_rows {
        Some(fixed) => fixed
            .iter()
            .filter_map(|&r| {
                let rid = cell_text(range.get_value((r, layout.room_col))).to_uppercase();
                if rid.is_empty() {
                    skipped.push(SkippedCell {
                        row: r,
                        col: layout.room_col,
                        reason: "room row has no room name".into(),
                    });
                    return None;
                }
                Some((r, rid))
            })
            .collect(),
        None => {
            let (start, end) = match (range.start(), range.end()) {
                (Some((s, _)), Some((e, _))) => (s, e),
                _ => return Vec::new(),
            };
            (start..=end)
                .filter(|&r| r != layout.date_row)
                .filter_map(|r| {
                    let label = cell_text(range.get_value((r, layout.room_col)));
                    match_room(&label, room_ids).map(|rid| (r, rid.to_string()))
                })
                .collect()
        }
    }
}

/// Reads the first worksheet of an availability report.
///
/// Bad cells are skipped and listed in the report; only a layout that cannot
/// work at all is an error.
pub fn import_report(
    bytes: &[u8],
    layout: &ReportLayout,
    room_ids: &[&str],
) -> Result<ImportReport, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Open(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)?
        .map_err(|e| ImportError::Open(e.to_string()))?;

    let (last_row, last_col) = range
        .end()
        .ok_or(ImportError::DateRowMissing(layout.date_row))?;
    if layout.date_row > last_row {
        return Err(ImportError::DateRowMissing(layout.date_row));
    }

    let mut report = ImportReport::default();
    let room_rows = resolve_room_rows(&range, layout, room_ids, &mut report.skipped);
    if room_rows.is_empty() {
        return Err(ImportError::NoRoomRows);
    }

    for (r, room_id) in room_rows {
        let Some(total) = range
            .get_value((r, layout.total_col))
            .and_then(parse_number)
        else {
            report.skipped.push(SkippedCell {
                row: r,
                col: layout.total_col,
                reason: format!("{room_id}: total inventory is not a usable number"),
            });
            continue;
        };

        for c in layout.first_data_col..=last_col {
            let date_cell = range.get_value((layout.date_row, c));
            let avail_cell = range.get_value((r, c));
            if is_blank(date_cell) || is_blank(avail_cell) {
                continue;
            }

            let Some(date) = date_cell.and_then(|d| parse_date(d, layout.default_year)) else {
                report.skipped.push(SkippedCell {
                    row: layout.date_row,
                    col: c,
                    reason: format!("unreadable date '{}'", cell_text(date_cell)),
                });
                continue;
            };

            let Some(available) = avail_cell.and_then(parse_number) else {
                report.skipped.push(SkippedCell {
                    row: r,
                    col: c,
                    reason: format!("{room_id} {date}: availability is not a usable number"),
                });
                continue;
            };

            report.rows.push(InventoryRow {
                date,
                room_id: room_id.clone(),
                available,
                total,
            });
        }
    }

    Ok(report)
}
