use crate::domain::channels::ChannelBook;
use crate::domain::dashboard::{Cell, Grid};
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::collections::HashSet;

fn xlsx_err(what: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

/// One pivot sheet: rooms down, stay dates across, `value` per filled cell.
fn write_pivot(
    worksheet: &mut Worksheet,
    name: &str,
    grid: &Grid,
    value: impl Fn(&str, &Cell) -> CellValue,
) -> Result<(), ServerError> {
    worksheet.set_name(name).map_err(xlsx_err("sheet name"))?;

    worksheet
        .write_string(0, 0, "Room")
        .map_err(xlsx_err("header"))?;
    for (i, date) in grid.dates.iter().enumerate() {
        worksheet
            .write_string(0, (i + 1) as u16, date.format("%Y-%m-%d").to_string())
            .map_err(xlsx_err("date header"))?;
    }

    for (ri, room_id) in grid.rooms.iter().enumerate() {
        let r = (ri + 1) as u32;
        worksheet
            .write_string(r, 0, room_id)
            .map_err(xlsx_err("room"))?;

        for di in 0..grid.dates.len() {
            let col = (di + 1) as u16;
            let Some(cell) = grid.cell(ri, di) else {
                continue;
            };
            match value(room_id, cell) {
                CellValue::Text(s) => worksheet
                    .write_string(r, col, s)
                    .map_err(xlsx_err("cell"))?,
                CellValue::Number(n) => worksheet
                    .write_number(r, col, n)
                    .map_err(xlsx_err("cell"))?,
            };
        }
    }
    Ok(())
}

/// Excel caps sheet names at 31 characters, rejects `[]:*?/\` and compares them case-insensitively.
fn channel_sheet_name(name: &str, index: usize, used: &mut HashSet<String>) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !"[]:*?/\\".contains(*c))
        .take(31)
        .collect();
    let mut sheet = cleaned.trim().trim_matches('\'').to_string();
    if sheet.is_empty() {
        sheet = "Channel".to_string();
    }
    if used.contains(&sheet.to_lowercase()) {
        let suffix = format!(" ({})", index + 1);
        let keep = 31 - suffix.len();
        sheet = format!("{}{suffix}", sheet.chars().take(keep).collect::<String>());
    }
    used.insert(sheet.to_lowercase());
    sheet
}

enum CellValue {
    Text(String),
    Number(f64),
}

/// Grade, base price and every channel's sale price as separate sheets.
pub fn export_grid_xlsx(grid: &Grid, channels: &ChannelBook, work_date: &str) -> ResultResp {
    let mut workbook = Workbook::new();

    write_pivot(workbook.add_worksheet(), "BAR", grid, |_, cell| {
        CellValue::Text(cell.determination.grade.label().to_string())
    })?;

    write_pivot(workbook.add_worksheet(), "Occupancy", grid, |_, cell| {
        CellValue::Number(cell.determination.occupancy.round())
    })?;

    write_pivot(workbook.add_worksheet(), "Base price", grid, |_, cell| {
        CellValue::Number(cell.determination.base_price as f64)
    })?;

    let mut used: HashSet<String> = ["bar", "occupancy", "base price"]
        .into_iter()
        .map(String::from)
        .collect();
    for (i, channel) in channels.channels.iter().enumerate() {
        let sheet = channel_sheet_name(&channel.name, i, &mut used);
        write_pivot(workbook.add_worksheet(), &sheet, grid, |room_id, cell| {
            match channel.promotion(room_id) {
                Some(promo) => CellValue::Number(promo.price(cell.determination.base_price) as f64),
                None => CellValue::Text("-".to_string()),
            }
        })?;
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))?;

    xlsx_response(buffer, &format!("bar_{work_date}.xlsx"))
}
