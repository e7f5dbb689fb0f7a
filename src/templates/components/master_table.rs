use crate::domain::channels::Channel;
use crate::domain::dashboard::{Cell, Grid};
use chrono::{Datelike, Weekday};
use maud::{html, Markup};

/// Which figure each cell of the pivot shows.
#[derive(Debug, Clone, Copy)]
pub enum TableMode<'a> {
    /// Recommended grade and occupancy.
    Base,
    /// Units booked since the baseline snapshot.
    Pickup,
    /// Grade, highlighted when it moved since the baseline.
    GradeChange,
    /// One channel's sale price, highlighted when the grade moved.
    SalePrice(&'a Channel),
}

const CELL_STYLE: &str = "border:1px solid #ddd; padding:8px; text-align:center; background-color:white;";
const EMPTY_STYLE: &str = "border:1px solid #ddd;";
const HEAD_STYLE: &str = "border:1px solid #ddd; padding:5px;";
const LABEL_STYLE: &str = "border:1px solid #ddd; padding:8px; background:#fff; border-right:4px solid #000;";

/// `275000` -> `275,000`
pub fn format_amount(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn weekday_label(wd: Weekday) -> (&'static str, &'static str) {
    match wd {
        Weekday::Mon => ("Mon", ""),
        Weekday::Tue => ("Tue", ""),
        Weekday::Wed => ("Wed", ""),
        Weekday::Thu => ("Thu", ""),
        Weekday::Fri => ("Fri", ""),
        Weekday::Sat => ("Sat", "sat"),
        Weekday::Sun => ("Sun", "sun"),
    }
}

fn alert_style(cell: &Cell, border: &str) -> String {
    let grade = cell.determination.grade;
    format!(
        "{CELL_STYLE}background-color: {}; color: {}; font-weight: bold; border: 2.5px solid {border};",
        grade.color(),
        grade.text_color()
    )
}

/// `2/20 free`, plus the special period that forced the grade.
fn base_title(cell: &Cell) -> String {
    let free = format!("{}/{} free", cell.row.available, cell.row.total);
    match &cell.determination.period {
        Some(period) => format!("{free}, {period}"),
        None => free,
    }
}

fn render_cell(cell: &Cell, room_id: &str, mode: TableMode<'_>) -> Markup {
    let grade = cell.determination.grade;
    let changed = cell.change.grade_changed;

    match mode {
        TableMode::Base => html! {
            td style=(CELL_STYLE) title=(base_title(cell)) {
                b { (grade.label()) }
                br;
                (format!("{:.0}%", cell.determination.occupancy))
            }
        },
        TableMode::Pickup => {
            let pickup = cell.change.pickup;
            if pickup > 0 {
                html! {
                    td style=(format!("{CELL_STYLE}color:red; font-weight:bold; background:#FFEBEE;")) {
                        (format!("+{pickup}"))
                    }
                }
            } else if pickup < 0 {
                html! { td style=(CELL_STYLE) { (pickup) } }
            } else {
                html! { td style=(CELL_STYLE) { "-" } }
            }
        }
        TableMode::GradeChange => {
            if changed {
                let was = cell.change.previous_grade.map(|g| format!("was {}", g.label()));
                html! { td style=(alert_style(cell, "#000")) title=[was] { "▲ " (grade.label()) } }
            } else {
                html! { td style=(CELL_STYLE) { (grade.label()) } }
            }
        }
        TableMode::SalePrice(channel) => {
            let price = channel
                .promotion(room_id)
                .map(|p| p.price(cell.determination.base_price));
            let style = if changed {
                alert_style(cell, "#333")
            } else {
                CELL_STYLE.to_string()
            };
            html! {
                td style=(style) {
                    @match price {
                        Some(p) => b { (format_amount(p)) },
                        None => "-",
                    }
                }
            }
        }
    }
}

fn row_label(room_id: &str, mode: TableMode<'_>) -> Markup {
    match mode {
        TableMode::SalePrice(channel) => {
            let name = channel
                .promotion(room_id)
                .map(|p| p.display_name.as_str())
                .unwrap_or("");
            html! {
                b { (room_id) }
                br;
                small style="color:blue;" { (name) }
            }
        }
        _ => html! { (room_id) },
    }
}

/// Rooms down, stay dates across, one titled pivot per mode.
pub fn master_table(grid: &Grid, title: &str, mode: TableMode<'_>) -> Markup {
    html! {
        div class="table-title" style="margin-top:40px; margin-bottom:10px; font-weight:bold; font-size:18px; padding:10px; background:#f0f2f6; border-left:10px solid #000;" {
            (title)
        }
        div style="overflow-x:auto;" {
            table style="width:100%; border-collapse:collapse; font-size:11px;" {
                thead {
                    tr style="background:#f9f9f9;" {
                        th rowspan="2" style="border:1px solid #ddd; width:150px;" { "Room / Promotion" }
                        @for d in &grid.dates {
                            th style=(HEAD_STYLE) { (d.format("%m-%d").to_string()) }
                        }
                    }
                    tr style="background:#f9f9f9;" {
                        @for d in &grid.dates {
                            @let (label, class) = weekday_label(d.weekday());
                            th style=(HEAD_STYLE) class=(class) { (label) }
                        }
                    }
                }
                tbody {
                    @for (ri, room_id) in grid.rooms.iter().enumerate() {
                        tr {
                            td style=(LABEL_STYLE) { (row_label(room_id, mode)) }
                            @for di in 0..grid.dates.len() {
                                @match grid.cell(ri, di) {
                                    Some(cell) => (render_cell(cell, room_id, mode)),
                                    None => td style=(EMPTY_STYLE) { "-" },
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
