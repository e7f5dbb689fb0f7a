use crate::db::snapshots::SnapshotSummary;
use crate::templates::{card, desktop_layout};
use chrono::{DateTime, Local};
use maud::{html, Markup};

/// Save time in server-local time, the same clock that picks the work date.
pub(crate) fn saved_at_label(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn snapshots_page(snapshots: &[SnapshotSummary]) -> Markup {
    desktop_layout(
        "Snapshots",
        html! {
            main class="content" {
                (card("Saved snapshots", html! {
                    @if snapshots.is_empty() {
                        p { "Nothing saved yet." }
                    } @else {
                        table style="width: 100%; border-collapse: collapse; margin-top: 1rem;" {
                            thead {
                                tr {
                                    th style="padding: 8px; text-align: left; border-bottom: 2px solid #eee;" { "Work date" }
                                    th style="padding: 8px; text-align: left; border-bottom: 2px solid #eee;" { "Saved at" }
                                    th style="padding: 8px; text-align: left; border-bottom: 2px solid #eee;" { "Cells" }
                                    th style="padding: 8px; text-align: left; border-bottom: 2px solid #eee;" {}
                                }
                            }
                            tbody {
                                @for snap in snapshots {
                                    tr {
                                        td style="padding: 8px; border-bottom: 1px solid #f9f9f9;" { (snap.work_date.to_string()) }
                                        td style="padding: 8px; border-bottom: 1px solid #f9f9f9;" { (saved_at_label(snap.saved_at)) }
                                        td style="padding: 8px; border-bottom: 1px solid #f9f9f9;" { (snap.row_count) }
                                        td style="padding: 8px; border-bottom: 1px solid #f9f9f9;" {
                                            a href=(format!("/?compare={}", snap.work_date)) { "Compare" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }))
            }
        },
    )
}
