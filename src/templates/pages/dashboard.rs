use crate::domain::channels::ChannelBook;
use crate::domain::dashboard::Grid;
use crate::templates::components::{master_table, sidebar, SidebarVm, TableMode};
use crate::templates::desktop_layout;
use crate::templates::pages::snapshots::saved_at_label;
use chrono::NaiveDate;
use maud::{html, Markup};

/// What the comparison baseline turned out to be for this render.
#[derive(Debug, Clone, PartialEq)]
pub enum Baseline {
    /// No comparison date requested.
    None,
    Loaded {
        date: NaiveDate,
        /// Unix seconds of the save that was picked.
        saved_at: i64,
        rows: usize,
    },
    /// Nothing usable was saved for that date (or the read failed).
    Missing { date: NaiveDate },
}

pub struct DashboardVm<'a> {
    pub grid: &'a Grid,
    pub channels: &'a ChannelBook,
    pub sidebar: SidebarVm<'a>,
    pub baseline: Baseline,
}

fn baseline_notice(baseline: &Baseline) -> Markup {
    html! {
        @match baseline {
            Baseline::None => {},
            Baseline::Loaded { date, saved_at, rows } => div class="notice ok" {
                "Comparing against " strong { (date.to_string()) }
                " (saved " (saved_at_label(*saved_at)) ", " (rows) " cells)."
            },
            Baseline::Missing { date } => div class="notice warn" {
                "No saved data for " strong { (date.to_string()) } "."
            },
        }
    }
}

pub fn dashboard_page(vm: &DashboardVm<'_>) -> Markup {
    desktop_layout(
        "BAR Dashboard",
        html! {
            div class="shell" {
                (sidebar(&vm.sidebar))
                main class="content" {
                    (baseline_notice(&vm.baseline))

                    @if vm.grid.dates.is_empty() {
                        p { "Upload today's availability report to see the tables." }
                    } @else {
                        (master_table(vm.grid, "1. Market analysis (recommended BAR)", TableMode::Base))
                        (master_table(vm.grid, "2. Booking pick-up", TableMode::Pickup))
                        (master_table(vm.grid, "3. Grade changes", TableMode::GradeChange))

                        h2 style="margin-top: 40px;" { "4. Channel sale prices" }
                        @for channel in &vm.channels.channels {
                            (master_table(
                                vm.grid,
                                &format!("{} sale price", channel.name),
                                TableMode::SalePrice(channel),
                            ))
                        }
                    }
                }
            }
        },
    )
}
