use crate::domain::channels::ChannelBook;
use crate::spreadsheets::ImportReport;
use chrono::NaiveDate;
use maud::{html, Markup, PreEscaped};

pub struct SidebarVm<'a> {
    pub today: NaiveDate,
    pub compare_date: Option<NaiveDate>,
    pub channels: &'a ChannelBook,
    /// Set when the loaded baseline carries a channel setup that can be restored.
    pub restorable: Option<NaiveDate>,
}

/// Posts every chosen file as a raw body. The first file that imports replaces the
/// working inventory; only files after it append.
const UPLOAD_SCRIPT: &str = r#"
async function uploadReports() {
  const input = document.getElementById('report-files');
  const out = document.getElementById('upload-result');
  out.innerHTML = '';
  const files = Array.from(input.files);
  let replaced = false;
  for (let i = 0; i < files.length; i++) {
    const url = '/reports?name=' + encodeURIComponent(files[i].name) + (replaced ? '&append=1' : '');
    const resp = await fetch(url, { method: 'POST', body: files[i] });
    if (resp.ok) {
      replaced = true;
    }
    out.insertAdjacentHTML('beforeend', await resp.text());
  }
  if (files.length) {
    out.insertAdjacentHTML('beforeend', '<p><a href="">Show updated tables</a></p>');
  }
}
"#;

fn compare_field(vm: &SidebarVm<'_>) -> Markup {
    html! {
        @if let Some(d) = vm.compare_date {
            input type="hidden" name="compare" value=(d.to_string());
        }
    }
}

fn channel_editor(vm: &SidebarVm<'_>) -> Markup {
    html! {
        @for channel in &vm.channels.channels {
            details {
                summary { (channel.name) " promotions" }
                @for promo in &channel.promotions {
                    form method="post" action="/channels/promotions" style="margin: 8px 0; padding-bottom: 8px; border-bottom: 1px solid #e5e7eb;" {
                        (compare_field(vm))
                        input type="hidden" name="channel" value=(channel.name);
                        input type="hidden" name="room" value=(promo.room_id);
                        strong { "[" (promo.room_id) "]" }
                        br;
                        label { "Name " input type="text" name="display_name" value=(promo.display_name); }
                        br;
                        label { "Discount % " input type="number" name="discount" step="0.1" value=(promo.discount_percent) style="width: 70px;"; }
                        label { " Adjust " input type="number" name="adjust" step="1000" value=(promo.flat_adjustment) style="width: 90px;"; }
                        button type="submit" { "Save" }
                    }
                }
                form method="post" action="/channels/delete" onsubmit="return confirm('Remove this channel?');" {
                    (compare_field(vm))
                    input type="hidden" name="name" value=(channel.name);
                    button type="submit" style="color: #dc2626;" { "Remove channel" }
                }
            }
        }
    }
}

pub fn sidebar(vm: &SidebarVm<'_>) -> Markup {
    html! {
        aside class="sidebar" {
            h4 { "Load a saved day" }
            form method="get" action="/" {
                input type="date" name="compare" value=(vm.compare_date.unwrap_or(vm.today).to_string());
                button type="submit" { "Load baseline" }
            }
            @if let Some(d) = vm.restorable {
                form method="post" action="/snapshots/restore-channels" {
                    input type="hidden" name="date" value=(d.to_string());
                    (compare_field(vm))
                    button type="submit" { "Restore channels from " (d.to_string()) }
                }
            }

            h4 { "Today's report" }
            input type="file" id="report-files" multiple accept=".xlsx,.xls,.xlsm,.ods";
            button type="button" onclick="uploadReports()" { "Upload" }
            div id="upload-result" {}
            script { (PreEscaped(UPLOAD_SCRIPT)) }

            form method="post" action="/snapshots" {
                (compare_field(vm))
                button type="submit" { "Save today's snapshot" }
            }

            h4 { "Channels" }
            form method="post" action="/channels" {
                (compare_field(vm))
                input type="text" name="name" placeholder="New channel (e.g. Agoda)" required;
                button type="submit" { "Add" }
            }
            (channel_editor(vm))
        }
    }
}

/// Fragment returned to the upload script for one file.
pub fn upload_result(file_name: &str, report: &ImportReport) -> Markup {
    html! {
        div class="notice ok" {
            strong { (file_name) } ": " (report.rows.len()) " cells imported"
            @if !report.skipped.is_empty() {
                ", " (report.skipped.len()) " skipped"
                ul {
                    @for s in report.skipped.iter().take(20) {
                        li { "R" (s.row + 1) "C" (s.col + 1) ": " (s.reason) }
                    }
                }
            }
        }
    }
}

pub fn upload_failed(file_name: &str, message: &str) -> Markup {
    html! {
        div class="notice warn" {
            strong { (file_name) } ": " (message)
        }
    }
}
