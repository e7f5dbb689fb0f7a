use crate::app::AppState;
use crate::db::channels::save_channel_book;
use crate::db::inventory::{load_working_inventory, store_working_inventory};
use crate::db::snapshots::{get_snapshot_by_date, list_snapshots, save_snapshot};
use crate::domain::channels::ChannelBook;
use crate::domain::dashboard::{DashboardRequest, Grid};
use crate::domain::inventory::Inventory;
use crate::errors::{ResultResp, ServerError};
use crate::responses::{html_response, html_response_with_status, redirect_response};
use crate::spreadsheets::{export_grid_xlsx, import_report};
use crate::templates::components::{upload_failed, upload_result, SidebarVm};
use crate::templates::pages::{dashboard_page, snapshots_page, Baseline, DashboardVm};
use astra::Request;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::io::Read;

/// Largest report accepted by `POST /reports`.
const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

type Params = HashMap<String, String>;

pub fn handle(req: Request, app: &AppState) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let query = parse_query(&req);

    tracing::debug!(%method, %path, "request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => dashboard(app, &query),
        ("GET", "/export.xlsx") => export(app, &query),
        ("POST", "/reports") => upload_report(req, app, &query),

        ("GET", "/snapshots") => {
            let snapshots = app.db.with_conn(|conn| list_snapshots(conn))?;
            html_response(snapshots_page(&snapshots))
        }
        ("POST", "/snapshots") => save_today(req, app),
        ("POST", "/snapshots/restore-channels") => restore_channels(req, app),

        ("POST", "/channels") => add_channel(req, app),
        ("POST", "/channels/delete") => delete_channel(req, app),
        ("POST", "/channels/promotions") => update_promotion(req, app),

        _ => Err(ServerError::NotFound),
    }
}

fn parse_query(req: &Request) -> Params {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn read_body(req: Request) -> Result<Vec<u8>, ServerError> {
    let mut body = req.into_body();
    let mut buf = Vec::new();
    body.reader()
        .take(MAX_UPLOAD_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("could not read request body: {e}")))?;
    if buf.len() as u64 > MAX_UPLOAD_BYTES {
        return Err(ServerError::BadRequest("upload is too large".into()));
    }
    Ok(buf)
}

fn read_form(req: Request) -> Result<Params, ServerError> {
    let body = read_body(req)?;
    Ok(url::form_urlencoded::parse(&body).into_owned().collect())
}

fn required<'a>(params: &'a Params, key: &str) -> Result<&'a str, ServerError> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest(format!("missing field '{key}'")))
}

fn parse_date_param(params: &Params, key: &str) -> Result<Option<NaiveDate>, ServerError> {
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ServerError::BadRequest(format!("'{v}' is not a date (YYYY-MM-DD)"))),
    }
}

/// Where to send the browser after a form POST: back to the same comparison.
fn back_to(params: &Params) -> String {
    match parse_date_param(params, "compare") {
        Ok(Some(d)) => format!("/?compare={d}"),
        _ => "/".to_string(),
    }
}

struct LoadedBaseline {
    inventory: Inventory,
    baseline: Baseline,
    channels: Option<ChannelBook>,
}

/// A missing snapshot and a failed read look the same to the operator: an empty
/// baseline and a warning.
fn load_baseline(app: &AppState, compare: Option<NaiveDate>) -> LoadedBaseline {
    let Some(date) = compare else {
        return LoadedBaseline {
            inventory: Inventory::default(),
            baseline: Baseline::None,
            channels: None,
        };
    };

    match app.db.with_conn(|conn| get_snapshot_by_date(conn, date)) {
        Ok(Some(snap)) => {
            tracing::debug!(snapshot = snap.id, %date, "baseline loaded");
            LoadedBaseline {
                baseline: Baseline::Loaded {
                    date: snap.work_date,
                    saved_at: snap.saved_at,
                    rows: snap.rows.len(),
                },
                inventory: Inventory::new(snap.rows),
                channels: snap.channels,
            }
        }
        Ok(None) => LoadedBaseline {
            inventory: Inventory::default(),
            baseline: Baseline::Missing { date },
            channels: None,
        },
        Err(e) => {
            tracing::warn!(%date, error = %e, "baseline snapshot could not be read");
            LoadedBaseline {
                inventory: Inventory::default(),
                baseline: Baseline::Missing { date },
                channels: None,
            }
        }
    }
}

fn compute_grid(app: &AppState, current: &Inventory, previous: &Inventory) -> Grid {
    DashboardRequest {
        card: &app.config.rate_card,
        current,
        previous,
    }
    .compute()
}

fn dashboard(app: &AppState, query: &Params) -> ResultResp {
    let compare = parse_date_param(query, "compare")?;
    let current = Inventory::new(app.db.with_conn(|conn| load_working_inventory(conn))?);
    let channels = app.channel_book()?;
    let loaded = load_baseline(app, compare);

    let grid = compute_grid(app, &current, &loaded.inventory);

    let restorable = match (&loaded.baseline, &loaded.channels) {
        (Baseline::Loaded { date, .. }, Some(_)) => Some(*date),
        _ => None,
    };

    let vm = DashboardVm {
        grid: &grid,
        channels: &channels,
        sidebar: SidebarVm {
            today: app.today(),
            compare_date: compare,
            channels: &channels,
            restorable,
        },
        baseline: loaded.baseline,
    };
    html_response(dashboard_page(&vm))
}

fn export(app: &AppState, query: &Params) -> ResultResp {
    let compare = parse_date_param(query, "compare")?;
    let current = Inventory::new(app.db.with_conn(|conn| load_working_inventory(conn))?);
    let channels = app.channel_book()?;
    let loaded = load_baseline(app, compare);
    let grid = compute_grid(app, &current, &loaded.inventory);
    export_grid_xlsx(&grid, &channels, &app.today().to_string())
}

fn upload_report(req: Request, app: &AppState, query: &Params) -> ResultResp {
    let file_name = query
        .get("name")
        .cloned()
        .unwrap_or_else(|| "report".to_string());
    let append = matches!(query.get("append").map(String::as_str), Some("1" | "true"));

    let bytes = read_body(req)?;
    if bytes.is_empty() {
        return html_response_with_status(400, upload_failed(&file_name, "empty upload"));
    }

    let room_ids = app.room_ids();
    let report = match import_report(&bytes, &app.config.layout, &room_ids) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(file = %file_name, error = %e, "report import failed");
            return html_response_with_status(400, upload_failed(&file_name, &e.to_string()));
        }
    };

    for skipped in &report.skipped {
        tracing::warn!(
            file = %file_name,
            row = skipped.row,
            col = skipped.col,
            reason = %skipped.reason,
            "skipped report cell"
        );
    }

    app.db
        .with_conn(|conn| store_working_inventory(conn, &report.rows, append))?;

    tracing::info!(
        file = %file_name,
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        append,
        "report imported"
    );
    html_response(upload_result(&file_name, &report))
}

fn save_today(req: Request, app: &AppState) -> ResultResp {
    let form = read_form(req)?;
    let rows = app.db.with_conn(|conn| load_working_inventory(conn))?;
    if rows.is_empty() {
        return Err(ServerError::BadRequest(
            "upload today's report before saving a snapshot".into(),
        ));
    }
    let channels = app.channel_book()?;
    let today = app.today();
    let now = Utc::now().timestamp();

    let id = app
        .db
        .with_conn(|conn| save_snapshot(conn, today, now, &rows, &channels))?;

    tracing::info!(snapshot = id, work_date = %today, rows = rows.len(), "snapshot saved");
    redirect_response(&back_to(&form))
}

fn restore_channels(req: Request, app: &AppState) -> ResultResp {
    let form = read_form(req)?;
    let date = parse_date_param(&form, "date")?
        .ok_or_else(|| ServerError::BadRequest("missing field 'date'".into()))?;

    let snapshot = app
        .db
        .with_conn(|conn| get_snapshot_by_date(conn, date))?
        .ok_or(ServerError::NotFound)?;
    let snapshot_id = snapshot.id;
    let book = snapshot.channels.ok_or_else(|| {
        ServerError::BadRequest(format!("snapshot {date} has no channel setup"))
    })?;

    app.db.with_conn(|conn| save_channel_book(conn, &book))?;
    tracing::info!(
        %date,
        snapshot = snapshot_id,
        channels = book.channels.len(),
        "channel setup restored"
    );
    redirect_response(&back_to(&form))
}

fn add_channel(req: Request, app: &AppState) -> ResultResp {
    let form = read_form(req)?;
    let name = required(&form, "name")?;

    let mut book = app.channel_book()?;
    if book.add_channel(name, app.room_ids())? {
        app.db.with_conn(|conn| save_channel_book(conn, &book))?;
        tracing::info!(channel = name.trim(), "channel added");
    }
    redirect_response(&back_to(&form))
}

fn delete_channel(req: Request, app: &AppState) -> ResultResp {
    let form = read_form(req)?;
    let name = required(&form, "name")?;

    let mut book = app.channel_book()?;
    if !book.remove_channel(name) {
        return Err(ServerError::NotFound);
    }
    app.db.with_conn(|conn| save_channel_book(conn, &book))?;
    tracing::info!(channel = name.trim(), "channel removed");
    redirect_response(&back_to(&form))
}

fn parse_number<T: std::str::FromStr>(form: &Params, key: &str) -> Result<T, ServerError> {
    let raw = form
        .get(key)
        .map(|v| v.trim().replace(',', ""))
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "0".to_string());
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("'{raw}' is not a valid {key}")))
}

fn update_promotion(req: Request, app: &AppState) -> ResultResp {
    let form = read_form(req)?;
    let channel = required(&form, "channel")?;
    let room = required(&form, "room")?;
    let display_name = form.get("display_name").map(String::as_str).unwrap_or("");
    let discount: f64 = parse_number(&form, "discount")?;
    let adjust: i64 = parse_number(&form, "adjust")?;

    let mut book = app.channel_book()?;
    book.update_promotion(channel, room, display_name, discount, adjust)?;
    app.db.with_conn(|conn| save_channel_book(conn, &book))?;

    tracing::info!(channel, room, discount, adjust, "promotion updated");
    redirect_response(&back_to(&form))
}
