use crate::app::AppState;
use crate::config::AppConfig;
use crate::db::{init_db, Database};
use astra::{Body, Request, Response};
use http::Method;
use rust_xlsxwriter::Workbook;
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fresh database file under the temp dir, built from the production schema.
pub fn init_test_db() -> Database {
    let path = std::env::temp_dir().join(format!(
        "bar_dashboard_test_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

pub fn test_app() -> AppState {
    AppState::new(init_test_db(), AppConfig::default())
}

pub fn get(uri: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)]) -> Request {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn post_bytes(uri: &str, bytes: Vec<u8>) -> Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::from(bytes))
        .unwrap()
}

pub fn body_string(mut resp: Response) -> String {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    String::from_utf8(bytes).unwrap()
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Availability report in the default PMS layout: one stay date (2026-10-06)
/// with the given `(available, total)` for FDB, FDE, HDP, HDT, HDF.
pub fn report_workbook(figures: [(f64, f64); 5]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_string(2, 2, "2026-10-06").unwrap();
    let rows = [(6, "FDB"), (7, "FDE"), (10, "HDP"), (11, "HDT"), (12, "HDF")];
    for ((row, room), (available, total)) in rows.into_iter().zip(figures) {
        ws.write_string(row, 0, room).unwrap();
        ws.write_number(row, 1, total).unwrap();
        ws.write_number(row, 2, available).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}
