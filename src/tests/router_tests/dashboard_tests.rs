use crate::db::inventory::load_working_inventory;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, post_bytes, report_workbook, test_app};

const REPORT: [(f64, f64); 5] = [(2.0, 20.0), (5.0, 10.0), (30.0, 30.0), (15.0, 30.0), (1.0, 4.0)];

#[test]
fn empty_dashboard_asks_for_a_report() {
    let app = test_app();

    let resp = handle(get("/"), &app).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Upload today's availability report"));
    assert!(body.contains("Naver"), "default channel should be seeded");
}

#[test]
fn uploaded_report_drives_the_tables() {
    let app = test_app();

    let resp = handle(post_bytes("/reports?name=today.xlsx", report_workbook(REPORT)), &app)
        .expect("Upload failed");
    assert_eq!(resp.status(), 200);
    let fragment = body_string(resp);
    assert!(fragment.contains("today.xlsx"));
    assert!(fragment.contains("5 cells imported"));

    let body = body_string(handle(get("/"), &app).unwrap());
    assert!(body.contains("1. Market analysis (recommended BAR)"));
    assert!(body.contains("10-06"));
    // FDB: 18 of 20 sold
    assert!(body.contains("BAR1"));
    assert!(body.contains("90%"));
    assert!(body.contains("728,000"));
    // HDP: nothing sold
    assert!(body.contains("BAR8"));
    assert!(body.contains("Naver sale price"));
}

#[test]
fn appended_report_keeps_earlier_rows() {
    let app = test_app();
    handle(post_bytes("/reports?name=a.xlsx", report_workbook(REPORT)), &app).unwrap();

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_string(2, 2, "2026-10-07").unwrap();
    ws.write_string(6, 0, "FDB").unwrap();
    ws.write_number(6, 1, 20.0).unwrap();
    ws.write_number(6, 2, 10.0).unwrap();
    let second = workbook.save_to_buffer().unwrap();

    let resp = handle(post_bytes("/reports?name=b.xlsx&append=1", second), &app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(handle(get("/"), &app).unwrap());
    assert!(body.contains("10-06"));
    assert!(body.contains("10-07"));
}

#[test]
fn unreadable_upload_is_a_400_fragment() {
    let app = test_app();

    let resp = handle(post_bytes("/reports?name=notes.txt", b"hello".to_vec()), &app).unwrap();
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("notes.txt"));

    let body = body_string(handle(get("/"), &app).unwrap());
    assert!(body.contains("Upload today's availability report"));
}

fn stored_fdb_available(app: &crate::app::AppState) -> Vec<i64> {
    app.db
        .with_conn(|conn| load_working_inventory(conn))
        .unwrap()
        .into_iter()
        .filter(|r| r.room_id == "FDB")
        .map(|r| r.available)
        .collect()
}

#[test]
fn failed_first_file_does_not_leave_stale_rows_in_front() {
    let yesterday = [(18.0, 20.0), (5.0, 10.0), (30.0, 30.0), (15.0, 30.0), (1.0, 4.0)];
    let today = [(2.0, 20.0), (5.0, 10.0), (30.0, 30.0), (15.0, 30.0), (1.0, 4.0)];

    // The browser only appends once a file has replaced the working inventory.
    let app = test_app();
    handle(post_bytes("/reports?name=yesterday.xlsx", report_workbook(yesterday)), &app).unwrap();
    let failed = handle(post_bytes("/reports?name=broken.xlsx", b"junk".to_vec()), &app).unwrap();
    assert_eq!(failed.status(), 400);
    let resp = handle(post_bytes("/reports?name=today.xlsx", report_workbook(today)), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(stored_fdb_available(&app), [2]);

    let body = body_string(handle(get("/"), &app).unwrap());
    assert!(body.contains("90%"));
    assert!(!body.contains("10%"));

    // Even an appended upload overrides the stale cell for the same room and date.
    let app = test_app();
    handle(post_bytes("/reports?name=yesterday.xlsx", report_workbook(yesterday)), &app).unwrap();
    handle(post_bytes("/reports?name=broken.xlsx", b"junk".to_vec()), &app).unwrap();
    handle(post_bytes("/reports?name=today.xlsx&append=1", report_workbook(today)), &app).unwrap();
    assert_eq!(stored_fdb_available(&app), [2]);
    let body = body_string(handle(get("/"), &app).unwrap());
    assert!(body.contains("90%"));
}

#[test]
fn malformed_compare_date_is_rejected() {
    let app = test_app();
    assert!(matches!(
        handle(get("/?compare=yesterday"), &app),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn export_is_an_xlsx_download() {
    let app = test_app();
    handle(post_bytes("/reports?name=today.xlsx", report_workbook(REPORT)), &app).unwrap();

    let resp = handle(get("/export.xlsx"), &app).expect("Export failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp.headers().get("Content-Disposition").unwrap().to_str().unwrap();
    assert!(disposition.contains(".xlsx"));
}

#[test]
fn unknown_route_is_not_found() {
    let app = test_app();
    assert!(matches!(handle(get("/nope"), &app), Err(ServerError::NotFound)));
    assert!(matches!(handle(get("/channels"), &app), Err(ServerError::NotFound)));
}
