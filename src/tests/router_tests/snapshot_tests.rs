use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, get, location, post_bytes, post_form, report_workbook, test_app,
};

const MORNING: [(f64, f64); 5] = [(2.0, 20.0), (5.0, 10.0), (30.0, 30.0), (15.0, 30.0), (1.0, 4.0)];
// FDE picks up three rooms and climbs from BAR5 to BAR2.
const EVENING: [(f64, f64); 5] = [(2.0, 20.0), (2.0, 10.0), (30.0, 30.0), (15.0, 30.0), (1.0, 4.0)];

#[test]
fn saving_without_inventory_is_rejected() {
    let app = test_app();
    assert!(matches!(
        handle(post_form("/snapshots", &[]), &app),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn snapshot_becomes_the_baseline() {
    let app = test_app();
    let today = app.today().to_string();

    handle(post_bytes("/reports?name=am.xlsx", report_workbook(MORNING)), &app).unwrap();
    let resp = handle(post_form("/snapshots", &[]), &app).expect("Save failed");
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/");

    let listing = body_string(handle(get("/snapshots"), &app).unwrap());
    assert!(listing.contains(&today));
    assert!(listing.contains(&format!("/?compare={today}")));

    handle(post_bytes("/reports?name=pm.xlsx", report_workbook(EVENING)), &app).unwrap();

    let body = body_string(handle(get(&format!("/?compare={today}")), &app).unwrap());
    assert!(body.contains("Comparing against"));
    assert!(body.contains("+3"));
    assert!(body.contains("▲ BAR2"));
}

#[test]
fn missing_baseline_shows_a_warning() {
    let app = test_app();
    handle(post_bytes("/reports?name=am.xlsx", report_workbook(MORNING)), &app).unwrap();

    let resp = handle(get("/?compare=2020-01-01"), &app).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("No saved data for"));
    assert!(body.contains("2020-01-01"));
    assert!(!body.contains("▲"));
    assert!(body.contains("BAR1"));
}

#[test]
fn channels_restore_from_a_snapshot() {
    let app = test_app();
    let today = app.today().to_string();

    handle(post_bytes("/reports?name=am.xlsx", report_workbook(MORNING)), &app).unwrap();
    handle(post_form("/snapshots", &[]), &app).unwrap();
    handle(post_form("/channels", &[("name", "Agoda")]), &app).unwrap();
    assert_eq!(app.channel_book().unwrap().channels.len(), 2);

    let dashboard = body_string(handle(get(&format!("/?compare={today}")), &app).unwrap());
    assert!(dashboard.contains("Restore channels from"));

    let resp = handle(
        post_form(
            "/snapshots/restore-channels",
            &[("date", today.as_str()), ("compare", today.as_str())],
        ),
        &app,
    )
    .expect("Restore failed");
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), format!("/?compare={today}"));

    let book = app.channel_book().unwrap();
    let names: Vec<_> = book.channels.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Naver"]);
}

#[test]
fn restoring_an_unsaved_day_is_not_found() {
    let app = test_app();
    assert!(matches!(
        handle(post_form("/snapshots/restore-channels", &[("date", "2020-01-01")]), &app),
        Err(ServerError::NotFound)
    ));
}
