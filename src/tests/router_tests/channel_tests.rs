use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, location, post_bytes, post_form, report_workbook, test_app};

#[test]
fn add_channel_redirects_back() {
    let app = test_app();

    let resp = handle(post_form("/channels", &[("name", "  Agoda ")]), &app).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/");

    let resp = handle(
        post_form("/channels", &[("name", "Agoda"), ("compare", "2026-10-01")]),
        &app,
    )
    .unwrap();
    assert_eq!(location(&resp), "/?compare=2026-10-01");

    let book = app.channel_book().unwrap();
    assert_eq!(book.channels.len(), 2);
    let agoda = book.get("Agoda").expect("Agoda was added");
    assert_eq!(agoda.promotions.len(), 5);
    assert_eq!(agoda.promotions[0].display_name, "Agoda_FDB");
}

#[test]
fn blank_channel_name_is_rejected() {
    let app = test_app();
    assert!(matches!(
        handle(post_form("/channels", &[("name", "   ")]), &app),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn promotion_update_changes_sale_price() {
    let app = test_app();
    handle(
        post_bytes(
            "/reports?name=today.xlsx",
            report_workbook([(2.0, 20.0), (5.0, 10.0), (30.0, 30.0), (15.0, 30.0), (1.0, 4.0)]),
        ),
        &app,
    )
    .unwrap();

    let resp = handle(
        post_form(
            "/channels/promotions",
            &[
                ("channel", "Naver"),
                ("room", "FDB"),
                ("display_name", "Family Deluxe"),
                ("discount", "10"),
                ("adjust", "5,000"),
            ],
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);

    let book = app.channel_book().unwrap();
    let promo = book.get("Naver").unwrap().promotion("FDB").unwrap();
    assert_eq!(promo.display_name, "Family Deluxe");
    assert_eq!(promo.discount_percent, 10.0);
    assert_eq!(promo.flat_adjustment, 5000);

    // BAR1 728,000 less 10% is 655,200, floored to 655,000, plus 5,000
    let body = body_string(handle(get("/"), &app).unwrap());
    assert!(body.contains("660,000"));
    assert!(body.contains("Family Deluxe"));
}

#[test]
fn promotion_update_validates_input() {
    let app = test_app();

    assert!(matches!(
        handle(
            post_form("/channels/promotions", &[("channel", "Naver"), ("room", "XYZ")]),
            &app
        ),
        Err(ServerError::NotFound)
    ));
    assert!(matches!(
        handle(
            post_form(
                "/channels/promotions",
                &[("channel", "Naver"), ("room", "FDB"), ("discount", "lots")]
            ),
            &app
        ),
        Err(ServerError::BadRequest(_))
    ));

    // blank numbers count as zero
    handle(
        post_form(
            "/channels/promotions",
            &[("channel", "Naver"), ("room", "HDP"), ("discount", ""), ("adjust", "")],
        ),
        &app,
    )
    .unwrap();
    let book = app.channel_book().unwrap();
    assert_eq!(book.get("Naver").unwrap().promotion("HDP").unwrap().discount_percent, 0.0);
}

#[test]
fn delete_channel() {
    let app = test_app();
    handle(post_form("/channels", &[("name", "Agoda")]), &app).unwrap();

    let resp = handle(post_form("/channels/delete", &[("name", "Agoda")]), &app).unwrap();
    assert_eq!(resp.status(), 303);
    assert!(app.channel_book().unwrap().get("Agoda").is_none());

    assert!(matches!(
        handle(post_form("/channels/delete", &[("name", "Agoda")]), &app),
        Err(ServerError::NotFound)
    ));
}

#[test]
fn delete_channel_matches_the_name_add_stored() {
    let app = test_app();
    handle(post_form("/channels", &[("name", " Agoda ")]), &app).unwrap();

    let resp = handle(post_form("/channels/delete", &[("name", "Agoda  ")]), &app).unwrap();
    assert_eq!(resp.status(), 303);
    assert!(app.channel_book().unwrap().get("Agoda").is_none());
}
