// src/tests/router_tests/dashboard_tests.rs

use http::Method;

use crate::router::handle;
use crate::sessions::SessionStore;
use crate::tests::utils::{request, request_with_cookie, response_text, session_cookie, upload_request};

const MIXED_CSV: &str = "成交总价(万),面积(㎡),区域,成交日期,挂牌价(万)\n\
    350,88,静安,2024-01-15,360\n\
    280,75,静安,2024-02-10,300\n\
    620,120,徐汇,2024-03-05,650\n";

fn seeded_store() -> (SessionStore, String) {
    let store = SessionStore::new();
    let resp = handle(upload_request(&[], &[("2024_成交.csv", MIXED_CSV)]), &store).unwrap();
    let token = session_cookie(&resp);
    (store, token)
}

#[test]
fn dashboard_without_session_redirects_home() {
    let store = SessionStore::new();
    let resp = handle(request(Method::GET, "/dashboard"), &store).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/"
    );
}

#[test]
fn dashboard_renders_the_uploaded_data() {
    let (store, token) = seeded_store();

    let mut resp = handle(request_with_cookie(Method::GET, "/dashboard", &token), &store).unwrap();
    assert_eq!(resp.status(), 200);

    let body = response_text(&mut resp);
    assert!(body.contains("概览"));
    assert!(body.contains("静安"));
    assert!(body.contains("徐汇"));
    assert!(body.contains("2024_成交.csv"));
    // The trend table carries the period-over-period columns.
    assert!(body.contains("成交量环比"));
    assert!(body.contains("均价环比"));
}

#[test]
fn district_filter_narrows_the_dashboard() {
    let (store, token) = seeded_store();

    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("district", "徐汇")
        .finish();
    let uri = format!("/dashboard?{query}");

    let mut resp = handle(request_with_cookie(Method::GET, &uri, &token), &store).unwrap();
    let body = response_text(&mut resp);

    // 徐汇 has one record; the 静安 segment disappears from the breakdown
    // while 静安 stays available as a sidebar option.
    assert!(body.contains("徐汇"));
    assert!(body.contains(r#"option value="静安""#));
    assert!(!body.contains("静安</td>"));
}

#[test]
fn all_excluding_filter_shows_the_empty_state() {
    let (store, token) = seeded_store();

    let uri = "/dashboard?min_price=99999";
    let mut resp = handle(request_with_cookie(Method::GET, uri, &token), &store).unwrap();
    assert_eq!(resp.status(), 200);

    let body = response_text(&mut resp);
    assert!(body.contains("没有数据"));
}

#[test]
fn api_summary_reports_filtered_statistics() {
    let (store, token) = seeded_store();

    let mut resp = handle(
        request_with_cookie(Method::GET, "/api/summary?granularity=month", &token),
        &store,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/json; charset=utf-8"
    );

    let payload: serde_json::Value = serde_json::from_str(&response_text(&mut resp)).unwrap();
    assert_eq!(payload["total_records"], 3);
    assert_eq!(payload["filtered_count"], 3);
    assert_eq!(payload["granularity"], "monthly");
    assert_eq!(payload["trend"].as_array().unwrap().len(), 3);
    // 环比 fields: None on the first bucket, filled afterwards.
    // Jan 350万 to Feb 280万 is a 20% drop at unchanged volume.
    assert!(payload["trend"][0]["count_change"].is_null());
    assert_eq!(payload["trend"][1]["count_change"], 0.0);
    let price_change = payload["trend"][1]["avg_price_change"].as_f64().unwrap();
    assert!((price_change + 20.0).abs() < 1e-9);
    assert_eq!(payload["summaries"]["price"]["count"], 3);
    // All three transactions carry a list price above the deal price.
    assert!(payload["avg_discount_rate"].as_f64().unwrap() > 0.0);
}

#[test]
fn price_bounds_arrive_in_wan() {
    let (store, token) = seeded_store();

    // 300万 到 400万 keeps only the 350万 deal.
    let uri = "/api/summary?min_price=300&max_price=400";
    let mut resp = handle(request_with_cookie(Method::GET, uri, &token), &store).unwrap();
    let payload: serde_json::Value = serde_json::from_str(&response_text(&mut resp)).unwrap();
    assert_eq!(payload["filtered_count"], 1);
}
