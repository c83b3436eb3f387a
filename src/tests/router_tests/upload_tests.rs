// src/tests/router_tests/upload_tests.rs

use crate::errors::ServerError;
use crate::router::handle;
use crate::sessions::SessionStore;
use crate::tests::utils::{session_cookie, upload_request};

const ACTIVE_CSV: &str = "总价(万),面积(㎡),区域\n350,88,静安\n420,95,徐汇\n";
const DEAL_CSV: &str =
    "成交总价(万),面积(㎡),区域,成交日期,挂牌价(万)\n300,80,静安,2024-01-05,320\n";

#[test]
fn upload_creates_session_and_redirects_to_dashboard() {
    let store = SessionStore::new();

    let req = upload_request(&[], &[("20240101_在售.csv", ACTIVE_CSV)]);
    let resp = handle(req, &store).unwrap();

    assert_eq!(resp.status(), 303);
    let loc = resp
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert_eq!(loc, "/dashboard");

    let token = session_cookie(&resp);
    let dataset = store.get(&token).expect("dataset stored under new token");
    assert_eq!(dataset.records.len(), 2);
    assert_eq!(dataset.reports.len(), 1);
}

#[test]
fn upload_without_files_is_a_bad_request() {
    let store = SessionStore::new();

    let req = upload_request(&[("fallback", "active")], &[]);
    let err = handle(req, &store).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn upload_with_missing_required_column_rejects_the_file() {
    let store = SessionStore::new();

    let req = upload_request(&[], &[("bad.csv", "小区,区域\n翠湖天地,黄浦\n")]);
    let err = handle(req, &store).unwrap_err();
    assert!(matches!(err, ServerError::MissingColumn { .. }));
    assert!(err.to_string().contains("bad.csv"));
}

#[test]
fn second_upload_replaces_session_data_by_default() {
    let store = SessionStore::new();

    let resp = handle(upload_request(&[], &[("在售.csv", ACTIVE_CSV)]), &store).unwrap();
    let token = session_cookie(&resp);

    let req = {
        let mut req = upload_request(&[], &[("成交.csv", DEAL_CSV)]);
        req.headers_mut().insert(
            "Cookie",
            format!("{}={}", crate::sessions::SESSION_COOKIE, token)
                .parse()
                .unwrap(),
        );
        req
    };
    handle(req, &store).unwrap();

    let dataset = store.get(&token).unwrap();
    assert_eq!(dataset.records.len(), 1);
    assert_eq!(dataset.reports.len(), 1);
}

#[test]
fn append_upload_merges_into_the_existing_dataset() {
    let store = SessionStore::new();

    let resp = handle(upload_request(&[], &[("在售.csv", ACTIVE_CSV)]), &store).unwrap();
    let token = session_cookie(&resp);

    let req = {
        let mut req = upload_request(&[("append", "1")], &[("成交.csv", DEAL_CSV)]);
        req.headers_mut().insert(
            "Cookie",
            format!("{}={}", crate::sessions::SESSION_COOKIE, token)
                .parse()
                .unwrap(),
        );
        req
    };
    handle(req, &store).unwrap();

    let dataset = store.get(&token).unwrap();
    assert_eq!(dataset.records.len(), 3);
    assert_eq!(dataset.reports.len(), 2);
}

#[test]
fn file_name_decides_status_over_the_fallback() {
    let store = SessionStore::new();

    let req = upload_request(
        &[("fallback", "transaction")],
        &[("20240101_在售.csv", ACTIVE_CSV), ("other.csv", ACTIVE_CSV)],
    );
    let resp = handle(req, &store).unwrap();
    let token = session_cookie(&resp);

    let dataset = store.get(&token).unwrap();
    use crate::domain::record::Status;
    // 在售 in the name wins; the unlabeled file takes the fallback.
    assert_eq!(dataset.reports[0].status, Status::ActiveListing);
    assert_eq!(dataset.reports[1].status, Status::Transaction);
}
