// src/tests/router_tests/export_tests.rs

use http::Method;

use crate::router::handle;
use crate::sessions::SessionStore;
use crate::tests::utils::{request, request_with_cookie, response_bytes, session_cookie, upload_request};

const CSV: &str = "总价(万),面积(㎡),区域\n350,88,静安\n620,120,徐汇\n";

fn seeded_store() -> (SessionStore, String) {
    let store = SessionStore::new();
    let resp = handle(upload_request(&[], &[("在售.csv", CSV)]), &store).unwrap();
    let token = session_cookie(&resp);
    (store, token)
}

#[test]
fn export_without_session_redirects_home() {
    let store = SessionStore::new();
    let resp = handle(request(Method::GET, "/export"), &store).unwrap();
    assert_eq!(resp.status(), 303);
}

#[test]
fn export_returns_a_spreadsheet_attachment() {
    let (store, token) = seeded_store();

    let mut resp = handle(request_with_cookie(Method::GET, "/export", &token), &store).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment;"));
    // The Chinese workbook name rides in the RFC 5987 form with an
    // ASCII fallback, so the header itself stays ASCII.
    assert!(disposition.is_ascii());
    assert!(disposition.contains("filename*=UTF-8''"));

    // XLSX files are zip archives.
    let body = response_bytes(&mut resp);
    assert_eq!(&body[..4], b"PK\x03\x04");
}

#[test]
fn export_respects_the_active_filter() {
    let (store, token) = seeded_store();

    let full = {
        let mut resp =
            handle(request_with_cookie(Method::GET, "/export", &token), &store).unwrap();
        response_bytes(&mut resp).len()
    };
    let filtered = {
        let uri = "/export?max_area=100";
        let mut resp = handle(request_with_cookie(Method::GET, uri, &token), &store).unwrap();
        response_bytes(&mut resp).len()
    };

    // One row instead of two gives a smaller archive.
    assert!(filtered < full);
}

#[test]
fn reset_clears_the_session_dataset() {
    let (store, token) = seeded_store();
    assert!(store.get(&token).is_some());

    let resp = handle(
        request_with_cookie(Method::POST, "/reset", &token),
        &store,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert!(store.get(&token).is_none());
}
