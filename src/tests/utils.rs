// src/tests/utils.rs
//
// Shared request plumbing for router tests: build requests the way a
// browser would and read astra response bodies back into strings.

use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;

pub const BOUNDARY: &str = "----test-boundary-7MA4YWxk";

/// Plain request with an empty body.
pub fn request(method: Method, uri: &str) -> Request {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = method;
    *req.uri_mut() = uri.parse().unwrap();
    req
}

/// Request carrying a session cookie.
pub fn request_with_cookie(method: Method, uri: &str, token: &str) -> Request {
    let mut req = request(method, uri);
    req.headers_mut().insert(
        "Cookie",
        format!("{}={}", crate::sessions::SESSION_COOKIE, token)
            .parse()
            .unwrap(),
    );
    req
}

/// Browser-style multipart body with text fields and CSV file parts.
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, value) in fields {
        out.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (filename, content) in files {
        out.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; \
                 filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
            )
            .as_bytes(),
        );
    }
    out.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    out
}

/// POST /upload request wrapping the given files.
pub fn upload_request(fields: &[(&str, &str)], files: &[(&str, &str)]) -> Request {
    let body = multipart_body(fields, files);
    let mut req = Request::new(Body::new(body));
    *req.method_mut() = Method::POST;
    *req.uri_mut() = "/upload".parse().unwrap();
    req.headers_mut().insert(
        "Content-Type",
        format!("multipart/form-data; boundary={BOUNDARY}")
            .parse()
            .unwrap(),
    );
    req
}

/// Read the full response body as UTF-8 text.
pub fn response_text(resp: &mut Response) -> String {
    String::from_utf8(response_bytes(resp)).unwrap()
}

pub fn response_bytes(resp: &mut Response) -> Vec<u8> {
    let mut buf = Vec::new();
    resp.body_mut().reader().read_to_end(&mut buf).unwrap();
    buf
}

/// Pull the session token out of a Set-Cookie header.
pub fn session_cookie(resp: &Response) -> String {
    let header = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .expect("response has no Set-Cookie header");
    let prefix = format!("{}=", crate::sessions::SESSION_COOKIE);
    let rest = header
        .strip_prefix(&prefix)
        .expect("Set-Cookie is not the session cookie");
    rest.split(';').next().unwrap().to_string()
}
