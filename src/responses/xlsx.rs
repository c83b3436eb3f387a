// responses/xlsx.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Return XLSX file as HTTP response
pub fn xlsx_response(buffer: Vec<u8>, filename: &str) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(200)
        .header(
            "Content-Type",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        )
        .header("Content-Disposition", content_disposition(filename))
        .body(Body::new(buffer))
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}

/// Header values must stay ASCII. Non-ASCII names get an ASCII fallback
/// plus the RFC 5987 `filename*=` form that clients decode back to the
/// real name.
fn content_disposition(filename: &str) -> String {
    if filename.is_ascii() {
        format!("attachment; filename=\"{filename}\"")
    } else {
        let encoded = utf8_percent_encode(filename, NON_ALPHANUMERIC);
        format!("attachment; filename=\"export.xlsx\"; filename*=UTF-8''{encoded}")
    }
}
