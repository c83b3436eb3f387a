use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use serde::Serialize;

/// Serialize a payload as a JSON response.
pub fn json_response<T: Serialize>(payload: &T) -> ResultResp {
    let body = serde_json::to_string(payload)
        .map_err(|e| ServerError::BadRequest(format!("JSON serialization failed: {e}")))?;

    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", "application/json; charset=utf-8")
        .body(Body::new(body))
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}
