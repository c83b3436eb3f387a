use crate::errors::ServerError;
use crate::templates::pages::error_page;
use astra::{Body, Response, ResponseBuilder};

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into a proper HTML response
pub fn error_to_response(err: ServerError) -> Response {
    let (status, message) = match &err {
        ServerError::NotFound => (404, "页面不存在".to_string()),
        ServerError::BadRequest(msg) => (400, msg.clone()),
        ServerError::MissingColumn { .. } => (400, err.to_string()),
        ServerError::CsvError(msg) => (400, msg.clone()),
        ServerError::XlsxError(msg) => (500, msg.clone()),
        ServerError::InternalError => (500, "服务器内部错误".to_string()),
    };
    html_error_response(status, &message)
}

/// Build an HTML error page
pub fn html_error_response(status: u16, message: &str) -> Response {
    let html = error_page(status, message).into_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::new(html))
        .unwrap_or_else(|_| Response::new(Body::new("Internal Server Error")))
}
