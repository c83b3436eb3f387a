// errors.rs
use std::fmt;

/// Errors originating from either the server logic
/// (routing, bad requests, etc.) or the ingest/export layers.
///
/// Row-level cleaning failures are *not* errors; they are counted as
/// skipped rows on the dataset. Only file-level problems (a required
/// column missing, an unreadable CSV) surface here.
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    /// A required column was absent from an uploaded file. The whole
    /// file is rejected; the message names the file and the column.
    MissingColumn { file: String, column: String },
    CsvError(String),
    XlsxError(String),
    InternalError,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::MissingColumn { file, column } => {
                write!(f, "文件「{file}」缺少必需列「{column}」，已拒绝该文件")
            }
            ServerError::CsvError(msg) => write!(f, "CSV Error: {msg}"),
            ServerError::XlsxError(msg) => write!(f, "Spreadsheet Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}
