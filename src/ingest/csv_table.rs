// src/ingest/csv_table.rs

use crate::errors::ServerError;
use crate::ingest::decode::decode_csv_bytes;

/// A parsed CSV before any schema work: the header row plus every data
/// row as strings. Ragged rows are tolerated (flexible mode) and padded
/// or truncated downstream by position.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn read_table(file: &str, bytes: &[u8]) -> Result<RawTable, ServerError> {
    let text = decode_csv_bytes(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ServerError::CsvError(format!("读取「{file}」表头失败: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ServerError::CsvError(format!("文件「{file}」没有表头")));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| ServerError::CsvError(format!("读取「{file}」数据行失败: {e}")))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}
