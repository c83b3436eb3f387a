pub mod csv_table;
pub mod decode;
pub mod multipart;

use crate::domain::clean::build_records;
use crate::domain::normalize::{normalize_headers, status_from_file_name};
use crate::domain::record::{Dataset, FileReport, Status};
use crate::errors::ServerError;
use crate::ingest::multipart::UploadedFile;

/// Runs the whole ingest pipeline over an upload: decode, parse, map
/// headers, clean rows. One file failing its header check rejects the
/// entire upload so the dataset never holds a partial batch.
pub fn build_dataset(files: &[UploadedFile], fallback: Status) -> Result<Dataset, ServerError> {
    let mut dataset = Dataset::default();

    for file in files {
        let table = csv_table::read_table(&file.file_name, &file.bytes)?;
        let map = normalize_headers(&file.file_name, &table.headers)?;
        let status = status_from_file_name(&file.file_name, fallback);
        let cleaned = build_records(&table, &map, status);

        println!(
            "📄 已导入「{}」: {} 行, 跳过 {} 行",
            file.file_name, cleaned.rows, cleaned.skipped
        );

        dataset.reports.push(FileReport {
            file: file.file_name.clone(),
            status,
            rows: cleaned.rows,
            skipped: cleaned.skipped,
        });
        dataset.records.extend(cleaned.records);
    }

    Ok(dataset)
}

/// Merges a fresh upload into an existing dataset (the "append" path of
/// the upload form). Reports accumulate so skipped-row tallies stay
/// visible across batches.
pub fn merge_dataset(existing: &Dataset, fresh: Dataset) -> Dataset {
    let mut merged = existing.clone();
    merged.records.extend(fresh.records);
    merged.reports.extend(fresh.reports);
    merged
}
