// src/domain/clean.rs
//
// Best-effort coercion of raw string cells into numbers and dates. A real
// export mixes "350万", "3,500,000", "88㎡" and plain numbers in the same
// column, so cleaning strips thousands separators and recognized unit
// suffixes before parsing. Failures on required fields drop the row and
// bump the file's skipped count; failures on optional fields clear the
// field and keep the row.

use chrono::NaiveDate;

use crate::domain::normalize::{Field, SchemaMap};
use crate::domain::record::{ListingRecord, Status};
use crate::ingest::csv_table::RawTable;

/// Unit suffixes we strip before parsing. Longer suffixes first so
/// "万元" wins over "元".
const SUFFIXES: [&str; 11] = [
    "万元", "元/平", "元/㎡", "元", "平米", "㎡", "平", "天", "人", "套", "万",
];

/// Parses a numeric cell, returning the value in base units.
///
/// A trailing `万` (or `万元`) multiplies by 10000. `column_wan` marks
/// values from a 万-denominated column, e.g. 总价(万); the multiplier is
/// applied exactly once either way. Negative values violate the
/// non-negativity invariant and are rejected.
pub fn parse_numeric(raw: &str, column_wan: bool) -> Option<f64> {
    let mut s = raw.trim().replace([',', '，'], "");
    if s.is_empty() {
        return None;
    }

    let mut wan = column_wan;
    for suffix in SUFFIXES {
        if let Some(stripped) = s.strip_suffix(suffix) {
            if suffix == "万" || suffix == "万元" {
                wan = true;
            }
            s = stripped.trim().to_string();
            break;
        }
    }

    let value: f64 = s.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    Some(if wan { value * 10_000.0 } else { value })
}

/// Parses a date cell. Portal exports use a handful of formats; a full
/// datetime is accepted by reading its leading date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日"];
    for fmt in FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // "2024-03-01 14:30:00" and friends: try the first 10 chars.
    if s.len() > 10 {
        let head: String = s.chars().take(10).collect();
        for fmt in FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(&head, fmt) {
                return Some(d);
            }
        }
    }

    None
}

/// Round half away from zero to one decimal. The single place the derived
/// unit price is rounded; display code never re-rounds.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Outcome of cleaning one file's rows.
pub struct Cleaned {
    pub records: Vec<ListingRecord>,
    pub rows: usize,
    pub skipped: usize,
}

/// Builds records from a normalized raw table. Price and area must both
/// coerce or the row is skipped, so every record satisfies the invariants:
/// price >= 0, area >= 0, and price_per_area defined only when area > 0.
pub fn build_records(table: &RawTable, map: &SchemaMap, status: Status) -> Cleaned {
    let mut records = Vec::with_capacity(table.rows.len());
    let mut skipped = 0usize;

    let cell = |row: &[String], field: Field| -> Option<String> {
        map.index_of(field)
            .and_then(|i| row.get(i))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    for row in &table.rows {
        // Fully empty lines are not data rows; drop without counting.
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let price_wan = map.spec_of(Field::Price).map(|s| s.wan).unwrap_or(false);
        let price = cell(row, Field::Price).and_then(|v| parse_numeric(&v, price_wan));
        let area = cell(row, Field::Area).and_then(|v| parse_numeric(&v, false));

        let (price, area) = match (price, area) {
            (Some(p), Some(a)) => (p, a),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let price_per_area = if area > 0.0 {
            Some(round1(price / area))
        } else {
            None
        };

        let list_price_wan = map
            .spec_of(Field::ListPrice)
            .map(|s| s.wan)
            .unwrap_or(false);

        records.push(ListingRecord {
            status,
            price,
            area,
            price_per_area,
            district: cell(row, Field::District),
            commercial_area: cell(row, Field::CommercialArea),
            community: cell(row, Field::Community),
            layout: cell(row, Field::Layout),
            decoration: cell(row, Field::Decoration),
            floor_info: cell(row, Field::FloorInfo),
            date: cell(row, Field::Date).and_then(|v| parse_date(&v)),
            list_price: cell(row, Field::ListPrice)
                .and_then(|v| parse_numeric(&v, list_price_wan)),
            deal_cycle_days: cell(row, Field::DealCycleDays)
                .and_then(|v| parse_numeric(&v, false)),
            build_year: cell(row, Field::BuildYear)
                .and_then(|v| parse_numeric(&v, false))
                .map(|y| y as i32),
            attention: cell(row, Field::Attention).and_then(|v| parse_numeric(&v, false)),
        });
    }

    Cleaned {
        rows: records.len() + skipped,
        records,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize::normalize_headers;

    #[test]
    fn parses_wan_suffix() {
        assert_eq!(parse_numeric("350万", false), Some(3_500_000.0));
        assert_eq!(parse_numeric("350万元", false), Some(3_500_000.0));
    }

    #[test]
    fn wan_column_and_wan_suffix_multiply_once() {
        // Column 总价(万) with a redundant 万 suffix in the cell.
        assert_eq!(parse_numeric("350万", true), Some(3_500_000.0));
        assert_eq!(parse_numeric("350", true), Some(3_500_000.0));
    }

    #[test]
    fn parses_area_and_unit_price_suffixes() {
        assert_eq!(parse_numeric("88㎡", false), Some(88.0));
        assert_eq!(parse_numeric("120平米", false), Some(120.0));
        assert_eq!(parse_numeric("39772.7元/平", false), Some(39772.7));
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_numeric("3,500,000", false), Some(3_500_000.0));
        assert_eq!(parse_numeric("3，500，000元", false), Some(3_500_000.0));
    }

    #[test]
    fn rejects_garbage_and_negatives() {
        assert_eq!(parse_numeric("面议", false), None);
        assert_eq!(parse_numeric("", false), None);
        assert_eq!(parse_numeric("-5", false), None);
    }

    #[test]
    fn parses_common_date_formats() {
        let expect = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_date("2024-03-01"), Some(expect));
        assert_eq!(parse_date("2024/03/01"), Some(expect));
        assert_eq!(parse_date("2024.03.01"), Some(expect));
        assert_eq!(parse_date("2024年03月01日"), Some(expect));
        assert_eq!(parse_date("2024-03-01 14:30:00"), Some(expect));
        assert_eq!(parse_date("三月一日"), None);
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn suffixed_row_cleans_to_yuan_and_derived_unit_price() {
        let t = table(&["价格", "面积", "区域"], &[&["350万", "88㎡", "静安"]]);
        let map = normalize_headers("x.csv", &t.headers).unwrap();
        let cleaned = build_records(&t, &map, Status::ActiveListing);

        assert_eq!(cleaned.skipped, 0);
        let rec = &cleaned.records[0];
        assert_eq!(rec.price, 3_500_000.0);
        assert_eq!(rec.area, 88.0);
        assert_eq!(rec.district.as_deref(), Some("静安"));
        assert_eq!(rec.price_per_area, Some(39772.7));
    }

    #[test]
    fn rows_failing_required_coercion_are_skipped_not_zeroed() {
        let t = table(
            &["总价(万)", "面积(㎡)"],
            &[&["350", "88"], &["价格待定", "90"], &["420", ""]],
        );
        let map = normalize_headers("x.csv", &t.headers).unwrap();
        let cleaned = build_records(&t, &map, Status::Transaction);

        assert_eq!(cleaned.records.len(), 1);
        assert_eq!(cleaned.skipped, 2);
        assert_eq!(cleaned.rows, 3);
        assert_eq!(cleaned.records[0].price, 3_500_000.0);
    }

    #[test]
    fn zero_area_leaves_unit_price_undefined() {
        let t = table(&["总价(万)", "面积(㎡)"], &[&["350", "0"]]);
        let map = normalize_headers("x.csv", &t.headers).unwrap();
        let cleaned = build_records(&t, &map, Status::ActiveListing);

        assert_eq!(cleaned.records[0].price_per_area, None);
        assert_eq!(cleaned.skipped, 0);
    }

    #[test]
    fn optional_field_failures_keep_the_row() {
        let t = table(
            &["总价(万)", "面积(㎡)", "成交日期", "建成年代"],
            &[&["350", "88", "日期不详", "大约九十年代"]],
        );
        let map = normalize_headers("x.csv", &t.headers).unwrap();
        let cleaned = build_records(&t, &map, Status::Transaction);

        assert_eq!(cleaned.records.len(), 1);
        assert_eq!(cleaned.records[0].date, None);
        assert_eq!(cleaned.records[0].build_year, None);
    }

    #[test]
    fn blank_lines_are_ignored_without_counting_as_skips() {
        let t = table(&["总价(万)", "面积(㎡)"], &[&["350", "88"], &["", ""]]);
        let map = normalize_headers("x.csv", &t.headers).unwrap();
        let cleaned = build_records(&t, &map, Status::ActiveListing);

        assert_eq!(cleaned.records.len(), 1);
        assert_eq!(cleaned.skipped, 0);
        assert_eq!(cleaned.rows, 1);
    }
}
