// src/domain/normalize.rs
//
// Maps the raw Chinese column headers of a portal CSV export onto our
// canonical field set. This is the anti-corruption layer between whatever
// the export tool produced and the cleaned `ListingRecord`: unrecognized
// columns are dropped, missing required columns reject the whole file.

use crate::domain::record::Status;
use crate::errors::ServerError;

/// Canonical fields a column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Community,
    Layout,
    District,
    CommercialArea,
    Price,
    Area,
    Date,
    ListPrice,
    DealCycleDays,
    BuildYear,
    Decoration,
    FloorInfo,
    Attention,
}

/// How a recognized column cleans into its field. `wan` marks columns
/// denominated in 万元 whose bare values must be expanded ×10000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: Field,
    pub wan: bool,
}

/// Column layout of one file after header normalization: for each source
/// column either a spec or None (unrecognized, dropped).
#[derive(Debug)]
pub struct SchemaMap {
    pub columns: Vec<Option<ColumnSpec>>,
}

impl SchemaMap {
    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.map(|s| s.field) == Some(field))
    }

    pub fn spec_of(&self, field: Field) -> Option<ColumnSpec> {
        self.columns
            .iter()
            .flatten()
            .copied()
            .find(|s| s.field == field)
    }
}

fn spec(field: Field, wan: bool) -> Option<ColumnSpec> {
    Some(ColumnSpec { field, wan })
}

/// The documented header naming convention. Both the listing and the
/// transaction variants of each column name map to the same field, the
/// same way the original merged its two column_mapping tables.
fn recognize(header: &str) -> Option<ColumnSpec> {
    match header {
        "小区" | "小区名称" => spec(Field::Community, false),
        "户型" => spec(Field::Layout, false),
        "区域" => spec(Field::District, false),
        "商圈" => spec(Field::CommercialArea, false),
        "总价(万)" | "成交总价(万)" => spec(Field::Price, true),
        "价格" => spec(Field::Price, false),
        "面积(㎡)" | "建筑面积(㎡)" | "面积" => spec(Field::Area, false),
        "成交日期" | "日期" => spec(Field::Date, false),
        "挂牌价(万)" => spec(Field::ListPrice, true),
        "成交周期(天)" => spec(Field::DealCycleDays, false),
        "建成年代" | "年代" => spec(Field::BuildYear, false),
        "装修" => spec(Field::Decoration, false),
        "楼层" | "楼层信息" => spec(Field::FloorInfo, false),
        "关注人数" => spec(Field::Attention, false),
        _ => None,
    }
}

/// Builds the schema map for a file. Price and area are required; a file
/// without them is rejected with an error naming the missing column, so
/// no half-usable rows ever enter the dataset.
pub fn normalize_headers(file: &str, headers: &[String]) -> Result<SchemaMap, ServerError> {
    let columns: Vec<Option<ColumnSpec>> = headers
        .iter()
        .map(|h| recognize(h.trim().trim_start_matches('\u{feff}')))
        .collect();

    let map = SchemaMap { columns };

    for (field, name) in [(Field::Price, "总价(万)"), (Field::Area, "面积(㎡)")] {
        if map.index_of(field).is_none() {
            return Err(ServerError::MissingColumn {
                file: file.to_string(),
                column: name.to_string(),
            });
        }
    }

    Ok(map)
}

/// Derives the record status from the documented file naming convention
/// `YYYYMMDD_地区名_数据类型.csv`. Falls back to the upload form's choice
/// when the name does not carry a data type.
pub fn status_from_file_name(file: &str, fallback: Status) -> Status {
    if file.contains("成交") {
        Status::Transaction
    } else if file.contains("在售") {
        Status::ActiveListing
    } else {
        fallback
    }
}
