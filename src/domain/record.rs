// src/domain/record.rs

use chrono::NaiveDate;
use serde::Serialize;

/// Where a record came from: a currently offered listing file (在售房源)
/// or a completed transaction file (成交房源).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    ActiveListing,
    Transaction,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::ActiveListing => "在售房源",
            Status::Transaction => "成交房源",
        }
    }
}

/// One cleaned row, normalized from the raw Chinese-header CSV.
///
/// `price` is always in yuan (万-denominated source values are expanded at
/// cleaning time) and `area` in square meters. Both are required: a row
/// that fails coercion on either never becomes a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRecord {
    pub status: Status,
    /// 总价, yuan. Non-negative.
    pub price: f64,
    /// 面积, ㎡. Non-negative.
    pub area: f64,
    /// 单价 (元/㎡), derived as price / area, rounded to 1 decimal.
    /// None when area is zero.
    pub price_per_area: Option<f64>,
    /// 区域
    pub district: Option<String>,
    /// 商圈
    pub commercial_area: Option<String>,
    /// 小区名称
    pub community: Option<String>,
    /// 户型
    pub layout: Option<String>,
    /// 装修
    pub decoration: Option<String>,
    /// 楼层 / 楼层信息
    pub floor_info: Option<String>,
    /// 成交日期 (transaction files)
    pub date: Option<NaiveDate>,
    /// 挂牌价, yuan (transaction files)
    pub list_price: Option<f64>,
    /// 成交周期(天)
    pub deal_cycle_days: Option<f64>,
    /// 建成年代
    pub build_year: Option<i32>,
    /// 关注人数
    pub attention: Option<f64>,
}

/// Per-file ingest outcome, kept so the UI can always show which
/// files and rows were affected by cleaning.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub status: Status,
    /// Data rows seen in the file (header excluded).
    pub rows: usize,
    /// Rows dropped because a required field failed coercion.
    pub skipped: usize,
}

/// The in-memory dataset for one browser session. Rebuilt on upload,
/// merged only when the upload form asks for it, never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    pub records: Vec<ListingRecord>,
    pub reports: Vec<FileReport>,
}

impl Dataset {
    pub fn skipped_total(&self) -> usize {
        self.reports.iter().map(|r| r.skipped).sum()
    }

    /// Distinct districts, sorted, for the filter sidebar.
    pub fn districts(&self) -> Vec<String> {
        Self::distinct(self.records.iter().filter_map(|r| r.district.as_deref()))
    }

    /// Distinct commercial areas, sorted, for the filter sidebar.
    pub fn commercial_areas(&self) -> Vec<String> {
        Self::distinct(
            self.records
                .iter()
                .filter_map(|r| r.commercial_area.as_deref()),
        )
    }

    fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut out: Vec<String> = values.map(|s| s.to_string()).collect();
        out.sort();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(district: Option<&str>) -> ListingRecord {
        ListingRecord {
            status: Status::ActiveListing,
            price: 3_500_000.0,
            area: 88.0,
            price_per_area: Some(39772.7),
            district: district.map(|s| s.to_string()),
            commercial_area: None,
            community: None,
            layout: None,
            decoration: None,
            floor_info: None,
            date: None,
            list_price: None,
            deal_cycle_days: None,
            build_year: None,
            attention: None,
        }
    }

    #[test]
    fn districts_are_sorted_and_deduped() {
        let ds = Dataset {
            records: vec![
                record(Some("徐汇")),
                record(Some("静安")),
                record(Some("徐汇")),
                record(None),
            ],
            reports: vec![],
        };
        assert_eq!(ds.districts(), vec!["徐汇".to_string(), "静安".to_string()]);
    }

    #[test]
    fn skipped_total_sums_reports() {
        let ds = Dataset {
            records: vec![],
            reports: vec![
                FileReport {
                    file: "a.csv".into(),
                    status: Status::ActiveListing,
                    rows: 10,
                    skipped: 2,
                },
                FileReport {
                    file: "b.csv".into(),
                    status: Status::Transaction,
                    rows: 5,
                    skipped: 1,
                },
            ],
        };
        assert_eq!(ds.skipped_total(), 3);
    }
}
