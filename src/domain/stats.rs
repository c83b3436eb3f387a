// src/domain/stats.rs
//
// Descriptive statistics over a cleaned, filtered record set. Everything
// here returns an explicit empty result (None or an empty Vec) for empty
// input; no function divides by a count it did not check.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::record::{ListingRecord, Status};

/// count / mean / median / std / quartiles / extrema of one numeric field.
/// Median and quartiles use linear interpolation between closest ranks,
/// std is the sample standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
}

pub fn summary(values: &[f64]) -> Option<SummaryStats> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    } else {
        0.0
    };

    Some(SummaryStats {
        count,
        mean,
        median: quantile(&sorted, 0.5),
        std,
        min: sorted[0],
        max: sorted[count - 1],
        q25: quantile(&sorted, 0.25),
        q75: quantile(&sorted, 0.75),
    })
}

/// Linear-interpolation quantile over pre-sorted values.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let idx = (sorted.len() - 1) as f64 * q;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (idx - lo as f64)
    }
}

/// Summaries of the three core fields of the data model.
#[derive(Debug, Serialize)]
pub struct FieldSummaries {
    pub price: Option<SummaryStats>,
    pub area: Option<SummaryStats>,
    pub price_per_area: Option<SummaryStats>,
}

pub fn field_summaries(records: &[ListingRecord]) -> FieldSummaries {
    let prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    let areas: Vec<f64> = records.iter().map(|r| r.area).collect();
    let unit: Vec<f64> = records.iter().filter_map(|r| r.price_per_area).collect();

    FieldSummaries {
        price: summary(&prices),
        area: summary(&areas),
        price_per_area: summary(&unit),
    }
}

/// One group of a segment breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRow {
    pub label: String,
    pub count: usize,
    pub avg_price: f64,
    /// None when no record in the group has a defined unit price.
    pub avg_price_per_area: Option<f64>,
}

fn segment_rows(groups: BTreeMap<String, Vec<&ListingRecord>>) -> Vec<SegmentRow> {
    let mut rows: Vec<SegmentRow> = groups
        .into_iter()
        .map(|(label, members)| {
            let count = members.len();
            let avg_price = members.iter().map(|r| r.price).sum::<f64>() / count as f64;
            let unit: Vec<f64> = members.iter().filter_map(|r| r.price_per_area).collect();
            let avg_price_per_area = if unit.is_empty() {
                None
            } else {
                Some(unit.iter().sum::<f64>() / unit.len() as f64)
            };
            SegmentRow {
                label,
                count,
                avg_price,
                avg_price_per_area,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.label.cmp(&b.label)));
    rows
}

/// Label used for records whose grouping field is absent, so segment
/// counts always sum to the ungrouped total.
pub const UNKNOWN_SEGMENT: &str = "未知";

pub fn segment_by_district(records: &[ListingRecord]) -> Vec<SegmentRow> {
    segment_by(records, |r| r.district.as_deref())
}

pub fn segment_by_commercial_area(records: &[ListingRecord]) -> Vec<SegmentRow> {
    segment_by(records, |r| r.commercial_area.as_deref())
}

fn segment_by<'a>(
    records: &'a [ListingRecord],
    key: impl Fn(&'a ListingRecord) -> Option<&'a str>,
) -> Vec<SegmentRow> {
    let mut groups: BTreeMap<String, Vec<&ListingRecord>> = BTreeMap::new();
    for r in records {
        groups
            .entry(key(r).unwrap_or(UNKNOWN_SEGMENT).to_string())
            .or_default()
            .push(r);
    }
    segment_rows(groups)
}

/// 户型 market segments by area band, same bins as the original report.
pub fn area_segments(records: &[ListingRecord]) -> Vec<SegmentRow> {
    const BANDS: [(f64, &str); 5] = [
        (50.0, "小户型(<50㎡)"),
        (70.0, "紧凑型(50-70㎡)"),
        (90.0, "标准型(70-90㎡)"),
        (120.0, "舒适型(90-120㎡)"),
        (f64::INFINITY, "大户型(>120㎡)"),
    ];

    let mut groups: BTreeMap<String, Vec<&ListingRecord>> = BTreeMap::new();
    for r in records {
        let label = BANDS
            .iter()
            .find(|(upper, _)| r.area < *upper)
            .map(|(_, l)| *l)
            .unwrap_or("大户型(>120㎡)");
        groups.entry(label.to_string()).or_default().push(r);
    }

    // Keep band order, not count order.
    let mut rows = Vec::new();
    for (_, label) in BANDS {
        if let Some(members) = groups.remove(label) {
            let mut seg = segment_rows(BTreeMap::from([(label.to_string(), members)]));
            rows.append(&mut seg);
        }
    }
    rows
}

/// Price tertiles (经济型 / 中端型 / 高端型), boundaries at the 33% and
/// 67% price quantiles of the given set.
pub fn price_tertiles(records: &[ListingRecord]) -> Vec<SegmentRow> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    prices.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q33 = quantile(&prices, 0.33);
    let q67 = quantile(&prices, 0.67);

    let mut groups: BTreeMap<String, Vec<&ListingRecord>> = BTreeMap::new();
    for r in records {
        let label = if r.price <= q33 {
            "经济型"
        } else if r.price <= q67 {
            "中端型"
        } else {
            "高端型"
        };
        groups.entry(label.to_string()).or_default().push(r);
    }

    let mut rows = Vec::new();
    for label in ["经济型", "中端型", "高端型"] {
        if let Some(members) = groups.remove(label) {
            let mut seg = segment_rows(BTreeMap::from([(label.to_string(), members)]));
            rows.append(&mut seg);
        }
    }
    rows
}

/// House-age bands over records carrying a build year; avg unit price
/// per band is the interesting number here.
pub fn age_segments(records: &[ListingRecord], current_year: i32) -> Vec<SegmentRow> {
    const BANDS: [(i32, &str); 5] = [
        (5, "新房(≤5年)"),
        (10, "次新房(6-10年)"),
        (20, "中等房龄(11-20年)"),
        (30, "老房(21-30年)"),
        (i32::MAX, "超老房(>30年)"),
    ];

    let mut groups: BTreeMap<String, Vec<&ListingRecord>> = BTreeMap::new();
    for r in records {
        let Some(year) = r.build_year else { continue };
        let age = current_year - year;
        if age < 0 {
            continue;
        }
        let label = BANDS
            .iter()
            .find(|(upper, _)| age <= *upper)
            .map(|(_, l)| *l)
            .unwrap_or("超老房(>30年)");
        groups.entry(label.to_string()).or_default().push(r);
    }

    let mut rows = Vec::new();
    for (_, label) in BANDS {
        if let Some(members) = groups.remove(label) {
            let mut seg = segment_rows(BTreeMap::from([(label.to_string(), members)]));
            rows.append(&mut seg);
        }
    }
    rows
}

/// Deal-cycle bands over transaction records carrying 成交周期(天).
pub fn cycle_segments(records: &[ListingRecord]) -> Vec<SegmentRow> {
    const BANDS: [(f64, &str); 5] = [
        (30.0, "快速成交(≤30天)"),
        (60.0, "正常成交(31-60天)"),
        (90.0, "缓慢成交(61-90天)"),
        (180.0, "困难成交(91-180天)"),
        (f64::INFINITY, "超长周期(>180天)"),
    ];

    let mut groups: BTreeMap<String, Vec<&ListingRecord>> = BTreeMap::new();
    for r in records {
        if r.status != Status::Transaction {
            continue;
        }
        let Some(days) = r.deal_cycle_days else {
            continue;
        };
        let label = BANDS
            .iter()
            .find(|(upper, _)| days <= *upper)
            .map(|(_, l)| *l)
            .unwrap_or("超长周期(>180天)");
        groups.entry(label.to_string()).or_default().push(r);
    }

    let mut rows = Vec::new();
    for (_, label) in BANDS {
        if let Some(members) = groups.remove(label) {
            let mut seg = segment_rows(BTreeMap::from([(label.to_string(), members)]));
            rows.append(&mut seg);
        }
    }
    rows
}

/// Average discount rate in percent, (挂牌价 - 成交价) / 挂牌价 × 100,
/// over transaction records carrying a positive list price.
pub fn avg_discount_rate(records: &[ListingRecord]) -> Option<f64> {
    let rates: Vec<f64> = records
        .iter()
        .filter(|r| r.status == Status::Transaction)
        .filter_map(|r| {
            let list = r.list_price?;
            if list > 0.0 {
                Some((list - r.price) / list * 100.0)
            } else {
                None
            }
        })
        .collect();

    if rates.is_empty() {
        None
    } else {
        Some(rates.iter().sum::<f64>() / rates.len() as f64)
    }
}

/// Time-bucket granularity for the transaction trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl Granularity {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "day" => Some(Granularity::Daily),
            "week" => Some(Granularity::Weekly),
            "month" => Some(Granularity::Monthly),
            "quarter" => Some(Granularity::Quarterly),
            _ => None,
        }
    }

    pub fn query_value(&self) -> &'static str {
        match self {
            Granularity::Daily => "day",
            Granularity::Weekly => "week",
            Granularity::Monthly => "month",
            Granularity::Quarterly => "quarter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Daily => "按日",
            Granularity::Weekly => "按周",
            Granularity::Monthly => "按月",
            Granularity::Quarterly => "按季度",
        }
    }

    /// Bucket key for a date. Keys are zero-padded so the lexicographic
    /// BTreeMap order is chronological.
    pub fn bucket(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Daily => date.format("%Y-%m-%d").to_string(),
            Granularity::Weekly => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Monthly => date.format("%Y-%m").to_string(),
            Granularity::Quarterly => {
                format!("{}-Q{}", date.year(), (date.month0() / 3) + 1)
            }
        }
    }
}

/// One bucket of the transaction trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub bucket: String,
    pub count: usize,
    pub avg_price: f64,
    pub median_price: f64,
    /// None when no record in the bucket has a defined unit price.
    pub avg_price_per_area: Option<f64>,
    /// 环比 volume change in percent vs the previous bucket. None on the
    /// first bucket or when the previous value is zero.
    pub count_change: Option<f64>,
    /// 环比 average-price change in percent vs the previous bucket.
    pub avg_price_change: Option<f64>,
}

/// Counts and average/median prices bucketed by `granularity`, restricted
/// to transaction records with a valid date. Chronologically ordered.
pub fn time_trend(records: &[ListingRecord], granularity: Granularity) -> Vec<TrendPoint> {
    let mut groups: BTreeMap<String, Vec<&ListingRecord>> = BTreeMap::new();
    for r in records {
        if r.status != Status::Transaction {
            continue;
        }
        let Some(date) = r.date else { continue };
        groups
            .entry(granularity.bucket(date))
            .or_default()
            .push(r);
    }

    let mut points: Vec<TrendPoint> = groups
        .into_iter()
        .map(|(bucket, members)| {
            let count = members.len();
            let mut prices: Vec<f64> = members.iter().map(|r| r.price).collect();
            prices.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let avg_price = prices.iter().sum::<f64>() / count as f64;
            let unit: Vec<f64> = members.iter().filter_map(|r| r.price_per_area).collect();
            TrendPoint {
                bucket,
                count,
                avg_price,
                median_price: quantile(&prices, 0.5),
                avg_price_per_area: if unit.is_empty() {
                    None
                } else {
                    Some(unit.iter().sum::<f64>() / unit.len() as f64)
                },
                count_change: None,
                avg_price_change: None,
            }
        })
        .collect();

    for i in 1..points.len() {
        points[i].count_change =
            pct_change(points[i - 1].count as f64, points[i].count as f64);
        points[i].avg_price_change = pct_change(points[i - 1].avg_price, points[i].avg_price);
    }

    points
}

/// Percent change from `prev` to `cur`; None when `prev` is zero.
pub fn pct_change(prev: f64, cur: f64) -> Option<f64> {
    if prev == 0.0 {
        None
    } else {
        Some((cur - prev) / prev * 100.0)
    }
}

/// Equal-width histogram bins for the distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub label: String,
    pub count: usize,
}

pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            label: format!("{:.0}", min),
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let mut idx = ((v - min) / width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = min + width * i as f64;
            let hi = lo + width;
            HistogramBin {
                label: format!("{:.0}-{:.0}", lo, hi),
                count,
            }
        })
        .collect()
}
