use maud::{html, Markup};

pub mod charts;

pub use charts::{bar_chart, trend_chart};

use crate::domain::stats::SegmentRow;

pub fn metric_tile(label: &str, value: &str) -> Markup {
    html! {
        div class="tile" {
            div class="label" { (label) }
            div class="value" { (value) }
        }
    }
}

/// Generic segment breakdown: label, count, 平均总价, 平均单价.
pub fn segment_table(rows: &[SegmentRow]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { "分组" }
                    th class="num" { "数量" }
                    th class="num" { "平均总价(万)" }
                    th class="num" { "平均单价(元/㎡)" }
                }
            }
            tbody {
                @for row in rows {
                    tr {
                        td { (row.label) }
                        td class="num" { (row.count) }
                        td class="num" { (format_wan(row.avg_price)) }
                        td class="num" {
                            @match row.avg_price_per_area {
                                Some(v) => { (format_num(v)) }
                                None => { "-" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Yuan value rendered in 万 with one decimal, e.g. 3500000 -> "350.0".
pub fn format_wan(yuan: f64) -> String {
    format!("{:.1}", yuan / 10_000.0)
}

/// Plain value with thousands-free one-decimal formatting.
pub fn format_num(v: f64) -> String {
    format!("{v:.1}")
}

pub fn format_opt(v: Option<f64>) -> String {
    v.map(format_num).unwrap_or_else(|| "-".to_string())
}

/// Signed percent change for 环比 columns; "-" when there is no
/// previous period to compare against.
pub fn format_change(v: Option<f64>) -> String {
    v.map(|v| format!("{v:+.1}%")).unwrap_or_else(|| "-".to_string())
}
