use maud::{html, Markup};

use crate::domain::filter::FilterCriteria;
use crate::domain::record::{FileReport, ListingRecord};
use crate::domain::stats::{
    FieldSummaries, Granularity, HistogramBin, SegmentRow, SummaryStats, TrendPoint,
};
use crate::templates::components::{
    bar_chart, format_change, format_num, format_opt, format_wan, metric_tile, segment_table,
    trend_chart,
};
use crate::templates::desktop_layout;

/// Everything the dashboard page needs, computed in the router so the
/// template stays a pure render step.
pub struct DashboardVm {
    pub reports: Vec<FileReport>,
    pub total_records: usize,
    pub filtered_count: usize,
    pub skipped_total: usize,
    /// Sidebar option lists, from the full dataset (not the filtered set,
    /// so a filter never hides its own options).
    pub district_options: Vec<String>,
    pub commercial_area_options: Vec<String>,
    pub criteria: FilterCriteria,
    pub granularity: Granularity,
    pub summaries: FieldSummaries,
    pub district_rows: Vec<SegmentRow>,
    pub commercial_rows: Vec<SegmentRow>,
    pub area_rows: Vec<SegmentRow>,
    pub tertile_rows: Vec<SegmentRow>,
    pub age_rows: Vec<SegmentRow>,
    pub cycle_rows: Vec<SegmentRow>,
    pub discount_rate: Option<f64>,
    pub trend: Vec<TrendPoint>,
    pub price_histogram: Vec<HistogramBin>,
    /// First rows of the filtered set for the data preview table.
    pub sample: Vec<ListingRecord>,
    /// Raw query string, reused verbatim on the export link.
    pub query: String,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "数据看板",
        html! {
            main class="container" {
                div class="layout" {
                    (sidebar(vm))
                    div class="content" {
                        @if vm.filtered_count == 0 {
                            div class="card" {
                                p class="empty" { "当前筛选条件下没有数据，请调整筛选条件。" }
                            }
                        } @else {
                            (overview_card(vm))
                            (summary_card(&vm.summaries))
                            (segments_card(vm))
                            (trend_card(vm))
                            (sample_card(vm))
                        }
                        (reports_card(vm))
                    }
                }
            }
        },
    )
}

fn sidebar(vm: &DashboardVm) -> Markup {
    let c = &vm.criteria;
    let selected_districts = c.districts.as_deref().unwrap_or(&[]);
    let selected_areas = c.commercial_areas.as_deref().unwrap_or(&[]);

    html! {
        aside class="sidebar" {
            h3 { "筛选" }
            form class="filters" action="/dashboard" method="get" {
                label for="district" { "区域" }
                select name="district" id="district" multiple size="5" {
                    @for d in &vm.district_options {
                        option value=(d) selected[selected_districts.iter().any(|x| x == d)] { (d) }
                    }
                }

                label for="area" { "商圈" }
                select name="area" id="area" multiple size="5" {
                    @for a in &vm.commercial_area_options {
                        option value=(a) selected[selected_areas.iter().any(|x| x == a)] { (a) }
                    }
                }

                label for="min_price" { "总价下限(万)" }
                input type="number" step="any" min="0" name="min_price" id="min_price"
                    value=[c.min_price.map(|v| format_wan(v))];
                label for="max_price" { "总价上限(万)" }
                input type="number" step="any" min="0" name="max_price" id="max_price"
                    value=[c.max_price.map(|v| format_wan(v))];

                label for="min_area" { "面积下限(㎡)" }
                input type="number" step="any" min="0" name="min_area" id="min_area"
                    value=[c.min_area.map(|v| format_num(v))];
                label for="max_area" { "面积上限(㎡)" }
                input type="number" step="any" min="0" name="max_area" id="max_area"
                    value=[c.max_area.map(|v| format_num(v))];

                label for="from" { "成交日期从" }
                input type="date" name="from" id="from"
                    value=[c.date_from.map(|d| d.format("%Y-%m-%d").to_string())];
                label for="to" { "成交日期到" }
                input type="date" name="to" id="to"
                    value=[c.date_to.map(|d| d.format("%Y-%m-%d").to_string())];

                label for="granularity" { "趋势粒度" }
                select name="granularity" id="granularity" {
                    @for g in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly, Granularity::Quarterly] {
                        option value=(g.query_value()) selected[vm.granularity == g] { (g.label()) }
                    }
                }

                button type="submit" { "应用筛选" }
            }
            p {
                a href="/dashboard" { "清除筛选" }
            }
        }
    }
}

fn overview_card(vm: &DashboardVm) -> Markup {
    html! {
        section class="card" {
            h3 { "概览" }
            div class="tiles" {
                (metric_tile("筛选后记录", &vm.filtered_count.to_string()))
                (metric_tile("记录总数", &vm.total_records.to_string()))
                (metric_tile("清洗跳过行", &vm.skipped_total.to_string()))
                @if let Some(price) = &vm.summaries.price {
                    (metric_tile("平均总价(万)", &format_wan(price.mean)))
                    (metric_tile("总价中位数(万)", &format_wan(price.median)))
                }
                @if let Some(unit) = &vm.summaries.price_per_area {
                    (metric_tile("平均单价(元/㎡)", &format_num(unit.mean)))
                }
                @if let Some(rate) = vm.discount_rate {
                    (metric_tile("平均折价率(%)", &format_num(rate)))
                }
            }
            p {
                a class="export" href=(export_href(&vm.query)) { "⬇ 导出当前数据 (XLSX)" }
            }
        }
    }
}

fn export_href(query: &str) -> String {
    if query.is_empty() {
        "/export".to_string()
    } else {
        format!("/export?{query}")
    }
}

fn summary_card(summaries: &FieldSummaries) -> Markup {
    html! {
        section class="card" {
            h3 { "描述统计" }
            table {
                thead {
                    tr {
                        th { "指标" }
                        th class="num" { "数量" }
                        th class="num" { "均值" }
                        th class="num" { "中位数" }
                        th class="num" { "标准差" }
                        th class="num" { "最小" }
                        th class="num" { "25%" }
                        th class="num" { "75%" }
                        th class="num" { "最大" }
                    }
                }
                tbody {
                    (summary_row("总价(万)", &summaries.price, 10_000.0))
                    (summary_row("面积(㎡)", &summaries.area, 1.0))
                    (summary_row("单价(元/㎡)", &summaries.price_per_area, 1.0))
                }
            }
        }
    }
}

fn summary_row(label: &str, stats: &Option<SummaryStats>, divisor: f64) -> Markup {
    html! {
        tr {
            td { (label) }
            @match stats {
                Some(s) => {
                    td class="num" { (s.count) }
                    td class="num" { (format_num(s.mean / divisor)) }
                    td class="num" { (format_num(s.median / divisor)) }
                    td class="num" { (format_num(s.std / divisor)) }
                    td class="num" { (format_num(s.min / divisor)) }
                    td class="num" { (format_num(s.q25 / divisor)) }
                    td class="num" { (format_num(s.q75 / divisor)) }
                    td class="num" { (format_num(s.max / divisor)) }
                }
                None => {
                    td class="num" colspan="8" { "-" }
                }
            }
        }
    }
}

fn segments_card(vm: &DashboardVm) -> Markup {
    let district_bars: Vec<(String, f64)> = vm
        .district_rows
        .iter()
        .map(|r| (r.label.clone(), r.count as f64))
        .collect();
    let hist_bars: Vec<(String, f64)> = vm
        .price_histogram
        .iter()
        .map(|b| (b.label.clone(), b.count as f64))
        .collect();

    html! {
        section class="card" {
            h3 { "区域分布" }
            (bar_chart(&district_bars))
            (segment_table(&vm.district_rows))
        }
        @if !vm.commercial_rows.is_empty() {
            section class="card" {
                h3 { "商圈分布" }
                (segment_table(&vm.commercial_rows))
            }
        }
        section class="card" {
            h3 { "总价分布(万)" }
            (bar_chart(&hist_bars))
        }
        section class="card" {
            h3 { "户型面积细分" }
            (segment_table(&vm.area_rows))
        }
        section class="card" {
            h3 { "价格档次" }
            (segment_table(&vm.tertile_rows))
        }
        @if !vm.age_rows.is_empty() {
            section class="card" {
                h3 { "房龄细分" }
                (segment_table(&vm.age_rows))
            }
        }
        @if !vm.cycle_rows.is_empty() {
            section class="card" {
                h3 { "成交周期细分" }
                (segment_table(&vm.cycle_rows))
            }
        }
    }
}

fn trend_card(vm: &DashboardVm) -> Markup {
    html! {
        section class="card" {
            h3 { "成交趋势（" (vm.granularity.label()) "）" }
            (trend_chart(&vm.trend))
            @if !vm.trend.is_empty() {
                table {
                    thead {
                        tr {
                            th { "时间" }
                            th class="num" { "成交量" }
                            th class="num" { "成交量环比" }
                            th class="num" { "平均总价(万)" }
                            th class="num" { "均价环比" }
                            th class="num" { "中位总价(万)" }
                            th class="num" { "平均单价(元/㎡)" }
                        }
                    }
                    tbody {
                        @for p in &vm.trend {
                            tr {
                                td { (p.bucket) }
                                td class="num" { (p.count) }
                                td class="num" { (format_change(p.count_change)) }
                                td class="num" { (format_wan(p.avg_price)) }
                                td class="num" { (format_change(p.avg_price_change)) }
                                td class="num" { (format_wan(p.median_price)) }
                                td class="num" { (format_opt(p.avg_price_per_area)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn sample_card(vm: &DashboardVm) -> Markup {
    html! {
        section class="card" {
            h3 { "数据预览（前 " (vm.sample.len()) " 条）" }
            table {
                thead {
                    tr {
                        th { "类型" }
                        th { "小区" }
                        th { "区域" }
                        th { "商圈" }
                        th { "户型" }
                        th class="num" { "总价(万)" }
                        th class="num" { "面积(㎡)" }
                        th class="num" { "单价(元/㎡)" }
                        th { "成交日期" }
                    }
                }
                tbody {
                    @for r in &vm.sample {
                        tr {
                            td { (r.status.label()) }
                            td { (r.community.as_deref().unwrap_or("-")) }
                            td { (r.district.as_deref().unwrap_or("-")) }
                            td { (r.commercial_area.as_deref().unwrap_or("-")) }
                            td { (r.layout.as_deref().unwrap_or("-")) }
                            td class="num" { (format_wan(r.price)) }
                            td class="num" { (format_num(r.area)) }
                            td class="num" { (format_opt(r.price_per_area)) }
                            td { (r.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "-".into())) }
                        }
                    }
                }
            }
        }
    }
}

fn reports_card(vm: &DashboardVm) -> Markup {
    html! {
        section class="card" {
            h3 { "已导入文件" }
            table {
                thead {
                    tr {
                        th { "文件" }
                        th { "类型" }
                        th class="num" { "行数" }
                        th class="num" { "跳过" }
                    }
                }
                tbody {
                    @for report in &vm.reports {
                        tr {
                            td { (report.file) }
                            td { (report.status.label()) }
                            td class="num" { (report.rows) }
                            td class="num" { (report.skipped) }
                        }
                    }
                }
            }
            form action="/reset" method="post" {
                button type="submit" { "清空数据" }
            }
        }
    }
}
