use maud::{html, Markup};

use crate::domain::stats::TrendPoint;

/// Horizontal bar chart as plain divs, widths scaled to the max value.
pub fn bar_chart(rows: &[(String, f64)]) -> Markup {
    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    html! {
        div class="bar-chart" {
            @if rows.is_empty() {
                p class="empty" { "暂无数据" }
            }
            @for (label, value) in rows {
                @let pct = if max > 0.0 { (value / max * 100.0).max(1.0) } else { 1.0 };
                div class="bar-row" {
                    span class="bar-label" { (label) }
                    div class="bar" style=(format!("width: {pct:.1}%")) {}
                    span class="bar-value" { (format!("{value:.1}")) }
                }
            }
        }
    }
}

/// Average-price trend as an inline SVG polyline over time buckets.
pub fn trend_chart(points: &[TrendPoint]) -> Markup {
    const W: f64 = 640.0;
    const H: f64 = 200.0;
    const PAD: f64 = 24.0;

    if points.len() < 2 {
        return html! { p class="empty" { "数据不足，无法绘制趋势" } };
    }

    let max = points
        .iter()
        .map(|p| p.avg_price)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let step = (W - 2.0 * PAD) / (points.len() - 1) as f64;
    let coords: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = PAD + i as f64 * step;
            let y = H - PAD - (p.avg_price / max) * (H - 2.0 * PAD);
            format!("{x:.1},{y:.1}")
        })
        .collect();

    html! {
        svg viewBox=(format!("0 0 {W} {H}")) width="100%" height=(H) {
            polyline
                points=(coords.join(" "))
                fill="none"
                stroke="#524ed2"
                stroke-width="2" {}
            @for (i, p) in points.iter().enumerate() {
                @let x = PAD + i as f64 * step;
                @let y = H - PAD - (p.avg_price / max) * (H - 2.0 * PAD);
                circle cx=(format!("{x:.1}")) cy=(format!("{y:.1}")) r="3" fill="#524ed2" {
                    title { (format!("{}: {:.1}万", p.bucket, p.avg_price / 10_000.0)) }
                }
            }
        }
    }
}
