use std::io::Read;

use astra::Request;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::record::{Dataset, Status};
use crate::domain::{filter, stats};
use crate::domain::filter::FilterCriteria;
use crate::domain::stats::Granularity;
use crate::errors::ServerError;
use crate::ingest::{self, multipart};
use crate::responses::{
    html_response, json_response, redirect, redirect_with_cookie, ResultResp,
};
use crate::sessions::{token_from_cookie_header, SessionStore, SESSION_COOKIE};
use crate::spreadsheets::export_records_xlsx;
use crate::templates;
use crate::templates::pages::DashboardVm;

const PREVIEW_ROWS: usize = 25;
const HISTOGRAM_BINS: usize = 8;

pub fn handle(mut req: Request, store: &SessionStore) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => {
            let has_session = session_token(&req)
                .map(|t| store.get(&t).is_some())
                .unwrap_or(false);
            html_response(templates::pages::home_page(has_session))
        }
        ("POST", "/upload") => upload(&mut req, store),
        ("GET", "/dashboard") => dashboard(&req, store),
        ("GET", "/api/summary") => api_summary(&req, store),
        ("GET", "/export") => export(&req, store),
        ("POST", "/reset") => reset(&req, store),
        _ => Err(ServerError::NotFound),
    }
}

fn session_token(req: &Request) -> Option<String> {
    req.headers()
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header)
}

fn read_body(req: &mut Request) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("请求体读取失败: {e}")))?;
    Ok(buf)
}

fn upload(req: &mut Request, store: &SessionStore) -> ResultResp {
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let boundary = multipart::boundary_from_content_type(&content_type)
        .ok_or_else(|| ServerError::BadRequest("上传必须为 multipart/form-data".into()))?;

    let body = read_body(req)?;
    let form = multipart::parse(&body, &boundary)?;

    if form.files.is_empty() {
        return Err(ServerError::BadRequest("未选择任何文件".into()));
    }

    let fallback = match form.fields.get("fallback").map(String::as_str) {
        Some("transaction") => Status::Transaction,
        _ => Status::ActiveListing,
    };
    let append = form.fields.get("append").map(String::as_str) == Some("1");

    let fresh = ingest::build_dataset(&form.files, fallback)?;
    println!(
        "✅ 上传完成: {} 个文件, {} 条记录, 跳过 {} 行",
        form.files.len(),
        fresh.records.len(),
        fresh.skipped_total()
    );

    let existing_token = session_token(req).filter(|t| store.get(t).is_some());
    match existing_token {
        Some(token) => {
            let dataset = if append {
                let current = store.get(&token).unwrap_or_default();
                ingest::merge_dataset(&current, fresh)
            } else {
                fresh
            };
            store.insert(token, dataset);
            redirect("/dashboard")
        }
        None => {
            let token = store.create(fresh);
            redirect_with_cookie("/dashboard", SESSION_COOKIE, &token)
        }
    }
}

fn load_dataset(req: &Request, store: &SessionStore) -> Option<Dataset> {
    session_token(req).and_then(|t| store.get(&t))
}

fn dashboard(req: &Request, store: &SessionStore) -> ResultResp {
    let Some(dataset) = load_dataset(req, store) else {
        return redirect("/");
    };

    let query = req.uri().query().unwrap_or("").to_string();
    let (criteria, granularity) = parse_criteria(&query);
    let filtered = filter::apply(&dataset.records, &criteria);
    let current_year = chrono::Local::now().date_naive().year();

    let prices_wan: Vec<f64> = filtered.iter().map(|r| r.price / 10_000.0).collect();

    let vm = DashboardVm {
        reports: dataset.reports.clone(),
        total_records: dataset.records.len(),
        filtered_count: filtered.len(),
        skipped_total: dataset.skipped_total(),
        district_options: dataset.districts(),
        commercial_area_options: dataset.commercial_areas(),
        criteria,
        granularity,
        summaries: stats::field_summaries(&filtered),
        district_rows: stats::segment_by_district(&filtered),
        commercial_rows: stats::segment_by_commercial_area(&filtered),
        area_rows: stats::area_segments(&filtered),
        tertile_rows: stats::price_tertiles(&filtered),
        age_rows: stats::age_segments(&filtered, current_year),
        cycle_rows: stats::cycle_segments(&filtered),
        discount_rate: stats::avg_discount_rate(&filtered),
        trend: stats::time_trend(&filtered, granularity),
        price_histogram: stats::histogram(&prices_wan, HISTOGRAM_BINS),
        sample: filtered.into_iter().take(PREVIEW_ROWS).collect(),
        query,
    };

    html_response(templates::pages::dashboard_page(&vm))
}

/// Machine-readable counterpart of the dashboard: the same filtered
/// statistics as JSON.
#[derive(Serialize)]
struct ApiSummary {
    total_records: usize,
    filtered_count: usize,
    skipped_total: usize,
    summaries: stats::FieldSummaries,
    districts: Vec<stats::SegmentRow>,
    commercial_areas: Vec<stats::SegmentRow>,
    area_bands: Vec<stats::SegmentRow>,
    price_tertiles: Vec<stats::SegmentRow>,
    age_bands: Vec<stats::SegmentRow>,
    cycle_bands: Vec<stats::SegmentRow>,
    avg_discount_rate: Option<f64>,
    granularity: Granularity,
    trend: Vec<stats::TrendPoint>,
}

fn api_summary(req: &Request, store: &SessionStore) -> ResultResp {
    let Some(dataset) = load_dataset(req, store) else {
        return Err(ServerError::BadRequest("当前会话没有数据，请先上传".into()));
    };

    let query = req.uri().query().unwrap_or("");
    let (criteria, granularity) = parse_criteria(query);
    let filtered = filter::apply(&dataset.records, &criteria);
    let current_year = chrono::Local::now().date_naive().year();

    let payload = ApiSummary {
        total_records: dataset.records.len(),
        filtered_count: filtered.len(),
        skipped_total: dataset.skipped_total(),
        summaries: stats::field_summaries(&filtered),
        districts: stats::segment_by_district(&filtered),
        commercial_areas: stats::segment_by_commercial_area(&filtered),
        area_bands: stats::area_segments(&filtered),
        price_tertiles: stats::price_tertiles(&filtered),
        age_bands: stats::age_segments(&filtered, current_year),
        cycle_bands: stats::cycle_segments(&filtered),
        avg_discount_rate: stats::avg_discount_rate(&filtered),
        granularity,
        trend: stats::time_trend(&filtered, granularity),
    };

    json_response(&payload)
}

fn export(req: &Request, store: &SessionStore) -> ResultResp {
    let Some(dataset) = load_dataset(req, store) else {
        return redirect("/");
    };

    let query = req.uri().query().unwrap_or("");
    let (criteria, _) = parse_criteria(query);
    let filtered = filter::apply(&dataset.records, &criteria);

    println!("⬇ 导出 {} 条记录", filtered.len());
    export_records_xlsx(&filtered)
}

fn reset(req: &Request, store: &SessionStore) -> ResultResp {
    if let Some(token) = session_token(req) {
        if store.remove(&token) {
            println!("🗑 会话数据已清空");
        }
    }
    redirect_with_cookie("/", SESSION_COOKIE, "")
}

/// Decode the sidebar query string into filter criteria plus the trend
/// granularity. Blank or unparseable values leave their dimension
/// unrestricted; price bounds arrive in 万 and are stored in yuan.
pub fn parse_criteria(query: &str) -> (FilterCriteria, Granularity) {
    let mut criteria = FilterCriteria::default();
    let mut granularity = Granularity::Monthly;

    let mut districts = Vec::new();
    let mut areas = Vec::new();

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "district" => districts.push(value.to_string()),
            "area" => areas.push(value.to_string()),
            "min_price" => criteria.min_price = parse_f64(value).map(|v| v * 10_000.0),
            "max_price" => criteria.max_price = parse_f64(value).map(|v| v * 10_000.0),
            "min_area" => criteria.min_area = parse_f64(value),
            "max_area" => criteria.max_area = parse_f64(value),
            "from" => criteria.date_from = parse_date(value),
            "to" => criteria.date_to = parse_date(value),
            "granularity" => {
                if let Some(g) = Granularity::parse(value) {
                    granularity = g;
                }
            }
            _ => {}
        }
    }

    if !districts.is_empty() {
        criteria.districts = Some(districts);
    }
    if !areas.is_empty() {
        criteria.commercial_areas = Some(areas);
    }

    (criteria, granularity)
}

fn parse_f64(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
