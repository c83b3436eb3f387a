use crate::domain::record::ListingRecord;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::Workbook;

/// Export the currently filtered records as a spreadsheet with the
/// original Chinese column names.
pub fn export_records_xlsx(records: &[ListingRecord]) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Headers
    let headers = [
        "类型",
        "小区名称",
        "区域",
        "商圈",
        "户型",
        "总价(元)",
        "面积(㎡)",
        "单价(元/㎡)",
        "成交日期",
        "挂牌价(元)",
        "成交周期(天)",
        "建成年代",
        "装修",
        "楼层",
        "关注人数",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows
    for (i, rec) in records.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, rec.status.label())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write status: {}", e)))?;

        worksheet
            .write_string(r, 1, rec.community.as_deref().unwrap_or(""))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write community: {}", e)))?;

        worksheet
            .write_string(r, 2, rec.district.as_deref().unwrap_or(""))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write district: {}", e)))?;

        worksheet
            .write_string(r, 3, rec.commercial_area.as_deref().unwrap_or(""))
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write commercial area: {}", e))
            })?;

        worksheet
            .write_string(r, 4, rec.layout.as_deref().unwrap_or(""))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write layout: {}", e)))?;

        worksheet
            .write_number(r, 5, rec.price)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write price: {}", e)))?;

        worksheet
            .write_number(r, 6, rec.area)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write area: {}", e)))?;

        if let Some(unit) = rec.price_per_area {
            worksheet
                .write_number(r, 7, unit)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write unit price: {}", e)))?;
        }

        let date = rec
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        worksheet
            .write_string(r, 8, &date)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write date: {}", e)))?;

        if let Some(list_price) = rec.list_price {
            worksheet
                .write_number(r, 9, list_price)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write list price: {}", e)))?;
        }

        if let Some(cycle) = rec.deal_cycle_days {
            worksheet
                .write_number(r, 10, cycle)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write deal cycle: {}", e)))?;
        }

        if let Some(year) = rec.build_year {
            worksheet
                .write_number(r, 11, year as f64)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write build year: {}", e)))?;
        }

        worksheet
            .write_string(r, 12, rec.decoration.as_deref().unwrap_or(""))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write decoration: {}", e)))?;

        worksheet
            .write_string(r, 13, rec.floor_info.as_deref().unwrap_or(""))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write floor info: {}", e)))?;

        if let Some(attention) = rec.attention {
            worksheet
                .write_number(r, 14, attention)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write attention: {}", e)))?;
        }
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))?;

    xlsx_response(buffer, "房源数据.xlsx")
}
