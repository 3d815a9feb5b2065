use bigdecimal::Zero;
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

use crate::error::Result;
use crate::ingest::normalize::in_sheet_range;
use crate::models::{Dataset, Field, InvoiceRecord};

/// 导出工作表名
pub const SHEET_NAME: &str = "NFS A PAGAR";

const COLUMN_WIDTHS: [f64; 5] = [40.0, 18.0, 12.0, 12.0, 14.0];

/// 将数据集写成单工作表 xlsx，返回文件字节
///
/// 列顺序固定，带表头、不带索引列；日期只保留日历日期，金额为普通数值。
pub fn to_xlsx_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");

    for field in Field::ALL {
        let col = field.position() as u16;
        worksheet.write_string_with_format(0, col, field.label(), &header_format)?;
        worksheet.set_column_width(col, COLUMN_WIDTHS[field.position()])?;
    }

    for (idx, record) in dataset.records().iter().enumerate() {
        write_record(worksheet, (idx + 1) as u32, record, &date_format)?;
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::info!("导出 xlsx: {} 行, {} 字节", dataset.len(), bytes.len());
    Ok(bytes)
}

fn write_record(ws: &mut Worksheet, row: u32, record: &InvoiceRecord, date_format: &Format) -> Result<()> {
    // 空文本不写，保持单元格为空
    let texts = [
        (Field::Supplier, &record.supplier),
        (Field::TaxId, &record.tax_id),
        (Field::InvoiceNumber, &record.invoice_number),
    ];
    for (field, text) in texts {
        if !text.is_empty() {
            ws.write_string(row, field.position() as u16, text.as_str())?;
        }
    }

    let date = record.issue_date.and_then(excel_date);
    if let Some(date) = &date {
        ws.write_datetime_with_format(row, Field::IssueDate.position() as u16, date, date_format)?;
    }

    // 只有税号的行：金额 0 留空，否则重新导入时会被当作合计行
    let identity_empty = record.supplier.is_empty() && record.invoice_number.is_empty() && date.is_none();
    if !(identity_empty && record.amount.is_zero()) {
        ws.write_number(row, Field::Amount.position() as u16, amount_number(record))?;
    }
    Ok(())
}

/// 超出表格日期范围的日期写为空单元格
fn excel_date(date: NaiveDate) -> Option<ExcelDateTime> {
    if !in_sheet_range(date) {
        tracing::warn!("日期 {} 超出表格范围，导出为空", date);
        return None;
    }
    ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8).ok()
}

/// 金额转 f64：经十进制文本转换，保证重新导入时得到同样的数值
fn amount_number(record: &InvoiceRecord) -> f64 {
    record.amount.to_string().parse().unwrap_or(0.0)
}
