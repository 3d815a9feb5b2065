use crate::models::{Field, RawRow};

/// 合计/页脚行：供应商、发票号、日期都缺失，只有金额
///
/// 必须在规范化之前判断，否则缺失值已变成空串或 0。
pub fn is_footer_row(row: &RawRow) -> bool {
    row.is_absent(Field::Supplier)
        && row.is_absent(Field::InvoiceNumber)
        && row.is_absent(Field::IssueDate)
        && !row.is_absent(Field::Amount)
}
