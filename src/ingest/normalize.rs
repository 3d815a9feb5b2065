//! 字段规范化：把任意单元格值转换为规范类型。
//!
//! 所有函数都不返回错误，无法解析的输入降级为空串或 `None`。

use std::str::FromStr;

use bigdecimal::BigDecimal;
use calamine::{Data, DataType};
use chrono::{Datelike, Days, NaiveDate};

/// 数值型单元格转成文本时留下的空值标记
const EMPTY_SENTINELS: [&str; 3] = ["nan", "nat", "none"];

/// 先尝试两位年份，避免 "15/03/24" 被 `%Y` 当作公元 24 年
const DATE_FORMATS: [&str; 8] = [
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

/// 表格日期可表示的年份范围
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 9999;

/// 单元格是否缺失（空、错误值、纯空白文本）
pub fn is_absent(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// 单元格的文本表示
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => float_text(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => cell
            .as_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::Error(e) => format!("{e:?}"),
    }
}

/// 整数值的浮点数不带小数部分输出
fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

pub fn normalize_supplier(cell: &Data) -> String {
    if is_absent(cell) {
        return String::new();
    }
    cell_text(cell).trim().to_string()
}

/// CNPJ/CPF：只保留数字
pub fn normalize_tax_id(cell: &Data) -> String {
    if is_absent(cell) {
        return String::new();
    }
    let text = cell_text(cell);
    let text = text.trim();
    digits_only(text.strip_suffix(".0").unwrap_or(text))
}

pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

pub fn normalize_invoice_number(cell: &Data) -> String {
    if is_absent(cell) {
        return String::new();
    }
    clean_invoice_number(&cell_text(cell))
}

/// 去掉 ".0" 残留（出现在任何位置），去空白，空值标记归为空串
pub fn clean_invoice_number(s: &str) -> String {
    let cleaned = s.replace(".0", "");
    let cleaned = cleaned.trim();
    if EMPTY_SENTINELS
        .iter()
        .any(|sentinel| cleaned.eq_ignore_ascii_case(sentinel))
    {
        return String::new();
    }
    cleaned.to_string()
}

/// 宽松解析日期，失败或超出 1900-9999 年时返回 `None`
pub fn parse_issue_date(cell: &Data) -> Option<NaiveDate> {
    let date = match cell {
        Data::String(s) | Data::DateTimeIso(s) => parse_date_text(s),
        Data::DateTime(_) => cell.as_date(),
        Data::Float(f) => serial_to_date(*f),
        Data::Int(i) => serial_to_date(*i as f64),
        Data::Empty | Data::Error(_) | Data::Bool(_) | Data::DurationIso(_) => None,
    }?;
    in_sheet_range(date).then_some(date)
}

pub fn in_sheet_range(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

/// 日/月/年优先，时间部分丢弃
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let date = parse_date_only(s).or_else(|| {
        let head = s.split([' ', 'T']).next().unwrap_or(s);
        parse_date_only(head)
    })?;
    in_sheet_range(date).then_some(date)
}

fn parse_date_only(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// 表格序列日期（1900 日期系统）
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

/// 金额：数值原样；文本按巴西格式 ("1.234,56") 解析
pub fn parse_amount(cell: &Data) -> Option<BigDecimal> {
    match cell {
        Data::Float(f) if f.is_finite() => BigDecimal::from_str(&f.to_string()).ok(),
        Data::Int(i) => Some(BigDecimal::from(*i)),
        Data::String(s) => parse_amount_text(s),
        _ => None,
    }
}

/// 去掉 "R$" 和空白，删除 '.' 千分位，',' 换成 '.'
///
/// 清理后只接受 `-?digits(.digits)?`，指数写法 ("1e5") 视为无法解析。
pub fn parse_amount_text(s: &str) -> Option<BigDecimal> {
    let s = s.trim();
    let s = s.strip_prefix("R$").unwrap_or(s);
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if !is_plain_decimal(&cleaned) {
        return None;
    }
    BigDecimal::from_str(&cleaned).ok()
}

fn is_plain_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    !(int.is_empty() && frac.is_empty()) && all_digits(int) && all_digits(frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn tax_id_keeps_only_digits() {
        assert_eq!(normalize_tax_id(&text("12.345.678/0001-95")), "12345678000195");
        assert_eq!(normalize_tax_id(&text("123.456.789-09")), "12345678909");
        assert_eq!(normalize_tax_id(&Data::Float(12345678000195.0)), "12345678000195");
        assert_eq!(normalize_tax_id(&text("nan")), "");
        assert_eq!(normalize_tax_id(&Data::Empty), "");
    }

    #[test]
    fn tax_id_drops_trailing_float_suffix_before_digits() {
        // 数值列转文本留下的 ".0" 不是税号的一部分
        assert_eq!(normalize_tax_id(&text("123.0")), "123");
        assert_eq!(normalize_tax_id(&text(" 12345678000195.0 ")), "12345678000195");
        // 中间的 ".0" 保留其数字
        assert_eq!(normalize_tax_id(&text("01.023.456/0001-00")), "01023456000100");
    }

    #[test]
    fn invoice_number_drops_numeric_artifacts() {
        assert_eq!(normalize_invoice_number(&Data::Float(123.0)), "123");
        assert_eq!(normalize_invoice_number(&text("123.0")), "123");
        assert_eq!(normalize_invoice_number(&text(" 4512 ")), "4512");
        assert_eq!(normalize_invoice_number(&Data::Int(77)), "77");
    }

    #[test]
    fn invoice_number_sentinels_collapse_to_empty() {
        for raw in ["None", "nan", "NaN", "NaT", "", "   "] {
            assert_eq!(normalize_invoice_number(&text(raw)), "", "raw {raw:?}");
        }
        assert_eq!(normalize_invoice_number(&Data::Empty), "");
    }

    #[test]
    fn amount_accepts_brazilian_text() {
        assert_eq!(parse_amount(&text("1.234,56")), Some(dec("1234.56")));
        assert_eq!(parse_amount(&text("R$ 1.234,56")), Some(dec("1234.56")));
        assert_eq!(parse_amount(&text("-10,5")), Some(dec("-10.5")));
        assert_eq!(parse_amount(&text("1.000")), Some(dec("1000")));
    }

    #[test]
    fn amount_accepts_plain_numbers() {
        assert_eq!(parse_amount(&Data::Float(1234.56)), Some(dec("1234.56")));
        assert_eq!(parse_amount(&Data::Int(1000)), Some(dec("1000")));
    }

    #[test]
    fn unparseable_amount_is_absent() {
        assert_eq!(parse_amount(&text("abc")), None);
        assert_eq!(parse_amount(&text("")), None);
        assert_eq!(parse_amount(&Data::Empty), None);
        assert_eq!(parse_amount(&Data::Bool(true)), None);
    }

    #[test]
    fn amount_rejects_exponent_notation() {
        for raw in ["1e5", "1E999999", "1e2000000", "R$ 2,5e3", "-1e-5", "1,2,3", "-", ","] {
            assert_eq!(parse_amount(&text(raw)), None, "raw {raw:?}");
        }
        assert_eq!(parse_amount_text("1e5"), None);
        assert_eq!(parse_amount(&text(",50")), Some(dec("0.50")));
        assert_eq!(parse_amount(&text("10,")), Some(dec("10")));
    }

    #[test]
    fn dates_are_parsed_permissively() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_issue_date(&text("15/03/2024")), d);
        assert_eq!(parse_issue_date(&text("15/03/24")), d);
        assert_eq!(parse_issue_date(&text("2024-03-15")), d);
        assert_eq!(parse_issue_date(&text("2024-03-15 00:00:00")), d);
        assert_eq!(parse_issue_date(&text("2024-03-15T10:20:30")), d);
        assert_eq!(parse_issue_date(&text("15.03.2024")), d);
        // 45366 = 2024-03-15
        assert_eq!(parse_issue_date(&Data::Float(45366.0)), d);
        assert_eq!(parse_issue_date(&Data::Int(45366)), d);
    }

    #[test]
    fn bad_dates_are_absent() {
        assert_eq!(parse_issue_date(&text("amanhã")), None);
        assert_eq!(parse_issue_date(&text("31/02/2024")), None);
        assert_eq!(parse_issue_date(&Data::Empty), None);
        assert_eq!(parse_issue_date(&Data::Float(0.0)), None);
    }

    #[test]
    fn dates_outside_sheet_range_are_absent() {
        assert_eq!(parse_issue_date(&text("15/03/0024")), None);
        assert_eq!(parse_issue_date(&text("1899-12-01")), None);
        assert_eq!(parse_date_text("0024-03-15"), None);
        // 序列号 1 = 1899-12-31
        assert_eq!(parse_issue_date(&Data::Float(1.0)), None);
        assert_eq!(parse_issue_date(&Data::Float(2.0)), NaiveDate::from_ymd_opt(1900, 1, 1));
        assert_eq!(parse_issue_date(&text("01/01/1900")), NaiveDate::from_ymd_opt(1900, 1, 1));
        assert_eq!(parse_issue_date(&text("31/12/9999")), NaiveDate::from_ymd_opt(9999, 12, 31));
    }

    #[test]
    fn absent_cells() {
        assert!(is_absent(&Data::Empty));
        assert!(is_absent(&text("  ")));
        assert!(!is_absent(&Data::Float(0.0)));
        assert!(!is_absent(&text("0")));
    }
}
