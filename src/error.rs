use thiserror::Error;

/// 账本错误
///
/// 解析级失败（日期、金额、编号）不会出现在这里，它们在规范化时降级为缺省值。
#[derive(Debug, Error)]
pub enum LedgerError {
    /// 工作簿损坏或无法读取
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("workbook has no worksheets")]
    NoWorksheet,
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// 手工录入缺少供应商
    #[error("row {row}: supplier (FORNECEDOR) is required")]
    MissingSupplier { row: usize },
    #[error("invalid row index: {0:?}")]
    InvalidIndex(String),
    #[error("row {0} does not exist")]
    IndexOutOfRange(usize),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
