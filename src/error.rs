use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("timesheet has no entries")]
    EmptyEntries,

    #[error("invalid date range: {start} is after {end}")]
    DateRange { start: NaiveDate, end: NaiveDate },

    #[error("month {month} has no day count for year {year}")]
    UnresolvableMonth { month: u32, year: i32 },

    #[error("entry index {index} out of range (have {count} rows)")]
    RowOutOfRange { index: usize, count: usize },

    #[error("layout needs {rows} rows, exceeding the worksheet limit of {limit}")]
    GridOverflow { rows: u64, limit: u32 },

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::EmptyEntries => 2,
            Error::DateRange { .. } => 2,
            Error::UnresolvableMonth { .. } => 2,
            Error::RowOutOfRange { .. } => 3,
            Error::GridOverflow { .. } => 3,
            Error::Xlsx(_) => 4,
            Error::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
