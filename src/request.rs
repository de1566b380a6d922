use crate::error::{Error, Result};
use crate::SheetKind;
use chrono::{Datelike, Month, NaiveDate};

/// A fully collected generation request. Built fresh per generation click,
/// never persisted.
#[derive(Debug, Clone)]
pub struct TimesheetRequest {
    pub kind: SheetKind,
    pub month: u32,
    pub field_name: String,
    pub well_name: String,
    pub client_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub entries: Vec<String>,
    pub representative: String,
}

impl TimesheetRequest {
    /// Check the request invariants: at least one entry, an ordered date
    /// range, and a month that resolves to a day count.
    ///
    /// Whether both dates fall inside the selected month is deliberately not
    /// checked; the range comparison downstream uses day-of-month numbers
    /// only.
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(Error::EmptyEntries);
        }
        if self.start_date > self.end_date {
            return Err(Error::DateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        self.days_in_month()?;
        Ok(())
    }

    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    /// Day count for the selected month in the starting date's year.
    pub fn days_in_month(&self) -> Result<u32> {
        days_in_month(self.year(), self.month).ok_or(Error::UnresolvableMonth {
            month: self.month,
            year: self.year(),
        })
    }

    /// English month name, as shown in the merged month cell.
    pub fn month_name(&self) -> Result<&'static str> {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .ok_or(Error::UnresolvableMonth {
                month: self.month,
                year: self.year(),
            })
    }
}

/// Gregorian day count for a month, leap-year aware. `None` outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}
