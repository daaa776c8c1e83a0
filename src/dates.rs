use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use crate::error::InvoiceError;

/// Display pattern for every date printed on the invoice, e.g. "Jan 05, 2024".
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// Days between the reference date and the last worked day.
pub const WORK_END_OFFSET_DAYS: i64 = 4;
/// Days between the reference date and the first worked day.
pub const WORK_START_OFFSET_DAYS: i64 = 15;

/// Dates printed on one invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDates {
    pub invoice_date: String,
    pub work_start: String,
    pub work_end: String,
}

/// The window of days the invoice bills for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WorkPeriod {
    pub fn ending_before(reference: NaiveDate) -> Self {
        Self {
            start: reference - Duration::days(WORK_START_OFFSET_DAYS),
            end: reference - Duration::days(WORK_END_OFFSET_DAYS),
        }
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn derive(reference: NaiveDate) -> InvoiceDates {
    let period = WorkPeriod::ending_before(reference);
    InvoiceDates {
        invoice_date: format_date(reference),
        work_start: format_date(period.start),
        work_end: format_date(period.end),
    }
}

/// Parses the `--date` argument.
///
/// Accepts a plain calendar date (`2024-01-19`), a local timestamp
/// (`2024-01-19T08:30:00`) or an RFC 3339 timestamp. Timestamps keep the
/// calendar date they were written in; no timezone conversion happens.
pub fn parse_reference_date(input: &str) -> Result<NaiveDate, InvoiceError> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts.date());
    }

    Err(InvoiceError::InvalidDate {
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn derives_reference_scenario() {
        let dates = derive(ymd(2024, 1, 19));
        assert_eq!(dates.invoice_date, "Jan 19, 2024");
        assert_eq!(dates.work_end, "Jan 15, 2024");
        assert_eq!(dates.work_start, "Jan 04, 2024");
    }

    #[test]
    fn work_period_crosses_year_boundary() {
        let dates = derive(ymd(2024, 1, 10));
        assert_eq!(dates.work_start, "Dec 26, 2023");
        assert_eq!(dates.work_end, "Jan 06, 2024");
    }

    #[test]
    fn work_period_handles_leap_day() {
        let dates = derive(ymd(2024, 3, 4));
        assert_eq!(dates.work_end, "Feb 29, 2024");
    }

    #[test]
    fn parses_supported_inputs() {
        assert_eq!(parse_reference_date("2024-01-19").unwrap(), ymd(2024, 1, 19));
        assert_eq!(parse_reference_date(" 2024-01-19 ").unwrap(), ymd(2024, 1, 19));
        assert_eq!(
            parse_reference_date("2024-01-19T23:30:00").unwrap(),
            ymd(2024, 1, 19)
        );
        assert_eq!(
            parse_reference_date("2024-01-19T23:30:00-05:00").unwrap(),
            ymd(2024, 1, 19)
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad in ["", "yesterday", "2024-13-01", "2024-02-30", "19/01/2024"] {
            let err = parse_reference_date(bad).unwrap_err();
            assert!(matches!(err, InvoiceError::InvalidDate { .. }), "{bad}");
        }
    }

    proptest! {
        #[test]
        fn work_period_offsets_hold(days in 0i64..200_000) {
            let reference = ymd(1900, 1, 1) + Duration::days(days);
            let dates = derive(reference);

            prop_assert_eq!(dates.invoice_date, format_date(reference));
            prop_assert_eq!(dates.work_end, format_date(reference - Duration::days(4)));
            prop_assert_eq!(dates.work_start, format_date(reference - Duration::days(15)));
        }
    }
}
