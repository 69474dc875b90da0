// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar date ranges as accepted by `/map`.

use crate::error::AppError;
use chrono::{Days, NaiveDate};

/// Wire format for dates in query strings.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub after: NaiveDate,
    pub before: NaiveDate,
}

impl DateRange {
    /// Parse `after`/`before` in `DD/MM/YYYY` form.
    pub fn parse(after: &str, before: &str) -> Result<Self, AppError> {
        let after = parse_date(after)?;
        let before = parse_date(before)?;
        if after > before {
            return Err(AppError::InvalidDate(format!(
                "after ({}) is later than before ({})",
                after.format(DATE_FORMAT),
                before.format(DATE_FORMAT)
            )));
        }
        Ok(Self { after, before })
    }

    /// Widen by one day on each side.
    ///
    /// Strava buckets activities by its own notion of local time, so the
    /// requested dates are padded before querying.
    pub fn widened(&self) -> Self {
        Self {
            after: self.after.checked_sub_days(Days::new(1)).unwrap_or(self.after),
            before: self
                .before
                .checked_add_days(Days::new(1))
                .unwrap_or(self.before),
        }
    }

    /// Unix timestamps (midnight UTC) for the Strava `after`/`before` filters.
    pub fn to_epoch_bounds(&self) -> (i64, i64) {
        (midnight_utc(self.after), midnight_utc(self.before))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| AppError::InvalidDate(format!("{:?} is not DD/MM/YYYY: {}", value, e)))
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_day_month_year() {
        let range = DateRange::parse("30/01/2018", "30/09/2019").unwrap();
        assert_eq!(range.after, date(2018, 1, 30));
        assert_eq!(range.before, date(2019, 9, 30));
    }

    #[test]
    fn test_widened_adds_one_day_each_side() {
        let range = DateRange::parse("01/03/2020", "31/12/2020").unwrap();
        let widened = range.widened();
        assert_eq!(widened.after, date(2020, 2, 29));
        assert_eq!(widened.before, date(2021, 1, 1));
    }

    #[test]
    fn test_widened_property_over_many_ranges() {
        let start = date(2016, 12, 25);
        for offset in 0..400u64 {
            let after = start + Days::new(offset);
            let before = after + Days::new(offset % 17);
            let widened = DateRange { after, before }.widened();
            assert_eq!(widened.after, after - Days::new(1));
            assert_eq!(widened.before, before + Days::new(1));
        }
    }

    #[test]
    fn test_single_day_range_is_valid() {
        let range = DateRange::parse("05/06/2019", "05/06/2019").unwrap();
        let (after, before) = range.widened().to_epoch_bounds();
        assert_eq!(before - after, 2 * 24 * 60 * 60);
    }

    #[test]
    fn test_epoch_bounds_are_midnight_utc() {
        let range = DateRange::parse("01/01/2019", "02/01/2019").unwrap();
        assert_eq!(range.to_epoch_bounds(), (1_546_300_800, 1_546_387_200));
    }

    #[test]
    fn test_malformed_dates_are_rejected() {
        for bad in ["", "2019-01-01", "32/01/2019", "29/02/2019", "01/13/2019", "nonsense"] {
            let err = DateRange::parse(bad, "01/01/2020").unwrap_err();
            assert!(matches!(err, AppError::InvalidDate(_)), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = DateRange::parse("02/01/2020", "01/01/2020").unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)));
    }
}
