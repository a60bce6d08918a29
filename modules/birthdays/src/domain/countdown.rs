//! Days until the next annual occurrence of a date.
//!
//! Only month and day of the stored date matter. A February 29 date is
//! observed on March 1 in non-leap years.

use chrono::{Datelike, NaiveDate};

/// The date `birthday` falls on in `year`.
fn observed_in(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Next occurrence at or after `today`.
pub fn next_occurrence(birthday: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    match observed_in(birthday, today.year()) {
        Some(this_year) if this_year >= today => Some(this_year),
        _ => observed_in(birthday, today.year() + 1),
    }
}

/// 0 on the day itself.
pub fn days_until_next(birthday: NaiveDate, today: NaiveDate) -> u32 {
    // None only at the upper edge of the representable calendar.
    next_occurrence(birthday, today)
        .map(|next| (next - today).num_days().max(0) as u32)
        .unwrap_or(0)
}
