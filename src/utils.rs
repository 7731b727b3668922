//! Utility date and time equations over epoch milliseconds.
//!
//! These are integer (`i64` millisecond) renditions of the classic
//! epoch-time equations. The leap-year rule is `year % 4 == 0` throughout;
//! the Gregorian century/400 exceptions are deliberately not modeled, so
//! every equation here agrees with the library's public calendar queries
//! at every year (and with the real Gregorian calendar for 1901..=2099).

use crate::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};

/// Days per month in a common year, January first.
const DAYS_PER_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A year divisible by four is a leap year.
#[inline]
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 4 == 0
}

/// Returns the number of days in `month` (1-12) of `year`.
#[inline]
pub(crate) fn days_in_month(year: i32, month: u8) -> u8 {
    debug_assert!((1..=12).contains(&month));
    if month == 2 && is_leap_year(year) {
        return 29;
    }
    DAYS_PER_MONTH[month as usize - 1]
}

/// Returns the epoch day number of January 1 of `year`.
#[inline]
pub(crate) fn epoch_day_number_for_year(year: i32) -> i64 {
    // 365 days per year plus one leap day for every fourth year since
    // the epoch; (year - 1969) counts the leap days that have already
    // occurred strictly before January 1 of `year`.
    365 * (i64::from(year) - 1970) + (i64::from(year) - 1969).div_euclid(4)
}

#[inline]
pub(crate) fn epoch_ms_for_year(year: i32) -> i64 {
    epoch_day_number_for_year(year) * MS_PER_DAY
}

#[inline]
pub(crate) fn epoch_ms_to_day_number(ms: i64) -> i64 {
    ms.div_euclid(MS_PER_DAY)
}

/// Returns the calendar year containing the epoch millisecond `ms`.
pub(crate) fn epoch_ms_to_epoch_year(ms: i64) -> i32 {
    // Roughly estimate the year from the day count, then refine.
    let day_count = epoch_ms_to_day_number(ms);
    let mut year = (day_count / 365) as i32 + 1970;
    while epoch_ms_for_year(year + 1) <= ms {
        year += 1;
    }
    while epoch_ms_for_year(year) > ms {
        year -= 1;
    }
    year
}

#[inline]
pub(crate) fn epoch_ms_to_day_in_year(ms: i64) -> i64 {
    epoch_ms_to_day_number(ms) - epoch_day_number_for_year(epoch_ms_to_epoch_year(ms))
}

/// Returns the month (1-12) containing the epoch millisecond `ms`.
pub(crate) fn epoch_ms_to_month_in_year(ms: i64) -> u8 {
    let year = epoch_ms_to_epoch_year(ms);
    let mut day = epoch_ms_to_day_in_year(ms);
    for month in 1..=12u8 {
        let len = i64::from(days_in_month(year, month));
        if day < len {
            return month;
        }
        day -= len;
    }
    unreachable!("day-in-year exceeds the year length, which is an implementation error.")
}

/// Returns the day of the month (1-31) containing the epoch millisecond `ms`.
pub(crate) fn epoch_ms_to_date(ms: i64) -> u8 {
    let year = epoch_ms_to_epoch_year(ms);
    let mut day = epoch_ms_to_day_in_year(ms);
    for month in 1..=12u8 {
        let len = i64::from(days_in_month(year, month));
        if day < len {
            return day as u8 + 1;
        }
        day -= len;
    }
    unreachable!("day-in-year exceeds the year length, which is an implementation error.")
}

#[inline]
pub(crate) fn epoch_ms_to_hour(ms: i64) -> u8 {
    ms.div_euclid(MS_PER_HOUR).rem_euclid(24) as u8
}

#[inline]
pub(crate) fn epoch_ms_to_minute(ms: i64) -> u8 {
    ms.div_euclid(MS_PER_MINUTE).rem_euclid(60) as u8
}

#[inline]
pub(crate) fn epoch_ms_to_second(ms: i64) -> u8 {
    ms.div_euclid(MS_PER_SECOND).rem_euclid(60) as u8
}

#[inline]
pub(crate) fn epoch_ms_to_millisecond(ms: i64) -> u16 {
    ms.rem_euclid(MS_PER_SECOND) as u16
}

/// Returns the day of the week (1 = Monday .. 7 = Sunday) for the epoch
/// millisecond `ms`. Epoch day 0 (1970-01-01) was a Thursday; the raw
/// Sunday-based numbering is remapped so Sunday lands on 7.
#[inline]
pub(crate) fn epoch_ms_to_week_day(ms: i64) -> u8 {
    (epoch_ms_to_day_number(ms) + 3).rem_euclid(7) as u8 + 1
}

/// Returns the epoch day number for the given date components.
///
/// The month is 1-based but may lie outside 1..=12; year/month are
/// balanced first, so this also serves as the day->month->year carry
/// step.
pub(crate) fn iso_date_to_epoch_days(year: i32, month: i32, day: i32) -> i64 {
    // 1. Balance the year and month.
    let resolved_year = year + (month - 1).div_euclid(12);
    let resolved_month = (month - 1).rem_euclid(12) as u8 + 1;

    // 2. Day one of the resolved month.
    let mut days = epoch_day_number_for_year(resolved_year);
    for m in 1..resolved_month {
        days += i64::from(days_in_month(resolved_year, m));
    }

    // 3. Day overflow (including zero and negative days) carries through
    // the returned day number.
    days + i64::from(day) - 1
}

#[inline]
pub(crate) fn div_mod(dividend: i64, divisor: i64) -> (i64, i64) {
    (dividend.div_euclid(divisor), dividend.rem_euclid(divisor))
}

/// Parses two ASCII digit bytes into a number, or `None` if either byte
/// is not a digit.
#[inline]
pub(crate) fn parse_digit_pair(tens: u8, ones: u8) -> Option<u8> {
    if !tens.is_ascii_digit() || !ones.is_ascii_digit() {
        return None;
    }
    Some((tens - b'0') * 10 + (ones - b'0'))
}

/// Writes a two-digit zero-padded number.
pub(crate) fn write_padded_u8<W: core::fmt::Write + ?Sized>(
    sink: &mut W,
    value: u8,
) -> core::fmt::Result {
    write!(sink, "{value:02}")
}

/// Writes a three-digit zero-padded number.
pub(crate) fn write_padded_millisecond<W: core::fmt::Write + ?Sized>(
    sink: &mut W,
    value: u16,
) -> core::fmt::Result {
    write!(sink, "{value:03}")
}

/// Writes a year, zero-padded to four digits, with a leading sign for
/// years outside `0..=9999`.
pub(crate) fn write_year<W: core::fmt::Write + ?Sized>(
    sink: &mut W,
    year: i32,
) -> core::fmt::Result {
    if (0..=9999).contains(&year) {
        write!(sink, "{year:04}")
    } else {
        let sign = if year < 0 { '-' } else { '+' };
        write!(sink, "{sign}{:04}", year.unsigned_abs())
    }
}
