//! This module implements the internal ISO field records.
//!
//! An `IsoDate` holds the year, month, and day slots; an `IsoTime` the
//! hour, minute, second, and millisecond slots; an `IsoDateTime` both.
//!
//! The records are plain data: the value object derives them from its
//! instant on demand and converts back via the `balance` functions, which
//! implement the carry/borrow chain (millisecond -> second -> minute ->
//! hour -> day -> month -> year). Carry into a parent unit is applied
//! before the child's remainder is taken, so an overflow at any level
//! cascades arbitrarily far up the hierarchy.

use crate::{
    utils, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND,
};

/// `IsoDate` holds the year, month, and day calendar slots.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct IsoDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl IsoDate {
    /// Creates a new `IsoDate` without determining the validity.
    pub(crate) const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Creates a balanced `IsoDate` from possibly out-of-range month and
    /// day components; overflow carries into the month and year.
    pub fn balance(year: i32, month: i32, day: i64) -> Self {
        // Route day overflow through the epoch day number so that month
        // lengths and leap days are respected.
        let epoch_days = utils::iso_date_to_epoch_days(year, month, 1) + day - 1;
        Self::from_epoch_days(epoch_days)
    }

    /// Creates an `IsoDate` from an epoch day number.
    pub(crate) fn from_epoch_days(epoch_days: i64) -> Self {
        let ms = epoch_days * MS_PER_DAY;
        Self::new_unchecked(
            utils::epoch_ms_to_epoch_year(ms),
            utils::epoch_ms_to_month_in_year(ms),
            utils::epoch_ms_to_date(ms),
        )
    }

    /// Returns the epoch day number of this date.
    #[inline]
    pub(crate) fn to_epoch_days(self) -> i64 {
        utils::iso_date_to_epoch_days(self.year, i32::from(self.month), i32::from(self.day))
    }

    /// Returns if the current `IsoDate` is valid.
    pub(crate) fn is_valid(self) -> bool {
        is_valid_date(self.year, i32::from(self.month), i32::from(self.day))
    }

    /// Returns the day of the week for this date, 1 = Monday .. 7 = Sunday.
    #[inline]
    #[must_use]
    pub fn week_day(self) -> u8 {
        utils::epoch_ms_to_week_day(self.to_epoch_days() * MS_PER_DAY)
    }
}

/// `IsoTime` holds the time-of-day slots at millisecond precision.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IsoTime {
    pub hour: u8,         // 0..=23
    pub minute: u8,       // 0..=59
    pub second: u8,       // 0..=59
    pub millisecond: u16, // 0..=999
}

impl IsoTime {
    /// Creates a new `IsoTime` without any validation.
    pub(crate) const fn new_unchecked(hour: u8, minute: u8, second: u8, millisecond: u16) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
        }
    }

    /// Balances the provided components into a valid `IsoTime`, returning
    /// the day carry alongside.
    ///
    /// Each step applies the carry to the parent unit before taking the
    /// child's euclidean remainder, so negative components borrow from
    /// the parent correctly.
    pub fn balance(hour: i64, minute: i64, second: i64, millisecond: i64) -> (i64, Self) {
        // 1. Set second to second + floor(millisecond / 1000).
        // 2. Set millisecond to millisecond modulo 1000.
        let (quotient, millisecond) = utils::div_mod(millisecond, 1000);
        let second = second + quotient;

        // 3. Set minute to minute + floor(second / 60).
        // 4. Set second to second modulo 60.
        let (quotient, second) = utils::div_mod(second, 60);
        let minute = minute + quotient;

        // 5. Set hour to hour + floor(minute / 60).
        // 6. Set minute to minute modulo 60.
        let (quotient, minute) = utils::div_mod(minute, 60);
        let hour = hour + quotient;

        // 7. Let days be floor(hour / 24); set hour to hour modulo 24.
        let (days, hour) = utils::div_mod(hour, 24);

        let time = Self::new_unchecked(hour as u8, minute as u8, second as u8, millisecond as u16);

        (days, time)
    }

    /// Checks that all slots are within their domains.
    pub(crate) fn is_valid(&self) -> bool {
        is_valid_time(
            i32::from(self.hour),
            i32::from(self.minute),
            i32::from(self.second),
            i32::from(self.millisecond),
        )
    }

    /// Returns the milliseconds into the day this time represents.
    #[inline]
    pub(crate) fn to_day_ms(self) -> i64 {
        i64::from(self.hour) * MS_PER_HOUR
            + i64::from(self.minute) * MS_PER_MINUTE
            + i64::from(self.second) * MS_PER_SECOND
            + i64::from(self.millisecond)
    }
}

/// `IsoDateTime` is the record of the `IsoDate` and `IsoTime` slots.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IsoDateTime {
    pub date: IsoDate,
    pub time: IsoTime,
}

impl IsoDateTime {
    /// Creates a new `IsoDateTime` without any validation.
    pub(crate) const fn new_unchecked(date: IsoDate, time: IsoTime) -> Self {
        Self { date, time }
    }

    /// Balances arbitrary components into a valid `IsoDateTime`; time
    /// overflow carries into the day, day overflow into month and year.
    pub fn balance(
        year: i32,
        month: i32,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        millisecond: i64,
    ) -> Self {
        let (overflow_day, time) = IsoTime::balance(hour, minute, second, millisecond);
        let date = IsoDate::balance(year, month, day + overflow_day);
        Self::new_unchecked(date, time)
    }

    /// Derives the full field record from an epoch millisecond count.
    pub fn from_epoch_ms(ms: i64) -> Self {
        let date = IsoDate::new_unchecked(
            utils::epoch_ms_to_epoch_year(ms),
            utils::epoch_ms_to_month_in_year(ms),
            utils::epoch_ms_to_date(ms),
        );
        let time = IsoTime::new_unchecked(
            utils::epoch_ms_to_hour(ms),
            utils::epoch_ms_to_minute(ms),
            utils::epoch_ms_to_second(ms),
            utils::epoch_ms_to_millisecond(ms),
        );
        Self::new_unchecked(date, time)
    }

    /// Returns this record as an epoch millisecond count; the exact
    /// inverse of [`Self::from_epoch_ms`].
    #[inline]
    #[must_use]
    pub fn to_epoch_ms(self) -> i64 {
        self.date.to_epoch_days() * MS_PER_DAY + self.time.to_day_ms()
    }
}

#[inline]
fn is_valid_date(year: i32, month: i32, day: i32) -> bool {
    if !(1..=12).contains(&month) {
        return false;
    }
    let days_in_month = i32::from(utils::days_in_month(year, month as u8));
    (1..=days_in_month).contains(&day)
}

#[inline]
fn is_valid_time(hour: i32, minute: i32, second: i32, millisecond: i32) -> bool {
    if !(0..=23).contains(&hour) {
        return false;
    }
    let min_sec = 0..=59;
    if !min_sec.contains(&minute) || !min_sec.contains(&second) {
        return false;
    }
    (0..=999).contains(&millisecond)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_time(result: IsoTime, values: (u8, u8, u8, u16)) {
        assert_eq!(
            result,
            IsoTime {
                hour: values.0,
                minute: values.1,
                second: values.2,
                millisecond: values.3,
            }
        );
    }

    #[test]
    fn time_balance_carries_upward() {
        // 10:50 + 75 minutes -> 12:05 without a day carry.
        let (days, time) = IsoTime::balance(10, 50 + 75, 0, 0);
        assert_eq!(days, 0);
        assert_time(time, (12, 5, 0, 0));

        // 23:59:59.999 + 1ms rolls into the next day.
        let (days, time) = IsoTime::balance(23, 59, 59, 999 + 1);
        assert_eq!(days, 1);
        assert_time(time, (0, 0, 0, 0));
    }

    #[test]
    fn time_balance_borrows_downward() {
        // minute 5 - 20 borrows an hour.
        let (days, time) = IsoTime::balance(10, 5 - 20, 0, 0);
        assert_eq!(days, 0);
        assert_time(time, (9, 45, 0, 0));

        // Borrowing across midnight produces a negative day carry.
        let (days, time) = IsoTime::balance(0, 0, -1, 0);
        assert_eq!(days, -1);
        assert_time(time, (23, 59, 59, 0));
    }

    #[test]
    fn date_balance_respects_month_lengths() {
        let date = IsoDate::balance(2023, 12, 32);
        assert_eq!(date, IsoDate::new_unchecked(2024, 1, 1));

        let date = IsoDate::balance(2024, 2, 30);
        assert_eq!(date, IsoDate::new_unchecked(2024, 3, 1));

        let date = IsoDate::balance(2023, 2, 30);
        assert_eq!(date, IsoDate::new_unchecked(2023, 3, 2));

        // Day zero borrows from the previous month, across the year.
        let date = IsoDate::balance(2023, 1, 0);
        assert_eq!(date, IsoDate::new_unchecked(2022, 12, 31));
    }

    #[test]
    fn datetime_balance_cascades_to_year() {
        // Dec 31 23:59 + 2 minutes lands in the next year.
        let result = IsoDateTime::balance(2023, 12, 31, 23, 59 + 2, 0, 0);
        assert_eq!(result.date, IsoDate::new_unchecked(2024, 1, 1));
        assert_time(result.time, (0, 1, 0, 0));
    }

    #[test]
    fn epoch_ms_round_trip() {
        let cases = [
            0,
            1_690_972_230_500,  // 2023-08-02T10:30:30.500
            1_582_934_400_000,  // 2020-02-29T00:00:00
            -1,                 // 1969-12-31T23:59:59.999
            -86_400_000,        // 1969-12-31T00:00:00
        ];
        for ms in cases {
            let dt = IsoDateTime::from_epoch_ms(ms);
            assert!(dt.date.is_valid(), "derived date invalid for {ms}");
            assert!(dt.time.is_valid(), "derived time invalid for {ms}");
            assert_eq!(dt.to_epoch_ms(), ms, "round trip failed for {ms}");
        }

        let dt = IsoDateTime::from_epoch_ms(1_690_972_230_500);
        assert_eq!(dt.date, IsoDate::new_unchecked(2023, 8, 2));
        assert_time(dt.time, (10, 30, 30, 500));
    }

    #[test]
    fn week_day_numbering() {
        // 2023-08-02 was a Wednesday; 2023-08-06 a Sunday.
        assert_eq!(IsoDate::new_unchecked(2023, 8, 2).week_day(), 3);
        assert_eq!(IsoDate::new_unchecked(2023, 8, 6).week_day(), 7);
        assert_eq!(IsoDate::new_unchecked(2023, 8, 7).week_day(), 1);
    }
}
