//! This module implements [`DateTime`], the crate's value object.

use alloc::string::{String, ToString};
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use writeable::Writeable;

use crate::{
    error::MaqsError,
    fmt::{tokenize, FormattableDateTime},
    iso::{IsoDate, IsoDateTime},
    maqs_assert,
    offset::UtcOffset,
    parsers,
    settings::Settings,
    utils, MaqsResult, MS_MAX_INSTANT, MS_MIN_INSTANT, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE,
    MS_PER_SECOND,
};

/// A date-time value: one instant paired with a fixed UTC offset.
///
/// The instant is a millisecond count on the value's own wall clock; the
/// absolute epoch millisecond is [`Self::timestamp`]. Every calendar
/// field, year through millisecond plus the weekday, is derived from the
/// instant on access, so a mutation can never leave a field and the
/// instant disagreeing.
///
/// Mutating methods validate, apply the exact implied millisecond delta,
/// and return `&mut Self` so calls chain:
///
/// ```rust
/// use maqs_rs::DateTime;
/// use core::str::FromStr;
///
/// let mut value = DateTime::from_str("2023-12-31T23:59:00Z").unwrap();
/// value.add_minutes(2).unwrap().set_milliseconds(250).unwrap();
/// assert_eq!((value.year(), value.minute()), (2024, 1));
/// ```
#[derive(Debug, Clone)]
pub struct DateTime {
    /// Wall-clock milliseconds in the value's own offset frame.
    instant: i64,
    offset: UtcOffset,
    /// The construction input, retained verbatim for diagnostics.
    source: String,
}

#[inline]
fn in_instant_range(ms: i64) -> bool {
    (MS_MIN_INSTANT..=MS_MAX_INSTANT).contains(&ms)
}

/// Any year beyond this magnitude lies outside the instant range, and
/// converting it to epoch milliseconds would overflow `i64`.
const MAX_YEAR_MAGNITUDE: u32 = 280_000;

fn out_of_range() -> MaqsError {
    MaqsError::value().with_message("Date-time is outside the representable range.")
}

fn amount_overflow() -> MaqsError {
    MaqsError::value().with_message("Amount overflows the supported range.")
}

fn default_settings() -> Settings {
    #[cfg(feature = "std")]
    {
        crate::settings::global_settings()
    }
    #[cfg(not(feature = "std"))]
    {
        Settings::new()
    }
}

impl DateTime {
    fn try_new(instant: i64, offset: UtcOffset, source: String) -> MaqsResult<Self> {
        if !in_instant_range(instant) || !in_instant_range(instant - offset.as_ms()) {
            return Err(out_of_range());
        }
        Ok(Self {
            instant,
            offset,
            source,
        })
    }

    /// Parses `source` against explicit settings instead of the process
    /// defaults.
    ///
    /// Input without a timezone tail is taken to be in the settings'
    /// default time zone; a trailing `Z` or `±HH:MM` wins over it.
    pub fn parse_with_settings(source: &str, settings: &Settings) -> MaqsResult<Self> {
        let parsed = parsers::parse_date_time(source)?;
        let offset = parsed
            .offset
            .unwrap_or_else(|| settings.timezone_offset());
        Self::try_new(parsed.datetime.to_epoch_ms(), offset, source.to_string())
    }

    /// Creates a UTC value from an absolute epoch millisecond count.
    pub fn from_timestamp(timestamp: i64) -> MaqsResult<Self> {
        if !in_instant_range(timestamp) {
            return Err(MaqsError::invalid_value(
                timestamp,
                "timestamp",
                &["0", "1690972230500"],
            ));
        }
        Ok(Self {
            instant: timestamp,
            offset: UtcOffset::UTC,
            source: timestamp.to_string(),
        })
    }

    /// The current moment in the host's local time zone.
    #[cfg(feature = "sys")]
    pub fn now() -> MaqsResult<Self> {
        let mut value = Self::from_timestamp(crate::sys::epoch_ms()?)?;
        value.update_timezone_offset(crate::sys::local_offset_minutes()?)?;
        Ok(value)
    }

    /// The current moment in UTC.
    #[cfg(feature = "sys")]
    pub fn now_utc() -> MaqsResult<Self> {
        Self::from_timestamp(crate::sys::epoch_ms()?)
    }

    #[inline]
    fn fields(&self) -> IsoDateTime {
        IsoDateTime::from_epoch_ms(self.instant)
    }

    /// Swaps in a rebuilt field record, revalidating the instant range.
    fn replace_fields(&mut self, fields: IsoDateTime) -> MaqsResult<&mut Self> {
        if fields.date.year.unsigned_abs() > MAX_YEAR_MAGNITUDE {
            return Err(out_of_range());
        }
        maqs_assert!(
            fields.date.is_valid() && fields.time.is_valid(),
            "rebuilt field record has out-of-range slots"
        );
        let instant = fields.to_epoch_ms();
        if !in_instant_range(instant) || !in_instant_range(instant - self.offset.as_ms()) {
            return Err(out_of_range());
        }
        self.instant = instant;
        Ok(self)
    }

    /// Moves the instant by `amount` units of `unit_ms` milliseconds.
    fn shift(&mut self, amount: i64, unit_ms: i64) -> MaqsResult<&mut Self> {
        let delta = amount.checked_mul(unit_ms).ok_or_else(amount_overflow)?;
        let instant = self.instant.checked_add(delta).ok_or_else(amount_overflow)?;
        if !in_instant_range(instant) || !in_instant_range(instant - self.offset.as_ms()) {
            return Err(out_of_range());
        }
        self.instant = instant;
        Ok(self)
    }
}

// Derived calendar fields.
impl DateTime {
    /// The year.
    pub fn year(&self) -> i32 {
        utils::epoch_ms_to_epoch_year(self.instant)
    }

    /// The month, 1 to 12, where 1 is January.
    pub fn month(&self) -> u8 {
        utils::epoch_ms_to_month_in_year(self.instant)
    }

    /// The day of the month, 1 to 31.
    pub fn day(&self) -> u8 {
        utils::epoch_ms_to_date(self.instant)
    }

    /// The day of the week, 1 to 7, where 1 is Monday.
    pub fn weekday(&self) -> u8 {
        utils::epoch_ms_to_week_day(self.instant)
    }

    /// The hour, 0 to 23.
    pub fn hour(&self) -> u8 {
        utils::epoch_ms_to_hour(self.instant)
    }

    /// The minute, 0 to 59.
    pub fn minute(&self) -> u8 {
        utils::epoch_ms_to_minute(self.instant)
    }

    /// The second, 0 to 59.
    pub fn second(&self) -> u8 {
        utils::epoch_ms_to_second(self.instant)
    }

    /// The millisecond, 0 to 999.
    pub fn millisecond(&self) -> u16 {
        utils::epoch_ms_to_millisecond(self.instant)
    }

    /// The time zone in its canonical `±HH:MM` form.
    pub fn timezone(&self) -> String {
        self.offset.to_iso_string()
    }

    /// The time zone offset.
    pub fn timezone_offset(&self) -> UtcOffset {
        self.offset
    }

    /// The absolute epoch millisecond this value refers to.
    pub fn timestamp(&self) -> i64 {
        self.instant - self.offset.as_ms()
    }

    /// The value this instance was constructed from, verbatim.
    pub fn source_value(&self) -> &str {
        &self.source
    }

    /// Whether the value's time zone is UTC.
    pub fn is_utc(&self) -> bool {
        self.offset.is_utc()
    }

    /// Whether the value's year is a leap year.
    pub fn is_leap_year(&self) -> bool {
        utils::is_leap_year(self.year())
    }

    /// The number of days in the value's month.
    pub fn days_in_month(&self) -> u8 {
        utils::days_in_month(self.year(), self.month())
    }
}

// Field setters. Each validates its domain, then moves the instant by
// the exact implied millisecond delta.
impl DateTime {
    /// Sets the year, clamping February 29th to the 28th when the target
    /// year has no leap day.
    pub fn set_year(&mut self, year: i32) -> MaqsResult<&mut Self> {
        let mut fields = self.fields();
        fields.date.year = year;
        fields.date.day = fields.date.day.min(utils::days_in_month(year, fields.date.month));
        self.replace_fields(fields)
    }

    /// Sets the month, clamping the day to the target month's length.
    pub fn set_month(&mut self, month: u8) -> MaqsResult<&mut Self> {
        if !(1..=12).contains(&month) {
            return Err(MaqsError::invalid_value(month, "month", &["1", "6", "12"]));
        }
        let mut fields = self.fields();
        fields.date.month = month;
        fields.date.day = fields
            .date
            .day
            .min(utils::days_in_month(fields.date.year, month));
        self.replace_fields(fields)
    }

    /// Sets the day of the month.
    pub fn set_day(&mut self, day: u8) -> MaqsResult<&mut Self> {
        if !(1..=self.days_in_month()).contains(&day) {
            return Err(MaqsError::invalid_value(day, "day", &["1", "15", "28"]));
        }
        let mut fields = self.fields();
        fields.date.day = day;
        self.replace_fields(fields)
    }

    /// Sets the hour.
    pub fn set_hour(&mut self, hour: u8) -> MaqsResult<&mut Self> {
        if hour > 23 {
            return Err(MaqsError::invalid_value(hour, "hour", &["0", "12", "23"]));
        }
        let delta = (i64::from(hour) - i64::from(self.hour())) * MS_PER_HOUR;
        self.shift(delta, 1)
    }

    /// Sets the minute.
    pub fn set_minutes(&mut self, minute: u8) -> MaqsResult<&mut Self> {
        if minute > 59 {
            return Err(MaqsError::invalid_value(minute, "minute", &["0", "30", "59"]));
        }
        let delta = (i64::from(minute) - i64::from(self.minute())) * MS_PER_MINUTE;
        self.shift(delta, 1)
    }

    /// Sets the second.
    pub fn set_seconds(&mut self, second: u8) -> MaqsResult<&mut Self> {
        if second > 59 {
            return Err(MaqsError::invalid_value(second, "second", &["0", "30", "59"]));
        }
        let delta = (i64::from(second) - i64::from(self.second())) * MS_PER_SECOND;
        self.shift(delta, 1)
    }

    /// Sets the millisecond.
    pub fn set_milliseconds(&mut self, millisecond: u16) -> MaqsResult<&mut Self> {
        if millisecond > 999 {
            return Err(MaqsError::invalid_value(
                millisecond,
                "millisecond",
                &["0", "250", "999"],
            ));
        }
        let delta = i64::from(millisecond) - i64::from(self.millisecond());
        self.shift(delta, 1)
    }
}

// Unit arithmetic. Time-based units move the instant directly, so carry
// and borrow propagate through the entire minute -> hour -> day -> month
// -> year chain; month-based units rebalance the calendar fields and
// clamp the day to the target month's length.
impl DateTime {
    /// Adds whole years; a negative amount subtracts.
    pub fn add_years(&mut self, years: i64) -> MaqsResult<&mut Self> {
        self.add_months(years.checked_mul(12).ok_or_else(amount_overflow)?)
    }

    /// Subtracts whole years.
    pub fn subtract_years(&mut self, years: i64) -> MaqsResult<&mut Self> {
        self.add_years(years.checked_neg().ok_or_else(amount_overflow)?)
    }

    /// Adds whole months, clamping the day to the target month's length;
    /// a negative amount subtracts.
    pub fn add_months(&mut self, months: i64) -> MaqsResult<&mut Self> {
        let fields = self.fields();
        let total = (i64::from(fields.date.year) * 12 + i64::from(fields.date.month) - 1)
            .checked_add(months)
            .ok_or_else(amount_overflow)?;
        let (year, month_index) = utils::div_mod(total, 12);
        let year = i32::try_from(year).map_err(|_| out_of_range())?;
        let month = month_index as u8 + 1;
        let day = fields.date.day.min(utils::days_in_month(year, month));
        self.replace_fields(IsoDateTime::new_unchecked(
            IsoDate::new_unchecked(year, month, day),
            fields.time,
        ))
    }

    /// Subtracts whole months.
    pub fn subtract_months(&mut self, months: i64) -> MaqsResult<&mut Self> {
        self.add_months(months.checked_neg().ok_or_else(amount_overflow)?)
    }

    /// Adds whole days; a negative amount subtracts.
    pub fn add_days(&mut self, days: i64) -> MaqsResult<&mut Self> {
        self.shift(days, MS_PER_DAY)
    }

    /// Subtracts whole days.
    pub fn subtract_days(&mut self, days: i64) -> MaqsResult<&mut Self> {
        self.shift(days.checked_neg().ok_or_else(amount_overflow)?, MS_PER_DAY)
    }

    /// Adds whole hours; a negative amount subtracts.
    pub fn add_hours(&mut self, hours: i64) -> MaqsResult<&mut Self> {
        self.shift(hours, MS_PER_HOUR)
    }

    /// Subtracts whole hours.
    pub fn subtract_hours(&mut self, hours: i64) -> MaqsResult<&mut Self> {
        self.shift(hours.checked_neg().ok_or_else(amount_overflow)?, MS_PER_HOUR)
    }

    /// Adds whole minutes; a negative amount subtracts.
    pub fn add_minutes(&mut self, minutes: i64) -> MaqsResult<&mut Self> {
        self.shift(minutes, MS_PER_MINUTE)
    }

    /// Subtracts whole minutes.
    pub fn subtract_minutes(&mut self, minutes: i64) -> MaqsResult<&mut Self> {
        self.shift(
            minutes.checked_neg().ok_or_else(amount_overflow)?,
            MS_PER_MINUTE,
        )
    }

    /// Adds whole seconds; a negative amount subtracts.
    pub fn add_seconds(&mut self, seconds: i64) -> MaqsResult<&mut Self> {
        self.shift(seconds, MS_PER_SECOND)
    }

    /// Subtracts whole seconds.
    pub fn subtract_seconds(&mut self, seconds: i64) -> MaqsResult<&mut Self> {
        self.shift(
            seconds.checked_neg().ok_or_else(amount_overflow)?,
            MS_PER_SECOND,
        )
    }

    /// Adds milliseconds; a negative amount subtracts.
    pub fn add_milliseconds(&mut self, milliseconds: i64) -> MaqsResult<&mut Self> {
        self.shift(milliseconds, 1)
    }

    /// Subtracts milliseconds.
    pub fn subtract_milliseconds(&mut self, milliseconds: i64) -> MaqsResult<&mut Self> {
        self.shift(milliseconds.checked_neg().ok_or_else(amount_overflow)?, 1)
    }
}

// Timezone operations. "set" relabels: the displayed fields stay put and
// the absolute instant moves. "update" converts: the absolute instant
// stays put and the displayed fields shift.
impl DateTime {
    /// Relabels the value with a new time zone given as `±HH:MM`.
    pub fn set_timezone(&mut self, timezone: &str) -> MaqsResult<&mut Self> {
        let offset = timezone.parse::<UtcOffset>().map_err(|_| {
            MaqsError::invalid_value(timezone, "time zone", &["+03:00", "+00:00", "-05:00"])
        })?;
        self.relabel(offset)
    }

    /// Relabels the value with a new time zone given as a minute offset.
    pub fn set_timezone_offset(&mut self, offset: i16) -> MaqsResult<&mut Self> {
        let offset = UtcOffset::try_from_minutes(offset).map_err(|_| {
            MaqsError::invalid_value(offset, "time zone offset", &["180", "0", "-300"])
        })?;
        self.relabel(offset)
    }

    /// Converts the value to a new time zone given as `±HH:MM`.
    pub fn update_timezone(&mut self, timezone: &str) -> MaqsResult<&mut Self> {
        let offset = timezone.parse::<UtcOffset>().map_err(|_| {
            MaqsError::invalid_value(timezone, "time zone", &["+03:00", "+00:00", "-05:00"])
        })?;
        self.convert(offset)
    }

    /// Converts the value to a new time zone given as a minute offset.
    pub fn update_timezone_offset(&mut self, offset: i16) -> MaqsResult<&mut Self> {
        let offset = UtcOffset::try_from_minutes(offset).map_err(|_| {
            MaqsError::invalid_value(offset, "time zone offset", &["180", "0", "-300"])
        })?;
        self.convert(offset)
    }

    fn relabel(&mut self, offset: UtcOffset) -> MaqsResult<&mut Self> {
        if !in_instant_range(self.instant - offset.as_ms()) {
            return Err(out_of_range());
        }
        self.offset = offset;
        Ok(self)
    }

    fn convert(&mut self, offset: UtcOffset) -> MaqsResult<&mut Self> {
        let instant = self.timestamp() + offset.as_ms();
        if !in_instant_range(instant) {
            return Err(out_of_range());
        }
        self.instant = instant;
        self.offset = offset;
        Ok(self)
    }

    /// Returns this value converted to UTC.
    #[must_use]
    pub fn as_utc(&self) -> Self {
        Self {
            instant: self.timestamp(),
            offset: UtcOffset::UTC,
            source: self.source.clone(),
        }
    }

    /// Returns this value converted to the host's local time zone.
    #[cfg(feature = "sys")]
    pub fn as_local(&self) -> MaqsResult<Self> {
        let mut value = self.clone();
        value.update_timezone_offset(crate::sys::local_offset_minutes()?)?;
        Ok(value)
    }
}

// Rendering.
impl DateTime {
    /// Renders the value through a format string.
    ///
    /// Unknown text and `[escaped]` blocks pass through verbatim, so this
    /// never fails.
    #[must_use]
    pub fn format_as(&self, format: &str) -> String {
        let tokens = tokenize(format);
        FormattableDateTime {
            datetime: self.fields(),
            offset: self.offset,
            tokens: &tokens,
        }
        .write_to_string()
        .into_owned()
    }

    /// Renders the value with the default string format from the process
    /// settings.
    #[must_use]
    pub fn format(&self) -> String {
        self.format_as(default_settings().default_string_format())
    }

    /// The value in its default serialized form.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        self.format()
    }
}

impl FromStr for DateTime {
    type Err = MaqsError;

    /// Parses against the process settings; see
    /// [`DateTime::parse_with_settings`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_settings(s, &default_settings())
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Equality and ordering compare the absolute instant, so the same
/// moment labeled with different offsets compares equal.
impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp() == other.timestamp()
    }
}

impl Eq for DateTime {}

impl PartialOrd for DateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp().cmp(&other.timestamp())
    }
}
