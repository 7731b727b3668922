//! This module implements the format mini-language.
//!
//! A format string is a sequence of field markers (`YYYY`, `MM`, `HH`,
//! ...), literal text, and `[...]` escape blocks whose content is copied
//! verbatim. [`tokenize`] splits a format string into [`FormatToken`]s;
//! [`FormattableDateTime`] renders a token stream against a field record
//! and offset.
//!
//! Tokenizing never fails: any text that is not a marker or a complete
//! escape block is carried through as a literal.

use alloc::vec::Vec;
use core::fmt;

use writeable::{impl_display_with_writeable, Writeable};

use crate::{iso::IsoDateTime, offset::UtcOffset, utils};

/// English month names, January first.
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English weekday names, Monday first to match the weekday numbering.
const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// The field a marker selects, independent of its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Year,
    Month,
    Day,
    Weekday,
    Hour,
    Hour12,
    Minute,
    Second,
    FractionalSecond,
    DayPeriod,
    Timezone,
}

impl FieldKind {
    const COUNT: usize = 11;

    const fn index(self) -> usize {
        self as usize
    }
}

/// A recognized field marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Four-digit (or signed, padded) year.
    YearFull,
    /// Last two digits of the year.
    YearShort,
    /// Full English month name.
    MonthName,
    /// Abbreviated English month name.
    MonthNameShort,
    /// Two-digit month number.
    MonthPadded,
    /// Month number without padding.
    Month,
    /// Two-digit day of the month.
    DayPadded,
    /// Day of the month without padding.
    Day,
    /// Full English weekday name.
    WeekdayName,
    /// Abbreviated English weekday name.
    WeekdayNameShort,
    /// Two-digit hour on the 24-hour clock.
    HourPadded,
    /// Hour on the 24-hour clock without padding.
    Hour,
    /// Two-digit hour on the 12-hour clock.
    Hour12Padded,
    /// Hour on the 12-hour clock without padding.
    Hour12,
    /// Two-digit minute.
    MinutePadded,
    /// Minute without padding.
    Minute,
    /// Two-digit second.
    SecondPadded,
    /// Second without padding.
    Second,
    /// Three-digit millisecond.
    Millisecond,
    /// Upper-case day period, `AM` or `PM`.
    DayPeriodUpper,
    /// Lower-case day period, `am` or `pm`.
    DayPeriodLower,
    /// Canonical `±HH:MM` offset.
    Timezone,
}

impl Marker {
    /// Markers ordered longest-first so that matching is greedy.
    const TABLE: [(&'static str, Marker); 22] = [
        ("YYYY", Marker::YearFull),
        ("MMMM", Marker::MonthName),
        ("dddd", Marker::WeekdayName),
        ("MMM", Marker::MonthNameShort),
        ("ddd", Marker::WeekdayNameShort),
        ("SSS", Marker::Millisecond),
        ("YY", Marker::YearShort),
        ("MM", Marker::MonthPadded),
        ("DD", Marker::DayPadded),
        ("HH", Marker::HourPadded),
        ("hh", Marker::Hour12Padded),
        ("mm", Marker::MinutePadded),
        ("ss", Marker::SecondPadded),
        ("TZ", Marker::Timezone),
        ("M", Marker::Month),
        ("D", Marker::Day),
        ("H", Marker::Hour),
        ("h", Marker::Hour12),
        ("m", Marker::Minute),
        ("s", Marker::Second),
        ("A", Marker::DayPeriodUpper),
        ("a", Marker::DayPeriodLower),
    ];

    /// Returns the field this marker selects.
    pub fn kind(self) -> FieldKind {
        match self {
            Self::YearFull | Self::YearShort => FieldKind::Year,
            Self::MonthName | Self::MonthNameShort | Self::MonthPadded | Self::Month => {
                FieldKind::Month
            }
            Self::DayPadded | Self::Day => FieldKind::Day,
            Self::WeekdayName | Self::WeekdayNameShort => FieldKind::Weekday,
            Self::HourPadded | Self::Hour => FieldKind::Hour,
            Self::Hour12Padded | Self::Hour12 => FieldKind::Hour12,
            Self::MinutePadded | Self::Minute => FieldKind::Minute,
            Self::SecondPadded | Self::Second => FieldKind::Second,
            Self::Millisecond => FieldKind::FractionalSecond,
            Self::DayPeriodUpper | Self::DayPeriodLower => FieldKind::DayPeriod,
            Self::Timezone => FieldKind::Timezone,
        }
    }

    /// Matches the longest marker at the front of `rest`, returning it
    /// with its byte length.
    fn match_prefix(rest: &str) -> Option<(Marker, usize)> {
        Self::TABLE
            .iter()
            .find(|(text, _)| rest.starts_with(text))
            .map(|&(text, marker)| (marker, text.len()))
    }
}

/// One piece of a split format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatToken<'a> {
    /// A recognized field marker.
    Field(Marker),
    /// Text carried through as-is.
    Literal(&'a str),
    /// The content of a `[...]` block, rendered verbatim.
    Escaped(&'a str),
}

/// Splits a format string into tokens.
///
/// Marker matching is greedy: the longest marker wins at each position.
/// A `[` opens an escape block that runs to its matching `]`, with nested
/// brackets counted; an unmatched `[` is dropped and downgrades the rest
/// of the string to a literal.
pub fn tokenize(format: &str) -> Vec<FormatToken<'_>> {
    let mut tokens = Vec::new();
    let bytes = format.as_bytes();
    let mut pos = 0;
    // Start of the pending literal run, if any.
    let mut literal_start: Option<usize> = None;

    while pos < bytes.len() {
        if bytes[pos] == b'[' {
            match find_escape_end(bytes, pos) {
                Some(end) => {
                    if let Some(from) = literal_start.take() {
                        tokens.push(FormatToken::Literal(&format[from..pos]));
                    }
                    tokens.push(FormatToken::Escaped(&format[pos + 1..end]));
                    pos = end + 1;
                }
                None => {
                    // No matching bracket; the remainder after the `[` is
                    // literal text and the bracket itself is dropped.
                    if let Some(from) = literal_start.take() {
                        tokens.push(FormatToken::Literal(&format[from..pos]));
                    }
                    if pos + 1 < bytes.len() {
                        tokens.push(FormatToken::Literal(&format[pos + 1..]));
                    }
                    pos = bytes.len();
                }
            }
            continue;
        }

        if let Some((marker, len)) = Marker::match_prefix(&format[pos..]) {
            if let Some(from) = literal_start.take() {
                tokens.push(FormatToken::Literal(&format[from..pos]));
            }
            tokens.push(FormatToken::Field(marker));
            pos += len;
            continue;
        }

        literal_start.get_or_insert(pos);
        // Skip a full character; literals may be non-ASCII.
        pos += utf8_len(bytes[pos]);
    }

    if let Some(from) = literal_start {
        tokens.push(FormatToken::Literal(&format[from..]));
    }
    tokens
}

/// Finds the index of the `]` closing the bracket at `open`, counting
/// nested brackets.
fn find_escape_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[inline]
fn utf8_len(lead: u8) -> usize {
    match lead {
        b if b < 0x80 => 1,
        b if b < 0xE0 => 2,
        b if b < 0xF0 => 3,
        _ => 4,
    }
}

/// Returns whether `format` contains at least one field marker.
pub(crate) fn is_string_format(format: &str) -> bool {
    tokenize(format)
        .iter()
        .any(|token| matches!(token, FormatToken::Field(_)))
}

/// A field record paired with a token stream, ready to render.
pub(crate) struct FormattableDateTime<'a> {
    pub(crate) datetime: IsoDateTime,
    pub(crate) offset: UtcOffset,
    pub(crate) tokens: &'a [FormatToken<'a>],
}

impl FormattableDateTime<'_> {
    /// Resolves the marker to render for each field.
    ///
    /// When a field appears more than once, every occurrence renders with
    /// the width of the first one. The day period is exempt so that `A`
    /// and `a` keep their own case.
    fn resolved_markers(&self) -> [Option<Marker>; FieldKind::COUNT] {
        let mut resolved = [None; FieldKind::COUNT];
        for token in self.tokens {
            if let FormatToken::Field(marker) = token {
                let kind = marker.kind();
                if kind != FieldKind::DayPeriod {
                    resolved[kind.index()].get_or_insert(*marker);
                }
            }
        }
        resolved
    }

    fn write_field<W: fmt::Write + ?Sized>(&self, sink: &mut W, marker: Marker) -> fmt::Result {
        let date = self.datetime.date;
        let time = self.datetime.time;
        match marker {
            Marker::YearFull => utils::write_year(sink, date.year),
            Marker::YearShort => {
                utils::write_padded_u8(sink, date.year.rem_euclid(100) as u8)
            }
            Marker::MonthName => sink.write_str(MONTH_NAMES[usize::from(date.month) - 1]),
            Marker::MonthNameShort => {
                sink.write_str(&MONTH_NAMES[usize::from(date.month) - 1][..3])
            }
            Marker::MonthPadded => utils::write_padded_u8(sink, date.month),
            Marker::Month => write!(sink, "{}", date.month),
            Marker::DayPadded => utils::write_padded_u8(sink, date.day),
            Marker::Day => write!(sink, "{}", date.day),
            Marker::WeekdayName => {
                sink.write_str(WEEKDAY_NAMES[usize::from(date.week_day()) - 1])
            }
            Marker::WeekdayNameShort => {
                sink.write_str(&WEEKDAY_NAMES[usize::from(date.week_day()) - 1][..3])
            }
            Marker::HourPadded => utils::write_padded_u8(sink, time.hour),
            Marker::Hour => write!(sink, "{}", time.hour),
            Marker::Hour12Padded => utils::write_padded_u8(sink, hour_on_12_clock(time.hour)),
            Marker::Hour12 => write!(sink, "{}", hour_on_12_clock(time.hour)),
            Marker::MinutePadded => utils::write_padded_u8(sink, time.minute),
            Marker::Minute => write!(sink, "{}", time.minute),
            Marker::SecondPadded => utils::write_padded_u8(sink, time.second),
            Marker::Second => write!(sink, "{}", time.second),
            Marker::Millisecond => utils::write_padded_millisecond(sink, time.millisecond),
            Marker::DayPeriodUpper => {
                sink.write_str(if time.hour < 12 { "AM" } else { "PM" })
            }
            Marker::DayPeriodLower => {
                sink.write_str(if time.hour < 12 { "am" } else { "pm" })
            }
            Marker::Timezone => self.offset.write_to(sink),
        }
    }
}

impl Writeable for FormattableDateTime<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let resolved = self.resolved_markers();
        for token in self.tokens {
            match token {
                FormatToken::Field(marker) => {
                    let marker = resolved[marker.kind().index()].unwrap_or(*marker);
                    self.write_field(sink, marker)?;
                }
                FormatToken::Literal(text) | FormatToken::Escaped(text) => {
                    sink.write_str(text)?;
                }
            }
        }
        Ok(())
    }
}

impl_display_with_writeable!(FormattableDateTime<'_>);

/// Maps a 24-hour clock hour onto the 12-hour clock, 1..=12.
#[inline]
fn hour_on_12_clock(hour: u8) -> u8 {
    (hour + 11) % 12 + 1
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use super::*;
    use crate::iso::{IsoDate, IsoTime};

    fn render(format: &str, datetime: IsoDateTime, offset: UtcOffset) -> String {
        let tokens = tokenize(format);
        FormattableDateTime {
            datetime,
            offset,
            tokens: &tokens,
        }
        .to_string()
    }

    fn sample() -> IsoDateTime {
        // 2023-08-02 was a Wednesday.
        IsoDateTime::new_unchecked(
            IsoDate::new_unchecked(2023, 8, 2),
            IsoTime::new_unchecked(10, 5, 30, 7),
        )
    }

    #[test]
    fn tokenizes_markers_greedily() {
        assert_eq!(
            tokenize("YYYY-MM-DD"),
            alloc::vec![
                FormatToken::Field(Marker::YearFull),
                FormatToken::Literal("-"),
                FormatToken::Field(Marker::MonthPadded),
                FormatToken::Literal("-"),
                FormatToken::Field(Marker::DayPadded),
            ]
        );
        // SSS wins over ss + s.
        assert_eq!(tokenize("SSS"), alloc::vec![FormatToken::Field(Marker::Millisecond)]);
        // Two Ms pair up before the single-M marker is tried.
        assert_eq!(
            tokenize("MMs"),
            alloc::vec![
                FormatToken::Field(Marker::MonthPadded),
                FormatToken::Field(Marker::Second),
            ]
        );
    }

    #[test]
    fn tokenizes_escapes_with_nesting() {
        // The leading `a` is the day-period marker; `e` is plain text.
        assert_eq!(
            tokenize("a[b[c]d]e"),
            alloc::vec![
                FormatToken::Field(Marker::DayPeriodLower),
                FormatToken::Escaped("b[c]d"),
                FormatToken::Literal("e"),
            ]
        );
        assert_eq!(
            tokenize("x[at] y"),
            alloc::vec![
                FormatToken::Literal("x"),
                FormatToken::Escaped("at"),
                FormatToken::Literal(" y"),
            ]
        );
    }

    #[test]
    fn unterminated_escape_is_literal() {
        assert_eq!(
            tokenize("HH[oops"),
            alloc::vec![
                FormatToken::Field(Marker::HourPadded),
                FormatToken::Literal("oops"),
            ]
        );
        // A trailing bare bracket leaves no empty literal behind.
        assert_eq!(
            tokenize("HH["),
            alloc::vec![FormatToken::Field(Marker::HourPadded)]
        );
    }

    #[test]
    fn string_format_detection() {
        assert!(is_string_format("YYYY-MM-DD"));
        assert!(is_string_format("x TZ"));
        assert!(!is_string_format("-:. "));
        // All markers escaped leaves no fields.
        assert!(!is_string_format("[YYYY-MM-DD]"));
    }

    #[test]
    fn renders_default_shape() {
        assert_eq!(
            render("YYYY-MM-DDTHH:mm:ss.SSSTZ", sample(), UtcOffset::UTC),
            "2023-08-02T10:05:30.007+00:00"
        );
        let offset = UtcOffset::try_from_minutes(180).unwrap();
        assert_eq!(
            render("DD MMMM YYYY, dddd", sample(), offset),
            "02 August 2023, Wednesday"
        );
        assert_eq!(render("ddd D MMM YY", sample(), offset), "Wed 2 Aug 23");
    }

    #[test]
    fn renders_escapes_verbatim() {
        assert_eq!(
            render("[YYYY:] YYYY", sample(), UtcOffset::UTC),
            "YYYY: 2023"
        );
    }

    #[test]
    fn twelve_hour_clock() {
        let mut dt = sample();
        assert_eq!(render("hh A", dt, UtcOffset::UTC), "10 AM");
        dt.time.hour = 0;
        assert_eq!(render("h a", dt, UtcOffset::UTC), "12 am");
        dt.time.hour = 12;
        assert_eq!(render("h a", dt, UtcOffset::UTC), "12 pm");
        dt.time.hour = 23;
        assert_eq!(render("hh A", dt, UtcOffset::UTC), "11 PM");
    }

    #[test]
    fn repeated_fields_take_first_width() {
        // The later bare H renders with the width of the leading HH.
        assert_eq!(render("HH H", sample(), UtcOffset::UTC), "10 10");
        assert_eq!(render("m mm", sample(), UtcOffset::UTC), "5 5");
        // Day period case is per-occurrence.
        assert_eq!(render("A a", sample(), UtcOffset::UTC), "AM am");
    }
}
