//! This module implements date/time string parsing.
//!
//! Input is an ISO-like date or date-time string with an optional
//! timezone tail: a trailing `Z` for UTC, or a `±HH:MM` offset. The tail
//! is split off and validated here; the remaining body is handed to the
//! `ixdtf` parser and the resulting records are mapped into the crate's
//! field types.

use alloc::format;
use alloc::string::ToString;

use ixdtf::{
    encoding::Utf8,
    parsers::IxdtfParser,
    records::{IxdtfParseRecord, TimeRecord, UtcOffsetRecordOrZ},
    ParseError,
};

use crate::{
    error::MaqsError,
    iso::{IsoDate, IsoDateTime, IsoTime},
    offset::{UtcOffset, OFFSET_EXAMPLES},
    MaqsResult, MaqsUnwrap,
};

/// The outcome of parsing a date-time string: the field record plus the
/// timezone tail, if the input carried one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDateTime {
    pub datetime: IsoDateTime,
    pub offset: Option<UtcOffset>,
}

/// Maps an `ixdtf` error into the readable message form.
fn map_parse_error(err: ParseError) -> MaqsError {
    use ParseError::*;
    let message = match err {
        InvalidMonthRange => "Month is outside valid range (1-12)".to_string(),
        InvalidDayRange => "Day is outside valid range for the given month/year".to_string(),
        DateYear => "Invalid year format".to_string(),
        DateMonth => "Invalid month format".to_string(),
        DateDay => "Invalid day format".to_string(),
        TimeHour => "Invalid hour format".to_string(),
        TimeMinuteSecond => "Invalid minute or second format".to_string(),
        TimeSecond => "Invalid second format".to_string(),
        FractionPart => "Invalid fractional seconds format".to_string(),
        ParseFloat => "Invalid fractional seconds value".to_string(),
        AbruptEnd { location } => format!("Unexpected end while parsing {location}"),
        InvalidEnd => "Unexpected character at end of input".to_string(),
        _ => format!("Parse error: {err:?}"),
    };
    MaqsError::value().with_message(message)
}

/// Splits an explicit `±HH:MM` tail off the source, if present.
///
/// A `+` or `-` can only start a timezone tail after the date-time
/// separator, and only when a digit follows the sign; before the
/// separator a sign could belong to an extended year, and a sign with
/// no digit is left for the body parser to reject as a whole.
fn split_timezone_tail(source: &str) -> (&str, Option<&str>) {
    let bytes = source.as_bytes();
    let Some(separator) = bytes
        .iter()
        .position(|&b| b == b'T' || b == b't' || b == b' ')
    else {
        return (source, None);
    };
    for i in separator + 1..bytes.len() {
        if (bytes[i] == b'+' || bytes[i] == b'-')
            && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
        {
            return (&source[..i], Some(&source[i..]));
        }
    }
    (source, None)
}

fn time_from_record(record: TimeRecord) -> IsoTime {
    let nanosecond = record
        .fraction
        .and_then(|fraction| fraction.to_nanoseconds())
        .unwrap_or(0);
    IsoTime::new_unchecked(
        record.hour,
        record.minute,
        // A leap second in the input clamps to the last representable one.
        record.second.min(59),
        (nanosecond / 1_000_000) as u16,
    )
}

/// Parses a date or date-time string into its field record and optional
/// timezone tail.
///
/// A date-only body yields midnight; a trailing `Z` yields the zero
/// offset. A malformed or out-of-range timezone tail is reported against
/// the full source string.
pub fn parse_date_time(source: &str) -> MaqsResult<ParsedDateTime> {
    let (body, tail) = split_timezone_tail(source);

    let mut offset = match tail {
        Some(tail) => Some(UtcOffset::from_utf8(tail.as_bytes()).map_err(|_| {
            MaqsError::invalid_portion(tail, source, "time zone", OFFSET_EXAMPLES)
        })?),
        None => None,
    };

    let record: IxdtfParseRecord<Utf8> = IxdtfParser::from_utf8(body.as_bytes())
        .parse()
        .map_err(map_parse_error)?;

    // The grammar guarantees a date record on a successful parse.
    let date = record.date.maqs_unwrap()?;
    let date = IsoDate::new_unchecked(date.year, date.month, date.day);
    let time = record.time.map(time_from_record).unwrap_or_default();

    if offset.is_none() && record.offset == Some(UtcOffsetRecordOrZ::Z) {
        offset = Some(UtcOffset::UTC);
    }

    Ok(ParsedDateTime {
        datetime: IsoDateTime::new_unchecked(date, time),
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn assert_fields(
        parsed: ParsedDateTime,
        date: (i32, u8, u8),
        time: (u8, u8, u8, u16),
        offset: Option<i16>,
    ) {
        assert_eq!(parsed.datetime.date, IsoDate::new_unchecked(date.0, date.1, date.2));
        assert_eq!(
            parsed.datetime.time,
            IsoTime::new_unchecked(time.0, time.1, time.2, time.3)
        );
        assert_eq!(parsed.offset.map(|o| o.minutes()), offset);
    }

    #[test]
    fn parses_full_date_time_with_offset() {
        let parsed = parse_date_time("2023-08-02T10:50:30.500+03:00").unwrap();
        assert_fields(parsed, (2023, 8, 2), (10, 50, 30, 500), Some(180));

        let parsed = parse_date_time("2023-08-02T10:50:30-05:00").unwrap();
        assert_fields(parsed, (2023, 8, 2), (10, 50, 30, 0), Some(-300));
    }

    #[test]
    fn parses_utc_designator() {
        let parsed = parse_date_time("2023-08-02T10:50:30.500Z").unwrap();
        assert_fields(parsed, (2023, 8, 2), (10, 50, 30, 500), Some(0));
    }

    #[test]
    fn missing_tail_leaves_offset_unset() {
        let parsed = parse_date_time("2023-08-02T10:50:30").unwrap();
        assert_fields(parsed, (2023, 8, 2), (10, 50, 30, 0), None);
    }

    #[test]
    fn date_only_is_midnight() {
        let parsed = parse_date_time("2023-08-02").unwrap();
        assert_fields(parsed, (2023, 8, 2), (0, 0, 0, 0), None);
    }

    #[test]
    fn space_separator_is_accepted() {
        let parsed = parse_date_time("2023-08-02 10:50:30+03:00").unwrap();
        assert_fields(parsed, (2023, 8, 2), (10, 50, 30, 0), Some(180));
    }

    #[test]
    fn leap_second_clamps() {
        let parsed = parse_date_time("2023-12-31T23:59:60Z").unwrap();
        assert_fields(parsed, (2023, 12, 31), (23, 59, 59, 0), Some(0));
    }

    #[test]
    fn bad_timezone_tail_is_a_portion_error() {
        for source in [
            "2023-08-16T18:34:21.128+15:00",
            "2023-08-16T18:34:21-11:30",
            "2023-08-16T18:34:21+0300",
            "2023-08-16T18:34:21+3:00",
        ] {
            let err = parse_date_time(source).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValuePortion, "wrong kind for {source}");
            assert!(
                err.message().contains(source),
                "message misses the source: {}",
                err.message()
            );
        }

        let err = parse_date_time("2023-08-16T18:34:21.128+15:00").unwrap_err();
        assert_eq!(
            err.message(),
            "Portion \"+15:00\" of value \"2023-08-16T18:34:21.128+15:00\" is not a valid \
             time zone. Examples of acceptable values: -05:00, +03:00, +11:30."
        );
    }

    #[test]
    fn malformed_body_is_a_value_error() {
        for source in ["", "not a date", "2023-13-01", "2023-02-30", "2023-08-02T25:00"] {
            let err = parse_date_time(source).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value, "wrong kind for {source}");
        }
    }

    #[test]
    fn sign_without_digit_is_not_a_timezone_tail() {
        // The embedded `t` and `-` must not be mistaken for a separator
        // plus tail; the whole string is rejected as a value.
        for source in ["not-a-date", "2023-08-02T10:50:30-zz"] {
            let err = parse_date_time(source).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value, "wrong kind for {source}");
        }
    }
}
