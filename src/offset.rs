//! This module implements the fixed UTC offset type.
//!
//! A [`UtcOffset`] is a signed whole-minute displacement from UTC in the
//! range `-11:00..=+14:00`, with `±HH:MM` as its canonical text form.

use core::fmt;
use core::str::FromStr;

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    error::MaqsError,
    utils::{self, parse_digit_pair},
    MaqsResult, MS_PER_MINUTE,
};

/// Lowest supported offset, `-11:00`, in minutes.
pub(crate) const OFFSET_MIN_MINUTES: i16 = -660;
/// Highest supported offset, `+14:00`, in minutes.
pub(crate) const OFFSET_MAX_MINUTES: i16 = 840;

pub(crate) const OFFSET_EXAMPLES: &[&str] = &["-05:00", "+03:00", "+11:30"];

/// A fixed UTC offset in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcOffset(i16);

impl UtcOffset {
    /// The zero offset, `+00:00`.
    pub const UTC: Self = Self(0);

    /// Creates a `UtcOffset` from a minute count, validating the range.
    pub fn try_from_minutes(minutes: i16) -> MaqsResult<Self> {
        if !is_valid_offset(minutes) {
            return Err(MaqsError::invalid_value(
                minutes,
                "time zone offset",
                &["-660", "0", "180", "840"],
            ));
        }
        Ok(Self(minutes))
    }

    /// Attempts to parse a `UtcOffset` from the strict `±HH:MM` form.
    pub fn from_utf8(source: &[u8]) -> MaqsResult<Self> {
        let invalid = || {
            MaqsError::invalid_value(
                core::str::from_utf8(source).unwrap_or("<invalid utf-8>"),
                "time zone",
                OFFSET_EXAMPLES,
            )
        };

        if source.len() != 6 {
            return Err(invalid());
        }
        let sign = match source[0] {
            b'+' => 1i16,
            b'-' => -1i16,
            _ => return Err(invalid()),
        };
        let hour = parse_digit_pair(source[1], source[2]).ok_or_else(invalid)?;
        if source[3] != b':' {
            return Err(invalid());
        }
        let minute = parse_digit_pair(source[4], source[5]).ok_or_else(invalid)?;
        if minute > 59 {
            return Err(invalid());
        }

        let minutes = sign * (i16::from(hour) * 60 + i16::from(minute));
        if !is_valid_offset(minutes) {
            return Err(invalid());
        }
        Ok(Self(minutes))
    }

    /// Returns the offset as a minute count.
    #[inline]
    #[must_use]
    pub const fn minutes(&self) -> i16 {
        self.0
    }

    /// Returns the offset as a millisecond count.
    #[inline]
    pub(crate) const fn as_ms(&self) -> i64 {
        self.0 as i64 * MS_PER_MINUTE
    }

    /// Returns whether this is the zero offset.
    #[inline]
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        self.0 == 0
    }

    /// Returns the canonical `±HH:MM` text for this offset.
    #[must_use]
    pub fn to_iso_string(&self) -> alloc::string::String {
        self.write_to_string().into_owned()
    }
}

impl FromStr for UtcOffset {
    type Err = MaqsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_utf8(s.as_bytes())
    }
}

impl Writeable for UtcOffset {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        sink.write_char(sign)?;
        let minutes = self.0.unsigned_abs();
        utils::write_padded_u8(sink, (minutes / 60) as u8)?;
        sink.write_char(':')?;
        utils::write_padded_u8(sink, (minutes % 60) as u8)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(6)
    }
}

impl_display_with_writeable!(UtcOffset);

/// Returns whether `minutes` is within the supported offset range,
/// `-11:00..=+14:00`.
#[must_use]
pub const fn is_valid_offset(minutes: i16) -> bool {
    OFFSET_MIN_MINUTES <= minutes && minutes <= OFFSET_MAX_MINUTES
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn parses_canonical_offsets() {
        assert_eq!("+00:00".parse::<UtcOffset>().unwrap(), UtcOffset::UTC);
        assert_eq!("+03:00".parse::<UtcOffset>().unwrap().minutes(), 180);
        assert_eq!("-05:00".parse::<UtcOffset>().unwrap().minutes(), -300);
        assert_eq!("+05:45".parse::<UtcOffset>().unwrap().minutes(), 345);
        // Sign applies to the whole offset, not just the hours.
        assert_eq!("-00:30".parse::<UtcOffset>().unwrap().minutes(), -30);
        // Range endpoints.
        assert_eq!("-11:00".parse::<UtcOffset>().unwrap().minutes(), -660);
        assert_eq!("+14:00".parse::<UtcOffset>().unwrap().minutes(), 840);
    }

    #[test]
    fn rejects_malformed_offsets() {
        for bad in [
            "", "Z", "03:00", "+3:00", "+03:0", "+03:000", "+0300", "+03-00", "+03:60", "+aa:00",
        ] {
            let err = bad.parse::<UtcOffset>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value, "accepted {bad:?}");
        }
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        assert!("-11:01".parse::<UtcOffset>().is_err());
        assert!("+14:01".parse::<UtcOffset>().is_err());
        assert!("+15:00".parse::<UtcOffset>().is_err());
        assert!(UtcOffset::try_from_minutes(841).is_err());
        assert!(UtcOffset::try_from_minutes(-661).is_err());

        assert!(is_valid_offset(840));
        assert!(is_valid_offset(-660));
        assert!(is_valid_offset(0));
        assert!(!is_valid_offset(841));
        assert!(!is_valid_offset(-661));
    }

    #[test]
    fn formats_canonically() {
        let cases = [
            (0, "+00:00"),
            (180, "+03:00"),
            (-300, "-05:00"),
            (345, "+05:45"),
            (-30, "-00:30"),
            (840, "+14:00"),
        ];
        for (minutes, expected) in cases {
            let offset = UtcOffset::try_from_minutes(minutes).unwrap();
            assert_eq!(offset.to_string(), expected);
            // Text round trip.
            assert_eq!(expected.parse::<UtcOffset>().unwrap(), offset);
        }
    }

    #[test]
    fn round_trips_over_the_full_range() {
        for minutes in -660..=840 {
            let offset = UtcOffset::try_from_minutes(minutes).unwrap();
            let rendered = offset.to_string();
            assert_eq!(rendered.len(), 6, "bad width for {minutes}");
            assert_eq!(
                rendered.parse::<UtcOffset>().unwrap().minutes(),
                minutes,
                "round trip failed for {rendered}"
            );
        }
    }
}
