//! This module implements the shared settings collaborator.
//!
//! A [`Settings`] value holds the defaults every date-time value falls
//! back to: the assumed timezone offset for input without one, the
//! clock-format preference, and the default string format. Setters
//! validate and return `&mut Self` so configuration chains.
//!
//! With the `std` feature a process-wide instance is available through
//! [`global_settings`] and [`update_global_settings`].

use alloc::string::{String, ToString};

use crate::{
    error::MaqsError,
    fmt::is_string_format,
    offset::UtcOffset,
    MaqsResult,
};

/// ISO 8601 with a literal `Z` tail; the default string format.
pub const DATETIME_FORMAT_UTC_ISO8601: &str = "YYYY-MM-DDTHH:mm:ss.SSSZ";
/// ISO 8601 with the value's own offset rendered as `±HH:MM`.
pub const DATETIME_FORMAT_TZ_ISO8601: &str = "YYYY-MM-DDTHH:mm:ss.SSSTZ";

/// Whether hours are displayed on the 12-hour or 24-hour clock.
///
/// This is a stored preference for callers composing their own format
/// strings (`h`/`a` markers versus `H`); the built-in ISO 8601 defaults
/// always use the 24-hour clock and do not consult it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFormat {
    /// 12-hour clock with a day period.
    Twelve,
    /// 24-hour clock.
    #[default]
    TwentyFour,
}

/// Default values shared by date-time instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    timezone_offset: UtcOffset,
    time_format: TimeFormat,
    default_string_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Creates settings with the library defaults: UTC, the 24-hour
    /// clock, and [`DATETIME_FORMAT_UTC_ISO8601`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            timezone_offset: UtcOffset::UTC,
            time_format: TimeFormat::TwentyFour,
            default_string_format: DATETIME_FORMAT_UTC_ISO8601.to_string(),
        }
    }

    /// The default time zone in its canonical `±HH:MM` form.
    #[must_use]
    pub fn timezone(&self) -> String {
        self.timezone_offset.to_iso_string()
    }

    /// The default time zone offset.
    #[must_use]
    pub fn timezone_offset(&self) -> UtcOffset {
        self.timezone_offset
    }

    /// The clock-format preference.
    #[must_use]
    pub fn time_format(&self) -> TimeFormat {
        self.time_format
    }

    /// The string format used when no explicit format is given.
    #[must_use]
    pub fn default_string_format(&self) -> &str {
        &self.default_string_format
    }

    /// Sets the default time zone from its `±HH:MM` form.
    pub fn set_timezone(&mut self, timezone: &str) -> MaqsResult<&mut Self> {
        let offset = timezone.parse::<UtcOffset>().map_err(|_| {
            MaqsError::invalid_value(timezone, "time zone", &["+03:00", "+00:00", "-05:00"])
        })?;
        self.timezone_offset = offset;
        Ok(self)
    }

    /// Sets the default time zone from a minute offset.
    pub fn set_timezone_offset(&mut self, offset: i16) -> MaqsResult<&mut Self> {
        self.timezone_offset = UtcOffset::try_from_minutes(offset).map_err(|_| {
            MaqsError::invalid_value(offset, "time zone offset", &["180", "0", "-300"])
        })?;
        Ok(self)
    }

    /// Sets the clock-format preference.
    pub fn set_time_format(&mut self, time_format: TimeFormat) -> &mut Self {
        self.time_format = time_format;
        self
    }

    /// Sets the default string format.
    ///
    /// The format must contain at least one field marker; a marker-free
    /// string would render every value identically.
    pub fn set_default_string_format(&mut self, format: &str) -> MaqsResult<&mut Self> {
        if !is_string_format(format) {
            return Err(MaqsError::invalid_value(
                format,
                "string format",
                &[DATETIME_FORMAT_UTC_ISO8601],
            ));
        }
        self.default_string_format = format.to_string();
        Ok(self)
    }
}

#[cfg(feature = "std")]
mod global {
    use std::sync::{LazyLock, PoisonError, RwLock};

    use super::Settings;

    static GLOBAL_SETTINGS: LazyLock<RwLock<Settings>> =
        LazyLock::new(|| RwLock::new(Settings::new()));

    /// Returns a snapshot of the process-wide settings.
    pub fn global_settings() -> Settings {
        GLOBAL_SETTINGS
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `configure` to the process-wide settings.
    pub fn update_global_settings<F>(configure: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = GLOBAL_SETTINGS
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        configure(&mut settings);
    }
}

#[cfg(feature = "std")]
pub use global::{global_settings, update_global_settings};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults() {
        let settings = Settings::new();
        assert_eq!(settings.timezone(), "+00:00");
        assert_eq!(settings.timezone_offset(), UtcOffset::UTC);
        assert_eq!(settings.time_format(), TimeFormat::TwentyFour);
        assert_eq!(settings.default_string_format(), DATETIME_FORMAT_UTC_ISO8601);
    }

    #[test]
    fn setters_chain() {
        let mut settings = Settings::new();
        settings
            .set_timezone("+03:00")
            .unwrap()
            .set_time_format(TimeFormat::Twelve)
            .set_default_string_format(DATETIME_FORMAT_TZ_ISO8601)
            .unwrap();
        assert_eq!(settings.timezone_offset().minutes(), 180);
        assert_eq!(settings.time_format(), TimeFormat::Twelve);
        assert_eq!(settings.default_string_format(), DATETIME_FORMAT_TZ_ISO8601);

        settings.set_timezone_offset(-300).unwrap();
        assert_eq!(settings.timezone(), "-05:00");
    }

    #[test]
    fn rejects_invalid_values() {
        let mut settings = Settings::new();

        let err = settings.set_timezone("+15:00").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        let err = settings.set_timezone("0300").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        let err = settings.set_timezone_offset(900).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);

        // Marker-free formats are rejected; escaped markers do not count.
        let err = settings.set_default_string_format("--::--").unwrap_err();
        assert_eq!(
            err.message(),
            "Value \"--::--\" is not a valid string format. Examples of acceptable \
             values: YYYY-MM-DDTHH:mm:ss.SSSZ."
        );
        assert!(settings.set_default_string_format("[YYYY]").is_err());

        // Failed setters leave the previous state untouched.
        assert_eq!(settings.timezone(), "+00:00");
        assert_eq!(settings.default_string_format(), DATETIME_FORMAT_UTC_ISO8601);
    }

    #[cfg(feature = "std")]
    #[test]
    fn global_settings_snapshot() {
        let snapshot = global_settings();
        assert_eq!(snapshot.timezone_offset(), UtcOffset::UTC);
    }
}
