//! The `maqs_rs` crate is a datetime value object library.
//!
//! A [`DateTime`] owns a single instant (a millisecond count) together with
//! a fixed UTC offset. Calendar fields (year through millisecond, weekday)
//! are always derived from the instant, unit mutations move the instant by
//! the exact implied millisecond delta, and rendering goes through a small
//! token-based format language (`YYYY`, `MM`, `HH`, `[escaped]`, ...).
//!
//! ```rust
//! use maqs_rs::DateTime;
//! use core::str::FromStr;
//!
//! let mut value = DateTime::from_str("2023-08-02T10:50:30.500+03:00").unwrap();
//! assert_eq!(value.year(), 2023);
//! assert_eq!(value.timezone(), "+03:00");
//!
//! // Carry propagates through the whole unit chain.
//! value.add_minutes(75).unwrap();
//! assert_eq!((value.hour(), value.minute()), (12, 5));
//!
//! assert_eq!(value.format_as("YYYY-MM-DD"), "2023-08-02");
//! ```
//!
//! Only fixed `±HH:MM` offsets are modeled; IANA time zone lookups,
//! non-Gregorian calendars, and sub-millisecond precision are out of scope.
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

extern crate alloc;
extern crate core;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod fmt;
pub mod iso;
pub mod offset;
pub mod parsers;
pub mod settings;

#[cfg(feature = "sys")]
pub(crate) mod sys;

mod datetime;

#[doc(hidden)]
pub(crate) mod utils;

#[doc(inline)]
pub use error::MaqsError;

/// The `maqs_rs` result type.
pub type MaqsResult<T> = Result<T, MaqsError>;

pub use crate::{
    datetime::DateTime,
    fmt::{FieldKind, FormatToken, Marker},
    offset::UtcOffset,
    settings::Settings,
};

/// A library specific trait for unwrapping assertions.
pub(crate) trait MaqsUnwrap {
    type Output;

    /// `maqs_rs` based assertion for unwrapping. This will panic in
    /// debug builds, but throws an error during runtime.
    fn maqs_unwrap(self) -> MaqsResult<Self::Output>;
}

impl<T> MaqsUnwrap for Option<T> {
    type Output = T;

    fn maqs_unwrap(self) -> MaqsResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(MaqsError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! maqs_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err($crate::MaqsError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err($crate::MaqsError::assert());
        }
    };
}

// Relevant numeric constants
/// Milliseconds per day constant: 8.64e+7
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
/// Milliseconds per hour constant.
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
/// Milliseconds per minute constant.
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
/// Milliseconds per second constant.
pub const MS_PER_SECOND: i64 = 1000;
/// Max instant millisecond constant: ±100,000,000 days around the epoch.
#[doc(hidden)]
pub(crate) const MS_MAX_INSTANT: i64 = MS_PER_DAY * 100_000_000;
/// Min instant millisecond constant.
#[doc(hidden)]
pub(crate) const MS_MIN_INSTANT: i64 = -MS_MAX_INSTANT;
