//! This module implements `MaqsError`, the crate-wide error type.
//!
//! Errors carry a human-readable message naming the offending value and,
//! where helpful, example valid values. Validation happens at the public
//! method boundary; internal helpers assume pre-validated input.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use core::fmt;

/// `MaqsError`'s error kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A value of the right type outside its allowed domain, or an
    /// unparseable value.
    #[default]
    Value,
    /// A parameter of the wrong primitive type.
    Type,
    /// A substring of an otherwise parseable composite value is invalid,
    /// e.g. an embedded timezone suffix.
    ValuePortion,
    /// An internal assertion failed.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => "invalid value",
            Self::Type => "invalid value type",
            Self::ValuePortion => "invalid value portion",
            Self::Assert => "implementation error",
        }
        .fmt(f)
    }
}

/// The error type of `maqs_rs`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaqsError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl MaqsError {
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Creates an `InvalidValue` error.
    #[inline]
    #[must_use]
    pub const fn value() -> Self {
        Self::new(ErrorKind::Value)
    }

    /// Creates an `InvalidValueType` error.
    #[inline]
    #[must_use]
    pub const fn value_type() -> Self {
        Self::new(ErrorKind::Type)
    }

    /// Creates an `InvalidValuePortion` error.
    #[inline]
    #[must_use]
    pub const fn portion() -> Self {
        Self::new(ErrorKind::ValuePortion)
    }

    /// Creates an internal assertion error.
    #[inline]
    #[must_use]
    pub const fn assert() -> Self {
        Self::new(ErrorKind::Assert)
    }

    /// Attaches a message to the error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<Cow<'static, str>>) -> Self {
        self.msg = msg.into();
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// An `InvalidValue` error in the library's readable form, for example:
    /// `Value "60" is not a valid minute. Examples of acceptable values: 0, 30, 59.`
    #[must_use]
    pub fn invalid_value(value: impl fmt::Display, name: &str, examples: &[&str]) -> Self {
        Self::value().with_message(readable(&format!("Value \"{value}\""), name, examples))
    }

    /// An `InvalidValuePortion` error in the library's readable form, for example:
    /// `Portion "+15:00" of value "2023-08-16T18:34:21.128+15:00" is not a valid time zone.`
    #[must_use]
    pub fn invalid_portion(
        portion: impl fmt::Display,
        value: impl fmt::Display,
        name: &str,
        examples: &[&str],
    ) -> Self {
        Self::portion().with_message(readable(
            &format!("Portion \"{portion}\" of value \"{value}\""),
            name,
            examples,
        ))
    }

    /// An `InvalidValueType` error in the library's readable form.
    #[must_use]
    pub fn invalid_type(value: impl fmt::Display, expected: &str) -> Self {
        Self::value_type().with_message(format!(
            "Value \"{value}\" is not of the expected type {expected}."
        ))
    }
}

fn readable(subject: &str, name: &str, examples: &[&str]) -> String {
    if examples.is_empty() {
        return format!("{subject} is not a valid {name}.");
    }
    format!(
        "{subject} is not a valid {name}. Examples of acceptable values: {}.",
        examples.join(", ")
    )
}

impl fmt::Display for MaqsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)?;
        if !self.msg.is_empty() {
            f.write_str(": ")?;
            f.write_str(&self.msg)?;
        }
        Ok(())
    }
}

impl core::error::Error for MaqsError {}
