//! Host system access: the current time and the local UTC offset.

use web_time::{SystemTime, UNIX_EPOCH};

use crate::{MaqsError, MaqsResult};

/// Returns the current absolute time in epoch milliseconds.
pub(crate) fn epoch_ms() -> MaqsResult<i64> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| MaqsError::value().with_message("Error fetching system time"))?;
    i64::try_from(duration.as_millis())
        .map_err(|_| MaqsError::value().with_message("System time is out of range"))
}

/// Returns the host's current UTC offset in whole minutes.
///
/// Sub-minute offsets do not occur in current zone data; the value is
/// truncated toward zero if one ever appears.
pub(crate) fn local_offset_minutes() -> MaqsResult<i16> {
    let seconds = chrono::Local::now().offset().local_minus_utc();
    i16::try_from(seconds / 60)
        .map_err(|_| MaqsError::value().with_message("System time zone offset is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_time_is_after_the_epoch() {
        let now = epoch_ms().unwrap();
        // 2023-01-01T00:00:00Z, far enough in the past for any test host.
        assert!(now > 1_672_531_200_000);
    }

    #[test]
    fn local_offset_is_in_supported_range() {
        let minutes = local_offset_minutes().unwrap();
        assert!((-660..=840).contains(&minutes));
    }
}
