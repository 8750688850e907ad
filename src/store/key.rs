//! Submission key generation
//!
//! Keys are local timestamps at microsecond resolution. When two submissions
//! land on the same timestamp the later one gets a `#n` suffix instead of
//! overwriting the earlier entry.

use chrono::{DateTime, Local};

use super::Records;

/// Timestamp layout used for keys, e.g. `2024-01-01 12:30:45.123456`
pub const KEY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Source of the current time for key generation
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Render the timestamp part of a key
pub fn timestamp_key(time: &DateTime<Local>) -> String {
    time.format(KEY_FORMAT).to_string()
}

/// Pick a key for `time` that is not yet present in `records`
pub fn unique_key(records: &Records, time: &DateTime<Local>) -> String {
    let base = timestamp_key(time);
    if !records.contains_key(&base) {
        return base;
    }

    (1u64..)
        .map(|n| format!("{base}#{n}"))
        .find(|candidate| !records.contains_key(candidate))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Record;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap()
    }

    #[test]
    fn test_timestamp_key_format() {
        assert_eq!(timestamp_key(&fixed_time()), "2024-01-01 00:00:00.000000");
    }

    #[test]
    fn test_unique_key_free_slot() {
        let records = Records::new();
        assert_eq!(unique_key(&records, &fixed_time()), "2024-01-01 00:00:00.000000");
    }

    #[test]
    fn test_unique_key_collision_gets_suffix() {
        let mut records = Records::new();
        records.insert("2024-01-01 00:00:00.000000".to_string(), Record::new());
        assert_eq!(
            unique_key(&records, &fixed_time()),
            "2024-01-01 00:00:00.000000#1"
        );

        records.insert("2024-01-01 00:00:00.000000#1".to_string(), Record::new());
        assert_eq!(
            unique_key(&records, &fixed_time()),
            "2024-01-01 00:00:00.000000#2"
        );
    }

    #[test]
    fn test_keys_sort_chronologically() {
        let earlier = timestamp_key(&fixed_time());
        let later = timestamp_key(&(fixed_time() + chrono::Duration::microseconds(1)));
        assert!(earlier < later);
    }
}
