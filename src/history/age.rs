//! Relative age labels for recipe book listings.

use chrono::{DateTime, Utc};

const UNITS: [(i64, &str); 5] = [
    (31_536_000, "year"),
    (2_592_000, "month"),
    (86_400, "day"),
    (3_600, "hour"),
    (60, "minute"),
];

/// "3 hours ago", "1 day ago", "12 seconds ago".
///
/// A unit is used once the age is strictly greater than one of it, so
/// exactly 60 seconds still reads as seconds. Future timestamps read as
/// "0 seconds ago".
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds().max(0);
    for (size, unit) in UNITS {
        if seconds > size {
            return plural(seconds / size, unit);
        }
    }
    plural(seconds, "second")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}
