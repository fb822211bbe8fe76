//! Seconds to hours/minutes/seconds breakdown

use std::fmt;

use serde::{Deserialize, Serialize};

/// Human readable breakdown of a duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableTime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ReadableTime {
    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for ReadableTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}

/// Split a number of seconds into hours, minutes and seconds
pub fn format_time(total_seconds: u64) -> ReadableTime {
    ReadableTime {
        hours: total_seconds / 3600,
        minutes: (total_seconds % 3600) / 60,
        seconds: total_seconds % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_components() {
        assert_eq!(
            format_time(3725),
            ReadableTime { hours: 1, minutes: 2, seconds: 5 }
        );
        assert_eq!(format_time(0), ReadableTime::default());
        assert_eq!(format_time(59).seconds, 59);
        assert_eq!(format_time(3600).hours, 1);
    }

    #[test]
    fn components_sum_back_to_input() {
        for s in [0u64, 1, 59, 60, 61, 3599, 3600, 3601, 86_399, 86_400, 1_000_003] {
            assert_eq!(format_time(s).total_seconds(), s);
        }
    }

    #[test]
    fn displays_compact_form() {
        assert_eq!(format_time(7384).to_string(), "2h 3m 4s");
    }
}
