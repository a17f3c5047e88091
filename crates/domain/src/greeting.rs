//! Time-of-day greeting shown in the feed header.

use std::fmt;

use serde::Serialize;

/// Greeting selected from the wall-clock hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
}

impl Greeting {
    /// Pick the greeting for `hour` (0–23).
    ///
    /// `[5, 12)` is morning, `[12, 18)` afternoon, everything else evening,
    /// including values past 23.
    #[must_use]
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            5..12 => Self::Morning,
            12..18 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "Good morning",
            Self::Afternoon => "Good afternoon",
            Self::Evening => "Good evening",
        }
    }
}

impl fmt::Display for Greeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
