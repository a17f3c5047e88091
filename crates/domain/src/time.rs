//! Time and timestamp helpers.

use chrono::{DateTime, Local, Timelike, Utc};

/// UTC timestamp used for `created_at` and similar fields.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return the hour of the day (0–23) on the local wall clock.
#[must_use]
pub fn local_hour() -> u32 {
    Local::now().hour()
}
