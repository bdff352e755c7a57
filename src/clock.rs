// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! All things time-related.

pub use chrono::{DateTime, Local, TimeDelta, Utc};
use std::ops::Sub;

/// Format used for every timestamp printed by the tool.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Tells time and returns the time.
///
/// Generally you will want to retrieve time using [`SystemClock`],
/// but it tests you may want to implement a `Clock` with a fixed time.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Interacts with the system clock to get the current time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Converts a Reddit `created_utc` value, which is fractional seconds
/// since the Unix epoch, into a date.
///
/// Nonsensical values are clamped to the epoch.
///
/// # Examples
///
/// ```
/// use reddit_cli::clock::from_reddit_timestamp;
/// let date = from_reddit_timestamp(1207004126.0);
/// assert_eq!(date.to_rfc3339(), "2008-03-31T22:55:26+00:00");
/// ```
pub fn from_reddit_timestamp(timestamp: f64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp.trunc() as i64, 0).unwrap_or_default()
}

/// Marks a thing that has a notion of its age.
pub trait HasAge {
    /// The date the item was created, in UTC.
    fn created_utc(&self) -> DateTime<Utc>;

    /// The date the item was created, in local time.
    fn created_local(&self) -> DateTime<Local> {
        self.created_utc().with_timezone(&Local)
    }

    /// The creation date as a printable timestamp, either in UTC or in
    /// the local time zone.
    fn created_at(&self, utc: bool) -> String {
        if utc {
            self.created_utc().format(TIMESTAMP_FORMAT).to_string()
        } else {
            self.created_local().format(TIMESTAMP_FORMAT).to_string()
        }
    }

    /// The age of the item.
    ///
    /// `clock` is a source of time from which the age can be derived.
    /// Generally [`SystemClock::default()`] is used.
    fn age<C: Clock>(&self, clock: &C) -> TimeDelta {
        let birthday = self.created_utc();
        clock.now().sub(birthday)
    }
}
