//! Date-time normalization across the layouts banks use in their messages
//!
//! Messages carry the date and time as separate captures. The date token is
//! located first, the time falls back to the current wall-clock minute in the
//! reference zone, and the joined string is tried against an ordered list of
//! layouts. When nothing parses, callers get "now" plus a [`DateError`].

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use regex::Regex;

use crate::error::{DateError, Result};

/// Union of all supported date layouts, in layout order
///
/// Two-digit-year forms need a trailing word boundary so that
/// `07-MAR-2023` is not read as `07-MAR-20`.
const DATE_TOKEN: &str = concat!(
    r"(\d{2}-\w{3}-\d{2}\b)",
    r"|(\d{2}-\d{2}-\d{4})",
    r"|(\d{4}-\d{2}-\d{2})",
    r"|(\d{2}/\d{2}/\d{2}\b)",
    r"|(\d{2}-\w{3}-\d{4})",
    r"|(\d{2}-\d{2}-\d{2}\b)",
    r"|(\w+ \d+, \d{4})",
);

const TIME_TOKEN: &str = r"\d{2}:\d{2}";

/// Ordered (shape, chrono format) pairs; first success wins
///
/// The shape pins exact digit widths, which chrono's `%Y` alone does not.
const LAYOUTS: &[(&str, &str)] = &[
    (r"^\d{2}-[A-Za-z]{3}-\d{2}$", "%d-%b-%y"),     // 04-Mar-23
    (r"^\d{2}-\d{2}-\d{4}$", "%d-%m-%Y"),           // 07-03-2023
    (r"^\d{4}-\d{2}-\d{2}$", "%Y-%m-%d"),           // 2023-01-10
    (r"^\d{2}/\d{2}/\d{2}$", "%d/%m/%y"),           // 10/01/23
    (r"^\d{2}-[A-Za-z]{3}-\d{4}$", "%d-%b-%Y"),     // 07-MAR-2023
    (r"^\d{2}-\d{2}-\d{2}$", "%d-%m-%y"),           // 13-12-22
    (r"^[A-Za-z]+ \d{1,2}, \d{4}$", "%B %d, %Y"),   // January 17, 2023
];

/// Source of the current time, injectable for tests
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug)]
struct Layout {
    shape: Regex,
    format: String,
}

/// Parses captured date/time substrings into timestamps in a reference zone
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    zone: FixedOffset,
    clock: Arc<dyn Clock>,
    date_token: Regex,
    time_token: Regex,
    layouts: Arc<[Layout]>,
}

impl DateNormalizer {
    pub fn new(zone: FixedOffset, clock: Arc<dyn Clock>) -> Result<Self> {
        let layouts = LAYOUTS
            .iter()
            .map(|(shape, format)| -> Result<Layout> {
                Ok(Layout {
                    shape: Regex::new(shape)?,
                    format: format!("{} %H:%M", format),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            zone,
            clock,
            date_token: Regex::new(DATE_TOKEN)?,
            time_token: Regex::new(TIME_TOKEN)?,
            layouts: layouts.into(),
        })
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// Current time in the reference zone
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now().with_timezone(&self.zone)
    }

    /// Parse a date capture and an optional time capture
    ///
    /// A missing time means "same day, now": the current minute in the
    /// reference zone is used rather than midnight.
    pub fn parse(
        &self,
        date: &str,
        time: &str,
    ) -> std::result::Result<DateTime<FixedOffset>, DateError> {
        let date_str = self
            .date_token
            .find(date)
            .map(|m| m.as_str())
            .ok_or_else(|| DateError::NoDateFound(date.to_string()))?;

        let time_str = match self.time_token.find(time) {
            Some(m) => m.as_str().to_string(),
            None => self.now().format("%H:%M").to_string(),
        };

        let joined = format!("{} {}", date_str, time_str);
        for layout in self.layouts.iter() {
            if !layout.shape.is_match(date_str) {
                continue;
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(&joined, &layout.format) {
                if let Some(dt) = naive.and_local_timezone(self.zone).single() {
                    return Ok(dt);
                }
            }
        }

        Err(DateError::Unparsable(joined))
    }

    /// Like [`parse`](Self::parse), but substitutes "now" on failure
    pub fn parse_or_now(
        &self,
        date: &str,
        time: &str,
    ) -> (DateTime<FixedOffset>, Option<DateError>) {
        match self.parse(date, time) {
            Ok(dt) => (dt, None),
            Err(e) => (self.now(), Some(e)),
        }
    }
}

/// Parse a `+HH:MM` / `-HH:MM` offset
pub fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
