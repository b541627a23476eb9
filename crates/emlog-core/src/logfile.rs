//! Channel and date resolution from log file names.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

/// Sentinel channel used when a file name does not follow the naming
/// convention.
pub const UNKNOWN_CHANNEL: &str = "~unknown~";

/// Bouncer logs are conventionally named `<prefix>_<channel>_<YYYYMMDD>.log`.
/// The channel capture is greedy so channels containing underscores
/// resolve to their full name.
static FILE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^_]+_(.*)_(\d{4})(\d{2})(\d{2})\.log$").unwrap());

/// Channel identity and calendar date derived from a log file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileContext {
    /// Channel the file's events belong to, or [`UNKNOWN_CHANNEL`].
    pub channel: String,
    /// Calendar date the file covers; merged with each line's clock
    /// time to build absolute timestamps.
    pub date: NaiveDate,
}

impl LogFileContext {
    /// Resolves channel and date from a file name or path.
    ///
    /// Best-effort by design: a name that does not match the
    /// convention, or whose numeric groups do not form a valid date,
    /// yields [`UNKNOWN_CHANNEL`] and today's date rather than an
    /// error. Channel/date metadata is non-critical.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Self {
        Self::resolve(file_name).unwrap_or_else(|| {
            tracing::debug!(
                file_name,
                "file name does not match <prefix>_<channel>_<YYYYMMDD>.log, using defaults"
            );
            Self {
                channel: UNKNOWN_CHANNEL.to_string(),
                date: Local::now().date_naive(),
            }
        })
    }

    fn resolve(file_name: &str) -> Option<Self> {
        let captures = FILE_NAME_RE.captures(file_name)?;

        // The regex guarantees the numeric groups parse; only the
        // calendar validity check below can still reject them.
        let year: i32 = captures[2].parse().ok()?;
        let month: u32 = captures[3].parse().ok()?;
        let day: u32 = captures[4].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        Some(Self {
            channel: captures[1].to_string(),
            date,
        })
    }
}
