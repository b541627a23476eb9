//! Implementation of the `emlog convert` command.
//!
//! Reads bouncer log files, resolves each file's channel and calendar
//! date from its name, parses the content into typed events, and
//! writes the channel-grouped result as JSON to stdout.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use emlog_core::{LogEvent, LogFileContext};

/// Events grouped by channel. Within a channel, events keep file
/// order, and files contribute in the order they were supplied.
pub type ChannelEvents = BTreeMap<String, Vec<LogEvent>>;

/// Runs the convert command, writing JSON to stdout.
pub fn run(files: &[PathBuf], pretty: bool) -> Result<()> {
    let channels = convert_files(files)?;

    let stdout = stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &channels)
    } else {
        serde_json::to_writer(&mut writer, &channels)
    }
    .context("failed to serialize events")?;
    // Ignore write errors on the trailing newline so piping into
    // `head` does not surface a broken-pipe failure.
    let _ = writeln!(writer);

    Ok(())
}

/// Parses each file and appends its events to the owning channel.
///
/// Files are independent, so they parse in parallel; collection keeps
/// argument order, and the first unparsable line in any file aborts
/// the whole batch with that file and line in the error chain.
pub fn convert_files(files: &[PathBuf]) -> Result<ChannelEvents> {
    let parsed: Vec<(String, Vec<LogEvent>)> = files
        .par_iter()
        .map(|path| convert_file(path))
        .collect::<Result<_>>()?;

    let mut channels = ChannelEvents::new();
    for (channel, events) in parsed {
        channels.entry(channel).or_default().extend(events);
    }

    Ok(channels)
}

fn convert_file(path: &Path) -> Result<(String, Vec<LogEvent>)> {
    let context = LogFileContext::from_file_name(&path.to_string_lossy());
    tracing::debug!(
        path = %path.display(),
        channel = %context.channel,
        date = %context.date,
        "parsing log file"
    );

    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    // Logs may carry arbitrary non-UTF-8 bytes inside free-text
    // fields; decode permissively rather than aborting.
    let text = String::from_utf8_lossy(&bytes);
    let events = emlog_core::parse(&text, context.date)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    Ok((context.channel, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use emlog_core::{EventKind, UNKNOWN_CHANNEL};
    use tempfile::TempDir;

    fn write_log(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn groups_events_by_channel() {
        let dir = TempDir::new().unwrap();
        let rust = write_log(
            &dir,
            "bot_rust_20230115.log",
            b"[00:08:42] <nick> hello\n",
        );
        let ruby = write_log(
            &dir,
            "bot_ruby_20230116.log",
            b"[01:00:00] *** Joins: nick (user@host)\n",
        );

        let channels = convert_files(&[rust, ruby]).unwrap();

        assert_eq!(channels.len(), 2);
        assert_eq!(channels["rust"].len(), 1);
        assert_eq!(channels["ruby"].len(), 1);
        assert_eq!(
            channels["rust"][0].timestamp,
            NaiveDate::from_ymd_opt(2023, 1, 15)
                .unwrap()
                .and_hms_opt(0, 8, 42)
                .unwrap()
        );
    }

    #[test]
    fn concatenates_same_channel_in_argument_order() {
        let dir = TempDir::new().unwrap();
        let first = write_log(&dir, "bot_rust_20230115.log", b"[00:00:01] <a> one\n");
        let second = write_log(&dir, "bot_rust_20230116.log", b"[00:00:02] <b> two\n");

        let channels = convert_files(&[first, second]).unwrap();

        let events = &channels["rust"];
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].kind,
            EventKind::Message {
                nick: "a".to_string(),
                text: "one".to_string(),
            }
        );
        assert_eq!(
            events[1].kind,
            EventKind::Message {
                nick: "b".to_string(),
                text: "two".to_string(),
            }
        );
    }

    #[test]
    fn unconventional_name_lands_in_unknown_channel() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "garbage.log", b"[00:08:42] <nick> hello\n");

        let channels = convert_files(&[path]).unwrap();

        assert_eq!(channels.len(), 1);
        assert!(channels.contains_key(UNKNOWN_CHANNEL));
    }

    #[test]
    fn bad_line_aborts_the_batch() {
        let dir = TempDir::new().unwrap();
        let good = write_log(&dir, "bot_rust_20230115.log", b"[00:00:01] <a> fine\n");
        let bad = write_log(
            &dir,
            "bot_ruby_20230115.log",
            b"[00:00:01] <a> fine\nnot a log line\n",
        );

        let err = convert_files(&[good, bad]).unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("bot_ruby_20230115.log"), "{message}");
        assert!(message.contains("not a log line"), "{message}");
    }

    #[test]
    fn non_utf8_bytes_do_not_abort_parsing() {
        let dir = TempDir::new().unwrap();
        // Latin-1 'é' in the message text.
        let path = write_log(
            &dir,
            "bot_rust_20230115.log",
            b"[00:08:42] <nick> caf\xE9\n",
        );

        let channels = convert_files(&[path]).unwrap();

        let EventKind::Message { text, .. } = &channels["rust"][0].kind else {
            panic!("expected a message event");
        };
        assert!(text.starts_with("caf"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = convert_files(&[PathBuf::from("/nonexistent/bot_rust_20230115.log")])
            .unwrap_err();

        assert!(format!("{err:#}").contains("failed to read"));
    }

    #[test]
    fn json_output_is_channel_keyed() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, "bot_rust_20230115.log", b"[00:08:42] <nick> hello\n");

        let channels = convert_files(&[path]).unwrap();
        let json = serde_json::to_value(&channels).unwrap();

        assert_eq!(json["rust"][0]["type"], "message");
        assert_eq!(json["rust"][0]["nick"], "nick");
        assert_eq!(json["rust"][0]["timestamp"], "2023-01-15T00:08:42");
    }
}
