//! iCalendar holiday feed ingestion and event classification.
//!
//! MIT License
//!
//! Copyright (c) 2026 66f94eae
//!
//! Permission is hereby granted, free of charge, to any person obtaining a copy
//! of this software and associated documentation files (the "Software"), to deal
//! in the Software without restriction, including without limitation the rights
//! to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//! copies of the Software, and to permit persons to whom the Software is
//! furnished to do so, subject to the following conditions:
//!
//! The above copyright notice and this permission notice shall be included in all
//! copies or substantial portions of the Software.
//!
//! THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//! IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//! FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//! AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//! LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//! OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//! SOFTWARE.

use std::{collections::HashSet, fs::File, io::{BufRead, BufReader, Cursor}, sync::Arc};

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use ical::property::Property;
use serde::{Deserialize, Serialize};

/// iCalendar property key for event summary
const KEY_SUMMARY: &str = "SUMMARY";
/// iCalendar property key for event start time
const KEY_DTSTART: &str = "DTSTART";
/// iCalendar property key for event uid
const KEY_UID: &str = "UID";

/// iCalendar datetime format: YYYYMMDDTHHMMSS
const DT_FMT: &str = "%Y%m%dT%H%M%S";
/// iCalendar all-day date format: YYYYMMDD
const DATE_FMT: &str = "%Y%m%d";

/// Fixed reference timezone for the whole process
pub const REFERENCE_TZ: Tz = chrono_tz::Asia::Shanghai;

/// Rest suffix markers in official feed names, e.g. "国庆节(休)"
const REST_SUFFIXES: [&str; 4] = ["(休)", "（休）", "(休）", "（休)"];
/// Workday-substitution suffix markers, e.g. "国庆节(班)"
const WORK_SUFFIXES: [&str; 4] = ["(班)", "（班）", "(班）", "（班)"];

/// Where a holiday event came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSource {
    /// Parsed from the synced iCalendar feed
    #[serde(rename = "ics")]
    Feed,
    /// Synthesized fallback for a major holiday missing from the feed
    #[serde(rename = "custom")]
    Custom,
}

/// Event classification, computed once from the raw name at ingestion
///
/// Official feeds publish workday substitutions (an otherwise non-working
/// day made into a mandatory work day) under the same calendar as the
/// holidays they compensate for, distinguished only by name markers.
/// Tagging each event here keeps the downstream lookup and canonicalizer
/// free of substring matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Name carries a workday marker ("班") without a rest marker
    WorkdaySubstitution,
    /// Name carries an explicit rest suffix ("(休)")
    RestDay,
    /// Plain holiday name, no suffix markers
    Plain,
}

/// A single holiday or workday-substitution record
///
/// Immutable once constructed; the active set is replaced wholesale on
/// each feed sync.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HolidayEvent {
    pub id: String,
    pub name: String,
    /// Calendar date in the reference timezone
    pub date: NaiveDate,
    pub kind: EventKind,
    pub source: EventSource,
}

/// Classifies an event name into its kind
///
/// A name counts as a workday substitution when it contains "班" but
/// neither "放假" nor "休"; a rest day when it carries a parenthesized
/// "休" suffix (mixed full/half-width brackets accepted); plain otherwise.
pub fn classify_name(name: &str) -> EventKind {
    if name.contains("班") && !name.contains("放假") && !name.contains("休") {
        EventKind::WorkdaySubstitution
    } else if REST_SUFFIXES.iter().any(|suffix| name.contains(suffix)) {
        EventKind::RestDay
    } else {
        EventKind::Plain
    }
}

/// Whether the name carries a workday suffix marker, regardless of any
/// rest marker alongside it
///
/// A double-marked name such as "国庆节(休)(班)" classifies as a rest
/// day, but it still names a work obligation and must not be treated as
/// a plain holiday candidate.
pub fn has_work_suffix(name: &str) -> bool {
    WORK_SUFFIXES.iter().any(|suffix| name.contains(suffix))
}

/// Removes rest/workday suffix markers from a display name
///
/// # Returns
/// * Trimmed name with all "(休)"/"(班)" variants removed; may be empty
pub fn strip_suffix_markers(name: &str) -> String {
    let mut cleaned = name.to_string();
    for suffix in REST_SUFFIXES.iter().chain(WORK_SUFFIXES.iter()) {
        cleaned = cleaned.replace(suffix, "");
    }
    cleaned.trim().to_string()
}

/// Fetches and parses all configured feed sources
///
/// # Arguments
/// * `sources` - http(s) URLs or local file paths
///
/// # Returns
/// * Deduplicated events from every reachable source, sorted by date.
///   Unreachable sources contribute nothing; this is a best-effort sync.
pub async fn fetch_sources(sources: &[String]) -> Vec<HolidayEvent> {
    let client = reqwest::Client::new();
    let client = Arc::new(client);

    let tasks = sources.iter().map(|uri| {
        let client = Arc::clone(&client);
        async move {
            if uri.starts_with("http") {
                // Fetch from remote URL
                if let Ok(resp) = client.get(uri).send().await {
                    if let Ok(bytes) = resp.bytes().await {
                        return parse_feed(Cursor::new(bytes));
                    }
                }
                tracing::warn!(%uri, "holiday feed unreachable, skipping source");
                Vec::new()
            } else {
                // Read from local file
                if let Ok(file) = File::open(uri) {
                    return parse_feed(BufReader::new(file));
                }
                tracing::warn!(%uri, "holiday feed file missing, skipping source");
                Vec::new()
            }
        }
    });

    let mut all_events = Vec::new();
    for task in tasks {
        all_events.extend(task.await);
    }
    normalize_events(all_events)
}

/// Parses raw iCalendar text into holiday events
///
/// Entries missing a summary or an unparseable DTSTART are dropped
/// silently (logged at debug level). The result is deduplicated by
/// `(name, date)` keeping the last occurrence, then sorted by date.
pub fn parse_feed<T: BufRead>(reader: T) -> Vec<HolidayEvent> {
    let mut events = Vec::new();
    let parser = ical::IcalParser::new(reader);

    for calendar in parser.flatten() {
        for event in calendar.events {
            let mut summary: Option<String> = None;
            let mut date: Option<NaiveDate> = None;
            let mut uid: Option<String> = None;

            for prop in event.properties {
                match prop.name.as_str() {
                    KEY_SUMMARY => summary = prop.value.clone(),
                    KEY_UID => uid = prop.value.clone(),
                    KEY_DTSTART => date = parse_event_date(&prop),
                    _ => {}
                }
            }

            let (Some(name), Some(date)) = (summary, date) else {
                tracing::debug!("dropping feed entry without summary or valid date");
                continue;
            };

            let id = uid.unwrap_or_else(|| format!("{}-{}", name, date));
            let kind = classify_name(&name);
            events.push(HolidayEvent {
                id,
                name,
                date,
                kind,
                source: EventSource::Feed,
            });
        }
    }
    normalize_events(events)
}

/// Deduplicates by `(name, date)` keeping the last occurrence, then sorts
/// ascending by date
fn normalize_events(events: Vec<HolidayEvent>) -> Vec<HolidayEvent> {
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();
    let mut kept: Vec<HolidayEvent> = Vec::with_capacity(events.len());
    for event in events.into_iter().rev() {
        if seen.insert((event.name.clone(), event.date)) {
            kept.push(event);
        }
    }
    kept.reverse();
    kept.sort_by_key(|event| event.date);
    kept
}

/// Resolves a DTSTART property to a calendar date in the reference zone
///
/// # Supported Formats
/// * YYYYMMDD (all-day events)
/// * YYYYMMDDTHHMMSS (treated as reference-zone local time)
/// * YYYYMMDDTHHMMSSZ (UTC, converted to the reference zone)
/// * YYYYMMDDTHHMMSS with TZID parameter
fn parse_event_date(prop: &Property) -> Option<NaiveDate> {
    let value = prop.value.as_ref()?.to_uppercase();

    if value.len() == 8 {
        // All-day event: YYYYMMDD
        return NaiveDate::parse_from_str(&value, DATE_FMT).ok();
    }

    if let Some(utc_value) = value.strip_suffix('Z') {
        let dt = NaiveDateTime::parse_from_str(utc_value, DT_FMT).ok()?;
        return Some(
            Utc.from_utc_datetime(&dt)
                .with_timezone(&REFERENCE_TZ)
                .date_naive(),
        );
    }

    let dt = NaiveDateTime::parse_from_str(&value, DT_FMT).ok()?;

    // Honor an explicit TZID parameter when present
    if let Some(params) = &prop.params {
        for (name, field) in params {
            if name.to_uppercase() == "TZID" && !field.is_empty() {
                let tz: Tz = field[0].parse().ok()?;
                let local = match tz.from_local_datetime(&dt) {
                    chrono::offset::LocalResult::Single(local) => local,
                    chrono::offset::LocalResult::Ambiguous(early, _) => early,
                    chrono::offset::LocalResult::None => return None,
                };
                return Some(local.with_timezone(&REFERENCE_TZ).date_naive());
            }
        }
    }

    // No timezone information: already reference-zone local time
    Some(dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn classify_workday_substitution() {
        assert_eq!(classify_name("春节(班)"), EventKind::WorkdaySubstitution);
        assert_eq!(classify_name("国庆节 补班"), EventKind::WorkdaySubstitution);
    }

    #[test]
    fn classify_rest_suffix_wins_over_workday_token() {
        // "休" anywhere in the name disqualifies the workday reading.
        assert_eq!(classify_name("春节(休)"), EventKind::RestDay);
        assert_eq!(classify_name("春节（休）"), EventKind::RestDay);
    }

    #[test]
    fn classify_plain_name() {
        assert_eq!(classify_name("中秋节"), EventKind::Plain);
        assert_eq!(classify_name("春节 放假 补班"), EventKind::Plain);
    }

    #[test]
    fn work_suffix_detected_alongside_rest_marker() {
        assert!(has_work_suffix("国庆节(班)"));
        assert!(has_work_suffix("国庆节(休)(班)"));
        assert!(has_work_suffix("国庆节（班）"));
        assert!(!has_work_suffix("国庆节(休)"));
        assert!(!has_work_suffix("上班族节"));
    }

    #[test]
    fn strip_markers_both_bracket_widths() {
        assert_eq!(strip_suffix_markers("国庆节(休)"), "国庆节");
        assert_eq!(strip_suffix_markers("国庆节（班）"), "国庆节");
        assert_eq!(strip_suffix_markers("(休)"), "");
    }

    #[test]
    fn parse_feed_basic_event() {
        let ics = "BEGIN:VCALENDAR\r\n\
                   BEGIN:VEVENT\r\n\
                   UID:abc-123\r\n\
                   SUMMARY:元旦(休)\r\n\
                   DTSTART:20240101\r\n\
                   END:VEVENT\r\n\
                   END:VCALENDAR\r\n";
        let events = parse_feed(Cursor::new(ics.as_bytes()));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "abc-123");
        assert_eq!(events[0].name, "元旦(休)");
        assert_eq!(events[0].date, date(2024, 1, 1));
        assert_eq!(events[0].kind, EventKind::RestDay);
        assert_eq!(events[0].source, EventSource::Feed);
    }

    #[test]
    fn parse_feed_drops_entry_without_summary() {
        let ics = "BEGIN:VCALENDAR\r\n\
                   BEGIN:VEVENT\r\n\
                   DTSTART:20240101\r\n\
                   END:VEVENT\r\n\
                   END:VCALENDAR\r\n";
        assert!(parse_feed(Cursor::new(ics.as_bytes())).is_empty());
    }

    #[test]
    fn parse_feed_drops_entry_with_bad_date() {
        let ics = "BEGIN:VCALENDAR\r\n\
                   BEGIN:VEVENT\r\n\
                   SUMMARY:元旦\r\n\
                   DTSTART:NOTADATE\r\n\
                   END:VEVENT\r\n\
                   END:VCALENDAR\r\n";
        assert!(parse_feed(Cursor::new(ics.as_bytes())).is_empty());
    }

    #[test]
    fn dedup_keeps_last_occurrence_and_sorts() {
        let make = |name: &str, d: NaiveDate, id: &str| HolidayEvent {
            id: id.to_string(),
            name: name.to_string(),
            date: d,
            kind: classify_name(name),
            source: EventSource::Feed,
        };
        let events = vec![
            make("元旦", date(2024, 1, 1), "first"),
            make("春节", date(2024, 2, 10), "b"),
            make("元旦", date(2024, 1, 1), "last"),
        ];
        let normalized = normalize_events(events);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].id, "last");
        assert_eq!(normalized[1].name, "春节");
    }

    #[test]
    fn event_date_from_utc_datetime() {
        let prop = Property {
            name: KEY_DTSTART.to_string(),
            // 2024-01-01 20:00 UTC is already 2024-01-02 in Asia/Shanghai
            value: Some("20240101T200000Z".to_string()),
            params: None,
        };
        assert_eq!(parse_event_date(&prop), Some(date(2024, 1, 2)));
    }
}
