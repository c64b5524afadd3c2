//! Work-session construction: weekly schedule, lunch carve-out and the
//! forward search for the next applicable session.
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

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Forward search bound for the next session. Assumes no schedule has a
/// gap longer than three weeks between workdays.
const SESSION_SEARCH_DAYS: u64 = 21;

/// User-configured weekly work schedule
///
/// `start < end` is not guaranteed; a day whose session would be empty
/// or inverted is skipped by the builder.
#[derive(Clone, Debug)]
pub struct WeeklySchedule {
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Non-empty after settings normalization
    pub workdays: HashSet<Weekday>,
}

/// User-configured lunch break
#[derive(Clone, Debug)]
pub struct LunchBreak {
    pub enabled: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for LunchBreak {
    fn default() -> Self {
        Self {
            enabled: false,
            start: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(13, 30, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// One contiguous work interval, half-open `[start, end)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkSegment {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl WorkSegment {
    /// Constructs a segment, rejecting zero or negative length
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        if end > start { Some(Self { start, end }) } else { None }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }
}

/// The lunch gap between the two segments of a split session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LunchWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// The full work interval for one calendar day
///
/// One or two chronological, non-overlapping segments; when `lunch` is
/// present it equals the gap between the two segments.
#[derive(Clone, Debug)]
pub struct WorkSession {
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub segments: Vec<WorkSegment>,
    pub lunch: Option<LunchWindow>,
    pub is_today: bool,
}

/// Builds the segmented session for a candidate date
///
/// # Returns
/// * `None` when the schedule is invalid for this date (`end <= start`)
/// * Otherwise a one-segment session, or a two-segment session when the
///   lunch window, clipped to the schedule, lies strictly inside it with
///   positive duration. A rejected lunch window (inverted, zero-length
///   or touching either schedule edge) falls back to the full day.
pub fn build_session_for_date(
    date: NaiveDate,
    schedule: &WeeklySchedule,
    lunch: &LunchBreak,
) -> Option<WorkSession> {
    let start = date.and_time(schedule.start);
    let end = date.and_time(schedule.end);
    if end <= start {
        return None;
    }

    let mut segments = vec![WorkSegment::new(start, end)?];
    let mut lunch_window = None;

    if lunch.enabled {
        let lunch_start_raw = date.and_time(lunch.start);
        let lunch_end_raw = date.and_time(lunch.end);

        if lunch_end_raw > lunch_start_raw {
            let lunch_start = lunch_start_raw.max(start);
            let lunch_end = lunch_end_raw.min(end);
            let intersects = lunch_start > start && lunch_end < end && lunch_end > lunch_start;
            if intersects {
                lunch_window = Some(LunchWindow { start: lunch_start, end: lunch_end });
                segments = [
                    WorkSegment::new(start, lunch_start),
                    WorkSegment::new(lunch_end, end),
                ]
                .into_iter()
                .flatten()
                .collect();
            }
        }
    }

    if segments.is_empty() {
        return None;
    }

    let session_start = segments.first()?.start();
    let session_end = segments.last()?.end();
    Some(WorkSession {
        date,
        start: session_start,
        end: session_end,
        segments,
        lunch: lunch_window,
        is_today: false,
    })
}

/// Finds the next applicable work session at or after `now`
///
/// Scans forward day by day, skipping non-workdays, days with an invalid
/// schedule, and today once its session has fully elapsed.
///
/// # Returns
/// * `None` when the workday set is empty or no session exists within
///   the 21-day search bound
pub fn find_next_session(
    now: NaiveDateTime,
    schedule: &WeeklySchedule,
    lunch: &LunchBreak,
) -> Option<WorkSession> {
    if schedule.workdays.is_empty() {
        return None;
    }
    for i in 0..SESSION_SEARCH_DAYS {
        let date = now.date().checked_add_days(Days::new(i))?;
        if !schedule.workdays.contains(&date.weekday()) {
            continue;
        }
        let Some(mut session) = build_session_for_date(date, schedule, lunch) else {
            continue;
        };
        session.is_today = date == now.date();
        if session.is_today && now >= session.end {
            // Today's session already elapsed, keep scanning
            continue;
        }
        return Some(session);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn weekday_schedule(start: (u32, u32), end: (u32, u32)) -> WeeklySchedule {
        WeeklySchedule {
            start: time(start.0, start.1),
            end: time(end.0, end.1),
            workdays: HashSet::from([
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ]),
        }
    }

    fn lunch(enabled: bool, start: (u32, u32), end: (u32, u32)) -> LunchBreak {
        LunchBreak {
            enabled,
            start: time(start.0, start.1),
            end: time(end.0, end.1),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn segment_rejects_non_positive_length() {
        let at = date(2024, 5, 10).and_time(time(9, 0));
        assert!(WorkSegment::new(at, at).is_none());
        assert!(WorkSegment::new(at, at - chrono::Duration::minutes(1)).is_none());
    }

    #[test]
    fn inverted_schedule_yields_no_session() {
        let schedule = weekday_schedule((18, 0), (9, 0));
        assert!(build_session_for_date(date(2024, 5, 10), &schedule, &LunchBreak::default()).is_none());
    }

    #[test]
    fn lunch_carves_two_segments() {
        let schedule = weekday_schedule((9, 0), (18, 0));
        let session = build_session_for_date(
            date(2024, 5, 10),
            &schedule,
            &lunch(true, (12, 0), (13, 0)),
        )
        .unwrap();
        assert_eq!(session.segments.len(), 2);
        assert_eq!(session.segments[0].duration_ms(), 3 * 3_600_000);
        assert_eq!(session.segments[1].duration_ms(), 5 * 3_600_000);
        let window = session.lunch.unwrap();
        assert_eq!(window.start.time(), time(12, 0));
        assert_eq!(window.end.time(), time(13, 0));
        assert_eq!(session.start.time(), time(9, 0));
        assert_eq!(session.end.time(), time(18, 0));
    }

    #[test]
    fn lunch_touching_schedule_edge_is_rejected() {
        let schedule = weekday_schedule((9, 0), (18, 0));
        // Lunch starting exactly at the schedule start is not strictly
        // inside, so the day stays a single segment.
        let session = build_session_for_date(
            date(2024, 5, 10),
            &schedule,
            &lunch(true, (9, 0), (10, 0)),
        )
        .unwrap();
        assert_eq!(session.segments.len(), 1);
        assert!(session.lunch.is_none());
    }

    #[test]
    fn inverted_lunch_is_rejected() {
        let schedule = weekday_schedule((9, 0), (18, 0));
        let session = build_session_for_date(
            date(2024, 5, 10),
            &schedule,
            &lunch(true, (13, 0), (12, 0)),
        )
        .unwrap();
        assert_eq!(session.segments.len(), 1);
        assert!(session.lunch.is_none());
    }

    #[test]
    fn lunch_outside_schedule_is_rejected() {
        let schedule = weekday_schedule((9, 0), (18, 0));
        let session = build_session_for_date(
            date(2024, 5, 10),
            &schedule,
            &lunch(true, (19, 0), (20, 0)),
        )
        .unwrap();
        assert_eq!(session.segments.len(), 1);
        assert!(session.lunch.is_none());
    }

    #[test]
    fn overlapping_lunch_is_clipped() {
        let schedule = weekday_schedule((9, 0), (18, 0));
        // Raw window 11:00-19:30 clips to 11:00-18:00; the clipped end
        // touches the schedule end, so the window is rejected.
        let session = build_session_for_date(
            date(2024, 5, 10),
            &schedule,
            &lunch(true, (11, 0), (19, 30)),
        )
        .unwrap();
        assert_eq!(session.segments.len(), 1);
    }

    #[test]
    fn finds_today_session_before_end() {
        // 2024-05-10 is a Friday
        let now = date(2024, 5, 10).and_time(time(10, 0));
        let schedule = weekday_schedule((9, 0), (18, 0));
        let session = find_next_session(now, &schedule, &LunchBreak::default()).unwrap();
        assert!(session.is_today);
        assert_eq!(session.date, date(2024, 5, 10));
    }

    #[test]
    fn skips_today_once_session_elapsed() {
        // Friday evening: next session is Monday.
        let now = date(2024, 5, 10).and_time(time(19, 0));
        let schedule = weekday_schedule((9, 0), (18, 0));
        let session = find_next_session(now, &schedule, &LunchBreak::default()).unwrap();
        assert!(!session.is_today);
        assert_eq!(session.date, date(2024, 5, 13));
    }

    #[test]
    fn skips_non_workdays() {
        // Saturday morning: next session is Monday.
        let now = date(2024, 5, 11).and_time(time(8, 0));
        let schedule = weekday_schedule((9, 0), (18, 0));
        let session = find_next_session(now, &schedule, &LunchBreak::default()).unwrap();
        assert_eq!(session.date, date(2024, 5, 13));
    }

    #[test]
    fn empty_workday_set_yields_none() {
        let mut schedule = weekday_schedule((9, 0), (18, 0));
        schedule.workdays.clear();
        let now = date(2024, 5, 10).and_time(time(10, 0));
        assert!(find_next_session(now, &schedule, &LunchBreak::default()).is_none());
    }

    #[test]
    fn invalid_schedule_yields_none_within_bound() {
        let schedule = weekday_schedule((18, 0), (9, 0));
        let now = date(2024, 5, 10).and_time(time(10, 0));
        assert!(find_next_session(now, &schedule, &LunchBreak::default()).is_none());
    }
}
