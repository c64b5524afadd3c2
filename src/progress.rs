//! Work-progress summarization: worked/remaining time and phase.
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

use chrono::NaiveDateTime;

use crate::session::WorkSession;

/// Coarse state of "now" relative to a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkPhase {
    Before,
    Working,
    Lunch,
    After,
}

/// Progress palette bucket for the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    Before,
    Early,
    Mid,
    Late,
    Finish,
    Paused,
}

/// Snapshot of work progress at a single instant
#[derive(Clone, Debug)]
pub struct ProgressSnapshot {
    pub session: WorkSession,
    pub total_ms: i64,
    pub worked_ms: i64,
    pub remaining_ms: i64,
    pub phase: WorkPhase,
}

/// Summarizes worked/remaining time and phase for a resolved session
///
/// Each segment contributes fully to worked or remaining when `now`
/// lies outside it, and is split at `now` otherwise. Phase precedence:
/// not-today or at/before start → `Before`; strictly inside the lunch
/// window → `Lunch`; otherwise `Working`; and at/after the session end
/// `After` overrides everything.
pub fn summarize(now: NaiveDateTime, session: &WorkSession) -> ProgressSnapshot {
    let total_ms: i64 = session.segments.iter().map(|s| s.duration_ms()).sum();

    let mut worked_ms: i64 = 0;
    let mut remaining_ms: i64 = 0;
    for segment in &session.segments {
        if now <= segment.start() {
            remaining_ms += segment.duration_ms();
        } else if now >= segment.end() {
            worked_ms += segment.duration_ms();
        } else {
            worked_ms += (now - segment.start()).num_milliseconds();
            remaining_ms += (segment.end() - now).num_milliseconds();
        }
    }

    let mut phase = if !session.is_today || now <= session.start {
        WorkPhase::Before
    } else if session
        .lunch
        .is_some_and(|window| now > window.start && now < window.end)
    {
        WorkPhase::Lunch
    } else {
        WorkPhase::Working
    };
    // End of day wins regardless of the branches above
    if now >= session.end {
        phase = WorkPhase::After;
    }

    ProgressSnapshot {
        session: session.clone(),
        total_ms,
        worked_ms: worked_ms.min(total_ms),
        remaining_ms: remaining_ms.max(0),
        phase,
    }
}

impl ProgressSnapshot {
    /// Worked share of the session as a percentage, clamped to [0, 100]
    pub fn percent(&self) -> f64 {
        if self.total_ms <= 0 {
            return 0.0;
        }
        (self.worked_ms as f64 / self.total_ms as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Palette bucket derived from percent and phase
    pub fn palette(&self) -> Palette {
        if self.phase == WorkPhase::Lunch {
            return Palette::Paused;
        }
        let percent = self.percent();
        if percent >= 90.0 {
            Palette::Finish
        } else if percent >= 70.0 {
            Palette::Late
        } else if percent >= 30.0 {
            Palette::Mid
        } else if percent > 0.0 {
            Palette::Early
        } else {
            Palette::Before
        }
    }

    /// Status line for the widget
    pub fn status_text(&self) -> &'static str {
        match self.phase {
            WorkPhase::Working => "专注搬砖中",
            WorkPhase::Lunch => "午休充电中",
            WorkPhase::After => "今日已完成",
            WorkPhase::Before => {
                if self.session.is_today {
                    "等待今日开工"
                } else {
                    "下一班次待命"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{LunchBreak, WeeklySchedule, build_session_for_date};
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use std::collections::HashSet;

    const HOUR_MS: i64 = 3_600_000;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn session(with_lunch: bool, today: bool) -> WorkSession {
        let schedule = WeeklySchedule {
            start: time(9, 0),
            end: time(18, 0),
            workdays: HashSet::from([Weekday::Fri]),
        };
        let lunch = LunchBreak {
            enabled: with_lunch,
            start: time(12, 0),
            end: time(13, 0),
        };
        let mut session =
            build_session_for_date(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), &schedule, &lunch)
                .unwrap();
        session.is_today = today;
        session
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap().and_time(time(h, m))
    }

    #[test]
    fn worked_plus_remaining_equals_total() {
        let session = session(true, true);
        for now in [at(9, 0), at(10, 30), at(12, 30), at(14, 0), at(18, 0)] {
            let snap = summarize(now, &session);
            assert_eq!(snap.worked_ms + snap.remaining_ms, snap.total_ms, "at {}", now);
        }
    }

    #[test]
    fn one_hour_worked_mid_morning() {
        let snap = summarize(at(10, 0), &session(false, true));
        assert_eq!(snap.total_ms, 9 * HOUR_MS);
        assert_eq!(snap.worked_ms, HOUR_MS);
        assert_eq!(snap.remaining_ms, 8 * HOUR_MS);
        assert_eq!(snap.phase, WorkPhase::Working);
    }

    #[test]
    fn lunch_time_does_not_count_as_work() {
        // 12:00-13:00 is carved out, so at 12:30 exactly 3h are worked.
        let snap = summarize(at(12, 30), &session(true, true));
        assert_eq!(snap.total_ms, 8 * HOUR_MS);
        assert_eq!(snap.worked_ms, 3 * HOUR_MS);
        assert_eq!(snap.remaining_ms, 5 * HOUR_MS);
        assert_eq!(snap.phase, WorkPhase::Lunch);
        assert_eq!(snap.palette(), Palette::Paused);
    }

    #[test]
    fn before_start_phase() {
        let snap = summarize(at(8, 0), &session(false, true));
        assert_eq!(snap.phase, WorkPhase::Before);
        assert_eq!(snap.worked_ms, 0);
    }

    #[test]
    fn future_day_session_is_before_even_mid_window() {
        // Session resolved for a later date: phase stays Before no
        // matter where "now" sits relative to the clock times.
        let snap = summarize(at(12, 30), &session(true, false));
        assert_eq!(snap.phase, WorkPhase::Before);
    }

    #[test]
    fn after_end_overrides_everything() {
        let snap = summarize(at(18, 0), &session(true, true));
        assert_eq!(snap.phase, WorkPhase::After);
        assert_eq!(snap.remaining_ms, 0);
        assert_eq!(snap.worked_ms, snap.total_ms);
    }

    #[test]
    fn palette_buckets() {
        let session = session(false, true);
        // 9h day: 10:00 → ~11%, 13:00 → ~44%, 16:00 → ~78%, 17:45 → ~97%
        assert_eq!(summarize(at(10, 0), &session).palette(), Palette::Early);
        assert_eq!(summarize(at(13, 0), &session).palette(), Palette::Mid);
        assert_eq!(summarize(at(16, 0), &session).palette(), Palette::Late);
        assert_eq!(summarize(at(17, 45), &session).palette(), Palette::Finish);
        assert_eq!(summarize(at(8, 0), &session).palette(), Palette::Before);
    }

    #[test]
    fn status_text_per_phase() {
        assert_eq!(summarize(at(10, 0), &session(false, true)).status_text(), "专注搬砖中");
        assert_eq!(summarize(at(12, 30), &session(true, true)).status_text(), "午休充电中");
        assert_eq!(summarize(at(19, 0), &session(false, true)).status_text(), "今日已完成");
        assert_eq!(summarize(at(8, 0), &session(false, true)).status_text(), "等待今日开工");
        assert_eq!(summarize(at(10, 0), &session(false, false)).status_text(), "下一班次待命");
    }
}
