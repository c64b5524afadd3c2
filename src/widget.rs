//! Display aggregation: date header, work countdown and the major
//! holiday countdown rows.
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

use std::cell::RefCell;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::feed::HolidayEvent;
use crate::format::format_duration;
use crate::lunar::LunarCalendar;
use crate::major::ensure_major_holidays;
use crate::payday::weekday_zh;
use crate::session::{LunchBreak, WeeklySchedule, find_next_session};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Current date header values
#[derive(Clone, Debug)]
pub struct DateInfo {
    /// e.g. "2024年5月10日 星期五"
    pub date: String,
    /// "HH:MM:SS"
    pub time: String,
    /// Lunar label, empty when the provider cannot supply one
    pub lunar: String,
}

/// Countdown to the end of the next work session
#[derive(Clone, Debug)]
pub struct WorkCountdown {
    pub target_text: String,
    pub diff_ms: i64,
    pub text: String,
}

/// One row of the major-holiday countdown list
#[derive(Clone, Debug)]
pub struct HolidayCountdown {
    pub id: String,
    pub name: String,
    pub target_date: NaiveDate,
    pub diff_days: i64,
    pub diff_text: String,
}

/// Per-day memoization of the lunar label
///
/// The label only changes when the calendar day does, so it is cached
/// under the current date key and recomputed exactly when that key
/// changes.
#[derive(Default)]
pub struct LunarMemo {
    cache: RefCell<Option<(NaiveDate, String)>>,
}

impl LunarMemo {
    /// Returns the lunar label for `now`, consulting the provider only
    /// on a date change; provider failure degrades to an empty label
    pub fn label(&self, now: NaiveDateTime, lunar: &dyn LunarCalendar) -> String {
        let key = now.date();
        if let Some((cached_key, text)) = self.cache.borrow().as_ref() {
            if *cached_key == key {
                return text.clone();
            }
        }
        let text = match lunar.lunar_label(key) {
            Ok(text) => text.trim().to_string(),
            Err(error) => {
                tracing::debug!(%error, "lunar label unavailable");
                String::new()
            }
        };
        *self.cache.borrow_mut() = Some((key, text.clone()));
        text
    }
}

/// Builds the date header for the widget
pub fn current_date_info(
    now: NaiveDateTime,
    memo: &LunarMemo,
    lunar: &dyn LunarCalendar,
) -> DateInfo {
    DateInfo {
        date: format!(
            "{}年{}月{}日 {}",
            now.year(),
            now.month(),
            now.day(),
            weekday_zh(now.weekday())
        ),
        time: now.format("%H:%M:%S").to_string(),
        lunar: memo.label(now, lunar),
    }
}

/// Countdown to the end of the next applicable session
pub fn work_countdown(
    now: NaiveDateTime,
    schedule: &WeeklySchedule,
    lunch: &LunchBreak,
) -> Option<WorkCountdown> {
    let session = find_next_session(now, schedule, lunch)?;
    let diff_ms = (session.end - now).num_milliseconds();
    Some(WorkCountdown {
        target_text: session.end.format("%Y-%m-%d %H:%M:%S").to_string(),
        diff_ms,
        text: format_duration(diff_ms),
    })
}

/// Countdown rows for the canonical major holidays, sorted by date
pub fn major_holiday_countdowns(
    now: NaiveDateTime,
    events: &[HolidayEvent],
    lunar: &dyn LunarCalendar,
) -> Vec<HolidayCountdown> {
    ensure_major_holidays(now, events, lunar)
        .into_iter()
        .map(|event| {
            let target = event.date.and_time(chrono::NaiveTime::MIN);
            let diff_ms = (target - now).num_milliseconds();
            HolidayCountdown {
                id: event.id,
                name: event.name,
                target_date: event.date,
                diff_days: ((diff_ms as f64 / MS_PER_DAY).ceil() as i64).max(0),
                diff_text: format_duration(diff_ms),
            }
        })
        .collect()
}
