//! Next-payday resolution with day-of-month clamping and holiday
//! adjustment.
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

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::adjust::{HolidayRule, adjust, end_of_day};
use crate::lookup::HolidayLookup;

/// How many months ahead to search before giving up
const PAYDAY_HORIZON_MONTHS: u32 = 18;

/// Fixed reference time-of-day a payday is anchored at, for stable
/// comparison against "now"
const PAY_ANCHOR_HOUR: u32 = 9;

/// Payday configuration
#[derive(Clone, Copy, Debug)]
pub struct SalarySettings {
    /// Target day of month, 1..=31; clamped to each month's length
    pub day: u32,
    pub rule: HolidayRule,
}

impl Default for SalarySettings {
    fn default() -> Self {
        Self { day: 10, rule: HolidayRule::Ignore }
    }
}

/// A resolved payday: the nominal (clamped) date and the rule-adjusted
/// actual date, both anchored at 09:00
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payday {
    pub nominal: NaiveDateTime,
    pub actual: NaiveDateTime,
}

/// Display fields derived from a resolved payday
#[derive(Clone, Debug)]
pub struct PaydayOutlook {
    pub diff_days: i64,
    /// ISO date plus Chinese weekday, e.g. "2024-05-10 星期五"
    pub date_text: String,
    /// "YYYY-MM-DD HH:MM"
    pub exact_time: String,
    pub message: String,
    /// Within three days
    pub is_soon: bool,
}

/// Anchors the clamped day-of-month of a target month at 09:00
fn clamp_day(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days_in_month = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())?;
    let date = NaiveDate::from_ymd_opt(year, month, day.min(days_in_month))?;
    let anchor = NaiveTime::from_hms_opt(PAY_ANCHOR_HOUR, 0, 0)?;
    Some(date.and_time(anchor))
}

/// Finds the next payday strictly after `now`
///
/// Iterates month by month up to the 18-month horizon, clamping the
/// configured day-of-month and applying the holiday rule. The first
/// candidate whose actual date's end-of-day lies strictly after `now`
/// wins.
///
/// # Returns
/// * `None` only when the horizon is exhausted; this does not occur
///   under valid inputs and is treated as a logic-invariant violation
///   in tests rather than a user-facing error.
pub fn next_payday(
    now: NaiveDateTime,
    salary: &SalarySettings,
    lookup: &HolidayLookup,
) -> Option<Payday> {
    for i in 0..PAYDAY_HORIZON_MONTHS {
        let target = now.date().checked_add_months(Months::new(i))?;
        let Some(nominal) = clamp_day(target.year(), target.month(), salary.day) else {
            continue;
        };
        let actual_date = adjust(nominal.date(), salary.rule, lookup);
        let actual = actual_date.and_time(nominal.time());
        if end_of_day(actual_date) > now {
            return Some(Payday { nominal, actual });
        }
    }
    None
}

/// Derives the widget display fields for a resolved payday
pub fn outlook(now: NaiveDateTime, payday: &Payday) -> PaydayOutlook {
    let diff_days = (payday.actual.date() - now.date()).num_days().max(0);
    let message = if diff_days == 0 {
        "今天就能到账！".to_string()
    } else {
        format!("距离发工资还有 {} 天", diff_days)
    };
    PaydayOutlook {
        diff_days,
        date_text: format!(
            "{} {}",
            payday.actual.format("%Y-%m-%d"),
            weekday_zh(payday.actual.weekday())
        ),
        exact_time: payday.actual.format("%Y-%m-%d %H:%M").to_string(),
        message,
        is_soon: diff_days <= 3,
    }
}

/// Chinese weekday name
pub fn weekday_zh(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}
