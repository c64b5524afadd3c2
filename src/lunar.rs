//! Lunar-calendar collaborator interface and the built-in table-backed
//! provider.
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

use chrono::{Days, NaiveDate};
use thiserror::Error;

/// Failure of the lunar conversion collaborator
///
/// Never propagated out of the core: call sites degrade to the
/// year-start sentinel date or an empty label.
#[derive(Debug, Error)]
pub enum LunarError {
    #[error("year {0} outside the supported lunar range")]
    OutOfRange(i32),
    #[error("lunar conversion unsupported for month {month} day {day}")]
    Unsupported { month: u32, day: u32 },
    #[error("no lunar label tabulated for {0}")]
    Uncovered(NaiveDate),
}

/// Conversion from lunar calendar dates to Gregorian dates
pub trait LunarCalendar {
    /// Gregorian date of the given lunar year/month/day
    fn solar_date(&self, year: i32, month: u32, day: u32) -> Result<NaiveDate, LunarError>;

    /// Human lunar label for a Gregorian date, e.g. "腊月初八"
    fn lunar_label(&self, date: NaiveDate) -> Result<String, LunarError>;
}

/// Table-backed provider covering the lunar dates the widget needs
///
/// The three major-holiday lunar anchors (1/1, 5/5, 8/15) are tabulated
/// for 2024 through 2030. Each anchor also pins down its whole lunar
/// month: every lunar month has at least 29 days, so days 1..=29 around
/// an anchor carry a certain label. Dates outside those windows have no
/// label.
// TODO: replace the table with a proper lunisolar conversion crate so
// arbitrary lunar dates and labels work.
#[derive(Clone, Copy, Debug, Default)]
pub struct LunarTable;

const LUNAR_MONTH_NAMES: [&str; 12] = [
    "正月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "冬月", "腊月",
];

const LUNAR_DAY_NAMES: [&str; 29] = [
    "初一", "初二", "初三", "初四", "初五", "初六", "初七", "初八", "初九", "初十",
    "十一", "十二", "十三", "十四", "十五", "十六", "十七", "十八", "十九", "二十",
    "廿一", "廿二", "廿三", "廿四", "廿五", "廿六", "廿七", "廿八", "廿九",
];

/// (year, lunar month, lunar day) → Gregorian (month, day)
const LUNAR_ANCHORS: [(i32, u32, u32, u32, u32); 21] = [
    (2024, 1, 1, 2, 10),
    (2024, 5, 5, 6, 10),
    (2024, 8, 15, 9, 17),
    (2025, 1, 1, 1, 29),
    (2025, 5, 5, 5, 31),
    (2025, 8, 15, 10, 6),
    (2026, 1, 1, 2, 17),
    (2026, 5, 5, 6, 19),
    (2026, 8, 15, 9, 25),
    (2027, 1, 1, 2, 6),
    (2027, 5, 5, 6, 9),
    (2027, 8, 15, 9, 15),
    (2028, 1, 1, 1, 26),
    (2028, 5, 5, 5, 28),
    (2028, 8, 15, 10, 3),
    (2029, 1, 1, 2, 13),
    (2029, 5, 5, 6, 16),
    (2029, 8, 15, 9, 22),
    (2030, 1, 1, 2, 3),
    (2030, 5, 5, 6, 5),
    (2030, 8, 15, 9, 12),
];

impl LunarCalendar for LunarTable {
    fn solar_date(&self, year: i32, month: u32, day: u32) -> Result<NaiveDate, LunarError> {
        let (first, last) = match (LUNAR_ANCHORS.first(), LUNAR_ANCHORS.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => return Err(LunarError::OutOfRange(year)),
        };
        if year < first || year > last {
            return Err(LunarError::OutOfRange(year));
        }
        LUNAR_ANCHORS
            .iter()
            .find(|(y, m, d, _, _)| *y == year && *m == month && *d == day)
            .and_then(|(y, _, _, gm, gd)| NaiveDate::from_ymd_opt(*y, *gm, *gd))
            .ok_or(LunarError::Unsupported { month, day })
    }

    fn lunar_label(&self, date: NaiveDate) -> Result<String, LunarError> {
        for (year, lunar_month, lunar_day, month, day) in &LUNAR_ANCHORS {
            let Some(anchor) = NaiveDate::from_ymd_opt(*year, *month, *day) else {
                continue;
            };
            let Some(month_start) = anchor.checked_sub_days(Days::new(u64::from(lunar_day - 1)))
            else {
                continue;
            };
            let offset = (date - month_start).num_days();
            // Day 30 exists only in long months, so it is never claimed
            if !(0..29).contains(&offset) {
                continue;
            }
            let Some(month_name) = LUNAR_MONTH_NAMES.get(*lunar_month as usize - 1) else {
                continue;
            };
            return Ok(format!("{}{}", month_name, LUNAR_DAY_NAMES[offset as usize]));
        }
        Err(LunarError::Uncovered(date))
    }
}
