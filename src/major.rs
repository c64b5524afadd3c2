//! Canonicalization of the fixed set of major holidays: next future
//! feed match or computed fallback date.
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

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::adjust::end_of_day;
use crate::feed::{
    EventKind, EventSource, HolidayEvent, classify_name, has_work_suffix, strip_suffix_markers,
};
use crate::lunar::LunarCalendar;

/// How a major holiday's fallback date is computed when the feed has no
/// matching event
#[derive(Clone, Copy, Debug)]
pub enum HolidayStrategy {
    /// Fixed Gregorian month/day
    Solar { month: u32, day: u32 },
    /// Lunar month/day via the lunar-calendar collaborator
    Lunar { month: u32, day: u32 },
    /// Custom algorithm (Qingming solar-term approximation)
    Special,
}

/// One entry of the fixed reference set
#[derive(Clone, Copy, Debug)]
pub struct MajorHoliday {
    pub name: &'static str,
    pub strategy: HolidayStrategy,
}

/// The reference set of major holidays, in traditional order
pub const MAJOR_HOLIDAYS: [MajorHoliday; 6] = [
    MajorHoliday { name: "元旦", strategy: HolidayStrategy::Solar { month: 1, day: 1 } },
    MajorHoliday { name: "春节", strategy: HolidayStrategy::Lunar { month: 1, day: 1 } },
    MajorHoliday { name: "清明", strategy: HolidayStrategy::Special },
    MajorHoliday { name: "端午", strategy: HolidayStrategy::Lunar { month: 5, day: 5 } },
    MajorHoliday { name: "中秋", strategy: HolidayStrategy::Lunar { month: 8, day: 15 } },
    MajorHoliday { name: "国庆", strategy: HolidayStrategy::Solar { month: 10, day: 1 } },
];

/// Qingming solar-term approximation
///
/// `day = floor(y * 0.2422 + c) - floor(y / 4)` in April, with
/// `y = year % 100` and a century-dependent constant `c`.
fn qingming(year: i32) -> Option<NaiveDate> {
    let c = if year <= 1999 { 5.59 } else { 4.81 };
    let y = year.rem_euclid(100);
    let day = (y as f64 * 0.2422 + c).floor() as i64 - (y / 4) as i64;
    NaiveDate::from_ymd_opt(year, 4, u32::try_from(day).ok()?)
}

/// Computes the fallback date for a holiday in a given year
///
/// Any conversion failure degrades to the year-start sentinel date.
fn compute_fallback(holiday: &MajorHoliday, year: i32, lunar: &dyn LunarCalendar) -> NaiveDate {
    let resolved = match holiday.strategy {
        HolidayStrategy::Solar { month, day } => NaiveDate::from_ymd_opt(year, month, day),
        HolidayStrategy::Lunar { month, day } => match lunar.solar_date(year, month, day) {
            Ok(date) => Some(date),
            Err(error) => {
                tracing::warn!(name = holiday.name, year, %error, "lunar fallback failed");
                None
            }
        },
        HolidayStrategy::Special => qingming(year),
    };
    resolved.unwrap_or_else(|| year_start(year))
}

fn year_start(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Finds the nearest future feed event for a reference holiday name
///
/// Candidates must contain the reference name and must not carry any
/// workday suffix marker, even alongside a rest marker. Among future
/// candidates, one carrying an explicit rest suffix is preferred;
/// otherwise the earliest unmarked future event is accepted.
fn find_next_event<'a>(
    now: NaiveDateTime,
    events: &'a [HolidayEvent],
    name: &str,
) -> Option<&'a HolidayEvent> {
    let mut candidates: Vec<&HolidayEvent> = events
        .iter()
        .filter(|event| {
            event.name.contains(name)
                && event.kind != EventKind::WorkdaySubstitution
                && !has_work_suffix(&event.name)
        })
        .collect();
    candidates.sort_by_key(|event| event.date);

    candidates
        .iter()
        .find(|event| end_of_day(event.date) > now && event.kind == EventKind::RestDay)
        .or_else(|| candidates.iter().find(|event| end_of_day(event.date) > now))
        .copied()
}

/// Produces the canonical upcoming date for every major holiday
///
/// Authoritative feed events win; a holiday absent from the feed gets a
/// synthesized `Custom` event computed for the current year, or the
/// next year when the current year's date has already passed. The
/// result is sorted ascending by date and the operation is idempotent.
pub fn ensure_major_holidays(
    now: NaiveDateTime,
    events: &[HolidayEvent],
    lunar: &dyn LunarCalendar,
) -> Vec<HolidayEvent> {
    let mut ensured: Vec<HolidayEvent> = Vec::with_capacity(MAJOR_HOLIDAYS.len());

    for holiday in &MAJOR_HOLIDAYS {
        if let Some(found) = find_next_event(now, events, holiday.name) {
            let clean_name = strip_suffix_markers(&found.name);
            let name = if clean_name.is_empty() {
                holiday.name.to_string()
            } else {
                clean_name
            };
            ensured.push(HolidayEvent {
                kind: classify_name(&name),
                name,
                ..found.clone()
            });
            continue;
        }

        let mut year = now.year();
        let mut fallback = compute_fallback(holiday, year, lunar);
        if end_of_day(fallback) < now {
            year += 1;
            fallback = compute_fallback(holiday, year, lunar);
        }
        ensured.push(HolidayEvent {
            id: format!("{}-{}", holiday.name, year),
            name: holiday.name.to_string(),
            date: fallback,
            kind: EventKind::Plain,
            source: EventSource::Custom,
        });
    }

    ensured.sort_by_key(|event| event.date);
    ensured
}
