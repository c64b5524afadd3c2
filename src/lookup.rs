//! Date classification lookup built from holiday feed events.
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

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::feed::{EventKind, HolidayEvent};

/// Explicit classification of a single date
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayMark {
    /// Mandatory work day (workday substitution)
    Work,
    /// Holiday / rest day
    Rest,
}

/// Date → work/rest classification derived from the active event set
///
/// A `Work` mark always wins over `Rest` for the same date: a workday
/// substitution must override any holiday-name event landing on that
/// date, and a later holiday entry must never flip it back.
pub struct HolidayLookup {
    marks: HashMap<NaiveDate, DayMark>,
}

impl HolidayLookup {
    /// Builds the lookup by scanning the event list once
    pub fn from_events(events: &[HolidayEvent]) -> Self {
        let mut marks: HashMap<NaiveDate, DayMark> = HashMap::new();
        for event in events {
            match event.kind {
                EventKind::WorkdaySubstitution => {
                    marks.insert(event.date, DayMark::Work);
                }
                // First rest mark wins unless a work mark exists
                _ => {
                    marks.entry(event.date).or_insert(DayMark::Rest);
                }
            }
        }
        Self { marks }
    }

    /// Whether the given date is a non-working day
    ///
    /// An explicit mark decides; unmarked dates default to non-working
    /// iff they fall on a weekend.
    pub fn is_non_working_day(&self, date: NaiveDate) -> bool {
        match self.marks.get(&date) {
            Some(DayMark::Work) => false,
            Some(DayMark::Rest) => true,
            None => matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{EventSource, classify_name};

    fn event(name: &str, y: i32, m: u32, d: u32) -> HolidayEvent {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        HolidayEvent {
            id: format!("{}-{}", name, date),
            name: name.to_string(),
            date,
            kind: classify_name(name),
            source: EventSource::Feed,
        }
    }

    #[test]
    fn unmarked_weekend_is_non_working() {
        let lookup = HolidayLookup::from_events(&[]);
        // 2024-05-11 Saturday, 2024-05-12 Sunday, 2024-05-10 Friday
        assert!(lookup.is_non_working_day(NaiveDate::from_ymd_opt(2024, 5, 11).unwrap()));
        assert!(lookup.is_non_working_day(NaiveDate::from_ymd_opt(2024, 5, 12).unwrap()));
        assert!(!lookup.is_non_working_day(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()));
    }

    #[test]
    fn work_mark_dominates_rest_on_same_date() {
        // A holiday name and a substitution marker on the same date, in
        // both orders: work must win.
        for events in [
            vec![event("春节(班)", 2024, 2, 4), event("某节日", 2024, 2, 4)],
            vec![event("某节日", 2024, 2, 4), event("春节(班)", 2024, 2, 4)],
        ] {
            let lookup = HolidayLookup::from_events(&events);
            assert!(!lookup.is_non_working_day(NaiveDate::from_ymd_opt(2024, 2, 4).unwrap()));
        }
    }

    #[test]
    fn compensatory_sunday_works_and_festival_rests() {
        // 2024-02-04 is a Sunday made into a workday; 2024-02-12 is a
        // Spring Festival rest day.
        let events = vec![event("春节(班)", 2024, 2, 4), event("春节(休)", 2024, 2, 12)];
        let lookup = HolidayLookup::from_events(&events);
        assert!(!lookup.is_non_working_day(NaiveDate::from_ymd_opt(2024, 2, 4).unwrap()));
        assert!(lookup.is_non_working_day(NaiveDate::from_ymd_opt(2024, 2, 12).unwrap()));
    }

    #[test]
    fn plain_holiday_marks_weekday_as_rest() {
        let events = vec![event("元旦", 2024, 1, 1)];
        let lookup = HolidayLookup::from_events(&events);
        // 2024-01-01 is a Monday
        assert!(lookup.is_non_working_day(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    }
}
