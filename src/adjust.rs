//! Holiday-adjustment rules for shifting dates off non-working days.
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

use chrono::{NaiveDate, NaiveDateTime};

use crate::lookup::HolidayLookup;

/// Search bound for every day-by-day scan. Guards against pathological
/// lookup data such as an entire month marked non-working; exceeding it
/// degrades to a best-effort date rather than an error.
const SEARCH_BOUND_DAYS: u32 = 31;

/// Policy for resolving a nominal date that lands on a non-working day
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HolidayRule {
    /// Keep the nominal date unchanged
    #[default]
    Ignore,
    /// First working day at or after the nominal date
    Delay,
    /// First working day at or before the nominal date
    Advance,
    /// Nearest working day in either direction; ties go to the
    /// preceding day
    Nearest,
}

impl HolidayRule {
    /// Parses a configuration token; unknown tokens yield `None` so the
    /// settings boundary can substitute its default
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ignore" => Some(Self::Ignore),
            "delay" => Some(Self::Delay),
            "advance" => Some(Self::Advance),
            "nearest" => Some(Self::Nearest),
            _ => None,
        }
    }
}

/// Applies a holiday rule to a calendar date
///
/// # Arguments
/// * `base` - nominal date to adjust
/// * `rule` - adjustment policy
/// * `lookup` - work/rest classification for explicit overrides
///
/// # Returns
/// * Adjusted date. Every scan is bounded to 31 days; when the bound is
///   exhausted the last scanned date (for `Delay`/`Advance`) or `base`
///   (for `Nearest`) is returned as a best-effort result.
pub fn adjust(base: NaiveDate, rule: HolidayRule, lookup: &HolidayLookup) -> NaiveDate {
    match rule {
        HolidayRule::Ignore => base,
        HolidayRule::Delay => {
            let mut cursor = base;
            for _ in 0..SEARCH_BOUND_DAYS {
                if !lookup.is_non_working_day(cursor) {
                    return cursor;
                }
                cursor = cursor.succ_opt().unwrap_or(cursor);
            }
            cursor
        }
        HolidayRule::Advance => {
            let mut cursor = base;
            for _ in 0..SEARCH_BOUND_DAYS {
                if !lookup.is_non_working_day(cursor) {
                    return cursor;
                }
                cursor = cursor.pred_opt().unwrap_or(cursor);
            }
            cursor
        }
        HolidayRule::Nearest => {
            if !lookup.is_non_working_day(base) {
                return base;
            }
            let prev = seek_working_day(base, lookup, false);
            let next = seek_working_day(base, lookup, true);
            let diff_prev = (base - prev).num_days().abs();
            let diff_next = (next - base).num_days().abs();
            // Equal distance resolves to the preceding day
            if diff_prev <= diff_next { prev } else { next }
        }
    }
}

/// Scans outward from `date` (exclusive) for the first working day
///
/// Returns `date` itself when no working day exists within the bound.
fn seek_working_day(date: NaiveDate, lookup: &HolidayLookup, forward: bool) -> NaiveDate {
    let mut cursor = date;
    for _ in 0..SEARCH_BOUND_DAYS {
        cursor = if forward {
            cursor.succ_opt().unwrap_or(cursor)
        } else {
            cursor.pred_opt().unwrap_or(cursor)
        };
        if !lookup.is_non_working_day(cursor) {
            return cursor;
        }
    }
    date
}

/// Last representable instant of a calendar day in the reference zone
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999 is always constructible
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{EventSource, HolidayEvent, classify_name};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lookup_of(entries: &[(&str, NaiveDate)]) -> HolidayLookup {
        let events: Vec<HolidayEvent> = entries
            .iter()
            .map(|(name, d)| HolidayEvent {
                id: format!("{}-{}", name, d),
                name: name.to_string(),
                date: *d,
                kind: classify_name(name),
                source: EventSource::Feed,
            })
            .collect();
        HolidayLookup::from_events(&events)
    }

    #[test]
    fn ignore_is_identity() {
        let lookup = lookup_of(&[]);
        let sunday = date(2024, 5, 12);
        assert_eq!(adjust(sunday, HolidayRule::Ignore, &lookup), sunday);
    }

    #[test]
    fn delay_moves_to_next_monday() {
        let lookup = lookup_of(&[]);
        // 2024-05-11 Saturday → 2024-05-13 Monday
        assert_eq!(
            adjust(date(2024, 5, 11), HolidayRule::Delay, &lookup),
            date(2024, 5, 13)
        );
    }

    #[test]
    fn advance_moves_to_previous_friday() {
        let lookup = lookup_of(&[]);
        // 2024-05-11 Saturday → 2024-05-10 Friday
        assert_eq!(
            adjust(date(2024, 5, 11), HolidayRule::Advance, &lookup),
            date(2024, 5, 10)
        );
    }

    #[test]
    fn working_day_is_never_moved() {
        let lookup = lookup_of(&[]);
        let friday = date(2024, 5, 10);
        for rule in [HolidayRule::Delay, HolidayRule::Advance, HolidayRule::Nearest] {
            assert_eq!(adjust(friday, rule, &lookup), friday);
        }
    }

    #[test]
    fn nearest_tie_resolves_to_preceding_day() {
        let lookup = lookup_of(&[]);
        // 2024-05-12 Sunday: Friday and Monday are both... Friday is two
        // days back through Saturday, Monday one day forward, so Monday
        // wins here. A Saturday gives the true tie via the Sunday below.
        assert_eq!(
            adjust(date(2024, 5, 12), HolidayRule::Nearest, &lookup),
            date(2024, 5, 13)
        );
        // Sunday with adjacent Saturday marked working: both neighbours
        // one day away, preceding Saturday wins.
        let lookup = lookup_of(&[("补班(班)", date(2024, 5, 11))]);
        assert_eq!(
            adjust(date(2024, 5, 12), HolidayRule::Nearest, &lookup),
            date(2024, 5, 11)
        );
    }

    #[test]
    fn nearest_prefers_closer_side() {
        // Mark Mon..Wed as rest so Thursday is the nearest from Tuesday.
        let lookup = lookup_of(&[
            ("节(休)", date(2024, 5, 13)),
            ("节(休)", date(2024, 5, 14)),
            ("节(休)", date(2024, 5, 15)),
        ]);
        assert_eq!(
            adjust(date(2024, 5, 14), HolidayRule::Nearest, &lookup),
            date(2024, 5, 16)
        );
    }

    #[test]
    fn delay_exhausted_bound_returns_last_scanned_date() {
        // Mark 40 consecutive days as rest starting at a Monday.
        let mut entries = Vec::new();
        let mut d = date(2024, 7, 1);
        for _ in 0..40 {
            entries.push(("长假(休)", d));
            d = d.succ_opt().unwrap();
        }
        let lookup = lookup_of(&entries);
        let adjusted = adjust(date(2024, 7, 1), HolidayRule::Delay, &lookup);
        assert_eq!(adjusted, date(2024, 7, 1) + chrono::Days::new(31));
    }

    #[test]
    fn nearest_exhausted_bound_returns_base() {
        let mut entries = Vec::new();
        let mut d = date(2024, 6, 1);
        for _ in 0..90 {
            entries.push(("长假(休)", d));
            d = d.succ_opt().unwrap();
        }
        let lookup = lookup_of(&entries);
        let base = date(2024, 7, 15);
        assert_eq!(adjust(base, HolidayRule::Nearest, &lookup), base);
    }

    #[test]
    fn end_of_day_is_last_millisecond() {
        let eod = end_of_day(date(2024, 5, 10));
        assert_eq!(eod.format("%H:%M:%S%.3f").to_string(), "23:59:59.999");
    }
}
