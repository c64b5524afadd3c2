//! TOML configuration: schedule, lunch break, salary and calendar
//! sources, with normalization at the settings boundary.
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

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, de::{Error, Visitor}};

use crate::adjust::HolidayRule;
use crate::payday::SalarySettings;
use crate::session::{LunchBreak, WeeklySchedule};

/// Time-of-day format used throughout the configuration
const TIME_FMT: &str = "%H:%M";

/// Default schedule bounds
const DEFAULT_START: (u32, u32) = (9, 0);
const DEFAULT_END: (u32, u32) = (18, 0);

/// Main configuration structure
///
/// Every section is optional; accessors normalize missing or invalid
/// values to defaults before the core algorithms ever see them.
#[derive(Deserialize, Clone, Default)]
pub struct Conf {
    schedule: Option<Schedule>,
    lunch: Option<Lunch>,
    salary: Option<Salary>,
    calendar: Option<Calendar>,
}

/// Weekly schedule section
#[derive(Deserialize, Clone)]
struct Schedule {
    /// "HH:mm"
    start: Option<String>,
    /// "HH:mm"
    end: Option<String>,
    /// Workdays as "1-5", "1,3,5" or "1,3-5" (Monday=1 .. Sunday=7)
    #[serde(default, deserialize_with = "deserialize_workday")]
    workday: Option<HashSet<Weekday>>,
}

/// Lunch break section
#[derive(Deserialize, Clone)]
struct Lunch {
    enabled: Option<bool>,
    start: Option<String>,
    end: Option<String>,
}

/// Salary section
#[derive(Deserialize, Clone)]
struct Salary {
    /// Target day of month, clamped into 1..=31
    day: Option<u32>,
    /// "ignore" | "delay" | "advance" | "nearest"; unknown tokens fall
    /// back to the default rule
    rule: Option<String>,
}

/// Calendar feed section
#[derive(Deserialize, Clone)]
struct Calendar {
    /// iCalendar source URLs or local file paths
    source: Option<Vec<String>>,
    /// Path of the local JSON event cache
    cache: Option<String>,
}

impl Conf {
    /// Normalized weekly schedule
    ///
    /// Missing or unparseable times fall back to 09:00–18:00; an empty
    /// workday set falls back to Monday–Friday.
    pub fn schedule(&self) -> WeeklySchedule {
        let section = self.schedule.as_ref();
        let workdays = section
            .and_then(|s| s.workday.clone())
            .filter(|days| !days.is_empty())
            .unwrap_or_else(default_workdays);
        WeeklySchedule {
            start: parse_time(section.and_then(|s| s.start.as_deref()), DEFAULT_START),
            end: parse_time(section.and_then(|s| s.end.as_deref()), DEFAULT_END),
            workdays,
        }
    }

    /// Normalized lunch break; disabled 12:00–13:30 when absent
    pub fn lunch(&self) -> LunchBreak {
        let default = LunchBreak::default();
        let Some(section) = self.lunch.as_ref() else {
            return default;
        };
        LunchBreak {
            enabled: section.enabled.unwrap_or(default.enabled),
            start: section
                .start
                .as_deref()
                .and_then(|s| NaiveTime::parse_from_str(s, TIME_FMT).ok())
                .unwrap_or(default.start),
            end: section
                .end
                .as_deref()
                .and_then(|s| NaiveTime::parse_from_str(s, TIME_FMT).ok())
                .unwrap_or(default.end),
        }
    }

    /// Normalized salary settings; day clamped into 1..=31
    pub fn salary(&self) -> SalarySettings {
        let default = SalarySettings::default();
        let Some(section) = self.salary.as_ref() else {
            return default;
        };
        SalarySettings {
            day: section.day.unwrap_or(default.day).clamp(1, 31),
            rule: section
                .rule
                .as_deref()
                .and_then(HolidayRule::from_token)
                .unwrap_or(default.rule),
        }
    }

    /// Configured iCalendar feed sources
    pub fn calendar_sources(&self) -> &[String] {
        self.calendar
            .as_ref()
            .and_then(|cal| cal.source.as_deref())
            .unwrap_or(&[])
    }

    /// Path of the local event cache, if configured
    pub fn cache_path(&self) -> Option<&str> {
        self.calendar.as_ref().and_then(|cal| cal.cache.as_deref())
    }
}

fn default_workdays() -> HashSet<Weekday> {
    HashSet::from([
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ])
}

fn parse_time(value: Option<&str>, fallback: (u32, u32)) -> NaiveTime {
    value
        .and_then(|s| NaiveTime::parse_from_str(s, TIME_FMT).ok())
        .or_else(|| NaiveTime::from_hms_opt(fallback.0, fallback.1, 0))
        .unwrap_or(NaiveTime::MIN)
}

/// Deserializes a workday string into a set of weekdays
///
/// # Supported Formats
/// * Single days: "1", "2", "3"
/// * Day ranges: "1-5"
/// * Mixed formats: "1,3,5" or "1,3-5"
fn deserialize_workday<'de, D>(deserializer: D) -> Result<Option<HashSet<Weekday>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_str(WorkDayVisitor).map(Some)
}

/// Error message format for workday deserialization errors
const ERR_FMT: &str = "a workday string like '1-5' or '1,3,5' or '1,3-5' (numbers 1-7 only)";

struct WorkDayVisitor;

impl<'a> Visitor<'a> for WorkDayVisitor {
    type Value = HashSet<Weekday>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", &ERR_FMT)
    }

    /// # Examples
    /// * "1-5" → Mon..Fri
    /// * "1,3,5" → Mon, Wed, Fri
    /// * "1,3-5" → Mon, Wed, Thu, Fri
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if v.is_empty() {
            return Err(Error::invalid_length(0, &ERR_FMT));
        }
        let mut workdays: HashSet<Weekday> = HashSet::new();

        for day_spec in v.split(',') {
            match day_spec.parse::<u8>() {
                Ok(day) => {
                    workdays.insert(weekday_from_number(day)?);
                }
                Err(_) => {
                    let day_range: Vec<&str> = day_spec.split('-').collect();
                    if day_range.len() != 2 {
                        return Err(Error::invalid_type(
                            serde::de::Unexpected::Str(day_spec),
                            &ERR_FMT,
                        ));
                    }
                    match day_range[0]
                        .parse::<u8>()
                        .and_then(|a| day_range[1].parse::<u8>().map(|b| (a, b)))
                    {
                        Ok((start, end)) => {
                            for number in start.min(end)..=start.max(end) {
                                workdays.insert(weekday_from_number(number)?);
                            }
                        }
                        Err(_) => {
                            return Err(Error::invalid_type(
                                serde::de::Unexpected::Str(day_spec),
                                &ERR_FMT,
                            ));
                        }
                    }
                }
            }
        }
        Ok(workdays)
    }
}

/// Maps an ISO weekday number (Monday=1 .. Sunday=7) to `Weekday`
fn weekday_from_number<E>(number: u8) -> Result<Weekday, E>
where
    E: serde::de::Error,
{
    if !(1..=7).contains(&number) {
        return Err(Error::invalid_value(
            serde::de::Unexpected::Unsigned(number as u64),
            &"numbers 1-7 only",
        ));
    }
    Weekday::try_from(number - 1).map_err(|_| {
        Error::invalid_value(serde::de::Unexpected::Unsigned(number as u64), &ERR_FMT)
    })
}
