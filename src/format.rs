//! Millisecond-duration formatting for countdown display.
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

/// Sentinel shown when a countdown target has been reached or passed
const ARRIVED: &str = "已到达";
/// Sentinel for a compact duration of zero or less
const ZERO_MINUTES: &str = "0分";

const MS_PER_SECOND: i64 = 1_000;
const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Formats a millisecond delta as a full duration string with seconds
///
/// Decomposes into days/hours/minutes/seconds (never weeks or months).
/// Leading zero-valued units are omitted, but once any unit has been
/// emitted every smaller unit is emitted even when zero; seconds always
/// appear.
///
/// # Examples
/// * 1d 2h 30m 15s → "1天2小时30分15秒"
/// * exactly 2h    → "2小时0分0秒"
/// * `diff_ms <= 0` → "已到达"
pub fn format_duration(diff_ms: i64) -> String {
    if diff_ms <= 0 {
        return ARRIVED.to_string();
    }
    let total_seconds = diff_ms / MS_PER_SECOND;
    let days = total_seconds / SECONDS_PER_DAY;
    let hours = (total_seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_seconds % SECONDS_PER_MINUTE;

    let mut parts: Vec<String> = Vec::with_capacity(4);
    if days > 0 {
        parts.push(format!("{}天", days));
    }
    if hours > 0 || !parts.is_empty() {
        parts.push(format!("{}小时", hours));
    }
    if minutes > 0 || !parts.is_empty() {
        parts.push(format!("{}分", minutes));
    }
    parts.push(format!("{}秒", seconds));
    parts.concat()
}

/// Formats a millisecond delta as a compact hours/minutes string
///
/// Zero-valued units are omitted entirely; when the duration is shorter
/// than one minute the seconds are shown instead.
///
/// # Examples
/// * 2h 30m → "2小时30分"
/// * 45s    → "45秒"
/// * `ms <= 0` → "0分"
pub fn format_compact_duration(ms: i64) -> String {
    if ms <= 0 {
        return ZERO_MINUTES.to_string();
    }
    let total_seconds = ms / MS_PER_SECOND;
    let hours = total_seconds / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;

    let mut parts: Vec<String> = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(format!("{}小时", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}分", minutes));
    }
    if parts.is_empty() {
        parts.push(format!("{}秒", total_seconds % SECONDS_PER_MINUTE));
    }
    parts.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 3_600_000;
    const MINUTE_MS: i64 = 60_000;

    #[test]
    fn full_format_emits_all_units() {
        let ms = 24 * HOUR_MS + 2 * HOUR_MS + 30 * MINUTE_MS + 15_000;
        assert_eq!(format_duration(ms), "1天2小时30分15秒");
    }

    #[test]
    fn full_format_keeps_trailing_zero_units() {
        // Once hours are emitted, minutes must appear even when zero.
        assert_eq!(format_duration(2 * HOUR_MS), "2小时0分0秒");
    }

    #[test]
    fn full_format_seconds_only() {
        assert_eq!(format_duration(42_000), "42秒");
    }

    #[test]
    fn full_format_arrived_sentinel() {
        assert_eq!(format_duration(0), "已到达");
        assert_eq!(format_duration(-5_000), "已到达");
    }

    #[test]
    fn compact_format_omits_zero_units() {
        assert_eq!(format_compact_duration(2 * HOUR_MS + 30 * MINUTE_MS), "2小时30分");
        assert_eq!(format_compact_duration(2 * HOUR_MS), "2小时");
        assert_eq!(format_compact_duration(30 * MINUTE_MS), "30分");
    }

    #[test]
    fn compact_format_falls_back_to_seconds() {
        assert_eq!(format_compact_duration(45_000), "45秒");
    }

    #[test]
    fn compact_format_zero_sentinel() {
        assert_eq!(format_compact_duration(0), "0分");
        assert_eq!(format_compact_duration(-1), "0分");
    }
}
