//! Desktop countdown widget engine: work session progress, payday and
//! major holiday countdowns.
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

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::feed::HolidayEvent;
use crate::lookup::HolidayLookup;
use crate::lunar::LunarTable;
use crate::progress::summarize;
use crate::session::find_next_session;
use crate::store::{JsonFileStore, KEY_HOLIDAY_EVENTS, KEY_HOLIDAY_SYNC_TIME, Storage};

mod adjust;
mod cli;
mod conf;
mod feed;
mod format;
mod lookup;
mod lunar;
mod major;
mod payday;
mod progress;
mod session;
mod store;
mod widget;

/// Default cache file next to the working directory when none is
/// configured
const DEFAULT_CACHE_PATH: &str = "moyuday-cache.json";

/// Main entry point for the countdown widget
///
/// # Usage Examples
/// ```bash
/// # Show the widget state for the current moment
/// moyuday -c config.toml
///
/// # Force a holiday feed sync
/// moyuday -c config.toml -s
///
/// # Evaluate a specific instant
/// moyuday -c config.toml -d 20241225143000
/// ```
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let conf = cli.conf();
    let now = cli.date();

    // Settings snapshot, normalized once at the boundary
    let schedule = conf.schedule();
    let lunch = conf.lunch();
    let salary = conf.salary();

    // Load the cached event set, syncing the feed when asked to or when
    // nothing has been synced yet
    let cache_path = conf.cache_path().unwrap_or(DEFAULT_CACHE_PATH);
    let mut cache = JsonFileStore::open(cache_path)?;
    let mut events: Vec<HolidayEvent> = store::get_or(&cache, KEY_HOLIDAY_EVENTS, Vec::new());
    if (events.is_empty() || cli.sync()) && !conf.calendar_sources().is_empty() {
        let fetched = feed::fetch_sources(conf.calendar_sources()).await;
        if !fetched.is_empty() {
            events = fetched;
            cache.set(KEY_HOLIDAY_EVENTS, serde_json::to_value(&events)?)?;
            cache.set(KEY_HOLIDAY_SYNC_TIME, serde_json::to_value(now.to_string())?)?;
        }
    }

    let lunar = LunarTable;
    let memo = widget::LunarMemo::default();

    let info = widget::current_date_info(now, &memo, &lunar);
    if info.lunar.is_empty() {
        println!("{} {}", info.date, info.time);
    } else {
        println!("{} {} {}", info.date, info.time, info.lunar);
    }

    // Work progress
    match find_next_session(now, &schedule, &lunch) {
        Some(session) => {
            let snapshot = summarize(now, &session);
            println!(
                "{} {:.0}% 已搬 {} / 剩余 {}",
                snapshot.status_text(),
                snapshot.percent(),
                format::format_compact_duration(snapshot.worked_ms),
                format::format_compact_duration(snapshot.remaining_ms),
            );
            if let Some(countdown) = widget::work_countdown(now, &schedule, &lunch) {
                println!("下班倒计时 {} ({})", countdown.text, countdown.target_text);
            }
        }
        None => println!("尚未配置工时"),
    }

    // Payday
    let lookup = HolidayLookup::from_events(&events);
    match payday::next_payday(now, &salary, &lookup) {
        Some(next) => {
            let view = payday::outlook(now, &next);
            println!("{} ({})", view.message, view.date_text);
        }
        None => println!("尚未配置发薪日"),
    }

    // Major holidays
    for row in widget::major_holiday_countdowns(now, &events, &lunar) {
        println!("{}  {}  {}", row.name, row.target_date, row.diff_text);
    }

    Ok(())
}
