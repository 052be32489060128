//! Posting hours for automated replies.

use chrono::{Datelike, Timelike, Weekday};

const WEEKDAY_OPEN_HOUR: u32 = 7;
const WEEKEND_OPEN_HOUR: u32 = 12;
const CLOSE_HOUR: u32 = 22;

/// Returns true when automated replies may be posted at `now`.
///
/// Weekends allow `[12:00, 22:00)`, weekdays allow `[07:00, 22:00)`.
pub fn is_allowed_time<T: Datelike + Timelike>(now: &T) -> bool {
    let open = match now.weekday() {
        Weekday::Sat | Weekday::Sun => WEEKEND_OPEN_HOUR,
        _ => WEEKDAY_OPEN_HOUR,
    };
    (open..CLOSE_HOUR).contains(&now.hour())
}
