use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

/// Booking dates travel as plain "YYYY-MM-DD" wall-clock strings.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub fn parse_date(s: &str) -> Option<Date> {
    Date::parse(s, &DATE_FORMAT).ok()
}

pub fn format_date(d: Date) -> String {
    d.format(&DATE_FORMAT).unwrap_or_default()
}

/// "HH:MM" -> minutes since midnight.
pub fn parse_hhmm(s: &str) -> Option<i32> {
    let (h, m) = s.split_once(':')?;
    let h: i32 = h.parse().ok()?;
    let m: i32 = m.parse().ok()?;
    if !(0..24).contains(&h) || !(0..60).contains(&m) {
        return None;
    }
    Some(h * 60 + m)
}

pub fn format_hhmm(total_minutes: i32) -> String {
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Walks the working-hours window in `duration_minutes` steps and emits the
/// start time of every slot that fits entirely inside the window. Degenerate
/// input (non-positive duration, unparsable bounds, end <= start) yields an
/// empty list rather than an error; callers treat empty as "nothing bookable".
pub fn generate_slots(start: &str, end: &str, duration_minutes: i32) -> Vec<String> {
    if duration_minutes <= 0 {
        return Vec::new();
    }
    let (Some(start), Some(end)) = (parse_hhmm(start), parse_hhmm(end)) else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut current = start;
    while current + duration_minutes <= end {
        slots.push(format_hhmm(current));
        current += duration_minutes;
    }
    slots
}
