use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Daily => "Daily",
            ViewMode::Weekly => "Weekly",
            ViewMode::Monthly => "Monthly",
        }
    }
}

/// Ordered dates the given mode displays around `reference`.
pub fn compute_window(reference: NaiveDate, mode: ViewMode) -> Vec<NaiveDate> {
    let (start, end) = match mode {
        ViewMode::Daily => return vec![reference],
        ViewMode::Weekly => {
            let monday = week_start(reference);
            (monday, monday + Duration::days(6))
        }
        ViewMode::Monthly => {
            let (first, last) = month_bounds(reference);
            (week_start(first), week_end(last))
        }
    };
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(offset)
}

/// Sunday on or after `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let offset = 6 - date.weekday().num_days_from_monday() as i64;
    date + Duration::days(offset)
}

/// First and last calendar day of `date`'s month.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first + Duration::days(days_in_month(date.year(), date.month()) as i64 - 1);
    (first, last)
}

/// True for padding days that fall outside `reference`'s month.
pub fn is_other_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() != reference.year() || date.month() != reference.month()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
        NaiveDate::from_ymd_opt(year, month, 1),
    ) {
        (Some(next), Some(this)) => next.signed_duration_since(this).num_days() as u32,
        _ => 30,
    }
}

/// Shifts by whole calendar months, clamping to the target month's last day.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.month0() as i32 + months;
    let new_year = date.year() + total.div_euclid(12);
    let new_month = total.rem_euclid(12) as u32 + 1;
    let new_day = date.day().min(days_in_month(new_year, new_month));
    NaiveDate::from_ymd_opt(new_year, new_month, new_day).unwrap_or(date)
}

/// Moves the reference date one unit of `mode` in `direction` (+1 / -1).
pub fn navigate(reference: NaiveDate, mode: ViewMode, direction: i32) -> NaiveDate {
    let shifted = match mode {
        ViewMode::Daily => reference.checked_add_signed(Duration::days(direction as i64)),
        ViewMode::Weekly => reference.checked_add_signed(Duration::days(7 * direction as i64)),
        ViewMode::Monthly => Some(add_months(reference, direction)),
    };
    shifted.unwrap_or(reference)
}

// ── Formatting boundary ───────────────────────────────────────────────────────
// Keys are for lookups only; labels are for humans only.

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn short_weekday(date: NaiveDate) -> &'static str {
    &weekday_name(date)[..3]
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// "Jun 3, 2024"
pub fn display_date(date: NaiveDate) -> String {
    format!(
        "{} {}, {}",
        &month_name(date.month())[..3],
        date.day(),
        date.year()
    )
}

/// "June 2024"
pub fn month_title(date: NaiveDate) -> String {
    format!("{} {}", month_name(date.month()), date.year())
}

pub fn window_title(reference: NaiveDate, mode: ViewMode) -> String {
    match mode {
        ViewMode::Daily => display_date(reference),
        ViewMode::Weekly => format!("Week of {}", display_date(week_start(reference))),
        ViewMode::Monthly => month_title(reference),
    }
}
