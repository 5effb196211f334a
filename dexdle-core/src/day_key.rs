use chrono::{NaiveDate, Utc};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Convert a `YYYY-MM-DD` string to the number of days since 1970-01-01.
///
/// The components are read literally, so the result never depends on the
/// local timezone of whoever calls this. Returns `None` when a component is
/// missing, non-numeric or zero, or when the triple is not a calendar date.
pub fn to_utc_day_number(date: &str) -> Option<i64> {
    let mut parts = date.split('-');
    let year = parse_component(parts.next())?;
    let month = parse_component(parts.next())?;
    let day = parse_component(parts.next())?;
    if parts.next().is_some() {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    Some((date - epoch).num_days())
}

fn parse_component(part: Option<&str>) -> Option<i64> {
    part?.trim().parse::<i64>().ok().filter(|value| *value > 0)
}

/// True when `next` is exactly one calendar day after `previous`.
pub fn are_consecutive(previous: &str, next: &str) -> bool {
    match (to_utc_day_number(previous), to_utc_day_number(next)) {
        (Some(a), Some(b)) => b == a + 1,
        _ => false,
    }
}

/// The current calendar day according to the server's UTC clock.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

pub fn parse_day(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DAY_FORMAT).ok()
}
