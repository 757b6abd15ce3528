use anyhow::{Context, anyhow};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;

// Date-only input lands at noon, the editor's historical preset time.
pub const DEFAULT_DEADLINE_HOUR: u32 = 12;

#[tracing::instrument(skip(now), fields(input = input))]
pub fn parse_deadline(input: &str, now: NaiveDateTime) -> anyhow::Result<NaiveDateTime> {
    let token = input.trim();
    let lower = token.to_ascii_lowercase();

    match lower.as_str() {
        "now" => return Ok(now),
        "today" => return at_default_time(now.date()),
        "tomorrow" => return at_default_time(now.date() + Duration::days(1)),
        _ => {}
    }

    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(token, fmt) {
            return Ok(ndt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(token, "%Y-%m-%d") {
        return at_default_time(date);
    }

    if let Some((hour, minute)) = parse_clock_time(token) {
        // Clock times roll to the next occurrence.
        let mut day = now.date();
        let candidate = day
            .and_hms_opt(hour, minute, 0)
            .ok_or_else(|| anyhow!("failed to construct clock time candidate"))?;
        if candidate <= now {
            day += Duration::days(1);
        }
        return day
            .and_hms_opt(hour, minute, 0)
            .ok_or_else(|| anyhow!("failed to construct next clock time candidate"));
    }

    Err(anyhow!("unrecognized deadline expression: {input}")).with_context(|| {
        "supported formats: now/today/tomorrow, YYYY-MM-DD, \
         YYYY-MM-DD HH:MM, YYYY-MM-DDTHH:MM, clock times (e.g. 15:30 or 3:30pm)"
    })
}

pub fn validate_deadline(deadline: NaiveDateTime, now: NaiveDateTime) -> anyhow::Result<()> {
    if deadline < now {
        return Err(anyhow!(
            "deadline cannot be in the past: {}",
            format_deadline(deadline)
        ));
    }
    Ok(())
}

pub fn parse_day(input: &str, now: NaiveDateTime) -> anyhow::Result<NaiveDate> {
    let token = input.trim();
    match token.to_ascii_lowercase().as_str() {
        "today" => return Ok(now.date()),
        "tomorrow" => return Ok(now.date() + Duration::days(1)),
        _ => {}
    }

    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .with_context(|| format!("unrecognized date: {input} (expected YYYY-MM-DD)"))
}

pub fn parse_year_month(input: &str) -> anyhow::Result<(i32, u32)> {
    let (year_text, month_text) = input
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow!("expected YYYY-MM, got: {input}"))?;

    let year: i32 = year_text.parse().context("invalid year")?;
    let month: u32 = month_text.parse().context("invalid month")?;
    if !(1..=12).contains(&month) {
        return Err(anyhow!("month out of range: {month}"));
    }

    Ok((year, month))
}

#[must_use]
pub fn format_deadline(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

#[must_use]
pub fn format_deadline_long(dt: NaiveDateTime) -> String {
    dt.format("%d.%m.%Y %H:%M").to_string()
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
        _ => "?",
    }
}

fn at_default_time(date: NaiveDate) -> anyhow::Result<NaiveDateTime> {
    date.and_hms_opt(DEFAULT_DEADLINE_HOUR, 0, 0)
        .ok_or_else(|| anyhow!("failed to construct default deadline time"))
}

fn parse_clock_time(token: &str) -> Option<(u32, u32)> {
    let clock_re = Regex::new(
        r"(?i)^(?P<hour>\d{1,2}):(?P<minute>\d{2})\s*(?P<ampm>[ap]m)?$",
    )
    .ok()?;
    let captures = clock_re.captures(token.trim())?;

    let raw_hour = captures.name("hour")?.as_str().parse::<u32>().ok()?;
    let minute = captures.name("minute")?.as_str().parse::<u32>().ok()?;
    if minute > 59 {
        return None;
    }

    let hour = if let Some(ampm_match) = captures.name("ampm") {
        let ampm = ampm_match.as_str().to_ascii_lowercase();
        if raw_hour == 0 || raw_hour > 12 {
            return None;
        }
        match ampm.as_str() {
            "am" => {
                if raw_hour == 12 {
                    0
                } else {
                    raw_hour
                }
            }
            "pm" => {
                if raw_hour == 12 {
                    12
                } else {
                    raw_hour + 12
                }
            }
            _ => return None,
        }
    } else {
        if raw_hour > 23 {
            return None;
        }
        raw_hour
    };

    Some((hour, minute))
}
