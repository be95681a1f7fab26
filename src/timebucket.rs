// Day bucketing for date-like cell values.
//
// Dates arrive in whatever shape the data provider produced. The lexer below
// accepts the common ones; chrono decides whether the numbers form a real
// calendar day. Bare numbers are never dates.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use nom::{
    branch::alt,
    bytes::complete::take_while_m_n,
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map_res, opt, value},
    sequence::preceded,
    IResult,
};

use crate::data::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DateParts {
    year: i32,
    month: u32,
    day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TimeParts {
    hour: u32,
    minute: u32,
    second: u32,
    /// Seconds east of UTC; `None` for a naive wall-clock time.
    offset: Option<i32>,
}

fn fixed_digits(n: usize) -> impl FnMut(&str) -> IResult<&str, u32> {
    move |input: &str| {
        map_res(take_while_m_n(n, n, |c: char| c.is_ascii_digit()), |s: &str| {
            s.parse::<u32>()
        })(input)
    }
}

fn one_or_two_digits(input: &str) -> IResult<&str, u32> {
    map_res(take_while_m_n(1, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u32>()
    })(input)
}

/// `YYYY-MM-DD`, `YYYY/MM/DD`, or `YYYY-MM` (first of the month)
fn year_first(input: &str) -> IResult<&str, DateParts> {
    let (input, year) = fixed_digits(4)(input)?;
    let (input, sep) = one_of("-/")(input)?;
    let (input, month) = one_or_two_digits(input)?;
    let (input, day) = opt(preceded(char(sep), one_or_two_digits))(input)?;
    Ok((
        input,
        DateParts {
            year: year as i32,
            month,
            day: day.unwrap_or(1),
        },
    ))
}

/// `MM/DD/YYYY`
fn month_first(input: &str) -> IResult<&str, DateParts> {
    let (input, month) = one_or_two_digits(input)?;
    let (input, _) = char('/')(input)?;
    let (input, day) = one_or_two_digits(input)?;
    let (input, _) = char('/')(input)?;
    let (input, year) = fixed_digits(4)(input)?;
    Ok((
        input,
        DateParts {
            year: year as i32,
            month,
            day,
        },
    ))
}

/// `+HH:MM` or `-HHMM`, as seconds east of UTC
fn numeric_offset(input: &str) -> IResult<&str, i32> {
    let (input, sign) = one_of("+-")(input)?;
    let (input, hours) = fixed_digits(2)(input)?;
    let (input, _) = opt(char(':'))(input)?;
    let (input, minutes) = fixed_digits(2)(input)?;
    let secs = (hours * 3600 + minutes * 60) as i32;
    Ok((input, if sign == '-' { -secs } else { secs }))
}

fn zone(input: &str) -> IResult<&str, i32> {
    alt((value(0, char('Z')), numeric_offset))(input)
}

/// `HH:MM[:SS[.fff]][zone]`
fn time_of_day(input: &str) -> IResult<&str, TimeParts> {
    let (input, hour) = fixed_digits(2)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, minute) = fixed_digits(2)(input)?;
    let (input, second) = opt(preceded(char(':'), fixed_digits(2)))(input)?;
    // Sub-second precision never changes the day.
    let (input, _) = opt(preceded(char('.'), digit1))(input)?;
    let (input, offset) = opt(zone)(input)?;
    Ok((
        input,
        TimeParts {
            hour,
            minute,
            second: second.unwrap_or(0),
            offset,
        },
    ))
}

fn date_time(input: &str) -> IResult<&str, (DateParts, Option<TimeParts>)> {
    let (input, date) = alt((year_first, month_first))(input)?;
    let (input, time) = opt(preceded(one_of("T "), time_of_day))(input)?;
    Ok((input, (date, time)))
}

fn lex_date(input: &str) -> Option<(DateParts, Option<TimeParts>)> {
    all_consuming(date_time)(input)
        .ok()
        .map(|(_, parts)| parts)
}

fn to_calendar_day(date: DateParts, time: Option<TimeParts>) -> Option<NaiveDate> {
    let day = NaiveDate::from_ymd_opt(date.year, date.month, date.day)?;
    let Some(time) = time else {
        return Some(day);
    };

    let clock = NaiveTime::from_hms_opt(time.hour, time.minute, time.second)?;
    let local = day.and_time(clock);
    match time.offset {
        Some(secs) => {
            let offset = FixedOffset::east_opt(secs)?;
            let instant = offset.from_local_datetime(&local).single()?;
            Some(instant.naive_utc().date())
        }
        None => Some(local.date()),
    }
}

/// Parse a textual date into its UTC calendar day.
pub fn parse_calendar_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some((date, time)) = lex_date(text) {
        return to_calendar_day(date, time);
    }

    DateTime::parse_from_rfc2822(text)
        .ok()
        .map(|dt| dt.naive_utc().date())
}

/// Calendar day of a cell, if it holds a parseable date.
pub fn value_to_day(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Text(s) => parse_calendar_day(s),
        _ => None,
    }
}

/// `YYYY-MM-DD` label for a date-like value; `None` drops the row from the
/// grid's column axis.
pub fn bucket_to_day_label(value: &Value) -> Option<String> {
    value_to_day(value).map(|day| day.format("%Y-%m-%d").to_string())
}
