// Individual hint components

use super::ast::HintCommand;
use super::lexer::{field_name, identifier, ws};
use crate::data::ChartType;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, satisfy},
    combinator::{map, map_res, not, value},
    multi::separated_list1,
    sequence::{delimited, terminated},
    IResult,
};

fn field_list(input: &str) -> IResult<&str, Vec<String>> {
    delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), ws(field_name)),
        ws(char(')')),
    )(input)
}

fn single_field(input: &str) -> IResult<&str, String> {
    delimited(ws(char('(')), ws(field_name), ws(char(')')))(input)
}

fn chart_type(input: &str) -> IResult<&str, ChartType> {
    delimited(
        ws(char('(')),
        ws(map_res(identifier, |name: String| name.parse::<ChartType>())),
        ws(char(')')),
    )(input)
}

/// Bare flag keyword; must not run into a longer identifier.
fn flag<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    ws(terminated(
        tag(name),
        not(satisfy(|c: char| c.is_ascii_alphanumeric() || c == '_')),
    ))
}

/// Format: geo(a, b)
pub fn parse_geo(input: &str) -> IResult<&str, HintCommand> {
    let (input, _) = ws(tag("geo"))(input)?;
    map(field_list, HintCommand::Geo)(input)
}

/// Format: measure(a, b)
pub fn parse_measure(input: &str) -> IResult<&str, HintCommand> {
    let (input, _) = ws(tag("measure"))(input)?;
    map(field_list, HintCommand::Measure)(input)
}

/// Format: time(a)
pub fn parse_time(input: &str) -> IResult<&str, HintCommand> {
    let (input, _) = ws(tag("time"))(input)?;
    map(single_field, HintCommand::Time)(input)
}

/// Format: dimension(a) or dim(a)
pub fn parse_dimension(input: &str) -> IResult<&str, HintCommand> {
    let (input, _) = alt((ws(tag("dimension")), ws(tag("dim"))))(input)?;
    map(single_field, HintCommand::Dimension)(input)
}

/// Format: y(a)
pub fn parse_y_key(input: &str) -> IResult<&str, HintCommand> {
    let (input, _) = ws(tag("y"))(input)?;
    map(single_field, HintCommand::YKey)(input)
}

/// Format: type(kind)
pub fn parse_type(input: &str) -> IResult<&str, HintCommand> {
    let (input, _) = ws(tag("type"))(input)?;
    map(chart_type, HintCommand::Type)(input)
}

/// Format: hint(kind)
pub fn parse_type_hint(input: &str) -> IResult<&str, HintCommand> {
    let (input, _) = ws(tag("hint"))(input)?;
    map(chart_type, HintCommand::TypeHint)(input)
}

/// Format: single_metric | density
pub fn parse_flag(input: &str) -> IResult<&str, HintCommand> {
    alt((
        value(HintCommand::SingleMetric, flag("single_metric")),
        value(HintCommand::Density, flag("density")),
    ))(input)
}

pub fn parse_hint_command(input: &str) -> IResult<&str, HintCommand> {
    alt((
        parse_geo,
        parse_measure,
        parse_time,
        parse_dimension,
        parse_y_key,
        parse_type,
        parse_type_hint,
        parse_flag,
    ))(input)
}
