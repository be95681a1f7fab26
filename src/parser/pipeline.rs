// Pipeline parser for the hint DSL

use super::ast::HintSpec;
use super::command::parse_hint_command;
use super::lexer::ws;
use crate::error::InputError;
use nom::{
    bytes::complete::tag,
    combinator::{eof, opt},
    multi::separated_list0,
    IResult,
};

/// Parse a complete hint string
/// Format: component | component | ...
pub fn parse_hint_spec(input: &str) -> IResult<&str, HintSpec> {
    // A leading "|" is tolerated
    let (input, _) = opt(ws(tag("|")))(input)?;

    let (input, commands) = separated_list0(ws(tag("|")), parse_hint_command)(input)?;

    let (input, _) = ws(eof)(input)?;

    Ok((input, HintSpec::from_commands(commands)))
}

/// Parse hints, reporting where parsing stopped on failure.
pub fn parse_hints(input: &str) -> Result<HintSpec, InputError> {
    match parse_hint_spec(input) {
        Ok((_, spec)) => Ok(spec),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(InputError::HintSyntax {
            remaining: e.input.trim().to_string(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(InputError::HintSyntax {
            remaining: input.trim().to_string(),
        }),
    }
}
