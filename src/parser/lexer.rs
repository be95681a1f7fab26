// Lexical primitives for the hint DSL

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, recognize, success, value},
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser so surrounding whitespace is ignored.
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Bare field or keyword: a letter or `_`, then letters, digits, `_`, `.`, `-`.
pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')),
        )),
        String::from,
    )(input)
}

/// Double-quoted string with `\"` and `\\` escapes.
pub fn string_literal(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        alt((
            escaped_transform(
                is_not("\\\""),
                '\\',
                alt((value("\\", char('\\')), value("\"", char('"')))),
            ),
            success(String::new()),
        )),
        char('"'),
    )(input)
}

/// A field name, bare or quoted (for names with spaces or punctuation).
pub fn field_name(input: &str) -> IResult<&str, String> {
    alt((string_literal, identifier))(input)
}
