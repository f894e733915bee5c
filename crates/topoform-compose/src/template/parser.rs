//! Template parsing built on `nom`.
//!
//! Splits template text into literal runs and `{{ name }}` placeholders.
//! Every `{{` must open a well-formed placeholder; a stray `}}` is literal.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::multispace0,
    sequence::delimited,
};
use topoform_common::error::{Result, TopoformError};

use super::Segment;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parses a placeholder name.
fn name(input: &str) -> IResult<&str, String> {
    let (input, first) = take_while1(is_name_start)(input)?;
    let (input, rest) = take_while(is_name_continue)(input)?;
    Ok((input, format!("{first}{rest}")))
}

/// Parses `{{ name }}` with optional inner whitespace.
fn placeholder(input: &str) -> IResult<&str, Segment> {
    let (input, name) = delimited(
        (tag(OPEN), multispace0),
        name,
        (multispace0, tag(CLOSE)),
    )
    .parse(input)?;
    Ok((input, Segment::Placeholder(name)))
}

/// Parses literal text up to the next `{{` or the end of input.
fn literal(input: &str) -> IResult<&str, Segment> {
    let (input, text) = match take_until::<_, _, nom::error::Error<&str>>(OPEN)(input) {
        Ok(found) => found,
        Err(_) => ("", input),
    };
    Ok((input, Segment::Literal(text.to_owned())))
}

/// Parses template text into ordered segments.
///
/// # Errors
///
/// Returns [`TopoformError::TemplateSyntax`] with the byte offset of the
/// first `{{` that does not open a valid placeholder.
pub fn parse_segments(input: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() {
        let offset = input.len() - remaining.len();
        let parsed = if remaining.starts_with(OPEN) {
            placeholder(remaining).map_err(|_| TopoformError::TemplateSyntax {
                offset,
                message: format!(
                    "malformed placeholder near \"{}\"",
                    remaining.chars().take(24).collect::<String>()
                ),
            })?
        } else {
            literal(remaining).map_err(|e| TopoformError::TemplateSyntax {
                offset,
                message: e.to_string(),
            })?
        };
        let (rest, segment) = parsed;
        segments.push(segment);
        remaining = rest;
    }

    Ok(segments)
}
