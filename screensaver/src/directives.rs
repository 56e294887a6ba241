//! Defines directives a configuration file may contain.
//!
//! Also provides a function to parse a line into a directive.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{char, space1, u32 as parse_u32};
use nom::combinator::{all_consuming, map, map_res, rest, value};
use nom::multi::separated_list1;
use nom::sequence::separated_pair;
use nom::{Finish, IResult, Parser};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::displays::DisplaySelection;
use crate::playlist::Distribution;

#[derive(Debug, PartialEq)]
pub enum Directive {
    /// Appends a media reference to the default list.
    Media(String),
    /// Selects which displays get a player instance.
    Display(DisplaySelection),
    /// How the playlist is shared between displays.
    Distribution(Distribution),
    /// Path to the player binary.
    Player(String),
    /// How long a still image stays on screen.
    ImageDuration(Duration),
    Audio(bool),
    Notify(bool),
    SkipMissing(bool),
    /// Extra key-value options handed to the player.
    Set(BTreeMap<String, String>),
}

#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    /// The first word of the line is not a known directive.
    #[error("Unrecognised directive")]
    UnknownDirective,
    /// The directive requires an argument, but nothing follows it.
    /// Note that a trailing comment is removed before arguments are looked at.
    #[error("Not enough arguments")]
    NotEnoughArguments,
    /// The argument cannot be understood by this directive.
    #[error("Invalid arguments")]
    InvalidArgument,
}

fn parse_keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn parse_switch(input: &str) -> IResult<&str, bool> {
    alt((
        value(true, alt((tag("on"), tag("yes"), tag("true")))),
        value(false, alt((tag("off"), tag("no"), tag("false")))),
    ))
    .parse(input)
}

fn parse_displays(input: &str) -> IResult<&str, DisplaySelection> {
    alt((
        value(DisplaySelection::All, tag("all")),
        map(
            separated_list1(space1, parse_u32),
            DisplaySelection::Indices,
        ),
    ))
    .parse(input)
}

fn parse_distribution(input: &str) -> IResult<&str, Distribution> {
    alt((
        value(Distribution::Replicate, tag("replicate")),
        value(Distribution::Split, tag("split")),
    ))
    .parse(input)
}

fn parse_duration(input: &str) -> IResult<&str, Duration> {
    map_res(rest, |s: &str| duration_str::parse(s)).parse(input)
}

fn parse_rest(input: &str) -> IResult<&str, &str> {
    rest(input)
}

fn parse_options(input: &str) -> IResult<&str, BTreeMap<String, String>> {
    let pair = separated_pair(
        take_till1(|c: char| c == '=' || c.is_whitespace()),
        char('='),
        take_till1(|c: char| c.is_whitespace()),
    );
    map(separated_list1(space1, pair), |list: Vec<(&str, &str)>| {
        list.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<String, String>>()
    })
    .parse(input)
}

/// Runs `parser` over the whole of `args`.
fn argument<'a, O, P>(args: &'a str, parser: P) -> Result<O, ParseError>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    if args.is_empty() {
        return Err(ParseError::NotEnoughArguments);
    }
    all_consuming(parser)
        .parse(args)
        .finish()
        .map(|(_, output)| output)
        .map_err(|_| ParseError::InvalidArgument)
}

/// Cuts a trailing comment: a `#` at the start or preceded by whitespace.
fn strip_comment(input: &str) -> &str {
    let mut prev_blank = true;
    for (pos, c) in input.char_indices() {
        if c == '#' && prev_blank {
            return &input[..pos];
        }
        prev_blank = c.is_whitespace();
    }
    input
}

/// Parse a line.
///
/// Returns the parsed [`Directive`] if successful.
///
/// Comment-only and blank lines are not directives, filter them beforehand.
/// Trailing comments are allowed on every directive except `media`, whose argument is the rest
/// of the line so that references may contain spaces and `#`.
///
/// # Errors
/// If fails to parse the given string, a [`ParseError`] is returned.
pub fn parse(input: &str) -> Result<Directive, ParseError> {
    let Ok((args, keyword)) = parse_keyword(input.trim()) else {
        return Err(ParseError::NotEnoughArguments);
    };
    if keyword == "media" {
        let args = args.trim();
        if args.is_empty() {
            return Err(ParseError::NotEnoughArguments);
        }
        return Ok(Directive::Media(args.to_string()));
    }

    let args = strip_comment(args).trim();
    match keyword {
        "display" => argument(args, parse_displays).map(Directive::Display),
        "distribution" => argument(args, parse_distribution).map(Directive::Distribution),
        "player" => argument(args, parse_rest).map(|path: &str| Directive::Player(path.to_string())),
        "image-duration" => argument(args, parse_duration).map(Directive::ImageDuration),
        "audio" => argument(args, parse_switch).map(Directive::Audio),
        "notify" => argument(args, parse_switch).map(Directive::Notify),
        "skip-missing" => argument(args, parse_switch).map(Directive::SkipMissing),
        "set" => argument(args, parse_options).map(Directive::Set),
        _ => Err(ParseError::UnknownDirective),
    }
}

impl TryFrom<&str> for Directive {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse(value)
    }
}
