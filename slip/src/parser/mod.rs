//! Reader implementation using lalrpop
//!
//! Turns the token stream into data: every top-level form becomes one
//! [`Value`], with reader macros already expanded to their tagged lists.

use crate::error::{Error, Result};
use crate::interp::Value;
use crate::lexer::{tokenize, Token};
use crate::span::Span;


lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all)]
    grammar,
    "/parser/grammar.rs"
);

/// Parse tokens into top-level forms
pub fn parse(tokens: Vec<(Token, Span)>) -> Result<Vec<Value>> {
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| Ok::<_, Error>((span.start, tok, span.end)));

    grammar::ProgramParser::new()
        .parse(token_iter)
        .map_err(|e| {
            use lalrpop_util::ParseError;
            match e {
                ParseError::InvalidToken { location } => {
                    Error::parser("invalid token", Span::new(location, location + 1))
                }
                ParseError::UnrecognizedEof { location, .. } => {
                    Error::parser("unexpected end of input", Span::point(location))
                }
                ParseError::UnrecognizedToken {
                    token: (start, tok, end),
                    ..
                } => Error::parser(format!("unexpected token `{tok}`"), Span::new(start, end)),
                ParseError::ExtraToken {
                    token: (start, tok, end),
                } => Error::parser(format!("extra token `{tok}`"), Span::new(start, end)),
                ParseError::User { error } => error,
            }
        })
}

/// Tokenize and parse `source` in one step
pub fn read(source: &str) -> Result<Vec<Value>> {
    parse(tokenize(source)?)
}
