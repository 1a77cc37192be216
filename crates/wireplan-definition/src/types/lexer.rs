//! Tokenization of type declarations using `nom`.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::value,
    sequence::preceded,
};
use wireplan_common::error::{Result, WireplanError};

/// A token of a declared type such as `?App\Foo` or `(A&B)|null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Token {
    /// A scalar keyword or a (possibly namespaced) class name.
    Name(String),
    /// `?` nullable marker.
    Question,
    /// `|` union separator.
    Pipe,
    /// `&` intersection separator.
    Amp,
    /// `(` group opener.
    ParenOpen,
    /// `)` group closer.
    ParenClose,
}

const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '\\' || !c.is_ascii()
}

const fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\\' || !c.is_ascii()
}

fn name(input: &str) -> IResult<&str, Token> {
    let (input, first) = take_while1(is_name_start)(input)?;
    let (input, rest) = take_while(is_name_continue)(input)?;
    Ok((input, Token::Name(format!("{first}{rest}"))))
}

fn symbol(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Question, char('?')),
        value(Token::Pipe, char('|')),
        value(Token::Amp, char('&')),
        value(Token::ParenOpen, char('(')),
        value(Token::ParenClose, char(')')),
    ))
    .parse(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    preceded(multispace0, alt((symbol, name))).parse(input)
}

/// Splits a declaration into tokens, discarding whitespace.
pub(super) fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0::<&str, nom::error::Error<&str>>(remaining)
            .map_err(|e| lex_err(input, &format!("{e:?}")))?;
        if rest.is_empty() {
            return Ok(tokens);
        }
        match token(rest) {
            Ok((next, tok)) => {
                tokens.push(tok);
                remaining = next;
            }
            Err(_) => {
                let offset = input.len() - rest.len();
                return Err(lex_err(
                    input,
                    &format!("unexpected character at offset {offset}"),
                ));
            }
        }
    }
}

fn lex_err(input: &str, detail: &str) -> WireplanError {
    WireplanError::InvalidType {
        message: format!("cannot tokenize type declaration \"{input}\": {detail}"),
    }
}
