use std::fmt;

use eqc_lang_miette_util::codespan::Span;
use logos::Logos;
use num_bigint::BigUint;

use crate::ParseError;

#[derive(Default, Debug, Clone, PartialEq)]
pub enum LexicalError {
    #[default]
    InvalidToken,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+", skip r"--[^\n\r]*", error = LexicalError)]
pub enum Token {
    // Keywords
    //
    //
    #[token("data")]
    Data,
    #[token("def")]
    Def,
    #[token("match")]
    Match,
    #[token("termination_by")]
    TerminationBy,
    #[token("Type")]
    Type,

    // Parens and Braces
    //
    //
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Symbols
    //
    //
    #[token("=>")]
    DoubleRightArrow,
    #[token("->")]
    RightArrow,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("|")]
    Pipe,
    #[token("\\")]
    Backslash,
    #[token("_")]
    Underscore,
    #[token("+")]
    Plus,

    // Identifiers
    //
    // We use the following unicode categories:
    // Ll = lowercase letter
    // Lu = uppercase letter
    // No = other numbers (includes subscripts and superscript numerals)
    #[regex(r"[\p{Ll}\p{Lu}][\p{Ll}\p{Lu}\p{No}0-9_']*", |lex| lex.slice().to_string())]
    Ident(String),

    // Literals
    //
    //
    #[regex(r"0|[1-9][0-9]*", |lex| BigUint::parse_bytes(lex.slice().as_bytes(), 10))]
    NumLit(BigUint),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Data => write!(f, "data"),
            Token::Def => write!(f, "def"),
            Token::Match => write!(f, "match"),
            Token::TerminationBy => write!(f, "termination_by"),
            Token::Type => write!(f, "Type"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::DoubleRightArrow => write!(f, "=>"),
            Token::RightArrow => write!(f, "->"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Dot => write!(f, "."),
            Token::Pipe => write!(f, "|"),
            Token::Backslash => write!(f, "\\"),
            Token::Underscore => write!(f, "_"),
            Token::Plus => write!(f, "+"),
            Token::Ident(id) => write!(f, "{id}"),
            Token::NumLit(n) => write!(f, "{n}"),
        }
    }
}

/// Lex the whole input into a vector of tokens with their spans
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, ParseError> {
    Token::lexer(input)
        .spanned()
        .map(|(token, range)| {
            let span = Span::from(range);
            match token {
                Ok(token) => Ok((token, span)),
                Err(LexicalError::InvalidToken) => Err(ParseError::invalid_token(span)),
            }
        })
        .collect()
}

#[cfg(test)]
mod lexer_tests {
    use super::{Token, lex};

    fn tokens(s: &str) -> Vec<Token> {
        lex(s).unwrap().into_iter().map(|(token, _)| token).collect()
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(tokens("-- a comment\ndata"), vec![Token::Data]);
    }

    #[test]
    fn arrow_is_not_a_comment() {
        assert_eq!(tokens("A -> B"), vec![
            Token::Ident("A".to_owned()),
            Token::RightArrow,
            Token::Ident("B".to_owned())
        ]);
    }

    #[test]
    fn keyword_prefix_is_identifier() {
        assert_eq!(tokens("datum Types"), vec![
            Token::Ident("datum".to_owned()),
            Token::Ident("Types".to_owned())
        ]);
    }

    #[test]
    fn inaccessible_and_wildcard() {
        assert_eq!(tokens(".n _"), vec![
            Token::Dot,
            Token::Ident("n".to_owned()),
            Token::Underscore
        ]);
    }

    #[test]
    fn invalid_token() {
        assert!(lex("def f#").is_err());
    }
}
