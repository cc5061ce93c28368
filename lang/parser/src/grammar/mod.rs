//! A recursive descent parser over the token stream.
//!
//! The only place which needs more than one token of lookahead is the dependent function
//! type `(x: A) -> B`, which is indistinguishable from the annotation `(x : A)` until the
//! arrow. There we backtrack.

mod util;

use eqc_lang_miette_util::codespan::{ByteIndex, Span};

use crate::ParseError;
use crate::cst::decls::*;
use crate::cst::exp::*;
use crate::cst::ident::Ident;
use crate::lexer::{Token, lex};
use util::span;

pub struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    /// End of the last consumed token
    prev_end: ByteIndex,
    eof: Span,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = lex(input)?;
        let end = input.len();
        Ok(Parser { tokens, pos: 0, prev_end: ByteIndex(0), eof: Span::from(end..end) })
    }

    // Token stream
    //
    //

    fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(token, _)| token)
    }

    fn is(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    /// Start of the next token
    fn start(&self) -> ByteIndex {
        self.tokens.get(self.pos).map(|(_, span)| span.start).unwrap_or(self.eof.start)
    }

    fn bump(&mut self) -> Option<(Token, Span)> {
        let (token, span) = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        self.prev_end = span.end;
        Some((token, span))
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.is(token) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<Span, ParseError> {
        if self.is(&token) {
            self.bump().map(|(_, span)| span).ok_or_else(|| self.error(""))
        } else {
            Err(self.error(&format!("\"{token}\"")))
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some((token, span)) => {
                ParseError::unrecognized_token(token.to_string(), expected, *span)
            }
            None => ParseError::unrecognized_eof(expected, self.eof),
        }
    }

    fn span_from(&self, start: ByteIndex) -> Span {
        span(start, self.prev_end.max(start))
    }

    pub fn eof(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.error("end of file")),
        }
    }

    fn ident(&mut self) -> Result<Ident, ParseError> {
        match self.peek() {
            Some(Token::Ident(_)) => match self.bump() {
                Some((Token::Ident(id), span)) => Ok(Ident { span, id }),
                _ => Err(self.error("identifier")),
            },
            _ => Err(self.error("identifier")),
        }
    }

    /// Parse `item (, item)* ,?` until `close`, which is consumed
    fn sep_by_comma<T, F>(&mut self, close: Token, mut item: F) -> Result<Vec<T>, ParseError>
    where
        F: FnMut(&mut Self) -> Result<T, ParseError>,
    {
        let mut items = Vec::new();
        while !self.is(&close) {
            items.push(item(self)?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    // Declarations
    //
    //

    pub fn decls(&mut self) -> Result<Vec<Decl>, ParseError> {
        let mut decls = Vec::new();
        while let Some(token) = self.peek() {
            match token {
                Token::Data => decls.push(Decl::Data(self.data()?)),
                Token::Def => decls.push(Decl::Def(self.def()?)),
                _ => return Err(self.error("\"data\" or \"def\"")),
            }
        }
        Ok(decls)
    }

    fn data(&mut self) -> Result<Data, ParseError> {
        let start = self.start();
        self.expect(Token::Data)?;
        let name = self.ident()?;
        let params = self.telescope()?;
        self.expect(Token::LBrace)?;
        let ctors = self.sep_by_comma(Token::RBrace, Self::ctor)?;
        Ok(Data { span: self.span_from(start), name, params, ctors })
    }

    fn ctor(&mut self) -> Result<Ctor, ParseError> {
        let start = self.start();
        let name = self.ident()?;
        let params = self.telescope()?;
        let typ = if self.eat(&Token::Colon) { Some(Box::new(self.exp()?)) } else { None };
        Ok(Ctor { span: self.span_from(start), name, params, typ })
    }

    fn def(&mut self) -> Result<Def, ParseError> {
        let start = self.start();
        self.expect(Token::Def)?;
        let name = self.ident()?;
        let params = self.telescope()?;
        self.expect(Token::Colon)?;
        let ret_typ = Box::new(self.exp()?);
        let termination =
            if self.eat(&Token::TerminationBy) { Some(Box::new(self.exp()?)) } else { None };
        let mut clauses = Vec::new();
        while self.is(&Token::Pipe) {
            clauses.push(self.clause()?);
        }
        Ok(Def { span: self.span_from(start), name, params, ret_typ, termination, clauses })
    }

    fn telescope(&mut self) -> Result<Telescope, ParseError> {
        if self.eat(&Token::LParen) {
            self.sep_by_comma(Token::RParen, Self::param)
        } else {
            Ok(Vec::new())
        }
    }

    fn param(&mut self) -> Result<Param, ParseError> {
        let start = self.start();
        let name = self.ident()?;
        self.expect(Token::Colon)?;
        let typ = Box::new(self.exp()?);
        Ok(Param { span: self.span_from(start), name, typ })
    }

    fn clause(&mut self) -> Result<Clause, ParseError> {
        let start = self.start();
        self.expect(Token::Pipe)?;
        let mut lhs = vec![self.exp()?];
        while self.eat(&Token::Comma) {
            lhs.push(self.exp()?);
        }
        self.expect(Token::DoubleRightArrow)?;
        let rhs = Box::new(self.exp()?);
        Ok(Clause { span: self.span_from(start), lhs, rhs })
    }

    // Expressions
    //
    //

    pub fn exp(&mut self) -> Result<Exp, ParseError> {
        let start = self.start();
        match self.peek() {
            Some(Token::Backslash) => return self.lam(),
            Some(Token::Match) => return self.local_match(),
            _ => {}
        }
        if let Some(params) = self.try_pi_telescope() {
            let codomain = Box::new(self.exp()?);
            return Ok(Exp::Pi(Pi { span: self.span_from(start), params, codomain }));
        }
        let domain = self.sum()?;
        if self.eat(&Token::RightArrow) {
            let codomain = Box::new(self.exp()?);
            let params = vec![PiParam { name: None, typ: Box::new(domain) }];
            return Ok(Exp::Pi(Pi { span: self.span_from(start), params, codomain }));
        }
        Ok(domain)
    }

    /// Try to parse `(x: A, y: B) ->`, restoring the position on failure
    fn try_pi_telescope(&mut self) -> Option<Vec<PiParam>> {
        let looks_like_telescope = matches!(
            (self.peek_nth(0), self.peek_nth(1), self.peek_nth(2)),
            (Some(Token::LParen), Some(Token::Ident(_)), Some(Token::Colon))
        );
        if !looks_like_telescope {
            return None;
        }
        let (pos, prev_end) = (self.pos, self.prev_end);
        let res = self.telescope().ok().filter(|_| self.eat(&Token::RightArrow));
        match res {
            Some(params) => Some(
                params
                    .into_iter()
                    .map(|Param { name, typ, .. }| PiParam { name: Some(name), typ })
                    .collect(),
            ),
            None => {
                self.pos = pos;
                self.prev_end = prev_end;
                None
            }
        }
    }

    fn lam(&mut self) -> Result<Exp, ParseError> {
        let start = self.start();
        self.expect(Token::Backslash)?;
        let mut params = vec![self.ident()?];
        while self.eat(&Token::Comma) {
            params.push(self.ident()?);
        }
        self.expect(Token::Dot)?;
        let body = Box::new(self.exp()?);
        Ok(Exp::Lam(Lam { span: self.span_from(start), params, body }))
    }

    fn local_match(&mut self) -> Result<Exp, ParseError> {
        let start = self.start();
        self.expect(Token::Match)?;
        let mut scrutinees = vec![self.sum()?];
        while self.eat(&Token::Comma) {
            scrutinees.push(self.sum()?);
        }
        self.expect(Token::LBrace)?;
        let mut clauses = Vec::new();
        while self.is(&Token::Pipe) {
            clauses.push(self.clause()?);
        }
        self.expect(Token::RBrace)?;
        Ok(Exp::LocalMatch(LocalMatch { span: self.span_from(start), scrutinees, clauses }))
    }

    fn sum(&mut self) -> Result<Exp, ParseError> {
        let start = self.start();
        let mut lhs = self.app()?;
        while self.eat(&Token::Plus) {
            let rhs = self.app()?;
            let span = self.span_from(start);
            lhs = Exp::Add(Add { span, lhs: Box::new(lhs), rhs: Box::new(rhs) });
        }
        Ok(lhs)
    }

    fn app(&mut self) -> Result<Exp, ParseError> {
        let start = self.start();
        let mut exp = self.atom()?;
        while self.eat(&Token::LParen) {
            let args = self.sep_by_comma(Token::RParen, Self::exp)?;
            let span = self.span_from(start);
            exp = match exp {
                Exp::Call(Call { name, args: None, .. }) => {
                    Exp::Call(Call { span, name, args: Some(args) })
                }
                fun => Exp::App(App { span, fun: Box::new(fun), args }),
            };
        }
        Ok(exp)
    }

    fn atom(&mut self) -> Result<Exp, ParseError> {
        let start = self.start();
        match self.peek() {
            Some(Token::Ident(_)) => {
                let name = self.ident()?;
                Ok(Exp::Call(Call { span: name.span, name, args: None }))
            }
            Some(Token::NumLit(_)) => match self.bump() {
                Some((Token::NumLit(val), span)) => Ok(Exp::NatLit(NatLit { span, val })),
                _ => Err(self.error("numeral")),
            },
            Some(Token::Type) => {
                let span = self.expect(Token::Type)?;
                Ok(Exp::TypeUniv(TypeUniv { span }))
            }
            Some(Token::Underscore) => {
                let span = self.expect(Token::Underscore)?;
                Ok(Exp::Wildcard(Wildcard { span }))
            }
            Some(Token::Dot) => {
                self.bump();
                let exp = Box::new(self.atom()?);
                Ok(Exp::Inaccessible(Inaccessible { span: self.span_from(start), exp }))
            }
            Some(Token::LParen) => {
                self.bump();
                let exp = self.exp()?;
                if self.eat(&Token::Colon) {
                    let typ = Box::new(self.exp()?);
                    self.expect(Token::RParen)?;
                    Ok(Exp::Anno(Anno { span: self.span_from(start), exp: Box::new(exp), typ }))
                } else {
                    self.expect(Token::RParen)?;
                    Ok(exp)
                }
            }
            Some(Token::Backslash) => self.lam(),
            Some(Token::Match) => self.local_match(),
            _ => Err(self.error("expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cst::decls::Decl;
    use crate::cst::exp::*;
    use crate::{parse_exp, parse_module};

    #[test]
    fn parse_data_with_indices() {
        let module = parse_module(
            "data Vec(A: Type, n: Nat) {
                nil(A: Type): Vec(A, 0),
                cons(A: Type, n: Nat, x: A, xs: Vec(A, n)): Vec(A, n + 1),
            }",
        )
        .unwrap();
        let Decl::Data(data) = &module.decls[0] else { panic!("expected data") };
        assert_eq!(data.params.len(), 2);
        assert_eq!(data.ctors.len(), 2);
        assert_eq!(data.ctors[1].params.len(), 4);
        assert!(matches!(data.ctors[1].typ.as_deref(), Some(Exp::Call(_))));
    }

    #[test]
    fn parse_def_with_clauses() {
        let module = parse_module(
            "def add(m: Nat, n: Nat): Nat
                | m, zero => m
                | m, succ(n) => succ(add(m, n))",
        )
        .unwrap();
        let Decl::Def(def) = &module.decls[0] else { panic!("expected def") };
        assert_eq!(def.clauses.len(), 2);
        assert_eq!(def.clauses[1].lhs.len(), 2);
        assert!(def.termination.is_none());
    }

    #[test]
    fn parse_termination_by() {
        let module = parse_module("def f(n: Nat): Nat termination_by n | x => x").unwrap();
        let Decl::Def(def) = &module.decls[0] else { panic!("expected def") };
        assert!(def.termination.is_some());
    }

    #[test]
    fn parse_pi_vs_anno() {
        assert!(matches!(parse_exp("(x: Nat) -> Nat").unwrap(), Exp::Pi(_)));
        assert!(matches!(parse_exp("(x : Nat)").unwrap(), Exp::Anno(_)));
        let Exp::Pi(pi) = parse_exp("Nat -> Nat -> Nat").unwrap() else { panic!("expected pi") };
        assert!(pi.params[0].name.is_none());
        assert!(matches!(*pi.codomain, Exp::Pi(_)));
    }

    #[test]
    fn parse_inaccessible_patterns() {
        let Exp::Call(call) = parse_exp("cons(.A, .(n + 1), x, _)").unwrap() else {
            panic!("expected call")
        };
        let args = call.args.unwrap();
        assert!(matches!(args[0], Exp::Inaccessible(_)));
        let Exp::Inaccessible(Inaccessible { exp, .. }) = &args[1] else { panic!() };
        assert!(matches!(**exp, Exp::Add(_)));
        assert!(matches!(args[3], Exp::Wildcard(_)));
    }

    #[test]
    fn parse_nested_match() {
        let exp = parse_exp("match x, y { | zero, _ => zero | succ(k), _ => k }").unwrap();
        let Exp::LocalMatch(m) = exp else { panic!("expected match") };
        assert_eq!(m.scrutinees.len(), 2);
        assert_eq!(m.clauses.len(), 2);
    }

    #[test]
    fn parse_lambda_application() {
        let exp = parse_exp("(\\x, y. x)(zero, zero)").unwrap();
        assert!(matches!(exp, Exp::App(_)));
    }

    #[test]
    fn parse_error_reports_expected() {
        let err = parse_module("def f(n: Nat) Nat").unwrap_err();
        assert!(err.to_string().contains("Expected \":\""));
    }

    #[test]
    fn parse_error_at_eof() {
        let err = parse_module("data Nat {").unwrap_err();
        assert!(matches!(err, crate::ParseError::UnrecognizedEof { .. }));
    }
}
