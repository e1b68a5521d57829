//! Recursive-descent parser: consumes the token stream produced by
//! [`crate::token::tokenize`] with a single token of lookahead and builds the
//! [`Ast`](crate::ast::Ast) defined in `crate::ast`.

use crate::ast::{Ast, Lhs, LhsKind, Rhs, RhsKind, Statement};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::token::{Lex, Token};

pub struct Parser {
    tokens: Vec<Lex<Token>>,
    cursor: usize,
    source_len: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Lex<Token>>, source_len: usize) -> Self {
        Self {
            tokens,
            cursor: 0,
            source_len,
        }
    }

    /// Parse the whole token stream into a top-level statement list.
    pub fn parse(mut self) -> Result<Ast, SyntaxError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if self.check(&Token::RightBrace) {
                return Err(SyntaxError::new(
                    self.peek_offset(),
                    SyntaxErrorKind::UnexpectedRightBrace,
                    "unexpected '}' at top level",
                ));
            }
            statements.push(self.parse_statement()?);
        }
        Ok(Ast { statements })
    }

    // -- token stream helpers -------------------------------------------

    fn is_at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek_token(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|lex| &lex.token)
    }

    fn peek_offset(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .map(|lex| lex.start)
            .unwrap_or(self.source_len)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek_token() == Some(token)
    }

    fn advance(&mut self) -> Option<Lex<Token>> {
        let lex = self.tokens.get(self.cursor).cloned();
        if lex.is_some() {
            self.cursor += 1;
        }
        lex
    }

    fn advance_or_eof(&mut self) -> Result<Lex<Token>, SyntaxError> {
        self.advance().ok_or_else(|| {
            SyntaxError::new(
                self.source_len,
                SyntaxErrorKind::UnexpectedEndOfInput,
                "unexpected end of program",
            )
        })
    }

    fn expect(&mut self, token: Token, kind: SyntaxErrorKind, message: &str) -> Result<usize, SyntaxError> {
        if self.check(&token) {
            Ok(self.advance().unwrap().start)
        } else {
            Err(SyntaxError::new(self.peek_offset(), kind, message.to_string()))
        }
    }

    /// Consume a statement terminator (`;`/`,`), unless the next token is a
    /// closing delimiter the enclosing production will consume itself, or
    /// this Rhs was parsed as a collection-operator argument.
    fn assert_terminator(&mut self, collection_argument: bool) -> Result<(), SyntaxError> {
        if collection_argument {
            return Ok(());
        }
        if self.check(&Token::RightBrace) || self.check(&Token::RightBracket) || self.is_at_end() {
            return Ok(());
        }
        let lex = self.advance().unwrap();
        if lex.token == Token::EndOfStatement {
            Ok(())
        } else {
            Err(SyntaxError::new(
                lex.start,
                SyntaxErrorKind::MissingTerminator,
                "expected end-of-statement symbol (';' or ',')",
            ))
        }
    }

    // -- grammar productions ----------------------------------------------

    fn parse_statement(&mut self) -> Result<Statement, SyntaxError> {
        let lhs = self.parse_lhs()?;
        if lhs.is_noop() {
            let offset = lhs.offset;
            return Ok(Statement {
                lhs,
                rhs: Rhs {
                    offset,
                    kind: RhsKind::NoOp,
                },
            });
        }

        self.expect(
            Token::Assignment,
            SyntaxErrorKind::MissingAssignment,
            "expected assignment operator ('=' or ':')",
        )?;

        let rhs = self.parse_rhs(false)?;
        Ok(Statement { lhs, rhs })
    }

    fn parse_lhs(&mut self) -> Result<Lhs, SyntaxError> {
        let lex = self.advance_or_eof()?;
        match lex.token {
            Token::BareWord(name) | Token::Literal(name) => Ok(Lhs {
                offset: lex.start,
                kind: LhsKind::Named(name),
            }),
            Token::EndOfStatement => Ok(Lhs {
                offset: lex.start,
                kind: LhsKind::NoOp,
            }),
            other => Err(SyntaxError::new(
                lex.start,
                SyntaxErrorKind::InvalidLhs,
                format!("invalid start to statement: {:?}", other),
            )),
        }
    }

    /// Parse a single inner scope's contents, after the opening `{` has
    /// already been consumed by the caller. Consumes the closing `}`.
    fn parse_scope_body(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        let mut statements = Vec::new();
        loop {
            if self.check(&Token::RightBrace) {
                self.advance();
                return Ok(statements);
            }
            if self.is_at_end() {
                return Err(SyntaxError::new(
                    self.source_len,
                    SyntaxErrorKind::UnexpectedEndOfInput,
                    "unterminated scope, expected '}'",
                ));
            }
            statements.push(self.parse_statement()?);
        }
    }

    fn parse_array(&mut self) -> Result<Vec<Rhs>, SyntaxError> {
        let mut values = Vec::new();
        loop {
            if self.check(&Token::RightBracket) {
                self.advance();
                return Ok(values);
            }
            values.push(self.parse_rhs(false)?);
            if self.check(&Token::EndOfStatement) {
                self.advance();
            }
        }
    }

    /// The `map`/`zip` bracket-body sugar: `[ rhs ]`, exactly one element.
    /// The opening `[` has already been consumed by the caller.
    fn parse_anonymous_map_body(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        if self.check(&Token::RightBracket) {
            let close = self.advance().unwrap();
            return Err(SyntaxError::new(
                close.start,
                SyntaxErrorKind::InvalidAnonymousMapBody,
                "map bracket body must contain exactly one expression",
            ));
        }

        let anon_offset = self.peek_offset();
        let rhs = self.parse_rhs(true)?;

        if self.check(&Token::EndOfStatement) {
            let sep = self.advance().unwrap();
            if !self.check(&Token::RightBracket) {
                return Err(SyntaxError::new(
                    sep.start,
                    SyntaxErrorKind::InvalidAnonymousMapBody,
                    "map bracket body must contain exactly one expression",
                ));
            }
        }

        self.expect(
            Token::RightBracket,
            SyntaxErrorKind::InvalidAnonymousMapBody,
            "map bracket body must contain exactly one expression",
        )?;

        Ok(vec![Statement {
            lhs: Lhs {
                offset: anon_offset,
                kind: LhsKind::Anonymous,
            },
            rhs,
        }])
    }

    fn parse_rhs(&mut self, collection_argument: bool) -> Result<Rhs, SyntaxError> {
        let lex = self.advance_or_eof()?;
        let offset = lex.start;

        match lex.token {
            Token::Literal(value) => {
                self.assert_terminator(collection_argument)?;
                Ok(Rhs {
                    offset,
                    kind: RhsKind::ValueLiteral(value),
                })
            }
            Token::Interpolation(pattern) => {
                self.assert_terminator(collection_argument)?;
                Ok(Rhs {
                    offset,
                    kind: RhsKind::Interpolation(pattern),
                })
            }
            Token::Reference(path) => {
                self.assert_terminator(collection_argument)?;
                Ok(Rhs {
                    offset,
                    kind: RhsKind::Reference(path),
                })
            }
            Token::ListIndexReference(path) => {
                self.assert_terminator(collection_argument)?;
                Ok(Rhs {
                    offset,
                    kind: RhsKind::ListIndexReference(path),
                })
            }
            Token::LeftBrace => {
                let body = self.parse_scope_body()?;
                Ok(Rhs {
                    offset,
                    kind: RhsKind::Scope(body),
                })
            }
            Token::LeftBracket => {
                let values = self.parse_array()?;
                Ok(Rhs {
                    offset,
                    kind: RhsKind::Array(values),
                })
            }
            Token::BareWord(word) => self.parse_bareword_rhs(offset, word, collection_argument),
            other => Err(SyntaxError::new(
                offset,
                SyntaxErrorKind::UnexpectedCharacter,
                format!("invalid right-hand side: {:?}", other),
            )),
        }
    }

    fn parse_bareword_rhs(
        &mut self,
        offset: usize,
        word: String,
        collection_argument: bool,
    ) -> Result<Rhs, SyntaxError> {
        if word == "null" {
            self.assert_terminator(collection_argument)?;
            return Ok(Rhs {
                offset,
                kind: RhsKind::NullLiteral,
            });
        }

        if let Ok(number) = word.parse::<f64>() {
            if number.is_finite() {
                self.assert_terminator(collection_argument)?;
                return Ok(Rhs {
                    offset,
                    kind: RhsKind::NumericLiteral(number),
                });
            }
        }

        match word.as_str() {
            "bind" | "map" | "zip" => {
                crate::logging::trace("collection_operator", crate::logging::Log::Verbose((word.as_str(), offset)));
                match word.as_str() {
                    "bind" => self.parse_bind(offset),
                    "map" => self.parse_map(offset),
                    "zip" => self.parse_zip(offset),
                    _ => unreachable!(),
                }
            }
            _ => Err(SyntaxError::new(
                offset,
                SyntaxErrorKind::UnknownKeyword,
                format!("unknown keyword '{}'", word),
            )),
        }
    }

    fn ensure_collection_source(&self, rhs: &Rhs) -> Result<(), SyntaxError> {
        match rhs.kind {
            RhsKind::Array(_) | RhsKind::Reference(_) => Ok(()),
            _ => Err(SyntaxError::new(
                rhs.offset,
                SyntaxErrorKind::InvalidCollectionArgument,
                "collection operator argument must be an array literal or a reference",
            )),
        }
    }

    fn parse_bind(&mut self, offset: usize) -> Result<Rhs, SyntaxError> {
        let reference = self.parse_rhs(true)?;
        if !matches!(reference.kind, RhsKind::Reference(_)) {
            return Err(SyntaxError::new(
                reference.offset,
                SyntaxErrorKind::InvalidCollectionArgument,
                "bind argument must be a reference",
            ));
        }

        self.expect(
            Token::LeftBrace,
            SyntaxErrorKind::InvalidCollectionArgument,
            "expected '{' to start bind body",
        )?;
        let body = self.parse_scope_body()?;

        Ok(Rhs {
            offset,
            kind: RhsKind::Bind {
                reference: Box::new(reference),
                body,
            },
        })
    }

    fn parse_map(&mut self, offset: usize) -> Result<Rhs, SyntaxError> {
        let source = self.parse_rhs(true)?;
        self.ensure_collection_source(&source)?;

        match self.peek_token() {
            Some(Token::LeftBrace) => {
                self.advance();
                let body = self.parse_scope_body()?;
                Ok(Rhs {
                    offset,
                    kind: RhsKind::Map {
                        source: Box::new(source),
                        body,
                    },
                })
            }
            Some(Token::LeftBracket) => {
                self.advance();
                let body = self.parse_anonymous_map_body()?;
                Ok(Rhs {
                    offset,
                    kind: RhsKind::Map {
                        source: Box::new(source),
                        body,
                    },
                })
            }
            _ => Err(SyntaxError::new(
                self.peek_offset(),
                SyntaxErrorKind::InvalidCollectionArgument,
                "expected '{' or '[' after map source",
            )),
        }
    }

    fn parse_zip(&mut self, offset: usize) -> Result<Rhs, SyntaxError> {
        let mut sources = Vec::new();
        loop {
            if self.check(&Token::LeftBrace) {
                break;
            }
            if self.is_at_end() {
                return Err(SyntaxError::new(
                    self.source_len,
                    SyntaxErrorKind::UnexpectedEndOfInput,
                    "unterminated zip, expected '{'",
                ));
            }
            let source = self.parse_rhs(true)?;
            self.ensure_collection_source(&source)?;
            sources.push(source);
        }

        if sources.is_empty() {
            return Err(SyntaxError::new(
                offset,
                SyntaxErrorKind::InvalidCollectionArgument,
                "zip requires at least one source",
            ));
        }

        self.advance(); // consume '{'
        let body = self.parse_scope_body()?;

        Ok(Rhs {
            offset,
            kind: RhsKind::Zip { sources, body },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{tokenize, Segment};

    fn parse(src: &str) -> Result<Ast, SyntaxError> {
        let tokens = tokenize(src).unwrap();
        Parser::new(tokens, src.len()).parse()
    }

    #[test]
    fn simple_reference_assignment() {
        let ast = parse("foo = &bar;").unwrap();
        assert_eq!(ast.statements.len(), 1);
        assert_eq!(ast.statements[0].lhs.kind, LhsKind::Named("foo".into()));
        match &ast.statements[0].rhs.kind {
            RhsKind::Reference(path) => assert_eq!(path.segments, vec![Segment::Field("bar".into())]),
            other => panic!("expected Reference, got {:?}", other),
        }
    }

    #[test]
    fn bind_with_global_reference() {
        let src = "foo = bind &bar { \"first\": &first, \"second\": &second.third, fourth: &!fourth }";
        let ast = parse(src).unwrap();
        assert_eq!(ast.statements.len(), 1);
        match &ast.statements[0].rhs.kind {
            RhsKind::Bind { reference, body } => {
                assert!(matches!(reference.kind, RhsKind::Reference(_)));
                assert_eq!(body.len(), 3);
            }
            other => panic!("expected Bind, got {:?}", other),
        }
    }

    #[test]
    fn map_over_reference() {
        let ast = parse("xs = map &students { name = &first_name; }").unwrap();
        match &ast.statements[0].rhs.kind {
            RhsKind::Map { source, body } => {
                assert!(matches!(source.kind, RhsKind::Reference(_)));
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected Map, got {:?}", other),
        }
    }

    #[test]
    fn zip_over_two_references() {
        let ast = parse("grades = zip &names &grades { name = &name; grade = &grade; }").unwrap();
        match &ast.statements[0].rhs.kind {
            RhsKind::Zip { sources, body } => {
                assert_eq!(sources.len(), 2);
                assert_eq!(body.len(), 2);
            }
            other => panic!("expected Zip, got {:?}", other),
        }
    }

    #[test]
    fn anonymous_map_bracket_body() {
        let ast = parse("names = map &students [&name]").unwrap();
        match &ast.statements[0].rhs.kind {
            RhsKind::Map { body, .. } => {
                assert_eq!(body.len(), 1);
                assert_eq!(body[0].lhs.kind, LhsKind::Anonymous);
            }
            other => panic!("expected Map, got {:?}", other),
        }
    }

    #[test]
    fn missing_assignment_is_syntax_error() {
        let err = parse("foo &bar;").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::MissingAssignment);
    }

    #[test]
    fn missing_terminator_is_syntax_error() {
        let err = parse("foo = &bar fizz = &baz;").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::MissingTerminator);
    }

    #[test]
    fn unknown_keyword_is_syntax_error() {
        let err = parse("foo = twist &bar {}").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnknownKeyword);
    }

    #[test]
    fn bind_requires_reference_argument() {
        let err = parse("foo = bind [1,2] {}").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::InvalidCollectionArgument);
    }

    #[test]
    fn anonymous_map_body_rejects_multiple_elements() {
        let err = parse("foo = map &xs [&a, &b]").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::InvalidAnonymousMapBody);
    }

    #[test]
    fn semicolon_and_comma_are_interchangeable() {
        let with_semi = parse("foo = &a; bar = &b;").unwrap();
        let with_comma = parse("foo = &a, bar = &b,").unwrap();
        assert_eq!(with_semi, with_comma);
    }

    #[test]
    fn equals_and_colon_are_interchangeable() {
        let with_eq = parse("foo = &a;").unwrap();
        let with_colon = parse("foo: &a;").unwrap();
        assert_eq!(with_eq, with_colon);
    }

    #[test]
    fn array_literal_with_mixed_elements() {
        let ast = parse("xs = [&a, \"b\", 3, [&c], {d = &e;}];").unwrap();
        match &ast.statements[0].rhs.kind {
            RhsKind::Array(values) => assert_eq!(values.len(), 5),
            other => panic!("expected Array, got {:?}", other),
        }
    }
}
