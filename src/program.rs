//! The public entry point: compile source text once, apply it to as many
//! input documents as needed. Tokenizing and parsing happen once, up front,
//! behind a single `compile` call, rather than being repeated on every
//! `apply`.

use crate::ast::{Ast, Statement};
use crate::error::{EvaluationError, SyntaxError};
use crate::eval;
use crate::parser::Parser;
use crate::token::tokenize;
use serde_json::Value;

/// A compiled jsonmap program, ready to be applied to input documents.
#[derive(Debug, Clone)]
pub struct Program {
    ast: Ast,
}

impl Program {
    /// Tokenize and parse `source` into a reusable [`Program`].
    pub fn compile(source: &str) -> Result<Self, SyntaxError> {
        let tokens = tokenize(source)?;
        let ast = Parser::new(tokens, source.len()).parse()?;
        Ok(Self { ast })
    }

    /// Apply the compiled program to an input document, producing the
    /// reshaped output document.
    pub fn apply(&self, input: &Value) -> Result<Value, EvaluationError> {
        eval::evaluate(&self.ast, input)
    }

    /// The program's top-level statements.
    pub fn statements(&self) -> &[Statement] {
        &self.ast.statements
    }

    /// Pretty-print the parsed statement tree to stderr, for the CLI's
    /// `--ast` debug flag.
    pub fn print_ast(&self) {
        crate::ast_print::print(&self.ast);
    }
}
