//! Structured errors for the tokenizer/parser stage and the evaluator stage.
//!
//! Both carry a byte offset into the source program (or, for evaluation
//! errors, into the program that produced the offending AST node) plus a
//! human-readable message.

use std::fmt::{Display, Formatter};

/// The kind of syntax problem encountered while tokenizing or parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    InvalidEscapeSequence,
    UnexpectedCharacter,
    UnexpectedEndOfInput,
    InvalidLhs,
    MissingAssignment,
    MissingTerminator,
    UnexpectedRightBrace,
    UnknownKeyword,
    InvalidCollectionArgument,
    InvalidAnonymousMapBody,
    IllegalGlobalMarker,
}

/// An error raised during tokenization or parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub offset: usize,
    pub kind: SyntaxErrorKind,
    pub message: String,
}

impl SyntaxError {
    pub fn new(offset: usize, kind: SyntaxErrorKind, message: impl Into<String>) -> Self {
        Self {
            offset,
            kind,
            message: message.into(),
        }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "syntax error at offset {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// The kind of problem encountered while evaluating a compiled program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationErrorKind {
    UnresolvedPath,
    InvalidFieldIndex,
    NotAnObject,
    NotIterable,
    InvalidReference,
    /// Reached a back-tick interpolation node; interpolation expansion is
    /// not implemented, and is never silently stringified instead.
    NotImplemented,
}

/// An error raised while applying a compiled program to an input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
    pub offset: usize,
    pub kind: EvaluationErrorKind,
    pub message: String,
}

impl EvaluationError {
    pub fn new(offset: usize, kind: EvaluationErrorKind, message: impl Into<String>) -> Self {
        Self {
            offset,
            kind,
            message: message.into(),
        }
    }
}

impl Display for EvaluationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "evaluation error at offset {}: {}",
            self.offset, self.message
        )
    }
}

impl std::error::Error for EvaluationError {}
