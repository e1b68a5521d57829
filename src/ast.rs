//! Abstract syntax tree: an explicit sum type of node kinds, rather than a
//! homogeneous generic tree — each `Rhs` variant carries exactly the payload
//! its evaluation rule needs, so the evaluator's dispatch is an exhaustive
//! `match` with no virtual calls.

use crate::token::ReferencePath;

/// The left-hand side of a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Lhs {
    pub offset: usize,
    pub kind: LhsKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LhsKind {
    /// Arose from a stray end-of-statement marker; contributes nothing.
    NoOp,
    /// A named binding target.
    Named(String),
    /// Used for the single-expression bracket body of `map`/`zip`.
    Anonymous,
}

impl Lhs {
    pub fn is_noop(&self) -> bool {
        matches!(self.kind, LhsKind::NoOp)
    }
}

/// The right-hand side of a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Rhs {
    pub offset: usize,
    pub kind: RhsKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RhsKind {
    NoOp,
    ValueLiteral(String),
    NumericLiteral(f64),
    NullLiteral,
    Interpolation(String),
    Reference(ReferencePath),
    ListIndexReference(ReferencePath),
    Array(Vec<Rhs>),
    /// An inline object. A single-element list whose `Lhs` is `Anonymous`
    /// evaluates to the bare value of that one statement rather than being
    /// wrapped in an object.
    Scope(Vec<Statement>),
    Bind {
        reference: Box<Rhs>,
        body: Vec<Statement>,
    },
    Map {
        source: Box<Rhs>,
        body: Vec<Statement>,
    },
    Zip {
        sources: Vec<Rhs>,
        body: Vec<Statement>,
    },
}

/// A self-contained unit of evaluation: binding a right-hand expression to a
/// left-hand name (or nothing, for a no-op).
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub lhs: Lhs,
    pub rhs: Rhs,
}

/// A fully parsed program: an ordered list of top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub statements: Vec<Statement>,
}
