//! jsonmap is a small declarative DSL for reshaping one JSON document into
//! another. A program is a list of statements, each binding a name on the
//! output to a right-hand expression evaluated against the input document.
//!
//! # Overview
//!
//! The pipeline is a conventional three-stage one: [`token::tokenize`] turns
//! source text into a flat stream of [`token::Lex<token::Token>`] entries,
//! [`parser::Parser`] consumes that stream with one token of lookahead into
//! an [`ast::Ast`], and [`eval::evaluate`] walks the tree against an input
//! [`serde_json::Value`] to produce the output document. [`program::Program`]
//! wraps the first two stages behind a single `compile` call so a program can
//! be parsed once and applied to many inputs.
//!
//! # Example
//!
//! ```
//! use jsonmap::Program;
//! use serde_json::json;
//!
//! let program = Program::compile(r#"full_name = &name; age = &age;"#).unwrap();
//! let output = program.apply(&json!({"name": "Ada Lovelace", "age": 36})).unwrap();
//! assert_eq!(output, json!({"full_name": "Ada Lovelace", "age": 36}));
//! ```
//!
//! # Reference paths
//!
//! `&foo.bar` walks fields of an object; `&foo.0` indexes into an array at
//! the step where `foo` resolves to one. `&?0` is a *list-index reference*:
//! its segments are always array indices rather than field names, which is
//! how `zip` bodies address each source's element for a given position.
//! `&!foo` is a *global* reference: no matter how deeply nested the
//! enclosing `bind`/`map`/`zip` scope is, it resolves against the original
//! input document rather than the narrowed local scope.
//!
//! # Collection operators
//!
//! `bind` narrows the local scope to a referenced sub-structure and
//! evaluates a statement body against it. `map` evaluates a statement body
//! once per element of a source array, collecting the results into an
//! output array. `zip` does the same over several source arrays at once,
//! truncating to the length of the shortest one.
//!
//! # License
//! jsonmap is provided under the MIT OR Apache-2.0 license.

mod ast;
mod ast_print;
mod error;
mod eval;
mod logging;
mod parser;
mod position;
mod program;
mod scope;
mod token;

#[cfg(test)]
mod tests;

pub use ast::Statement;
pub use error::{EvaluationError, EvaluationErrorKind, SyntaxError, SyntaxErrorKind};
pub use logging::Log;
pub use position::{Code, Position};
pub use program::Program;
