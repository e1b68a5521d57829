//! `--ast` debug printing: a [`ptree::TreeItem`] impl over [`Statement`], for
//! pretty-printing the parsed statement tree to stderr.

use crate::ast::{Ast, LhsKind, Rhs, RhsKind, Statement};
use ptree::TreeItem;
use std::borrow::Cow;

pub fn print(ast: &Ast) {
    for statement in &ast.statements {
        ptree::print_tree(statement).ok();
    }
}

impl TreeItem for Statement {
    type Child = Statement;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _style: &ptree::Style) -> std::io::Result<()> {
        let name = match &self.lhs.kind {
            LhsKind::NoOp => "<noop>".to_string(),
            LhsKind::Named(name) => name.clone(),
            LhsKind::Anonymous => "<anonymous>".to_string(),
        };
        write!(f, "{} = {} @ {}", name, rhs_label(&self.rhs), self.rhs.offset)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(child_statements(&self.rhs))
    }
}

fn rhs_label(rhs: &Rhs) -> String {
    match &rhs.kind {
        RhsKind::NoOp => "noop".to_string(),
        RhsKind::ValueLiteral(text) => format!("{:?}", text),
        RhsKind::NumericLiteral(n) => n.to_string(),
        RhsKind::NullLiteral => "null".to_string(),
        RhsKind::Interpolation(pattern) => format!("`{}`", pattern),
        RhsKind::Reference(path) => format!("reference({:?})", path.segments),
        RhsKind::ListIndexReference(path) => format!("list_index_reference({:?})", path.segments),
        RhsKind::Array(items) => format!("array[{}]", items.len()),
        RhsKind::Scope(_) => "scope".to_string(),
        RhsKind::Bind { .. } => "bind".to_string(),
        RhsKind::Map { .. } => "map".to_string(),
        RhsKind::Zip { sources, .. } => format!("zip({} sources)", sources.len()),
    }
}

fn child_statements(rhs: &Rhs) -> Vec<Statement> {
    match &rhs.kind {
        RhsKind::Scope(body) | RhsKind::Bind { body, .. } | RhsKind::Map { body, .. } | RhsKind::Zip { body, .. } => {
            body.clone()
        }
        _ => Vec::new(),
    }
}
