//! Tree-walking evaluator.
//!
//! Every evaluation rule takes the current local `scope` (the "nearest"
//! value `&`-references resolve against) and the `universe` (the original
//! input document, which `&!`-global references always resolve against
//! regardless of how deeply nested the current scope is) as two explicit
//! parameters — no thread-local or interior-mutable globals.

use crate::ast::{Ast, Rhs, RhsKind, Statement};
use crate::error::{EvaluationError, EvaluationErrorKind};
use crate::scope;
use serde_json::{Map, Number, Value};

/// Evaluate a compiled program against an input document.
pub fn evaluate(ast: &Ast, input: &Value) -> Result<Value, EvaluationError> {
    eval_scope(&ast.statements, input, input)
}

/// Evaluate a statement list into a single JSON value: ordinarily an object
/// with one entry per named statement, but a scope containing exactly one
/// anonymous statement (the `map`/`zip` bracket-body sugar) evaluates to that
/// statement's bare value instead of wrapping it.
fn eval_scope(statements: &[Statement], scope_value: &Value, universe: &Value) -> Result<Value, EvaluationError> {
    if let [single] = statements {
        if single.lhs.kind == crate::ast::LhsKind::Anonymous {
            return eval_rhs(&single.rhs, scope_value, universe);
        }
    }

    let mut object = Map::new();
    for statement in statements {
        let name = match &statement.lhs.kind {
            crate::ast::LhsKind::NoOp => continue,
            crate::ast::LhsKind::Named(name) => name.clone(),
            crate::ast::LhsKind::Anonymous => {
                // Anonymous statements only ever appear alone; reaching this
                // arm means the parser produced a malformed multi-statement
                // anonymous body, which `parse_anonymous_map_body` prevents.
                continue;
            }
        };
        let value = eval_rhs(&statement.rhs, scope_value, universe)?;
        object.insert(name, value);
    }
    Ok(Value::Object(object))
}

fn eval_rhs(rhs: &Rhs, scope_value: &Value, universe: &Value) -> Result<Value, EvaluationError> {
    match &rhs.kind {
        RhsKind::NoOp => Ok(Value::Null),
        RhsKind::ValueLiteral(text) => Ok(Value::String(text.clone())),
        RhsKind::NumericLiteral(number) => Ok(Number::from_f64(*number).map(Value::Number).unwrap_or(Value::Null)),
        RhsKind::NullLiteral => Ok(Value::Null),
        RhsKind::Interpolation(_) => Err(EvaluationError::new(
            rhs.offset,
            EvaluationErrorKind::NotImplemented,
            "string interpolation is not implemented",
        )),
        RhsKind::Reference(path) => {
            let root = if path.global { universe } else { scope_value };
            scope::resolve(path, rhs.offset, root)
        }
        RhsKind::ListIndexReference(path) => {
            let root = if path.global { universe } else { scope_value };
            scope::resolve(path, rhs.offset, root)
        }
        RhsKind::Array(items) => {
            let values = items
                .iter()
                .map(|item| eval_rhs(item, scope_value, universe))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(values))
        }
        RhsKind::Scope(body) => eval_scope(body, scope_value, universe),
        RhsKind::Bind { reference, body } => {
            let narrowed = eval_rhs(reference, scope_value, universe)?;
            eval_scope(body, &narrowed, universe)
        }
        RhsKind::Map { source, body } => {
            let items = eval_as_array(source, scope_value, universe)?;
            let mapped = items
                .iter()
                .map(|element| eval_scope(body, element, universe))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(mapped))
        }
        RhsKind::Zip { sources, body } => eval_zip(sources, body, scope_value, universe),
    }
}

/// Evaluate a collection-operator source expression and collect it into an
/// ordered sequence of elements: an array source is used as-is, an object
/// source iterates its values in insertion order, and anything else is
/// `NotIterable`.
fn eval_as_array(rhs: &Rhs, scope_value: &Value, universe: &Value) -> Result<Vec<Value>, EvaluationError> {
    match eval_rhs(rhs, scope_value, universe)? {
        Value::Array(items) => Ok(items),
        Value::Object(map) => Ok(map.into_values().collect()),
        _ => Err(EvaluationError::new(
            rhs.offset,
            EvaluationErrorKind::NotIterable,
            "collection operator source did not resolve to an array or object",
        )),
    }
}

/// Zip truncates to the length of the shortest source, then for each
/// position builds a merged frame object: each source's element is keyed by
/// its integer position as a string (so `&?0`, `&?1`, ... always reach it
/// regardless of its shape), and if that element is itself an object, its
/// fields are also merged directly into the frame (so a body can address
/// `&name` the same way it would against a single source's element). Later
/// sources win on a field-name collision.
fn eval_zip(
    sources: &[Rhs],
    body: &[Statement],
    scope_value: &Value,
    universe: &Value,
) -> Result<Value, EvaluationError> {
    let columns = sources
        .iter()
        .map(|source| eval_as_array(source, scope_value, universe))
        .collect::<Result<Vec<_>, _>>()?;

    let len = columns.iter().map(Vec::len).min().unwrap_or(0);

    let mut rows = Vec::with_capacity(len);
    for index in 0..len {
        let mut frame = Map::new();
        for (source_index, column) in columns.iter().enumerate() {
            let element = column[index].clone();
            if let Value::Object(fields) = &element {
                for (key, value) in fields {
                    frame.insert(key.clone(), value.clone());
                }
            }
            frame.insert(source_index.to_string(), element);
        }
        rows.push(eval_scope(body, &Value::Object(frame), universe)?);
    }
    Ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::token::tokenize;
    use serde_json::json;

    fn run(src: &str, input: Value) -> Result<Value, EvaluationError> {
        let tokens = tokenize(src).unwrap();
        let ast = Parser::new(tokens, src.len()).parse().unwrap();
        evaluate(&ast, &input)
    }

    #[test]
    fn renames_a_field() {
        let out = run("full_name = &name;", json!({"name": "Ada"})).unwrap();
        assert_eq!(out, json!({"full_name": "Ada"}));
    }

    #[test]
    fn nested_scope_literal() {
        let out = run(
            "person = { name = &name; age = &age; };",
            json!({"name": "Ada", "age": 36}),
        )
        .unwrap();
        assert_eq!(out, json!({"person": {"name": "Ada", "age": 36}}));
    }

    #[test]
    fn array_literal_mixes_kinds() {
        let out = run("xs = [&a, \"lit\", 3, null];", json!({"a": 1})).unwrap();
        assert_eq!(out, json!({"xs": [1, "lit", 3, null]}));
    }

    #[test]
    fn bind_narrows_scope_and_global_escapes_it() {
        let out = run(
            "inner = bind &child { name = &name; root_id = &!id; }",
            json!({"id": 1, "child": {"name": "Ada"}}),
        )
        .unwrap();
        assert_eq!(out, json!({"inner": {"name": "Ada", "root_id": 1}}));
    }

    #[test]
    fn map_over_array_of_objects() {
        let out = run(
            "names = map &students { name = &first_name; }",
            json!({"students": [{"first_name": "Ada"}, {"first_name": "Alan"}]}),
        )
        .unwrap();
        assert_eq!(out, json!({"names": [{"name": "Ada"}, {"name": "Alan"}]}));
    }

    #[test]
    fn map_bracket_body_is_unwrapped() {
        let out = run(
            "names = map &students [&first_name]",
            json!({"students": [{"first_name": "Ada"}, {"first_name": "Alan"}]}),
        )
        .unwrap();
        assert_eq!(out, json!({"names": ["Ada", "Alan"]}));
    }

    #[test]
    fn zip_truncates_to_shortest_source() {
        let out = run(
            "pairs = zip &names &grades { name = &?0; grade = &?1; }",
            json!({"names": ["Ada", "Alan", "Grace"], "grades": [90, 85]}),
        )
        .unwrap();
        assert_eq!(
            out,
            json!({"pairs": [{"name": "Ada", "grade": 90}, {"name": "Alan", "grade": 85}]})
        );
    }

    #[test]
    fn negative_list_index_reference_counts_from_end() {
        let out = run("last = &?-1;", json!(["a", "b", "c"])).unwrap();
        assert_eq!(out, json!({"last": "c"}));
    }

    #[test]
    fn unresolved_field_reference_errors() {
        let err = run("x = &missing;", json!({"a": 1})).unwrap_err();
        assert_eq!(err.kind, EvaluationErrorKind::UnresolvedPath);
    }

    #[test]
    fn out_of_range_index_errors() {
        let err = run("x = &?5;", json!(["a"])).unwrap_err();
        assert_eq!(err.kind, EvaluationErrorKind::InvalidFieldIndex);
    }

    #[test]
    fn mapping_over_a_non_array_is_not_iterable() {
        let err = run("x = map &a {}", json!({"a": 1})).unwrap_err();
        assert_eq!(err.kind, EvaluationErrorKind::NotIterable);
    }

    #[test]
    fn mapping_over_an_object_iterates_its_values_in_insertion_order() {
        // Keys deliberately out of alphabetical order: this would fail if
        // object iteration ever silently fell back to key-sorted order.
        let out = run(
            "grades = map &students { name = &first_name; }",
            json!({"students": {"second": {"first_name": "Alan"}, "first": {"first_name": "Ada"}}}),
        )
        .unwrap();
        assert_eq!(out, json!({"grades": [{"name": "Alan"}, {"name": "Ada"}]}));
    }

    #[test]
    fn zipping_an_object_source_iterates_its_values_in_insertion_order() {
        let out = run(
            "pairs = zip &names &grades { name = &?0; grade = &?1; }",
            json!({"names": {"second": "Alan", "first": "Ada"}, "grades": [90, 85]}),
        )
        .unwrap();
        assert_eq!(
            out,
            json!({"pairs": [{"name": "Alan", "grade": 90}, {"name": "Ada", "grade": 85}]})
        );
    }

    #[test]
    fn field_reference_on_non_object_is_not_an_object() {
        let err = run("x = &a.b;", json!({"a": 1})).unwrap_err();
        assert_eq!(err.kind, EvaluationErrorKind::NotAnObject);
    }

    #[test]
    fn interpolation_is_not_implemented() {
        let err = run("x = `hi`;", json!({})).unwrap_err();
        assert_eq!(err.kind, EvaluationErrorKind::NotImplemented);
    }
}
