//! Path resolution: walking a [`crate::token::ReferencePath`] against either
//! the local evaluation scope or the global input document (the "universe"),
//! one segment at a time (object access by key, array access by index),
//! reporting structured [`EvaluationError`]s with byte offsets on failure.

use crate::error::{EvaluationError, EvaluationErrorKind};
use crate::token::{ReferencePath, Segment};
use serde_json::Value;

/// Resolve a reference path against a starting JSON value, one segment at a
/// time. Used for both local-scope lookups and global (`&!...`) lookups
/// against the input document. A path with no segments (a bare `&`) never
/// names anything and is `InvalidReference` rather than resolving to the
/// whole scope.
pub fn resolve(path: &ReferencePath, offset: usize, root: &Value) -> Result<Value, EvaluationError> {
    if path.segments.is_empty() {
        return Err(EvaluationError::new(
            offset,
            EvaluationErrorKind::InvalidReference,
            "a reference must name at least one field or index",
        ));
    }

    let mut current = root;
    for segment in &path.segments {
        current = step(current, segment, offset)?;
    }
    Ok(current.clone())
}

fn step<'v>(value: &'v Value, segment: &Segment, offset: usize) -> Result<&'v Value, EvaluationError> {
    match segment {
        Segment::Field(name) => step_field(value, name, offset),
        Segment::Index(index) => step_index(value, *index, offset),
    }
}

fn step_field<'v>(value: &'v Value, name: &str, offset: usize) -> Result<&'v Value, EvaluationError> {
    match value {
        Value::Object(map) => map.get(name).ok_or_else(|| {
            EvaluationError::new(
                offset,
                EvaluationErrorKind::UnresolvedPath,
                format!("no field named '{}'", name),
            )
        }),
        Value::Array(items) => {
            // Numeric-string field segments (`&foo.0`) index into arrays the
            // same way an explicit list-index reference would.
            let index: i64 = name.parse().map_err(|_| {
                EvaluationError::new(
                    offset,
                    EvaluationErrorKind::NotAnObject,
                    format!("cannot index array with field '{}'", name),
                )
            })?;
            index_array(items, index, offset)
        }
        _ => Err(EvaluationError::new(
            offset,
            EvaluationErrorKind::NotAnObject,
            format!("cannot resolve field '{}' on a non-object value", name),
        )),
    }
}

fn step_index<'v>(value: &'v Value, index: i64, offset: usize) -> Result<&'v Value, EvaluationError> {
    match value {
        Value::Array(items) => index_array(items, index, offset),
        // A zip frame (see `crate::eval::eval_zip`) is a JSON object keyed by
        // each source's position as a string, so a list-index reference into
        // it is a plain key lookup rather than an array-bounds check.
        Value::Object(map) => {
            if index < 0 {
                return Err(EvaluationError::new(
                    offset,
                    EvaluationErrorKind::InvalidFieldIndex,
                    format!("negative list index {} is not valid in a zip frame", index),
                ));
            }
            map.get(&index.to_string()).ok_or_else(|| {
                EvaluationError::new(
                    offset,
                    EvaluationErrorKind::InvalidFieldIndex,
                    format!("no source at position {} in zip frame", index),
                )
            })
        }
        _ => Err(EvaluationError::new(
            offset,
            EvaluationErrorKind::NotAnObject,
            "cannot apply a list index to a non-array, non-object value",
        )),
    }
}

/// Negative indices count from the end of the array (`-1` is the last
/// element); an index that is still out of range after that adjustment is
/// `InvalidFieldIndex`.
fn index_array<'v>(items: &'v [Value], index: i64, offset: usize) -> Result<&'v Value, EvaluationError> {
    let len = items.len() as i64;
    let resolved = if index < 0 { index + len } else { index };

    if resolved < 0 || resolved >= len {
        return Err(EvaluationError::new(
            offset,
            EvaluationErrorKind::InvalidFieldIndex,
            format!("index {} is out of range for an array of length {}", index, items.len()),
        ));
    }

    Ok(&items[resolved as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: Vec<Segment>) -> ReferencePath {
        ReferencePath {
            segments,
            global: false,
        }
    }

    #[test]
    fn resolves_nested_field() {
        let root = json!({"a": {"b": 42}});
        let result = resolve(&path(vec![Segment::Field("a".into()), Segment::Field("b".into())]), 0, &root).unwrap();
        assert_eq!(result, json!(42));
    }

    #[test]
    fn resolves_array_index() {
        let root = json!({"xs": [10, 20, 30]});
        let result = resolve(
            &path(vec![Segment::Field("xs".into()), Segment::Index(1)]),
            0,
            &root,
        )
        .unwrap();
        assert_eq!(result, json!(20));
    }

    #[test]
    fn negative_index_counts_from_end() {
        let root = json!([10, 20, 30]);
        let result = resolve(&path(vec![Segment::Index(-1)]), 0, &root).unwrap();
        assert_eq!(result, json!(30));
    }

    #[test]
    fn out_of_range_index_errors() {
        let root = json!([10, 20, 30]);
        let err = resolve(&path(vec![Segment::Index(5)]), 0, &root).unwrap_err();
        assert_eq!(err.kind, EvaluationErrorKind::InvalidFieldIndex);
    }

    #[test]
    fn out_of_range_negative_index_errors() {
        let root = json!([10, 20, 30]);
        let err = resolve(&path(vec![Segment::Index(-10)]), 0, &root).unwrap_err();
        assert_eq!(err.kind, EvaluationErrorKind::InvalidFieldIndex);
    }

    #[test]
    fn missing_field_is_unresolved_path() {
        let root = json!({"a": 1});
        let err = resolve(&path(vec![Segment::Field("b".into())]), 0, &root).unwrap_err();
        assert_eq!(err.kind, EvaluationErrorKind::UnresolvedPath);
    }

    #[test]
    fn field_access_on_scalar_is_not_an_object() {
        let root = json!(5);
        let err = resolve(&path(vec![Segment::Field("a".into())]), 0, &root).unwrap_err();
        assert_eq!(err.kind, EvaluationErrorKind::NotAnObject);
    }

    #[test]
    fn empty_path_is_an_invalid_reference() {
        let root = json!({"a": 1});
        let err = resolve(&path(vec![]), 0, &root).unwrap_err();
        assert_eq!(err.kind, EvaluationErrorKind::InvalidReference);
    }
}
