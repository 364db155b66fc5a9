//! Reflective comparison predicates over dynamically-typed document values.
//!
//! Assertions cannot rely on static typing because documents have arbitrary
//! shapes, so every predicate inspects the runtime variant of its operands
//! and fails soft: ill-formed operands surface as a [`CompareError`] for the
//! recorder to report, never as a panic.

use thiserror::Error;

use crate::domain::value::DocValue;

/// Operand shapes a comparator predicate cannot work with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    /// Function values are not comparable; passing one is a script bug.
    #[error("cannot take a function as an operand")]
    CallableOperand,

    /// Containment was asked of a value with no member or substring notion.
    #[error("`{type_name}` is not a container")]
    NotAContainer { type_name: String },
}

/// Deep structural equality.
///
/// Two nils are equal; nil never equals a non-nil value. Byte sequences
/// compare by content, sequences element-wise, mappings order-insensitively
/// with keys compared by their own equality. Scalars are value-equal only
/// within the same variant, so an `Int` never equals a `Float`. A function
/// operand on either side is an invocation error rather than an inequality.
pub fn equal(a: &DocValue, b: &DocValue) -> Result<bool, CompareError> {
    if matches!(a, DocValue::Callable(_)) || matches!(b, DocValue::Callable(_)) {
        return Err(CompareError::CallableOperand);
    }
    Ok(deep_eq(a, b))
}

fn deep_eq(a: &DocValue, b: &DocValue) -> bool {
    match (a, b) {
        (DocValue::Nil, DocValue::Nil) => true,
        (DocValue::Bool(x), DocValue::Bool(y)) => x == y,
        (DocValue::Int(x), DocValue::Int(y)) => x == y,
        (DocValue::Float(x), DocValue::Float(y)) => x == y,
        (DocValue::Str(x), DocValue::Str(y)) => x == y,
        (DocValue::Bytes(x), DocValue::Bytes(y)) => x == y,
        (DocValue::Timestamp(x), DocValue::Timestamp(y)) => x == y,
        (DocValue::Seq(x), DocValue::Seq(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| deep_eq(l, r))
        }
        (DocValue::Map(x), DocValue::Map(y)) => map_eq(x, y),
        // Nested callables and opaque engine types never compare equal.
        _ => false,
    }
}

fn map_eq(a: &[(DocValue, DocValue)], b: &[(DocValue, DocValue)]) -> bool {
    a.len() == b.len()
        && a.iter().all(|(key, value)| {
            b.iter()
                .any(|(other_key, other_value)| deep_eq(key, other_key) && deep_eq(value, other_value))
        })
}

/// Polymorphic containment.
///
/// Strings test for a substring of the element's text form, mappings test
/// key membership, sequences and byte strings test element membership. Any
/// other container shape is ill-formed and must be reported as an assertion
/// error, not a failure.
pub fn contains(container: &DocValue, element: &DocValue) -> Result<bool, CompareError> {
    match container {
        DocValue::Str(s) => Ok(s.contains(&element.text_form())),
        DocValue::Map(entries) => Ok(entries.iter().any(|(key, _)| deep_eq(key, element))),
        DocValue::Seq(items) => Ok(items.iter().any(|item| deep_eq(item, element))),
        DocValue::Bytes(bytes) => Ok(bytes
            .iter()
            .any(|byte| deep_eq(&DocValue::Int(i64::from(*byte)), element))),
        other => Err(CompareError::NotAContainer {
            type_name: other.type_name().to_string(),
        }),
    }
}

/// Whether a value is "empty": nil, the empty string, `false`, numeric zero,
/// a zero-length container or the zero timestamp. Always yields a definite
/// answer.
pub fn is_empty(value: &DocValue) -> bool {
    match value {
        DocValue::Nil => true,
        DocValue::Bool(b) => !b,
        DocValue::Int(i) => *i == 0,
        DocValue::Float(x) => *x == 0.0,
        DocValue::Str(s) => s.is_empty(),
        DocValue::Bytes(bytes) => bytes.is_empty(),
        DocValue::Seq(items) => items.is_empty(),
        DocValue::Map(entries) => entries.is_empty(),
        DocValue::Timestamp(ts) => *ts == chrono::DateTime::<chrono::Utc>::default(),
        DocValue::Callable(_) | DocValue::Opaque(_) => false,
    }
}

/// Whether a value is nil. Distinct from emptiness: a present-but-empty
/// container is not nil. Typed-nil references collapse into [`DocValue::Nil`]
/// at the parsing and engine boundaries, so this is a plain variant check.
pub fn is_nil(value: &DocValue) -> bool {
    matches!(value, DocValue::Nil)
}
