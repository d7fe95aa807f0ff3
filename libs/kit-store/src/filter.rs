//! Typed query filters.
//!
//! Filters are a sum type rather than free-form JSON so that the secure layer
//! can wrap them without inspecting caller-supplied maps.

use std::cmp::Ordering;

use serde_json::Value;

use crate::document::{Document, lookup};

/// Predicate over documents.
///
/// Field names accept dotted paths. A comparison against a missing field is
/// false, except for [`Filter::Ne`] and [`Filter::Exists`] with `false`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Matches every document.
    #[default]
    All,
    Eq(String, Value),
    Ne(String, Value),
    In(String, Vec<Value>),
    Gt(String, Value),
    Gte(String, Value),
    Lt(String, Value),
    Lte(String, Value),
    Exists(String, bool),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    #[must_use]
    pub fn all() -> Self {
        Self::All
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne(field.into(), value.into())
    }

    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt(field.into(), value.into())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte(field.into(), value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt(field.into(), value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lte(field.into(), value.into())
    }

    pub fn exists(field: impl Into<String>, present: bool) -> Self {
        Self::Exists(field.into(), present)
    }

    /// Conjunction, flattening nested `And`s and dropping `All`.
    #[must_use]
    pub fn and(self, other: Filter) -> Self {
        let mut parts = Vec::new();
        for f in [self, other] {
            match f {
                Self::All => {}
                Self::And(inner) => parts.extend(inner),
                f => parts.push(f),
            }
        }
        match parts.len() {
            0 => Self::All,
            1 => parts.remove(0),
            _ => Self::And(parts),
        }
    }

    #[must_use]
    pub fn or(self, other: Filter) -> Self {
        match self {
            Self::Or(mut inner) => {
                inner.push(other);
                Self::Or(inner)
            }
            f => Self::Or(vec![f, other]),
        }
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Evaluates the filter against a document.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Eq(field, value) => lookup(doc, field).is_some_and(|v| values_equal(v, value)),
            Self::Ne(field, value) => !lookup(doc, field).is_some_and(|v| values_equal(v, value)),
            Self::In(field, values) => lookup(doc, field)
                .is_some_and(|v| values.iter().any(|candidate| values_equal(v, candidate))),
            Self::Gt(field, value) => compare_field(doc, field, value) == Some(Ordering::Greater),
            Self::Gte(field, value) => matches!(
                compare_field(doc, field, value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt(field, value) => compare_field(doc, field, value) == Some(Ordering::Less),
            Self::Lte(field, value) => matches!(
                compare_field(doc, field, value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::Exists(field, present) => lookup(doc, field).is_some() == *present,
            Self::And(parts) => parts.iter().all(|f| f.matches(doc)),
            Self::Or(parts) => parts.iter().any(|f| f.matches(doc)),
            Self::Not(inner) => !inner.matches(doc),
        }
    }
}

fn compare_field(doc: &Document, field: &str, value: &Value) -> Option<Ordering> {
    lookup(doc, field).and_then(|v| compare_values(v, value))
}

/// Orders two JSON values of the same kind. Numbers compare numerically,
/// strings lexicographically; mixed kinds are unordered.
#[must_use]
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

/// Equality that treats `1` and `1.0` as the same number.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_values(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}
