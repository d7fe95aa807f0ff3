//! Update documents.

use serde_json::{Number, Value};

use crate::document::{Document, assign, lookup, remove};

/// Field-level modifications applied to every matched document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
    set: Vec<(String, Value)>,
    unset: Vec<String>,
    inc: Vec<(String, i64)>,
}

impl Update {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets every field of `doc` (top-level keys).
    #[must_use]
    pub fn set_all(doc: Document) -> Self {
        Self {
            set: doc.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.push((field.into(), value.into()));
        self
    }

    #[must_use]
    pub fn unset(mut self, field: impl Into<String>) -> Self {
        self.unset.push(field.into());
        self
    }

    #[must_use]
    pub fn inc(mut self, field: impl Into<String>, by: i64) -> Self {
        self.inc.push((field.into(), by));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty() && self.inc.is_empty()
    }

    /// Returns `true` if any modification targets `field` or one of its sub-paths.
    #[must_use]
    pub fn touches(&self, field: &str) -> bool {
        let hits = |path: &str| path == field || path.starts_with(&format!("{field}."));
        self.set.iter().any(|(p, _)| hits(p))
            || self.unset.iter().any(|p| hits(p))
            || self.inc.iter().any(|(p, _)| hits(p))
    }

    /// Drops every modification targeting `field` or one of its sub-paths.
    #[must_use]
    pub fn without(mut self, field: &str) -> Self {
        let keep = |path: &str| path != field && !path.starts_with(&format!("{field}."));
        self.set.retain(|(p, _)| keep(p));
        self.unset.retain(|p| keep(p));
        self.inc.retain(|(p, _)| keep(p));
        self
    }

    /// Applies the update in place. Returns `true` if the document changed.
    pub fn apply(&self, doc: &mut Document) -> bool {
        let mut changed = false;
        for (path, value) in &self.set {
            changed |= assign(doc, path, value.clone());
        }
        for path in &self.unset {
            changed |= remove(doc, path);
        }
        for (path, by) in &self.inc {
            let next = increment(lookup(doc, path), *by);
            changed |= assign(doc, path, next);
        }
        changed
    }
}

#[allow(clippy::cast_precision_loss)]
fn increment(current: Option<&Value>, by: i64) -> Value {
    match current {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => v
                .checked_add(by)
                .map_or(Value::Null, |v| Value::Number(v.into())),
            None => n
                .as_f64()
                .and_then(|v| Number::from_f64(v + by as f64))
                .map_or(Value::Null, Value::Number),
        },
        _ => Value::Number(by.into()),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn set_unset_inc() {
        let mut d = doc(json!({ "status": "available", "mileage": 1000, "notes": "x" }));
        let update = Update::new()
            .set("status", "rented")
            .unset("notes")
            .inc("mileage", 250)
            .inc("rentals", 1);

        assert!(update.apply(&mut d));
        assert_eq!(
            d,
            doc(json!({ "status": "rented", "mileage": 1250, "rentals": 1 }))
        );
    }

    #[test]
    fn no_op_update_reports_unchanged() {
        let mut d = doc(json!({ "status": "available" }));
        assert!(!Update::new().set("status", "available").apply(&mut d));
    }

    #[test]
    fn without_strips_field_and_subpaths() {
        let update = Update::new()
            .set("tenant_id", "x")
            .set("tenant_id.nested", 1)
            .set("tenant_idx", 2)
            .unset("tenant_id");
        assert!(update.touches("tenant_id"));

        let cleaned = update.without("tenant_id");
        assert!(!cleaned.touches("tenant_id"));
        assert_eq!(cleaned, Update::new().set("tenant_idx", 2));
    }

    #[test]
    fn inc_float_field() {
        let mut d = doc(json!({ "rate": 1.5 }));
        Update::new().inc("rate", 2).apply(&mut d);
        assert_eq!(d["rate"], json!(3.5));
    }
}
