//! Aggregation pipeline stages.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::document::{Document, ID_FIELD, assign, lookup};
use crate::filter::{Filter, compare_values};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Group accumulator. Each one writes a single output field.
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    Count { output: String },
    Sum { output: String, field: String },
    Min { output: String, field: String },
    Max { output: String, field: String },
}

/// One aggregation stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(Filter),
    /// Keeps the listed fields (and the id).
    Project(Vec<String>),
    Sort(Vec<(String, SortOrder)>),
    Skip(usize),
    Limit(usize),
    /// Groups by `key` (or everything when `None`). Output documents carry
    /// the group key under `"key"` plus one field per accumulator.
    Group {
        key: Option<String>,
        accumulators: Vec<Accumulator>,
    },
    /// Replaces the stream with a single `{ <field>: n }` document.
    Count(String),
}

/// Runs `stages` over `docs` in order.
#[must_use]
pub fn run(stages: &[Stage], mut docs: Vec<Document>) -> Vec<Document> {
    for stage in stages {
        docs = apply(stage, docs);
    }
    docs
}

fn apply(stage: &Stage, mut docs: Vec<Document>) -> Vec<Document> {
    match stage {
        Stage::Match(filter) => {
            docs.retain(|d| filter.matches(d));
            docs
        }
        Stage::Project(fields) => docs.iter().map(|d| project(d, fields)).collect(),
        Stage::Sort(keys) => {
            sort_documents(&mut docs, keys);
            docs
        }
        Stage::Skip(n) => docs.into_iter().skip(*n).collect(),
        Stage::Limit(n) => {
            docs.truncate(*n);
            docs
        }
        Stage::Group { key, accumulators } => group(&docs, key.as_deref(), accumulators),
        Stage::Count(field) => {
            let mut out = Document::new();
            out.insert(field.clone(), Value::Number(docs.len().into()));
            vec![out]
        }
    }
}

/// Stable multi-key sort. Missing or incomparable values sort first.
pub fn sort_documents(docs: &mut [Document], keys: &[(String, SortOrder)]) {
    docs.sort_by(|a, b| {
        for (field, order) in keys {
            let ord = match (lookup(a, field), lookup(b, field)) {
                (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            let ord = match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

/// Keeps only `fields` (plus the id) of a document.
#[must_use]
pub fn project(doc: &Document, fields: &[String]) -> Document {
    let mut out = Document::new();
    if let Some(id) = doc.get(ID_FIELD) {
        out.insert(ID_FIELD.to_owned(), id.clone());
    }
    for field in fields {
        if let Some(value) = lookup(doc, field) {
            assign(&mut out, field, value.clone());
        }
    }
    out
}

fn group(docs: &[Document], key: Option<&str>, accumulators: &[Accumulator]) -> Vec<Document> {
    let mut groups: Vec<(Value, Vec<&Document>)> = Vec::new();
    for doc in docs {
        let k = key
            .and_then(|field| lookup(doc, field))
            .cloned()
            .unwrap_or(Value::Null);
        if let Some(i) = groups.iter().position(|(existing, _)| *existing == k) {
            groups[i].1.push(doc);
        } else {
            groups.push((k, vec![doc]));
        }
    }

    groups
        .into_iter()
        .map(|(k, members)| {
            let mut out = Document::new();
            out.insert("key".to_owned(), k);
            for acc in accumulators {
                let (output, value) = accumulate(acc, &members);
                out.insert(output.to_owned(), value);
            }
            out
        })
        .collect()
}

fn accumulate<'a>(acc: &'a Accumulator, members: &[&Document]) -> (&'a str, Value) {
    match acc {
        Accumulator::Count { output } => (output.as_str(), Value::Number(members.len().into())),
        Accumulator::Sum { output, field } => (output.as_str(), sum(members, field)),
        Accumulator::Min { output, field } => {
            (output.as_str(), extreme(members, field, Ordering::Less))
        }
        Accumulator::Max { output, field } => {
            (output.as_str(), extreme(members, field, Ordering::Greater))
        }
    }
}

fn sum(members: &[&Document], field: &str) -> Value {
    let numbers: Vec<&Number> = members
        .iter()
        .filter_map(|d| match lookup(d, field) {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        })
        .collect();

    if numbers.iter().all(|n| n.is_i64()) {
        let total = numbers
            .iter()
            .filter_map(|n| n.as_i64())
            .fold(0_i64, i64::saturating_add);
        return Value::Number(total.into());
    }

    let total: f64 = numbers.iter().filter_map(|n| n.as_f64()).sum();
    Number::from_f64(total).map_or(Value::Null, Value::Number)
}

fn extreme(members: &[&Document], field: &str, wanted: Ordering) -> Value {
    let mut best: Option<&Value> = None;
    for value in members.iter().filter_map(|d| lookup(d, field)) {
        best = match best {
            Some(current) if compare_values(value, current) != Some(wanted) => Some(current),
            _ => Some(value),
        };
    }
    best.cloned().unwrap_or(Value::Null)
}
