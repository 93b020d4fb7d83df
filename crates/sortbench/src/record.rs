//! Keyed records with comparable field values

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single field value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A record of named fields
pub type Record = BTreeMap<String, FieldValue>;

/// `2^63`, the first float above every `i64`
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Exact comparison of an integer against a float.
///
/// NaNs sit where `f64::total_cmp` puts them: negative below every number,
/// positive above.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return if f.is_sign_negative() { Ordering::Greater } else { Ordering::Less };
    }
    if f >= I64_BOUND {
        return Ordering::Less;
    }
    if f < -I64_BOUND {
        return Ordering::Greater;
    }
    let floor = f.floor();
    match i.cmp(&(floor as i64)) {
        Ordering::Equal if f > floor => Ordering::Less,
        ordering => ordering,
    }
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    match a.partial_cmp(&b) {
        Some(ordering) => ordering,
        None => a.total_cmp(&b),
    }
}

/// Numbers compare numerically across `Int` and `Float` and sort before text.
impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => cmp_floats(*a, *b),
            (FieldValue::Int(a), FieldValue::Float(b)) => cmp_int_float(*a, *b),
            (FieldValue::Float(a), FieldValue::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Text(_), _) => Ordering::Greater,
            (_, FieldValue::Text(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{:.2}", x),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Build a record from `(field, value)` pairs
pub fn record<I, K, V>(fields: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// The four-employee demonstration data set
pub fn sample_employees() -> Vec<Record> {
    [("Alice", 75_000, 5), ("Bob", 65_000, 3), ("Charlie", 85_000, 8), ("Diana", 70_000, 4)]
        .into_iter()
        .map(|(name, salary, experience)| {
            record([
                ("name", FieldValue::from(name)),
                ("salary", FieldValue::Int(salary)),
                ("experience", FieldValue::Int(experience)),
            ])
        })
        .collect()
}
