//! Hashable and ordered views of cell values.

use std::cmp::Ordering;

use tabclean_model::Value;

/// Equality key for a cell. Floats compare by value with `-0.0 == 0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Missing,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(&'a str),
}

impl<'a> CellKey<'a> {
    pub(crate) fn of(value: &'a Value) -> Self {
        match value {
            Value::Missing => Self::Missing,
            Value::Int(v) => Self::Int(*v),
            Value::Float(v) => Self::Float(float_bits(*v)),
            Value::Bool(v) => Self::Bool(*v),
            Value::Text(v) => Self::Text(v),
        }
    }

    pub(crate) fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }
}

fn float_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

/// Total order used to pick among equally frequent values.
///
/// Numbers order numerically (integers and floats together), then booleans
/// with `false < true`, then text lexicographically. Missing sorts last.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => rank(a).cmp(&rank(b)),
        },
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Int(_) | Value::Float(_) => 0,
        Value::Bool(_) => 1,
        Value::Text(_) => 2,
        Value::Missing => 3,
    }
}
