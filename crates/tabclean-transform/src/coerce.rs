//! Conversion of a textual fill constant into a column's type.

use tabclean_model::{ColumnType, Value};

const TRUTHY: [&str; 5] = ["1", "true", "t", "yes", "y"];
const FALSY: [&str; 5] = ["0", "false", "f", "no", "n"];

/// Outcome of [`coerce_fill_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: Value,
    /// The text could not be converted and is stored verbatim.
    pub degraded: bool,
}

impl Coerced {
    fn typed(value: Value) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    fn raw(text: &str) -> Self {
        Self {
            value: Value::Text(text.to_string()),
            degraded: true,
        }
    }
}

/// Converts `raw` to a value of `dtype`, falling back to the raw text.
///
/// Booleans accept `1/true/t/yes/y` and `0/false/f/no/n` in any case; any
/// other text is true when non-empty. Float parsing rejects NaN since it
/// would stand for a missing cell.
pub fn coerce_fill_value(dtype: ColumnType, raw: &str) -> Coerced {
    match dtype {
        ColumnType::Integer => raw
            .trim()
            .parse::<i64>()
            .map_or_else(|_| Coerced::raw(raw), |v| Coerced::typed(Value::Int(v))),
        ColumnType::Float => match raw.trim().parse::<f64>() {
            Ok(v) if !v.is_nan() => Coerced::typed(Value::Float(v)),
            _ => Coerced::raw(raw),
        },
        ColumnType::Bool => Coerced::typed(Value::Bool(parse_truthy(raw))),
        ColumnType::Text => Coerced::typed(Value::Text(raw.to_string())),
    }
}

fn parse_truthy(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        true
    } else if FALSY.contains(&lowered.as_str()) {
        false
    } else {
        !raw.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_fill_becomes_int() {
        assert_eq!(
            coerce_fill_value(ColumnType::Integer, "0"),
            Coerced::typed(Value::Int(0))
        );
        assert_eq!(
            coerce_fill_value(ColumnType::Integer, " -12 "),
            Coerced::typed(Value::Int(-12))
        );
    }

    #[test]
    fn unparseable_numeric_degrades_to_text() {
        let coerced = coerce_fill_value(ColumnType::Integer, "1.5");
        assert!(coerced.degraded);
        assert_eq!(coerced.value, Value::from("1.5"));

        let coerced = coerce_fill_value(ColumnType::Float, "abc");
        assert!(coerced.degraded);

        let coerced = coerce_fill_value(ColumnType::Float, "nan");
        assert!(coerced.degraded);
    }

    #[test]
    fn float_fill_accepts_integers() {
        assert_eq!(
            coerce_fill_value(ColumnType::Float, "3"),
            Coerced::typed(Value::Float(3.0))
        );
    }

    #[test]
    fn bool_tokens_and_truthiness() {
        for token in ["YES", "t", "1", "True"] {
            assert_eq!(
                coerce_fill_value(ColumnType::Bool, token).value,
                Value::Bool(true),
                "{token}"
            );
        }
        for token in ["No", "F", "0", "false"] {
            assert_eq!(
                coerce_fill_value(ColumnType::Bool, token).value,
                Value::Bool(false),
                "{token}"
            );
        }
        assert_eq!(
            coerce_fill_value(ColumnType::Bool, "maybe").value,
            Value::Bool(true)
        );
        assert_eq!(coerce_fill_value(ColumnType::Bool, "").value, Value::Bool(false));
    }

    #[test]
    fn text_is_verbatim() {
        assert_eq!(
            coerce_fill_value(ColumnType::Text, " 0 "),
            Coerced::typed(Value::from(" 0 "))
        );
    }
}
