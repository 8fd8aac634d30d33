#[cfg(feature = "ast_ser")]
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt,
    ops::{Add, Div, Mul, Neg, Not, Sub},
};

use serde_json::Value as JsonValue;

use super::{EvalError, EvalResult};

/// The runtime value of an expression.
///
/// Numbers share a single `f64` representation. Every number held by a
/// `Value` produced by the interpreter is finite; operations that would leave
/// the finite range fail with [`EvalError::NumericOverflow`] instead.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ast_ser", derive(Serialize, Deserialize))]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn from_number(val: f64) -> EvalResult<Value> {
        if val.is_finite() {
            Ok(Value::Number(val))
        } else {
            Err(EvalError::NumericOverflow)
        }
    }

    pub fn as_type(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Reads a string that spells a decimal number, e.g. `"12.34"` or `"-1e3"`.
    pub fn number_from_str(s: &str) -> Option<f64> {
        let looks_numeric = s.bytes().any(|b| b.is_ascii_digit())
            && s
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));

        if !looks_numeric {
            return None;
        }

        s.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    /// Text form used by `+` concatenation and `concat()`.
    pub fn to_text(&self) -> EvalResult<String> {
        match self {
            Value::Null => Ok(String::new()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(format_number(*n)),
            Value::String(s) => Ok(s.clone()),
            Value::List(_) | Value::Map(_) => Err(EvalError::NotCoercible(self.as_type())),
        }
    }

    /// Text handed back to callers. `Null` means "no result".
    pub fn into_output(self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(format_number(n)),
            Value::String(s) => Some(s),
            structured @ (Value::List(_) | Value::Map(_)) => {
                serde_json::to_string(&JsonValue::from(structured)).ok()
            }
        }
    }

    pub fn compare(&self, op: impl fmt::Display, rhs: &Value) -> EvalResult<Ordering> {
        match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => a
                .partial_cmp(b)
                .ok_or_else(|| EvalError::binary_mismatch(&op, self, rhs)),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            _ => Err(EvalError::binary_mismatch(op, self, rhs)),
        }
    }

    pub fn as_bool(&self, op: impl fmt::Display) -> EvalResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::unary_mismatch(op, other)),
        }
    }

    fn numeric_pair(self, op: char, rhs: Value) -> EvalResult<(f64, f64)> {
        match (&self, &rhs) {
            (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
            _ => Err(EvalError::binary_mismatch(op, &self, &rhs)),
        }
    }
}

/// Shortest round-trip decimal text; integral values carry no fraction.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // also folds -0
        "0".to_owned()
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.clone().into_output() {
            Some(text) => write!(f, "{}", text),
            None => write!(f, "null"),
        }
    }
}

impl Add for Value {
    type Output = EvalResult<Value>;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Value::Number(a), Value::Number(b)) => Value::from_number(a + b),
            (lhs, rhs) => {
                let mut res = lhs.to_text()?;
                res.push_str(&rhs.to_text()?);
                Ok(Value::String(res))
            }
        }
    }
}

impl Sub for Value {
    type Output = EvalResult<Value>;

    fn sub(self, rhs: Self) -> Self::Output {
        let (a, b) = self.numeric_pair('-', rhs)?;
        Value::from_number(a - b)
    }
}

impl Mul for Value {
    type Output = EvalResult<Value>;

    fn mul(self, rhs: Self) -> Self::Output {
        let (a, b) = self.numeric_pair('*', rhs)?;
        Value::from_number(a * b)
    }
}

impl Div for Value {
    type Output = EvalResult<Value>;

    fn div(self, rhs: Self) -> Self::Output {
        let (a, b) = self.numeric_pair('/', rhs)?;

        if b == 0.0 {
            return Err(EvalError::DivisionByZero);
        }

        Value::from_number(a / b)
    }
}

impl Neg for Value {
    type Output = EvalResult<Value>;

    fn neg(self) -> Self::Output {
        match self {
            Value::Number(n) => Ok(Value::Number(-n)),
            other => Err(EvalError::unary_mismatch('-', &other)),
        }
    }
}

impl Not for Value {
    type Output = EvalResult<Value>;

    fn not(self) -> Self::Output {
        Ok(Value::Bool(!self.as_bool('!')?))
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Value {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(list) => Value::List(list.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> JsonValue {
        match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    JsonValue::from(n as i64)
                } else {
                    serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
                }
            }
            Value::String(s) => JsonValue::String(s),
            Value::List(list) => JsonValue::Array(list.into_iter().map(JsonValue::from).collect()),
            Value::Map(map) => {
                JsonValue::Object(map.into_iter().map(|(k, v)| (k, JsonValue::from(v))).collect())
            }
        }
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Number(val)
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::Number(val.into())
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::String(val.to_owned())
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::String(val)
    }
}

impl From<Vec<Value>> for Value {
    fn from(val: Vec<Value>) -> Self {
        Value::List(val)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(val: BTreeMap<String, Value>) -> Self {
        Value::Map(val)
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::{format_number, Value};
    use crate::EvalError;

    #[test]
    fn number_text() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(123.12), "123.12");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-2.5), "-2.5");
    }

    #[test]
    fn numeric_strings() {
        assert_eq!(Value::number_from_str("12.34"), Some(12.34));
        assert_eq!(Value::number_from_str("-3"), Some(-3.0));
        assert_eq!(Value::number_from_str("1e3"), Some(1000.0));
        assert_eq!(Value::number_from_str("abc"), None);
        assert_eq!(Value::number_from_str(""), None);
        assert_eq!(Value::number_from_str("inf"), None);
        assert_eq!(Value::number_from_str("NaN"), None);
        assert_eq!(Value::number_from_str("1.2.3"), None);
        assert_eq!(Value::number_from_str(" 1"), None);
        assert_eq!(Value::number_from_str("1e999"), None);
    }

    #[test]
    fn add_numbers_or_concat() {
        assert_eq!((Value::from(1.0) + Value::from(2.0)).unwrap(), Value::from(3.0));
        assert_eq!(
            (Value::from(123.12) + Value::from("test")).unwrap(),
            Value::from("123.12test")
        );
        assert_eq!(
            (Value::from(true) + Value::Null).unwrap(),
            Value::from("true")
        );
        assert_eq!(
            (Value::List(vec![]) + Value::from("a")).unwrap_err(),
            EvalError::NotCoercible("list")
        );
    }

    #[test]
    fn arithmetic_requires_numbers() {
        assert_eq!((Value::from(6.0) * Value::from(7.0)).unwrap(), Value::from(42.0));
        assert_eq!((Value::from(1.0) - Value::from(4.0)).unwrap(), Value::from(-3.0));
        assert!(matches!(
            Value::from("a") * Value::from(2.0),
            Err(EvalError::TypeMismatch { .. })
        ));
        assert!(matches!(
            Value::from("2") - Value::from(2.0),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn division() {
        assert_eq!((Value::from(1.0) / Value::from(4.0)).unwrap(), Value::from(0.25));
        assert_eq!(
            (Value::from(1.0) / Value::from(0.0)).unwrap_err(),
            EvalError::DivisionByZero
        );
        assert_eq!(
            (Value::from(1e308) * Value::from(10.0)).unwrap_err(),
            EvalError::NumericOverflow
        );
    }

    #[test]
    fn unary_ops() {
        assert_eq!((-Value::from(2.0)).unwrap(), Value::from(-2.0));
        assert_eq!((!Value::from(false)).unwrap(), Value::from(true));
        assert!((-Value::from("2")).is_err());
        assert!((!Value::Null).is_err());
    }

    #[test]
    fn ordering() {
        use std::cmp::Ordering;

        assert_eq!(
            Value::from(1.0).compare('<', &Value::from(2.0)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Value::from("b").compare('<', &Value::from("a")).unwrap(),
            Ordering::Greater
        );
        assert!(Value::from(1.0).compare('<', &Value::from("a")).is_err());
    }

    #[test]
    fn json_conversion() {
        let value = Value::from(json!({"a": [1, 2.5, "x", null, true], "b": {}}));

        let mut expected = BTreeMap::new();
        expected.insert(
            "a".to_owned(),
            Value::List(vec![
                Value::from(1.0),
                Value::from(2.5),
                Value::from("x"),
                Value::Null,
                Value::from(true),
            ]),
        );
        expected.insert("b".to_owned(), Value::Map(BTreeMap::new()));

        assert_eq!(value, Value::Map(expected));
        assert_eq!(
            value.into_output().unwrap(),
            r#"{"a":[1,2.5,"x",null,true],"b":{}}"#
        );
    }

    #[test]
    fn output_text() {
        assert_eq!(Value::Null.into_output(), None);
        assert_eq!(Value::from(false).into_output().unwrap(), "false");
        assert_eq!(Value::from("").into_output().unwrap(), "");
        assert_eq!(Value::from(7.0).to_string(), "7");
    }
}
