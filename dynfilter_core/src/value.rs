use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::error::ConditionError;

/// Single value stored in a row field or used as a condition operand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Str(String),
}

/// Runtime value of a row field: either one scalar or a list of them (e.g. tags).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    List(Vec<Scalar>),
    Scalar(Scalar),
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Str(String::new())
    }
}

impl Scalar {
    pub fn str(s: impl Into<String>) -> Self {
        Scalar::Str(s.into())
    }

    pub fn is_empty_str(&self) -> bool {
        matches!(self, Scalar::Str(s) if s.is_empty())
    }

    /// Numeric coercion. Empty or blank strings are zero, anything unparsable is NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Scalar::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Scalar::Number(n) => *n,
            Scalar::Str(s) => parse_number(s),
        }
    }

    /// Text form used by the string operators.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => format_number(*n),
            Scalar::Str(s) => s.clone(),
        }
    }

    /// Equality without any coercion: `1` and `"1"` are different values, NaN equals nothing.
    pub fn strict_eq(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Number(a), Scalar::Number(b)) => a == b,
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            _ => false,
        }
    }

    /// Membership equality used for list lookups, same as [Self::strict_eq] except NaN matches NaN.
    pub fn same_value(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Number(a), Scalar::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_eq(other),
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl TryFrom<serde_json::Value> for Scalar {
    type Error = ConditionError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;
        match value {
            Value::Bool(b) => Ok(Scalar::Bool(b)),
            Value::Number(n) => Ok(Scalar::Number(n.as_f64().unwrap_or(f64::NAN))),
            Value::String(s) => Ok(Scalar::Str(s)),
            Value::Null => Ok(Scalar::default()),
            other => Err(ConditionError::NonScalarOperand(other.to_string())),
        }
    }
}

impl From<Scalar> for serde_json::Value {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Bool(b) => serde_json::Value::Bool(b),
            Scalar::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Scalar::Str(s) => serde_json::Value::String(s),
        }
    }
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            FieldValue::List(list) => Some(list),
            FieldValue::Scalar(_) => None,
        }
    }

    /// Lists coerce through their text form: `[]` is zero, `[x]` is `x`, longer lists are NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            FieldValue::Scalar(s) => s.to_number(),
            FieldValue::List(list) => match list.as_slice() {
                [] => 0.0,
                [single] => parse_number(&single.to_text()),
                _ => f64::NAN,
            },
        }
    }

    /// Lists render comma separated without spaces.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.to_text(),
            FieldValue::List(list) => list
                .iter()
                .map(Scalar::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Vec<Scalar>> for FieldValue {
    fn from(value: Vec<Scalar>) -> Self {
        FieldValue::List(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Scalar(value.into())
    }
}

fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    match s {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // str::parse also takes "inf" and "nan", which are not numbers here
        _ if s.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => f64::NAN,
        _ => s.parse::<f64>().unwrap_or(f64::NAN),
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_coercion() {
        assert_eq!(Scalar::str("15000.50").to_number(), 15000.5);
        assert_eq!(Scalar::str("  42 ").to_number(), 42.0);
        assert_eq!(Scalar::str("").to_number(), 0.0);
        assert_eq!(Scalar::str("1e3").to_number(), 1000.0);
        assert_eq!(Scalar::Bool(true).to_number(), 1.0);
        assert!(Scalar::str("abc").to_number().is_nan());
        assert!(Scalar::str("inf").to_number().is_nan());
        assert!(Scalar::str("2025-01-15").to_number().is_nan());
        assert_eq!(Scalar::str("-Infinity").to_number(), f64::NEG_INFINITY);
    }

    #[test]
    fn list_coercion() {
        assert_eq!(FieldValue::List(vec![]).to_number(), 0.0);
        assert_eq!(FieldValue::List(vec![Scalar::str("7")]).to_number(), 7.0);
        assert!(FieldValue::List(vec![1.0.into(), 2.0.into()]).to_number().is_nan());
        assert_eq!(
            FieldValue::List(vec!["prc".into(), "simples".into()]).to_text(),
            "prc,simples"
        );
    }

    #[test]
    fn number_text() {
        assert_eq!(Scalar::Number(12300.0).to_text(), "12300");
        assert_eq!(Scalar::Number(15000.5).to_text(), "15000.5");
        assert_eq!(Scalar::Number(-0.0).to_text(), "0");
        assert_eq!(Scalar::Number(f64::NAN).to_text(), "NaN");
    }

    #[test]
    fn strict_equality_does_not_coerce() {
        assert!(Scalar::Number(1.0).strict_eq(&Scalar::Number(1.0)));
        assert!(!Scalar::Number(1.0).strict_eq(&Scalar::str("1")));
        assert!(!Scalar::Bool(true).strict_eq(&Scalar::Number(1.0)));
        assert!(!Scalar::Number(f64::NAN).strict_eq(&Scalar::Number(f64::NAN)));
        assert!(Scalar::Number(f64::NAN).same_value(&Scalar::Number(f64::NAN)));
    }

    #[test]
    fn deserialize_field_values() {
        let v: FieldValue = serde_json::from_str(r#"["prc", "simples"]"#).unwrap();
        assert_eq!(v, FieldValue::List(vec!["prc".into(), "simples".into()]));
        let v: FieldValue = serde_json::from_str("15000.5").unwrap();
        assert_eq!(v, FieldValue::Scalar(Scalar::Number(15000.5)));
        let v: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FieldValue::Scalar(Scalar::Bool(true)));
        assert!(serde_json::from_str::<FieldValue>(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn json_operand_conversion() {
        let s = Scalar::try_from(serde_json::json!("ativo")).unwrap();
        assert_eq!(s, Scalar::str("ativo"));
        assert_eq!(Scalar::try_from(serde_json::Value::Null).unwrap(), Scalar::default());
        assert!(Scalar::try_from(serde_json::json!([1, 2])).is_err());
    }
}
