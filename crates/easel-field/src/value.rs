use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The concrete primitive kind of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
  Integer,
  Float,
  Boolean,
  Text,
}

/// A scalar payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
  Integer(i64),
  Float(f64),
  Boolean(bool),
  Text(String),
}

impl ScalarValue {
  pub fn kind(&self) -> ScalarKind {
    match self {
      ScalarValue::Integer(_) => ScalarKind::Integer,
      ScalarValue::Float(_) => ScalarKind::Float,
      ScalarValue::Boolean(_) => ScalarKind::Boolean,
      ScalarValue::Text(_) => ScalarKind::Text,
    }
  }

  /// The primitive-JSON wire form of this payload.
  pub fn to_json(&self) -> Value {
    match self {
      ScalarValue::Integer(v) => Value::from(*v),
      ScalarValue::Float(v) => Value::from(*v),
      ScalarValue::Boolean(v) => Value::Bool(*v),
      ScalarValue::Text(v) => Value::String(v.clone()),
    }
  }

  /// Decode a JSON primitive as the given kind, if the shapes agree.
  pub fn from_json(kind: ScalarKind, value: &Value) -> Option<Self> {
    match kind {
      ScalarKind::Integer => value.as_i64().map(ScalarValue::Integer),
      ScalarKind::Float => value.as_f64().map(ScalarValue::Float),
      ScalarKind::Boolean => value.as_bool().map(ScalarValue::Boolean),
      ScalarKind::Text => value.as_str().map(|s| ScalarValue::Text(s.to_string())),
    }
  }

  /// Numeric view, for bound checks.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      ScalarValue::Integer(v) => Some(*v as f64),
      ScalarValue::Float(v) => Some(*v),
      _ => None,
    }
  }
}

impl std::fmt::Display for ScalarValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ScalarValue::Integer(v) => write!(f, "{v}"),
      ScalarValue::Float(v) => write!(f, "{v}"),
      ScalarValue::Boolean(v) => write!(f, "{v}"),
      ScalarValue::Text(v) => write!(f, "{v}"),
    }
  }
}
