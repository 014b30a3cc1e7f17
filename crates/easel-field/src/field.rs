use serde_json::{Map, Value};

use easel_definition::Constraints;

use crate::error::{ValidationError, WireError};
use crate::value::{ScalarKind, ScalarValue};

/// Wire keys that mark a single-entry object as a resource reference.
pub(crate) fn is_resource_key(key: &str) -> bool {
  key.ends_with("_name") || key == "filename"
}

/// The variant class of a field, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
  Scalar,
  Structured,
  Resource,
}

impl std::fmt::Display for FieldClass {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FieldClass::Scalar => write!(f, "scalar"),
      FieldClass::Structured => write!(f, "structured"),
      FieldClass::Resource => write!(f, "resource"),
    }
  }
}

/// A single-slot scalar field validated against declared constraints.
///
/// Equality compares kind and payload only; constraint metadata is
/// advisory and excluded, so the wire round trip is exact.
#[derive(Debug, Clone)]
pub struct ScalarField {
  kind: ScalarKind,
  value: ScalarValue,
  constraints: Constraints,
}

impl PartialEq for ScalarField {
  fn eq(&self, other: &Self) -> bool {
    self.kind == other.kind && self.value == other.value
  }
}

impl ScalarField {
  /// Construct a scalar field, validating the initial value.
  pub fn new(
    kind: ScalarKind,
    value: ScalarValue,
    constraints: Constraints,
  ) -> Result<Self, ValidationError> {
    check_scalar(kind, &value, &constraints)?;
    Ok(Self {
      kind,
      value,
      constraints,
    })
  }

  pub fn kind(&self) -> ScalarKind {
    self.kind
  }

  pub fn value(&self) -> &ScalarValue {
    &self.value
  }

  pub fn constraints(&self) -> &Constraints {
    &self.constraints
  }

  /// Assign a new payload.
  ///
  /// Fails closed: on any violation the previous value is left untouched.
  pub fn set(&mut self, value: ScalarValue) -> Result<(), ValidationError> {
    check_scalar(self.kind, &value, &self.constraints)?;
    self.value = value;
    Ok(())
  }

  /// Re-check the current payload against the declared constraints.
  pub fn validate(&self) -> Result<(), ValidationError> {
    check_scalar(self.kind, &self.value, &self.constraints)
  }
}

fn check_scalar(
  kind: ScalarKind,
  value: &ScalarValue,
  constraints: &Constraints,
) -> Result<(), ValidationError> {
  if value.kind() != kind {
    return Err(ValidationError::KindMismatch {
      expected: kind,
      actual: value.kind(),
    });
  }

  if let Some(number) = value.as_f64() {
    if let Some(minimum) = constraints.minimum {
      if number < minimum {
        return Err(ValidationError::Minimum {
          value: value.to_string(),
          minimum,
        });
      }
    }
    if let Some(maximum) = constraints.maximum {
      if number > maximum {
        return Err(ValidationError::Maximum {
          value: value.to_string(),
          maximum,
        });
      }
    }
    if let Some(multiple_of) = constraints.multiple_of {
      if multiple_of > 0.0 && (number / multiple_of).fract() != 0.0 {
        return Err(ValidationError::MultipleOf {
          value: value.to_string(),
          multiple_of,
        });
      }
    }
  }

  if let ScalarValue::Text(text) = value {
    let length = text.chars().count();
    if let Some(min_length) = constraints.min_length {
      if length < min_length {
        return Err(ValidationError::MinLength { length, min_length });
      }
    }
    if let Some(max_length) = constraints.max_length {
      if length > max_length {
        return Err(ValidationError::MaxLength { length, max_length });
      }
    }
  }

  if let Some(choices) = &constraints.choices {
    if !choices.is_empty() && !choices.contains(&value.to_json()) {
      return Err(ValidationError::Choices {
        value: value.to_string(),
      });
    }
  }

  Ok(())
}

/// A field holding named attributes directly, with no unifying slot.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredField {
  attributes: Map<String, Value>,
}

impl StructuredField {
  pub fn new(attributes: Map<String, Value>) -> Self {
    Self { attributes }
  }

  pub fn attributes(&self) -> &Map<String, Value> {
    &self.attributes
  }

  pub fn attr(&self, name: &str) -> Option<&Value> {
    self.attributes.get(name)
  }

  /// Overwrite one attribute. The attribute set is fixed at construction.
  pub fn set_attr(&mut self, name: &str, value: Value) -> Result<(), ValidationError> {
    match self.attributes.get_mut(name) {
      Some(slot) => {
        *slot = value;
        Ok(())
      }
      None => Err(ValidationError::UnknownAttribute {
        name: name.to_string(),
      }),
    }
  }
}

/// A field referencing a stored resource by name.
///
/// "No value" is a distinct state — it is never conflated with an empty
/// string, and it survives the wire round trip because the wire form
/// keeps the key: `{"image_name": null}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceField {
  key: String,
  name: Option<String>,
}

impl ResourceField {
  pub fn new(key: impl Into<String>, name: Option<String>) -> Self {
    Self {
      key: key.into(),
      name,
    }
  }

  /// The wire key under which the reference is written.
  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn set_name(&mut self, name: Option<String>) {
    self.name = name;
  }

  pub fn is_set(&self) -> bool {
    self.name.is_some()
  }
}

/// A typed runtime wrapper for one discovered field.
///
/// The variant is fixed at construction; only the payload mutates.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
  Scalar(ScalarField),
  Structured(StructuredField),
  Resource(ResourceField),
}

impl FieldValue {
  pub fn class(&self) -> FieldClass {
    match self {
      FieldValue::Scalar(_) => FieldClass::Scalar,
      FieldValue::Structured(_) => FieldClass::Structured,
      FieldValue::Resource(_) => FieldClass::Resource,
    }
  }

  /// The primitive-JSON form written into the submission payload.
  pub fn to_wire(&self) -> Value {
    match self {
      FieldValue::Scalar(field) => field.value().to_json(),
      FieldValue::Structured(field) => Value::Object(field.attributes().clone()),
      FieldValue::Resource(field) => {
        let mut object = Map::new();
        object.insert(
          field.key().to_string(),
          field
            .name()
            .map(|n| Value::String(n.to_string()))
            .unwrap_or(Value::Null),
        );
        Value::Object(object)
      }
    }
  }

  /// Decode a wire value back into a field, without external context.
  ///
  /// Single-entry objects under a resource key decode as [`ResourceField`];
  /// any other object decodes as [`StructuredField`]; JSON primitives
  /// decode as [`ScalarField`] of the matching kind.
  pub fn from_wire(wire: &Value) -> Result<Self, WireError> {
    match wire {
      Value::Object(object) => {
        if object.len() == 1 {
          let (key, value) = object.iter().next().ok_or_else(|| unreachable_entry())?;
          if is_resource_key(key) {
            let name = match value {
              Value::Null => None,
              Value::String(s) => Some(s.clone()),
              other => return Err(WireError::Unrecognized(other.to_string())),
            };
            return Ok(FieldValue::Resource(ResourceField::new(key.clone(), name)));
          }
        }
        Ok(FieldValue::Structured(StructuredField::new(object.clone())))
      }
      Value::Bool(v) => Ok(scalar_wire(ScalarValue::Boolean(*v))),
      Value::Number(n) => {
        if let Some(v) = n.as_i64() {
          Ok(scalar_wire(ScalarValue::Integer(v)))
        } else if let Some(v) = n.as_f64() {
          Ok(scalar_wire(ScalarValue::Float(v)))
        } else {
          Err(WireError::Unrecognized(n.to_string()))
        }
      }
      Value::String(s) => Ok(scalar_wire(ScalarValue::Text(s.clone()))),
      other => Err(WireError::Unrecognized(other.to_string())),
    }
  }
}

fn scalar_wire(value: ScalarValue) -> FieldValue {
  FieldValue::Scalar(ScalarField {
    kind: value.kind(),
    value,
    constraints: Constraints::default(),
  })
}

fn unreachable_entry() -> WireError {
  WireError::Unrecognized("empty object entry".to_string())
}
