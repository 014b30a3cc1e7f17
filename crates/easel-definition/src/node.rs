use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One processing node of the exported graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
  pub id: String,
  #[serde(rename = "type")]
  pub node_type: String,
  #[serde(default)]
  pub fields: HashMap<String, FieldDef>,
}

/// A node field as exported: a raw value plus optional constraint metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
  #[serde(default)]
  pub value: Value,
  #[serde(default)]
  pub constraints: Constraints,
}

/// Declared constraint metadata for a field.
///
/// Everything is optional; the editor only exports what the node author
/// declared. `kind` is the explicit machine-readable type tag consulted
/// first during field-type detection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraints {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub minimum: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub maximum: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_length: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_length: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub choices: Option<Vec<Value>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub multiple_of: Option<f64>,
  #[serde(default)]
  pub required: bool,
}

impl Constraints {
  /// True if no constraint of any sort was declared.
  pub fn is_empty(&self) -> bool {
    self.kind.is_none()
      && self.minimum.is_none()
      && self.maximum.is_none()
      && self.min_length.is_none()
      && self.max_length.is_none()
      && self.choices.is_none()
      && self.multiple_of.is_none()
      && !self.required
  }

  /// True if the numeric bounds rule out fractional values.
  pub fn is_integral(&self) -> bool {
    self.multiple_of == Some(1.0)
      || (self.minimum.is_none_or(|m| m.fract() == 0.0)
        && self.maximum.is_none_or(|m| m.fract() == 0.0)
        && self.multiple_of.is_none())
  }
}

/// A directed edge between two node slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
  pub from: (String, String),
  pub to: (String, String),
}
