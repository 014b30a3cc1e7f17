use serde::{Deserialize, Serialize};

/// A container in the form tree: an ordered list of child elements.
///
/// Child order is authored in the editor and is the sole source of input
/// index stability — node ids and field names play no part in ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormContainer {
  pub id: String,
  #[serde(default)]
  pub children: Vec<FormElement>,
}

/// One element of a form container: either a nested container or a
/// reference to a node field exposed as a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormElement {
  Container(FormContainer),
  Field(FieldRef),
}

/// A form-tree reference to `(node_id, field_name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRef {
  pub node_id: String,
  pub field_name: String,
  /// Advisory display label; not required to be unique.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
}
