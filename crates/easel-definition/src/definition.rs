use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::DefinitionError;
use crate::form::FormContainer;
use crate::node::{EdgeDef, FieldDef, NodeDef};
use crate::path::ProvenancePath;

/// Parsed view of the export, deserialized once at load time.
#[derive(Debug, Clone, Deserialize)]
struct Document {
  id: String,
  name: String,
  nodes: Vec<NodeDef>,
  #[serde(default)]
  edges: Vec<EdgeDef>,
  form: FormContainer,
}

/// An immutable workflow definition: the untouched raw export plus parsed
/// read-only views over it.
///
/// The raw value is the only thing ever copied into a submission payload;
/// the parsed views exist for lookup and are never written back.
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
  raw: Value,
  doc: Document,
  /// node id -> position in the export's `nodes` array.
  node_positions: HashMap<String, usize>,
}

impl WorkflowDefinition {
  /// Load a definition from an already-parsed export value.
  pub fn from_json(raw: Value) -> Result<Self, DefinitionError> {
    let doc: Document = serde_json::from_value(raw.clone())?;

    let mut node_positions = HashMap::new();
    for (position, node) in doc.nodes.iter().enumerate() {
      if node_positions.insert(node.id.clone(), position).is_some() {
        return Err(DefinitionError::DuplicateNode(node.id.clone()));
      }
    }

    Ok(Self {
      raw,
      doc,
      node_positions,
    })
  }

  /// Load a definition from export bytes.
  pub fn from_slice(bytes: &[u8]) -> Result<Self, DefinitionError> {
    Self::from_json(serde_json::from_slice(bytes)?)
  }

  pub fn id(&self) -> &str {
    &self.doc.id
  }

  pub fn name(&self) -> &str {
    &self.doc.name
  }

  /// The untouched raw export.
  pub fn raw(&self) -> &Value {
    &self.raw
  }

  pub fn nodes(&self) -> &[NodeDef] {
    &self.doc.nodes
  }

  pub fn edges(&self) -> &[EdgeDef] {
    &self.doc.edges
  }

  /// Root of the form container tree.
  pub fn form(&self) -> &FormContainer {
    &self.doc.form
  }

  /// Look up a node by id.
  pub fn node(&self, node_id: &str) -> Option<&NodeDef> {
    self
      .node_positions
      .get(node_id)
      .map(|&position| &self.doc.nodes[position])
  }

  /// Look up a field by node id and field name.
  pub fn field(&self, node_id: &str, field_name: &str) -> Option<&FieldDef> {
    self.node(node_id)?.fields.get(field_name)
  }

  /// The structural path to a field's value slot inside the raw export.
  ///
  /// Returns `None` if the node or field does not exist.
  pub fn provenance_for(&self, node_id: &str, field_name: &str) -> Option<ProvenancePath> {
    let &position = self.node_positions.get(node_id)?;
    self.doc.nodes[position].fields.get(field_name)?;

    let mut path = ProvenancePath::new();
    path.push_key("nodes");
    path.push_index(position);
    path.push_key("fields");
    path.push_key(field_name);
    path.push_key("value");
    Some(path)
  }
}
