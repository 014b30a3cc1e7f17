use std::collections::HashMap;

use easel_definition::WorkflowDefinition;

use crate::descriptor::InputDescriptor;

/// The open, extensible set of node types that can write to a board,
/// keyed by node type with the name of the board field.
#[derive(Debug, Clone, Default)]
pub struct BoardWriterSet {
  writers: HashMap<String, String>,
}

impl BoardWriterSet {
  pub fn empty() -> Self {
    Self::default()
  }

  /// The stock board-writing node types.
  pub fn with_defaults() -> Self {
    let mut set = Self::empty();
    set.register("save_image", "board");
    set.register("preview_image", "board");
    set
  }

  /// Mark a node type as board-capable via the given board field.
  pub fn register(&mut self, node_type: impl Into<String>, board_field: impl Into<String>) {
    self.writers.insert(node_type.into(), board_field.into());
  }

  /// The board field name for a node type, if it is board-capable.
  pub fn board_field(&self, node_type: &str) -> Option<&str> {
    self.writers.get(node_type).map(String::as_str)
  }
}

/// One board-capable node, partitioned into exposed output or debug sink.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSlot {
  pub node_id: String,
  pub node_type: String,
  /// True iff the node's board field is itself a discovered input.
  pub exposed: bool,
  /// The board field's input index, present iff exposed.
  pub input_index: Option<usize>,
}

/// Partition the definition's board-capable nodes.
///
/// A node is an exposed output iff its board field appears in the
/// discovered input table; otherwise it is a debug sink. Ordered by node
/// declaration order; independent of any execution.
pub fn classify(
  definition: &WorkflowDefinition,
  inputs: &[InputDescriptor],
  writers: &BoardWriterSet,
) -> Vec<OutputSlot> {
  definition
    .nodes()
    .iter()
    .filter_map(|node| {
      let board_field = writers.board_field(&node.node_type)?;
      let input_index = inputs
        .iter()
        .find(|d| d.node_id == node.id && d.field_name == board_field)
        .map(|d| d.input_index);
      Some(OutputSlot {
        node_id: node.id.clone(),
        node_type: node.node_type.clone(),
        exposed: input_index.is_some(),
        input_index,
      })
    })
    .collect()
}
