use thiserror::Error;

/// Errors raised while loading a workflow export.
#[derive(Debug, Error)]
pub enum DefinitionError {
  /// The export JSON does not match the expected shape.
  #[error("invalid workflow export: {0}")]
  Parse(#[from] serde_json::Error),

  /// Two nodes in the export share the same id.
  #[error("duplicate node id: {0}")]
  DuplicateNode(String),
}
