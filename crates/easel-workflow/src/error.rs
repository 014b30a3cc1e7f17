use thiserror::Error;

use easel_field::{FieldClass, FieldTypeError, ValidationError};

/// Fatal errors while enumerating a definition's inputs.
#[derive(Debug, Error)]
pub enum DiscoveryError {
  /// The form tree references a node or field the graph does not have.
  #[error("form tree references nonexistent field: {node_id}.{field_name}")]
  DanglingFieldRef { node_id: String, field_name: String },

  /// Strict-mode field-type resolution failed.
  #[error(transparent)]
  FieldType(#[from] FieldTypeError),
}

/// Errors from index-based access and eager-validated sets.
#[derive(Debug, Error)]
pub enum HandleError {
  /// The input index is outside the discovered range.
  #[error("input index {index} out of range (0..{len})")]
  IndexOutOfRange { index: usize, len: usize },

  /// A replacement field's variant differs from the original's.
  #[error("input {index}: variant mismatch: field is {expected}, replacement is {got}")]
  VariantMismatch {
    index: usize,
    expected: FieldClass,
    got: FieldClass,
  },

  /// A set violated the field's declared constraints.
  #[error("input {index}: {source}")]
  Validation {
    index: usize,
    #[source]
    source: ValidationError,
  },
}

/// Fatal errors while building a submission payload.
#[derive(Debug, Error)]
pub enum SubmissionError {
  /// A provenance path no longer resolves inside the copied export.
  ///
  /// This implies the definition was mutated externally after discovery
  /// — a violated invariant, never silently skipped.
  #[error("input {index}: provenance path no longer resolves: {path}")]
  Structure { index: usize, path: String },
}
