use thiserror::Error;

use crate::value::ScalarKind;

/// A per-field constraint violation.
///
/// Raised eagerly on direct sets and aggregated (never thrown mid-loop)
/// by whole-handle validation. Every message names the violated
/// constraint and the offending value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
  /// The assigned value has a different scalar kind than the field.
  #[error("kind mismatch: field is {expected:?}, value is {actual:?}")]
  KindMismatch {
    expected: ScalarKind,
    actual: ScalarKind,
  },

  /// The value is below the declared minimum.
  #[error("value {value} violates minimum {minimum}")]
  Minimum { value: String, minimum: f64 },

  /// The value is above the declared maximum.
  #[error("value {value} violates maximum {maximum}")]
  Maximum { value: String, maximum: f64 },

  /// The text is shorter than the declared min_length.
  #[error("length {length} violates min_length {min_length}")]
  MinLength { length: usize, min_length: usize },

  /// The text is longer than the declared max_length.
  #[error("length {length} violates max_length {max_length}")]
  MaxLength { length: usize, max_length: usize },

  /// The value is not one of the declared choices.
  #[error("value {value} is not among the declared choices")]
  Choices { value: String },

  /// The value is not a multiple of the declared step.
  #[error("value {value} violates multiple_of {multiple_of}")]
  MultipleOf { value: String, multiple_of: f64 },

  /// A structured field has no attribute of that name.
  #[error("unknown attribute: {name}")]
  UnknownAttribute { name: String },

  /// A required field has no value.
  #[error("required field is unset")]
  RequiredUnset,
}

/// The registry could not settle a field's type in strict mode.
#[derive(Debug, Error)]
pub enum FieldTypeError {
  /// A detection rule matched but its builder rejected the raw value.
  #[error("ambiguous field type for {node_type}.{field_name}: rule \"{rule}\" failed: {reason}")]
  Ambiguous {
    node_type: String,
    field_name: String,
    rule: String,
    reason: String,
  },
}

/// A wire value could not be decoded back into a field.
#[derive(Debug, Error)]
pub enum WireError {
  /// The wire value's shape matches no field variant.
  #[error("unrecognized wire value: {0}")]
  Unrecognized(String),
}
