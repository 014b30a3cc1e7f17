//! Easel Field
//!
//! Typed runtime wrappers for discovered workflow fields, plus the
//! [`FieldTypeRegistry`] that resolves weak signals (explicit tags, field
//! names, node types, raw value shapes, declared constraints) into a
//! concrete [`FieldValue`] variant.
//!
//! All raw values enter through the registry's narrow decode boundary;
//! everything downstream operates only on the tagged variants. Once a
//! field is constructed its variant never changes — only the payload
//! mutates, and mutation is validated fail-closed against the declared
//! constraints.

mod error;
mod field;
mod registry;
mod value;

pub use error::{FieldTypeError, ValidationError, WireError};
pub use field::{FieldClass, FieldValue, ResourceField, ScalarField, StructuredField};
pub use registry::{DetectContext, DetectMode, DetectRule, Diagnostic, FieldTypeRegistry};
pub use value::{ScalarKind, ScalarValue};
