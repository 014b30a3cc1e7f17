//! Easel Definition
//!
//! This crate provides the immutable [`WorkflowDefinition`]: the raw JSON
//! export of a GUI-authored node graph together with parsed, read-only
//! views over its nodes, fields, edges and form tree.
//!
//! A definition is loaded once and never mutated. Submission payloads are
//! built elsewhere by deep-copying [`WorkflowDefinition::raw`] and
//! substituting leaf values at [`ProvenancePath`]s, so the original
//! structure survives byte-for-byte apart from those leaves.

mod definition;
mod error;
mod form;
mod node;
mod path;

pub use definition::WorkflowDefinition;
pub use error::DefinitionError;
pub use form::{FieldRef, FormContainer, FormElement};
pub use node::{Constraints, EdgeDef, FieldDef, NodeDef};
pub use path::{PathStep, ProvenancePath};
