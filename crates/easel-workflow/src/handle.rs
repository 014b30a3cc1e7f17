use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use easel_definition::WorkflowDefinition;
use easel_field::{
  DetectContext, DetectMode, Diagnostic, FieldTypeRegistry, FieldValue, ScalarValue,
};

use crate::classify::{BoardWriterSet, OutputSlot, classify};
use crate::descriptor::InputDescriptor;
use crate::error::{DiscoveryError, HandleError, SubmissionError};
use crate::traversal::traverse;

/// Discovery-time knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveryOptions {
  /// Surface field-type ambiguity as an error instead of falling back.
  pub strict: bool,
}

/// Where the handle is in its lifecycle.
///
/// A built payload is a value, not a live view — edits after
/// `Submitted` never retroactively mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
  /// Inputs enumerated, nothing edited yet.
  Discovered,
  /// One or more values have been set.
  Configured,
  /// At least one payload has been built and handed out.
  Submitted,
}

/// An opaque submission payload: the raw export, deep-copied, with wire
/// values substituted at every discovered provenance path.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
  payload: Value,
}

impl Submission {
  pub fn payload(&self) -> &Value {
    &self.payload
  }

  pub fn into_payload(self) -> Value {
    self.payload
  }
}

/// A controllable execution unit over one immutable definition.
///
/// Discovery, mutation and payload construction are synchronous and free
/// of external side effects. A handle is not safe for concurrent
/// mutation; concurrent submissions should use independent handles over
/// the same `Arc<WorkflowDefinition>`.
#[derive(Debug)]
pub struct WorkflowHandle {
  definition: Arc<WorkflowDefinition>,
  inputs: Vec<InputDescriptor>,
  outputs: Vec<OutputSlot>,
  diagnostics: Vec<Diagnostic>,
  state: HandleState,
}

impl WorkflowHandle {
  /// Enumerate the definition's configurable inputs and classify its
  /// board-capable nodes.
  ///
  /// Index assignment follows the form tree's declared order and happens
  /// exactly once; a form reference to a nonexistent node or field is
  /// fatal, never silently skipped.
  pub fn discover(
    definition: Arc<WorkflowDefinition>,
    registry: &FieldTypeRegistry,
    writers: &BoardWriterSet,
    options: DiscoveryOptions,
  ) -> Result<Self, DiscoveryError> {
    let mode = if options.strict {
      DetectMode::Strict
    } else {
      DetectMode::Lenient
    };

    let mut inputs = Vec::new();
    let mut diagnostics = Vec::new();

    for (input_index, field_ref) in traverse(definition.form()).into_iter().enumerate() {
      let dangling = || DiscoveryError::DanglingFieldRef {
        node_id: field_ref.node_id.clone(),
        field_name: field_ref.field_name.clone(),
      };

      let node = definition.node(&field_ref.node_id).ok_or_else(dangling)?;
      let field_def = node.fields.get(&field_ref.field_name).ok_or_else(dangling)?;
      let provenance_path = definition
        .provenance_for(&field_ref.node_id, &field_ref.field_name)
        .ok_or_else(dangling)?;

      let field = registry.detect(
        &DetectContext {
          node_type: &node.node_type,
          field_name: &field_ref.field_name,
          value: &field_def.value,
          constraints: &field_def.constraints,
        },
        mode,
        &mut diagnostics,
      )?;

      debug!(
        input_index,
        node_id = %field_ref.node_id,
        field_name = %field_ref.field_name,
        class = %field.class(),
        "discovered input"
      );

      inputs.push(InputDescriptor {
        input_index,
        label: field_ref
          .label
          .clone()
          .unwrap_or_else(|| field_ref.field_name.clone()),
        node_id: field_ref.node_id.clone(),
        field_name: field_ref.field_name.clone(),
        provenance_path,
        required: field_def.constraints.required,
        field,
      });
    }

    let outputs = classify(&definition, &inputs, writers);

    Ok(Self {
      definition,
      inputs,
      outputs,
      diagnostics,
      state: HandleState::Discovered,
    })
  }

  pub fn definition(&self) -> &Arc<WorkflowDefinition> {
    &self.definition
  }

  pub fn state(&self) -> HandleState {
    self.state
  }

  /// Diagnostics collected by lenient-mode field-type fallbacks.
  pub fn diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }

  /// The ordered, read-only input table.
  pub fn list_inputs(&self) -> &[InputDescriptor] {
    &self.inputs
  }

  pub fn get_field(&self, index: usize) -> Result<&FieldValue, HandleError> {
    self
      .inputs
      .get(index)
      .map(|d| &d.field)
      .ok_or(HandleError::IndexOutOfRange {
        index,
        len: self.inputs.len(),
      })
  }

  /// Swap in a replacement field of the same concrete variant.
  pub fn replace_field(&mut self, index: usize, field: FieldValue) -> Result<(), HandleError> {
    let len = self.inputs.len();
    let descriptor = self
      .inputs
      .get_mut(index)
      .ok_or(HandleError::IndexOutOfRange { index, len })?;

    if descriptor.field.class() != field.class() {
      return Err(HandleError::VariantMismatch {
        index,
        expected: descriptor.field.class(),
        got: field.class(),
      });
    }

    descriptor.field = field;
    self.mark_configured();
    Ok(())
  }

  /// Assign a scalar payload, validated eagerly against the declared
  /// constraints.
  pub fn set_scalar(&mut self, index: usize, value: ScalarValue) -> Result<(), HandleError> {
    let len = self.inputs.len();
    let descriptor = self
      .inputs
      .get_mut(index)
      .ok_or(HandleError::IndexOutOfRange { index, len })?;

    match &mut descriptor.field {
      FieldValue::Scalar(field) => field
        .set(value)
        .map_err(|source| HandleError::Validation { index, source })?,
      other => {
        return Err(HandleError::VariantMismatch {
          index,
          expected: other.class(),
          got: easel_field::FieldClass::Scalar,
        });
      }
    }
    self.mark_configured();
    Ok(())
  }

  /// Assign or clear a resource reference.
  pub fn set_resource(&mut self, index: usize, name: Option<String>) -> Result<(), HandleError> {
    let len = self.inputs.len();
    let descriptor = self
      .inputs
      .get_mut(index)
      .ok_or(HandleError::IndexOutOfRange { index, len })?;

    match &mut descriptor.field {
      FieldValue::Resource(field) => field.set_name(name),
      other => {
        return Err(HandleError::VariantMismatch {
          index,
          expected: other.class(),
          got: easel_field::FieldClass::Resource,
        });
      }
    }
    self.mark_configured();
    Ok(())
  }

  /// Overwrite one attribute of a structured field.
  pub fn set_attr(&mut self, index: usize, name: &str, value: Value) -> Result<(), HandleError> {
    let len = self.inputs.len();
    let descriptor = self
      .inputs
      .get_mut(index)
      .ok_or(HandleError::IndexOutOfRange { index, len })?;

    match &mut descriptor.field {
      FieldValue::Structured(field) => field
        .set_attr(name, value)
        .map_err(|source| HandleError::Validation { index, source })?,
      other => {
        return Err(HandleError::VariantMismatch {
          index,
          expected: other.class(),
          got: easel_field::FieldClass::Structured,
        });
      }
    }
    self.mark_configured();
    Ok(())
  }

  /// Check every input, aggregating all violations keyed by index.
  ///
  /// Never stops at the first failure.
  pub fn validate_all(&self) -> BTreeMap<usize, Vec<String>> {
    let mut violations: BTreeMap<usize, Vec<String>> = BTreeMap::new();

    for descriptor in &self.inputs {
      let mut messages = Vec::new();
      match &descriptor.field {
        FieldValue::Scalar(field) => {
          if let Err(e) = field.validate() {
            messages.push(e.to_string());
          }
        }
        FieldValue::Resource(field) => {
          if descriptor.required && !field.is_set() {
            messages.push(easel_field::ValidationError::RequiredUnset.to_string());
          }
        }
        FieldValue::Structured(_) => {}
      }
      if !messages.is_empty() {
        violations.insert(descriptor.input_index, messages);
      }
    }

    violations
  }

  /// Board-capable nodes, classified once at discovery.
  pub fn classify_outputs(&self) -> &[OutputSlot] {
    &self.outputs
  }

  /// Build a submission payload: deep-copy the raw export and write each
  /// field's wire form at exactly its provenance path.
  ///
  /// No key is ever added or removed anywhere in the copy. A path that
  /// no longer resolves is fatal.
  pub fn build_submission(&mut self) -> Result<Submission, SubmissionError> {
    let mut payload = self.definition.raw().clone();

    for descriptor in &self.inputs {
      let slot = descriptor
        .provenance_path
        .resolve_mut(&mut payload)
        .ok_or_else(|| SubmissionError::Structure {
          index: descriptor.input_index,
          path: descriptor.provenance_path.to_string(),
        })?;
      *slot = descriptor.field.to_wire();
    }

    self.state = HandleState::Submitted;
    Ok(Submission { payload })
  }

  fn mark_configured(&mut self) {
    if self.state == HandleState::Discovered {
      self.state = HandleState::Configured;
    }
  }
}
