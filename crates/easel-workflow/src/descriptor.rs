use easel_definition::ProvenancePath;
use easel_field::FieldValue;

/// One row of the ordered input table.
///
/// The index is assigned once by discovery and never reassigned; the
/// provenance path is used verbatim at submission time to locate the
/// value slot inside the copied raw export.
#[derive(Debug, Clone)]
pub struct InputDescriptor {
  /// Stable, unique, 0-based position in the discovered sequence.
  pub input_index: usize,
  /// Advisory display label; not required to be unique.
  pub label: String,
  pub node_id: String,
  pub field_name: String,
  pub provenance_path: ProvenancePath,
  /// Derived from the declared constraints.
  pub required: bool,
  /// The typed field; only its payload mutates after discovery.
  pub field: FieldValue,
}
