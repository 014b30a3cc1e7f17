use easel_definition::{FieldRef, FormContainer, FormElement};

/// Flatten the form tree into its ordered field-reference sequence.
///
/// Depth-first, pre-order: a container's children are visited in declared
/// order, and a nested container is recursed into fully before its next
/// sibling. Declared child order is the only thing index stability
/// depends on; empty containers contribute nothing.
pub fn traverse(root: &FormContainer) -> Vec<&FieldRef> {
  let mut refs = Vec::new();
  visit(root, &mut refs);
  refs
}

fn visit<'a>(container: &'a FormContainer, refs: &mut Vec<&'a FieldRef>) {
  for child in &container.children {
    match child {
      FormElement::Field(field_ref) => refs.push(field_ref),
      FormElement::Container(nested) => visit(nested, refs),
    }
  }
}
