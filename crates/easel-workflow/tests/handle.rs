//! Integration tests for WorkflowHandle: discovery, mutation, validation,
//! submission building and output classification over one fixture export.

use std::sync::Arc;

use serde_json::{Value, json};

use easel_definition::WorkflowDefinition;
use easel_field::{FieldClass, FieldTypeRegistry, FieldValue, ResourceField, ScalarValue};
use easel_workflow::{
  BoardWriterSet, DiscoveryError, DiscoveryOptions, HandleError, HandleState, WorkflowHandle,
};

fn export() -> Value {
  json!({
    "id": "wf-1",
    "name": "Text To Image",
    "nodes": [
      {
        "id": "loader",
        "type": "main_model_loader",
        "fields": {
          "model": { "value": { "name": "sdxl-base", "base": "sdxl" } }
        }
      },
      {
        "id": "gen",
        "type": "generate",
        "fields": {
          "seed": { "value": 42, "constraints": { "minimum": 0.0, "maximum": 4294967295.0 } },
          "prompt": { "value": "a cat" },
          "image": { "value": { "image_name": null }, "constraints": { "required": true } }
        }
      },
      {
        "id": "save",
        "type": "save_image",
        "fields": {
          "board": { "value": { "board_name": null }, "constraints": { "required": true } }
        }
      },
      {
        "id": "preview",
        "type": "preview_image",
        "fields": {
          "board": { "value": { "board_name": null } }
        }
      }
    ],
    "edges": [
      { "from": ["loader", "model"], "to": ["gen", "model"] },
      { "from": ["gen", "image"], "to": ["save", "image"] },
      { "from": ["gen", "image"], "to": ["preview", "image"] }
    ],
    "form": {
      "id": "root",
      "children": [
        { "field": { "node_id": "gen", "field_name": "seed", "label": "Seed" } },
        { "field": { "node_id": "gen", "field_name": "prompt" } },
        {
          "container": {
            "id": "advanced",
            "children": [
              { "field": { "node_id": "loader", "field_name": "model" } },
              { "field": { "node_id": "gen", "field_name": "image" } }
            ]
          }
        },
        { "field": { "node_id": "save", "field_name": "board" } }
      ]
    }
  })
}

fn definition() -> Arc<WorkflowDefinition> {
  Arc::new(WorkflowDefinition::from_json(export()).unwrap())
}

fn discover(definition: &Arc<WorkflowDefinition>) -> WorkflowHandle {
  WorkflowHandle::discover(
    definition.clone(),
    &FieldTypeRegistry::with_defaults(),
    &BoardWriterSet::with_defaults(),
    DiscoveryOptions::default(),
  )
  .unwrap()
}

/// Every key path of a JSON tree, for structural-preservation checks.
fn key_paths(value: &Value, prefix: &str, paths: &mut Vec<String>) {
  match value {
    Value::Object(object) => {
      for (key, child) in object {
        let path = format!("{prefix}/{key}");
        paths.push(path.clone());
        key_paths(child, &path, paths);
      }
    }
    Value::Array(items) => {
      for (i, child) in items.iter().enumerate() {
        key_paths(child, &format!("{prefix}/{i}"), paths);
      }
    }
    _ => {}
  }
}

#[test]
fn discovery_assigns_contiguous_stable_indices() {
  let definition = definition();
  let handle = discover(&definition);

  let inputs = handle.list_inputs();
  assert_eq!(inputs.len(), 5);
  for (i, descriptor) in inputs.iter().enumerate() {
    assert_eq!(descriptor.input_index, i);
  }

  // Declared form order, nested container exhausted in place.
  let fields: Vec<(&str, &str)> = inputs
    .iter()
    .map(|d| (d.node_id.as_str(), d.field_name.as_str()))
    .collect();
  assert_eq!(
    fields,
    [
      ("gen", "seed"),
      ("gen", "prompt"),
      ("loader", "model"),
      ("gen", "image"),
      ("save", "board"),
    ]
  );

  assert_eq!(inputs[0].label, "Seed");
  assert_eq!(inputs[1].label, "prompt");
  assert_eq!(handle.state(), HandleState::Discovered);
}

#[test]
fn repeated_discovery_is_deterministic() {
  let definition = definition();
  let first = discover(&definition);
  let second = discover(&definition);

  for (a, b) in first.list_inputs().iter().zip(second.list_inputs()) {
    assert_eq!(a.input_index, b.input_index);
    assert_eq!(a.node_id, b.node_id);
    assert_eq!(a.field_name, b.field_name);
    assert_eq!(a.field, b.field);
  }
}

#[test]
fn dangling_form_reference_is_fatal() {
  let mut raw = export();
  raw["form"]["children"]
    .as_array_mut()
    .unwrap()
    .push(json!({ "field": { "node_id": "gen", "field_name": "nope" } }));
  let definition = Arc::new(WorkflowDefinition::from_json(raw).unwrap());

  let err = WorkflowHandle::discover(
    definition,
    &FieldTypeRegistry::with_defaults(),
    &BoardWriterSet::with_defaults(),
    DiscoveryOptions::default(),
  )
  .unwrap_err();

  assert!(matches!(
    err,
    DiscoveryError::DanglingFieldRef { node_id, field_name }
      if node_id == "gen" && field_name == "nope"
  ));
}

#[test]
fn replace_field_enforces_variant_stability() {
  let definition = definition();
  let mut handle = discover(&definition);

  // Index 0 is the seed scalar; a resource replacement must be refused.
  let err = handle
    .replace_field(
      0,
      FieldValue::Resource(ResourceField::new("image_name", None)),
    )
    .unwrap_err();
  assert!(matches!(err, HandleError::VariantMismatch { index: 0, .. }));

  // Same variant goes through.
  let same_variant = handle.get_field(1).unwrap().clone();
  handle.replace_field(1, same_variant).unwrap();
  assert_eq!(handle.state(), HandleState::Configured);
}

#[test]
fn eager_set_fails_closed_and_names_the_constraint() {
  let definition = definition();
  let mut handle = discover(&definition);

  let err = handle.set_scalar(0, ScalarValue::Integer(-5)).unwrap_err();
  let message = err.to_string();
  assert!(message.contains("minimum"));
  assert!(message.contains("-5"));
  assert!(message.contains('0'));

  // The prior valid value is unchanged.
  let FieldValue::Scalar(field) = handle.get_field(0).unwrap() else {
    panic!("expected scalar");
  };
  assert_eq!(field.value(), &ScalarValue::Integer(42));
  assert_eq!(handle.state(), HandleState::Discovered);
}

#[test]
fn validate_all_aggregates_every_violation() {
  let definition = definition();
  let mut handle = discover(&definition);

  // Both required resources (indices 3 and 4) are unset.
  let violations = handle.validate_all();
  assert_eq!(violations.keys().copied().collect::<Vec<_>>(), [3, 4]);
  assert!(violations[&3][0].contains("required"));

  handle.set_resource(3, Some("input.png".to_string())).unwrap();
  let violations = handle.validate_all();
  assert_eq!(violations.keys().copied().collect::<Vec<_>>(), [4]);
}

#[test]
fn build_submission_substitutes_values_only() {
  let definition = definition();
  let mut handle = discover(&definition);

  handle.set_scalar(0, ScalarValue::Integer(7)).unwrap();
  handle
    .set_scalar(1, ScalarValue::Text("a dog".to_string()))
    .unwrap();
  handle.set_resource(3, Some("input.png".to_string())).unwrap();
  handle.set_resource(4, Some("general".to_string())).unwrap();

  let submission = handle.build_submission().unwrap();
  let payload = submission.payload();

  // Every key of the raw export survives, unchanged in name and nesting.
  let mut raw_paths = Vec::new();
  let mut payload_paths = Vec::new();
  key_paths(definition.raw(), "", &mut raw_paths);
  key_paths(payload, "", &mut payload_paths);
  assert_eq!(raw_paths, payload_paths);

  // Substituted leaves carry the configured wire values.
  assert_eq!(payload["nodes"][1]["fields"]["seed"]["value"], json!(7));
  assert_eq!(payload["nodes"][1]["fields"]["prompt"]["value"], json!("a dog"));
  assert_eq!(
    payload["nodes"][1]["fields"]["image"]["value"],
    json!({ "image_name": "input.png" })
  );
  assert_eq!(
    payload["nodes"][2]["fields"]["board"]["value"],
    json!({ "board_name": "general" })
  );

  // Untouched leaves and constraint metadata are untouched.
  assert_eq!(
    payload["nodes"][1]["fields"]["seed"]["constraints"],
    definition.raw()["nodes"][1]["fields"]["seed"]["constraints"]
  );
  assert_eq!(payload["edges"], definition.raw()["edges"]);

  assert_eq!(handle.state(), HandleState::Submitted);
}

#[test]
fn build_submission_is_idempotent_and_payloads_are_values() {
  let definition = definition();
  let mut handle = discover(&definition);
  handle.set_scalar(0, ScalarValue::Integer(7)).unwrap();

  let first = handle.build_submission().unwrap();
  let second = handle.build_submission().unwrap();
  assert_eq!(first, second);

  // A later edit must not reach into an already-built payload.
  handle.set_scalar(0, ScalarValue::Integer(9)).unwrap();
  assert_eq!(first.payload()["nodes"][1]["fields"]["seed"]["value"], json!(7));
}

#[test]
fn out_of_range_index_is_reported_with_the_range() {
  let definition = definition();
  let mut handle = discover(&definition);

  let err = handle.get_field(99).unwrap_err();
  assert!(matches!(
    err,
    HandleError::IndexOutOfRange { index: 99, len: 5 }
  ));
  let err = handle.set_scalar(99, ScalarValue::Integer(1)).unwrap_err();
  assert!(matches!(err, HandleError::IndexOutOfRange { .. }));
}

#[test]
fn board_capable_nodes_partition_into_exposed_and_debug() {
  let definition = definition();
  let handle = discover(&definition);

  let outputs = handle.classify_outputs();
  assert_eq!(outputs.len(), 2);

  // "save" has its board field in the form tree.
  assert_eq!(outputs[0].node_id, "save");
  assert!(outputs[0].exposed);
  assert_eq!(outputs[0].input_index, Some(4));

  // "preview" writes to a board but is not exposed: a debug sink.
  assert_eq!(outputs[1].node_id, "preview");
  assert!(!outputs[1].exposed);
  assert_eq!(outputs[1].input_index, None);
}

#[test]
fn model_field_detects_structured_and_mutates_attribute_wise() {
  let definition = definition();
  let mut handle = discover(&definition);

  assert_eq!(handle.get_field(2).unwrap().class(), FieldClass::Structured);
  handle.set_attr(2, "name", json!("sdxl-refiner")).unwrap();

  let submission = handle.build_submission().unwrap();
  assert_eq!(
    submission.payload()["nodes"][0]["fields"]["model"]["value"],
    json!({ "name": "sdxl-refiner", "base": "sdxl" })
  );

  let err = handle.set_attr(2, "weight", json!(1.0)).unwrap_err();
  assert!(matches!(err, HandleError::Validation { index: 2, .. }));
}
