use serde_json::{Map, Value};
use tracing::warn;

use easel_definition::Constraints;

use crate::error::FieldTypeError;
use crate::field::{FieldValue, ResourceField, ScalarField, StructuredField, is_resource_key};
use crate::value::ScalarValue;

/// Everything a detection rule may look at for one raw field.
#[derive(Debug, Clone, Copy)]
pub struct DetectContext<'a> {
  pub node_type: &'a str,
  pub field_name: &'a str,
  pub value: &'a Value,
  pub constraints: &'a Constraints,
}

/// How to react when a matched rule's builder rejects the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectMode {
  /// Surface the failure as [`FieldTypeError::Ambiguous`].
  Strict,
  /// Downgrade to the fallback text scalar and record a diagnostic.
  #[default]
  Lenient,
}

/// A non-fatal note emitted when lenient detection falls back.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
  pub node_type: String,
  pub field_name: String,
  pub rule: String,
  pub reason: String,
}

impl std::fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}.{}: rule \"{}\" fell back to text scalar: {}",
      self.node_type, self.field_name, self.rule, self.reason
    )
  }
}

type MatchFn = Box<dyn Fn(&DetectContext) -> bool + Send + Sync>;
type BuildFn = Box<dyn Fn(&DetectContext) -> Result<FieldValue, String> + Send + Sync>;

/// One `(predicate, constructor)` pair of the registry.
pub struct DetectRule {
  name: String,
  matches: MatchFn,
  build: BuildFn,
}

impl DetectRule {
  pub fn new(
    name: impl Into<String>,
    matches: impl Fn(&DetectContext) -> bool + Send + Sync + 'static,
    build: impl Fn(&DetectContext) -> Result<FieldValue, String> + Send + Sync + 'static,
  ) -> Self {
    Self {
      name: name.into(),
      matches: Box::new(matches),
      build: Box::new(build),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

impl std::fmt::Debug for DetectRule {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DetectRule").field("name", &self.name).finish()
  }
}

/// Priority-ordered table of detection rules.
///
/// Resolution consults rules front to back and stops at the first match;
/// a matched builder that fails does not fall through to later rules, it
/// resolves via [`DetectMode`]. The registry is passed by reference into
/// discovery — there is no global state, so independent discovery runs
/// cannot interfere.
///
/// The default table runs node-type rules before raw-value-shape
/// inspection. This is an accepted trade-off: an enumerated numeric field
/// whose name collides with a model-field convention on a loader node
/// classifies as structured, not as a numeric scalar.
pub struct FieldTypeRegistry {
  rules: Vec<DetectRule>,
}

impl FieldTypeRegistry {
  /// A registry with no rules; everything resolves to the fallback.
  pub fn empty() -> Self {
    Self { rules: Vec::new() }
  }

  /// The default rule table, tiers highest-priority first:
  /// explicit kind tag, field-name patterns, node-type defaults, raw
  /// value shape, constraints without a value.
  pub fn with_defaults() -> Self {
    let mut registry = Self::empty();
    registry.register(kind_tag_rule());
    registry.register(image_name_rule());
    registry.register(model_identifier_rule());
    registry.register(value_shape_rule());
    registry.register(constraints_only_rule());
    registry
  }

  /// Append a rule at the lowest priority (still above the fallback).
  pub fn register(&mut self, rule: DetectRule) {
    self.rules.push(rule);
  }

  /// Insert a rule at the highest priority.
  pub fn register_front(&mut self, rule: DetectRule) {
    self.rules.insert(0, rule);
  }

  pub fn rules(&self) -> impl Iterator<Item = &DetectRule> {
    self.rules.iter()
  }

  /// Resolve a raw field to a concrete [`FieldValue`].
  ///
  /// Never fails in lenient mode; strict mode surfaces builder failures
  /// as [`FieldTypeError::Ambiguous`].
  pub fn detect(
    &self,
    ctx: &DetectContext,
    mode: DetectMode,
    diagnostics: &mut Vec<Diagnostic>,
  ) -> Result<FieldValue, FieldTypeError> {
    for rule in &self.rules {
      if !(rule.matches)(ctx) {
        continue;
      }
      match (rule.build)(ctx) {
        Ok(field) => return Ok(field),
        Err(reason) => match mode {
          DetectMode::Strict => {
            return Err(FieldTypeError::Ambiguous {
              node_type: ctx.node_type.to_string(),
              field_name: ctx.field_name.to_string(),
              rule: rule.name.clone(),
              reason,
            });
          }
          DetectMode::Lenient => {
            warn!(
              node_type = ctx.node_type,
              field_name = ctx.field_name,
              rule = %rule.name,
              reason = %reason,
              "field type fell back to text scalar"
            );
            diagnostics.push(Diagnostic {
              node_type: ctx.node_type.to_string(),
              field_name: ctx.field_name.to_string(),
              rule: rule.name.clone(),
              reason,
            });
            return Ok(fallback_scalar(ctx.value));
          }
        },
      }
    }
    Ok(fallback_scalar(ctx.value))
  }
}

/// The generic fallback: a text scalar from value stringification.
///
/// Carries no constraints so construction can never fail.
pub(crate) fn fallback_scalar(value: &Value) -> FieldValue {
  let text = match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  };
  scalar(ScalarValue::Text(text), Constraints::default())
    .unwrap_or_else(|_| unreachable!("unconstrained text scalar always constructs"))
}

fn scalar(value: ScalarValue, constraints: Constraints) -> Result<FieldValue, String> {
  ScalarField::new(value.kind(), value, constraints)
    .map(FieldValue::Scalar)
    .map_err(|e| e.to_string())
}

fn resource_key_entry(value: &Value) -> Option<(&String, &Value)> {
  let object = value.as_object()?;
  object.iter().find(|(key, _)| is_resource_key(key))
}

fn resource_from_value(ctx: &DetectContext, default_key: &str) -> Result<FieldValue, String> {
  if let Some((key, value)) = resource_key_entry(ctx.value) {
    let name = match value {
      Value::Null => None,
      Value::String(s) => Some(s.clone()),
      other => return Err(format!("resource reference {key} is not a string: {other}")),
    };
    return Ok(FieldValue::Resource(ResourceField::new(key.clone(), name)));
  }
  match ctx.value {
    Value::Null => Ok(FieldValue::Resource(ResourceField::new(default_key, None))),
    Value::String(s) => Ok(FieldValue::Resource(ResourceField::new(
      default_key,
      Some(s.clone()),
    ))),
    other => Err(format!("value has no resource shape: {other}")),
  }
}

/// Tier 1: explicit machine-readable kind tag in the constraints.
fn kind_tag_rule() -> DetectRule {
  DetectRule::new(
    "kind-tag",
    |ctx| ctx.constraints.kind.is_some(),
    |ctx| {
      let tag = ctx.constraints.kind.as_deref().unwrap_or_default();
      let constraints = ctx.constraints.clone();
      match tag {
        "integer" => match ctx.value {
          Value::Null => scalar(ScalarValue::Integer(0), constraints),
          v => v
            .as_i64()
            .ok_or_else(|| format!("tagged integer has non-integer value: {v}"))
            .and_then(|n| scalar(ScalarValue::Integer(n), constraints)),
        },
        "float" => match ctx.value {
          Value::Null => scalar(ScalarValue::Float(0.0), constraints),
          v => v
            .as_f64()
            .ok_or_else(|| format!("tagged float has non-numeric value: {v}"))
            .and_then(|n| scalar(ScalarValue::Float(n), constraints)),
        },
        "boolean" => match ctx.value {
          Value::Null => scalar(ScalarValue::Boolean(false), constraints),
          v => v
            .as_bool()
            .ok_or_else(|| format!("tagged boolean has non-boolean value: {v}"))
            .and_then(|b| scalar(ScalarValue::Boolean(b), constraints)),
        },
        "string" => match ctx.value {
          Value::Null => scalar(ScalarValue::Text(String::new()), constraints),
          v => v
            .as_str()
            .ok_or_else(|| format!("tagged string has non-string value: {v}"))
            .and_then(|s| scalar(ScalarValue::Text(s.to_string()), constraints)),
        },
        "resource" => {
          let default_key = format!("{}_name", ctx.field_name);
          resource_from_value(ctx, &default_key)
        }
        "structured" => match ctx.value.as_object() {
          Some(object) => Ok(FieldValue::Structured(StructuredField::new(object.clone()))),
          None => Err(format!("tagged structured has non-object value: {}", ctx.value)),
        },
        other => Err(format!("unknown kind tag: {other}")),
      }
    },
  )
}

/// Tier 2: field-name patterns marking resource references.
fn image_name_rule() -> DetectRule {
  DetectRule::new(
    "image-name",
    |ctx| {
      ctx.field_name == "image" || ctx.field_name.ends_with("_image") || ctx.field_name == "mask"
    },
    |ctx| resource_from_value(ctx, "image_name"),
  )
}

const MODEL_FIELD_NAMES: &[&str] = &["model", "vae", "lora", "unet", "clip"];

/// Tier 3: node-type defaults for loader-style nodes.
///
/// Runs before shape inspection; a numeric field named like a model field
/// on a loader node deliberately lands here.
fn model_identifier_rule() -> DetectRule {
  DetectRule::new(
    "model-identifier",
    |ctx| ctx.node_type.ends_with("_loader") && MODEL_FIELD_NAMES.contains(&ctx.field_name),
    |ctx| {
      let attributes = match ctx.value {
        Value::Object(object) => object.clone(),
        other => {
          let mut attributes = Map::new();
          attributes.insert("name".to_string(), other.clone());
          attributes
        }
      };
      Ok(FieldValue::Structured(StructuredField::new(attributes)))
    },
  )
}

/// Tier 4: raw value shape inspection.
fn value_shape_rule() -> DetectRule {
  DetectRule::new(
    "value-shape",
    |ctx| !ctx.value.is_null(),
    |ctx| {
      let constraints = ctx.constraints.clone();
      match ctx.value {
        Value::Object(object) => {
          if let Some((key, _)) = object.iter().find(|(key, _)| is_resource_key(key)) {
            let key = key.clone();
            return resource_from_value(ctx, &key);
          }
          Ok(FieldValue::Structured(StructuredField::new(object.clone())))
        }
        Value::Number(n) => {
          if n.is_i64() && constraints.is_integral() {
            let v = n.as_i64().ok_or_else(|| format!("non-integer number: {n}"))?;
            scalar(ScalarValue::Integer(v), constraints)
          } else {
            let v = n.as_f64().ok_or_else(|| format!("non-finite number: {n}"))?;
            scalar(ScalarValue::Float(v), constraints)
          }
        }
        Value::Bool(b) => scalar(ScalarValue::Boolean(*b), constraints),
        Value::String(s) => scalar(ScalarValue::Text(s.clone()), constraints),
        other => Err(format!("value has no field shape: {other}")),
      }
    },
  )
}

/// Tier 5: declared constraints without a concrete value.
fn constraints_only_rule() -> DetectRule {
  DetectRule::new(
    "constraints-only",
    |ctx| ctx.value.is_null() && !ctx.constraints.is_empty(),
    |ctx| {
      let constraints = ctx.constraints.clone();
      if let Some(first) = constraints.choices.as_ref().and_then(|c| c.first()).cloned() {
        return match first {
          Value::String(s) => scalar(ScalarValue::Text(s), constraints),
          Value::Number(n) if n.is_i64() && ctx.constraints.is_integral() => {
            let v = n.as_i64().ok_or_else(|| format!("non-integer choice: {n}"))?;
            scalar(ScalarValue::Integer(v), constraints)
          }
          Value::Number(n) => {
            let v = n.as_f64().ok_or_else(|| format!("non-finite choice: {n}"))?;
            scalar(ScalarValue::Float(v), constraints)
          }
          other => Err(format!("choice has no scalar shape: {other}")),
        };
      }
      if constraints.minimum.is_some() || constraints.maximum.is_some() {
        let start = constraints.minimum.unwrap_or(0.0);
        return if constraints.is_integral() {
          scalar(ScalarValue::Integer(start as i64), constraints)
        } else {
          scalar(ScalarValue::Float(start), constraints)
        };
      }
      scalar(ScalarValue::Text(String::new()), constraints)
    },
  )
}
