use std::fmt;

use serde_json::Value;

/// One step of a [`ProvenancePath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
  /// Descend into an object member.
  Key(String),
  /// Descend into an array element.
  Index(usize),
}

/// The exact structural location of a field's value slot inside the raw
/// export.
///
/// Paths are resolved fresh against a value tree every time — never held
/// as live references — so a deep copy of the export can be written to
/// without aliasing the original.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProvenancePath {
  steps: Vec<PathStep>,
}

impl ProvenancePath {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_steps(steps: Vec<PathStep>) -> Self {
    Self { steps }
  }

  pub fn push_key(&mut self, key: impl Into<String>) {
    self.steps.push(PathStep::Key(key.into()));
  }

  pub fn push_index(&mut self, index: usize) {
    self.steps.push(PathStep::Index(index));
  }

  pub fn steps(&self) -> &[PathStep] {
    &self.steps
  }

  /// Walk the path through `root`, returning the addressed value.
  pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
    let mut current = root;
    for step in &self.steps {
      current = match step {
        PathStep::Key(key) => current.get(key.as_str())?,
        PathStep::Index(index) => current.get(index)?,
      };
    }
    Some(current)
  }

  /// Walk the path through `root`, returning the addressed slot mutably.
  pub fn resolve_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
    let mut current = root;
    for step in &self.steps {
      current = match step {
        PathStep::Key(key) => current.get_mut(key.as_str())?,
        PathStep::Index(index) => current.get_mut(index)?,
      };
    }
    Some(current)
  }
}

impl fmt::Display for ProvenancePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, step) in self.steps.iter().enumerate() {
      match step {
        PathStep::Key(key) => {
          if i > 0 {
            write!(f, ".")?;
          }
          write!(f, "{key}")?;
        }
        PathStep::Index(index) => write!(f, "[{index}]")?,
      }
    }
    Ok(())
  }
}
