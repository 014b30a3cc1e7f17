use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Where an execution stands, as reported by the executor collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
  Pending,
  Running,
  Completed,
  Failed,
  Canceled,
}

impl ExecutionStatus {
  /// True once the execution can no longer progress.
  pub fn is_terminal(&self) -> bool {
    matches!(
      self,
      ExecutionStatus::Completed | ExecutionStatus::Failed | ExecutionStatus::Canceled
    )
  }
}

/// Per-node result entry, keyed by the session-internal node id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeResult {
  #[serde(default)]
  pub assets: Vec<String>,
}

/// Everything the executor reports about one execution.
///
/// Result entries and edges are keyed by session-internal ids; the
/// source map translates those back to design-time node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
  pub status: ExecutionStatus,
  /// Direct per-node results, keyed by session-internal id.
  #[serde(default)]
  pub results: HashMap<String, NodeResult>,
  /// session-internal id -> design-time node id.
  #[serde(default)]
  pub source_map: HashMap<String, String>,
  /// Flat, unattributed asset list kept by older executors.
  #[serde(default)]
  pub legacy_assets: Vec<String>,
  /// Execution-graph edges between session-internal ids.
  #[serde(default)]
  pub edges: Vec<(String, String)>,
}

impl ExecutionRecord {
  /// The session-internal ids mapped to a design-time node, sorted for
  /// deterministic correlation.
  pub fn session_ids_for(&self, node_id: &str) -> Vec<&str> {
    let mut ids: Vec<&str> = self
      .source_map
      .iter()
      .filter(|(_, design_id)| design_id.as_str() == node_id)
      .map(|(session_id, _)| session_id.as_str())
      .collect();
    ids.sort_unstable();
    ids
  }
}
