use std::collections::{HashMap, HashSet, VecDeque};

use easel_workflow::OutputSlot;

use crate::record::ExecutionRecord;

/// Confidence level of an output-to-asset correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceTier {
  /// Direct per-node result entries, remapped via the source map.
  Results,
  /// Share of the flat, unattributed legacy asset list.
  Legacy,
  /// Structural inference over the execution graph's edges.
  Traversal,
  /// No evidence found; the asset list is empty.
  None,
}

/// One exposed output node's correlated assets.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
  pub node_id: String,
  /// The board field's input index.
  pub input_index: Option<usize>,
  pub assets: Vec<String>,
  pub tier: EvidenceTier,
}

/// Correlate each exposed output node to the assets it produced.
///
/// Tiers fall back per node: `results`, then `legacy`, then `traversal`,
/// then `none`. Debug sinks are not correlated. A non-terminal record
/// yields tier `None` for every node — never a partial mapping.
///
/// The legacy tier is necessarily approximate: the flat list is split in
/// order of appearance among the exposed nodes that the results tier
/// left empty, even chunks in node order with earlier nodes taking the
/// remainder. No stronger attribution exists in that format.
pub fn correlate(record: &ExecutionRecord, outputs: &[OutputSlot]) -> Vec<OutputRecord> {
  let exposed: Vec<&OutputSlot> = outputs.iter().filter(|slot| slot.exposed).collect();

  if !record.status.is_terminal() {
    return exposed
      .iter()
      .map(|slot| empty_record(slot))
      .collect();
  }

  let mut records: Vec<OutputRecord> = exposed
    .iter()
    .map(|slot| {
      let assets = direct_results(record, &slot.node_id);
      if assets.is_empty() {
        empty_record(slot)
      } else {
        OutputRecord {
          node_id: slot.node_id.clone(),
          input_index: slot.input_index,
          assets,
          tier: EvidenceTier::Results,
        }
      }
    })
    .collect();

  assign_legacy(record, &mut records);

  for output in &mut records {
    if output.tier != EvidenceTier::None {
      continue;
    }
    let assets = traverse_upstream(record, &output.node_id);
    if !assets.is_empty() {
      output.assets = assets;
      output.tier = EvidenceTier::Traversal;
    }
  }

  records
}

fn empty_record(slot: &OutputSlot) -> OutputRecord {
  OutputRecord {
    node_id: slot.node_id.clone(),
    input_index: slot.input_index,
    assets: Vec::new(),
    tier: EvidenceTier::None,
  }
}

/// Tier "results": per-node entries keyed by session id, remapped to the
/// design-time node id.
fn direct_results(record: &ExecutionRecord, node_id: &str) -> Vec<String> {
  let mut assets = Vec::new();
  for session_id in record.session_ids_for(node_id) {
    if let Some(result) = record.results.get(session_id) {
      assets.extend(result.assets.iter().cloned());
    }
  }
  assets
}

/// Tier "legacy": split the flat list among still-unmatched nodes.
fn assign_legacy(record: &ExecutionRecord, records: &mut [OutputRecord]) {
  if record.legacy_assets.is_empty() {
    return;
  }
  let unmatched: Vec<usize> = records
    .iter()
    .enumerate()
    .filter(|(_, r)| r.tier == EvidenceTier::None)
    .map(|(i, _)| i)
    .collect();
  if unmatched.is_empty() {
    return;
  }

  let total = record.legacy_assets.len();
  let base = total / unmatched.len();
  let remainder = total % unmatched.len();
  let mut cursor = 0;

  for (position, &index) in unmatched.iter().enumerate() {
    let take = base + usize::from(position < remainder);
    if take == 0 {
      continue;
    }
    let assets = record.legacy_assets[cursor..cursor + take].to_vec();
    cursor += take;
    records[index].assets = assets;
    records[index].tier = EvidenceTier::Legacy;
  }
}

/// Tier "traversal": breadth-first walk upstream over the execution
/// graph's edges until a result entry carrying assets is found.
fn traverse_upstream(record: &ExecutionRecord, node_id: &str) -> Vec<String> {
  let mut upstream: HashMap<&str, Vec<&str>> = HashMap::new();
  for (from, to) in &record.edges {
    upstream.entry(to.as_str()).or_default().push(from.as_str());
  }

  let mut queue: VecDeque<&str> = {
    let session_ids = record.session_ids_for(node_id);
    if session_ids.is_empty() {
      // Executors without a source map keep design-time ids.
      VecDeque::from([node_id])
    } else {
      session_ids.into_iter().collect()
    }
  };
  let mut seen: HashSet<&str> = queue.iter().copied().collect();

  while let Some(current) = queue.pop_front() {
    if let Some(result) = record.results.get(current) {
      if !result.assets.is_empty() {
        return result.assets.clone();
      }
    }
    if let Some(parents) = upstream.get(current) {
      for &parent in parents {
        if seen.insert(parent) {
          queue.push_back(parent);
        }
      }
    }
  }

  Vec::new()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::{ExecutionStatus, NodeResult};

  fn slot(node_id: &str, exposed: bool, input_index: Option<usize>) -> OutputSlot {
    OutputSlot {
      node_id: node_id.to_string(),
      node_type: "save_image".to_string(),
      exposed,
      input_index,
    }
  }

  fn terminal_record() -> ExecutionRecord {
    ExecutionRecord {
      status: ExecutionStatus::Completed,
      results: HashMap::new(),
      source_map: HashMap::new(),
      legacy_assets: Vec::new(),
      edges: Vec::new(),
    }
  }

  #[test]
  fn per_node_results_yield_the_results_tier() {
    let mut record = terminal_record();
    record
      .source_map
      .insert("s1".to_string(), "save".to_string());
    record
      .source_map
      .insert("s2".to_string(), "save2".to_string());
    record.results.insert(
      "s1".to_string(),
      NodeResult {
        assets: vec!["a.png".to_string(), "b.png".to_string()],
      },
    );
    record.results.insert(
      "s2".to_string(),
      NodeResult {
        assets: vec!["c.png".to_string()],
      },
    );

    let outputs = [slot("save", true, Some(3)), slot("save2", true, Some(4))];
    let records = correlate(&record, &outputs);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].tier, EvidenceTier::Results);
    assert_eq!(records[0].assets, ["a.png", "b.png"]);
    assert_eq!(records[0].input_index, Some(3));
    assert_eq!(records[1].tier, EvidenceTier::Results);
    assert_eq!(records[1].assets, ["c.png"]);
  }

  #[test]
  fn non_terminal_record_yields_tier_none_everywhere() {
    let mut record = terminal_record();
    record.status = ExecutionStatus::Running;
    record
      .source_map
      .insert("s1".to_string(), "save".to_string());
    record.results.insert(
      "s1".to_string(),
      NodeResult {
        assets: vec!["a.png".to_string()],
      },
    );

    let outputs = [slot("save", true, Some(0))];
    let records = correlate(&record, &outputs);

    assert_eq!(records[0].tier, EvidenceTier::None);
    assert!(records[0].assets.is_empty());
  }

  #[test]
  fn debug_sinks_are_not_correlated() {
    let record = terminal_record();
    let outputs = [slot("save", true, Some(0)), slot("preview", false, None)];
    let records = correlate(&record, &outputs);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].node_id, "save");
  }

  #[test]
  fn legacy_list_is_split_in_order_of_appearance() {
    let mut record = terminal_record();
    record.legacy_assets = vec![
      "a.png".to_string(),
      "b.png".to_string(),
      "c.png".to_string(),
    ];

    let outputs = [slot("first", true, Some(0)), slot("second", true, Some(1))];
    let records = correlate(&record, &outputs);

    assert_eq!(records[0].tier, EvidenceTier::Legacy);
    assert_eq!(records[0].assets, ["a.png", "b.png"]);
    assert_eq!(records[1].tier, EvidenceTier::Legacy);
    assert_eq!(records[1].assets, ["c.png"]);
  }

  #[test]
  fn legacy_only_fills_nodes_the_results_tier_left_empty() {
    let mut record = terminal_record();
    record
      .source_map
      .insert("s1".to_string(), "first".to_string());
    record.results.insert(
      "s1".to_string(),
      NodeResult {
        assets: vec!["direct.png".to_string()],
      },
    );
    record.legacy_assets = vec!["flat.png".to_string()];

    let outputs = [slot("first", true, Some(0)), slot("second", true, Some(1))];
    let records = correlate(&record, &outputs);

    assert_eq!(records[0].tier, EvidenceTier::Results);
    assert_eq!(records[0].assets, ["direct.png"]);
    assert_eq!(records[1].tier, EvidenceTier::Legacy);
    assert_eq!(records[1].assets, ["flat.png"]);
  }

  #[test]
  fn traversal_walks_upstream_to_the_nearest_assets() {
    let mut record = terminal_record();
    record
      .source_map
      .insert("s-save".to_string(), "save".to_string());
    record.edges = vec![
      ("s-gen".to_string(), "s-resize".to_string()),
      ("s-resize".to_string(), "s-save".to_string()),
    ];
    record.results.insert(
      "s-gen".to_string(),
      NodeResult {
        assets: vec!["generated.png".to_string()],
      },
    );
    // The save node itself has a result entry with no assets.
    record
      .results
      .insert("s-save".to_string(), NodeResult::default());

    let outputs = [slot("save", true, Some(0))];
    let records = correlate(&record, &outputs);

    assert_eq!(records[0].tier, EvidenceTier::Traversal);
    assert_eq!(records[0].assets, ["generated.png"]);
  }

  #[test]
  fn no_evidence_yields_empty_tier_none() {
    let record = terminal_record();
    let outputs = [slot("save", true, Some(0))];
    let records = correlate(&record, &outputs);
    assert_eq!(records[0].tier, EvidenceTier::None);
    assert!(records[0].assets.is_empty());
  }
}
