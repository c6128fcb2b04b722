//! Planner configuration: traversal bounds and the fixed superlative
//! relation vocabularies.
//!
//! Everything here is loaded once at startup and shared read-only across
//! questions; nothing else persists between questions.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use hopgraph_core::RelationId;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Entity ids kept per mention after linking, before any traversal.
    pub entities_to_leave: usize,
    /// Linker candidates considered at all (applied before
    /// `entities_to_leave`).
    pub linker_candidates_cap: usize,
    /// Ranked relations kept before traversal.
    pub rels_to_leave: usize,
    /// Ranked relations kept on second-hop expansions.
    pub rels_to_leave_2hop: usize,
    /// A first-hop object set at least this large is not expanded into a
    /// second hop. Performance bound over raw neighborhood fan-out.
    pub second_hop_fanout_limit: usize,
    /// The KG's generic type-membership relation ("instance of").
    pub instance_of: RelationId,
    /// Fixed relation vocabulary ranked for one-entity superlative search.
    pub superlative_rels_first: Vec<RelationId>,
    /// Fixed relation vocabulary ranked for the second stage of two-entity
    /// superlative search.
    pub superlative_rels_second: Vec<RelationId>,
    /// Return resolved answers instead of raw candidate tuples.
    pub return_answers: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            entities_to_leave: 5,
            linker_candidates_cap: 15,
            rels_to_leave: 10,
            rels_to_leave_2hop: 7,
            second_hop_fanout_limit: 15,
            instance_of: RelationId::new("P31"),
            superlative_rels_first: Vec::new(),
            superlative_rels_second: Vec::new(),
            return_answers: false,
        }
    }
}

impl PlannerConfig {
    /// Load a JSON config file; absent fields keep their defaults.
    pub fn load_json(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read planner config {}", path.display()))?;
        serde_json::from_str(&text).context("parse planner config JSON")
    }

    /// Load both superlative vocabularies from rank-list files.
    pub fn load_rank_lists(&mut self, first: &Path, second: &Path) -> Result<()> {
        self.superlative_rels_first = read_rank_list(first)?;
        self.superlative_rels_second = read_rank_list(second)?;
        Ok(())
    }
}

/// Read a rank-list file: one relation per line, id in the first
/// tab-separated column, remaining columns ignored.
pub fn read_rank_list(path: &Path) -> Result<Vec<RelationId>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read rank list {}", path.display()))?;
    Ok(text
        .lines()
        .filter_map(|line| line.split('\t').next())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(RelationId::new)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_bounds() {
        let config = PlannerConfig::default();
        assert_eq!(config.entities_to_leave, 5);
        assert_eq!(config.rels_to_leave, 10);
        assert_eq!(config.rels_to_leave_2hop, 7);
        assert_eq!(config.second_hop_fanout_limit, 15);
        assert_eq!(config.instance_of, RelationId::new("P31"));
        assert!(!config.return_answers);
    }

    #[test]
    fn rank_list_takes_first_tab_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "P2044\televation above sea level").unwrap();
        writeln!(file, "P1082\tpopulation").unwrap();
        writeln!(file).unwrap();
        let rels = read_rank_list(file.path()).unwrap();
        assert_eq!(
            rels,
            vec![RelationId::new("P2044"), RelationId::new("P1082")]
        );
    }

    #[test]
    fn json_config_overrides_partial_fields() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"rels_to_leave": 3, "instance_of": "P279"}"#).unwrap();
        assert_eq!(config.rels_to_leave, 3);
        assert_eq!(config.instance_of, RelationId::new("P279"));
        assert_eq!(config.entities_to_leave, 5);
    }
}
