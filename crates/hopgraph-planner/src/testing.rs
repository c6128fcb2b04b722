//! Shared test doubles for the solver unit tests.

use anyhow::Result;

use hopgraph_core::{Candidate, RelationId, ScoredRelation};

use crate::config::PlannerConfig;
use crate::providers::RelationRanker;

/// Deterministic ranker: relations named in the priority list come first, in
/// priority order; everything else follows in candidate order.
pub(crate) struct StaticRanker {
    priority: Vec<RelationId>,
}

impl StaticRanker {
    pub(crate) fn new(priority: &[&str]) -> Self {
        Self {
            priority: priority.iter().map(|p| RelationId::new(*p)).collect(),
        }
    }
}

impl RelationRanker for StaticRanker {
    fn rank(&self, _question: &str, candidates: &[RelationId]) -> Result<Vec<ScoredRelation>> {
        let mut ordered: Vec<RelationId> = self
            .priority
            .iter()
            .filter(|p| candidates.contains(*p))
            .cloned()
            .collect();
        for candidate in candidates {
            if !ordered.contains(candidate) {
                ordered.push(candidate.clone());
            }
        }
        let total = ordered.len() as f32;
        Ok(ordered
            .into_iter()
            .enumerate()
            .map(|(i, relation)| ScoredRelation {
                relation,
                score: (total - i as f32) / total.max(1.0),
            })
            .collect())
    }

    fn resolve(&self, questions: &[String], candidates: &[Vec<Candidate>]) -> Result<Vec<String>> {
        Ok(questions
            .iter()
            .zip(candidates)
            .map(|(_, cands)| {
                cands
                    .first()
                    .map(|c| c.answer.clone())
                    .unwrap_or_default()
            })
            .collect())
    }
}

pub(crate) fn ctx_parts(priority: &[&str]) -> (StaticRanker, PlannerConfig) {
    (StaticRanker::new(priority), PlannerConfig::default())
}
