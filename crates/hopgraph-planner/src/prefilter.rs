//! Relation prefiltering: gather a neighborhood relation vocabulary and
//! delegate scoring to the external ranker.
//!
//! Raw entity neighborhoods can be large; every strategy truncates the
//! ranked output to its configured prefix (`rels_to_leave` or
//! `rels_to_leave_2hop`) before traversal — a deliberate precision/latency
//! bound.

use anyhow::Result;
use tracing::debug;

use hopgraph_core::{Direction, EdgeKind, EntityId, RelationId};
use hopgraph_kg::{EdgeQuery, KnowledgeGraph};

use crate::providers::RelationRanker;

pub struct RelationPrefilter<'a> {
    graph: &'a dyn KnowledgeGraph,
    ranker: &'a dyn RelationRanker,
}

impl<'a> RelationPrefilter<'a> {
    pub fn new(graph: &'a dyn KnowledgeGraph, ranker: &'a dyn RelationRanker) -> Self {
        Self { graph, ranker }
    }

    /// Direct-edge relation vocabulary of the given entities in the given
    /// directions, deduplicated in first-seen order.
    pub fn gather(
        &self,
        entities: &[EntityId],
        directions: &[Direction],
    ) -> Result<Vec<RelationId>> {
        let mut vocabulary: Vec<RelationId> = Vec::new();
        for entity in entities {
            for &direction in directions {
                let rels = self.graph.relations(
                    &EdgeQuery::new(entity, direction).kind(EdgeKind::Direct),
                )?;
                for rel in rels {
                    if !vocabulary.contains(&rel) {
                        vocabulary.push(rel);
                    }
                }
            }
        }
        Ok(vocabulary)
    }

    /// Rank candidates against the question, returning ids only,
    /// relevance-descending. The caller truncates to its configured prefix.
    pub fn rank(&self, question: &str, candidates: &[RelationId]) -> Result<Vec<RelationId>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let scored = self.ranker.rank(question, candidates)?;
        let ranked: Vec<RelationId> = scored.into_iter().map(|s| s.relation).collect();
        debug!(top = ?ranked.first(), total = ranked.len(), "ranked relation vocabulary");
        Ok(ranked)
    }

    /// Gather + rank in one step.
    pub fn ranked_neighborhood(
        &self,
        question: &str,
        entities: &[EntityId],
        directions: &[Direction],
    ) -> Result<Vec<RelationId>> {
        let vocabulary = self.gather(entities, directions)?;
        self.rank(question, &vocabulary)
    }
}

/// Truncate a ranked list to its leave-prefix.
pub(crate) fn leave(rels: &[RelationId], n: usize) -> &[RelationId] {
    &rels[..rels.len().min(n)]
}

/// Truncate each per-mention entity list to the configured cap. Applied once
/// at dispatch, before any traversal.
pub(crate) fn cap_entity_lists(
    entity_ids: &[Vec<EntityId>],
    entities_to_leave: usize,
) -> Vec<Vec<EntityId>> {
    entity_ids
        .iter()
        .map(|list| list[..list.len().min(entities_to_leave)].to_vec())
        .collect()
}
