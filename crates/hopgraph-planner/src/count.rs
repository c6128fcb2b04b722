//! Counting search: the answer is the cardinality of a reachable object set.
//!
//! Every (entity, relation, direction) combination is evaluated; each one
//! with at least one reachable Direct object emits its exact count. No
//! short-circuit, so the same relation id may appear for several entities.

use anyhow::Result;

use hopgraph_core::{Candidate, Direction, EdgeKind, EntityId};
use hopgraph_kg::EdgeQuery;

use crate::prefilter::leave;
use crate::providers::RelationSpec;
use crate::SearchContext;

pub fn solve(
    ctx: &SearchContext,
    question: &str,
    entity_ids: &[Vec<EntityId>],
    rels: Option<&[RelationSpec]>,
) -> Result<Vec<Candidate>> {
    let (relations, directions) = match rels.and_then(|specs| specs.first()) {
        Some(spec) => (spec.relations.clone(), vec![spec.direction]),
        None => {
            let prefilter = ctx.prefilter();
            let mut vocabulary = Vec::new();
            for list in entity_ids {
                let gathered =
                    prefilter.gather(list, &[Direction::Forward, Direction::Backward])?;
                for rel in gathered {
                    if !vocabulary.contains(&rel) {
                        vocabulary.push(rel);
                    }
                }
            }
            let ranked = prefilter.rank(question, &vocabulary)?;
            (ranked, vec![Direction::Forward, Direction::Backward])
        }
    };
    let top = leave(&relations, ctx.config.rels_to_leave);

    let mut candidates = Vec::new();
    for list in entity_ids {
        for entity in list {
            for relation in top {
                for &direction in &directions {
                    let objects = ctx.graph.objects(
                        &EdgeQuery::new(entity, direction)
                            .relation(relation)
                            .kind(EdgeKind::Direct),
                    )?;
                    if !objects.is_empty() {
                        candidates
                            .push(Candidate::one_hop(relation.clone(), objects.len().to_string()));
                    }
                }
            }
        }
    }
    Ok(candidates)
}
