//! Superlative (max/min) resolution: compare parsed numeric literals across
//! class members and keep the single extremal candidate.
//!
//! Both variants short-circuit on the first relation (or relation pair)
//! producing any numeric hits, then sort that relation's hits by value —
//! ascending when the question asks for a minimum, descending otherwise —
//! and emit at most one candidate.

use std::cmp::Ordering;

use anyhow::Result;
use tracing::debug;

use hopgraph_core::text::ascending_cue;
use hopgraph_core::{
    parse_numeric_literal, Candidate, Direction, EdgeKind, EntityId, RelationId, XSD_DECIMAL,
};
use hopgraph_kg::EdgeQuery;

use crate::combine::combine_entities;
use crate::prefilter::leave;
use crate::providers::RelationSpec;
use crate::SearchContext;

/// One-entity superlative: rank over the configured first-stage vocabulary,
/// scan each candidate entity's class members for decimal literals.
pub fn solve_one(
    ctx: &SearchContext,
    question: &str,
    entities: &[EntityId],
    rels: Option<&[RelationSpec]>,
) -> Result<Vec<Candidate>> {
    let prefilter = ctx.prefilter();
    let ranked = match rels.and_then(|specs| specs.first()) {
        Some(spec) => spec.relations.clone(),
        None => prefilter.rank(question, &ctx.config.superlative_rels_first)?,
    };
    let top = leave(&ranked, ctx.config.rels_to_leave);

    let hits = first_relation_hits(ctx, entities, top)?;
    debug!(hits = hits.len(), "one-entity superlative");

    Ok(extremal(hits, ascending_cue(question))
        .map(|(relation, member, _)| vec![Candidate::one_hop(relation, member)])
        .unwrap_or_default())
}

/// Two-entity superlative: joint candidates are the first entity's class
/// members that the second entity reaches backward through a first-stage
/// relation; their decimal literals come from a second-stage relation.
pub fn solve_two(
    ctx: &SearchContext,
    question: &str,
    entity_ids: &[Vec<EntityId>],
    rels: Option<&[RelationSpec]>,
) -> Result<Vec<Candidate>> {
    if entity_ids.len() < 2 {
        return Ok(Vec::new());
    }
    let prefilter = ctx.prefilter();

    let (ranked_1, ranked_2) = match rels {
        Some([spec_1, spec_2, ..]) => (spec_1.relations.clone(), spec_2.relations.clone()),
        _ => {
            let mut all_entities: Vec<EntityId> = Vec::new();
            for list in &entity_ids[..2] {
                all_entities.extend(list.iter().cloned());
            }
            let ranked_1 = prefilter.ranked_neighborhood(
                question,
                &all_entities,
                &[Direction::Backward],
            )?;
            let ranked_2 = prefilter.rank(question, &ctx.config.superlative_rels_second)?;
            (ranked_1, ranked_2)
        }
    };
    let top_1 = leave(&ranked_1, ctx.config.rels_to_leave);
    let top_2 = leave(&ranked_2, ctx.config.rels_to_leave);

    let combs = combine_entities(&entity_ids[..2]);
    let hits = first_pair_hits(ctx, &combs, top_1, top_2)?;
    debug!(hits = hits.len(), "two-entity superlative");

    Ok(extremal(hits, ascending_cue(question))
        .map(|((relation_1, relation_2), member, _)| {
            vec![Candidate::two_hop(relation_1, relation_2, member)]
        })
        .unwrap_or_default())
}

/// Entity-major, rank-order scan; the first relation with any parsed value
/// wins and contributes all of its `(relation, member, value)` hits.
fn first_relation_hits(
    ctx: &SearchContext,
    entities: &[EntityId],
    relations: &[RelationId],
) -> Result<Vec<(RelationId, String, f64)>> {
    for entity in entities {
        let members = class_members(ctx, entity)?;
        for relation in relations {
            let mut hits = Vec::new();
            for member in &members {
                if let Some(value) = decimal_value(ctx, member, relation)? {
                    hits.push((relation.clone(), member.clone(), value));
                }
            }
            if !hits.is_empty() {
                return Ok(hits);
            }
        }
    }
    Ok(Vec::new())
}

/// Combination-major scan over relation pairs; the first pair with any
/// parsed value wins.
fn first_pair_hits(
    ctx: &SearchContext,
    combs: &[Vec<EntityId>],
    relations_1: &[RelationId],
    relations_2: &[RelationId],
) -> Result<Vec<((RelationId, RelationId), String, f64)>> {
    for comb in combs {
        let members = class_members(ctx, &comb[0])?;
        for relation_1 in relations_1 {
            let linked = ctx.graph.objects(
                &EdgeQuery::backward(&comb[1])
                    .relation(relation_1)
                    .kind(EdgeKind::Direct),
            )?;
            let joint: Vec<&String> = members.iter().filter(|m| linked.contains(*m)).collect();
            if joint.is_empty() {
                continue;
            }
            for relation_2 in relations_2 {
                let mut hits = Vec::new();
                for member in &joint {
                    if let Some(value) = decimal_value(ctx, member, relation_2)? {
                        hits.push((
                            (relation_1.clone(), relation_2.clone()),
                            (*member).clone(),
                            value,
                        ));
                    }
                }
                if !hits.is_empty() {
                    return Ok(hits);
                }
            }
        }
    }
    Ok(Vec::new())
}

/// Backward type-membership objects: the instances of the class the entity
/// denotes.
fn class_members(ctx: &SearchContext, entity: &EntityId) -> Result<Vec<String>> {
    ctx.graph.objects(
        &EdgeQuery::backward(entity)
            .relation(&ctx.config.instance_of)
            .kind(EdgeKind::Direct),
    )
}

/// The member's first decimal-typed literal under the relation, strictly
/// parsed. Malformed literals contribute nothing.
fn decimal_value(
    ctx: &SearchContext,
    member: &str,
    relation: &RelationId,
) -> Result<Option<f64>> {
    let subject = EntityId::new(member);
    let literals = ctx.graph.objects(
        &EdgeQuery::forward(&subject)
            .relation(relation)
            .kind(EdgeKind::Direct)
            .value_contains(XSD_DECIMAL),
    )?;
    Ok(literals
        .first()
        .and_then(|raw| parse_numeric_literal(raw).ok()))
}

/// Sort by value and keep the single extremum: the minimum under an
/// ascending cue, the maximum otherwise.
fn extremal<K>(mut hits: Vec<(K, String, f64)>, ascending: bool) -> Option<(K, String, f64)> {
    hits.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal));
    if !ascending {
        hits.reverse();
    }
    hits.into_iter().next()
}
