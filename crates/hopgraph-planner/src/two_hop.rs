//! Generic one/two-hop search: the default strategy and the target of every
//! numeric/qualifier fallback.
//!
//! Search semantics differ by entity arity and relation source:
//! - template-supplied relations are instantiated directly and short-circuit
//!   on the first nonempty traversal;
//! - with relations unknown, one-entity search either runs a numeric
//!   neighbor scan (short-circuit per relation) or two fully-accumulated
//!   passes (one-hop then gated two-hop);
//! - two-entity search short-circuits across relations but accumulates every
//!   join of the winning relation.

use anyhow::Result;
use tracing::debug;

use hopgraph_core::text::{extract_number, extract_year, tokenize};
use hopgraph_core::{Candidate, Direction, EdgeKind, EntityId, RelationId};
use hopgraph_kg::EdgeQuery;

use crate::combine::combine_entities;
use crate::prefilter::leave;
use crate::providers::RelationSpec;
use crate::SearchContext;

pub fn solve(
    ctx: &SearchContext,
    question: &str,
    entity_ids: &[Vec<EntityId>],
    rels: Option<&[RelationSpec]>,
) -> Result<Vec<Candidate>> {
    match entity_ids.len() {
        0 => Ok(Vec::new()),
        1 => match rels {
            Some(specs) => from_template_one_entity(ctx, &entity_ids[0], specs),
            None => one_entity_search(ctx, question, &entity_ids[0]),
        },
        _ => {
            let head_pair = [entity_ids[0].clone(), entity_ids[1].clone()];
            let combs = combine_entities(&head_pair);
            match rels {
                Some(specs) => from_template_two_entities(ctx, &combs, specs),
                None => {
                    let mut candidates = two_entity_search(ctx, question, &combs)?;
                    if candidates.is_empty() && entity_ids.len() == 3 {
                        let alt_pair = [entity_ids[0].clone(), entity_ids[2].clone()];
                        candidates =
                            two_entity_search(ctx, question, &combine_entities(&alt_pair))?;
                    }
                    if candidates.is_empty() {
                        candidates = one_entity_search(ctx, question, &entity_ids[1])?;
                    }
                    Ok(candidates)
                }
            }
        }
    }
}

// ============================================================================
// Template-supplied relations
// ============================================================================

fn from_template_one_entity(
    ctx: &SearchContext,
    entities: &[EntityId],
    specs: &[RelationSpec],
) -> Result<Vec<Candidate>> {
    match specs {
        [spec] => {
            for entity in entities {
                for relation in &spec.relations {
                    let objects = direct_objects(ctx, entity, relation, spec.direction)?;
                    if let Some(first) = objects.first() {
                        return Ok(vec![Candidate::one_hop(relation.clone(), first)]);
                    }
                }
            }
            Ok(Vec::new())
        }
        [spec_1, spec_2] => {
            for entity in entities {
                for relation_1 in &spec_1.relations {
                    let mids = direct_objects(ctx, entity, relation_1, spec_1.direction)?;
                    for mid in mids {
                        let mid = EntityId::new(mid);
                        for relation_2 in &spec_2.relations {
                            let objects =
                                direct_objects(ctx, &mid, relation_2, spec_2.direction)?;
                            if let Some(first) = objects.first() {
                                return Ok(vec![Candidate::two_hop(
                                    relation_1.clone(),
                                    relation_2.clone(),
                                    first,
                                )]);
                            }
                        }
                    }
                }
            }
            Ok(Vec::new())
        }
        _ => Ok(Vec::new()),
    }
}

fn from_template_two_entities(
    ctx: &SearchContext,
    combs: &[Vec<EntityId>],
    specs: &[RelationSpec],
) -> Result<Vec<Candidate>> {
    let instance_of = &ctx.config.instance_of;
    match specs {
        [spec] => {
            for comb in combs {
                for relation in &spec.relations {
                    let objects = direct_objects(ctx, &comb[1], relation, spec.direction)?;
                    for object in objects {
                        let object = EntityId::new(object);
                        // The final object must type-match the first entity.
                        let matched = ctx.graph.objects(
                            &EdgeQuery::new(&object, spec.direction)
                                .relation(instance_of)
                                .object(comb[0].as_str())
                                .kind(EdgeKind::Direct),
                        )?;
                        if let Some(first) = matched.first() {
                            return Ok(vec![Candidate::one_hop(relation.clone(), first)]);
                        }
                    }
                }
            }
            Ok(Vec::new())
        }
        [spec_1, spec_2] => {
            for comb in combs {
                for relation_1 in &spec_1.relations {
                    for relation_2 in &spec_2.relations {
                        let objects_1 =
                            direct_objects(ctx, &comb[0], relation_1, spec_1.direction)?;
                        let objects_2 =
                            direct_objects(ctx, &comb[1], relation_2, spec_2.direction)?;
                        let common = objects_1.iter().find(|o| objects_2.contains(*o));
                        if let Some(common) = common {
                            return Ok(vec![Candidate::two_hop(
                                relation_1.clone(),
                                relation_2.clone(),
                                common,
                            )]);
                        }
                    }
                }
            }
            Ok(Vec::new())
        }
        _ => Ok(Vec::new()),
    }
}

// ============================================================================
// One entity, relations unknown
// ============================================================================

fn one_entity_search(
    ctx: &SearchContext,
    question: &str,
    entities: &[EntityId],
) -> Result<Vec<Candidate>> {
    let prefilter = ctx.prefilter();
    let ranked = prefilter.ranked_neighborhood(
        question,
        entities,
        &[Direction::Forward, Direction::Backward],
    )?;

    let tokens = tokenize(question);
    let year = extract_year(&tokens, question);
    let number = match &year {
        Some(_) => None,
        None => extract_number(&tokens, question),
    };
    debug!(?year, ?number, "one-entity two-hop");

    let config = ctx.config;
    if let Some(year) = year {
        // The literal filter is the leading digits of the year, so
        // date-shaped literals within the same decade match by containment.
        let prefix = &year[..year.len().min(3)];
        return numeric_neighbor_search(ctx, entities, leave(&ranked, config.rels_to_leave), prefix);
    }
    if let Some(number) = number {
        return numeric_neighbor_search(ctx, entities, leave(&ranked, config.rels_to_leave), &number);
    }

    let top = leave(&ranked, config.rels_to_leave_2hop);

    // Second-hop vocabulary: forward relations of every sufficiently small
    // midpoint set reachable through a top relation.
    let mut second_vocabulary: Vec<RelationId> = Vec::new();
    for entity in entities {
        for relation in top {
            if relation == &config.instance_of {
                continue;
            }
            let mids = both_direction_objects(ctx, entity, relation)?;
            if mids.len() < config.second_hop_fanout_limit {
                for mid in mids {
                    let mid = EntityId::new(mid);
                    let rels = ctx.graph.relations(
                        &EdgeQuery::forward(&mid).kind(EdgeKind::Direct),
                    )?;
                    for rel in rels {
                        if !second_vocabulary.contains(&rel) {
                            second_vocabulary.push(rel);
                        }
                    }
                }
            }
        }
    }
    let ranked_2 = prefilter.rank(question, &second_vocabulary)?;
    let top_2 = leave(&ranked_2, config.rels_to_leave_2hop);

    let mut candidates = Vec::new();

    // Pass (a): one-relation candidates, fully accumulated.
    for entity in entities {
        for relation in top {
            if relation == &config.instance_of {
                continue;
            }
            let objects = both_direction_objects(ctx, entity, relation)?;
            if let Some(first) = objects.first() {
                candidates.push(Candidate::one_hop(relation.clone(), first));
            }
        }
    }

    // Pass (b): gated two-relation expansion, fully accumulated.
    for entity in entities {
        for relation_1 in top {
            if relation_1 == &config.instance_of {
                continue;
            }
            let mids = both_direction_objects(ctx, entity, relation_1)?;
            if mids.is_empty() || mids.len() >= config.second_hop_fanout_limit {
                continue;
            }
            for mid in mids {
                let mid = EntityId::new(mid);
                for relation_2 in top_2 {
                    if relation_2 == &config.instance_of || relation_2 == relation_1 {
                        continue;
                    }
                    let objects = direct_objects(ctx, &mid, relation_2, Direction::Forward)?;
                    if let Some(first) = objects.first() {
                        candidates.push(Candidate::two_hop(
                            relation_1.clone(),
                            relation_2.clone(),
                            first,
                        ));
                    }
                }
            }
        }
    }

    Ok(candidates)
}

/// Find a neighbor whose own forward literals contain the extracted value:
/// the first relation producing any match wins and contributes every match.
fn numeric_neighbor_search(
    ctx: &SearchContext,
    entities: &[EntityId],
    ranked: &[RelationId],
    filter: &str,
) -> Result<Vec<Candidate>> {
    for entity in entities {
        for relation in ranked {
            let neighbors = direct_objects(ctx, entity, relation, Direction::Forward)?;
            let mut hits = Vec::new();
            for neighbor in neighbors {
                let node = EntityId::new(neighbor.clone());
                let literal_rels = ctx.graph.relations(
                    &EdgeQuery::forward(&node)
                        .kind(EdgeKind::Direct)
                        .value_contains(filter),
                )?;
                for literal_rel in literal_rels {
                    hits.push(Candidate::two_hop(
                        relation.clone(),
                        literal_rel,
                        neighbor.clone(),
                    ));
                }
            }
            if !hits.is_empty() {
                return Ok(hits);
            }
        }
    }
    Ok(Vec::new())
}

// ============================================================================
// Two entities, relations unknown
// ============================================================================

fn two_entity_search(
    ctx: &SearchContext,
    question: &str,
    combs: &[Vec<EntityId>],
) -> Result<Vec<Candidate>> {
    let prefilter = ctx.prefilter();
    let instance_of = &ctx.config.instance_of;

    for comb in combs {
        let (first, second) = (&comb[0], &comb[1]);
        let ranked = prefilter.ranked_neighborhood(
            question,
            std::slice::from_ref(second),
            &[Direction::Forward, Direction::Backward],
        )?;

        for relation in leave(&ranked, ctx.config.rels_to_leave) {
            let neighbors = both_direction_objects(ctx, second, relation)?;
            let mut hits = Vec::new();
            for neighbor in neighbors {
                let node = EntityId::new(neighbor.clone());
                let joins = ctx.graph.relations(
                    &EdgeQuery::forward(&node)
                        .kind(EdgeKind::Direct)
                        .object(first.as_str()),
                )?;
                for join in joins {
                    if &join == instance_of {
                        hits.push(Candidate::one_hop(relation.clone(), neighbor.clone()));
                    } else {
                        hits.push(Candidate::two_hop(
                            relation.clone(),
                            join,
                            neighbor.clone(),
                        ));
                    }
                }
            }
            if !hits.is_empty() {
                debug!(relation = %relation, joins = hits.len(), "two-entity join");
                return Ok(hits);
            }
        }
    }
    Ok(Vec::new())
}

// ============================================================================
// Shared lookups
// ============================================================================

fn direct_objects(
    ctx: &SearchContext,
    entity: &EntityId,
    relation: &RelationId,
    direction: Direction,
) -> Result<Vec<String>> {
    ctx.graph.objects(
        &EdgeQuery::new(entity, direction)
            .relation(relation)
            .kind(EdgeKind::Direct),
    )
}

fn both_direction_objects(
    ctx: &SearchContext,
    entity: &EntityId,
    relation: &RelationId,
) -> Result<Vec<String>> {
    let mut objects = direct_objects(ctx, entity, relation, Direction::Forward)?;
    objects.extend(direct_objects(ctx, entity, relation, Direction::Backward)?);
    Ok(objects)
}
