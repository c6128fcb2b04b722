//! Numeric and qualifier-join search over reified claims.
//!
//! A claim here may be reified: the first hop reaches a statement node,
//! which carries Statement-kind edges (the claim's own object) and
//! Qualifier-kind edges (secondary refinements, e.g. validity periods).
//!
//! Two families share this module:
//! - numeric constraints (the extracted year/number must appear in a
//!   qualifier or statement literal), and
//! - entity joins (a second entity must be attached to the claim node).
//!
//! Both evaluate every (entity, relation, hop) combination — unlike the
//! generic two-hop solver there is no short-circuit.

use anyhow::Result;
use tracing::debug;

use hopgraph_core::text::{extract_number, extract_year, tokenize};
use hopgraph_core::{Candidate, Direction, EdgeKind, EntityId, RelationId, Template};
use hopgraph_kg::EdgeQuery;

use crate::combine::combine_entities;
use crate::prefilter::leave;
use crate::providers::RelationSpec;
use crate::SearchContext;

/// Numeric-qualifier search (`NumberInQualifier` / `NumberInStatement`).
pub fn solve_numeric(
    ctx: &SearchContext,
    question: &str,
    entity_ids: &[Vec<EntityId>],
    rels: Option<&[RelationSpec]>,
    template: Template,
) -> Result<Vec<Candidate>> {
    let Some(entities) = entity_ids.first() else {
        return Ok(Vec::new());
    };

    let tokens = tokenize(question);
    let year = extract_year(&tokens, question);
    let number = match &year {
        Some(_) => None,
        None => extract_number(&tokens, question),
    };
    debug!(?year, ?number, ?template, "numeric-qualifier search");
    let Some(value) = year.or(number) else {
        // Nothing to filter on: this strategy has no answer here.
        return Ok(Vec::new());
    };

    search_with_relation_source(ctx, question, entities, rels, |relations| {
        numeric_scan(ctx, entities, relations, &value, template)
    })
}

/// Qualifier-join search (`EntityInStatement` / `EntityInQualifier`).
/// Requires two entity lists; fewer yield nothing.
pub fn solve_join(
    ctx: &SearchContext,
    question: &str,
    entity_ids: &[Vec<EntityId>],
    rels: Option<&[RelationSpec]>,
    template: Template,
) -> Result<Vec<Candidate>> {
    if entity_ids.len() < 2 {
        return Ok(Vec::new());
    }
    let entities = &entity_ids[0];
    let combs = combine_entities(&entity_ids[..2]);

    search_with_relation_source(ctx, question, entities, rels, |relations| {
        join_scan(ctx, &combs, relations, template)
    })
}

/// Shared relation sourcing: template-supplied relations are used verbatim;
/// otherwise the first entity list's forward Direct vocabulary is ranked and
/// truncated, and an empty result is retried once against the full unranked
/// vocabulary.
fn search_with_relation_source(
    ctx: &SearchContext,
    question: &str,
    entities: &[EntityId],
    rels: Option<&[RelationSpec]>,
    search: impl Fn(&[RelationId]) -> Result<Vec<Candidate>>,
) -> Result<Vec<Candidate>> {
    if let Some(spec) = rels.and_then(|specs| specs.first()) {
        return search(&spec.relations);
    }

    let prefilter = ctx.prefilter();
    let vocabulary = prefilter.gather(entities, &[Direction::Forward])?;
    let ranked = prefilter.rank(question, &vocabulary)?;
    let candidates = search(leave(&ranked, ctx.config.rels_to_leave))?;
    if !candidates.is_empty() {
        return Ok(candidates);
    }
    // Ranked prefix found nothing; the full neighborhood is the recall
    // backstop.
    search(&vocabulary)
}

fn numeric_scan(
    ctx: &SearchContext,
    entities: &[EntityId],
    relations: &[RelationId],
    value: &str,
    template: Template,
) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();
    for entity in entities {
        for relation in relations {
            // First hop: the Direct edge of the claim, whose endpoint is the
            // reified statement node when the claim carries qualifiers.
            let hops = ctx.graph.objects(
                &EdgeQuery::forward(entity)
                    .relation(relation)
                    .kind(EdgeKind::Direct),
            )?;

            match template {
                Template::NumberInQualifier => {
                    let answers = ctx.graph.objects(
                        &EdgeQuery::forward(entity)
                            .relation(relation)
                            .kind(EdgeKind::Statement),
                    )?;
                    if answers.is_empty() {
                        continue;
                    }
                    for hop in &hops {
                        let node = EntityId::new(hop.clone());
                        let qualifier_rels = ctx.graph.relations(
                            &EdgeQuery::forward(&node)
                                .kind(EdgeKind::Qualifier)
                                .value_contains(value),
                        )?;
                        for qualifier_rel in &qualifier_rels {
                            for answer in &answers {
                                candidates.push(Candidate::two_hop(
                                    relation.clone(),
                                    qualifier_rel.clone(),
                                    answer,
                                ));
                            }
                        }
                    }
                }
                Template::NumberInStatement => {
                    for hop in &hops {
                        let node = EntityId::new(hop.clone());
                        let qualifier_triples = ctx
                            .graph
                            .triples(&EdgeQuery::forward(&node).kind(EdgeKind::Qualifier))?;
                        let matched = ctx.graph.relations(
                            &EdgeQuery::forward(&node)
                                .relation(relation)
                                .kind(EdgeKind::Statement)
                                .value_contains(value),
                        )?;
                        if matched.is_empty() {
                            continue;
                        }
                        for triple in &qualifier_triples {
                            candidates.push(Candidate::two_hop(
                                relation.clone(),
                                triple.relation.clone(),
                                triple.object.clone(),
                            ));
                        }
                    }
                }
                _ => {}
            }
        }
    }
    Ok(candidates)
}

fn join_scan(
    ctx: &SearchContext,
    combs: &[Vec<EntityId>],
    relations: &[RelationId],
    template: Template,
) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();
    for comb in combs {
        let (first, second) = (&comb[0], &comb[1]);
        for relation in relations {
            let hops = ctx.graph.objects(
                &EdgeQuery::forward(first)
                    .relation(relation)
                    .kind(EdgeKind::Direct),
            )?;

            for hop in &hops {
                let node = EntityId::new(hop.clone());
                match template {
                    Template::EntityInStatement => {
                        // The claim node must reach the second entity through
                        // a Statement-kind edge of the same relation.
                        let joined = ctx.graph.relations(
                            &EdgeQuery::backward(second)
                                .relation(relation)
                                .object(node.as_str())
                                .kind(EdgeKind::Statement),
                        )?;
                        if joined.is_empty() {
                            continue;
                        }
                        let qualifier_triples = ctx
                            .graph
                            .triples(&EdgeQuery::forward(&node).kind(EdgeKind::Qualifier))?;
                        for triple in &qualifier_triples {
                            candidates.push(Candidate::two_hop(
                                relation.clone(),
                                triple.relation.clone(),
                                triple.object.clone(),
                            ));
                        }
                    }
                    Template::EntityInQualifier => {
                        // Any Qualifier-kind edge from the claim node to the
                        // second entity joins the claim.
                        let qualifier_rels = ctx.graph.relations(
                            &EdgeQuery::backward(second)
                                .object(node.as_str())
                                .kind(EdgeKind::Qualifier),
                        )?;
                        if qualifier_rels.is_empty() {
                            continue;
                        }
                        let answers = ctx.graph.objects(
                            &EdgeQuery::forward(&node)
                                .relation(relation)
                                .kind(EdgeKind::Statement),
                        )?;
                        for qualifier_rel in &qualifier_rels {
                            for answer in &answers {
                                candidates.push(Candidate::two_hop(
                                    relation.clone(),
                                    qualifier_rel.clone(),
                                    answer,
                                ));
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(candidates)
}
