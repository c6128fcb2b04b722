//! Template dispatch and the fallback chain.
//!
//! Entity-source priority: template-matched entities are linked and tried
//! first; only when they yield nothing (or never existed) do the NER
//! entities serve as the recall backstop, with the template reset to the
//! batch-provided type.
//!
//! The active template is a local variable threaded through the call — never
//! planner state — so batch items (and strategy attempts within one item)
//! can run concurrently without interference.

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, warn};

use hopgraph_core::text::sanitize_question;
use hopgraph_core::{Candidate, EntityId, Template};
use hopgraph_kg::KnowledgeGraph;

use crate::config::PlannerConfig;
use crate::prefilter::cap_entity_lists;
use crate::providers::{EntityLinker, RelationRanker, RelationSpec, TemplateMatcher};
use crate::{count, qualifiers, superlative, two_hop, SearchContext};

/// One batch item: the raw question, the batch-level template code from the
/// upstream classifier, and the NER entity mentions.
#[derive(Debug, Clone)]
pub struct QuestionInput {
    pub question: String,
    pub template_code: String,
    pub ner_entities: Vec<String>,
}

impl QuestionInput {
    pub fn new(
        question: impl Into<String>,
        template_code: impl Into<String>,
        ner_entities: Vec<String>,
    ) -> Self {
        Self {
            question: question.into(),
            template_code: template_code.into(),
            ner_entities,
        }
    }
}

pub struct QueryPlanner<G, M, L, R> {
    graph: G,
    matcher: M,
    linker: L,
    ranker: R,
    config: PlannerConfig,
}

impl<G, M, L, R> QueryPlanner<G, M, L, R>
where
    G: KnowledgeGraph,
    M: TemplateMatcher,
    L: EntityLinker,
    R: RelationRanker,
{
    pub fn new(graph: G, matcher: M, linker: L, ranker: R, config: PlannerConfig) -> Self {
        Self {
            graph,
            matcher,
            linker,
            ranker,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Candidate lists for a whole batch. Items are independent: a
    /// collaborator failure aborts its own question only.
    pub fn answer_batch(&self, batch: &[QuestionInput]) -> Vec<Vec<Candidate>> {
        batch.iter().map(|input| self.answer_or_empty(input)).collect()
    }

    /// Resolve mode: candidate lists reduced to one final answer per
    /// question by the ranker.
    pub fn resolve_batch(&self, batch: &[QuestionInput]) -> Result<Vec<String>> {
        let candidates = self.answer_batch(batch);
        let questions: Vec<String> = batch.iter().map(|i| i.question.clone()).collect();
        self.ranker.resolve(&questions, &candidates)
    }

    fn answer_or_empty(&self, input: &QuestionInput) -> Vec<Candidate> {
        match self.answer_question(input) {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!(%error, question = %input.question, "question aborted");
                Vec::new()
            }
        }
    }

    pub fn answer_question(&self, input: &QuestionInput) -> Result<Vec<Candidate>> {
        let question = sanitize_question(&input.question);
        let batch_template =
            Template::from_code(&input.template_code).unwrap_or(Template::TwoHop);

        let matched = self.matcher.match_question(&question)?;
        let template = matched.template.unwrap_or(batch_template);
        debug!(%template, question = %question, "dispatch");

        let mut candidates = Vec::new();
        if !matched.entities.is_empty() {
            let entity_ids = self.link_entities(&matched.entities)?;
            debug!(?entity_ids, "template entities linked");
            let rels = (!matched.relations.is_empty()).then_some(matched.relations.as_slice());
            candidates = self.find_candidates(&question, &entity_ids, rels, template)?;
        }

        if candidates.is_empty() && !input.ner_entities.is_empty() {
            let entity_ids = self.link_entities(&input.ner_entities)?;
            debug!(?entity_ids, "ner entities linked");
            candidates = self.find_candidates(&question, &entity_ids, None, batch_template)?;
        }
        Ok(candidates)
    }

    fn link_entities(&self, mentions: &[String]) -> Result<Vec<Vec<EntityId>>> {
        let cap = self.config.linker_candidates_cap;
        mentions
            .iter()
            .map(|mention| {
                let linked = self.linker.link(mention)?;
                Ok(linked.into_iter().take(cap).map(|(id, _)| id).collect())
            })
            .collect()
    }

    /// Run the template's strategy, re-dispatching per the fallback chain
    /// while results stay empty.
    pub fn find_candidates(
        &self,
        question: &str,
        entity_ids: &[Vec<EntityId>],
        rels: Option<&[RelationSpec]>,
        template: Template,
    ) -> Result<Vec<Candidate>> {
        if entity_ids.iter().all(Vec::is_empty) {
            return Ok(Vec::new());
        }
        let entity_ids = cap_entity_lists(entity_ids, self.config.entities_to_leave);
        let ctx = SearchContext::new(&self.graph, &self.ranker, &self.config);

        let mut template = template;
        let mut rels = rels;
        loop {
            let candidates = match template {
                Template::NumberInQualifier | Template::NumberInStatement => {
                    qualifiers::solve_numeric(&ctx, question, &entity_ids, rels, template)?
                }
                Template::EntityInStatement | Template::EntityInQualifier => {
                    qualifiers::solve_join(&ctx, question, &entity_ids, rels, template)?
                }
                Template::Count => count::solve(&ctx, question, &entity_ids, rels)?,
                Template::SuperlativeOneEntity => {
                    superlative::solve_one(&ctx, question, &entity_ids[0], rels)?
                }
                Template::SuperlativeTwoEntities => {
                    superlative::solve_two(&ctx, question, &entity_ids, rels)?
                }
                Template::TwoHop => two_hop::solve(&ctx, question, &entity_ids, rels)?,
            };
            if !candidates.is_empty() {
                debug!(%template, count = candidates.len(), "candidates found");
                return Ok(candidates);
            }

            template = match template {
                Template::NumberInQualifier
                | Template::NumberInStatement
                | Template::EntityInStatement
                | Template::EntityInQualifier => Template::TwoHop,
                Template::SuperlativeTwoEntities => {
                    // Retry as the one-entity superlative over the first
                    // list; the two-slot relation specs do not apply there.
                    rels = None;
                    Template::SuperlativeOneEntity
                }
                Template::Count
                | Template::SuperlativeOneEntity
                | Template::TwoHop => return Ok(candidates),
            };
            debug!(fallback = %template, "strategy empty, re-dispatching");
        }
    }
}

impl<G, M, L, R> QueryPlanner<G, M, L, R>
where
    G: KnowledgeGraph + Sync,
    M: TemplateMatcher + Sync,
    L: EntityLinker + Sync,
    R: RelationRanker + Sync,
{
    /// Parallel batch entry point. Sound because every question's scratch
    /// state (including the active template) is local to its call.
    pub fn answer_batch_parallel(&self, batch: &[QuestionInput]) -> Vec<Vec<Candidate>> {
        batch
            .par_iter()
            .map(|input| self.answer_or_empty(input))
            .collect()
    }
}
