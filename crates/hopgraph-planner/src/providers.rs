//! Collaborator seams.
//!
//! The planner consumes three external engines: a template matcher (surface
//! patterns → entity mentions + relation slots), an entity linker (mention →
//! ranked KG ids), and a relation ranker (question relevance over relation
//! candidates, plus final answer resolution). All calls are synchronous and
//! blocking from the planner's point of view; an `Err` aborts the current
//! question only.

use anyhow::Result;

use hopgraph_core::{Candidate, Direction, EntityId, RelationId, ScoredRelation, Template};

/// One relation slot extracted by the template matcher: the candidate
/// relations for the slot plus the traversal direction marker that trailed
/// them on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSpec {
    pub relations: Vec<RelationId>,
    pub direction: Direction,
}

impl RelationSpec {
    pub fn new(relations: Vec<RelationId>, direction: Direction) -> Self {
        Self {
            relations,
            direction,
        }
    }
}

/// Result of matching a question against the surface-template inventory.
#[derive(Debug, Clone, Default)]
pub struct TemplateMatch {
    /// Entity mention substrings, in slot order.
    pub entities: Vec<String>,
    /// One spec per relation slot.
    pub relations: Vec<RelationSpec>,
    /// A matched template overrides the caller-provided type.
    pub template: Option<Template>,
}

impl TemplateMatch {
    /// The no-match result: no entities, no relations, no template override.
    pub fn none() -> Self {
        Self::default()
    }
}

pub trait TemplateMatcher {
    fn match_question(&self, question: &str) -> Result<TemplateMatch>;
}

pub trait EntityLinker {
    /// Ranked candidate KG ids for one mention, confidence-descending.
    fn link(&self, mention: &str) -> Result<Vec<(EntityId, f32)>>;
}

pub trait RelationRanker {
    /// Score the candidates against the question, relevance-descending.
    fn rank(&self, question: &str, candidates: &[RelationId]) -> Result<Vec<ScoredRelation>>;

    /// Reduce candidate lists to one final answer per question. Only used
    /// when the planner is configured to return resolved answers.
    fn resolve(&self, questions: &[String], candidates: &[Vec<Candidate>]) -> Result<Vec<String>>;
}

impl<T: TemplateMatcher + ?Sized> TemplateMatcher for &T {
    fn match_question(&self, question: &str) -> Result<TemplateMatch> {
        (**self).match_question(question)
    }
}

impl<T: EntityLinker + ?Sized> EntityLinker for &T {
    fn link(&self, mention: &str) -> Result<Vec<(EntityId, f32)>> {
        (**self).link(mention)
    }
}

impl<T: RelationRanker + ?Sized> RelationRanker for &T {
    fn rank(&self, question: &str, candidates: &[RelationId]) -> Result<Vec<ScoredRelation>> {
        (**self).rank(question, candidates)
    }

    fn resolve(&self, questions: &[String], candidates: &[Vec<Candidate>]) -> Result<Vec<String>> {
        (**self).resolve(questions, candidates)
    }
}
