//! Hopgraph query planner.
//!
//! Given a question whose entity mentions and coarse template shape are
//! already identified upstream, the planner searches the knowledge graph for
//! candidate answer subgraphs by bounded multi-hop traversal, guided by a
//! relevance ranking over candidate relations.
//!
//! Structure:
//! - `providers`: the collaborator seams (template matcher, entity linker,
//!   relation ranker)
//! - `config`: traversal bounds and the superlative relation vocabularies
//! - `combine`: bounded Cartesian products over per-mention entity lists
//! - `prefilter`: neighborhood relation vocabulary gathering + ranking
//! - `two_hop`, `qualifiers`, `count`, `superlative`: the per-template
//!   search strategies
//! - `dispatch`: template dispatch with the fallback chain
//!
//! All per-question scratch state (including the active template) is local
//! to the call, so batch items can run concurrently without locking.

pub mod combine;
pub mod config;
pub mod count;
pub mod dispatch;
pub mod prefilter;
pub mod providers;
pub mod qualifiers;
pub mod superlative;
#[cfg(test)]
pub(crate) mod testing;
pub mod two_hop;

use hopgraph_kg::KnowledgeGraph;

pub use combine::combine_entities;
pub use config::PlannerConfig;
pub use dispatch::{QueryPlanner, QuestionInput};
pub use prefilter::RelationPrefilter;
pub use providers::{
    EntityLinker, RelationRanker, RelationSpec, TemplateMatch, TemplateMatcher,
};

/// Shared read-only view over the collaborators a search strategy needs.
/// Built per call; strategies keep no state of their own.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub graph: &'a dyn KnowledgeGraph,
    pub ranker: &'a dyn RelationRanker,
    pub config: &'a PlannerConfig,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        graph: &'a dyn KnowledgeGraph,
        ranker: &'a dyn RelationRanker,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            graph,
            ranker,
            config,
        }
    }

    pub(crate) fn prefilter(&self) -> RelationPrefilter<'a> {
        RelationPrefilter::new(self.graph, self.ranker)
    }
}
