//! Integration tests for the complete hopgraph pipeline
//!
//! These tests verify end-to-end behavior across crates:
//! - graph fixture → planner dispatch → candidate tuples
//! - fallback re-dispatch between strategies
//! - the configured truncation bounds, observed at the KG access seam
//!
//! Run with: cargo test --test integration_tests

use std::sync::Mutex;

use anyhow::Result;

use hopgraph_core::{Candidate, EdgeKind, EntityId, RelationId, ScoredRelation, XSD_DECIMAL};
use hopgraph_kg::{EdgeQuery, KnowledgeGraph, MemoryGraph, Triple};
use hopgraph_planner::{
    combine_entities, EntityLinker, PlannerConfig, QueryPlanner, QuestionInput, RelationRanker,
    TemplateMatch, TemplateMatcher,
};

// ============================================================================
// Test collaborators
// ============================================================================

struct NoMatch;

impl TemplateMatcher for NoMatch {
    fn match_question(&self, _question: &str) -> Result<TemplateMatch> {
        Ok(TemplateMatch::none())
    }
}

/// Mentions in these fixtures are already KG ids.
struct IdentityLinker;

impl EntityLinker for IdentityLinker {
    fn link(&self, mention: &str) -> Result<Vec<(EntityId, f32)>> {
        Ok(vec![(EntityId::new(mention), 1.0)])
    }
}

/// Ranks relations named in the priority list first, the rest after in
/// candidate order.
struct PriorityRanker {
    priority: Vec<RelationId>,
}

impl PriorityRanker {
    fn new(priority: &[&str]) -> Self {
        Self {
            priority: priority.iter().map(|p| RelationId::new(*p)).collect(),
        }
    }
}

impl RelationRanker for PriorityRanker {
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
            .map(|(_, cands)| cands.first().map(|c| c.answer.clone()).unwrap_or_default())
            .collect())
    }
}

/// Records the relation argument of every `objects` lookup passing through.
struct RecordingGraph {
    inner: MemoryGraph,
    object_lookups: Mutex<Vec<RelationId>>,
}

impl RecordingGraph {
    fn new(inner: MemoryGraph) -> Self {
        Self {
            inner,
            object_lookups: Mutex::new(Vec::new()),
        }
    }

    fn recorded(&self) -> Vec<RelationId> {
        self.object_lookups.lock().unwrap().clone()
    }
}

impl KnowledgeGraph for RecordingGraph {
    fn relations(&self, query: &EdgeQuery) -> Result<Vec<RelationId>> {
        self.inner.relations(query)
    }

    fn objects(&self, query: &EdgeQuery) -> Result<Vec<String>> {
        if let Some(relation) = query.relation {
            self.object_lookups.lock().unwrap().push(relation.clone());
        }
        self.inner.objects(query)
    }

    fn triples(&self, query: &EdgeQuery) -> Result<Vec<Triple>> {
        self.inner.triples(query)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// The worked numeric-qualifier example: E1 plays for a team, the claim node
/// S1 carries a start-time qualifier for 2001.
fn membership_graph() -> MemoryGraph {
    let mut g = MemoryGraph::new();
    g.add("E1", "P54", EdgeKind::Direct, "S1")
        .add("S1", "P580", EdgeKind::Qualifier, "\"2001\"")
        .add("E1", "P54", EdgeKind::Statement, "S1");
    g
}

fn planner_over<'g>(
    graph: &'g MemoryGraph,
    priority: &[&str],
    config: PlannerConfig,
) -> QueryPlanner<&'g MemoryGraph, NoMatch, IdentityLinker, PriorityRanker> {
    QueryPlanner::new(graph, NoMatch, IdentityLinker, PriorityRanker::new(priority), config)
}

// ============================================================================
// End-to-end dispatch
// ============================================================================

#[test]
fn worked_numeric_qualifier_example() {
    let graph = membership_graph();
    let planner = planner_over(&graph, &["P54"], PlannerConfig::default());

    let input = QuestionInput::new(
        "which team did he play for in 2001?",
        "0",
        vec!["E1".to_string()],
    );
    let out = planner.answer_question(&input).unwrap();
    assert_eq!(
        out,
        vec![Candidate::two_hop(
            RelationId::new("P54"),
            RelationId::new("P580"),
            "S1"
        )]
    );
}

#[test]
fn wrong_year_redispatches_to_two_hop() {
    let mut graph = membership_graph();
    // A date-shaped direct literal on the claim node gives the generic
    // two-hop numeric scan something to find for 1999.
    graph.add("S1", "P582", EdgeKind::Direct, "\"1999-06-30\"");
    let planner = planner_over(&graph, &["P54"], PlannerConfig::default());

    let input = QuestionInput::new(
        "which team did he leave in 1999?",
        "0",
        vec!["E1".to_string()],
    );
    let out = planner.answer_question(&input).unwrap();
    assert_eq!(
        out,
        vec![Candidate::two_hop(
            RelationId::new("P54"),
            RelationId::new("P582"),
            "S1"
        )]
    );
}

#[test]
fn count_emits_exact_cardinalities() {
    let mut graph = MemoryGraph::new();
    graph
        .add("Q30", "P150", EdgeKind::Direct, "Q99")
        .add("Q30", "P150", EdgeKind::Direct, "Q816")
        .add("Q30", "P150", EdgeKind::Direct, "Q1261");
    let planner = planner_over(&graph, &["P150"], PlannerConfig::default());

    let input = QuestionInput::new(
        "how many states does it contain?",
        "4",
        vec!["Q30".to_string()],
    );
    let out = planner.answer_question(&input).unwrap();
    assert_eq!(out, vec![Candidate::one_hop(RelationId::new("P150"), "3")]);
    assert_eq!(out[0].arity(), 2);
}

#[test]
fn superlative_returns_single_true_extremum() {
    let mut graph = MemoryGraph::new();
    for (id, height) in [("Q513", "8848"), ("Q2", "8611"), ("Q3", "8586")] {
        graph
            .add(id, "P31", EdgeKind::Direct, "Q8502")
            .add(
                id,
                "P2044",
                EdgeKind::Direct,
                &format!("\"{height}\"^^<{XSD_DECIMAL}>"),
            );
    }
    let mut config = PlannerConfig::default();
    config.superlative_rels_first = vec![RelationId::new("P2044")];
    let planner = planner_over(&graph, &["P2044"], config);

    let highest = planner
        .answer_question(&QuestionInput::new(
            "what is the highest mountain?",
            "5",
            vec!["Q8502".to_string()],
        ))
        .unwrap();
    assert_eq!(
        highest,
        vec![Candidate::one_hop(RelationId::new("P2044"), "Q513")]
    );

    let lowest = planner
        .answer_question(&QuestionInput::new(
            "what is the lowest of these mountains?",
            "5",
            vec!["Q8502".to_string()],
        ))
        .unwrap();
    assert_eq!(
        lowest,
        vec![Candidate::one_hop(RelationId::new("P2044"), "Q3")]
    );
}

#[test]
fn empty_graph_exhausts_every_path_without_error() {
    let graph = MemoryGraph::new();
    let planner = planner_over(&graph, &[], PlannerConfig::default());

    for code in ["0", "2", "4", "5", "6", "7"] {
        let input = QuestionInput::new(
            "anything about 2001?",
            code,
            vec!["Q1".to_string(), "Q2".to_string()],
        );
        let out = planner.answer_question(&input).unwrap();
        assert!(out.is_empty(), "template {code} should yield nothing");
    }
}

// ============================================================================
// Bounds observed at the KG seam
// ============================================================================

#[test]
fn ranked_relations_are_truncated_before_traversal() {
    let mut inner = MemoryGraph::new();
    // A wide neighborhood: eight candidate relations on one entity.
    for i in 0..8 {
        inner.add("Q1", &format!("P{i}"), EdgeKind::Direct, &format!("Q{}", 100 + i));
    }
    let graph = RecordingGraph::new(inner);

    let mut config = PlannerConfig::default();
    config.rels_to_leave = 3;
    let ranker = PriorityRanker::new(&["P5", "P6", "P7", "P0", "P1", "P2", "P3", "P4"]);
    let planner = QueryPlanner::new(&graph, NoMatch, IdentityLinker, ranker, config);

    let input = QuestionInput::new("how many things?", "4", vec!["Q1".to_string()]);
    let out = planner.answer_question(&input).unwrap();
    assert_eq!(out.len(), 3);

    let recorded = graph.recorded();
    assert!(!recorded.is_empty());
    let allowed = [
        RelationId::new("P5"),
        RelationId::new("P6"),
        RelationId::new("P7"),
    ];
    for relation in &recorded {
        assert!(
            allowed.contains(relation),
            "traversal used {relation}, outside the ranked prefix"
        );
    }
}

#[test]
fn entity_lists_are_capped_before_traversal() {
    let mut inner = MemoryGraph::new();
    for i in 0..10 {
        inner.add(&format!("Q{i}"), "P150", EdgeKind::Direct, "Q99");
    }
    let graph = RecordingGraph::new(inner);

    let mut config = PlannerConfig::default();
    config.entities_to_leave = 2;
    let planner = QueryPlanner::new(
        &graph,
        NoMatch,
        IdentityLinker,
        PriorityRanker::new(&["P150"]),
        config,
    );

    // One mention linking to one id each; the cap bites on the per-list
    // truncation inside find_candidates, so a 10-id list is cut to 2.
    let entity_ids: Vec<Vec<EntityId>> =
        vec![(0..10).map(|i| EntityId::new(format!("Q{i}"))).collect()];
    let out = planner
        .find_candidates(
            "how many?",
            &entity_ids,
            None,
            hopgraph_core::Template::Count,
        )
        .unwrap();
    assert_eq!(out.len(), 2);
}

// ============================================================================
// Combinator contract
// ============================================================================

#[test]
fn combination_order_is_outer_to_inner() {
    let lists = vec![
        vec![EntityId::new("A"), EntityId::new("B")],
        vec![EntityId::new("x"), EntityId::new("y"), EntityId::new("z")],
    ];
    let combs = combine_entities(&lists);
    assert_eq!(combs.len(), 6);
    // First list varies slower.
    assert_eq!(combs[0], vec![EntityId::new("A"), EntityId::new("x")]);
    assert_eq!(combs[2], vec![EntityId::new("A"), EntityId::new("z")]);
    assert_eq!(combs[3], vec![EntityId::new("B"), EntityId::new("x")]);
    assert_eq!(combs[5], vec![EntityId::new("B"), EntityId::new("z")]);
}

// ============================================================================
// Resolve mode
// ============================================================================

#[test]
fn resolve_mode_returns_one_answer_per_question() {
    let graph = membership_graph();
    let planner = planner_over(&graph, &["P54"], PlannerConfig::default());

    let batch = vec![
        QuestionInput::new(
            "which team did he play for in 2001?",
            "0",
            vec!["E1".to_string()],
        ),
        QuestionInput::new("nothing to find in 2050?", "0", vec!["QX".to_string()]),
    ];
    let answers = planner.resolve_batch(&batch).unwrap();
    assert_eq!(answers, vec!["S1".to_string(), String::new()]);
}
