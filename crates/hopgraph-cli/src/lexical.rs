//! Deterministic reference collaborators.
//!
//! The real pipeline plugs trained models into the planner's collaborator
//! seams. For CLI runs and fixtures we provide small deterministic stand-ins
//! built from the snapshot's own label edges: same seams, no models, fully
//! reproducible output.

use std::collections::HashMap;

use anyhow::Result;

use hopgraph_core::text::tokenize;
use hopgraph_core::{normalize_literal, Candidate, EntityId, RelationId, ScoredRelation};
use hopgraph_kg::{EdgeQuery, KnowledgeGraph, MemoryGraph};
use hopgraph_planner::{EntityLinker, RelationRanker, TemplateMatch, TemplateMatcher};

/// Surface-template matching is an upstream model's concern; the CLI always
/// reports "no match" and lets the NER mentions drive the search.
pub struct NoTemplates;

impl TemplateMatcher for NoTemplates {
    fn match_question(&self, _question: &str) -> Result<TemplateMatch> {
        Ok(TemplateMatch::none())
    }
}

/// Entity linking over the snapshot's label edges: exact lowercase label
/// matches first, then labels containing the mention.
pub struct LabelLinker {
    index: HashMap<String, Vec<EntityId>>,
}

impl LabelLinker {
    pub fn from_graph(graph: &MemoryGraph, label_relation: &RelationId) -> Self {
        let mut index: HashMap<String, Vec<EntityId>> = HashMap::new();
        for edge in graph.edges() {
            if &edge.relation == label_relation {
                let label = normalize_literal(&edge.object).to_lowercase();
                index.entry(label).or_default().push(edge.subject.clone());
            }
        }
        Self { index }
    }
}

impl EntityLinker for LabelLinker {
    fn link(&self, mention: &str) -> Result<Vec<(EntityId, f32)>> {
        let needle = mention.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut linked: Vec<(EntityId, f32)> = Vec::new();
        if let Some(ids) = self.index.get(&needle) {
            linked.extend(ids.iter().map(|id| (id.clone(), 1.0)));
        }
        // Substring hits as lower-confidence candidates, deterministic order.
        let mut partial: Vec<(&String, &Vec<EntityId>)> = self
            .index
            .iter()
            .filter(|(label, _)| *label != &needle && label.contains(&needle))
            .collect();
        partial.sort_by(|a, b| a.0.cmp(b.0));
        for (_, ids) in partial {
            linked.extend(ids.iter().map(|id| (id.clone(), 0.5)));
        }

        // A mention that is already a KG id links to itself as a last resort.
        if linked.is_empty() && mention.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            linked.push((EntityId::new(mention), 0.1));
        }
        Ok(linked)
    }
}

/// Relation ranking by token overlap between the question and the
/// relation's own label edge in the snapshot. Unlabeled relations score
/// zero and keep their input order.
pub struct LexicalRanker<'a> {
    graph: &'a MemoryGraph,
    label_relation: RelationId,
}

impl<'a> LexicalRanker<'a> {
    pub fn new(graph: &'a MemoryGraph, label_relation: RelationId) -> Self {
        Self {
            graph,
            label_relation,
        }
    }

    fn label_of(&self, relation: &RelationId) -> Option<String> {
        // Relation ids appear as subjects of their own label edges.
        let subject = EntityId::new(relation.as_str());
        let labels = self
            .graph
            .objects(&EdgeQuery::forward(&subject).relation(&self.label_relation))
            .ok()?;
        labels.first().map(|l| normalize_literal(l).to_lowercase())
    }
}

impl RelationRanker for LexicalRanker<'_> {
    fn rank(&self, question: &str, candidates: &[RelationId]) -> Result<Vec<ScoredRelation>> {
        let question_tokens = tokenize(&question.to_lowercase());
        let mut scored: Vec<ScoredRelation> = candidates
            .iter()
            .map(|relation| {
                let score = match self.label_of(relation) {
                    Some(label) => {
                        let label_tokens = tokenize(&label);
                        if label_tokens.is_empty() {
                            0.0
                        } else {
                            let overlap = label_tokens
                                .iter()
                                .filter(|t| question_tokens.contains(*t))
                                .count();
                            overlap as f32 / label_tokens.len() as f32
                        }
                    }
                    None => 0.0,
                };
                ScoredRelation::new(relation.clone(), score)
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored)
    }

    fn resolve(&self, questions: &[String], candidates: &[Vec<Candidate>]) -> Result<Vec<String>> {
        Ok(questions
            .iter()
            .zip(candidates)
            .map(|(_, cands)| {
                cands
                    .first()
                    .map(|c| normalize_literal(&c.answer))
                    .unwrap_or_default()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopgraph_core::EdgeKind;

    fn labeled_graph() -> MemoryGraph {
        let mut g = MemoryGraph::new();
        g.add("Q90", "label", EdgeKind::Direct, "\"paris\"")
            .add("Q167646", "label", EdgeKind::Direct, "\"paris commune\"")
            .add("P36", "label", EdgeKind::Direct, "\"capital\"")
            .add("P17", "label", EdgeKind::Direct, "\"country\"");
        g
    }

    #[test]
    fn exact_label_match_outranks_partial() {
        let g = labeled_graph();
        let linker = LabelLinker::from_graph(&g, &RelationId::new("label"));
        let linked = linker.link("Paris").unwrap();
        assert_eq!(linked[0].0, EntityId::new("Q90"));
        assert!(linked[0].1 > linked[1].1);
        assert_eq!(linked[1].0, EntityId::new("Q167646"));
    }

    #[test]
    fn unknown_mention_that_looks_like_an_id_links_to_itself() {
        let g = labeled_graph();
        let linker = LabelLinker::from_graph(&g, &RelationId::new("label"));
        let linked = linker.link("Q42").unwrap();
        assert_eq!(linked, vec![(EntityId::new("Q42"), 0.1)]);
        assert!(linker.link("unheard-of place").unwrap().is_empty());
    }

    #[test]
    fn ranker_prefers_label_overlap() {
        let g = labeled_graph();
        let ranker = LexicalRanker::new(&g, RelationId::new("label"));
        let ranked = ranker
            .rank(
                "what is the capital of France?",
                &[RelationId::new("P17"), RelationId::new("P36")],
            )
            .unwrap();
        assert_eq!(ranked[0].relation, RelationId::new("P36"));
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn resolve_normalizes_literal_answers() {
        let g = labeled_graph();
        let ranker = LexicalRanker::new(&g, RelationId::new("label"));
        let answers = ranker
            .resolve(
                &["q".to_string(), "empty".to_string()],
                &[
                    vec![Candidate::one_hop(
                        RelationId::new("P571"),
                        "\"2001-01-01T00:00:00Z\"^^<http://www.w3.org/2001/XMLSchema#dateTime>",
                    )],
                    Vec::new(),
                ],
            )
            .unwrap();
        assert_eq!(answers, vec!["2001-01-01".to_string(), String::new()]);
    }
}
