//! Knowledge-graph access seam.
//!
//! The planner never talks to a storage engine directly; it issues
//! [`EdgeQuery`] lookups through the [`KnowledgeGraph`] trait and consumes
//! one of three projections of the matching edges: relation ids, far
//! endpoints, or full triples.
//!
//! Contract: absence is an empty `Vec`, never an error. An `Err` means the
//! backend itself failed (I/O, remote endpoint down), which aborts the
//! current question upstream.
//!
//! [`MemoryGraph`] is the reference backend: an in-memory edge list with
//! subject- and object-keyed adjacency indexes, loadable from a JSON
//! snapshot. It preserves insertion order, so fixtures and CLI runs are
//! deterministic.

use ahash::AHashMap;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use hopgraph_core::{Direction, EdgeKind, EntityId, RelationId};

// ============================================================================
// Edge queries
// ============================================================================

/// One KG lookup: a subject, a traversal direction, and optional constraints.
///
/// The "far endpoint" is the entity or literal on the other side of the edge
/// from the subject; both the `object` equality filter and the
/// `value_contains` substring filter apply to it.
#[derive(Debug, Clone)]
pub struct EdgeQuery<'a> {
    pub subject: &'a EntityId,
    pub direction: Direction,
    pub relation: Option<&'a RelationId>,
    pub object: Option<&'a str>,
    pub kind: Option<EdgeKind>,
    pub value_contains: Option<&'a str>,
}

impl<'a> EdgeQuery<'a> {
    pub fn new(subject: &'a EntityId, direction: Direction) -> Self {
        Self {
            subject,
            direction,
            relation: None,
            object: None,
            kind: None,
            value_contains: None,
        }
    }

    pub fn forward(subject: &'a EntityId) -> Self {
        Self::new(subject, Direction::Forward)
    }

    pub fn backward(subject: &'a EntityId) -> Self {
        Self::new(subject, Direction::Backward)
    }

    pub fn relation(mut self, relation: &'a RelationId) -> Self {
        self.relation = Some(relation);
        self
    }

    pub fn object(mut self, object: &'a str) -> Self {
        self.object = Some(object);
        self
    }

    pub fn kind(mut self, kind: EdgeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn value_contains(mut self, needle: &'a str) -> Self {
        self.value_contains = Some(needle);
        self
    }
}

/// One stored edge. `object` is a `String` rather than an [`EntityId`]
/// because the far endpoint may be a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: EntityId,
    pub relation: RelationId,
    pub kind: EdgeKind,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<EntityId>,
        relation: impl Into<RelationId>,
        kind: EdgeKind,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            kind,
            object: object.into(),
        }
    }
}

// ============================================================================
// Access trait
// ============================================================================

/// The backend seam. Implementations must return matches in a stable order
/// and an empty `Vec` when nothing matches.
pub trait KnowledgeGraph {
    /// Distinct relation ids of the matching edges, first-seen order.
    fn relations(&self, query: &EdgeQuery) -> Result<Vec<RelationId>>;

    /// Far endpoints of the matching edges (entities or literals).
    fn objects(&self, query: &EdgeQuery) -> Result<Vec<String>>;

    /// The matching edges themselves.
    fn triples(&self, query: &EdgeQuery) -> Result<Vec<Triple>>;
}

impl<T: KnowledgeGraph + ?Sized> KnowledgeGraph for &T {
    fn relations(&self, query: &EdgeQuery) -> Result<Vec<RelationId>> {
        (**self).relations(query)
    }

    fn objects(&self, query: &EdgeQuery) -> Result<Vec<String>> {
        (**self).objects(query)
    }

    fn triples(&self, query: &EdgeQuery) -> Result<Vec<Triple>> {
        (**self).triples(query)
    }
}

// ============================================================================
// In-memory reference store
// ============================================================================

/// In-memory triple store with subject and object adjacency indexes.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    edges: Vec<Triple>,
    by_subject: AHashMap<String, Vec<usize>>,
    by_object: AHashMap<String, Vec<usize>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut graph = Self::new();
        for triple in triples {
            graph.insert(triple);
        }
        graph
    }

    pub fn insert(&mut self, triple: Triple) {
        let idx = self.edges.len();
        self.by_subject
            .entry(triple.subject.as_str().to_string())
            .or_default()
            .push(idx);
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .push(idx);
        self.edges.push(triple);
    }

    /// Convenience for fixtures: insert `(subject, relation, kind, object)`.
    pub fn add(
        &mut self,
        subject: &str,
        relation: &str,
        kind: EdgeKind,
        object: &str,
    ) -> &mut Self {
        self.insert(Triple::new(subject, relation, kind, object));
        self
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Triple] {
        &self.edges
    }

    /// Number of distinct subject nodes.
    pub fn subject_count(&self) -> usize {
        self.by_subject.len()
    }

    /// Edge counts per reification kind: (direct, statement, qualifier).
    pub fn kind_counts(&self) -> (usize, usize, usize) {
        let mut counts = (0usize, 0usize, 0usize);
        for edge in &self.edges {
            match edge.kind {
                EdgeKind::Direct => counts.0 += 1,
                EdgeKind::Statement => counts.1 += 1,
                EdgeKind::Qualifier => counts.2 += 1,
            }
        }
        counts
    }

    /// Load a snapshot: a JSON array of triple records.
    pub fn load_json(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open graph snapshot {}", path.display()))?;
        Self::read_json(file)
    }

    pub fn read_json(reader: impl Read) -> Result<Self> {
        let triples: Vec<Triple> =
            serde_json::from_reader(reader).context("parse graph snapshot JSON")?;
        Ok(Self::from_triples(triples))
    }

    fn candidate_indexes(&self, query: &EdgeQuery) -> &[usize] {
        let key = query.subject.as_str();
        let index = match query.direction {
            Direction::Forward => self.by_subject.get(key),
            Direction::Backward => self.by_object.get(key),
        };
        index.map(Vec::as_slice).unwrap_or(&[])
    }

    fn matching(&self, query: &EdgeQuery) -> Vec<&Triple> {
        self.candidate_indexes(query)
            .iter()
            .map(|&idx| &self.edges[idx])
            .filter(|edge| {
                if let Some(rel) = query.relation {
                    if &edge.relation != rel {
                        return false;
                    }
                }
                if let Some(kind) = query.kind {
                    if edge.kind != kind {
                        return false;
                    }
                }
                let far = far_endpoint(edge, query.direction);
                if let Some(object) = query.object {
                    if far != object {
                        return false;
                    }
                }
                if let Some(needle) = query.value_contains {
                    if !far.contains(needle) {
                        return false;
                    }
                }
                true
            })
            .collect()
    }
}

fn far_endpoint(edge: &Triple, direction: Direction) -> &str {
    match direction {
        Direction::Forward => &edge.object,
        Direction::Backward => edge.subject.as_str(),
    }
}

impl KnowledgeGraph for MemoryGraph {
    fn relations(&self, query: &EdgeQuery) -> Result<Vec<RelationId>> {
        let mut seen: Vec<RelationId> = Vec::new();
        for edge in self.matching(query) {
            if !seen.contains(&edge.relation) {
                seen.push(edge.relation.clone());
            }
        }
        Ok(seen)
    }

    fn objects(&self, query: &EdgeQuery) -> Result<Vec<String>> {
        Ok(self
            .matching(query)
            .into_iter()
            .map(|edge| far_endpoint(edge, query.direction).to_string())
            .collect())
    }

    fn triples(&self, query: &EdgeQuery) -> Result<Vec<Triple>> {
        Ok(self.matching(query).into_iter().cloned().collect())
    }
}
