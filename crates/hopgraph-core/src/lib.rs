//! Hopgraph core data model.
//!
//! Leaf types shared by the KG access layer and the query planner:
//! - opaque entity/relation identifiers,
//! - traversal direction and edge reification kind,
//! - the question-template taxonomy,
//! - ranked relations and candidate answer tuples,
//! - strict numeric-literal parsing and question text utilities.
//!
//! Everything here is plain data: construction and comparison only, no KG
//! access and no search state.

pub mod literal;
pub mod text;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use literal::{normalize_literal, parse_numeric_literal, NotNumeric, XSD_DECIMAL};

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque KG entity identifier (e.g. `Q42`, or a literal endpoint).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque KG property identifier (e.g. `P54`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationId(String);

impl RelationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Traversal geometry
// ============================================================================

/// Traversal direction relative to the subject of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Subject is the triple's subject: `(subject, rel, ?)`.
    Forward,
    /// Subject is the triple's object: `(?, rel, subject)`.
    Backward,
}

impl Direction {
    /// Parse the wire marker used by template files (`forw` / `backw`).
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "forw" => Some(Direction::Forward),
            "backw" => Some(Direction::Backward),
            _ => None,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Direction::Forward => "forw",
            Direction::Backward => "backw",
        }
    }
}

/// Reification kind of a KG edge.
///
/// `Direct` edges connect subject and object with no intermediate node.
/// A `Statement` edge points at (or out of) a reified claim node, which may
/// itself carry secondary `Qualifier` edges refining the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Direct,
    Statement,
    Qualifier,
}

// ============================================================================
// Question templates
// ============================================================================

/// Question-shape category. Each template selects one search strategy and a
/// fixed candidate arity; the numeric wire codes (0–7) come from the upstream
/// template classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Template {
    /// Numeric constraint on a qualifier; answers come from the statement
    /// position of the same relation.
    NumberInQualifier,
    /// Numeric constraint on the statement value; answers come from the
    /// qualifier triples of the claim node.
    NumberInStatement,
    /// Second entity joined through a statement edge of the claim node.
    EntityInStatement,
    /// Second entity joined through a qualifier edge of the claim node.
    EntityInQualifier,
    /// Cardinality of a reachable object set.
    Count,
    /// Superlative over one entity's class members.
    SuperlativeOneEntity,
    /// Superlative over the join of two entities' class members.
    SuperlativeTwoEntities,
    /// Generic one/two-hop search (default and fallback target).
    TwoHop,
}

impl Template {
    /// Parse a wire template code. Accepts a bare digit and tolerates longer
    /// classifier outputs by reading the leading digit only.
    pub fn from_code(code: &str) -> Option<Self> {
        let digit = code.trim().chars().next()?;
        match digit {
            '0' => Some(Template::NumberInQualifier),
            '1' => Some(Template::NumberInStatement),
            '2' => Some(Template::EntityInStatement),
            '3' => Some(Template::EntityInQualifier),
            '4' => Some(Template::Count),
            '5' => Some(Template::SuperlativeOneEntity),
            '6' => Some(Template::SuperlativeTwoEntities),
            '7' => Some(Template::TwoHop),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Template::NumberInQualifier => 0,
            Template::NumberInStatement => 1,
            Template::EntityInStatement => 2,
            Template::EntityInQualifier => 3,
            Template::Count => 4,
            Template::SuperlativeOneEntity => 5,
            Template::SuperlativeTwoEntities => 6,
            Template::TwoHop => 7,
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

// ============================================================================
// Ranking and candidates
// ============================================================================

/// One relation with its question-relevance score, as produced by the ranker
/// (relevance-descending order within a ranked list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRelation {
    pub relation: RelationId,
    pub score: f32,
}

impl ScoredRelation {
    pub fn new(relation: impl Into<RelationId>, score: f32) -> Self {
        Self {
            relation: relation.into(),
            score,
        }
    }
}

/// A candidate answer subgraph: the relation chain that reached the answer
/// (one to three relation ids, in traversal order) followed by the resolved
/// answer or value.
///
/// Candidates are immutable once produced and carry no reference back to the
/// search that found them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub relations: Vec<RelationId>,
    pub answer: String,
}

impl Candidate {
    pub fn one_hop(relation: RelationId, answer: impl Into<String>) -> Self {
        Self {
            relations: vec![relation],
            answer: answer.into(),
        }
    }

    pub fn two_hop(first: RelationId, second: RelationId, answer: impl Into<String>) -> Self {
        Self {
            relations: vec![first, second],
            answer: answer.into(),
        }
    }

    /// Number of tuple elements when rendered: relations plus the answer.
    pub fn arity(&self) -> usize {
        self.relations.len() + 1
    }

    /// Render as the flat ordered tuple the pipeline's downstream consumers
    /// expect, e.g. `(P54, P580, S1)`.
    pub fn as_tuple(&self) -> Vec<&str> {
        self.relations
            .iter()
            .map(RelationId::as_str)
            .chain(std::iter::once(self.answer.as_str()))
            .collect()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.as_tuple().join(", "))
    }
}
