//! Subject-predicate-object facts and their graph-labelled quad form.

pub mod rdf;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Graph labels used to bucket facts by origin.
pub mod graph {
    pub const CODE_STRUCTURE: &str = "code_structure";
    pub const INHERITANCE: &str = "inheritance";
    pub const DEPENDENCIES: &str = "dependencies";
    pub const CALL_GRAPH: &str = "call_graph";
    pub const DEPENDENCY_GRAPH: &str = "dependency_graph";
    pub const PROJECT_STRUCTURE: &str = "project_structure";
    pub const CONCEPT_GRAPH: &str = "concept_graph";
    pub const SYMBOL_REFERENCES: &str = "symbol_references";
    pub const DEFAULT: &str = "default";
}

/// Relationship name of a fact. The vocabulary is open: anything outside the
/// known set round-trips through `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Predicate {
    IsA,
    DefinedIn,
    LocatedAt,
    References,
    ReferencedBy,
    DependsOn,
    PartOf,
    RelatedTo,
    HasParameter,
    InheritsFrom,
    Imports,
    ImportsFrom,
    AssignedIn,
    Calls,
    Custom(String),
}

impl Predicate {
    pub fn as_str(&self) -> &str {
        match self {
            Predicate::IsA => "is_a",
            Predicate::DefinedIn => "defined_in",
            Predicate::LocatedAt => "located_at",
            Predicate::References => "references",
            Predicate::ReferencedBy => "referenced_by",
            Predicate::DependsOn => "depends_on",
            Predicate::PartOf => "part_of",
            Predicate::RelatedTo => "related_to",
            Predicate::HasParameter => "has_parameter",
            Predicate::InheritsFrom => "inherits_from",
            Predicate::Imports => "imports",
            Predicate::ImportsFrom => "imports_from",
            Predicate::AssignedIn => "assigned_in",
            Predicate::Calls => "calls",
            Predicate::Custom(name) => name,
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Predicate::from(name.into())
    }
}

impl From<String> for Predicate {
    fn from(value: String) -> Self {
        match value.as_str() {
            "is_a" => Predicate::IsA,
            "defined_in" => Predicate::DefinedIn,
            "located_at" => Predicate::LocatedAt,
            "references" => Predicate::References,
            "referenced_by" => Predicate::ReferencedBy,
            "depends_on" => Predicate::DependsOn,
            "part_of" => Predicate::PartOf,
            "related_to" => Predicate::RelatedTo,
            "has_parameter" => Predicate::HasParameter,
            "inherits_from" => Predicate::InheritsFrom,
            "imports" => Predicate::Imports,
            "imports_from" => Predicate::ImportsFrom,
            "assigned_in" => Predicate::AssignedIn,
            "calls" => Predicate::Calls,
            _ => Predicate::Custom(value),
        }
    }
}

impl From<Predicate> for String {
    fn from(value: Predicate) -> Self {
        match value {
            Predicate::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted relationship ("triple"). `context` records where the fact
/// came from; `graph` is the bucket it is reported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub subject: String,
    pub predicate: Predicate,
    pub object: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub graph: String,
}

impl Fact {
    pub fn new(
        subject: impl Into<String>,
        predicate: Predicate,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
            context: String::new(),
            graph: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn in_graph(mut self, graph: impl Into<String>) -> Self {
        self.graph = graph.into();
        self
    }

    /// Copy into quad form. An empty graph is relabelled `default`.
    pub fn to_quad(&self) -> Quad {
        Quad {
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            object: self.object.clone(),
            graph: if self.graph.is_empty() {
                graph::DEFAULT.to_string()
            } else {
                self.graph.clone()
            },
            context: self.context.clone(),
        }
    }
}

/// A fact with an explicit, always non-empty graph label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quad {
    pub subject: String,
    pub predicate: Predicate,
    pub object: String,
    pub graph: String,
    #[serde(default)]
    pub context: String,
}

impl Quad {
    pub fn new(
        subject: impl Into<String>,
        predicate: Predicate,
        object: impl Into<String>,
        graph: impl Into<String>,
    ) -> Self {
        let graph = graph.into();
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
            graph: if graph.is_empty() {
                graph::DEFAULT.to_string()
            } else {
                graph
            },
            context: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

pub fn to_quads(facts: &[Fact]) -> Vec<Quad> {
    facts.iter().map(Fact::to_quad).collect()
}

/// Anything that carries a graph label, so facts and quads group the same way.
pub trait Labelled {
    fn graph_label(&self) -> &str;
}

impl Labelled for Fact {
    fn graph_label(&self) -> &str {
        if self.graph.is_empty() {
            graph::DEFAULT
        } else {
            &self.graph
        }
    }
}

impl Labelled for Quad {
    fn graph_label(&self) -> &str {
        &self.graph
    }
}

/// Group items by graph label, keeping groups in order of first appearance.
pub fn group_by_graph<T: Labelled + Clone>(items: &[T]) -> IndexMap<String, Vec<T>> {
    let mut groups: IndexMap<String, Vec<T>> = IndexMap::new();
    for item in items {
        groups
            .entry(item.graph_label().to_string())
            .or_default()
            .push(item.clone());
    }
    groups
}
