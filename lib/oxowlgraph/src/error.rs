//! Error types for the graph-backed ontology model.

use crate::view::Interface;
use oxrdf::Term;
use std::error::Error;

/// An error raised by the underlying triple storage.
///
/// The in-memory [`UnionGraph`](crate::UnionGraph) never produces one; the type exists so that
/// fallible backends can propagate their failures unchanged through every layer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    /// The triple could not be written because its subject is not a valid RDF subject.
    #[error("{0} can not be used as the subject of a triple")]
    InvalidSubject(Term),
    /// Storage specific failure.
    #[error("{0}")]
    Storage(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl GraphError {
    /// Wraps a backend specific error.
    pub fn storage(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Storage(error.into())
    }
}

/// A node can not be seen or created under the requested interface.
///
/// This is an expected outcome: callers either test
/// [`can_view`](crate::Ontology::can_view) first or treat the refusal as a normal branch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ViewError {
    /// The node does not satisfy the interface filter.
    #[error("{node} is not compatible with {interface}")]
    Incompatible { node: Term, interface: Interface },
    /// The interface has no maker, nodes can only be viewed, not created.
    #[error("{interface} instances can not be created directly")]
    NoMaker { interface: Interface },
    /// The personality in use has no factory for the interface.
    #[error("the personality does not support {interface}")]
    Unsupported { interface: Interface },
}

impl ViewError {
    /// Creates an incompatible node error.
    pub fn incompatible(node: impl Into<Term>, interface: Interface) -> Self {
        Self::Incompatible {
            node: node.into(),
            interface,
        }
    }

    /// Returns the interface the node was requested as.
    pub fn interface(&self) -> Interface {
        match self {
            Self::Incompatible { interface, .. }
            | Self::NoMaker { interface }
            | Self::Unsupported { interface } => *interface,
        }
    }
}

/// A maker refused to create a node. The graph is left untouched.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MakeError {
    /// The node already exists under a role that can not coexist with the requested one.
    #[error("{node} already exists as {existing}, it can not also be declared as {interface}")]
    IncompatibleRole {
        node: Term,
        interface: Interface,
        existing: Interface,
    },
    /// The node kind (IRI, blank node, literal) is not allowed for this interface.
    #[error("{node} has the wrong node kind for {interface}: {message}")]
    WrongNodeKind {
        node: Term,
        interface: Interface,
        message: String,
    },
    /// The node belongs to the reserved built-in vocabulary.
    #[error("{node} is a built-in vocabulary term and can not be redeclared as {interface}")]
    Builtin { node: Term, interface: Interface },
    /// Error from the storage layer.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl MakeError {
    /// Creates a wrong node kind error.
    pub fn wrong_node_kind(
        node: impl Into<Term>,
        interface: Interface,
        message: impl Into<String>,
    ) -> Self {
        Self::WrongNodeKind {
            node: node.into(),
            interface,
            message: message.into(),
        }
    }
}

/// Invariant violations detected while writing or reading axioms.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AxiomError {
    /// The written footprint does not read back as the same axiom, usually because an entity
    /// is used in a role the graph does not support (e.g. an undeclared property).
    #[error("the graph does not support {axiom}: {message}")]
    RoleMismatch { axiom: String, message: String },
    /// The axiom value itself is not well formed (e.g. an empty operand list).
    #[error("malformed axiom {axiom}: {message}")]
    Malformed { axiom: String, message: String },
    /// An RDF list is cyclic, truncated or too long.
    #[error("malformed RDF list starting at {head}: {message}")]
    MalformedList { head: Term, message: String },
}

impl AxiomError {
    /// Creates a role mismatch error.
    pub fn role_mismatch(axiom: impl ToString, message: impl Into<String>) -> Self {
        Self::RoleMismatch {
            axiom: axiom.to_string(),
            message: message.into(),
        }
    }

    /// Creates a malformed axiom error.
    pub fn malformed(axiom: impl ToString, message: impl Into<String>) -> Self {
        Self::Malformed {
            axiom: axiom.to_string(),
            message: message.into(),
        }
    }

    /// Creates a malformed list error.
    pub fn malformed_list(head: impl Into<Term>, message: impl Into<String>) -> Self {
        Self::MalformedList {
            head: head.into(),
            message: message.into(),
        }
    }
}

/// Main error type of the ontology model.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OntologyError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error(transparent)]
    Make(#[from] MakeError),
    #[error(transparent)]
    Axiom(#[from] AxiomError),
}
