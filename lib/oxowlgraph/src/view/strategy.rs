//! The three strategies a view factory is assembled from.

use crate::classifier::Classifier;
use crate::error::MakeError;
use crate::graph::{to_subject, UnionGraph};
use crate::view::Interface;
use crate::vocab::{is_reserved, owl, BuiltinVocabulary};
use oxrdf::vocab::rdf;
use oxrdf::{NamedNodeRef, NamedOrBlankNodeRef, Term, TermRef, TripleRef};
use rustc_hash::FxHashSet;

/// Lists the candidate nodes of an interface.
///
/// Finders may over-approximate: every candidate still goes through the factory [`Filter`].
pub trait Finder: Send + Sync {
    fn find(&self, graph: &UnionGraph) -> Vec<Term>;
}

/// Decides if a node is admitted under an interface.
///
/// Closures with the same signature are filters too.
pub trait Filter: Send + Sync {
    fn accepts(&self, node: TermRef<'_>, graph: &UnionGraph, classifier: &Classifier<'_>) -> bool;
}

impl<F: Fn(TermRef<'_>, &UnionGraph, &Classifier<'_>) -> bool + Send + Sync> Filter for F {
    fn accepts(&self, node: TermRef<'_>, graph: &UnionGraph, classifier: &Classifier<'_>) -> bool {
        self(node, graph, classifier)
    }
}

/// Turns a node into an instance of an interface with a minimal graph mutation.
pub trait Maker: Send + Sync {
    /// Checks the node can be made an instance without touching the graph.
    fn precondition(
        &self,
        node: TermRef<'_>,
        graph: &UnionGraph,
        classifier: &Classifier<'_>,
    ) -> Result<(), MakeError>;

    /// Writes the triples making the node an instance. Only called after a successful
    /// [`precondition`](Self::precondition).
    fn make(&self, node: TermRef<'_>, graph: &mut UnionGraph) -> Result<(), MakeError>;
}

/// Subjects of `rdf:type` triples with the given class.
#[derive(Debug, Clone, Copy)]
pub struct TypedNodes(pub NamedNodeRef<'static>);

impl Finder for TypedNodes {
    fn find(&self, graph: &UnionGraph) -> Vec<Term> {
        graph
            .subjects(rdf::TYPE, self.0.into())
            .into_iter()
            .map(Term::from)
            .collect()
    }
}

/// Subjects of the given predicate.
#[derive(Debug, Clone, Copy)]
pub struct SubjectsOf(pub NamedNodeRef<'static>);

impl Finder for SubjectsOf {
    fn find(&self, graph: &UnionGraph) -> Vec<Term> {
        graph
            .find(None, Some(self.0), None)
            .into_iter()
            .map(|t| t.subject.into())
            .collect()
    }
}

/// Objects of the given predicate.
#[derive(Debug, Clone, Copy)]
pub struct ObjectsOf(pub NamedNodeRef<'static>);

impl Finder for ObjectsOf {
    fn find(&self, graph: &UnionGraph) -> Vec<Term> {
        graph
            .find(None, Some(self.0), None)
            .into_iter()
            .map(|t| t.object)
            .collect()
    }
}

/// Every predicate in use.
#[derive(Debug, Clone, Copy)]
pub struct Predicates;

impl Finder for Predicates {
    fn find(&self, graph: &UnionGraph) -> Vec<Term> {
        graph.iter().map(|t| t.predicate.into()).collect()
    }
}

/// Every subject and non literal object.
#[derive(Debug, Clone, Copy)]
pub struct AllNodes;

impl Finder for AllNodes {
    fn find(&self, graph: &UnionGraph) -> Vec<Term> {
        graph
            .iter()
            .flat_map(|t| [Term::from(t.subject), t.object])
            .filter(|n| !n.is_literal())
            .collect()
    }
}

/// The union of several finders.
#[derive(Default)]
pub struct UnionFinder(Vec<Box<dyn Finder>>);

impl UnionFinder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, finder: impl Finder + 'static) -> Self {
        self.0.push(Box::new(finder));
        self
    }
}

impl Finder for UnionFinder {
    fn find(&self, graph: &UnionGraph) -> Vec<Term> {
        let mut seen = FxHashSet::default();
        self.0
            .iter()
            .flat_map(|f| f.find(graph))
            .filter(|n| seen.insert(n.clone()))
            .collect()
    }
}

pub trait FinderExt: Finder + Sized + 'static {
    /// Candidates of both finders.
    fn union(self, other: impl Finder + 'static) -> UnionFinder {
        UnionFinder::new().with(self).with(other)
    }
}

impl<F: Finder + 'static> FinderExt for F {}

pub struct And<A, B>(A, B);

impl<A: Filter, B: Filter> Filter for And<A, B> {
    fn accepts(&self, node: TermRef<'_>, graph: &UnionGraph, classifier: &Classifier<'_>) -> bool {
        self.0.accepts(node, graph, classifier) && self.1.accepts(node, graph, classifier)
    }
}

pub struct Or<A, B>(A, B);

impl<A: Filter, B: Filter> Filter for Or<A, B> {
    fn accepts(&self, node: TermRef<'_>, graph: &UnionGraph, classifier: &Classifier<'_>) -> bool {
        self.0.accepts(node, graph, classifier) || self.1.accepts(node, graph, classifier)
    }
}

pub struct Not<A>(A);

impl<A: Filter> Filter for Not<A> {
    fn accepts(&self, node: TermRef<'_>, graph: &UnionGraph, classifier: &Classifier<'_>) -> bool {
        !self.0.accepts(node, graph, classifier)
    }
}

/// Nodes with at least one value for the given predicate.
#[derive(Debug, Clone, Copy)]
pub struct HasProperty(pub NamedNodeRef<'static>);

impl Filter for HasProperty {
    fn accepts(&self, node: TermRef<'_>, graph: &UnionGraph, _: &Classifier<'_>) -> bool {
        to_subject(node).is_some_and(|s| graph.has_property(s, self.0))
    }
}

/// Boolean combinators for filters.
pub trait FilterExt: Filter + Sized {
    fn and<B: Filter>(self, other: B) -> And<Self, B> {
        And(self, other)
    }

    fn or<B: Filter>(self, other: B) -> Or<Self, B> {
        Or(self, other)
    }

    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<F: Filter> FilterExt for F {}

/// Declares an IRI as an entity by writing `iri rdf:type declaration`.
///
/// Refuses blank nodes and literals, the reserved vocabulary, and IRIs already declared with an
/// incompatible role: classes and datatypes exclude each other, and so do the three property
/// kinds. Punning across other roles is allowed.
#[derive(Debug, Clone, Copy)]
pub struct EntityMaker {
    interface: Interface,
    declaration: NamedNodeRef<'static>,
}

/// Declarations that can not share an IRI.
const INCOMPATIBLE: [(NamedNodeRef<'static>, NamedNodeRef<'static>, Interface); 8] = [
    (owl::CLASS, oxrdf::vocab::rdfs::DATATYPE, Interface::Datatype),
    (oxrdf::vocab::rdfs::DATATYPE, owl::CLASS, Interface::Class),
    (owl::OBJECT_PROPERTY, owl::DATATYPE_PROPERTY, Interface::DataProperty),
    (owl::OBJECT_PROPERTY, owl::ANNOTATION_PROPERTY, Interface::AnnotationProperty),
    (owl::DATATYPE_PROPERTY, owl::OBJECT_PROPERTY, Interface::ObjectProperty),
    (owl::DATATYPE_PROPERTY, owl::ANNOTATION_PROPERTY, Interface::AnnotationProperty),
    (owl::ANNOTATION_PROPERTY, owl::OBJECT_PROPERTY, Interface::ObjectProperty),
    (owl::ANNOTATION_PROPERTY, owl::DATATYPE_PROPERTY, Interface::DataProperty),
];

impl EntityMaker {
    pub fn new(interface: Interface, declaration: NamedNodeRef<'static>) -> Self {
        Self {
            interface,
            declaration,
        }
    }
}

impl Maker for EntityMaker {
    fn precondition(
        &self,
        node: TermRef<'_>,
        graph: &UnionGraph,
        _: &Classifier<'_>,
    ) -> Result<(), MakeError> {
        let TermRef::NamedNode(iri) = node else {
            return Err(MakeError::wrong_node_kind(
                node.into_owned(),
                self.interface,
                "entities are named by IRIs",
            ));
        };
        if is_reserved(iri) || BuiltinVocabulary::owl2().is_builtin(node) {
            return Err(MakeError::Builtin {
                node: node.into_owned(),
                interface: self.interface,
            });
        }
        let subject = NamedOrBlankNodeRef::from(iri);
        for (declaration, conflicting, existing) in INCOMPATIBLE {
            if declaration == self.declaration && graph.has_type(subject, conflicting) {
                return Err(MakeError::IncompatibleRole {
                    node: node.into_owned(),
                    interface: self.interface,
                    existing,
                });
            }
        }
        Ok(())
    }

    fn make(&self, node: TermRef<'_>, graph: &mut UnionGraph) -> Result<(), MakeError> {
        let TermRef::NamedNode(iri) = node else {
            return Err(MakeError::wrong_node_kind(
                node.into_owned(),
                self.interface,
                "entities are named by IRIs",
            ));
        };
        graph.insert(TripleRef::new(iri, rdf::TYPE, self.declaration))?;
        Ok(())
    }
}

/// Makes a blank node an anonymous individual by typing it `owl:Thing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIndividualMaker;

impl Maker for AnonymousIndividualMaker {
    fn precondition(
        &self,
        node: TermRef<'_>,
        _: &UnionGraph,
        classifier: &Classifier<'_>,
    ) -> Result<(), MakeError> {
        if !node.is_blank_node() {
            return Err(MakeError::wrong_node_kind(
                node.into_owned(),
                Interface::AnonymousIndividual,
                "anonymous individuals are blank nodes",
            ));
        }
        if classifier.is_class(node) {
            return Err(MakeError::IncompatibleRole {
                node: node.into_owned(),
                interface: Interface::AnonymousIndividual,
                existing: Interface::ClassExpression,
            });
        }
        Ok(())
    }

    fn make(&self, node: TermRef<'_>, graph: &mut UnionGraph) -> Result<(), MakeError> {
        let TermRef::BlankNode(b) = node else {
            return Err(MakeError::wrong_node_kind(
                node.into_owned(),
                Interface::AnonymousIndividual,
                "anonymous individuals are blank nodes",
            ));
        };
        graph.insert(TripleRef::new(b, rdf::TYPE, owl::THING))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal, NamedNode, Triple};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    #[test]
    fn test_filter_combinators() {
        let graph = UnionGraph::new();
        let classifier = Classifier::new(&graph);
        let named = |n: TermRef<'_>, _: &UnionGraph, _: &Classifier<'_>| n.is_named_node();
        let blank = |n: TermRef<'_>, _: &UnionGraph, _: &Classifier<'_>| n.is_blank_node();
        let iri = ex("a");
        let node = iri.as_ref().into();
        assert!(named.or(blank).accepts(node, &graph, &classifier));
        assert!(!named.and(blank).accepts(node, &graph, &classifier));
        assert!(blank.not().accepts(node, &graph, &classifier));
    }

    #[test]
    fn test_union_finder_deduplicates() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("A"), rdf::TYPE, owl::CLASS))
            .unwrap();
        graph
            .insert(&Triple::new(ex("A"), oxrdf::vocab::rdfs::SUB_CLASS_OF, ex("B")))
            .unwrap();
        let finder = TypedNodes(owl::CLASS)
            .union(SubjectsOf(oxrdf::vocab::rdfs::SUB_CLASS_OF))
            .with(ObjectsOf(oxrdf::vocab::rdfs::SUB_CLASS_OF));
        assert_eq!(finder.find(&graph), vec![ex("A").into(), ex("B").into()]);
    }

    #[test]
    fn test_entity_maker_preconditions() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("p"), rdf::TYPE, owl::DATATYPE_PROPERTY))
            .unwrap();
        let classifier = Classifier::new(&graph);
        let maker = EntityMaker::new(Interface::ObjectProperty, owl::OBJECT_PROPERTY);
        assert!(matches!(
            maker.precondition(ex("p").as_ref().into(), &graph, &classifier),
            Err(MakeError::IncompatibleRole {
                existing: Interface::DataProperty,
                ..
            })
        ));
        assert!(matches!(
            maker.precondition(owl::TOP_OBJECT_PROPERTY.into(), &graph, &classifier),
            Err(MakeError::Builtin { .. })
        ));
        assert!(matches!(
            maker.precondition(Literal::from("p").as_ref().into(), &graph, &classifier),
            Err(MakeError::WrongNodeKind { .. })
        ));
        assert!(maker
            .precondition(ex("q").as_ref().into(), &graph, &classifier)
            .is_ok());
    }

    #[test]
    fn test_anonymous_individual_maker() {
        let mut graph = UnionGraph::new();
        let b = BlankNode::default();
        let classifier = Classifier::new(&graph);
        assert!(AnonymousIndividualMaker
            .precondition(b.as_ref().into(), &graph, &classifier)
            .is_ok());
        assert!(AnonymousIndividualMaker
            .precondition(ex("a").as_ref().into(), &graph, &classifier)
            .is_err());
        AnonymousIndividualMaker
            .make(b.as_ref().into(), &mut graph)
            .unwrap();
        assert!(graph.contains(&Triple::new(b, rdf::TYPE, owl::THING)));
    }
}
