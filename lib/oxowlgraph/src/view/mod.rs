//! Typed views over graph nodes.
//!
//! A node is not converted into an object: it is *viewed* under an [`Interface`]. A [`View`] is
//! just the node, the graph it lives in and a zero-sized marker type, so the same node can be
//! seen as a class, an individual and an annotation subject at the same time (punning).
//!
//! Which nodes are admitted under which interface is decided by the factories of a
//! [`Personality`], built from [`Finder`], [`Filter`] and [`Maker`] strategies.

mod factory;
mod personality;
mod strategy;

pub use factory::{CommonFactory, MultiFactory, ViewFactory};
pub use personality::{Personality, PersonalityBuilder};
pub use strategy::{
    AllNodes, And, AnonymousIndividualMaker, EntityMaker, Filter, FilterExt, Finder, FinderExt,
    HasProperty, Maker, Not, ObjectsOf, Or, Predicates, SubjectsOf, TypedNodes, UnionFinder,
};

use crate::error::AxiomError;
use crate::graph::{to_subject, UnionGraph};
use crate::vocab::{is_reserved, owl, BuiltinVocabulary};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{NamedNode, NamedNodeRef, Term, TermRef};
use std::fmt;
use std::marker::PhantomData;

/// The ways a node can be looked at.
///
/// Leaf interfaces have a factory of their own. Composite interfaces accept whatever one of
/// their [`components`](Self::components) accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Interface {
    Class,
    Datatype,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    NamedIndividual,
    AnonymousIndividual,
    /// An `owl:Restriction` blank node.
    Restriction,
    UnionOf,
    IntersectionOf,
    ComplementOf,
    OneOf,
    /// A blank node with `owl:inverseOf`.
    InverseObjectProperty,
    /// An anonymous data range (datatype restriction, data combination or enumeration).
    DataRangeExpression,
    ClassExpression,
    ObjectPropertyExpression,
    PropertyExpression,
    DataRange,
    Individual,
    Entity,
}

impl Interface {
    pub const ALL: [Self; 20] = [
        Self::Class,
        Self::Datatype,
        Self::ObjectProperty,
        Self::DataProperty,
        Self::AnnotationProperty,
        Self::NamedIndividual,
        Self::AnonymousIndividual,
        Self::Restriction,
        Self::UnionOf,
        Self::IntersectionOf,
        Self::ComplementOf,
        Self::OneOf,
        Self::InverseObjectProperty,
        Self::DataRangeExpression,
        Self::ClassExpression,
        Self::ObjectPropertyExpression,
        Self::PropertyExpression,
        Self::DataRange,
        Self::Individual,
        Self::Entity,
    ];

    /// The leaf interfaces a composite interface is made of, empty for leaves.
    pub fn components(self) -> &'static [Self] {
        match self {
            Self::ClassExpression => &[
                Self::Class,
                Self::Restriction,
                Self::UnionOf,
                Self::IntersectionOf,
                Self::ComplementOf,
                Self::OneOf,
            ],
            Self::ObjectPropertyExpression => {
                &[Self::ObjectProperty, Self::InverseObjectProperty]
            }
            Self::PropertyExpression => &[
                Self::ObjectProperty,
                Self::InverseObjectProperty,
                Self::DataProperty,
                Self::AnnotationProperty,
            ],
            Self::DataRange => &[Self::Datatype, Self::DataRangeExpression],
            Self::Individual => &[Self::NamedIndividual, Self::AnonymousIndividual],
            Self::Entity => &[
                Self::Class,
                Self::Datatype,
                Self::ObjectProperty,
                Self::DataProperty,
                Self::AnnotationProperty,
                Self::NamedIndividual,
            ],
            _ => &[],
        }
    }

    pub fn is_composite(self) -> bool {
        !self.components().is_empty()
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Marker types selecting the interface of a [`View`].
pub trait ViewKind {
    const INTERFACE: Interface;
}

/// One uninhabited marker type per [`Interface`].
pub mod kind {
    use super::{Interface, ViewKind};

    macro_rules! view_kinds {
        ($($name:ident),* $(,)?) => {
            $(
                #[derive(Debug, Clone, Copy, PartialEq, Eq)]
                pub enum $name {}

                impl ViewKind for $name {
                    const INTERFACE: Interface = Interface::$name;
                }
            )*
        };
    }

    view_kinds!(
        Class,
        Datatype,
        ObjectProperty,
        DataProperty,
        AnnotationProperty,
        NamedIndividual,
        AnonymousIndividual,
        Restriction,
        UnionOf,
        IntersectionOf,
        ComplementOf,
        OneOf,
        InverseObjectProperty,
        DataRangeExpression,
        ClassExpression,
        ObjectPropertyExpression,
        PropertyExpression,
        DataRange,
        Individual,
        Entity,
    );
}

/// A node of a graph seen under the interface `K`.
///
/// Views hold no copy of the node properties: every accessor reads the graph.
/// They are obtained from [`Ontology::view`](crate::Ontology::view) or
/// [`Ontology::create`](crate::Ontology::create), which check the node against the interface.
pub struct View<'g, K: ViewKind> {
    node: Term,
    graph: &'g UnionGraph,
    max_list_length: usize,
    kind: PhantomData<K>,
}

impl<'g, K: ViewKind> View<'g, K> {
    pub(crate) fn new(node: Term, graph: &'g UnionGraph, max_list_length: usize) -> Self {
        Self {
            node,
            graph,
            max_list_length,
            kind: PhantomData,
        }
    }

    pub fn node(&self) -> &Term {
        &self.node
    }

    pub fn as_ref(&self) -> TermRef<'_> {
        self.node.as_ref()
    }

    pub fn into_node(self) -> Term {
        self.node
    }

    pub fn graph(&self) -> &'g UnionGraph {
        self.graph
    }

    pub fn interface(&self) -> Interface {
        K::INTERFACE
    }

    /// The IRI of the node, if it is not a blank node.
    pub fn iri(&self) -> Option<&NamedNode> {
        match &self.node {
            Term::NamedNode(iri) => Some(iri),
            _ => None,
        }
    }

    /// The `rdf:type`s of the node.
    pub fn types(&self) -> Vec<NamedNode> {
        to_subject(self.as_ref())
            .map(|s| self.graph.types(s))
            .unwrap_or_default()
    }

    /// Annotations on the node: values of the built-in annotation properties and of
    /// every non reserved property typed `owl:AnnotationProperty`.
    pub fn annotations(&self) -> Vec<(NamedNode, Term)> {
        let Some(subject) = to_subject(self.as_ref()) else {
            return Vec::new();
        };
        let vocabulary = BuiltinVocabulary::owl2();
        self.graph
            .find(Some(subject), None, None)
            .into_iter()
            .filter(|t| {
                let p = t.predicate.as_ref();
                vocabulary.is_annotation_property(p)
                    || (!is_reserved(p)
                        && self.graph.has_type(p.into(), owl::ANNOTATION_PROPERTY))
            })
            .map(|t| (t.predicate, t.object))
            .collect()
    }

    /// Values of the annotation property on the node, e.g. its `rdfs:label`s.
    pub fn annotation_values<'p>(&self, property: impl Into<NamedNodeRef<'p>>) -> Vec<Term> {
        self.objects(property.into())
    }

    fn objects(&self, predicate: NamedNodeRef<'_>) -> Vec<Term> {
        to_subject(self.as_ref())
            .map(|s| self.graph.objects(s, predicate))
            .unwrap_or_default()
    }

    fn object(&self, predicate: NamedNodeRef<'_>) -> Option<Term> {
        self.graph.object(to_subject(self.as_ref())?, predicate)
    }

    fn subjects(&self, predicate: NamedNodeRef<'_>) -> Vec<Term> {
        self.graph
            .subjects(predicate, self.as_ref())
            .into_iter()
            .map(Term::from)
            .collect()
    }

    /// Nodes linked by `predicate` in either direction.
    fn symmetric(&self, predicate: NamedNodeRef<'_>) -> Vec<Term> {
        let mut related = self.objects(predicate);
        for subject in self.subjects(predicate) {
            if !related.contains(&subject) {
                related.push(subject);
            }
        }
        related.retain(|n| *n != self.node);
        related
    }

    /// The other members of the `owl:members` lists of `group` typed nodes containing the node.
    fn group_members(&self, group: NamedNodeRef<'_>) -> Vec<Term> {
        let mut members = Vec::new();
        for root in self.graph.subjects(rdf::TYPE, group.into()) {
            let Some(head) = self.graph.object(root.as_ref(), owl::MEMBERS) else {
                continue;
            };
            let Ok(list) = self.graph.list(head.as_ref(), self.max_list_length) else {
                continue;
            };
            if list.contains(&self.node) {
                members.extend(list.into_iter().filter(|m| *m != self.node));
            }
        }
        members
    }

    fn list(&self, predicate: NamedNodeRef<'_>) -> Result<Vec<Term>, AxiomError> {
        match self.object(predicate) {
            Some(head) => self.graph.list(head.as_ref(), self.max_list_length),
            None => Ok(Vec::new()),
        }
    }
}

impl<K: ViewKind> Clone for View<'_, K> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            graph: self.graph,
            max_list_length: self.max_list_length,
            kind: PhantomData,
        }
    }
}

impl<K: ViewKind> PartialEq for View<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && std::ptr::eq(self.graph, other.graph)
    }
}

impl<K: ViewKind> fmt::Debug for View<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("node", &self.node)
            .field("interface", &K::INTERFACE)
            .finish()
    }
}

impl<K: ViewKind> fmt::Display for View<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as {}", self.node, K::INTERFACE)
    }
}

impl View<'_, kind::Class> {
    /// Direct superclasses (`rdfs:subClassOf` objects).
    pub fn super_classes(&self) -> Vec<Term> {
        self.objects(rdfs::SUB_CLASS_OF)
    }

    pub fn sub_classes(&self) -> Vec<Term> {
        self.subjects(rdfs::SUB_CLASS_OF)
    }

    pub fn equivalent_classes(&self) -> Vec<Term> {
        self.symmetric(owl::EQUIVALENT_CLASS)
    }

    /// Classes declared disjoint pairwise or through `owl:AllDisjointClasses`.
    pub fn disjoint_classes(&self) -> Vec<Term> {
        let mut disjoint = self.symmetric(owl::DISJOINT_WITH);
        for member in self.group_members(owl::ALL_DISJOINT_CLASSES) {
            if !disjoint.contains(&member) {
                disjoint.push(member);
            }
        }
        disjoint
    }

    /// Nodes typed with this class.
    pub fn instances(&self) -> Vec<Term> {
        self.subjects(rdf::TYPE)
    }

    pub fn is_deprecated(&self) -> bool {
        is_deprecated(self.graph, self.as_ref())
    }
}

macro_rules! property_accessors {
    ($($kind:ident),*) => {
        $(
            impl View<'_, kind::$kind> {
                pub fn domains(&self) -> Vec<Term> {
                    self.objects(rdfs::DOMAIN)
                }

                pub fn ranges(&self) -> Vec<Term> {
                    self.objects(rdfs::RANGE)
                }

                /// Direct super properties (`rdfs:subPropertyOf` objects).
                pub fn super_properties(&self) -> Vec<Term> {
                    self.objects(rdfs::SUB_PROPERTY_OF)
                }

                pub fn sub_properties(&self) -> Vec<Term> {
                    self.subjects(rdfs::SUB_PROPERTY_OF)
                }

                pub fn is_deprecated(&self) -> bool {
                    is_deprecated(self.graph, self.as_ref())
                }
            }
        )*
    };
}

property_accessors!(ObjectProperty, DataProperty, AnnotationProperty);

impl View<'_, kind::ObjectProperty> {
    /// Properties related by `owl:inverseOf`, in either direction.
    pub fn inverses(&self) -> Vec<Term> {
        self.symmetric(owl::INVERSE_OF)
    }

    pub fn equivalent_properties(&self) -> Vec<Term> {
        self.symmetric(owl::EQUIVALENT_PROPERTY)
    }

    pub fn disjoint_properties(&self) -> Vec<Term> {
        let mut disjoint = self.symmetric(owl::PROPERTY_DISJOINT_WITH);
        disjoint.extend(self.group_members(owl::ALL_DISJOINT_PROPERTIES));
        disjoint
    }

    pub fn is_functional(&self) -> bool {
        self.has_type(owl::FUNCTIONAL_PROPERTY)
    }

    pub fn is_inverse_functional(&self) -> bool {
        self.has_type(owl::INVERSE_FUNCTIONAL_PROPERTY)
    }

    pub fn is_transitive(&self) -> bool {
        self.has_type(owl::TRANSITIVE_PROPERTY)
    }

    pub fn is_symmetric(&self) -> bool {
        self.has_type(owl::SYMMETRIC_PROPERTY)
    }

    pub fn is_asymmetric(&self) -> bool {
        self.has_type(owl::ASYMMETRIC_PROPERTY)
    }

    pub fn is_reflexive(&self) -> bool {
        self.has_type(owl::REFLEXIVE_PROPERTY)
    }

    pub fn is_irreflexive(&self) -> bool {
        self.has_type(owl::IRREFLEXIVE_PROPERTY)
    }

    /// The property chains this property is a super property of.
    pub fn property_chains(&self) -> Vec<Vec<Term>> {
        let Some(subject) = to_subject(self.as_ref()) else {
            return Vec::new();
        };
        self.graph
            .objects(subject, owl::PROPERTY_CHAIN_AXIOM)
            .into_iter()
            .filter_map(|head| self.graph.list(head.as_ref(), self.max_list_length).ok())
            .collect()
    }

    fn has_type(&self, class: NamedNodeRef<'_>) -> bool {
        to_subject(self.as_ref()).is_some_and(|s| self.graph.has_type(s, class))
    }
}

impl View<'_, kind::DataProperty> {
    pub fn is_functional(&self) -> bool {
        to_subject(self.as_ref())
            .is_some_and(|s| self.graph.has_type(s, owl::FUNCTIONAL_PROPERTY))
    }
}

macro_rules! individual_accessors {
    ($($kind:ident),*) => {
        $(
            impl View<'_, kind::$kind> {
                /// The classes of the individual, `owl:NamedIndividual` left out.
                pub fn classes(&self) -> Vec<Term> {
                    self.objects(rdf::TYPE)
                        .into_iter()
                        .filter(|t| *t != Term::from(owl::NAMED_INDIVIDUAL))
                        .collect()
                }

                pub fn same_individuals(&self) -> Vec<Term> {
                    self.symmetric(owl::SAME_AS)
                }

                /// Individuals declared different pairwise or through `owl:AllDifferent`.
                pub fn different_individuals(&self) -> Vec<Term> {
                    let mut different = self.symmetric(owl::DIFFERENT_FROM);
                    different.extend(self.group_members(owl::ALL_DIFFERENT));
                    different
                }

                /// Values of the property on the individual.
                pub fn property_values<'p>(
                    &self,
                    property: impl Into<NamedNodeRef<'p>>,
                ) -> Vec<Term> {
                    self.objects(property.into())
                }
            }
        )*
    };
}

individual_accessors!(NamedIndividual, AnonymousIndividual, Individual);

impl View<'_, kind::Restriction> {
    pub fn on_property(&self) -> Option<Term> {
        self.object(owl::ON_PROPERTY)
    }

    /// The class, data range or value the restriction constrains the property to.
    pub fn filler(&self) -> Option<Term> {
        [
            owl::SOME_VALUES_FROM,
            owl::ALL_VALUES_FROM,
            owl::HAS_VALUE,
            owl::ON_CLASS,
            owl::ON_DATA_RANGE,
        ]
        .into_iter()
        .find_map(|p| self.object(p))
    }

    /// The cardinality, if this is a cardinality restriction.
    pub fn cardinality(&self) -> Option<u32> {
        [
            owl::CARDINALITY,
            owl::MIN_CARDINALITY,
            owl::MAX_CARDINALITY,
            owl::QUALIFIED_CARDINALITY,
            owl::MIN_QUALIFIED_CARDINALITY,
            owl::MAX_QUALIFIED_CARDINALITY,
        ]
        .into_iter()
        .find_map(|p| match self.object(p)? {
            Term::Literal(value) => value.value().parse().ok(),
            _ => None,
        })
    }
}

impl View<'_, kind::UnionOf> {
    pub fn operands(&self) -> Result<Vec<Term>, AxiomError> {
        self.list(owl::UNION_OF)
    }
}

impl View<'_, kind::IntersectionOf> {
    pub fn operands(&self) -> Result<Vec<Term>, AxiomError> {
        self.list(owl::INTERSECTION_OF)
    }
}

impl View<'_, kind::OneOf> {
    pub fn members(&self) -> Result<Vec<Term>, AxiomError> {
        self.list(owl::ONE_OF)
    }
}

impl View<'_, kind::ComplementOf> {
    pub fn operand(&self) -> Option<Term> {
        self.object(owl::COMPLEMENT_OF)
    }
}

impl View<'_, kind::InverseObjectProperty> {
    /// The named property this expression is the inverse of.
    pub fn inverse_of(&self) -> Option<Term> {
        self.object(owl::INVERSE_OF)
    }
}

impl View<'_, kind::DataRangeExpression> {
    /// The restricted datatype of a datatype restriction.
    pub fn on_datatype(&self) -> Option<Term> {
        self.object(owl::ON_DATATYPE)
    }

    /// Operands of a data intersection or union, values of an enumeration.
    pub fn operands(&self) -> Result<Vec<Term>, AxiomError> {
        for predicate in [owl::INTERSECTION_OF, owl::UNION_OF, owl::ONE_OF] {
            if self.object(predicate).is_some() {
                return self.list(predicate);
            }
        }
        Ok(Vec::new())
    }
}

fn is_deprecated(graph: &UnionGraph, node: TermRef<'_>) -> bool {
    to_subject(node).is_some_and(|s| {
        graph.objects(s, owl::DEPRECATED).iter().any(|v| match v {
            Term::Literal(l) => l.value() == "true" || l.value() == "1",
            _ => false,
        })
    })
}
