//! OWL 2 entities: the IRI-named building blocks axioms are made of.

use oxrdf::{BlankNode, IriParseError, NamedNode, NamedNodeRef, NamedOrBlankNode, Term, TermRef};
use std::fmt;

macro_rules! named_entity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(NamedNode);

        impl $name {
            #[inline]
            pub fn new(iri: impl Into<NamedNode>) -> Self {
                Self(iri.into())
            }

            /// Parses the IRI and wraps it.
            #[inline]
            pub fn new_from_iri(iri: impl Into<String>) -> Result<Self, IriParseError> {
                Ok(Self(NamedNode::new(iri)?))
            }

            #[inline]
            pub fn iri(&self) -> &NamedNode {
                &self.0
            }

            #[inline]
            pub fn as_ref(&self) -> NamedNodeRef<'_> {
                self.0.as_ref()
            }

            #[inline]
            pub fn into_inner(self) -> NamedNode {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<NamedNode> for $name {
            fn from(node: NamedNode) -> Self {
                Self(node)
            }
        }

        impl From<NamedNodeRef<'_>> for $name {
            fn from(node: NamedNodeRef<'_>) -> Self {
                Self(node.into_owned())
            }
        }

        impl From<$name> for NamedNode {
            fn from(entity: $name) -> Self {
                entity.0
            }
        }

        impl From<$name> for Term {
            fn from(entity: $name) -> Self {
                entity.0.into()
            }
        }

        impl<'a> From<&'a $name> for TermRef<'a> {
            fn from(entity: &'a $name) -> Self {
                entity.0.as_ref().into()
            }
        }
    };
}

named_entity!(
    /// An OWL class (`owl:Class`).
    ///
    /// Classes are sets of individuals. Every class is a subclass of `owl:Thing`
    /// and a superclass of `owl:Nothing`.
    OwlClass
);

named_entity!(
    /// A datatype (`rdfs:Datatype`), e.g. `xsd:integer`.
    Datatype
);

named_entity!(
    /// An OWL object property (`owl:ObjectProperty`), relating individuals to individuals.
    ObjectProperty
);

named_entity!(
    /// An OWL data property (`owl:DatatypeProperty`), relating individuals to literals.
    DataProperty
);

named_entity!(
    /// An OWL annotation property (`owl:AnnotationProperty`).
    AnnotationProperty
);

/// An OWL individual.
///
/// Individuals are either named (IRIs) or anonymous (blank nodes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Individual {
    Named(NamedNode),
    Anonymous(BlankNode),
}

impl Individual {
    #[inline]
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous(_))
    }

    #[inline]
    pub fn as_named(&self) -> Option<&NamedNode> {
        match self {
            Self::Named(n) => Some(n),
            Self::Anonymous(_) => None,
        }
    }

    #[inline]
    pub fn as_anonymous(&self) -> Option<&BlankNode> {
        match self {
            Self::Named(_) => None,
            Self::Anonymous(b) => Some(b),
        }
    }

    /// Builds an individual from a term, `None` for literals.
    pub fn from_term(term: TermRef<'_>) -> Option<Self> {
        match term {
            TermRef::NamedNode(n) => Some(Self::Named(n.into_owned())),
            TermRef::BlankNode(b) => Some(Self::Anonymous(b.into_owned())),
            _ => None,
        }
    }

    pub fn as_term_ref(&self) -> TermRef<'_> {
        match self {
            Self::Named(n) => n.as_ref().into(),
            Self::Anonymous(b) => b.as_ref().into(),
        }
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::Anonymous(b) => write!(f, "{b}"),
        }
    }
}

impl From<NamedNode> for Individual {
    fn from(node: NamedNode) -> Self {
        Self::Named(node)
    }
}

impl From<BlankNode> for Individual {
    fn from(node: BlankNode) -> Self {
        Self::Anonymous(node)
    }
}

impl From<Individual> for Term {
    fn from(individual: Individual) -> Self {
        match individual {
            Individual::Named(n) => n.into(),
            Individual::Anonymous(b) => b.into(),
        }
    }
}

impl From<Individual> for NamedOrBlankNode {
    fn from(individual: Individual) -> Self {
        match individual {
            Individual::Named(n) => n.into(),
            Individual::Anonymous(b) => b.into(),
        }
    }
}

/// Any of the six kinds of IRI-named OWL entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    Class(OwlClass),
    Datatype(Datatype),
    ObjectProperty(ObjectProperty),
    DataProperty(DataProperty),
    AnnotationProperty(AnnotationProperty),
    NamedIndividual(NamedNode),
}

impl Entity {
    pub fn iri(&self) -> &NamedNode {
        match self {
            Self::Class(e) => e.iri(),
            Self::Datatype(e) => e.iri(),
            Self::ObjectProperty(e) => e.iri(),
            Self::DataProperty(e) => e.iri(),
            Self::AnnotationProperty(e) => e.iri(),
            Self::NamedIndividual(e) => e,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(e) => write!(f, "Class({e})"),
            Self::Datatype(e) => write!(f, "Datatype({e})"),
            Self::ObjectProperty(e) => write!(f, "ObjectProperty({e})"),
            Self::DataProperty(e) => write!(f, "DataProperty({e})"),
            Self::AnnotationProperty(e) => write!(f, "AnnotationProperty({e})"),
            Self::NamedIndividual(e) => write!(f, "NamedIndividual({e})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owl_class() {
        let iri = NamedNode::new_unchecked("http://example.org/Person");
        let class = OwlClass::new(iri.clone());
        assert_eq!(class.iri(), &iri);
        assert_eq!(class.to_string(), iri.to_string());
        assert_eq!(class.as_ref(), iri.as_ref());
        assert!(OwlClass::new_from_iri("not an iri").is_err());
    }

    #[test]
    fn test_individual_from_term() {
        let iri = NamedNode::new_unchecked("http://example.org/Alice");
        let individual = Individual::from_term(iri.as_ref().into()).unwrap();
        assert!(individual.is_named());
        assert_eq!(individual.as_named(), Some(&iri));

        let blank = BlankNode::default();
        let individual = Individual::from_term(blank.as_ref().into()).unwrap();
        assert!(individual.is_anonymous());
        assert_eq!(individual.as_anonymous(), Some(&blank));

        assert!(Individual::from_term(oxrdf::LiteralRef::new_simple_literal("x").into()).is_none());
    }

    #[test]
    fn test_entity_iri() {
        let iri = NamedNode::new_unchecked("http://example.org/knows");
        let entity = Entity::ObjectProperty(iri.clone().into());
        assert_eq!(entity.iri(), &iri);
        assert_eq!(
            entity.to_string(),
            "ObjectProperty(<http://example.org/knows>)"
        );
    }
}
