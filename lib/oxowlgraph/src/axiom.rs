//! OWL 2 axiom types.
//!
//! Axioms are the statements of an ontology. The set of kinds is closed: every component that
//! handles axioms matches on [`Axiom`] exhaustively.

use crate::entity::{
    AnnotationProperty, DataProperty, Datatype, Individual, ObjectProperty, OwlClass,
};
use crate::expression::{write_list, ClassExpression, DataRange, ObjectPropertyExpression};
use oxrdf::{Literal, NamedNode, NamedOrBlankNode, Term};
use std::fmt;

/// An OWL 2 axiom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Axiom {
    // === Declarations ===
    /// Declaration(Class(C))
    DeclareClass(OwlClass),

    /// Declaration(Datatype(D))
    DeclareDatatype(Datatype),

    /// Declaration(ObjectProperty(P))
    DeclareObjectProperty(ObjectProperty),

    /// Declaration(DataProperty(P))
    DeclareDataProperty(DataProperty),

    /// Declaration(AnnotationProperty(P))
    DeclareAnnotationProperty(AnnotationProperty),

    /// Declaration(NamedIndividual(a))
    DeclareNamedIndividual(NamedNode),

    // === Class axioms ===
    /// SubClassOf(sub, super)
    SubClassOf {
        sub_class: ClassExpression,
        super_class: ClassExpression,
    },

    /// EquivalentClasses(C1, C2), one axiom per pair
    EquivalentClasses(Vec<ClassExpression>),

    /// DisjointClasses(C1, ..., Cn)
    DisjointClasses(Vec<ClassExpression>),

    /// DisjointUnion(C, C1, ..., Cn)
    DisjointUnion {
        class: OwlClass,
        disjoint_classes: Vec<ClassExpression>,
    },

    // === Object property axioms ===
    /// SubObjectPropertyOf(sub, super)
    SubObjectPropertyOf {
        sub_property: ObjectPropertyExpression,
        super_property: ObjectPropertyExpression,
    },

    /// SubObjectPropertyOf(ObjectPropertyChain(P1, ..., Pn), P)
    SubPropertyChainOf {
        property_chain: Vec<ObjectPropertyExpression>,
        super_property: ObjectProperty,
    },

    /// EquivalentObjectProperties(P1, P2), one axiom per pair
    EquivalentObjectProperties(Vec<ObjectProperty>),

    /// DisjointObjectProperties(P1, ..., Pn)
    DisjointObjectProperties(Vec<ObjectProperty>),

    /// ObjectPropertyDomain(P, C)
    ObjectPropertyDomain {
        property: ObjectProperty,
        domain: ClassExpression,
    },

    /// ObjectPropertyRange(P, C)
    ObjectPropertyRange {
        property: ObjectProperty,
        range: ClassExpression,
    },

    /// InverseObjectProperties(P1, P2)
    InverseObjectProperties(ObjectProperty, ObjectProperty),

    /// FunctionalObjectProperty(P)
    FunctionalObjectProperty(ObjectProperty),

    /// InverseFunctionalObjectProperty(P)
    InverseFunctionalObjectProperty(ObjectProperty),

    /// ReflexiveObjectProperty(P)
    ReflexiveObjectProperty(ObjectProperty),

    /// IrreflexiveObjectProperty(P)
    IrreflexiveObjectProperty(ObjectProperty),

    /// SymmetricObjectProperty(P)
    SymmetricObjectProperty(ObjectProperty),

    /// AsymmetricObjectProperty(P)
    AsymmetricObjectProperty(ObjectProperty),

    /// TransitiveObjectProperty(P)
    TransitiveObjectProperty(ObjectProperty),

    // === Data property axioms ===
    /// SubDataPropertyOf(sub, super)
    SubDataPropertyOf {
        sub_property: DataProperty,
        super_property: DataProperty,
    },

    /// EquivalentDataProperties(P1, P2), one axiom per pair
    EquivalentDataProperties(Vec<DataProperty>),

    /// DisjointDataProperties(P1, ..., Pn)
    DisjointDataProperties(Vec<DataProperty>),

    /// DataPropertyDomain(P, C)
    DataPropertyDomain {
        property: DataProperty,
        domain: ClassExpression,
    },

    /// DataPropertyRange(P, D)
    DataPropertyRange {
        property: DataProperty,
        range: DataRange,
    },

    /// FunctionalDataProperty(P)
    FunctionalDataProperty(DataProperty),

    /// DatatypeDefinition(DT, D)
    DatatypeDefinition {
        datatype: Datatype,
        range: DataRange,
    },

    // === Assertions ===
    /// ClassAssertion(C, a)
    ClassAssertion {
        class: ClassExpression,
        individual: Individual,
    },

    /// ObjectPropertyAssertion(P, a, b)
    ObjectPropertyAssertion {
        property: ObjectProperty,
        source: Individual,
        target: Individual,
    },

    /// NegativeObjectPropertyAssertion(P, a, b)
    NegativeObjectPropertyAssertion {
        property: ObjectProperty,
        source: Individual,
        target: Individual,
    },

    /// DataPropertyAssertion(P, a, v)
    DataPropertyAssertion {
        property: DataProperty,
        source: Individual,
        target: Literal,
    },

    /// NegativeDataPropertyAssertion(P, a, v)
    NegativeDataPropertyAssertion {
        property: DataProperty,
        source: Individual,
        target: Literal,
    },

    /// SameIndividual(a1, a2), one axiom per pair
    SameIndividual(Vec<Individual>),

    /// DifferentIndividuals(a1, ..., an)
    DifferentIndividuals(Vec<Individual>),

    // === Keys ===
    /// HasKey(C, (P1, ..., Pm), (D1, ..., Dn))
    HasKey {
        class: ClassExpression,
        object_properties: Vec<ObjectProperty>,
        data_properties: Vec<DataProperty>,
    },

    // === Annotation axioms ===
    /// AnnotationAssertion(P, s, v)
    AnnotationAssertion {
        property: AnnotationProperty,
        subject: NamedOrBlankNode,
        value: Term,
    },

    /// SubAnnotationPropertyOf(sub, super)
    SubAnnotationPropertyOf {
        sub_property: AnnotationProperty,
        super_property: AnnotationProperty,
    },

    /// AnnotationPropertyDomain(P, U)
    AnnotationPropertyDomain {
        property: AnnotationProperty,
        domain: NamedNode,
    },

    /// AnnotationPropertyRange(P, U)
    AnnotationPropertyRange {
        property: AnnotationProperty,
        range: NamedNode,
    },
}

impl Axiom {
    /// Creates a SubClassOf axiom.
    pub fn subclass_of(sub: impl Into<ClassExpression>, sup: impl Into<ClassExpression>) -> Self {
        Self::SubClassOf {
            sub_class: sub.into(),
            super_class: sup.into(),
        }
    }

    /// Creates a ClassAssertion axiom.
    pub fn class_assertion(
        class: impl Into<ClassExpression>,
        individual: impl Into<Individual>,
    ) -> Self {
        Self::ClassAssertion {
            class: class.into(),
            individual: individual.into(),
        }
    }

    /// Creates an EquivalentClasses axiom between two class expressions.
    pub fn equivalent_classes(
        first: impl Into<ClassExpression>,
        second: impl Into<ClassExpression>,
    ) -> Self {
        Self::EquivalentClasses(vec![first.into(), second.into()])
    }

    pub fn disjoint_classes(classes: Vec<ClassExpression>) -> Self {
        Self::DisjointClasses(classes)
    }

    /// Creates an ObjectPropertyAssertion axiom.
    pub fn object_property_assertion(
        property: impl Into<ObjectProperty>,
        source: impl Into<Individual>,
        target: impl Into<Individual>,
    ) -> Self {
        Self::ObjectPropertyAssertion {
            property: property.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Creates a DataPropertyAssertion axiom.
    pub fn data_property_assertion(
        property: impl Into<DataProperty>,
        source: impl Into<Individual>,
        target: impl Into<Literal>,
    ) -> Self {
        Self::DataPropertyAssertion {
            property: property.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Creates an AnnotationAssertion axiom.
    pub fn annotation_assertion(
        property: impl Into<AnnotationProperty>,
        subject: impl Into<NamedOrBlankNode>,
        value: impl Into<Term>,
    ) -> Self {
        Self::AnnotationAssertion {
            property: property.into(),
            subject: subject.into(),
            value: value.into(),
        }
    }

    /// The kind of this axiom.
    pub fn axiom_type(&self) -> AxiomType {
        match self {
            Self::DeclareClass(_)
            | Self::DeclareDatatype(_)
            | Self::DeclareObjectProperty(_)
            | Self::DeclareDataProperty(_)
            | Self::DeclareAnnotationProperty(_)
            | Self::DeclareNamedIndividual(_) => AxiomType::Declaration,
            Self::SubClassOf { .. } => AxiomType::SubClassOf,
            Self::EquivalentClasses(_) => AxiomType::EquivalentClasses,
            Self::DisjointClasses(_) => AxiomType::DisjointClasses,
            Self::DisjointUnion { .. } => AxiomType::DisjointUnion,
            Self::SubObjectPropertyOf { .. } => AxiomType::SubObjectPropertyOf,
            Self::SubPropertyChainOf { .. } => AxiomType::SubPropertyChainOf,
            Self::EquivalentObjectProperties(_) => AxiomType::EquivalentObjectProperties,
            Self::DisjointObjectProperties(_) => AxiomType::DisjointObjectProperties,
            Self::ObjectPropertyDomain { .. } => AxiomType::ObjectPropertyDomain,
            Self::ObjectPropertyRange { .. } => AxiomType::ObjectPropertyRange,
            Self::InverseObjectProperties(..) => AxiomType::InverseObjectProperties,
            Self::FunctionalObjectProperty(_) => AxiomType::FunctionalObjectProperty,
            Self::InverseFunctionalObjectProperty(_) => AxiomType::InverseFunctionalObjectProperty,
            Self::ReflexiveObjectProperty(_) => AxiomType::ReflexiveObjectProperty,
            Self::IrreflexiveObjectProperty(_) => AxiomType::IrreflexiveObjectProperty,
            Self::SymmetricObjectProperty(_) => AxiomType::SymmetricObjectProperty,
            Self::AsymmetricObjectProperty(_) => AxiomType::AsymmetricObjectProperty,
            Self::TransitiveObjectProperty(_) => AxiomType::TransitiveObjectProperty,
            Self::SubDataPropertyOf { .. } => AxiomType::SubDataPropertyOf,
            Self::EquivalentDataProperties(_) => AxiomType::EquivalentDataProperties,
            Self::DisjointDataProperties(_) => AxiomType::DisjointDataProperties,
            Self::DataPropertyDomain { .. } => AxiomType::DataPropertyDomain,
            Self::DataPropertyRange { .. } => AxiomType::DataPropertyRange,
            Self::FunctionalDataProperty(_) => AxiomType::FunctionalDataProperty,
            Self::DatatypeDefinition { .. } => AxiomType::DatatypeDefinition,
            Self::ClassAssertion { .. } => AxiomType::ClassAssertion,
            Self::ObjectPropertyAssertion { .. } => AxiomType::ObjectPropertyAssertion,
            Self::NegativeObjectPropertyAssertion { .. } => {
                AxiomType::NegativeObjectPropertyAssertion
            }
            Self::DataPropertyAssertion { .. } => AxiomType::DataPropertyAssertion,
            Self::NegativeDataPropertyAssertion { .. } => AxiomType::NegativeDataPropertyAssertion,
            Self::SameIndividual(_) => AxiomType::SameIndividual,
            Self::DifferentIndividuals(_) => AxiomType::DifferentIndividuals,
            Self::HasKey { .. } => AxiomType::HasKey,
            Self::AnnotationAssertion { .. } => AxiomType::AnnotationAssertion,
            Self::SubAnnotationPropertyOf { .. } => AxiomType::SubAnnotationPropertyOf,
            Self::AnnotationPropertyDomain { .. } => AxiomType::AnnotationPropertyDomain,
            Self::AnnotationPropertyRange { .. } => AxiomType::AnnotationPropertyRange,
        }
    }

    /// Is this a general class axiom, i.e. a class axiom with no named class to file it under?
    ///
    /// `SubClassOf` qualifies when its subclass is anonymous, `EquivalentClasses` and
    /// `DisjointClasses` when all their operands are.
    pub fn is_general_class_axiom(&self) -> bool {
        match self {
            Self::SubClassOf { sub_class, .. } => !sub_class.is_named(),
            Self::EquivalentClasses(classes) | Self::DisjointClasses(classes) => {
                !classes.iter().any(ClassExpression::is_named)
            }
            _ => false,
        }
    }

    /// The named entities and individuals this axiom is about.
    ///
    /// Only the top-level operands count: a subclass axiom is filed under its named subclass and
    /// named superclass, not under the classes nested inside an anonymous operand.
    pub fn primary_entities(&self) -> Vec<Term> {
        fn class(c: &ClassExpression, out: &mut Vec<Term>) {
            if let ClassExpression::Class(c) = c {
                out.push(c.iri().clone().into());
            }
        }
        fn individual(i: &Individual, out: &mut Vec<Term>) {
            out.push(i.clone().into());
        }
        fn named(iri: &NamedNode, out: &mut Vec<Term>) {
            out.push(iri.clone().into());
        }
        fn property(p: &ObjectPropertyExpression, out: &mut Vec<Term>) {
            named(p.base_property().iri(), out);
        }

        let mut out = Vec::new();
        match self {
            Self::DeclareClass(e) => named(e.iri(), &mut out),
            Self::DeclareDatatype(e) => named(e.iri(), &mut out),
            Self::DeclareObjectProperty(e)
            | Self::FunctionalObjectProperty(e)
            | Self::InverseFunctionalObjectProperty(e)
            | Self::ReflexiveObjectProperty(e)
            | Self::IrreflexiveObjectProperty(e)
            | Self::SymmetricObjectProperty(e)
            | Self::AsymmetricObjectProperty(e)
            | Self::TransitiveObjectProperty(e) => named(e.iri(), &mut out),
            Self::DeclareDataProperty(e) | Self::FunctionalDataProperty(e) => {
                named(e.iri(), &mut out)
            }
            Self::DeclareAnnotationProperty(e) => named(e.iri(), &mut out),
            Self::DeclareNamedIndividual(e) => named(e, &mut out),
            Self::SubClassOf {
                sub_class,
                super_class,
            } => {
                class(sub_class, &mut out);
                class(super_class, &mut out);
            }
            Self::EquivalentClasses(classes) | Self::DisjointClasses(classes) => {
                for c in classes {
                    class(c, &mut out);
                }
            }
            Self::DisjointUnion {
                class: c,
                disjoint_classes,
            } => {
                named(c.iri(), &mut out);
                for d in disjoint_classes {
                    class(d, &mut out);
                }
            }
            Self::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => {
                property(sub_property, &mut out);
                property(super_property, &mut out);
            }
            Self::SubPropertyChainOf {
                property_chain,
                super_property,
            } => {
                for p in property_chain {
                    property(p, &mut out);
                }
                named(super_property.iri(), &mut out);
            }
            Self::EquivalentObjectProperties(ps) | Self::DisjointObjectProperties(ps) => {
                for p in ps {
                    named(p.iri(), &mut out);
                }
            }
            Self::ObjectPropertyDomain { property: p, domain: c }
            | Self::ObjectPropertyRange { property: p, range: c } => {
                named(p.iri(), &mut out);
                class(c, &mut out);
            }
            Self::InverseObjectProperties(p, q) => {
                named(p.iri(), &mut out);
                named(q.iri(), &mut out);
            }
            Self::SubDataPropertyOf {
                sub_property,
                super_property,
            } => {
                named(sub_property.iri(), &mut out);
                named(super_property.iri(), &mut out);
            }
            Self::EquivalentDataProperties(ps) | Self::DisjointDataProperties(ps) => {
                for p in ps {
                    named(p.iri(), &mut out);
                }
            }
            Self::DataPropertyDomain { property: p, domain } => {
                named(p.iri(), &mut out);
                class(domain, &mut out);
            }
            Self::DataPropertyRange { property: p, range } => {
                named(p.iri(), &mut out);
                if let DataRange::Datatype(dt) = range {
                    named(dt.iri(), &mut out);
                }
            }
            Self::DatatypeDefinition { datatype, .. } => named(datatype.iri(), &mut out),
            Self::ClassAssertion {
                class: c,
                individual: i,
            } => {
                class(c, &mut out);
                individual(i, &mut out);
            }
            Self::ObjectPropertyAssertion {
                property: p,
                source,
                target,
            }
            | Self::NegativeObjectPropertyAssertion {
                property: p,
                source,
                target,
            } => {
                named(p.iri(), &mut out);
                individual(source, &mut out);
                individual(target, &mut out);
            }
            Self::DataPropertyAssertion {
                property: p,
                source,
                ..
            }
            | Self::NegativeDataPropertyAssertion {
                property: p,
                source,
                ..
            } => {
                named(p.iri(), &mut out);
                individual(source, &mut out);
            }
            Self::SameIndividual(is) | Self::DifferentIndividuals(is) => {
                for i in is {
                    individual(i, &mut out);
                }
            }
            Self::HasKey {
                class: c,
                object_properties,
                data_properties,
            } => {
                class(c, &mut out);
                for p in object_properties {
                    named(p.iri(), &mut out);
                }
                for p in data_properties {
                    named(p.iri(), &mut out);
                }
            }
            Self::AnnotationAssertion {
                property: p,
                subject,
                ..
            } => {
                named(p.iri(), &mut out);
                out.push(subject.clone().into());
            }
            Self::SubAnnotationPropertyOf {
                sub_property,
                super_property,
            } => {
                named(sub_property.iri(), &mut out);
                named(super_property.iri(), &mut out);
            }
            Self::AnnotationPropertyDomain { property: p, .. }
            | Self::AnnotationPropertyRange { property: p, .. } => named(p.iri(), &mut out),
        }
        out.dedup();
        out
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclareClass(e) => write!(f, "Declaration(Class({e}))"),
            Self::DeclareDatatype(e) => write!(f, "Declaration(Datatype({e}))"),
            Self::DeclareObjectProperty(e) => write!(f, "Declaration(ObjectProperty({e}))"),
            Self::DeclareDataProperty(e) => write!(f, "Declaration(DataProperty({e}))"),
            Self::DeclareAnnotationProperty(e) => {
                write!(f, "Declaration(AnnotationProperty({e}))")
            }
            Self::DeclareNamedIndividual(e) => write!(f, "Declaration(NamedIndividual({e}))"),
            Self::SubClassOf {
                sub_class,
                super_class,
            } => write!(f, "SubClassOf({sub_class} {super_class})"),
            Self::EquivalentClasses(cs) => write_list(f, "EquivalentClasses", cs),
            Self::DisjointClasses(cs) => write_list(f, "DisjointClasses", cs),
            Self::DisjointUnion {
                class,
                disjoint_classes,
            } => {
                write!(f, "DisjointUnion({class} ")?;
                write_list(f, "", disjoint_classes)?;
                f.write_str(")")
            }
            Self::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => write!(f, "SubObjectPropertyOf({sub_property} {super_property})"),
            Self::SubPropertyChainOf {
                property_chain,
                super_property,
            } => {
                f.write_str("SubObjectPropertyOf(")?;
                write_list(f, "ObjectPropertyChain", property_chain)?;
                write!(f, " {super_property})")
            }
            Self::EquivalentObjectProperties(ps) => {
                write_list(f, "EquivalentObjectProperties", ps)
            }
            Self::DisjointObjectProperties(ps) => write_list(f, "DisjointObjectProperties", ps),
            Self::ObjectPropertyDomain { property, domain } => {
                write!(f, "ObjectPropertyDomain({property} {domain})")
            }
            Self::ObjectPropertyRange { property, range } => {
                write!(f, "ObjectPropertyRange({property} {range})")
            }
            Self::InverseObjectProperties(p, q) => write!(f, "InverseObjectProperties({p} {q})"),
            Self::FunctionalObjectProperty(p) => write!(f, "FunctionalObjectProperty({p})"),
            Self::InverseFunctionalObjectProperty(p) => {
                write!(f, "InverseFunctionalObjectProperty({p})")
            }
            Self::ReflexiveObjectProperty(p) => write!(f, "ReflexiveObjectProperty({p})"),
            Self::IrreflexiveObjectProperty(p) => write!(f, "IrreflexiveObjectProperty({p})"),
            Self::SymmetricObjectProperty(p) => write!(f, "SymmetricObjectProperty({p})"),
            Self::AsymmetricObjectProperty(p) => write!(f, "AsymmetricObjectProperty({p})"),
            Self::TransitiveObjectProperty(p) => write!(f, "TransitiveObjectProperty({p})"),
            Self::SubDataPropertyOf {
                sub_property,
                super_property,
            } => write!(f, "SubDataPropertyOf({sub_property} {super_property})"),
            Self::EquivalentDataProperties(ps) => write_list(f, "EquivalentDataProperties", ps),
            Self::DisjointDataProperties(ps) => write_list(f, "DisjointDataProperties", ps),
            Self::DataPropertyDomain { property, domain } => {
                write!(f, "DataPropertyDomain({property} {domain})")
            }
            Self::DataPropertyRange { property, range } => {
                write!(f, "DataPropertyRange({property} {range})")
            }
            Self::FunctionalDataProperty(p) => write!(f, "FunctionalDataProperty({p})"),
            Self::DatatypeDefinition { datatype, range } => {
                write!(f, "DatatypeDefinition({datatype} {range})")
            }
            Self::ClassAssertion { class, individual } => {
                write!(f, "ClassAssertion({class} {individual})")
            }
            Self::ObjectPropertyAssertion {
                property,
                source,
                target,
            } => write!(f, "ObjectPropertyAssertion({property} {source} {target})"),
            Self::NegativeObjectPropertyAssertion {
                property,
                source,
                target,
            } => write!(
                f,
                "NegativeObjectPropertyAssertion({property} {source} {target})"
            ),
            Self::DataPropertyAssertion {
                property,
                source,
                target,
            } => write!(f, "DataPropertyAssertion({property} {source} {target})"),
            Self::NegativeDataPropertyAssertion {
                property,
                source,
                target,
            } => write!(
                f,
                "NegativeDataPropertyAssertion({property} {source} {target})"
            ),
            Self::SameIndividual(is) => write_list(f, "SameIndividual", is),
            Self::DifferentIndividuals(is) => write_list(f, "DifferentIndividuals", is),
            Self::HasKey {
                class,
                object_properties,
                data_properties,
            } => {
                write!(f, "HasKey({class} ")?;
                write_list(f, "", object_properties)?;
                f.write_str(" ")?;
                write_list(f, "", data_properties)?;
                f.write_str(")")
            }
            Self::AnnotationAssertion {
                property,
                subject,
                value,
            } => write!(f, "AnnotationAssertion({property} {subject} {value})"),
            Self::SubAnnotationPropertyOf {
                sub_property,
                super_property,
            } => write!(f, "SubAnnotationPropertyOf({sub_property} {super_property})"),
            Self::AnnotationPropertyDomain { property, domain } => {
                write!(f, "AnnotationPropertyDomain({property} {domain})")
            }
            Self::AnnotationPropertyRange { property, range } => {
                write!(f, "AnnotationPropertyRange({property} {range})")
            }
        }
    }
}

/// The kind of an [`Axiom`], used as an index key.
///
/// All declarations share [`AxiomType::Declaration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxiomType {
    Declaration,
    SubClassOf,
    EquivalentClasses,
    DisjointClasses,
    DisjointUnion,
    SubObjectPropertyOf,
    SubPropertyChainOf,
    EquivalentObjectProperties,
    DisjointObjectProperties,
    ObjectPropertyDomain,
    ObjectPropertyRange,
    InverseObjectProperties,
    FunctionalObjectProperty,
    InverseFunctionalObjectProperty,
    ReflexiveObjectProperty,
    IrreflexiveObjectProperty,
    SymmetricObjectProperty,
    AsymmetricObjectProperty,
    TransitiveObjectProperty,
    SubDataPropertyOf,
    EquivalentDataProperties,
    DisjointDataProperties,
    DataPropertyDomain,
    DataPropertyRange,
    FunctionalDataProperty,
    DatatypeDefinition,
    ClassAssertion,
    ObjectPropertyAssertion,
    NegativeObjectPropertyAssertion,
    DataPropertyAssertion,
    NegativeDataPropertyAssertion,
    SameIndividual,
    DifferentIndividuals,
    HasKey,
    AnnotationAssertion,
    SubAnnotationPropertyOf,
    AnnotationPropertyDomain,
    AnnotationPropertyRange,
}

impl fmt::Display for AxiomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An annotation: a property and its value (an IRI, a blank node or a literal).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub property: AnnotationProperty,
    pub value: Term,
}

impl Annotation {
    pub fn new(property: impl Into<AnnotationProperty>, value: impl Into<Term>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Annotation({} {})", self.property, self.value)
    }
}

/// An axiom together with its annotations.
///
/// Two annotated axioms are equal if they have the same axiom and the same set of
/// annotations, whatever order the annotations were given in.
///
/// ```
/// use oxowlgraph::{AnnotatedAxiom, Annotation, Axiom};
/// use oxrdf::vocab::rdfs;
/// use oxrdf::{Literal, NamedNode};
///
/// let a = NamedNode::new("http://example.com/A")?;
/// let b = NamedNode::new("http://example.com/B")?;
/// let first = Annotation::new(rdfs::LABEL, Literal::from("x"));
/// let second = Annotation::new(rdfs::COMMENT, Literal::from("y"));
/// assert_eq!(
///     AnnotatedAxiom::new(Axiom::subclass_of(a.clone(), b.clone()), vec![first.clone(), second.clone()]),
///     AnnotatedAxiom::new(Axiom::subclass_of(a, b), vec![second, first]),
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotatedAxiom {
    axiom: Axiom,
    annotations: Vec<Annotation>,
}

impl AnnotatedAxiom {
    pub fn new(axiom: Axiom, mut annotations: Vec<Annotation>) -> Self {
        annotations.sort_by_cached_key(ToString::to_string);
        annotations.dedup();
        Self { axiom, annotations }
    }

    pub fn axiom(&self) -> &Axiom {
        &self.axiom
    }

    /// The annotations, in a canonical order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn is_annotated(&self) -> bool {
        !self.annotations.is_empty()
    }

    pub fn axiom_type(&self) -> AxiomType {
        self.axiom.axiom_type()
    }

    pub fn into_axiom(self) -> Axiom {
        self.axiom
    }
}

impl From<Axiom> for AnnotatedAxiom {
    fn from(axiom: Axiom) -> Self {
        Self {
            axiom,
            annotations: Vec::new(),
        }
    }
}

impl fmt::Display for AnnotatedAxiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.annotations.is_empty() {
            return write!(f, "{}", self.axiom);
        }
        f.write_str("Annotated(")?;
        for annotation in &self.annotations {
            write!(f, "{annotation} ")?;
        }
        write!(f, "{})", self.axiom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::BlankNode;

    fn iri(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    #[test]
    fn test_general_class_axiom() {
        let named = Axiom::subclass_of(iri("A"), iri("B"));
        assert!(!named.is_general_class_axiom());
        let general = Axiom::subclass_of(
            ClassExpression::union(vec![iri("A").into(), iri("B").into()]),
            iri("C"),
        );
        assert!(general.is_general_class_axiom());
        assert_eq!(general.primary_entities(), vec![Term::from(iri("C"))]);
    }

    #[test]
    fn test_primary_entities() {
        let anonymous = BlankNode::default();
        let axiom = Axiom::object_property_assertion(iri("knows"), iri("alice"), anonymous.clone());
        assert_eq!(
            axiom.primary_entities(),
            vec![
                Term::from(iri("knows")),
                Term::from(iri("alice")),
                Term::from(anonymous)
            ]
        );
        assert_eq!(axiom.axiom_type(), AxiomType::ObjectPropertyAssertion);
    }

    #[test]
    fn test_declarations_share_a_type() {
        assert_eq!(
            Axiom::DeclareClass(iri("A").into()).axiom_type(),
            Axiom::DeclareNamedIndividual(iri("a")).axiom_type()
        );
    }

    #[test]
    fn test_annotation_order_is_irrelevant() {
        let axiom = Axiom::subclass_of(iri("A"), iri("B"));
        let first = Annotation::new(iri("note"), Literal::from("x"));
        let second = Annotation::new(iri("note"), Literal::from("y"));
        assert_eq!(
            AnnotatedAxiom::new(axiom.clone(), vec![first.clone(), second.clone()]),
            AnnotatedAxiom::new(axiom.clone(), vec![second, first.clone()])
        );
        assert_ne!(
            AnnotatedAxiom::new(axiom.clone(), vec![first]),
            AnnotatedAxiom::from(axiom)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Axiom::subclass_of(iri("A"), iri("B")).to_string(),
            "SubClassOf(<http://example.org/A> <http://example.org/B>)"
        );
    }
}
