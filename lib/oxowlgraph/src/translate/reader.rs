use crate::axiom::{AnnotatedAxiom, Annotation, Axiom};
use crate::classifier::Classifier;
use crate::config::OntologyConfig;
use crate::entity::{DataProperty, Individual, ObjectProperty};
use crate::error::AxiomError;
use crate::expression::{ClassExpression, DataRange, ObjectPropertyExpression};
use crate::graph::{to_subject, UnionGraph};
use crate::translate::Footprint;
use crate::vocab::{is_reserved, owl};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{
    Literal, NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Term, TermRef,
    Triple, TripleRef,
};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Recognizes axioms in a [`UnionGraph`].
///
/// Every axiom is read from one main triple. Anonymous expressions, lists and annotations
/// hanging from it are followed and recorded in the axiom [`Footprint`].
///
/// Triples that do not form a complete axiom (undeclared properties, truncated lists...) are
/// not an error: they just yield nothing.
pub struct AxiomReader<'a> {
    graph: &'a UnionGraph,
    classifier: Classifier<'a>,
    max_list_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyKind {
    Object,
    Data,
    Annotation,
}

/// The triples consumed while reading one axiom.
#[derive(Default)]
struct Cursor {
    triples: Vec<Triple>,
    visiting: FxHashSet<Term>,
}

struct Read {
    axiom: Axiom,
    triples: Vec<Triple>,
    /// Blank root carrying the annotations, if the axiom has one.
    root: Option<NamedOrBlankNode>,
}

/// Blank node types that are part of the encoding of something else.
const STRUCTURAL_TYPES: [NamedNodeRef<'static>; 7] = [
    owl::AXIOM,
    owl::ANNOTATION,
    owl::RESTRICTION,
    owl::ALL_DISJOINT_CLASSES,
    owl::ALL_DISJOINT_PROPERTIES,
    owl::ALL_DIFFERENT,
    owl::NEGATIVE_PROPERTY_ASSERTION,
];

/// Predicates whose subject is part of the encoding of something else.
const STRUCTURAL_PREDICATES: [NamedNodeRef<'static>; 11] = [
    rdf::FIRST,
    owl::UNION_OF,
    owl::INTERSECTION_OF,
    owl::COMPLEMENT_OF,
    owl::ONE_OF,
    owl::INVERSE_OF,
    owl::ON_DATATYPE,
    owl::DATATYPE_COMPLEMENT_OF,
    owl::WITH_RESTRICTIONS,
    owl::ON_PROPERTY,
    owl::ANNOTATED_SOURCE,
];

impl<'a> AxiomReader<'a> {
    pub fn new(graph: &'a UnionGraph, config: &OntologyConfig) -> Self {
        Self {
            graph,
            classifier: Classifier::new(graph).with_node_budget(config.classifier_node_budget),
            max_list_length: config.max_list_length,
        }
    }

    pub fn classifier(&self) -> &Classifier<'a> {
        &self.classifier
    }

    /// Reads the axioms whose main triple is `main`.
    ///
    /// A main triple carrying reified annotations yields one annotated axiom per reification
    /// node and no plain axiom.
    pub fn axioms_at<'t>(
        &self,
        main: impl Into<TripleRef<'t>>,
    ) -> Vec<(AnnotatedAxiom, Footprint)> {
        let main = main.into();
        if !self.graph.contains(main) {
            return Vec::new();
        }
        match self.read_main(main) {
            Ok(Some(read)) => self.annotate(main, read),
            Ok(None) => Vec::new(),
            Err(e) => {
                debug!("no axiom can be read from {main}: {e}");
                Vec::new()
            }
        }
    }

    /// Reads every axiom of the graph.
    pub fn scan(&self) -> Vec<(AnnotatedAxiom, Footprint)> {
        self.graph
            .iter()
            .flat_map(|triple| self.axioms_at(&triple))
            .collect()
    }

    fn annotate(&self, main: TripleRef<'_>, read: Read) -> Vec<(AnnotatedAxiom, Footprint)> {
        let main_owned = main.into_owned();
        if let Some(root) = read.root {
            let mut triples = read.triples;
            let annotations = self.annotations_on(root.as_ref(), &mut triples);
            return vec![(
                AnnotatedAxiom::new(read.axiom, annotations),
                Footprint::new(main_owned, triples),
            )];
        }

        let reifications: Vec<NamedOrBlankNode> = self
            .graph
            .subjects(owl::ANNOTATED_SOURCE, main.subject.into())
            .into_iter()
            .filter(|node| {
                self.graph.contains(TripleRef::new(
                    node.as_ref(),
                    owl::ANNOTATED_PROPERTY,
                    main.predicate,
                )) && self.graph.contains(TripleRef::new(
                    node.as_ref(),
                    owl::ANNOTATED_TARGET,
                    main.object,
                ))
            })
            .collect();
        if reifications.is_empty() {
            return vec![(
                AnnotatedAxiom::from(read.axiom),
                Footprint::new(main_owned, read.triples),
            )];
        }
        reifications
            .into_iter()
            .map(|node| {
                let mut triples = read.triples.clone();
                let n = node.as_ref();
                triples.push(Triple::new(n, owl::ANNOTATED_SOURCE, main.subject));
                triples.push(Triple::new(n, owl::ANNOTATED_PROPERTY, main.predicate));
                triples.push(Triple::new(n, owl::ANNOTATED_TARGET, main.object));
                if self.graph.has_type(n, owl::AXIOM) {
                    triples.push(Triple::new(n, rdf::TYPE, owl::AXIOM));
                }
                let annotations = self.annotations_on(n, &mut triples);
                (
                    AnnotatedAxiom::new(read.axiom.clone(), annotations),
                    Footprint::new(main_owned.clone(), triples),
                )
            })
            .collect()
    }

    fn annotations_on(
        &self,
        node: NamedOrBlankNodeRef<'_>,
        triples: &mut Vec<Triple>,
    ) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        for triple in self.graph.find(Some(node), None, None) {
            if self.is_annotation_predicate(triple.predicate.as_ref()) {
                annotations.push(Annotation::new(
                    triple.predicate.clone(),
                    triple.object.clone(),
                ));
                triples.push(triple);
            }
        }
        annotations
    }

    fn is_annotation_predicate(&self, predicate: NamedNodeRef<'_>) -> bool {
        !is_reserved(predicate)
            || self
                .classifier
                .vocabulary()
                .is_annotation_property(predicate)
    }

    /// Is the subject part of the encoding of another construct (or an ontology header)?
    fn is_structural(&self, subject: NamedOrBlankNodeRef<'_>) -> bool {
        if self.graph.has_type(subject, owl::ONTOLOGY) {
            return true;
        }
        match subject {
            NamedOrBlankNodeRef::NamedNode(_) => false,
            NamedOrBlankNodeRef::BlankNode(_) => {
                STRUCTURAL_TYPES
                    .iter()
                    .any(|t| self.graph.has_type(subject, *t))
                    || STRUCTURAL_PREDICATES
                        .iter()
                        .any(|p| self.graph.has_property(subject, *p))
            }
        }
    }

    fn read_main(&self, main: TripleRef<'_>) -> Result<Option<Read>, AxiomError> {
        let subject = main.subject;
        if self.graph.has_type(subject, owl::ONTOLOGY) {
            return Ok(None);
        }
        let s = TermRef::from(subject);
        let p = main.predicate;
        let o = main.object;
        let mut cursor = Cursor::default();

        if p == rdf::TYPE {
            return self.read_typed(subject, o);
        }
        let axiom = if p == rdfs::SUB_CLASS_OF {
            Some(Axiom::SubClassOf {
                sub_class: self.class_expression(&mut cursor, s)?,
                super_class: self.class_expression(&mut cursor, o)?,
            })
        } else if p == owl::EQUIVALENT_CLASS {
            let datatype = subject.is_named_node()
                && self.classifier.is_datatype(s)
                && !self.classifier.is_class(s);
            if datatype {
                Some(Axiom::DatatypeDefinition {
                    datatype: named(s)?.into(),
                    range: self.data_range(&mut cursor, o)?,
                })
            } else {
                Some(Axiom::EquivalentClasses(vec![
                    self.class_expression(&mut cursor, s)?,
                    self.class_expression(&mut cursor, o)?,
                ]))
            }
        } else if p == owl::DISJOINT_WITH {
            Some(Axiom::DisjointClasses(vec![
                self.class_expression(&mut cursor, s)?,
                self.class_expression(&mut cursor, o)?,
            ]))
        } else if p == owl::DISJOINT_UNION_OF {
            Some(Axiom::DisjointUnion {
                class: named(s)?.into(),
                disjoint_classes: self.class_expressions(&mut cursor, o)?,
            })
        } else if p == rdfs::SUB_PROPERTY_OF {
            match self.property_kind(s).or_else(|| self.property_kind(o)) {
                Some(PropertyKind::Object) => Some(Axiom::SubObjectPropertyOf {
                    sub_property: self.object_property_expression(&mut cursor, s)?,
                    super_property: self.object_property_expression(&mut cursor, o)?,
                }),
                Some(PropertyKind::Data) => Some(Axiom::SubDataPropertyOf {
                    sub_property: named(s)?.into(),
                    super_property: named(o)?.into(),
                }),
                Some(PropertyKind::Annotation) => Some(Axiom::SubAnnotationPropertyOf {
                    sub_property: named(s)?.into(),
                    super_property: named(o)?.into(),
                }),
                None => None,
            }
        } else if p == owl::PROPERTY_CHAIN_AXIOM {
            let chain = self
                .list(&mut cursor, o)?
                .iter()
                .map(|p| self.object_property_expression(&mut cursor, p.as_ref()))
                .collect::<Result<Vec<_>, _>>()?;
            Some(Axiom::SubPropertyChainOf {
                property_chain: chain,
                super_property: named(s)?.into(),
            })
        } else if p == owl::EQUIVALENT_PROPERTY {
            match self.property_kind(s).or_else(|| self.property_kind(o)) {
                Some(PropertyKind::Object) => Some(Axiom::EquivalentObjectProperties(vec![
                    named(s)?.into(),
                    named(o)?.into(),
                ])),
                Some(PropertyKind::Data) => Some(Axiom::EquivalentDataProperties(vec![
                    named(s)?.into(),
                    named(o)?.into(),
                ])),
                _ => None,
            }
        } else if p == owl::PROPERTY_DISJOINT_WITH {
            match self.property_kind(s).or_else(|| self.property_kind(o)) {
                Some(PropertyKind::Object) => Some(Axiom::DisjointObjectProperties(vec![
                    named(s)?.into(),
                    named(o)?.into(),
                ])),
                Some(PropertyKind::Data) => Some(Axiom::DisjointDataProperties(vec![
                    named(s)?.into(),
                    named(o)?.into(),
                ])),
                _ => None,
            }
        } else if p == rdfs::DOMAIN {
            match self.property_kind(s) {
                Some(PropertyKind::Object) => Some(Axiom::ObjectPropertyDomain {
                    property: named(s)?.into(),
                    domain: self.class_expression(&mut cursor, o)?,
                }),
                Some(PropertyKind::Data) => Some(Axiom::DataPropertyDomain {
                    property: named(s)?.into(),
                    domain: self.class_expression(&mut cursor, o)?,
                }),
                Some(PropertyKind::Annotation) => Some(Axiom::AnnotationPropertyDomain {
                    property: named(s)?.into(),
                    domain: named(o)?,
                }),
                None => None,
            }
        } else if p == rdfs::RANGE {
            match self.property_kind(s) {
                Some(PropertyKind::Object) => Some(Axiom::ObjectPropertyRange {
                    property: named(s)?.into(),
                    range: self.class_expression(&mut cursor, o)?,
                }),
                Some(PropertyKind::Data) => Some(Axiom::DataPropertyRange {
                    property: named(s)?.into(),
                    range: self.data_range(&mut cursor, o)?,
                }),
                Some(PropertyKind::Annotation) => Some(Axiom::AnnotationPropertyRange {
                    property: named(s)?.into(),
                    range: named(o)?,
                }),
                None => None,
            }
        } else if p == owl::INVERSE_OF {
            match (s, o) {
                (TermRef::NamedNode(first), TermRef::NamedNode(second)) => {
                    Some(Axiom::InverseObjectProperties(first.into(), second.into()))
                }
                // a blank subject is an inverse property expression
                _ => None,
            }
        } else if p == owl::SAME_AS {
            Some(Axiom::SameIndividual(vec![individual(s)?, individual(o)?]))
        } else if p == owl::DIFFERENT_FROM {
            Some(Axiom::DifferentIndividuals(vec![
                individual(s)?,
                individual(o)?,
            ]))
        } else if p == owl::HAS_KEY {
            let mut object_properties = Vec::new();
            let mut data_properties = Vec::new();
            for key in self.list(&mut cursor, o)? {
                let key = key.as_ref();
                if self.classifier.is_object_property(key) {
                    object_properties.push(named(key)?.into());
                } else if self.classifier.is_data_property(key) {
                    data_properties.push(named(key)?.into());
                } else {
                    return Err(AxiomError::malformed(
                        key,
                        "a key member must be an object or a data property",
                    ));
                }
            }
            Some(Axiom::HasKey {
                class: self.class_expression(&mut cursor, s)?,
                object_properties,
                data_properties,
            })
        } else if is_reserved(p) && !self.classifier.vocabulary().is_annotation_property(p) {
            None
        } else {
            self.read_assertion(subject, p, o)?
        };
        Ok(axiom.map(|axiom| Read {
            axiom,
            triples: cursor.triples,
            root: None,
        }))
    }

    /// Reads `subject rdf:type object`.
    fn read_typed(
        &self,
        subject: NamedOrBlankNodeRef<'_>,
        object: TermRef<'_>,
    ) -> Result<Option<Read>, AxiomError> {
        let mut cursor = Cursor::default();
        let class = match object {
            TermRef::NamedNode(class) => class,
            TermRef::BlankNode(_) => {
                if self.is_structural(subject) {
                    return Ok(None);
                }
                let axiom = Axiom::ClassAssertion {
                    class: self.class_expression(&mut cursor, object)?,
                    individual: individual(subject.into())?,
                };
                return Ok(Some(Read {
                    axiom,
                    triples: cursor.triples,
                    root: None,
                }));
            }
            _ => return Ok(None),
        };

        if class == owl::ALL_DISJOINT_CLASSES
            || class == owl::ALL_DISJOINT_PROPERTIES
            || class == owl::ALL_DIFFERENT
            || class == owl::NEGATIVE_PROPERTY_ASSERTION
        {
            return self.read_rooted(subject, class);
        }

        let axiom = if let NamedOrBlankNodeRef::NamedNode(iri) = subject {
            self.read_entity_typing(iri, class)
        } else {
            None
        };
        let axiom = match axiom {
            Some(axiom) => Some(axiom),
            None if (!is_reserved(class) || self.classifier.vocabulary().is_class(class))
                && !self.is_structural(subject) =>
            {
                Some(Axiom::ClassAssertion {
                    class: ClassExpression::class(class),
                    individual: individual(subject.into())?,
                })
            }
            None => None,
        };
        Ok(axiom.map(|axiom| Read {
            axiom,
            triples: Vec::new(),
            root: None,
        }))
    }

    /// Declarations and property characteristics.
    fn read_entity_typing(&self, iri: NamedNodeRef<'_>, class: NamedNodeRef<'_>) -> Option<Axiom> {
        let entity = iri.into_owned();
        Some(if class == owl::CLASS {
            Axiom::DeclareClass(entity.into())
        } else if class == rdfs::DATATYPE {
            Axiom::DeclareDatatype(entity.into())
        } else if class == owl::OBJECT_PROPERTY {
            Axiom::DeclareObjectProperty(entity.into())
        } else if class == owl::DATATYPE_PROPERTY {
            Axiom::DeclareDataProperty(entity.into())
        } else if class == owl::ANNOTATION_PROPERTY {
            Axiom::DeclareAnnotationProperty(entity.into())
        } else if class == owl::NAMED_INDIVIDUAL {
            Axiom::DeclareNamedIndividual(entity)
        } else if class == owl::FUNCTIONAL_PROPERTY {
            if self.classifier.is_object_property(iri.into()) {
                Axiom::FunctionalObjectProperty(entity.into())
            } else if self.classifier.is_data_property(iri.into()) {
                Axiom::FunctionalDataProperty(entity.into())
            } else {
                return None;
            }
        } else if class == owl::INVERSE_FUNCTIONAL_PROPERTY {
            Axiom::InverseFunctionalObjectProperty(entity.into())
        } else if class == owl::REFLEXIVE_PROPERTY {
            Axiom::ReflexiveObjectProperty(entity.into())
        } else if class == owl::IRREFLEXIVE_PROPERTY {
            Axiom::IrreflexiveObjectProperty(entity.into())
        } else if class == owl::SYMMETRIC_PROPERTY {
            Axiom::SymmetricObjectProperty(entity.into())
        } else if class == owl::ASYMMETRIC_PROPERTY {
            Axiom::AsymmetricObjectProperty(entity.into())
        } else if class == owl::TRANSITIVE_PROPERTY {
            Axiom::TransitiveObjectProperty(entity.into())
        } else {
            return None;
        })
    }

    /// Axioms encoded as a typed blank node: `owl:AllDisjointClasses`,
    /// `owl:AllDisjointProperties`, `owl:AllDifferent` and `owl:NegativePropertyAssertion`.
    fn read_rooted(
        &self,
        root: NamedOrBlankNodeRef<'_>,
        class: NamedNodeRef<'_>,
    ) -> Result<Option<Read>, AxiomError> {
        let mut cursor = Cursor::default();
        let axiom = if class == owl::NEGATIVE_PROPERTY_ASSERTION {
            let source = self.required(&mut cursor, root, owl::SOURCE_INDIVIDUAL)?;
            let property = self.required(&mut cursor, root, owl::ASSERTION_PROPERTY)?;
            let source = individual(source.as_ref())?;
            let property = named(property.as_ref())?;
            if let Some(target) = self.record(&mut cursor, root, owl::TARGET_INDIVIDUAL) {
                Axiom::NegativeObjectPropertyAssertion {
                    property: property.into(),
                    source,
                    target: individual(target.as_ref())?,
                }
            } else if let Some(target) = self.record(&mut cursor, root, owl::TARGET_VALUE) {
                Axiom::NegativeDataPropertyAssertion {
                    property: property.into(),
                    source,
                    target: literal(target.as_ref())?,
                }
            } else {
                return Err(AxiomError::malformed(
                    root,
                    "a negative property assertion needs a target",
                ));
            }
        } else {
            let members = match self.record(&mut cursor, root, owl::MEMBERS) {
                Some(members) => members,
                None if class == owl::ALL_DIFFERENT => {
                    self.required(&mut cursor, root, owl::DISTINCT_MEMBERS)?
                }
                None => {
                    return Err(AxiomError::malformed(root, "missing owl:members"));
                }
            };
            if class == owl::ALL_DISJOINT_CLASSES {
                Axiom::DisjointClasses(self.class_expressions(&mut cursor, members.as_ref())?)
            } else if class == owl::ALL_DIFFERENT {
                Axiom::DifferentIndividuals(
                    self.list(&mut cursor, members.as_ref())?
                        .iter()
                        .map(|m| individual(m.as_ref()))
                        .collect::<Result<_, _>>()?,
                )
            } else {
                let members = self.list(&mut cursor, members.as_ref())?;
                let kind = members
                    .first()
                    .and_then(|first| self.property_kind(first.as_ref()));
                match kind {
                    Some(PropertyKind::Object) => Axiom::DisjointObjectProperties(
                        members
                            .iter()
                            .map(|m| named(m.as_ref()).map(ObjectProperty::from))
                            .collect::<Result<_, _>>()?,
                    ),
                    Some(PropertyKind::Data) => Axiom::DisjointDataProperties(
                        members
                            .iter()
                            .map(|m| named(m.as_ref()).map(DataProperty::from))
                            .collect::<Result<_, _>>()?,
                    ),
                    _ => return Ok(None),
                }
            }
        };
        Ok(Some(Read {
            axiom,
            triples: cursor.triples,
            root: Some(root.into_owned()),
        }))
    }

    /// Property assertions and annotation assertions.
    fn read_assertion(
        &self,
        subject: NamedOrBlankNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
        object: TermRef<'_>,
    ) -> Result<Option<Axiom>, AxiomError> {
        if self.is_structural(subject) {
            return Ok(None);
        }
        let candidates = if object.is_literal() {
            [PropertyKind::Data, PropertyKind::Annotation]
        } else {
            [PropertyKind::Object, PropertyKind::Annotation]
        };
        for kind in candidates {
            if !self.property_is(kind, predicate.into()) {
                continue;
            }
            return Ok(Some(match kind {
                PropertyKind::Object => Axiom::ObjectPropertyAssertion {
                    property: predicate.into(),
                    source: individual(subject.into())?,
                    target: individual(object)?,
                },
                PropertyKind::Data => Axiom::DataPropertyAssertion {
                    property: predicate.into(),
                    source: individual(subject.into())?,
                    target: literal(object)?,
                },
                PropertyKind::Annotation => Axiom::AnnotationAssertion {
                    property: predicate.into(),
                    subject: subject.into_owned(),
                    value: object.into_owned(),
                },
            }));
        }
        Ok(None)
    }

    fn property_is(&self, kind: PropertyKind, property: TermRef<'_>) -> bool {
        match kind {
            PropertyKind::Object => self.classifier.is_object_property(property),
            PropertyKind::Data => self.classifier.is_data_property(property),
            PropertyKind::Annotation => self.classifier.is_annotation_property(property),
        }
    }

    /// Object, then data, then annotation property.
    fn property_kind(&self, property: TermRef<'_>) -> Option<PropertyKind> {
        if let TermRef::BlankNode(b) = property {
            return self
                .graph
                .has_property(b.into(), owl::INVERSE_OF)
                .then_some(PropertyKind::Object);
        }
        [
            PropertyKind::Object,
            PropertyKind::Data,
            PropertyKind::Annotation,
        ]
        .into_iter()
        .find(|kind| self.property_is(*kind, property))
    }

    /// First object of `(subject, predicate, ?)`, recording the triple.
    fn record(
        &self,
        cursor: &mut Cursor,
        subject: NamedOrBlankNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) -> Option<Term> {
        let object = self.graph.object(subject, predicate)?;
        cursor
            .triples
            .push(Triple::new(subject, predicate, object.clone()));
        Some(object)
    }

    fn required(
        &self,
        cursor: &mut Cursor,
        subject: NamedOrBlankNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) -> Result<Term, AxiomError> {
        self.record(cursor, subject, predicate).ok_or_else(|| {
            AxiomError::malformed(subject, format!("missing {predicate}"))
        })
    }

    fn record_type(&self, cursor: &mut Cursor, subject: NamedOrBlankNodeRef<'_>, class: NamedNodeRef<'_>) {
        if self.graph.has_type(subject, class) {
            cursor.triples.push(Triple::new(subject, rdf::TYPE, class));
        }
    }

    fn list(&self, cursor: &mut Cursor, head: TermRef<'_>) -> Result<Vec<Term>, AxiomError> {
        let items = self.graph.list(head, self.max_list_length)?;
        cursor
            .triples
            .extend(self.graph.list_triples(head, self.max_list_length));
        Ok(items)
    }

    fn class_expressions(
        &self,
        cursor: &mut Cursor,
        head: TermRef<'_>,
    ) -> Result<Vec<ClassExpression>, AxiomError> {
        self.list(cursor, head)?
            .iter()
            .map(|c| self.class_expression(cursor, c.as_ref()))
            .collect()
    }

    fn data_ranges(&self, cursor: &mut Cursor, head: TermRef<'_>) -> Result<Vec<DataRange>, AxiomError> {
        self.list(cursor, head)?
            .iter()
            .map(|d| self.data_range(cursor, d.as_ref()))
            .collect()
    }

    /// Marks a blank node as being read, failing on cyclic expressions.
    fn enter(&self, cursor: &mut Cursor, node: TermRef<'_>) -> Result<(), AxiomError> {
        if cursor.visiting.insert(node.into_owned()) {
            Ok(())
        } else {
            Err(AxiomError::malformed(node, "the expression contains itself"))
        }
    }

    fn class_expression(
        &self,
        cursor: &mut Cursor,
        term: TermRef<'_>,
    ) -> Result<ClassExpression, AxiomError> {
        let node = match term {
            TermRef::NamedNode(iri) => return Ok(ClassExpression::class(iri)),
            TermRef::BlankNode(b) => NamedOrBlankNodeRef::from(b),
            _ => return Err(AxiomError::malformed(term, "not a class expression")),
        };
        self.enter(cursor, term)?;
        let expression = if self.graph.has_property(node, owl::ON_PROPERTY) {
            self.record_type(cursor, node, owl::RESTRICTION);
            self.restriction(cursor, node)?
        } else {
            self.record_type(cursor, node, owl::CLASS);
            if let Some(list) = self.record(cursor, node, owl::INTERSECTION_OF) {
                ClassExpression::ObjectIntersectionOf(self.class_expressions(cursor, list.as_ref())?)
            } else if let Some(list) = self.record(cursor, node, owl::UNION_OF) {
                ClassExpression::ObjectUnionOf(self.class_expressions(cursor, list.as_ref())?)
            } else if let Some(operand) = self.record(cursor, node, owl::COMPLEMENT_OF) {
                ClassExpression::complement(self.class_expression(cursor, operand.as_ref())?)
            } else if let Some(list) = self.record(cursor, node, owl::ONE_OF) {
                ClassExpression::ObjectOneOf(
                    self.list(cursor, list.as_ref())?
                        .iter()
                        .map(|i| individual(i.as_ref()))
                        .collect::<Result<_, _>>()?,
                )
            } else {
                return Err(AxiomError::malformed(term, "not a class expression"));
            }
        };
        cursor.visiting.remove(&term.into_owned());
        Ok(expression)
    }

    fn restriction(
        &self,
        cursor: &mut Cursor,
        node: NamedOrBlankNodeRef<'_>,
    ) -> Result<ClassExpression, AxiomError> {
        let property = self.required(cursor, node, owl::ON_PROPERTY)?;
        match self.property_kind(property.as_ref()) {
            Some(PropertyKind::Object) => {
                let property = self.object_property_expression(cursor, property.as_ref())?;
                self.object_restriction(cursor, node, property)
            }
            Some(PropertyKind::Data) => {
                let property = DataProperty::from(named(property.as_ref())?);
                self.data_restriction(cursor, node, property)
            }
            _ => Err(AxiomError::malformed(
                property,
                "restricted property is neither an object nor a data property",
            )),
        }
    }

    fn object_restriction(
        &self,
        cursor: &mut Cursor,
        node: NamedOrBlankNodeRef<'_>,
        property: ObjectPropertyExpression,
    ) -> Result<ClassExpression, AxiomError> {
        if let Some(filler) = self.record(cursor, node, owl::SOME_VALUES_FROM) {
            return Ok(ClassExpression::ObjectSomeValuesFrom {
                property,
                filler: Box::new(self.class_expression(cursor, filler.as_ref())?),
            });
        }
        if let Some(filler) = self.record(cursor, node, owl::ALL_VALUES_FROM) {
            return Ok(ClassExpression::ObjectAllValuesFrom {
                property,
                filler: Box::new(self.class_expression(cursor, filler.as_ref())?),
            });
        }
        if let Some(value) = self.record(cursor, node, owl::HAS_VALUE) {
            return Ok(ClassExpression::ObjectHasValue {
                property,
                individual: individual(value.as_ref())?,
            });
        }
        if self.record(cursor, node, owl::HAS_SELF).is_some() {
            return Ok(ClassExpression::ObjectHasSelf(property));
        }
        let Some((bound, cardinality, filler)) = self.cardinality(cursor, node, owl::ON_CLASS)?
        else {
            return Err(AxiomError::malformed(
                node,
                "unsupported object property restriction",
            ));
        };
        let filler = filler
            .map(|f| self.class_expression(cursor, f.as_ref()).map(Box::new))
            .transpose()?;
        Ok(match bound {
            Bound::Min => ClassExpression::ObjectMinCardinality {
                cardinality,
                property,
                filler,
            },
            Bound::Max => ClassExpression::ObjectMaxCardinality {
                cardinality,
                property,
                filler,
            },
            Bound::Exact => ClassExpression::ObjectExactCardinality {
                cardinality,
                property,
                filler,
            },
        })
    }

    fn data_restriction(
        &self,
        cursor: &mut Cursor,
        node: NamedOrBlankNodeRef<'_>,
        property: DataProperty,
    ) -> Result<ClassExpression, AxiomError> {
        if let Some(filler) = self.record(cursor, node, owl::SOME_VALUES_FROM) {
            return Ok(ClassExpression::DataSomeValuesFrom {
                property,
                filler: self.data_range(cursor, filler.as_ref())?,
            });
        }
        if let Some(filler) = self.record(cursor, node, owl::ALL_VALUES_FROM) {
            return Ok(ClassExpression::DataAllValuesFrom {
                property,
                filler: self.data_range(cursor, filler.as_ref())?,
            });
        }
        if let Some(value) = self.record(cursor, node, owl::HAS_VALUE) {
            return Ok(ClassExpression::DataHasValue {
                property,
                value: literal(value.as_ref())?,
            });
        }
        let Some((bound, cardinality, filler)) =
            self.cardinality(cursor, node, owl::ON_DATA_RANGE)?
        else {
            return Err(AxiomError::malformed(
                node,
                "unsupported data property restriction",
            ));
        };
        let filler = filler
            .map(|f| self.data_range(cursor, f.as_ref()))
            .transpose()?;
        Ok(match bound {
            Bound::Min => ClassExpression::DataMinCardinality {
                cardinality,
                property,
                filler,
            },
            Bound::Max => ClassExpression::DataMaxCardinality {
                cardinality,
                property,
                filler,
            },
            Bound::Exact => ClassExpression::DataExactCardinality {
                cardinality,
                property,
                filler,
            },
        })
    }

    /// Reads a plain or qualified cardinality restriction, returning the filler of the
    /// qualified forms.
    fn cardinality(
        &self,
        cursor: &mut Cursor,
        node: NamedOrBlankNodeRef<'_>,
        filler_predicate: NamedNodeRef<'_>,
    ) -> Result<Option<(Bound, u32, Option<Term>)>, AxiomError> {
        for (bound, unqualified, qualified) in [
            (Bound::Min, owl::MIN_CARDINALITY, owl::MIN_QUALIFIED_CARDINALITY),
            (Bound::Max, owl::MAX_CARDINALITY, owl::MAX_QUALIFIED_CARDINALITY),
            (Bound::Exact, owl::CARDINALITY, owl::QUALIFIED_CARDINALITY),
        ] {
            if let Some(value) = self.record(cursor, node, unqualified) {
                return Ok(Some((bound, cardinality(value.as_ref())?, None)));
            }
            if let Some(value) = self.record(cursor, node, qualified) {
                let filler = self.required(cursor, node, filler_predicate)?;
                return Ok(Some((bound, cardinality(value.as_ref())?, Some(filler))));
            }
        }
        Ok(None)
    }

    fn object_property_expression(
        &self,
        cursor: &mut Cursor,
        term: TermRef<'_>,
    ) -> Result<ObjectPropertyExpression, AxiomError> {
        match term {
            TermRef::NamedNode(iri) => Ok(ObjectPropertyExpression::ObjectProperty(iri.into())),
            TermRef::BlankNode(b) => {
                let inverse = self.required(cursor, b.into(), owl::INVERSE_OF)?;
                Ok(ObjectPropertyExpression::inverse(named(inverse.as_ref())?))
            }
            _ => Err(AxiomError::malformed(
                term,
                "not an object property expression",
            )),
        }
    }

    fn data_range(&self, cursor: &mut Cursor, term: TermRef<'_>) -> Result<DataRange, AxiomError> {
        let node = match term {
            TermRef::NamedNode(iri) => return Ok(DataRange::datatype(iri)),
            TermRef::BlankNode(b) => NamedOrBlankNodeRef::from(b),
            _ => return Err(AxiomError::malformed(term, "not a data range")),
        };
        self.enter(cursor, term)?;
        self.record_type(cursor, node, rdfs::DATATYPE);
        let range = if let Some(list) = self.record(cursor, node, owl::INTERSECTION_OF) {
            DataRange::DataIntersectionOf(self.data_ranges(cursor, list.as_ref())?)
        } else if let Some(list) = self.record(cursor, node, owl::UNION_OF) {
            DataRange::DataUnionOf(self.data_ranges(cursor, list.as_ref())?)
        } else if let Some(operand) = self.record(cursor, node, owl::DATATYPE_COMPLEMENT_OF) {
            DataRange::DataComplementOf(Box::new(self.data_range(cursor, operand.as_ref())?))
        } else if let Some(list) = self.record(cursor, node, owl::ONE_OF) {
            DataRange::DataOneOf(
                self.list(cursor, list.as_ref())?
                    .iter()
                    .map(|v| literal(v.as_ref()))
                    .collect::<Result<_, _>>()?,
            )
        } else if let Some(datatype) = self.record(cursor, node, owl::ON_DATATYPE) {
            let datatype = named(datatype.as_ref())?;
            let restrictions = self.required(cursor, node, owl::WITH_RESTRICTIONS)?;
            let mut facets = Vec::new();
            for item in self.list(cursor, restrictions.as_ref())? {
                let Some(restriction) = to_subject(item.as_ref()) else {
                    return Err(AxiomError::malformed(item, "not a facet restriction"));
                };
                let facets_found = self.graph.find(Some(restriction), None, None);
                let facet = match <[Triple; 1]>::try_from(facets_found) {
                    Ok([facet]) => facet,
                    Err(found) if found.is_empty() => {
                        return Err(AxiomError::malformed(restriction, "empty facet restriction"));
                    }
                    Err(_) => {
                        return Err(AxiomError::malformed(
                            restriction,
                            "a facet restriction must have a single facet",
                        ));
                    }
                };
                facets.push((facet.predicate.clone(), literal(facet.object.as_ref())?));
                cursor.triples.push(facet);
            }
            DataRange::DatatypeRestriction {
                datatype: datatype.into(),
                facets,
            }
        } else {
            return Err(AxiomError::malformed(term, "not a data range"));
        };
        cursor.visiting.remove(&term.into_owned());
        Ok(range)
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Min,
    Max,
    Exact,
}

fn named(term: TermRef<'_>) -> Result<NamedNode, AxiomError> {
    match term {
        TermRef::NamedNode(iri) => Ok(iri.into_owned()),
        _ => Err(AxiomError::malformed(term, "an IRI is expected")),
    }
}

fn individual(term: TermRef<'_>) -> Result<Individual, AxiomError> {
    Individual::from_term(term)
        .ok_or_else(|| AxiomError::malformed(term, "an individual is expected"))
}

fn literal(term: TermRef<'_>) -> Result<Literal, AxiomError> {
    match term {
        TermRef::Literal(value) => Ok(value.into_owned()),
        _ => Err(AxiomError::malformed(term, "a literal is expected")),
    }
}

fn cardinality(term: TermRef<'_>) -> Result<u32, AxiomError> {
    match term {
        TermRef::Literal(value) => value
            .value()
            .parse()
            .map_err(|_| AxiomError::malformed(term, "invalid cardinality")),
        _ => Err(AxiomError::malformed(term, "a cardinality literal is expected")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::OwlClass;
    use crate::translate::AxiomWriter;
    use oxrdf::BlankNode;

    const XSD_MIN_INCLUSIVE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#minInclusive");
    const XSD_MAX_INCLUSIVE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2001/XMLSchema#maxInclusive");

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn write(graph: &mut UnionGraph, axiom: &AnnotatedAxiom) -> Footprint {
        let footprint = AxiomWriter::footprint(axiom).unwrap();
        for triple in footprint.triples() {
            graph.insert(triple).unwrap();
        }
        footprint
    }

    fn read_back(axiom: AnnotatedAxiom, declarations: &[Axiom]) {
        let mut graph = UnionGraph::new();
        for declaration in declarations {
            write(&mut graph, &declaration.clone().into());
        }
        let footprint = write(&mut graph, &axiom);
        let reader = AxiomReader::new(&graph, &OntologyConfig::default());
        let read = reader.axioms_at(footprint.main());
        assert_eq!(read.len(), 1, "{axiom} read as {read:?}");
        assert_eq!(read[0].0, axiom);
        let mut expected = footprint.into_triples();
        let mut actual = read[0].1.clone().into_triples();
        expected.sort_by_cached_key(ToString::to_string);
        actual.sort_by_cached_key(ToString::to_string);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_subclass_of_restriction() {
        read_back(
            Axiom::subclass_of(
                ex("A"),
                ClassExpression::some_values_from(
                    ObjectPropertyExpression::inverse(ex("p")),
                    ClassExpression::union(vec![ex("B").into(), ex("C").into()]),
                ),
            )
            .into(),
            &[Axiom::DeclareObjectProperty(ex("p").into())],
        );
    }

    #[test]
    fn test_qualified_data_cardinality() {
        read_back(
            Axiom::subclass_of(
                ex("A"),
                ClassExpression::DataMaxCardinality {
                    cardinality: 2,
                    property: ex("age").into(),
                    filler: Some(DataRange::DatatypeRestriction {
                        datatype: oxrdf::vocab::xsd::INTEGER.into(),
                        facets: vec![(
                            XSD_MIN_INCLUSIVE.into_owned(),
                            Literal::from(0),
                        )],
                    }),
                },
            )
            .into(),
            &[Axiom::DeclareDataProperty(ex("age").into())],
        );
    }

    #[test]
    fn test_facet_restriction_with_two_facets_is_malformed() {
        let mut graph = UnionGraph::new();
        write(&mut graph, &Axiom::DeclareDataProperty(ex("age").into()).into());
        let footprint = write(
            &mut graph,
            &Axiom::subclass_of(
                ex("A"),
                ClassExpression::DataSomeValuesFrom {
                    property: ex("age").into(),
                    filler: DataRange::DatatypeRestriction {
                        datatype: oxrdf::vocab::xsd::INTEGER.into(),
                        facets: vec![(
                            XSD_MIN_INCLUSIVE.into_owned(),
                            Literal::from(0),
                        )],
                    },
                },
            )
            .into(),
        );
        let facet = footprint
            .triples()
            .iter()
            .find(|t| t.predicate == XSD_MIN_INCLUSIVE)
            .unwrap()
            .subject
            .clone();
        let config = OntologyConfig::default();
        assert_eq!(
            AxiomReader::new(&graph, &config)
                .axioms_at(footprint.main())
                .len(),
            1
        );

        graph
            .insert(&Triple::new(
                facet,
                XSD_MAX_INCLUSIVE,
                Literal::from(9),
            ))
            .unwrap();
        assert!(AxiomReader::new(&graph, &config)
            .axioms_at(footprint.main())
            .is_empty());
    }

    #[test]
    fn test_annotated_axiom() {
        read_back(
            AnnotatedAxiom::new(
                Axiom::subclass_of(ex("A"), ex("B")),
                vec![
                    Annotation::new(rdfs::LABEL, Literal::from("x")),
                    Annotation::new(rdfs::COMMENT, Literal::from("y")),
                ],
            ),
            &[],
        );
    }

    #[test]
    fn test_rooted_axioms() {
        read_back(
            AnnotatedAxiom::new(
                Axiom::disjoint_classes(vec![ex("A").into(), ex("B").into(), ex("C").into()]),
                vec![Annotation::new(rdfs::LABEL, Literal::from("x"))],
            ),
            &[],
        );
        read_back(
            Axiom::NegativeDataPropertyAssertion {
                property: ex("age").into(),
                source: ex("alice").into(),
                target: Literal::from(3),
            }
            .into(),
            &[Axiom::DeclareDataProperty(ex("age").into())],
        );
        read_back(
            Axiom::DifferentIndividuals(vec![
                ex("a").into(),
                ex("b").into(),
                BlankNode::default().into(),
            ])
            .into(),
            &[],
        );
    }

    #[test]
    fn test_property_assertions_follow_declarations() {
        read_back(
            Axiom::object_property_assertion(ex("knows"), ex("alice"), ex("bob")).into(),
            &[Axiom::DeclareObjectProperty(ex("knows").into())],
        );
        read_back(
            Axiom::annotation_assertion(ex("note"), ex("alice"), ex("bob")).into(),
            &[Axiom::DeclareAnnotationProperty(ex("note").into())],
        );
    }

    #[test]
    fn test_undeclared_property_yields_nothing() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("alice"), ex("knows"), ex("bob")))
            .unwrap();
        let reader = AxiomReader::new(&graph, &OntologyConfig::default());
        assert!(reader
            .axioms_at(&Triple::new(ex("alice"), ex("knows"), ex("bob")))
            .is_empty());
    }

    #[test]
    fn test_structure_is_not_read_as_axioms() {
        let mut graph = UnionGraph::new();
        write(
            &mut graph,
            &AnnotatedAxiom::new(
                Axiom::subclass_of(
                    ex("A"),
                    ClassExpression::intersection(vec![ex("B").into(), ex("C").into()]),
                ),
                vec![Annotation::new(rdfs::LABEL, Literal::from("x"))],
            ),
        );
        let reader = AxiomReader::new(&graph, &OntologyConfig::default());
        let axioms = reader.scan();
        assert_eq!(axioms.len(), 1);
        assert_eq!(axioms[0].0.axiom_type(), crate::AxiomType::SubClassOf);
    }

    #[test]
    fn test_header_is_not_read() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("onto"), rdf::TYPE, owl::ONTOLOGY))
            .unwrap();
        graph
            .insert(&Triple::new(ex("onto"), rdfs::LABEL, Literal::from("x")))
            .unwrap();
        graph
            .insert(&Triple::new(ex("A"), rdf::TYPE, owl::CLASS))
            .unwrap();
        let reader = AxiomReader::new(&graph, &OntologyConfig::default());
        let axioms: Vec<_> = reader.scan().into_iter().map(|(a, _)| a).collect();
        assert_eq!(
            axioms,
            vec![AnnotatedAxiom::from(Axiom::DeclareClass(OwlClass::new(ex("A"))))]
        );
    }
}
