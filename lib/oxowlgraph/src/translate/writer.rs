use crate::axiom::{AnnotatedAxiom, Annotation, Axiom};
use crate::entity::{DataProperty, Individual, ObjectProperty};
use crate::error::AxiomError;
use crate::expression::{ClassExpression, DataRange, ObjectPropertyExpression};
use crate::translate::Footprint;
use crate::vocab::owl;
use oxrdf::vocab::{rdf, rdfs, xsd};
use oxrdf::{BlankNode, Literal, NamedNodeRef, NamedOrBlankNode, Term, Triple};

/// Computes the triples encoding an axiom.
///
/// Anonymous class expressions, data ranges, lists and annotation reifications get fresh blank
/// nodes, so writing the same axiom twice gives two different footprints.
///
/// ```
/// use oxowlgraph::translate::AxiomWriter;
/// use oxowlgraph::Axiom;
/// use oxrdf::vocab::rdfs;
/// use oxrdf::NamedNode;
///
/// let a = NamedNode::new("http://example.com/A")?;
/// let b = NamedNode::new("http://example.com/B")?;
/// let footprint = AxiomWriter::footprint(&Axiom::subclass_of(a, b).into())?;
/// assert_eq!(footprint.len(), 1);
/// assert_eq!(footprint.main().predicate, rdfs::SUB_CLASS_OF);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default)]
pub struct AxiomWriter {
    triples: Vec<Triple>,
}

/// Where the axiom annotations have to go.
enum Written {
    /// A single triple, annotations are reified with an `owl:Axiom` node.
    Plain(Triple),
    /// A blank node typed with an axiom class, annotations are put on the node itself.
    Rooted { root: BlankNode, main: Triple },
}

impl AxiomWriter {
    /// Returns the footprint of the axiom without touching any graph.
    pub fn footprint(axiom: &AnnotatedAxiom) -> Result<Footprint, AxiomError> {
        let mut writer = Self::default();
        let main = match writer.write_axiom(axiom.axiom())? {
            Written::Plain(main) => {
                if axiom.is_annotated() {
                    writer.reify(&main, axiom.annotations());
                }
                main
            }
            Written::Rooted { root, main } => {
                writer.annotate(root.into(), axiom.annotations());
                main
            }
        };
        Ok(Footprint::new(main, writer.triples))
    }

    fn emit(
        &mut self,
        subject: impl Into<NamedOrBlankNode>,
        predicate: NamedNodeRef<'_>,
        object: impl Into<Term>,
    ) -> Triple {
        let triple = Triple::new(subject, predicate, object);
        self.triples.push(triple.clone());
        triple
    }

    fn plain(
        &mut self,
        subject: impl Into<NamedOrBlankNode>,
        predicate: NamedNodeRef<'_>,
        object: impl Into<Term>,
    ) -> Result<Written, AxiomError> {
        Ok(Written::Plain(self.emit(subject, predicate, object)))
    }

    fn rooted(&mut self, class: NamedNodeRef<'_>) -> (BlankNode, Triple) {
        let root = BlankNode::default();
        let main = self.emit(root.clone(), rdf::TYPE, class);
        (root, main)
    }

    fn reify(&mut self, main: &Triple, annotations: &[Annotation]) {
        let node = BlankNode::default();
        self.emit(node.clone(), rdf::TYPE, owl::AXIOM);
        self.emit(node.clone(), owl::ANNOTATED_SOURCE, main.subject.clone());
        self.emit(node.clone(), owl::ANNOTATED_PROPERTY, main.predicate.clone());
        self.emit(node.clone(), owl::ANNOTATED_TARGET, main.object.clone());
        self.annotate(node.into(), annotations);
    }

    fn annotate(&mut self, subject: NamedOrBlankNode, annotations: &[Annotation]) {
        for annotation in annotations {
            self.emit(
                subject.clone(),
                annotation.property.as_ref(),
                annotation.value.clone(),
            );
        }
    }

    fn write_axiom(&mut self, axiom: &Axiom) -> Result<Written, AxiomError> {
        match axiom {
            Axiom::DeclareClass(c) => self.plain(c.iri().clone(), rdf::TYPE, owl::CLASS),
            Axiom::DeclareDatatype(d) => self.plain(d.iri().clone(), rdf::TYPE, rdfs::DATATYPE),
            Axiom::DeclareObjectProperty(p) => {
                self.plain(p.iri().clone(), rdf::TYPE, owl::OBJECT_PROPERTY)
            }
            Axiom::DeclareDataProperty(p) => {
                self.plain(p.iri().clone(), rdf::TYPE, owl::DATATYPE_PROPERTY)
            }
            Axiom::DeclareAnnotationProperty(p) => {
                self.plain(p.iri().clone(), rdf::TYPE, owl::ANNOTATION_PROPERTY)
            }
            Axiom::DeclareNamedIndividual(i) => {
                self.plain(i.clone(), rdf::TYPE, owl::NAMED_INDIVIDUAL)
            }

            Axiom::SubClassOf {
                sub_class,
                super_class,
            } => {
                let sub = self.class_expression(axiom, sub_class)?;
                let sup = self.class_expression(axiom, super_class)?;
                self.plain(sub, rdfs::SUB_CLASS_OF, sup)
            }
            Axiom::EquivalentClasses(classes) => {
                let [first, second] = pair(axiom, classes)?;
                let first = self.class_expression(axiom, first)?;
                let second = self.class_expression(axiom, second)?;
                self.plain(first, owl::EQUIVALENT_CLASS, second)
            }
            Axiom::DisjointClasses(classes) => {
                at_least(axiom, classes, 2)?;
                if let [first, second] = classes.as_slice() {
                    let first = self.class_expression(axiom, first)?;
                    let second = self.class_expression(axiom, second)?;
                    return self.plain(first, owl::DISJOINT_WITH, second);
                }
                let members = classes
                    .iter()
                    .map(|c| self.class_expression(axiom, c).map(Term::from))
                    .collect::<Result<Vec<_>, _>>()?;
                let (root, main) = self.rooted(owl::ALL_DISJOINT_CLASSES);
                let list = self.list(members);
                self.emit(root.clone(), owl::MEMBERS, list);
                Ok(Written::Rooted { root, main })
            }
            Axiom::DisjointUnion {
                class,
                disjoint_classes,
            } => {
                at_least(axiom, disjoint_classes, 1)?;
                let members = disjoint_classes
                    .iter()
                    .map(|c| self.class_expression(axiom, c).map(Term::from))
                    .collect::<Result<Vec<_>, _>>()?;
                let list = self.list(members);
                self.plain(class.iri().clone(), owl::DISJOINT_UNION_OF, list)
            }

            Axiom::SubObjectPropertyOf {
                sub_property,
                super_property,
            } => {
                let sub = self.object_property_expression(sub_property);
                let sup = self.object_property_expression(super_property);
                self.plain(sub, rdfs::SUB_PROPERTY_OF, sup)
            }
            Axiom::SubPropertyChainOf {
                property_chain,
                super_property,
            } => {
                at_least(axiom, property_chain, 2)?;
                let chain = property_chain
                    .iter()
                    .map(|p| Term::from(self.object_property_expression(p)))
                    .collect();
                let list = self.list(chain);
                self.plain(super_property.iri().clone(), owl::PROPERTY_CHAIN_AXIOM, list)
            }
            Axiom::EquivalentObjectProperties(properties) => {
                let [first, second] = pair(axiom, properties)?;
                self.plain(
                    first.iri().clone(),
                    owl::EQUIVALENT_PROPERTY,
                    second.iri().clone(),
                )
            }
            Axiom::DisjointObjectProperties(properties) => {
                let members = properties
                    .iter()
                    .map(|p| Term::from(p.iri().clone()))
                    .collect();
                self.disjoint_properties(axiom, members)
            }
            Axiom::ObjectPropertyDomain { property, domain } => {
                let domain = self.class_expression(axiom, domain)?;
                self.plain(property.iri().clone(), rdfs::DOMAIN, domain)
            }
            Axiom::ObjectPropertyRange { property, range } => {
                let range = self.class_expression(axiom, range)?;
                self.plain(property.iri().clone(), rdfs::RANGE, range)
            }
            Axiom::InverseObjectProperties(first, second) => {
                self.plain(first.iri().clone(), owl::INVERSE_OF, second.iri().clone())
            }
            Axiom::FunctionalObjectProperty(p) => self.characteristic(p, owl::FUNCTIONAL_PROPERTY),
            Axiom::InverseFunctionalObjectProperty(p) => {
                self.characteristic(p, owl::INVERSE_FUNCTIONAL_PROPERTY)
            }
            Axiom::ReflexiveObjectProperty(p) => self.characteristic(p, owl::REFLEXIVE_PROPERTY),
            Axiom::IrreflexiveObjectProperty(p) => {
                self.characteristic(p, owl::IRREFLEXIVE_PROPERTY)
            }
            Axiom::SymmetricObjectProperty(p) => self.characteristic(p, owl::SYMMETRIC_PROPERTY),
            Axiom::AsymmetricObjectProperty(p) => {
                self.characteristic(p, owl::ASYMMETRIC_PROPERTY)
            }
            Axiom::TransitiveObjectProperty(p) => {
                self.characteristic(p, owl::TRANSITIVE_PROPERTY)
            }

            Axiom::SubDataPropertyOf {
                sub_property,
                super_property,
            } => self.plain(
                sub_property.iri().clone(),
                rdfs::SUB_PROPERTY_OF,
                super_property.iri().clone(),
            ),
            Axiom::EquivalentDataProperties(properties) => {
                let [first, second] = pair(axiom, properties)?;
                self.plain(
                    first.iri().clone(),
                    owl::EQUIVALENT_PROPERTY,
                    second.iri().clone(),
                )
            }
            Axiom::DisjointDataProperties(properties) => {
                let members = properties
                    .iter()
                    .map(|p| Term::from(p.iri().clone()))
                    .collect();
                self.disjoint_properties(axiom, members)
            }
            Axiom::DataPropertyDomain { property, domain } => {
                let domain = self.class_expression(axiom, domain)?;
                self.plain(property.iri().clone(), rdfs::DOMAIN, domain)
            }
            Axiom::DataPropertyRange { property, range } => {
                let range = self.data_range(axiom, range)?;
                self.plain(property.iri().clone(), rdfs::RANGE, range)
            }
            Axiom::FunctionalDataProperty(p) => {
                self.plain(p.iri().clone(), rdf::TYPE, owl::FUNCTIONAL_PROPERTY)
            }
            Axiom::DatatypeDefinition { datatype, range } => {
                let range = self.data_range(axiom, range)?;
                self.plain(datatype.iri().clone(), owl::EQUIVALENT_CLASS, range)
            }

            Axiom::ClassAssertion { class, individual } => {
                let class = self.class_expression(axiom, class)?;
                self.plain(individual.clone(), rdf::TYPE, class)
            }
            Axiom::ObjectPropertyAssertion {
                property,
                source,
                target,
            } => self.plain(source.clone(), property.as_ref(), target.clone()),
            Axiom::NegativeObjectPropertyAssertion {
                property,
                source,
                target,
            } => Ok(self.negative_assertion(
                source,
                property.iri().clone().into(),
                owl::TARGET_INDIVIDUAL,
                target.clone().into(),
            )),
            Axiom::DataPropertyAssertion {
                property,
                source,
                target,
            } => self.plain(source.clone(), property.as_ref(), target.clone()),
            Axiom::NegativeDataPropertyAssertion {
                property,
                source,
                target,
            } => Ok(self.negative_assertion(
                source,
                property.iri().clone().into(),
                owl::TARGET_VALUE,
                target.clone().into(),
            )),
            Axiom::SameIndividual(individuals) => {
                let [first, second] = pair(axiom, individuals)?;
                self.plain(first.clone(), owl::SAME_AS, second.clone())
            }
            Axiom::DifferentIndividuals(individuals) => {
                at_least(axiom, individuals, 2)?;
                if let [first, second] = individuals.as_slice() {
                    return self.plain(first.clone(), owl::DIFFERENT_FROM, second.clone());
                }
                let members = individuals.iter().cloned().map(Term::from).collect();
                let (root, main) = self.rooted(owl::ALL_DIFFERENT);
                let list = self.list(members);
                self.emit(root.clone(), owl::MEMBERS, list);
                Ok(Written::Rooted { root, main })
            }

            Axiom::HasKey {
                class,
                object_properties,
                data_properties,
            } => {
                if object_properties.is_empty() && data_properties.is_empty() {
                    return Err(AxiomError::malformed(axiom, "a key needs at least one property"));
                }
                let class = self.class_expression(axiom, class)?;
                let keys = object_properties
                    .iter()
                    .map(|p| Term::from(p.iri().clone()))
                    .chain(data_properties.iter().map(|p| Term::from(p.iri().clone())))
                    .collect();
                let list = self.list(keys);
                self.plain(class, owl::HAS_KEY, list)
            }

            Axiom::AnnotationAssertion {
                property,
                subject,
                value,
            } => self.plain(subject.clone(), property.as_ref(), value.clone()),
            Axiom::SubAnnotationPropertyOf {
                sub_property,
                super_property,
            } => self.plain(
                sub_property.iri().clone(),
                rdfs::SUB_PROPERTY_OF,
                super_property.iri().clone(),
            ),
            Axiom::AnnotationPropertyDomain { property, domain } => {
                self.plain(property.iri().clone(), rdfs::DOMAIN, domain.clone())
            }
            Axiom::AnnotationPropertyRange { property, range } => {
                self.plain(property.iri().clone(), rdfs::RANGE, range.clone())
            }
        }
    }

    fn characteristic(
        &mut self,
        property: &ObjectProperty,
        characteristic: NamedNodeRef<'_>,
    ) -> Result<Written, AxiomError> {
        self.plain(property.iri().clone(), rdf::TYPE, characteristic)
    }

    fn disjoint_properties(
        &mut self,
        axiom: &Axiom,
        members: Vec<Term>,
    ) -> Result<Written, AxiomError> {
        at_least(axiom, &members, 2)?;
        if let [Term::NamedNode(first), second] = members.as_slice() {
            return self.plain(first.clone(), owl::PROPERTY_DISJOINT_WITH, second.clone());
        }
        let (root, main) = self.rooted(owl::ALL_DISJOINT_PROPERTIES);
        let list = self.list(members);
        self.emit(root.clone(), owl::MEMBERS, list);
        Ok(Written::Rooted { root, main })
    }

    fn negative_assertion(
        &mut self,
        source: &Individual,
        property: Term,
        target_predicate: NamedNodeRef<'_>,
        target: Term,
    ) -> Written {
        let (root, main) = self.rooted(owl::NEGATIVE_PROPERTY_ASSERTION);
        self.emit(root.clone(), owl::SOURCE_INDIVIDUAL, source.clone());
        self.emit(root.clone(), owl::ASSERTION_PROPERTY, property);
        self.emit(root.clone(), target_predicate, target);
        Written::Rooted { root, main }
    }

    /// Builds an RDF list back to front and returns its head.
    fn list(&mut self, items: Vec<Term>) -> Term {
        let mut current = Term::from(rdf::NIL);
        for item in items.into_iter().rev() {
            let cell = BlankNode::default();
            self.emit(cell.clone(), rdf::FIRST, item);
            self.emit(cell.clone(), rdf::REST, current);
            current = cell.into();
        }
        current
    }

    fn object_property_expression(
        &mut self,
        expression: &ObjectPropertyExpression,
    ) -> NamedOrBlankNode {
        match expression {
            ObjectPropertyExpression::ObjectProperty(p) => p.iri().clone().into(),
            ObjectPropertyExpression::ObjectInverseOf(p) => {
                let node = BlankNode::default();
                self.emit(node.clone(), owl::INVERSE_OF, p.iri().clone());
                node.into()
            }
        }
    }

    fn class_expression(
        &mut self,
        axiom: &Axiom,
        expression: &ClassExpression,
    ) -> Result<NamedOrBlankNode, AxiomError> {
        let node = match expression {
            ClassExpression::Class(c) => return Ok(c.iri().clone().into()),
            ClassExpression::ObjectIntersectionOf(operands) => {
                self.class_combination(axiom, owl::INTERSECTION_OF, operands)?
            }
            ClassExpression::ObjectUnionOf(operands) => {
                self.class_combination(axiom, owl::UNION_OF, operands)?
            }
            ClassExpression::ObjectComplementOf(operand) => {
                let operand = self.class_expression(axiom, operand)?;
                let node = self.anonymous(owl::CLASS);
                self.emit(node.clone(), owl::COMPLEMENT_OF, operand);
                node
            }
            ClassExpression::ObjectOneOf(individuals) => {
                at_least(axiom, individuals, 1)?;
                let node = self.anonymous(owl::CLASS);
                let list = self.list(individuals.iter().cloned().map(Term::from).collect());
                self.emit(node.clone(), owl::ONE_OF, list);
                node
            }
            ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                let filler = self.class_expression(axiom, filler)?;
                let node = self.object_restriction(property);
                self.emit(node.clone(), owl::SOME_VALUES_FROM, filler);
                node
            }
            ClassExpression::ObjectAllValuesFrom { property, filler } => {
                let filler = self.class_expression(axiom, filler)?;
                let node = self.object_restriction(property);
                self.emit(node.clone(), owl::ALL_VALUES_FROM, filler);
                node
            }
            ClassExpression::ObjectHasValue {
                property,
                individual,
            } => {
                let node = self.object_restriction(property);
                self.emit(node.clone(), owl::HAS_VALUE, individual.clone());
                node
            }
            ClassExpression::ObjectHasSelf(property) => {
                let node = self.object_restriction(property);
                self.emit(node.clone(), owl::HAS_SELF, Literal::from(true));
                node
            }
            ClassExpression::ObjectMinCardinality {
                cardinality,
                property,
                filler,
            } => self.object_cardinality(
                axiom,
                property,
                *cardinality,
                filler.as_deref(),
                owl::MIN_CARDINALITY,
                owl::MIN_QUALIFIED_CARDINALITY,
            )?,
            ClassExpression::ObjectMaxCardinality {
                cardinality,
                property,
                filler,
            } => self.object_cardinality(
                axiom,
                property,
                *cardinality,
                filler.as_deref(),
                owl::MAX_CARDINALITY,
                owl::MAX_QUALIFIED_CARDINALITY,
            )?,
            ClassExpression::ObjectExactCardinality {
                cardinality,
                property,
                filler,
            } => self.object_cardinality(
                axiom,
                property,
                *cardinality,
                filler.as_deref(),
                owl::CARDINALITY,
                owl::QUALIFIED_CARDINALITY,
            )?,
            ClassExpression::DataSomeValuesFrom { property, filler } => {
                let filler = self.data_range(axiom, filler)?;
                let node = self.data_restriction(property);
                self.emit(node.clone(), owl::SOME_VALUES_FROM, filler);
                node
            }
            ClassExpression::DataAllValuesFrom { property, filler } => {
                let filler = self.data_range(axiom, filler)?;
                let node = self.data_restriction(property);
                self.emit(node.clone(), owl::ALL_VALUES_FROM, filler);
                node
            }
            ClassExpression::DataHasValue { property, value } => {
                let node = self.data_restriction(property);
                self.emit(node.clone(), owl::HAS_VALUE, value.clone());
                node
            }
            ClassExpression::DataMinCardinality {
                cardinality,
                property,
                filler,
            } => self.data_cardinality(
                axiom,
                property,
                *cardinality,
                filler.as_ref(),
                owl::MIN_CARDINALITY,
                owl::MIN_QUALIFIED_CARDINALITY,
            )?,
            ClassExpression::DataMaxCardinality {
                cardinality,
                property,
                filler,
            } => self.data_cardinality(
                axiom,
                property,
                *cardinality,
                filler.as_ref(),
                owl::MAX_CARDINALITY,
                owl::MAX_QUALIFIED_CARDINALITY,
            )?,
            ClassExpression::DataExactCardinality {
                cardinality,
                property,
                filler,
            } => self.data_cardinality(
                axiom,
                property,
                *cardinality,
                filler.as_ref(),
                owl::CARDINALITY,
                owl::QUALIFIED_CARDINALITY,
            )?,
        };
        Ok(node.into())
    }

    fn anonymous(&mut self, class: NamedNodeRef<'_>) -> BlankNode {
        let node = BlankNode::default();
        self.emit(node.clone(), rdf::TYPE, class);
        node
    }

    fn class_combination(
        &mut self,
        axiom: &Axiom,
        predicate: NamedNodeRef<'_>,
        operands: &[ClassExpression],
    ) -> Result<BlankNode, AxiomError> {
        at_least(axiom, operands, 1)?;
        let operands = operands
            .iter()
            .map(|c| self.class_expression(axiom, c).map(Term::from))
            .collect::<Result<Vec<_>, _>>()?;
        let node = self.anonymous(owl::CLASS);
        let list = self.list(operands);
        self.emit(node.clone(), predicate, list);
        Ok(node)
    }

    fn object_restriction(&mut self, property: &ObjectPropertyExpression) -> BlankNode {
        let property = self.object_property_expression(property);
        let node = self.anonymous(owl::RESTRICTION);
        self.emit(node.clone(), owl::ON_PROPERTY, property);
        node
    }

    fn data_restriction(&mut self, property: &DataProperty) -> BlankNode {
        let node = self.anonymous(owl::RESTRICTION);
        self.emit(node.clone(), owl::ON_PROPERTY, property.iri().clone());
        node
    }

    fn object_cardinality(
        &mut self,
        axiom: &Axiom,
        property: &ObjectPropertyExpression,
        cardinality: u32,
        filler: Option<&ClassExpression>,
        unqualified: NamedNodeRef<'_>,
        qualified: NamedNodeRef<'_>,
    ) -> Result<BlankNode, AxiomError> {
        let filler = filler
            .map(|f| self.class_expression(axiom, f))
            .transpose()?;
        let node = self.object_restriction(property);
        if let Some(filler) = filler {
            self.emit(node.clone(), qualified, cardinality_literal(cardinality));
            self.emit(node.clone(), owl::ON_CLASS, filler);
        } else {
            self.emit(node.clone(), unqualified, cardinality_literal(cardinality));
        }
        Ok(node)
    }

    fn data_cardinality(
        &mut self,
        axiom: &Axiom,
        property: &DataProperty,
        cardinality: u32,
        filler: Option<&DataRange>,
        unqualified: NamedNodeRef<'_>,
        qualified: NamedNodeRef<'_>,
    ) -> Result<BlankNode, AxiomError> {
        let filler = filler.map(|f| self.data_range(axiom, f)).transpose()?;
        let node = self.data_restriction(property);
        if let Some(filler) = filler {
            self.emit(node.clone(), qualified, cardinality_literal(cardinality));
            self.emit(node.clone(), owl::ON_DATA_RANGE, filler);
        } else {
            self.emit(node.clone(), unqualified, cardinality_literal(cardinality));
        }
        Ok(node)
    }

    fn data_range(&mut self, axiom: &Axiom, range: &DataRange) -> Result<Term, AxiomError> {
        let node = match range {
            DataRange::Datatype(d) => return Ok(d.iri().clone().into()),
            DataRange::DataIntersectionOf(operands) => {
                self.data_combination(axiom, owl::INTERSECTION_OF, operands)?
            }
            DataRange::DataUnionOf(operands) => {
                self.data_combination(axiom, owl::UNION_OF, operands)?
            }
            DataRange::DataComplementOf(operand) => {
                let operand = self.data_range(axiom, operand)?;
                let node = self.anonymous(rdfs::DATATYPE);
                self.emit(node.clone(), owl::DATATYPE_COMPLEMENT_OF, operand);
                node
            }
            DataRange::DataOneOf(values) => {
                at_least(axiom, values, 1)?;
                let node = self.anonymous(rdfs::DATATYPE);
                let list = self.list(values.iter().cloned().map(Term::from).collect());
                self.emit(node.clone(), owl::ONE_OF, list);
                node
            }
            DataRange::DatatypeRestriction { datatype, facets } => {
                at_least(axiom, facets, 1)?;
                let node = self.anonymous(rdfs::DATATYPE);
                self.emit(node.clone(), owl::ON_DATATYPE, datatype.iri().clone());
                let facets = facets
                    .iter()
                    .map(|(facet, value)| {
                        let restriction = BlankNode::default();
                        self.emit(restriction.clone(), facet.as_ref(), value.clone());
                        Term::from(restriction)
                    })
                    .collect();
                let list = self.list(facets);
                self.emit(node.clone(), owl::WITH_RESTRICTIONS, list);
                node
            }
        };
        Ok(node.into())
    }

    fn data_combination(
        &mut self,
        axiom: &Axiom,
        predicate: NamedNodeRef<'_>,
        operands: &[DataRange],
    ) -> Result<BlankNode, AxiomError> {
        at_least(axiom, operands, 1)?;
        let operands = operands
            .iter()
            .map(|d| self.data_range(axiom, d))
            .collect::<Result<Vec<_>, _>>()?;
        let node = self.anonymous(rdfs::DATATYPE);
        let list = self.list(operands);
        self.emit(node.clone(), predicate, list);
        Ok(node)
    }
}

fn cardinality_literal(cardinality: u32) -> Literal {
    Literal::new_typed_literal(cardinality.to_string(), xsd::NON_NEGATIVE_INTEGER)
}

fn at_least<T>(axiom: &Axiom, items: &[T], min: usize) -> Result<(), AxiomError> {
    if items.len() < min {
        return Err(AxiomError::malformed(
            axiom,
            format!("expected at least {min} operands, found {}", items.len()),
        ));
    }
    Ok(())
}

/// Pairwise axioms are stored as a single triple and so take exactly two operands.
fn pair<'a, T>(axiom: &Axiom, items: &'a [T]) -> Result<[&'a T; 2], AxiomError> {
    match items {
        [first, second] => Ok([first, second]),
        _ => Err(AxiomError::malformed(
            axiom,
            format!("expected exactly 2 operands, found {}", items.len()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::OwlClass;
    use oxrdf::NamedNode;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    #[test]
    fn test_declaration() {
        let footprint =
            AxiomWriter::footprint(&Axiom::DeclareClass(OwlClass::new(ex("A"))).into()).unwrap();
        assert_eq!(
            footprint.main(),
            &Triple::new(ex("A"), rdf::TYPE, owl::CLASS)
        );
        assert_eq!(footprint.len(), 1);
    }

    #[test]
    fn test_restriction_footprint() {
        let axiom = Axiom::subclass_of(
            ex("A"),
            ClassExpression::some_values_from(ObjectProperty::new(ex("p")), ex("B").into()),
        );
        let footprint = AxiomWriter::footprint(&axiom.into()).unwrap();
        // main + type + onProperty + someValuesFrom
        assert_eq!(footprint.len(), 4);
        assert_eq!(footprint.main().predicate, rdfs::SUB_CLASS_OF);
        assert!(footprint.main().object.is_blank_node());
    }

    #[test]
    fn test_annotations_are_reified() {
        let axiom = AnnotatedAxiom::new(
            Axiom::subclass_of(ex("A"), ex("B")),
            vec![Annotation::new(rdfs::LABEL, Literal::from("x"))],
        );
        let footprint = AxiomWriter::footprint(&axiom).unwrap();
        assert_eq!(footprint.len(), 6);
        assert_eq!(
            footprint
                .triples()
                .iter()
                .filter(|t| t.object == Term::from(owl::AXIOM))
                .count(),
            1
        );
    }

    #[test]
    fn test_many_disjoint_classes_use_a_root() {
        let axiom = Axiom::disjoint_classes(vec![ex("A").into(), ex("B").into(), ex("C").into()]);
        let footprint = AxiomWriter::footprint(&axiom.into()).unwrap();
        assert_eq!(footprint.main().predicate, rdf::TYPE);
        assert_eq!(
            footprint.main().object,
            Term::from(owl::ALL_DISJOINT_CLASSES)
        );
        // root type + members + 3 list cells
        assert_eq!(footprint.len(), 8);
    }

    #[test]
    fn test_malformed_operands() {
        assert!(matches!(
            AxiomWriter::footprint(&Axiom::EquivalentClasses(vec![ex("A").into()]).into()),
            Err(AxiomError::Malformed { .. })
        ));
        assert!(matches!(
            AxiomWriter::footprint(
                &Axiom::EquivalentClasses(vec![ex("A").into(), ex("B").into(), ex("C").into()])
                    .into()
            ),
            Err(AxiomError::Malformed { .. })
        ));
        assert!(AxiomWriter::footprint(&Axiom::DifferentIndividuals(Vec::new()).into()).is_err());
    }
}
