use crate::classifier::Classifier;
use crate::error::ViewError;
use crate::graph::UnionGraph;
use crate::view::factory::{CommonFactory, MultiFactory, ViewFactory};
use crate::view::strategy::{
    AllNodes, AnonymousIndividualMaker, EntityMaker, FilterExt, FinderExt, HasProperty,
    Predicates, SubjectsOf, UnionFinder,
};
use crate::view::Interface;
use crate::vocab::owl;
use oxrdf::vocab::rdfs;
use oxrdf::TermRef;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// The set of factories deciding which node can be seen under which [`Interface`].
///
/// Cloning is cheap: factories are shared.
///
/// ```
/// use oxowlgraph::view::{Interface, Personality};
///
/// let personality = Personality::owl2();
/// assert!(personality.supports(Interface::ClassExpression));
///
/// let restricted = personality.to_builder().without(Interface::OneOf).build();
/// assert!(!restricted.supports(Interface::OneOf));
/// assert!(restricted.supports(Interface::ClassExpression));
/// ```
#[derive(Clone)]
pub struct Personality {
    factories: FxHashMap<Interface, Arc<dyn ViewFactory>>,
}

impl Personality {
    /// The factories of every OWL 2 interface.
    pub fn owl2() -> Self {
        PersonalityBuilder::new()
            .with_factory(
                CommonFactory::new(Interface::Class, AllNodes, named.and(class))
                    .with_maker(EntityMaker::new(Interface::Class, owl::CLASS)),
            )
            .with_factory(
                CommonFactory::new(Interface::Datatype, AllNodes, named.and(datatype))
                    .with_maker(EntityMaker::new(Interface::Datatype, rdfs::DATATYPE)),
            )
            .with_factory(
                CommonFactory::new(
                    Interface::ObjectProperty,
                    Predicates.union(AllNodes),
                    named.and(object_property),
                )
                .with_maker(EntityMaker::new(
                    Interface::ObjectProperty,
                    owl::OBJECT_PROPERTY,
                )),
            )
            .with_factory(
                CommonFactory::new(
                    Interface::DataProperty,
                    Predicates.union(AllNodes),
                    named.and(data_property),
                )
                .with_maker(EntityMaker::new(
                    Interface::DataProperty,
                    owl::DATATYPE_PROPERTY,
                )),
            )
            .with_factory(
                CommonFactory::new(
                    Interface::AnnotationProperty,
                    Predicates.union(AllNodes),
                    named.and(annotation_property),
                )
                .with_maker(EntityMaker::new(
                    Interface::AnnotationProperty,
                    owl::ANNOTATION_PROPERTY,
                )),
            )
            .with_factory(
                CommonFactory::new(Interface::NamedIndividual, AllNodes, named.and(individual))
                    .with_maker(EntityMaker::new(
                        Interface::NamedIndividual,
                        owl::NAMED_INDIVIDUAL,
                    )),
            )
            .with_factory(
                CommonFactory::new(
                    Interface::AnonymousIndividual,
                    AllNodes,
                    blank.and(individual),
                )
                .with_maker(AnonymousIndividualMaker),
            )
            .with_factory(CommonFactory::new(
                Interface::Restriction,
                SubjectsOf(owl::ON_PROPERTY),
                blank.and(HasProperty(owl::ON_PROPERTY)),
            ))
            .with_factory(CommonFactory::new(
                Interface::UnionOf,
                SubjectsOf(owl::UNION_OF),
                blank
                    .and(HasProperty(owl::UNION_OF))
                    .and(datatype.not()),
            ))
            .with_factory(CommonFactory::new(
                Interface::IntersectionOf,
                SubjectsOf(owl::INTERSECTION_OF),
                blank
                    .and(HasProperty(owl::INTERSECTION_OF))
                    .and(datatype.not()),
            ))
            .with_factory(CommonFactory::new(
                Interface::OneOf,
                SubjectsOf(owl::ONE_OF),
                blank.and(HasProperty(owl::ONE_OF)).and(datatype.not()),
            ))
            .with_factory(CommonFactory::new(
                Interface::ComplementOf,
                SubjectsOf(owl::COMPLEMENT_OF),
                blank.and(HasProperty(owl::COMPLEMENT_OF)),
            ))
            .with_factory(CommonFactory::new(
                Interface::InverseObjectProperty,
                SubjectsOf(owl::INVERSE_OF),
                blank.and(HasProperty(owl::INVERSE_OF)),
            ))
            .with_factory(CommonFactory::new(
                Interface::DataRangeExpression,
                UnionFinder::new()
                    .with(SubjectsOf(owl::ON_DATATYPE))
                    .with(SubjectsOf(owl::DATATYPE_COMPLEMENT_OF))
                    .with(SubjectsOf(owl::UNION_OF))
                    .with(SubjectsOf(owl::INTERSECTION_OF))
                    .with(SubjectsOf(owl::ONE_OF)),
                blank.and(datatype),
            ))
            .build()
    }

    /// A builder starting from the leaf factories of this personality.
    ///
    /// Composite factories are derived again by [`PersonalityBuilder::build`].
    pub fn to_builder(&self) -> PersonalityBuilder {
        PersonalityBuilder {
            factories: self
                .factories
                .iter()
                .filter(|(interface, _)| !interface.is_composite())
                .map(|(interface, factory)| (*interface, Arc::clone(factory)))
                .collect(),
        }
    }

    pub fn supports(&self, interface: Interface) -> bool {
        self.factories.contains_key(&interface)
    }

    /// The factory of the interface.
    pub fn factory(&self, interface: Interface) -> Result<&dyn ViewFactory, ViewError> {
        self.factories
            .get(&interface)
            .map(|f| f.as_ref())
            .ok_or(ViewError::Unsupported { interface })
    }

    /// The supported interfaces, in [`Interface`] order.
    pub fn interfaces(&self) -> Vec<Interface> {
        let mut interfaces = self.factories.keys().copied().collect::<Vec<_>>();
        interfaces.sort_unstable();
        interfaces
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::owl2()
    }
}

impl fmt::Debug for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Personality")
            .field("interfaces", &self.interfaces())
            .finish()
    }
}

/// Builds a [`Personality`].
///
/// Composite interfaces without an explicit factory get a [`MultiFactory`] over the supported
/// leaves they are made of.
#[derive(Default)]
pub struct PersonalityBuilder {
    factories: FxHashMap<Interface, Arc<dyn ViewFactory>>,
}

impl PersonalityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for its interface, replacing any previous one.
    #[must_use]
    pub fn with_factory(mut self, factory: impl ViewFactory + 'static) -> Self {
        self.factories.insert(factory.interface(), Arc::new(factory));
        self
    }

    #[must_use]
    pub fn without(mut self, interface: Interface) -> Self {
        self.factories.remove(&interface);
        self
    }

    pub fn build(mut self) -> Personality {
        for interface in Interface::ALL {
            if !interface.is_composite() || self.factories.contains_key(&interface) {
                continue;
            }
            let leaves = interface
                .components()
                .iter()
                .filter_map(|leaf| self.factories.get(leaf).map(Arc::clone))
                .collect::<Vec<_>>();
            if !leaves.is_empty() {
                self.factories
                    .insert(interface, Arc::new(MultiFactory::new(interface, leaves)));
            }
        }
        Personality {
            factories: self.factories,
        }
    }
}

impl fmt::Debug for PersonalityBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonalityBuilder")
            .field("interfaces", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn named(node: TermRef<'_>, _: &UnionGraph, _: &Classifier<'_>) -> bool {
    node.is_named_node()
}

fn blank(node: TermRef<'_>, _: &UnionGraph, _: &Classifier<'_>) -> bool {
    node.is_blank_node()
}

fn class(node: TermRef<'_>, _: &UnionGraph, classifier: &Classifier<'_>) -> bool {
    classifier.is_class(node)
}

fn datatype(node: TermRef<'_>, _: &UnionGraph, classifier: &Classifier<'_>) -> bool {
    classifier.is_datatype(node)
}

fn object_property(node: TermRef<'_>, _: &UnionGraph, classifier: &Classifier<'_>) -> bool {
    classifier.is_object_property(node)
}

fn data_property(node: TermRef<'_>, _: &UnionGraph, classifier: &Classifier<'_>) -> bool {
    classifier.is_data_property(node)
}

fn annotation_property(node: TermRef<'_>, _: &UnionGraph, classifier: &Classifier<'_>) -> bool {
    classifier.is_annotation_property(node)
}

fn individual(node: TermRef<'_>, _: &UnionGraph, classifier: &Classifier<'_>) -> bool {
    classifier.is_individual(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::vocab::rdf;
    use oxrdf::{BlankNode, NamedNode, Term, Triple};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    #[test]
    fn test_owl2_supports_every_interface() {
        let personality = Personality::owl2();
        assert_eq!(personality.interfaces(), Interface::ALL.to_vec());
    }

    #[test]
    fn test_punned_node() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("Eagle"), rdf::TYPE, owl::CLASS))
            .unwrap();
        graph
            .insert(&Triple::new(ex("Eagle"), rdf::TYPE, owl::NAMED_INDIVIDUAL))
            .unwrap();
        let personality = Personality::owl2();
        let classifier = Classifier::new(&graph);
        let node = ex("Eagle");
        for interface in [
            Interface::Class,
            Interface::NamedIndividual,
            Interface::Entity,
            Interface::ClassExpression,
            Interface::Individual,
        ] {
            assert!(
                personality
                    .factory(interface)
                    .unwrap()
                    .can_view(node.as_ref().into(), &graph, &classifier),
                "{interface}"
            );
        }
        assert!(!personality
            .factory(Interface::Datatype)
            .unwrap()
            .can_view(node.as_ref().into(), &graph, &classifier));
    }

    #[test]
    fn test_union_of_classes_is_not_a_data_range() {
        let mut graph = UnionGraph::new();
        let union = BlankNode::default();
        let list = BlankNode::default();
        graph
            .insert(&Triple::new(union.clone(), rdf::TYPE, owl::CLASS))
            .unwrap();
        graph
            .insert(&Triple::new(union.clone(), owl::UNION_OF, list.clone()))
            .unwrap();
        graph
            .insert(&Triple::new(list.clone(), rdf::FIRST, ex("A")))
            .unwrap();
        graph
            .insert(&Triple::new(list, rdf::REST, rdf::NIL))
            .unwrap();
        let personality = Personality::owl2();
        let classifier = Classifier::new(&graph);
        let node = union.as_ref().into();
        assert!(personality
            .factory(Interface::UnionOf)
            .unwrap()
            .can_view(node, &graph, &classifier));
        assert!(!personality
            .factory(Interface::DataRange)
            .unwrap()
            .can_view(node, &graph, &classifier));
        assert_eq!(
            personality
                .factory(Interface::ClassExpression)
                .unwrap()
                .find_all(&graph, &classifier)
                .into_iter()
                .filter(|n| n.is_blank_node())
                .count(),
            1
        );
    }

    #[test]
    fn test_named_node_is_not_a_complement() {
        let mut graph = UnionGraph::new();
        let complement = BlankNode::default();
        graph
            .insert(&Triple::new(ex("A"), rdf::TYPE, owl::CLASS))
            .unwrap();
        graph
            .insert(&Triple::new(ex("NotA"), owl::COMPLEMENT_OF, ex("A")))
            .unwrap();
        graph
            .insert(&Triple::new(complement.clone(), owl::COMPLEMENT_OF, ex("A")))
            .unwrap();
        let personality = Personality::owl2();
        let classifier = Classifier::new(&graph);
        let factory = personality.factory(Interface::ComplementOf).unwrap();
        assert!(!factory.can_view(ex("NotA").as_ref().into(), &graph, &classifier));
        assert!(factory.can_view(complement.as_ref().into(), &graph, &classifier));
        assert_eq!(
            factory.find_all(&graph, &classifier),
            vec![Term::from(complement)]
        );
    }

    #[test]
    fn test_builder_without() {
        let personality = Personality::owl2()
            .to_builder()
            .without(Interface::NamedIndividual)
            .without(Interface::AnonymousIndividual)
            .build();
        assert!(!personality.supports(Interface::Individual));
        assert!(matches!(
            personality.factory(Interface::NamedIndividual),
            Err(ViewError::Unsupported {
                interface: Interface::NamedIndividual
            })
        ));
        assert!(personality.supports(Interface::Entity));
    }
}
