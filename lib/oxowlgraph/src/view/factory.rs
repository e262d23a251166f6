use crate::classifier::Classifier;
use crate::error::{OntologyError, ViewError};
use crate::graph::UnionGraph;
use crate::view::strategy::{Filter, Finder, Maker};
use crate::view::Interface;
use oxrdf::{Term, TermRef};
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// Admits, lists and creates the nodes of one [`Interface`].
pub trait ViewFactory: Send + Sync {
    fn interface(&self) -> Interface;

    /// Can the node be seen under the interface?
    fn can_view(&self, node: TermRef<'_>, graph: &UnionGraph, classifier: &Classifier<'_>) -> bool;

    /// Every node of the graph that can be seen under the interface, without duplicates.
    fn find_all(&self, graph: &UnionGraph, classifier: &Classifier<'_>) -> Vec<Term>;

    /// Makes the node an instance of the interface.
    ///
    /// Nothing is written if the maker precondition fails.
    fn create(
        &self,
        node: TermRef<'_>,
        graph: &mut UnionGraph,
        classifier_budget: Option<usize>,
    ) -> Result<(), OntologyError>;

    /// [`can_view`](Self::can_view) as a `Result`.
    fn check(
        &self,
        node: TermRef<'_>,
        graph: &UnionGraph,
        classifier: &Classifier<'_>,
    ) -> Result<(), ViewError> {
        if self.can_view(node, graph, classifier) {
            Ok(())
        } else {
            Err(ViewError::incompatible(node.into_owned(), self.interface()))
        }
    }
}

/// A leaf factory assembled from a finder, a filter and an optional maker.
pub struct CommonFactory {
    interface: Interface,
    finder: Box<dyn Finder>,
    filter: Box<dyn Filter>,
    maker: Option<Box<dyn Maker>>,
}

impl CommonFactory {
    pub fn new(
        interface: Interface,
        finder: impl Finder + 'static,
        filter: impl Filter + 'static,
    ) -> Self {
        Self {
            interface,
            finder: Box::new(finder),
            filter: Box::new(filter),
            maker: None,
        }
    }

    #[must_use]
    pub fn with_maker(mut self, maker: impl Maker + 'static) -> Self {
        self.maker = Some(Box::new(maker));
        self
    }
}

impl ViewFactory for CommonFactory {
    fn interface(&self) -> Interface {
        self.interface
    }

    fn can_view(&self, node: TermRef<'_>, graph: &UnionGraph, classifier: &Classifier<'_>) -> bool {
        self.filter.accepts(node, graph, classifier)
    }

    fn find_all(&self, graph: &UnionGraph, classifier: &Classifier<'_>) -> Vec<Term> {
        let mut seen = FxHashSet::default();
        self.finder
            .find(graph)
            .into_iter()
            .filter(|node| seen.insert(node.clone()))
            .filter(|node| self.filter.accepts(node.as_ref(), graph, classifier))
            .collect()
    }

    fn create(
        &self,
        node: TermRef<'_>,
        graph: &mut UnionGraph,
        classifier_budget: Option<usize>,
    ) -> Result<(), OntologyError> {
        let Some(maker) = &self.maker else {
            return Err(ViewError::NoMaker {
                interface: self.interface,
            }
            .into());
        };
        {
            let classifier = Classifier::new(graph).with_node_budget(classifier_budget);
            maker.precondition(node, graph, &classifier)?;
        }
        maker.make(node, graph)?;
        Ok(())
    }
}

impl fmt::Debug for CommonFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonFactory")
            .field("interface", &self.interface)
            .field("maker", &self.maker.is_some())
            .finish()
    }
}

/// A composite factory delegating to leaf factories.
///
/// A node is admitted if one of the leaves admits it. Composites have no maker of their own:
/// nodes are created under a leaf interface.
pub struct MultiFactory {
    interface: Interface,
    leaves: Vec<Arc<dyn ViewFactory>>,
}

impl MultiFactory {
    pub fn new(interface: Interface, leaves: Vec<Arc<dyn ViewFactory>>) -> Self {
        Self { interface, leaves }
    }

    /// The first leaf admitting the node.
    pub fn leaf_for(
        &self,
        node: TermRef<'_>,
        graph: &UnionGraph,
        classifier: &Classifier<'_>,
    ) -> Option<Interface> {
        self.leaves
            .iter()
            .find(|leaf| leaf.can_view(node, graph, classifier))
            .map(|leaf| leaf.interface())
    }
}

impl ViewFactory for MultiFactory {
    fn interface(&self) -> Interface {
        self.interface
    }

    fn can_view(&self, node: TermRef<'_>, graph: &UnionGraph, classifier: &Classifier<'_>) -> bool {
        self.leaves
            .iter()
            .any(|leaf| leaf.can_view(node, graph, classifier))
    }

    fn find_all(&self, graph: &UnionGraph, classifier: &Classifier<'_>) -> Vec<Term> {
        let mut seen = FxHashSet::default();
        self.leaves
            .iter()
            .flat_map(|leaf| leaf.find_all(graph, classifier))
            .filter(|node| seen.insert(node.clone()))
            .collect()
    }

    fn create(
        &self,
        _: TermRef<'_>,
        _: &mut UnionGraph,
        _: Option<usize>,
    ) -> Result<(), OntologyError> {
        Err(ViewError::NoMaker {
            interface: self.interface,
        }
        .into())
    }
}

impl fmt::Debug for MultiFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiFactory")
            .field("interface", &self.interface)
            .field(
                "leaves",
                &self.leaves.iter().map(|l| l.interface()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::strategy::{EntityMaker, TypedNodes};
    use crate::vocab::owl;
    use oxrdf::vocab::{rdf, rdfs};
    use oxrdf::{BlankNode, NamedNode, Triple};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn named_class(node: TermRef<'_>, _: &UnionGraph, classifier: &Classifier<'_>) -> bool {
        node.is_named_node() && classifier.is_class(node)
    }

    fn class_factory() -> CommonFactory {
        CommonFactory::new(Interface::Class, TypedNodes(owl::CLASS), named_class)
            .with_maker(EntityMaker::new(Interface::Class, owl::CLASS))
    }

    #[test]
    fn test_create_then_view() {
        let mut graph = UnionGraph::new();
        let factory = class_factory();
        let node = ex("A");
        assert!(!factory.can_view(node.as_ref().into(), &graph, &Classifier::new(&graph)));
        factory
            .create(node.as_ref().into(), &mut graph, None)
            .unwrap();
        let classifier = Classifier::new(&graph);
        assert!(factory.can_view(node.as_ref().into(), &graph, &classifier));
        assert_eq!(factory.find_all(&graph, &classifier), vec![node.into()]);
    }

    #[test]
    fn test_failed_create_writes_nothing() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("D"), rdf::TYPE, rdfs::DATATYPE))
            .unwrap();
        let before = graph.len();
        let factory = class_factory();
        assert!(factory
            .create(ex("D").as_ref().into(), &mut graph, None)
            .is_err());
        assert!(factory
            .create(BlankNode::default().as_ref().into(), &mut graph, None)
            .is_err());
        assert_eq!(graph.len(), before);
    }

    #[test]
    fn test_multi_factory() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("A"), rdf::TYPE, owl::CLASS))
            .unwrap();
        graph
            .insert(&Triple::new(ex("D"), rdf::TYPE, rdfs::DATATYPE))
            .unwrap();
        let datatypes = CommonFactory::new(
            Interface::Datatype,
            TypedNodes(rdfs::DATATYPE),
            |node: TermRef<'_>, _: &UnionGraph, classifier: &Classifier<'_>| {
                classifier.is_datatype(node)
            },
        );
        let multi = MultiFactory::new(
            Interface::Entity,
            vec![Arc::new(class_factory()), Arc::new(datatypes)],
        );
        let classifier = Classifier::new(&graph);
        assert_eq!(
            multi.leaf_for(ex("D").as_ref().into(), &graph, &classifier),
            Some(Interface::Datatype)
        );
        assert_eq!(multi.find_all(&graph, &classifier).len(), 2);
        assert!(matches!(
            multi.check(ex("x").as_ref().into(), &graph, &classifier),
            Err(ViewError::Incompatible { .. })
        ));
        assert!(matches!(
            multi.create(ex("x").as_ref().into(), &mut graph, None),
            Err(OntologyError::View(ViewError::NoMaker { .. }))
        ));
    }
}
