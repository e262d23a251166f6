//! The [`Ontology`] facade: one graph seen both as triples and as typed OWL objects.

use crate::axiom::{AnnotatedAxiom, AxiomType};
use crate::classifier::{Classification, Classifier};
use crate::config::OntologyConfig;
use crate::error::{GraphError, OntologyError, ViewError};
use crate::graph::UnionGraph;
use crate::normalize::{NormalizationReport, Pipeline};
use crate::store::AxiomStore;
use crate::translate::Footprint;
use crate::view::{Interface, Personality, View, ViewKind};
use crate::vocab::owl;
use oxrdf::vocab::rdf;
use oxrdf::{Graph, NamedNode, NamedNodeRef, NamedOrBlankNode, Term, TermRef, TripleRef};
use std::mem;
use std::sync::Arc;
use tracing::debug;

/// An OWL 2 ontology stored as an RDF graph.
///
/// The graph is the only state: typed [`View`]s read it directly and the axiom index is a cache.
/// Raw triple edits and axiom edits both keep a built index up to date, so triples and axioms
/// can be mixed freely. Replacing the graph, normalizing it or changing its imports drops the
/// index.
///
/// ```
/// use oxowlgraph::view::kind;
/// use oxowlgraph::vocab::owl;
/// use oxowlgraph::{Axiom, Ontology};
/// use oxrdf::vocab::rdf;
/// use oxrdf::{NamedNodeRef, Term, TripleRef};
///
/// let animal = NamedNodeRef::new("http://example.com/Animal")?;
/// let dog = NamedNodeRef::new("http://example.com/Dog")?;
///
/// let mut ontology = Ontology::new();
/// ontology.create::<kind::Class>(animal)?;
/// ontology.insert(TripleRef::new(dog, rdf::TYPE, owl::CLASS))?;
/// assert!(ontology.add_axiom(Axiom::subclass_of(dog.into_owned(), animal.into_owned()))?);
///
/// let animal = ontology.view::<kind::Class>(animal)?;
/// assert_eq!(animal.sub_classes(), [Term::from(dog.into_owned())]);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default)]
pub struct Ontology {
    graph: UnionGraph,
    store: AxiomStore,
    personality: Personality,
    config: OntologyConfig,
}

impl Ontology {
    /// An empty ontology with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: OntologyConfig) -> Self {
        Self {
            graph: UnionGraph::new(),
            store: AxiomStore::new(config.clone()),
            personality: Personality::owl2(),
            config,
        }
    }

    /// Replaces the view factories.
    #[must_use]
    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    /// Wraps an existing graph, normalizing it first if the configuration says so.
    pub fn from_graph(
        graph: impl Into<UnionGraph>,
        config: OntologyConfig,
    ) -> Result<Self, GraphError> {
        let mut ontology = Self::with_config(config);
        ontology.graph = graph.into();
        if ontology.config.normalize_on_load {
            let report = ontology.normalize()?;
            debug!(
                "loaded graph normalized in {} rounds with {} changes",
                report.rounds,
                report.changes()
            );
        }
        Ok(ontology)
    }

    pub fn config(&self) -> &OntologyConfig {
        &self.config
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn graph(&self) -> &UnionGraph {
        &self.graph
    }

    pub fn into_graph(self) -> UnionGraph {
        self.graph
    }

    /// Swaps the underlying graph and returns the previous one.
    pub fn replace_graph(&mut self, graph: impl Into<UnionGraph>) -> UnionGraph {
        // the new graph generation may collide with the synced one
        self.store.invalidate();
        mem::replace(&mut self.graph, graph.into())
    }

    /// Inserts a raw triple into the base graph.
    pub fn insert<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> Result<bool, GraphError> {
        self.store.insert_triple(&mut self.graph, triple.into())
    }

    /// Removes a raw triple from the base graph.
    pub fn remove<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> Result<bool, GraphError> {
        self.store.remove_triple(&mut self.graph, triple.into())
    }

    /// Adds a read-only imported graph.
    pub fn add_import(&mut self, graph: Arc<Graph>) {
        self.graph.add_sub_graph(graph);
    }

    /// Removes an imported graph. Returns `true` if it was imported.
    pub fn remove_import(&mut self, graph: &Arc<Graph>) -> bool {
        self.graph.remove_sub_graph(graph)
    }

    /// Runs the standard normalization pipeline on the graph.
    pub fn normalize(&mut self) -> Result<NormalizationReport, GraphError> {
        let report = Pipeline::standard(&self.config).normalize(&mut self.graph)?;
        if !report.is_unchanged() {
            self.store.invalidate();
        }
        Ok(report)
    }

    /// A classifier over the graph, bounded by the configured node budget.
    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(&self.graph).with_node_budget(self.config.classifier_node_budget)
    }

    pub fn classify<'a>(&self, node: impl Into<TermRef<'a>>) -> Classification {
        self.classifier().classify(node.into())
    }

    /// Can the node be seen as a `K`?
    pub fn can_view<'a, K: ViewKind>(&self, node: impl Into<TermRef<'a>>) -> bool {
        self.can_view_as(K::INTERFACE, node)
    }

    /// [`can_view`](Self::can_view) with an interface known at runtime.
    ///
    /// Interfaces the personality does not support admit nothing.
    pub fn can_view_as<'a>(&self, interface: Interface, node: impl Into<TermRef<'a>>) -> bool {
        self.personality
            .factory(interface)
            .is_ok_and(|f| f.can_view(node.into(), &self.graph, &self.classifier()))
    }

    /// Sees the node as a `K`.
    pub fn view<'a, K: ViewKind>(
        &self,
        node: impl Into<TermRef<'a>>,
    ) -> Result<View<'_, K>, ViewError> {
        let node = node.into();
        self.personality
            .factory(K::INTERFACE)?
            .check(node, &self.graph, &self.classifier())?;
        Ok(self.make_view(node.into_owned()))
    }

    /// Makes the node a `K` and returns its view.
    ///
    /// The graph is left untouched if the node can not become a `K`.
    pub fn create<'a, K: ViewKind>(
        &mut self,
        node: impl Into<TermRef<'a>>,
    ) -> Result<View<'_, K>, OntologyError> {
        let node = node.into();
        self.personality.factory(K::INTERFACE)?.create(
            node,
            &mut self.graph,
            self.config.classifier_node_budget,
        )?;
        Ok(self.make_view(node.into_owned()))
    }

    /// Every node that can be seen as a `K`.
    pub fn find_all<K: ViewKind>(&self) -> Result<Vec<View<'_, K>>, ViewError> {
        let factory = self.personality.factory(K::INTERFACE)?;
        Ok(factory
            .find_all(&self.graph, &self.classifier())
            .into_iter()
            .map(|node| self.make_view(node))
            .collect())
    }

    fn make_view<K: ViewKind>(&self, node: Term) -> View<'_, K> {
        View::new(node, &self.graph, self.config.max_list_length)
    }

    /// Writes the axiom into the graph. Returns `false` if it was already there.
    pub fn add_axiom(&mut self, axiom: impl Into<AnnotatedAxiom>) -> Result<bool, OntologyError> {
        self.store.add(&mut self.graph, &axiom.into())
    }

    /// Removes the axiom triples not shared with another axiom. Returns `false` if the axiom was
    /// not there.
    pub fn remove_axiom(
        &mut self,
        axiom: impl Into<AnnotatedAxiom>,
    ) -> Result<bool, OntologyError> {
        self.store.remove(&mut self.graph, &axiom.into())
    }

    pub fn contains_axiom(&self, axiom: &AnnotatedAxiom) -> bool {
        self.store.contains(&self.graph, axiom)
    }

    /// The triples the axiom was read from.
    pub fn footprints(&self, axiom: &AnnotatedAxiom) -> Vec<Footprint> {
        self.store.footprints(&self.graph, axiom)
    }

    pub fn axioms(&self) -> Vec<AnnotatedAxiom> {
        self.store.axioms(&self.graph)
    }

    pub fn axioms_of_type(&self, axiom_type: AxiomType) -> Vec<AnnotatedAxiom> {
        self.store.axioms_of_type(&self.graph, axiom_type)
    }

    pub fn axioms_referencing<'a>(&self, entity: impl Into<TermRef<'a>>) -> Vec<AnnotatedAxiom> {
        self.store.axioms_referencing(&self.graph, entity)
    }

    pub fn general_class_axioms(&self) -> Vec<AnnotatedAxiom> {
        self.store.general_class_axioms(&self.graph)
    }

    pub fn axiom_count(&self) -> usize {
        self.store.count(&self.graph)
    }

    /// The axiom index, e.g. to check if it is initialized.
    pub fn store(&self) -> &AxiomStore {
        &self.store
    }

    /// The `owl:Ontology` node of the base graph.
    pub fn header(&self) -> Option<NamedOrBlankNode> {
        self.graph
            .base()
            .subjects_for_predicate_object(rdf::TYPE, owl::ONTOLOGY)
            .next()
            .map(|s| s.into_owned())
    }

    /// The ontology IRI, if the header is named.
    pub fn iri(&self) -> Option<NamedNode> {
        match self.header()? {
            NamedOrBlankNode::NamedNode(iri) => Some(iri),
            NamedOrBlankNode::BlankNode(_) => None,
        }
    }

    pub fn version_iri(&self) -> Option<NamedNode> {
        self.header_values(owl::VERSION_IRI).into_iter().next()
    }

    /// The `owl:imports` of the header.
    pub fn imports(&self) -> Vec<NamedNode> {
        self.header_values(owl::IMPORTS)
    }

    fn header_values(&self, predicate: NamedNodeRef<'_>) -> Vec<NamedNode> {
        let Some(header) = self.header() else {
            return Vec::new();
        };
        self.graph
            .objects(header.as_ref(), predicate)
            .into_iter()
            .filter_map(|o| match o {
                Term::NamedNode(iri) => Some(iri),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::{Annotation, Axiom};
    use crate::error::{AxiomError, MakeError};
    use crate::view::kind;
    use oxrdf::vocab::rdfs;
    use oxrdf::{BlankNode, Literal, Triple};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    #[test]
    fn test_raw_triples_and_axioms_agree() {
        let mut ontology = Ontology::new();
        ontology
            .insert(&Triple::new(ex("A"), rdf::TYPE, owl::CLASS))
            .unwrap();
        ontology
            .insert(&Triple::new(ex("B"), rdf::TYPE, owl::CLASS))
            .unwrap();
        assert_eq!(ontology.axiom_count(), 2);
        assert!(ontology
            .add_axiom(Axiom::subclass_of(ex("A"), ex("B")))
            .unwrap());
        assert!(ontology
            .graph()
            .contains(&Triple::new(ex("A"), rdfs::SUB_CLASS_OF, ex("B"))));
        assert_eq!(ontology.axioms_of_type(AxiomType::SubClassOf).len(), 1);

        ontology
            .remove(&Triple::new(ex("A"), rdfs::SUB_CLASS_OF, ex("B")))
            .unwrap();
        assert!(ontology.axioms_of_type(AxiomType::SubClassOf).is_empty());
        assert!(!ontology
            .remove_axiom(Axiom::subclass_of(ex("A"), ex("B")))
            .unwrap());
    }

    #[test]
    fn test_raw_edits_keep_the_index() {
        let mut ontology = Ontology::new();
        ontology.create::<kind::Class>(ex("A").as_ref()).unwrap();
        assert_eq!(ontology.axiom_count(), 1);
        assert!(ontology.store().is_primary_initialized());

        ontology
            .insert(&Triple::new(ex("B"), rdf::TYPE, owl::CLASS))
            .unwrap();
        ontology
            .insert(&Triple::new(ex("B"), rdfs::SUB_CLASS_OF, ex("A")))
            .unwrap();
        assert!(ontology.store().is_primary_initialized());
        assert_eq!(ontology.axiom_count(), 3);
        assert_eq!(ontology.axioms_of_type(AxiomType::SubClassOf).len(), 1);

        ontology
            .remove(&Triple::new(ex("B"), rdf::TYPE, owl::CLASS))
            .unwrap();
        assert!(ontology.store().is_primary_initialized());
        assert_eq!(ontology.axiom_count(), 2);
    }

    #[test]
    fn test_view_and_create() {
        let mut ontology = Ontology::new();
        assert!(matches!(
            ontology.view::<kind::Class>(ex("A").as_ref()),
            Err(ViewError::Incompatible { .. })
        ));
        let view = ontology.create::<kind::Class>(ex("A").as_ref()).unwrap();
        assert_eq!(view.iri(), Some(&ex("A")));
        assert!(ontology.can_view::<kind::Class>(ex("A").as_ref()));
        assert!(ontology.can_view::<kind::ClassExpression>(ex("A").as_ref()));
        assert!(!ontology.can_view::<kind::Datatype>(ex("A").as_ref()));

        let before = ontology.graph().len();
        assert!(matches!(
            ontology.create::<kind::Datatype>(ex("A").as_ref()),
            Err(OntologyError::Make(MakeError::IncompatibleRole { .. }))
        ));
        assert!(matches!(
            ontology.create::<kind::ClassExpression>(ex("B").as_ref()),
            Err(OntologyError::View(ViewError::NoMaker { .. }))
        ));
        assert_eq!(ontology.graph().len(), before);
    }

    #[test]
    fn test_anonymous_individual() {
        let mut ontology = Ontology::new();
        let b = BlankNode::default();
        ontology
            .create::<kind::AnonymousIndividual>(b.as_ref())
            .unwrap();
        let individuals = ontology.find_all::<kind::Individual>().unwrap();
        assert_eq!(individuals.len(), 1);
        assert_eq!(individuals[0].node(), &Term::from(b));
    }

    #[test]
    fn test_unsupported_interface() {
        let personality = Personality::owl2()
            .to_builder()
            .without(Interface::Datatype)
            .build();
        let ontology = Ontology::new().with_personality(personality);
        assert!(!ontology.can_view::<kind::Datatype>(rdfs::LITERAL));
        assert!(matches!(
            ontology.find_all::<kind::Datatype>(),
            Err(ViewError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_header() {
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(ex("onto").as_ref(), rdf::TYPE, owl::ONTOLOGY));
        graph.insert(TripleRef::new(
            ex("onto").as_ref(),
            owl::VERSION_IRI,
            ex("onto/1.0").as_ref(),
        ));
        graph.insert(TripleRef::new(
            ex("onto").as_ref(),
            owl::IMPORTS,
            ex("other").as_ref(),
        ));
        let ontology = Ontology::from_graph(graph, OntologyConfig::default()).unwrap();
        assert_eq!(ontology.iri(), Some(ex("onto")));
        assert_eq!(ontology.version_iri(), Some(ex("onto/1.0")));
        assert_eq!(ontology.imports(), [ex("other")]);
    }

    #[test]
    fn test_from_graph_normalizes() {
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(
            ex("p").as_ref(),
            rdf::TYPE,
            owl::TRANSITIVE_PROPERTY,
        ));
        let normalized = Ontology::from_graph(graph.clone(), OntologyConfig::default()).unwrap();
        assert!(normalized.can_view::<kind::ObjectProperty>(ex("p").as_ref()));
        assert!(normalized.header().is_some());

        let raw =
            Ontology::from_graph(graph, OntologyConfig::default().normalize_on_load(false)).unwrap();
        assert!(raw.header().is_none());
        assert_eq!(raw.graph().len(), 1);
    }

    #[test]
    fn test_replace_graph_drops_the_index() {
        let mut ontology = Ontology::new();
        ontology.create::<kind::Class>(ex("A").as_ref()).unwrap();
        assert_eq!(ontology.axiom_count(), 1);

        let mut other = UnionGraph::new();
        other
            .insert(&Triple::new(ex("B"), rdf::TYPE, owl::CLASS))
            .unwrap();
        other
            .insert(&Triple::new(ex("C"), rdf::TYPE, owl::CLASS))
            .unwrap();
        let previous = ontology.replace_graph(other);
        assert_eq!(previous.len(), 1);
        assert_eq!(ontology.axiom_count(), 2);
    }

    #[test]
    fn test_annotated_axiom_round_trip() {
        let mut ontology = Ontology::new();
        for class in ["A", "B"] {
            ontology.create::<kind::Class>(ex(class).as_ref()).unwrap();
        }
        let axiom = AnnotatedAxiom::new(
            Axiom::subclass_of(ex("A"), ex("B")),
            vec![Annotation::new(rdfs::COMMENT, Literal::from("why"))],
        );
        assert!(ontology.add_axiom(axiom.clone()).unwrap());
        assert!(ontology.contains_axiom(&axiom));
        assert!(!ontology.contains_axiom(&Axiom::subclass_of(ex("A"), ex("B")).into()));
        let referencing = ontology.axioms_referencing(ex("A").as_ref());
        assert_eq!(referencing.len(), 2);
        assert!(referencing.contains(&axiom));
        assert!(ontology.remove_axiom(axiom).unwrap());
        assert_eq!(ontology.axiom_count(), 2);
    }

    #[test]
    fn test_role_mismatch_is_rolled_back() {
        let mut ontology = Ontology::new();
        let before = ontology.graph().len();
        let result = ontology.add_axiom(Axiom::object_property_assertion(
            ex("undeclared"),
            ex("a"),
            ex("b"),
        ));
        assert!(matches!(
            result,
            Err(OntologyError::Axiom(AxiomError::RoleMismatch { .. }))
        ));
        assert_eq!(ontology.graph().len(), before);
    }
}
