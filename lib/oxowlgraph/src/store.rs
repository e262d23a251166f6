//! The axiom index over a [`UnionGraph`].
//!
//! The graph stays the source of truth: the store only caches what the [`AxiomReader`] finds in
//! it. Edits made through the store update the built indices in place. Any other change of the
//! graph is noticed through its generation counter and drops them.

use crate::axiom::{AnnotatedAxiom, AxiomType};
use crate::classifier::{decisions_touched_by, is_depended_on, Category, Classifier};
use crate::config::OntologyConfig;
use crate::error::{AxiomError, GraphError, OntologyError};
use crate::graph::{to_subject, UnionGraph};
use crate::translate::{AxiomReader, AxiomWriter, Footprint};
use crate::vocab::owl;
use oxrdf::vocab::rdf;
use oxrdf::{NamedOrBlankNodeRef, Term, TermRef, Triple, TripleRef};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Cache of the axioms encoded in a graph.
///
/// Two indices are maintained, both built on first read:
/// * the primary index holds every axiom with its footprints, grouped by [`AxiomType`];
/// * the secondary index files axioms under the entities they are about and collects
///   general class axioms.
///
/// Writes never build an index: an index that was not read yet is left untouched.
/// Reads take `&self`: lazy initialization is serialized by an internal mutex.
/// Every method takes the graph the store indexes; passing another graph just triggers a rebuild.
pub struct AxiomStore {
    config: OntologyConfig,
    state: Mutex<IndexState>,
}

#[derive(Default)]
struct IndexState {
    primary: Option<PrimaryIndex>,
    secondary: Option<SecondaryIndex>,
    /// Generation of the graph the indices reflect.
    synced_generation: u64,
}

#[derive(Default)]
struct PrimaryIndex {
    axioms: FxHashMap<AnnotatedAxiom, Vec<Footprint>>,
    by_type: FxHashMap<AxiomType, FxHashSet<AnnotatedAxiom>>,
    by_main: FxHashMap<Triple, FxHashSet<AnnotatedAxiom>>,
    /// Number of indexed footprints containing each triple.
    refcounts: FxHashMap<Triple, usize>,
}

#[derive(Default)]
struct SecondaryIndex {
    by_entity: FxHashMap<Term, FxHashSet<AnnotatedAxiom>>,
    general: FxHashSet<AnnotatedAxiom>,
}

/// What an edit of some triples may change in the index, captured before the edit.
struct PendingEdit {
    triples: Vec<Triple>,
    /// The classifier decisions the triples are evidence for, with their value before the
    /// edit. `None` if they can not be listed.
    decisions: Option<Vec<(Term, Category, bool)>>,
    /// The main triples whose reading may involve the edited triples before the edit.
    mains: FxHashSet<Triple>,
}

impl AxiomStore {
    pub fn new(config: OntologyConfig) -> Self {
        Self {
            config,
            state: Mutex::new(IndexState::default()),
        }
    }

    pub fn config(&self) -> &OntologyConfig {
        &self.config
    }

    /// Drops both indices. They are rebuilt on next use.
    pub fn invalidate(&mut self) {
        self.state_mut().invalidate();
    }

    pub fn is_primary_initialized(&self) -> bool {
        self.lock().primary.is_some()
    }

    pub fn is_secondary_initialized(&self) -> bool {
        self.lock().secondary.is_some()
    }

    /// Writes the axiom into the graph.
    ///
    /// Returns `false` if the axiom is already in the graph or if its triples are all already
    /// there. The written triples must read back as the same axiom: otherwise they are removed
    /// again and [`AxiomError::RoleMismatch`] is returned.
    pub fn add(
        &mut self,
        graph: &mut UnionGraph,
        axiom: &AnnotatedAxiom,
    ) -> Result<bool, OntologyError> {
        let config = self.config.clone();
        let state = self.state_mut();
        state.sync(graph);
        let footprint = AxiomWriter::footprint(axiom)?;
        let present = match &state.primary {
            Some(primary) => primary.axioms.contains_key(axiom),
            None => !locate(graph, &config, axiom, &footprint).is_empty(),
        };
        if present {
            return Ok(false);
        }
        let missing = footprint
            .triples()
            .iter()
            .filter(|t| !graph.contains(*t))
            .cloned()
            .collect::<Vec<_>>();
        if missing.is_empty() {
            return Ok(false);
        }

        let pending = state
            .primary
            .is_some()
            .then(|| PendingEdit::capture(graph, &config, missing.clone()));
        let mut inserted = Vec::new();
        for triple in &missing {
            match graph.insert(triple) {
                Ok(true) => inserted.push(triple.clone()),
                Ok(false) => (),
                Err(e) => {
                    rollback(graph, &inserted);
                    state.synced_generation = graph.generation();
                    return Err(e.into());
                }
            }
        }

        let read_back = AxiomReader::new(graph, &config)
            .axioms_at(footprint.main())
            .into_iter()
            .any(|(read, _)| read == *axiom);
        if !read_back {
            rollback(graph, &inserted);
            state.synced_generation = graph.generation();
            return Err(AxiomError::role_mismatch(
                axiom,
                "the written triples do not read back as the same axiom",
            )
            .into());
        }

        if let Some(pending) = pending {
            pending.apply(state, graph, &config);
        }
        state.synced_generation = graph.generation();
        Ok(true)
    }

    /// Removes the axiom triples from the graph.
    ///
    /// Triples still used by another axiom are kept. Returns `false` if the axiom is not in
    /// the graph or if some of its triples come from an import: the graph is then left as is.
    pub fn remove(
        &mut self,
        graph: &mut UnionGraph,
        axiom: &AnnotatedAxiom,
    ) -> Result<bool, OntologyError> {
        let config = self.config.clone();
        let state = self.state_mut();
        state.sync(graph);
        let orphans = match &state.primary {
            Some(primary) => {
                let Some(footprints) = primary.axioms.get(axiom) else {
                    return Ok(false);
                };
                let mut own = FxHashMap::<&Triple, usize>::default();
                for triple in footprints.iter().flat_map(Footprint::triples) {
                    *own.entry(triple).or_default() += 1;
                }
                own.into_iter()
                    .filter(|(triple, count)| primary.refcount(triple) <= *count)
                    .map(|(triple, _)| triple.clone())
                    .collect::<Vec<_>>()
            }
            None => {
                let footprints = locate(graph, &config, axiom, &AxiomWriter::footprint(axiom)?);
                if footprints.is_empty() {
                    return Ok(false);
                }
                let shared = shared_triples(graph, &config, axiom, &footprints);
                let mut orphans = footprints
                    .iter()
                    .flat_map(Footprint::triples)
                    .filter(|t| !shared.contains(*t))
                    .cloned()
                    .collect::<Vec<_>>();
                orphans.sort_unstable_by_key(ToString::to_string);
                orphans.dedup();
                orphans
            }
        };
        if let Some(imported) = orphans.iter().find(|t| graph.is_imported(*t)) {
            debug!("{axiom} can not be removed: {imported} comes from an import");
            return Ok(false);
        }

        let pending = state
            .primary
            .is_some()
            .then(|| PendingEdit::capture(graph, &config, orphans.clone()));
        for triple in &orphans {
            if let Err(e) = graph.remove(triple) {
                // the graph is not what the index says anymore
                state.invalidate();
                state.synced_generation = graph.generation();
                return Err(e.into());
            }
        }
        if let Some(pending) = pending {
            pending.apply(state, graph, &config);
        }
        state.synced_generation = graph.generation();
        Ok(true)
    }

    /// Inserts a single triple into the base graph, keeping the built indices up to date.
    pub fn insert_triple(
        &mut self,
        graph: &mut UnionGraph,
        triple: TripleRef<'_>,
    ) -> Result<bool, GraphError> {
        if graph.contains(triple) {
            return Ok(false);
        }
        self.edit_triple(graph, triple, |graph, triple| graph.insert(triple))
    }

    /// Removes a single triple from the base graph, keeping the built indices up to date.
    pub fn remove_triple(
        &mut self,
        graph: &mut UnionGraph,
        triple: TripleRef<'_>,
    ) -> Result<bool, GraphError> {
        if !graph.base().contains(triple) {
            return Ok(false);
        }
        self.edit_triple(graph, triple, |graph, triple| graph.remove(triple))
    }

    fn edit_triple(
        &mut self,
        graph: &mut UnionGraph,
        triple: TripleRef<'_>,
        edit: impl FnOnce(&mut UnionGraph, TripleRef<'_>) -> Result<bool, GraphError>,
    ) -> Result<bool, GraphError> {
        let config = self.config.clone();
        let state = self.state_mut();
        state.sync(graph);
        let pending = state
            .primary
            .is_some()
            .then(|| PendingEdit::capture(graph, &config, vec![triple.into_owned()]));
        let edited = match edit(graph, triple) {
            Ok(edited) => edited,
            Err(e) => {
                state.invalidate();
                state.synced_generation = graph.generation();
                return Err(e);
            }
        };
        if edited {
            if let Some(pending) = pending {
                pending.apply(state, graph, &config);
            }
        }
        state.synced_generation = graph.generation();
        Ok(edited)
    }

    pub fn contains(&self, graph: &UnionGraph, axiom: &AnnotatedAxiom) -> bool {
        self.with_primary(graph, |p| p.axioms.contains_key(axiom))
    }

    /// The footprints the axiom was read from.
    pub fn footprints(&self, graph: &UnionGraph, axiom: &AnnotatedAxiom) -> Vec<Footprint> {
        self.with_primary(graph, |p| p.axioms.get(axiom).cloned().unwrap_or_default())
    }

    pub fn axioms(&self, graph: &UnionGraph) -> Vec<AnnotatedAxiom> {
        self.with_primary(graph, |p| p.axioms.keys().cloned().collect())
    }

    pub fn axioms_of_type(&self, graph: &UnionGraph, axiom_type: AxiomType) -> Vec<AnnotatedAxiom> {
        self.with_primary(graph, |p| {
            p.by_type
                .get(&axiom_type)
                .map(|axioms| axioms.iter().cloned().collect())
                .unwrap_or_default()
        })
    }

    /// The axioms whose top-level operands mention this entity or individual.
    pub fn axioms_referencing<'a>(
        &self,
        graph: &UnionGraph,
        entity: impl Into<TermRef<'a>>,
    ) -> Vec<AnnotatedAxiom> {
        let entity = entity.into().into_owned();
        self.with_secondary(graph, |s| {
            s.by_entity
                .get(&entity)
                .map(|axioms| axioms.iter().cloned().collect())
                .unwrap_or_default()
        })
    }

    /// Class axioms without a named class operand, e.g. `SubClassOf(ObjectSomeValuesFrom(p C) D)`.
    pub fn general_class_axioms(&self, graph: &UnionGraph) -> Vec<AnnotatedAxiom> {
        self.with_secondary(graph, |s| s.general.iter().cloned().collect())
    }

    pub fn count(&self, graph: &UnionGraph) -> usize {
        self.with_primary(graph, |p| p.axioms.len())
    }

    pub fn is_empty(&self, graph: &UnionGraph) -> bool {
        self.count(graph) == 0
    }

    fn with_primary<R>(&self, graph: &UnionGraph, f: impl FnOnce(&PrimaryIndex) -> R) -> R {
        let mut state = self.lock();
        state.sync(graph);
        f(state.ensure_primary(graph, &self.config))
    }

    fn with_secondary<R>(&self, graph: &UnionGraph, f: impl FnOnce(&SecondaryIndex) -> R) -> R {
        let mut state = self.lock();
        state.sync(graph);
        state.ensure_primary(graph, &self.config);
        f(state.ensure_secondary())
    }

    fn lock(&self) -> MutexGuard<'_, IndexState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut IndexState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AxiomStore {
    fn default() -> Self {
        Self::new(OntologyConfig::default())
    }
}

impl fmt::Debug for AxiomStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("AxiomStore")
            .field("config", &self.config)
            .field("primary", &state.primary.as_ref().map(|p| p.axioms.len()))
            .field("secondary", &state.secondary.is_some())
            .field("synced_generation", &state.synced_generation)
            .finish()
    }
}

impl IndexState {
    fn invalidate(&mut self) {
        self.primary = None;
        self.secondary = None;
    }

    /// Drops the indices if the graph was changed behind the store.
    fn sync(&mut self, graph: &UnionGraph) {
        if self.synced_generation != graph.generation() {
            if self.primary.is_some() {
                debug!("the graph changed outside of the axiom store, dropping the index");
            }
            self.invalidate();
            self.synced_generation = graph.generation();
        }
    }

    fn ensure_primary(&mut self, graph: &UnionGraph, config: &OntologyConfig) -> &PrimaryIndex {
        self.primary.get_or_insert_with(|| {
            let primary = PrimaryIndex::build(graph, config);
            debug!(
                "axiom index built: {} axioms from {} triples",
                primary.axioms.len(),
                graph.len()
            );
            primary
        })
    }

    fn ensure_secondary(&mut self) -> &SecondaryIndex {
        let primary = &self.primary;
        self.secondary.get_or_insert_with(|| {
            let mut secondary = SecondaryIndex::default();
            if let Some(primary) = primary {
                for axiom in primary.axioms.keys() {
                    secondary.insert(axiom);
                }
            }
            debug!(
                "entity index built: {} entities, {} general class axioms",
                secondary.by_entity.len(),
                secondary.general.len()
            );
            secondary
        })
    }

    /// Re-reads the axioms of the given main triples.
    fn refresh(
        &mut self,
        graph: &UnionGraph,
        config: &OntologyConfig,
        mains: impl IntoIterator<Item = Triple>,
    ) {
        let Some(primary) = &mut self.primary else {
            return;
        };
        let reader = AxiomReader::new(graph, config);
        let mut touched = Vec::new();
        for main in mains {
            touched.extend(primary.remove_main(&main));
            for (axiom, footprint) in reader.axioms_at(&main) {
                primary.insert(axiom.clone(), footprint);
                touched.push(axiom);
            }
        }
        if let Some(secondary) = &mut self.secondary {
            for axiom in touched {
                if primary.axioms.contains_key(&axiom) {
                    secondary.insert(&axiom);
                } else {
                    secondary.remove(&axiom);
                }
            }
        }
    }
}

impl PendingEdit {
    fn capture(graph: &UnionGraph, config: &OntologyConfig, triples: Vec<Triple>) -> Self {
        let classifier = Classifier::new(graph).with_node_budget(config.classifier_node_budget);
        let decisions = decisions_touched_by(graph, &triples, config.max_list_length).map(
            |decisions| {
                decisions
                    .into_iter()
                    .map(|(node, category)| {
                        let value = classifier.is(category, node.as_ref());
                        (node, category, value)
                    })
                    .collect()
            },
        );
        let mains = if decisions.is_some() {
            affected_mains(graph, triples.iter().cloned())
        } else {
            FxHashSet::default()
        };
        Self {
            triples,
            decisions,
            mains,
        }
    }

    /// Brings the index up to date with the edited graph.
    ///
    /// The main triples around the edit are read again, and so are the ones around every node
    /// whose classification changed. A classification other decisions depend on drops the index.
    fn apply(self, state: &mut IndexState, graph: &UnionGraph, config: &OntologyConfig) {
        let Some(decisions) = self.decisions else {
            debug!("an edit rewired RDF lists, dropping the index");
            state.invalidate();
            return;
        };
        let classifier = Classifier::new(graph).with_node_budget(config.classifier_node_budget);
        let mut seeds = self.triples;
        for (node, category, before) in decisions {
            if classifier.is(category, node.as_ref()) == before {
                continue;
            }
            if is_depended_on(graph, node.as_ref(), category) {
                debug!("{node} changed as a {category} and other nodes depend on it, dropping the index");
                state.invalidate();
                return;
            }
            seeds.extend(graph.triples_about(node.as_ref()));
        }
        let mut mains = self.mains;
        mains.extend(affected_mains(graph, seeds));
        state.refresh(graph, config, mains);
    }
}

impl PrimaryIndex {
    fn build(graph: &UnionGraph, config: &OntologyConfig) -> Self {
        let mut index = Self::default();
        for (axiom, footprint) in AxiomReader::new(graph, config).scan() {
            index.insert(axiom, footprint);
        }
        index
    }

    fn insert(&mut self, axiom: AnnotatedAxiom, footprint: Footprint) {
        let footprints = self.axioms.entry(axiom.clone()).or_default();
        if footprints.contains(&footprint) {
            return;
        }
        for triple in footprint.triples() {
            *self.refcounts.entry(triple.clone()).or_default() += 1;
        }
        self.by_main
            .entry(footprint.main().clone())
            .or_default()
            .insert(axiom.clone());
        footprints.push(footprint);
        self.by_type
            .entry(axiom.axiom_type())
            .or_default()
            .insert(axiom);
    }

    /// Forgets every footprint read from `main` and returns the axioms it belonged to.
    fn remove_main(&mut self, main: &Triple) -> Vec<AnnotatedAxiom> {
        let Some(axioms) = self.by_main.remove(main) else {
            return Vec::new();
        };
        for axiom in &axioms {
            let Some(footprints) = self.axioms.get_mut(axiom) else {
                continue;
            };
            footprints.retain(|footprint| {
                if footprint.main() != main {
                    return true;
                }
                for triple in footprint.triples() {
                    if let Some(count) = self.refcounts.get_mut(triple) {
                        *count -= 1;
                        if *count == 0 {
                            self.refcounts.remove(triple);
                        }
                    }
                }
                false
            });
            if footprints.is_empty() {
                self.axioms.remove(axiom);
                if let Some(bucket) = self.by_type.get_mut(&axiom.axiom_type()) {
                    bucket.remove(axiom);
                }
            }
        }
        axioms.into_iter().collect()
    }

    fn refcount(&self, triple: &Triple) -> usize {
        self.refcounts.get(triple).copied().unwrap_or(0)
    }
}

impl SecondaryIndex {
    fn insert(&mut self, axiom: &AnnotatedAxiom) {
        if axiom.axiom().is_general_class_axiom() {
            self.general.insert(axiom.clone());
        }
        for entity in axiom.axiom().primary_entities() {
            self.by_entity
                .entry(entity)
                .or_default()
                .insert(axiom.clone());
        }
    }

    fn remove(&mut self, axiom: &AnnotatedAxiom) {
        self.general.remove(axiom);
        for entity in axiom.axiom().primary_entities() {
            if let Some(bucket) = self.by_entity.get_mut(&entity) {
                bucket.remove(axiom);
                if bucket.is_empty() {
                    self.by_entity.remove(&entity);
                }
            }
        }
    }
}

/// The footprints of the axiom, found by reading the triples that may be its main triple.
fn locate(
    graph: &UnionGraph,
    config: &OntologyConfig,
    axiom: &AnnotatedAxiom,
    written: &Footprint,
) -> Vec<Footprint> {
    let main = written.main();
    // blank nodes of the written footprint are fresh, they only match themselves
    let subject = (!main.subject.is_blank_node()).then(|| main.subject.as_ref());
    let object = (!main.object.is_blank_node()).then(|| main.object.as_ref());
    let reader = AxiomReader::new(graph, config);
    graph
        .find(subject, Some(main.predicate.as_ref()), object)
        .iter()
        .flat_map(|candidate| reader.axioms_at(candidate))
        .filter(|(read, _)| read == axiom)
        .map(|(_, footprint)| footprint)
        .collect()
}

/// The triples of `footprints` another axiom is also read from.
fn shared_triples(
    graph: &UnionGraph,
    config: &OntologyConfig,
    axiom: &AnnotatedAxiom,
    footprints: &[Footprint],
) -> FxHashSet<Triple> {
    let own = footprints
        .iter()
        .flat_map(Footprint::triples)
        .collect::<FxHashSet<_>>();
    let reader = AxiomReader::new(graph, config);
    affected_mains(graph, own.iter().map(|t| (*t).clone()))
        .iter()
        .flat_map(|main| reader.axioms_at(main))
        .filter(|(other, _)| other != axiom)
        .flat_map(|(_, footprint)| footprint.into_triples())
        .filter(|triple| own.contains(triple))
        .collect()
}

/// The triples an axiom involving one of `seeds` may be read from.
///
/// That is the seeds themselves, every triple of the anonymous structures the seeds belong to
/// up to their named roots, the triples of the subjects whose typing changed and the main
/// triples of the reifications met on the way.
fn affected_mains(
    graph: &UnionGraph,
    seeds: impl IntoIterator<Item = Triple>,
) -> FxHashSet<Triple> {
    let mut mains = FxHashSet::default();
    let mut pending = Vec::new();
    for seed in seeds {
        if seed.predicate == rdf::TYPE {
            mains.extend(graph.find(Some(seed.subject.as_ref()), None, None));
        }
        pending.push(seed.subject.clone());
        mains.insert(seed);
    }
    let mut visited = FxHashSet::default();
    while let Some(node) = pending.pop() {
        if !visited.insert(node.clone()) {
            continue;
        }
        if let Some(main) = reified_main(graph, node.as_ref()) {
            pending.push(main.subject.clone());
            mains.insert(main);
        }
        if node.is_named_node() {
            continue;
        }
        for triple in graph.find(None, None, Some(Term::from(node.clone()).as_ref())) {
            pending.push(triple.subject.clone());
            mains.insert(triple);
        }
        mains.extend(graph.find(Some(node.as_ref()), None, None));
    }
    mains
}

/// The triple the node reifies, if it has an `owl:annotatedSource`.
fn reified_main(graph: &UnionGraph, node: NamedOrBlankNodeRef<'_>) -> Option<Triple> {
    let source = graph.object(node, owl::ANNOTATED_SOURCE)?;
    let Term::NamedNode(property) = graph.object(node, owl::ANNOTATED_PROPERTY)? else {
        return None;
    };
    let target = graph.object(node, owl::ANNOTATED_TARGET)?;
    Some(Triple::new(
        to_subject(source.as_ref())?.into_owned(),
        property,
        target,
    ))
}

fn rollback(graph: &mut UnionGraph, inserted: &[Triple]) {
    for triple in inserted {
        if let Err(e) = graph.remove(triple) {
            debug!("could not roll back {triple}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::Axiom;
    use crate::vocab::owl;
    use oxrdf::vocab::rdf;
    use oxrdf::{Literal, NamedNode};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    #[test]
    fn test_indices_are_lazy() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("A"), rdf::TYPE, owl::CLASS))
            .unwrap();
        let store = AxiomStore::default();
        assert!(!store.is_primary_initialized());
        assert_eq!(store.count(&graph), 1);
        assert!(store.is_primary_initialized());
        assert!(!store.is_secondary_initialized());
        assert_eq!(store.axioms_referencing(&graph, ex("A").as_ref()).len(), 1);
        assert!(store.is_secondary_initialized());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut graph = UnionGraph::new();
        let mut store = AxiomStore::default();
        let axiom = AnnotatedAxiom::from(Axiom::subclass_of(ex("A"), ex("B")));
        assert!(store.add(&mut graph, &axiom).unwrap());
        let len = graph.len();
        assert!(!store.add(&mut graph, &axiom).unwrap());
        assert_eq!(graph.len(), len);
        assert!(store.contains(&graph, &axiom));
        assert_eq!(store.axioms_of_type(&graph, AxiomType::SubClassOf), vec![axiom]);
    }

    #[test]
    fn test_add_undeclared_property_is_rolled_back() {
        let mut graph = UnionGraph::new();
        let mut store = AxiomStore::default();
        let axiom = AnnotatedAxiom::from(Axiom::data_property_assertion(
            ex("age"),
            ex("alice"),
            Literal::from(3),
        ));
        assert!(matches!(
            store.add(&mut graph, &axiom),
            Err(OntologyError::Axiom(AxiomError::RoleMismatch { .. }))
        ));
        assert!(graph.is_empty());
        assert!(store.is_empty(&graph));
    }

    #[test]
    fn test_remove_keeps_shared_triples() {
        let mut graph = UnionGraph::new();
        let mut store = AxiomStore::default();
        let annotated = |label: &str| {
            AnnotatedAxiom::new(
                Axiom::subclass_of(ex("A"), ex("B")),
                vec![crate::Annotation::new(
                    oxrdf::vocab::rdfs::LABEL,
                    Literal::from(label),
                )],
            )
        };
        assert!(store.add(&mut graph, &annotated("x")).unwrap());
        assert!(store.add(&mut graph, &annotated("y")).unwrap());
        assert_eq!(store.count(&graph), 2);

        assert!(store.remove(&mut graph, &annotated("x")).unwrap());
        assert!(!store.remove(&mut graph, &annotated("x")).unwrap());
        assert!(graph.contains(&Triple::new(ex("A"), rdfs_sub_class_of(), ex("B"))));
        assert_eq!(store.axioms(&graph), vec![annotated("y")]);

        assert!(store.remove(&mut graph, &annotated("y")).unwrap());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_raw_mutation_is_noticed() {
        let mut graph = UnionGraph::new();
        let store = AxiomStore::default();
        assert!(store.is_empty(&graph));
        graph
            .insert(&Triple::new(ex("A"), rdfs_sub_class_of(), ex("B")))
            .unwrap();
        assert_eq!(
            store.axioms(&graph),
            vec![AnnotatedAxiom::from(Axiom::subclass_of(ex("A"), ex("B")))]
        );
    }

    #[test]
    fn test_writes_do_not_build_the_index() {
        let mut graph = UnionGraph::new();
        let mut store = AxiomStore::default();
        let axiom = AnnotatedAxiom::from(Axiom::subclass_of(ex("A"), ex("B")));
        assert!(store.add(&mut graph, &axiom).unwrap());
        assert!(!store.add(&mut graph, &axiom).unwrap());
        assert!(!store.is_primary_initialized());
        assert!(store.remove(&mut graph, &axiom).unwrap());
        assert!(!store.remove(&mut graph, &axiom).unwrap());
        assert!(!store.is_primary_initialized());
        assert!(!store.is_secondary_initialized());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_imported_axiom_is_not_removed() {
        let imported = Triple::new(ex("A"), rdfs_sub_class_of(), ex("B"));
        let mut graph = UnionGraph::new();
        graph.add_sub_graph(std::sync::Arc::new(
            [imported.clone()].into_iter().collect::<oxrdf::Graph>(),
        ));
        let mut store = AxiomStore::default();
        let axiom = AnnotatedAxiom::from(Axiom::subclass_of(ex("A"), ex("B")));

        assert!(!store.remove(&mut graph, &axiom).unwrap());
        assert!(graph.contains(&imported));
        assert!(store.contains(&graph, &axiom));
        assert!(!store.remove(&mut graph, &axiom).unwrap());
        assert!(graph.contains(&imported));
        assert!(store.is_primary_initialized());
        assert_eq!(store.axioms(&graph), vec![axiom]);
    }

    #[test]
    fn test_triple_edits_update_the_index() {
        let mut graph = UnionGraph::new();
        let mut store = AxiomStore::default();
        assert!(store.is_empty(&graph));
        let sub_class_of = Triple::new(ex("A"), rdfs_sub_class_of(), ex("B"));
        assert!(store.insert_triple(&mut graph, sub_class_of.as_ref()).unwrap());
        assert!(!store.insert_triple(&mut graph, sub_class_of.as_ref()).unwrap());
        assert!(store.is_primary_initialized());
        assert_eq!(
            store.axioms(&graph),
            vec![AnnotatedAxiom::from(Axiom::subclass_of(ex("A"), ex("B")))]
        );

        let declaration = Triple::new(ex("A"), rdf::TYPE, owl::CLASS);
        store.insert_triple(&mut graph, declaration.as_ref()).unwrap();
        assert!(store.is_primary_initialized());
        assert_eq!(store.count(&graph), 2);

        assert!(store.remove_triple(&mut graph, sub_class_of.as_ref()).unwrap());
        assert!(store.is_primary_initialized());
        assert_eq!(
            store.axioms(&graph),
            vec![AnnotatedAxiom::from(Axiom::DeclareClass(ex("A").into()))]
        );
    }

    #[test]
    fn test_general_class_axioms() {
        let mut graph = UnionGraph::new();
        let mut store = AxiomStore::default();
        store
            .add(
                &mut graph,
                &Axiom::DeclareObjectProperty(ex("p").into()).into(),
            )
            .unwrap();
        let gca = AnnotatedAxiom::from(Axiom::subclass_of(
            crate::ClassExpression::some_values_from(ex("p"), ex("C").into()),
            ex("D"),
        ));
        assert!(store.general_class_axioms(&graph).is_empty());
        assert!(store.add(&mut graph, &gca).unwrap());
        assert_eq!(store.general_class_axioms(&graph), vec![gca.clone()]);
        assert!(store.remove(&mut graph, &gca).unwrap());
        assert!(store.general_class_axioms(&graph).is_empty());
    }

    fn rdfs_sub_class_of() -> NamedNode {
        oxrdf::vocab::rdfs::SUB_CLASS_OF.into_owned()
    }
}
