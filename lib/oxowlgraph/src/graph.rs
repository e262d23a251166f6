//! The triple store the ontology model is projected from.
//!
//! A [`UnionGraph`] is one writable base [`Graph`] plus an ordered list of read-only imported
//! graphs. Reads see the union, writes only ever touch the base.

use crate::error::{AxiomError, GraphError};
use oxrdf::vocab::rdf;
use oxrdf::{
    Graph, NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Term, TermRef, Triple,
    TripleRef,
};
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::Arc;

/// A logical graph made of a writable base graph and imported sub-graphs.
///
/// Every mutation bumps [`generation`](Self::generation), which lets derived caches detect that
/// they have to be rebuilt.
///
/// ```
/// use oxowlgraph::UnionGraph;
/// use oxrdf::{NamedNodeRef, TripleRef};
///
/// let ex = NamedNodeRef::new("http://example.com/a")?;
/// let mut graph = UnionGraph::new();
/// graph.insert(TripleRef::new(ex, ex, ex))?;
/// assert_eq!(graph.find(Some(ex.into()), None, None).len(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default)]
pub struct UnionGraph {
    base: Graph,
    imports: Vec<Arc<Graph>>,
    generation: u64,
}

impl UnionGraph {
    /// Creates an empty graph without imports.
    pub fn new() -> Self {
        Self::default()
    }

    /// The writable base graph.
    pub fn base(&self) -> &Graph {
        &self.base
    }

    /// The imported sub-graphs, in import order.
    pub fn sub_graphs(&self) -> &[Arc<Graph>] {
        &self.imports
    }

    /// Adds a read-only imported graph.
    pub fn add_sub_graph(&mut self, graph: Arc<Graph>) {
        self.imports.push(graph);
        self.generation += 1;
    }

    /// Removes an imported graph (compared by pointer). Returns `true` if it was present.
    pub fn remove_sub_graph(&mut self, graph: &Arc<Graph>) -> bool {
        let len = self.imports.len();
        self.imports.retain(|g| !Arc::ptr_eq(g, graph));
        let removed = self.imports.len() != len;
        if removed {
            self.generation += 1;
        }
        removed
    }

    /// A counter bumped by every mutation of the base or of the import list.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn layers(&self) -> impl Iterator<Item = &Graph> {
        std::iter::once(&self.base).chain(self.imports.iter().map(AsRef::as_ref))
    }

    /// Is the triple in the base or in any import?
    pub fn contains<'a>(&self, triple: impl Into<TripleRef<'a>>) -> bool {
        let triple = triple.into();
        self.layers().any(|g| g.contains(triple))
    }

    /// Number of distinct triples in the union.
    pub fn len(&self) -> usize {
        if self.imports.is_empty() {
            return self.base.len();
        }
        self.find(None, None, None).len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers().all(Graph::is_empty)
    }

    /// Inserts a triple in the base graph. Returns `true` if the union did not contain it yet.
    pub fn insert<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> Result<bool, GraphError> {
        let triple = triple.into();
        if self.contains(triple) {
            return Ok(false);
        }
        self.base.insert(triple);
        self.generation += 1;
        Ok(true)
    }

    /// Removes a triple from the base graph. Imported triples are never removed.
    pub fn remove<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> Result<bool, GraphError> {
        let removed = self.base.remove(triple);
        if removed {
            self.generation += 1;
        }
        Ok(removed)
    }

    /// Builds and inserts a triple from arbitrary terms, refusing literal subjects.
    pub fn insert_terms(
        &mut self,
        subject: impl Into<Term>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) -> Result<bool, GraphError> {
        let subject = subject.into();
        let Some(subject) = to_subject(subject.as_ref()) else {
            return Err(GraphError::InvalidSubject(subject));
        };
        self.insert(&Triple::new(subject, predicate, object))
    }

    /// Returns the triples matching the pattern. `None` is a wildcard.
    ///
    /// A triple present in several layers is only returned once.
    pub fn find(
        &self,
        subject: Option<NamedOrBlankNodeRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
    ) -> Vec<Triple> {
        let mut seen = FxHashSet::default();
        let mut result = Vec::new();
        for layer in self.layers() {
            for triple in find_in(layer, subject, predicate, object) {
                if self.imports.is_empty() || seen.insert(triple.clone()) {
                    result.push(triple);
                }
            }
        }
        result
    }

    /// Objects of the triples `(subject, predicate, ?)`.
    pub fn objects(
        &self,
        subject: NamedOrBlankNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) -> Vec<Term> {
        self.find(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|t| t.object)
            .collect()
    }

    /// First object of the triples `(subject, predicate, ?)`, if any.
    pub fn object(
        &self,
        subject: NamedOrBlankNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) -> Option<Term> {
        self.layers().find_map(|layer| {
            layer
                .object_for_subject_predicate(subject, predicate)
                .map(TermRef::into_owned)
        })
    }

    /// Does any triple `(?, predicate, object)` exist?
    pub fn has_subject(&self, predicate: NamedNodeRef<'_>, object: TermRef<'_>) -> bool {
        self.layers().any(|layer| {
            layer
                .subjects_for_predicate_object(predicate, object)
                .next()
                .is_some()
        })
    }

    /// Is the IRI the predicate of any triple?
    pub fn is_used_as_predicate(&self, predicate: NamedNodeRef<'_>) -> bool {
        self.any_with_predicate(predicate, |_| true)
    }

    /// Does a triple `(?, predicate, ?)` satisfy `f`? Stops at the first one that does.
    pub fn any_with_predicate(
        &self,
        predicate: NamedNodeRef<'_>,
        mut f: impl FnMut(TripleRef<'_>) -> bool,
    ) -> bool {
        self.layers()
            .any(|layer| layer.triples_for_predicate(predicate).any(&mut f))
    }

    /// Does a triple `(?, ?, object)` satisfy `f`? Stops at the first one that does.
    pub fn any_with_object(
        &self,
        object: TermRef<'_>,
        mut f: impl FnMut(TripleRef<'_>) -> bool,
    ) -> bool {
        self.layers()
            .any(|layer| layer.triples_for_object(object).any(&mut f))
    }

    /// Is the triple held by an imported graph?
    pub fn is_imported<'a>(&self, triple: impl Into<TripleRef<'a>>) -> bool {
        let triple = triple.into();
        self.imports.iter().any(|g| g.contains(triple))
    }

    /// The triples using the term as subject, predicate or object.
    pub fn triples_about(&self, term: TermRef<'_>) -> Vec<Triple> {
        let mut triples = self.find(None, None, Some(term));
        if let Some(subject) = to_subject(term) {
            triples.extend(self.find(Some(subject), None, None));
        }
        if let TermRef::NamedNode(predicate) = term {
            triples.extend(self.find(None, Some(predicate), None));
        }
        triples
    }

    /// Subjects of the triples `(?, predicate, object)`.
    pub fn subjects(
        &self,
        predicate: NamedNodeRef<'_>,
        object: TermRef<'_>,
    ) -> Vec<NamedOrBlankNode> {
        self.find(None, Some(predicate), Some(object))
            .into_iter()
            .map(|t| t.subject)
            .collect()
    }

    /// Does any triple `(subject, predicate, ?)` exist?
    pub fn has_property(
        &self,
        subject: NamedOrBlankNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) -> bool {
        self.layers().any(|layer| {
            layer
                .objects_for_subject_predicate(subject, predicate)
                .next()
                .is_some()
        })
    }

    /// Does `(subject, rdf:type, class)` exist?
    pub fn has_type(&self, subject: NamedOrBlankNodeRef<'_>, class: NamedNodeRef<'_>) -> bool {
        self.contains(TripleRef::new(subject, rdf::TYPE, class))
    }

    /// `rdf:type` values of the subject.
    pub fn types(&self, subject: NamedOrBlankNodeRef<'_>) -> Vec<NamedNode> {
        self.objects(subject, rdf::TYPE)
            .into_iter()
            .filter_map(|t| match t {
                Term::NamedNode(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Reads the RDF list starting at `head`.
    ///
    /// Fails on cycles, missing `rdf:first`/`rdf:rest` and lists longer than `max_length`.
    pub fn list(&self, head: TermRef<'_>, max_length: usize) -> Result<Vec<Term>, AxiomError> {
        let mut items = Vec::new();
        let mut visited = FxHashSet::default();
        let mut current = head.into_owned();
        while current != Term::from(rdf::NIL) {
            let Some(cell) = to_subject(current.as_ref()) else {
                return Err(AxiomError::malformed_list(head, "a list cell is a literal"));
            };
            if !visited.insert(current.clone()) {
                return Err(AxiomError::malformed_list(head, "the list is cyclic"));
            }
            if items.len() >= max_length {
                return Err(AxiomError::malformed_list(
                    head,
                    format!("the list is longer than {max_length} items"),
                ));
            }
            let first = self
                .object(cell, rdf::FIRST)
                .ok_or_else(|| AxiomError::malformed_list(head, "missing rdf:first"))?;
            let rest = self
                .object(cell, rdf::REST)
                .ok_or_else(|| AxiomError::malformed_list(head, "missing rdf:rest"))?;
            items.push(first);
            current = rest;
        }
        Ok(items)
    }

    /// The `rdf:first`/`rdf:rest` triples of the list starting at `head`, for footprints.
    pub fn list_triples(&self, head: TermRef<'_>, max_length: usize) -> Vec<Triple> {
        let mut triples = Vec::new();
        let mut visited = FxHashSet::default();
        let mut current = head.into_owned();
        while let Some(cell) = to_subject(current.as_ref()) {
            if visited.len() >= max_length || !visited.insert(current.clone()) {
                break;
            }
            let cell = cell.into_owned();
            triples.extend(self.find(Some(cell.as_ref()), Some(rdf::FIRST), None));
            let rest = self.find(Some(cell.as_ref()), Some(rdf::REST), None);
            let Some(next) = rest.first().map(|t| t.object.clone()) else {
                break;
            };
            triples.extend(rest);
            current = next;
        }
        triples
    }

    /// Every triple of the union.
    pub fn iter(&self) -> impl Iterator<Item = Triple> {
        self.find(None, None, None).into_iter()
    }
}

impl From<Graph> for UnionGraph {
    fn from(base: Graph) -> Self {
        Self {
            base,
            imports: Vec::new(),
            generation: 0,
        }
    }
}

impl fmt::Debug for UnionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionGraph")
            .field("base", &self.base.len())
            .field("imports", &self.imports.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl fmt::Display for UnionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for triple in self.find(None, None, None) {
            writeln!(f, "{triple} .")?;
        }
        Ok(())
    }
}

/// Matches a pattern against one layer, starting from the most selective bound position.
fn find_in(
    graph: &Graph,
    subject: Option<NamedOrBlankNodeRef<'_>>,
    predicate: Option<NamedNodeRef<'_>>,
    object: Option<TermRef<'_>>,
) -> Vec<Triple> {
    let matches = |t: &TripleRef<'_>| {
        subject.is_none_or(|s| t.subject == s)
            && predicate.is_none_or(|p| t.predicate == p)
            && object.is_none_or(|o| t.object == o)
    };
    match (subject, predicate, object) {
        (Some(s), Some(p), Some(o)) => {
            let triple = TripleRef::new(s, p, o);
            if graph.contains(triple) {
                vec![triple.into_owned()]
            } else {
                Vec::new()
            }
        }
        (Some(s), Some(p), None) => graph
            .objects_for_subject_predicate(s, p)
            .map(|o| Triple::new(s, p, o))
            .collect(),
        (Some(s), _, _) => graph
            .triples_for_subject(s)
            .filter(matches)
            .map(TripleRef::into_owned)
            .collect(),
        (None, Some(p), Some(o)) => graph
            .subjects_for_predicate_object(p, o)
            .map(|s| Triple::new(s, p, o))
            .collect(),
        (None, None, Some(o)) => graph
            .triples_for_object(o)
            .filter(matches)
            .map(TripleRef::into_owned)
            .collect(),
        (None, Some(p), None) => graph
            .triples_for_predicate(p)
            .map(TripleRef::into_owned)
            .collect(),
        (None, None, None) => graph.iter().map(TripleRef::into_owned).collect(),
    }
}

/// Converts a term to a triple subject, `None` for literals.
pub fn to_subject(term: TermRef<'_>) -> Option<NamedOrBlankNodeRef<'_>> {
    match term {
        TermRef::NamedNode(n) => Some(n.into()),
        TermRef::BlankNode(b) => Some(b.into()),
        TermRef::Literal(_) => None,
        #[cfg(feature = "rdf-12")]
        TermRef::Triple(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    #[test]
    fn test_writes_target_base_and_reads_see_union() {
        let mut import = Graph::new();
        import.insert(&Triple::new(ex("a"), ex("p"), ex("b")));
        let mut graph = UnionGraph::new();
        graph.add_sub_graph(Arc::new(import));
        assert!(graph.contains(&Triple::new(ex("a"), ex("p"), ex("b"))));

        // Already visible through the import, nothing is written.
        assert!(!graph
            .insert(&Triple::new(ex("a"), ex("p"), ex("b")))
            .unwrap());
        assert!(graph.base().is_empty());

        // Imported triples are read-only.
        assert!(!graph
            .remove(&Triple::new(ex("a"), ex("p"), ex("b")))
            .unwrap());
        assert_eq!(graph.len(), 1);

        assert!(graph
            .insert(&Triple::new(ex("a"), ex("p"), ex("c")))
            .unwrap());
        assert_eq!(graph.base().len(), 1);
        assert_eq!(
            graph.find(Some(ex("a").as_ref().into()), None, None).len(),
            2
        );
    }

    #[test]
    fn test_union_deduplicates() {
        let triple = Triple::new(ex("a"), ex("p"), ex("b"));
        let mut import = Graph::new();
        import.insert(&triple);
        let mut base = Graph::new();
        base.insert(&triple);
        let mut graph = UnionGraph::from(base);
        graph.add_sub_graph(Arc::new(import));
        assert_eq!(graph.find(None, None, None), vec![triple]);
    }

    #[test]
    fn test_find_patterns() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("a"), ex("p"), ex("b")))
            .unwrap();
        graph
            .insert(&Triple::new(ex("a"), ex("q"), Literal::from("v")))
            .unwrap();
        graph
            .insert(&Triple::new(ex("c"), ex("p"), ex("b")))
            .unwrap();
        assert_eq!(graph.find(None, Some(ex("p").as_ref()), None).len(), 2);
        assert_eq!(
            graph
                .find(None, None, Some(ex("b").as_ref().into()))
                .len(),
            2
        );
        assert_eq!(
            graph
                .find(
                    Some(ex("a").as_ref().into()),
                    Some(ex("p").as_ref()),
                    Some(ex("b").as_ref().into())
                )
                .len(),
            1
        );
        assert_eq!(
            graph.subjects(ex("p").as_ref(), ex("b").as_ref().into()).len(),
            2
        );
    }

    #[test]
    fn test_generation_tracks_mutations() {
        let mut graph = UnionGraph::new();
        let start = graph.generation();
        graph
            .insert(&Triple::new(ex("a"), ex("p"), ex("b")))
            .unwrap();
        assert!(graph.generation() > start);
        let after_insert = graph.generation();
        graph
            .insert(&Triple::new(ex("a"), ex("p"), ex("b")))
            .unwrap();
        assert_eq!(graph.generation(), after_insert);
    }

    #[test]
    fn test_list() {
        let mut graph = UnionGraph::new();
        let first = BlankNode::default();
        let second = BlankNode::default();
        graph.insert(&Triple::new(first.clone(), rdf::FIRST, ex("a"))).unwrap();
        graph.insert(&Triple::new(first.clone(), rdf::REST, second.clone())).unwrap();
        graph.insert(&Triple::new(second.clone(), rdf::FIRST, ex("b"))).unwrap();
        graph.insert(&Triple::new(second.clone(), rdf::REST, rdf::NIL)).unwrap();
        assert_eq!(
            graph.list(first.as_ref().into(), 10).unwrap(),
            vec![Term::from(ex("a")), Term::from(ex("b"))]
        );
        assert_eq!(graph.list_triples(first.as_ref().into(), 10).len(), 4);
        assert!(graph.list(first.as_ref().into(), 1).is_err());
    }

    #[test]
    fn test_cyclic_list_is_refused() {
        let mut graph = UnionGraph::new();
        let cell = BlankNode::default();
        graph.insert(&Triple::new(cell.clone(), rdf::FIRST, ex("a"))).unwrap();
        graph.insert(&Triple::new(cell.clone(), rdf::REST, cell.clone())).unwrap();
        assert!(graph.list(cell.as_ref().into(), 100).is_err());
    }

    #[test]
    fn test_literal_subject_is_refused() {
        let mut graph = UnionGraph::new();
        assert!(graph
            .insert_terms(Literal::from("x"), ex("p"), ex("o"))
            .is_err());
    }
}
