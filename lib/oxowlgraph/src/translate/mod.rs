//! Translation between axiom values and their RDF representation.
//!
//! [`AxiomWriter`] turns an [`AnnotatedAxiom`](crate::AnnotatedAxiom) into the set of triples
//! encoding it, [`AxiomReader`] recognizes axioms in a graph. Both agree on a [`Footprint`]:
//! the triples an axiom owns, with one distinguished main triple the axiom is read from.

mod reader;
mod writer;

pub use reader::AxiomReader;
pub use writer::AxiomWriter;

use oxrdf::{Triple, TripleRef};
use rustc_hash::FxHashSet;

/// The triples encoding one axiom.
///
/// The main triple is always part of [`triples`](Self::triples).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    main: Triple,
    triples: Vec<Triple>,
}

impl Footprint {
    pub(crate) fn new(main: Triple, triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut seen = FxHashSet::default();
        let mut deduplicated = vec![main.clone()];
        seen.insert(main.clone());
        for triple in triples {
            if seen.insert(triple.clone()) {
                deduplicated.push(triple);
            }
        }
        Self {
            main,
            triples: deduplicated,
        }
    }

    /// The triple the axiom is read from.
    pub fn main(&self) -> &Triple {
        &self.main
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn contains<'a>(&self, triple: impl Into<TripleRef<'a>>) -> bool {
        let triple = triple.into();
        self.triples.iter().any(|t| t.as_ref() == triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn into_triples(self) -> Vec<Triple> {
        self.triples
    }
}
