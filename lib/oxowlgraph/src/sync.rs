//! Sharing an [`Ontology`] between threads.

use crate::axiom::{AnnotatedAxiom, AxiomType};
use crate::error::{GraphError, OntologyError};
use crate::normalize::NormalizationReport;
use crate::ontology::Ontology;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An [`Ontology`] behind a readers-writer lock.
///
/// Reads, including the lazy index builds they may trigger, take the shared lock.
/// Axiom writes, raw triple writes and normalization take the exclusive one.
/// Cloning gives another handle on the same ontology.
///
/// ```
/// use oxowlgraph::view::kind;
/// use oxowlgraph::{Ontology, SharedOntology};
/// use oxrdf::NamedNodeRef;
///
/// let shared = SharedOntology::new(Ontology::new());
/// let class = NamedNodeRef::new("http://example.com/C")?;
/// shared.write().create::<kind::Class>(class)?;
///
/// let reader = shared.clone();
/// std::thread::spawn(move || assert!(reader.read().can_view::<kind::Class>(class)))
///     .join()
///     .unwrap();
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedOntology {
    inner: Arc<RwLock<Ontology>>,
}

impl SharedOntology {
    pub fn new(ontology: Ontology) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ontology)),
        }
    }

    /// Takes the shared lock.
    pub fn read(&self) -> RwLockReadGuard<'_, Ontology> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the exclusive lock.
    pub fn write(&self) -> RwLockWriteGuard<'_, Ontology> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_axiom(&self, axiom: impl Into<AnnotatedAxiom>) -> Result<bool, OntologyError> {
        self.write().add_axiom(axiom)
    }

    pub fn remove_axiom(&self, axiom: impl Into<AnnotatedAxiom>) -> Result<bool, OntologyError> {
        self.write().remove_axiom(axiom)
    }

    pub fn normalize(&self) -> Result<NormalizationReport, GraphError> {
        self.write().normalize()
    }

    pub fn axioms_of_type(&self, axiom_type: AxiomType) -> Vec<AnnotatedAxiom> {
        self.read().axioms_of_type(axiom_type)
    }

    pub fn axiom_count(&self) -> usize {
        self.read().axiom_count()
    }

    /// Gets the ontology back if this is the last handle.
    pub fn try_into_inner(self) -> Result<Ontology, Self> {
        Arc::try_unwrap(self.inner)
            .map(|lock| lock.into_inner().unwrap_or_else(PoisonError::into_inner))
            .map_err(|inner| Self { inner })
    }
}

impl From<Ontology> for SharedOntology {
    fn from(ontology: Ontology) -> Self {
        Self::new(ontology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axiom::Axiom;
    use crate::vocab::owl;
    use oxrdf::vocab::rdf;
    use oxrdf::{NamedNode, Triple};
    use std::thread;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    #[test]
    fn test_concurrent_reads_share_one_index() {
        let shared = SharedOntology::default();
        for i in 0..10 {
            shared
                .write()
                .insert(&Triple::new(ex(&format!("C{i}")), rdf::TYPE, owl::CLASS))
                .unwrap();
        }
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    assert_eq!(shared.axioms_of_type(AxiomType::Declaration).len(), 10);
                });
            }
        });
        assert!(shared.read().store().is_primary_initialized());
    }

    #[test]
    fn test_writes_are_seen_by_every_handle() {
        let shared = SharedOntology::default();
        let other = shared.clone();
        thread::spawn(move || {
            other
                .add_axiom(Axiom::DeclareClass(ex("A").into()))
                .unwrap();
        })
        .join()
        .unwrap();
        assert_eq!(shared.axiom_count(), 1);
        assert!(shared.try_into_inner().is_ok());
    }
}
