//! Rewrites a graph into the canonical form the rest of the crate reads.
//!
//! A [`Pipeline`] runs an ordered list of [`NormalizationPass`]es, round after round, until
//! a round leaves the graph untouched. Normalizing a normalized graph is then a no-op.
//!
//! ```
//! use oxowlgraph::normalize::Pipeline;
//! use oxowlgraph::vocab::owl;
//! use oxowlgraph::{OntologyConfig, UnionGraph};
//! use oxrdf::vocab::rdf;
//! use oxrdf::{NamedNodeRef, TripleRef};
//!
//! let p = NamedNodeRef::new("http://example.com/p")?;
//! let mut graph = UnionGraph::new();
//! graph.insert(TripleRef::new(p, rdf::TYPE, owl::TRANSITIVE_PROPERTY))?;
//!
//! let report = Pipeline::standard(&OntologyConfig::default()).normalize(&mut graph)?;
//! assert!(report.converged);
//! assert!(graph.contains(TripleRef::new(p, rdf::TYPE, owl::OBJECT_PROPERTY)));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

mod passes;

pub use passes::{DeclarationCompletion, HeaderMerger, LegacyPromoter, TypingFixer};

use crate::config::OntologyConfig;
use crate::error::GraphError;
use crate::graph::UnionGraph;
use oxrdf::Triple;
use std::fmt;
use tracing::{debug, trace, warn};

/// One rewriting step of a [`Pipeline`].
pub trait NormalizationPass: Send + Sync {
    fn name(&self) -> &'static str;

    /// Cheap test telling if the pass has anything to do.
    fn applicable(&self, _graph: &UnionGraph) -> bool {
        true
    }

    /// Rewrites the graph and returns the number of triples inserted or removed.
    fn run(&self, graph: &mut UnionGraph, config: &OntologyConfig) -> Result<usize, GraphError>;
}

/// An ordered list of passes run to a fixed point.
pub struct Pipeline {
    passes: Vec<Box<dyn NormalizationPass>>,
    config: OntologyConfig,
}

impl Pipeline {
    /// A pipeline without passes.
    pub fn new(config: OntologyConfig) -> Self {
        Self {
            passes: Vec::new(),
            config,
        }
    }

    /// Legacy constructs, then typing, then the ontology header, then declarations.
    pub fn standard(config: &OntologyConfig) -> Self {
        Self::new(config.clone())
            .with_pass(LegacyPromoter)
            .with_pass(TypingFixer)
            .with_pass(HeaderMerger)
            .with_pass(DeclarationCompletion)
    }

    #[must_use]
    pub fn with_pass(mut self, pass: impl NormalizationPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn pass_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.iter().map(|p| p.name())
    }

    /// Runs the passes until a full round changes nothing or the round bound is hit.
    pub fn normalize(&self, graph: &mut UnionGraph) -> Result<NormalizationReport, GraphError> {
        let mut report = NormalizationReport::default();
        let max_rounds = self.config.normalization_rounds.max(1);
        for round in 1..=max_rounds {
            report.rounds = round;
            let mut changes = 0;
            for pass in &self.passes {
                if !pass.applicable(graph) {
                    trace!("normalization pass {} skipped", pass.name());
                    continue;
                }
                let pass_changes = pass.run(graph, &self.config)?;
                debug!(
                    "normalization pass {} (round {round}): {pass_changes} changes",
                    pass.name()
                );
                report.passes.push(PassReport {
                    name: pass.name(),
                    round,
                    changes: pass_changes,
                });
                changes += pass_changes;
            }
            if changes == 0 {
                report.converged = true;
                return Ok(report);
            }
        }
        warn!("normalization stopped after {max_rounds} rounds without reaching a fixed point");
        Ok(report)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("passes", &self.pass_names().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

/// What a [`Pipeline::normalize`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Number of rounds run, including the final unchanged one.
    pub rounds: usize,
    /// Every pass run, in order.
    pub passes: Vec<PassReport>,
    /// Did the last round leave the graph untouched?
    pub converged: bool,
}

impl NormalizationReport {
    /// Total number of triples inserted or removed.
    pub fn changes(&self) -> usize {
        self.passes.iter().map(|p| p.changes).sum()
    }

    pub fn is_unchanged(&self) -> bool {
        self.changes() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub name: &'static str,
    pub round: usize,
    pub changes: usize,
}

/// Inserts a triple, counting it if it was new.
fn add(graph: &mut UnionGraph, triple: &Triple) -> Result<usize, GraphError> {
    Ok(graph.insert(triple)?.into())
}

/// Removes a triple from the base graph, counting it if it was there.
fn delete(graph: &mut UnionGraph, triple: &Triple) -> Result<usize, GraphError> {
    Ok(graph.remove(triple)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::owl;
    use oxrdf::vocab::{rdf, rdfs};
    use oxrdf::{Literal, NamedNode};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn normalize(graph: &mut UnionGraph) -> NormalizationReport {
        Pipeline::standard(&OntologyConfig::default())
            .normalize(graph)
            .unwrap()
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("A"), rdf::TYPE, owl::DEPRECATED_CLASS))
            .unwrap();
        graph
            .insert(&Triple::new(ex("p"), rdf::TYPE, owl::SYMMETRIC_PROPERTY))
            .unwrap();
        graph
            .insert(&Triple::new(ex("a"), ex("p"), ex("b")))
            .unwrap();
        let first = normalize(&mut graph);
        assert!(first.converged);
        assert!(!first.is_unchanged());
        let snapshot = graph.to_string();
        let second = normalize(&mut graph);
        assert!(second.is_unchanged());
        assert_eq!(second.rounds, 1);
        assert_eq!(graph.to_string(), snapshot);
    }

    #[test]
    fn test_round_bound() {
        struct Flip;

        impl NormalizationPass for Flip {
            fn name(&self) -> &'static str {
                "flip"
            }

            fn run(&self, graph: &mut UnionGraph, _: &OntologyConfig) -> Result<usize, GraphError> {
                let triple = Triple::new(ex("s"), ex("p"), Literal::from(true));
                if graph.contains(&triple) {
                    delete(graph, &triple)
                } else {
                    add(graph, &triple)
                }
            }
        }

        let mut graph = UnionGraph::new();
        let report = Pipeline::new(OntologyConfig::default().normalization_rounds(3))
            .with_pass(Flip)
            .normalize(&mut graph)
            .unwrap();
        assert_eq!(report.rounds, 3);
        assert!(!report.converged);
        assert_eq!(report.changes(), 3);
    }

    #[test]
    fn test_skips_inapplicable_passes() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("onto"), rdf::TYPE, owl::ONTOLOGY))
            .unwrap();
        graph
            .insert(&Triple::new(ex("A"), rdfs::SUB_CLASS_OF, owl::THING))
            .unwrap();
        let report = normalize(&mut graph);
        assert!(report.passes.iter().all(|p| p.name != "legacy-promoter"));
        assert!(graph.contains(&Triple::new(ex("A"), rdf::TYPE, owl::CLASS)));
    }
}
