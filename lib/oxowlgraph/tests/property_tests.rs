//! Property-based tests over small random graphs.
//!
//! Graphs are drawn from a tiny vocabulary so that the generated triples often combine into
//! declarations, axioms, restrictions and conflicting typings.

use oxowlgraph::translate::AxiomReader;
use oxowlgraph::vocab::owl;
use oxowlgraph::{
    AnnotatedAxiom, Axiom, ClassExpression, Ontology, OntologyConfig, Pipeline, UnionGraph,
};
use oxrdf::vocab::{rdf, rdfs, xsd};
use oxrdf::{BlankNode, Graph, Literal, NamedNode, NamedOrBlankNode, Term, Triple};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::HashSet;

const NODES: usize = 4;

fn node(i: usize) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/n{i}"))
}

fn subject(i: usize) -> NamedOrBlankNode {
    if i < NODES {
        node(i).into()
    } else {
        BlankNode::new_unchecked(format!("b{}", i - NODES)).into()
    }
}

fn predicate(i: usize) -> NamedNode {
    [
        rdf::TYPE,
        rdfs::SUB_CLASS_OF,
        rdfs::SUB_PROPERTY_OF,
        rdfs::DOMAIN,
        rdfs::RANGE,
        owl::EQUIVALENT_CLASS,
        owl::ON_PROPERTY,
        owl::SOME_VALUES_FROM,
        owl::INVERSE_OF,
    ]
    .get(i)
    .map_or_else(|| node(i % NODES), |p| p.into_owned())
}

fn object(i: usize) -> Term {
    match i {
        0..NODES => node(i).into(),
        4 => owl::CLASS.into_owned().into(),
        5 => owl::OBJECT_PROPERTY.into_owned().into(),
        6 => owl::DATATYPE_PROPERTY.into_owned().into(),
        7 => owl::ANNOTATION_PROPERTY.into_owned().into(),
        8 => owl::NAMED_INDIVIDUAL.into_owned().into(),
        9 => owl::FUNCTIONAL_PROPERTY.into_owned().into(),
        10 => owl::RESTRICTION.into_owned().into(),
        11 => rdfs::DATATYPE.into_owned().into(),
        12 => xsd::INTEGER.into_owned().into(),
        13 => BlankNode::new_unchecked("b0").into(),
        _ => Literal::from("v").into(),
    }
}

fn triple((s, p, o): (usize, usize, usize)) -> Triple {
    Triple::new(subject(s), predicate(p), object(o))
}

fn graph_strategy() -> impl Strategy<Value = Vec<Triple>> {
    vec((0usize..NODES + 2, 0usize..11, 0usize..15), 0..30)
        .prop_map(|triples| triples.into_iter().map(triple).collect())
}

fn axiom(i: usize) -> AnnotatedAxiom {
    let n = node;
    match i % 8 {
        0 => Axiom::DeclareClass(n(0).into()).into(),
        1 => Axiom::subclass_of(n(0), n(1)).into(),
        2 => Axiom::class_assertion(n(1), n(2)).into(),
        3 => Axiom::object_property_assertion(n(3), n(2), n(0)).into(),
        4 => Axiom::annotation_assertion(rdfs::LABEL, n(1), Literal::from("v")).into(),
        5 => Axiom::equivalent_classes(
            n(2),
            ClassExpression::some_values_from(n(3), ClassExpression::class(n(1))),
        )
        .into(),
        6 => Axiom::DeclareObjectProperty(n(3).into()).into(),
        _ => Axiom::DeclareNamedIndividual(n(2)).into(),
    }
}

#[derive(Debug, Clone)]
enum Op {
    Insert(Triple),
    Remove(Triple),
    AddAxiom(AnnotatedAxiom),
    RemoveAxiom(AnnotatedAxiom),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    vec(
        (0u8..4, (0usize..NODES + 2, 0usize..11, 0usize..15), 0usize..8),
        1..40,
    )
    .prop_map(|ops| {
        ops.into_iter()
            .map(|(kind, t, a)| match kind {
                0 => Op::Insert(triple(t)),
                1 => Op::Remove(triple(t)),
                2 => Op::AddAxiom(axiom(a)),
                _ => Op::RemoveAxiom(axiom(a)),
            })
            .collect()
    })
}

fn scanned(ontology: &Ontology) -> HashSet<AnnotatedAxiom> {
    AxiomReader::new(ontology.graph(), ontology.config())
        .scan()
        .into_iter()
        .map(|(axiom, _)| axiom)
        .collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Normalizing a converged graph again changes nothing.
    #[test]
    fn normalization_is_idempotent(triples in graph_strategy()) {
        let config = OntologyConfig::default();
        let pipeline = Pipeline::standard(&config);
        let mut graph = UnionGraph::from(triples.into_iter().collect::<Graph>());

        let first = pipeline.normalize(&mut graph).expect("normalize");
        let normalized = graph.iter().collect::<HashSet<_>>();
        let second = pipeline.normalize(&mut graph).expect("normalize");

        if first.converged {
            prop_assert!(second.is_unchanged());
            prop_assert_eq!(graph.iter().collect::<HashSet<_>>(), normalized);
        }
    }

    /// Normalization always leaves a single header in the base graph.
    #[test]
    fn normalization_leaves_one_header(triples in graph_strategy()) {
        let ontology = Ontology::from_graph(
            triples.into_iter().collect::<Graph>(),
            OntologyConfig::default(),
        )
        .expect("load");
        prop_assert_eq!(
            ontology
                .graph()
                .base()
                .subjects_for_predicate_object(rdf::TYPE, owl::ONTOLOGY)
                .count(),
            1
        );
    }

    /// The index agrees with a full scan after any mix of axiom and raw triple writes.
    #[test]
    fn index_matches_graph(initial in graph_strategy(), ops in ops_strategy()) {
        let mut ontology = Ontology::from_graph(
            initial.into_iter().collect::<Graph>(),
            OntologyConfig::default().normalize_on_load(false),
        )
        .expect("load");
        prop_assert_eq!(ontology.axioms().into_iter().collect::<HashSet<_>>(), scanned(&ontology));

        for op in ops {
            let before = ontology.graph().iter().collect::<HashSet<_>>();
            match &op {
                Op::Insert(t) => {
                    ontology.insert(t).expect("insert");
                }
                Op::Remove(t) => {
                    ontology.remove(t).expect("remove");
                }
                Op::AddAxiom(a) => {
                    if ontology.add_axiom(a.clone()).is_err() {
                        // refused writes are rolled back
                        prop_assert_eq!(ontology.graph().iter().collect::<HashSet<_>>(), before);
                    }
                }
                Op::RemoveAxiom(a) => {
                    ontology.remove_axiom(a.clone()).expect("remove");
                }
            }
            prop_assert_eq!(
                ontology.axioms().into_iter().collect::<HashSet<_>>(),
                scanned(&ontology),
                "after {:?}",
                op
            );
            prop_assert_eq!(ontology.axiom_count(), scanned(&ontology).len());
        }
    }
}
