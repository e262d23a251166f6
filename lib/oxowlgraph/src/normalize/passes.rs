use super::{add, delete, NormalizationPass};
use crate::classifier::Classifier;
use crate::config::OntologyConfig;
use crate::error::GraphError;
use crate::graph::UnionGraph;
use crate::vocab::{is_reserved, owl, OBJECT_PROPERTY_CHARACTERISTICS};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef, NamedOrBlankNode, Term, Triple};
use rustc_hash::FxHashSet;

/// Replaces OWL 1 and RDFS-era constructs with their OWL 2 counterparts.
///
/// * `owl:OntologyProperty` becomes `owl:AnnotationProperty`;
/// * `owl:DataRange` becomes `rdfs:Datatype`;
/// * `owl:DeprecatedClass` becomes `owl:Class` with `owl:deprecated true`;
/// * `owl:DeprecatedProperty` becomes `rdf:Property` with `owl:deprecated true`;
/// * `owl:distinctMembers` becomes `owl:members`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyPromoter;

const LEGACY_TYPES: [(NamedNodeRef<'static>, NamedNodeRef<'static>, bool); 4] = [
    (owl::ONTOLOGY_PROPERTY, owl::ANNOTATION_PROPERTY, false),
    (owl::DATA_RANGE, rdfs::DATATYPE, false),
    (owl::DEPRECATED_CLASS, owl::CLASS, true),
    (owl::DEPRECATED_PROPERTY, rdf::PROPERTY, true),
];

impl NormalizationPass for LegacyPromoter {
    fn name(&self) -> &'static str {
        "legacy-promoter"
    }

    fn applicable(&self, graph: &UnionGraph) -> bool {
        LEGACY_TYPES.iter().any(|(legacy, _, _)| {
            !graph
                .find(None, Some(rdf::TYPE), Some((*legacy).into()))
                .is_empty()
        }) || !graph
            .find(None, Some(owl::DISTINCT_MEMBERS), None)
            .is_empty()
    }

    fn run(&self, graph: &mut UnionGraph, _: &OntologyConfig) -> Result<usize, GraphError> {
        let mut changes = 0;
        for (legacy, modern, deprecated) in LEGACY_TYPES {
            for triple in graph.find(None, Some(rdf::TYPE), Some(legacy.into())) {
                changes += add(graph, &Triple::new(triple.subject.clone(), rdf::TYPE, modern))?;
                if deprecated {
                    changes += add(
                        graph,
                        &Triple::new(triple.subject.clone(), owl::DEPRECATED, Literal::from(true)),
                    )?;
                }
                changes += delete(graph, &triple)?;
            }
        }
        for triple in graph.find(None, Some(owl::DISTINCT_MEMBERS), None) {
            changes += add(
                graph,
                &Triple::new(triple.subject.clone(), owl::MEMBERS, triple.object.clone()),
            )?;
            changes += delete(graph, &triple)?;
        }
        Ok(changes)
    }
}

/// Settles the type triples of properties and classes.
///
/// Object property characteristics imply `owl:ObjectProperty`. Nodes only typed
/// `owl:FunctionalProperty` or `rdf:Property` get the property kind the [`Classifier`]
/// infers for them. Redundant `owl:Class`, `rdfs:Class` and `rdf:Property` types are removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypingFixer;

const OWL_PROPERTY_TYPES: [NamedNodeRef<'static>; 3] = [
    owl::OBJECT_PROPERTY,
    owl::DATATYPE_PROPERTY,
    owl::ANNOTATION_PROPERTY,
];

impl TypingFixer {
    fn add_object_property_types(graph: &mut UnionGraph) -> Result<usize, GraphError> {
        let mut changes = 0;
        for characteristic in OBJECT_PROPERTY_CHARACTERISTICS {
            for triple in graph.find(None, Some(rdf::TYPE), Some(characteristic.into())) {
                changes += add(
                    graph,
                    &Triple::new(triple.subject, rdf::TYPE, owl::OBJECT_PROPERTY),
                )?;
            }
        }
        Ok(changes)
    }

    /// Untyped properties, iterated until the classifier has nothing more to say.
    fn resolve_property_kinds(
        graph: &mut UnionGraph,
        config: &OntologyConfig,
    ) -> Result<usize, GraphError> {
        let mut changes = 0;
        loop {
            let mut resolved = Vec::new();
            {
                let classifier =
                    Classifier::new(graph).with_node_budget(config.classifier_node_budget);
                let mut seen = FxHashSet::default();
                for generic in [owl::FUNCTIONAL_PROPERTY, rdf::PROPERTY] {
                    for triple in graph.find(None, Some(rdf::TYPE), Some(generic.into())) {
                        let node = triple.subject;
                        if !seen.insert(node.clone())
                            || OWL_PROPERTY_TYPES
                                .iter()
                                .any(|t| graph.has_type(node.as_ref(), *t))
                        {
                            continue;
                        }
                        let term = Term::from(node.clone());
                        let kind = if classifier.is_object_property(term.as_ref()) {
                            owl::OBJECT_PROPERTY
                        } else if classifier.is_data_property(term.as_ref()) {
                            owl::DATATYPE_PROPERTY
                        } else if generic == rdf::PROPERTY
                            && classifier.is_annotation_property(term.as_ref())
                        {
                            owl::ANNOTATION_PROPERTY
                        } else {
                            continue;
                        };
                        resolved.push(Triple::new(node, rdf::TYPE, kind));
                    }
                }
            }
            let mut round = 0;
            for triple in &resolved {
                round += add(graph, triple)?;
            }
            changes += round;
            if round == 0 {
                return Ok(changes);
            }
        }
    }

    fn remove_redundant_types(graph: &mut UnionGraph) -> Result<usize, GraphError> {
        let mut redundant = Vec::new();
        for triple in graph.find(None, Some(rdf::TYPE), Some(owl::CLASS.into())) {
            if graph.has_type(triple.subject.as_ref(), owl::RESTRICTION) {
                redundant.push(triple);
            }
        }
        for triple in graph.find(None, Some(rdf::TYPE), Some(rdfs::CLASS.into())) {
            let s = triple.subject.as_ref();
            if graph.has_type(s, owl::CLASS) || graph.has_type(s, rdfs::DATATYPE) {
                redundant.push(triple);
            }
        }
        for triple in graph.find(None, Some(rdf::TYPE), Some(rdf::PROPERTY.into())) {
            let s = triple.subject.as_ref();
            if OWL_PROPERTY_TYPES.iter().any(|t| graph.has_type(s, *t)) {
                redundant.push(triple);
            }
        }
        let mut changes = 0;
        for triple in &redundant {
            changes += delete(graph, triple)?;
        }
        Ok(changes)
    }
}

impl NormalizationPass for TypingFixer {
    fn name(&self) -> &'static str {
        "typing-fixer"
    }

    fn run(&self, graph: &mut UnionGraph, config: &OntologyConfig) -> Result<usize, GraphError> {
        Ok(Self::add_object_property_types(graph)?
            + Self::resolve_property_kinds(graph, config)?
            + Self::remove_redundant_types(graph)?)
    }
}

/// Leaves exactly one `owl:Ontology` header in the base graph.
///
/// Without header, a blank one is created. With several, the one with the most statements
/// (the first one on ties) absorbs the statements of the others, which are deleted. References
/// to the deleted headers are redirected to the kept one.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderMerger;

impl HeaderMerger {
    fn headers(graph: &UnionGraph) -> Vec<NamedOrBlankNode> {
        graph
            .base()
            .subjects_for_predicate_object(rdf::TYPE, owl::ONTOLOGY)
            .map(|s| s.into_owned())
            .collect()
    }
}

impl NormalizationPass for HeaderMerger {
    fn name(&self) -> &'static str {
        "header-merger"
    }

    fn applicable(&self, graph: &UnionGraph) -> bool {
        Self::headers(graph).len() != 1
    }

    fn run(&self, graph: &mut UnionGraph, _: &OntologyConfig) -> Result<usize, GraphError> {
        let headers = Self::headers(graph);
        let mut winner: Option<(&NamedOrBlankNode, usize)> = None;
        for header in &headers {
            let statements = graph.base().triples_for_subject(header).count();
            if winner.is_none_or(|(_, best)| statements > best) {
                winner = Some((header, statements));
            }
        }
        let Some((winner, _)) = winner else {
            return add(
                graph,
                &Triple::new(BlankNode::default(), rdf::TYPE, owl::ONTOLOGY),
            );
        };

        let mut changes = 0;
        for loser in headers.iter().filter(|h| *h != winner) {
            let statements: Vec<Triple> = graph
                .base()
                .triples_for_subject(loser)
                .map(|t| t.into_owned())
                .collect();
            for triple in statements {
                changes += add(
                    graph,
                    &Triple::new(winner.clone(), triple.predicate.clone(), triple.object.clone()),
                )?;
                changes += delete(graph, &triple)?;
            }
            let references: Vec<Triple> = graph
                .base()
                .triples_for_object(&Term::from(loser.clone()))
                .map(|t| t.into_owned())
                .collect();
            for triple in references {
                changes += add(
                    graph,
                    &Triple::new(triple.subject.clone(), triple.predicate.clone(), winner.clone()),
                )?;
                changes += delete(graph, &triple)?;
            }
        }
        Ok(changes)
    }
}

/// Adds the declarations implied by the position of IRIs in the graph.
///
/// Classes: both sides of `rdfs:subClassOf` and `owl:disjointWith`, objects of
/// `owl:complementOf`, `owl:onClass` and of `rdf:type` (outside the reserved vocabulary),
/// members of `owl:disjointUnionOf` lists, and `owl:equivalentClass` operands or
/// `rdfs:domain` objects the classifier accepts as classes.
///
/// Properties: the `owl:onProperty` of a restriction when the classifier decides it is either an
/// object or a data property, but not both.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarationCompletion;

impl DeclarationCompletion {
    fn class_candidates(graph: &UnionGraph, config: &OntologyConfig) -> Vec<Term> {
        let mut candidates = Vec::new();
        for predicate in [rdfs::SUB_CLASS_OF, owl::DISJOINT_WITH] {
            for triple in graph.find(None, Some(predicate), None) {
                candidates.push(triple.subject.into());
                candidates.push(triple.object);
            }
        }
        for predicate in [owl::COMPLEMENT_OF, owl::ON_CLASS] {
            for triple in graph.find(None, Some(predicate), None) {
                candidates.push(triple.object);
            }
        }
        for triple in graph.find(None, Some(owl::DISJOINT_UNION_OF), None) {
            // the owner class is in class position too
            candidates.push(triple.subject.into());
            if let Ok(members) = graph.list(triple.object.as_ref(), config.max_list_length) {
                candidates.extend(members);
            }
        }
        for triple in graph.find(None, Some(rdf::TYPE), None) {
            if matches!(&triple.object, Term::NamedNode(class) if !is_reserved(class.as_ref())) {
                candidates.push(triple.object);
            }
        }

        let classifier = Classifier::new(graph).with_node_budget(config.classifier_node_budget);
        for triple in graph.find(None, Some(owl::EQUIVALENT_CLASS), None) {
            for operand in [Term::from(triple.subject), triple.object] {
                if classifier.is_class(operand.as_ref()) {
                    candidates.push(operand);
                }
            }
        }
        for triple in graph.find(None, Some(rdfs::DOMAIN), None) {
            if classifier.is_class(triple.object.as_ref()) {
                candidates.push(triple.object);
            }
        }
        candidates
    }

    fn property_declarations(graph: &UnionGraph, config: &OntologyConfig) -> Vec<Triple> {
        let classifier = Classifier::new(graph).with_node_budget(config.classifier_node_budget);
        let mut declarations = Vec::new();
        for triple in graph.find(None, Some(owl::ON_PROPERTY), None) {
            let Term::NamedNode(property) = &triple.object else {
                continue;
            };
            if is_reserved(property.as_ref()) {
                continue;
            }
            let node = triple.object.as_ref();
            let declaration = match (
                classifier.is_object_property(node),
                classifier.is_data_property(node),
            ) {
                (true, false) => owl::OBJECT_PROPERTY,
                (false, true) => owl::DATATYPE_PROPERTY,
                _ => continue,
            };
            declarations.push(Triple::new(property.clone(), rdf::TYPE, declaration));
        }
        declarations
    }
}

impl NormalizationPass for DeclarationCompletion {
    fn name(&self) -> &'static str {
        "declaration-completion"
    }

    fn run(&self, graph: &mut UnionGraph, config: &OntologyConfig) -> Result<usize, GraphError> {
        let mut declarations = Vec::new();
        let mut seen = FxHashSet::<NamedNode>::default();
        for candidate in Self::class_candidates(graph, config) {
            let Term::NamedNode(class) = candidate else {
                continue;
            };
            if is_reserved(class.as_ref()) || !seen.insert(class.clone()) {
                continue;
            }
            declarations.push(Triple::new(class, rdf::TYPE, owl::CLASS));
        }
        declarations.extend(Self::property_declarations(graph, config));

        let mut changes = 0;
        for declaration in &declarations {
            changes += add(graph, declaration)?;
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn run(pass: impl NormalizationPass, graph: &mut UnionGraph) -> usize {
        pass.run(graph, &OntologyConfig::default()).unwrap()
    }

    #[test]
    fn test_legacy_promotion() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("p"), rdf::TYPE, owl::DEPRECATED_PROPERTY))
            .unwrap();
        graph
            .insert(&Triple::new(ex("d"), rdf::TYPE, owl::DATA_RANGE))
            .unwrap();
        let x = BlankNode::default();
        graph
            .insert(&Triple::new(x.clone(), owl::DISTINCT_MEMBERS, rdf::NIL))
            .unwrap();
        assert!(LegacyPromoter.applicable(&graph));
        run(LegacyPromoter, &mut graph);
        assert!(graph.contains(&Triple::new(ex("p"), rdf::TYPE, rdf::PROPERTY)));
        assert!(graph.contains(&Triple::new(ex("p"), owl::DEPRECATED, Literal::from(true))));
        assert!(graph.contains(&Triple::new(ex("d"), rdf::TYPE, rdfs::DATATYPE)));
        assert!(graph.contains(&Triple::new(x, owl::MEMBERS, rdf::NIL)));
        assert!(!LegacyPromoter.applicable(&graph));
    }

    #[test]
    fn test_functional_property_resolution() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("age"), rdf::TYPE, owl::FUNCTIONAL_PROPERTY))
            .unwrap();
        graph
            .insert(&Triple::new(ex("age"), rdfs::RANGE, oxrdf::vocab::xsd::INTEGER))
            .unwrap();
        graph
            .insert(&Triple::new(ex("r"), rdf::TYPE, owl::REFLEXIVE_PROPERTY))
            .unwrap();
        run(TypingFixer, &mut graph);
        assert!(graph.contains(&Triple::new(ex("age"), rdf::TYPE, owl::DATATYPE_PROPERTY)));
        assert!(graph.contains(&Triple::new(ex("r"), rdf::TYPE, owl::OBJECT_PROPERTY)));
        assert_eq!(run(TypingFixer, &mut graph), 0);
    }

    #[test]
    fn test_redundant_types_removed() {
        let mut graph = UnionGraph::new();
        let r = BlankNode::default();
        graph
            .insert(&Triple::new(r.clone(), rdf::TYPE, owl::RESTRICTION))
            .unwrap();
        graph
            .insert(&Triple::new(r.clone(), rdf::TYPE, owl::CLASS))
            .unwrap();
        graph
            .insert(&Triple::new(ex("A"), rdf::TYPE, owl::CLASS))
            .unwrap();
        graph
            .insert(&Triple::new(ex("A"), rdf::TYPE, rdfs::CLASS))
            .unwrap();
        run(TypingFixer, &mut graph);
        assert!(!graph.contains(&Triple::new(r, rdf::TYPE, owl::CLASS)));
        assert!(!graph.contains(&Triple::new(ex("A"), rdf::TYPE, rdfs::CLASS)));
        assert!(graph.contains(&Triple::new(ex("A"), rdf::TYPE, owl::CLASS)));
    }

    #[test]
    fn test_header_merge() {
        let mut graph = UnionGraph::new();
        for header in ["h1", "h2"] {
            graph
                .insert(&Triple::new(ex(header), rdf::TYPE, owl::ONTOLOGY))
                .unwrap();
        }
        graph
            .insert(&Triple::new(ex("h2"), owl::VERSION_INFO, Literal::from("2")))
            .unwrap();
        graph
            .insert(&Triple::new(ex("h1"), owl::IMPORTS, ex("other")))
            .unwrap();
        graph
            .insert(&Triple::new(ex("h1"), rdfs::LABEL, Literal::from("one")))
            .unwrap();
        run(HeaderMerger, &mut graph);
        assert_eq!(HeaderMerger::headers(&graph), vec![ex("h1").into()]);
        assert!(graph.contains(&Triple::new(ex("h1"), owl::VERSION_INFO, Literal::from("2"))));
        assert!(graph.find(Some(ex("h2").as_ref().into()), None, None).is_empty());
    }

    #[test]
    fn test_header_merge_redirects_references() {
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("h1"), rdf::TYPE, owl::ONTOLOGY))
            .unwrap();
        graph
            .insert(&Triple::new(ex("h1"), rdfs::LABEL, Literal::from("one")))
            .unwrap();
        graph
            .insert(&Triple::new(ex("h1"), rdfs::COMMENT, Literal::from("first")))
            .unwrap();
        graph
            .insert(&Triple::new(ex("h2"), rdf::TYPE, owl::ONTOLOGY))
            .unwrap();
        graph
            .insert(&Triple::new(ex("h2"), owl::PRIOR_VERSION, ex("h2")))
            .unwrap();
        graph
            .insert(&Triple::new(ex("other"), owl::IMPORTS, ex("h2")))
            .unwrap();
        run(HeaderMerger, &mut graph);
        assert_eq!(HeaderMerger::headers(&graph), vec![ex("h1").into()]);
        assert!(graph.contains(&Triple::new(ex("other"), owl::IMPORTS, ex("h1"))));
        assert!(graph.contains(&Triple::new(ex("h1"), owl::PRIOR_VERSION, ex("h1"))));
        assert!(graph.find(None, None, Some(ex("h2").as_ref().into())).is_empty());
        assert!(graph.find(Some(ex("h2").as_ref().into()), None, None).is_empty());
    }

    #[test]
    fn test_header_created() {
        let mut graph = UnionGraph::new();
        assert!(HeaderMerger.applicable(&graph));
        assert_eq!(run(HeaderMerger, &mut graph), 1);
        assert!(!HeaderMerger.applicable(&graph));
    }

    #[test]
    fn test_imported_header_is_ignored() {
        let mut import = oxrdf::Graph::new();
        import.insert(&Triple::new(ex("imported"), rdf::TYPE, owl::ONTOLOGY));
        let mut graph = UnionGraph::new();
        graph
            .insert(&Triple::new(ex("main"), rdf::TYPE, owl::ONTOLOGY))
            .unwrap();
        graph.add_sub_graph(Arc::new(import));
        assert!(!HeaderMerger.applicable(&graph));
    }

    #[test]
    fn test_declaration_completion() {
        let mut graph = UnionGraph::new();
        let r = BlankNode::default();
        graph
            .insert(&Triple::new(ex("A"), rdfs::SUB_CLASS_OF, r.clone()))
            .unwrap();
        graph
            .insert(&Triple::new(r.clone(), owl::ON_PROPERTY, ex("p")))
            .unwrap();
        graph
            .insert(&Triple::new(r, owl::SOME_VALUES_FROM, ex("B")))
            .unwrap();
        graph
            .insert(&Triple::new(ex("B"), rdf::TYPE, owl::CLASS))
            .unwrap();
        graph
            .insert(&Triple::new(ex("alice"), rdf::TYPE, ex("Person")))
            .unwrap();
        run(DeclarationCompletion, &mut graph);
        for class in ["A", "Person"] {
            assert!(graph.contains(&Triple::new(ex(class), rdf::TYPE, owl::CLASS)));
        }
        assert!(graph.contains(&Triple::new(ex("p"), rdf::TYPE, owl::OBJECT_PROPERTY)));
        assert_eq!(run(DeclarationCompletion, &mut graph), 0);
    }
}
