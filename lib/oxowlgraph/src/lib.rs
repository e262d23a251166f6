#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

mod axiom;
pub mod classifier;
mod config;
mod entity;
mod error;
mod expression;
mod graph;
pub mod normalize;
mod ontology;
pub mod store;
mod sync;
pub mod translate;
pub mod view;
pub mod vocab;

pub use axiom::{AnnotatedAxiom, Annotation, Axiom, AxiomType};
pub use classifier::{Category, Classification, Classifier, ClassifierContext, NodeRole};
pub use config::OntologyConfig;
pub use entity::{
    AnnotationProperty, DataProperty, Datatype, Entity, Individual, ObjectProperty, OwlClass,
};
pub use error::{AxiomError, GraphError, MakeError, OntologyError, ViewError};
pub use expression::{ClassExpression, DataRange, ObjectPropertyExpression};
pub use graph::UnionGraph;
pub use normalize::{NormalizationPass, NormalizationReport, Pipeline};
pub use ontology::Ontology;
pub use store::AxiomStore;
pub use sync::SharedOntology;
pub use view::{Interface, Personality, View, ViewKind};
pub use vocab::BuiltinVocabulary;
