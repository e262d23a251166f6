//! Structural classification of untyped graph nodes.
//!
//! The [`Classifier`] decides, from graph context only, which OWL categories a node belongs to.
//! Each category is an independent predicate. Evidence is tried in a fixed order and the first
//! match wins:
//! 1. membership in the built-in vocabulary of the category;
//! 2. an explicit `rdf:type` triple;
//! 3. context free structural evidence (e.g. the subject of `owl:onProperty` is a class);
//! 4. recursive evidence about a related node (sub-property edges, domains and ranges,
//!    combinator members, restriction fillers...).
//!
//! Recursion is guarded by one "in progress" set per category. A node met again while it is
//! being decided for the same category yields `false`. This negative default keeps the search
//! linear in the graph size but may under-classify a node whose only evidence is a cycle through
//! itself (e.g. `:p rdfs:subPropertyOf :p`).

use crate::graph::{to_subject, UnionGraph};
use crate::vocab::{is_reserved, owl, BuiltinVocabulary, OBJECT_PROPERTY_CHARACTERISTICS};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Term, TermRef, Triple};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use tracing::{debug, trace};

/// The six categories the [`Classifier`] decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Class,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    Datatype,
    Individual,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Class,
        Self::ObjectProperty,
        Self::DataProperty,
        Self::AnnotationProperty,
        Self::Datatype,
        Self::Individual,
    ];

    #[inline]
    fn index(self) -> usize {
        match self {
            Self::Class => 0,
            Self::ObjectProperty => 1,
            Self::DataProperty => 2,
            Self::AnnotationProperty => 3,
            Self::Datatype => 4,
            Self::Individual => 5,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Class => "class",
            Self::ObjectProperty => "object property",
            Self::DataProperty => "data property",
            Self::AnnotationProperty => "annotation property",
            Self::Datatype => "datatype",
            Self::Individual => "individual",
        })
    }
}

/// The role a node plays in the ontology. A punned node has several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Class,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    Datatype,
    NamedIndividual,
    AnonymousIndividual,
    Unclassified,
}

/// The result of [`Classifier::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub is_class: bool,
    pub is_object_property: bool,
    pub is_data_property: bool,
    pub is_annotation_property: bool,
    pub is_datatype: bool,
    pub is_individual: bool,
    anonymous: bool,
}

impl Classification {
    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Class => self.is_class,
            Category::ObjectProperty => self.is_object_property,
            Category::DataProperty => self.is_data_property,
            Category::AnnotationProperty => self.is_annotation_property,
            Category::Datatype => self.is_datatype,
            Category::Individual => self.is_individual,
        }
    }

    /// All the roles of the node, `[Unclassified]` if it has none.
    pub fn roles(&self) -> Vec<NodeRole> {
        let mut roles = Vec::new();
        if self.is_class {
            roles.push(NodeRole::Class);
        }
        if self.is_object_property {
            roles.push(NodeRole::ObjectProperty);
        }
        if self.is_data_property {
            roles.push(NodeRole::DataProperty);
        }
        if self.is_annotation_property {
            roles.push(NodeRole::AnnotationProperty);
        }
        if self.is_datatype {
            roles.push(NodeRole::Datatype);
        }
        if self.is_individual {
            roles.push(if self.anonymous {
                NodeRole::AnonymousIndividual
            } else {
                NodeRole::NamedIndividual
            });
        }
        if roles.is_empty() {
            roles.push(NodeRole::Unclassified);
        }
        roles
    }

    /// Is the node used in more than one role?
    pub fn is_punned(&self) -> bool {
        self.roles().len() > 1
    }
}

/// Per-call bookkeeping of the classifier recursion.
///
/// One set of in-progress nodes and one table of decided nodes per [`Category`]. It lives for
/// a single top-level predicate call, so graph mutations are always seen by the next call.
#[derive(Debug)]
pub struct ClassifierContext {
    in_progress: [FxHashSet<Term>; 6],
    decided: [FxHashMap<Term, bool>; 6],
    steps: usize,
    budget: Option<usize>,
    exhausted: bool,
}

impl ClassifierContext {
    pub fn new(budget: Option<usize>) -> Self {
        Self {
            in_progress: Default::default(),
            decided: Default::default(),
            steps: 0,
            budget,
            exhausted: false,
        }
    }

    /// Number of (node, category) evaluations done so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Has the node budget run out?
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn spend(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        if let Some(budget) = self.budget {
            if self.steps >= budget {
                debug!("classifier node budget of {budget} evaluations exhausted");
                self.exhausted = true;
                return false;
            }
        }
        self.steps += 1;
        true
    }
}

/// Decides OWL categories of nodes from their graph context.
///
/// ```
/// use oxowlgraph::{Classifier, UnionGraph};
/// use oxowlgraph::vocab::owl;
/// use oxrdf::vocab::rdf;
/// use oxrdf::{NamedNodeRef, TripleRef};
///
/// let p = NamedNodeRef::new("http://example.com/p")?;
/// let mut graph = UnionGraph::new();
/// graph.insert(TripleRef::new(p, rdf::TYPE, owl::ANNOTATION_PROPERTY))?;
///
/// let classification = Classifier::new(&graph).classify(p.into());
/// assert!(classification.is_annotation_property);
/// assert!(!classification.is_object_property);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Copy)]
pub struct Classifier<'a> {
    graph: &'a UnionGraph,
    vocabulary: &'static BuiltinVocabulary,
    node_budget: Option<usize>,
}

impl<'a> Classifier<'a> {
    pub fn new(graph: &'a UnionGraph) -> Self {
        Self {
            graph,
            vocabulary: BuiltinVocabulary::owl2(),
            node_budget: None,
        }
    }

    /// Bounds the number of (node, category) evaluations of each top-level call.
    #[must_use]
    pub fn with_node_budget(mut self, budget: Option<usize>) -> Self {
        self.node_budget = budget;
        self
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: &'static BuiltinVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn graph(&self) -> &'a UnionGraph {
        self.graph
    }

    pub fn vocabulary(&self) -> &'static BuiltinVocabulary {
        self.vocabulary
    }

    /// Evaluates the six predicates, each one with its own context.
    pub fn classify(&self, node: TermRef<'_>) -> Classification {
        Classification {
            is_class: self.is_class(node),
            is_object_property: self.is_object_property(node),
            is_data_property: self.is_data_property(node),
            is_annotation_property: self.is_annotation_property(node),
            is_datatype: self.is_datatype(node),
            is_individual: self.is_individual(node),
            anonymous: node.is_blank_node(),
        }
    }

    /// Evaluates one predicate.
    pub fn is(&self, category: Category, node: TermRef<'_>) -> bool {
        self.decide_with(category, node, &mut ClassifierContext::new(self.node_budget))
    }

    /// Evaluates one predicate with a caller provided context.
    pub fn decide_with(
        &self,
        category: Category,
        node: TermRef<'_>,
        context: &mut ClassifierContext,
    ) -> bool {
        self.decide(category, node, context)
    }

    pub fn is_class(&self, node: TermRef<'_>) -> bool {
        self.is(Category::Class, node)
    }

    pub fn is_object_property(&self, node: TermRef<'_>) -> bool {
        self.is(Category::ObjectProperty, node)
    }

    pub fn is_data_property(&self, node: TermRef<'_>) -> bool {
        self.is(Category::DataProperty, node)
    }

    pub fn is_annotation_property(&self, node: TermRef<'_>) -> bool {
        self.is(Category::AnnotationProperty, node)
    }

    pub fn is_datatype(&self, node: TermRef<'_>) -> bool {
        self.is(Category::Datatype, node)
    }

    pub fn is_individual(&self, node: TermRef<'_>) -> bool {
        self.is(Category::Individual, node)
    }

    fn decide(&self, category: Category, node: TermRef<'_>, ctx: &mut ClassifierContext) -> bool {
        if node.is_literal() {
            return false;
        }
        let i = category.index();
        let key = node.into_owned();
        if let Some(decided) = ctx.decided[i].get(&key) {
            return *decided;
        }
        if ctx.in_progress[i].contains(&key) {
            trace!("{key} is already being decided as {category}, assuming it is not");
            return false;
        }
        if !ctx.spend() {
            return false;
        }
        ctx.in_progress[i].insert(key.clone());
        let result = match category {
            Category::Class => self.class_evidence(node, ctx),
            Category::ObjectProperty => self.object_property_evidence(node, ctx),
            Category::DataProperty => self.data_property_evidence(node, ctx),
            Category::AnnotationProperty => self.annotation_property_evidence(node, ctx),
            Category::Datatype => self.datatype_evidence(node, ctx),
            Category::Individual => self.individual_evidence(node, ctx),
        };
        ctx.in_progress[i].remove(&key);
        if !ctx.exhausted {
            ctx.decided[i].insert(key, result);
        }
        result
    }

    fn class_evidence(&self, node: TermRef<'_>, ctx: &mut ClassifierContext) -> bool {
        if let TermRef::NamedNode(iri) = node {
            if self.vocabulary.is_class(iri) {
                return true;
            }
            if is_reserved(iri) {
                return false;
            }
        }
        let g = self.graph;
        let Some(s) = to_subject(node) else {
            return false;
        };

        // explicit
        if g.has_type(s, owl::CLASS) || g.has_type(s, owl::RESTRICTION) {
            return true;
        }
        let explicit_datatype = g.has_type(s, rdfs::DATATYPE);
        if g.has_type(s, rdfs::CLASS) && !explicit_datatype {
            return true;
        }

        // structural
        if g.has_property(s, owl::ON_PROPERTY)
            || g.has_property(s, owl::COMPLEMENT_OF)
            || g.has_property(s, owl::DISJOINT_UNION_OF)
            || g.has_property(s, owl::HAS_KEY)
            || g.has_property(s, rdfs::SUB_CLASS_OF)
            || g.has_property(s, owl::DISJOINT_WITH)
        {
            return true;
        }
        if self.one_of_kind(s) == Some(false) {
            return true;
        }
        if [
            rdfs::SUB_CLASS_OF,
            owl::DISJOINT_WITH,
            owl::COMPLEMENT_OF,
            owl::ON_CLASS,
            rdf::TYPE,
        ]
        .into_iter()
        .any(|predicate| g.has_subject(predicate, node))
        {
            return true;
        }
        for (owner, predicate) in self.list_owners(node) {
            if predicate == owl::DISJOINT_UNION_OF
                || (predicate == owl::MEMBERS
                    && g.has_type(owner.as_ref(), owl::ALL_DISJOINT_CLASSES))
            {
                return true;
            }
        }

        // recursive
        if !explicit_datatype {
            for predicate in [owl::UNION_OF, owl::INTERSECTION_OF] {
                for list in g.objects(s, predicate) {
                    if self
                        .list_items(list.as_ref())
                        .iter()
                        .any(|m| self.decide(Category::Class, m.as_ref(), ctx))
                    {
                        return true;
                    }
                }
            }
        }
        if self
            .equivalents(node, owl::EQUIVALENT_CLASS)
            .iter()
            .any(|e| self.decide(Category::Class, e.as_ref(), ctx))
        {
            return true;
        }
        for p in g.subjects(rdfs::DOMAIN, node) {
            let p = Term::from(p);
            if self.decide(Category::ObjectProperty, p.as_ref(), ctx)
                || self.decide(Category::DataProperty, p.as_ref(), ctx)
            {
                return true;
            }
        }
        for p in g.subjects(rdfs::RANGE, node) {
            if self.decide(Category::ObjectProperty, Term::from(p).as_ref(), ctx) {
                return true;
            }
        }
        for predicate in [owl::SOME_VALUES_FROM, owl::ALL_VALUES_FROM] {
            for restriction in g.subjects(predicate, node) {
                for property in g.objects(restriction.as_ref(), owl::ON_PROPERTY) {
                    if property.is_blank_node()
                        || self.decide(Category::ObjectProperty, property.as_ref(), ctx)
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn object_property_evidence(&self, node: TermRef<'_>, ctx: &mut ClassifierContext) -> bool {
        if let TermRef::NamedNode(iri) = node {
            if self.vocabulary.is_object_property(iri) {
                return true;
            }
            if is_reserved(iri) {
                return false;
            }
        }
        let g = self.graph;
        let Some(s) = to_subject(node) else {
            return false;
        };

        // explicit
        if g.has_type(s, owl::OBJECT_PROPERTY)
            || OBJECT_PROPERTY_CHARACTERISTICS
                .iter()
                .any(|t| g.has_type(s, *t))
        {
            return true;
        }
        if self.declared_otherwise(s, owl::OBJECT_PROPERTY) {
            return false;
        }

        // structural
        if g.has_property(s, owl::INVERSE_OF)
            || g.has_property(s, owl::PROPERTY_CHAIN_AXIOM)
            || g.has_subject(owl::INVERSE_OF, node)
        {
            return true;
        }
        for restriction in g.subjects(owl::ON_PROPERTY, node) {
            let r = restriction.as_ref();
            if g.has_property(r, owl::HAS_SELF)
                || g.has_property(r, owl::ON_CLASS)
                || g.objects(r, owl::HAS_VALUE).iter().any(|v| !v.is_literal())
            {
                return true;
            }
        }
        for assertion in g.subjects(owl::ASSERTION_PROPERTY, node) {
            if g.has_property(assertion.as_ref(), owl::TARGET_INDIVIDUAL) {
                return true;
            }
        }
        if self
            .list_owners(node)
            .iter()
            .any(|(_, p)| *p == owl::PROPERTY_CHAIN_AXIOM)
        {
            return true;
        }

        // recursive
        if self.related_property_is(Category::ObjectProperty, node, ctx) {
            return true;
        }
        for range in g.objects(s, rdfs::RANGE) {
            if self.decide(Category::Class, range.as_ref(), ctx) {
                return true;
            }
        }
        self.restriction_filler_is(Category::Class, node, ctx)
    }

    fn data_property_evidence(&self, node: TermRef<'_>, ctx: &mut ClassifierContext) -> bool {
        if let TermRef::NamedNode(iri) = node {
            if self.vocabulary.is_data_property(iri) {
                return true;
            }
            if is_reserved(iri) {
                return false;
            }
        }
        let g = self.graph;
        let Some(s) = to_subject(node) else {
            return false;
        };

        // explicit
        if g.has_type(s, owl::DATATYPE_PROPERTY) {
            return true;
        }
        if self.declared_otherwise(s, owl::DATATYPE_PROPERTY) {
            return false;
        }

        // structural
        for restriction in g.subjects(owl::ON_PROPERTY, node) {
            let r = restriction.as_ref();
            if g.has_property(r, owl::ON_DATA_RANGE)
                || g.objects(r, owl::HAS_VALUE).iter().any(Term::is_literal)
            {
                return true;
            }
        }
        for assertion in g.subjects(owl::ASSERTION_PROPERTY, node) {
            if g.has_property(assertion.as_ref(), owl::TARGET_VALUE) {
                return true;
            }
        }

        // recursive
        if self.related_property_is(Category::DataProperty, node, ctx) {
            return true;
        }
        for range in g.objects(s, rdfs::RANGE) {
            if self.decide(Category::Datatype, range.as_ref(), ctx) {
                return true;
            }
        }
        self.restriction_filler_is(Category::Datatype, node, ctx)
    }

    fn annotation_property_evidence(&self, node: TermRef<'_>, ctx: &mut ClassifierContext) -> bool {
        let TermRef::NamedNode(iri) = node else {
            return false;
        };
        if self.vocabulary.is_annotation_property(iri) {
            return true;
        }
        if is_reserved(iri) {
            return false;
        }
        let g = self.graph;
        let s = NamedOrBlankNodeRef::from(iri);

        // explicit
        if g.has_type(s, owl::ANNOTATION_PROPERTY) {
            return true;
        }
        if self.declared_otherwise(s, owl::ANNOTATION_PROPERTY) {
            return false;
        }

        // structural: used on an axiom reification or on an ontology header
        if g.any_with_predicate(iri, |triple| is_annotation_root(g, triple.subject)) {
            return true;
        }

        // recursive
        g.objects(s, rdfs::SUB_PROPERTY_OF)
            .into_iter()
            .chain(
                g.subjects(rdfs::SUB_PROPERTY_OF, node)
                    .into_iter()
                    .map(Term::from),
            )
            .any(|related| self.decide(Category::AnnotationProperty, related.as_ref(), ctx))
    }

    fn datatype_evidence(&self, node: TermRef<'_>, ctx: &mut ClassifierContext) -> bool {
        if let TermRef::NamedNode(iri) = node {
            if self.vocabulary.is_datatype(iri) {
                return true;
            }
            if is_reserved(iri) {
                return false;
            }
        }
        let g = self.graph;
        let Some(s) = to_subject(node) else {
            return false;
        };

        // explicit
        if g.has_type(s, rdfs::DATATYPE) || g.has_type(s, owl::DATA_RANGE) {
            return true;
        }

        // structural
        if g.has_property(s, owl::ON_DATATYPE)
            || g.has_property(s, owl::WITH_RESTRICTIONS)
            || g.has_property(s, owl::DATATYPE_COMPLEMENT_OF)
        {
            return true;
        }
        if self.one_of_kind(s) == Some(true) {
            return true;
        }
        if [owl::ON_DATATYPE, owl::DATATYPE_COMPLEMENT_OF, owl::ON_DATA_RANGE]
            .into_iter()
            .any(|predicate| g.has_subject(predicate, node))
        {
            return true;
        }

        // recursive
        if !g.has_type(s, owl::CLASS) {
            for predicate in [owl::UNION_OF, owl::INTERSECTION_OF] {
                for list in g.objects(s, predicate) {
                    if self
                        .list_items(list.as_ref())
                        .iter()
                        .any(|m| self.decide(Category::Datatype, m.as_ref(), ctx))
                    {
                        return true;
                    }
                }
            }
        }
        if self
            .equivalents(node, owl::EQUIVALENT_CLASS)
            .iter()
            .any(|e| self.decide(Category::Datatype, e.as_ref(), ctx))
        {
            return true;
        }
        for p in g.subjects(rdfs::RANGE, node) {
            if self.decide(Category::DataProperty, Term::from(p).as_ref(), ctx) {
                return true;
            }
        }
        for predicate in [owl::SOME_VALUES_FROM, owl::ALL_VALUES_FROM] {
            for restriction in g.subjects(predicate, node) {
                for property in g.objects(restriction.as_ref(), owl::ON_PROPERTY) {
                    if self.decide(Category::DataProperty, property.as_ref(), ctx) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn individual_evidence(&self, node: TermRef<'_>, ctx: &mut ClassifierContext) -> bool {
        if let TermRef::NamedNode(iri) = node {
            if is_reserved(iri) {
                return false;
            }
        }
        let g = self.graph;
        let Some(s) = to_subject(node) else {
            return false;
        };

        // explicit
        if g.has_type(s, owl::NAMED_INDIVIDUAL) {
            return true;
        }

        // structural
        for triple in g.find(Some(s), None, None) {
            let p = triple.predicate.as_ref();
            if p == owl::SAME_AS || p == owl::DIFFERENT_FROM {
                return true;
            }
            if p == rdf::TYPE {
                if let Term::NamedNode(class) = &triple.object {
                    if !is_reserved(class.as_ref()) || self.vocabulary.is_class(class.as_ref()) {
                        return true;
                    }
                } else if triple.object.is_blank_node() {
                    return true;
                }
            }
        }
        if INDIVIDUAL_OBJECT_PREDICATES
            .into_iter()
            .any(|predicate| g.has_subject(predicate, node))
        {
            return true;
        }
        for (owner, predicate) in self.list_owners(node) {
            if predicate == owl::ONE_OF
                || ((predicate == owl::MEMBERS || predicate == owl::DISTINCT_MEMBERS)
                    && g.has_type(owner.as_ref(), owl::ALL_DIFFERENT))
            {
                return true;
            }
        }

        // recursive: subject or object of a property assertion
        for triple in g.find(Some(s), None, None) {
            let p = triple.predicate.as_ref();
            if is_reserved(p) {
                continue;
            }
            let category = if triple.object.is_literal() {
                Category::DataProperty
            } else {
                Category::ObjectProperty
            };
            if self.decide(category, p.into(), ctx) {
                return true;
            }
        }
        g.any_with_object(node, |triple| {
            !is_reserved(triple.predicate)
                && self.decide(Category::ObjectProperty, triple.predicate.into(), ctx)
        })
    }

    /// Does the node carry an explicit property declaration other than `expected`?
    fn declared_otherwise(
        &self,
        node: NamedOrBlankNodeRef<'_>,
        expected: NamedNodeRef<'_>,
    ) -> bool {
        [
            owl::OBJECT_PROPERTY,
            owl::DATATYPE_PROPERTY,
            owl::ANNOTATION_PROPERTY,
        ]
        .into_iter()
        .any(|t| t != expected && self.graph.has_type(node, t))
    }

    /// Sub-property, equivalence and disjointness edges, in both directions, plus siblings in
    /// `owl:AllDisjointProperties` groups.
    fn related_property_is(
        &self,
        category: Category,
        node: TermRef<'_>,
        ctx: &mut ClassifierContext,
    ) -> bool {
        for predicate in [
            rdfs::SUB_PROPERTY_OF,
            owl::EQUIVALENT_PROPERTY,
            owl::PROPERTY_DISJOINT_WITH,
        ] {
            if self
                .equivalents(node, predicate)
                .iter()
                .any(|related| self.decide(category, related.as_ref(), ctx))
            {
                return true;
            }
        }
        for (owner, predicate) in self.list_owners(node) {
            if predicate == owl::MEMBERS
                && self
                    .graph
                    .has_type(owner.as_ref(), owl::ALL_DISJOINT_PROPERTIES)
            {
                for list in self.graph.objects(owner.as_ref(), owl::MEMBERS) {
                    if self
                        .list_items(list.as_ref())
                        .iter()
                        .filter(|m| m.as_ref() != node)
                        .any(|m| self.decide(category, m.as_ref(), ctx))
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Is the node the property of a restriction whose filler is of the given category?
    fn restriction_filler_is(
        &self,
        filler_category: Category,
        node: TermRef<'_>,
        ctx: &mut ClassifierContext,
    ) -> bool {
        for restriction in self.graph.subjects(owl::ON_PROPERTY, node) {
            for predicate in [owl::SOME_VALUES_FROM, owl::ALL_VALUES_FROM] {
                for filler in self.graph.objects(restriction.as_ref(), predicate) {
                    if self.decide(filler_category, filler.as_ref(), ctx) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Nodes linked to `node` by `predicate` in either direction, excluding itself.
    fn equivalents(&self, node: TermRef<'_>, predicate: NamedNodeRef<'_>) -> Vec<Term> {
        let mut related = Vec::new();
        if let Some(s) = to_subject(node) {
            related.extend(self.graph.objects(s, predicate));
        }
        related.extend(
            self.graph
                .subjects(predicate, node)
                .into_iter()
                .map(Term::from),
        );
        // self loops are left to the cycle guard
        related
    }

    /// `Some(true)` if the node has an `owl:oneOf` list of literals, `Some(false)` if the list
    /// holds individuals.
    fn one_of_kind(&self, node: NamedOrBlankNodeRef<'_>) -> Option<bool> {
        let list = self.graph.object(node, owl::ONE_OF)?;
        let items = self.list_items(list.as_ref());
        let first = items.first()?;
        Some(first.is_literal())
    }

    fn list_items(&self, head: TermRef<'_>) -> Vec<Term> {
        self.graph.list(head, usize::MAX).unwrap_or_default()
    }

    /// The (subject, predicate) pairs pointing at the head of any RDF list containing `node`.
    fn list_owners(&self, node: TermRef<'_>) -> Vec<(NamedOrBlankNode, NamedNodeRef<'static>)> {
        let g = self.graph;
        let mut owners = Vec::new();
        for cell in g.subjects(rdf::FIRST, node) {
            let mut head = cell;
            let mut visited = FxHashSet::default();
            while visited.insert(head.clone()) {
                let previous = g
                    .subjects(rdf::REST, Term::from(head.clone()).as_ref())
                    .into_iter()
                    .next();
                let Some(previous) = previous else {
                    break;
                };
                head = previous;
            }
            let head = Term::from(head);
            for triple in g.find(None, None, Some(head.as_ref())) {
                if let Some(predicate) = LIST_OWNER_PREDICATES
                    .iter()
                    .find(|p| **p == triple.predicate.as_ref())
                {
                    owners.push((triple.subject, *predicate));
                }
            }
        }
        owners
    }
}

/// Is the node an axiom reification, an annotation or an ontology header?
fn is_annotation_root(graph: &UnionGraph, node: NamedOrBlankNodeRef<'_>) -> bool {
    ANNOTATION_ROOT_TYPES
        .into_iter()
        .any(|class| graph.has_type(node, class))
}

const ANNOTATION_ROOT_TYPES: [NamedNodeRef<'static>; 3] =
    [owl::AXIOM, owl::ANNOTATION, owl::ONTOLOGY];

/// Predicates whose object is an individual.
const INDIVIDUAL_OBJECT_PREDICATES: [NamedNodeRef<'static>; 5] = [
    owl::SAME_AS,
    owl::DIFFERENT_FROM,
    owl::HAS_VALUE,
    owl::SOURCE_INDIVIDUAL,
    owl::TARGET_INDIVIDUAL,
];

/// Types of the nodes grouping the members of an n-ary axiom.
const GROUP_TYPES: [NamedNodeRef<'static>; 3] = [
    owl::ALL_DISJOINT_CLASSES,
    owl::ALL_DISJOINT_PROPERTIES,
    owl::ALL_DIFFERENT,
];

const PROPERTY_CATEGORIES: [Category; 3] = [
    Category::ObjectProperty,
    Category::DataProperty,
    Category::AnnotationProperty,
];

/// The decisions whose direct evidence may include one of `triples`.
///
/// The triples may be in the graph or about to be inserted into it. `None` means their effect
/// is not local: they link RDF list cells or type a group of list members.
pub(crate) fn decisions_touched_by(
    graph: &UnionGraph,
    triples: &[Triple],
    max_list_length: usize,
) -> Option<Vec<(Term, Category)>> {
    let around = Around { graph, extra: triples };
    let mut touched = FxHashSet::default();
    for triple in triples {
        if !around.touch(triple, max_list_length, &mut touched) {
            return None;
        }
    }
    Some(touched.into_iter().collect())
}

/// Can deciding another node recurse into this decision?
pub(crate) fn is_depended_on(graph: &UnionGraph, node: TermRef<'_>, category: Category) -> bool {
    let Some(s) = to_subject(node) else {
        return false;
    };
    let linked =
        |predicate| graph.has_subject(predicate, node) || graph.has_property(s, predicate);
    match category {
        Category::Class | Category::Datatype => {
            graph.has_subject(rdf::FIRST, node)
                || linked(owl::EQUIVALENT_CLASS)
                || graph.has_subject(rdfs::RANGE, node)
                || graph.has_subject(owl::SOME_VALUES_FROM, node)
                || graph.has_subject(owl::ALL_VALUES_FROM, node)
        }
        Category::ObjectProperty | Category::DataProperty => {
            graph.has_property(s, rdfs::DOMAIN)
                || graph.has_property(s, rdfs::RANGE)
                || graph.has_subject(owl::ON_PROPERTY, node)
                || graph.has_subject(rdf::FIRST, node)
                || linked(rdfs::SUB_PROPERTY_OF)
                || linked(owl::EQUIVALENT_PROPERTY)
                || linked(owl::PROPERTY_DISJOINT_WITH)
                || matches!(node, TermRef::NamedNode(p) if graph.is_used_as_predicate(p))
        }
        Category::AnnotationProperty => linked(rdfs::SUB_PROPERTY_OF),
        Category::Individual => false,
    }
}

/// The graph plus triples not inserted yet.
struct Around<'a> {
    graph: &'a UnionGraph,
    extra: &'a [Triple],
}

impl Around<'_> {
    fn objects(&self, subject: NamedOrBlankNodeRef<'_>, predicate: NamedNodeRef<'_>) -> Vec<Term> {
        let mut objects = self.graph.objects(subject, predicate);
        objects.extend(
            self.extra
                .iter()
                .filter(|t| t.subject.as_ref() == subject && t.predicate.as_ref() == predicate)
                .map(|t| t.object.clone()),
        );
        objects
    }

    fn predicates(&self, subject: NamedOrBlankNodeRef<'_>) -> Vec<Term> {
        self.graph
            .find(Some(subject), None, None)
            .into_iter()
            .chain(
                self.extra
                    .iter()
                    .filter(|t| t.subject.as_ref() == subject)
                    .cloned(),
            )
            .map(|t| t.predicate.into())
            .collect()
    }

    fn is_annotation_root(&self, subject: NamedOrBlankNodeRef<'_>) -> bool {
        is_annotation_root(self.graph, subject)
            || self.objects(subject, rdf::TYPE).iter().any(|class| match class {
                Term::NamedNode(class) => ANNOTATION_ROOT_TYPES.contains(&class.as_ref()),
                _ => false,
            })
    }

    /// Marks the decisions `triple` is direct evidence for. Returns `false` if they can not be
    /// listed.
    fn touch(
        &self,
        triple: &Triple,
        max_list_length: usize,
        out: &mut FxHashSet<(Term, Category)>,
    ) -> bool {
        let subject = triple.subject.as_ref();
        let s = Term::from(triple.subject.clone());
        let p = triple.predicate.as_ref();
        let o = &triple.object;
        let restricted = |predicate| self.objects(subject, predicate);

        mark(out, &s, &[Category::Individual]);
        if !is_reserved(p) {
            mark(out, o, &[Category::Individual]);
        }
        if self.is_annotation_root(subject) {
            mark(
                out,
                &Term::from(p.into_owned()),
                &[Category::AnnotationProperty],
            );
        }

        if p == rdf::FIRST || p == rdf::REST {
            return false;
        }
        if LIST_OWNER_PREDICATES.contains(&p) {
            let Ok(items) = self.graph.list(o.as_ref(), max_list_length) else {
                return false;
            };
            for item in &items {
                mark(out, item, &Category::ALL);
            }
        }
        if p == rdf::TYPE {
            mark(out, o, &[Category::Class]);
            let Term::NamedNode(class) = o else {
                return true;
            };
            let class = class.as_ref();
            if GROUP_TYPES.contains(&class) {
                return false;
            }
            if [owl::CLASS, owl::RESTRICTION, rdfs::CLASS, rdfs::DATATYPE, owl::DATA_RANGE]
                .contains(&class)
            {
                mark(out, &s, &[Category::Class, Category::Datatype]);
            } else if [
                owl::OBJECT_PROPERTY,
                owl::DATATYPE_PROPERTY,
                owl::ANNOTATION_PROPERTY,
                owl::FUNCTIONAL_PROPERTY,
            ]
            .contains(&class)
                || OBJECT_PROPERTY_CHARACTERISTICS.contains(&class)
            {
                mark(out, &s, &PROPERTY_CATEGORIES);
            } else if ANNOTATION_ROOT_TYPES.contains(&class) {
                for predicate in self.predicates(subject) {
                    mark(out, &predicate, &[Category::AnnotationProperty]);
                }
            }
        } else if p == rdfs::SUB_CLASS_OF || p == owl::DISJOINT_WITH || p == owl::COMPLEMENT_OF {
            mark(out, &s, &[Category::Class]);
            mark(out, o, &[Category::Class]);
        } else if p == owl::EQUIVALENT_CLASS
            || p == owl::UNION_OF
            || p == owl::INTERSECTION_OF
            || p == owl::ONE_OF
        {
            mark(out, &s, &[Category::Class, Category::Datatype]);
            mark(out, o, &[Category::Class, Category::Datatype]);
        } else if p == owl::DISJOINT_UNION_OF || p == owl::HAS_KEY {
            mark(out, &s, &[Category::Class]);
        } else if p == owl::ON_CLASS {
            mark(out, &s, &[Category::Class]);
            mark(out, o, &[Category::Class]);
            for property in restricted(owl::ON_PROPERTY) {
                mark(out, &property, &[Category::ObjectProperty]);
            }
        } else if p == owl::ON_PROPERTY {
            mark(out, &s, &[Category::Class]);
            mark(out, o, &[Category::ObjectProperty, Category::DataProperty]);
            for filler in restricted(owl::SOME_VALUES_FROM)
                .into_iter()
                .chain(restricted(owl::ALL_VALUES_FROM))
            {
                mark(out, &filler, &[Category::Class, Category::Datatype]);
            }
        } else if p == owl::SOME_VALUES_FROM || p == owl::ALL_VALUES_FROM {
            mark(out, o, &[Category::Class, Category::Datatype]);
            for property in restricted(owl::ON_PROPERTY) {
                mark(
                    out,
                    &property,
                    &[Category::ObjectProperty, Category::DataProperty],
                );
            }
        } else if p == owl::HAS_VALUE || p == owl::HAS_SELF || p == owl::ON_DATA_RANGE {
            mark(out, o, &[Category::Individual, Category::Datatype]);
            for property in restricted(owl::ON_PROPERTY) {
                mark(
                    out,
                    &property,
                    &[Category::ObjectProperty, Category::DataProperty],
                );
            }
        } else if p == owl::INVERSE_OF || p == owl::PROPERTY_CHAIN_AXIOM {
            mark(out, &s, &[Category::ObjectProperty]);
            mark(out, o, &[Category::ObjectProperty]);
        } else if p == rdfs::SUB_PROPERTY_OF
            || p == owl::EQUIVALENT_PROPERTY
            || p == owl::PROPERTY_DISJOINT_WITH
        {
            mark(out, &s, &PROPERTY_CATEGORIES);
            mark(out, o, &PROPERTY_CATEGORIES);
        } else if p == rdfs::DOMAIN {
            mark(out, &s, &[Category::ObjectProperty, Category::DataProperty]);
            mark(out, o, &[Category::Class]);
        } else if p == rdfs::RANGE {
            mark(out, &s, &[Category::ObjectProperty, Category::DataProperty]);
            mark(out, o, &[Category::Class, Category::Datatype]);
        } else if p == owl::ON_DATATYPE
            || p == owl::DATATYPE_COMPLEMENT_OF
            || p == owl::WITH_RESTRICTIONS
        {
            mark(out, &s, &[Category::Datatype]);
            mark(out, o, &[Category::Datatype]);
        } else if p == owl::ASSERTION_PROPERTY {
            mark(out, o, &[Category::ObjectProperty, Category::DataProperty]);
        } else if p == owl::TARGET_INDIVIDUAL || p == owl::TARGET_VALUE {
            mark(out, o, &[Category::Individual]);
            for property in restricted(owl::ASSERTION_PROPERTY) {
                mark(
                    out,
                    &property,
                    &[Category::ObjectProperty, Category::DataProperty],
                );
            }
        } else if INDIVIDUAL_OBJECT_PREDICATES.contains(&p) {
            mark(out, o, &[Category::Individual]);
        }
        true
    }
}

fn mark(out: &mut FxHashSet<(Term, Category)>, node: &Term, categories: &[Category]) {
    if node.is_literal() {
        return;
    }
    for category in categories {
        out.insert((node.clone(), *category));
    }
}

/// Predicates whose object is an RDF list of entities.
const LIST_OWNER_PREDICATES: [NamedNodeRef<'static>; 7] = [
    owl::DISJOINT_UNION_OF,
    owl::MEMBERS,
    owl::DISTINCT_MEMBERS,
    owl::ONE_OF,
    owl::PROPERTY_CHAIN_AXIOM,
    owl::UNION_OF,
    owl::INTERSECTION_OF,
];

impl fmt::Debug for Classifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("graph", self.graph)
            .field("node_budget", &self.node_budget)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{BlankNode, Literal, NamedNode, Triple};

    fn ex(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{name}"))
    }

    fn graph(triples: &[Triple]) -> UnionGraph {
        let mut graph = UnionGraph::new();
        for t in triples {
            graph.insert(t).unwrap();
        }
        graph
    }

    #[test]
    fn test_explicit_annotation_property() {
        let g = graph(&[Triple::new(ex("P"), rdf::TYPE, owl::ANNOTATION_PROPERTY)]);
        let c = Classifier::new(&g).classify(ex("P").as_ref().into());
        assert!(c.is_annotation_property);
        assert!(!c.is_object_property);
        assert!(!c.is_data_property);
        assert_eq!(c.roles(), vec![NodeRole::AnnotationProperty]);
    }

    #[test]
    fn test_union_members_make_a_class() {
        let first = BlankNode::default();
        let second = BlankNode::default();
        let g = graph(&[
            Triple::new(ex("C"), owl::UNION_OF, first.clone()),
            Triple::new(first.clone(), rdf::FIRST, ex("A")),
            Triple::new(first, rdf::REST, second.clone()),
            Triple::new(second.clone(), rdf::FIRST, ex("B")),
            Triple::new(second, rdf::REST, rdf::NIL),
            Triple::new(ex("A"), rdf::TYPE, owl::CLASS),
            Triple::new(ex("B"), rdf::TYPE, owl::CLASS),
        ]);
        assert!(Classifier::new(&g).is_class(ex("C").as_ref().into()));
    }

    #[test]
    fn test_builtins() {
        let g = UnionGraph::new();
        let classifier = Classifier::new(&g);
        assert!(classifier.is_class(owl::THING.into()));
        assert!(classifier.is_datatype(oxrdf::vocab::xsd::INTEGER.into()));
        assert!(classifier.is_annotation_property(rdfs::LABEL.into()));
        assert!(!classifier.is_class(owl::CLASS.into()));
    }

    #[test]
    fn test_self_sub_property_is_cut_off() {
        let g = graph(&[Triple::new(ex("X"), rdfs::SUB_PROPERTY_OF, ex("X"))]);
        let classifier = Classifier::new(&g);
        assert!(!classifier.is_object_property(ex("X").as_ref().into()));
        assert!(!classifier.is_data_property(ex("X").as_ref().into()));
        assert!(!classifier.is_annotation_property(ex("X").as_ref().into()));
    }

    #[test]
    fn test_sub_property_inherits_category() {
        let g = graph(&[
            Triple::new(ex("q"), rdf::TYPE, owl::DATATYPE_PROPERTY),
            Triple::new(ex("p"), rdfs::SUB_PROPERTY_OF, ex("q")),
        ]);
        let classifier = Classifier::new(&g);
        assert!(classifier.is_data_property(ex("p").as_ref().into()));
        assert!(!classifier.is_object_property(ex("p").as_ref().into()));
    }

    #[test]
    fn test_restriction_structure() {
        let restriction = BlankNode::default();
        let g = graph(&[
            Triple::new(restriction.clone(), owl::ON_PROPERTY, ex("p")),
            Triple::new(restriction.clone(), owl::HAS_VALUE, Literal::from(3)),
        ]);
        let classifier = Classifier::new(&g);
        assert!(classifier.is_class(restriction.as_ref().into()));
        assert!(classifier.is_data_property(ex("p").as_ref().into()));
        assert!(!classifier.is_object_property(ex("p").as_ref().into()));
    }

    #[test]
    fn test_individual_from_assertion() {
        let g = graph(&[
            Triple::new(ex("knows"), rdf::TYPE, owl::OBJECT_PROPERTY),
            Triple::new(ex("alice"), ex("knows"), ex("bob")),
        ]);
        let classifier = Classifier::new(&g);
        assert!(classifier.is_individual(ex("alice").as_ref().into()));
        assert!(classifier.is_individual(ex("bob").as_ref().into()));
        assert!(!classifier.is_class(ex("alice").as_ref().into()));
    }

    #[test]
    fn test_punning_is_reported() {
        let g = graph(&[
            Triple::new(ex("X"), rdf::TYPE, owl::CLASS),
            Triple::new(ex("X"), rdf::TYPE, rdfs::DATATYPE),
        ]);
        let c = Classifier::new(&g).classify(ex("X").as_ref().into());
        assert!(c.is_class && c.is_datatype);
        assert!(c.is_punned());
    }

    #[test]
    fn test_budget_exhaustion_is_negative() {
        let g = graph(&[
            Triple::new(ex("a"), rdfs::SUB_PROPERTY_OF, ex("b")),
            Triple::new(ex("b"), rdfs::SUB_PROPERTY_OF, ex("c")),
            Triple::new(ex("c"), rdf::TYPE, owl::OBJECT_PROPERTY),
        ]);
        let unbounded = Classifier::new(&g);
        assert!(unbounded.is_object_property(ex("a").as_ref().into()));
        let bounded = Classifier::new(&g).with_node_budget(Some(1));
        assert!(!bounded.is_object_property(ex("a").as_ref().into()));
        let mut context = ClassifierContext::new(Some(1));
        bounded.decide_with(Category::ObjectProperty, ex("a").as_ref().into(), &mut context);
        assert!(context.is_exhausted());
    }

    #[test]
    fn test_literal_is_nothing() {
        let g = UnionGraph::new();
        let c = Classifier::new(&g).classify(oxrdf::LiteralRef::new_simple_literal("x").into());
        assert_eq!(c.roles(), vec![NodeRole::Unclassified]);
    }
}
