/// Configuration of an [`Ontology`](crate::Ontology).
///
/// ```
/// use oxowlgraph::OntologyConfig;
///
/// let config = OntologyConfig::new()
///     .classifier_node_budget(Some(10_000))
///     .normalize_on_load(false);
/// assert_eq!(config.classifier_node_budget, Some(10_000));
/// ```
#[derive(Debug, Clone)]
pub struct OntologyConfig {
    /// Maximum number of (node, category) evaluations per top-level classifier call
    /// (None = bounded only by the graph size).
    pub classifier_node_budget: Option<usize>,
    /// Maximum number of items read from a single RDF list.
    pub max_list_length: usize,
    /// Maximum number of full pipeline rounds run by a normalization.
    pub normalization_rounds: usize,
    /// Whether graphs given to [`Ontology::from_graph`](crate::Ontology::from_graph) are
    /// normalized straight away.
    pub normalize_on_load: bool,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            classifier_node_budget: None,
            max_list_length: 10_000,
            normalization_rounds: 8,
            normalize_on_load: true,
        }
    }
}

impl OntologyConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the classifier node budget.
    #[must_use]
    pub fn classifier_node_budget(mut self, value: Option<usize>) -> Self {
        self.classifier_node_budget = value;
        self
    }

    /// Sets the maximum RDF list length.
    #[must_use]
    pub fn max_list_length(mut self, value: usize) -> Self {
        self.max_list_length = value;
        self
    }

    /// Sets the maximum number of normalization rounds.
    #[must_use]
    pub fn normalization_rounds(mut self, value: usize) -> Self {
        self.normalization_rounds = value.max(1);
        self
    }

    /// Sets whether loaded graphs are normalized.
    #[must_use]
    pub fn normalize_on_load(mut self, value: bool) -> Self {
        self.normalize_on_load = value;
        self
    }
}
