use crate::annotations::GeneId;
use crate::term::{TermId, TermMeta};
use crate::BaseOntology;

/// A single Gene Ontology annotation fact
///
/// Links one gene to one term. The term belongs to exactly one
/// [`BaseOntology`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnotationRecord {
    gene: GeneId,
    term: TermId,
    ontology: BaseOntology,
}

impl AnnotationRecord {
    /// Constructs a new [`AnnotationRecord`]
    pub fn new<G: Into<GeneId>, T: Into<TermId>>(gene: G, term: T, ontology: BaseOntology) -> Self {
        Self {
            gene: gene.into(),
            term: term.into(),
            ontology,
        }
    }

    /// The annotated gene
    pub fn gene(&self) -> &GeneId {
        &self.gene
    }

    /// The annotation term
    pub fn term(&self) -> &TermId {
        &self.term
    }

    /// The base ontology of the term
    pub fn ontology(&self) -> BaseOntology {
        self.ontology
    }
}

/// The raw Gene Ontology annotation of one organism and namespace
///
/// Contains all [`AnnotationRecord`]s and the names of all terms
#[derive(Clone, Debug, Default)]
pub struct AnnotationTable {
    records: Vec<AnnotationRecord>,
    terms: Vec<TermMeta>,
}

impl AnnotationTable {
    /// Constructs a new [`AnnotationTable`]
    pub fn new(records: Vec<AnnotationRecord>, terms: Vec<TermMeta>) -> Self {
        Self { records, terms }
    }

    /// All annotation facts
    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    /// Names of all terms
    pub fn terms(&self) -> &[TermMeta] {
        &self.terms
    }

    /// Returns the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A link between a gene and a KEGG pathway or module
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathwayLink {
    gene: GeneId,
    term: TermId,
}

impl PathwayLink {
    /// Constructs a new [`PathwayLink`]
    pub fn new<G: Into<GeneId>, T: Into<TermId>>(gene: G, term: T) -> Self {
        Self {
            gene: gene.into(),
            term: term.into(),
        }
    }

    /// The linked gene
    pub fn gene(&self) -> &GeneId {
        &self.gene
    }

    /// The pathway or module
    pub fn term(&self) -> &TermId {
        &self.term
    }
}

/// The raw pathway annotation of one organism and namespace
#[derive(Clone, Debug, Default)]
pub struct PathwayTable {
    links: Vec<PathwayLink>,
    terms: Vec<TermMeta>,
}

impl PathwayTable {
    /// Constructs a new [`PathwayTable`]
    pub fn new(links: Vec<PathwayLink>, terms: Vec<TermMeta>) -> Self {
        Self { links, terms }
    }

    /// All gene to pathway links
    pub fn links(&self) -> &[PathwayLink] {
        &self.links
    }

    /// Names of all pathways
    pub fn terms(&self) -> &[TermMeta] {
        &self.terms
    }

    /// Returns the number of links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the table has no links
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
