//! Results of enrichment analyses
//!
//! An analysis result consists of two parallel structures:
//!
//! - the table of enriched terms ([`EnrichmentRow`]s)
//! - the mapping of each enriched term to its genes
//!
//! Both structures always reference the same set of terms. Results can only
//! be constructed if they fulfill this invariant and the only way to remove
//! terms, [`TermTable::drop_terms`], removes them from both structures.
//!
//! There are two kinds of results. An [`EnrichmentResult`] is the output of a
//! single analysis, a [`ComparisonResult`] combines the results of several
//! gene clusters. [`AnalysisResult`] wraps both, so that they can be handled
//! uniformly, e.g. by the [`TermPruner`](`crate::prune::TermPruner`).
use std::collections::{HashMap, HashSet};

use crate::annotations::{GeneId, Genes, Namespace, OrganismKey};
use crate::term::TermId;
use crate::{BaseOntology, EnrichError, EnrichResult, Ontology};

mod row;
pub use row::{EnrichmentRow, RowStats};

/// Common access to the rows and the term to gene mapping of a result
pub trait TermTable {
    /// The enriched terms
    fn rows(&self) -> &[EnrichmentRow];

    /// The genes of each enriched term
    fn gene_sets(&self) -> &HashMap<TermId, Genes>;

    /// The ontology scope of the analysis
    ///
    /// `None` if the result is not from a Gene Ontology analysis or if
    /// the scope is unknown
    fn ontology(&self) -> Option<Ontology>;

    /// Removes all rows of the `terms` and the terms' gene sets
    ///
    /// Terms that are not part of the result are ignored.
    /// Returns the number of removed terms.
    fn drop_terms(&mut self, terms: &HashSet<TermId>) -> usize;

    /// Returns the term of the first row
    fn first_term(&self) -> Option<&TermId> {
        self.rows().first().map(EnrichmentRow::id)
    }

    /// Returns the distinct terms of all rows
    fn term_ids(&self) -> HashSet<&TermId> {
        self.rows().iter().map(EnrichmentRow::id).collect()
    }

    /// Returns the number of rows
    fn len(&self) -> usize {
        self.rows().len()
    }

    /// Returns `true` if the result has no rows
    fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Verifies that the rows and the gene mapping reference the same terms
    ///
    /// # Errors
    ///
    /// [`EnrichError::InconsistentResult`] if the term sets differ
    fn check_consistency(&self) -> EnrichResult<()> {
        check_consistency(self.rows(), self.gene_sets())
    }
}

fn check_consistency(rows: &[EnrichmentRow], gene_sets: &HashMap<TermId, Genes>) -> EnrichResult<()> {
    let row_terms: HashSet<&TermId> = rows.iter().map(EnrichmentRow::id).collect();
    if let Some(term) = row_terms.iter().find(|term| !gene_sets.contains_key(**term)) {
        return Err(EnrichError::InconsistentResult(format!(
            "{term} has a row but no gene set"
        )));
    }
    if let Some(term) = gene_sets.keys().find(|term| !row_terms.contains(term)) {
        return Err(EnrichError::InconsistentResult(format!(
            "{term} has a gene set but no row"
        )));
    }
    Ok(())
}

fn remove_terms(
    rows: &mut Vec<EnrichmentRow>,
    gene_sets: &mut HashMap<TermId, Genes>,
    terms: &HashSet<TermId>,
) -> usize {
    rows.retain(|row| !terms.contains(row.id()));
    let before = gene_sets.len();
    gene_sets.retain(|term, _| !terms.contains(term));
    before - gene_sets.len()
}

/// The result of a single enrichment analysis
///
/// # Examples
///
/// ```
/// use std::collections::{HashMap, HashSet};
/// use goenrich::result::{RowStats, TermTable};
/// use goenrich::{EnrichmentResult, EnrichmentRow, Genes, TermId};
///
/// let stats = RowStats::Overlap { gene_ratio: (1, 5), bg_ratio: (10, 100) };
/// let rows = vec![
///     EnrichmentRow::new("T1", "translation", stats.clone(), 0.01, 0.02, vec!["g1".into()]),
///     EnrichmentRow::new("T2", "membrane", stats, 0.02, 0.02, vec!["g2".into()]),
/// ];
/// let mut gene_sets: HashMap<TermId, Genes> = HashMap::new();
/// gene_sets.insert("T1".into(), HashSet::from(["g1".into()]));
/// gene_sets.insert("T2".into(), HashSet::from(["g2".into()]));
///
/// let mut result = EnrichmentResult::new(rows, gene_sets).unwrap();
///
/// result.drop_terms(&HashSet::from(["T1".into()]));
/// assert_eq!(result.len(), 1);
/// assert!(result.gene_sets().get("T1").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct EnrichmentResult {
    rows: Vec<EnrichmentRow>,
    gene_sets: HashMap<TermId, Genes>,
    organism: Option<OrganismKey>,
    keytype: Option<Namespace>,
    ontology: Option<Ontology>,
    readable: bool,
}

impl EnrichmentResult {
    /// Constructs a new [`EnrichmentResult`]
    ///
    /// # Errors
    ///
    /// [`EnrichError::InconsistentResult`] if a term has a row but no
    /// gene set or vice versa
    pub fn new(rows: Vec<EnrichmentRow>, gene_sets: HashMap<TermId, Genes>) -> EnrichResult<Self> {
        check_consistency(&rows, &gene_sets)?;
        Ok(Self {
            rows,
            gene_sets,
            ..Default::default()
        })
    }

    /// Returns the row of the term
    pub fn get(&self, term: &str) -> Option<&EnrichmentRow> {
        self.rows.iter().find(|row| row.id() == term)
    }

    /// Iterates all rows
    pub fn iter(&self) -> std::slice::Iter<'_, EnrichmentRow> {
        self.rows.iter()
    }

    /// The organism of the analysis
    pub fn organism(&self) -> Option<&OrganismKey> {
        self.organism.as_ref()
    }

    /// The namespace of the analyzed genes
    pub fn keytype(&self) -> Option<&Namespace> {
        self.keytype.as_ref()
    }

    /// Returns `true` if the gene lists of the rows contain display names
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Sets organism, namespace and ontology scope of the analysis
    pub(crate) fn stamp(
        &mut self,
        organism: &OrganismKey,
        keytype: &Namespace,
        ontology: Option<Ontology>,
    ) {
        self.organism = Some(organism.clone());
        self.keytype = Some(keytype.clone());
        self.ontology = ontology;
    }

    /// Labels every row with the base ontology of its term
    ///
    /// Terms missing from `provenance` stay unlabeled
    pub(crate) fn label_ontologies(&mut self, provenance: &HashMap<TermId, BaseOntology>) {
        for row in &mut self.rows {
            let ontology = provenance.get(row.id()).copied();
            row.set_ontology(ontology);
        }
    }

    /// Replaces gene identifiers in the rows' gene lists by display names
    pub(crate) fn set_readable(&mut self, names: &HashMap<GeneId, String>) {
        for row in &mut self.rows {
            row.rename_genes(names);
        }
        self.readable = true;
    }

    /// All distinct genes of all rows
    pub(crate) fn row_genes(&self) -> Vec<GeneId> {
        let genes: HashSet<&GeneId> = self.rows.iter().flat_map(EnrichmentRow::genes).collect();
        genes.into_iter().cloned().collect()
    }
}

impl TermTable for EnrichmentResult {
    fn rows(&self) -> &[EnrichmentRow] {
        &self.rows
    }

    fn gene_sets(&self) -> &HashMap<TermId, Genes> {
        &self.gene_sets
    }

    fn ontology(&self) -> Option<Ontology> {
        self.ontology
    }

    fn drop_terms(&mut self, terms: &HashSet<TermId>) -> usize {
        remove_terms(&mut self.rows, &mut self.gene_sets, terms)
    }
}

impl<'a> IntoIterator for &'a EnrichmentResult {
    type Item = &'a EnrichmentRow;
    type IntoIter = std::slice::Iter<'a, EnrichmentRow>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// The combined results of several gene clusters
///
/// Every row belongs to one cluster. A term can have rows in several
/// clusters, its gene set is the union of the genes of all its rows.
#[derive(Clone, Debug, Default)]
pub struct ComparisonResult {
    clusters: Vec<String>,
    rows: Vec<EnrichmentRow>,
    gene_sets: HashMap<TermId, Genes>,
    organism: Option<OrganismKey>,
    keytype: Option<Namespace>,
    ontology: Option<Ontology>,
    readable: bool,
}

impl ComparisonResult {
    /// Combines the results of all clusters
    ///
    /// The metadata (organism, namespace, ontology) is taken from
    /// the first result. Returns `Ok(None)` if `results` is empty.
    ///
    /// # Errors
    ///
    /// [`EnrichError::InconsistentResult`] if one of the results is inconsistent
    pub fn merge(results: Vec<(String, EnrichmentResult)>) -> EnrichResult<Option<Self>> {
        let Some((_, first)) = results.first() else {
            return Ok(None);
        };

        let mut merged = ComparisonResult {
            organism: first.organism.clone(),
            keytype: first.keytype.clone(),
            ontology: first.ontology,
            readable: first.readable,
            ..Default::default()
        };

        for (cluster, result) in results {
            result.check_consistency()?;
            for mut row in result.rows {
                row.set_cluster(&cluster);
                merged.rows.push(row);
            }
            for (term, genes) in result.gene_sets {
                merged.gene_sets.entry(term).or_default().extend(genes);
            }
            merged.clusters.push(cluster);
        }
        Ok(Some(merged))
    }

    /// The names of all clusters with a result
    pub fn clusters(&self) -> &[String] {
        &self.clusters
    }

    /// Iterates the rows of one cluster
    pub fn cluster_rows<'a>(&'a self, cluster: &'a str) -> impl Iterator<Item = &'a EnrichmentRow> {
        self.rows
            .iter()
            .filter(move |row| row.cluster() == Some(cluster))
    }

    /// The organism of the analysis
    pub fn organism(&self) -> Option<&OrganismKey> {
        self.organism.as_ref()
    }

    /// The namespace of the analyzed genes
    pub fn keytype(&self) -> Option<&Namespace> {
        self.keytype.as_ref()
    }

    /// Returns `true` if the gene lists of the rows contain display names
    pub fn is_readable(&self) -> bool {
        self.readable
    }
}

impl TermTable for ComparisonResult {
    fn rows(&self) -> &[EnrichmentRow] {
        &self.rows
    }

    fn gene_sets(&self) -> &HashMap<TermId, Genes> {
        &self.gene_sets
    }

    fn ontology(&self) -> Option<Ontology> {
        self.ontology
    }

    fn drop_terms(&mut self, terms: &HashSet<TermId>) -> usize {
        remove_terms(&mut self.rows, &mut self.gene_sets, terms)
    }
}

/// Either a single or a comparison result
#[derive(Clone, Debug)]
pub enum AnalysisResult {
    /// Result of a single analysis
    Single(EnrichmentResult),
    /// Combined result of several gene clusters
    Comparison(ComparisonResult),
}

impl From<EnrichmentResult> for AnalysisResult {
    fn from(result: EnrichmentResult) -> Self {
        AnalysisResult::Single(result)
    }
}

impl From<ComparisonResult> for AnalysisResult {
    fn from(result: ComparisonResult) -> Self {
        AnalysisResult::Comparison(result)
    }
}

impl TermTable for AnalysisResult {
    fn rows(&self) -> &[EnrichmentRow] {
        match self {
            AnalysisResult::Single(result) => result.rows(),
            AnalysisResult::Comparison(result) => result.rows(),
        }
    }

    fn gene_sets(&self) -> &HashMap<TermId, Genes> {
        match self {
            AnalysisResult::Single(result) => result.gene_sets(),
            AnalysisResult::Comparison(result) => result.gene_sets(),
        }
    }

    fn ontology(&self) -> Option<Ontology> {
        match self {
            AnalysisResult::Single(result) => result.ontology(),
            AnalysisResult::Comparison(result) => result.ontology(),
        }
    }

    fn drop_terms(&mut self, terms: &HashSet<TermId>) -> usize {
        match self {
            AnalysisResult::Single(result) => result.drop_terms(terms),
            AnalysisResult::Comparison(result) => result.drop_terms(terms),
        }
    }
}
