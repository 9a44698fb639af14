//! Removal of terms from finished analysis results
//!
//! Results often contain very general terms that are not informative,
//! such as `biological_process` itself or its direct children. The
//! [`TermPruner`] removes such terms, either by their ID or by their
//! level in the ontology hierarchy.
use std::collections::HashSet;

use tracing::{debug, error};

use crate::hierarchy::HierarchyLookup;
use crate::result::TermTable;
use crate::term::TermId;
use crate::{BaseOntology, EnrichResult};

/// Removes terms from [`TermTable`]s
///
/// # Examples
///
/// ```
/// use std::collections::{HashMap, HashSet};
/// use goenrich::hierarchy::TermHierarchy;
/// use goenrich::prune::TermPruner;
/// use goenrich::result::{RowStats, TermTable};
/// use goenrich::{AnalysisResult, BaseOntology, EnrichmentResult, EnrichmentRow, Genes, TermId};
///
/// let mut hierarchy = TermHierarchy::default();
/// hierarchy.add_term("GO:0008150", BaseOntology::Bp);
/// hierarchy.add_term("GO:0009987", BaseOntology::Bp);
/// hierarchy.add_parent("GO:0009987", "GO:0008150").unwrap();
///
/// let stats = RowStats::Overlap { gene_ratio: (1, 5), bg_ratio: (10, 100) };
/// let mut gene_sets: HashMap<TermId, Genes> = HashMap::new();
/// let mut rows = Vec::new();
/// for term in ["GO:0008150", "GO:0009987"] {
///     rows.push(EnrichmentRow::new(term, "", stats.clone(), 0.01, 0.01, vec!["g1".into()]));
///     gene_sets.insert(term.into(), HashSet::from(["g1".into()]));
/// }
/// let result = AnalysisResult::from(EnrichmentResult::new(rows, gene_sets).unwrap());
///
/// let pruned = TermPruner::new(&hierarchy).drop(result, Some(1), &[]).unwrap();
/// assert_eq!(pruned.len(), 1);
/// assert_eq!(pruned.rows()[0].id().as_str(), "GO:0009987");
/// ```
#[derive(Debug)]
pub struct TermPruner<'a, H: ?Sized> {
    hierarchy: &'a H,
}

impl<'a, H: HierarchyLookup + ?Sized> TermPruner<'a, H> {
    /// Constructs a new [`TermPruner`]
    pub fn new(hierarchy: &'a H) -> Self {
        Self { hierarchy }
    }

    /// Removes all terms at `level` of the result's base ontology and all
    /// `terms` from the `result`
    ///
    /// The rows and the term to gene mapping are always pruned together.
    /// Returns the unchanged result if neither `level` nor `terms` yield any
    /// term. Terms that are not part of the result are ignored.
    ///
    /// # Errors
    ///
    /// - Errors of the [`HierarchyLookup`], which is only queried if `level` is given
    /// - [`EnrichError::InconsistentResult`](`crate::EnrichError::InconsistentResult`)
    ///     if the pruned result is inconsistent. This indicates a programming error.
    pub fn drop<T: TermTable>(
        &self,
        mut result: T,
        level: Option<usize>,
        terms: &[TermId],
    ) -> EnrichResult<T> {
        let mut to_drop: HashSet<TermId> = terms.iter().cloned().collect();

        if let Some(level) = level {
            if let Some(ontology) = self.base_ontology(&result)? {
                let at_level = self.hierarchy.terms_at_level(ontology, level)?;
                debug!("Dropping {} terms at level {} of {}", at_level.len(), level, ontology);
                to_drop.extend(at_level);
            }
        }

        if to_drop.is_empty() {
            return Ok(result);
        }

        let removed = result.drop_terms(&to_drop);
        debug!("Removed {} of {} requested terms", removed, to_drop.len());

        if let Err(err) = result.check_consistency() {
            error!("Pruning left an inconsistent result: {}", err);
            return Err(err);
        }
        Ok(result)
    }

    /// The base ontology of the result
    ///
    /// Uses the ontology scope of the result if it is a base ontology,
    /// otherwise asks the hierarchy for the ontology of the first term.
    /// Returns `None` for an empty result of unknown scope.
    fn base_ontology<T: TermTable>(&self, result: &T) -> EnrichResult<Option<BaseOntology>> {
        if let Some(base) = result.ontology().and_then(|ontology| ontology.base()) {
            return Ok(Some(base));
        }
        match result.first_term() {
            Some(term) => self.hierarchy.base_ontology_of(term).map(Some),
            None => Ok(None),
        }
    }
}
