//! Interfaces to the statistical enrichment engines
//!
//! This crate prepares the universe of an analysis and post-processes the
//! results, but the statistical tests are provided by engines that implement
//! [`OverRepresentation`] (fixed gene sets) or [`GeneSetEnrichment`]
//! (ranked gene lists).
//!
//! At the moment, `goenrich` provides only one engine, the
//! [`Hypergeometric`] over-representation test.

use crate::annotations::{Genes, RankedList};
use crate::index::GeneSetIndex;
use crate::result::EnrichmentResult;
use crate::{
    EnrichResult, DEFAULT_MAX_GS_SIZE, DEFAULT_MIN_GS_SIZE, DEFAULT_PERMUTATIONS,
    DEFAULT_PVALUE_CUTOFF, DEFAULT_QVALUE_CUTOFF,
};

mod adjust;
pub mod hypergeom;
pub use adjust::PAdjustMethod;
pub use hypergeom::Hypergeometric;

/// Tests a fixed set of genes for over-represented terms
pub trait OverRepresentation {
    /// Tests every term of the `universe` for enrichment in `genes`
    ///
    /// Returns `Ok(None)` if no term passes the filters and cutoffs.
    ///
    /// # Errors
    ///
    /// Engine specific errors, usually [`EnrichError::Statistics`](`crate::EnrichError::Statistics`)
    fn test(
        &self,
        universe: &GeneSetIndex,
        genes: &Genes,
        params: &EnrichParams,
    ) -> EnrichResult<Option<EnrichmentResult>>;
}

/// Tests a ranked list of genes for enriched terms
pub trait GeneSetEnrichment {
    /// Tests every term of the `universe` for enrichment at the top or
    /// bottom of the `ranked` list, using permutations to estimate p-values
    ///
    /// Returns `Ok(None)` if no term passes the filters and cutoffs.
    ///
    /// # Errors
    ///
    /// Engine specific errors, usually [`EnrichError::Statistics`](`crate::EnrichError::Statistics`)
    fn permute(
        &self,
        universe: &GeneSetIndex,
        ranked: &RankedList,
        params: &GseaParams,
    ) -> EnrichResult<Option<EnrichmentResult>>;
}

/// Parameters of an over-representation analysis
///
/// # Examples
///
/// ```
/// use goenrich::stats::{EnrichParams, PAdjustMethod};
///
/// let params = EnrichParams::default()
///     .with_pvalue_cutoff(0.01)
///     .with_gs_size(5, 800)
///     .with_p_adjust_method(PAdjustMethod::Bonferroni);
///
/// assert_eq!(params.min_gs_size(), 5);
/// assert_eq!(params.max_gs_size(), 800);
/// ```
#[derive(Clone, Debug)]
pub struct EnrichParams {
    pvalue_cutoff: f64,
    p_adjust_method: PAdjustMethod,
    qvalue_cutoff: f64,
    min_gs_size: usize,
    max_gs_size: usize,
    universe: Option<Genes>,
}

impl Default for EnrichParams {
    fn default() -> Self {
        Self {
            pvalue_cutoff: DEFAULT_PVALUE_CUTOFF,
            p_adjust_method: PAdjustMethod::default(),
            qvalue_cutoff: DEFAULT_QVALUE_CUTOFF,
            min_gs_size: DEFAULT_MIN_GS_SIZE,
            max_gs_size: DEFAULT_MAX_GS_SIZE,
            universe: None,
        }
    }
}

impl EnrichParams {
    /// Terms with a p-value or adjusted p-value above the cutoff are not reported
    #[must_use]
    pub fn with_pvalue_cutoff(mut self, cutoff: f64) -> Self {
        self.pvalue_cutoff = cutoff;
        self
    }

    /// Sets the method to adjust p-values for multiple testing
    #[must_use]
    pub fn with_p_adjust_method(mut self, method: PAdjustMethod) -> Self {
        self.p_adjust_method = method;
        self
    }

    /// Terms with a q-value above the cutoff are not reported
    #[must_use]
    pub fn with_qvalue_cutoff(mut self, cutoff: f64) -> Self {
        self.qvalue_cutoff = cutoff;
        self
    }

    /// Only terms with at least `min` and at most `max` annotated
    /// universe genes are tested
    #[must_use]
    pub fn with_gs_size(mut self, min: usize, max: usize) -> Self {
        self.min_gs_size = min;
        self.max_gs_size = max;
        self
    }

    /// Restricts the background to the given genes
    ///
    /// By default, all annotated genes are the background
    #[must_use]
    pub fn with_universe(mut self, universe: Genes) -> Self {
        self.universe = Some(universe);
        self
    }

    /// The p-value cutoff
    pub fn pvalue_cutoff(&self) -> f64 {
        self.pvalue_cutoff
    }

    /// The method to adjust p-values
    pub fn p_adjust_method(&self) -> PAdjustMethod {
        self.p_adjust_method
    }

    /// The q-value cutoff
    pub fn qvalue_cutoff(&self) -> f64 {
        self.qvalue_cutoff
    }

    /// Minimum size of a tested gene set
    pub fn min_gs_size(&self) -> usize {
        self.min_gs_size
    }

    /// Maximum size of a tested gene set
    pub fn max_gs_size(&self) -> usize {
        self.max_gs_size
    }

    /// The explicit background, if any
    pub fn universe(&self) -> Option<&Genes> {
        self.universe.as_ref()
    }
}

/// Parameters of a gene set enrichment analysis
#[derive(Clone, Debug)]
pub struct GseaParams {
    exponent: f64,
    permutations: usize,
    min_gs_size: usize,
    max_gs_size: usize,
    pvalue_cutoff: f64,
    p_adjust_method: PAdjustMethod,
    seed: Option<u64>,
}

impl Default for GseaParams {
    fn default() -> Self {
        Self {
            exponent: 1.0,
            permutations: DEFAULT_PERMUTATIONS,
            min_gs_size: DEFAULT_MIN_GS_SIZE,
            max_gs_size: DEFAULT_MAX_GS_SIZE,
            pvalue_cutoff: DEFAULT_PVALUE_CUTOFF,
            p_adjust_method: PAdjustMethod::default(),
            seed: None,
        }
    }
}

impl GseaParams {
    /// Weight of the ranking scores when calculating the enrichment score
    #[must_use]
    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    /// Number of permutations
    #[must_use]
    pub fn with_permutations(mut self, permutations: usize) -> Self {
        self.permutations = permutations;
        self
    }

    /// Only terms with at least `min` and at most `max` annotated
    /// genes are tested
    #[must_use]
    pub fn with_gs_size(mut self, min: usize, max: usize) -> Self {
        self.min_gs_size = min;
        self.max_gs_size = max;
        self
    }

    /// Terms with an adjusted p-value above the cutoff are not reported
    #[must_use]
    pub fn with_pvalue_cutoff(mut self, cutoff: f64) -> Self {
        self.pvalue_cutoff = cutoff;
        self
    }

    /// Sets the method to adjust p-values for multiple testing
    #[must_use]
    pub fn with_p_adjust_method(mut self, method: PAdjustMethod) -> Self {
        self.p_adjust_method = method;
        self
    }

    /// Seed for reproducible permutations
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The weight of the ranking scores
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// The number of permutations
    pub fn permutations(&self) -> usize {
        self.permutations
    }

    /// Minimum size of a tested gene set
    pub fn min_gs_size(&self) -> usize {
        self.min_gs_size
    }

    /// Maximum size of a tested gene set
    pub fn max_gs_size(&self) -> usize {
        self.max_gs_size
    }

    /// The adjusted p-value cutoff
    pub fn pvalue_cutoff(&self) -> f64 {
        self.pvalue_cutoff
    }

    /// The method to adjust p-values
    pub fn p_adjust_method(&self) -> PAdjustMethod {
        self.p_adjust_method
    }

    /// The seed for the permutations
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// We have to frequently do divisions starting with usize values
/// and need to return f64 values. To ensure some kind of safety
/// we use this method to panic in case of overflows.
fn f64_from_usize(n: usize) -> f64 {
    let intermediate: u32 = n
        .try_into()
        .expect("cannot safely create f64 from large usize");
    intermediate.into()
}
