//! `goenrich` prepares annotation data for gene set enrichment analyses
//! over the Gene Ontology and KEGG and post-processes their results.
//!
//! The crate does not implement the enrichment statistics itself (apart from
//! a reference [hypergeometric test](`stats::Hypergeometric`)). Instead, it
//! sits between an annotation source and a statistical engine:
//!
//! - [`cache::AnnotationCache`] keeps the last fetched annotation table
//!   so that repeated analyses of the same organism and namespace do not
//!   query the source again
//! - [`GeneSetIndex`] derives the term to gene-set universe for one
//!   [`Ontology`] scope, including the aggregate `ALL` scope
//! - [`Enricher`] and [`PathwayEnricher`] dispatch an analysis to an engine
//!   and stamp metadata onto the result
//! - [`prune::TermPruner`] removes terms from a finished result, either
//!   explicitly or by their level in the ontology hierarchy
//!
//! # Examples
//!
//! ```
//! use goenrich::annotations::{AnnotationRecord, AnnotationTable};
//! use goenrich::{BaseOntology, GeneSetIndex, Ontology, TermMeta};
//!
//! let table = AnnotationTable::new(
//!     vec![
//!         AnnotationRecord::new("g1", "GO:0006412", BaseOntology::Bp),
//!         AnnotationRecord::new("g2", "GO:0006412", BaseOntology::Bp),
//!         AnnotationRecord::new("g1", "GO:0016020", BaseOntology::Cc),
//!     ],
//!     vec![
//!         TermMeta::new("GO:0006412", "translation"),
//!         TermMeta::new("GO:0016020", "membrane"),
//!     ],
//! );
//!
//! let index = GeneSetIndex::build(&table, Ontology::Bp);
//! assert_eq!(index.len(), 1);
//! assert_eq!(index.provenance().len(), 2);
//! ```
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use thiserror::Error;

pub mod annotations;
pub mod cache;
pub mod enricher;
pub mod hierarchy;
pub mod index;
mod ontology;
pub mod parser;
pub mod prune;
pub mod result;
pub mod stats;
pub mod term;

pub use annotations::{GeneId, Genes, Namespace, OrganismKey, RankedList};
pub use enricher::{AnalysisRequest, Enricher, PathwayEnricher};
pub use index::GeneSetIndex;
pub use ontology::{BaseOntology, Ontology};
pub use result::{AnalysisResult, ComparisonResult, EnrichmentResult, EnrichmentRow};
pub use term::{TermId, TermMeta};

/// Default lower bound of the number of genes annotated to a term
/// for the term to be tested
pub const DEFAULT_MIN_GS_SIZE: usize = 10;
/// Default upper bound of the number of genes annotated to a term
/// for the term to be tested
pub const DEFAULT_MAX_GS_SIZE: usize = 500;
const DEFAULT_PVALUE_CUTOFF: f64 = 0.05;
const DEFAULT_QVALUE_CUTOFF: f64 = 0.2;
const DEFAULT_PERMUTATIONS: usize = 1000;
const DEFAULT_NUM_PARENTS: usize = 4;

/// Namespaces a [`parser::FolderSource`] accepts unless configured otherwise
pub const DEFAULT_NAMESPACES: [&str; 4] = ["ENTREZID", "SYMBOL", "ENSEMBL", "UNIPROT"];

/// Main Error type for this crate
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnrichError {
    /// The ontology argument is not one of `BP`, `CC`, `MF` or `ALL`
    #[error("invalid ontology: {0}. Must be one of BP, CC, MF or ALL")]
    InvalidOntology(String),
    /// The annotation source does not know the requested identifier namespace
    #[error("namespace {namespace} is not supported for {organism}")]
    UnsupportedNamespace {
        /// The requested organism
        organism: String,
        /// The requested namespace
        namespace: String,
    },
    /// The annotation source does not know the requested organism
    #[error("unknown organism: {0}")]
    UnknownOrganism(String),
    /// The rows of a result and its term to gene mapping reference different terms
    ///
    /// This indicates a programming error and should be treated as fatal
    #[error("inconsistent result: {0}")]
    InconsistentResult(String),
    /// The term does not exist in the hierarchy
    #[error("term does not exist: {0}")]
    DoesNotExist(String),
    /// Failed to open a file
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// Input data is malformed
    #[error("invalid data: {0}")]
    InvalidInput(String),
    /// The statistical engine failed
    #[error("statistical test failed: {0}")]
    Statistics(String),
    /// Readable gene names were requested, but no mapper is configured
    #[error("readable output requires an identifier mapper")]
    MissingIdentifierMapper,
}

/// Shortcut for `Result<T, EnrichError>`
pub type EnrichResult<T> = Result<T, EnrichError>;
