//! Genes and their links to annotation terms
//!
//! This module contains the raw annotation facts that an annotation source
//! provides, and the traits that describe those external sources.
//!
//! The underlying principle for all annotations is the same:
//! - Each gene is identified within one [`Namespace`], e.g. `ENTREZID`
//! - Each record links one gene to one term
//! - Genes and terms have a many-to-many relationship
//!
//! Gene Ontology annotations are provided as [`AnnotationRecord`]s that also
//! carry the [`BaseOntology`](`crate::BaseOntology`) of the term. KEGG
//! pathways and modules are provided as [`PathwayLink`]s.

mod gene;
mod record;
mod source;

pub use gene::{GeneId, Genes, RankedList};
pub use record::{AnnotationRecord, AnnotationTable, PathwayLink, PathwayTable};
pub use source::{
    AnnotationSource, IdentifierMapper, Namespace, OrganismKey, PathwayKind, PathwaySource,
};
