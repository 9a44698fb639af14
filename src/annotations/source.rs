use std::collections::HashMap;
use std::fmt::Display;

use crate::annotations::{AnnotationTable, GeneId, PathwayTable};
use crate::EnrichResult;

/// Identifies the species or annotation database, e.g. `org.Hs.eg.db` or `hsa`
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrganismKey {
    inner: String,
}

impl OrganismKey {
    /// Returns the key as string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for OrganismKey {
    fn from(s: &str) -> Self {
        OrganismKey {
            inner: s.to_string(),
        }
    }
}

impl From<String> for OrganismKey {
    fn from(inner: String) -> Self {
        OrganismKey { inner }
    }
}

impl Display for OrganismKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// The identifier convention of the genes, e.g. `ENTREZID` or `SYMBOL`
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Namespace {
    inner: String,
}

impl Namespace {
    /// Returns the namespace as string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        Namespace {
            inner: s.to_string(),
        }
    }
}

impl From<String> for Namespace {
    fn from(inner: String) -> Self {
        Namespace { inner }
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// The two kinds of KEGG annotation
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum PathwayKind {
    /// KEGG pathways, e.g. `hsa00010`
    Pathway,
    /// KEGG modules, e.g. `M00001`
    Module,
}

impl Display for PathwayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathwayKind::Pathway => write!(f, "KEGG"),
            PathwayKind::Module => write!(f, "MKEGG"),
        }
    }
}

/// Provides the raw Gene Ontology annotation of an organism
///
/// Fetching is expected to be expensive. Callers should not use
/// the source directly, but through an
/// [`AnnotationCache`](`crate::cache::AnnotationCache`).
pub trait AnnotationSource {
    /// Returns `true` if genes of the `namespace` can be fetched
    ///
    /// This is checked before any query is issued.
    fn supports(&self, organism: &OrganismKey, namespace: &Namespace) -> bool;

    /// Returns every (gene, term, base ontology) fact of the organism
    /// together with the names of all terms
    ///
    /// # Errors
    ///
    /// - [`EnrichError::UnknownOrganism`](`crate::EnrichError::UnknownOrganism`)
    /// - any error of the underlying data access
    fn fetch(&self, organism: &OrganismKey, namespace: &Namespace)
        -> EnrichResult<AnnotationTable>;
}

/// Provides the gene to pathway links of an organism
pub trait PathwaySource {
    /// Returns `true` if genes of the `namespace` can be fetched
    fn supports(&self, organism: &OrganismKey, namespace: &Namespace) -> bool;

    /// Returns all links between genes and pathways (or modules)
    /// together with the names of all pathways
    ///
    /// # Errors
    ///
    /// - [`EnrichError::UnknownOrganism`](`crate::EnrichError::UnknownOrganism`)
    /// - any error of the underlying data access
    fn fetch_pathways(
        &self,
        organism: &OrganismKey,
        namespace: &Namespace,
        kind: PathwayKind,
    ) -> EnrichResult<PathwayTable>;
}

/// Translates gene identifiers into human readable names, e.g. gene symbols
pub trait IdentifierMapper {
    /// Returns the display names of the `genes`
    ///
    /// Genes without a display name are missing from the returned map.
    ///
    /// # Errors
    ///
    /// Any error of the underlying data access
    fn to_display_names(
        &self,
        genes: &[GeneId],
        organism: &OrganismKey,
    ) -> EnrichResult<HashMap<GeneId, String>>;
}

impl IdentifierMapper for HashMap<GeneId, String> {
    fn to_display_names(
        &self,
        genes: &[GeneId],
        _organism: &OrganismKey,
    ) -> EnrichResult<HashMap<GeneId, String>> {
        Ok(genes
            .iter()
            .filter_map(|gene| self.get(gene).map(|name| (gene.clone(), name.clone())))
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn map_based_mapper() {
        let mut symbols = HashMap::new();
        symbols.insert(GeneId::from("7157"), "TP53".to_string());

        let names = symbols
            .to_display_names(&["7157".into(), "1".into()], &"hsa".into())
            .unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names.get("7157").unwrap(), "TP53");
    }

    #[test]
    fn pathway_kind_label() {
        assert_eq!(PathwayKind::Pathway.to_string(), "KEGG");
        assert_eq!(PathwayKind::Module.to_string(), "MKEGG");
    }
}
