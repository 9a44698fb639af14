use core::fmt::Debug;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt::Display;

use crate::{EnrichError, EnrichResult};

/// A set of genes
///
/// Each [`GeneId`] appears only once
pub type Genes = HashSet<GeneId>;

/// A unique identifier of a gene within one [`Namespace`](`super::Namespace`)
///
/// The value is not interpreted, it can be an NCBI Gene ID, a gene symbol,
/// an Ensembl ID etc.
#[derive(Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct GeneId {
    inner: String,
}

impl GeneId {
    /// Returns the ID as string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for GeneId {
    fn from(s: &str) -> Self {
        GeneId {
            inner: s.to_string(),
        }
    }
}

impl From<String> for GeneId {
    fn from(inner: String) -> Self {
        GeneId { inner }
    }
}

impl From<u32> for GeneId {
    fn from(n: u32) -> Self {
        GeneId {
            inner: n.to_string(),
        }
    }
}

impl Borrow<str> for GeneId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl Debug for GeneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeneId({})", self.inner)
    }
}

impl Display for GeneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for GeneId {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

/// A list of genes, ranked by a score in descending order
///
/// This is the input for gene set enrichment analyses (GSEA), e.g. genes
/// ranked by their log fold change of expression.
///
/// # Examples
///
/// ```
/// use goenrich::RankedList;
///
/// let ranked = RankedList::try_new(vec![
///     ("g2".into(), 0.5),
///     ("g1".into(), 2.1),
///     ("g3".into(), -1.0),
/// ]).unwrap();
///
/// let genes: Vec<&str> = ranked.iter().map(|(gene, _)| gene.as_str()).collect();
/// assert_eq!(genes, vec!["g1", "g2", "g3"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RankedList {
    inner: Vec<(GeneId, f64)>,
}

impl RankedList {
    /// Constructs a new [`RankedList`] and sorts the genes by descending score
    ///
    /// # Errors
    ///
    /// [`EnrichError::InvalidInput`] if a score is `NaN` or a gene
    /// occurs more than once
    pub fn try_new(mut genes: Vec<(GeneId, f64)>) -> EnrichResult<Self> {
        let mut seen = Genes::with_capacity(genes.len());
        for (gene, score) in &genes {
            if score.is_nan() {
                return Err(EnrichError::InvalidInput(format!("score of {gene} is NaN")));
            }
            if !seen.insert(gene.clone()) {
                return Err(EnrichError::InvalidInput(format!(
                    "{gene} is ranked more than once"
                )));
            }
        }
        genes.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(Self { inner: genes })
    }

    /// Returns the number of ranked genes
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no genes in the list
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates the genes and their scores, highest score first
    pub fn iter(&self) -> std::slice::Iter<'_, (GeneId, f64)> {
        self.inner.iter()
    }

    /// Returns the ranked genes as a set
    pub fn genes(&self) -> Genes {
        self.inner.iter().map(|(gene, _)| gene.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a (GeneId, f64);
    type IntoIter = std::slice::Iter<'a, (GeneId, f64)>;
    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gene_id_from_number() {
        let gene = GeneId::from(7157u32);
        assert_eq!(gene.as_str(), "7157");
        assert_eq!(gene.to_string(), "7157");
    }

    #[test]
    fn ranked_list_sorts_descending() {
        let ranked = RankedList::try_new(vec![
            ("a".into(), -3.0),
            ("b".into(), 4.0),
            ("c".into(), 0.0),
        ])
        .unwrap();
        let scores: Vec<f64> = ranked.iter().map(|(_, score)| *score).collect();
        assert_eq!(scores, vec![4.0, 0.0, -3.0]);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.genes().contains("c"));
    }

    #[test]
    fn ranked_list_rejects_nan() {
        let res = RankedList::try_new(vec![("a".into(), f64::NAN)]);
        assert!(matches!(res, Err(EnrichError::InvalidInput(_))));
    }

    #[test]
    fn ranked_list_rejects_duplicates() {
        let res = RankedList::try_new(vec![("a".into(), 1.0), ("a".into(), 2.0)]);
        assert!(res.is_err());
    }

    #[test]
    fn empty_ranked_list() {
        let ranked = RankedList::try_new(Vec::new()).unwrap();
        assert!(ranked.is_empty());
    }
}
