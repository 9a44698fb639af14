use std::collections::HashMap;
use std::fmt::Display;

use crate::annotations::GeneId;
use crate::term::TermId;
use crate::BaseOntology;

/// Engine specific statistics of a result row
#[derive(Clone, Debug, PartialEq)]
pub enum RowStats {
    /// Over-representation of a fixed gene set
    Overlap {
        /// Number of input genes annotated to the term and the number
        /// of input genes in the universe (`k / n`)
        gene_ratio: (usize, usize),
        /// Number of universe genes annotated to the term and the size
        /// of the universe (`K / N`)
        bg_ratio: (usize, usize),
    },
    /// Gene set enrichment of a ranked list
    Ranked {
        /// Number of ranked genes annotated to the term
        set_size: usize,
        /// The enrichment score
        enrichment_score: f64,
        /// The normalized enrichment score
        nes: f64,
        /// Position in the ranked list where the enrichment score peaks
        rank: usize,
    },
}

/// A single enriched term
///
/// Rows are produced by the statistical engines. Metadata such as the
/// base ontology of the term or readable gene names are added afterwards
/// by the [`Enricher`](`crate::Enricher`).
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichmentRow {
    id: TermId,
    description: String,
    ontology: Option<BaseOntology>,
    cluster: Option<String>,
    pvalue: f64,
    p_adjust: f64,
    qvalue: Option<f64>,
    genes: Vec<GeneId>,
    stats: RowStats,
}

impl EnrichmentRow {
    /// Constructs a new [`EnrichmentRow`]
    ///
    /// `genes` are the input genes annotated to the term, i.e. the
    /// overlap for over-representation or the leading edge for GSEA.
    pub fn new<I: Into<TermId>>(
        id: I,
        description: &str,
        stats: RowStats,
        pvalue: f64,
        p_adjust: f64,
        genes: Vec<GeneId>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.to_string(),
            ontology: None,
            cluster: None,
            pvalue,
            p_adjust,
            qvalue: None,
            genes,
            stats,
        }
    }

    /// Sets the q-value of the row
    #[must_use]
    pub fn with_qvalue(mut self, qvalue: f64) -> Self {
        self.qvalue = Some(qvalue);
        self
    }

    /// The [`TermId`] of the row
    pub fn id(&self) -> &TermId {
        &self.id
    }

    /// The name of the term
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The base ontology of the term
    ///
    /// Only set for results of the `ALL` scope
    pub fn ontology(&self) -> Option<BaseOntology> {
        self.ontology
    }

    /// The gene cluster of the row in a
    /// [`ComparisonResult`](`crate::ComparisonResult`)
    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    /// The p-value
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// The p-value, adjusted for multiple testing
    pub fn p_adjust(&self) -> f64 {
        self.p_adjust
    }

    /// The q-value, if the engine calculated one
    pub fn qvalue(&self) -> Option<f64> {
        self.qvalue
    }

    /// The input genes that are annotated to the term
    pub fn genes(&self) -> &[GeneId] {
        &self.genes
    }

    /// Returns the number of genes of the row
    pub fn count(&self) -> usize {
        self.genes.len()
    }

    /// Engine specific statistics
    pub fn stats(&self) -> &RowStats {
        &self.stats
    }

    pub(crate) fn set_ontology(&mut self, ontology: Option<BaseOntology>) {
        self.ontology = ontology;
    }

    pub(crate) fn set_cluster(&mut self, cluster: &str) {
        self.cluster = Some(cluster.to_string());
    }

    /// Replaces every gene that has a display name, keeps the others
    pub(crate) fn rename_genes(&mut self, names: &HashMap<GeneId, String>) {
        for gene in &mut self.genes {
            if let Some(name) = names.get(gene) {
                *gene = GeneId::from(name.as_str());
            }
        }
    }
}

impl Display for EnrichmentRow {
    /// Tab separated representation of the row
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(cluster) = &self.cluster {
            write!(f, "{cluster}\t")?;
        }
        if let Some(ontology) = self.ontology {
            write!(f, "{ontology}\t")?;
        }
        write!(f, "{}\t{}\t", self.id, self.description)?;
        match &self.stats {
            RowStats::Overlap {
                gene_ratio,
                bg_ratio,
            } => write!(
                f,
                "{}/{}\t{}/{}\t",
                gene_ratio.0, gene_ratio.1, bg_ratio.0, bg_ratio.1
            )?,
            RowStats::Ranked {
                set_size,
                enrichment_score,
                nes,
                rank,
            } => write!(f, "{set_size}\t{enrichment_score:.4}\t{nes:.4}\t{rank}\t")?,
        }
        write!(f, "{:e}\t{:e}\t", self.pvalue, self.p_adjust)?;
        match self.qvalue {
            Some(q) => write!(f, "{q:e}\t")?,
            None => write!(f, "NA\t")?,
        }
        let genes: Vec<&str> = self.genes.iter().map(GeneId::as_str).collect();
        write!(f, "{}\t{}", genes.join("/"), self.count())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row() -> EnrichmentRow {
        EnrichmentRow::new(
            "GO:0006412",
            "translation",
            RowStats::Overlap {
                gene_ratio: (2, 10),
                bg_ratio: (20, 1000),
            },
            0.001,
            0.01,
            vec!["7157".into(), "1".into()],
        )
    }

    #[test]
    fn rename_keeps_unknown_genes() {
        let mut row = row();
        let mut names = HashMap::new();
        names.insert(GeneId::from("7157"), "TP53".to_string());
        row.rename_genes(&names);
        assert_eq!(row.genes()[0].as_str(), "TP53");
        assert_eq!(row.genes()[1].as_str(), "1");
        assert_eq!(row.count(), 2);
    }

    #[test]
    fn tab_separated_output() {
        let mut row = row().with_qvalue(0.02);
        row.set_ontology(Some(BaseOntology::Bp));
        assert_eq!(
            row.to_string(),
            "BP\tGO:0006412\ttranslation\t2/10\t20/1000\t1e-3\t1e-2\t2e-2\t7157/1\t2"
        );
    }
}
