//! Over-representation analysis using the hypergeometric distribution
//!
//! For every term, the test calculates the probability to find at least
//! the observed number of term genes among the input genes, when drawing
//! the input genes at random from the background.
//!
//! # Examples
//!
//! ```
//! use goenrich::annotations::{AnnotationRecord, AnnotationTable};
//! use goenrich::result::TermTable;
//! use goenrich::stats::{EnrichParams, Hypergeometric, OverRepresentation};
//! use goenrich::{BaseOntology, GeneId, GeneSetIndex, Genes, Ontology};
//!
//! let mut records = Vec::new();
//! for i in 0..100 {
//!     let gene = format!("g{i}");
//!     records.push(AnnotationRecord::new(gene.as_str(), "GO:0000001", BaseOntology::Bp));
//!     if i < 10 {
//!         records.push(AnnotationRecord::new(gene.as_str(), "GO:0000002", BaseOntology::Bp));
//!     }
//! }
//! let index = GeneSetIndex::build(&AnnotationTable::new(records, Vec::new()), Ontology::Bp);
//!
//! let genes: Genes = (0..8).map(|i| GeneId::from(format!("g{i}"))).collect();
//! let params = EnrichParams::default().with_gs_size(5, 50);
//!
//! let result = Hypergeometric.test(&index, &genes, &params).unwrap().unwrap();
//! assert_eq!(result.len(), 1);
//! assert_eq!(result.rows()[0].id().as_str(), "GO:0000002");
//! assert_eq!(result.rows()[0].count(), 8);
//! ```
use statrs::distribution::{DiscreteCDF, Hypergeometric as Distribution};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::annotations::{GeneId, Genes};
use crate::index::GeneSetIndex;
use crate::result::{EnrichmentResult, EnrichmentRow, RowStats};
use crate::stats::{EnrichParams, OverRepresentation};
use crate::term::TermId;
use crate::{EnrichError, EnrichResult};

/// The hypergeometric over-representation test
#[derive(Clone, Copy, Debug, Default)]
pub struct Hypergeometric;

struct Candidate<'a> {
    term: &'a TermId,
    overlap: Vec<GeneId>,
    successes: usize,
    pvalue: f64,
}

impl OverRepresentation for Hypergeometric {
    fn test(
        &self,
        universe: &GeneSetIndex,
        genes: &Genes,
        params: &EnrichParams,
    ) -> EnrichResult<Option<EnrichmentResult>> {
        let annotated = universe.universe();
        let background: Genes = match params.universe() {
            Some(restricted) => annotated.intersection(restricted).cloned().collect(),
            None => annotated,
        };
        let draws = genes.intersection(&background).count();
        if draws == 0 {
            debug!("None of the {} input genes is annotated", genes.len());
            return Ok(None);
        }

        let mut terms: Vec<(&TermId, &Genes)> = universe.iter().collect();
        terms.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut candidates = Vec::new();
        for (term, term_genes) in terms {
            let successes = term_genes.intersection(&background).count();
            if successes < params.min_gs_size() || successes > params.max_gs_size() {
                trace!("Skipping {} with {} genes", term, successes);
                continue;
            }
            let mut overlap: Vec<GeneId> = term_genes
                .iter()
                .filter(|gene| genes.contains(*gene) && background.contains(*gene))
                .cloned()
                .collect();
            if overlap.is_empty() {
                continue;
            }
            overlap.sort_unstable();

            let hyper = Distribution::new(
                // Number of annotated genes
                // ==> population
                u64_from_usize(background.len()),
                // Number of annotated genes linked to the term
                // ==> successes
                u64_from_usize(successes),
                // Number of input genes
                // ==> draws
                u64_from_usize(draws),
            )
            .map_err(|err| EnrichError::Statistics(format!("{term}: {err}")))?;

            // subtracting 1, because we want to test including the observed overlap
            // e.g. "7 or more", but sf by default calculates "more than 7"
            let pvalue = hyper.sf(u64_from_usize(overlap.len() - 1));
            candidates.push(Candidate {
                term,
                overlap,
                successes,
                pvalue,
            });
        }

        if candidates.is_empty() {
            debug!("No term passed the gene set size filter");
            return Ok(None);
        }

        let pvalues: Vec<f64> = candidates.iter().map(|c| c.pvalue).collect();
        let adjusted = params.p_adjust_method().adjust(&pvalues);
        debug!(
            "Tested {} terms with {} input genes and {} background genes",
            candidates.len(),
            draws,
            background.len()
        );

        let mut rows = Vec::new();
        let mut gene_sets = HashMap::new();
        for (candidate, p_adjust) in candidates.into_iter().zip(adjusted) {
            if candidate.pvalue > params.pvalue_cutoff() || p_adjust > params.pvalue_cutoff() {
                continue;
            }
            let stats = RowStats::Overlap {
                gene_ratio: (candidate.overlap.len(), draws),
                bg_ratio: (candidate.successes, background.len()),
            };
            gene_sets.insert(
                candidate.term.clone(),
                candidate.overlap.iter().cloned().collect::<Genes>(),
            );
            rows.push(EnrichmentRow::new(
                candidate.term.clone(),
                universe.name(candidate.term.as_str()).unwrap_or_default(),
                stats,
                candidate.pvalue,
                p_adjust,
                candidate.overlap,
            ));
        }

        if rows.is_empty() {
            debug!("No term passed the p-value cutoff");
            return Ok(None);
        }
        rows.sort_by(|a, b| {
            a.pvalue()
                .total_cmp(&b.pvalue())
                .then_with(|| a.id().cmp(b.id()))
        });
        EnrichmentResult::new(rows, gene_sets).map(Some)
    }
}

fn u64_from_usize(n: usize) -> u64 {
    n.try_into().expect("usize always fits into u64")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::{AnnotationRecord, AnnotationTable};
    use crate::result::TermTable;
    use crate::stats::PAdjustMethod;
    use crate::{BaseOntology, Ontology};

    /// 100 genes, `GO:A` has g0..g9, `GO:B` has g0..g49, `GO:C` has g90..g99
    fn index() -> GeneSetIndex {
        let mut records = Vec::new();
        for i in 0..100 {
            let gene = format!("g{i}");
            records.push(AnnotationRecord::new(gene.as_str(), "GO:ROOT", BaseOntology::Bp));
            if i < 10 {
                records.push(AnnotationRecord::new(gene.as_str(), "GO:A", BaseOntology::Bp));
            }
            if i < 50 {
                records.push(AnnotationRecord::new(gene.as_str(), "GO:B", BaseOntology::Bp));
            }
            if i >= 90 {
                records.push(AnnotationRecord::new(gene.as_str(), "GO:C", BaseOntology::Bp));
            }
        }
        GeneSetIndex::build(
            &AnnotationTable::new(
                records,
                vec![crate::TermMeta::new("GO:A", "term a")],
            ),
            Ontology::Bp,
        )
    }

    fn genes(range: std::ops::Range<usize>) -> Genes {
        range.map(|i| GeneId::from(format!("g{i}"))).collect()
    }

    #[test]
    fn enriched_term() {
        let params = EnrichParams::default().with_gs_size(5, 60);
        let result = Hypergeometric
            .test(&index(), &genes(0..10), &params)
            .unwrap()
            .unwrap();

        let first = &result.rows()[0];
        assert_eq!(first.id().as_str(), "GO:A");
        assert_eq!(first.description(), "term a");
        assert_eq!(first.count(), 10);
        assert_eq!(
            first.stats(),
            &RowStats::Overlap {
                gene_ratio: (10, 10),
                bg_ratio: (10, 100)
            }
        );
        assert!(first.pvalue() < 1e-10);
        assert!(result.get("GO:C").is_none());
        assert!(result.check_consistency().is_ok());
    }

    #[test]
    fn pvalue_of_full_overlap() {
        // drawing all 10 term genes with 10 draws out of 100
        // has probability 1 / choose(100, 10)
        let params = EnrichParams::default()
            .with_gs_size(10, 10)
            .with_p_adjust_method(PAdjustMethod::None);
        let result = Hypergeometric
            .test(&index(), &genes(0..10), &params)
            .unwrap()
            .unwrap();
        let expected = 1.0 / 17_310_309_456_440.0;
        let pvalue = result.get("GO:A").unwrap().pvalue();
        assert!((pvalue - expected).abs() / expected < 1e-4);
    }

    #[test]
    fn size_filter() {
        let params = EnrichParams::default().with_gs_size(200, 500);
        let res = Hypergeometric.test(&index(), &genes(0..10), &params).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn unannotated_input() {
        let mut input = Genes::new();
        input.insert("unknown".into());
        let res = Hypergeometric
            .test(&index(), &input, &EnrichParams::default())
            .unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn nothing_significant() {
        // random-like input spread over all terms
        let input: Genes = [5usize, 45, 70, 95].iter().map(|i| GeneId::from(format!("g{i}"))).collect();
        let params = EnrichParams::default().with_gs_size(5, 60);
        let res = Hypergeometric.test(&index(), &input, &params).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn restricted_universe() {
        let params = EnrichParams::default()
            .with_gs_size(5, 60)
            .with_universe(genes(0..20));
        let result = Hypergeometric
            .test(&index(), &genes(0..10), &params)
            .unwrap()
            .unwrap();
        let row = result.get("GO:A").unwrap();
        assert_eq!(
            row.stats(),
            &RowStats::Overlap {
                gene_ratio: (10, 10),
                bg_ratio: (10, 20)
            }
        );
    }

    #[test]
    fn rows_are_sorted_by_pvalue() {
        let params = EnrichParams::default()
            .with_gs_size(5, 60)
            .with_pvalue_cutoff(1.0);
        let result = Hypergeometric
            .test(&index(), &genes(0..10), &params)
            .unwrap()
            .unwrap();
        let pvalues: Vec<f64> = result.iter().map(EnrichmentRow::pvalue).collect();
        let mut sorted = pvalues.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(pvalues, sorted);
        assert_eq!(result.gene_sets().len(), result.len());
    }
}
