//! The term to gene-set universe of an analysis
//!
//! A [`GeneSetIndex`] is derived from a cached raw annotation table for one
//! ontology scope. It is built fresh for every analysis and handed to the
//! statistical engine as the universe definition.
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::annotations::{AnnotationTable, GeneId, Genes, PathwayTable};
use crate::term::{TermId, TermMeta};
use crate::{BaseOntology, Ontology};

/// Term to gene-set index of one ontology scope
///
/// The index contains:
///
/// - the gene set of every term with at least one annotated gene in scope
/// - the names of all terms, independent of the scope
/// - the base ontology of every term of all three base ontologies (provenance),
///     independent of the scope. It is used to label results of the `ALL`
///     scope and to resolve hierarchy levels when pruning.
///
/// # Examples
///
/// ```
/// use goenrich::annotations::{AnnotationRecord, AnnotationTable};
/// use goenrich::{BaseOntology, GeneSetIndex, Ontology, TermMeta};
///
/// let table = AnnotationTable::new(
///     vec![
///         AnnotationRecord::new("g1", "T1", BaseOntology::Bp),
///         AnnotationRecord::new("g2", "T1", BaseOntology::Bp),
///         AnnotationRecord::new("g1", "T2", BaseOntology::Cc),
///     ],
///     vec![TermMeta::new("T1", "translation"), TermMeta::new("T2", "membrane")],
/// );
///
/// let bp = GeneSetIndex::build(&table, Ontology::Bp);
/// assert_eq!(bp.genes("T1").unwrap().len(), 2);
/// assert!(bp.genes("T2").is_none());
/// assert_eq!(bp.name("T2"), Some("membrane"));
/// assert_eq!(bp.base_ontology("T2"), Some(BaseOntology::Cc));
///
/// let all = GeneSetIndex::build(&table, Ontology::All);
/// assert_eq!(all.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeneSetIndex {
    ontology: Option<Ontology>,
    gene_sets: HashMap<TermId, Genes>,
    names: HashMap<TermId, String>,
    provenance: HashMap<TermId, BaseOntology>,
}

impl GeneSetIndex {
    /// Builds the index of the Gene Ontology `table` for the given scope
    ///
    /// For a base ontology, only records of that ontology contribute gene
    /// sets. For [`Ontology::All`] every record contributes.
    ///
    /// If a term is annotated with more than one base ontology, the first
    /// record wins for the provenance.
    pub fn build(table: &AnnotationTable, ontology: Ontology) -> Self {
        let mut gene_sets: HashMap<TermId, Genes> = HashMap::new();
        let mut provenance: HashMap<TermId, BaseOntology> = HashMap::new();
        let mut conflicts: HashSet<&TermId> = HashSet::new();

        for record in table.records() {
            match provenance.entry(record.term().clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(record.ontology());
                }
                Entry::Occupied(entry) => {
                    if *entry.get() != record.ontology() && conflicts.insert(record.term()) {
                        warn!(
                            "{} is annotated as {} and {}, keeping {}",
                            record.term(),
                            entry.get(),
                            record.ontology(),
                            entry.get()
                        );
                    }
                }
            }

            if ontology.covers(record.ontology()) {
                gene_sets
                    .entry(record.term().clone())
                    .or_default()
                    .insert(record.gene().clone());
            }
        }

        debug!(
            "Built {} index with {} terms from {} records",
            ontology,
            gene_sets.len(),
            table.len()
        );

        Self {
            ontology: Some(ontology),
            gene_sets,
            names: project_names(table.terms()),
            provenance,
        }
    }

    /// Builds the index of a KEGG pathway or module `table`
    ///
    /// Pathway indices have no ontology scope and an empty provenance.
    pub fn from_pathways(table: &PathwayTable) -> Self {
        let mut gene_sets: HashMap<TermId, Genes> = HashMap::new();
        for link in table.links() {
            gene_sets
                .entry(link.term().clone())
                .or_default()
                .insert(link.gene().clone());
        }
        debug!(
            "Built pathway index with {} terms from {} links",
            gene_sets.len(),
            table.len()
        );
        Self {
            ontology: None,
            gene_sets,
            names: project_names(table.terms()),
            provenance: HashMap::new(),
        }
    }

    /// The ontology scope of the index, `None` for pathway indices
    pub fn ontology(&self) -> Option<Ontology> {
        self.ontology
    }

    /// Returns the gene set of the term
    ///
    /// Returns `None` if the term has no annotated genes in scope
    pub fn genes(&self, term: &str) -> Option<&Genes> {
        self.gene_sets.get(term)
    }

    /// The term to gene-set mapping
    pub fn gene_sets(&self) -> &HashMap<TermId, Genes> {
        &self.gene_sets
    }

    /// Iterates all terms and their gene sets, in arbitrary order
    pub fn iter(&self) -> std::collections::hash_map::Iter<'_, TermId, Genes> {
        self.gene_sets.iter()
    }

    /// Returns the name of the term
    pub fn name(&self, term: &str) -> Option<&str> {
        self.names.get(term).map(String::as_str)
    }

    /// The base ontology of a term, looked up across all three base ontologies
    pub fn base_ontology(&self, term: &str) -> Option<BaseOntology> {
        self.provenance.get(term).copied()
    }

    /// The term to base ontology mapping
    pub fn provenance(&self) -> &HashMap<TermId, BaseOntology> {
        &self.provenance
    }

    /// Returns all genes that are annotated to at least one term in scope
    pub fn universe(&self) -> Genes {
        self.gene_sets.values().flatten().cloned().collect()
    }

    /// Returns `true` if the gene is annotated to at least one term in scope
    pub fn contains_gene(&self, gene: &GeneId) -> bool {
        self.gene_sets.values().any(|genes| genes.contains(gene))
    }

    /// Returns the number of terms with a gene set
    pub fn len(&self) -> usize {
        self.gene_sets.len()
    }

    /// Returns `true` if no term has a gene set
    pub fn is_empty(&self) -> bool {
        self.gene_sets.is_empty()
    }
}

impl<'a> IntoIterator for &'a GeneSetIndex {
    type Item = (&'a TermId, &'a Genes);
    type IntoIter = std::collections::hash_map::Iter<'a, TermId, Genes>;
    fn into_iter(self) -> Self::IntoIter {
        self.gene_sets.iter()
    }
}

fn project_names(terms: &[TermMeta]) -> HashMap<TermId, String> {
    terms
        .iter()
        .map(|meta| (meta.id().clone(), meta.name().to_string()))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::{AnnotationRecord, PathwayLink};

    fn example_table() -> AnnotationTable {
        AnnotationTable::new(
            vec![
                AnnotationRecord::new("g1", "T1", BaseOntology::Bp),
                AnnotationRecord::new("g2", "T1", BaseOntology::Bp),
                AnnotationRecord::new("g1", "T2", BaseOntology::Cc),
            ],
            vec![
                TermMeta::new("T1", "translation"),
                TermMeta::new("T2", "membrane"),
            ],
        )
    }

    fn larger_table() -> AnnotationTable {
        AnnotationTable::new(
            vec![
                AnnotationRecord::new("g1", "GO:1", BaseOntology::Bp),
                AnnotationRecord::new("g2", "GO:1", BaseOntology::Bp),
                AnnotationRecord::new("g2", "GO:1", BaseOntology::Bp),
                AnnotationRecord::new("g3", "GO:2", BaseOntology::Bp),
                AnnotationRecord::new("g1", "GO:3", BaseOntology::Cc),
                AnnotationRecord::new("g4", "GO:3", BaseOntology::Cc),
                AnnotationRecord::new("g2", "GO:4", BaseOntology::Mf),
                AnnotationRecord::new("g5", "GO:4", BaseOntology::Mf),
                AnnotationRecord::new("g5", "GO:5", BaseOntology::Mf),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn base_ontology_scope() {
        let index = GeneSetIndex::build(&example_table(), Ontology::Bp);

        assert_eq!(index.len(), 1);
        let genes = index.genes("T1").unwrap();
        assert!(genes.contains("g1"));
        assert!(genes.contains("g2"));
        assert!(index.genes("T2").is_none());

        assert_eq!(index.name("T1"), Some("translation"));
        assert_eq!(index.name("T2"), Some("membrane"));

        assert_eq!(index.provenance().len(), 2);
        assert_eq!(index.base_ontology("T1"), Some(BaseOntology::Bp));
        assert_eq!(index.base_ontology("T2"), Some(BaseOntology::Cc));
        assert_eq!(index.ontology(), Some(Ontology::Bp));
    }

    #[test]
    fn aggregate_scope() {
        let index = GeneSetIndex::build(&example_table(), Ontology::All);

        assert_eq!(index.len(), 2);
        assert_eq!(index.genes("T1").unwrap().len(), 2);
        let t2 = index.genes("T2").unwrap();
        assert_eq!(t2.len(), 1);
        assert!(t2.contains("g1"));
    }

    #[test]
    fn genes_are_deduplicated() {
        let index = GeneSetIndex::build(&larger_table(), Ontology::Bp);
        assert_eq!(index.genes("GO:1").unwrap().len(), 2);
    }

    #[test]
    fn filtered_sets_are_backed_by_records() {
        let table = larger_table();
        for base in BaseOntology::ALL {
            let index = GeneSetIndex::build(&table, base.into());
            for (term, genes) in &index {
                for gene in genes {
                    assert!(table.records().iter().any(|record| record.gene() == gene
                        && record.term() == term
                        && record.ontology() == base));
                }
                // provenance is complete for every filtered term
                assert_eq!(index.base_ontology(term.as_str()), Some(base));
            }
        }
    }

    #[test]
    fn aggregate_is_union_of_base_scopes() {
        let table = larger_table();
        let all = GeneSetIndex::build(&table, Ontology::All);

        let mut union: HashMap<TermId, Genes> = HashMap::new();
        for base in BaseOntology::ALL {
            let index = GeneSetIndex::build(&table, base.into());
            for (term, genes) in &index {
                union
                    .entry(term.clone())
                    .or_default()
                    .extend(genes.iter().cloned());
            }
        }
        assert_eq!(&union, all.gene_sets());
    }

    #[test]
    fn provenance_ignores_scope() {
        let table = larger_table();
        let cc = GeneSetIndex::build(&table, Ontology::Cc);
        assert_eq!(cc.len(), 1);
        assert_eq!(cc.provenance().len(), 5);
        assert_eq!(cc.base_ontology("GO:5"), Some(BaseOntology::Mf));
    }

    #[test]
    fn first_base_ontology_wins() {
        let table = AnnotationTable::new(
            vec![
                AnnotationRecord::new("g1", "T1", BaseOntology::Mf),
                AnnotationRecord::new("g2", "T1", BaseOntology::Bp),
            ],
            Vec::new(),
        );
        let all = GeneSetIndex::build(&table, Ontology::All);
        assert_eq!(all.base_ontology("T1"), Some(BaseOntology::Mf));
        assert_eq!(all.genes("T1").unwrap().len(), 2);

        let bp = GeneSetIndex::build(&table, Ontology::Bp);
        assert_eq!(bp.genes("T1").unwrap().len(), 1);
    }

    #[test]
    fn empty_scope() {
        let table = AnnotationTable::new(
            vec![AnnotationRecord::new("g1", "T1", BaseOntology::Bp)],
            Vec::new(),
        );
        let index = GeneSetIndex::build(&table, Ontology::Mf);
        assert!(index.is_empty());
        assert!(index.universe().is_empty());
        assert_eq!(index.base_ontology("T1"), Some(BaseOntology::Bp));
    }

    #[test]
    fn pathway_index() {
        let table = PathwayTable::new(
            vec![
                PathwayLink::new("g1", "hsa00010"),
                PathwayLink::new("g2", "hsa00010"),
                PathwayLink::new("g2", "hsa00020"),
            ],
            vec![TermMeta::new("hsa00010", "Glycolysis / Gluconeogenesis")],
        );
        let index = GeneSetIndex::from_pathways(&table);
        assert_eq!(index.len(), 2);
        assert!(index.ontology().is_none());
        assert!(index.provenance().is_empty());
        assert_eq!(index.universe().len(), 2);
        assert!(index.contains_gene(&"g2".into()));
        assert_eq!(index.name("hsa00010"), Some("Glycolysis / Gluconeogenesis"));
        assert!(index.name("hsa00020").is_none());
    }
}
