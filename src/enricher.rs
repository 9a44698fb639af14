//! Entry points of all enrichment analyses
//!
//! [`Enricher`] runs analyses over the Gene Ontology, [`PathwayEnricher`]
//! over KEGG pathways and modules. Both share the same flow: fetch the raw
//! annotation through a single-slot cache, derive the [`GeneSetIndex`],
//! delegate the statistics to an engine and stamp the metadata of the
//! analysis onto the result.
use std::collections::HashMap;

use tracing::{debug, info};

use crate::annotations::{
    AnnotationSource, AnnotationTable, GeneId, Genes, IdentifierMapper, Namespace, OrganismKey,
    PathwayKind, PathwaySource, PathwayTable, RankedList,
};
use crate::cache::AnnotationCache;
use crate::index::GeneSetIndex;
use crate::result::{ComparisonResult, EnrichmentResult};
use crate::stats::{EnrichParams, GeneSetEnrichment, GseaParams, OverRepresentation};
use crate::{EnrichError, EnrichResult, Ontology};

/// Organism, namespace and ontology scope of a Gene Ontology analysis
///
/// The ontology is kept as given and parsed only when the analysis runs,
/// so that an invalid scope is reported before any data is fetched.
///
/// # Examples
///
/// ```
/// use goenrich::AnalysisRequest;
///
/// let request = AnalysisRequest::new("hsa", "ENTREZID", "bp").with_readable(true);
/// assert_eq!(request.organism().as_str(), "hsa");
/// assert_eq!(request.ontology(), "bp");
/// assert!(request.readable());
/// ```
#[derive(Clone, Debug)]
pub struct AnalysisRequest {
    organism: OrganismKey,
    namespace: Namespace,
    ontology: String,
    readable: bool,
}

impl AnalysisRequest {
    /// Constructs a new [`AnalysisRequest`]
    ///
    /// `ontology` is one of `BP`, `CC`, `MF` or `ALL`, in any case.
    pub fn new<O, N>(organism: O, namespace: N, ontology: &str) -> Self
    where
        O: Into<OrganismKey>,
        N: Into<Namespace>,
    {
        Self {
            organism: organism.into(),
            namespace: namespace.into(),
            ontology: ontology.to_string(),
            readable: false,
        }
    }

    /// Replace gene identifiers in the result rows by display names
    #[must_use]
    pub fn with_readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }

    /// The organism
    pub fn organism(&self) -> &OrganismKey {
        &self.organism
    }

    /// The namespace of the gene identifiers
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The requested ontology scope, unparsed
    pub fn ontology(&self) -> &str {
        &self.ontology
    }

    /// Returns `true` if display names are requested
    pub fn readable(&self) -> bool {
        self.readable
    }
}

type Mapper = Box<dyn IdentifierMapper + Send + Sync>;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs enrichment analyses over the Gene Ontology
///
/// The `Enricher` owns the annotation source and a single-slot
/// [`AnnotationCache`]. Consecutive analyses of the same organism and
/// namespace, e.g. first `BP`, then `MF`, then `ALL`, query the source
/// only once.
///
/// ```mermaid
/// flowchart TD
///     R[AnalysisRequest] --> P{parse ontology}
///     P -->|invalid| E1[InvalidOntology]
///     P --> C[AnnotationCache]
///     C -->|miss| S[AnnotationSource]
///     S --> C
///     C --> I[GeneSetIndex for scope]
///     I --> X[statistical engine]
///     X -->|no result| N[None]
///     X --> T[stamp organism, namespace, ontology]
///     T -->|readable| M[IdentifierMapper]
///     T -->|ALL| L[label base ontology of every row]
/// ```
///
/// # Examples
///
/// ```
/// use goenrich::annotations::{
///     AnnotationRecord, AnnotationSource, AnnotationTable, Namespace, OrganismKey,
/// };
/// use goenrich::result::TermTable;
/// use goenrich::stats::{EnrichParams, Hypergeometric};
/// use goenrich::{AnalysisRequest, BaseOntology, EnrichResult, Enricher, GeneId, Genes, Ontology};
///
/// struct Synthetic;
///
/// impl AnnotationSource for Synthetic {
///     fn supports(&self, _: &OrganismKey, namespace: &Namespace) -> bool {
///         namespace.as_str() == "ENTREZID"
///     }
///
///     fn fetch(&self, _: &OrganismKey, _: &Namespace) -> EnrichResult<AnnotationTable> {
///         let mut records = Vec::new();
///         for i in 0..100 {
///             let gene = format!("{i}");
///             records.push(AnnotationRecord::new(gene.as_str(), "GO:0008150", BaseOntology::Bp));
///             if i < 10 {
///                 records.push(AnnotationRecord::new(gene.as_str(), "GO:0006412", BaseOntology::Bp));
///             }
///         }
///         Ok(AnnotationTable::new(records, Vec::new()))
///     }
/// }
///
/// let enricher = Enricher::new(Synthetic);
/// let genes: Genes = (0u32..8).map(GeneId::from).collect();
/// let params = EnrichParams::default().with_gs_size(5, 50);
///
/// let result = enricher
///     .enrich_go(&Hypergeometric, &genes, &AnalysisRequest::new("hsa", "ENTREZID", "bp"), &params)
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(result.ontology(), Some(Ontology::Bp));
/// assert_eq!(result.organism().unwrap().as_str(), "hsa");
/// assert_eq!(result.rows()[0].id().as_str(), "GO:0006412");
/// ```
pub struct Enricher<S> {
    source: S,
    cache: AnnotationCache<AnnotationTable>,
    mapper: Option<Mapper>,
}

impl<S: AnnotationSource> Enricher<S> {
    /// Constructs a new [`Enricher`] with an empty cache
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: AnnotationCache::new(),
            mapper: None,
        }
    }

    /// Sets the [`IdentifierMapper`] used for readable results
    #[must_use]
    pub fn with_mapper<M>(mut self, mapper: M) -> Self
    where
        M: IdentifierMapper + Send + Sync + 'static,
    {
        self.mapper = Some(Box::new(mapper));
        self
    }

    /// The annotation cache
    pub fn cache(&self) -> &AnnotationCache<AnnotationTable> {
        &self.cache
    }

    /// The annotation source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Over-representation analysis of a fixed set of `genes`
    ///
    /// Returns `Ok(None)` if the `engine` reports no enriched term.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::InvalidOntology`] if the requested scope is not
    ///     one of `BP`, `CC`, `MF` or `ALL`. Nothing is fetched.
    /// - [`EnrichError::MissingIdentifierMapper`] if a readable result is
    ///     requested without a mapper. Nothing is fetched.
    /// - [`EnrichError::UnsupportedNamespace`] and any error of the source
    /// - any error of the engine or the mapper
    pub fn enrich_go<E: OverRepresentation + ?Sized>(
        &self,
        engine: &E,
        genes: &Genes,
        request: &AnalysisRequest,
        params: &EnrichParams,
    ) -> EnrichResult<Option<EnrichmentResult>> {
        debug!("Over-representation analysis of {} genes", genes.len());
        self.analyze(request, |index| engine.test(index, genes, params))
    }

    /// Gene set enrichment analysis of a `ranked` list of genes
    ///
    /// Returns `Ok(None)` if the `engine` reports no enriched term.
    ///
    /// # Errors
    ///
    /// Same as [`Enricher::enrich_go`]
    pub fn gse_go<E: GeneSetEnrichment + ?Sized>(
        &self,
        engine: &E,
        ranked: &RankedList,
        request: &AnalysisRequest,
        params: &GseaParams,
    ) -> EnrichResult<Option<EnrichmentResult>> {
        debug!("Gene set enrichment analysis of {} ranked genes", ranked.len());
        self.analyze(request, |index| engine.permute(index, ranked, params))
    }

    /// Over-representation analysis of several gene clusters
    ///
    /// Every cluster is analyzed on its own, using the same cached
    /// annotation. Clusters without result are omitted from the
    /// [`ComparisonResult`]. Returns `Ok(None)` if no cluster has a result.
    ///
    /// # Errors
    ///
    /// Same as [`Enricher::enrich_go`]
    pub fn compare_go<E: OverRepresentation + ?Sized>(
        &self,
        engine: &E,
        clusters: &[(String, Genes)],
        request: &AnalysisRequest,
        params: &EnrichParams,
    ) -> EnrichResult<Option<ComparisonResult>> {
        let mut results = Vec::with_capacity(clusters.len());
        for (cluster, genes) in clusters {
            match self.enrich_go(engine, genes, request, params)? {
                Some(result) => results.push((cluster.clone(), result)),
                None => debug!("No enriched terms in cluster {}", cluster),
            }
        }
        info!(
            "{} of {} clusters have enriched terms",
            results.len(),
            clusters.len()
        );
        ComparisonResult::merge(results)
    }

    fn analyze<F>(&self, request: &AnalysisRequest, run: F) -> EnrichResult<Option<EnrichmentResult>>
    where
        F: FnOnce(&GeneSetIndex) -> EnrichResult<Option<EnrichmentResult>>,
    {
        let ontology: Ontology = request.ontology.parse()?;
        let mapper = if request.readable {
            Some(
                self.mapper
                    .as_deref()
                    .ok_or(EnrichError::MissingIdentifierMapper)?,
            )
        } else {
            None
        };

        let table = self
            .cache
            .get_or_fetch(&self.source, &request.organism, &request.namespace)?;
        let index = GeneSetIndex::build(&table, ontology);

        let Some(mut result) = run(&index)? else {
            info!("No enriched terms for {} in {}", ontology, request.organism);
            return Ok(None);
        };

        result.stamp(&request.organism, &request.namespace, Some(ontology));
        if let Some(mapper) = mapper {
            make_readable(&mut result, mapper, &request.organism)?;
        }
        if ontology.is_all() {
            result.label_ontologies(index.provenance());
        }
        Ok(Some(result))
    }
}

/// Runs gene set enrichment analyses over KEGG pathways and modules
///
/// Pathways and modules are cached independently, each in its own
/// single-slot cache. Results carry no ontology scope.
pub struct PathwayEnricher<P> {
    source: P,
    pathways: AnnotationCache<PathwayTable>,
    modules: AnnotationCache<PathwayTable>,
}

impl<P: PathwaySource> PathwayEnricher<P> {
    /// Constructs a new [`PathwayEnricher`] with empty caches
    pub fn new(source: P) -> Self {
        Self {
            source,
            pathways: AnnotationCache::new(),
            modules: AnnotationCache::new(),
        }
    }

    /// The cache of the given kind of pathway
    pub fn cache(&self, kind: PathwayKind) -> &AnnotationCache<PathwayTable> {
        match kind {
            PathwayKind::Pathway => &self.pathways,
            PathwayKind::Module => &self.modules,
        }
    }

    /// Gene set enrichment analysis of a `ranked` list over KEGG pathways
    ///
    /// Returns `Ok(None)` if the `engine` reports no enriched pathway.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::UnsupportedNamespace`] and any error of the source
    /// - any error of the engine
    pub fn gse_kegg<E: GeneSetEnrichment + ?Sized>(
        &self,
        engine: &E,
        ranked: &RankedList,
        organism: &OrganismKey,
        namespace: &Namespace,
        params: &GseaParams,
    ) -> EnrichResult<Option<EnrichmentResult>> {
        self.analyze(PathwayKind::Pathway, organism, namespace, |index| {
            engine.permute(index, ranked, params)
        })
    }

    /// Gene set enrichment analysis of a `ranked` list over KEGG modules
    ///
    /// Returns `Ok(None)` if the `engine` reports no enriched module.
    ///
    /// # Errors
    ///
    /// Same as [`PathwayEnricher::gse_kegg`]
    pub fn gse_mkegg<E: GeneSetEnrichment + ?Sized>(
        &self,
        engine: &E,
        ranked: &RankedList,
        organism: &OrganismKey,
        namespace: &Namespace,
        params: &GseaParams,
    ) -> EnrichResult<Option<EnrichmentResult>> {
        self.analyze(PathwayKind::Module, organism, namespace, |index| {
            engine.permute(index, ranked, params)
        })
    }

    fn analyze<F>(
        &self,
        kind: PathwayKind,
        organism: &OrganismKey,
        namespace: &Namespace,
        run: F,
    ) -> EnrichResult<Option<EnrichmentResult>>
    where
        F: FnOnce(&GeneSetIndex) -> EnrichResult<Option<EnrichmentResult>>,
    {
        let table = self
            .cache(kind)
            .get_or_fetch_pathways(&self.source, organism, namespace, kind)?;
        let index = GeneSetIndex::from_pathways(&table);
        debug!("{} index with {} gene sets", kind, index.len());

        let Some(mut result) = run(&index)? else {
            info!("No enriched {} terms in {}", kind, organism);
            return Ok(None);
        };
        result.stamp(organism, namespace, None);
        Ok(Some(result))
    }
}

fn make_readable(
    result: &mut EnrichmentResult,
    mapper: &(dyn IdentifierMapper + Send + Sync),
    organism: &OrganismKey,
) -> EnrichResult<()> {
    let genes: Vec<GeneId> = result.row_genes();
    let names: HashMap<GeneId, String> = mapper.to_display_names(&genes, organism)?;
    if names.len() < genes.len() {
        debug!(
            "{} of {} genes have no display name",
            genes.len() - names.len(),
            genes.len()
        );
    }
    result.set_readable(&names);
    Ok(())
}
