//! Single-slot cache of raw annotation tables
//!
//! Fetching the annotation of an organism is by far the most expensive
//! step of an analysis. Users often run several analyses in a row for
//! the same organism and namespace (e.g. `BP`, then `MF`, then `ALL`),
//! which all share the same raw annotation. The [`AnnotationCache`] keeps
//! the last fetched table and hands it out again as long as the
//! organism and namespace do not change.
//!
//! The cache holds exactly one entry. Requesting a different organism or
//! namespace replaces the entry entirely, there is no eviction policy
//! beyond that.
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::annotations::{
    AnnotationSource, AnnotationTable, Namespace, OrganismKey, PathwayKind, PathwaySource,
    PathwayTable,
};
use crate::{EnrichError, EnrichResult};

/// The key of a cache entry
///
/// The ontology is not part of the key, the same raw table
/// serves all ontology scopes.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct CacheKey {
    organism: OrganismKey,
    namespace: Namespace,
}

impl CacheKey {
    /// Constructs a new [`CacheKey`]
    pub fn new(organism: &OrganismKey, namespace: &Namespace) -> Self {
        Self {
            organism: organism.clone(),
            namespace: namespace.clone(),
        }
    }

    /// The organism of the entry
    pub fn organism(&self) -> &OrganismKey {
        &self.organism
    }

    /// The namespace of the entry
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn matches(&self, organism: &OrganismKey, namespace: &Namespace) -> bool {
        &self.organism == organism && &self.namespace == namespace
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.organism, self.namespace)
    }
}

struct Entry<T> {
    key: CacheKey,
    data: Arc<T>,
}

/// Single-slot cache for raw annotation data
///
/// The entry is valid if, and only if, its key equals the key of the
/// current request. The hit check, the fetch on a miss and the
/// replacement of the entry all happen while holding one lock, so
/// concurrent callers never observe a partially replaced entry and
/// never discard each other's in-flight fetch.
///
/// A failed fetch leaves the previous entry untouched.
///
/// # Examples
///
/// ```
/// use goenrich::cache::AnnotationCache;
///
/// let cache: AnnotationCache<Vec<u32>> = AnnotationCache::new();
///
/// let data = cache.get_or_build(&"hsa".into(), &"ENTREZID".into(), || Ok(vec![1, 2, 3])).unwrap();
/// assert_eq!(data.len(), 3);
///
/// // the builder is not called again for the same key
/// let data = cache.get_or_build(&"hsa".into(), &"ENTREZID".into(), || unreachable!()).unwrap();
/// assert_eq!(data.len(), 3);
/// ```
pub struct AnnotationCache<T> {
    slot: Mutex<Option<Entry<T>>>,
}

impl<T> Default for AnnotationCache<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T> std::fmt::Debug for AnnotationCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.key() {
            Some(key) => write!(f, "AnnotationCache({key})"),
            None => write!(f, "AnnotationCache(empty)"),
        }
    }
}

impl<T> AnnotationCache<T> {
    /// Constructs a new, empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached data for `organism` and `namespace`, calling `build`
    /// only if the cache does not hold an entry for this key
    ///
    /// # Errors
    ///
    /// Returns the error of `build` unchanged. The cache keeps its
    /// previous entry in that case.
    pub fn get_or_build<F>(
        &self,
        organism: &OrganismKey,
        namespace: &Namespace,
        build: F,
    ) -> EnrichResult<Arc<T>>
    where
        F: FnOnce() -> EnrichResult<T>,
    {
        let mut slot = self.lock();

        if let Some(entry) = slot.as_ref() {
            if entry.key.matches(organism, namespace) {
                debug!("Annotation cache hit for {}", entry.key);
                return Ok(Arc::clone(&entry.data));
            }
        }

        let key = CacheKey::new(organism, namespace);
        debug!("Annotation cache miss for {}", key);
        let data = Arc::new(build()?);

        if let Some(previous) = slot.as_ref() {
            info!("Replacing cached annotation {} with {}", previous.key, key);
        }
        *slot = Some(Entry {
            key,
            data: Arc::clone(&data),
        });
        Ok(data)
    }

    /// Returns the key of the current entry, if any
    pub fn key(&self) -> Option<CacheKey> {
        self.lock().as_ref().map(|entry| entry.key.clone())
    }

    /// Returns `true` if the cache holds the entry for `organism` and `namespace`
    pub fn contains(&self, organism: &OrganismKey, namespace: &Namespace) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|entry| entry.key.matches(organism, namespace))
    }

    /// Removes the current entry
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<Entry<T>>> {
        // the entry is only ever replaced as a whole, a poisoned lock
        // still guards a consistent entry
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AnnotationCache<AnnotationTable> {
    /// Returns the Gene Ontology annotation of `organism` and `namespace`,
    /// querying `source` only on a cache miss
    ///
    /// # Errors
    ///
    /// - [`EnrichError::UnsupportedNamespace`] if the source does not
    ///     support the namespace. The source is not queried.
    /// - Any error of [`AnnotationSource::fetch`]
    pub fn get_or_fetch<S: AnnotationSource + ?Sized>(
        &self,
        source: &S,
        organism: &OrganismKey,
        namespace: &Namespace,
    ) -> EnrichResult<Arc<AnnotationTable>> {
        self.get_or_build(organism, namespace, || {
            if !source.supports(organism, namespace) {
                return Err(unsupported(organism, namespace));
            }
            let table = source.fetch(organism, namespace)?;
            info!(
                "Fetched {} annotation records for {}/{}",
                table.len(),
                organism,
                namespace
            );
            Ok(table)
        })
    }
}

impl AnnotationCache<PathwayTable> {
    /// Returns the pathway annotation of `organism` and `namespace`,
    /// querying `source` only on a cache miss
    ///
    /// Each [`PathwayKind`] must use its own cache.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::UnsupportedNamespace`] if the source does not
    ///     support the namespace. The source is not queried.
    /// - Any error of [`PathwaySource::fetch_pathways`]
    pub fn get_or_fetch_pathways<S: PathwaySource + ?Sized>(
        &self,
        source: &S,
        organism: &OrganismKey,
        namespace: &Namespace,
        kind: PathwayKind,
    ) -> EnrichResult<Arc<PathwayTable>> {
        self.get_or_build(organism, namespace, || {
            if !source.supports(organism, namespace) {
                return Err(unsupported(organism, namespace));
            }
            let table = source.fetch_pathways(organism, namespace, kind)?;
            info!(
                "Fetched {} {} links for {}/{}",
                table.len(),
                kind,
                organism,
                namespace
            );
            Ok(table)
        })
    }
}

fn unsupported(organism: &OrganismKey, namespace: &Namespace) -> EnrichError {
    EnrichError::UnsupportedNamespace {
        organism: organism.to_string(),
        namespace: namespace.to_string(),
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::annotations::AnnotationRecord;
    use crate::BaseOntology;

    #[derive(Default)]
    struct CountingSource {
        fetches: AtomicUsize,
    }

    impl CountingSource {
        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl AnnotationSource for CountingSource {
        fn supports(&self, _organism: &OrganismKey, namespace: &Namespace) -> bool {
            namespace.as_str() != "PROBEID"
        }

        fn fetch(
            &self,
            organism: &OrganismKey,
            namespace: &Namespace,
        ) -> EnrichResult<AnnotationTable> {
            if organism.as_str() == "unknown" {
                return Err(EnrichError::UnknownOrganism(organism.to_string()));
            }
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let gene = format!("{}-{}", organism, namespace);
            Ok(AnnotationTable::new(
                vec![AnnotationRecord::new(gene.as_str(), "GO:1", BaseOntology::Bp)],
                Vec::new(),
            ))
        }
    }

    fn fetch(
        cache: &AnnotationCache<AnnotationTable>,
        source: &CountingSource,
        organism: &str,
        namespace: &str,
    ) -> EnrichResult<Arc<AnnotationTable>> {
        cache.get_or_fetch(source, &organism.into(), &namespace.into())
    }

    #[test]
    fn repeated_key_is_fetched_once() {
        let cache = AnnotationCache::new();
        let source = CountingSource::default();

        let first = fetch(&cache, &source, "hsa", "ENTREZID").unwrap();
        let second = fetch(&cache, &source, "hsa", "ENTREZID").unwrap();
        let third = fetch(&cache, &source, "hsa", "ENTREZID").unwrap();

        assert_eq!(source.fetches(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn changed_key_replaces_entry() {
        let cache = AnnotationCache::new();
        let source = CountingSource::default();

        fetch(&cache, &source, "hsa", "ENTREZID").unwrap();
        let symbol = fetch(&cache, &source, "hsa", "SYMBOL").unwrap();
        assert_eq!(source.fetches(), 2);
        assert_eq!(symbol.records()[0].gene().as_str(), "hsa-SYMBOL");

        fetch(&cache, &source, "mmu", "SYMBOL").unwrap();
        assert_eq!(source.fetches(), 3);
        assert!(cache.contains(&"mmu".into(), &"SYMBOL".into()));
        assert!(!cache.contains(&"hsa".into(), &"SYMBOL".into()));

        // switching back is a miss again, the cache has only one slot
        fetch(&cache, &source, "hsa", "ENTREZID").unwrap();
        assert_eq!(source.fetches(), 4);
    }

    #[test]
    fn unsupported_namespace_does_not_query() {
        let cache = AnnotationCache::new();
        let source = CountingSource::default();

        let res = fetch(&cache, &source, "hsa", "PROBEID");
        assert_eq!(
            res.unwrap_err(),
            EnrichError::UnsupportedNamespace {
                organism: "hsa".to_string(),
                namespace: "PROBEID".to_string()
            }
        );
        assert_eq!(source.fetches(), 0);
        assert!(cache.key().is_none());
    }

    #[test]
    fn failed_fetch_keeps_previous_entry() {
        let cache = AnnotationCache::new();
        let source = CountingSource::default();

        fetch(&cache, &source, "hsa", "ENTREZID").unwrap();
        let res = fetch(&cache, &source, "unknown", "ENTREZID");
        assert!(matches!(res, Err(EnrichError::UnknownOrganism(_))));

        let key = cache.key().unwrap();
        assert_eq!(key.organism().as_str(), "hsa");
        assert_eq!(key.namespace().as_str(), "ENTREZID");

        fetch(&cache, &source, "hsa", "ENTREZID").unwrap();
        assert_eq!(source.fetches(), 1);
    }

    #[test]
    fn clear_cache() {
        let cache = AnnotationCache::new();
        let source = CountingSource::default();

        fetch(&cache, &source, "hsa", "ENTREZID").unwrap();
        cache.clear();
        assert!(cache.key().is_none());
        fetch(&cache, &source, "hsa", "ENTREZID").unwrap();
        assert_eq!(source.fetches(), 2);
    }

    #[test]
    fn concurrent_callers_share_one_fetch() {
        let cache = AnnotationCache::new();
        let source = CountingSource::default();

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let table = fetch(&cache, &source, "hsa", "ENTREZID").unwrap();
                    assert_eq!(table.len(), 1);
                });
            }
        });
        assert_eq!(source.fetches(), 1);
    }

    #[test]
    fn debug_output() {
        let cache: AnnotationCache<u8> = AnnotationCache::new();
        assert_eq!(format!("{cache:?}"), "AnnotationCache(empty)");
        cache
            .get_or_build(&"hsa".into(), &"SYMBOL".into(), || Ok(1))
            .unwrap();
        assert_eq!(format!("{cache:?}"), "AnnotationCache(hsa/SYMBOL)");
    }
}
