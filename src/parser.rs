//! File based annotation data
//!
//! [`FolderSource`] reads all annotation data from one folder:
//!
//! ```text
//! <root>/
//! ├── go-basic.obo
//! ├── hsa/
//! │   ├── ENTREZID.go.tsv
//! │   ├── ENTREZID.kegg.tsv
//! │   ├── ENTREZID.mkegg.tsv
//! │   └── ENTREZID.symbols.tsv
//! └── mmu/
//!     └── ...
//! ```
//!
//! The file formats are described in [`tsv`] and [`go_obo`].
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::annotations::{
    AnnotationSource, AnnotationTable, GeneId, IdentifierMapper, Namespace, OrganismKey,
    PathwayKind, PathwaySource, PathwayTable,
};
use crate::hierarchy::TermHierarchy;
use crate::{EnrichError, EnrichResult, DEFAULT_NAMESPACES};

pub mod go_obo;
pub mod tsv;

const OBO_FILE: &str = "go-basic.obo";

/// Reads annotation data, pathways and gene symbols from a folder
///
/// Only the configured namespaces are supported, by default
/// [`DEFAULT_NAMESPACES`]. Requests for other namespaces fail before any
/// file is read.
///
/// # Examples
///
/// ```no_run
/// use goenrich::parser::FolderSource;
/// use goenrich::Enricher;
///
/// let source = FolderSource::new("annotations").with_namespaces(&["ENTREZID"]);
/// let hierarchy = source.hierarchy().unwrap();
/// let enricher = Enricher::new(source.clone()).with_mapper(source);
/// ```
#[derive(Debug, Clone)]
pub struct FolderSource {
    root: PathBuf,
    namespaces: Vec<Namespace>,
}

impl FolderSource {
    /// Constructs a new [`FolderSource`] reading from `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            namespaces: DEFAULT_NAMESPACES.iter().map(|ns| Namespace::from(*ns)).collect(),
        }
    }

    /// Replaces the supported namespaces
    #[must_use]
    pub fn with_namespaces(mut self, namespaces: &[&str]) -> Self {
        self.namespaces = namespaces.iter().map(|ns| Namespace::from(*ns)).collect();
        self
    }

    /// The root folder
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The supported namespaces
    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// Reads the term hierarchy from `go-basic.obo`
    ///
    /// # Errors
    ///
    /// - [`EnrichError::CannotOpenFile`] if the OBO file is missing
    /// - [`EnrichError::InvalidOntology`] if a term has an unknown namespace
    pub fn hierarchy(&self) -> EnrichResult<TermHierarchy> {
        Ok(go_obo::read_obo_file(self.root.join(OBO_FILE))?.hierarchy)
    }

    fn is_supported(&self, namespace: &Namespace) -> bool {
        self.namespaces.contains(namespace)
    }

    /// The path of an annotation file, checking namespace and organism
    fn annotation_file(
        &self,
        organism: &OrganismKey,
        namespace: &Namespace,
        extension: &str,
    ) -> EnrichResult<PathBuf> {
        if !self.is_supported(namespace) {
            return Err(EnrichError::UnsupportedNamespace {
                organism: organism.to_string(),
                namespace: namespace.to_string(),
            });
        }
        let folder = self.root.join(organism.as_str());
        if !folder.is_dir() {
            return Err(EnrichError::UnknownOrganism(organism.to_string()));
        }
        Ok(folder.join(format!("{namespace}.{extension}")))
    }
}

impl AnnotationSource for FolderSource {
    fn supports(&self, _organism: &OrganismKey, namespace: &Namespace) -> bool {
        self.is_supported(namespace)
    }

    fn fetch(&self, organism: &OrganismKey, namespace: &Namespace) -> EnrichResult<AnnotationTable> {
        let path = self.annotation_file(organism, namespace, "go.tsv")?;
        info!("Reading GO annotation from {}", path.display());
        let records = tsv::read_go_annotation(tsv::open(&path)?)?;
        let go = go_obo::read_obo_file(self.root.join(OBO_FILE))?;
        Ok(AnnotationTable::new(records, go.terms))
    }
}

impl PathwaySource for FolderSource {
    fn supports(&self, _organism: &OrganismKey, namespace: &Namespace) -> bool {
        self.is_supported(namespace)
    }

    fn fetch_pathways(
        &self,
        organism: &OrganismKey,
        namespace: &Namespace,
        kind: PathwayKind,
    ) -> EnrichResult<PathwayTable> {
        let extension = match kind {
            PathwayKind::Pathway => "kegg.tsv",
            PathwayKind::Module => "mkegg.tsv",
        };
        let path = self.annotation_file(organism, namespace, extension)?;
        info!("Reading {} links from {}", kind, path.display());
        tsv::read_pathways(tsv::open(&path)?)
    }
}

impl IdentifierMapper for FolderSource {
    /// Looks up the genes in the symbol files of all supported namespaces
    ///
    /// Missing symbol files are skipped.
    fn to_display_names(
        &self,
        genes: &[GeneId],
        organism: &OrganismKey,
    ) -> EnrichResult<HashMap<GeneId, String>> {
        let mut names = HashMap::new();
        for namespace in &self.namespaces {
            let path = self.annotation_file(organism, namespace, "symbols.tsv")?;
            if !path.is_file() {
                debug!("No symbols at {}", path.display());
                continue;
            }
            let symbols = tsv::read_symbols(tsv::open(&path)?)?;
            for gene in genes {
                if names.contains_key(gene) {
                    continue;
                }
                if let Some(symbol) = symbols.get(gene) {
                    names.insert(gene.clone(), symbol.clone());
                }
            }
            if names.len() == genes.len() {
                break;
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::hierarchy::HierarchyLookup;
    use crate::BaseOntology;

    const OBO: &str = "[Term]
id: GO:0008150
name: biological_process
namespace: biological_process

[Term]
id: GO:0006412
name: translation
namespace: biological_process
is_a: GO:0008150 ! biological_process
";

    /// Creates a fresh annotation folder in the temp directory
    fn folder(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("goenrich-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("hsa")).unwrap();
        fs::write(root.join(OBO_FILE), OBO).unwrap();
        fs::write(
            root.join("hsa").join("ENTREZID.go.tsv"),
            "gene\tterm\tontology\n1\tGO:0006412\tBP\n2\tGO:0006412\tBP\n1\tGO:0005575\tCC\n",
        )
        .unwrap();
        fs::write(
            root.join("hsa").join("ENTREZID.kegg.tsv"),
            "gene\tpathway\tname\n1\thsa00010\tGlycolysis\n",
        )
        .unwrap();
        fs::write(
            root.join("hsa").join("ENTREZID.symbols.tsv"),
            "gene\tsymbol\n1\tA1BG\n",
        )
        .unwrap();
        root
    }

    #[test]
    fn fetch_go_annotation() {
        let root = folder("fetch");
        let source = FolderSource::new(&root);
        let table = source.fetch(&"hsa".into(), &"ENTREZID".into()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.records()[2].ontology(), BaseOntology::Cc);
        assert_eq!(table.terms().len(), 2);
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn unsupported_namespace() {
        let source = FolderSource::new("/does/not/exist").with_namespaces(&["SYMBOL"]);
        assert!(!AnnotationSource::supports(&source, &"hsa".into(), &"ENTREZID".into()));
        let res = source.fetch(&"hsa".into(), &"ENTREZID".into());
        assert!(matches!(res, Err(EnrichError::UnsupportedNamespace { .. })));
    }

    #[test]
    fn unknown_organism() {
        let root = folder("organism");
        let source = FolderSource::new(&root);
        let res = source.fetch(&"xyz".into(), &"ENTREZID".into());
        assert_eq!(res.unwrap_err(), EnrichError::UnknownOrganism("xyz".to_string()));
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn missing_annotation_file() {
        let root = folder("missing");
        let source = FolderSource::new(&root);
        let res = source.fetch(&"hsa".into(), &"SYMBOL".into());
        assert!(matches!(res, Err(EnrichError::CannotOpenFile(_))));

        let res = source.fetch_pathways(&"hsa".into(), &"ENTREZID".into(), PathwayKind::Module);
        assert!(matches!(res, Err(EnrichError::CannotOpenFile(_))));
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn fetch_pathways() {
        let root = folder("pathways");
        let source = FolderSource::new(&root);
        let table = source
            .fetch_pathways(&"hsa".into(), &"ENTREZID".into(), PathwayKind::Pathway)
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.terms()[0].name(), "Glycolysis");
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn display_names() {
        let root = folder("symbols");
        let source = FolderSource::new(&root);
        let names = source
            .to_display_names(&["1".into(), "2".into()], &"hsa".into())
            .unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names.get("1").unwrap(), "A1BG");
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn hierarchy() {
        let root = folder("hierarchy");
        let hierarchy = FolderSource::new(&root).hierarchy().unwrap();
        let level2 = hierarchy.terms_at_level(BaseOntology::Bp, 2).unwrap();
        assert!(level2.contains("GO:0006412"));
        fs::remove_dir_all(root).unwrap();
    }
}
