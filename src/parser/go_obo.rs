//! Parses the names and the hierarchy of all terms from `go-basic.obo`
//!
//! Only `[Term]` stanzas are used. Obsolete terms are skipped, parents are
//! connected via `is_a` and `relationship: part_of` lines.
use std::fs;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::hierarchy::TermHierarchy;
use crate::term::TermMeta;
use crate::{BaseOntology, EnrichError, EnrichResult};

/// Term names and the hierarchy of the Gene Ontology
#[derive(Debug, Clone, Default)]
pub struct GoTerms {
    /// Names of all terms
    pub terms: Vec<TermMeta>,
    /// Parent-child structure of all terms
    pub hierarchy: TermHierarchy,
}

struct RawTerm<'a> {
    id: &'a str,
    name: &'a str,
    ontology: BaseOntology,
    parents: Vec<&'a str>,
}

/// Reads `go-basic.obo` from `filename`
///
/// # Errors
///
/// - [`EnrichError::CannotOpenFile`] if the file cannot be read
/// - [`EnrichError::InvalidOntology`] if a term has an unknown namespace
pub fn read_obo_file<P: AsRef<Path>>(filename: P) -> EnrichResult<GoTerms> {
    let name = filename.as_ref().display().to_string();
    let content = fs::read_to_string(filename).map_err(|_| EnrichError::CannotOpenFile(name))?;
    parse(&content)
}

/// Parses the content of an OBO file
///
/// # Errors
///
/// [`EnrichError::InvalidOntology`] if a term has an unknown namespace
///
/// # Examples
///
/// ```
/// use goenrich::hierarchy::HierarchyLookup;
/// use goenrich::parser::go_obo;
/// use goenrich::BaseOntology;
///
/// let obo = "[Term]
/// id: GO:0008150
/// name: biological_process
/// namespace: biological_process
///
/// [Term]
/// id: GO:0009987
/// name: cellular process
/// namespace: biological_process
/// is_a: GO:0008150 ! biological_process
/// ";
///
/// let go = go_obo::parse(obo).unwrap();
/// assert_eq!(go.terms.len(), 2);
/// assert!(go.hierarchy.terms_at_level(BaseOntology::Bp, 2).unwrap().contains("GO:0009987"));
/// ```
pub fn parse(content: &str) -> EnrichResult<GoTerms> {
    let content = content.replace("\r\n", "\n");
    let mut raw_terms = Vec::new();

    for stanza in content.split("\n\n") {
        let stanza = stanza.trim_start_matches('\n');
        if let Some(term) = stanza.strip_prefix("[Term]\n") {
            match term_from_obo(term)? {
                Some(raw) => raw_terms.push(raw),
                None => trace!("Skipping obsolete or incomplete term: {}", term),
            }
        } else {
            trace!("Ignoring: {}", stanza);
        }
    }

    let mut go = GoTerms::default();
    for raw in &raw_terms {
        go.hierarchy.add_term(raw.id, raw.ontology);
        go.terms.push(TermMeta::new(raw.id, raw.name));
    }
    for raw in &raw_terms {
        for parent in &raw.parents {
            if go.hierarchy.add_parent(raw.id, parent).is_err() {
                warn!("Parent {} of {} is not a valid term", parent, raw.id);
            }
        }
    }
    debug!("Parsed {} terms from OBO", go.terms.len());
    Ok(go)
}

fn term_from_obo(term: &str) -> EnrichResult<Option<RawTerm<'_>>> {
    let mut id = None;
    let mut name = None;
    let mut namespace = None;
    let mut parents = Vec::new();

    for line in term.lines() {
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        match key {
            "id" => id = Some(value),
            "name" => name = Some(value),
            "namespace" => namespace = Some(value),
            "is_obsolete" if value.trim() == "true" => return Ok(None),
            "is_a" => parents.push(term_id(value)),
            "relationship" => {
                if let Some(parent) = value.strip_prefix("part_of ") {
                    parents.push(term_id(parent));
                }
            }
            _ => (),
        }
    }

    let (Some(id), Some(name), Some(namespace)) = (id, name, namespace) else {
        return Ok(None);
    };
    Ok(Some(RawTerm {
        id: id.trim(),
        name: name.trim(),
        ontology: namespace.parse()?,
        parents,
    }))
}

/// Removes the trailing comment from `GO:0008150 ! biological_process`
fn term_id(value: &str) -> &str {
    value.split_once(' ').map_or(value, |(id, _)| id).trim()
}
