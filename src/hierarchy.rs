//! The parent-child structure of the Gene Ontology
//!
//! Pruning results by ontology level requires knowledge about the
//! hierarchy of terms. The [`HierarchyLookup`] trait describes the two
//! queries needed, [`TermHierarchy`] is an in-memory implementation,
//! usually built from an OBO file via [`parser::go_obo`](`crate::parser::go_obo`).
use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;
use tracing::debug;

use crate::term::TermId;
use crate::{BaseOntology, EnrichError, EnrichResult, DEFAULT_NUM_PARENTS};

/// Queries into the ontology hierarchy
pub trait HierarchyLookup {
    /// Returns all terms of the base ontology at the given level
    ///
    /// The root term is at level 1, its children at level 2 and so on.
    /// A term with several paths to the root can be at more than one level.
    ///
    /// # Errors
    ///
    /// Implementation specific errors of the data access
    fn terms_at_level(&self, ontology: BaseOntology, level: usize)
        -> EnrichResult<HashSet<TermId>>;

    /// Returns the base ontology of a term
    ///
    /// # Errors
    ///
    /// [`EnrichError::DoesNotExist`] if the term is unknown
    fn base_ontology_of(&self, term: &TermId) -> EnrichResult<BaseOntology>;
}

type Connections = SmallVec<[usize; DEFAULT_NUM_PARENTS]>;

#[derive(Debug, Clone)]
struct Node {
    id: TermId,
    ontology: BaseOntology,
    parents: Connections,
    children: Connections,
}

/// In-memory ontology hierarchy
///
/// # Examples
///
/// ```
/// use goenrich::hierarchy::{HierarchyLookup, TermHierarchy};
/// use goenrich::BaseOntology;
///
/// let mut hierarchy = TermHierarchy::default();
/// hierarchy.add_term("GO:0008150", BaseOntology::Bp);
/// hierarchy.add_term("GO:0009987", BaseOntology::Bp);
/// hierarchy.add_term("GO:0008152", BaseOntology::Bp);
/// hierarchy.add_parent("GO:0009987", "GO:0008150").unwrap();
/// hierarchy.add_parent("GO:0008152", "GO:0008150").unwrap();
///
/// let level2 = hierarchy.terms_at_level(BaseOntology::Bp, 2).unwrap();
/// assert_eq!(level2.len(), 2);
/// assert!(level2.contains("GO:0009987"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TermHierarchy {
    nodes: Vec<Node>,
    ids: HashMap<TermId, usize>,
}

impl TermHierarchy {
    /// Adds a new term and returns `true`
    ///
    /// If the term already exists, it is not changed and `false` is returned
    pub fn add_term<I: Into<TermId>>(&mut self, id: I, ontology: BaseOntology) -> bool {
        let id = id.into();
        if self.ids.contains_key(&id) {
            return false;
        }
        self.ids.insert(id.clone(), self.nodes.len());
        self.nodes.push(Node {
            id,
            ontology,
            parents: Connections::new(),
            children: Connections::new(),
        });
        true
    }

    /// Connects a term to its parent
    ///
    /// # Errors
    ///
    /// [`EnrichError::DoesNotExist`] if one of the terms is not present
    pub fn add_parent(&mut self, child: &str, parent: &str) -> EnrichResult<()> {
        let child_idx = self.index(child)?;
        let parent_idx = self.index(parent)?;
        if !self.nodes[child_idx].parents.contains(&parent_idx) {
            self.nodes[child_idx].parents.push(parent_idx);
            self.nodes[parent_idx].children.push(child_idx);
        }
        Ok(())
    }

    /// Returns the number of terms
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if there are no terms
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if the term is present
    pub fn contains(&self, term: &str) -> bool {
        self.ids.contains_key(term)
    }

    /// Returns the direct parents of a term
    ///
    /// # Errors
    ///
    /// [`EnrichError::DoesNotExist`] if the term is not present
    pub fn parents(&self, term: &str) -> EnrichResult<Vec<&TermId>> {
        let idx = self.index(term)?;
        Ok(self.nodes[idx]
            .parents
            .iter()
            .map(|parent| &self.nodes[*parent].id)
            .collect())
    }

    /// Returns the direct children of a term
    ///
    /// # Errors
    ///
    /// [`EnrichError::DoesNotExist`] if the term is not present
    pub fn children(&self, term: &str) -> EnrichResult<Vec<&TermId>> {
        let idx = self.index(term)?;
        Ok(self.nodes[idx]
            .children
            .iter()
            .map(|child| &self.nodes[*child].id)
            .collect())
    }

    /// Returns the root terms of the base ontology, i.e. terms without parents
    pub fn roots(&self, ontology: BaseOntology) -> Vec<&TermId> {
        self.nodes
            .iter()
            .filter(|node| node.ontology == ontology && node.parents.is_empty())
            .map(|node| &node.id)
            .collect()
    }

    fn index(&self, term: &str) -> EnrichResult<usize> {
        self.ids
            .get(term)
            .copied()
            .ok_or_else(|| EnrichError::DoesNotExist(term.to_string()))
    }
}

impl HierarchyLookup for TermHierarchy {
    fn terms_at_level(
        &self,
        ontology: BaseOntology,
        level: usize,
    ) -> EnrichResult<HashSet<TermId>> {
        if level == 0 {
            return Ok(HashSet::new());
        }
        let mut frontier: HashSet<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.ontology == ontology && node.parents.is_empty())
            .map(|(idx, _)| idx)
            .collect();

        for _ in 1..level {
            frontier = frontier
                .iter()
                .flat_map(|idx| self.nodes[*idx].children.iter().copied())
                .collect();
            if frontier.is_empty() {
                break;
            }
        }
        debug!(
            "{} terms at level {} of {}",
            frontier.len(),
            level,
            ontology
        );
        Ok(frontier
            .into_iter()
            .map(|idx| self.nodes[idx].id.clone())
            .collect())
    }

    fn base_ontology_of(&self, term: &TermId) -> EnrichResult<BaseOntology> {
        let idx = self.index(term.as_str())?;
        Ok(self.nodes[idx].ontology)
    }
}
