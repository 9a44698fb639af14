use std::fmt::Display;
use std::str::FromStr;

use crate::EnrichError;

/// One of the three mutually exclusive sub-ontologies of the Gene Ontology
///
/// Every [`AnnotationRecord`](`crate::annotations::AnnotationRecord`) carries
/// exactly one `BaseOntology`. The aggregate [`Ontology::All`] is never
/// a base ontology.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum BaseOntology {
    /// Biological process
    Bp,
    /// Cellular component
    Cc,
    /// Molecular function
    Mf,
}

impl BaseOntology {
    /// All base ontologies
    pub const ALL: [BaseOntology; 3] = [BaseOntology::Bp, BaseOntology::Cc, BaseOntology::Mf];

    /// The short code, e.g. `BP`
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseOntology::Bp => "BP",
            BaseOntology::Cc => "CC",
            BaseOntology::Mf => "MF",
        }
    }

    /// The OBO namespace of the ontology, e.g. `biological_process`
    pub fn namespace(&self) -> &'static str {
        match self {
            BaseOntology::Bp => "biological_process",
            BaseOntology::Cc => "cellular_component",
            BaseOntology::Mf => "molecular_function",
        }
    }
}

impl Display for BaseOntology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BaseOntology {
    type Err = EnrichError;
    /// Parses either the short code (`BP`) or the OBO namespace
    /// (`biological_process`), ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bp" | "biological_process" => Ok(BaseOntology::Bp),
            "cc" | "cellular_component" => Ok(BaseOntology::Cc),
            "mf" | "molecular_function" => Ok(BaseOntology::Mf),
            _ => Err(EnrichError::InvalidOntology(s.to_string())),
        }
    }
}

/// The ontology scope of an analysis
///
/// `All` aggregates the three base ontologies into one universe.
///
/// # Examples
///
/// ```
/// use goenrich::{BaseOntology, Ontology};
///
/// let ont: Ontology = "all".parse().unwrap();
/// assert_eq!(ont, Ontology::All);
/// assert!(ont.base().is_none());
///
/// let ont: Ontology = "Bp".parse().unwrap();
/// assert_eq!(ont.base(), Some(BaseOntology::Bp));
///
/// assert!("KEGG".parse::<Ontology>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Ontology {
    /// Biological process
    Bp,
    /// Cellular component
    Cc,
    /// Molecular function
    Mf,
    /// All three base ontologies combined
    All,
}

impl Ontology {
    /// Returns the [`BaseOntology`] or `None` for [`Ontology::All`]
    pub fn base(&self) -> Option<BaseOntology> {
        match self {
            Ontology::Bp => Some(BaseOntology::Bp),
            Ontology::Cc => Some(BaseOntology::Cc),
            Ontology::Mf => Some(BaseOntology::Mf),
            Ontology::All => None,
        }
    }

    /// Returns `true` for the aggregate [`Ontology::All`]
    pub fn is_all(&self) -> bool {
        matches!(self, Ontology::All)
    }

    /// Returns `true` if records of the `base` ontology belong to this scope
    pub fn covers(&self, base: BaseOntology) -> bool {
        self.base().map_or(true, |b| b == base)
    }
}

impl From<BaseOntology> for Ontology {
    fn from(base: BaseOntology) -> Self {
        match base {
            BaseOntology::Bp => Ontology::Bp,
            BaseOntology::Cc => Ontology::Cc,
            BaseOntology::Mf => Ontology::Mf,
        }
    }
}

impl Display for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.base() {
            Some(base) => base.fmt(f),
            None => write!(f, "ALL"),
        }
    }
}

impl FromStr for Ontology {
    type Err = EnrichError;
    /// Normalizes the argument case-insensitively
    ///
    /// # Errors
    ///
    /// [`EnrichError::InvalidOntology`] if the value is not one of
    /// `BP`, `CC`, `MF` or `ALL`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BP" => Ok(Ontology::Bp),
            "CC" => Ok(Ontology::Cc),
            "MF" => Ok(Ontology::Mf),
            "ALL" => Ok(Ontology::All),
            _ => Err(EnrichError::InvalidOntology(s.to_string())),
        }
    }
}
