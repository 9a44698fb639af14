//! Annotation terms, such as Gene Ontology terms or KEGG pathways
use core::fmt::Debug;
use std::borrow::Borrow;
use std::fmt::Display;

/// The unique identifier of an annotation term
///
/// This can be a Gene Ontology ID (`GO:0006412`), a KEGG pathway (`hsa00010`)
/// or a KEGG module (`M00001`). The ID is not validated.
#[derive(Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TermId {
    inner: String,
}

impl TermId {
    /// Returns the ID as string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for TermId {
    fn from(s: &str) -> Self {
        TermId {
            inner: s.to_string(),
        }
    }
}

impl From<String> for TermId {
    fn from(inner: String) -> Self {
        TermId { inner }
    }
}

impl Borrow<str> for TermId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({})", self.inner)
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}

/// The display name of a term
///
/// Each term has exactly one name, independent of the ontology scope
/// of an analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermMeta {
    id: TermId,
    name: String,
}

impl TermMeta {
    /// Constructs a new [`TermMeta`]
    pub fn new<I: Into<TermId>>(id: I, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
        }
    }

    /// The [`TermId`] of the term
    pub fn id(&self) -> &TermId {
        &self.id
    }

    /// The human readable name
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn compare_with_str() {
        let id = TermId::from("GO:0006412");
        assert_eq!(id, "GO:0006412");
        assert_eq!(id.to_string(), "GO:0006412");
        assert_eq!(format!("{id:?}"), "TermId(GO:0006412)");
    }

    #[test]
    fn lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(TermId::from("hsa00010"), 1);
        assert_eq!(map.get("hsa00010"), Some(&1));
        assert!(map.get("hsa00020").is_none());
    }
}
