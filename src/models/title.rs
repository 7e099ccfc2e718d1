use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A show in the catalog, keyed by its title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl CatalogEntry {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// The known shows, in the order they were loaded
///
/// Titles are unique; inserting a title that is already present keeps the
/// original entry.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: IndexMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, returning `false` if the title was already taken
    pub fn insert(&mut self, entry: CatalogEntry) -> bool {
        if self.entries.contains_key(&entry.title) {
            return false;
        }
        self.entries.insert(entry.title.clone(), entry);
        true
    }

    pub fn get(&self, title: &str) -> Option<&CatalogEntry> {
        self.entries.get(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}
