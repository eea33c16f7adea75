use std::fmt::{Display, Formatter};
use std::fs;

use serde::{Deserialize, Serialize};

use crate::error::domain_error::DomainError;
use crate::error::Error;

/// Identity of a catalog entry. Two entries with the same text are still different words.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(usize);

impl WordId {
    pub fn new(index: usize) -> Self {
        WordId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for WordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WordEntry {
    pub word: String,
    pub pronunciation: String,
}

impl WordEntry {
    pub fn new(word: &str, pronunciation: &str) -> Self {
        WordEntry {
            word: word.to_string(),
            pronunciation: pronunciation.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Catalog {
    entries: Vec<WordEntry>,
}

impl Catalog {
    pub const MINIMUM_WORDS: usize = 2;
    const BUILT_IN_WORDS: &'static str = include_str!("../../words/yue.tsv");

    pub fn new(entries: Vec<WordEntry>) -> Result<Self, Error> {
        if entries.len() < Catalog::MINIMUM_WORDS {
            return Err(Error::Domain(DomainError::NotEnoughWords(
                entries.len(),
                Catalog::MINIMUM_WORDS,
            )));
        }
        Ok(Catalog { entries })
    }

    pub fn built_in() -> Result<Self, Error> {
        Catalog::parse(Catalog::BUILT_IN_WORDS)
    }

    /// Loads the catalog from `path`, or the built-in word list when no path is configured.
    pub fn load(path: Option<&str>) -> Result<Self, Error> {
        let catalog = match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .map_err(|error| Error::UnreadableCatalog(path.to_string(), error.to_string()))?;
                Catalog::parse(&content)?
            }
            None => Catalog::built_in()?,
        };
        log::info!(
            "Catalog loaded. Source: '{}', Words: '{}'.",
            path.unwrap_or("built-in"),
            catalog.size()
        );
        Ok(catalog)
    }

    /// Parses `word<TAB>pronunciation` lines. Blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let mut entries = Vec::new();
        for (line_index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('\t') {
                Some((word, pronunciation))
                    if !word.trim().is_empty() && !pronunciation.trim().is_empty() =>
                {
                    entries.push(WordEntry::new(word.trim(), pronunciation.trim()))
                }
                _ => {
                    return Err(Error::InvalidCatalogLine {
                        line: line_index + 1,
                        content: line.to_string(),
                    })
                }
            }
        }
        Catalog::new(entries)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Panics when `id` does not come from this catalog.
    pub fn get(&self, id: WordId) -> &WordEntry {
        &self.entries[id.index()]
    }

    pub fn entries(&self) -> impl Iterator<Item = (WordId, &WordEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (WordId(index), entry))
    }
}
