//! Injected CNAE lookup capability.
//!
//! The CNAE-to-annex mapping is owned by an external directory (in
//! production, a remote search service backing the autocomplete UI). The
//! core only depends on this trait; callers inject whichever
//! implementation they have. [`StaticCnaeDirectory`] is the in-memory
//! implementation used by tests and offline tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CnaeEntry;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("malformed CNAE code: {0}")]
    MalformedCode(String),
}

/// Resolution and search over the CNAE activity catalogue.
#[async_trait]
pub trait CnaeDirectory: Send + Sync {
    /// Looks up one activity by code. Unknown codes are `Ok(None)`, not an
    /// error.
    async fn resolve(&self, code: &str) -> Result<Option<CnaeEntry>, DirectoryError>;

    /// Autocomplete search by code prefix or description fragment, ordered
    /// by code.
    async fn search(&self, term: &str) -> Result<Vec<CnaeEntry>, DirectoryError>;
}

/// Strips formatting punctuation so "6201-5/01" and "6201501" resolve to
/// the same entry.
fn normalize_code(code: &str) -> String {
    code.chars().filter(char::is_ascii_digit).collect()
}

/// In-memory directory over a fixed set of entries.
#[derive(Debug, Clone)]
pub struct StaticCnaeDirectory {
    by_code: HashMap<String, CnaeEntry>,
}

impl StaticCnaeDirectory {
    pub fn new(entries: Vec<CnaeEntry>) -> Self {
        Self {
            by_code: entries
                .into_iter()
                .map(|entry| (normalize_code(&entry.codigo), entry))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[async_trait]
impl CnaeDirectory for StaticCnaeDirectory {
    async fn resolve(
        &self,
        code: &str,
    ) -> Result<Option<CnaeEntry>, DirectoryError> {
        let normalized = normalize_code(code);
        if normalized.is_empty() {
            return Err(DirectoryError::MalformedCode(code.to_string()));
        }
        Ok(self.by_code.get(&normalized).cloned())
    }

    async fn search(
        &self,
        term: &str,
    ) -> Result<Vec<CnaeEntry>, DirectoryError> {
        let code_term = normalize_code(term);
        let description_term = term.to_lowercase();

        let mut matches: Vec<CnaeEntry> = self
            .by_code
            .values()
            .filter(|entry| {
                let by_code =
                    !code_term.is_empty() && normalize_code(&entry.codigo).starts_with(&code_term);
                let by_description = !description_term.is_empty()
                    && entry.descricao.to_lowercase().contains(&description_term);
                by_code || by_description
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.codigo.cmp(&b.codigo));

        Ok(matches)
    }
}
