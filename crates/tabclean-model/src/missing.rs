//! Cell texts treated as missing when loading.

use std::collections::BTreeSet;

/// Tokens recognised as NA by common dataframe tooling.
pub const DEFAULT_MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Set of cell texts that load as [`crate::Value::Missing`].
///
/// Matching is exact (case-sensitive). The empty string is always included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTokens {
    tokens: BTreeSet<String>,
}

impl Default for MissingTokens {
    fn default() -> Self {
        Self::from_tokens(DEFAULT_MISSING_TOKENS.iter().copied())
    }
}

impl MissingTokens {
    /// Only empty cells are missing.
    pub fn empty_only() -> Self {
        Self::from_tokens(std::iter::empty::<&str>())
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: BTreeSet<String> = tokens.into_iter().map(Into::into).collect();
        set.insert(String::new());
        Self { tokens: set }
    }

    pub fn is_missing(&self, cell: &str) -> bool {
        self.tokens.contains(cell)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
