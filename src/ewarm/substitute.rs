//! Literal find-and-replace over descriptor text.
//!
//! A [`Substitutions`] set is applied in one left-to-right pass. At every
//! position the longest literal that matches wins, so a literal that is a
//! prefix of another (`...\STM32F4xx\Include` and
//! `...\STM32F4xx\Include\stm32f4xx.h`) never shadows the longer one, and
//! replacement text is never rescanned.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use super::EwarmResult;
use crate::fsutil;

/// An ordered set of `(literal, replacement)` pairs.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair. Empty literals are ignored; a repeated literal replaces
    /// the earlier pair.
    pub fn add(&mut self, literal: impl Into<String>, replacement: impl Into<String>) {
        let literal = literal.into();
        if literal.is_empty() {
            return;
        }
        let replacement = replacement.into();
        if let Some(pair) = self.pairs.iter_mut().find(|(l, _)| *l == literal) {
            pair.1 = replacement;
        } else {
            self.pairs.push((literal, replacement));
        }
    }

    /// Builder-style [`Self::add`].
    #[must_use]
    pub fn with(mut self, literal: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.add(literal, replacement);
        self
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the set holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(l, r)| (l.as_str(), r.as_str()))
    }

    /// Applies every pair to `text` and returns the result.
    ///
    /// Literals that do not occur are skipped silently.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        if self.pairs.is_empty() {
            return text.to_string();
        }

        // Regex alternation is leftmost-first, so listing longer literals
        // first makes it leftmost-longest.
        let mut literals: Vec<&str> = self.pairs.iter().map(|(l, _)| l.as_str()).collect();
        literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let pattern = literals
            .iter()
            .map(|l| regex::escape(l))
            .collect::<Vec<_>>()
            .join("|");

        let Ok(re) = Regex::new(&pattern) else {
            // Only reachable past the regex size limit.
            return self.apply_sequential(text);
        };

        let lookup: HashMap<&str, &str> = self.iter().collect();
        re.replace_all(text, |caps: &regex::Captures<'_>| {
            let hit = &caps[0];
            lookup.get(hit).copied().unwrap_or(hit).to_string()
        })
        .into_owned()
    }

    fn apply_sequential(&self, text: &str) -> String {
        let mut ordered: Vec<_> = self.iter().collect();
        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        ordered
            .into_iter()
            .fold(text.to_string(), |acc, (l, r)| acc.replace(l, r))
    }

    /// Applies the set to the file at `path` in place.
    ///
    /// # Errors
    ///
    /// Returns [`super::EwarmError::FileNotFound`] if the file does not exist,
    /// or an I/O error if it cannot be read or written.
    pub fn apply_to_file(&self, path: &Path) -> EwarmResult<()> {
        let text = fsutil::read_text(path)?;
        let replaced = self.apply(&text);
        if replaced != text {
            fsutil::write_text(path, &replaced)?;
        }
        debug!(
            path = %path.display(),
            pairs = self.len(),
            changed = replaced != text,
            "Applied substitutions"
        );
        Ok(())
    }
}

/// Replaces every occurrence of `literal` in the file at `path`.
///
/// # Errors
///
/// See [`Substitutions::apply_to_file`].
pub fn replace_in_file(path: &Path, literal: &str, replacement: &str) -> EwarmResult<()> {
    Substitutions::new()
        .with(literal, replacement)
        .apply_to_file(path)
}
