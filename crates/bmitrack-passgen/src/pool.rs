//! Character classes and pool construction.
//!
//! A pool is the de-duplicated, ordered set of characters a password may be
//! drawn from: the union of the selected classes with every excluded
//! character removed.

use std::collections::HashSet;

use crate::error::{PasswordError, Result};
use crate::generator::PasswordRequest;

/// ASCII letters, lowercase then uppercase.
pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// ASCII decimal digits.
pub const DIGITS: &str = "0123456789";

/// The 32 ASCII punctuation characters.
pub const SYMBOLS: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// The set of characters eligible for sampling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterPool {
    chars: Vec<char>,
}

impl CharacterPool {
    /// Build the pool described by a request.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::NoCharactersAvailable`] if no class is selected
    /// or the exclusions remove every candidate.
    pub fn build(request: &PasswordRequest) -> Result<Self> {
        let excluded: HashSet<char> = request.exclude.chars().collect();

        let mut classes = Vec::with_capacity(3);
        if request.use_letters {
            classes.push(LETTERS);
        }
        if request.use_numbers {
            classes.push(DIGITS);
        }
        if request.use_symbols {
            classes.push(SYMBOLS);
        }

        let chars: Vec<char> = classes
            .into_iter()
            .flat_map(str::chars)
            .filter(|c| !excluded.contains(c))
            .collect();

        if chars.is_empty() {
            return Err(PasswordError::NoCharactersAvailable);
        }
        Ok(Self { chars })
    }

    /// The candidate characters in class order.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of candidate characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false for a built pool; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Check whether `c` may appear in a generated password.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }
}
