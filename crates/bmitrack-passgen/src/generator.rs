//! Password sampling.
//!
//! Every character is drawn independently and uniformly, with replacement,
//! from the [`CharacterPool`]. Nothing forces each selected class to appear
//! in the output.

use rand::Rng;
use tracing::debug;

use crate::error::{PasswordError, Result};
use crate::pool::CharacterPool;

/// Default password length when none is configured.
pub const DEFAULT_LENGTH: usize = 12;

/// Longest password a request may ask for.
pub const MAX_LENGTH: usize = 4096;

/// Options for a single password generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRequest {
    /// Number of characters to generate.
    pub length: usize,
    /// Include ASCII letters.
    pub use_letters: bool,
    /// Include decimal digits.
    pub use_numbers: bool,
    /// Include ASCII punctuation.
    pub use_symbols: bool,
    /// Characters that must never appear in the output.
    pub exclude: String,
}

impl PasswordRequest {
    /// Create a request for `length` characters with every class enabled.
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            length,
            use_letters: true,
            use_numbers: true,
            use_symbols: true,
            exclude: String::new(),
        }
    }

    /// Set which character classes are selected.
    #[must_use]
    pub fn with_classes(mut self, letters: bool, numbers: bool, symbols: bool) -> Self {
        self.use_letters = letters;
        self.use_numbers = numbers;
        self.use_symbols = symbols;
        self
    }

    /// Set the characters to exclude.
    #[must_use]
    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = exclude.into();
        self
    }
}

impl Default for PasswordRequest {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

/// Parse a user-supplied length.
///
/// # Errors
///
/// Returns [`PasswordError::InvalidLength`] unless `input` is an integer in
/// `1..=MAX_LENGTH`.
pub fn parse_length(input: &str) -> Result<usize> {
    match input.trim().parse::<usize>() {
        Ok(length) if (1..=MAX_LENGTH).contains(&length) => Ok(length),
        _ => Err(PasswordError::InvalidLength {
            input: input.to_string(),
        }),
    }
}

/// Generate a password using the thread-local random generator.
///
/// # Errors
///
/// Returns an error if the length is out of range or the character pool is empty.
pub fn generate(request: &PasswordRequest) -> Result<String> {
    generate_with(request, &mut rand::rng())
}

/// Generate a password drawing from the supplied random generator.
///
/// # Errors
///
/// Returns an error if the length is zero or above [`MAX_LENGTH`], or if the
/// character pool is empty.
pub fn generate_with<R: Rng + ?Sized>(request: &PasswordRequest, rng: &mut R) -> Result<String> {
    if !(1..=MAX_LENGTH).contains(&request.length) {
        return Err(PasswordError::InvalidLength {
            input: request.length.to_string(),
        });
    }

    let pool = CharacterPool::build(request)?;
    let chars = pool.chars();
    let password: String = (0..request.length)
        .map(|_| chars[rng.random_range(0..chars.len())])
        .collect();

    debug!(
        length = request.length,
        pool_size = pool.len(),
        "Generated password"
    );
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_letters_only_scenario() {
        let request = PasswordRequest::new(12).with_classes(true, false, false);
        let password = generate(&request).unwrap();

        assert_eq!(password.chars().count(), 12);
        assert!(password.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_default_request() {
        let request = PasswordRequest::default();
        assert_eq!(request.length, DEFAULT_LENGTH);
        assert!(request.use_letters);
        assert!(request.use_numbers);
        assert!(request.use_symbols);
        assert!(request.exclude.is_empty());
    }

    #[test]
    fn test_zero_length_rejected() {
        let result = generate(&PasswordRequest::new(0));
        assert!(matches!(result, Err(PasswordError::InvalidLength { .. })));
    }

    #[test]
    fn test_oversized_length_rejected() {
        let result = generate(&PasswordRequest::new(usize::MAX));
        assert!(matches!(result, Err(PasswordError::InvalidLength { .. })));

        let result = generate(&PasswordRequest::new(MAX_LENGTH + 1));
        assert!(matches!(result, Err(PasswordError::InvalidLength { .. })));

        let password = generate(&PasswordRequest::new(MAX_LENGTH)).unwrap();
        assert_eq!(password.chars().count(), MAX_LENGTH);
    }

    #[test]
    fn test_empty_pool_rejected() {
        let request = PasswordRequest::new(10).with_classes(false, false, false);
        assert_eq!(
            generate(&request),
            Err(PasswordError::NoCharactersAvailable)
        );
    }

    #[test]
    fn test_single_character_pool() {
        let request = PasswordRequest::new(5)
            .with_classes(false, true, false)
            .with_exclude("012345678");
        assert_eq!(generate(&request).unwrap(), "99999");
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let request = PasswordRequest::new(32);
        let a = generate_with(&request, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_with(&request, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_samples_cover_pool() {
        // With replacement over a 10-char pool, 2000 draws hit every digit.
        let request = PasswordRequest::new(2000).with_classes(false, true, false);
        let password = generate_with(&request, &mut StdRng::seed_from_u64(42)).unwrap();
        for digit in crate::pool::DIGITS.chars() {
            assert!(password.contains(digit), "missing {digit}");
        }
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("12"), Ok(12));
        assert_eq!(parse_length(" 8 "), Ok(8));
        assert!(parse_length("0").is_err());
        assert!(parse_length("-3").is_err());
        assert!(parse_length("twelve").is_err());
        assert!(parse_length("").is_err());
        assert!(parse_length("1.5").is_err());
        assert_eq!(parse_length("4096"), Ok(MAX_LENGTH));
        assert!(parse_length("4097").is_err());
        assert!(parse_length("18446744073709551615").is_err());
    }

    proptest! {
        #[test]
        fn prop_length_and_membership(
            length in 1usize..200,
            letters in any::<bool>(),
            numbers in any::<bool>(),
            symbols in any::<bool>(),
            exclude in "[a-z0-9!?]{0,12}",
            seed in any::<u64>(),
        ) {
            let request = PasswordRequest::new(length)
                .with_classes(letters, numbers, symbols)
                .with_exclude(exclude.clone());

            match CharacterPool::build(&request) {
                Ok(pool) => {
                    let password =
                        generate_with(&request, &mut StdRng::seed_from_u64(seed)).unwrap();
                    prop_assert_eq!(password.chars().count(), length);
                    for c in password.chars() {
                        prop_assert!(pool.contains(c));
                        prop_assert!(!exclude.contains(c));
                    }
                }
                Err(err) => {
                    prop_assert_eq!(err, PasswordError::NoCharactersAvailable);
                    prop_assert_eq!(
                        generate(&request),
                        Err(PasswordError::NoCharactersAvailable)
                    );
                }
            }
        }
    }
}
