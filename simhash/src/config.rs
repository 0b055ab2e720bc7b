//! Configuration of fingerprint construction.
use crate::errors::{Result, SimhashError};
use crate::hasher::{FeatureHasher, Xxh3Hasher};
use crate::tokenize::TokenRule;

/// The default fingerprint width in bits.
pub const DEFAULT_NUM_BITS: u32 = 64;

/// The default shingle window width in characters.
pub const DEFAULT_WINDOW_SIZE: usize = 4;

/// Configuration shared by fingerprints that are compared to one another:
/// the bit width, the shingle window, the token rule, and the feature hasher.
#[derive(Clone, Debug)]
pub struct SimhashConfig<H = Xxh3Hasher> {
    f: u32,
    window_size: usize,
    token_rule: TokenRule,
    hasher: H,
}

impl SimhashConfig<Xxh3Hasher> {
    /// Creates an instance with the default token rule and a seed-0 hasher.
    ///
    /// # Arguments
    ///
    /// * `f` - Fingerprint width in bits (must be in `1..=128`).
    /// * `window_size` - Window width for shingling in feature extraction
    ///                   (must be more than 0).
    pub fn new(f: u32, window_size: usize) -> Result<Self> {
        if !(1..=128).contains(&f) {
            return Err(SimhashError::input(format!(
                "Fingerprint width must be in 1..=128, got {f}."
            )));
        }
        if window_size == 0 {
            return Err(SimhashError::input("Window size must not be 0."));
        }
        Ok(Self {
            f,
            window_size,
            token_rule: TokenRule::default(),
            hasher: Xxh3Hasher::default(),
        })
    }
}

impl Default for SimhashConfig<Xxh3Hasher> {
    fn default() -> Self {
        Self {
            f: DEFAULT_NUM_BITS,
            window_size: DEFAULT_WINDOW_SIZE,
            token_rule: TokenRule::default(),
            hasher: Xxh3Hasher::default(),
        }
    }
}

impl<H> SimhashConfig<H>
where
    H: FeatureHasher,
{
    /// Replaces the token rule.
    pub fn with_token_rule(mut self, token_rule: TokenRule) -> Self {
        self.token_rule = token_rule;
        self
    }

    /// Replaces the feature hasher.
    pub fn with_hasher<H2>(self, hasher: H2) -> SimhashConfig<H2>
    where
        H2: FeatureHasher,
    {
        SimhashConfig {
            f: self.f,
            window_size: self.window_size,
            token_rule: self.token_rule,
            hasher,
        }
    }

    /// Gets the fingerprint width in bits.
    pub const fn num_bits(&self) -> u32 {
        self.f
    }

    /// Gets the shingle window width.
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Gets the token rule.
    pub const fn token_rule(&self) -> &TokenRule {
        &self.token_rule
    }

    /// Gets the feature hasher.
    pub const fn hasher(&self) -> &H {
        &self.hasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimhashConfig::default();
        assert_eq!(config.num_bits(), 64);
        assert_eq!(config.window_size(), 4);
    }

    #[test]
    fn test_zero_width() {
        assert!(SimhashConfig::new(0, 4).is_err());
    }

    #[test]
    fn test_too_wide() {
        assert!(SimhashConfig::new(129, 4).is_err());
    }

    #[test]
    fn test_zero_window() {
        assert!(SimhashConfig::new(64, 0).is_err());
    }
}
