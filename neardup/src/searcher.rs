//! Searcher for near-duplicate documents.
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use simhash::{Simhash, SimhashConfig, TokenRule, Xxh3Hasher};

use crate::errors::{NearDupError, Result};
use crate::index::{BucketKey, SimhashIndex};

/// Searcher for documents within a Hamming tolerance of a query document.
///
/// Wraps fingerprint construction and the pigeonhole index behind one
/// surface: documents go in, ids of near-duplicate documents come out.
pub struct NearDupSearcher {
    config: SimhashConfig<Xxh3Hasher>,
    index: SimhashIndex,
    num_docs: usize,
    shows_progress: bool,
}

impl NearDupSearcher {
    /// Creates an instance.
    ///
    /// # Arguments
    ///
    /// * `f` - Fingerprint width in bits (must be in `1..=128`).
    /// * `k` - Tolerance: the maximum Hamming distance considered a near
    ///         duplicate (must be less than `f`).
    /// * `seed` - Seed value for the feature hasher. Fingerprints are
    ///            deterministic for a fixed seed; a random seed is drawn when
    ///            `None`.
    pub fn new(f: u32, k: u32, seed: Option<u64>) -> Result<Self> {
        if k >= f {
            return Err(NearDupError::input(format!(
                "Tolerance must be less than the fingerprint width, got k={k}, f={f}."
            )));
        }
        let seed = seed.unwrap_or_else(rand::random::<u64>);
        let mut seeder = rand_xoshiro::SplitMix64::seed_from_u64(seed);
        let config = SimhashConfig::new(f, simhash::config::DEFAULT_WINDOW_SIZE)?
            .with_hasher(Xxh3Hasher::new(seeder.next_u64()));
        Ok(Self {
            config,
            index: SimhashIndex::new(f, k),
            num_docs: 0,
            shows_progress: false,
        })
    }

    /// Replaces the shingle window width (must be more than 0).
    pub fn window_size(self, window_size: usize) -> Result<Self> {
        let hasher = *self.config.hasher();
        let config = SimhashConfig::new(self.config.num_bits(), window_size)?
            .with_token_rule(self.config.token_rule().clone())
            .with_hasher(hasher);
        Ok(Self { config, ..self })
    }

    /// Replaces the token rule.
    pub fn token_rule(mut self, token_rule: TokenRule) -> Self {
        self.config = self.config.with_token_rule(token_rule);
        self
    }

    /// Prints the progress of bulk indexing with stderr?
    pub fn shows_progress(mut self, yes: bool) -> Self {
        self.shows_progress = yes;
        self
    }

    /// Installs a hook on the underlying index reporting oversized buckets.
    pub fn big_bucket_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(BucketKey, usize) + 'static,
    {
        self.index = self.index.big_bucket_hook(hook);
        self
    }

    /// Indexes documents under sequential string ids, continuing from the
    /// number already indexed.
    pub fn index_documents<I, D>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<str>,
    {
        for (i, doc) in documents.into_iter().enumerate() {
            if self.shows_progress && (i + 1) % 1000 == 0 {
                eprintln!("Processed {} documents...", i + 1);
            }
            let simhash = Simhash::from_text(doc.as_ref(), &self.config);
            self.index.add(self.num_docs.to_string(), &simhash);
            self.num_docs += 1;
        }
        self
    }

    /// Indexes documents under sequential string ids, fingerprinting them in
    /// parallel. Index insertion stays serial; only the pure fingerprint
    /// construction fans out.
    pub fn index_documents_in_parallel<I, D>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<str> + Sync,
    {
        let documents: Vec<D> = documents.into_iter().collect();
        let simhashes: Vec<Simhash> = documents
            .par_iter()
            .map(|doc| Simhash::from_text(doc.as_ref(), &self.config))
            .collect();
        for simhash in simhashes {
            self.index.add(self.num_docs.to_string(), &simhash);
            self.num_docs += 1;
        }
        self
    }

    /// Indexes one document under an explicit id.
    pub fn add_document<S>(&mut self, obj_id: S, text: &str)
    where
        S: Into<String>,
    {
        let simhash = Simhash::from_text(text, &self.config);
        self.index.add(obj_id, &simhash);
        self.num_docs += 1;
    }

    /// Removes one document previously indexed under an explicit id.
    pub fn remove_document(&mut self, obj_id: &str, text: &str) {
        let simhash = Simhash::from_text(text, &self.config);
        self.index.delete(obj_id, &simhash);
    }

    /// Gets the distinct ids of all indexed documents within the tolerance of
    /// the query text, in arbitrary order.
    pub fn search_near_dups(&self, text: &str) -> Vec<String> {
        self.index.near_dups(&Simhash::from_text(text, &self.config))
    }

    /// Fingerprints a document with the searcher's configuration.
    pub fn fingerprint(&self, text: &str) -> Simhash {
        Simhash::from_text(text, &self.config)
    }

    /// Gets the number of indexed documents.
    pub const fn len(&self) -> usize {
        self.num_docs
    }

    /// Checks if no documents are indexed.
    pub const fn is_empty(&self) -> bool {
        self.num_docs == 0
    }

    /// Gets the underlying index.
    pub const fn index(&self) -> &SimhashIndex {
        &self.index
    }

    /// Gets the configuration of fingerprint construction.
    pub const fn config(&self) -> &SimhashConfig<Xxh3Hasher> {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_document_is_found() {
        let searcher = NearDupSearcher::new(64, 2, Some(42))
            .unwrap()
            .index_documents(["the quick brown fox", "a completely different sentence"]);
        let ans = searcher.search_near_dups("the quick brown fox");
        assert_eq!(ans, vec!["0".to_string()]);
    }

    #[test]
    fn test_flipped_bits_within_tolerance_are_found() {
        let searcher = NearDupSearcher::new(64, 2, Some(42))
            .unwrap()
            .index_documents(["the quick brown fox"]);
        let stored = searcher.fingerprint("the quick brown fox");

        // Two flipped bits stay within tolerance.
        let near = Simhash::from_value(stored.value() ^ 0b11, 64);
        assert_eq!(searcher.index().near_dups(&near), vec!["0".to_string()]);

        // One flipped bit per partition exceeds it.
        let offsets = searcher.index().offsets();
        let mut far = stored.value();
        for &offset in &offsets {
            far ^= 1 << offset;
        }
        let far = Simhash::from_value(far, 64);
        assert!(searcher.index().near_dups(&far).is_empty());
    }

    #[test]
    fn test_related_text_is_closer_than_unrelated() {
        let searcher = NearDupSearcher::new(64, 2, Some(42)).unwrap();
        let a = searcher.fingerprint("the quick brown fox");
        let b = searcher.fingerprint("the quick brown fox jumps");
        let c = searcher.fingerprint("pack my box with five dozen liquor jugs");
        assert!(a.distance(&b) < a.distance(&c));
    }

    #[test]
    fn test_add_and_remove_document() {
        let mut searcher = NearDupSearcher::new(64, 2, Some(42)).unwrap();
        searcher.add_document("doc1", "the quick brown fox");
        assert_eq!(
            searcher.search_near_dups("the quick brown fox"),
            vec!["doc1".to_string()]
        );

        searcher.remove_document("doc1", "the quick brown fox");
        assert!(searcher.search_near_dups("the quick brown fox").is_empty());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let documents = [
            "the quick brown fox",
            "the quick brown fox jumps",
            "pack my box with five dozen liquor jugs",
            "sphinx of black quartz judge my vow",
        ];
        let serial = NearDupSearcher::new(64, 8, Some(42))
            .unwrap()
            .index_documents(documents);
        let parallel = NearDupSearcher::new(64, 8, Some(42))
            .unwrap()
            .index_documents_in_parallel(documents);

        assert_eq!(serial.len(), parallel.len());
        assert_eq!(
            serial.index().bucket_count(),
            parallel.index().bucket_count()
        );
        for doc in documents {
            let mut a = serial.search_near_dups(doc);
            let mut b = parallel.search_near_dups(doc);
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_bad_tolerance() {
        assert!(NearDupSearcher::new(64, 64, Some(42)).is_err());
    }

    #[test]
    fn test_bad_window() {
        let searcher = NearDupSearcher::new(64, 2, Some(42)).unwrap();
        assert!(searcher.window_size(0).is_err());
    }
}
