//! The pigeonhole near-duplicate index.
use hashbrown::{HashMap, HashSet};

use simhash::Simhash;

/// Buckets larger than this are reported to the big-bucket hook during
/// queries. Oversized buckets degrade performance, not correctness.
pub const BIG_BUCKET_THRESHOLD: usize = 200;

/// Key identifying one bucket: the bit slice a partition extracts from a
/// fingerprint, paired with the partition index.
///
/// The index is part of the key because unrelated fingerprints can produce
/// numerically identical slices under different partitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BucketKey {
    /// Bits of the fingerprint value in the partition's range.
    pub chunk: u128,
    /// Index of the partition that produced the chunk.
    pub partition: u32,
}

type Hook = Box<dyn Fn(BucketKey, usize)>;

/// An index of `(fingerprint value, object id)` pairs answering queries for
/// all ids within Hamming distance `k` of a query fingerprint.
///
/// The `f`-bit space is split into `k+1` contiguous partitions. A fingerprint
/// is filed under one bucket per partition, so any fingerprint within
/// distance `k` of a query shares at least one bucket with it: `k` differing
/// bits cannot touch all `k+1` disjoint partitions. Buckets hold copies of
/// fingerprint values, never references to caller-held fingerprints.
///
/// Mutation assumes a single logical writer; callers needing concurrent
/// access must serialize it externally.
pub struct SimhashIndex {
    f: u32,
    k: u32,
    buckets: HashMap<BucketKey, HashSet<(u128, String)>>,
    big_bucket_hook: Option<Hook>,
    shows_progress: bool,
}

impl SimhashIndex {
    /// Creates an empty index.
    ///
    /// # Arguments
    ///
    /// * `f` - Fingerprint width in bits, shared with every fingerprint
    ///         inserted or queried (must be in `1..=128`).
    /// * `k` - Tolerance: the maximum Hamming distance considered a near
    ///         duplicate (must be less than `f`).
    ///
    /// # Panics
    ///
    /// Panics if `f` is out of range or `k >= f`.
    pub fn new(f: u32, k: u32) -> Self {
        assert!(
            (1..=128).contains(&f),
            "Fingerprint width must be in 1..=128, got {f}."
        );
        assert!(
            k < f,
            "Tolerance must be less than the fingerprint width, got k={k}, f={f}."
        );
        Self {
            f,
            k,
            buckets: HashMap::new(),
            big_bucket_hook: None,
            shows_progress: false,
        }
    }

    /// Creates an index from an initial batch of `(object id, fingerprint)`
    /// pairs. Insertion order does not affect the final contents.
    pub fn from_pairs<I>(pairs: I, f: u32, k: u32) -> Self
    where
        I: IntoIterator<Item = (String, Simhash)>,
    {
        let mut index = Self::new(f, k);
        index.extend(pairs);
        index
    }

    /// Prints the progress of bulk insertion with stderr?
    pub fn shows_progress(mut self, yes: bool) -> Self {
        self.shows_progress = yes;
        self
    }

    /// Installs a hook invoked during queries for each visited bucket with
    /// more than [`BIG_BUCKET_THRESHOLD`] entries.
    pub fn big_bucket_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(BucketKey, usize) + 'static,
    {
        self.big_bucket_hook = Some(Box::new(hook));
        self
    }

    /// Inserts the pair `(fingerprint value, object id)` into one bucket per
    /// partition. Inserting the same pair twice has no additional effect.
    ///
    /// # Panics
    ///
    /// Panics if the fingerprint's width differs from the index's.
    pub fn add<S>(&mut self, obj_id: S, simhash: &Simhash)
    where
        S: Into<String>,
    {
        assert_eq!(
            simhash.num_bits(),
            self.f,
            "Fingerprint width must match the index width."
        );
        let entry = (simhash.value(), obj_id.into());
        for key in self.keys(simhash) {
            self.buckets.entry(key).or_default().insert(entry.clone());
        }
    }

    /// Removes the pair from every bucket it was filed under. Removing an
    /// absent pair is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the fingerprint's width differs from the index's.
    pub fn delete(&mut self, obj_id: &str, simhash: &Simhash) {
        assert_eq!(
            simhash.num_bits(),
            self.f,
            "Fingerprint width must match the index width."
        );
        let entry = (simhash.value(), obj_id.to_owned());
        for key in self.keys(simhash) {
            if let Some(bucket) = self.buckets.get_mut(&key) {
                bucket.remove(&entry);
                if bucket.is_empty() {
                    self.buckets.remove(&key);
                }
            }
        }
    }

    /// Inserts a batch of pairs via repeated [`Self::add`].
    pub fn extend<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, Simhash)>,
    {
        for (i, (obj_id, simhash)) in pairs.into_iter().enumerate() {
            self.add(obj_id, &simhash);
            if self.shows_progress && (i + 1) % 10000 == 0 {
                eprintln!("[SimhashIndex::extend] Processed {} pairs...", i + 1);
            }
        }
    }

    /// Gets the distinct ids of all indexed objects within Hamming distance
    /// `k` of the query fingerprint, in arbitrary order.
    ///
    /// Candidates are gathered from the query's `k+1` buckets and filtered by
    /// exact distance, so the result has no false positives and, by the
    /// pigeonhole partitioning, no false negatives.
    ///
    /// # Panics
    ///
    /// Panics if the fingerprint's width differs from the index's.
    pub fn near_dups(&self, simhash: &Simhash) -> Vec<String> {
        assert_eq!(
            simhash.num_bits(),
            self.f,
            "Fingerprint width must match the index width."
        );
        let mut ans = HashSet::new();
        for key in self.keys(simhash) {
            if let Some(bucket) = self.buckets.get(&key) {
                if bucket.len() > BIG_BUCKET_THRESHOLD {
                    if let Some(hook) = self.big_bucket_hook.as_ref() {
                        hook(key, bucket.len());
                    }
                }
                for (value, obj_id) in bucket {
                    let stored = Simhash::from_value(*value, self.f);
                    if simhash.distance(&stored) <= self.k {
                        ans.insert(obj_id.clone());
                    }
                }
            }
        }
        ans.into_iter().collect()
    }

    /// Gets the `k+1` ascending bit offsets partitioning `[0, f)` into
    /// contiguous ranges. Every partition spans `floor(f / (k+1))` bits
    /// except the last, which extends to cover the remainder.
    pub fn offsets(&self) -> Vec<u32> {
        let width = self.f / (self.k + 1);
        (0..=self.k).map(|i| width * i).collect()
    }

    /// Gets the number of populated bucket keys. A diagnostic; not used in
    /// query correctness.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Gets the fingerprint width in bits.
    pub const fn num_bits(&self) -> u32 {
        self.f
    }

    /// Gets the tolerance.
    pub const fn tolerance(&self) -> u32 {
        self.k
    }

    fn keys(&self, simhash: &Simhash) -> Vec<BucketKey> {
        let offsets = self.offsets();
        let mut keys = Vec::with_capacity(offsets.len());
        for (i, &offset) in offsets.iter().enumerate() {
            let end = if i + 1 == offsets.len() {
                self.f
            } else {
                offsets[i + 1]
            };
            let chunk = simhash.value() >> offset & chunk_mask(end - offset);
            keys.push(BucketKey {
                chunk,
                partition: i as u32,
            });
        }
        keys
    }
}

#[inline(always)]
fn chunk_mask(width: u32) -> u128 {
    if width == 128 {
        u128::MAX
    } else {
        (1 << width) - 1
    }
}
