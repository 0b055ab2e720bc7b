//! Near-duplicate search over simhash fingerprints.
//!
//! The index splits the `f`-bit fingerprint space into `k+1` contiguous
//! partitions. Any two fingerprints within Hamming distance `k` agree
//! bit-for-bit on at least one partition (the pigeonhole principle), so
//! candidates are gathered from `k+1` buckets and filtered by exact distance
//! instead of scanning the whole collection.
#![deny(missing_docs)]

pub mod errors;
pub mod index;
pub mod searcher;

pub use index::{BucketKey, SimhashIndex};
pub use searcher::NearDupSearcher;
