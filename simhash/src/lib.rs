//! Simhash fingerprints of text and weighted feature sets.
//!
//! A simhash is a fixed-width bit fingerprint such that similar inputs produce
//! values with a small Hamming distance.
//!
//! # Reference
//!
//! * https://dl.acm.org/doi/10.1145/509907.509965
#![deny(missing_docs)]

pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod hasher;
pub mod tokenize;

pub(crate) mod shingling;

pub use config::SimhashConfig;
pub use errors::SimhashError;
pub use fingerprint::Simhash;
pub use hasher::{FeatureHasher, Xxh3Hasher};
pub use tokenize::TokenRule;
