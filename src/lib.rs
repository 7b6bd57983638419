//! Koun Edge - offline cache worker and client risk heuristics
//!
//! The storefront's edge runtime: a versioned shell cache with a
//! stale-while-revalidate interception policy, plus the fingerprint
//! heuristic that scores client environments for automation and
//! anonymization markers.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod fingerprint;
pub mod http;
pub mod net;
pub mod store;
pub mod ui;
pub mod worker;

pub use error::{EdgeError, EdgeResult};
