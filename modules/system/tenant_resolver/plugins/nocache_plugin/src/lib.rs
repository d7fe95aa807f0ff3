//! No-cache plugin for the tenant resolver.
//!
//! Every lookup misses, so each resolution goes to the directory. Useful when
//! tenant mutations must be visible immediately, and in tests.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod domain;

pub use domain::Service;
