//! Static Tenant Directory Plugin
//!
//! Keeps tenant records in memory, seeded from configuration, and enforces
//! slug and domain uniqueness on every write. Useful for testing, development
//! and single-node deployments.
//!
//! ## Configuration
//!
//! ```yaml
//! static_directory_plugin:
//!   base_domain: "drivehub.app"
//!   tenants:
//!     - id: "550e8400-e29b-41d4-a716-446655440001"
//!       name: "Acme Rentals"
//!       slug: "acme"
//!       custom_domains: ["rent.acme.com"]
//!       plan: professional
//!       status: active
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;


pub use config::StaticDirectoryPluginConfig;
pub use domain::Service;
