#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Tenant Resolver Gateway
//!
//! Maps inbound hostnames to tenants and hands out tenant-scoped data
//! gateways:
//!
//! - [`Service`] classifies the host, consults the resolution cache and
//!   falls back to the directory plugin
//! - [`TenantResolverLocalClient`] exposes the service through the SDK traits
//! - [`gateway_for`] turns a session, a resolved context or a trusted id into
//!   a [`kit_store::secure::TenantGateway`]
//! - [`Provisioner`] creates tenants together with their default records
//!
//! Plugins are injected as `Arc<dyn DirectoryPluginClient>` and
//! `Arc<dyn ResolutionCachePluginClient>`.

pub mod config;
pub mod domain;

pub use config::TenantResolverConfig;
pub use domain::{
    DefaultsReport, DomainError, GatewaySource, HostnameResolver, ProvisionRequest, Provisioner,
    Service, TenantResolverLocalClient, gateway_for, host_from_headers,
};
pub use tenant_resolver_sdk::*;
