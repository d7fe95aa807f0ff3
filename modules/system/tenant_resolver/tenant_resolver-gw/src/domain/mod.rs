//! Domain layer for the tenant resolver gateway.

pub mod error;
pub mod gateway;
pub mod hostname;
pub mod local_client;
pub mod provisioning;
pub mod service;

pub use error::DomainError;
pub use gateway::{GatewaySource, gateway_for};
pub use hostname::{HostnameResolver, host_from_headers};
pub use local_client::TenantResolverLocalClient;
pub use provisioning::{DefaultsReport, ProvisionRequest, Provisioner};
pub use service::Service;
