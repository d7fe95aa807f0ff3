//! Domain models for the tenant resolver module.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Unique identifier for a tenant.
pub type TenantId = Uuid;

/// One customer organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique tenant identifier.
    pub id: TenantId,
    /// Human-readable tenant name.
    pub name: String,
    /// URL-safe label, unique and immutable once assigned.
    pub slug: String,
    pub domains: Domains,
    pub owner: Owner,
    pub subscription: Subscription,
    pub limits: Limits,
    /// Current status of the tenant.
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Only active tenants serve traffic.
    #[must_use]
    pub fn is_routable(&self) -> bool {
        self.status == TenantStatus::Active
    }
}

/// Routable hostnames of a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domains {
    /// `"{slug}.{base_domain}"`.
    pub primary: String,
    /// Additional tenant-configured domains, in configured order.
    #[serde(default)]
    pub custom: Vec<String>,
}

impl Domains {
    #[must_use]
    pub fn for_slug(slug: &str, base_domain: &str) -> Self {
        Self {
            primary: format!("{slug}.{base_domain}"),
            custom: Vec::new(),
        }
    }

    /// `true` if `host` is the primary domain or one of the custom domains.
    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        self.primary == host || self.custom.iter().any(|d| d == host)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.custom.iter().map(String::as_str))
    }
}

/// Administrating user. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

/// Subscription tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Starter,
    Professional,
    Enterprise,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    #[default]
    Trialing,
    Suspended,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
}

/// A single resource cap. Serialized as a number, with `-1` meaning unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    Unlimited,
    Max(u32),
}

impl Limit {
    const UNLIMITED_SENTINEL: i64 = -1;

    /// `true` if one more unit may be added on top of `current`.
    #[must_use]
    pub fn permits(self, current: u64) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Max(max) => current < u64::from(max),
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unlimited => s.serialize_i64(Self::UNLIMITED_SENTINEL),
            Self::Max(n) => s.serialize_u32(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(d)?;
        if raw == Self::UNLIMITED_SENTINEL {
            return Ok(Self::Unlimited);
        }
        u32::try_from(raw).map(Self::Max).map_err(|_| {
            serde::de::Error::custom(format!("limit must be -1 or a non-negative u32, got {raw}"))
        })
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("unlimited"),
            Self::Max(n) => write!(f, "{n}"),
        }
    }
}

/// Resources capped per tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Users,
    Vehicles,
    Locations,
    BookingsPerMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub users: Limit,
    pub vehicles: Limit,
    pub locations: Limit,
    pub bookings_per_month: Limit,
}

impl Limits {
    /// Default caps for a plan.
    #[must_use]
    pub fn for_plan(plan: Plan) -> Self {
        match plan {
            Plan::Starter => Self {
                users: Limit::Max(5),
                vehicles: Limit::Max(25),
                locations: Limit::Max(1),
                bookings_per_month: Limit::Max(500),
            },
            Plan::Professional => Self {
                users: Limit::Max(25),
                vehicles: Limit::Max(150),
                locations: Limit::Max(5),
                bookings_per_month: Limit::Max(5_000),
            },
            Plan::Enterprise => Self {
                users: Limit::Unlimited,
                vehicles: Limit::Unlimited,
                locations: Limit::Unlimited,
                bookings_per_month: Limit::Unlimited,
            },
        }
    }

    #[must_use]
    pub fn get(&self, kind: ResourceKind) -> Limit {
        match kind {
            ResourceKind::Users => self.users,
            ResourceKind::Vehicles => self.vehicles,
            ResourceKind::Locations => self.locations,
            ResourceKind::BookingsPerMonth => self.bookings_per_month,
        }
    }

    /// `true` if a tenant currently holding `current` units of `kind` may add one more.
    #[must_use]
    pub fn permits(&self, kind: ResourceKind, current: u64) -> bool {
        self.get(kind).permits(current)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::for_plan(Plan::default())
    }
}

/// Tenant lifecycle status.
///
/// ```text
/// Active ──► Suspended ──► Active
///   │
///   └──────► Inactive
/// ```
///
/// There is no hard delete; `Inactive` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    /// Tenant is active and operational.
    #[default]
    Active,
    /// Tenant has been retired.
    Inactive,
    /// Tenant is temporarily suspended.
    Suspended,
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid tenant status transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: TenantStatus,
    pub to: TenantStatus,
}

impl TenantStatus {
    /// Same-state moves are allowed and are no-ops.
    #[must_use]
    pub fn can_transition_to(self, to: TenantStatus) -> bool {
        use TenantStatus::{Active, Inactive, Suspended};
        self == to || matches!((self, to), (Active, Suspended | Inactive) | (Suspended, Active))
    }

    /// Returns `Ok(true)` if the status changes, `Ok(false)` for a same-state no-op.
    ///
    /// # Errors
    /// Returns [`InvalidTransition`] for a move the state machine forbids.
    pub fn validate_transition(self, to: TenantStatus) -> Result<bool, InvalidTransition> {
        if !self.can_transition_to(to) {
            return Err(InvalidTransition { from: self, to });
        }
        Ok(self != to)
    }
}

/// 1-63 chars of `[a-z0-9-]`, not starting or ending with `-`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    (1..=63).contains(&slug.len())
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Normalizes a tenant-supplied custom domain.
///
/// Trims, lowercases and drops a trailing dot. Returns `None` if the result has
/// no dot, contains whitespace or a port, or mentions `localhost`.
#[must_use]
pub fn normalize_domain(raw: &str) -> Option<String> {
    let domain = raw.trim().trim_end_matches('.').to_ascii_lowercase();
    let acceptable = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.contains("localhost")
        && !domain.contains(':')
        && !domain.chars().any(char::is_whitespace);
    acceptable.then_some(domain)
}
