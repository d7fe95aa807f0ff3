use kit_security::TenantScope;
use serde_json::Value;

use crate::document::TENANT_FIELD;
use crate::filter::Filter;
use crate::pipeline::Stage;

/// A filter that always carries the tenant predicate.
///
/// The only constructor takes a [`TenantScope`], so an unscoped filter cannot
/// be passed where a `ScopedFilter` is expected.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedFilter {
    inner: Filter,
}

impl ScopedFilter {
    /// `tenant_id == scope AND filter`.
    #[must_use]
    pub fn new(scope: &TenantScope, filter: Filter) -> Self {
        Self {
            inner: tenant_match(scope).and(filter),
        }
    }

    /// Narrows the filter to a single document id.
    #[must_use]
    pub fn by_id(scope: &TenantScope, id: &str) -> Self {
        Self::new(scope, Filter::eq(crate::ID_FIELD, id))
    }

    #[must_use]
    pub fn as_filter(&self) -> &Filter {
        &self.inner
    }
}

/// An aggregation pipeline whose first stage restricts to one tenant.
///
/// Caller stages run after the tenant match, so a caller `Match` can only
/// narrow the result further.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedPipeline {
    stages: Vec<Stage>,
}

impl ScopedPipeline {
    #[must_use]
    pub fn new(scope: &TenantScope, stages: Vec<Stage>) -> Self {
        let mut all = Vec::with_capacity(stages.len() + 1);
        all.push(Stage::Match(tenant_match(scope)));
        all.extend(stages);
        Self { stages: all }
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

fn tenant_match(scope: &TenantScope) -> Filter {
    Filter::eq(TENANT_FIELD, tenant_value(scope))
}

pub(crate) fn tenant_value(scope: &TenantScope) -> Value {
    Value::String(scope.tenant_id().to_string())
}
