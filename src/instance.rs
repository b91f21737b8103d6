//! Identity of the instance the manager is attached to.

use std::sync::Arc;

/// Namespace, cluster and pod of the local PostgreSQL instance.
///
/// Fixed for the life of the process; cloning shares the same strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceIdentity {
    inner: Arc<IdentityInner>,
}

#[derive(Debug, PartialEq, Eq)]
struct IdentityInner {
    namespace: String,
    cluster_name: String,
    pod_name: String,
}

impl InstanceIdentity {
    pub fn new(
        namespace: impl Into<String>,
        cluster_name: impl Into<String>,
        pod_name: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(IdentityInner {
                namespace: namespace.into(),
                cluster_name: cluster_name.into(),
                pod_name: pod_name.into(),
            }),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn cluster_name(&self) -> &str {
        &self.inner.cluster_name
    }

    pub fn pod_name(&self) -> &str {
        &self.inner.pod_name
    }
}
