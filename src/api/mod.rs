//! Resource descriptors read from the orchestration API.
//!
//! Only the fields the instance manager actually consumes are modelled;
//! anything else in the stored object is ignored on decode.

mod backup;
mod cluster;

pub use backup::{Backup, BackupPhase, BackupSpec, BackupStatus, ClusterReference};
pub use cluster::{
    BackupConfiguration, BarmanObjectStoreConfiguration, Cluster, ClusterSpec, ClusterStatus,
};

use serde::{Deserialize, Serialize};

/// API group and version shared by `Cluster` and `Backup`.
pub const API_VERSION: &str = "postgresql.k8s.enterprisedb.io/v1";

/// Identity metadata common to every resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            uid: None,
            resource_version: None,
        }
    }
}

/// Reference to a resource, used as the subject of recorded events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    pub api_version: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}
