use serde::{Deserialize, Serialize};

use super::ObjectMeta;

/// A PostgreSQL cluster as stored by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ClusterSpec,
    #[serde(default)]
    pub status: ClusterStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    #[serde(default)]
    pub instances: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barman_object_store: Option<BarmanObjectStoreConfiguration>,
}

/// Where base backups and WAL files are shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarmanObjectStoreConfiguration {
    pub destination_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Defaults to the cluster name when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    #[serde(default)]
    pub instances: u32,
    #[serde(default)]
    pub ready_instances: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

impl Cluster {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            spec: ClusterSpec::default(),
            status: ClusterStatus::default(),
        }
    }

    /// The object store backups are shipped to, if the cluster permits backups.
    ///
    /// `None` both when the backup section is missing and when it names no
    /// object store.
    pub fn object_store(&self) -> Option<&BarmanObjectStoreConfiguration> {
        self.spec
            .backup
            .as_ref()
            .and_then(|backup| backup.barman_object_store.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_store_requires_both_levels() {
        let mut cluster = Cluster::new("default", "pg");
        assert!(cluster.object_store().is_none());

        cluster.spec.backup = Some(BackupConfiguration::default());
        assert!(cluster.object_store().is_none());

        cluster.spec.backup = Some(BackupConfiguration {
            barman_object_store: Some(BarmanObjectStoreConfiguration {
                destination_path: "s3://bucket/pg".to_string(),
                ..Default::default()
            }),
        });
        assert_eq!(
            cluster.object_store().map(|s| s.destination_path.as_str()),
            Some("s3://bucket/pg")
        );
    }

    #[test]
    fn decodes_camel_case_resource() {
        let json = r#"{
            "apiVersion": "postgresql.k8s.enterprisedb.io/v1",
            "kind": "Cluster",
            "metadata": {"name": "pg", "namespace": "db", "uid": "abc"},
            "spec": {
                "instances": 3,
                "backup": {"barmanObjectStore": {"destinationPath": "s3://b/p"}}
            },
            "status": {"readyInstances": 2, "currentPrimary": "pg-1"}
        }"#;
        let cluster: Cluster = serde_json::from_str(json).unwrap();

        assert_eq!(cluster.metadata.namespace, "db");
        assert_eq!(cluster.spec.instances, 3);
        assert_eq!(cluster.status.ready_instances, 2);
        assert_eq!(cluster.status.current_primary.as_deref(), Some("pg-1"));
        assert!(cluster.object_store().is_some());
    }
}
