//! ClickHouseInstallation CRD.
//!
//! The code here is used to generate the actual CRD used in K8s. See examples/crd.rs.

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::api::core::v1::{Container, PersistentVolumeClaim, Volume};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type ClickHouseInstallation = ClickHouseInstallationCRD; // Mostly to resolve a Rust Analyzer issue.

/// CRD spec for the ClickHouseInstallation resource.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, CustomResource, JsonSchema)]
#[kube(
    struct = "ClickHouseInstallationCRD",
    status = "ChiStatus",
    group = "clickhouse.altinity.com",
    version = "v1",
    kind = "ClickHouseInstallation",
    namespaced,
    derive = "PartialEq",
    apiextensions = "v1",
    shortname = "chi",
    printcolumn = r#"{"name":"Clusters","type":"string","jsonPath":".spec.configuration.clusters[*].name"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ChiSpec {
    /// Installation wide defaults, inherited by every cluster.
    #[serde(default)]
    pub defaults: ChiDefaults,
    /// The clusters of this installation & their shared config sections.
    #[serde(default)]
    pub configuration: ChiConfiguration,
    /// Reusable templates referenced by deployments.
    #[serde(default)]
    pub templates: ChiTemplates,
}

/// CRD status object.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct ChiStatus {}

/// Installation wide defaults.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiDefaults {
    /// The deployment used by any replica which does not override it.
    #[serde(default)]
    pub deployment: ChiDeployment,
}

/// Installation configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiConfiguration {
    /// Server config sections shared by every replica, mapping section name to raw content.
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    /// Users config sections shared by every replica, mapping section name to raw content.
    #[serde(default)]
    pub users: BTreeMap<String, String>,
    /// The clusters of this installation.
    #[serde(default)]
    pub clusters: Vec<ChiCluster>,
}

/// A cluster of shards.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiCluster {
    /// The name of this cluster, which must be a DNS-1123 label unique within the installation.
    pub name: String,
    /// Deployment overrides for all replicas of this cluster.
    #[serde(default)]
    pub deployment: ChiDeployment,
    /// The shard/replica layout of this cluster.
    #[serde(default)]
    pub layout: ChiLayout,
}

/// The shard/replica layout of a cluster.
///
/// When `shards` is empty, `shards_count` shards are generated.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiLayout {
    #[serde(default)]
    pub shards_count: Option<u32>,
    #[serde(default)]
    pub replicas_count: Option<u32>,
    #[serde(default)]
    pub shards: Vec<ChiShard>,
}

/// A shard of a cluster.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiShard {
    /// The number of replicas to generate when `replicas` is empty.
    #[serde(default)]
    pub replicas_count: Option<u32>,
    /// Deployment overrides for all replicas of this shard.
    #[serde(default)]
    pub deployment: ChiDeployment,
    #[serde(default)]
    pub replicas: Vec<ChiReplica>,
}

/// A replica of a shard.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiReplica {
    /// Deployment overrides for this replica.
    #[serde(default)]
    pub deployment: ChiDeployment,
}

/// The combination of templates & settings which a replica runs.
///
/// Empty fields are inherited from the enclosing shard, cluster or installation defaults.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiDeployment {
    /// The name of the pod template to use.
    #[serde(default)]
    pub pod_template: String,
    /// The name of the volume claim template to use.
    #[serde(default)]
    pub volume_claim_template: String,
    /// The placement zone of this deployment.
    #[serde(default)]
    pub zone: ChiDeploymentZone,
    /// The scheduling scenario of this deployment.
    #[serde(default)]
    pub scenario: String,
}

impl ChiDeployment {
    /// Layer this deployment over the given parent, keeping every non-empty field of `self`.
    pub fn inherit(&self, parent: &ChiDeployment) -> ChiDeployment {
        fn pick(own: &str, parent: &str) -> String {
            let val = if own.is_empty() { parent } else { own };
            val.to_string()
        }
        ChiDeployment {
            pod_template: pick(&self.pod_template, &parent.pod_template),
            volume_claim_template: pick(&self.volume_claim_template, &parent.volume_claim_template),
            zone: if self.zone.match_labels.is_empty() {
                parent.zone.clone()
            } else {
                self.zone.clone()
            },
            scenario: pick(&self.scenario, &parent.scenario),
        }
    }

    /// Compute the canonical fingerprint of this deployment's shape.
    ///
    /// Zone labels are kept in a sorted map, so declaration order has no effect.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint(format!("{:016x}", seahash::hash(&self.canonical_bytes())))
    }

    /// The platform independent encoding hashed by `fingerprint`.
    ///
    /// Every string is prefixed by its little-endian `u64` length, the zone labels by their count.
    fn canonical_bytes(&self) -> Vec<u8> {
        fn put(buf: &mut Vec<u8>, val: &str) {
            buf.extend_from_slice(&(val.len() as u64).to_le_bytes());
            buf.extend_from_slice(val.as_bytes());
        }
        let mut buf = Vec::new();
        put(&mut buf, &self.pod_template);
        put(&mut buf, &self.volume_claim_template);
        buf.extend_from_slice(&(self.zone.match_labels.len() as u64).to_le_bytes());
        for (key, val) in self.zone.match_labels.iter() {
            put(&mut buf, key);
            put(&mut buf, val);
        }
        put(&mut buf, &self.scenario);
        buf
    }
}

/// The placement zone of a deployment.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiDeploymentZone {
    #[serde(default)]
    pub match_labels: BTreeMap<String, String>,
}

/// The canonical identity of a deployment's shape.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fingerprint {
    fn from(val: &str) -> Self {
        Self(val.to_string())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reusable templates.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiTemplates {
    #[serde(default)]
    pub pod_templates: Vec<ChiPodTemplate>,
    #[serde(default)]
    pub volume_claim_templates: Vec<ChiVolumeClaimTemplate>,
}

/// A named pod template.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiPodTemplate {
    pub name: String,
    #[serde(default)]
    #[schemars(with = "Vec<serde_json::Value>")]
    pub containers: Vec<Container>,
    #[serde(default)]
    #[schemars(with = "Vec<serde_json::Value>")]
    pub volumes: Vec<Volume>,
}

/// A named volume claim template.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChiVolumeClaimTemplate {
    pub name: String,
    /// The claim to generate. When `metadata.name` is not set, a default name is assigned.
    #[serde(default)]
    #[schemars(with = "serde_json::Value")]
    pub persistent_volume_claim: PersistentVolumeClaim,
}
