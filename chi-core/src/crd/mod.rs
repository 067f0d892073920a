//! ClickHouse installation CRD.
//!
//! References:
//! - https://kubernetes.io/docs/tasks/extend-kubernetes/custom-resources/custom-resource-definitions/
//! - https://github.com/Altinity/clickhouse-operator/blob/master/docs/custom_resource_explained.md

mod chi;

use kube::Resource;

pub use chi::{
    ChiCluster, ChiConfiguration, ChiDefaults, ChiDeployment, ChiDeploymentZone, ChiLayout, ChiPodTemplate, ChiReplica, ChiShard, ChiSpec,
    ChiStatus, ChiTemplates, ChiVolumeClaimTemplate, ClickHouseInstallation, Fingerprint,
};

/// A convenience trait built around the fact that all implementors
/// must have the following attributes.
pub trait RequiredMetadata {
    /// The name of this object.
    fn name(&self) -> &str;
}

impl RequiredMetadata for ClickHouseInstallation {
    fn name(&self) -> &str {
        self.meta().name.as_deref().unwrap_or_default()
    }
}
