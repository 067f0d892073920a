//! The deployment model of a ClickHouse installation.
//!
//! A `DeploymentModel` is built by a single sequential traversal of an installation's
//! clusters, shards & replicas, and is read-only afterwards. It holds:
//!
//! - the number of instances required of each distinct deployment flavor;
//! - the deployment each replica resolves to;
//! - the per-shard addressing metadata used to build each replica's macros;
//! - the resolved pod & volume claim templates;
//! - the config sections shared by every replica.
//!
//! Instances of a deployment flavor are shared across clusters: the Nth instance of a flavor
//! serves the Nth replica of that flavor in every cluster. The number of instances required of a
//! flavor is therefore the biggest number required by any single cluster, which is why per
//! cluster counts are combined with `DeploymentNumber::merge`.

mod counter;
mod macros;
mod registry;
#[cfg(test)]
mod registry_test;
mod sections;
#[cfg(test)]
mod sections_test;
mod templates;
#[cfg(test)]
mod templates_test;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::Config;
use crate::crd::{ChiCluster, ChiDeployment, ChiLayout, ChiReplica, ChiShard, ClickHouseInstallation, Fingerprint, RequiredMetadata};
use crate::error::ChiError;
pub use counter::DeploymentNumber;
pub use macros::{AddressToken, MacrosIndex, MacrosShardDescription, RESERVED_MACROS};
pub use registry::{DeploymentRegistry, FullDeploymentId};
pub use sections::ConfigSections;
pub use templates::{PodTemplatesIndex, PodTemplatesIndexData, TemplateIndex, VolumeClaimTemplatesIndex, VolumeClaimTemplatesIndexData};

const ERR_RE_NAME: &str = "must be a DNS-1123 label matching the pattern `^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$`";

lazy_static! {
    /// Regular expression used to validate installation & cluster names.
    static ref RE_NAME: Regex = Regex::new(r"^[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?$").expect("failed to compile RE_NAME regex");
}

/// The deployment model of a ClickHouse installation.
#[derive(Clone, Debug)]
pub struct DeploymentModel {
    deployment_number: DeploymentNumber,
    deployments: DeploymentRegistry,
    macros: MacrosIndex,
    pod_templates: PodTemplatesIndex,
    volume_claim_templates: VolumeClaimTemplatesIndex,
    common_config_sections: ConfigSections,
    common_users_config_sections: ConfigSections,
    /// The first deployment observed for each fingerprint.
    flavors: BTreeMap<Fingerprint, ChiDeployment>,
}

impl DeploymentModel {
    /// Build the deployment model of the given installation.
    #[tracing::instrument(level = "debug", skip(chi, config), fields(installation = chi.name()))]
    pub fn build(chi: &ClickHouseInstallation, config: &Config) -> Result<Self, ChiError> {
        validate_name("installation", chi.name())?;
        let spec = &chi.spec;
        let mut model = Self {
            deployment_number: DeploymentNumber::new(),
            deployments: DeploymentRegistry::new(),
            macros: MacrosIndex::new(chi.name()),
            pod_templates: PodTemplatesIndex::from_templates(&spec.templates),
            volume_claim_templates: VolumeClaimTemplatesIndex::from_templates(&spec.templates, &config.default_volume_claim_name),
            common_config_sections: ConfigSections::new(),
            common_users_config_sections: ConfigSections::new(),
            flavors: BTreeMap::new(),
        };
        model.common_config_sections.extend(spec.configuration.settings.iter());
        model.common_users_config_sections.extend(spec.configuration.users.iter());

        let mut seen = HashSet::new();
        for cluster in spec.configuration.clusters.iter() {
            validate_cluster_name(&cluster.name)?;
            if !seen.insert(cluster.name.as_str()) {
                return Err(ChiError::DuplicateIdentifier(cluster.name.clone()));
            }
            let cluster_number = model.traverse_cluster(cluster, &spec.defaults.deployment, config)?;
            tracing::debug!(cluster = %cluster.name, flavors = cluster_number.len(), "cluster traversed");
            model.deployment_number.merge(&cluster_number);
        }
        for (fingerprint, count) in model.deployment_number.iter() {
            tracing::debug!(%fingerprint, count, "deployment flavor required");
        }
        Ok(model)
    }

    /// Traverse the given cluster, returning the number of instances of each flavor it requires.
    fn traverse_cluster(&mut self, cluster: &ChiCluster, defaults: &ChiDeployment, config: &Config) -> Result<DeploymentNumber, ChiError> {
        let mut number = DeploymentNumber::new();
        let cluster_deployment = cluster.deployment.inherit(defaults);
        for (shard_offset, shard) in layout_shards(&cluster.layout, config).iter().enumerate() {
            let shard_index = shard_offset as u32 + 1;
            let shard_deployment = shard.deployment.inherit(&cluster_deployment);
            self.macros.record_shard(&cluster.name, shard_index)?;
            for (replica_offset, replica) in shard_replicas(shard, &cluster.layout, config).iter().enumerate() {
                let replica_index = replica_offset as u32 + 1;
                let deployment = replica.deployment.inherit(&shard_deployment);
                self.check_templates(&deployment)?;
                self.macros.record_replica(&cluster.name, shard_index, replica_index)?;

                let fingerprint = deployment.fingerprint();
                number.increment(&fingerprint);
                self.flavors.entry(fingerprint).or_insert_with(|| deployment.clone());
                self.deployments
                    .register(FullDeploymentId::new(&cluster.name, shard_index, replica_index), deployment)?;
            }
        }
        Ok(number)
    }

    /// Ensure the templates referenced by the given deployment are defined.
    fn check_templates(&self, deployment: &ChiDeployment) -> Result<(), ChiError> {
        if !deployment.pod_template.is_empty() {
            self.pod_templates.require(&deployment.pod_template)?;
        }
        if !deployment.volume_claim_template.is_empty() {
            self.volume_claim_templates.require(&deployment.volume_claim_template)?;
        }
        Ok(())
    }

    /// The number of instances required of each deployment flavor.
    pub fn deployment_number(&self) -> &DeploymentNumber {
        &self.deployment_number
    }

    /// The deployment of every replica, keyed by its fully qualified ID.
    pub fn deployments(&self) -> &DeploymentRegistry {
        &self.deployments
    }

    pub fn macros(&self) -> &MacrosIndex {
        &self.macros
    }

    pub fn pod_templates(&self) -> &PodTemplatesIndex {
        &self.pod_templates
    }

    pub fn volume_claim_templates(&self) -> &VolumeClaimTemplatesIndex {
        &self.volume_claim_templates
    }

    /// Server config sections shared by every replica.
    pub fn common_config_sections(&self) -> &ConfigSections {
        &self.common_config_sections
    }

    /// Users config sections shared by every replica.
    pub fn common_users_config_sections(&self) -> &ConfigSections {
        &self.common_users_config_sections
    }

    /// Iterate over every deployment flavor, its required number of instances & a deployment
    /// of that flavor, in fingerprint order.
    pub fn flavors(&self) -> impl Iterator<Item = (&Fingerprint, u32, &ChiDeployment)> + '_ {
        self.deployment_number
            .iter()
            .filter_map(move |(fingerprint, count)| self.flavors.get(fingerprint).map(|deployment| (fingerprint, *count, deployment)))
    }

    /// The address token of the replica with the given ID.
    pub fn address_for(&self, id: &FullDeploymentId) -> Result<AddressToken, ChiError> {
        self.macros.address_for(&id.cluster, id.shard, id.replica)
    }
}

/// The shards of the given layout, generating them from the layout's shard count when none
/// are declared.
fn layout_shards<'a>(layout: &'a ChiLayout, config: &Config) -> Cow<'a, [ChiShard]> {
    if !layout.shards.is_empty() {
        return Cow::Borrowed(&layout.shards);
    }
    let count = layout.shards_count.unwrap_or(config.default_shards_count);
    Cow::Owned(vec![ChiShard::default(); count as usize])
}

/// The replicas of the given shard, generating them from the shard's or layout's replica count
/// when none are declared.
fn shard_replicas<'a>(shard: &'a ChiShard, layout: &ChiLayout, config: &Config) -> Cow<'a, [ChiReplica]> {
    if !shard.replicas.is_empty() {
        return Cow::Borrowed(&shard.replicas);
    }
    let count = shard.replicas_count.or(layout.replicas_count).unwrap_or(config.default_replicas_count);
    Cow::Owned(vec![ChiReplica::default(); count as usize])
}

fn validate_name(kind: &str, name: &str) -> Result<(), ChiError> {
    if !RE_NAME.is_match(name) {
        return Err(ChiError::InvalidInput(format!("{} name `{}` is invalid, {}", kind, name, ERR_RE_NAME)));
    }
    Ok(())
}

/// Cluster names double as macro names, so they must not shadow the shared macros.
fn validate_cluster_name(name: &str) -> Result<(), ChiError> {
    validate_name("cluster", name)?;
    if RESERVED_MACROS.contains(&name) {
        return Err(ChiError::InvalidInput(format!(
            "cluster name `{}` is invalid, must not be one of the reserved macro names {:?}",
            name, RESERVED_MACROS
        )));
    }
    Ok(())
}
