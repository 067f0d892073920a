use std::collections::btree_map::{BTreeMap, Entry, Iter};
use std::fmt;

use crate::crd::ChiDeployment;
use crate::error::ChiError;

/// The fully qualified identity of a replica's deployment.
///
/// Shard & replica indices are 1-based positions within the owning cluster & shard.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FullDeploymentId {
    pub cluster: String,
    pub shard: u32,
    pub replica: u32,
}

impl FullDeploymentId {
    pub fn new(cluster: impl Into<String>, shard: u32, replica: u32) -> Self {
        Self {
            cluster: cluster.into(),
            shard,
            replica,
        }
    }
}

impl fmt::Display for FullDeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.cluster, self.shard, self.replica)
    }
}

/// Maps a fully qualified deployment ID to the deployment it resolves to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeploymentRegistry(BTreeMap<FullDeploymentId, ChiDeployment>);

impl DeploymentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the given deployment under the given ID.
    ///
    /// Registering an identical deployment again is a no-op. Registering a different one
    /// under an existing ID is an error.
    pub fn register(&mut self, id: FullDeploymentId, deployment: ChiDeployment) -> Result<(), ChiError> {
        match self.0.entry(id) {
            Entry::Vacant(entry) => {
                entry.insert(deployment);
                Ok(())
            }
            Entry::Occupied(entry) if entry.get() == &deployment => Ok(()),
            Entry::Occupied(entry) => Err(ChiError::DuplicateIdentifier(entry.key().to_string())),
        }
    }

    /// Resolve the deployment registered under the given ID.
    pub fn resolve(&self, id: &FullDeploymentId) -> Result<&ChiDeployment, ChiError> {
        self.0.get(id).ok_or_else(|| ChiError::not_found("deployment", id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all registered deployments in ID order.
    pub fn iter(&self) -> Iter<'_, FullDeploymentId, ChiDeployment> {
        self.0.iter()
    }
}
