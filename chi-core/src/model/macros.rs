//! Per-replica addressing macros.
//!
//! Every replica process receives a macros config section which lets it identify itself within
//! the installation, along the lines of:
//!
//! ```xml
//! <macros>
//!     <installation>example-02</installation>
//!     <events>example-02-events-2shard-1repl</events>
//!     <events-shard>1</events-shard>
//!     <replica>example-02.events.2shard-1repl.1.1</replica>
//! </macros>
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ChiError;

/// Macro names shared by every replica, which a cluster name must not shadow.
pub const RESERVED_MACROS: [&str; 2] = ["installation", "replica"];

/// Describes which cluster a shard belongs to, and the shard's 1-based index within it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacrosShardDescription {
    pub cluster_name: String,
    pub index: u32,
    /// The number of replicas recorded for this shard.
    pub replicas: u32,
}

/// Per-shard addressing metadata for an installation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MacrosIndex {
    installation: String,
    shards: BTreeMap<(String, u32), MacrosShardDescription>,
}

impl MacrosIndex {
    pub fn new(installation: impl Into<String>) -> Self {
        Self {
            installation: installation.into(),
            shards: Default::default(),
        }
    }

    pub fn installation(&self) -> &str {
        &self.installation
    }

    /// Record the given shard of the given cluster. Recording a shard again is a no-op.
    ///
    /// Fails if the cluster name is one of `RESERVED_MACROS`.
    pub fn record_shard(&mut self, cluster: &str, index: u32) -> Result<(), ChiError> {
        if RESERVED_MACROS.contains(&cluster) {
            return Err(ChiError::InvalidInput(format!("cluster name `{}` is reserved for the `{}` macro", cluster, cluster)));
        }
        self.shards.entry((cluster.to_string(), index)).or_insert_with(|| MacrosShardDescription {
            cluster_name: cluster.to_string(),
            index,
            replicas: 0,
        });
        Ok(())
    }

    /// Record the given replica of an already recorded shard.
    pub fn record_replica(&mut self, cluster: &str, shard: u32, replica: u32) -> Result<(), ChiError> {
        let desc = self
            .shards
            .get_mut(&(cluster.to_string(), shard))
            .ok_or_else(|| ChiError::not_found("shard", format!("{}/{}", cluster, shard)))?;
        desc.replicas = desc.replicas.max(replica);
        Ok(())
    }

    /// Iterate over the recorded shards of all clusters, ordered by cluster name & shard index.
    pub fn shards(&self) -> impl Iterator<Item = &MacrosShardDescription> + '_ {
        self.shards.values()
    }

    /// The shape label of the given cluster, e.g. `2shard-1repl`.
    pub fn shape_label(&self, cluster: &str) -> Option<String> {
        let (shards, replicas) = self
            .shards()
            .filter(|desc| desc.cluster_name == cluster)
            .fold((0u32, 0u32), |(shards, replicas), desc| (shards + 1, replicas.max(desc.replicas)));
        if shards == 0 {
            return None;
        }
        Some(format!("{}shard-{}repl", shards, replicas))
    }

    /// Build the address token of the given replica.
    ///
    /// The replica must have been recorded with `record_replica`, recording its shard alone
    /// is not enough.
    pub fn address_for(&self, cluster: &str, shard: u32, replica: u32) -> Result<AddressToken, ChiError> {
        let desc = self
            .shards
            .get(&(cluster.to_string(), shard))
            .filter(|desc| replica >= 1 && replica <= desc.replicas)
            .ok_or_else(|| ChiError::not_found("replica", format!("{}/{}/{}", cluster, shard, replica)))?;
        let shape = self.shape_label(cluster).ok_or_else(|| ChiError::not_found("cluster", cluster))?;
        Ok(AddressToken {
            installation: self.installation.clone(),
            cluster: desc.cluster_name.clone(),
            shape,
            shard,
            replica,
        })
    }
}

/// The identity of a single replica within an installation.
///
/// Renders as `<installation>.<cluster>.<shape>.<shard>.<replica>`. Installation & cluster
/// names are DNS-1123 labels, which never contain a `.`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressToken {
    pub installation: String,
    pub cluster: String,
    pub shape: String,
    pub shard: u32,
    pub replica: u32,
}

impl AddressToken {
    /// The macros of this replica, mapping macro name to value.
    pub fn macros(&self) -> BTreeMap<String, String> {
        let mut macros = BTreeMap::new();
        macros.insert("installation".to_string(), self.installation.clone());
        macros.insert(self.cluster.clone(), format!("{}-{}-{}", self.installation, self.cluster, self.shape));
        macros.insert(format!("{}-shard", self.cluster), self.shard.to_string());
        macros.insert("replica".to_string(), self.to_string());
        macros
    }
}

impl fmt::Display for AddressToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}.{}", self.installation, self.cluster, self.shape, self.shard, self.replica)
    }
}
