use std::collections::btree_map::{BTreeMap, Iter};
use std::iter::FromIterator;

use crate::crd::Fingerprint;

/// Maps a deployment fingerprint to the number of instances of that deployment required.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeploymentNumber(BTreeMap<Fingerprint, u32>);

impl DeploymentNumber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more required instance of the given fingerprint, returning the updated count.
    pub fn increment(&mut self, fingerprint: &Fingerprint) -> u32 {
        let count = self.0.entry(fingerprint.clone()).or_insert(0);
        *count += 1;
        *count
    }

    /// Merge another counter into this one in place, keeping the bigger value of each key.
    pub fn merge(&mut self, another: &DeploymentNumber) {
        for (key, value) in another.0.iter() {
            let local = self.0.entry(key.clone()).or_insert(*value);
            if *value > *local {
                *local = *value;
            }
        }
    }

    /// The pointwise maximum of this counter & another one, leaving both untouched.
    pub fn merged(&self, another: &DeploymentNumber) -> DeploymentNumber {
        let mut out = self.clone();
        out.merge(another);
        out
    }

    /// The number of instances required for the given fingerprint, 0 if unknown.
    pub fn get(&self, fingerprint: &Fingerprint) -> u32 {
        self.0.get(fingerprint).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all fingerprints & their counts, in fingerprint order.
    pub fn iter(&self) -> Iter<'_, Fingerprint, u32> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a DeploymentNumber {
    type Item = (&'a Fingerprint, &'a u32);
    type IntoIter = Iter<'a, Fingerprint, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<F: Into<Fingerprint>> FromIterator<(F, u32)> for DeploymentNumber {
    fn from_iter<I: IntoIterator<Item = (F, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, val)| (key.into(), val)).collect())
    }
}
