use std::collections::btree_map::{BTreeMap, Iter};

use k8s_openapi::api::core::v1::{Container, PersistentVolumeClaim, Volume};

use crate::crd::{ChiPodTemplate, ChiTemplates, ChiVolumeClaimTemplate};
use crate::error::ChiError;

/// A resolved pod template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PodTemplatesIndexData {
    pub containers: Vec<Container>,
    pub volumes: Vec<Volume>,
}

impl From<&ChiPodTemplate> for PodTemplatesIndexData {
    fn from(template: &ChiPodTemplate) -> Self {
        Self {
            containers: template.containers.clone(),
            volumes: template.volumes.clone(),
        }
    }
}

/// A resolved volume claim template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VolumeClaimTemplatesIndexData {
    /// Whether a default name was substituted for the claim, in which case the generated
    /// claim follows the name of its owning workload.
    pub use_default_name: bool,
    pub persistent_volume_claim: PersistentVolumeClaim,
}

impl VolumeClaimTemplatesIndexData {
    /// Resolve the given template, assigning `default_name` to an unnamed claim.
    pub fn resolve(template: &ChiVolumeClaimTemplate, default_name: &str) -> Self {
        let mut persistent_volume_claim = template.persistent_volume_claim.clone();
        let use_default_name = persistent_volume_claim.metadata.name.as_deref().unwrap_or_default().is_empty();
        if use_default_name {
            persistent_volume_claim.metadata.name = Some(default_name.to_string());
        }
        Self {
            use_default_name,
            persistent_volume_claim,
        }
    }
}

/// Maps a template name to its resolved content.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateIndex<T> {
    kind: &'static str,
    templates: BTreeMap<String, T>,
}

/// Index of pod templates, keyed by `.spec.templates.podTemplates[].name`.
pub type PodTemplatesIndex = TemplateIndex<PodTemplatesIndexData>;
/// Index of volume claim templates, keyed by `.spec.templates.volumeClaimTemplates[].name`.
pub type VolumeClaimTemplatesIndex = TemplateIndex<VolumeClaimTemplatesIndexData>;

impl<T> TemplateIndex<T> {
    /// Create an empty index, `kind` naming the template kind in errors.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            templates: BTreeMap::new(),
        }
    }

    /// Insert the given template, replacing any earlier one of the same name.
    pub fn put(&mut self, name: impl Into<String>, template: T) {
        self.templates.insert(name.into(), template);
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.templates.get(name)
    }

    /// Get the given template, failing with `NotFound` if it is not indexed.
    pub fn require(&self, name: &str) -> Result<&T, ChiError> {
        self.get(name).ok_or_else(|| ChiError::not_found(self.kind, name))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, T> {
        self.templates.iter()
    }
}

impl PodTemplatesIndex {
    /// Index all pod templates of the given spec, later definitions taking precedence.
    pub fn from_templates(templates: &ChiTemplates) -> Self {
        let mut index = Self::new("pod template");
        for template in templates.pod_templates.iter() {
            index.put(template.name.clone(), template.into());
        }
        index
    }
}

impl VolumeClaimTemplatesIndex {
    /// Index all volume claim templates of the given spec, later definitions taking precedence.
    pub fn from_templates(templates: &ChiTemplates, default_name: &str) -> Self {
        let mut index = Self::new("volume claim template");
        for template in templates.volume_claim_templates.iter() {
            index.put(template.name.clone(), VolumeClaimTemplatesIndexData::resolve(template, default_name));
        }
        index
    }
}
