use std::collections::btree_map::{BTreeMap, Iter};

/// Maps a config section name to its raw content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigSections(BTreeMap<String, String>);

impl ConfigSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the given section, replacing any earlier content.
    pub fn put(&mut self, section: impl Into<String>, content: impl Into<String>) {
        self.0.insert(section.into(), content.into());
    }

    pub fn get(&self, section: &str) -> Option<&str> {
        self.0.get(section).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all sections in name order.
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<'a> Extend<(&'a String, &'a String)> for ConfigSections {
    fn extend<I: IntoIterator<Item = (&'a String, &'a String)>>(&mut self, iter: I) {
        for (section, content) in iter {
            self.put(section.clone(), content.clone());
        }
    }
}
