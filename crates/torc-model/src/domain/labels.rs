use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{LABEL_NAME, LABEL_PARENT, LABEL_SERVICE, PhaseId};

/// Job metadata labels, kept sorted so manifests are reproducible.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(pub BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Role, parent and name labels identifying the job of `phase`.
    pub fn for_phase(phase: &PhaseId) -> Self {
        let mut labels = Self::new();
        labels
            .insert(LABEL_SERVICE, phase.role().prefix())
            .insert(LABEL_PARENT, phase.parent())
            .insert(LABEL_NAME, phase.job_name());
        labels
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert or overwrite a label. Returns `self` for chaining.
    pub fn insert<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), val.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
