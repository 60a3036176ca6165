use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ObjectMeta;

/// Claim for the per-task shared volume the staging phases exchange files through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PvcSpec {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: PvcBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PvcBody {
    pub access_modes: Vec<String>,
    pub resources: PvcResources,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PvcResources {
    pub requests: BTreeMap<String, String>,
}

impl PvcSpec {
    /// `ReadWriteMany` claim named `name` requesting `storage` (e.g. `"1Gi"`).
    pub fn shared(name: impl Into<String>, storage: impl Into<String>) -> Self {
        let mut requests = BTreeMap::new();
        requests.insert("storage".to_string(), storage.into());
        Self {
            api_version: "v1".to_string(),
            kind: "PersistentVolumeClaim".to_string(),
            metadata: ObjectMeta::named(name),
            spec: PvcBody {
                access_modes: vec!["ReadWriteMany".to_string()],
                resources: PvcResources { requests },
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Requested storage size.
    pub fn storage(&self) -> Option<&str> {
        self.spec.resources.requests.get("storage").map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_claim_manifest_shape() {
        let pvc = PvcSpec::shared("pvc-t1", "2Gi");
        let json = serde_json::to_value(&pvc).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "apiVersion": "v1",
                "kind": "PersistentVolumeClaim",
                "metadata": {"name": "pvc-t1"},
                "spec": {
                    "accessModes": ["ReadWriteMany"],
                    "resources": {"requests": {"storage": "2Gi"}}
                }
            })
        );
        assert_eq!(pvc.storage(), Some("2Gi"));
    }
}
