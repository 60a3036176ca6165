use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{TaskId, TesState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TesFileType {
    #[default]
    File,
    Directory,
}

/// File staged into the task volume before execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TesInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Source location; absent when `content` is inlined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Destination path inside the executor container.
    pub path: String,
    #[serde(default, rename = "type")]
    pub file_type: TesFileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streamable: Option<bool>,
}

/// File uploaded from the task volume after execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TesOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,
    #[serde(default, rename = "type")]
    pub file_type: TesFileType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TesExecutor {
    pub image: String,
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_error: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TesResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_cores: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preemptible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_parameters: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_parameters_strict: Option<bool>,
}

/// Full task document: inputs, outputs, executors and resources.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TesTask {
    /// Assigned by the API before the orchestrator runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TesState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<TesInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<TesOutput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<TesResources>,
    pub executors: Vec<TesExecutor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
}

impl TesTask {
    /// Validated task id; `None` when unset or blank.
    pub fn task_id(&self) -> Option<TaskId> {
        self.id.as_deref().and_then(|id| TaskId::new(id).ok())
    }

    /// Requested scratch disk in GB, if any.
    pub fn disk_gb(&self) -> Option<f64> {
        self.resources.as_ref().and_then(|r| r.disk_gb)
    }

    pub fn inputs(&self) -> &[TesInput] {
        self.inputs.as_deref().unwrap_or_default()
    }

    pub fn outputs(&self) -> &[TesOutput] {
        self.outputs.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK: &str = r#"{
        "id": "task-1",
        "name": "md5",
        "inputs": [{"url": "s3://bucket/in.txt", "path": "/data/in.txt", "type": "FILE"}],
        "outputs": [{"url": "s3://bucket/out", "path": "/data/out", "type": "DIRECTORY"}],
        "resources": {"cpu_cores": 2, "disk_gb": 5.0},
        "executors": [{"image": "alpine", "command": ["md5sum", "/data/in.txt"], "stdout": "/data/out/md5"}]
    }"#;

    #[test]
    fn parses_task_document() {
        let task: TesTask = serde_json::from_str(TASK).unwrap();

        assert_eq!(task.task_id().unwrap().as_str(), "task-1");
        assert_eq!(task.disk_gb(), Some(5.0));
        assert_eq!(task.inputs().len(), 1);
        assert_eq!(task.outputs()[0].file_type, TesFileType::Directory);
        assert_eq!(task.executors[0].command, ["md5sum", "/data/in.txt"]);
    }

    #[test]
    fn blank_or_missing_id_is_none() {
        let mut task: TesTask = serde_json::from_str(TASK).unwrap();
        task.id = Some("  ".into());
        assert!(task.task_id().is_none());
        task.id = None;
        assert!(task.task_id().is_none());
    }

    #[test]
    fn missing_collections_read_as_empty() {
        let task = TesTask::default();
        assert!(task.inputs().is_empty());
        assert!(task.outputs().is_empty());
        assert!(task.disk_gb().is_none());
    }
}
