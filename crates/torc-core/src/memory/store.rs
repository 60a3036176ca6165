use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use torc_model::{TaskId, TesState};

use crate::ports::{StoreError, TaskStore};

/// One successful mutation of the task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    AppendSystemLogs { task: String, logs: Vec<String> },
    SetLogEndTime { task: String, at: OffsetDateTime },
    UpdateState { task: String, state: TesState },
    AddTaskLog { task: String },
}

#[derive(Debug, Default)]
struct StoreState {
    ops: Vec<StoreOp>,
    states: HashMap<String, TesState>,
    failure: Option<StoreError>,
}

/// Task store that records mutations in call order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every following call with `err`; failed calls are not recorded.
    pub fn fail_with(&self, err: StoreError) {
        self.lock().failure = Some(err);
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.lock().ops.clone()
    }

    /// Latest state written for `task`.
    pub fn state(&self, task: &str) -> Option<TesState> {
        self.lock().states.get(task).copied()
    }

    /// Every system log line appended for `task`.
    pub fn system_logs(&self, task: &str) -> Vec<String> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                StoreOp::AppendSystemLogs { task: t, logs } if t == task => Some(logs.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, op: StoreOp) -> Result<(), StoreError> {
        let mut state = self.lock();
        if let Some(err) = &state.failure {
            return Err(err.clone());
        }
        if let StoreOp::UpdateState { task, state: s } = &op {
            state.states.insert(task.clone(), *s);
        }
        state.ops.push(op);
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn append_system_logs(&self, task: &TaskId, logs: &[String]) -> Result<(), StoreError> {
        self.apply(StoreOp::AppendSystemLogs {
            task: task.to_string(),
            logs: logs.to_vec(),
        })
    }

    async fn set_log_end_time(&self, task: &TaskId) -> Result<(), StoreError> {
        self.apply(StoreOp::SetLogEndTime {
            task: task.to_string(),
            at: OffsetDateTime::now_utc(),
        })
    }

    async fn update_task_state(&self, task: &TaskId, state: TesState) -> Result<(), StoreError> {
        self.apply(StoreOp::UpdateState {
            task: task.to_string(),
            state,
        })
    }

    async fn add_task_log(&self, task: &TaskId) -> Result<(), StoreError> {
        self.apply(StoreOp::AddTaskLog {
            task: task.to_string(),
        })
    }
}
