//! Wire models for the RunningHub open API

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{Result, SdkError};

/// Uniform response envelope returned by every endpoint
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default, rename = "errorMessages")]
    pub error_messages: Option<Value>,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Checks the application code and decodes `data` into the
    /// endpoint-specific shape.
    pub fn into_data<T: DeserializeOwned>(self, operation: &'static str) -> Result<T> {
        if !self.is_success() {
            return Err(SdkError::Api {
                operation,
                code: self.code,
                msg: self.msg,
            });
        }
        Ok(serde_json::from_value(self.data)?)
    }

    /// Like [`Envelope::into_data`] for endpoints whose success payload is ignored.
    pub fn ensure_success(self, operation: &'static str) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(SdkError::Api {
                operation,
                code: self.code,
                msg: self.msg,
            })
        }
    }
}

/// Account information returned by the account status endpoint
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountStatus {
    pub remain_coins: String,
    pub current_task_counts: String,
    pub remain_money: String,
    pub currency: String,
    pub api_type: String,
}

/// A single node field override sent with a task
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub node_id: String,
    pub field_name: String,
    pub field_value: String,
}

impl NodeInfo {
    pub fn new(
        node_id: impl Into<String>,
        field_name: impl Into<String>,
        field_value: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            field_name: field_name.into(),
            field_value: field_value.into(),
        }
    }
}

/// Task creation request
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub workflow_id: String,
    pub node_info_list: Vec<NodeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl CreateTaskRequest {
    pub fn new(workflow_id: impl Into<String>, node_info_list: Vec<NodeInfo>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            node_info_list,
            webhook_url: None,
        }
    }

    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }
}

/// Task creation response
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskResponse {
    pub net_wss_url: String,
    pub task_id: String,
    pub task_status: String,
    pub client_id: String,
    pub prompt_tips: String,
}

/// One output artifact of a successful task
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskOutput {
    pub file_url: String,
    pub file_type: String,
    pub task_cost_time: String,
    pub node_id: String,
    pub third_party_consume_money: Option<String>,
    pub consume_money: String,
    pub consume_coins: Option<String>,
}

/// Exception details reported for a failed task
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FailedReason {
    pub current_outputs: Value,
    pub exception_type: String,
    pub current_inputs: Value,
    pub traceback: String,
    pub node_id: String,
    pub exception_message: String,
    /// Raw `data` payload of the response, kept verbatim.
    #[serde(skip_deserializing)]
    pub original_info: String,
}

impl FailedReason {
    /// Builds the failure detail from a raw failure payload.
    ///
    /// `original_info` is populated even when the structured fields
    /// cannot be decoded.
    pub fn from_payload(data: &Value) -> Self {
        let original_info = match data {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let parsed = data
            .get("failedReason")
            .filter(|v| !v.is_null())
            .map(|v| serde_json::from_value::<FailedReason>(v.clone()));
        let mut reason = match parsed {
            Some(Ok(reason)) => reason,
            Some(Err(e)) => {
                log::warn!("failed to decode failedReason, keeping raw payload: {}", e);
                FailedReason::default()
            }
            None => FailedReason::default(),
        };
        reason.original_info = original_info;
        reason
    }
}

/// Application-level failure of a task result query
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFailure {
    pub code: i64,
    pub msg: String,
    pub reason: FailedReason,
}

impl TaskFailure {
    /// Classifies this failure against the known code table.
    pub fn error_info(&self) -> crate::classify::ErrorInfo {
        crate::classify::classify_with(self.code, String::new(), self.msg.clone(), Some(&self.reason))
    }
}

/// Outcome of the task outputs endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum TaskResult {
    Success(Vec<TaskOutput>),
    Failed(TaskFailure),
}

impl TaskResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success(_))
    }

    pub fn outputs(&self) -> &[TaskOutput] {
        match self {
            TaskResult::Success(outputs) => outputs,
            TaskResult::Failed(_) => &[],
        }
    }

    pub fn failure(&self) -> Option<&TaskFailure> {
        match self {
            TaskResult::Success(_) => None,
            TaskResult::Failed(failure) => Some(failure),
        }
    }
}

/// Response of the upload endpoint
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadResponse {
    pub file_name: String,
    pub file_type: String,
}

/// A node of a workflow in API format
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct WorkflowNode {
    #[serde(default)]
    pub class_type: String,
    #[serde(default)]
    pub inputs: Map<String, Value>,
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Workflow graph keyed by node id
pub type WorkflowGraph = BTreeMap<String, WorkflowNode>;
