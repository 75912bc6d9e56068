//! Client implementation for the task, upload and workflow endpoints

use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::path::Path;

use super::config::ClientConfig;
use super::transport::{HttpTransport, Transport};
use super::{
    ACCOUNT_STATUS_PATH, CANCEL_TASK_PATH, CREATE_TASK_PATH, TASK_OUTPUTS_PATH,
    TASK_STATUS_PATH, UPLOAD_PATH, WORKFLOW_JSON_PATH,
};
use crate::error::{require, Result, SdkError};
use crate::files::{download_from_url, TempFile};
use crate::types::{
    AccountStatus, CreateTaskRequest, CreateTaskResponse, FailedReason, TaskFailure, TaskResult,
    TaskOutput, UploadResponse, WorkflowGraph,
};

/// RunningHub client
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct Client<T = HttpTransport> {
    transport: T,
    config: ClientConfig,
}

#[derive(Deserialize)]
struct WorkflowJsonData {
    prompt: String,
}

impl Client<HttpTransport> {
    /// Creates a new client over HTTP
    ///
    /// # Example
    ///
    /// ```rust
    /// use runninghub_rust_sdk::client::{Client, ClientConfig};
    ///
    /// let client = Client::new(ClientConfig::new("my-api-key")).unwrap();
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(SdkError::InvalidConfig("api key cannot be empty".to_string()));
        }
        let transport = HttpTransport::new(&config)?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn keyed(&self, field: &str, value: &str) -> Value {
        let mut body = Map::new();
        body.insert(field.to_string(), Value::String(value.to_string()));
        body.insert("apiKey".to_string(), Value::String(self.config.api_key.clone()));
        Value::Object(body)
    }

    /// Retrieves the balance and usage of the API account
    pub async fn account_status(&self) -> Result<AccountStatus> {
        // this endpoint spells the key field in lowercase
        let body = json!({ "apikey": self.config.api_key });
        self.transport
            .post_json(ACCOUNT_STATUS_PATH, body)
            .await?
            .into_data("GetAccountStatus")
    }

    /// Creates a task running `request.workflow_id` with the given node overrides
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use runninghub_rust_sdk::prelude::*;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(ClientConfig::new("my-api-key"))?;
    /// let request = CreateTaskRequest::new(
    ///     "1904136902449209346",
    ///     vec![NodeInfo::new("6", "text", "a cat in a hat")],
    /// );
    /// let task = client.create_task(request).await?;
    /// println!("Task ID: {}", task.task_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<CreateTaskResponse> {
        if request.workflow_id.is_empty() || request.node_info_list.is_empty() {
            return Err(SdkError::InvalidArgument(
                "workflow_id and node_info_list must not be empty".to_string(),
            ));
        }
        let mut body = serde_json::to_value(&request)?;
        body["apiKey"] = Value::String(self.config.api_key.clone());

        let response: CreateTaskResponse = self
            .transport
            .post_json(CREATE_TASK_PATH, body)
            .await?
            .into_data("CreateTask")?;
        log::info!("created task {} ({})", response.task_id, response.task_status);
        Ok(response)
    }

    /// Returns the raw status string reported for a task
    pub async fn task_status(&self, task_id: &str) -> Result<String> {
        require("task_id", task_id)?;
        self.transport
            .post_json(TASK_STATUS_PATH, self.keyed("taskId", task_id))
            .await?
            .into_data("GetTaskStatus")
    }

    /// Fetches the outputs of a task.
    ///
    /// A non-zero application code is not an error here: it comes back as
    /// [`TaskResult::Failed`] with the failure detail and the raw payload.
    pub async fn task_result(&self, task_id: &str) -> Result<TaskResult> {
        require("task_id", task_id)?;
        let envelope = self
            .transport
            .post_json(TASK_OUTPUTS_PATH, self.keyed("taskId", task_id))
            .await?;

        if envelope.is_success() {
            let outputs: Vec<TaskOutput> = if envelope.data.is_null() {
                Vec::new()
            } else {
                serde_json::from_value(envelope.data)?
            };
            return Ok(TaskResult::Success(outputs));
        }

        Ok(TaskResult::Failed(TaskFailure {
            code: envelope.code,
            reason: FailedReason::from_payload(&envelope.data),
            msg: envelope.msg,
        }))
    }

    /// Cancels a queued or running task
    pub async fn cancel_task(&self, task_id: &str) -> Result<()> {
        require("task_id", task_id)?;
        self.transport
            .post_json(CANCEL_TASK_PATH, self.keyed("taskId", task_id))
            .await?
            .ensure_success("CancelTask")?;
        log::info!("cancelled task {}", task_id);
        Ok(())
    }

    /// Fetches the API-format node graph of a workflow
    pub async fn workflow_json(&self, workflow_id: &str) -> Result<WorkflowGraph> {
        require("workflow_id", workflow_id)?;
        let data: WorkflowJsonData = self
            .transport
            .post_json(WORKFLOW_JSON_PATH, self.keyed("workflowId", workflow_id))
            .await?
            .into_data("GetWorkflowJSON")?;
        // the graph is delivered as a JSON document inside a string
        Ok(serde_json::from_str(&data.prompt)?)
    }

    /// Uploads a local file as a task input resource
    pub async fn upload_resource(&self, file_path: impl AsRef<Path>) -> Result<UploadResponse> {
        let file_path = file_path.as_ref();
        let is_file = tokio::fs::metadata(file_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(SdkError::InvalidArgument(format!(
                "{} does not point to a file",
                file_path.display()
            )));
        }

        let fields = vec![
            ("apiKey", self.config.api_key.clone()),
            ("fileType", "input".to_string()),
        ];
        let response: UploadResponse = self
            .transport
            .post_file(UPLOAD_PATH, fields, file_path)
            .await?
            .into_data("UploadResource")?;
        log::info!("uploaded {} as {}", file_path.display(), response.file_name);
        Ok(response)
    }

    /// Downloads `url` into the configured download directory and uploads it.
    ///
    /// The downloaded file is removed afterwards whether or not the upload succeeded.
    pub async fn upload_resource_from_url(&self, url: &str) -> Result<UploadResponse> {
        require("url", url)?;
        let local = TempFile::new(
            download_from_url(url, &self.config.download_dir, self.config.effective_timeout())
                .await?,
        );
        self.upload_resource(local.path()).await
    }
}
