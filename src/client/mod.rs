//! RunningHub open API client

mod client;
mod config;
mod poll;
mod transport;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_HOST, DEFAULT_TIMEOUT};
pub use poll::{PollOptions, StatusAndResult};
pub use transport::{HttpTransport, Transport};

/// Endpoint paths
pub const ACCOUNT_STATUS_PATH: &str = "/uc/openapi/accountStatus";
pub const CREATE_TASK_PATH: &str = "/task/openapi/create";
pub const TASK_STATUS_PATH: &str = "/task/openapi/status";
pub const TASK_OUTPUTS_PATH: &str = "/task/openapi/outputs";
pub const CANCEL_TASK_PATH: &str = "/task/openapi/cancel";
pub const WORKFLOW_JSON_PATH: &str = "/api/openapi/getJsonApiFormat";
pub const UPLOAD_PATH: &str = "/task/openapi/upload";

/// Task status constants
pub const TASK_STATUS_SUCCESS: &str = "SUCCESS";
pub const TASK_STATUS_FAILED: &str = "FAILED";
pub const TASK_STATUS_RUNNING: &str = "RUNNING";
pub const TASK_STATUS_QUEUED: &str = "QUEUED";

/// Returns `true` once a task will not change status any more.
pub fn is_terminal_status(status: &str) -> bool {
    matches!(status, TASK_STATUS_SUCCESS | TASK_STATUS_FAILED)
}
