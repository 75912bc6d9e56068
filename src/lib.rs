//! # RunningHub Rust SDK
//!
//! This crate provides an async Rust client for the RunningHub open API,
//! a hosted service that runs ComfyUI workflows.
//!
//! ## Features
//!
//! - **Tasks**: Create, poll, fetch outputs of and cancel workflow tasks
//! - **Polling**: Status check followed by fixed-interval result retries
//! - **Errors**: Readable classification of the service's error codes
//! - **Workflows**: Fetch, cache and inspect workflow node graphs
//! - **Uploads**: Upload local files or remote URLs as task inputs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use runninghub_rust_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(ClientConfig::from_env()?)?;
//!
//!     let task = client
//!         .create_task(CreateTaskRequest::new(
//!             "1904136902449209346",
//!             vec![NodeInfo::new("6", "text", "a lighthouse at dusk")],
//!         ))
//!         .await?;
//!
//!     let result = client
//!         .wait_for_result(&task.task_id, PollOptions::default(), std::time::Duration::from_secs(600))
//!         .await?;
//!     for output in result.outputs() {
//!         println!("{}", output.file_url);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod client;
pub mod error;
pub mod files;
pub mod types;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, SdkError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::classify::{classify, classify_with, ErrorInfo};
    pub use crate::client::{is_terminal_status, Client, ClientConfig, PollOptions, StatusAndResult};
    pub use crate::error::{Result, SdkError};
    pub use crate::types::{
        CreateTaskRequest, CreateTaskResponse, FailedReason, NodeInfo, TaskOutput, TaskResult,
    };
    pub use crate::workflow::{ImageSource, PictureInputKind, PictureInputNode, WorkflowCacheOptions};
    pub use serde_json::{json, Value};
}
