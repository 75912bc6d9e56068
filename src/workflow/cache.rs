//! On-disk cache of workflow definitions

use std::path::PathBuf;

use crate::client::{Client, Transport};
use crate::error::{require, Result};
use crate::files::TempFile;

/// Where a workflow definition is cached
#[derive(Debug, Clone, Default)]
pub struct WorkflowCacheOptions {
    /// Defaults to `temp/cacheWorkflowJson`
    pub save_dir: Option<PathBuf>,
    /// Defaults to `workflow_<id>.json`; `.json` is appended when missing
    pub file_name: Option<String>,
}

impl WorkflowCacheOptions {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: Some(dir.into()),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Cache file path for `workflow_id`
    pub fn path_for(&self, workflow_id: &str) -> PathBuf {
        let dir = self
            .save_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("temp").join("cacheWorkflowJson"));
        let mut name = self
            .file_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("workflow_{}.json", workflow_id));
        if !name.ends_with(".json") {
            name.push_str(".json");
        }
        dir.join(name)
    }
}

impl<T: Transport> Client<T> {
    /// Writes the workflow's node graph to disk unless already cached.
    ///
    /// Returns the cache file path. An existing file is never refreshed.
    pub async fn download_workflow_json(
        &self,
        workflow_id: &str,
        options: &WorkflowCacheOptions,
    ) -> Result<PathBuf> {
        require("workflow_id", workflow_id)?;
        let path = options.path_for(workflow_id);
        if tokio::fs::try_exists(&path).await? {
            log::info!("{} already exists, skipping download", path.display());
            return Ok(path);
        }

        let graph = self.workflow_json(workflow_id).await?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // the cache file only ever appears complete
        let partial = path.with_extension("json.part");
        let guard = TempFile::new(partial.clone());
        tokio::fs::write(&partial, serde_json::to_vec_pretty(&graph)?).await?;
        tokio::fs::rename(&partial, &path).await?;
        guard.keep();
        log::info!("cached workflow {} at {}", workflow_id, path.display());
        Ok(path)
    }
}
