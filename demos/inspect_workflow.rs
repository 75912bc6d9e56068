//! Caches a workflow definition and lists the picture inputs it consumes
//!
//! Usage: `cargo run --example inspect_workflow -- <workflow-id>`

use anyhow::Context;
use runninghub_rust_sdk::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let workflow_id = std::env::args()
        .nth(1)
        .context("usage: inspect_workflow <workflow-id>")?;
    let client = Client::new(ClientConfig::from_env()?)?;

    let path = client
        .download_workflow_json(&workflow_id, &WorkflowCacheOptions::default())
        .await?;
    println!("Workflow cached at {}", path.display());

    let nodes = client.picture_input_nodes(&workflow_id).await?;
    if nodes.is_empty() {
        println!("No picture inputs are consumed by this workflow");
    }
    for node in nodes {
        println!(
            "node {:>4}  {:<32} field {:<12} via {}",
            node.node_id, node.class_type, node.field_name, node.kind
        );
    }

    Ok(())
}
