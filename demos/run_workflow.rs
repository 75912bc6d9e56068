//! Runs a workflow with one image and a prompt, then prints its outputs
//!
//! Usage: `cargo run --example run_workflow -- <workflow-id> <image-path-or-url> [prompt-node-id] [prompt]`

use anyhow::{bail, Context};
use runninghub_rust_sdk::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let workflow_id = args.next().context("missing workflow id")?;
    let image = args.next().context("missing image path or url")?;
    let prompt = match (args.next(), args.next()) {
        (Some(node_id), Some(text)) => Some(NodeInfo::new(node_id, "text", text)),
        _ => None,
    };

    let client = Client::new(ClientConfig::from_env()?)?;

    println!("=== Preparing inputs ===");
    let source = if image.starts_with("http://") || image.starts_with("https://") {
        ImageSource::Url(image)
    } else {
        ImageSource::Path(image.into())
    };
    let picture_nodes = client.picture_input_nodes(&workflow_id).await?;
    let Some(picture_node) = picture_nodes.first() else {
        bail!("workflow {} has no picture input", workflow_id);
    };
    let mut inputs = vec![client.prepare_picture_input(picture_node, &source).await?];
    inputs.extend(prompt);
    for input in &inputs {
        println!("   node {} <- {}", input.node_id, input.field_name);
    }

    println!("\n=== Creating task ===");
    let task = match client.create_task(CreateTaskRequest::new(&workflow_id, inputs)).await {
        Ok(task) => task,
        Err(e) => {
            if let Some(info) = e.error_info() {
                eprintln!("   {} ({}): {}", info.sign, info.code, info.msg);
            }
            return Err(e.into());
        }
    };
    println!("   Task {} is {}", task.task_id, task.task_status);

    println!("\n=== Waiting for result ===");
    let options = PollOptions::new(5, Duration::from_secs(5));
    match client.wait_for_result(&task.task_id, options, Duration::from_secs(900)).await? {
        TaskResult::Success(outputs) => {
            for output in outputs {
                println!("   [{}] {} ({}s)", output.file_type, output.file_url, output.task_cost_time);
            }
        }
        TaskResult::Failed(failure) => {
            let info = failure.error_info();
            eprintln!("   Task failed: {} / {} (sub code {})", info.sign, info.msg, info.sub_code);
            if !failure.reason.node_id.is_empty() {
                eprintln!("   Failing node: {}", failure.reason.node_id);
            }
        }
    }

    Ok(())
}
