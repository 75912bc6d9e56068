//! Prints the balance of the account behind `RUNNINGHUB_API_KEY`

use runninghub_rust_sdk::client::{Client, ClientConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let client = Client::new(ClientConfig::from_env()?)?;
    let account = client.account_status().await?;

    println!("Remaining coins:   {}", account.remain_coins);
    println!("Remaining money:   {} {}", account.remain_money, account.currency);
    println!("Running tasks:     {}", account.current_task_counts);
    println!("API type:          {}", account.api_type);

    Ok(())
}
