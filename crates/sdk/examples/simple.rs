//! Simple SDK Example
//!
//! Walks through the queue operations against a running daemon.
//!
//! # Usage
//!
//! ```bash
//! HELLANZB_RPC_URL=http://127.0.0.1:8760 cargo run -p hella-sdk --example simple
//! ```

use hella_sdk::HellanzbClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("hellanzb SDK - Simple Example");
    println!("=============================\n");

    // 1. Configure client from HELLANZB_RPC_* variables
    let client = HellanzbClient::from_env()?;

    // 2. Enqueue by URL
    println!("1. Enqueuing from URL...");
    let id = client
        .enqueue_from_url("http://v3.newzbin.com/browse/post/3378129/")
        .await?;
    println!("   ✓ Enqueued {}\n", id);

    // 3. Show the queue
    println!("2. Current queue:");
    for item in client.list_queue().await? {
        println!(
            "   {:>3}. [{}] {} ({:.1} MB)",
            item.position,
            item.state,
            item.name,
            item.size_mb()
        );
    }
    println!();

    // 4. Throttle, then look at the status
    println!("3. Capping bandwidth at 100 KB/s...");
    client.set_max_rate(100).await?;
    let status = client.status().await?;
    println!(
        "   ✓ max {} KB/s, current {:.1} KB/s, {} queued\n",
        status.max_rate_kbps, status.current_rate_kbps, status.queue_length
    );

    // 5. Remove what we added
    println!("4. Dequeuing {}...", id);
    client.dequeue(&id).await?;
    println!("   ✓ Done");

    Ok(())
}
