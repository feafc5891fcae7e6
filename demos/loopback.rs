//! In-process relay demo
//!
//! Run with: cargo run --example loopback [VIEWERS]
//!
//! Starts one publisher emitting a chunk every 20ms under the name "demo",
//! attaches VIEWERS subscribers (default 3), one of which reads slowly and
//! gets dropped once its sink fills up. Prints statistics while running.
//!
//! Set RUST_LOG=debug to see attach/detach events.

use std::time::Duration;

use bytes::Bytes;
use stream_relay::{
    Authenticator, RelayConfig, RelaySummary, StaticAuth, StreamId, StreamRegistry,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let viewers: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);

    let registry = StreamRegistry::with_config(RelayConfig::default().buffer_size(8));
    let auth = StaticAuth::AllowAll;

    let publish_id: StreamId = "publish/demo/secret".parse()?;
    if !auth.authenticate(&publish_id).await {
        return Err("publish denied".into());
    }
    let publisher = registry.publish(publish_id.name()).await?;

    let mut tasks = Vec::new();
    for n in 0..viewers {
        let play_id: StreamId = "play/demo".parse()?;
        if !auth.authenticate(&play_id).await {
            continue;
        }

        let (mut subscriber, _unsubscribe) = registry.subscribe(play_id.name()).await?;
        // The last viewer is deliberately slow
        let delay = if n + 1 == viewers {
            Duration::from_millis(200)
        } else {
            Duration::ZERO
        };

        tasks.push(tokio::spawn(async move {
            let mut received = 0usize;
            while let Some(_chunk) = subscriber.recv().await {
                received += 1;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            println!("viewer {n}: stream ended after {received} chunks");
        }));
    }

    for i in 0u32..100 {
        publisher.send(Bytes::from(format!("chunk {i}"))).await?;
        tokio::time::sleep(Duration::from_millis(20)).await;

        if i % 25 == 0 {
            let stats = registry.get_statistics().await;
            let summary = RelaySummary::from_statistics(&stats);
            println!("{}", serde_json::to_string(&stats)?);
            println!("streams={} clients={}", summary.streams, summary.clients);
        }
    }

    publisher.close();

    for task in tasks {
        task.await?;
    }

    Ok(())
}
