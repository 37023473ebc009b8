//! Scope stacking and per-task hubs.
//!
//! Shows the two context patterns: temporary scopes on one hub
//! (`with_scope`), and an independent derived hub per concurrent task
//! (`Hub::new_from_top`), sharing the same client.

use std::sync::Arc;
use std::time::Duration;

use faultline::{ClientOptions, Hub, Level};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), faultline::ConfigError> {
    faultline::init(ClientOptions::new(
        "https://publickey@collector.example.com/42",
    ))?;

    // Temporary scope: the tag exists only inside the callback.
    faultline::with_scope(
        |scope| scope.set_tag("section", "checkout"),
        || {
            faultline::capture_message("payment declined", Level::Warning);
        },
    );
    faultline::capture_message("outside the scope again", Level::Info);

    // One hub per task: scope mutations stay isolated per request.
    let mut workers = Vec::new();
    for request_id in 0..3 {
        let hub = Arc::new(Hub::new_from_top(&Hub::current()));
        workers.push(tokio::spawn(async move {
            hub.configure_scope(|scope| scope.set_tag("request", request_id.to_string()));
            hub.capture_message("request handled", Level::Info);
        }));
    }
    for worker in workers {
        let _ = worker.await;
    }

    faultline::flush(Duration::from_secs(2)).await;
    Ok(())
}
