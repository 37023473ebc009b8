//! Panic recovery: convert a caught panic into a fatal event.
//!
//! The capture side never re-raises; this demo swallows the panic after
//! reporting it, which is the worker-pool pattern (log the fault, keep
//! the process alive).

use std::time::Duration;

use faultline::{ClientOptions, Context, Hub};

fn risky_division(denominator: i32) -> i32 {
    if denominator == 0 {
        panic!("division by zero requested");
    }
    100 / denominator
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), faultline::ConfigError> {
    faultline::init(ClientOptions::new(
        "https://publickey@collector.example.com/42",
    ))?;

    // Plain recovery through the process-wide hub.
    if let Err(payload) = std::panic::catch_unwind(|| risky_division(0)) {
        let id = faultline::recover(payload.as_ref());
        println!("recovered panic captured as: {:?}", id.map(|id| id.to_string()));
    }

    // Context-aware recovery: the request's own hub wins over the
    // process-wide one.
    let request_hub = std::sync::Arc::new(Hub::new_from_top(&Hub::current()));
    request_hub.configure_scope(|scope| scope.set_tag("request", "7031"));
    let ctx = Context::new().with_hub(request_hub.clone());

    if let Err(payload) = std::panic::catch_unwind(|| risky_division(0)) {
        faultline::recover_with_context(&ctx, payload.as_ref());
        println!(
            "request hub saw the event: {:?}",
            request_hub.last_event_id().map(|id| id.to_string())
        );
    }

    faultline::flush(Duration::from_secs(2)).await;
    Ok(())
}
