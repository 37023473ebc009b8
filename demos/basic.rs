//! Minimal end-to-end walkthrough: init, breadcrumbs, capture, flush.
//!
//! Without the `http` feature envelopes go through the full pipeline and
//! are discarded at the wire seam; run with `RUST_LOG=faultline=debug` to
//! watch them move.

use std::time::Duration;

use faultline::{Breadcrumb, ClientOptions, Level};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), faultline::ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    faultline::init(
        ClientOptions::new("https://publickey@collector.example.com/42")
            .with_max_breadcrumbs(25),
    )?;

    faultline::configure_scope(|scope| {
        scope.set_tag("env", "demo");
        scope.set_extra("pid", serde_json::json!(std::process::id()));
    });

    faultline::add_breadcrumb(Breadcrumb::new("loaded configuration").with_category("startup"));
    faultline::add_breadcrumb(Breadcrumb::new("opened listener").with_category("startup"));

    let id = faultline::capture_message("service started", Level::Info);
    println!("captured event: {:?}", id.map(|id| id.to_string()));

    if let Err(err) = std::fs::read_to_string("/nonexistent/service.conf") {
        let id = faultline::capture_exception(&err);
        println!("captured exception: {:?}", id.map(|id| id.to_string()));
    }

    let drained = faultline::flush(Duration::from_secs(2)).await;
    println!("flushed before exit: {drained}");
    Ok(())
}
