//! # faultline
//!
//! **Faultline** is a non-blocking error- and event-capture client core.
//!
//! It turns raw signals (log messages, errors, recovered panics) into
//! structured, enriched events and delivers them to a remote collector
//! without ever blocking or crashing the host program. The crate is the
//! runtime core of such a client: the capture hub, the scoped context
//! stack, the event pipeline, and the asynchronous delivery transport.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  caller ──► Hub (per logical context)
//!               │  frame stack: (Scope, Client) pairs, top = active
//!               │    Scope: breadcrumbs / tags / extras / user / level
//!               │    clone-on-push, pop discards
//!               ▼
//!             Client (immutable once built)
//!               ├─ processor pipeline (ordered, first drop wins)
//!               ├─ scope merge (innermost values win)
//!               ├─ sampling (probabilistic keep/drop)
//!               └─ EventId + timestamp assignment
//!               ▼
//!             Transport (AsyncTransport)
//!               ├─ bounded PendingQueue (OverflowPolicy on full)
//!               ├─ one worker task ──► Sender::send() ──► collector
//!               │     retries transient failures (BackoffPolicy, bounded)
//!               └─ flush(timeout) / close(): the only waiting operations
//! ```
//!
//! ### Capture lifecycle
//! ```text
//! capture_message / capture_exception / capture_event / recover
//!   │
//!   ├─► no client bound      ─► None (silent no-op)
//!   ├─► processor drop/panic ─► None
//!   ├─► sampled out          ─► None
//!   ├─► queue full           ─► None (or evict oldest, per policy)
//!   └─► admitted             ─► Some(EventId), delivery is async best-effort
//! ```
//!
//! ## Rules
//! - **Capture never raises.** Instrumenting a program must never be
//!   riskier than not instrumenting it: past client construction, every
//!   failure is a silent drop.
//! - **Capture never blocks.** `enqueue` is bounded-drop instead of
//!   backpressure; `flush`/`close` are the only suspension points.
//! - **One hub per unit of work.** A hub serializes its own state, but
//!   the intended concurrent pattern is a derived hub per request/task
//!   ([`Hub::new_from_top`]); clients and transports are safely shared.
//!
//! ## Features
//! | Area          | Description                                                | Key types / traits                  |
//! |---------------|------------------------------------------------------------|-------------------------------------|
//! | **Capture**   | Route messages, errors, and recovered panics to events.    | [`Hub`], [`capture_message`]        |
//! | **Context**   | Scoped breadcrumbs/tags/extras merged into every event.    | [`Scope`], [`Breadcrumb`]           |
//! | **Pipeline**  | Ordered mutate-or-drop hooks plus sampling.                | [`EventProcessor`], [`ProcessorFn`] |
//! | **Delivery**  | Bounded async queue, bounded retries, drain-or-deadline.   | [`Transport`], [`Sender`]           |
//! | **Policies**  | Retry backoff, jitter, queue overflow behavior.            | [`BackoffPolicy`], [`OverflowPolicy`] |
//! | **Errors**    | Config failures vs. internal delivery failures.            | [`ConfigError`], [`DeliveryError`]  |
//!
//! ## Optional features
//! - `http`: JSON-over-HTTP delivery backend (`HttpSender`, via reqwest).
//! - `test`: exports the `testing` module with a capturing `TestSender`.
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use faultline::{Breadcrumb, ClientOptions, Level};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), faultline::ConfigError> {
//!     faultline::init(
//!         ClientOptions::new("https://key@collector.example.com/42")
//!             .with_max_breadcrumbs(50),
//!     )?;
//!
//!     faultline::configure_scope(|scope| scope.set_tag("env", "prod"));
//!     faultline::add_breadcrumb(Breadcrumb::new("connected to database"));
//!
//!     if let Err(err) = std::fs::read_to_string("/etc/service.conf") {
//!         faultline::capture_exception(&err);
//!     }
//!
//!     faultline::capture_message("service started", Level::Info);
//!     faultline::flush(Duration::from_secs(2)).await;
//!     Ok(())
//! }
//! ```

mod api;
mod client;
mod config;
mod dsn;
mod error;
mod hub;
mod policies;
mod processors;
mod scope;
mod transport;

/// Wire-facing data model (events, breadcrumbs, hints).
pub mod protocol;

// Test support: compiled for the crate's own tests, exported behind the
// `test` feature for downstream consumers.
#[cfg(any(test, feature = "test"))]
pub mod testing;

// ---- Public re-exports ----

pub use api::{
    add_breadcrumb, capture_event, capture_exception, capture_message, configure_scope, flush,
    init, last_event_id, pop_scope, push_scope, recover, recover_with_context, with_scope,
};
pub use client::Client;
pub use config::{ClientOptions, DEFAULT_MAX_BREADCRUMBS};
pub use dsn::Dsn;
pub use error::{ConfigError, DeliveryError};
pub use hub::{Context, Hub};
pub use policies::{BackoffPolicy, JitterPolicy, OverflowPolicy};
pub use processors::{EventProcessor, ProcessorFn};
pub use protocol::{Breadcrumb, Event, EventHint, EventId, Exception, Level, User};
pub use scope::Scope;
pub use transport::{
    AsyncTransport, DeliveryParams, DiscardSender, Envelope, HintMeta, PayloadKind, Sender,
    Transport,
};

// Optional: JSON-over-HTTP delivery backend.
// Enable with: `--features http`
#[cfg(feature = "http")]
pub use transport::HttpSender;
