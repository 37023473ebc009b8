//! # Client: turning raw capture requests into finished envelopes.
//!
//! A [`Client`] owns the immutable [`ClientOptions`], the ordered event
//! processor pipeline, and one [`Transport`]. It is created once, bound
//! into a hub frame, and never mutated (reconfiguration means building a
//! new client and re-binding it).
//!
//! ## Pipeline
//! ```text
//! capture_event(event, hint, scope)
//!   ├─► 1. finalize base event (stacktrace capture if configured)
//!   ├─► 2. processors, in registration order (first drop short-circuits;
//!   │      a panicking processor counts as a drop)
//!   ├─► 3. merge active scope (scope values win on collision)
//!   ├─► 4. sampling decision (drop is a non-error outcome)
//!   ├─► 5. assign EventId / timestamp if absent
//!   └─► 6. wrap in an Envelope, hand to the transport
//!              └─ full queue = soft failure: None, no error
//! ```
//!
//! Construction is the only hard-failure point: a malformed DSN or an
//! out-of-range sample rate fails [`Client::new`]; everything afterwards
//! degrades by dropping, never by raising.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;

use crate::config::ClientOptions;
use crate::dsn::Dsn;
use crate::error::ConfigError;
use crate::protocol::{Event, EventHint, EventId};
use crate::scope::Scope;
use crate::transport::{AsyncTransport, DeliveryParams, Envelope, Sender, Transport};

#[cfg(not(feature = "http"))]
use crate::transport::DiscardSender;
#[cfg(feature = "http")]
use crate::transport::HttpSender;

/// Owns configuration, the processor pipeline, and the transport.
///
/// Cheap to share: hub frames hold `Arc<Client>` references, and several
/// hubs may bind the same client concurrently. All mutable state lives in
/// the transport, which is designed for concurrent producers.
pub struct Client {
    options: ClientOptions,
    dsn: Dsn,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Builds a client with the default delivery backend.
    ///
    /// With the `http` cargo feature enabled this wires an HTTP sender
    /// against the DSN's store endpoint; without it envelopes are
    /// discarded after the pipeline (useful for instrumenting code before
    /// choosing a backend).
    ///
    /// Spawns the transport worker, so it must run inside a tokio runtime.
    ///
    /// ## Errors
    /// [`ConfigError::InvalidDsn`] for a malformed endpoint,
    /// [`ConfigError::InvalidSampleRate`] for a rate outside `[0.0, 1.0]`.
    pub fn new(options: ClientOptions) -> Result<Arc<Self>, ConfigError> {
        let dsn = Self::validate(&options)?;
        let sender = Self::default_sender(&dsn);
        Ok(Self::assemble(options, dsn, sender))
    }

    /// Builds a client delivering through the given sender.
    ///
    /// The transport worker and its retry/overflow semantics stay in
    /// place; only the wire seam is replaced. This is the construction
    /// used with [`testing::TestSender`](crate::testing::TestSender).
    pub fn with_sender(
        options: ClientOptions,
        sender: Arc<dyn Sender>,
    ) -> Result<Arc<Self>, ConfigError> {
        let dsn = Self::validate(&options)?;
        Ok(Self::assemble(options, dsn, sender))
    }

    /// Builds a client with a fully custom transport (no worker spawned).
    pub fn with_transport(
        options: ClientOptions,
        transport: Arc<dyn Transport>,
    ) -> Result<Arc<Self>, ConfigError> {
        let dsn = Self::validate(&options)?;
        Ok(Arc::new(Self {
            options,
            dsn,
            transport,
        }))
    }

    fn validate(options: &ClientOptions) -> Result<Dsn, ConfigError> {
        let dsn: Dsn = options.dsn.parse()?;
        if !(0.0..=1.0).contains(&options.sample_rate) {
            return Err(ConfigError::InvalidSampleRate {
                rate: options.sample_rate,
            });
        }
        Ok(dsn)
    }

    fn assemble(options: ClientOptions, dsn: Dsn, sender: Arc<dyn Sender>) -> Arc<Self> {
        let transport = Arc::new(AsyncTransport::spawn(
            options.queue_capacity_clamped(),
            options.overflow,
            DeliveryParams {
                max_retries: options.max_retries,
                backoff: options.retry_backoff,
            },
            options.shutdown_timeout,
            sender,
        ));
        Arc::new(Self {
            options,
            dsn,
            transport,
        })
    }

    #[cfg(feature = "http")]
    fn default_sender(dsn: &Dsn) -> Arc<dyn Sender> {
        Arc::new(HttpSender::new(dsn))
    }

    #[cfg(not(feature = "http"))]
    fn default_sender(_dsn: &Dsn) -> Arc<dyn Sender> {
        Arc::new(DiscardSender)
    }

    /// The configuration this client was built from.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The parsed collector endpoint.
    pub fn dsn(&self) -> &Dsn {
        &self.dsn
    }

    /// Runs one event through the full pipeline.
    ///
    /// Returns the event id on admission to the transport; `None` when a
    /// processor dropped the event, sampling excluded it, or the queue
    /// was full. Never panics, never blocks.
    pub fn capture_event(
        &self,
        event: Event,
        hint: &EventHint,
        scope: Option<&Scope>,
    ) -> Option<EventId> {
        let event = self.finalize_base(event);
        let mut event = self.run_processors(event, hint)?;

        if let Some(scope) = scope {
            scope.apply_to_event(&mut event);
        }

        if !self.sample() {
            tracing::debug!(target: "faultline", "event sampled out");
            return None;
        }

        let id = *event.id.get_or_insert_with(EventId::new);
        if event.timestamp.is_none() {
            event.timestamp = Some(Utc::now());
        }

        let envelope = Envelope::new(event, hint);
        if self.transport.enqueue(envelope) {
            Some(id)
        } else {
            None
        }
    }

    /// Waits for the transport to drain or the deadline to pass.
    pub async fn flush(&self, timeout: Duration) -> bool {
        self.transport.flush(timeout).await
    }

    /// Flushes with the configured shutdown deadline and releases the
    /// delivery worker.
    pub async fn close(&self) -> bool {
        self.transport.close().await
    }

    fn finalize_base(&self, mut event: Event) -> Event {
        if self.options.attach_stacktrace {
            if let Some(exception) = event.exception.as_mut() {
                if exception.stacktrace.is_none() {
                    exception.stacktrace =
                        Some(std::backtrace::Backtrace::force_capture().to_string());
                }
            }
        }
        event
    }

    fn run_processors(&self, event: Event, hint: &EventHint) -> Option<Event> {
        let mut current = event;
        for processor in &self.options.processors {
            let outcome =
                std::panic::catch_unwind(AssertUnwindSafe(|| processor.process(current, hint)));
            match outcome {
                Ok(Some(event)) => current = event,
                Ok(None) => {
                    tracing::debug!(
                        target: "faultline",
                        processor = processor.name(),
                        "event dropped by processor"
                    );
                    return None;
                }
                Err(_) => {
                    tracing::warn!(
                        target: "faultline",
                        processor = processor.name(),
                        "processor panicked; event dropped"
                    );
                    return None;
                }
            }
        }
        Some(current)
    }

    fn sample(&self) -> bool {
        let rate = self.options.sample_rate;
        if rate >= 1.0 {
            true
        } else if rate <= 0.0 {
            false
        } else {
            rand::rng().random::<f64>() < rate
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("dsn", &self.dsn.to_string())
            .field("options", &self.options)
            .finish()
    }
}
