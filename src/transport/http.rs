//! # HTTP delivery backend (cargo feature `http`).
//!
//! POSTs each envelope as JSON to the DSN's store endpoint and maps the
//! response onto the delivery error taxonomy:
//!
//! - network errors, HTTP 429 and 5xx -> [`DeliveryError::Transient`]
//!   (the worker retries with backoff);
//! - any other non-success status -> [`DeliveryError::Rejected`]
//!   (dropped immediately).

use async_trait::async_trait;

use crate::dsn::Dsn;
use crate::error::DeliveryError;
use crate::transport::{Envelope, Sender};

/// JSON-over-HTTP sender against a collector's store endpoint.
pub struct HttpSender {
    http: reqwest::Client,
    url: String,
    auth: String,
}

impl HttpSender {
    /// Builds a sender for the given endpoint.
    pub fn new(dsn: &Dsn) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: dsn.store_url(),
            auth: format!("key={}", dsn.public_key()),
        }
    }
}

#[async_trait]
impl Sender for HttpSender {
    async fn send(&self, envelope: &Envelope) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(&self.url)
            .header("X-Capture-Auth", &self.auth)
            .json(envelope)
            .send()
            .await
            .map_err(|err| DeliveryError::Transient {
                reason: err.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.as_u16() == 429 || status.is_server_error() {
            Err(DeliveryError::Transient {
                reason: format!("collector returned {status}"),
            })
        } else {
            Err(DeliveryError::Rejected {
                reason: format!("collector returned {status}"),
            })
        }
    }
}
