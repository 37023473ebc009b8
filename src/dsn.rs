//! # DSN: the collector endpoint identifier.
//!
//! A DSN names the remote collector and the credentials to reach it:
//!
//! ```text
//! scheme://public_key@host[:port][/path]/project_id
//! ```
//!
//! Parsing happens once, at client construction, and a malformed DSN is
//! the only hard failure the crate ever surfaces. Everything downstream
//! works with the parsed [`Dsn`].
//!
//! ## Example
//! ```rust
//! use faultline::Dsn;
//!
//! let dsn: Dsn = "https://abc123@collector.example.com/42".parse().unwrap();
//! assert_eq!(dsn.public_key(), "abc123");
//! assert_eq!(dsn.project_id(), "42");
//! assert_eq!(
//!     dsn.store_url(),
//!     "https://collector.example.com:443/api/42/store/"
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Transport scheme of the collector endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    /// Plain HTTP (port 80 unless overridden).
    Http,
    /// HTTPS (port 443 unless overridden).
    Https,
}

impl Scheme {
    fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Parsed collector endpoint.
///
/// Construct via [`str::parse`]; accessors expose the pieces the transport
/// needs to address and authenticate against the collector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dsn {
    scheme: Scheme,
    public_key: String,
    host: String,
    port: u16,
    path: String,
    project_id: String,
}

impl Dsn {
    /// The public key used to authenticate envelopes.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Collector host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Collector port (scheme default unless the DSN overrides it).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The project identifier events are filed under.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Full URL of the collector's event intake endpoint.
    pub fn store_url(&self) -> String {
        format!(
            "{}://{}:{}{}/api/{}/store/",
            self.scheme.as_str(),
            self.host,
            self.port,
            self.path,
            self.project_id
        )
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}@{}:{}{}/{}",
            self.scheme.as_str(),
            self.public_key,
            self.host,
            self.port,
            self.path,
            self.project_id
        )
    }
}

impl FromStr for Dsn {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidDsn {
            reason: reason.to_string(),
        };

        if s.trim().is_empty() {
            return Err(invalid("empty"));
        }

        let (scheme_str, rest) = s.split_once("://").ok_or_else(|| invalid("missing scheme"))?;
        let scheme = match scheme_str {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(ConfigError::InvalidDsn {
                    reason: format!("unsupported scheme '{other}'"),
                })
            }
        };

        let (public_key, location) = rest
            .split_once('@')
            .ok_or_else(|| invalid("missing public key"))?;
        if public_key.is_empty() {
            return Err(invalid("empty public key"));
        }

        let (authority_and_path, project_id) = location
            .rsplit_once('/')
            .ok_or_else(|| invalid("missing project id"))?;
        if project_id.is_empty() {
            return Err(invalid("empty project id"));
        }

        let (authority, path) = match authority_and_path.split_once('/') {
            Some((authority, prefix)) => (authority, format!("/{prefix}")),
            None => (authority_and_path, String::new()),
        };

        let (host, port) = match authority.split_once(':') {
            Some((host, port_str)) => {
                let port = port_str.parse::<u16>().map_err(|_| {
                    ConfigError::InvalidDsn {
                        reason: format!("invalid port '{port_str}'"),
                    }
                })?;
                (host, port)
            }
            None => (authority, scheme.default_port()),
        };
        if host.is_empty() {
            return Err(invalid("empty host"));
        }

        Ok(Dsn {
            scheme,
            public_key: public_key.to_string(),
            host: host.to_string(),
            port,
            path,
            project_id: project_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let dsn: Dsn = "https://key@example.com/7".parse().unwrap();
        assert_eq!(dsn.public_key(), "key");
        assert_eq!(dsn.host(), "example.com");
        assert_eq!(dsn.port(), 443);
        assert_eq!(dsn.project_id(), "7");
    }

    #[test]
    fn test_parse_with_port_and_path() {
        let dsn: Dsn = "http://key@example.com:9000/ingest/7".parse().unwrap();
        assert_eq!(dsn.port(), 9000);
        assert_eq!(
            dsn.store_url(),
            "http://example.com:9000/ingest/api/7/store/"
        );
    }

    #[test]
    fn test_http_defaults_to_port_80() {
        let dsn: Dsn = "http://key@example.com/7".parse().unwrap();
        assert_eq!(dsn.port(), 80);
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "",
            "   ",
            "example.com/7",
            "ftp://key@example.com/7",
            "https://@example.com/7",
            "https://key@example.com",
            "https://key@example.com/",
            "https://key@/7",
            "https://key@example.com:notaport/7",
        ] {
            let parsed = bad.parse::<Dsn>();
            assert!(parsed.is_err(), "expected '{bad}' to be rejected");
        }
    }

    #[test]
    fn test_display_round_trips() {
        let dsn: Dsn = "https://key@example.com:1234/7".parse().unwrap();
        let again: Dsn = dsn.to_string().parse().unwrap();
        assert_eq!(dsn, again);
    }
}
