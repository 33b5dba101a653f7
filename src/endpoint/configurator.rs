//! Listener bind decision logic.
//!
//! # Responsibilities
//! - Map zero, one, or many endpoint URL hints to a concrete bind instruction
//! - Enforce the loopback-only constraint
//! - Force HTTP/2-only framing on the listener
//!
//! # Design Decisions
//! - Pure functions, no I/O: fully unit-testable
//! - The backend protocol negotiates its framing out-of-band, so HTTP/2 is
//!   fixed statically instead of upgraded per connection
//! - More than one candidate is rejected: only one endpoint is ever
//!   advertised

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use url::{Host, Url};

use crate::error::EndpointError;

/// Transport scheme for the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listener framing mode. HTTP/2 is the only member: the backend protocol
/// cannot negotiate an upgrade per connection, so framing is fixed at bind
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerProtocol {
    Http2,
}

/// Concrete bind instruction derived from the endpoint hints.
/// Computed once per startup, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenDecision {
    /// Loopback interface to bind.
    pub address: IpAddr,

    /// Port to bind; 0 requests an OS-assigned ephemeral port.
    pub port: u16,

    /// Transport scheme the endpoint will advertise.
    pub scheme: Scheme,

    /// Framing forced on the listener.
    pub protocol: ListenerProtocol,
}

impl ListenDecision {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

/// Derive a bind decision from the candidate endpoint URLs.
///
/// Zero candidates selects an ephemeral loopback port; exactly one candidate
/// is validated and used as-is; more than one is a configuration error.
pub fn decide(hints: &[String]) -> Result<ListenDecision, EndpointError> {
    match hints {
        [] => Ok(ListenDecision {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            scheme: Scheme::Http,
            protocol: ListenerProtocol::Http2,
        }),
        [hint] => decide_single(hint),
        _ => Err(EndpointError::Configuration(
            "multiple endpoints are not supported".to_string(),
        )),
    }
}

fn decide_single(hint: &str) -> Result<ListenDecision, EndpointError> {
    let url = Url::parse(hint).map_err(|e| {
        EndpointError::Configuration(format!("invalid endpoint URL {hint:?}: {e}"))
    })?;

    let scheme = match url.scheme() {
        "http" => Scheme::Http,
        "https" => Scheme::Https,
        other => {
            return Err(EndpointError::Configuration(format!(
                "unsupported scheme {other:?} in endpoint URL {hint:?}"
            )))
        }
    };

    let address = match url.host() {
        Some(Host::Ipv4(ip)) if ip.is_loopback() => IpAddr::V4(ip),
        Some(Host::Ipv6(ip)) if ip.is_loopback() => IpAddr::V6(ip),
        Some(Host::Domain(name)) if name.eq_ignore_ascii_case("localhost") => {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
        Some(_) => {
            return Err(EndpointError::Configuration(format!(
                "endpoint URL {hint:?} must use a loopback address"
            )))
        }
        None => {
            return Err(EndpointError::Configuration(format!(
                "endpoint URL {hint:?} has no host"
            )))
        }
    };

    let port = url.port_or_known_default().ok_or_else(|| {
        EndpointError::Configuration(format!("endpoint URL {hint:?} has no usable port"))
    })?;

    Ok(ListenDecision {
        address,
        port,
        scheme,
        protocol: ListenerProtocol::Http2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    fn hints(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn zero_hints_select_ephemeral_loopback() {
        let decision = decide(&[]).unwrap();
        assert_eq!(decision.address, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(decision.port, 0);
        assert_eq!(decision.scheme, Scheme::Http);
        assert_eq!(decision.protocol, ListenerProtocol::Http2);
    }

    #[test]
    fn single_hint_uses_its_port_and_scheme() {
        let decision = decide(&hints(&["https://127.0.0.1:5050"])).unwrap();
        assert_eq!(decision.address, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(decision.port, 5050);
        assert_eq!(decision.scheme, Scheme::Https);
        assert_eq!(decision.protocol, ListenerProtocol::Http2);
    }

    #[test]
    fn localhost_literal_counts_as_loopback() {
        let decision = decide(&hints(&["http://localhost:8123"])).unwrap();
        assert_eq!(decision.address, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(decision.port, 8123);
    }

    #[test]
    fn ipv6_loopback_accepted() {
        let decision = decide(&hints(&["http://[::1]:4100"])).unwrap();
        assert_eq!(decision.address, IpAddr::V6(Ipv6Addr::LOCALHOST));
        assert_eq!(decision.port, 4100);
    }

    #[test]
    fn scheme_default_port_applies_when_absent() {
        let decision = decide(&hints(&["https://127.0.0.1"])).unwrap();
        assert_eq!(decision.port, 443);
    }

    #[test]
    fn non_loopback_host_rejected() {
        let err = decide(&hints(&["http://192.168.1.10:5000"])).unwrap_err();
        assert!(matches!(err, EndpointError::Configuration(_)));
        assert!(err.to_string().contains("loopback"));
    }

    #[test]
    fn multiple_hints_rejected() {
        let err =
            decide(&hints(&["http://127.0.0.1:5000", "http://127.0.0.1:5001"])).unwrap_err();
        assert!(matches!(err, EndpointError::Configuration(_)));
        assert!(err.to_string().contains("multiple endpoints"));
    }

    #[test]
    fn unsupported_scheme_rejected() {
        let err = decide(&hints(&["ftp://127.0.0.1:21"])).unwrap_err();
        assert!(matches!(err, EndpointError::Configuration(_)));
    }

    #[test]
    fn garbage_hint_rejected() {
        let err = decide(&hints(&["not a url"])).unwrap_err();
        assert!(matches!(err, EndpointError::Configuration(_)));
    }
}
