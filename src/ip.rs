use std::borrow::Cow;
use std::net::IpAddr;

use axum::http::HeaderMap;
use serde::Serialize;

const CF_CONNECTING_IP: &str = "cf-connecting-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Forwarding headers in priority order, first one set wins.
const FORWARDING_HEADERS: [(&str, Source); 2] = [
    (CF_CONNECTING_IP, Source::CfConnectingIp),
    (X_FORWARDED_FOR, Source::XForwardedFor),
];

/// Case-insensitive read access to request headers.
///
/// A header that is set must come back as `Some`, even when its bytes are
/// not valid text, so that it is validated rather than skipped.
pub trait HeaderLookup {
    fn header(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl HeaderLookup for HeaderMap {
    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|hv| String::from_utf8_lossy(hv.as_bytes()))
    }
}

/// Where a forwarding chain was read from.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    CfConnectingIp,
    XForwardedFor,
    Peer,
}

/// First, second and last address of a forwarding chain.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ForwardingInfo {
    pub count: usize,
    pub first: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    pub last: String,
    pub source: Source,
}

impl ForwardingInfo {
    fn from_peer(peer_addr: &str) -> Self {
        let host = split_host_port(peer_addr.trim()).to_string();
        Self {
            count: 1,
            first: host.clone(),
            second: None,
            last: host,
            source: Source::Peer,
        }
    }

    /// The originating client address, if `first` is a literal IP.
    pub fn client_ip(&self) -> Option<IpAddr> {
        self.first.parse().ok()
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("invalid ip address {entry:?} in {header} header {value:?}")]
pub struct ValidationError {
    pub entry: String,
    pub header: &'static str,
    pub value: String,
}

/// Resolves the forwarding chain of a request from its headers, falling back
/// to the peer address (`host:port`) when no forwarding header is set.
///
/// Every entry of the chosen header must be a valid IPv4 or IPv6 address,
/// otherwise the whole header is rejected.
pub fn resolve<H>(headers: &H, peer_addr: &str) -> Result<ForwardingInfo, ValidationError>
where
    H: HeaderLookup + ?Sized,
{
    let chain = FORWARDING_HEADERS.iter().find_map(|&(name, source)| {
        headers
            .header(name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| (name, source, value))
    });
    match chain {
        Some((name, source, value)) => parse_chain(name, source, &value),
        None => Ok(ForwardingInfo::from_peer(peer_addr)),
    }
}

fn parse_chain(
    header: &'static str,
    source: Source,
    value: &str,
) -> Result<ForwardingInfo, ValidationError> {
    let entries = value
        .split(',')
        .map(str::trim)
        .map(|entry| match entry.parse::<IpAddr>() {
            Ok(_) => Ok(entry),
            Err(_) => Err(ValidationError {
                entry: entry.to_string(),
                header,
                value: value.to_string(),
            }),
        })
        .collect::<Result<Vec<&str>, ValidationError>>()?;

    // split always yields at least one field
    let count = entries.len();
    Ok(ForwardingInfo {
        count,
        first: entries[0].to_string(),
        second: entries.get(1).map(|s| s.to_string()),
        last: entries[count - 1].to_string(),
        source,
    })
}

/// Host part of `host:port` or `[host]:port`, or the whole input when it
/// does not split.
fn split_host_port(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((host, port)) if is_port(port) => host,
            _ => addr,
        };
    }
    match addr.rsplit_once(':') {
        Some((host, _)) if !host.contains(':') => host,
        _ => addr,
    }
}

fn is_port(rest: &str) -> bool {
    rest.strip_prefix(':').is_some_and(|port| !port.contains(':'))
}
