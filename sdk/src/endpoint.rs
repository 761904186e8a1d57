//! Network endpoints carried inside address-book payloads.
//!
//! The engine never dials these; they are data a node operator publishes
//! about its node.

use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

use crate::proto;
use crate::transaction::DecodeError;

/// Where an endpoint lives: a literal IPv4 address or a DNS name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointAddress {
    Ipv4(Ipv4Addr),
    Domain(String),
}

/// A node address plus port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Endpoint {
    pub address: EndpointAddress,
    pub port: u16,
}

impl Endpoint {
    pub fn ipv4(address: Ipv4Addr, port: u16) -> Self {
        Self {
            address: EndpointAddress::Ipv4(address),
            port,
        }
    }

    pub fn domain(name: impl Into<String>, port: u16) -> Self {
        Self {
            address: EndpointAddress::Domain(name.into()),
            port,
        }
    }

    pub(crate) fn to_proto(&self) -> proto::ServiceEndpoint {
        let mut pb = proto::ServiceEndpoint {
            port: i32::from(self.port),
            ..Default::default()
        };
        match &self.address {
            EndpointAddress::Ipv4(ip) => pb.ip_address_v4 = ip.octets().to_vec(),
            EndpointAddress::Domain(name) => pb.domain_name = name.clone(),
        }
        pb
    }

    /// Exactly one of address bytes or domain name must be present, and the
    /// port must fit in 16 bits.
    pub(crate) fn from_proto(pb: &proto::ServiceEndpoint) -> Result<Self, DecodeError> {
        let port = u16::try_from(pb.port).map_err(|_| DecodeError::InvalidEndpoint {
            reason: format!("port {} out of range", pb.port),
        })?;
        let address = match (pb.ip_address_v4.as_slice(), pb.domain_name.as_str()) {
            ([a, b, c, d], "") => EndpointAddress::Ipv4(Ipv4Addr::new(*a, *b, *c, *d)),
            ([], name) if !name.is_empty() => EndpointAddress::Domain(name.to_string()),
            ([], _) => {
                return Err(DecodeError::InvalidEndpoint {
                    reason: "neither address nor domain name set".into(),
                })
            }
            (bytes, "") => {
                return Err(DecodeError::InvalidEndpoint {
                    reason: format!("ipv4 address must be 4 bytes, got {}", bytes.len()),
                })
            }
            (_, _) => {
                return Err(DecodeError::InvalidEndpoint {
                    reason: "both address and domain name set".into(),
                })
            }
        };
        Ok(Self { address, port })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            EndpointAddress::Ipv4(ip) => write!(f, "{ip}:{}", self.port),
            EndpointAddress::Domain(name) => write!(f, "{name}:{}", self.port),
        }
    }
}
