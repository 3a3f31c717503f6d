//! Typed helpers over the transaction engine (spec.md §4.6): a thin layer
//! that builds the right `Message`, sends it, and projects the answer
//! section down to the record shape the caller wants.
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::dns_types::{QClass, QType};
use crate::engine::Client;
use crate::error::{DNSError, DNSResult};
use crate::wire::name::Name;
use crate::wire::record::Record;

async fn query_answers(client: &Client, name: Name, qtype: QType) -> DNSResult<Vec<Record>> {
    let message = crate::wire::message::Message::new_query(name, qtype, QClass::IN);
    let response = client.send_query(message, None).await?;
    Ok(response.answers.into_iter().map(|rr| rr.rdata).collect())
}

pub async fn a_query(client: &Client, host: &str, port: u16) -> DNSResult<Vec<SocketAddr>> {
    let name = Name::from_str(host)?;
    let answers = query_answers(client, name, QType::A).await?;
    Ok(answers
        .into_iter()
        .filter_map(|r| match r {
            Record::A(addr) => Some(SocketAddr::new(addr.into(), port)),
            _ => None,
        })
        .collect())
}

pub async fn aaaa_query(client: &Client, host: &str, port: u16) -> DNSResult<Vec<SocketAddr>> {
    let name = Name::from_str(host)?;
    let answers = query_answers(client, name, QType::AAAA).await?;
    Ok(answers
        .into_iter()
        .filter_map(|r| match r {
            Record::AAAA(addr) => Some(SocketAddr::new(addr.into(), port)),
            _ => None,
        })
        .collect())
}

pub async fn srv(client: &Client, host: &str) -> DNSResult<Vec<Record>> {
    query_answers(client, Name::from_str(host)?, QType::SRV).await
}

pub async fn mx(client: &Client, host: &str) -> DNSResult<Vec<Record>> {
    query_answers(client, Name::from_str(host)?, QType::MX).await
}

pub async fn txt(client: &Client, host: &str) -> DNSResult<Vec<Record>> {
    query_answers(client, Name::from_str(host)?, QType::TXT).await
}

pub async fn cname(client: &Client, host: &str) -> DNSResult<Vec<Record>> {
    query_answers(client, Name::from_str(host)?, QType::CNAME).await
}

pub async fn ns(client: &Client, host: &str) -> DNSResult<Vec<Record>> {
    query_answers(client, Name::from_str(host)?, QType::NS).await
}

pub async fn soa(client: &Client, host: &str) -> DNSResult<Vec<Record>> {
    query_answers(client, Name::from_str(host)?, QType::SOA).await
}

/// Issue a PTR query for `a.b.c.d` as `d.c.b.a.in-addr.arpa.`.
pub async fn ipv4_inverse_address(client: &Client, addr: &str) -> DNSResult<Vec<Record>> {
    let ip: Ipv4Addr = addr.parse().map_err(|_| DNSError::InvalidIP(addr.to_string()))?;
    let octets = ip.octets();
    let name = format!(
        "{}.{}.{}.{}.in-addr.arpa.",
        octets[3], octets[2], octets[1], octets[0]
    );
    query_answers(client, Name::from_str(&name)?, QType::PTR).await
}

/// Issue a PTR query for an IPv6 address as its nibble-reversed
/// `.ip6.arpa.` form (RFC 3596).
pub async fn ipv6_inverse_address(client: &Client, addr: &str) -> DNSResult<Vec<Record>> {
    let ip: Ipv6Addr = addr.parse().map_err(|_| DNSError::InvalidIP(addr.to_string()))?;
    let mut nibbles = String::new();
    for byte in ip.octets().iter().rev() {
        nibbles.push_str(&format!("{:x}.{:x}.", byte & 0x0F, byte >> 4));
    }
    nibbles.push_str("ip6.arpa.");
    query_answers(client, Name::from_str(&nibbles)?, QType::PTR).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_inverse_name_is_reversed() {
        let ip: Ipv4Addr = "8.8.4.4".parse().unwrap();
        let octets = ip.octets();
        let name = format!(
            "{}.{}.{}.{}.in-addr.arpa.",
            octets[3], octets[2], octets[1], octets[0]
        );
        assert_eq!(name, "4.4.8.8.in-addr.arpa.");
    }

    #[test]
    fn ipv6_inverse_name_is_nibble_reversed() {
        let ip: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let mut nibbles = String::new();
        for byte in ip.octets().iter().rev() {
            nibbles.push_str(&format!("{:x}.{:x}.", byte & 0x0F, byte >> 4));
        }
        nibbles.push_str("ip6.arpa.");
        assert!(nibbles.ends_with("8.b.d.0.1.0.0.2.ip6.arpa."));
        assert!(nibbles.starts_with("1.0.0.0.0.0.0.0."));
    }

    #[test]
    fn ipv6_inverse_rejects_garbage() {
        assert!("not-an-address".parse::<Ipv6Addr>().is_err());
    }
}
