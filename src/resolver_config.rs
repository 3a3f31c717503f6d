//! Minimal `resolv.conf` reader: spec only needs `nameserver <ip>` lines,
//! everything else is ignored. The pure core takes an already-parsed address
//! list so it's trivially testable; the path-based convenience wraps it.
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use log::warn;

use crate::error::{DNSError, DNSResult};

pub const DEFAULT_DNS_PORT: u16 = 53;

#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    pub nameservers: Vec<SocketAddr>,
}

impl ResolverConfig {
    pub fn new(nameservers: Vec<SocketAddr>) -> Self {
        ResolverConfig { nameservers }
    }

    pub fn from_path(path: impl AsRef<Path>) -> DNSResult<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| DNSError::ConfigParse(format!("{}: {}", path.as_ref().display(), e)))?;
        Ok(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut nameservers = Vec::new();

        for line in contents.lines() {
            let line = line.trim();
            let mut fields = line.split_whitespace();
            if fields.next() != Some("nameserver") {
                continue;
            }

            match fields.next().map(str::parse::<IpAddr>) {
                Some(Ok(ip)) => nameservers.push(SocketAddr::new(ip, DEFAULT_DNS_PORT)),
                Some(Err(_)) | None => warn!("ignoring malformed nameserver line: {:?}", line),
            }
        }

        ResolverConfig { nameservers }
    }

    /// The first IPv4 entry, or failing that the first entry of any family.
    pub fn preferred(&self) -> DNSResult<SocketAddr> {
        self.nameservers
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| self.nameservers.first())
            .copied()
            .ok_or(DNSError::NoNameservers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nameserver_lines_and_ignores_others() {
        let config = ResolverConfig::parse(
            "domain example.com\nnameserver 8.8.8.8\nsearch example.com\nnameserver 2001:4860:4860::8888\n",
        );
        assert_eq!(config.nameservers.len(), 2);
        assert_eq!(config.nameservers[0].ip().to_string(), "8.8.8.8");
    }

    #[test]
    fn skips_malformed_ip_lines() {
        let config = ResolverConfig::parse("nameserver not-an-ip\nnameserver 1.1.1.1\n");
        assert_eq!(config.nameservers.len(), 1);
    }

    #[test]
    fn preferred_picks_first_ipv4() {
        let config = ResolverConfig::parse("nameserver 2001:4860:4860::8888\nnameserver 1.1.1.1\n");
        assert_eq!(config.preferred().unwrap().ip().to_string(), "1.1.1.1");
    }

    #[test]
    fn preferred_fails_with_no_nameservers() {
        let config = ResolverConfig::parse("domain example.com\n");
        assert!(matches!(config.preferred(), Err(DNSError::NoNameservers)));
    }
}
