//! A small connection pool keyed by (remote address, protocol), with a
//! sourcing policy controlling reuse (spec.md §4.5).
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::Mutex;

use crate::engine::Client;
use crate::error::{DNSError, DNSResult};

const DEFAULT_CONNECT_RETRIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Udp,
    Tcp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sourcing {
    /// reuse a pooled client for this (address, protocol) if one exists
    Existing,
    /// always connect a fresh client and store it, replacing any prior entry
    New,
    /// connect a fresh client that is never stored in the pool
    Unpooled,
}

#[derive(Debug, Clone, Copy)]
pub struct ConnectionRequirements {
    pub remote: SocketAddr,
    pub protocol: Protocol,
    pub sourcing: Sourcing,
}

impl ConnectionRequirements {
    pub fn new(remote: SocketAddr, protocol: Protocol, sourcing: Sourcing) -> Self {
        ConnectionRequirements {
            remote,
            protocol,
            sourcing,
        }
    }
}

type PoolKey = (SocketAddr, Protocol);

pub struct ConnectionPool {
    clients: Mutex<HashMap<PoolKey, Arc<Client>>>,
    closed: Mutex<bool>,
    retries: usize,
}

impl ConnectionPool {
    pub fn new() -> Self {
        ConnectionPool {
            clients: Mutex::new(HashMap::new()),
            closed: Mutex::new(false),
            retries: DEFAULT_CONNECT_RETRIES,
        }
    }

    pub async fn next(&self, requirements: ConnectionRequirements) -> DNSResult<Arc<Client>> {
        if *self.closed.lock().await {
            return Err(DNSError::PoolClosed);
        }

        let key = (requirements.remote, requirements.protocol);

        match requirements.sourcing {
            Sourcing::Existing => {
                if let Some(client) = self.clients.lock().await.get(&key).cloned() {
                    return Ok(client);
                }
                let client = Arc::new(self.connect_with_retry(requirements).await?);
                self.clients.lock().await.insert(key, client.clone());
                Ok(client)
            }
            Sourcing::New => {
                let client = Arc::new(self.connect_with_retry(requirements).await?);
                self.clients.lock().await.insert(key, client.clone());
                Ok(client)
            }
            Sourcing::Unpooled => Ok(Arc::new(self.connect_with_retry(requirements).await?)),
        }
    }

    /// Like [`ConnectionPool::next`], but tries each address in `servers` in
    /// order (e.g. the list from `ResolverConfig::nameservers`) instead of a
    /// single remote, falling back to the next candidate once the current
    /// one exhausts its connect retries.
    pub async fn next_any(
        &self,
        servers: &[SocketAddr],
        protocol: Protocol,
        sourcing: Sourcing,
    ) -> DNSResult<Arc<Client>> {
        if *self.closed.lock().await {
            return Err(DNSError::PoolClosed);
        }
        if servers.is_empty() {
            return Err(DNSError::NoNameservers);
        }

        if sourcing == Sourcing::Existing {
            let clients = self.clients.lock().await;
            for &addr in servers {
                if let Some(client) = clients.get(&(addr, protocol)) {
                    return Ok(client.clone());
                }
            }
        }

        let mut last_err = None;
        for &addr in servers {
            let requirements = ConnectionRequirements::new(addr, protocol, sourcing);
            match self.connect_with_retry(requirements).await {
                Ok(client) => {
                    let client = Arc::new(client);
                    if sourcing != Sourcing::Unpooled {
                        self.clients.lock().await.insert((addr, protocol), client.clone());
                    }
                    return Ok(client);
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err.unwrap_or(DNSError::NoNameservers))
    }

    async fn connect_with_retry(&self, requirements: ConnectionRequirements) -> DNSResult<Client> {
        let mut last_err = None;

        for attempt in 1..=self.retries {
            let result = match requirements.protocol {
                Protocol::Udp => Client::connect(requirements.remote).await,
                Protocol::Tcp => Client::connect_tcp(requirements.remote).await,
            };

            match result {
                Ok(client) => return Ok(client),
                Err(e) => {
                    debug!("connect attempt {}/{} to {} failed: {}", attempt, self.retries, requirements.remote, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or(DNSError::NoNameservers))
    }

    /// Mark the pool closed, cancel every pooled client's in-flight queries,
    /// and empty it. Subsequent `next` calls fail with `PoolClosed`.
    pub async fn disconnect(&self) {
        *self.closed.lock().await = true;
        let mut clients = self.clients.lock().await;
        for (_, client) in clients.drain() {
            client.cancel_queries().await;
        }
        info!("connection pool disconnected");
    }
}

impl Default for ConnectionPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disconnect_rejects_subsequent_next() {
        let pool = ConnectionPool::new();
        pool.disconnect().await;

        let requirements = ConnectionRequirements::new(
            "127.0.0.1:53".parse().unwrap(),
            Protocol::Udp,
            Sourcing::Existing,
        );
        assert!(matches!(pool.next(requirements).await, Err(DNSError::PoolClosed)));
    }

    #[tokio::test]
    async fn next_any_falls_back_across_candidate_servers() {
        let dead_socket = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead_addr = dead_socket.local_addr().unwrap();
        drop(dead_socket);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let live_addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        let pool = ConnectionPool::new();
        let client = pool
            .next_any(&[dead_addr, live_addr], Protocol::Tcp, Sourcing::Unpooled)
            .await;
        assert!(client.is_ok());
    }
}
