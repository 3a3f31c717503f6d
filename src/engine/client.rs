//! Per-channel transaction engine: ID allocation, the in-flight map, the
//! send/receive pipelines, and cancellation (spec.md §4.4).
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace, warn};
use rand::Rng;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::engine::pending::{SentQuery, DEFAULT_TIMEOUT};
use crate::error::{DNSError, DNSResult};
use crate::transport::multicast::MulticastChannel;
use crate::transport::tcp::TcpChannel;
use crate::transport::udp::UdpChannel;
use crate::transport::Channel;
use crate::wire::message::Message;

type InFlight = Arc<Mutex<HashMap<u16, SentQuery>>>;

/// Called for every inbound multicast message that is not an answer to a
/// known transaction id. May return a reply to send back on the same group.
pub type MulticastCallback = Arc<dyn Fn(&Message) -> Option<Message> + Send + Sync>;

pub struct Client {
    channel: Arc<dyn Channel>,
    in_flight: InFlight,
    next_id: Arc<Mutex<u16>>,
    is_multicast: bool,
    recv_task: JoinHandle<()>,
}

impl Client {
    pub async fn connect(remote: SocketAddr) -> DNSResult<Self> {
        let channel = Arc::new(UdpChannel::connect(remote).await?);
        Ok(Self::spawn(channel, false, None))
    }

    pub async fn connect_tcp(remote: SocketAddr) -> DNSResult<Self> {
        let channel = Arc::new(TcpChannel::connect(remote).await?);
        Ok(Self::spawn(channel, false, None))
    }

    /// Try each candidate nameserver address over UDP in order, returning
    /// the first that connects (spec.md §6: connect over a list of
    /// candidate servers, e.g. from `ResolverConfig::nameservers`).
    pub async fn connect_any(servers: &[SocketAddr]) -> DNSResult<Self> {
        let mut last_err = None;
        for &addr in servers {
            match Self::connect(addr).await {
                Ok(client) => return Ok(client),
                Err(e) => {
                    debug!("connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or(DNSError::NoNameservers))
    }

    /// TCP counterpart of [`Client::connect_any`].
    pub async fn connect_any_tcp(servers: &[SocketAddr]) -> DNSResult<Self> {
        let mut last_err = None;
        for &addr in servers {
            match Self::connect_tcp(addr).await {
                Ok(client) => return Ok(client),
                Err(e) => {
                    debug!("connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or(DNSError::NoNameservers))
    }

    pub async fn connect_multicast(callback: Option<MulticastCallback>) -> DNSResult<Self> {
        let channel = Arc::new(MulticastChannel::connect().await?);
        Ok(Self::spawn(channel, true, callback))
    }

    fn spawn(channel: Arc<dyn Channel>, is_multicast: bool, callback: Option<MulticastCallback>) -> Self {
        let in_flight: InFlight = Arc::new(Mutex::new(HashMap::new()));
        let seed: u16 = rand::thread_rng().gen();

        let recv_channel = channel.clone();
        let recv_in_flight = in_flight.clone();
        let recv_task = tokio::spawn(async move {
            Self::receive_loop(recv_channel, recv_in_flight, is_multicast, callback).await;
        });

        Client {
            channel,
            in_flight,
            next_id: Arc::new(Mutex::new(seed)),
            is_multicast,
            recv_task,
        }
    }

    async fn receive_loop(
        channel: Arc<dyn Channel>,
        in_flight: InFlight,
        is_multicast: bool,
        callback: Option<MulticastCallback>,
    ) {
        loop {
            let bytes = match channel.recv().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("transport closed, draining in-flight queries: {}", e);
                    let message = e.to_string();
                    Self::drain(&in_flight, move || {
                        DNSError::Io(std::io::Error::other(message.clone()))
                    })
                    .await;
                    return;
                }
            };

            let message = match Message::from_bytes(&bytes) {
                Ok(m) => m,
                Err(e) => {
                    trace!("dropping unparseable inbound datagram: {}", e);
                    continue;
                }
            };

            if !message.is_response() {
                if is_multicast {
                    if let Some(cb) = &callback {
                        if let Some(reply) = cb(&message) {
                            if let Ok(bytes) = reply.to_bytes() {
                                let _ = channel.send(&bytes).await;
                            }
                        }
                    }
                }
                continue;
            }

            let id = message.header.id;
            let entry = in_flight.lock().await.remove(&id);
            match entry {
                Some(sent) => sent.resolve(Ok(message)),
                None => trace!("{}", DNSError::UnknownTransaction(id)),
            }
        }
    }

    async fn drain(in_flight: &InFlight, make_err: impl Fn() -> DNSError) {
        let mut map = in_flight.lock().await;
        for (_, sent) in map.drain() {
            sent.resolve(Err(make_err()));
        }
    }

    async fn next_id(&self) -> u16 {
        let mut guard = self.next_id.lock().await;
        let id = *guard;
        *guard = guard.wrapping_add(1);
        id
    }

    /// Send `message`, returning once a matching response arrives, the
    /// timeout fires, or the query is cancelled.
    pub async fn send_query(&self, mut message: Message, timeout: Option<Duration>) -> DNSResult<Message> {
        let id = self.next_id().await;
        message.header.id = id;
        if self.is_multicast {
            message.header.flags.recursion_desired = false;
        }

        let (tx, rx) = oneshot::channel();
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);

        let timeout_in_flight = self.in_flight.clone();
        let timeout_handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(sent) = timeout_in_flight.lock().await.remove(&id) {
                sent.resolve(Err(DNSError::Timeout));
            }
        });

        self.in_flight
            .lock()
            .await
            .insert(id, SentQuery::new(tx, timeout_handle));

        let bytes = message.to_bytes()?;
        if let Err(e) = self.channel.send(&bytes).await {
            if let Some(sent) = self.in_flight.lock().await.remove(&id) {
                sent.resolve(Err(DNSError::DNS(e.to_string())));
            }
            return Err(e);
        }

        debug!("sent query id={:#06x}", id);

        rx.await.map_err(|_| DNSError::Cancelled)?
    }

    /// Resolve every pending query with `Cancelled`.
    pub async fn cancel_queries(&self) {
        Self::drain(&self.in_flight, || DNSError::Cancelled).await;
    }

    pub fn is_multicast(&self) -> bool {
        self.is_multicast
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.recv_task.abort();
        // Drop can't .await; spawn a detached task so every pending query
        // resolves to `Cancelled` right away instead of waiting out its
        // individual timeout (spec.md §3: "dropping a client cancels its
        // in-flight entries and closes the channel").
        let in_flight = self.in_flight.clone();
        tokio::spawn(async move {
            Self::drain(&in_flight, || DNSError::Cancelled).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drop_resolves_pending_queries_immediately() {
        let client = Client::connect("127.0.0.1:53".parse().unwrap()).await.unwrap();

        // hand-insert a pending entry the way `send_query` would, with a
        // timeout long enough that a passing test can only mean the drop
        // path resolved it, not the timeout.
        let (tx, rx) = oneshot::channel();
        let timeout_handle = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        client.in_flight.lock().await.insert(7, SentQuery::new(tx, timeout_handle));

        drop(client);

        let result = tokio::time::timeout(Duration::from_millis(500), rx)
            .await
            .expect("dropping the client should resolve pending queries well within 500ms")
            .expect("sender should not be dropped without sending");
        assert!(matches!(result, Err(DNSError::Cancelled)));
    }

    #[tokio::test]
    async fn connect_any_tcp_falls_back_to_next_candidate() {
        // first candidate: a loopback port nothing is listening on
        let dead_socket = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead_addr = dead_socket.local_addr().unwrap();
        drop(dead_socket); // release the port so connecting to it is refused

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let live_addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        let client = Client::connect_any_tcp(&[dead_addr, live_addr]).await;
        assert!(client.is_ok());
    }
}
