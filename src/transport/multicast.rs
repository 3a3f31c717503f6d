//! Multicast DNS: a UDP variant bound to `224.0.0.251:5353`. Outbound queries
//! have `RD` disabled by the engine when it sees `is_multicast()`; unsolicited
//! inbound messages (not answers to a known id) are forwarded by the engine
//! to a caller-supplied callback.
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use async_trait::async_trait;
use log::debug;
use tokio::net::UdpSocket;

use crate::error::DNSResult;
use crate::transport::{Channel, MAX_UDP_MESSAGE_SIZE};

pub const MDNS_GROUP: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);
pub const MDNS_PORT: u16 = 5353;

pub struct MulticastChannel {
    socket: UdpSocket,
    group: SocketAddr,
}

impl MulticastChannel {
    pub async fn connect() -> DNSResult<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, MDNS_PORT)).await?;
        socket.join_multicast_v4(MDNS_GROUP, Ipv4Addr::UNSPECIFIED)?;
        let group = SocketAddr::V4(SocketAddrV4::new(MDNS_GROUP, MDNS_PORT));
        debug!("joined multicast group {}", group);
        Ok(MulticastChannel { socket, group })
    }

    pub fn is_multicast(&self) -> bool {
        true
    }
}

#[async_trait]
impl Channel for MulticastChannel {
    async fn send(&self, message: &[u8]) -> DNSResult<()> {
        self.socket.send_to(message, self.group).await?;
        Ok(())
    }

    async fn recv(&self) -> DNSResult<Vec<u8>> {
        let mut buffer = vec![0u8; MAX_UDP_MESSAGE_SIZE];
        let (received, _from) = self.socket.recv_from(&mut buffer).await?;
        buffer.truncate(received);
        Ok(buffer)
    }
}
