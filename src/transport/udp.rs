//! UDP datagram framing: one DNS message per datagram.
use std::net::SocketAddr;

use async_trait::async_trait;
use log::debug;
use tokio::net::UdpSocket;

use crate::error::DNSResult;
use crate::transport::{Channel, MAX_UDP_MESSAGE_SIZE};

pub struct UdpChannel {
    socket: UdpSocket,
    remote: SocketAddr,
}

impl UdpChannel {
    pub async fn connect(remote: SocketAddr) -> DNSResult<Self> {
        let local = if remote.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(remote).await?;
        debug!("udp channel bound locally, connected to {}", remote);
        Ok(UdpChannel { socket, remote })
    }

    pub fn remote(&self) -> SocketAddr {
        self.remote
    }
}

#[async_trait]
impl Channel for UdpChannel {
    async fn send(&self, message: &[u8]) -> DNSResult<()> {
        self.socket.send(message).await?;
        Ok(())
    }

    async fn recv(&self) -> DNSResult<Vec<u8>> {
        let mut buffer = vec![0u8; MAX_UDP_MESSAGE_SIZE];
        let received = self.socket.recv(&mut buffer).await?;
        buffer.truncate(received);
        Ok(buffer)
    }
}
