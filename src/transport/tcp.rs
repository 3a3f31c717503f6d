//! TCP framing: each message is a 16-bit big-endian length prefix followed
//! by exactly that many bytes (spec.md §4.3/§6).
use std::net::SocketAddr;

use async_trait::async_trait;
use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::error::DNSResult;
use crate::transport::Channel;

pub struct TcpChannel {
    // a single TCP stream is read and written from different tasks, so both
    // halves are guarded independently to avoid serializing send against recv
    reader: Mutex<tokio::io::ReadHalf<TcpStream>>,
    writer: Mutex<tokio::io::WriteHalf<TcpStream>>,
    remote: SocketAddr,
}

impl TcpChannel {
    pub async fn connect(remote: SocketAddr) -> DNSResult<Self> {
        let stream = TcpStream::connect(remote).await?;
        let (reader, writer) = tokio::io::split(stream);
        debug!("tcp channel connected to {}", remote);
        Ok(TcpChannel {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            remote,
        })
    }

    pub fn remote(&self) -> SocketAddr {
        self.remote
    }
}

#[async_trait]
impl Channel for TcpChannel {
    async fn send(&self, message: &[u8]) -> DNSResult<()> {
        let length = message.len() as u16;
        let mut writer = self.writer.lock().await;
        writer.write_all(&length.to_be_bytes()).await?;
        writer.write_all(message).await?;
        Ok(())
    }

    async fn recv(&self) -> DNSResult<Vec<u8>> {
        let mut reader = self.reader.lock().await;
        let mut length_prefix = [0u8; 2];
        reader.read_exact(&mut length_prefix).await?;
        let length = u16::from_be_bytes(length_prefix) as usize;

        let mut buffer = vec![0u8; length];
        reader.read_exact(&mut buffer).await?;
        Ok(buffer)
    }
}
