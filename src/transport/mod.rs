//! UDP/TCP/multicast framing. Each transport turns outbound [`Message`] bytes
//! into wire frames and reassembles inbound frames back into raw message
//! bytes; the codec (`wire::message`) does the actual (de)serialization.
use async_trait::async_trait;

use crate::error::DNSResult;

pub mod multicast;
pub mod tcp;
pub mod udp;

pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

/// A point-to-point channel a [`crate::engine::Client`] writes queries to and
/// reads responses from, abstracting over UDP/TCP/multicast framing.
#[async_trait]
pub trait Channel: Send + Sync {
    async fn send(&self, message: &[u8]) -> DNSResult<()>;
    async fn recv(&self) -> DNSResult<Vec<u8>>;
}
