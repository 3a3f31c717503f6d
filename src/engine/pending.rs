//! A single in-flight query: its completion sink and cancellable timeout.
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::DNSResult;
use crate::wire::message::Message;

pub struct SentQuery {
    pub sender: oneshot::Sender<DNSResult<Message>>,
    pub timeout_handle: JoinHandle<()>,
}

impl SentQuery {
    pub fn new(sender: oneshot::Sender<DNSResult<Message>>, timeout_handle: JoinHandle<()>) -> Self {
        SentQuery {
            sender,
            timeout_handle,
        }
    }

    /// Cancel the timeout and resolve the sink. Dropping the receiver makes
    /// `send` a no-op, which is the correct behavior if the caller already
    /// gave up on the future.
    pub fn resolve(self, outcome: DNSResult<Message>) {
        self.timeout_handle.abort();
        let _ = self.sender.send(outcome);
    }
}

pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
