//! A dedicated error for all possible errors in DNS queries: I/O, wire-format
//! inconsistencies, transaction lifecycle failures, pool/config failures.
use std::fmt;
use std::io;
use std::net::AddrParseError;
use std::str;

#[derive(Debug)]
pub enum DNSError {
    /// bounds/format/cycle violation while decoding a message
    MalformedPacket(String),
    /// a response arrived whose transaction id matches no pending query (non-fatal, dropped)
    UnknownTransaction(u16),
    /// no response arrived within the per-query budget
    Timeout,
    /// the query or client was explicitly cancelled
    Cancelled,
    /// connect was attempted with no usable nameserver address
    NoNameservers,
    /// the resolver config file could not be read or parsed
    ConfigParse(String),
    /// a helper rejected its input before issuing a query
    InvalidIP(String),
    /// `Pool::next` was called after `disconnect`
    PoolClosed,
    /// underlying socket/transport failure
    Io(io::Error),
    FromUtf8(std::string::FromUtf8Error),
    Utf8(str::Utf8Error),
    LoggerError(log::SetLoggerError),
    /// anything else, carried as a message (mirrors the catch-all the teacher used)
    DNS(String),
}

impl DNSError {
    // Helper function to create a new DNS error from a string
    pub fn new(s: impl Into<String>) -> Self {
        DNSError::DNS(s.into())
    }

    pub fn malformed(s: impl Into<String>) -> Self {
        DNSError::MalformedPacket(s.into())
    }
}

/// A specific custom `Result` for all functions
pub type DNSResult<T> = Result<T, DNSError>;

impl fmt::Display for DNSError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DNSError::MalformedPacket(s) => write!(f, "malformed DNS packet: {}", s),
            DNSError::UnknownTransaction(id) => {
                write!(f, "response for unknown transaction id {:#06x}", id)
            }
            DNSError::Timeout => write!(f, "query timed out"),
            DNSError::Cancelled => write!(f, "query was cancelled"),
            DNSError::NoNameservers => write!(f, "no usable nameserver address"),
            DNSError::ConfigParse(s) => write!(f, "resolver config error: {}", s),
            DNSError::InvalidIP(s) => write!(f, "invalid IP address: {}", s),
            DNSError::PoolClosed => write!(f, "connection pool is closed"),
            DNSError::Io(e) => write!(f, "I/O error: {}", e),
            DNSError::FromUtf8(e) => write!(f, "UTF8 conversion error: {}", e),
            DNSError::Utf8(e) => write!(f, "UTF8 error: {}", e),
            DNSError::LoggerError(e) => write!(f, "logger error: {}", e),
            DNSError::DNS(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for DNSError {}

// All conversions for internal errors into DNSError
impl From<io::Error> for DNSError {
    fn from(err: io::Error) -> Self {
        DNSError::Io(err)
    }
}

impl From<String> for DNSError {
    fn from(err: String) -> Self {
        DNSError::DNS(err)
    }
}

impl From<std::string::FromUtf8Error> for DNSError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        DNSError::FromUtf8(err)
    }
}

impl From<str::Utf8Error> for DNSError {
    fn from(err: str::Utf8Error) -> Self {
        DNSError::Utf8(err)
    }
}

impl From<log::SetLoggerError> for DNSError {
    fn from(err: log::SetLoggerError) -> Self {
        DNSError::LoggerError(err)
    }
}

impl From<AddrParseError> for DNSError {
    fn from(err: AddrParseError) -> Self {
        DNSError::InvalidIP(err.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for DNSError {
    fn from(err: tokio::sync::mpsc::error::SendError<T>) -> Self {
        DNSError::Io(io::Error::new(io::ErrorKind::BrokenPipe, err.to_string()))
    }
}
